// Report layout: text measurement, greedy wrapping, and page flow.
// Layout is CPU-bound and synchronous; callers run it on the blocking pool.

pub mod document;
pub mod font_metrics;
pub mod report;
pub mod wrap;

// Re-export the public API consumed by the export service and the PDF writer.
pub use document::{Document, Page};
pub use font_metrics::{AfmMetrics, StandardFont, TextMeasure};
pub use report::build_report_document;
