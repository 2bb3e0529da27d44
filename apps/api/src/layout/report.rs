//! Report composition: analysis (and optional resume) → laid-out `Document`.
//!
//! Page 1 is always the analysis report. Page 2, the optimized resume, is added
//! only when the resume has something to show. Rows flow top to bottom at a fixed
//! line height; nothing is moved to a new page when a page runs long.

use tracing::{debug, warn};

use crate::layout::document::{
    Document, Page, PageBuilder, BODY_INDENT, BODY_SIZE, CONTENT_WIDTH, ENTRY_HEADING_SIZE,
    HEADING_SIZE, INDENTED_CONTENT_WIDTH, MARGIN, SCORE_SIZE, TITLE_SIZE,
};
use crate::layout::font_metrics::{StandardFont, TextMeasure};
use crate::models::analysis::AnalysisResult;
use crate::models::resume::StructuredResume;

pub const REPORT_TITLE: &str = "Resume Analysis Report";
pub const RESUME_TITLE: &str = "Optimized Resume";
pub const SUGGESTIONS_HEADING: &str = "Suggestions for Improvement";

const REGULAR: StandardFont = StandardFont::Helvetica;
const BOLD: StandardFont = StandardFont::HelveticaBold;
const BODY_X: f32 = MARGIN + BODY_INDENT;

/// Lays out the full report. Pure function of its inputs and `measure`.
pub fn build_report_document<M: TextMeasure + ?Sized>(
    analysis: &AnalysisResult,
    resume: Option<&StructuredResume>,
    measure: &M,
) -> Document {
    let mut document = Document::new(REPORT_TITLE);
    document.add_page(analysis_page(analysis, measure));

    if let Some(resume) = resume.filter(|r| r.has_content()) {
        document.add_page(resume_page(resume, measure));
    }

    for (i, page) in document.pages().iter().enumerate() {
        if page.overflows_bottom_margin() {
            warn!(page = i + 1, "Report text runs below the bottom margin");
        }
    }
    debug!(pages = document.page_count(), "Report laid out");
    document
}

fn analysis_page<M: TextMeasure + ?Sized>(
    analysis: &AnalysisResult,
    measure: &M,
) -> Page {
    let mut page = PageBuilder::new(measure);

    page.line(REPORT_TITLE, BOLD, TITLE_SIZE, MARGIN);
    page.space(1);

    page.line(
        &format!("Overall Score: {}/100", analysis.overall_score),
        BOLD,
        SCORE_SIZE,
        MARGIN,
    );
    page.space(1);

    for (kind, category) in analysis.categories() {
        page.line(kind.heading(), BOLD, HEADING_SIZE, MARGIN);
        page.line(
            &format!("Score: {}/100", category.score),
            REGULAR,
            BODY_SIZE,
            BODY_X,
        );
        page.paragraph(
            &category.feedback,
            REGULAR,
            BODY_SIZE,
            BODY_X,
            INDENTED_CONTENT_WIDTH,
        );
        page.space(1);
    }

    page.line(SUGGESTIONS_HEADING, BOLD, HEADING_SIZE, MARGIN);
    for suggestion in &analysis.suggestions {
        page.bullet(suggestion, REGULAR, BODY_SIZE, BODY_X, INDENTED_CONTENT_WIDTH);
    }

    page.finish()
}

fn resume_page<M: TextMeasure + ?Sized>(
    resume: &StructuredResume,
    measure: &M,
) -> Page {
    let mut page = PageBuilder::new(measure);

    page.line(RESUME_TITLE, BOLD, TITLE_SIZE, MARGIN);
    page.space(1);

    if let Some(info) = &resume.personal_info {
        page.line(&info.name, BOLD, SCORE_SIZE, MARGIN);
        page.line(&info.contact_line(), REGULAR, BODY_SIZE, MARGIN);
        page.space(1);
    }

    if !resume.skills.is_empty() {
        page.line("Skills", BOLD, HEADING_SIZE, MARGIN);
        page.paragraph(
            &resume.skills_line(),
            REGULAR,
            BODY_SIZE,
            MARGIN,
            CONTENT_WIDTH,
        );
        page.space(1);
    }

    if !resume.experience.is_empty() {
        page.line("Experience", BOLD, HEADING_SIZE, MARGIN);
        for entry in &resume.experience {
            page.line(
                &format!("{}, {}", entry.title, entry.company),
                BOLD,
                ENTRY_HEADING_SIZE,
                MARGIN,
            );
            page.line(
                &format!("{} - {}", entry.start_date, entry.end_date),
                REGULAR,
                BODY_SIZE,
                MARGIN,
            );
            for item in &entry.description {
                page.bullet(item, REGULAR, BODY_SIZE, BODY_X, INDENTED_CONTENT_WIDTH);
            }
            page.space(1);
        }
    }

    if !resume.education.is_empty() {
        page.line("Education", BOLD, HEADING_SIZE, MARGIN);
        for entry in &resume.education {
            page.line(
                &format!("{} in {}", entry.degree, entry.field),
                BOLD,
                ENTRY_HEADING_SIZE,
                MARGIN,
            );
            page.line(
                &format!("{}, {}", entry.institution, entry.graduation_date),
                REGULAR,
                BODY_SIZE,
                MARGIN,
            );
            page.space(1);
        }
    }

    page.finish()
}
