//! Page and document model for the report.
//!
//! Coordinates follow PDF user space: origin at the bottom-left, `y` grows upward,
//! and a draw's `y` is its text baseline.

use serde::Serialize;

use crate::layout::font_metrics::{StandardFont, TextMeasure};
use crate::layout::wrap::{wrap_bullet, wrap_text};

// ────────────────────────────────────────────────────────────────────────────
// Layout constants
// ────────────────────────────────────────────────────────────────────────────

/// US Letter.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 50.0;
pub const LINE_HEIGHT: f32 = 20.0;
/// Extra left offset for body text under a heading.
pub const BODY_INDENT: f32 = 10.0;

pub const TITLE_SIZE: f32 = 24.0;
pub const SCORE_SIZE: f32 = 18.0;
pub const HEADING_SIZE: f32 = 16.0;
pub const ENTRY_HEADING_SIZE: f32 = 14.0;
pub const BODY_SIZE: f32 = 12.0;

/// Usable line width between the side margins.
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Line width for text drawn at `MARGIN + BODY_INDENT`.
pub const INDENTED_CONTENT_WIDTH: f32 = CONTENT_WIDTH - BODY_INDENT;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// One positioned run of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextDraw {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font: StandardFont,
    pub size: f32,
}

/// A fixed-size canvas. Draws can only be appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    draws: Vec<TextDraw>,
}

impl Page {
    pub fn letter() -> Self {
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            draws: Vec::new(),
        }
    }

    pub fn push(&mut self, draw: TextDraw) {
        self.draws.push(draw);
    }

    pub fn draws(&self) -> &[TextDraw] {
        &self.draws
    }

    /// True if any baseline sits below the bottom margin. Such text may be drawn
    /// partly or entirely off the page; layout does not paginate it.
    pub fn overflows_bottom_margin(&self) -> bool {
        self.draws.iter().any(|d| d.y < MARGIN)
    }
}

/// Ordered pages plus the title used for document metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pages: Vec<Page>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
        }
    }

    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Vertical pen position for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    y: f32,
    line_height: f32,
}

impl Cursor {
    pub fn for_page(page: &Page) -> Self {
        Self {
            y: page.height - MARGIN,
            line_height: LINE_HEIGHT,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Moves down `lines` rows. Not clamped at the page bottom.
    pub fn advance(&mut self, lines: u16) {
        self.y -= self.line_height * lines as f32;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page builder
// ────────────────────────────────────────────────────────────────────────────

/// Flows text rows down a single page.
///
/// Every emitting method draws at the current cursor and then advances one row;
/// `space` advances without drawing.
pub struct PageBuilder<'m, M: TextMeasure + ?Sized> {
    page: Page,
    cursor: Cursor,
    measure: &'m M,
}

impl<'m, M: TextMeasure + ?Sized> PageBuilder<'m, M> {
    pub fn new(measure: &'m M) -> Self {
        let page = Page::letter();
        let cursor = Cursor::for_page(&page);
        Self {
            page,
            cursor,
            measure,
        }
    }

    /// Draws one row at `x` without wrapping.
    pub fn line(&mut self, text: &str, font: StandardFont, size: f32, x: f32) {
        self.page.push(TextDraw {
            text: text.to_string(),
            x,
            y: self.cursor.y(),
            font,
            size,
        });
        self.cursor.advance(1);
    }

    pub fn space(&mut self, lines: u16) {
        self.cursor.advance(lines);
    }

    /// Wraps `text` to `max_width` and draws one row per line.
    pub fn paragraph(&mut self, text: &str, font: StandardFont, size: f32, x: f32, max_width: f32) {
        for line in wrap_text(text, self.measure, font, size, max_width) {
            self.line(&line, font, size, x);
        }
    }

    /// Like `paragraph`, with a bullet on the first row and indented continuations.
    pub fn bullet(&mut self, text: &str, font: StandardFont, size: f32, x: f32, max_width: f32) {
        for line in wrap_bullet(text, self.measure, font, size, max_width) {
            self.line(&line, font, size, x);
        }
    }

    pub fn finish(self) -> Page {
        self.page
    }
}
