//! Greedy word wrap against a measured line width.
//!
//! Words are split on single spaces and never broken; a word wider than the line
//! occupies a line of its own. Lines are decided one word at a time with no lookahead.

use crate::layout::font_metrics::{StandardFont, TextMeasure};

pub const BULLET_PREFIX: &str = "\u{2022} ";
pub const CONTINUATION_INDENT: &str = "  ";

/// Splits `text` into lines no wider than `max_width` under `measure`.
///
/// A candidate line is the current line plus `" " + word`; it is kept while it fits,
/// otherwise the current line is committed and the word starts a new one.
/// An empty string yields no lines.
///
/// An over-wide first word goes on its own line with no blank line committed ahead of
/// it, so the rows after it are not pushed down by an extra line height.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    font: StandardFont,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure.measure_width(&candidate, font, size) <= max_width {
            current = candidate;
        } else {
            // An over-wide first word leaves `current` empty; nothing to commit.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps `"• " + text` and indents continuation lines with two spaces, so the
/// bullet marker appears only on the first visual line.
pub fn wrap_bullet<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    font: StandardFont,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let bulleted = format!("{BULLET_PREFIX}{text}");
    wrap_text(&bulleted, measure, font, size, max_width)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line
            } else {
                format!("{CONTINUATION_INDENT}{line}")
            }
        })
        .collect()
}
