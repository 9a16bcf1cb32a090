//! Greedy word wrap, the basis for pagination.
//!
//! Words are whitespace-separated; a line accepts the next word while
//! `line + " " + word` still measures within the limit. A word wider than the
//! limit sits alone on its own line (no hyphenation). Identical inputs always
//! produce identical breaks.

use crate::text::metrics::StandardFont;

/// Wraps `text` to lines no wider than `max_width` points at `size` in `font`.
pub fn wrap_text(text: &str, max_width: f32, font: StandardFont, size: f32) -> Vec<String> {
    wrap_with(text, |candidate| font.text_width(candidate, size) <= max_width)
}

/// Wraps by character count, for outputs without font metrics.
pub fn wrap_chars(text: &str, max_chars: usize) -> Vec<String> {
    wrap_with(text, |candidate| candidate.chars().count() <= max_chars)
}

fn wrap_with(text: &str, fits: impl Fn(&str) -> bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if fits(&candidate) {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
