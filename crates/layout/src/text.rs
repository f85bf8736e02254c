//! Text measurement and line wrapping for the form's CJK font.
//!
//! The PDF font is a non-embedded Adobe-Japan1 CID font whose ASCII range
//! maps to half-width glyphs. Every other character is treated as full
//! width, which is what the font's default width declares.

/// Advance of `c` as a fraction of the font size.
pub fn char_advance(c: char) -> f32 {
    match c {
        ' '..='~' => 0.5,
        '\u{FF61}'..='\u{FF9F}' => 0.5,
        _ => 1.0,
    }
}

pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_advance).sum::<f32>() * font_size
}

/// Characters that must not start a line (行頭禁則).
const LINE_START_FORBIDDEN: &str = "、。，．」』）)・ー！？,.";

fn is_line_start_forbidden(c: char) -> bool {
    LINE_START_FORBIDDEN.contains(c)
}

/// Wraps `text` into lines no wider than `max_width`.
///
/// Explicit newlines are kept, trailing blank lines are dropped and lines are
/// broken between characters. A closing punctuation mark that would start a
/// line is kept on the previous one even if it overhangs.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.trim_end().lines() {
        let paragraph = paragraph.trim_end();
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut width = 0.0;
        for c in paragraph.chars() {
            let advance = char_advance(c) * font_size;
            let overflows = !current.is_empty() && width + advance > max_width + 0.01;
            if overflows && !is_line_start_forbidden(c) {
                lines.push(std::mem::take(&mut current));
                width = 0.0;
            }
            current.push(c);
            width += advance;
        }
        lines.push(current);
    }
    lines
}

/// Keeps the lines that fit in `max_height` and returns how many were dropped.
pub fn clip_lines(lines: &mut Vec<String>, line_height: f32, max_height: f32) -> usize {
    if line_height <= 0.0 {
        return 0;
    }
    let fits = ((max_height / line_height) + 0.01).floor().max(0.0) as usize;
    if lines.len() > fits {
        let dropped = lines.len() - fits;
        lines.truncate(fits);
        dropped
    } else {
        0
    }
}
