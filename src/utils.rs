use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::PreviewError;
use url::Url;

/// Safely truncate a string, ensuring it is not truncated in the middle of multi-byte characters
///
/// This function will:
/// 1. Correctly handle Unicode characters (including Chinese, emoji, etc.)
/// 2. Add ellipsis when maximum length is reached
/// 3. Ensure the output string's display width does not exceed the specified length
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);

        if current_width + char_width + 3 > max_width {
            break;
        }

        result.push(c);
        current_width += char_width;
    }

    result.push_str("...");
    result
}

/// Greedy word wrap by display width. Words wider than `width` keep a line
/// of their own and are left for the caller to truncate.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps `text` and keeps at most `max_lines` lines, marking the cut with an ellipsis.
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }

    let lines = wrap_words(text, width);
    let overflow = lines.len() > max_lines;

    let mut clamped: Vec<String> = lines
        .into_iter()
        .take(max_lines)
        .map(|line| truncate_str(&line, width))
        .collect();

    if overflow {
        if let Some(last) = clamped.last_mut() {
            if !last.ends_with("...") {
                *last = truncate_str(&format!("{last}..."), width);
            }
        }
    }
    clamped
}

pub fn parse_hostname(url: &str) -> Result<String, PreviewError> {
    let parsed_url = Url::parse(url)?;
    let host = parsed_url.host_str().ok_or(url::ParseError::EmptyHost)?;
    Ok(host.to_string())
}
