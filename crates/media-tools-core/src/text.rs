//! Small text helpers shared by the prompt builders and renderers.

/// Marker appended to content cut down for the generative service.
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// Return the first `max_chars` characters of `text`.
///
/// Counts `char`s, not bytes, so multi-byte text never splits mid-character.
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Truncate `text` for a prompt, appending [`TRUNCATION_MARKER`] when cut.
///
/// Returns the prompt body and whether truncation happened.
pub fn truncate_for_prompt(text: &str, max_chars: usize) -> (String, bool) {
    let head = take_chars(text, max_chars);
    if head.len() == text.len() {
        (text.to_string(), false)
    } else {
        (format!("{head}{TRUNCATION_MARKER}"), true)
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Greedy word wrap against a width budget.
///
/// Words are appended to the current line while `measure(line)` stays
/// within `max_width`; the first word that would overflow starts a new line.
/// A single word wider than the budget gets a line to itself.
pub fn wrap_greedy<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
