//! Greedy word wrapping against a measured width

/// Split `text` into lines no wider than `max_width` as reported by `measure`.
///
/// Words are packed greedily. A word wider than `max_width` on its own gets
/// a line to itself; words are never broken. Any whitespace (including
/// existing newlines) separates words.
pub fn wrap_text<F>(text: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            if measure(word) <= max_width {
                current.push_str(word);
            } else {
                lines.push(word.to_string());
            }
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
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
