//! Free-Text Sanitization
//!
//! Conservative cleanup applied to user-supplied free-text fields
//! (titles, descriptions) before persistence. This is a markup-shape
//! guard, not an injection firewall: the storage layer is parameterized
//! and rendering is the consumer's responsibility.
//!
//! Behavior contract:
//! - `<script>...</script>` blocks are removed including their content
//! - remaining tags are removed, their inner text kept
//! - stray `<` / `>` are stripped
//! - quote characters and semicolons are replaced with a space
//!   (partial strip; keyword sequences are left intact)
//! - surrounding whitespace is trimmed
//! - ordinary punctuation (`@`, `.`, `$`, digits) passes through

/// Sanitize a free-text input field.
///
/// Never applied to credentials; the password policy and email shape
/// checks own those paths.
pub fn sanitize_input(input: &str) -> String {
    let without_scripts = strip_script_blocks(input);
    let without_tags = strip_tags(&without_scripts);

    let replaced: String = without_tags
        .chars()
        .map(|ch| match ch {
            '<' | '>' => ' ',
            '\'' | '"' | ';' | '`' => ' ',
            other => other,
        })
        .collect();

    replaced.trim().to_string()
}

/// Whether the input contains script-tag markup.
///
/// Used where markup must be rejected outright instead of sanitized
/// (fields that are rendered back to the UI).
pub fn contains_script_markup(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.contains("<script") || lower.contains("</script")
}

/// Remove `<script ...>...</script>` blocks, content included.
fn strip_script_blocks(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    // ASCII lowercasing keeps byte offsets aligned with `input`
    let lower = input.to_ascii_lowercase();
    let mut pos = 0;

    while let Some(start) = lower[pos..].find("<script") {
        let start = pos + start;
        out.push_str(&input[pos..start]);

        match lower[start..].find("</script") {
            Some(end_rel) => {
                let end = start + end_rel;
                // Skip past the closing tag's '>'
                match lower[end..].find('>') {
                    Some(close_rel) => pos = end + close_rel + 1,
                    None => return out, // unterminated closing tag
                }
            }
            None => return out, // unterminated script block drops the rest
        }
    }

    out.push_str(&input[pos..]);
    out
}

/// Remove `<...>` tags, keeping the text between them.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            other => out.push(other),
        }
    }

    out
}
