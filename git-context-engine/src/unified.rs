//! Line-based unified diff generation.
//!
//! Output follows the classic `difflib.unified_diff` layout with an empty
//! line terminator: `--- from`, `+++ to`, `@@ -a,b +c,d @@` hunk headers,
//! three lines of context, every line joined with `\n` and no trailing
//! newline. Identical inputs produce an empty string.

use similar::TextDiff;

/// Placeholder label for an absent side.
pub const DEV_NULL: &str = "/dev/null";

const CONTEXT_LINES: usize = 3;

/// Computes a unified diff between two line sequences.
pub fn unified_diff(old: &[&str], new: &[&str], from_label: &str, to_label: &str) -> String {
    let diff = TextDiff::from_slices(old, new);
    let mut text = diff
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(from_label, to_label)
        .to_string();

    if text.ends_with('\n') {
        text.pop();
    }
    text
}

/// Splits text into lines without terminators.
///
/// Recognizes `\n`, `\r\n`, `\r` and the other Unicode line boundaries
/// (`\x0b`, `\x0c`, `\x1c`..`\x1e`, `\u{85}`, `\u{2028}`, `\u{2029}`). A final
/// terminator does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        let mut next = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                next = j + 1;
            }
        }
        start = next;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
