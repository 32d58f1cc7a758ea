//! Paragraph-boundary text chunker.
//!
//! Splits document text into segments of at most `max_chars` characters.
//! Splitting happens only on paragraph boundaries (`\n\n`); a paragraph that
//! is itself longer than the limit is emitted whole as its own segment.

const PARAGRAPH_SEPARATOR: &str = "\n\n";

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split text into paragraph-aligned segments bounded by `max_chars`.
///
/// Text that already fits is returned unchanged as a single segment.
/// Otherwise paragraphs are accumulated greedily; each flushed segment is
/// trimmed, and segments that trim to nothing are dropped.
pub fn split(text: &str, max_chars: usize) -> Vec<String> {
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    let mut current_buf = String::new();
    let mut current_len = 0usize;

    for para in text.split(PARAGRAPH_SEPARATOR) {
        let para_len = char_len(para);

        if current_len + para_len > max_chars {
            flush(&mut segments, &current_buf);
            current_buf.clear();
            current_len = 0;
        }

        current_buf.push_str(para);
        current_buf.push_str(PARAGRAPH_SEPARATOR);
        current_len += para_len + PARAGRAPH_SEPARATOR.len();
    }

    flush(&mut segments, &current_buf);
    segments
}

fn flush(segments: &mut Vec<String>, buf: &str) {
    let trimmed = buf.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}
