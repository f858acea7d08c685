//! Splitting long text into provider-sized pieces.

use lazy_static::lazy_static;
use regex::Regex;

/// Polly rejects SynthesizeSpeech requests longer than this.
pub const MAX_CHUNK_CHARS: usize = 3000;

lazy_static! {
    // Sentence terminator, optional closing quotes/brackets, then whitespace.
    static ref SENTENCE_END: Regex = Regex::new(r#"[.!?…]["'”’)\]]*\s+"#).unwrap();
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Cuts prefer the last sentence end inside the window, then the last
/// whitespace, then a hard cut on a char boundary. Text that already fits,
/// or that is nothing but whitespace, comes back as a single untouched chunk.
pub fn split(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let limit = match rest.char_indices().nth(max_chars) {
            Some((idx, _)) => idx,
            None => {
                push_trimmed(&mut chunks, rest);
                break;
            }
        };

        let window = &rest[..limit];
        let cut = last_sentence_end(window)
            .or_else(|| last_whitespace(window))
            .unwrap_or(limit);

        let (head, tail) = rest.split_at(cut);
        push_trimmed(&mut chunks, head);
        rest = tail.trim_start();
    }

    if chunks.is_empty() {
        return vec![text];
    }
    chunks
}

fn push_trimmed<'a>(chunks: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        chunks.push(piece);
    }
}

fn last_sentence_end(window: &str) -> Option<usize> {
    SENTENCE_END.find_iter(window).last().map(|m| m.end())
}

fn last_whitespace(window: &str) -> Option<usize> {
    window
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(idx, _)| idx)
        .filter(|&idx| idx > 0)
}
