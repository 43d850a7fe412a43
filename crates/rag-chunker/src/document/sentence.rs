//! Punctuation-based sentence splitting.
//!
//! A boundary is a sentence terminator (`.`, `!`, `?` or the Devanagari danda
//! `।`) followed by whitespace. No abbreviation handling: "e.g. this" splits.

use std::iter::FusedIterator;

const TERMINATORS: [char; 4] = ['.', '!', '?', '।'];

/// Lazy iterator over trimmed, non-empty sentences of a text block.
///
/// Cloning yields an independent cursor, so a split can be replayed.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: &'a str,
}

pub fn split_sentences(text: &str) -> Sentences<'_> {
    Sentences { rest: text }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.rest.is_empty() {
            let (sentence, rest) = split_at_boundary(self.rest);
            self.rest = rest;

            let sentence = sentence.trim();
            if !sentence.is_empty() {
                return Some(sentence);
            }
        }
        None
    }
}

impl FusedIterator for Sentences<'_> {}

/// Split off everything up to and including the first terminator that is
/// followed by whitespace; the whitespace run itself is dropped.
fn split_at_boundary(text: &str) -> (&str, &str) {
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !TERMINATORS.contains(&ch) {
            continue;
        }
        if let Some(&(end, next)) = chars.peek() {
            if next.is_whitespace() {
                debug_assert_eq!(end, idx + ch.len_utf8());
                return (&text[..end], text[end..].trim_start());
            }
        }
    }

    (text, "")
}
