#![forbid(unsafe_code)]

//! Explicit line splitting.
//!
//! Splits borrowed text on `\n` without copying or mutating it. Empty lines
//! are kept, so `"a\n\nb"` yields three lines and a trailing newline yields a
//! final empty line. The iterator is `Clone`, so a layout pass can measure
//! the lines and then walk them again to draw.

use std::iter::FusedIterator;

use memchr::{memchr, memchr_iter};

/// Iterator over the `\n`-separated lines of a byte string.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: Option<&'a [u8]>,
}

/// Split `text` on `\n`.
pub fn lines(text: &[u8]) -> Lines<'_> {
    Lines { rest: Some(text) }
}

/// Number of lines [`lines`] yields for `text`.
pub fn line_count(text: &[u8]) -> usize {
    memchr_iter(b'\n', text).count() + 1
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let rest = self.rest?;
        match memchr(b'\n', rest) {
            Some(i) => {
                self.rest = Some(&rest[i + 1..]);
                Some(&rest[..i])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

impl FusedIterator for Lines<'_> {}
