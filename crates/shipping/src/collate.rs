//! Human-facing string ordering for report sorting.
//!
//! Three levels, as in locale collation:
//! 1. base letters, ignoring accents and case;
//! 2. accents (unaccented first);
//! 3. case (lower case first).
//!
//! Byte order breaks any remaining tie.

use core::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

fn decomposed(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    decomposed(s)
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn with_accents(s: &str) -> impl Iterator<Item = char> + '_ {
    decomposed(s).flat_map(char::to_lowercase)
}

pub fn compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| with_accents(a).cmp(with_accents(b)))
        .then_with(|| {
            decomposed(a)
                .map(char::is_uppercase)
                .cmp(decomposed(b).map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}
