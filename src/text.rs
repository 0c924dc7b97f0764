// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! String processing primitives shared by every other module.
//!
//! Everything here is byte-oriented and ASCII-only by design. Records live in
//! a raw byte arena and queries are folded with `to_ascii_uppercase`, so a
//! case-insensitive match never needs an allocation per record. Non-ASCII
//! bytes pass through untouched — they simply never compare equal to a folded
//! query byte unless they are identical.

/// Trim ASCII spaces from both ends.
///
/// The transcript format is space-padded in a few places (prompt suffix,
/// user-typed commands), never tab-padded, so this deliberately ignores
/// other whitespace.
pub fn trimmed(s: &str) -> &str {
    s.trim_matches(' ')
}

/// Trim spaces plus the line-ending bytes a transcript line may carry.
pub fn trimmed_line(s: &str) -> &str {
    s.trim_matches([' ', '\r', '\n'])
}

/// ASCII-uppercase fold of a query string. Multi-byte sequences are kept
/// verbatim.
pub fn uppercase_ascii(s: &str) -> String {
    s.chars().map(|c| c.to_ascii_uppercase()).collect()
}

/// Case-folded substring search: does `haystack` contain `needle` when both
/// are compared ASCII-uppercased? `needle` must already be folded.
///
/// Records are a few hundred bytes and queries a handful of characters, so a
/// naive scan beats any preprocessing here.
pub fn contains_folded(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.len() < needle.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| {
        window
            .iter()
            .zip(needle)
            .all(|(h, n)| h.to_ascii_uppercase() == *n)
    })
}

/// Largest prefix of `s` that is at most `cap` bytes and ends on a character
/// boundary. Clipping never splits a UTF-8 sequence.
pub fn clip_to_boundary(s: &str, cap: usize) -> &str {
    if s.len() <= cap {
        return s;
    }
    let mut end = cap;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Clip a record segment to its field capacity, logging the truncation.
///
/// Truncation is a diagnostic, not an error: ingestion continues with the
/// clipped text (the index fields physically cannot describe anything
/// longer).
pub fn clip_segment<'a>(s: &'a str, cap: usize, what: &str) -> &'a str {
    if s.len() > cap {
        log::warn!("trimming {} down to {} bytes: {:?}", what, cap, s);
        clip_to_boundary(s, cap)
    } else {
        s
    }
}
