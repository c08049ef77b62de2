//! Twitter-weighted character counting.
//!
//! Twitter does not count code units. Under its counting rules a URL costs
//! a flat 23 characters no matter how long it is, characters from a set of
//! "light" Unicode ranges (roughly Latin, Greek, Cyrillic, general
//! punctuation) cost 1, and everything else — CJK, emoji — costs 2. The
//! budget shown next to a compose box must follow the same rules or the
//! user will be told a tweet fits when it does not.
//!
//! This module implements that weighting over grapheme clusters so a
//! multi-scalar emoji still counts once (at weight 2) rather than once per
//! scalar.

use unicode_segmentation::UnicodeSegmentation;

/// Flat weight assigned to every URL, regardless of its length.
pub const URL_WEIGHT: usize = 23;

/// Ranges that weigh 1; everything outside weighs 2.
///
/// Mirrors the default twitter-text configuration (version 3 weighted
/// ranges).
fn is_light(c: char) -> bool {
    matches!(
        u32::from(c),
        0..=0x10FF | 0x2000..=0x200D | 0x2010..=0x201F | 0x2032..=0x2037
    )
}

fn is_url_token(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://") || token.starts_with("www.")
}

fn grapheme_weight(grapheme: &str) -> usize {
    if grapheme.chars().all(is_light) { 1 } else { 2 }
}

/// Weighted length of `text` under Twitter's counting rules.
///
/// Whitespace-delimited tokens that look like URLs cost [`URL_WEIGHT`];
/// every other grapheme costs 1 or 2 depending on its range. Whitespace
/// itself costs 1 per character.
#[must_use]
pub fn weighted_len(text: &str) -> usize {
    let mut total = 0;
    let mut rest = text;
    while !rest.is_empty() {
        // Leading whitespace run.
        let token_start = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        total += rest[..token_start].chars().count();
        rest = &rest[token_start..];
        if rest.is_empty() {
            break;
        }
        // Non-whitespace token.
        let token_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..token_end];
        if is_url_token(token) {
            total += URL_WEIGHT;
        } else {
            total += token.graphemes(true).map(grapheme_weight).sum::<usize>();
        }
        rest = &rest[token_end..];
    }
    total
}
