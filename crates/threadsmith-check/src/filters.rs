//! Local ignore filters applied before a match becomes a span.
//!
//! Short-form social text is full of tokens a general-purpose checker
//! flags but a thread composer must not: handles, hashtags, URLs, slang,
//! and deliberate informal contractions. These tables and predicates
//! decide which flagged tokens are allowed to pass unflagged. They are
//! owned by the gateway instance — constructed once, injected, no module
//! globals.

use ahash::AHashSet;

/// Social-media vocabulary that is never a spelling error.
const SOCIAL_MEDIA_WORDS: &[&str] = &[
    "lol", "omg", "wtf", "tbh", "imo", "imho", "fyi", "btw", "dm", "rt", "mt",
    "ff", "tbt", "ootd", "yolo", "fomo", "selfie", "hashtag", "tweet", "retweet",
    "covid", "covid19", "coronavirus", "pandemic", "lockdown", "quarantine",
    "app", "apps", "smartphone", "iphone", "android", "ios", "wifi", "bluetooth",
];

/// Informal contractions and abbreviations the grammar checker must allow.
const ALLOWED_INFORMAL: &[&str] = &[
    "lol", "omg", "btw", "fyi", "imo", "imho", "tbh", "dm", "rt",
    "gonna", "wanna", "gotta", "kinda", "sorta", "dunno",
    "can't", "won't", "don't", "isn't", "aren't", "wasn't", "weren't",
    "haven't", "hasn't", "hadn't", "wouldn't", "couldn't", "shouldn't",
];

/// Phrases common in short-form posts that grammar rules tend to flag.
const ALLOWED_PHRASES: &[&str] = &[
    "so excited", "can't wait", "love this", "hate when", "just saying",
    "no way", "for real", "my bad", "nbd", "np", "yw", "ty", "thx",
];

/// Strip everything but word characters and apostrophes.
#[must_use]
pub fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '\'')
        .collect()
}

fn has_url_lead_in(token: &str) -> bool {
    token.starts_with("http://")
        || token.starts_with("https://")
        || token.starts_with("www.")
        || token.starts_with('@')
        || token.starts_with('#')
}

/// The filter tables, instantiated per gateway.
#[derive(Debug)]
pub struct SocialFilters {
    social_words: AHashSet<&'static str>,
    allowed_informal: AHashSet<&'static str>,
    allowed_phrases: Vec<&'static str>,
}

impl SocialFilters {
    #[must_use]
    pub fn new() -> Self {
        Self {
            social_words: SOCIAL_MEDIA_WORDS.iter().copied().collect(),
            allowed_informal: ALLOWED_INFORMAL.iter().copied().collect(),
            allowed_phrases: ALLOWED_PHRASES.to_vec(),
        }
    }

    /// Should a flagged token be ignored for *spelling* purposes?
    ///
    /// Check order: trivial after cleaning, numeric, URL/mention/hashtag
    /// lead-in, social slang, then the caller's custom dictionary
    /// (case-insensitive, trimmed). Only a token failing every check may
    /// become a spelling span.
    #[must_use]
    pub fn ignore_spelling(&self, word: &str, custom_dictionary: &AHashSet<String>) -> bool {
        let cleaned = clean_word(word);
        if cleaned.chars().count() <= 1 {
            return true;
        }
        if cleaned.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
        if has_url_lead_in(word) || has_url_lead_in(&cleaned) {
            return true;
        }
        let lower = cleaned.to_lowercase();
        if self.social_words.contains(lower.as_str()) {
            return true;
        }
        custom_dictionary.contains(&lower)
    }

    /// Should a flagged region be ignored for *grammar* purposes?
    ///
    /// Coarser than the spelling filter: URLs anywhere in the region,
    /// hashtag/mention lead-ins, the informal allow-list, and containment
    /// either way against the allowed phrases.
    #[must_use]
    pub fn ignore_grammar(&self, text: &str) -> bool {
        if text.contains("http://") || text.contains("https://") {
            return true;
        }
        if text.starts_with('#') || text.starts_with('@') {
            return true;
        }
        let lower = text.to_lowercase();
        if self.allowed_informal.contains(lower.as_str()) {
            return true;
        }
        if self.social_words.contains(lower.as_str()) {
            return true;
        }
        self.allowed_phrases
            .iter()
            .any(|phrase| lower.contains(phrase) || phrase.contains(lower.as_str()))
    }
}

impl Default for SocialFilters {
    fn default() -> Self {
        Self::new()
    }
}
