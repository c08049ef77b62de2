//! Custom dictionary collaborator contract.
//!
//! The user's allow-listed words live outside the core (persisted per
//! account); the gateway reads a snapshot before each check. A dictionary
//! update never retroactively alters computed spans — it only affects the
//! next check.

use ahash::AHashSet;

/// Store of user allow-listed words. All operations are case-insensitive
/// and trim surrounding whitespace.
pub trait DictionaryStore {
    /// Snapshot of the current words, lowercased.
    fn words(&self) -> AHashSet<String>;

    /// Add a word. Returns `false` if it was already present (or blank).
    fn add(&mut self, word: &str) -> bool;

    /// Remove a word. Returns `false` if it was not present.
    fn remove(&mut self, word: &str) -> bool;
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// In-memory dictionary for hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryDictionary {
    words: AHashSet<String>,
}

impl MemoryDictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self::new();
        for word in words {
            dict.add(word.as_ref());
        }
        dict
    }
}

impl DictionaryStore for MemoryDictionary {
    fn words(&self) -> AHashSet<String> {
        self.words.clone()
    }

    fn add(&mut self, word: &str) -> bool {
        let normalized = normalize(word);
        if normalized.is_empty() {
            return false;
        }
        self.words.insert(normalized)
    }

    fn remove(&mut self, word: &str) -> bool {
        self.words.remove(&normalize(word))
    }
}
