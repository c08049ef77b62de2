//! Conversion of raw service matches into filtered, classified spans.

use ahash::AHashSet;
use web_time::Instant;

use threadsmith_core::{SegmentId, Span};

use crate::cache::{CacheKey, ResponseCache};
use crate::filters::SocialFilters;
use crate::service::CheckerService;
use crate::wire::RawMatch;

/// Maximum candidates carried per spelling span.
const MAX_SPELLING_CANDIDATES: usize = 3;

/// Minimum trimmed length worth sending to a checker at all.
const MIN_CHECK_LEN: usize = 3;

/// Observable availability of the checking backend.
///
/// `Unavailable` drives the UI's degraded-capability indicator; the
/// suggestion list itself just shows zero suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerHealth {
    Available,
    Unavailable,
}

/// Result of one gateway check: disjoint spelling and grammar span lists
/// plus the backend health observed during the call.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub spelling: Vec<Span>,
    pub grammar: Vec<Span>,
    pub health: CheckerHealth,
}

impl CheckOutcome {
    #[must_use]
    pub fn empty(health: CheckerHealth) -> Self {
        Self {
            spelling: Vec::new(),
            grammar: Vec::new(),
            health,
        }
    }

    /// All spans, spelling first.
    #[must_use]
    pub fn into_spans(self) -> Vec<Span> {
        let mut spans = self.spelling;
        spans.extend(self.grammar);
        spans
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Language submitted with every request.
    pub language: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
        }
    }
}

/// Adapts a [`CheckerService`] into a uniform span stream.
///
/// Owns the response cache and filter tables explicitly; construct one per
/// process and inject it wherever checks run.
pub struct CheckerGateway<S> {
    service: S,
    filters: SocialFilters,
    cache: ResponseCache,
    config: GatewayConfig,
}

impl<S: CheckerService> CheckerGateway<S> {
    #[must_use]
    pub fn new(service: S) -> Self {
        Self::with_config(service, GatewayConfig::default())
    }

    #[must_use]
    pub fn with_config(service: S, config: GatewayConfig) -> Self {
        Self {
            service,
            filters: SocialFilters::new(),
            cache: ResponseCache::new(),
            config,
        }
    }

    /// Check one segment's content.
    ///
    /// Near-empty text short-circuits to an empty outcome without touching
    /// the service. A failed call degrades to an empty outcome with
    /// `Unavailable` health — editing must never block on the checker.
    pub fn check(
        &mut self,
        text: &str,
        segment_id: &SegmentId,
        custom_dictionary: &AHashSet<String>,
    ) -> CheckOutcome {
        if text.trim().chars().count() < MIN_CHECK_LEN {
            return CheckOutcome::empty(CheckerHealth::Available);
        }

        // Sent untrimmed: match offsets index into the exact content the
        // caller holds.
        let now = Instant::now();
        let key = CacheKey::new(text, &self.config.language);
        let matches = if let Some(cached) = self.cache.get(&key, now) {
            cached.to_vec()
        } else {
            match self.service.check(text, &self.config.language) {
                Ok(matches) => {
                    self.cache.insert(key, matches.clone(), now);
                    matches
                }
                Err(error) => {
                    tracing::warn!(%error, segment = %segment_id, "check failed; degrading to no suggestions");
                    return CheckOutcome::empty(CheckerHealth::Unavailable);
                }
            }
        };

        self.classify(text, segment_id, custom_dictionary, &matches)
    }

    fn classify(
        &self,
        text: &str,
        segment_id: &SegmentId,
        custom_dictionary: &AHashSet<String>,
        matches: &[RawMatch],
    ) -> CheckOutcome {
        let mut spelling = Vec::new();
        let mut grammar = Vec::new();

        for raw in matches {
            let start = raw.offset;
            let end = raw.offset + raw.length;
            let Some(flagged) = threadsmith_core::edit::char_slice(text, start, end) else {
                tracing::debug!(start, end, "match offsets out of range; dropped");
                continue;
            };

            if raw.is_spelling_rule() {
                if self.filters.ignore_spelling(flagged, custom_dictionary)
                    || self.filters.ignore_grammar(flagged)
                {
                    continue;
                }
                let mut candidates = raw.replacement_values();
                candidates.truncate(MAX_SPELLING_CANDIDATES);
                spelling.push(Span::spelling(
                    segment_id.clone(),
                    start,
                    end,
                    flagged,
                    candidates,
                ));
            } else {
                if self.filters.ignore_grammar(flagged) {
                    continue;
                }
                let reason = if raw.short_message.is_empty() {
                    raw.message.clone()
                } else {
                    raw.short_message.clone()
                };
                let mut candidates = raw.replacement_values();
                candidates.truncate(MAX_SPELLING_CANDIDATES);
                grammar.push(Span::grammar(
                    segment_id.clone(),
                    start,
                    end,
                    flagged,
                    candidates,
                    reason,
                    &raw.rule.id,
                ));
            }
        }

        CheckOutcome {
            spelling,
            grammar,
            health: CheckerHealth::Available,
        }
    }

    /// Drop cached responses (e.g. after a language change).
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{CheckError, Result};
    use crate::wire::{Category, Replacement, Rule};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn spelling_match(offset: usize, length: usize, replacements: &[&str]) -> RawMatch {
        RawMatch {
            message: "Possible spelling mistake found.".into(),
            short_message: "Spelling mistake".into(),
            replacements: replacements
                .iter()
                .map(|r| Replacement {
                    value: (*r).to_string(),
                })
                .collect(),
            offset,
            length,
            rule: Rule {
                id: "MORFOLOGIK_RULE_EN_US".into(),
                description: String::new(),
                category: Some(Category {
                    id: "TYPOS".into(),
                    name: "Possible Typo".into(),
                }),
            },
        }
    }

    fn grammar_match(offset: usize, length: usize, rule_id: &str, short: &str) -> RawMatch {
        RawMatch {
            message: "Grammar issue.".into(),
            short_message: short.into(),
            replacements: vec![],
            offset,
            length,
            rule: Rule {
                id: rule_id.into(),
                description: String::new(),
                category: Some(Category {
                    id: "GRAMMAR".into(),
                    name: "Grammar".into(),
                }),
            },
        }
    }

    struct ScriptedService {
        matches: Vec<RawMatch>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl ScriptedService {
        fn returning(matches: Vec<RawMatch>) -> Self {
            Self {
                matches,
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                matches: vec![],
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    impl CheckerService for ScriptedService {
        fn check(&self, _text: &str, _language: &str) -> Result<Vec<RawMatch>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CheckError::Status { code: 503 })
            } else {
                Ok(self.matches.clone())
            }
        }
    }

    fn seg() -> SegmentId {
        SegmentId::new("seg-1")
    }

    #[test]
    fn short_text_short_circuits() {
        let mut gateway = CheckerGateway::new(ScriptedService::returning(vec![]));
        let outcome = gateway.check("hi", &seg(), &AHashSet::new());
        assert!(outcome.spelling.is_empty());
        assert_eq!(outcome.health, CheckerHealth::Available);
        assert_eq!(gateway.service.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn spelling_match_becomes_spelling_span() {
        let service = ScriptedService::returning(vec![spelling_match(0, 3, &["the"])]);
        let mut gateway = CheckerGateway::new(service);
        let outcome = gateway.check("teh fox", &seg(), &AHashSet::new());
        assert_eq!(outcome.spelling.len(), 1);
        assert!(outcome.grammar.is_empty());
        let span = &outcome.spelling[0];
        assert_eq!(span.flagged_text, "teh");
        assert_eq!(span.candidates, vec!["the"]);
        assert!(span.matches_content("teh fox"));
    }

    #[test]
    fn grammar_match_keeps_reason() {
        let service =
            ScriptedService::returning(vec![grammar_match(0, 5, "HE_VERB_AGR", "Agreement error")]);
        let mut gateway = CheckerGateway::new(service);
        let outcome = gateway.check("He go to the store", &seg(), &AHashSet::new());
        assert!(outcome.spelling.is_empty());
        assert_eq!(outcome.grammar.len(), 1);
        assert_eq!(outcome.grammar[0].reason.as_deref(), Some("Agreement error"));
    }

    #[test]
    fn no_match_lands_in_both_lists() {
        let service = ScriptedService::returning(vec![
            spelling_match(0, 3, &["the"]),
            grammar_match(4, 3, "SOME_RULE", "Issue"),
        ]);
        let mut gateway = CheckerGateway::new(service);
        let outcome = gateway.check("teh fox runs", &seg(), &AHashSet::new());
        let spelling_ids: Vec<_> = outcome.spelling.iter().map(|s| &s.id).collect();
        assert!(outcome.grammar.iter().all(|g| !spelling_ids.contains(&&g.id)));
    }

    #[test]
    fn custom_dictionary_suppresses_spelling_span() {
        let service = ScriptedService::returning(vec![spelling_match(0, 3, &["the"])]);
        let mut gateway = CheckerGateway::new(service);
        let dict: AHashSet<String> = ["teh".to_string()].into_iter().collect();
        let outcome = gateway.check("teh fox", &seg(), &dict);
        assert!(outcome.spelling.is_empty());
    }

    #[test]
    fn dictionary_only_suppresses_its_own_word() {
        let service = ScriptedService::returning(vec![
            spelling_match(0, 3, &["the"]),
            spelling_match(4, 7, &["receive"]),
        ]);
        let mut gateway = CheckerGateway::new(service);
        let dict: AHashSet<String> = ["teh".to_string()].into_iter().collect();
        let outcome = gateway.check("teh recieve", &seg(), &dict);
        assert_eq!(outcome.spelling.len(), 1);
        assert_eq!(outcome.spelling[0].flagged_text, "recieve");
    }

    #[test]
    fn slang_is_filtered_from_spelling() {
        let service = ScriptedService::returning(vec![spelling_match(0, 3, &[])]);
        let mut gateway = CheckerGateway::new(service);
        let outcome = gateway.check("lol what a day", &seg(), &AHashSet::new());
        assert!(outcome.spelling.is_empty());
    }

    #[test]
    fn informal_grammar_is_filtered() {
        let service =
            ScriptedService::returning(vec![grammar_match(0, 5, "INFORMAL", "Informal style")]);
        let mut gateway = CheckerGateway::new(service);
        let outcome = gateway.check("gonna be great", &seg(), &AHashSet::new());
        assert!(outcome.grammar.is_empty());
    }

    #[test]
    fn candidates_capped_at_three() {
        let service =
            ScriptedService::returning(vec![spelling_match(0, 3, &["a", "b", "c", "d", "e"])]);
        let mut gateway = CheckerGateway::new(service);
        let outcome = gateway.check("teh fox", &seg(), &AHashSet::new());
        assert_eq!(outcome.spelling[0].candidates.len(), 3);
    }

    #[test]
    fn failure_degrades_with_observable_health() {
        let mut gateway = CheckerGateway::new(ScriptedService::failing());
        let outcome = gateway.check("some text here", &seg(), &AHashSet::new());
        assert!(outcome.spelling.is_empty());
        assert!(outcome.grammar.is_empty());
        assert_eq!(outcome.health, CheckerHealth::Unavailable);
    }

    #[test]
    fn identical_text_is_served_from_cache() {
        let service = ScriptedService::returning(vec![spelling_match(0, 3, &["the"])]);
        let mut gateway = CheckerGateway::new(service);
        let dict = AHashSet::new();
        let first = gateway.check("teh fox", &seg(), &dict);
        let second = gateway.check("teh fox", &seg(), &dict);
        assert_eq!(gateway.service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.spelling.len(), second.spelling.len());
    }

    #[test]
    fn out_of_range_match_is_dropped() {
        let service = ScriptedService::returning(vec![spelling_match(40, 5, &["x"])]);
        let mut gateway = CheckerGateway::new(service);
        let outcome = gateway.check("short text", &seg(), &AHashSet::new());
        assert!(outcome.spelling.is_empty());
        assert!(outcome.grammar.is_empty());
    }

    #[test]
    fn into_spans_flattens_spelling_first() {
        let outcome = CheckOutcome {
            spelling: vec![Span::spelling(seg(), 0, 3, "teh", vec![])],
            grammar: vec![Span::grammar(seg(), 4, 7, "go", vec![], "why", "R")],
            health: CheckerHealth::Available,
        };
        let spans = outcome.into_spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].kind, threadsmith_core::SpanKind::Spelling);
    }
}
