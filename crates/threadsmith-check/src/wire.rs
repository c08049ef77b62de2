//! Wire types for the checking service response.
//!
//! The service contract is LanguageTool-shaped: POST a text, get back a
//! list of matches, each with a character offset, a length, replacement
//! values, and a rule with an optional category. The gateway consumes
//! these; it does not define the service's own schema beyond what it
//! reads.

use serde::{Deserialize, Serialize};

/// Top-level response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub matches: Vec<RawMatch>,
}

/// One flagged region as reported by the service.
///
/// `offset` and `length` are character offsets into the submitted text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub short_message: String,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    pub offset: usize,
    pub length: usize,
    pub rule: Rule,
}

/// A candidate replacement value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replacement {
    pub value: String,
}

/// The rule that produced a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Rule category; `TYPOS` marks spelling rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl RawMatch {
    /// Whether the service categorized this as a spelling/typo rule.
    ///
    /// Ambiguous categorizations break toward grammar: only an explicit
    /// typo-category rule, a rule id naming spelling, or a short message
    /// mentioning spelling routes to the spelling list. A match is routed
    /// to exactly one list, never both.
    #[must_use]
    pub fn is_spelling_rule(&self) -> bool {
        if self
            .rule
            .category
            .as_ref()
            .is_some_and(|c| c.id == "TYPOS")
        {
            return true;
        }
        self.rule.id.contains("SPELLING")
            || self.rule.id.contains("MORFOLOGIK")
            || self.short_message.to_lowercase().contains("spelling")
    }

    /// Replacement values in service order.
    #[must_use]
    pub fn replacement_values(&self) -> Vec<String> {
        self.replacements.iter().map(|r| r.value.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_match(rule_id: &str, category: Option<&str>, short_message: &str) -> RawMatch {
        RawMatch {
            message: String::new(),
            short_message: short_message.to_string(),
            replacements: vec![],
            offset: 0,
            length: 1,
            rule: Rule {
                id: rule_id.to_string(),
                description: String::new(),
                category: category.map(|id| Category {
                    id: id.to_string(),
                    name: String::new(),
                }),
            },
        }
    }

    #[test]
    fn typos_category_is_spelling() {
        assert!(rule_match("X", Some("TYPOS"), "").is_spelling_rule());
    }

    #[test]
    fn morfologik_rule_is_spelling() {
        assert!(rule_match("MORFOLOGIK_RULE_EN_US", None, "").is_spelling_rule());
    }

    #[test]
    fn spelling_short_message_is_spelling() {
        assert!(rule_match("X", None, "Spelling mistake").is_spelling_rule());
    }

    #[test]
    fn ambiguity_breaks_toward_grammar() {
        assert!(!rule_match("UPPERCASE_SENTENCE_START", Some("CASING"), "").is_spelling_rule());
        assert!(!rule_match("EN_A_VS_AN", None, "Wrong article").is_spelling_rule());
    }

    #[test]
    fn decodes_language_tool_shape() {
        let body = r#"{
            "software": {"name": "LanguageTool", "version": "6.0"},
            "matches": [{
                "message": "Possible spelling mistake found.",
                "shortMessage": "Spelling mistake",
                "replacements": [{"value": "the"}, {"value": "ten"}],
                "offset": 4,
                "length": 3,
                "rule": {
                    "id": "MORFOLOGIK_RULE_EN_US",
                    "description": "Possible spelling mistake",
                    "category": {"id": "TYPOS", "name": "Possible Typo"}
                }
            }]
        }"#;
        let response: RawResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.matches.len(), 1);
        let m = &response.matches[0];
        assert_eq!(m.offset, 4);
        assert_eq!(m.length, 3);
        assert_eq!(m.replacement_values(), vec!["the", "ten"]);
        assert!(m.is_spelling_rule());
    }

    #[test]
    fn missing_optional_fields_default() {
        let body = r#"{"matches": [{"offset": 0, "length": 2, "rule": {"id": "R"}}]}"#;
        let response: RawResponse = serde_json::from_str(body).unwrap();
        let m = &response.matches[0];
        assert!(m.replacements.is_empty());
        assert!(m.rule.category.is_none());
        assert!(!m.is_spelling_rule());
    }
}
