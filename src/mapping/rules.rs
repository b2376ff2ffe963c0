//! Mapping rule definitions and evaluation.

use anyhow::Result;
use serde::Deserialize;
use sift::Card;
use sift::query::{SearchResult, search};

/// A mapping definition with ordered rules.
#[derive(Debug)]
pub struct Mapping {
    pub rules: Vec<CompiledRule>,
    pub default: Option<String>,
}

/// A compiled mapping rule.
#[derive(Debug)]
pub struct CompiledRule {
    pub query: SearchResult,
    pub value: String,
}

/// Raw mapping rule from YAML (before compilation).
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct MappingRule {
    /// The search query
    #[serde(rename = "match")]
    pub match_expr: String,
    /// The value to return if this rule matches
    pub value: String,
}

/// Raw mapping from YAML (before compilation).
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct MappingConfig {
    pub rules: Vec<MappingRule>,
    #[serde(default)]
    pub default: Option<String>,
}

impl Mapping {
    /// Compile a mapping from config.
    pub fn compile(name: &str, config: &MappingConfig) -> Result<Self> {
        let mut rules = Vec::with_capacity(config.rules.len());

        for (i, rule) in config.rules.iter().enumerate() {
            let query = search(&rule.match_expr).map_err(|e| {
                anyhow::anyhow!(
                    "Config: Error in rule {} of mapping '{}' ({}): {}",
                    i + 1,
                    name,
                    rule.match_expr,
                    e
                )
            })?;

            rules.push(CompiledRule {
                query,
                value: rule.value.clone(),
            });
        }

        Ok(Mapping {
            rules,
            default: config.default.clone(),
        })
    }
}

/// Evaluate a mapping against a card, returning the first matching value.
pub fn evaluate_mapping<'a>(mapping: &'a Mapping, card: &Card) -> Option<&'a str> {
    mapping
        .rules
        .iter()
        .find(|rule| rule.query.matches(card))
        .map(|rule| rule.value.as_str())
        .or(mapping.default.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(value: serde_json::Value) -> Card {
        serde_json::from_value(value).unwrap()
    }

    fn rule(match_expr: &str, value: &str) -> MappingRule {
        MappingRule {
            match_expr: match_expr.into(),
            value: value.into(),
        }
    }

    fn make_mapping(default: Option<&str>) -> Mapping {
        let config = MappingConfig {
            rules: vec![
                rule("t:land", "land"),
                rule("t:creature mv<=2", "cheap creature"),
                rule("t:creature", "creature"),
                rule("t:instant OR t:sorcery", "spell"),
            ],
            default: default.map(String::from),
        };

        Mapping::compile("role", &config).unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let mapping = make_mapping(None);
        let bears = card(json!({"type_line": "Creature — Bear", "cmc": 2.0}));
        let wurm = card(json!({"type_line": "Creature — Wurm", "cmc": 7.0}));

        assert_eq!(evaluate_mapping(&mapping, &bears), Some("cheap creature"));
        assert_eq!(evaluate_mapping(&mapping, &wurm), Some("creature"));
    }

    #[test]
    fn test_fallback_to_default() {
        let mapping = make_mapping(Some("other"));
        let sol_ring = card(json!({"type_line": "Artifact"}));
        assert_eq!(evaluate_mapping(&mapping, &sol_ring), Some("other"));
    }

    #[test]
    fn test_no_match() {
        let mapping = make_mapping(None);
        let sol_ring = card(json!({"type_line": "Artifact"}));
        assert_eq!(evaluate_mapping(&mapping, &sol_ring), None);
    }

    #[test]
    fn test_invalid_rule_names_the_mapping() {
        let config = MappingConfig {
            rules: vec![rule("is:wizardly", "x")],
            default: None,
        };
        let err = Mapping::compile("role", &config).unwrap_err().to_string();
        assert!(err.contains("rule 1 of mapping 'role'"));
        assert!(err.contains("Unknown predicate"));
    }
}
