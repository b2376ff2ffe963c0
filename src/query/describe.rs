//! Render a query tree as English, for `--explain` and error reports.

use super::ast::{ComparisonOp, FieldValue, SearchNode};
use super::compile::{RARITIES, rarity_rank};
use super::fields::{FieldClass, FieldName};
use super::predicates;
use crate::colors::{Color, ColorSet};

pub fn describe_query(node: &SearchNode) -> String {
    match node {
        SearchNode::Name {
            pattern: Some(pattern),
            ..
        } => format!("name matches {}", pattern),
        SearchNode::Name { value, .. } => format!("name includes \"{}\"", value),
        SearchNode::ExactName { value, .. } => format!("name is exactly \"{}\"", value),
        SearchNode::Field {
            field, op, value, ..
        } => describe_field(*field, *op, value),
        SearchNode::And { children, .. } => children
            .iter()
            .map(describe_query)
            .collect::<Vec<_>>()
            .join(" AND "),
        SearchNode::Or { children, .. } if children.len() == 1 => describe_query(&children[0]),
        SearchNode::Or { children, .. } => format!(
            "({})",
            children
                .iter()
                .map(describe_query)
                .collect::<Vec<_>>()
                .join(" OR ")
        ),
        SearchNode::Not { child, .. } => format!("NOT {}", describe_query(child)),
    }
}

fn op_label(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Colon => "includes",
        ComparisonOp::Equals => "is",
        ComparisonOp::NotEquals => "is not",
        ComparisonOp::Lt => "is less than",
        ComparisonOp::Gt => "is greater than",
        ComparisonOp::Lte => "is at most",
        ComparisonOp::Gte => "is at least",
    }
}

fn color_op_label(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Colon | ComparisonOp::Gte => "includes at least",
        ComparisonOp::Equals => "is exactly",
        ComparisonOp::NotEquals => "is not exactly",
        ComparisonOp::Lte => "is within",
        ComparisonOp::Lt => "is strictly within",
        ComparisonOp::Gt => "includes more than",
    }
}

fn count_label(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Colon | ComparisonOp::Equals => "exactly",
        ComparisonOp::NotEquals => "other than",
        ComparisonOp::Lt => "fewer than",
        ComparisonOp::Gt => "more than",
        ComparisonOp::Lte => "at most",
        ComparisonOp::Gte => "at least",
    }
}

fn value_text(value: &FieldValue) -> String {
    match value {
        FieldValue::String(text) => format!("\"{}\"", text),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Regex(pattern) => pattern.to_string(),
        FieldValue::Colors(colors) => colors.to_string(),
    }
}

fn colors_text(colors: ColorSet) -> String {
    if colors == ColorSet::EMPTY.with(Color::C) {
        "colorless".to_string()
    } else {
        colors.to_string()
    }
}

fn describe_field(field: FieldName, op: ComparisonOp, value: &FieldValue) -> String {
    let label = field.label();
    if let FieldValue::Regex(pattern) = value {
        return format!("{} matches {}", label, pattern);
    }

    match (field.class(), value) {
        (FieldClass::Predicate, FieldValue::String(name)) => {
            let negated = (field == FieldName::Not) != (op == ComparisonOp::NotEquals);
            let verb = if negated { "is not" } else { "is" };
            match predicates::lookup(name) {
                Some(entry) => format!("card {} {}", verb, entry.description),
                None => format!("card {} \"{}\"", verb, name),
            }
        }
        (FieldClass::Color, FieldValue::Number(n)) => {
            format!("cards with {} {} identity colors", count_label(op), n)
        }
        (FieldClass::Color, FieldValue::Colors(colors)) => {
            if field != FieldName::Produces && *colors == ColorSet::EMPTY.with(Color::C) {
                let verb = if op == ComparisonOp::NotEquals { "is not" } else { "is" };
                return format!("{} {} colorless", label, verb);
            }
            format!("{} {} {}", label, color_op_label(op), colors_text(*colors))
        }
        (FieldClass::Rarity, FieldValue::String(text)) => {
            let rarity = rarity_rank(text)
                .and_then(|rank| RARITIES.get(rank))
                .map_or_else(|| text.clone(), |r| r.to_string());
            format!("{} {} {}", label, equality_label(op), rarity)
        }
        (FieldClass::Legality, FieldValue::String(format)) => {
            let status = match field {
                FieldName::Banned => "banned",
                FieldName::Restricted => "restricted",
                _ => "legal",
            };
            let not = if op == ComparisonOp::NotEquals { "not " } else { "" };
            format!("{}{} in {}", not, status, format)
        }
        (FieldClass::Game, FieldValue::String(name)) if field == FieldName::In => {
            let not = if op == ComparisonOp::NotEquals { "not " } else { "" };
            format!("{}printed in {}", not, name)
        }
        (FieldClass::Text, _) => format!("{} {} {}", label, op_label(op), value_text(value)),
        _ => format!("{} {} {}", label, equality_label(op), value_text(value)),
    }
}

/// Like [`op_label`], but `:` means equality.
fn equality_label(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Colon => "is",
        other => op_label(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse;

    fn describe(query: &str) -> String {
        describe_query(&parse(query).unwrap())
    }

    #[test]
    fn test_names() {
        assert_eq!(describe("bolt"), "name includes \"bolt\"");
        assert_eq!(describe("!\"Lightning Bolt\""), "name is exactly \"Lightning Bolt\"");
        assert_eq!(describe("/^bolt/"), "name matches /^bolt/i");
    }

    #[test]
    fn test_boolean_shape() {
        assert_eq!(
            describe("t:elf (c:g OR c:w) -r:common"),
            "type includes \"elf\" AND (color includes at least G OR color includes at least W) AND NOT rarity is common"
        );
    }

    #[test]
    fn test_field_overrides() {
        assert_eq!(describe("s:dom"), "set is \"dom\"");
        assert_eq!(describe("r:m"), "rarity is mythic");
        assert_eq!(describe("r>=u"), "rarity is at least uncommon");
        assert_eq!(describe("id<=bg"), "color identity is within BG");
        assert_eq!(describe("c:c"), "color is colorless");
        assert_eq!(describe("id>1"), "cards with more than 1 identity colors");
        assert_eq!(describe("cmc>=3"), "mana value is at least 3");
        assert_eq!(describe("o:/draw/"), "oracle text matches /draw/i");
        assert_eq!(describe("f:modern"), "legal in modern");
        assert_eq!(describe("banned:legacy"), "banned in legacy");
    }

    #[test]
    fn test_predicates() {
        assert_eq!(describe("is:fetchland"), "card is a fetch land");
        assert_eq!(describe("not:reprint"), "card is not a reprint");
        assert_eq!(describe("is:wizardly"), "card is \"wizardly\"");
    }
}
