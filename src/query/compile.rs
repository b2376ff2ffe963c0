//! Field compiler: turns one `field op value` clause into a [`Predicate`].

use std::fmt;
use time::Date;
use time::macros::format_description;

use super::ast::{ComparisonOp, FieldValue, Span};
use super::error::CompileError;
use super::fields::{FieldClass, FieldName};
use super::predicates;
use crate::card::Card;
use crate::colors::{Color, compare_colors};

/// A compiled query: a pure test over one card, safe to share across threads.
pub struct Predicate(Box<dyn Fn(&Card) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(test: impl Fn(&Card) -> bool + Send + Sync + 'static) -> Self {
        Predicate(Box::new(test))
    }

    pub fn constant(value: bool) -> Self {
        Predicate::new(move |_| value)
    }

    pub fn matches(&self, card: &Card) -> bool {
        (self.0)(card)
    }

    pub fn all(children: Vec<Predicate>) -> Self {
        Predicate::new(move |card| children.iter().all(|p| p.matches(card)))
    }

    pub fn any(children: Vec<Predicate>) -> Self {
        Predicate::new(move |card| children.iter().any(|p| p.matches(card)))
    }

    pub fn negate(self) -> Self {
        Predicate::new(move |card| !self.matches(card))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

pub const RARITIES: [&str; 6] = ["common", "uncommon", "rare", "mythic", "special", "bonus"];

const GAMES: &[&str] = &["paper", "arena", "mtgo", "astral", "sega"];

const SET_TYPES: &[&str] = &[
    "core",
    "expansion",
    "masters",
    "alchemy",
    "masterpiece",
    "arsenal",
    "from_the_vault",
    "spellbook",
    "premium_deck",
    "duel_deck",
    "draft_innovation",
    "treasure_chest",
    "commander",
    "planechase",
    "archenemy",
    "vanguard",
    "funny",
    "starter",
    "box",
    "promo",
    "token",
    "memorabilia",
    "minigame",
];

/// Compile a single field clause.
pub fn compile_field(
    field: FieldName,
    op: ComparisonOp,
    value: &FieldValue,
    span: Span,
) -> Result<Predicate, CompileError> {
    match field.class() {
        FieldClass::Text | FieldClass::Discrete => compile_text(field, op, value, span),
        FieldClass::Numeric => compile_numeric(field, op, value, span),
        FieldClass::Stat => compile_stat(field, op, value, span),
        FieldClass::Color => compile_color(field, op, value, span),
        FieldClass::Rarity => compile_rarity(op, value, span),
        FieldClass::Legality => compile_legality(field, op, value, span),
        FieldClass::Game => compile_game(field, op, value, span),
        FieldClass::Date => compile_date(op, value, span),
        FieldClass::Predicate => compile_is(field, op, value, span),
    }
}

/// Generic ordered comparison. A missing value only satisfies `!=`.
pub fn compare_ordered<T: PartialOrd>(op: ComparisonOp, actual: Option<T>, target: T) -> bool {
    let Some(actual) = actual else {
        return op == ComparisonOp::NotEquals;
    };
    match op {
        ComparisonOp::Colon | ComparisonOp::Equals => actual == target,
        ComparisonOp::NotEquals => actual != target,
        ComparisonOp::Lt => actual < target,
        ComparisonOp::Gt => actual > target,
        ComparisonOp::Lte => actual <= target,
        ComparisonOp::Gte => actual >= target,
    }
}

fn mismatch(field: FieldName, expected: &str, value: &FieldValue, span: Span) -> CompileError {
    CompileError::new(
        format!(
            "Field '{}' expects {}, not {}",
            field,
            expected,
            value.kind_name()
        ),
        span,
    )
}

fn unsupported_op(field: FieldName, op: ComparisonOp, span: Span) -> CompileError {
    CompileError::new(
        format!("Operator '{}' is not supported for field '{}'", op, field),
        span,
    )
}

/// Card strings a text or discrete field is matched against.
fn text_values(field: FieldName, card: &Card) -> Vec<&str> {
    let faces = &card.card_faces;
    match field {
        FieldName::Name => card.names().collect(),
        FieldName::Type => std::iter::once(card.type_line.as_str())
            .chain(faces.iter().map(|f| f.type_line.as_str()))
            .collect(),
        FieldName::Oracle => card.oracle_texts().collect(),
        FieldName::Mana => card
            .mana_cost
            .as_deref()
            .into_iter()
            .chain(faces.iter().filter_map(|f| f.mana_cost.as_deref()))
            .collect(),
        FieldName::Artist => card.artist.as_deref().into_iter().collect(),
        FieldName::Number => vec![card.collector_number.as_str()],
        FieldName::Keyword => card.keywords.iter().map(String::as_str).collect(),
        FieldName::Set => vec![card.set.as_str()],
        FieldName::SetType => vec![card.set_type.as_str()],
        FieldName::Layout => vec![card.layout.as_str()],
        FieldName::Frame => vec![card.frame.as_str()],
        FieldName::Border => vec![card.border_color.as_str()],
        FieldName::Lang => vec![card.lang.as_str()],
        _ => Vec::new(),
    }
}

/// Expand `2gg` to `{2}{G}{G}`; anything with braces is left alone.
pub fn normalize_mana(value: &str) -> String {
    if value.contains('{') {
        return value.to_string();
    }
    let mut out = String::new();
    let mut digits = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if !digits.is_empty() {
            out.push_str(&format!("{{{}}}", digits));
            digits.clear();
        }
        out.push_str(&format!("{{{}}}", c.to_ascii_uppercase()));
    }
    if !digits.is_empty() {
        out.push_str(&format!("{{{}}}", digits));
    }
    out
}

/// Leading digits of a collector number (`"123a"` → 123).
fn collector_number(card: &Card) -> Option<f64> {
    let digits: String = card
        .collector_number
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn compile_text(
    field: FieldName,
    op: ComparisonOp,
    value: &FieldValue,
    span: Span,
) -> Result<Predicate, CompileError> {
    let discrete = field.class() == FieldClass::Discrete;
    let text = match value {
        FieldValue::Regex(pattern) => {
            let pattern = pattern.clone();
            return Ok(Predicate::new(move |card| {
                text_values(field, card).iter().any(|t| pattern.is_match(t))
            }));
        }
        FieldValue::String(text) => text,
        other => return Err(mismatch(field, "text", other, span)),
    };

    let needle = if field == FieldName::Mana {
        normalize_mana(text).to_lowercase()
    } else {
        text.to_lowercase()
    };

    let predicate = match op {
        ComparisonOp::Colon if !discrete => Predicate::new(move |card| {
            text_values(field, card)
                .iter()
                .any(|t| t.to_lowercase().contains(&needle))
        }),
        ComparisonOp::Colon | ComparisonOp::Equals => Predicate::new(move |card| {
            text_values(field, card)
                .iter()
                .any(|t| t.to_lowercase() == needle)
        }),
        ComparisonOp::NotEquals => Predicate::new(move |card| {
            !text_values(field, card)
                .iter()
                .any(|t| t.to_lowercase() == needle)
        }),
        _ if field == FieldName::Number => {
            let target: f64 = needle
                .parse()
                .map_err(|_| mismatch(field, "a number for ordered comparison", value, span))?;
            Predicate::new(move |card| compare_ordered(op, collector_number(card), target))
        }
        _ if discrete => {
            tracing::debug!(%field, %op, "ordered comparison on a discrete field never matches");
            Predicate::constant(false)
        }
        _ => return Err(unsupported_op(field, op, span)),
    };
    Ok(predicate)
}

fn numeric_value(field: FieldName, card: &Card) -> Option<f64> {
    match field {
        FieldName::ManaValue => card.cmc,
        FieldName::Year => card.release_date().map(|d| f64::from(d.year())),
        _ => None,
    }
}

fn compile_numeric(
    field: FieldName,
    op: ComparisonOp,
    value: &FieldValue,
    span: Span,
) -> Result<Predicate, CompileError> {
    let FieldValue::Number(target) = *value else {
        return Err(mismatch(field, "a number", value, span));
    };
    Ok(Predicate::new(move |card| {
        compare_ordered(op, numeric_value(field, card), target)
    }))
}

fn stat_value(field: FieldName, card: &Card) -> Option<&str> {
    match field {
        FieldName::Power => card.power(),
        FieldName::Toughness => card.toughness(),
        FieldName::Loyalty => card.loyalty(),
        FieldName::Defense => card.defense(),
        _ => None,
    }
}

/// Numeric reading of a stat; anything containing `*` counts as 0.
fn stat_number(stat: &str) -> Option<f64> {
    if stat.contains('*') {
        Some(0.0)
    } else {
        stat.trim().parse().ok()
    }
}

fn compile_stat(
    field: FieldName,
    op: ComparisonOp,
    value: &FieldValue,
    span: Span,
) -> Result<Predicate, CompileError> {
    match value {
        FieldValue::Number(target) => {
            let target = *target;
            Ok(Predicate::new(move |card| {
                compare_ordered(op, stat_value(field, card).and_then(stat_number), target)
            }))
        }
        FieldValue::String(text) if text.contains('*') => Ok(match op {
            ComparisonOp::Colon | ComparisonOp::Equals => Predicate::new(move |card| {
                stat_value(field, card).is_some_and(|s| s == "*" || s.contains('*'))
            }),
            ComparisonOp::NotEquals => Predicate::new(move |card| {
                !stat_value(field, card).is_some_and(|s| s.contains('*'))
            }),
            _ => Predicate::new(move |card| {
                compare_ordered(op, stat_value(field, card).and_then(stat_number), 0.0)
            }),
        }),
        other => Err(mismatch(field, "a number or '*'", other, span)),
    }
}

fn compile_color(
    field: FieldName,
    op: ComparisonOp,
    value: &FieldValue,
    span: Span,
) -> Result<Predicate, CompileError> {
    match (field, value) {
        (FieldName::Produces, FieldValue::Colors(search)) => {
            let search = *search;
            Ok(Predicate::new(move |card| {
                compare_colors(card.produced_mana, search, op, true)
            }))
        }
        (FieldName::Color, FieldValue::Colors(search)) => {
            let search = *search;
            Ok(Predicate::new(move |card| {
                compare_colors(card.colors(), search, op, false)
            }))
        }
        (FieldName::Identity, FieldValue::Colors(search)) => {
            let search = *search;
            Ok(Predicate::new(move |card| {
                compare_colors(card.color_identity, search, op, false)
            }))
        }
        (FieldName::Identity, FieldValue::Number(count)) => {
            let count = *count;
            Ok(Predicate::new(move |card| {
                let colors = card.color_identity.without(Color::C);
                compare_ordered(op, Some(colors.len() as f64), count)
            }))
        }
        (_, FieldValue::Number(_)) => Err(CompileError::new(
            format!("Color counts are only supported for identity, not '{}'", field),
            span,
        )),
        (_, FieldValue::String(text)) => Err(CompileError::new(
            format!("Unknown color '{}'", text),
            span,
        )),
        (_, other) => Err(mismatch(field, "colors", other, span)),
    }
}

/// Position of a rarity in the fixed order, accepting one-letter shorthand.
pub fn rarity_rank(name: &str) -> Option<usize> {
    let lower = name.to_lowercase();
    RARITIES
        .iter()
        .position(|r| *r == lower || (lower.len() == 1 && r.starts_with(&lower)))
}

fn compile_rarity(op: ComparisonOp, value: &FieldValue, span: Span) -> Result<Predicate, CompileError> {
    let FieldValue::String(text) = value else {
        return Err(mismatch(FieldName::Rarity, "a rarity", value, span));
    };
    let target = rarity_rank(text)
        .ok_or_else(|| CompileError::new(format!("Unknown rarity '{}'", text), span))?;
    Ok(Predicate::new(move |card| {
        compare_ordered(op, rarity_rank(&card.rarity), target)
    }))
}

fn compile_legality(
    field: FieldName,
    op: ComparisonOp,
    value: &FieldValue,
    span: Span,
) -> Result<Predicate, CompileError> {
    let FieldValue::String(format) = value else {
        return Err(mismatch(field, "a format name", value, span));
    };
    let format = format.to_lowercase();
    let accepted: &'static [&'static str] = match field {
        FieldName::Banned => &["banned"],
        FieldName::Restricted => &["restricted"],
        _ => &["legal", "restricted"],
    };
    let test = move |card: &Card| {
        card.legality(&format)
            .is_some_and(|status| accepted.contains(&status))
    };
    match op {
        ComparisonOp::Colon | ComparisonOp::Equals => Ok(Predicate::new(test)),
        ComparisonOp::NotEquals => Ok(Predicate::new(move |card| !test(card))),
        _ => Err(unsupported_op(field, op, span)),
    }
}

fn compile_game(
    field: FieldName,
    op: ComparisonOp,
    value: &FieldValue,
    span: Span,
) -> Result<Predicate, CompileError> {
    let FieldValue::String(name) = value else {
        return Err(mismatch(field, "a name", value, span));
    };
    let name = name.to_lowercase();
    let in_game = |name: String| {
        move |card: &Card| card.games.iter().any(|g| g.eq_ignore_ascii_case(&name))
    };

    // `in:` resolves by priority: game, then set type, then set or language.
    let test: Box<dyn Fn(&Card) -> bool + Send + Sync> =
        if field == FieldName::Game || GAMES.contains(&name.as_str()) {
            Box::new(in_game(name))
        } else if SET_TYPES.contains(&name.as_str()) {
            Box::new(move |card: &Card| card.set_type.eq_ignore_ascii_case(&name))
        } else {
            Box::new(move |card: &Card| {
                card.set.eq_ignore_ascii_case(&name) || card.lang.eq_ignore_ascii_case(&name)
            })
        };

    match op {
        ComparisonOp::Colon | ComparisonOp::Equals => Ok(Predicate::new(test)),
        ComparisonOp::NotEquals => Ok(Predicate::new(move |card| !test(card))),
        _ => Err(unsupported_op(field, op, span)),
    }
}

/// `YYYY-MM-DD`, or a bare year meaning January 1st.
pub fn parse_query_date(text: &str) -> Option<Date> {
    if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
        return Some(date);
    }
    if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
        let year: i32 = text.parse().ok()?;
        return Date::from_ordinal_date(year, 1).ok();
    }
    None
}

fn compile_date(op: ComparisonOp, value: &FieldValue, span: Span) -> Result<Predicate, CompileError> {
    let FieldValue::String(text) = value else {
        return Err(mismatch(FieldName::Date, "a date", value, span));
    };
    let target = parse_query_date(text).ok_or_else(|| {
        CompileError::new(
            format!("Invalid date '{}' (expected YYYY-MM-DD or YYYY)", text),
            span,
        )
    })?;
    Ok(Predicate::new(move |card| {
        compare_ordered(op, card.release_date(), target)
    }))
}

fn compile_is(
    field: FieldName,
    op: ComparisonOp,
    value: &FieldValue,
    span: Span,
) -> Result<Predicate, CompileError> {
    let FieldValue::String(name) = value else {
        return Err(mismatch(field, "a predicate name", value, span));
    };
    let entry = predicates::lookup(name).ok_or_else(|| {
        CompileError::new(format!("Unknown predicate '{}:{}'", field, name), span)
    })?;

    let negated = match op {
        ComparisonOp::Colon | ComparisonOp::Equals => field == FieldName::Not,
        ComparisonOp::NotEquals => field == FieldName::Is,
        _ => return Err(unsupported_op(field, op, span)),
    };

    let predicate = entry.predicate;
    Ok(Predicate::new(move |card| predicate.test(card) != negated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::ColorSet;
    use serde_json::json;

    fn card(value: serde_json::Value) -> Card {
        serde_json::from_value(value).unwrap()
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::String(s.into())
    }

    fn compiled(field: FieldName, op: ComparisonOp, value: FieldValue) -> Predicate {
        compile_field(field, op, &value, Span::default()).unwrap()
    }

    #[test]
    fn test_text_substring_vs_discrete_exact() {
        let c = card(json!({"type_line": "Creature — Elf Druid", "set": "dom"}));
        assert!(compiled(FieldName::Type, ComparisonOp::Colon, text("elf")).matches(&c));
        assert!(!compiled(FieldName::Type, ComparisonOp::Equals, text("elf")).matches(&c));
        assert!(compiled(FieldName::Set, ComparisonOp::Colon, text("DOM")).matches(&c));
        assert!(!compiled(FieldName::Set, ComparisonOp::Colon, text("do")).matches(&c));
        assert!(compiled(FieldName::Set, ComparisonOp::NotEquals, text("m19")).matches(&c));
    }

    #[test]
    fn test_ordered_operators_on_text() {
        let err = compile_field(FieldName::Type, ComparisonOp::Gt, &text("elf"), Span::default())
            .unwrap_err();
        assert!(err.message.contains("not supported"));

        let c = card(json!({"set": "dom"}));
        assert!(!compiled(FieldName::Set, ComparisonOp::Gt, text("aaa")).matches(&c));

        let c = card(json!({"collector_number": "120a"}));
        assert!(compiled(FieldName::Number, ComparisonOp::Gte, text("100")).matches(&c));
    }

    #[test]
    fn test_oracle_checks_each_face() {
        let c = card(json!({
            "card_faces": [
                {"oracle_text": "Transform at night."},
                {"oracle_text": "Trample"}
            ]
        }));
        assert!(compiled(FieldName::Oracle, ComparisonOp::Colon, text("trample")).matches(&c));
    }

    #[test]
    fn test_mana_shorthand() {
        assert_eq!(normalize_mana("2gg"), "{2}{G}{G}");
        assert_eq!(normalize_mana("{R/G}"), "{R/G}");
        let c = card(json!({"mana_cost": "{2}{G}{G}"}));
        assert!(compiled(FieldName::Mana, ComparisonOp::Colon, text("gg")).matches(&c));
        assert!(compiled(FieldName::Mana, ComparisonOp::Equals, text("2gg")).matches(&c));
    }

    #[test]
    fn test_numeric_missing_values() {
        let none = card(json!({}));
        let three = card(json!({"cmc": 3.0}));
        let gte = compiled(FieldName::ManaValue, ComparisonOp::Gte, FieldValue::Number(3.0));
        let ne = compiled(FieldName::ManaValue, ComparisonOp::NotEquals, FieldValue::Number(3.0));
        assert!(gte.matches(&three));
        assert!(!gte.matches(&none));
        assert!(ne.matches(&none));
        assert!(!ne.matches(&three));
        assert!(compile_field(FieldName::ManaValue, ComparisonOp::Gte, &text("x"), Span::default()).is_err());
    }

    #[test]
    fn test_stat_star_handling() {
        let star = card(json!({"power": "*"}));
        let composite = card(json!({"power": "1+*"}));
        let two = card(json!({"power": "2"}));
        let is_star = compiled(FieldName::Power, ComparisonOp::Colon, text("*"));
        assert!(is_star.matches(&star));
        assert!(is_star.matches(&composite));
        assert!(!is_star.matches(&two));

        let le_one = compiled(FieldName::Power, ComparisonOp::Lte, FieldValue::Number(1.0));
        assert!(le_one.matches(&star));
        assert!(!le_one.matches(&two));
    }

    #[test]
    fn test_identity_count() {
        let c = card(json!({"color_identity": ["B", "G"]}));
        assert!(compiled(FieldName::Identity, ComparisonOp::Gt, FieldValue::Number(1.0)).matches(&c));
        assert!(compiled(FieldName::Identity, ComparisonOp::Colon, FieldValue::Number(2.0)).matches(&c));
        assert!(compile_field(FieldName::Color, ComparisonOp::Gt, &FieldValue::Number(1.0), Span::default()).is_err());
    }

    #[test]
    fn test_produces_colorless_is_literal() {
        let c = card(json!({"produced_mana": ["C"]}));
        let colorless = FieldValue::Colors(ColorSet::parse("c").unwrap_or_default());
        assert!(compiled(FieldName::Produces, ComparisonOp::Colon, colorless.clone()).matches(&c));
        // the card itself has no colors, so c:c matches it as colorless
        assert!(compiled(FieldName::Color, ComparisonOp::Colon, colorless).matches(&c));
    }

    #[test]
    fn test_rarity_order() {
        let rare = card(json!({"rarity": "rare"}));
        assert!(compiled(FieldName::Rarity, ComparisonOp::Colon, text("r")).matches(&rare));
        assert!(compiled(FieldName::Rarity, ComparisonOp::Gte, text("u")).matches(&rare));
        assert!(compiled(FieldName::Rarity, ComparisonOp::Lt, text("mythic")).matches(&rare));
        assert!(!compiled(FieldName::Rarity, ComparisonOp::Gt, text("rare")).matches(&rare));
        assert!(compile_field(FieldName::Rarity, ComparisonOp::Colon, &text("epic"), Span::default()).is_err());
    }

    #[test]
    fn test_legality() {
        let c = card(json!({"legalities": {"modern": "legal", "vintage": "restricted", "legacy": "banned"}}));
        assert!(compiled(FieldName::Format, ComparisonOp::Colon, text("modern")).matches(&c));
        assert!(compiled(FieldName::Format, ComparisonOp::Colon, text("vintage")).matches(&c));
        assert!(!compiled(FieldName::Format, ComparisonOp::Colon, text("legacy")).matches(&c));
        assert!(compiled(FieldName::Banned, ComparisonOp::Colon, text("legacy")).matches(&c));
        assert!(compiled(FieldName::Restricted, ComparisonOp::Colon, text("vintage")).matches(&c));
        assert!(compiled(FieldName::Format, ComparisonOp::NotEquals, text("legacy")).matches(&c));
    }

    #[test]
    fn test_in_priority() {
        let c = card(json!({"games": ["arena"], "set_type": "core", "set": "m21", "lang": "ja"}));
        assert!(compiled(FieldName::In, ComparisonOp::Colon, text("arena")).matches(&c));
        assert!(!compiled(FieldName::In, ComparisonOp::Colon, text("paper")).matches(&c));
        assert!(compiled(FieldName::In, ComparisonOp::Colon, text("core")).matches(&c));
        assert!(compiled(FieldName::In, ComparisonOp::Colon, text("m21")).matches(&c));
        assert!(compiled(FieldName::In, ComparisonOp::Colon, text("ja")).matches(&c));
        assert!(compiled(FieldName::Game, ComparisonOp::Colon, text("arena")).matches(&c));
    }

    #[test]
    fn test_dates() {
        let c = card(json!({"released_at": "2019-05-03"}));
        assert!(compiled(FieldName::Date, ComparisonOp::Gte, text("2019-01-01")).matches(&c));
        assert!(compiled(FieldName::Date, ComparisonOp::Lt, text("2020")).matches(&c));
        assert!(compiled(FieldName::Year, ComparisonOp::Colon, FieldValue::Number(2019.0)).matches(&c));
        assert!(compile_field(FieldName::Date, ComparisonOp::Gte, &text("soon"), Span::default()).is_err());
    }

    #[test]
    fn test_unknown_predicate_is_an_error() {
        let err = compile_field(FieldName::Is, ComparisonOp::Colon, &text("wizardly"), Span::new(0, 11))
            .unwrap_err();
        assert_eq!(err.message, "Unknown predicate 'is:wizardly'");
        assert_eq!(err.span, Span::new(0, 11));
    }

    #[test]
    fn test_not_predicate_negates() {
        let reserved = card(json!({"reserved": true}));
        assert!(compiled(FieldName::Is, ComparisonOp::Colon, text("reserved")).matches(&reserved));
        assert!(!compiled(FieldName::Not, ComparisonOp::Colon, text("reserved")).matches(&reserved));
    }
}
