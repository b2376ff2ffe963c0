//! Read-only card records as supplied by Scryfall-style JSON.

use anyhow::{Context, Result};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use time::Date;
use time::macros::format_description;

use crate::colors::ColorSet;

/// One printing of a card. Fields the engine does not read are ignored on load.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Card {
    pub name: String,
    pub lang: String,
    pub layout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmc: Option<f64>,
    pub type_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorSet>,
    pub color_identity: ColorSet,
    pub produced_mana: ColorSet,
    pub keywords: Vec<String>,
    pub legalities: BTreeMap<String, String>,
    pub games: Vec<String>,
    pub finishes: Vec<String>,
    pub reserved: bool,
    pub oversized: bool,
    pub promo: bool,
    pub reprint: bool,
    pub digital: bool,
    pub full_art: bool,
    pub textless: bool,
    pub booster: bool,
    pub story_spotlight: bool,
    pub promo_types: Vec<String>,
    pub set: String,
    pub set_type: String,
    pub collector_number: String,
    pub rarity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub border_color: String,
    pub frame: String,
    pub frame_effects: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub card_faces: Vec<CardFace>,
}

/// One face of a split, flip, transform, or modal double-faced card.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CardFace {
    pub name: String,
    pub type_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorSet>,
}

/// Keyword abilities that let a non-legendary-creature card lead a deck,
/// or let two cards share the command zone.
const MULTI_COMMANDER_KEYWORDS: &[&str] = &[
    "partner",
    "partner with",
    "friends forever",
    "choose a background",
    "doctor's companion",
];

impl Card {
    /// Card name followed by every face name.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.card_faces.iter().map(|f| f.name.as_str()))
    }

    /// Card-level oracle text (if any) followed by each face's text.
    pub fn oracle_texts(&self) -> impl Iterator<Item = &str> {
        self.oracle_text
            .as_deref()
            .into_iter()
            .chain(self.card_faces.iter().filter_map(|f| f.oracle_text.as_deref()))
    }

    /// Type line of the front face (the whole type line for single-faced cards).
    pub fn front_type_line(&self) -> &str {
        self.card_faces
            .first()
            .map(|f| f.type_line.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.type_line)
    }

    pub fn has_type(&self, word: &str) -> bool {
        type_line_has(self.front_type_line(), word)
    }

    pub fn is_creature(&self) -> bool {
        self.has_type("creature")
    }

    /// Colors of the card, falling back to the union of face colors.
    pub fn colors(&self) -> ColorSet {
        match self.colors {
            Some(colors) => colors,
            None => self
                .card_faces
                .iter()
                .filter_map(|f| f.colors)
                .fold(ColorSet::EMPTY, ColorSet::union),
        }
    }

    pub fn power(&self) -> Option<&str> {
        self.power
            .as_deref()
            .or_else(|| self.card_faces.first().and_then(|f| f.power.as_deref()))
    }

    pub fn toughness(&self) -> Option<&str> {
        self.toughness
            .as_deref()
            .or_else(|| self.card_faces.first().and_then(|f| f.toughness.as_deref()))
    }

    pub fn loyalty(&self) -> Option<&str> {
        self.loyalty
            .as_deref()
            .or_else(|| self.card_faces.first().and_then(|f| f.loyalty.as_deref()))
    }

    pub fn defense(&self) -> Option<&str> {
        self.defense
            .as_deref()
            .or_else(|| self.card_faces.first().and_then(|f| f.defense.as_deref()))
    }

    pub fn release_date(&self) -> Option<Date> {
        let released = self.released_at.as_deref()?;
        Date::parse(released, format_description!("[year]-[month]-[day]")).ok()
    }

    pub fn legality(&self, format: &str) -> Option<&str> {
        self.legalities.get(format).map(String::as_str)
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }

    /// Whether this card may be chosen as a commander.
    pub fn can_be_commander(&self) -> bool {
        let type_line = self.front_type_line();
        let legendary = type_line_has(type_line, "legendary");
        if legendary
            && ["creature", "vehicle", "spacecraft"]
                .iter()
                .any(|t| type_line_has(type_line, t))
        {
            return true;
        }
        if self
            .oracle_texts()
            .any(|text| text.to_lowercase().contains("can be your commander"))
        {
            return true;
        }
        MULTI_COMMANDER_KEYWORDS.iter().any(|k| self.has_keyword(k))
    }
}

/// Whole-word, case-insensitive test against a type line.
pub fn type_line_has(type_line: &str, word: &str) -> bool {
    type_line
        .split(|c: char| c.is_whitespace() || c == '/')
        .any(|part| part.eq_ignore_ascii_case(word))
}

/// Load cards from a JSON array or JSON-lines file.
pub fn load_cards(path: &Path) -> Result<Vec<Card>> {
    let file = File::open(path).with_context(|| format!("Cards: Failed to open {:?}", path))?;
    let len = file
        .metadata()
        .with_context(|| format!("Cards: Failed to stat {:?}", path))?
        .len();
    if len == 0 {
        return Ok(Vec::new());
    }

    // The file is only read, and is expected not to change while mapped.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Cards: Failed to map {:?}", path))?;
    parse_cards(&mmap).with_context(|| format!("Cards: Failed to parse {:?}", path))
}

pub fn parse_cards(bytes: &[u8]) -> Result<Vec<Card>> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    match first {
        None => Ok(Vec::new()),
        Some(b'[') => Ok(serde_json::from_slice(bytes)?),
        Some(_) => bytes
            .split(|b| *b == b'\n')
            .enumerate()
            .filter(|(_, line)| line.iter().any(|b| !b.is_ascii_whitespace()))
            .map(|(i, line)| {
                serde_json::from_slice::<Card>(line).with_context(|| format!("line {}", i + 1))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Color;
    use serde_json::json;

    fn card(value: serde_json::Value) -> Card {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn deserializes_partial_records() {
        let c = card(json!({"name": "Llanowar Elves", "color_identity": ["G"], "cmc": 1.0}));
        assert_eq!(c.name, "Llanowar Elves");
        assert!(c.color_identity.contains(Color::G));
        assert_eq!(c.cmc, Some(1.0));
        assert!(c.card_faces.is_empty());
    }

    #[test]
    fn faces_contribute_names_text_and_colors() {
        let c = card(json!({
            "name": "Delver of Secrets // Insectile Aberration",
            "layout": "transform",
            "type_line": "Creature — Human Wizard // Creature — Human Insect",
            "card_faces": [
                {"name": "Delver of Secrets", "type_line": "Creature — Human Wizard",
                 "oracle_text": "At the beginning of your upkeep, look at the top card of your library.",
                 "colors": ["U"], "power": "1", "toughness": "1"},
                {"name": "Insectile Aberration", "type_line": "Creature — Human Insect",
                 "oracle_text": "Flying", "colors": ["U"], "power": "3", "toughness": "2"}
            ]
        }));
        assert_eq!(c.names().count(), 3);
        assert_eq!(c.oracle_texts().count(), 2);
        assert_eq!(c.colors(), ColorSet::parse("u").unwrap());
        assert_eq!(c.power(), Some("1"));
        assert!(c.is_creature());
    }

    #[test]
    fn commander_eligibility() {
        let legend = card(json!({"type_line": "Legendary Creature — Elf Druid"}));
        let vehicle = card(json!({"type_line": "Legendary Artifact — Vehicle"}));
        let planeswalker = card(json!({
            "type_line": "Legendary Planeswalker — Teferi",
            "oracle_text": "Teferi, Temporal Archmage can be your commander."
        }));
        let partner = card(json!({"type_line": "Creature — Human", "keywords": ["Partner"]}));
        let grunt = card(json!({"type_line": "Creature — Goblin"}));
        assert!(legend.can_be_commander());
        assert!(vehicle.can_be_commander());
        assert!(planeswalker.can_be_commander());
        assert!(partner.can_be_commander());
        assert!(!grunt.can_be_commander());
    }

    #[test]
    fn release_date_parses_iso_dates() {
        let c = card(json!({"released_at": "2019-05-03"}));
        assert_eq!(c.release_date().map(|d| d.year()), Some(2019));
        assert!(card(json!({"released_at": "soon"})).release_date().is_none());
    }

    #[test]
    fn parses_arrays_and_json_lines() {
        let array = br#"[{"name": "A"}, {"name": "B"}]"#;
        assert_eq!(parse_cards(array).unwrap().len(), 2);

        let lines = b"{\"name\": \"A\"}\n\n{\"name\": \"B\"}\n";
        assert_eq!(parse_cards(lines).unwrap().len(), 2);

        let broken = b"{\"name\": \"A\"}\n{oops\n";
        let err = parse_cards(broken).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }
}
