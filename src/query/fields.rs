//! Field names, their surface aliases, and how each one is matched.

use std::fmt;

/// Canonical field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Name,
    Type,
    Oracle,
    Color,
    Identity,
    ManaValue,
    Power,
    Toughness,
    Loyalty,
    Defense,
    Set,
    SetType,
    Layout,
    Frame,
    Border,
    Number,
    Rarity,
    Artist,
    Format,
    Mana,
    Keyword,
    Banned,
    Restricted,
    Game,
    In,
    Produces,
    Year,
    Date,
    Lang,
    Is,
    Not,
}

/// Matching semantics shared by a group of fields; also decides how the
/// parser reads the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// `:` is a case-insensitive substring test.
    Text,
    /// `:` is exact (case-insensitive) equality.
    Discrete,
    Numeric,
    Stat,
    Color,
    Rarity,
    Legality,
    Game,
    Date,
    Predicate,
}

/// Surface spelling → canonical field.
const ALIASES: &[(&str, FieldName)] = &[
    ("name", FieldName::Name),
    ("n", FieldName::Name),
    ("type", FieldName::Type),
    ("t", FieldName::Type),
    ("oracle", FieldName::Oracle),
    ("o", FieldName::Oracle),
    ("color", FieldName::Color),
    ("c", FieldName::Color),
    ("identity", FieldName::Identity),
    ("id", FieldName::Identity),
    ("manavalue", FieldName::ManaValue),
    ("mv", FieldName::ManaValue),
    ("cmc", FieldName::ManaValue),
    ("power", FieldName::Power),
    ("pow", FieldName::Power),
    ("toughness", FieldName::Toughness),
    ("tou", FieldName::Toughness),
    ("loyalty", FieldName::Loyalty),
    ("loy", FieldName::Loyalty),
    ("defense", FieldName::Defense),
    ("def", FieldName::Defense),
    ("set", FieldName::Set),
    ("s", FieldName::Set),
    ("e", FieldName::Set),
    ("edition", FieldName::Set),
    ("settype", FieldName::SetType),
    ("st", FieldName::SetType),
    ("layout", FieldName::Layout),
    ("frame", FieldName::Frame),
    ("border", FieldName::Border),
    ("number", FieldName::Number),
    ("cn", FieldName::Number),
    ("rarity", FieldName::Rarity),
    ("r", FieldName::Rarity),
    ("artist", FieldName::Artist),
    ("a", FieldName::Artist),
    ("format", FieldName::Format),
    ("f", FieldName::Format),
    ("mana", FieldName::Mana),
    ("m", FieldName::Mana),
    ("keyword", FieldName::Keyword),
    ("kw", FieldName::Keyword),
    ("banned", FieldName::Banned),
    ("restricted", FieldName::Restricted),
    ("game", FieldName::Game),
    ("in", FieldName::In),
    ("produces", FieldName::Produces),
    ("year", FieldName::Year),
    ("date", FieldName::Date),
    ("lang", FieldName::Lang),
    ("language", FieldName::Lang),
    ("is", FieldName::Is),
    ("not", FieldName::Not),
];

impl FieldName {
    /// Resolve a surface alias, ignoring case.
    pub fn from_alias(alias: &str) -> Option<Self> {
        let lower = alias.to_ascii_lowercase();
        ALIASES
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, field)| *field)
    }

    pub fn canonical(self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Type => "type",
            FieldName::Oracle => "oracle",
            FieldName::Color => "color",
            FieldName::Identity => "identity",
            FieldName::ManaValue => "manavalue",
            FieldName::Power => "power",
            FieldName::Toughness => "toughness",
            FieldName::Loyalty => "loyalty",
            FieldName::Defense => "defense",
            FieldName::Set => "set",
            FieldName::SetType => "settype",
            FieldName::Layout => "layout",
            FieldName::Frame => "frame",
            FieldName::Border => "border",
            FieldName::Number => "number",
            FieldName::Rarity => "rarity",
            FieldName::Artist => "artist",
            FieldName::Format => "format",
            FieldName::Mana => "mana",
            FieldName::Keyword => "keyword",
            FieldName::Banned => "banned",
            FieldName::Restricted => "restricted",
            FieldName::Game => "game",
            FieldName::In => "in",
            FieldName::Produces => "produces",
            FieldName::Year => "year",
            FieldName::Date => "date",
            FieldName::Lang => "lang",
            FieldName::Is => "is",
            FieldName::Not => "not",
        }
    }

    pub fn class(self) -> FieldClass {
        match self {
            FieldName::Name
            | FieldName::Type
            | FieldName::Oracle
            | FieldName::Mana
            | FieldName::Artist
            | FieldName::Number
            | FieldName::Keyword => FieldClass::Text,
            FieldName::Set
            | FieldName::SetType
            | FieldName::Layout
            | FieldName::Frame
            | FieldName::Border
            | FieldName::Lang => FieldClass::Discrete,
            FieldName::ManaValue | FieldName::Year => FieldClass::Numeric,
            FieldName::Power | FieldName::Toughness | FieldName::Loyalty | FieldName::Defense => {
                FieldClass::Stat
            }
            FieldName::Color | FieldName::Identity | FieldName::Produces => FieldClass::Color,
            FieldName::Rarity => FieldClass::Rarity,
            FieldName::Format | FieldName::Banned | FieldName::Restricted => FieldClass::Legality,
            FieldName::Game | FieldName::In => FieldClass::Game,
            FieldName::Date => FieldClass::Date,
            FieldName::Is | FieldName::Not => FieldClass::Predicate,
        }
    }

    /// Human label used when describing a query.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::Oracle => "oracle text",
            FieldName::Identity => "color identity",
            FieldName::ManaValue => "mana value",
            FieldName::SetType => "set type",
            FieldName::Number => "collector number",
            FieldName::Mana => "mana cost",
            FieldName::Produces => "produced mana",
            FieldName::Lang => "language",
            FieldName::Date => "release date",
            other => other.canonical(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}
