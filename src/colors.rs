//! Color sets and the comparison algebra used by `c:`, `id:` and `produces:`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::query::ComparisonOp;

/// One of the five colors plus colorless mana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Color {
    W,
    U,
    B,
    R,
    G,
    C,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::W,
        Color::U,
        Color::B,
        Color::R,
        Color::G,
        Color::C,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn letter(self) -> char {
        match self {
            Color::W => 'W',
            Color::U => 'U',
            Color::B => 'B',
            Color::R => 'R',
            Color::G => 'G',
            Color::C => 'C',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Color::W),
            'u' => Some(Color::U),
            'b' => Some(Color::B),
            'r' => Some(Color::R),
            'g' => Some(Color::G),
            'c' => Some(Color::C),
            _ => None,
        }
    }
}

/// A set of [`Color`]s, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(from = "Vec<Color>", into = "Vec<Color>")]
pub struct ColorSet(u8);

impl ColorSet {
    pub const EMPTY: ColorSet = ColorSet(0);

    pub fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn with(self, color: Color) -> Self {
        ColorSet(self.0 | color.bit())
    }

    pub fn without(self, color: Color) -> Self {
        ColorSet(self.0 & !color.bit())
    }

    pub fn union(self, other: ColorSet) -> Self {
        ColorSet(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Parse a color word: letters (`wubrg`, `bg`), full color names,
    /// `colorless`, or a guild/shard/wedge nickname.
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if let Some((_, letters)) = COLOR_NAMES.iter().find(|(name, _)| *name == lower) {
            return Self::from_letters(letters);
        }
        Self::from_letters(&lower)
    }

    fn from_letters(letters: &str) -> Option<Self> {
        letters
            .chars()
            .try_fold(ColorSet::EMPTY, |set, c| Color::from_letter(c).map(|color| set.with(color)))
    }
}

impl From<Vec<Color>> for ColorSet {
    fn from(colors: Vec<Color>) -> Self {
        colors.into_iter().collect()
    }
}

impl From<ColorSet> for Vec<Color> {
    fn from(set: ColorSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        iter.into_iter().fold(ColorSet::EMPTY, ColorSet::with)
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in self.iter() {
            write!(f, "{}", color.letter())?;
        }
        Ok(())
    }
}

const COLOR_NAMES: &[(&str, &str)] = &[
    ("white", "w"),
    ("blue", "u"),
    ("black", "b"),
    ("red", "r"),
    ("green", "g"),
    ("colorless", "c"),
    ("azorius", "wu"),
    ("dimir", "ub"),
    ("rakdos", "br"),
    ("gruul", "rg"),
    ("selesnya", "gw"),
    ("orzhov", "wb"),
    ("izzet", "ur"),
    ("golgari", "bg"),
    ("boros", "rw"),
    ("simic", "gu"),
    ("bant", "gwu"),
    ("esper", "wub"),
    ("grixis", "ubr"),
    ("jund", "brg"),
    ("naya", "rgw"),
    ("abzan", "wbg"),
    ("jeskai", "urw"),
    ("sultai", "bgu"),
    ("mardu", "rwb"),
    ("temur", "gur"),
];

pub fn is_subset(a: ColorSet, b: ColorSet) -> bool {
    a.0 & !b.0 == 0
}

pub fn is_superset(a: ColorSet, b: ColorSet) -> bool {
    is_subset(b, a)
}

pub fn sets_equal(a: ColorSet, b: ColorSet) -> bool {
    a == b
}

pub fn is_strict_subset(a: ColorSet, b: ColorSet) -> bool {
    is_subset(a, b) && a != b
}

pub fn is_strict_superset(a: ColorSet, b: ColorSet) -> bool {
    is_superset(a, b) && a != b
}

/// Compare a card's colors against searched colors under `op`.
///
/// With `literal_colorless` false, `C` is never a member of the card's set:
/// searching for exactly `{C}` asks whether the card's set is empty, and `C`
/// is dropped from any larger search set.
pub fn compare_colors(
    card: ColorSet,
    search: ColorSet,
    op: ComparisonOp,
    literal_colorless: bool,
) -> bool {
    let (card, search) = if literal_colorless {
        (card, search)
    } else {
        if search == ColorSet::EMPTY.with(Color::C) {
            let colorless = card.without(Color::C).is_empty();
            return match op {
                ComparisonOp::NotEquals => !colorless,
                _ => colorless,
            };
        }
        (card.without(Color::C), search.without(Color::C))
    };

    match op {
        ComparisonOp::Colon | ComparisonOp::Gte => is_superset(card, search),
        ComparisonOp::Equals => sets_equal(card, search),
        ComparisonOp::NotEquals => !sets_equal(card, search),
        ComparisonOp::Lte => is_subset(card, search),
        ComparisonOp::Lt => is_strict_subset(card, search),
        ComparisonOp::Gt => is_strict_superset(card, search),
    }
}
