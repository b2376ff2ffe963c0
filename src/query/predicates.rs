//! Named boolean tests behind `is:` and `not:`.
//!
//! Names resolve once, at compile time, to an [`IsPredicate`]; matching a
//! card never touches the name again. Land cycles are detected from their
//! exact oracle wording with the card's own name replaced by `~`.

use regex::Regex;
use std::sync::LazyLock;

use crate::card::{Card, type_line_has};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandCycle {
    Fetch,
    Shock,
    Check,
    Fast,
    Pain,
    Filter,
    Bounce,
    Battle,
    Scry,
    Gain,
    Man,
    Canopy,
    Dual,
    Triome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintingFlag {
    Reprint,
    Reserved,
    Promo,
    Digital,
    FullArt,
    Textless,
    Oversized,
    Spotlight,
    Booster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsPredicate {
    Land(LandCycle),
    Vanilla,
    FrenchVanilla,
    Bear,
    Permanent,
    Spell,
    Historic,
    Commander,
    Hybrid,
    Phyrexian,
    Multicolored,
    Layout(&'static [&'static str]),
    Printing(PrintingFlag),
    Finish(&'static str),
    Frame(&'static [&'static str]),
    FrameEffect(&'static str),
    Border(&'static str),
    PromoType(&'static str),
}

/// One row of the predicate table.
#[derive(Debug, Clone, Copy)]
pub struct PredicateEntry {
    pub name: &'static str,
    pub predicate: IsPredicate,
    /// Completes "card is ..." in query descriptions.
    pub description: &'static str,
}

const fn entry(name: &'static str, predicate: IsPredicate, description: &'static str) -> PredicateEntry {
    PredicateEntry {
        name,
        predicate,
        description,
    }
}

use IsPredicate as P;

const PREDICATES: &[PredicateEntry] = &[
    entry("fetchland", P::Land(LandCycle::Fetch), "a fetch land"),
    entry("fetch", P::Land(LandCycle::Fetch), "a fetch land"),
    entry("shockland", P::Land(LandCycle::Shock), "a shock land"),
    entry("shock", P::Land(LandCycle::Shock), "a shock land"),
    entry("checkland", P::Land(LandCycle::Check), "a check land"),
    entry("fastland", P::Land(LandCycle::Fast), "a fast land"),
    entry("painland", P::Land(LandCycle::Pain), "a pain land"),
    entry("filterland", P::Land(LandCycle::Filter), "a filter land"),
    entry("bounceland", P::Land(LandCycle::Bounce), "a bounce land"),
    entry("karoo", P::Land(LandCycle::Bounce), "a bounce land"),
    entry("tangoland", P::Land(LandCycle::Battle), "a battle land"),
    entry("battleland", P::Land(LandCycle::Battle), "a battle land"),
    entry("scryland", P::Land(LandCycle::Scry), "a scry land"),
    entry("gainland", P::Land(LandCycle::Gain), "a gain land"),
    entry("manland", P::Land(LandCycle::Man), "a land that becomes a creature"),
    entry("creatureland", P::Land(LandCycle::Man), "a land that becomes a creature"),
    entry("canopyland", P::Land(LandCycle::Canopy), "a canopy land"),
    entry("canland", P::Land(LandCycle::Canopy), "a canopy land"),
    entry("dual", P::Land(LandCycle::Dual), "an original dual land"),
    entry("triome", P::Land(LandCycle::Triome), "a triome"),
    entry("vanilla", P::Vanilla, "a vanilla creature"),
    entry("frenchvanilla", P::FrenchVanilla, "a creature with only keyword abilities"),
    entry("bear", P::Bear, "a 2/2 creature with mana value 2"),
    entry("permanent", P::Permanent, "a permanent"),
    entry("spell", P::Spell, "a spell"),
    entry("historic", P::Historic, "historic"),
    entry("commander", P::Commander, "able to be your commander"),
    entry("hybrid", P::Hybrid, "a card with hybrid mana"),
    entry("phyrexian", P::Phyrexian, "a card with Phyrexian mana"),
    entry("multicolored", P::Multicolored, "multicolored"),
    entry("split", P::Layout(&["split"]), "a split card"),
    entry("flip", P::Layout(&["flip"]), "a flip card"),
    entry("transform", P::Layout(&["transform"]), "a transforming card"),
    entry("meld", P::Layout(&["meld"]), "a meld card"),
    entry("leveler", P::Layout(&["leveler"]), "a level up card"),
    entry("adventure", P::Layout(&["adventure"]), "an adventure card"),
    entry("mdfc", P::Layout(&["modal_dfc"]), "a modal double-faced card"),
    entry(
        "dfc",
        P::Layout(&["transform", "modal_dfc", "meld", "reversible_card", "double_faced_token"]),
        "a double-faced card",
    ),
    entry("token", P::Layout(&["token", "double_faced_token"]), "a token"),
    entry("reprint", P::Printing(PrintingFlag::Reprint), "a reprint"),
    entry("reserved", P::Printing(PrintingFlag::Reserved), "on the reserved list"),
    entry("promo", P::Printing(PrintingFlag::Promo), "a promo"),
    entry("digital", P::Printing(PrintingFlag::Digital), "a digital printing"),
    entry("full", P::Printing(PrintingFlag::FullArt), "full art"),
    entry("fullart", P::Printing(PrintingFlag::FullArt), "full art"),
    entry("textless", P::Printing(PrintingFlag::Textless), "textless"),
    entry("oversized", P::Printing(PrintingFlag::Oversized), "oversized"),
    entry("spotlight", P::Printing(PrintingFlag::Spotlight), "a story spotlight"),
    entry("booster", P::Printing(PrintingFlag::Booster), "found in boosters"),
    entry("foil", P::Finish("foil"), "available in foil"),
    entry("nonfoil", P::Finish("nonfoil"), "available in nonfoil"),
    entry("etched", P::Finish("etched"), "available etched"),
    entry("old", P::Frame(&["1993", "1997"]), "in an old frame"),
    entry("new", P::Frame(&["2003", "2015"]), "in a modern frame"),
    entry("future", P::Frame(&["future"]), "in the future-sight frame"),
    entry("showcase", P::FrameEffect("showcase"), "a showcase printing"),
    entry("extendedart", P::FrameEffect("extendedart"), "extended art"),
    entry("extended", P::FrameEffect("extendedart"), "extended art"),
    entry("inverted", P::FrameEffect("inverted"), "an inverted-frame printing"),
    entry("colorshifted", P::FrameEffect("colorshifted"), "colorshifted"),
    entry("borderless", P::Border("borderless"), "borderless"),
    entry("prerelease", P::PromoType("prerelease"), "a prerelease promo"),
    entry("buyabox", P::PromoType("buyabox"), "a buy-a-box promo"),
    entry("promopack", P::PromoType("promopack"), "a promo pack printing"),
    entry("datestamped", P::PromoType("datestamped"), "date-stamped"),
    entry("boosterfun", P::PromoType("boosterfun"), "a booster fun printing"),
    entry("galaxyfoil", P::PromoType("galaxyfoil"), "a galaxy foil"),
    entry("serialized", P::PromoType("serialized"), "serialized"),
];

/// Resolve a predicate name, ignoring case.
pub fn lookup(name: &str) -> Option<&'static PredicateEntry> {
    PREDICATES.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}

// Template placeholders, expanded before compiling.
const BASIC: &str = "(?:Plains|Island|Swamp|Mountain|Forest)";
const MANA: &str = r"\{[WUBRG]\}";
const ENTERS: &str = "enters(?: the battlefield)?";

const LAND_CYCLE_TEMPLATES: &[(LandCycle, &str)] = &[
    (
        LandCycle::Fetch,
        r"^\{T\}, Pay 1 life, Sacrifice ~: Search your library for an? BASIC or BASIC card, put it onto the battlefield, then shuffle\.$",
    ),
    (
        LandCycle::Shock,
        r"^\(\{T\}: Add MANA or MANA\.\)\nAs ~ ENTERS, you may pay 2 life\. If you don't, it ENTERS tapped\.$",
    ),
    (
        LandCycle::Check,
        r"^~ ENTERS tapped unless you control an? BASIC or an? BASIC\.\n\{T\}: Add MANA or MANA\.$",
    ),
    (
        LandCycle::Fast,
        r"^~ ENTERS tapped unless you control two or fewer other lands\.\n\{T\}: Add MANA or MANA\.$",
    ),
    (
        LandCycle::Pain,
        r"^\{T\}: Add \{C\}\.\n\{T\}: Add MANA or MANA\. ~ deals 1 damage to you\.$",
    ),
    (
        LandCycle::Filter,
        r"^\{T\}: Add \{C\}\.\n\{[WUBRG]/[WUBRG]\}, \{T\}: Add MANAMANA, MANAMANA, or MANAMANA\.$",
    ),
    (
        LandCycle::Bounce,
        r"^~ ENTERS tapped\.\nWhen ~ ENTERS, return a land you control to its owner's hand\.\n\{T\}: Add MANAMANA\.$",
    ),
    (
        LandCycle::Battle,
        r"^\(\{T\}: Add MANA or MANA\.\)\n~ ENTERS tapped unless you control two or more basic lands\.$",
    ),
    (
        LandCycle::Scry,
        r"^~ ENTERS tapped\.\nWhen ~ ENTERS, scry 1\.\n\{T\}: Add MANA or MANA\.$",
    ),
    (
        LandCycle::Gain,
        r"^~ ENTERS tapped\.\nWhen ~ ENTERS, you gain 1 life\.\n\{T\}: Add MANA or MANA\.$",
    ),
    (
        LandCycle::Man,
        r#"^(?:~ ENTERS tapped\.\n)?\{T\}: Add MANA or MANA\.\n[^\n]+: (?:Until end of turn, )?~ becomes an? \d+/\d+ [^\n]+ creature[^\n]*\."? It's still a land\.(?:\n[^\n]+)*$"#,
    ),
    (
        LandCycle::Canopy,
        r"^\{T\}, Pay 1 life: Add MANA or MANA\.\n\{1\}, \{T\}, Sacrifice ~: Draw a card\.$",
    ),
    (LandCycle::Dual, r"^\(\{T\}: Add MANA or MANA\.\)$"),
    (
        LandCycle::Triome,
        r"^\(\{T\}: Add MANA, MANA, or MANA\.\)\n~ ENTERS tapped\.\nCycling \{3\} \(\{3\}, Discard this card: Draw a card\.\)$",
    ),
];

fn expand_template(template: &str) -> String {
    template
        .replace("BASIC", BASIC)
        .replace("MANA", MANA)
        .replace("ENTERS", ENTERS)
}

static LAND_CYCLES: LazyLock<Vec<(LandCycle, Regex)>> = LazyLock::new(|| {
    LAND_CYCLE_TEMPLATES
        .iter()
        .filter_map(|(cycle, template)| match Regex::new(&expand_template(template)) {
            Ok(regex) => Some((*cycle, regex)),
            Err(err) => {
                tracing::error!(?cycle, %err, "land cycle template does not compile");
                None
            }
        })
        .collect()
});

const BASIC_LAND_TYPES: [&str; 5] = ["plains", "island", "swamp", "mountain", "forest"];

impl IsPredicate {
    pub fn test(self, card: &Card) -> bool {
        match self {
            P::Land(cycle) => is_land_cycle(card, cycle),
            P::Vanilla => card.is_creature() && card.oracle_texts().all(|t| t.trim().is_empty()),
            P::FrenchVanilla => is_french_vanilla(card),
            P::Bear => {
                card.is_creature()
                    && card.cmc == Some(2.0)
                    && card.power() == Some("2")
                    && card.toughness() == Some("2")
            }
            P::Permanent => {
                ["artifact", "creature", "enchantment", "land", "planeswalker", "battle"]
                    .iter()
                    .any(|t| card.has_type(t))
            }
            P::Spell => !card.has_type("land") && !card.front_type_line().is_empty(),
            P::Historic => ["legendary", "artifact", "saga"].iter().any(|t| card.has_type(t)),
            P::Commander => card.can_be_commander(),
            P::Hybrid => mana_symbols(card).any(|s| s.split('/').filter(|p| *p != "P").count() >= 2),
            P::Phyrexian => mana_symbols(card).any(|s| s.split('/').any(|p| p == "P")),
            P::Multicolored => card.colors().len() >= 2,
            P::Layout(layouts) => layouts.contains(&card.layout.as_str()),
            P::Printing(flag) => match flag {
                PrintingFlag::Reprint => card.reprint,
                PrintingFlag::Reserved => card.reserved,
                PrintingFlag::Promo => card.promo,
                PrintingFlag::Digital => card.digital,
                PrintingFlag::FullArt => card.full_art,
                PrintingFlag::Textless => card.textless,
                PrintingFlag::Oversized => card.oversized,
                PrintingFlag::Spotlight => card.story_spotlight,
                PrintingFlag::Booster => card.booster,
            },
            P::Finish(finish) => card.finishes.iter().any(|f| f == finish),
            P::Frame(frames) => frames.contains(&card.frame.as_str()),
            P::FrameEffect(effect) => card.frame_effects.iter().any(|f| f == effect),
            P::Border(border) => card.border_color == border,
            P::PromoType(promo) => card.promo_types.iter().any(|p| p == promo),
        }
    }
}

fn is_land_cycle(card: &Card, cycle: LandCycle) -> bool {
    if !card.has_type("land") || card.name.is_empty() {
        return false;
    }
    let Some(text) = card.oracle_text.as_deref() else {
        return false;
    };
    let Some((_, pattern)) = LAND_CYCLES.iter().find(|(c, _)| *c == cycle) else {
        return false;
    };
    if !pattern.is_match(&text.replace(&card.name, "~")) {
        return false;
    }
    // Typed duals carry their colors on the type line rather than in rules text.
    cycle != LandCycle::Dual
        || BASIC_LAND_TYPES
            .iter()
            .filter(|t| type_line_has(&card.type_line, t))
            .count()
            == 2
}

/// Every `{...}` symbol in the card's mana costs, without braces.
fn mana_symbols(card: &Card) -> impl Iterator<Item = &str> {
    card.mana_cost
        .as_deref()
        .into_iter()
        .chain(card.card_faces.iter().filter_map(|f| f.mana_cost.as_deref()))
        .flat_map(|cost| cost.split(['{', '}']).filter(|s| !s.is_empty()))
}

const FRENCH_VANILLA_EXCLUDED_LAYOUTS: &[&str] = &["adventure", "flip", "modal_dfc"];

/// Keywords that can stand alone on a creature. The card's own keyword list
/// is consulted too, so newer mechanics are covered.
const STANDALONE_KEYWORDS: &[&str] = &[
    "flying",
    "first strike",
    "double strike",
    "deathtouch",
    "defender",
    "flash",
    "haste",
    "hexproof",
    "indestructible",
    "lifelink",
    "menace",
    "reach",
    "trample",
    "vigilance",
    "ward",
    "protection",
    "shroud",
    "fear",
    "intimidate",
    "shadow",
    "horsemanship",
    "flanking",
    "banding",
    "changeling",
    "devoid",
    "prowess",
    "skulk",
    "infect",
    "wither",
    "exalted",
    "persist",
    "undying",
    "landwalk",
    "plainswalker",
    "islandwalk",
    "swampwalk",
    "mountainwalk",
    "forestwalk",
];

/// Keywords that take a cost yet are not activated abilities. An opponent
/// pays it, as in "Ward {2}" or ward with a life payment.
const COSTED_KEYWORDS: &[&str] = &["ward"];

static REMINDER_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^)]*\)").unwrap_or_else(|_| unreachable!("reminder text regex is valid"))
});

// Keyword followed by a bare number, e.g. "Rampage 3" or "Bushido 1".
static NUMERIC_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z' -]+ \d+$").unwrap_or_else(|_| unreachable!("numeric parameter regex is valid"))
});

fn is_french_vanilla(card: &Card) -> bool {
    if FRENCH_VANILLA_EXCLUDED_LAYOUTS.contains(&card.layout.as_str()) {
        return false;
    }
    if card.layout == "transform" {
        return card.card_faces.len() >= 2
            && card
                .card_faces
                .iter()
                .all(|face| keyword_only_creature(&face.type_line, face.oracle_text.as_deref(), card));
    }
    let text = card
        .oracle_text
        .as_deref()
        .or_else(|| card.card_faces.first().and_then(|f| f.oracle_text.as_deref()));
    keyword_only_creature(card.front_type_line(), text, card)
}

fn keyword_only_creature(type_line: &str, text: Option<&str>, card: &Card) -> bool {
    if !type_line_has(type_line, "creature") {
        return false;
    }
    let stripped = REMINDER_TEXT.replace_all(text.unwrap_or_default(), "");
    if stripped.trim().is_empty() {
        return false;
    }
    stripped
        .lines()
        .flat_map(|line| line.split([',', ';']))
        .map(|clause| clause.trim().trim_end_matches('.').trim())
        .filter(|clause| !clause.is_empty())
        .all(|clause| is_keyword_clause(clause, card))
}

fn is_keyword_clause(clause: &str, card: &Card) -> bool {
    if clause.contains(':') {
        return false;
    }
    let lower = clause.to_lowercase();
    if NUMERIC_PARAMETER.is_match(&lower) {
        return false;
    }
    let own = card.keywords.iter().map(|k| k.to_lowercase());
    let known = STANDALONE_KEYWORDS.iter().map(|k| k.to_string());
    own.chain(known).any(|keyword| {
        let Some(rest) = lower.strip_prefix(keyword.as_str()) else {
            return false;
        };
        rest.is_empty()
            || rest.starts_with(" from ")
            || (COSTED_KEYWORDS.contains(&keyword.as_str())
                && (rest.starts_with(" {") || rest.starts_with('\u{2014}')))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(value: serde_json::Value) -> Card {
        serde_json::from_value(value).unwrap()
    }

    fn is(name: &str, card: &Card) -> bool {
        lookup(name).unwrap().predicate.test(card)
    }

    #[test]
    fn every_land_template_compiles() {
        assert_eq!(LAND_CYCLES.len(), LAND_CYCLE_TEMPLATES.len());
    }

    #[test]
    fn battle_and_tango_are_the_same_predicate() {
        assert_eq!(
            lookup("tangoland").unwrap().predicate,
            lookup("battleland").unwrap().predicate
        );
        assert!(lookup("TangoLand").is_some());
        assert!(lookup("wizardly").is_none());
    }

    #[test]
    fn detects_fetch_and_shock_lands() {
        let strand = card(json!({
            "name": "Flooded Strand",
            "type_line": "Land",
            "oracle_text": "{T}, Pay 1 life, Sacrifice Flooded Strand: Search your library for a Plains or Island card, put it onto the battlefield, then shuffle."
        }));
        assert!(is("fetchland", &strand));
        assert!(!is("shockland", &strand));

        let fountain = card(json!({
            "name": "Hallowed Fountain",
            "type_line": "Land — Plains Island",
            "oracle_text": "({T}: Add {W} or {U}.)\nAs Hallowed Fountain enters, you may pay 2 life. If you don't, it enters tapped."
        }));
        assert!(is("shockland", &fountain));
        assert!(!is("dual", &fountain));
    }

    #[test]
    fn detects_duals_by_type_line() {
        let tundra = card(json!({
            "name": "Tundra",
            "type_line": "Land — Plains Island",
            "oracle_text": "({T}: Add {W} or {U}.)"
        }));
        assert!(is("dual", &tundra));
    }

    fn land(name: &str, type_line: &str, oracle_text: &str) -> Card {
        card(json!({"name": name, "type_line": type_line, "oracle_text": oracle_text}))
    }

    #[test]
    fn detects_manlands_with_older_wording() {
        let colonnade = land(
            "Celestial Colonnade",
            "Land",
            "Celestial Colonnade enters the battlefield tapped.\n{T}: Add {W} or {U}.\n{3}{W}{U}: Until end of turn, Celestial Colonnade becomes a 4/4 white and blue Elemental creature with flying and vigilance. It's still a land.",
        );
        assert!(is("manland", &colonnade));
    }

    #[test]
    fn detects_manlands_granting_quoted_abilities() {
        let ravine = land(
            "Raging Ravine",
            "Land",
            "Raging Ravine enters tapped.\n{T}: Add {R} or {G}.\n{2}{R}{G}: Until end of turn, Raging Ravine becomes a 3/3 red and green Elemental creature with \"Whenever this creature attacks, put a +1/+1 counter on it.\" It's still a land.",
        );
        assert!(is("manland", &ravine));

        let reaches = land(
            "Lavaclaw Reaches",
            "Land",
            "Lavaclaw Reaches enters tapped.\n{T}: Add {B} or {R}.\n{1}{B}{R}: Until end of turn, Lavaclaw Reaches becomes a 2/2 black and red Elemental creature with \"{X}: This creature gets +X/+0 until end of turn.\" It's still a land.",
        );
        assert!(is("manland", &reaches));

        let mutavault = land(
            "Mutavault",
            "Land",
            "{T}: Add {C}.\n{1}: Mutavault becomes a 2/2 creature with all creature types until end of turn. It's still a land.",
        );
        assert!(!is("manland", &mutavault));
    }

    #[test]
    fn detects_each_land_cycle_and_rejects_its_lookalike() {
        let cases = [
            (
                "checkland",
                land("Glacial Fortress", "Land", "Glacial Fortress enters tapped unless you control a Plains or an Island.\n{T}: Add {W} or {U}."),
                land("Port Town", "Land", "As Port Town enters, you may reveal a Plains or Island card from your hand. If you don't, Port Town enters tapped.\n{T}: Add {W} or {U}."),
            ),
            (
                "fastland",
                land("Seachrome Coast", "Land", "Seachrome Coast enters tapped unless you control two or fewer other lands.\n{T}: Add {W} or {U}."),
                land("Deserted Beach", "Land", "Deserted Beach enters tapped unless you control two or more other lands.\n{T}: Add {W} or {U}."),
            ),
            (
                "painland",
                land("Adarkar Wastes", "Land", "{T}: Add {C}.\n{T}: Add {W} or {U}. Adarkar Wastes deals 1 damage to you."),
                land("Tarnished Citadel", "Land", "{T}: Add {C}.\n{T}: Add one mana of any color. Tarnished Citadel deals 3 damage to you."),
            ),
            (
                "filterland",
                land("Mystic Gate", "Land", "{T}: Add {C}.\n{W/U}, {T}: Add {W}{W}, {W}{U}, or {U}{U}."),
                land("Skycloud Expanse", "Land", "{1}, {T}: Add {W}{U}."),
            ),
            (
                "bounceland",
                land("Azorius Chancery", "Land", "Azorius Chancery enters tapped.\nWhen Azorius Chancery enters, return a land you control to its owner's hand.\n{T}: Add {W}{U}."),
                land("Coral Atoll", "Land — Island", "Coral Atoll enters tapped.\nWhen Coral Atoll enters, sacrifice it unless you return an untapped Island you control to its owner's hand.\n{T}: Add {C}{U}."),
            ),
            (
                "scryland",
                land("Temple of Enlightenment", "Land", "Temple of Enlightenment enters tapped.\nWhen Temple of Enlightenment enters, scry 1.\n{T}: Add {W} or {U}."),
                land("Azorius Guildgate", "Land — Gate", "Azorius Guildgate enters tapped.\n{T}: Add {W} or {U}."),
            ),
            (
                "gainland",
                land("Tranquil Cove", "Land", "Tranquil Cove enters tapped.\nWhen Tranquil Cove enters, you gain 1 life.\n{T}: Add {W} or {U}."),
                land("Temple of Enlightenment", "Land", "Temple of Enlightenment enters tapped.\nWhen Temple of Enlightenment enters, scry 1.\n{T}: Add {W} or {U}."),
            ),
            (
                "canopyland",
                land("Horizon Canopy", "Land", "{T}, Pay 1 life: Add {G} or {W}.\n{1}, {T}, Sacrifice Horizon Canopy: Draw a card."),
                land("Grove of the Burnwillows", "Land", "{T}: Add {C}.\n{T}: Add {R} or {G}. Each opponent gains 1 life."),
            ),
            (
                "triome",
                land("Raugrin Triome", "Land — Island Mountain Plains", "({T}: Add {U}, {R}, or {W}.)\nRaugrin Triome enters tapped.\nCycling {3} ({3}, Discard this card: Draw a card.)"),
                land("Arcane Sanctum", "Land", "Arcane Sanctum enters tapped.\n{T}: Add {W}, {U}, or {B}."),
            ),
        ];
        for (name, hit, miss) in &cases {
            assert!(is(name, hit), "{} should match {}", name, hit.name);
            assert!(!is(name, miss), "{} should not match {}", name, miss.name);
        }
    }

    #[test]
    fn bear_requires_exact_stats() {
        let bear = card(json!({"type_line": "Creature — Bear", "cmc": 2.0, "power": "2", "toughness": "2"}));
        let big = card(json!({"type_line": "Creature — Bear", "cmc": 2.0, "power": "2", "toughness": "3"}));
        assert!(is("bear", &bear));
        assert!(!is("bear", &big));
    }

    #[test]
    fn vanilla_and_french_vanilla() {
        let plain = card(json!({"type_line": "Creature — Bear"}));
        assert!(is("vanilla", &plain));
        assert!(!is("frenchvanilla", &plain));

        let angel = card(json!({
            "type_line": "Creature — Angel",
            "oracle_text": "Flying, vigilance",
            "keywords": ["Flying", "Vigilance"]
        }));
        assert!(is("frenchvanilla", &angel));
        assert!(!is("vanilla", &angel));

        let knight = card(json!({
            "type_line": "Creature — Human Knight",
            "oracle_text": "First strike, protection from black (This creature can't be blocked by black creatures.)"
        }));
        assert!(is("frenchvanilla", &knight));
    }

    #[test]
    fn french_vanilla_rejections() {
        let rampage = card(json!({
            "type_line": "Creature — Wurm",
            "oracle_text": "Trample\nRampage 3",
            "keywords": ["Trample", "Rampage"]
        }));
        assert!(!is("frenchvanilla", &rampage));

        let elf = card(json!({"type_line": "Creature — Elf", "oracle_text": "{T}: Add {G}."}));
        assert!(!is("frenchvanilla", &elf));

        let adventurer = card(json!({
            "layout": "adventure",
            "type_line": "Creature — Giant",
            "oracle_text": "Reach"
        }));
        assert!(!is("frenchvanilla", &adventurer));
    }

    #[test]
    fn costed_keywords_in_french_vanilla() {
        let warded = card(json!({
            "type_line": "Creature — Spirit",
            "oracle_text": "Flying\nWard {2}",
            "keywords": ["Flying", "Ward"]
        }));
        assert!(is("frenchvanilla", &warded));

        let life_ward = card(json!({
            "type_line": "Creature — Demon",
            "oracle_text": "Flying\nWard\u{2014}Pay 2 life.",
            "keywords": ["Flying", "Ward"]
        }));
        assert!(is("frenchvanilla", &life_ward));

        let ninja = card(json!({
            "type_line": "Creature — Human Ninja",
            "oracle_text": "Ninjutsu {1}{U} ({1}{U}, Return an unblocked attacker you control to hand: Put this card onto the battlefield from your hand tapped and attacking.)",
            "keywords": ["Ninjutsu"]
        }));
        assert!(!is("frenchvanilla", &ninja));

        let cycler = card(json!({
            "type_line": "Creature — Bird",
            "oracle_text": "Flying\nCycling {2}",
            "keywords": ["Flying", "Cycling"]
        }));
        assert!(!is("frenchvanilla", &cycler));
    }

    #[test]
    fn transform_needs_both_faces() {
        let both = card(json!({
            "layout": "transform",
            "card_faces": [
                {"type_line": "Creature — Human", "oracle_text": "Vigilance"},
                {"type_line": "Creature — Werewolf", "oracle_text": "Trample"}
            ]
        }));
        assert!(is("frenchvanilla", &both));

        let one = card(json!({
            "layout": "transform",
            "card_faces": [
                {"type_line": "Creature — Human", "oracle_text": "Vigilance"},
                {"type_line": "Creature — Werewolf", "oracle_text": "Whenever this creature attacks, draw a card."}
            ]
        }));
        assert!(!is("frenchvanilla", &one));
    }

    #[test]
    fn mana_symbol_predicates() {
        let hybrid = card(json!({"mana_cost": "{G/W}{G/W}"}));
        let phyrexian = card(json!({"mana_cost": "{1}{G/P}"}));
        assert!(is("hybrid", &hybrid));
        assert!(!is("phyrexian", &hybrid));
        assert!(is("phyrexian", &phyrexian));
        assert!(!is("hybrid", &phyrexian));
    }

    #[test]
    fn printing_flags() {
        let c = card(json!({
            "reserved": true,
            "finishes": ["nonfoil"],
            "frame": "1993",
            "border_color": "black",
            "promo_types": ["prerelease"]
        }));
        assert!(is("reserved", &c));
        assert!(is("nonfoil", &c));
        assert!(!is("foil", &c));
        assert!(is("old", &c));
        assert!(!is("borderless", &c));
        assert!(is("prerelease", &c));
    }
}
