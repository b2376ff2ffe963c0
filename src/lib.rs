//! Card search engine: query language, card model, and color algebra.

pub mod card;
pub mod colors;
pub mod query;

pub use card::{Card, CardFace, load_cards, parse_cards};
pub use colors::{Color, ColorSet};
pub use query::{
    CompileError, ParseError, Predicate, SearchError, SearchNode, compile, describe_query, parse,
    search,
};
