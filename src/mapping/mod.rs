//! Mapping rules for derived columns.
//!
//! Mappings provide first-match-wins rule evaluation to classify
//! cards into categories, each rule being a search query.

mod rules;

pub use rules::{Mapping, MappingConfig, evaluate_mapping};
