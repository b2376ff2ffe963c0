//! Compile a parsed query into a single card predicate.

use super::ast::SearchNode;
use super::compile::{Predicate, compile_field};
use super::error::{CompileError, SearchError};
use super::parser::parse;
use crate::card::Card;

/// Compile a query tree. Fails on the first clause that does not compile.
pub fn compile(node: &SearchNode) -> Result<Predicate, CompileError> {
    let predicate = match node {
        SearchNode::Name {
            pattern: Some(pattern),
            ..
        } => {
            let pattern = pattern.clone();
            Predicate::new(move |card| card.names().any(|name| pattern.is_match(name)))
        }
        SearchNode::Name { value, .. } => {
            let needle = value.to_lowercase();
            Predicate::new(move |card| {
                card.names()
                    .any(|name| name.to_lowercase().contains(&needle))
            })
        }
        SearchNode::ExactName { value, .. } => {
            let wanted = value.to_lowercase();
            Predicate::new(move |card| card.names().any(|name| name.to_lowercase() == wanted))
        }
        SearchNode::Field {
            field,
            op,
            value,
            span,
        } => compile_field(*field, *op, value, *span)?,
        SearchNode::And { children, .. } => Predicate::all(compile_children(children)?),
        SearchNode::Or { children, .. } => Predicate::any(compile_children(children)?),
        SearchNode::Not { child, .. } => compile(child)?.negate(),
    };
    Ok(predicate)
}

fn compile_children(children: &[SearchNode]) -> Result<Vec<Predicate>, CompileError> {
    children.iter().map(compile).collect()
}

/// A parsed and compiled query.
#[derive(Debug)]
pub struct SearchResult {
    pub ast: SearchNode,
    predicate: Predicate,
}

impl SearchResult {
    pub fn matches(&self, card: &Card) -> bool {
        self.predicate.matches(card)
    }
}

/// Parse and compile in one step. Compile errors carry the original input.
pub fn search(query: &str) -> Result<SearchResult, SearchError> {
    let ast = parse(query)?;
    let predicate = compile(&ast).map_err(|err| err.with_input(query))?;
    tracing::debug!(query, "compiled query");
    Ok(SearchResult { ast, predicate })
}
