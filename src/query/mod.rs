//! Scryfall-style card search queries.
//!
//! Syntax:
//!   word, "quoted phrase"     - name contains
//!   /regex/flags              - name matches (`i` is always implied)
//!   !name, !"full name"       - exact name
//!   field:value               - field includes / has value
//!   field=value, field!=value - exact (in)equality
//!   field<n, field>=n, ...    - ordered comparison
//!   a b                       - AND
//!   a OR b                    - OR (lower precedence than AND)
//!   -term                     - NOT
//!   (expr)                    - grouping
//!   is:name, not:name         - named predicate (fetchland, bear, ...)

mod ast;
mod compile;
mod describe;
mod error;
mod fields;
mod lexer;
mod matcher;
mod parser;
mod predicates;

pub use ast::{ComparisonOp, FieldValue, Pattern, SearchNode, Span};
pub use compile::{Predicate, compile_field};
pub use describe::describe_query;
pub use error::{CompileError, LexError, ParseError, SearchError};
pub use fields::{FieldClass, FieldName};
pub use lexer::{DEFAULT_REGEX_FLAGS, Token, TokenKind, tokenize};
pub use matcher::{SearchResult, compile, search};
pub use parser::parse;
pub use predicates::{IsPredicate, PredicateEntry, lookup as lookup_predicate};
