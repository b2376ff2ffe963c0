//! AST types for the card query language.

use regex::{Regex, RegexBuilder};
use std::fmt;

use super::fields::FieldName;
use crate::colors::ColorSet;

/// Byte offsets `[start, end)` into the original query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Self {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Comparison operator between a field and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Colon,     // :
    Equals,    // =
    NotEquals, // !=
    Lt,        // <
    Gt,        // >
    Lte,       // <=
    Gte,       // >=
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Colon => ":",
            ComparisonOp::Equals => "=",
            ComparisonOp::NotEquals => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gte => ">=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A regex literal compiled once, at lex time.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` with JavaScript-style `flags`.
    pub fn new(source: &str, flags: &str) -> Result<Self, String> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'u' => builder.unicode(true),
                // global/sticky/indices only affect stateful JS matching
                'g' | 'y' | 'd' => &mut builder,
                other => return Err(format!("Invalid regular expression flag '{}'", other)),
            };
        }
        let regex = builder
            .build()
            .map_err(|e| format!("Invalid regular expression: {}", e))?;
        Ok(Pattern {
            source: source.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({})", self)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// Value on the right-hand side of a field expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(f64),
    Regex(Pattern),
    Colors(ColorSet),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Regex(_) => "regular expression",
            FieldValue::Colors(_) => "colors",
        }
    }
}

/// Parsed query tree. Spans are diagnostic only.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchNode {
    /// Bare word, quoted phrase, or regex matched against card names.
    Name {
        value: String,
        pattern: Option<Pattern>,
        span: Span,
    },

    /// `!name` or `!"full name"`
    ExactName { value: String, span: Span },

    /// `field op value`
    Field {
        field: FieldName,
        op: ComparisonOp,
        value: FieldValue,
        span: Span,
    },

    /// Juxtaposed terms
    And { children: Vec<SearchNode>, span: Span },

    /// `a OR b`
    Or { children: Vec<SearchNode>, span: Span },

    /// `-term`
    Not { child: Box<SearchNode>, span: Span },
}

impl SearchNode {
    pub fn span(&self) -> Span {
        match self {
            SearchNode::Name { span, .. }
            | SearchNode::ExactName { span, .. }
            | SearchNode::Field { span, .. }
            | SearchNode::And { span, .. }
            | SearchNode::Or { span, .. }
            | SearchNode::Not { span, .. } => *span,
        }
    }

    /// The same node reporting a different span.
    pub fn with_span(self, new_span: Span) -> Self {
        match self {
            SearchNode::Name { value, pattern, .. } => SearchNode::Name {
                value,
                pattern,
                span: new_span,
            },
            SearchNode::ExactName { value, .. } => SearchNode::ExactName {
                value,
                span: new_span,
            },
            SearchNode::Field {
                field, op, value, ..
            } => SearchNode::Field {
                field,
                op,
                value,
                span: new_span,
            },
            SearchNode::And { children, .. } => SearchNode::And {
                children,
                span: new_span,
            },
            SearchNode::Or { children, .. } => SearchNode::Or {
                children,
                span: new_span,
            },
            SearchNode::Not { child, .. } => SearchNode::Not {
                child,
                span: new_span,
            },
        }
    }
}
