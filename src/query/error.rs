//! Error types for each stage of the query pipeline.

use thiserror::Error;

use super::ast::Span;

/// Raised by the lexer: unterminated quote or regex, or a bad pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    pub message: String,
    pub span: Span,
    pub input: String,
}

impl LexError {
    pub fn new(message: impl Into<String>, span: Span, input: &str) -> Self {
        LexError {
            message: message.into(),
            span,
            input: input.to_string(),
        }
    }

    pub fn underline(&self) -> String {
        underline(&self.input, self.span)
    }
}

/// Raised by `parse`, including lexer failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub input: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span, input: &str) -> Self {
        ParseError {
            message: message.into(),
            span,
            input: input.to_string(),
        }
    }

    pub fn from_lex(err: LexError) -> Self {
        ParseError {
            message: err.message,
            span: err.span,
            input: err.input,
        }
    }

    pub fn underline(&self) -> String {
        underline(&self.input, self.span)
    }
}

/// Raised by `compile`. The original input is attached by `search`, since
/// compilation only sees the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub input: Option<String>,
}

impl CompileError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        CompileError {
            message: message.into(),
            span,
            input: None,
        }
    }

    pub fn with_input(mut self, input: &str) -> Self {
        self.input = Some(input.to_string());
        self
    }

    pub fn underline(&self) -> Option<String> {
        self.input.as_deref().map(|input| underline(input, self.span))
    }
}

/// Any error `search` can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Compile(#[from] CompileError),
}

impl SearchError {
    pub fn message(&self) -> &str {
        match self {
            SearchError::Parse(e) => &e.message,
            SearchError::Compile(e) => &e.message,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SearchError::Parse(e) => e.span,
            SearchError::Compile(e) => e.span,
        }
    }

    /// The query with the offending span marked by carets.
    pub fn underline(&self) -> Option<String> {
        match self {
            SearchError::Parse(e) => Some(e.underline()),
            SearchError::Compile(e) => e.underline(),
        }
    }
}

fn underline(input: &str, span: Span) -> String {
    let column = |offset: usize| {
        input
            .get(..offset.min(input.len()))
            .map_or(offset, |prefix| prefix.chars().count())
    };
    let start = column(span.start);
    let width = column(span.end).saturating_sub(start).max(1);
    format!("{}\n{}{}", input, " ".repeat(start), "^".repeat(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underlines_the_span() {
        let err = ParseError::new("Unexpected ')'", Span::new(5, 6), "t:elf)");
        assert_eq!(err.underline(), "t:elf)\n     ^");
    }

    #[test]
    fn empty_span_still_gets_a_caret() {
        let err = ParseError::new("Empty query", Span::new(0, 0), "");
        assert_eq!(err.underline(), "\n^");
    }

    #[test]
    fn lex_errors_keep_the_input() {
        let err = LexError::new("Unterminated quoted string", Span::new(2, 7), "o:\"draw");
        assert_eq!(err.underline(), "o:\"draw\n  ^^^^^");
        let err = ParseError::from_lex(err);
        assert_eq!(err.input, "o:\"draw");
        assert_eq!(err.span, Span::new(2, 7));
    }

    #[test]
    fn compile_errors_underline_once_input_is_known() {
        let err = CompileError::new("Unknown predicate", Span::new(0, 6));
        assert!(err.underline().is_none());
        let err = err.with_input("is:xyz");
        assert_eq!(err.underline().as_deref(), Some("is:xyz\n^^^^^^"));
    }
}
