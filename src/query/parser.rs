//! Parser for the card query language.
//!
//! Grammar (in rough EBNF):
//!
//! query      = or_expr
//! or_expr    = and_expr ("OR" and_expr)*
//! and_expr   = unary_expr+
//! unary_expr = "-" unary_expr | primary
//! primary    = "(" or_expr ")" | field_expr | name_expr
//! field_expr = WORD compare_op field_value
//! compare_op = ":" | "=" | "!=" | "<" | ">" | "<=" | ">="
//! name_expr  = EXACT_NAME | WORD | QUOTED | REGEX

use super::ast::{FieldValue, SearchNode, Span};
use super::error::ParseError;
use super::fields::{FieldClass, FieldName};
use super::lexer::{Token, TokenKind, tokenize};
use crate::colors::ColorSet;

/// Parser state.
struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    input: &'a str,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, input: &'a str) -> Self {
        Parser {
            tokens,
            pos: 0,
            input,
        }
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Token `offset` places ahead; the trailing `Eof` repeats forever.
    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>, span: Span) -> ParseError {
        ParseError::new(message, span, self.input)
    }

    /// Parse OR expression: and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<SearchNode, ParseError> {
        let mut children = vec![self.parse_and_expr()?];

        while self.peek().kind == TokenKind::Or {
            let or = self.advance();
            if matches!(
                self.peek().kind,
                TokenKind::Eof | TokenKind::RParen | TokenKind::Or
            ) {
                return Err(self.error("Expected expression after OR", or.span));
            }
            children.push(self.parse_and_expr()?);
        }

        Ok(combine(children, |children, span| SearchNode::Or { children, span }))
    }

    /// Parse AND expression: unary_expr+
    fn parse_and_expr(&mut self) -> Result<SearchNode, ParseError> {
        let mut children = vec![self.parse_unary_expr()?];

        while !matches!(
            self.peek().kind,
            TokenKind::Or | TokenKind::RParen | TokenKind::Eof
        ) {
            children.push(self.parse_unary_expr()?);
        }

        Ok(combine(children, |children, span| SearchNode::And { children, span }))
    }

    /// Parse unary expression: "-" unary_expr | primary
    fn parse_unary_expr(&mut self) -> Result<SearchNode, ParseError> {
        if self.peek().kind != TokenKind::Not {
            return self.parse_primary();
        }

        let not = self.advance();
        if self.peek().kind == TokenKind::Eof {
            return Err(self.error("Expected expression after '-'", not.span));
        }
        let child = self.parse_unary_expr()?;
        let span = not.span.to(child.span());
        Ok(SearchNode::Not {
            child: Box::new(child),
            span,
        })
    }

    /// Parse primary expression: "(" or_expr ")" | field_expr | name_expr
    fn parse_primary(&mut self) -> Result<SearchNode, ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::LParen => {
                self.advance(); // consume (
                if self.peek().kind == TokenKind::RParen {
                    let close = self.peek().span;
                    return Err(self.error("Expected expression inside parentheses", tok.span.to(close)));
                }
                let inner = self.parse_or_expr()?;
                if self.peek().kind != TokenKind::RParen {
                    return Err(self.error("Missing closing parenthesis", tok.span));
                }
                let close = self.advance();
                Ok(inner.with_span(tok.span.to(close.span)))
            }
            TokenKind::Word => {
                if let Some(node) = self.try_field_expr()? {
                    return Ok(node);
                }
                let next = self.peek_at(1);
                if next.kind.comparison().is_some() && next.span.start == tok.span.end {
                    return Err(self.error(format!("Unknown field '{}'", tok.text), tok.span));
                }
                self.parse_name_expr()
            }
            TokenKind::Quoted | TokenKind::Regex | TokenKind::ExactName => self.parse_name_expr(),
            TokenKind::RParen => Err(self.error("Unmatched ')'", tok.span)),
            TokenKind::Eof => Err(self.error("Expected expression", tok.span)),
            TokenKind::Or => Err(self.error("Expected expression before OR", tok.span)),
            _ => Err(self.error(format!("Unexpected '{}'", tok.text), tok.span)),
        }
    }

    /// Parse field expression: WORD compare_op field_value
    ///
    /// Only commits once the word names a field and an operator follows;
    /// otherwise returns `None` having consumed nothing.
    fn try_field_expr(&mut self) -> Result<Option<SearchNode>, ParseError> {
        let word = self.peek();
        let Some(field) = FieldName::from_alias(&word.text) else {
            return Ok(None);
        };
        let Some(op) = self.peek_at(1).kind.comparison() else {
            return Ok(None);
        };

        let word_span = word.span;
        self.advance(); // consume field
        let op_token = self.advance();
        let (value, value_span) = self.parse_field_value(field, &op_token)?;

        Ok(Some(SearchNode::Field {
            field,
            op,
            value,
            span: word_span.to(value_span),
        }))
    }

    /// Parse the value after a field operator, shaped by the field's class.
    fn parse_field_value(
        &mut self,
        field: FieldName,
        op_token: &Token,
    ) -> Result<(FieldValue, Span), ParseError> {
        let tok = self.peek().clone();
        let class = field.class();

        if tok.kind == TokenKind::Regex {
            self.advance();
            let pattern = tok
                .pattern
                .ok_or_else(|| self.error("Regular expression was not compiled", tok.span))?;
            return Ok((FieldValue::Regex(pattern), tok.span));
        }

        // Negative numbers lex as "-" then a word; fuse them only when the
        // operator, the sign and the digits all touch.
        if matches!(class, FieldClass::Numeric | FieldClass::Stat)
            && tok.kind == TokenKind::Not
            && tok.span.start == op_token.span.end
        {
            let next = self.peek_at(1).clone();
            if next.kind == TokenKind::Word && next.span.start == tok.span.end {
                if let Some(n) = parse_number(&next.text) {
                    self.advance();
                    self.advance();
                    return Ok((FieldValue::Number(-n), tok.span.to(next.span)));
                }
            }
        }

        if !matches!(tok.kind, TokenKind::Word | TokenKind::Quoted) {
            let span = if tok.kind == TokenKind::Eof {
                op_token.span
            } else {
                tok.span
            };
            return Err(self.error(
                format!("Expected value after '{}{}'", field, op_token.text),
                span,
            ));
        }

        self.advance();
        let text = tok.text;
        let value = match class {
            FieldClass::Numeric | FieldClass::Stat => match parse_number(&text) {
                Some(n) => FieldValue::Number(n),
                None => FieldValue::String(text),
            },
            FieldClass::Color => {
                if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
                    match parse_number(&text) {
                        Some(n) => FieldValue::Number(n),
                        None => FieldValue::String(text),
                    }
                } else {
                    match ColorSet::parse(&text) {
                        Some(colors) => FieldValue::Colors(colors),
                        None => FieldValue::String(text),
                    }
                }
            }
            _ => FieldValue::String(text),
        };
        Ok((value, tok.span))
    }

    /// Parse name expression: EXACT_NAME | WORD | QUOTED | REGEX
    fn parse_name_expr(&mut self) -> Result<SearchNode, ParseError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::ExactName => {
                if tok.text.trim().is_empty() {
                    return Err(self.error("Expected card name after '!'", tok.span));
                }
                Ok(SearchNode::ExactName {
                    value: tok.text,
                    span: tok.span,
                })
            }
            TokenKind::Word | TokenKind::Quoted | TokenKind::Regex => Ok(SearchNode::Name {
                value: tok.text,
                pattern: tok.pattern,
                span: tok.span,
            }),
            _ => Err(self.error(format!("Unexpected '{}'", tok.text), tok.span)),
        }
    }
}

/// A single child stands alone; several are wrapped, spanning first to last.
fn combine(
    mut children: Vec<SearchNode>,
    wrap: impl FnOnce(Vec<SearchNode>, Span) -> SearchNode,
) -> SearchNode {
    if children.len() == 1 {
        if let Some(only) = children.pop() {
            return only;
        }
    }
    let span = match (children.first(), children.last()) {
        (Some(first), Some(last)) => first.span().to(last.span()),
        _ => Span::default(),
    };
    wrap(children, span)
}

/// Plain decimal numbers only; `nan`/`inf` stay text.
fn parse_number(text: &str) -> Option<f64> {
    let digits = text.strip_prefix('+').unwrap_or(text);
    let numeric = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.');
    if numeric { digits.parse().ok() } else { None }
}

/// Parse a query string into an AST.
pub fn parse(input: &str) -> Result<SearchNode, ParseError> {
    let tokens = tokenize(input).map_err(ParseError::from_lex)?;
    let mut parser = Parser::new(tokens, input);

    if parser.peek().kind == TokenKind::Eof {
        return Err(parser.error("Empty query", Span::new(0, input.len())));
    }

    let ast = parser.parse_or_expr()?;

    // Ensure we consumed all tokens
    let trailing = parser.peek();
    match trailing.kind {
        TokenKind::Eof => Ok(ast),
        TokenKind::RParen => Err(parser.error("Unmatched ')'", trailing.span)),
        _ => Err(parser.error(
            format!("Unexpected '{}' after expression", trailing.text),
            trailing.span,
        )),
    }
}
