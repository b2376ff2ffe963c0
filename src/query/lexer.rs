//! Lexer/tokenizer for the card query language.

use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, not, preceded, repeat, terminated};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_till, take_while};

use super::ast::{ComparisonOp, Pattern, Span};
use super::error::LexError;

/// Flags every regex literal gets, whatever the query asks for.
pub const DEFAULT_REGEX_FLAGS: &str = "i";

/// Token kinds, in the order the grammar names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Punctuation
    LParen, // (
    RParen, // )

    // Comparison operators
    Colon,     // :
    Equals,    // =
    NotEquals, // !=
    Lt,        // <
    Gt,        // >
    Lte,       // <=
    Gte,       // >=

    // Boolean operators
    Not, // -
    Or,  // OR / or

    // Literals
    Quoted,    // "..."
    Regex,     // /.../flags
    ExactName, // !name or !"name"
    Word,

    Eof,
}

impl TokenKind {
    pub fn comparison(self) -> Option<ComparisonOp> {
        match self {
            TokenKind::Colon => Some(ComparisonOp::Colon),
            TokenKind::Equals => Some(ComparisonOp::Equals),
            TokenKind::NotEquals => Some(ComparisonOp::NotEquals),
            TokenKind::Lt => Some(ComparisonOp::Lt),
            TokenKind::Gt => Some(ComparisonOp::Gt),
            TokenKind::Lte => Some(ComparisonOp::Lte),
            TokenKind::Gte => Some(ComparisonOp::Gte),
            _ => None,
        }
    }

    /// Whether a `/` following this token opens a regex literal.
    fn allows_regex(self) -> bool {
        self.comparison().is_some()
            || matches!(self, TokenKind::LParen | TokenKind::Not | TokenKind::Or)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// Present only on `Regex` tokens.
    pub pattern: Option<Pattern>,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
            pattern: None,
        }
    }

    fn regex(pattern: Pattern, span: Span) -> Self {
        Token {
            kind: TokenKind::Regex,
            text: pattern.source().to_string(),
            span,
            pattern: Some(pattern),
        }
    }
}

// Manually define PResult for resilience against winnow version changes
type PResult<T> = Result<T, winnow::error::ErrMode<winnow::error::ContextError>>;

fn skip_whitespace(input: &mut &str) -> PResult<()> {
    multispace0.parse_next(input)?;
    Ok(())
}

/// Lex parentheses and comparison operators, longest first.
fn lex_symbol(input: &mut &str) -> PResult<TokenKind> {
    alt((
        "<=".value(TokenKind::Lte),
        ">=".value(TokenKind::Gte),
        "!=".value(TokenKind::NotEquals),
        ":".value(TokenKind::Colon),
        "=".value(TokenKind::Equals),
        "<".value(TokenKind::Lt),
        ">".value(TokenKind::Gt),
        "(".value(TokenKind::LParen),
        ")".value(TokenKind::RParen),
    ))
    .parse_next(input)
}

fn lex_regex_flags<'a>(input: &mut &'a str) -> PResult<&'a str> {
    take_while(0.., |c: char| c.is_ascii_alphabetic()).parse_next(input)
}

fn lex_exact_bare<'a>(input: &mut &'a str) -> PResult<&'a str> {
    take_while(0.., |c: char| !c.is_whitespace() && c != '(' && c != ')').parse_next(input)
}

/// A bare word runs until whitespace, a parenthesis or an operator. A `!`
/// belongs to the word unless it starts `!=`.
fn lex_word<'a>(input: &mut &'a str) -> PResult<&'a str> {
    repeat::<_, _, (), _, _>(
        1..,
        alt((
            take_till(1.., |c: char| {
                c.is_whitespace() || matches!(c, '(' | ')' | ':' | '=' | '<' | '>' | '!')
            })
            .void(),
            terminated('!', not('=')).void(),
        )),
    )
    .take()
    .parse_next(input)
}

/// Text up to an unescaped `close`. A backslash before one of `unescape`
/// yields that char; any other escape is kept verbatim.
fn lex_escaped(input: &mut &str, close: char, unescape: &[char]) -> PResult<String> {
    repeat(
        0..,
        alt((
            take_till(1.., |c: char| c == '\\' || c == close),
            preceded('\\', one_of(|c: char| unescape.contains(&c)).take()),
            ('\\', any).take(),
        )),
    )
    .fold(String::new, |mut value: String, piece: &str| {
        value.push_str(piece);
        value
    })
    .parse_next(input)
}

/// A `"..."` literal with `\"` and `\\` escapes.
fn lex_quoted(input: &mut &str) -> PResult<String> {
    delimited('"', |i: &mut &str| lex_escaped(i, '"', &['"', '\\']), '"').parse_next(input)
}

/// The body of a `/.../` literal. `\/` stands for a literal slash.
fn lex_regex_body(input: &mut &str) -> PResult<String> {
    delimited('/', |i: &mut &str| lex_escaped(i, '/', &['/']), '/').parse_next(input)
}

/// Default flags first, then each explicit flag not already present.
fn merge_flags(explicit: &str) -> String {
    let mut flags = DEFAULT_REGEX_FLAGS.to_string();
    for flag in explicit.chars() {
        if !flags.contains(flag) {
            flags.push(flag);
        }
    }
    flags
}

/// Error covering the character at `offset`.
fn lex_error(message: &str, input: &str, offset: usize) -> LexError {
    let end = input
        .get(offset..)
        .and_then(|rest| rest.chars().next())
        .map_or(offset, |c| offset + c.len_utf8());
    LexError::new(message, Span::new(offset, end), input)
}

/// Error running from `offset` to the end of the input.
fn unterminated(message: &str, input: &str, offset: usize) -> LexError {
    LexError::new(message, Span::new(offset, input.len()), input)
}

/// Tokenize the entire input. The last token is always `Eof`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut remaining = input;
    let mut tokens: Vec<Token> = Vec::new();

    loop {
        skip_whitespace(&mut remaining)
            .map_err(|_| lex_error("Unreadable whitespace", input, input.len() - remaining.len()))?;
        let offset = input.len() - remaining.len();
        let Some(first) = remaining.chars().next() else {
            break;
        };
        let consumed = |remaining: &str| input.len() - remaining.len();

        let regex_allowed = tokens.last().is_none_or(|t| t.kind.allows_regex());

        let token = match first {
            '"' => {
                let value = lex_quoted(&mut remaining)
                    .map_err(|_| unterminated("Unterminated quoted string", input, offset))?;
                Token::new(TokenKind::Quoted, value, Span::new(offset, consumed(remaining)))
            }
            '/' if regex_allowed => {
                let source = lex_regex_body(&mut remaining)
                    .map_err(|_| unterminated("Unterminated regular expression", input, offset))?;
                let explicit = lex_regex_flags(&mut remaining).map_err(|_| {
                    lex_error("Invalid regular expression flags", input, consumed(remaining))
                })?;
                let span = Span::new(offset, consumed(remaining));
                let pattern = Pattern::new(&source, &merge_flags(explicit))
                    .map_err(|message| LexError::new(message, span, input))?;
                Token::regex(pattern, span)
            }
            '-' => {
                remaining = &remaining[1..];
                Token::new(TokenKind::Not, "-", Span::new(offset, offset + 1))
            }
            '!' if !remaining.starts_with("!=") => {
                remaining = &remaining[1..];
                let value = if remaining.starts_with('"') {
                    lex_quoted(&mut remaining)
                        .map_err(|_| unterminated("Unterminated quoted string", input, offset + 1))?
                } else {
                    lex_exact_bare(&mut remaining)
                        .map_err(|_| lex_error("Invalid exact name", input, offset))?
                        .to_string()
                };
                Token::new(TokenKind::ExactName, value, Span::new(offset, consumed(remaining)))
            }
            _ => {
                let before = remaining;
                if let Ok(kind) = lex_symbol(&mut remaining) {
                    let end = consumed(remaining);
                    Token::new(kind, &before[..end - offset], Span::new(offset, end))
                } else {
                    remaining = before;
                    let word = lex_word(&mut remaining)
                        .map_err(|_| lex_error("Unexpected character", input, offset))?;
                    let kind = if word.eq_ignore_ascii_case("or") {
                        TokenKind::Or
                    } else {
                        TokenKind::Word
                    };
                    Token::new(kind, word, Span::new(offset, consumed(remaining)))
                }
            }
        };

        tokens.push(token);
    }

    tokens.push(Token::new(
        TokenKind::Eof,
        "",
        Span::new(input.len(), input.len()),
    ));
    Ok(tokens)
}
