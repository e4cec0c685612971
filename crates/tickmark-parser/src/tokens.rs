//! Token definitions for the timing description language.

use std::fmt;

use crate::span::Span;

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    /// Signal names and bare values such as `clk`, `0`, `X` or `idle`.
    Word(&'src str),
    /// A double-quoted value with escapes resolved.
    StringLiteral(String),
    /// A delay arrow `-label>`, holding the label text.
    Delay(&'src str),
    /// `=>`
    DependsArrow,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`, which ends a time step.
    Period,
    LineComment(&'src str),
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Whitespace and comments, which the parser skips.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Newline | Token::LineComment(_))
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => write!(f, "`{word}`"),
            Token::StringLiteral(text) => write!(f, "\"{text}\""),
            Token::Delay(label) => write!(f, "`-{label}>`"),
            Token::DependsArrow => f.write_str("`=>`"),
            Token::Equals => f.write_str("`=`"),
            Token::Comma => f.write_str("`,`"),
            Token::Semicolon => f.write_str("`;`"),
            Token::Period => f.write_str("`.`"),
            Token::LineComment(_) => f.write_str("comment"),
            Token::Whitespace => f.write_str("whitespace"),
            Token::Newline => f.write_str("newline"),
        }
    }
}

/// A token with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}
