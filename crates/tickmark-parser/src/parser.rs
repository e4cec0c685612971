//! Parser for timing description tokens.
//!
//! Turns the token stream from the [`lexer`](super::lexer) into the
//! statements of [`parser_types`](super::parser_types). Whitespace and
//! comment tokens are skipped in front of every significant token. The
//! public entry point is [`build_statements`].

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, opt, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types as types,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what was expected
    Label(&'static str),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Parse one whitespace or comment token
fn ws_comment<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more whitespace/comments
fn ws_comments0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws_comment).parse_next(input)
}

/// Parse a punctuation token, returning its span
fn symbol<'src>(
    input: &mut Input<'src>,
    expected: fn(&Token<'_>) -> bool,
    label: &'static str,
) -> IResult<Span> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &'src PositionedToken<'src>| expected(&token.token).then_some(token.span))
        .context(Context::Label(label))
        .parse_next(input)
}

fn comma<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, |t| matches!(t, Token::Comma), "`,`")
}

fn semicolon<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, |t| matches!(t, Token::Semicolon), "`;`")
}

fn period<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, |t| matches!(t, Token::Period), "`.`")
}

fn equals<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, |t| matches!(t, Token::Equals), "`=`")
}

fn depends_arrow<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(input, |t| matches!(t, Token::DependsArrow), "`=>`")
}

/// Parse a signal name
fn signal<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Word(name) => Some(Spanned::new(name, token.span)),
        _ => None,
    })
    .context(Context::Label("signal name"))
    .parse_next(input)
}

/// Parse a value: a bare word or a quoted string
fn value<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &'src PositionedToken<'src>| match &token.token {
        Token::Word(word) => Some(Spanned::new(word.to_string(), token.span)),
        Token::StringLiteral(text) => Some(Spanned::new(text.clone(), token.span)),
        _ => None,
    })
    .context(Context::Label("value"))
    .parse_next(input)
}

/// Parse a delay arrow, returning its label
fn delay_label<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Delay(label) => Some(Spanned::new(label, token.span)),
        _ => None,
    })
    .context(Context::Label("delay arrow"))
    .parse_next(input)
}

/// Parse `signal=value`
fn change<'src>(input: &mut Input<'src>) -> IResult<types::Change<'src>> {
    let signal = signal.parse_next(input)?;
    equals.parse_next(input)?;
    let value = value.parse_next(input)?;
    Ok(types::Change { signal, value })
}

/// Parse `a, b =>`
fn dependency_cause<'src>(input: &mut Input<'src>) -> IResult<types::Cause<'src>> {
    let triggers: Vec<_> = separated(1.., signal, comma).parse_next(input)?;
    depends_arrow.parse_next(input)?;
    Ok(types::Cause::Dependency(triggers))
}

/// Parse `a -label>`
fn delay_cause<'src>(input: &mut Input<'src>) -> IResult<types::Cause<'src>> {
    let trigger = signal.parse_next(input)?;
    let label = delay_label.parse_next(input)?;
    Ok(types::Cause::Delay { trigger, label })
}

/// Parse an optional cause followed by one or more changes
fn clause<'src>(input: &mut Input<'src>) -> IResult<types::Clause<'src>> {
    let cause = opt(alt((dependency_cause, delay_cause))).parse_next(input)?;
    let changes = separated(1.., change, comma).parse_next(input)?;
    Ok(types::Clause { cause, changes })
}

/// Parse clauses up to the `.` that ends the time step
fn statement<'src>(input: &mut Input<'src>) -> IResult<types::Statement<'src>> {
    let clauses = separated(1.., clause, semicolon).parse_next(input)?;
    period.parse_next(input)?;
    Ok(types::Statement { clauses })
}

fn statements<'src>(input: &mut Input<'src>) -> IResult<Vec<types::Statement<'src>>> {
    let mut statements = Vec::new();
    loop {
        ws_comments0.parse_next(input)?;
        if input.eof_offset() == 0 {
            return Ok(statements);
        }
        statements.push(cut_err(statement).parse_next(input)?);
    }
}

fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    let expected: Vec<&str> = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e
            .context()
            .map(|ctx| match ctx {
                Context::Label(label) => *label,
            })
            .collect(),
        ErrMode::Incomplete(_) => Vec::new(),
    };

    let position = tokens.len() - current_remaining;
    let offending = tokens[position..].iter().find(|t| !t.token.is_trivia());

    let Some(offending) = offending else {
        let span = tokens
            .iter()
            .rev()
            .find(|t| !t.token.is_trivia())
            .map(|t| t.span)
            .unwrap_or_default();
        return Diagnostic::error("incomplete input, the last time step is not finished")
            .with_code(ErrorCode::E101)
            .with_label(span, "incomplete")
            .with_help("end every time step with `.`");
    };

    let label = if expected.is_empty() {
        "unexpected token".to_string()
    } else {
        format!("expected {}", expected.join(" or "))
    };

    Diagnostic::error(format!("unexpected token {}", offending.token))
        .with_code(ErrorCode::E100)
        .with_label(offending.span, label)
        .with_help("statements look like `a => b=1, c=X.`")
}

/// Parse tokens into the statements of a description.
pub fn build_statements<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Vec<types::Statement<'src>>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    statements
        .parse_next(&mut token_slice)
        .map_err(|e| convert_error(e, tokens, token_slice.eof_offset()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(input: &'static str) -> Result<Vec<types::Statement<'static>>, Diagnostic> {
        let tokens = tokenize(input).expect("input should tokenize");
        // Statements borrow from the tokens.
        let tokens: &'static [PositionedToken<'static>] = Box::leak(tokens.into_boxed_slice());
        build_statements(tokens)
    }

    fn names(signals: &[Spanned<&str>]) -> Vec<String> {
        signals.iter().map(|s| s.inner().to_string()).collect()
    }

    #[test]
    fn test_plain_changes() {
        let statements = parse("clk=0, data=\"idle\".\nclk=1.").unwrap();
        assert_eq!(statements.len(), 2);

        let clause = &statements[0].clauses[0];
        assert!(clause.cause.is_none());
        assert_eq!(clause.changes.len(), 2);
        assert_eq!(*clause.changes[1].signal.inner(), "data");
        assert_eq!(clause.changes[1].value.inner(), "idle");
    }

    #[test]
    fn test_dependency_clause() {
        let statements = parse("clk, en => q=1, qn=0.").unwrap();
        let clause = &statements[0].clauses[0];

        match &clause.cause {
            Some(types::Cause::Dependency(triggers)) => {
                assert_eq!(names(triggers), ["clk", "en"]);
            }
            other => panic!("expected dependency, got {other:?}"),
        }
        assert_eq!(clause.changes.len(), 2);
    }

    #[test]
    fn test_delay_clause() {
        let statements = parse("req -10ns> ack=1.").unwrap();
        match &statements[0].clauses[0].cause {
            Some(types::Cause::Delay { trigger, label }) => {
                assert_eq!(*trigger.inner(), "req");
                assert_eq!(*label.inner(), "10ns");
            }
            other => panic!("expected delay, got {other:?}"),
        }
    }

    #[test]
    fn test_semicolon_separates_clauses() {
        let statements = parse("a=1; a => b=1; // comment\n c=0.").unwrap();
        let clauses = &statements[0].clauses;
        assert_eq!(clauses.len(), 3);
        assert!(clauses[0].cause.is_none());
        assert!(clauses[1].cause.is_some());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("  // nothing\n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_period_is_incomplete() {
        let diag = parse("clk=0.\nclk=1").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.labels()[0].span(), Span::new(11..12));
    }

    #[test]
    fn test_unexpected_token() {
        let diag = parse("clk=0.\nclk => .").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.labels()[0].span(), Span::new(14..15));
    }

    #[test]
    fn test_missing_value() {
        let diag = parse("clk=.").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.labels()[0].span(), Span::new(4..5));
    }
}
