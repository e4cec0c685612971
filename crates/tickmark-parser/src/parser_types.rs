//! Syntax tree of a timing description.
//!
//! ```text
//! clk=1, data=X;  req -5ns> ack=1.
//! └─ clause ────┘ └─ clause ──────┘
//! └─ statement (one time step) ───┘
//! ```

use crate::span::Spanned;

/// What caused the changes of a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Cause<'src> {
    /// `a, b => ...`: each listed signal triggers every change.
    Dependency(Vec<Spanned<&'src str>>),
    /// `a -label> ...`: a labelled delay from one signal.
    Delay {
        trigger: Spanned<&'src str>,
        label: Spanned<&'src str>,
    },
}

/// `signal=value`
#[derive(Debug, Clone, PartialEq)]
pub struct Change<'src> {
    pub signal: Spanned<&'src str>,
    pub value: Spanned<String>,
}

/// Changes sharing one optional cause.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause<'src> {
    pub cause: Option<Cause<'src>>,
    pub changes: Vec<Change<'src>>,
}

/// All clauses of one time step, terminated by `.`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'src> {
    pub clauses: Vec<Clause<'src>>,
}
