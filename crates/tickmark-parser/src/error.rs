//! Diagnostics for the timing description language.
//!
//! A [`Diagnostic`] is a single error or warning with an optional
//! [`ErrorCode`], labelled source spans and help text. Lexing collects every
//! diagnostic it finds before failing; all of them are returned together in
//! a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use tickmark_parser::error::{Diagnostic, ErrorCode};
//! # use tickmark_parser::Span;
//! let diag = Diagnostic::error("unterminated string literal")
//!     .with_code(ErrorCode::E001)
//!     .with_label(Span::new(4..11), "string starts here")
//!     .with_help("add closing `\"`");
//! assert_eq!(diag.to_string(), "error[E001]: unterminated string literal");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
