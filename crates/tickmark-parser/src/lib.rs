//! # Tickmark Parser
//!
//! Parser for the Tickmark timing description language. Each statement
//! lists the signal changes of one time step and ends with `.`:
//!
//! ```text
//! // cpu.t
//! clk=0, reset=1, bus=X.
//! clk=1.
//! clk=0; clk => reset=0.
//! clk=1; reset -2 cycles> bus="fetch".
//! ```
//!
//! `a => b=1` records that the change of `a` caused `b`'s transition;
//! `a -label> b=1` records a labelled delay between the two.
//!
//! ## Usage
//!
//! ```
//! # use tickmark_parser::{parse, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let dataset = parse("clk=0, q=X.\nclk=1; clk => q=1.")?;
//!     assert_eq!(dataset.max_length(), 2);
//!     assert_eq!(dataset.dependencies().len(), 1);
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use elaborate::Timeline;
pub use span::{Span, Spanned};

use log::{debug, info};

use tickmark_core::waveform::Dataset;

/// Parse a single description into a padded dataset.
///
/// The pipeline is:
///
/// 1. **Tokenize** - convert source text to tokens, collecting every lexical error
/// 2. **Parse** - build one statement per time step
/// 3. **Elaborate** - apply the statements to a [`Dataset`] and pad it
///
/// Use [`Timeline`] to combine several descriptions into one dataset.
pub fn parse(source: &str) -> Result<Dataset, error::ParseError> {
    info!(bytes = source.len(); "Parsing timing description");

    let mut timeline = Timeline::new();
    timeline.extend(source)?;
    let dataset = timeline.finish();

    debug!(signals = dataset.signal_count(), steps = dataset.max_length(); "Parsed dataset");
    Ok(dataset)
}
