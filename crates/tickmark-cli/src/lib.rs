//! CLI logic for the Tickmark timing diagram tool.
//!
//! Reads one or more signal descriptions as a single timeline, optionally
//! dumps the parsed signals, and renders the diagram when an output file is
//! given.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, PageSize};

use std::fs;

use log::info;

use tickmark::{TickmarkError, TimingBuilder};

/// Run the Tickmark CLI application
///
/// # Errors
///
/// Returns `TickmarkError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Invalid sizing
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), TickmarkError> {
    info!(inputs:? = args.input, output:? = args.output; "Processing timing description");

    let mut app_config = config::load_config(args.config.as_ref())?;
    config::apply_overrides(&mut app_config, args);

    // Validate sizing before doing any work.
    let sizing = args.sizing().validate()?;

    let sources = args
        .input
        .iter()
        .map(fs::read_to_string)
        .collect::<Result<Vec<_>, _>>()?;

    let builder = TimingBuilder::new(app_config);
    let dataset = builder.parse_all(sources.iter().map(String::as_str))?;

    if args.verbose {
        print!("{dataset}");
    }

    let Some(output) = &args.output else {
        info!("No output file given, nothing rendered");
        return Ok(());
    };

    builder.render_file(&dataset, output, sizing)?;
    info!(output_file = output; "Diagram exported successfully");

    Ok(())
}
