//! Error types for Tickmark operations.
//!
//! This module provides the main error type [`TickmarkError`] which wraps
//! the error conditions of parsing, layout and export.

use std::io;

use thiserror::Error;

use tickmark_core::{draw::BackendError, waveform::SignalNotFound};
use tickmark_parser::error::ParseError;

/// The main error type for Tickmark operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the structured
/// diagnostics so callers can render labelled snippets.
#[derive(Debug, Error)]
pub enum TickmarkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error(transparent)]
    NotFound(#[from] SignalNotFound),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<crate::export::Error> for TickmarkError {
    fn from(error: crate::export::Error) -> Self {
        let message = error.to_string();
        match error {
            crate::export::Error::Backend(err) => Self::Backend(err),
            crate::export::Error::Io(err) => Self::Io(err),
            crate::export::Error::NotFinished => Self::Backend(BackendError::Surface(message)),
            crate::export::Error::UnknownFormat(_) => Self::Configuration(message),
        }
    }
}

impl TickmarkError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
