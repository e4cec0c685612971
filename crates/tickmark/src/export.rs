//! Output backends for Tickmark diagrams.
//!
//! Every backend implements [`GraphicsContext`] and is driven by the layout
//! orchestrator; after `finish_surface()` it holds the finished artifact.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ parse
//! Dataset
//!     ↓ layout (drawing commands)
//! GraphicsContext backend (this module)
//!     ↓
//! Output File
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG documents via the `svg` crate
//! - [`raster`] - PNG images, rasterized from the SVG backend with `resvg`
//! - [`postscript`] - hand-emitted PostScript and EPS
//!
//! [`GraphicsContext`]: tickmark_core::draw::GraphicsContext

pub mod postscript;
pub mod raster;
pub mod svg;

use std::{fmt, path::Path};

use tickmark_core::draw::BackendError;

/// Output formats, chosen from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Svg,
    Png,
    PostScript,
    Eps,
}

impl Format {
    /// Picks the format from a file extension, ignoring case.
    ///
    /// ```
    /// # use tickmark::export::Format;
    /// assert_eq!(Format::from_path("out/diagram.SVG").unwrap(), Format::Svg);
    /// assert_eq!(Format::from_path("diagram.eps").unwrap(), Format::Eps);
    /// assert!(Format::from_path("diagram.gif").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("svg") => Ok(Self::Svg),
            Some("png") => Ok(Self::Png),
            Some("ps") => Ok(Self::PostScript),
            Some("eps") => Ok(Self::Eps),
            _ => Err(Error::UnknownFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::PostScript => "ps",
            Self::Eps => "eps",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A backend primitive failed.
    Backend(BackendError),
    /// The output file extension names no supported format.
    UnknownFormat(String),
    /// The artifact was requested before a surface was finished.
    NotFinished,
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(err) => write!(f, "Render error: {err}"),
            Self::UnknownFormat(path) => write!(
                f,
                "Unknown output file format for `{path}`. Valid are png, svg, ps and eps."
            ),
            Self::NotFinished => write!(f, "No finished surface to export"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::UnknownFormat(_) | Self::NotFinished => None,
        }
    }
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        Self::Backend(err)
    }
}
