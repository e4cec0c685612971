//! Command-line argument definitions for the Tickmark CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input descriptions, the output file
//! and its sizing, and override the render settings of the configuration
//! file.

use std::{fmt, str::FromStr};

use clap::Parser;

use tickmark::config::Sizing;

/// Command-line arguments for the Tickmark timing diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Signal description files, read in order as one timeline
    #[arg(required = true, help = "Paths to the input files")]
    pub input: Vec<String>,

    /// Output file; the format follows the extension (svg, png, ps, eps)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Scale the natural diagram size by this factor
    #[arg(short = 'x', long, conflicts_with = "pagesize")]
    pub scale: Option<f64>,

    /// Render onto a fixed canvas, given as WIDTHxHEIGHT
    #[arg(short, long)]
    pub pagesize: Option<PageSize>,

    /// Keep the aspect ratio when --pagesize is given
    #[arg(short, long)]
    pub aspect: bool,

    /// Height of one signal cell
    #[arg(short, long)]
    pub cell_height: Option<u32>,

    /// Width of one time step
    #[arg(short = 'w', long)]
    pub cell_width: Option<u32>,

    /// Font for signal names and labels
    #[arg(long)]
    pub font: Option<String>,

    /// Font size in points
    #[arg(short, long)]
    pub font_size: Option<u32>,

    /// Width of signal lines
    #[arg(short, long)]
    pub line_width: Option<u32>,

    /// Draw vertical grid lines at every time step
    #[arg(short, long)]
    pub grid: bool,

    /// Print the parsed signals to standard output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file (TOML)
    #[arg(long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The sizing requested by `--scale` or `--pagesize`.
    pub fn sizing(&self) -> Sizing {
        match (self.pagesize, self.scale) {
            (Some(page), _) => Sizing::Page {
                width: page.width,
                height: page.height,
                fix_aspect: self.aspect,
            },
            (None, Some(scale)) => Sizing::Scale(scale),
            (None, None) => Sizing::default(),
        }
    }
}

/// A canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|err| format!("bad page size `{s}`: {err}"))
        };
        Ok(Self {
            width: parse(width)?,
            height: parse(height)?,
        })
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_from_str() {
        assert_eq!(
            "800x600".parse::<PageSize>().unwrap(),
            PageSize {
                width: 800,
                height: 600
            }
        );
        assert!("800".parse::<PageSize>().is_err());
        assert!("wide x 600".parse::<PageSize>().is_err());
    }

    #[test]
    fn test_sizing() {
        let args = Args::parse_from(["tickmark", "in.t", "-p", "400x300", "-a"]);
        assert_eq!(
            args.sizing(),
            Sizing::Page {
                width: 400,
                height: 300,
                fix_aspect: true
            }
        );

        let args = Args::parse_from(["tickmark", "in.t", "-x", "1.5"]);
        assert_eq!(args.sizing(), Sizing::Scale(1.5));

        let args = Args::parse_from(["tickmark", "a.t", "b.t"]);
        assert_eq!(args.input, ["a.t", "b.t"]);
        assert_eq!(args.sizing(), Sizing::Scale(1.0));
    }

    #[test]
    fn test_scale_conflicts_with_pagesize() {
        let result = Args::try_parse_from(["tickmark", "in.t", "-x", "2", "-p", "10x10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["tickmark", "-o", "out.svg"]).is_err());
    }
}
