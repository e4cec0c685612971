//! Tickmark - layout and rendering of digital timing diagrams.
//!
//! A timing diagram shows how a set of signals changes over discrete time
//! steps. Tickmark parses a small description language into a
//! [`Dataset`](waveform::Dataset), lays it out on a grid of fixed-size cells
//! and drives one of several output backends (SVG, PNG, PostScript/EPS)
//! through the [`GraphicsContext`](draw::GraphicsContext) contract.

pub mod config;

mod error;
pub mod export;
pub mod layout;

pub use tickmark_core::{color, draw, geometry, waveform};

pub use error::TickmarkError;

use std::{fs, path::Path};

use log::{debug, info, trace};

use tickmark_core::draw::GraphicsContext;
use tickmark_parser::Timeline;

use config::{AppConfig, Sizing};
use export::{
    Format,
    postscript::{PostScriptContext, PostScriptFlavor},
    raster::RasterContext,
    svg::SvgContext,
};
use waveform::Dataset;

/// Builder for parsing and rendering timing diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use tickmark::{TimingBuilder, config::{AppConfig, Sizing}};
///
/// let source = "clk=0, data=X.\nclk=1; clk => data=1.";
///
/// let builder = TimingBuilder::new(AppConfig::default());
/// let dataset = builder.parse(source).expect("Failed to parse");
///
/// let svg = builder
///     .render_svg(&dataset, Sizing::Scale(2.0))
///     .expect("Failed to render");
/// ```
#[derive(Debug, Default)]
pub struct TimingBuilder {
    config: AppConfig,
}

impl TimingBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a description into a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`TickmarkError::Parse`] carrying the source text and every
    /// diagnostic found.
    pub fn parse(&self, source: &str) -> Result<Dataset, TickmarkError> {
        self.parse_all([source])
    }

    /// Parse several descriptions into one dataset.
    ///
    /// Time steps continue from one source to the next. A parse error carries
    /// the text of the source it was found in.
    ///
    /// ```
    /// # use tickmark::TimingBuilder;
    /// let builder = TimingBuilder::default();
    /// let dataset = builder.parse_all(["clk=0.", "clk=1."]).unwrap();
    /// assert_eq!(dataset.max_length(), 2);
    /// ```
    pub fn parse_all<'a>(
        &self,
        sources: impl IntoIterator<Item = &'a str>,
    ) -> Result<Dataset, TickmarkError> {
        info!("Parsing timing description");

        let mut timeline = Timeline::new();
        for source in sources {
            timeline
                .extend(source)
                .map_err(|err| TickmarkError::new_parse_error(err, source))?;
        }
        let dataset = timeline.finish();

        debug!(signals = dataset.signal_count(), steps = dataset.max_length(); "Description parsed successfully");
        trace!(dataset:?; "Parsed dataset");
        Ok(dataset)
    }

    /// Render `dataset` onto any graphics context.
    ///
    /// The context holds the finished surface afterwards; on error the
    /// surface has been discarded.
    pub fn render(
        &self,
        dataset: &Dataset,
        gc: &mut dyn GraphicsContext,
        sizing: Sizing,
    ) -> Result<(), TickmarkError> {
        let sizing = sizing.validate()?;
        layout::render_sized(gc, dataset, self.config.render(), sizing)
    }

    /// Render `dataset` to an SVG document.
    pub fn render_svg(&self, dataset: &Dataset, sizing: Sizing) -> Result<String, TickmarkError> {
        let mut gc = SvgContext::new();
        if let Some(background) = self.background()? {
            gc = gc.with_background(background);
        }
        self.render(dataset, &mut gc, sizing)?;

        info!("SVG rendered successfully");
        Ok(gc.into_svg()?)
    }

    /// Render `dataset` to PNG bytes.
    pub fn render_png(&self, dataset: &Dataset, sizing: Sizing) -> Result<Vec<u8>, TickmarkError> {
        let mut gc = RasterContext::new();
        if let Some(background) = self.background()? {
            gc = gc.with_background(background);
        }
        self.render(dataset, &mut gc, sizing)?;

        info!("PNG rendered successfully");
        Ok(gc.into_png()?)
    }

    /// Render `dataset` to a PostScript or EPS program.
    pub fn render_postscript(
        &self,
        dataset: &Dataset,
        sizing: Sizing,
        flavor: PostScriptFlavor,
    ) -> Result<String, TickmarkError> {
        let mut gc = PostScriptContext::new(flavor);
        self.render(dataset, &mut gc, sizing)?;

        info!(flavor:?; "PostScript rendered successfully");
        Ok(gc.into_postscript()?)
    }

    /// Render `dataset` into `path`, choosing the format from its extension.
    ///
    /// Nothing is written when rendering fails.
    pub fn render_file(
        &self,
        dataset: &Dataset,
        path: impl AsRef<Path>,
        sizing: Sizing,
    ) -> Result<(), TickmarkError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        info!(path:? = path, format:%; "Exporting diagram");

        match format {
            Format::Svg => fs::write(path, self.render_svg(dataset, sizing)?)?,
            Format::Png => fs::write(path, self.render_png(dataset, sizing)?)?,
            Format::PostScript => fs::write(
                path,
                self.render_postscript(dataset, sizing, PostScriptFlavor::PostScript)?,
            )?,
            Format::Eps => fs::write(
                path,
                self.render_postscript(dataset, sizing, PostScriptFlavor::Eps)?,
            )?,
        }
        Ok(())
    }

    fn background(&self) -> Result<Option<color::Color>, TickmarkError> {
        self.config
            .style()
            .background_color()
            .map_err(TickmarkError::Configuration)
    }
}
