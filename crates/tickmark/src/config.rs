//! Configuration types for Tickmark diagram rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render and style settings.
//! - [`RenderConfig`] - Cell geometry, line widths and label font.
//! - [`StyleConfig`] - Visual styling options such as background color.
//! - [`Sizing`] - How the diagram is mapped onto the output surface.
//!
//! # Example
//!
//! ```
//! # use tickmark::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.render().cell_height(), 32);
//! assert_eq!(config.render().thin_line_width(), 1);
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use tickmark_core::color::Color;

use crate::TickmarkError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(render: RenderConfig, style: StyleConfig) -> Self {
        Self { render, style }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns a mutable reference to the render configuration.
    pub fn render_mut(&mut self) -> &mut RenderConfig {
        &mut self.render
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Geometry and typography of the rendered diagram.
///
/// Cell dimensions and line widths are whole diagram units; all derived
/// metrics are computed from them with integer division.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    cell_height: u32,
    cell_width: u32,
    line_width: u32,
    font: String,
    font_size: u32,
    grid: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_height: 32,
            cell_width: 64,
            line_width: 2,
            font: "Helvetica".to_string(),
            font_size: 12,
            grid: false,
        }
    }
}

impl RenderConfig {
    /// Height of one signal row, excluding delay annotation rows.
    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    /// Width of one time step.
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Stroke width of waveforms.
    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    /// Stroke width of labels and annotations, half the line width but at least 1.
    pub fn thin_line_width(&self) -> u32 {
        (self.line_width / 2).max(1)
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Whether light grey lines mark every time-step boundary.
    pub fn grid(&self) -> bool {
        self.grid
    }

    pub fn with_cell_height(mut self, cell_height: u32) -> Self {
        self.cell_height = cell_height;
        self
    }

    pub fn with_cell_width(mut self, cell_width: u32) -> Self {
        self.cell_width = cell_width;
        self
    }

    pub fn with_line_width(mut self, line_width: u32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }
}

/// Visual styling configuration for rendered diagrams.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background color as a color string. Backends use white when unset.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

/// How the diagram is mapped onto the output surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Multiply the natural size by a factor.
    Scale(f64),
    /// Stretch onto a fixed page; `fix_aspect` letterboxes instead.
    Page {
        width: u32,
        height: u32,
        fix_aspect: bool,
    },
}

impl Default for Sizing {
    fn default() -> Self {
        Self::Scale(1.0)
    }
}

impl Sizing {
    /// Rejects non-positive scale factors and page dimensions.
    ///
    /// ```
    /// # use tickmark::config::Sizing;
    /// assert!(Sizing::Scale(2.0).validate().is_ok());
    /// assert!(Sizing::Scale(0.0).validate().is_err());
    /// assert!(Sizing::Page { width: 0, height: 10, fix_aspect: false }.validate().is_err());
    /// ```
    pub fn validate(self) -> Result<Self, TickmarkError> {
        match self {
            Self::Scale(scale) if scale <= 0.0 || !scale.is_finite() => Err(
                TickmarkError::Configuration(format!("bad scale factor ({scale}) given")),
            ),
            Self::Page { width, height, .. } if width == 0 || height == 0 => {
                Err(TickmarkError::Configuration(format!(
                    "bad page size given ({width} x {height})"
                )))
            }
            _ => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_from_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [render]
            cell_width = 80
            grid = true
            "#,
        )
        .unwrap();

        let render = config.render();
        assert_eq!(render.cell_width(), 80);
        assert!(render.grid());
        assert_eq!(render.cell_height(), 32);
        assert_eq!(render.font(), "Helvetica");
        assert_eq!(render.font_size(), 12);
    }

    #[test]
    fn test_thin_line_width() {
        let render = RenderConfig::default();
        assert_eq!(render.clone().with_line_width(1).thin_line_width(), 1);
        assert_eq!(render.clone().with_line_width(0).thin_line_width(), 1);
        assert_eq!(render.with_line_width(6).thin_line_width(), 3);
    }

    #[test]
    fn test_style_background_color() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            background_color = "ivory"
            "#,
        )
        .unwrap();
        assert!(config.style().background_color().unwrap().is_some());

        let config: AppConfig = toml::from_str(
            r#"
            [style]
            background_color = "not a color"
            "#,
        )
        .unwrap();
        assert!(config.style().background_color().is_err());
    }

    #[test]
    fn test_sizing_validate() {
        assert!(Sizing::default().validate().is_ok());
        assert!(Sizing::Scale(-1.0).validate().is_err());
        assert!(Sizing::Scale(f64::NAN).validate().is_err());
        assert!(
            Sizing::Page {
                width: 100,
                height: 0,
                fix_aspect: true
            }
            .validate()
            .is_err()
        );
        assert!(
            Sizing::Page {
                width: 100,
                height: 50,
                fix_aspect: true
            }
            .validate()
            .is_ok()
        );
    }
}
