//! Color handling for Tickmark diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Backends receive color *names* through the
//! [`GraphicsContext`](crate::draw::GraphicsContext) contract and resolve them
//! here, so an unknown name is reported the same way by every backend.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "lightgray", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use tickmark_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let grid = Color::new("#cccccc").unwrap();
    /// assert!(Color::new("chartreuse-ish").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the red, green and blue components in sRGB, each in `0.0..=1.0`.
    ///
    /// Used by backends that emit numeric colors, such as PostScript's
    /// `setrgbcolor`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tickmark_core::color::Color;
    ///
    /// let [r, g, b] = Color::new("blue").unwrap().rgb();
    /// assert_eq!((r, g, b), (0.0, 0.0, 1.0));
    /// ```
    pub fn rgb(self) -> [f32; 3] {
        let [r, g, b, _] = self.color.to_alpha_color::<Srgb>().components;
        [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)]
    }

    /// Creates a new color with the specified alpha (transparency) value.
    ///
    /// # Examples
    ///
    /// ```
    /// use tickmark_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let semi_transparent_red = red.with_alpha(0.5);
    /// assert_eq!(semi_transparent_red.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component of this color, between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}
