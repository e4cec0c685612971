//! Drawing state shared by all backends.
//!
//! Backends keep a [`StateStack`] and forward the state-changing calls of
//! [`GraphicsContext`](super::GraphicsContext) to it, so `push()`/`pop()`
//! semantics and color parsing are identical across output formats.

use crate::color::Color;

use super::BackendError;

/// The complete drawing state saved by `push()`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    stroke_color: Color,
    fill_color: Option<Color>,
    fill_opacity: u8,
    stroke_width: f32,
    font: String,
    point_size: f32,
    scale: (f32, f32),
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            stroke_color: Color::default(),
            fill_color: Some(Color::default()),
            fill_opacity: u8::MAX,
            stroke_width: 1.0,
            font: "sans-serif".to_string(),
            point_size: 12.0,
            scale: (1.0, 1.0),
        }
    }
}

impl GraphicsState {
    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    /// The color polygons are filled with, or `None` for outline only.
    ///
    /// The fill opacity is folded into the returned color's alpha.
    pub fn fill(&self) -> Option<Color> {
        if self.fill_opacity == 0 {
            return None;
        }
        self.fill_color
            .map(|color| color.with_alpha(f32::from(self.fill_opacity) / 255.0))
    }

    pub fn fill_opacity(&self) -> u8 {
        self.fill_opacity
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Accumulated horizontal and vertical scale.
    pub fn scale(&self) -> (f32, f32) {
        self.scale
    }
}

/// A current [`GraphicsState`] plus the states saved by `push()`.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    /// Number of unmatched `push()` calls.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self) {
        self.saved.push(self.current.clone());
    }

    pub fn pop(&mut self) -> Result<(), BackendError> {
        self.current = self.saved.pop().ok_or(BackendError::StateUnderflow)?;
        Ok(())
    }

    /// Drops all saved states and restores the defaults.
    pub fn reset(&mut self) {
        self.current = GraphicsState::default();
        self.saved.clear();
    }

    pub fn scale(&mut self, horizontal: f32, vertical: f32) {
        let (h, v) = self.current.scale;
        self.current.scale = (h * horizontal, v * vertical);
    }

    pub fn set_stroke_color(&mut self, name: &str) -> Result<(), BackendError> {
        self.current.stroke_color = parse_color(name)?;
        Ok(())
    }

    pub fn set_fill_color(&mut self, name: &str) -> Result<(), BackendError> {
        self.current.fill_color = if name.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(parse_color(name)?)
        };
        Ok(())
    }

    pub fn set_fill_opacity(&mut self, opacity: u8) {
        self.current.fill_opacity = opacity;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.current.stroke_width = width;
    }

    pub fn set_font(&mut self, name: &str) {
        self.current.font = name.to_string();
    }

    pub fn set_point_size(&mut self, size: f32) {
        self.current.point_size = size;
    }
}

fn parse_color(name: &str) -> Result<Color, BackendError> {
    Color::new(name).map_err(|_| BackendError::UnknownColor(name.to_string()))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_push_pop_restores_everything() {
        let mut stack = StateStack::new();
        stack.push();
        stack.set_stroke_color("blue").unwrap();
        stack.set_fill_color("none").unwrap();
        stack.set_stroke_width(3.0);
        stack.set_font("Courier");
        stack.set_point_size(20.0);
        stack.scale(2.0, 0.5);
        assert_eq!(stack.depth(), 1);

        stack.pop().unwrap();
        assert_eq!(stack.current(), &GraphicsState::default());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_pop_without_push() {
        let mut stack = StateStack::new();
        assert!(matches!(stack.pop(), Err(BackendError::StateUnderflow)));
    }

    #[test]
    fn test_scale_accumulates() {
        let mut stack = StateStack::new();
        stack.scale(2.0, 3.0);
        stack.scale(0.5, 2.0);
        let (h, v) = stack.current().scale();
        assert_approx_eq!(f32, h, 1.0);
        assert_approx_eq!(f32, v, 6.0);
    }

    #[test]
    fn test_unknown_color() {
        let mut stack = StateStack::new();
        let err = stack.set_stroke_color("blurple").unwrap_err();
        assert!(matches!(err, BackendError::UnknownColor(name) if name == "blurple"));
    }

    #[test]
    fn test_fill_none_and_transparent() {
        let mut stack = StateStack::new();
        assert!(stack.current().fill().is_some());

        stack.set_fill_color("NONE").unwrap();
        assert!(stack.current().fill().is_none());

        stack.set_fill_color("blue").unwrap();
        stack.set_fill_opacity(0);
        assert!(stack.current().fill().is_none());

        stack.set_fill_opacity(128);
        let fill = stack.current().fill().unwrap();
        assert_approx_eq!(f32, fill.alpha(), 128.0 / 255.0, epsilon = 0.001);
    }
}
