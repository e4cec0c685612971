use std::{fmt, io};

use thiserror::Error;

use crate::{geometry::Point, waveform::Dataset};

/// Failure reported by a backend primitive or surface operation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unknown color `{0}`")]
    UnknownColor(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to format output: {0}")]
    Format(#[from] fmt::Error),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("drawing requires a surface; call `begin_surface` first")]
    NoSurface,

    #[error("`pop` without a matching `push`")]
    StateUnderflow,
}

/// The drawing capabilities a rendering backend provides.
///
/// Coordinates are in diagram units before scaling; [`GraphicsContext::scale`]
/// maps them onto the device pixels chosen in
/// [`GraphicsContext::begin_surface`]. State changes (colors, widths, font,
/// scale) stay in effect until the matching [`GraphicsContext::pop`].
pub trait GraphicsContext {
    /// Acquires a drawing surface of `width` x `height` device pixels.
    fn begin_surface(&mut self, width: u32, height: u32) -> Result<(), BackendError>;

    /// Completes the surface and produces the backend's artifact.
    fn finish_surface(&mut self) -> Result<(), BackendError>;

    /// Releases a surface after a failed render without producing an artifact.
    fn discard_surface(&mut self) {}

    /// Saves the complete drawing state.
    fn push(&mut self) -> Result<(), BackendError>;

    /// Restores the state saved by the matching [`GraphicsContext::push`].
    fn pop(&mut self) -> Result<(), BackendError>;

    /// Multiplies the coordinate scale by the given factors.
    fn scale(&mut self, horizontal: f32, vertical: f32) -> Result<(), BackendError>;

    /// Sets the stroke color from a CSS color name.
    fn stroke_color(&mut self, name: &str) -> Result<(), BackendError>;

    /// Sets the fill color from a CSS color name, `"none"` disables filling.
    fn fill_color(&mut self, name: &str) -> Result<(), BackendError>;

    /// Sets the fill opacity, 0 disables filling.
    fn fill_opacity(&mut self, opacity: u8) -> Result<(), BackendError>;

    fn stroke_width(&mut self, width: f32) -> Result<(), BackendError>;

    fn font(&mut self, name: &str) -> Result<(), BackendError>;

    fn point_size(&mut self, size: f32) -> Result<(), BackendError>;

    fn line(&mut self, from: Point, to: Point) -> Result<(), BackendError>;

    /// Draws a closed polygon, stroked and filled with the current fill.
    fn polygon(&mut self, points: &[Point]) -> Result<(), BackendError>;

    /// Draws a cubic Bézier path: a start point followed by groups of two
    /// control points and an end point.
    fn bezier(&mut self, points: &[Point]) -> Result<(), BackendError>;

    /// Draws `text` with its baseline starting at `at`.
    fn text(&mut self, at: Point, text: &str) -> Result<(), BackendError>;

    /// Width of the widest signal name set in `font` at `point_size`.
    ///
    /// Measured before the surface exists, so implementations must not
    /// require one.
    fn measure_label_width(
        &mut self,
        dataset: &Dataset,
        font: &str,
        point_size: f32,
    ) -> Result<f32, BackendError>;
}

/// Runs `draw` between a `push()` and its matching `pop()`.
///
/// The state is popped whether or not `draw` succeeds. An error from `draw`
/// takes precedence over an error from the pop. `draw` may use any error
/// type that backend errors convert into.
///
/// # Examples
///
/// ```
/// use tickmark_core::draw::{BackendError, GraphicsContext, Recorder, with_saved_state};
///
/// let mut gc = Recorder::new();
/// gc.begin_surface(10, 10).unwrap();
/// let result: Result<(), BackendError> = with_saved_state(&mut gc, |gc| {
///     gc.stroke_color("no-such-color")
/// });
/// assert!(result.is_err());
/// assert_eq!(gc.depth(), 0);
/// ```
pub fn with_saved_state<G, T, E, F>(gc: &mut G, draw: F) -> Result<T, E>
where
    G: GraphicsContext + ?Sized,
    E: From<BackendError>,
    F: FnOnce(&mut G) -> Result<T, E>,
{
    gc.push()?;
    let result = draw(gc);
    let popped = gc.pop();
    let value = result?;
    popped?;
    Ok(value)
}
