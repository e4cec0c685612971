//! A backend that records drawing operations instead of rendering them.

use log::trace;

use crate::{geometry::Point, waveform::Dataset};

use super::{BackendError, GraphicsContext, GraphicsState, StateStack, TextMetrics};

/// One recorded [`GraphicsContext`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginSurface { width: u32, height: u32 },
    FinishSurface,
    DiscardSurface,
    Push,
    Pop,
    Scale { horizontal: f32, vertical: f32 },
    StrokeColor(String),
    FillColor(String),
    FillOpacity(u8),
    StrokeWidth(f32),
    Font(String),
    PointSize(f32),
    Line { from: Point, to: Point },
    Polygon(Vec<Point>),
    Bezier(Vec<Point>),
    Text { at: Point, text: String },
}

impl DrawCommand {
    /// Returns true for commands that put marks on the surface.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Line { .. } | Self::Polygon(_) | Self::Bezier(_) | Self::Text { .. }
        )
    }
}

/// Records the backend-agnostic command sequence of a render.
///
/// Colors are still resolved so an unknown name fails the same way it would
/// on a real backend.
///
/// # Examples
///
/// ```
/// use tickmark_core::{
///     draw::{DrawCommand, GraphicsContext, Recorder},
///     geometry::Point,
/// };
///
/// let mut gc = Recorder::new();
/// gc.begin_surface(100, 50).unwrap();
/// gc.line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
/// gc.finish_surface().unwrap();
///
/// assert_eq!(gc.primitives().count(), 1);
/// assert!(gc.is_finished());
/// ```
#[derive(Debug, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
    state: StateStack,
    metrics: TextMetrics,
    surface: Option<(u32, u32)>,
    finished: bool,
    discarded: bool,
}

impl Recorder {
    /// Creates a recorder that approximates label widths from character counts.
    pub fn new() -> Self {
        Self::with_metrics(TextMetrics::Approximate)
    }

    pub fn with_metrics(metrics: TextMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Recorded lines, polygons, curves and text, in order.
    pub fn primitives(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_primitive())
    }

    /// The surface size requested by the last `begin_surface()`.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface
    }

    pub fn state(&self) -> &GraphicsState {
        self.state.current()
    }

    /// Number of unmatched `push()` calls.
    pub fn depth(&self) -> usize {
        self.state.depth()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    fn record(&mut self, command: DrawCommand) -> Result<(), BackendError> {
        if self.surface.is_none() {
            return Err(BackendError::NoSurface);
        }
        trace!(command:?; "Recording");
        self.commands.push(command);
        Ok(())
    }
}

impl GraphicsContext for Recorder {
    fn begin_surface(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.commands.clear();
        self.state.reset();
        self.surface = Some((width, height));
        self.finished = false;
        self.discarded = false;
        self.record(DrawCommand::BeginSurface { width, height })
    }

    fn finish_surface(&mut self) -> Result<(), BackendError> {
        self.record(DrawCommand::FinishSurface)?;
        self.finished = true;
        Ok(())
    }

    fn discard_surface(&mut self) {
        if self.surface.is_some() {
            self.commands.push(DrawCommand::DiscardSurface);
            self.discarded = true;
        }
    }

    fn push(&mut self) -> Result<(), BackendError> {
        self.record(DrawCommand::Push)?;
        self.state.push();
        Ok(())
    }

    fn pop(&mut self) -> Result<(), BackendError> {
        self.state.pop()?;
        self.record(DrawCommand::Pop)
    }

    fn scale(&mut self, horizontal: f32, vertical: f32) -> Result<(), BackendError> {
        self.state.scale(horizontal, vertical);
        self.record(DrawCommand::Scale {
            horizontal,
            vertical,
        })
    }

    fn stroke_color(&mut self, name: &str) -> Result<(), BackendError> {
        self.state.set_stroke_color(name)?;
        self.record(DrawCommand::StrokeColor(name.to_string()))
    }

    fn fill_color(&mut self, name: &str) -> Result<(), BackendError> {
        self.state.set_fill_color(name)?;
        self.record(DrawCommand::FillColor(name.to_string()))
    }

    fn fill_opacity(&mut self, opacity: u8) -> Result<(), BackendError> {
        self.state.set_fill_opacity(opacity);
        self.record(DrawCommand::FillOpacity(opacity))
    }

    fn stroke_width(&mut self, width: f32) -> Result<(), BackendError> {
        self.state.set_stroke_width(width);
        self.record(DrawCommand::StrokeWidth(width))
    }

    fn font(&mut self, name: &str) -> Result<(), BackendError> {
        self.state.set_font(name);
        self.record(DrawCommand::Font(name.to_string()))
    }

    fn point_size(&mut self, size: f32) -> Result<(), BackendError> {
        self.state.set_point_size(size);
        self.record(DrawCommand::PointSize(size))
    }

    fn line(&mut self, from: Point, to: Point) -> Result<(), BackendError> {
        self.record(DrawCommand::Line { from, to })
    }

    fn polygon(&mut self, points: &[Point]) -> Result<(), BackendError> {
        self.record(DrawCommand::Polygon(points.to_vec()))
    }

    fn bezier(&mut self, points: &[Point]) -> Result<(), BackendError> {
        self.record(DrawCommand::Bezier(points.to_vec()))
    }

    fn text(&mut self, at: Point, text: &str) -> Result<(), BackendError> {
        self.record(DrawCommand::Text {
            at,
            text: text.to_string(),
        })
    }

    fn measure_label_width(
        &mut self,
        dataset: &Dataset,
        font: &str,
        point_size: f32,
    ) -> Result<f32, BackendError> {
        Ok(self.metrics.label_width(dataset, font, point_size))
    }
}
