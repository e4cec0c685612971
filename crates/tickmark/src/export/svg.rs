//! SVG backend.
//!
//! Each `push()` opens an SVG group and each `pop()` closes it, so a
//! `scale()` becomes a `transform` on the innermost open group. Stroke and
//! fill attributes are written on every element from the current
//! [`GraphicsState`].

use log::{debug, trace};
use svg::{self, node::element as svg_element};

use tickmark_core::{
    color::Color,
    draw::{BackendError, GraphicsContext, GraphicsState, StateStack, TextMetrics},
    geometry::Point,
    waveform::Dataset,
};

use super::Error;

type SvgNode = Box<dyn svg::Node>;

/// Applies the current stroke to an SVG element.
macro_rules! apply_stroke {
    ($element:expr, $state:expr) => {{
        let stroke = $state.stroke_color();
        $element
            .set("stroke", stroke.to_string())
            .set("stroke-opacity", stroke.alpha())
            .set("stroke-width", $state.stroke_width())
    }};
}

/// One open group: children collected so far and its own scale.
#[derive(Debug, Default)]
struct Frame {
    scale: Option<(f32, f32)>,
    children: Vec<SvgNode>,
}

impl Frame {
    fn into_group(self) -> svg_element::Group {
        let mut group = svg_element::Group::new();
        if let Some((h, v)) = self.scale {
            group = group.set("transform", format!("scale({h} {v})"));
        }
        for child in self.children {
            group = group.add(child);
        }
        group
    }
}

/// Renders drawing commands into an SVG document.
///
/// # Examples
///
/// ```
/// use tickmark::export::svg::SvgContext;
/// use tickmark_core::{draw::GraphicsContext, geometry::Point};
///
/// let mut gc = SvgContext::new();
/// gc.begin_surface(64, 32).unwrap();
/// gc.line(Point::new(0.0, 4.0), Point::new(64.0, 4.0)).unwrap();
/// gc.finish_surface().unwrap();
///
/// let svg = gc.svg().unwrap();
/// assert!(svg.contains("<line"));
/// ```
#[derive(Debug)]
pub struct SvgContext {
    state: StateStack,
    frames: Vec<Frame>,
    size: Option<(u32, u32)>,
    background: Color,
    metrics: TextMetrics,
    output: Option<String>,
}

impl Default for SvgContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgContext {
    pub fn new() -> Self {
        Self {
            state: StateStack::new(),
            frames: Vec::new(),
            size: None,
            background: Color::new("white").unwrap_or_default(),
            metrics: TextMetrics::Shaped,
            output: None,
        }
    }

    /// Sets the color painted behind the diagram.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Sets how signal names are measured.
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// The finished document.
    pub fn svg(&self) -> Result<&str, Error> {
        self.output.as_deref().ok_or(Error::NotFinished)
    }

    /// Consumes the context, returning the finished document.
    pub fn into_svg(self) -> Result<String, Error> {
        self.output.ok_or(Error::NotFinished)
    }

    fn state(&self) -> &GraphicsState {
        self.state.current()
    }

    fn emit(&mut self, node: SvgNode) -> Result<(), BackendError> {
        let frame = self.frames.last_mut().ok_or(BackendError::NoSurface)?;
        frame.children.push(node);
        Ok(())
    }

    fn apply_fill(&self, element: svg_element::Polygon) -> svg_element::Polygon {
        match self.state().fill() {
            Some(fill) => element
                .set("fill", fill.to_string())
                .set("fill-opacity", fill.alpha()),
            None => element.set("fill", "none"),
        }
    }
}

fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x(), p.y()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn bezier_path_data(points: &[Point]) -> Option<String> {
    let (start, rest) = points.split_first()?;
    let mut data = format!("M {} {}", start.x(), start.y());
    for curve in rest.chunks_exact(3) {
        data.push_str(&format!(
            " C {} {}, {} {}, {} {}",
            curve[0].x(),
            curve[0].y(),
            curve[1].x(),
            curve[1].y(),
            curve[2].x(),
            curve[2].y()
        ));
    }
    Some(data)
}

impl GraphicsContext for SvgContext {
    fn begin_surface(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        debug!(width, height; "Beginning SVG surface");
        self.state.reset();
        self.frames = vec![Frame::default()];
        self.size = Some((width, height));
        self.output = None;
        Ok(())
    }

    fn finish_surface(&mut self) -> Result<(), BackendError> {
        let (width, height) = self.size.take().ok_or(BackendError::NoSurface)?;

        // Close groups left open by an unbalanced push.
        while self.frames.len() > 1 {
            let group = self.frames.pop().map(Frame::into_group);
            if let (Some(group), Some(parent)) = (group, self.frames.last_mut()) {
                parent.children.push(Box::new(group));
            }
        }
        let root = self.frames.pop().ok_or(BackendError::NoSurface)?;

        let background = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", width)
            .set("height", height)
            .set("fill", self.background.to_string())
            .set("fill-opacity", self.background.alpha());

        let doc = svg::Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height)
            .add(background)
            .add(root.into_group());

        self.output = Some(doc.to_string());
        debug!(width, height; "Finished SVG surface");
        Ok(())
    }

    fn discard_surface(&mut self) {
        self.frames.clear();
        self.size = None;
        self.output = None;
    }

    fn push(&mut self) -> Result<(), BackendError> {
        if self.frames.is_empty() {
            return Err(BackendError::NoSurface);
        }
        self.state.push();
        self.frames.push(Frame::default());
        Ok(())
    }

    fn pop(&mut self) -> Result<(), BackendError> {
        if self.frames.len() < 2 {
            return Err(BackendError::StateUnderflow);
        }
        self.state.pop()?;
        let group = self
            .frames
            .pop()
            .map(Frame::into_group)
            .ok_or(BackendError::StateUnderflow)?;
        self.emit(Box::new(group))
    }

    fn scale(&mut self, horizontal: f32, vertical: f32) -> Result<(), BackendError> {
        let frame = self.frames.last_mut().ok_or(BackendError::NoSurface)?;
        let (h, v) = frame.scale.unwrap_or((1.0, 1.0));
        frame.scale = Some((h * horizontal, v * vertical));
        self.state.scale(horizontal, vertical);
        Ok(())
    }

    fn stroke_color(&mut self, name: &str) -> Result<(), BackendError> {
        self.state.set_stroke_color(name)
    }

    fn fill_color(&mut self, name: &str) -> Result<(), BackendError> {
        self.state.set_fill_color(name)
    }

    fn fill_opacity(&mut self, opacity: u8) -> Result<(), BackendError> {
        self.state.set_fill_opacity(opacity);
        Ok(())
    }

    fn stroke_width(&mut self, width: f32) -> Result<(), BackendError> {
        self.state.set_stroke_width(width);
        Ok(())
    }

    fn font(&mut self, name: &str) -> Result<(), BackendError> {
        self.state.set_font(name);
        Ok(())
    }

    fn point_size(&mut self, size: f32) -> Result<(), BackendError> {
        self.state.set_point_size(size);
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point) -> Result<(), BackendError> {
        trace!(from:?, to:?; "SVG line");
        let line = svg_element::Line::new()
            .set("x1", from.x())
            .set("y1", from.y())
            .set("x2", to.x())
            .set("y2", to.y());
        let line = apply_stroke!(line, self.state());
        self.emit(Box::new(line))
    }

    fn polygon(&mut self, points: &[Point]) -> Result<(), BackendError> {
        trace!(points:?; "SVG polygon");
        let polygon = svg_element::Polygon::new().set("points", format_points(points));
        let polygon = apply_stroke!(polygon, self.state());
        let polygon = self.apply_fill(polygon);
        self.emit(Box::new(polygon))
    }

    fn bezier(&mut self, points: &[Point]) -> Result<(), BackendError> {
        trace!(points:?; "SVG bezier");
        let Some(data) = bezier_path_data(points) else {
            return Ok(());
        };
        let path = svg_element::Path::new().set("d", data).set("fill", "none");
        let path = apply_stroke!(path, self.state());
        self.emit(Box::new(path))
    }

    fn text(&mut self, at: Point, text: &str) -> Result<(), BackendError> {
        trace!(at:?, text; "SVG text");
        let state = self.state();
        let color = state.stroke_color();
        let node = svg_element::Text::new("")
            .set("x", at.x())
            .set("y", at.y())
            .set("font-family", format!("{}, sans-serif", state.font()))
            .set("font-size", state.point_size())
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha())
            .add(svg::node::Text::new(text));
        self.emit(Box::new(node))
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

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(draw: impl FnOnce(&mut SvgContext)) -> String {
        let mut gc = SvgContext::new().with_metrics(TextMetrics::Approximate);
        gc.begin_surface(200, 100).unwrap();
        draw(&mut gc);
        gc.finish_surface().unwrap();
        gc.into_svg().unwrap()
    }

    #[test]
    fn test_document_size_and_background() {
        let svg = finished(|_| {});
        assert!(svg.contains(r#"width="200""#));
        assert!(svg.contains(r#"height="100""#));
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(svg.contains(r#"fill="white""#));
    }

    #[test]
    fn test_scale_applies_to_group() {
        let svg = finished(|gc| {
            gc.push().unwrap();
            gc.scale(2.0, 0.5).unwrap();
            gc.line(Point::new(0.0, 0.0), Point::new(1.0, 1.0)).unwrap();
            gc.pop().unwrap();
        });
        assert!(svg.contains(r#"transform="scale(2 0.5)""#));
    }

    #[test]
    fn test_polygon_fill_follows_state() {
        let svg = finished(|gc| {
            gc.stroke_color("blue").unwrap();
            gc.fill_color("none").unwrap();
            gc.polygon(&[Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 3.0)])
                .unwrap();
        });
        assert!(svg.contains(r#"points="0,0 4,0 2,3""#));
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"stroke="blue""#));
    }

    #[test]
    fn test_bezier_path() {
        let svg = finished(|gc| {
            gc.bezier(&[
                Point::new(0.0, 0.0),
                Point::new(5.0, 10.0),
                Point::new(5.0, 10.0),
                Point::new(10.0, 10.0),
            ])
            .unwrap();
        });
        assert!(svg.contains("M 0 0 C 5 10, 5 10, 10 10"));
    }

    #[test]
    fn test_text_uses_state() {
        let svg = finished(|gc| {
            gc.font("Courier").unwrap();
            gc.point_size(9.0).unwrap();
            gc.text(Point::new(8.0, 24.0), "clk").unwrap();
        });
        assert!(svg.contains("clk"));
        assert!(svg.contains(r#"font-size="9""#));
        assert!(svg.contains("Courier, sans-serif"));
    }

    #[test]
    fn test_not_finished() {
        let mut gc = SvgContext::new();
        assert!(matches!(gc.svg(), Err(Error::NotFinished)));
        gc.begin_surface(10, 10).unwrap();
        gc.discard_surface();
        assert!(matches!(gc.svg(), Err(Error::NotFinished)));
        assert!(matches!(
            gc.line(Point::default(), Point::default()),
            Err(BackendError::NoSurface)
        ));
    }

    #[test]
    fn test_unbalanced_pop() {
        let mut gc = SvgContext::new();
        gc.begin_surface(10, 10).unwrap();
        assert!(matches!(gc.pop(), Err(BackendError::StateUnderflow)));
    }
}
