//! PostScript and EPS backend.
//!
//! Operators are emitted as text while drawing; `finish_surface()` wraps the
//! body in the document header and trailer of the selected
//! [`PostScriptFlavor`]. PostScript's origin is the bottom-left corner, so
//! every y coordinate is flipped against the surface height in the current
//! user space.

use std::fmt::Write as _;

use log::debug;

use tickmark_core::{
    color::Color,
    draw::{BackendError, GraphicsContext, StateStack, TextMetrics},
    geometry::Point,
    waveform::Dataset,
};

use super::Error;

/// Document structure of the emitted file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostScriptFlavor {
    /// A printable page ending in `showpage`.
    #[default]
    PostScript,
    /// Encapsulated PostScript with a bounding box.
    Eps,
}

/// Emits drawing commands as PostScript.
///
/// ```
/// use tickmark::export::postscript::{PostScriptContext, PostScriptFlavor};
/// use tickmark_core::{draw::GraphicsContext, geometry::Point};
///
/// let mut gc = PostScriptContext::new(PostScriptFlavor::Eps);
/// gc.begin_surface(100, 50).unwrap();
/// gc.line(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).unwrap();
/// gc.finish_surface().unwrap();
///
/// let ps = gc.postscript().unwrap();
/// assert!(ps.starts_with("%!PS-Adobe-3.0 EPSF-3.0\n%%BoundingBox: 0 0 100 50\n"));
/// assert!(ps.contains("0 50 moveto\n10 40 lineto\n"));
/// ```
#[derive(Debug)]
pub struct PostScriptContext {
    flavor: PostScriptFlavor,
    state: StateStack,
    size: Option<(u32, u32)>,
    body: String,
    output: Option<String>,
}

impl PostScriptContext {
    pub fn new(flavor: PostScriptFlavor) -> Self {
        Self {
            flavor,
            state: StateStack::new(),
            size: None,
            body: String::new(),
            output: None,
        }
    }

    pub fn flavor(&self) -> PostScriptFlavor {
        self.flavor
    }

    /// The finished document.
    pub fn postscript(&self) -> Result<&str, Error> {
        self.output.as_deref().ok_or(Error::NotFinished)
    }

    /// Consumes the context, returning the finished document.
    pub fn into_postscript(self) -> Result<String, Error> {
        self.output.ok_or(Error::NotFinished)
    }

    fn height(&self) -> Result<f32, BackendError> {
        self.size
            .map(|(_, height)| height as f32)
            .ok_or(BackendError::NoSurface)
    }

    /// Converts a top-down point into PostScript user space.
    fn flip(&self, point: Point) -> Result<(f32, f32), BackendError> {
        let (_, vertical) = self.state.current().scale();
        let axis = if vertical != 0.0 {
            self.height()? / vertical
        } else {
            self.height()?
        };
        let flipped = point.flip_y(axis);
        Ok((flipped.x(), flipped.y()))
    }

    fn emit(&mut self, line: &str) -> Result<(), BackendError> {
        if self.size.is_none() {
            return Err(BackendError::NoSurface);
        }
        self.body.push_str(line);
        self.body.push('\n');
        Ok(())
    }

    fn emit_color(&mut self, color: Color) -> Result<(), BackendError> {
        let [r, g, b] = color.rgb();
        self.emit(&format!("{r:.6} {g:.6} {b:.6} setrgbcolor"))
    }

    fn emit_font(&mut self) -> Result<(), BackendError> {
        let state = self.state.current();
        let line = format!(
            "/{} findfont\n{} scalefont\nsetfont",
            state.font(),
            state.point_size()
        );
        self.emit(&line)
    }

    fn emit_path(&mut self, points: &[Point], close: bool, paint: &str) -> Result<(), BackendError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        let mut path = String::from("newpath\n");
        let (x, y) = self.flip(*first)?;
        write!(path, "{x} {y} moveto")?;
        for point in rest {
            let (x, y) = self.flip(*point)?;
            write!(path, "\n{x} {y} lineto")?;
        }
        if close {
            path.push_str("\nclosepath");
        }
        write!(path, "\n{paint}")?;
        self.emit(&path)
    }
}

/// Escapes the characters that delimit PostScript strings.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl GraphicsContext for PostScriptContext {
    fn begin_surface(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        debug!(width, height, flavor:? = self.flavor; "Beginning PostScript surface");
        self.state.reset();
        self.size = Some((width, height));
        self.body.clear();
        self.output = None;
        Ok(())
    }

    fn finish_surface(&mut self) -> Result<(), BackendError> {
        let (width, height) = self.size.take().ok_or(BackendError::NoSurface)?;
        let body = std::mem::take(&mut self.body);

        let document = match self.flavor {
            PostScriptFlavor::Eps => format!(
                "%!PS-Adobe-3.0 EPSF-3.0\n%%BoundingBox: 0 0 {width} {height}\n{body}%%EOF\n"
            ),
            PostScriptFlavor::PostScript => format!("%!PS-Adobe-3.0\n{body}showpage\n%%EOF\n"),
        };
        debug!(bytes = document.len(); "Finished PostScript surface");
        self.output = Some(document);
        Ok(())
    }

    fn discard_surface(&mut self) {
        self.size = None;
        self.body.clear();
        self.output = None;
    }

    fn push(&mut self) -> Result<(), BackendError> {
        self.emit("save")?;
        self.state.push();
        Ok(())
    }

    fn pop(&mut self) -> Result<(), BackendError> {
        self.state.pop()?;
        self.emit("restore")
    }

    fn scale(&mut self, horizontal: f32, vertical: f32) -> Result<(), BackendError> {
        self.emit(&format!("{horizontal} {vertical} scale"))?;
        self.state.scale(horizontal, vertical);
        Ok(())
    }

    fn stroke_color(&mut self, name: &str) -> Result<(), BackendError> {
        self.state.set_stroke_color(name)?;
        self.emit_color(self.state.current().stroke_color())
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
        self.emit(&format!("{width} setlinewidth"))
    }

    fn font(&mut self, name: &str) -> Result<(), BackendError> {
        self.state.set_font(name);
        self.emit_font()
    }

    fn point_size(&mut self, size: f32) -> Result<(), BackendError> {
        self.state.set_point_size(size);
        self.emit_font()
    }

    fn line(&mut self, from: Point, to: Point) -> Result<(), BackendError> {
        self.emit_path(&[from, to], false, "stroke")
    }

    fn polygon(&mut self, points: &[Point]) -> Result<(), BackendError> {
        self.emit_path(points, true, "stroke")?;

        // PostScript has a single current color; fill with the fill color
        // and switch back to the stroke color.
        let state = self.state.current();
        let Some(fill) = state.fill() else {
            return Ok(());
        };
        let stroke = state.stroke_color();
        if fill.rgb() == stroke.rgb() {
            return self.emit_path(points, true, "fill");
        }
        self.emit_color(fill)?;
        self.emit_path(points, true, "fill")?;
        self.emit_color(stroke)
    }

    fn bezier(&mut self, points: &[Point]) -> Result<(), BackendError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        let mut path = String::from("newpath\n");
        let (x, y) = self.flip(*first)?;
        write!(path, "{x} {y} moveto")?;
        for point in rest {
            let (x, y) = self.flip(*point)?;
            write!(path, "\n{x} {y}")?;
        }
        path.push_str("\ncurveto\nstroke");
        self.emit(&path)
    }

    fn text(&mut self, at: Point, text: &str) -> Result<(), BackendError> {
        let (x, y) = self.flip(at)?;
        self.emit(&format!("newpath\n{x} {y} moveto\n({}) show", escape(text)))
    }

    fn measure_label_width(
        &mut self,
        dataset: &Dataset,
        font: &str,
        point_size: f32,
    ) -> Result<f32, BackendError> {
        Ok(TextMetrics::Approximate.label_width(dataset, font, point_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(draw: impl FnOnce(&mut PostScriptContext)) -> String {
        let mut gc = PostScriptContext::new(PostScriptFlavor::PostScript);
        gc.begin_surface(200, 100).unwrap();
        draw(&mut gc);
        gc.finish_surface().unwrap();
        gc.into_postscript().unwrap()
    }

    #[test]
    fn test_page_header_and_trailer() {
        let ps = body(|_| {});
        assert_eq!(ps, "%!PS-Adobe-3.0\nshowpage\n%%EOF\n");
    }

    #[test]
    fn test_state_operators() {
        let ps = body(|gc| {
            gc.push().unwrap();
            gc.scale(2.0, 0.5).unwrap();
            gc.stroke_width(2.0).unwrap();
            gc.stroke_color("blue").unwrap();
            gc.pop().unwrap();
        });
        assert!(ps.contains(
            "save\n2 0.5 scale\n2 setlinewidth\n0.000000 0.000000 1.000000 setrgbcolor\nrestore\n"
        ));
    }

    #[test]
    fn test_flip_accounts_for_scale() {
        let ps = body(|gc| {
            gc.scale(1.0, 2.0).unwrap();
            gc.line(Point::new(0.0, 10.0), Point::new(5.0, 50.0)).unwrap();
        });
        assert!(ps.contains("newpath\n0 40 moveto\n5 0 lineto\nstroke\n"));
    }

    #[test]
    fn test_polygon_strokes_then_fills() {
        let ps = body(|gc| {
            gc.stroke_color("blue").unwrap();
            gc.fill_color("blue").unwrap();
            gc.polygon(&[Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 4.0)])
                .unwrap();
        });
        let path = "newpath\n0 100 moveto\n4 100 lineto\n2 96 lineto\nclosepath\n";
        assert!(ps.contains(&format!("{path}stroke\n{path}fill\n")));
    }

    #[test]
    fn test_polygon_without_fill() {
        let ps = body(|gc| {
            gc.fill_color("none").unwrap();
            gc.polygon(&[Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 4.0)])
                .unwrap();
        });
        assert!(ps.contains("stroke\n"));
        assert!(!ps.contains("fill\n"));
    }

    #[test]
    fn test_bezier() {
        let ps = body(|gc| {
            gc.bezier(&[
                Point::new(0.0, 0.0),
                Point::new(5.0, 10.0),
                Point::new(5.0, 10.0),
                Point::new(10.0, 10.0),
            ])
            .unwrap();
        });
        assert!(ps.contains("newpath\n0 100 moveto\n5 90\n5 90\n10 90\ncurveto\nstroke\n"));
    }

    #[test]
    fn test_text_is_escaped() {
        let ps = body(|gc| {
            gc.font("Courier").unwrap();
            gc.point_size(9.0).unwrap();
            gc.text(Point::new(8.0, 24.0), "a(b)").unwrap();
        });
        assert!(ps.contains("/Courier findfont\n9 scalefont\nsetfont\n"));
        assert!(ps.contains("newpath\n8 76 moveto\n(a\\(b\\)) show\n"));
    }

    #[test]
    fn test_requires_surface() {
        let mut gc = PostScriptContext::new(PostScriptFlavor::Eps);
        assert!(matches!(gc.push(), Err(BackendError::NoSurface)));
        assert!(matches!(gc.postscript(), Err(Error::NotFinished)));
    }

    #[test]
    fn test_format_failure_is_a_backend_error() {
        let err: BackendError = std::fmt::Error.into();
        assert!(matches!(err, BackendError::Format(_)));
        assert!(err.to_string().starts_with("failed to format output"));
    }

    #[test]
    fn test_label_width_is_approximate() {
        let mut data = Dataset::new();
        data.find_or_create("reset");
        let mut gc = PostScriptContext::new(PostScriptFlavor::PostScript);
        assert_eq!(gc.measure_label_width(&data, "Helvetica", 10.0).unwrap(), 35.0);
    }
}
