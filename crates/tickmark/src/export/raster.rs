//! PNG backend.
//!
//! Drawing is delegated to an [`SvgContext`]; finishing the surface
//! rasterizes the resulting document with resvg, so raster output has
//! exactly the vector output's geometry.

use log::debug;
use resvg::{tiny_skia, usvg};

use tickmark_core::{
    color::Color,
    draw::{BackendError, GraphicsContext, TextMetrics},
    geometry::Point,
    waveform::Dataset,
};

use super::{Error, svg::SvgContext};

/// Renders drawing commands into a PNG image.
#[derive(Debug, Default)]
pub struct RasterContext {
    inner: SvgContext,
    size: Option<(u32, u32)>,
    png: Option<Vec<u8>>,
}

impl RasterContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the color painted behind the diagram.
    pub fn with_background(mut self, background: Color) -> Self {
        self.inner = self.inner.with_background(background);
        self
    }

    /// Sets how signal names are measured.
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.inner = self.inner.with_metrics(metrics);
        self
    }

    /// The encoded PNG of the finished surface.
    pub fn png(&self) -> Result<&[u8], Error> {
        self.png.as_deref().ok_or(Error::NotFinished)
    }

    /// Consumes the context, returning the encoded PNG.
    pub fn into_png(self) -> Result<Vec<u8>, Error> {
        self.png.ok_or(Error::NotFinished)
    }
}

fn rasterize(svg: &str, width: u32, height: u32) -> Result<Vec<u8>, BackendError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|err| BackendError::Surface(format!("failed to parse SVG: {err}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        BackendError::Surface(format!("failed to allocate a {width}x{height} pixmap"))
    })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| BackendError::Surface(format!("failed to encode PNG: {err}")))
}

impl GraphicsContext for RasterContext {
    fn begin_surface(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        // An empty diagram still yields a 1x1 image.
        let (width, height) = (width.max(1), height.max(1));
        self.png = None;
        self.size = Some((width, height));
        self.inner.begin_surface(width, height)
    }

    fn finish_surface(&mut self) -> Result<(), BackendError> {
        let (width, height) = self.size.take().ok_or(BackendError::NoSurface)?;
        self.inner.finish_surface()?;
        let svg = self
            .inner
            .svg()
            .map_err(|err| BackendError::Surface(err.to_string()))?;

        let png = rasterize(svg, width, height)?;
        debug!(width, height, bytes = png.len(); "Rasterized surface");
        self.png = Some(png);
        Ok(())
    }

    fn discard_surface(&mut self) {
        self.size = None;
        self.png = None;
        self.inner.discard_surface();
    }

    fn push(&mut self) -> Result<(), BackendError> {
        self.inner.push()
    }

    fn pop(&mut self) -> Result<(), BackendError> {
        self.inner.pop()
    }

    fn scale(&mut self, horizontal: f32, vertical: f32) -> Result<(), BackendError> {
        self.inner.scale(horizontal, vertical)
    }

    fn stroke_color(&mut self, name: &str) -> Result<(), BackendError> {
        self.inner.stroke_color(name)
    }

    fn fill_color(&mut self, name: &str) -> Result<(), BackendError> {
        self.inner.fill_color(name)
    }

    fn fill_opacity(&mut self, opacity: u8) -> Result<(), BackendError> {
        self.inner.fill_opacity(opacity)
    }

    fn stroke_width(&mut self, width: f32) -> Result<(), BackendError> {
        self.inner.stroke_width(width)
    }

    fn font(&mut self, name: &str) -> Result<(), BackendError> {
        self.inner.font(name)
    }

    fn point_size(&mut self, size: f32) -> Result<(), BackendError> {
        self.inner.point_size(size)
    }

    fn line(&mut self, from: Point, to: Point) -> Result<(), BackendError> {
        self.inner.line(from, to)
    }

    fn polygon(&mut self, points: &[Point]) -> Result<(), BackendError> {
        self.inner.polygon(points)
    }

    fn bezier(&mut self, points: &[Point]) -> Result<(), BackendError> {
        self.inner.bezier(points)
    }

    fn text(&mut self, at: Point, text: &str) -> Result<(), BackendError> {
        self.inner.text(at, text)
    }

    fn measure_label_width(
        &mut self,
        dataset: &Dataset,
        font: &str,
        point_size: f32,
    ) -> Result<f32, BackendError> {
        self.inner.measure_label_width(dataset, font, point_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn test_finished_surface_is_png() {
        let mut gc = RasterContext::new().with_metrics(TextMetrics::Approximate);
        gc.begin_surface(40, 20).unwrap();
        gc.line(Point::new(0.0, 10.0), Point::new(40.0, 10.0)).unwrap();
        gc.finish_surface().unwrap();

        let png = gc.into_png().unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_empty_surface_is_clamped() {
        let mut gc = RasterContext::new();
        gc.begin_surface(0, 0).unwrap();
        gc.finish_surface().unwrap();
        assert!(gc.png().unwrap().starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_zero_height_surface_is_clamped() {
        let mut gc = RasterContext::new().with_metrics(TextMetrics::Approximate);
        gc.begin_surface(16, 0).unwrap();
        gc.finish_surface().unwrap();

        let png = gc.into_png().unwrap();
        // IHDR width and height follow the 8 byte signature and chunk header.
        assert_eq!(&png[16..20], &16u32.to_be_bytes());
        assert_eq!(&png[20..24], &1u32.to_be_bytes());
    }

    #[test]
    fn test_discard_leaves_no_image() {
        let mut gc = RasterContext::new();
        gc.begin_surface(10, 10).unwrap();
        gc.discard_surface();
        assert!(matches!(gc.png(), Err(Error::NotFinished)));
        assert!(matches!(gc.finish_surface(), Err(BackendError::NoSurface)));
    }
}
