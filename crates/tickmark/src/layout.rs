//! Timing diagram layout.
//!
//! The orchestrator lays the dataset out in rows of fixed-size cells and
//! drives the glyph renderer and the annotator over a
//! [`GraphicsContext`]. All geometry is computed in integer diagram units
//! from a [`CellMetrics`] value, so every backend receives the same
//! coordinates.
//!
//! ```text
//!  margin  label   sep   step 0     step 1     step 2
//! ├──┼────────┼──┼──────────┼──────────┼──────────┤
//! │  clk         │ ╱‾‾╲____ │ ╱‾‾╲____ │ ╱‾‾╲____ │  cell height
//! │  data        │ ╳╳╳╳╳╳╳╳ │ ╱‾‾‾‾‾‾‾ │ ╲_______ │
//! │              │   delay slot rows (per signal) │
//! ```

mod annotate;
mod glyph;

pub use annotate::{draw_delay, draw_dependency};
pub use glyph::{GlyphPlan, Segment, draw_transition, plan_transition};

use log::{debug, info};

use tickmark_core::{
    draw::{GraphicsContext, with_saved_state},
    geometry::Point,
    waveform::{Dataset, SignalNotFound, SignalValue},
};

use crate::{
    TickmarkError,
    config::{RenderConfig, Sizing},
};

/// Stroke color of the optional step grid, a light grey.
pub const GRID_COLOR: &str = "#cccccc";

/// Cell geometry derived from a [`RenderConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMetrics {
    cell_height: i32,
    cell_width: i32,
    line_width: i32,
    thin_line_width: i32,
    separation: i32,
}

impl CellMetrics {
    pub fn new(config: &RenderConfig) -> Self {
        let cell_height = config.cell_height() as i32;
        Self {
            cell_height,
            cell_width: config.cell_width() as i32,
            line_width: config.line_width() as i32,
            thin_line_width: config.thin_line_width() as i32,
            separation: cell_height / 8,
        }
    }

    pub fn cell_height(&self) -> i32 {
        self.cell_height
    }

    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    pub fn line_width(&self) -> i32 {
        self.line_width
    }

    pub fn thin_line_width(&self) -> i32 {
        self.thin_line_width
    }

    /// Offset of the high rail from the top of the cell.
    pub fn high(&self) -> i32 {
        self.separation
    }

    /// Offset of the low rail from the top of the cell.
    pub fn low(&self) -> i32 {
        self.cell_height - self.separation
    }

    /// Offset of the tri-state level from the top of the cell.
    pub fn mid(&self) -> i32 {
        self.cell_height / 2
    }

    /// Baseline of signal names and state labels.
    pub fn text_baseline(&self) -> i32 {
        self.cell_height * 3 / 4
    }

    /// Height of one delay annotation row.
    pub fn delay_slot(&self) -> i32 {
        self.cell_height * 3 / 8
    }

    /// Distance from a delay slot's top to its horizontal run.
    pub fn delay_clearance(&self) -> i32 {
        self.cell_height / 4
    }

    /// Gap between the label column and the first time step.
    pub fn column_separator(&self) -> i32 {
        self.cell_width / 4
    }

    /// Outer margin left and right of the diagram.
    pub fn margin(&self) -> i32 {
        self.cell_width / 8
    }

    /// Height of a signal row including its delay slots.
    pub fn row_height(&self, max_delay_slots: u32) -> i32 {
        self.cell_height + self.delay_slot() * max_delay_slots as i32
    }
}

/// Unscaled diagram dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseSize {
    pub width: i32,
    pub height: i32,
    pub label_width: i32,
}

/// Computes the diagram size before scaling.
///
/// The label column is measured by the backend with the configured font.
pub fn base_size<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    dataset: &Dataset,
    config: &RenderConfig,
) -> Result<BaseSize, TickmarkError> {
    let metrics = CellMetrics::new(config);
    let label_width = gc.measure_label_width(dataset, config.font(), config.font_size() as f32)?
        as i32;

    let width =
        metrics.margin() * 2 + label_width + metrics.cell_width() * dataset.max_length() as i32;
    let height = dataset
        .signals()
        .map(|signal| metrics.row_height(signal.max_delay_slots()))
        .sum();

    let size = BaseSize {
        width,
        height,
        label_width,
    };
    debug!(size:?; "Computed base size");
    Ok(size)
}

/// Renders `dataset` at its natural size multiplied by `scale`.
pub fn render<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    dataset: &Dataset,
    config: &RenderConfig,
    scale: f64,
) -> Result<(), TickmarkError> {
    let base = base_size(gc, dataset, config)?;
    let width = (scale * f64::from(base.width)) as u32;
    let height = (scale * f64::from(base.height)) as u32;

    render_on_surface(
        gc,
        dataset,
        config,
        &base,
        (width, height),
        (scale as f32, scale as f32),
    )
}

/// Renders `dataset` stretched onto a `width` x `height` surface.
///
/// With `fix_aspect` both axes use the smaller of the two scale factors, so
/// the diagram keeps its proportions and leaves the rest of the surface empty.
pub fn render_to_size<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    dataset: &Dataset,
    config: &RenderConfig,
    width: u32,
    height: u32,
    fix_aspect: bool,
) -> Result<(), TickmarkError> {
    let base = base_size(gc, dataset, config)?;
    let factor = |target: u32, natural: i32| {
        if natural > 0 {
            f64::from(target) / f64::from(natural)
        } else {
            1.0
        }
    };
    let mut horizontal = factor(width, base.width);
    let mut vertical = factor(height, base.height);
    if fix_aspect {
        let common = horizontal.min(vertical);
        horizontal = common;
        vertical = common;
    }

    render_on_surface(
        gc,
        dataset,
        config,
        &base,
        (width, height),
        (horizontal as f32, vertical as f32),
    )
}

/// Dispatches on a [`Sizing`] to [`render`] or [`render_to_size`].
pub fn render_sized<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    dataset: &Dataset,
    config: &RenderConfig,
    sizing: Sizing,
) -> Result<(), TickmarkError> {
    match sizing {
        Sizing::Scale(scale) => render(gc, dataset, config, scale),
        Sizing::Page {
            width,
            height,
            fix_aspect,
        } => render_to_size(gc, dataset, config, width, height, fix_aspect),
    }
}

fn render_on_surface<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    dataset: &Dataset,
    config: &RenderConfig,
    base: &BaseSize,
    surface: (u32, u32),
    scale: (f32, f32),
) -> Result<(), TickmarkError> {
    info!(width = surface.0, height = surface.1, hscale = scale.0, vscale = scale.1; "Rendering timing diagram");
    gc.begin_surface(surface.0, surface.1)?;

    match render_common(gc, dataset, config, base, scale) {
        Ok(()) => Ok(gc.finish_surface()?),
        Err(err) => {
            gc.discard_surface();
            Err(err)
        }
    }
}

fn render_common<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    dataset: &Dataset,
    config: &RenderConfig,
    base: &BaseSize,
    scale: (f32, f32),
) -> Result<(), TickmarkError> {
    let metrics = CellMetrics::new(config);
    let first_column = base.label_width + metrics.column_separator();

    with_saved_state(gc, |gc| {
        gc.scale(scale.0, scale.1)?;
        gc.font(config.font())?;
        gc.point_size(config.font_size() as f32)?;

        if config.grid() {
            gc.stroke_width(1.0)?;
            gc.stroke_color(GRID_COLOR)?;
            for column in 0..=dataset.max_length() as i32 {
                let x = first_column + column * metrics.cell_width();
                gc.line(Point::from_ints(x, 0), Point::from_ints(x, base.height))?;
            }
        }

        gc.stroke_width(metrics.line_width() as f32)?;
        gc.stroke_color("black")?;

        let mut row_tops = Vec::with_capacity(dataset.signal_count());
        let mut y = 0;
        for signal in dataset.signals() {
            debug!(signal = signal.name(), y, steps = signal.len(); "Laying out row");
            glyph::draw_label(
                gc,
                &metrics,
                (metrics.margin(), y + metrics.text_baseline()),
                signal.name(),
            )?;
            row_tops.push(y);

            let mut x = first_column;
            let mut previous = SignalValue::undefined();
            for value in signal.values() {
                draw_transition(gc, &metrics, (x, y), &previous, value)?;
                previous = value.clone();
                x += metrics.cell_width();
            }
            y += metrics.row_height(signal.max_delay_slots());
        }

        let row_top = |name: &str| {
            dataset
                .position(name)
                .and_then(|row| row_tops.get(row).copied())
                .ok_or_else(|| SignalNotFound::new(name))
        };
        let anchor_x = |step: usize| {
            first_column + metrics.margin() + metrics.cell_width() * step as i32
        };

        gc.stroke_width(metrics.thin_line_width() as f32)?;
        for dependency in dataset.dependencies() {
            let from = (
                anchor_x(dependency.trigger_step()),
                metrics.mid() + row_top(dependency.trigger())?,
            );
            let to = (
                anchor_x(dependency.effect_step()),
                metrics.mid() + row_top(dependency.effect())?,
            );
            draw_dependency(gc, &metrics, from, to)?;
        }

        for delay in dataset.delays() {
            let edge = delay.edge();
            let trigger_top = row_top(edge.trigger())?;
            let from = (
                anchor_x(edge.trigger_step()),
                metrics.mid() + trigger_top,
            );
            let to = (
                anchor_x(edge.effect_step()),
                metrics.mid() + row_top(edge.effect())?,
            );
            let annotation_y = trigger_top
                + metrics.cell_height()
                + metrics.delay_slot() * delay.offset() as i32
                + metrics.delay_clearance();
            draw_delay(gc, &metrics, from, to, annotation_y, delay.text())?;
        }

        Ok(())
    })
}
