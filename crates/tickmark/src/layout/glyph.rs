//! Transition glyphs.
//!
//! Every cell of a signal row is drawn from the pair (previous value, current
//! value). [`plan_transition`] resolves that pair into a [`GlyphPlan`] in one
//! `match`, and [`draw_transition`] replays the plan on a graphics context.

use tickmark_core::{
    draw::{BackendError, GraphicsContext},
    geometry::Point,
    waveform::{SignalValue, ValueKind},
};

use super::CellMetrics;

/// A line segment in cell-relative integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    pub from: (i32, i32),
    pub to: (i32, i32),
}

const fn seg(from: (i32, i32), to: (i32, i32)) -> Segment {
    Segment { from, to }
}

/// Geometry of one cell, relative to its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphPlan {
    segments: Vec<Segment>,
    /// Horizontal offset of the value label, if the cell shows one.
    label: Option<i32>,
}

impl GlyphPlan {
    fn lines(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            label: None,
        }
    }

    fn labelled(segments: Vec<Segment>, label: i32) -> Self {
        Self {
            segments,
            label: Some(label),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn label(&self) -> Option<i32> {
        self.label
    }
}

/// Resolves the glyph for `current` drawn after `previous`.
pub fn plan_transition(
    metrics: &CellMetrics,
    previous: &SignalValue,
    current: &SignalValue,
) -> GlyphPlan {
    use ValueKind::*;

    let w = metrics.cell_width();
    let quarter = w / 4;
    let eighth = w / 8;
    let half = w / 2;
    let three_quarters = w * 3 / 4;
    let high = metrics.high();
    let low = metrics.low();
    let mid = metrics.mid();

    match (current.kind(), previous.kind()) {
        // Falling to zero.
        (Zero, One) => GlyphPlan::lines(vec![
            seg((0, high), (quarter, low)),
            seg((quarter, low), (w, low)),
        ]),
        (Zero, Tristate) => GlyphPlan::lines(vec![
            seg((0, mid), (quarter, low)),
            seg((quarter, low), (w, low)),
        ]),
        (Zero, State) => GlyphPlan::lines(vec![
            seg((0, high), (quarter, low)),
            seg((0, low), (w, low)),
        ]),
        (Zero, Undefined | Zero | Unknown | Pulse | Tick) => {
            GlyphPlan::lines(vec![seg((0, low), (w, low))])
        }

        // Rising to one.
        (One, Zero | Tick | Pulse) => GlyphPlan::lines(vec![
            seg((0, low), (quarter, high)),
            seg((quarter, high), (w, high)),
        ]),
        (One, Tristate) => GlyphPlan::lines(vec![
            seg((0, mid), (quarter, high)),
            seg((quarter, high), (w, high)),
        ]),
        (One, State) => GlyphPlan::lines(vec![
            seg((0, low), (quarter, high)),
            seg((0, high), (w, high)),
        ]),
        (One, Undefined | One | Unknown) => GlyphPlan::lines(vec![seg((0, high), (w, high))]),

        // Single pulse.
        (Pulse | Tick, One | Unknown) => GlyphPlan::lines(vec![
            seg((0, high), (half, high)),
            seg((half, high), (three_quarters, low)),
            seg((three_quarters, low), (w, low)),
        ]),
        (Pulse | Tick, Tristate) => GlyphPlan::lines(vec![
            seg((0, mid), (quarter, high)),
            seg((quarter, high), (half, high)),
            seg((half, high), (three_quarters, low)),
            seg((three_quarters, low), (w, low)),
        ]),
        (Pulse | Tick, State) => GlyphPlan::lines(vec![
            seg((0, low), (quarter, high)),
            seg((0, high), (half, high)),
            seg((half, high), (three_quarters, low)),
            seg((three_quarters, low), (w, low)),
        ]),
        (Pulse | Tick, Undefined | Zero | Pulse | Tick) => GlyphPlan::lines(vec![
            seg((0, low), (quarter, high)),
            seg((quarter, high), (half, high)),
            seg((half, high), (three_quarters, low)),
            seg((three_quarters, low), (w, low)),
        ]),

        // Unknown band.
        (Undefined | Unknown, _) => GlyphPlan::lines(
            (0..4)
                .flat_map(|i| {
                    let x0 = i * quarter;
                    let x1 = (i + 1) * quarter;
                    [seg((x0, low), (x1, high)), seg((x0, high), (x1, low))]
                })
                .collect(),
        ),

        // High impedance.
        (Tristate, Zero | Tick | Pulse) => GlyphPlan::lines(vec![
            seg((0, low), (quarter, mid)),
            seg((quarter, mid), (w, mid)),
        ]),
        (Tristate, One) => GlyphPlan::lines(vec![
            seg((0, high), (quarter, mid)),
            seg((quarter, mid), (w, mid)),
        ]),
        (Tristate, State) => GlyphPlan::lines(vec![
            seg((0, high), (eighth, mid)),
            seg((0, low), (eighth, mid)),
            seg((eighth, mid), (w, mid)),
        ]),
        (Tristate, Undefined | Unknown | Tristate) => {
            GlyphPlan::lines(vec![seg((0, mid), (w, mid))])
        }

        // Named state.
        (State, Zero | Tick | Pulse) => GlyphPlan::labelled(
            vec![
                seg((0, low), (quarter, high)),
                seg((quarter, high), (w, high)),
                seg((0, low), (w, low)),
            ],
            quarter,
        ),
        (State, One) => GlyphPlan::labelled(
            vec![
                seg((0, high), (quarter, low)),
                seg((quarter, low), (w, low)),
                seg((0, high), (w, high)),
            ],
            quarter,
        ),
        (State, Tristate) => GlyphPlan::labelled(
            vec![
                seg((0, mid), (eighth, low)),
                seg((0, mid), (eighth, high)),
                seg((eighth, low), (w, low)),
                seg((eighth, high), (w, high)),
            ],
            eighth,
        ),
        (State, Undefined | Unknown | State) if previous.text() == current.text() => {
            GlyphPlan::lines(vec![seg((0, high), (w, high)), seg((0, low), (w, low))])
        }
        (State, Undefined | Unknown | State) => GlyphPlan::labelled(
            vec![
                seg((0, high), (quarter, low)),
                seg((0, low), (quarter, high)),
                seg((quarter, high), (w, high)),
                seg((quarter, low), (w, low)),
            ],
            quarter,
        ),
    }
}

/// Draws one cell with its top-left corner at `origin`.
pub fn draw_transition<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    metrics: &CellMetrics,
    origin: (i32, i32),
    previous: &SignalValue,
    current: &SignalValue,
) -> Result<(), BackendError> {
    let (x, y) = origin;
    let plan = plan_transition(metrics, previous, current);

    for segment in plan.segments() {
        gc.line(
            Point::from_ints(x + segment.from.0, y + segment.from.1),
            Point::from_ints(x + segment.to.0, y + segment.to.1),
        )?;
    }

    if let Some(dx) = plan.label() {
        draw_label(
            gc,
            metrics,
            (x + dx, y + metrics.text_baseline()),
            current.text(),
        )?;
    }
    Ok(())
}

/// Draws text with the thin stroke width, then restores the regular width.
pub(crate) fn draw_label<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    metrics: &CellMetrics,
    at: (i32, i32),
    text: &str,
) -> Result<(), BackendError> {
    gc.stroke_width(metrics.thin_line_width() as f32)?;
    gc.text(Point::from_ints(at.0, at.1), text)?;
    gc.stroke_width(metrics.line_width() as f32)
}
