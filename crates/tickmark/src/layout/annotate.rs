//! Dependency arrows and delay brackets.

use tickmark_core::{
    draw::{BackendError, GraphicsContext, with_saved_state},
    geometry::Point,
};

use super::CellMetrics;

const ACCENT: &str = "blue";

fn accent<G: GraphicsContext + ?Sized>(gc: &mut G) -> Result<(), BackendError> {
    gc.stroke_color(ACCENT)?;
    gc.fill_color(ACCENT)
}

fn polygon<G: GraphicsContext + ?Sized>(gc: &mut G, points: &[(i32, i32)]) -> Result<(), BackendError> {
    let points: Vec<_> = points.iter().map(|&(x, y)| Point::from_ints(x, y)).collect();
    gc.polygon(&points)
}

/// Draws an arrow from the transition at `from` to the transition at `to`.
///
/// Transitions in the same column get a straight vertical arrow, all others a
/// curve ending in a left-pointing head just short of `to`.
pub fn draw_dependency<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    metrics: &CellMetrics,
    from: (i32, i32),
    to: (i32, i32),
) -> Result<(), BackendError> {
    let ht = metrics.cell_height();
    let w = metrics.cell_width();
    let (x0, y0) = from;
    let (x1, mut y1) = to;

    with_saved_state(gc, |gc| {
        accent(gc)?;

        if x0 == x1 {
            let half_width = w / 20;
            let length = ht / 6;
            let notch = ht / 10;
            // Pointing down when the effect is below the trigger.
            let dir = if y0 < y1 { 1 } else { -1 };

            y1 -= dir * (ht / 4);
            gc.line(Point::from_ints(x0, y0), Point::from_ints(x1, y1))?;
            polygon(
                gc,
                &[
                    (x1, y1),
                    (x1 - half_width, y1 - dir * length),
                    (x1, y1 - dir * notch),
                    (x1 + half_width, y1 - dir * length),
                ],
            )
        } else {
            let half_height = ht / 10;
            let back = w / 12;
            let notch = w / 20;
            let x1 = x1 - w / 16;
            let control = Point::from_ints((x0 + x1) / 2, y1);

            gc.bezier(&[
                Point::from_ints(x0, y0),
                control,
                control,
                Point::from_ints(x1, y1),
            ])?;
            polygon(
                gc,
                &[
                    (x1, y1),
                    (x1 - back, y1 - half_height),
                    (x1 - notch, y1),
                    (x1 - back, y1 + half_height),
                ],
            )
        }
    })
}

/// Draws a labelled delay bracket between two transitions.
///
/// `annotation_y` is the height of the horizontal run, inside one of the
/// trigger's delay slots.
pub fn draw_delay<G: GraphicsContext + ?Sized>(
    gc: &mut G,
    metrics: &CellMetrics,
    from: (i32, i32),
    to: (i32, i32),
    annotation_y: i32,
    text: &str,
) -> Result<(), BackendError> {
    let ht = metrics.cell_height();
    let w = metrics.cell_width();
    let (x0, y0) = from;
    let (x1, y1) = to;
    let y2 = annotation_y;

    with_saved_state(gc, |gc| {
        accent(gc)?;

        if x0 == x1 {
            return gc.line(Point::from_ints(x0, y0), Point::from_ints(x1, y1));
        }

        gc.text(
            Point::from_ints(x0 + metrics.column_separator(), y2 - ht / 16),
            text,
        )?;
        gc.line(Point::from_ints(x0, y0), Point::from_ints(x0, y2 + ht / 8))?;
        gc.line(Point::from_ints(x1, y1), Point::from_ints(x1, y2 - ht / 8))?;
        gc.line(Point::from_ints(x0, y2), Point::from_ints(x1, y2))?;
        polygon(
            gc,
            &[
                (x1, y2),
                (x1 - w / 12, y2 - ht / 10),
                (x1 - w / 20, y2),
                (x1 - w / 12, y2 + ht / 10),
            ],
        )
    })
}

#[cfg(test)]
mod tests {
    use tickmark_core::draw::{DrawCommand, Recorder};

    use super::*;
    use crate::config::RenderConfig;

    fn recorder() -> Recorder {
        let mut gc = Recorder::new();
        gc.begin_surface(1000, 1000).unwrap();
        gc
    }

    fn points(coords: &[(f32, f32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_vertical_dependency_pointing_down() {
        let m = CellMetrics::new(&RenderConfig::default());
        let mut gc = recorder();
        draw_dependency(&mut gc, &m, (100, 16), (100, 48)).unwrap();

        assert_eq!(
            &gc.commands()[1..],
            [
                DrawCommand::Push,
                DrawCommand::StrokeColor("blue".to_string()),
                DrawCommand::FillColor("blue".to_string()),
                DrawCommand::Line {
                    from: Point::new(100.0, 16.0),
                    to: Point::new(100.0, 40.0)
                },
                DrawCommand::Polygon(points(&[
                    (100.0, 40.0),
                    (97.0, 35.0),
                    (100.0, 37.0),
                    (103.0, 35.0)
                ])),
                DrawCommand::Pop,
            ]
        );
    }

    #[test]
    fn test_vertical_dependency_pointing_up() {
        let m = CellMetrics::new(&RenderConfig::default());
        let mut gc = recorder();
        draw_dependency(&mut gc, &m, (100, 48), (100, 16)).unwrap();

        let polygon = gc
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Polygon(p) => Some(p.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            polygon,
            points(&[(100.0, 24.0), (97.0, 29.0), (100.0, 27.0), (103.0, 29.0)])
        );
    }

    #[test]
    fn test_curved_dependency() {
        let m = CellMetrics::new(&RenderConfig::default());
        let mut gc = recorder();
        draw_dependency(&mut gc, &m, (100, 16), (228, 48)).unwrap();

        let beziers: Vec<_> = gc
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Bezier(p) => Some(p.clone()),
                _ => None,
            })
            .collect();
        // End shortened by cellW/16, controls at the midpoint on the end row.
        assert_eq!(
            beziers,
            [points(&[(100.0, 16.0), (162.0, 48.0), (162.0, 48.0), (224.0, 48.0)])]
        );
        assert!(gc.commands().contains(&DrawCommand::Polygon(points(&[
            (224.0, 48.0),
            (219.0, 45.0),
            (221.0, 48.0),
            (219.0, 51.0)
        ]))));
        assert_eq!(gc.depth(), 0);
    }

    #[test]
    fn test_delay_same_column_is_plain_line() {
        let m = CellMetrics::new(&RenderConfig::default());
        let mut gc = recorder();
        draw_delay(&mut gc, &m, (100, 16), (100, 48), 40, "5ns").unwrap();

        assert_eq!(gc.primitives().count(), 1);
        assert!(!gc.primitives().any(|c| matches!(c, DrawCommand::Text { .. })));
    }

    #[test]
    fn test_delay_bracket() {
        let m = CellMetrics::new(&RenderConfig::default());
        let mut gc = recorder();
        draw_delay(&mut gc, &m, (100, 16), (228, 48), 40, "5ns").unwrap();

        let primitives: Vec<_> = gc.primitives().cloned().collect();
        assert_eq!(
            primitives,
            [
                DrawCommand::Text {
                    at: Point::new(116.0, 38.0),
                    text: "5ns".to_string()
                },
                DrawCommand::Line {
                    from: Point::new(100.0, 16.0),
                    to: Point::new(100.0, 44.0)
                },
                DrawCommand::Line {
                    from: Point::new(228.0, 48.0),
                    to: Point::new(228.0, 36.0)
                },
                DrawCommand::Line {
                    from: Point::new(100.0, 40.0),
                    to: Point::new(228.0, 40.0)
                },
                DrawCommand::Polygon(points(&[
                    (228.0, 40.0),
                    (223.0, 37.0),
                    (225.0, 40.0),
                    (223.0, 43.0)
                ])),
            ]
        );
    }
}
