//! Label column measurement.
//!
//! The layout reserves a column on the left for signal names. Its width comes
//! from the backend: backends that render text themselves shape the names
//! with cosmic-text, the others use a character-count approximation.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{debug, info};

use crate::waveform::Dataset;

/// How a backend measures the label column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextMetrics {
    /// Shape every signal name with the system fonts.
    #[default]
    Shaped,
    /// `0.7 * longest_name_chars * point_size`, for backends without font access.
    Approximate,
}

impl TextMetrics {
    /// Width of the widest signal name of `dataset`.
    pub fn label_width(self, dataset: &Dataset, font: &str, point_size: f32) -> f32 {
        let width = match self {
            Self::Shaped => TEXT_MANAGER
                .get_or_init(TextManager::new)
                .widest(dataset, font, point_size),
            Self::Approximate => approximate_label_width(dataset, point_size),
        };
        debug!(metrics:? = self, font, point_size, width; "Measured label column");
        width
    }
}

/// Approximates the label column width from the longest signal name.
///
/// The result is truncated to whole units.
///
/// ```
/// # use tickmark_core::{draw::approximate_label_width, waveform::Dataset};
/// let mut data = Dataset::new();
/// data.find_or_create("clk");
/// data.find_or_create("reset");
/// assert_eq!(approximate_label_width(&data, 12.0), 42.0);
/// ```
pub fn approximate_label_width(dataset: &Dataset, point_size: f32) -> f32 {
    let longest = dataset
        .signals()
        .map(|signal| signal.name().chars().count())
        .max()
        .unwrap_or(0);
    (0.7 * longest as f32 * point_size).trunc()
}

/// Holds a reusable FontSystem; creating one scans the system fonts.
struct TextManager {
    font_system: Arc<Mutex<FontSystem>>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }

    fn widest(&self, dataset: &Dataset, font: &str, point_size: f32) -> f32 {
        dataset
            .signals()
            .map(|signal| self.text_width(signal.name(), font, point_size))
            .fold(0.0, f32::max)
    }

    fn text_width(&self, text: &str, font: &str, point_size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let metrics = Metrics::new(point_size, point_size * 1.15);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(font));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|last| last.x + last.w))
            .fold(None, |widest: Option<f32>, w| {
                Some(widest.map_or(w, |widest| widest.max(w)))
            });

        // No fonts available at all.
        width.unwrap_or_else(|| text.chars().count() as f32 * point_size * 0.55)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn dataset(names: &[&str]) -> Dataset {
        let mut data = Dataset::new();
        for name in names {
            data.find_or_create(name);
        }
        data
    }

    #[test]
    fn test_approximate_uses_longest_name() {
        let data = dataset(&["a", "address", "ok"]);
        assert_approx_eq!(f32, approximate_label_width(&data, 10.0), 49.0);
    }

    #[test]
    fn test_approximate_truncates() {
        let data = dataset(&["abc"]);
        // 0.7 * 3 * 11 = 23.1
        assert_approx_eq!(f32, approximate_label_width(&data, 11.0), 23.0);
    }

    #[test]
    fn test_empty_dataset_has_no_label_column() {
        let data = Dataset::new();
        assert_approx_eq!(f32, TextMetrics::Approximate.label_width(&data, "Helvetica", 12.0), 0.0);
        assert_approx_eq!(f32, TextMetrics::Shaped.label_width(&data, "Helvetica", 12.0), 0.0);
    }

    #[test]
    fn test_shaped_width_grows_with_text() {
        let short = dataset(&["a"]);
        let long = dataset(&["a much longer signal name"]);
        let short = TextMetrics::Shaped.label_width(&short, "sans-serif", 12.0);
        let long = TextMetrics::Shaped.label_width(&long, "sans-serif", 12.0);
        assert!(short > 0.0);
        assert!(long > short);
    }
}
