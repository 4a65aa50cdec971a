//! Measure bar layout for the editing canvas.
//!
//! Bars sit every `scroll_speed * note_spacing * time_signature` track units.
//! Enough of them are laid out to cover the viewport plus one, anchored on the
//! measure the scroll offset is currently in.

use crate::view::{ViewParameters, Viewport};

/// Upper bound on bar lines laid out at once, for extreme zoom levels.
pub const MAX_MEASURE_LINES: usize = 512;

/// One bar line, in track space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureLine {
    /// Zero-based measure number the bar starts.
    pub measure: i64,
    pub x: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasureGridLayout {
    spacing: f32,
    line_count: usize,
}

impl MeasureGridLayout {
    pub fn new(view: &ViewParameters, viewport: &Viewport) -> Self {
        let mut layout = Self {
            spacing: 0.0,
            line_count: 0,
        };
        layout.relayout(view, viewport);
        layout
    }

    /// Recompute spacing and bar count after a view or viewport change.
    pub fn relayout(&mut self, view: &ViewParameters, viewport: &Viewport) {
        self.spacing = view.horizontal_scale() * view.time_signature as f32;
        self.line_count = if self.spacing > 0.0 && self.spacing.is_finite() {
            let bars = (viewport.visible_world_width() / self.spacing).ceil() + 1.0;
            bars.min(MAX_MEASURE_LINES as f32) as usize
        } else {
            0
        };
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Bar lines for the given scroll offset. Bars before the timeline origin
    /// are left out.
    pub fn lines(&self, track_offset: f32) -> Vec<MeasureLine> {
        if self.line_count == 0 {
            return Vec::new();
        }

        let first = (-track_offset / self.spacing).trunc() as i64;
        (0..self.line_count as i64)
            .map(|i| {
                let measure = first.saturating_add(i);
                MeasureLine {
                    measure,
                    x: measure as f32 * self.spacing,
                }
            })
            .filter(|line| line.x >= 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> MeasureGridLayout {
        // 5 units per beat, 4 beats per bar, 20 units wide viewport
        let view = ViewParameters::default();
        let viewport = Viewport { half_height: 5.0, aspect: 2.0 };
        MeasureGridLayout::new(&view, &viewport)
    }

    #[test]
    fn test_spacing_and_count() {
        let grid = layout();
        assert_eq!(grid.spacing(), 20.0);
        assert_eq!(grid.line_count(), 2);
    }

    #[test]
    fn test_lines_at_origin() {
        let grid = layout();
        let xs: Vec<f32> = grid.lines(0.0).iter().map(|l| l.x).collect();
        assert_eq!(xs, vec![0.0, 20.0]);
    }

    #[test]
    fn test_lines_follow_scroll() {
        let grid = layout();
        let lines = grid.lines(-45.0);
        assert_eq!(lines[0], MeasureLine { measure: 2, x: 40.0 });
        assert_eq!(lines[1], MeasureLine { measure: 3, x: 60.0 });
    }

    #[test]
    fn test_lines_before_origin_are_skipped() {
        let view = ViewParameters::default();
        let viewport = Viewport { half_height: 5.0, aspect: 8.0 }; // 80 wide -> 5 lines
        let grid = MeasureGridLayout::new(&view, &viewport);
        let lines = grid.lines(30.0);
        assert!(lines.iter().all(|l| l.x >= 0.0));
        assert_eq!(lines.first().map(|l| l.x), Some(0.0));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_extreme_zoom_out_is_capped() {
        let view = ViewParameters {
            scroll_speed: 1e-20,
            ..ViewParameters::default()
        };
        let grid = MeasureGridLayout::new(&view, &Viewport::default());
        assert_eq!(grid.line_count(), MAX_MEASURE_LINES);

        let lines = grid.lines(-10.0);
        assert_eq!(lines.len(), MAX_MEASURE_LINES);
        assert!(lines.iter().all(|l| l.x.is_finite() && l.x >= 0.0));
    }

    #[test]
    fn test_small_scroll_speed_stays_bounded() {
        let view = ViewParameters {
            scroll_speed: 1e-6,
            ..ViewParameters::default()
        };
        let grid = MeasureGridLayout::new(&view, &Viewport::default());
        assert_eq!(grid.lines(0.0).len(), MAX_MEASURE_LINES);
    }

    #[test]
    fn test_relayout_after_zoom() {
        let mut grid = layout();
        let mut view = ViewParameters::default();
        view.scroll_speed = 0.5;
        grid.relayout(&view, &Viewport { half_height: 5.0, aspect: 2.0 });
        assert_eq!(grid.spacing(), 10.0);
        assert_eq!(grid.line_count(), 3);
    }
}
