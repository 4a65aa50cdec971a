//! Edit cursor snapping.
//!
//! The cursor lives in world space (track offset applied). Rhythm snapping works
//! on the track-relative x and converts back; chroma snapping only touches y.

use crate::geometry::Point2;
use crate::pitch::{nearest_beat, nearest_chromatic_pitch};
use crate::view::ViewParameters;

/// Cursor and preview toggles from the editor panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSettings {
    pub snap_to_rhythm: bool,
    pub snap_to_chroma: bool,
    /// Note value denominator for rhythm snapping (4 = quarter notes).
    pub subdivision: u32,
    /// Sound the slide voice while placing or dragging notes.
    pub preview_note: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            snap_to_rhythm: false,
            snap_to_chroma: false,
            subdivision: 4,
            preview_note: false,
        }
    }
}

/// Apply the enabled snaps to a world-space cursor position.
pub fn snap_cursor(
    world: Point2,
    track_offset: f32,
    view: &ViewParameters,
    snap: &SnapSettings,
) -> Point2 {
    let mut pos = world;

    if snap.snap_to_rhythm {
        pos.x = nearest_beat(world.x - track_offset, view, snap.subdivision) + track_offset;
    }

    // Degenerate spacing (e.g. subdivision 0) produces NaN.
    if pos.x.is_nan() {
        pos.x = 0.0;
    }

    if snap.snap_to_chroma {
        pos.y = nearest_chromatic_pitch(pos.y, view);
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::pitch_of;

    #[test]
    fn test_no_snap_passes_through() {
        let view = ViewParameters::default();
        let pos = snap_cursor(Point2::new(1.3, 0.7), -4.0, &view, &SnapSettings::default());
        assert_eq!(pos, Point2::new(1.3, 0.7));
    }

    #[test]
    fn test_rhythm_snap_is_track_relative() {
        let view = ViewParameters::default();
        let snap = SnapSettings { snap_to_rhythm: true, ..SnapSettings::default() };
        // Track is scrolled 3 units left: beats sit at world x = -3, 2, 7, ...
        let pos = snap_cursor(Point2::new(1.0, 0.0), -3.0, &view, &snap);
        assert_eq!(pos.x, 2.0);
    }

    #[test]
    fn test_chroma_snap() {
        let view = ViewParameters::default();
        let snap = SnapSettings { snap_to_chroma: true, ..SnapSettings::default() };
        let pos = snap_cursor(Point2::new(0.0, 0.4), 0.0, &view, &snap);
        assert!((pitch_of(pos.y, &view) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_subdivision_falls_back_to_origin() {
        let view = ViewParameters::default();
        let snap = SnapSettings { snap_to_rhythm: true, subdivision: 0, ..SnapSettings::default() };
        let pos = snap_cursor(Point2::new(0.0, 0.0), 0.0, &view, &snap);
        assert_eq!(pos.x, 0.0);
    }
}
