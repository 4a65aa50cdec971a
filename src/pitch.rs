//! # Pitch Mapping
//!
//! Equal-temperament math between track-space y positions, semitone distances
//! and playback pitch multipliers, plus the beat grid used for rhythm snapping.
//!
//! ## Vertical layout
//! The center line of the canvas is semitone 0 (C5). Half of the visible pitch
//! span is one octave, so the top edge is +12 and the bottom edge -12. Snapping
//! allows one extra semitone beyond either edge.
//!
//! ## Pitch multiplier
//! Audio handles take a multiplier relative to the clip's native pitch, which is
//! tuned to A4 (440 Hz). A4 sits three semitones below C5, so
//! `frequency_ratio(-3.0) == 1.0`.

use crate::view::ViewParameters;

pub const CHROMATIC_SCALE_TONES: f32 = 12.0;

/// Frequency ratio between adjacent semitones, 2^(1/12).
pub const TEMPERAMENT: f32 = 1.059_463_1;

/// Semitones from the canvas center (C5) up to the reference pitch, plus three.
pub const REFERENCE_OFFSET: f32 = 3.0;

/// The semitone distance whose frequency ratio is exactly 1.
pub const REFERENCE_SEMITONE: f32 = -REFERENCE_OFFSET;

/// Largest semitone distance the chromatic snap can reach, either direction.
pub const MAX_SNAP_SEMITONES: f32 = 13.0;

/// Semitone distance from C5 of a track-space y position.
pub fn pitch_of(y: f32, view: &ViewParameters) -> f32 {
    y / view.half_visible_height() * CHROMATIC_SCALE_TONES
}

/// Track-space y position of a semitone distance from C5.
pub fn semitone_to_y(semitones: f32, view: &ViewParameters) -> f32 {
    semitones / CHROMATIC_SCALE_TONES * view.half_visible_height()
}

/// Snap a y position to the nearest chromatic step, clamped to ±13 semitones.
///
/// # Example
/// ```rust
/// use slidechart::{nearest_chromatic_pitch, pitch_of, ViewParameters};
///
/// let view = ViewParameters::default();
/// let snapped = nearest_chromatic_pitch(1.1, &view);
/// assert!((pitch_of(snapped, &view) - 3.0).abs() < 1e-5);
/// ```
pub fn nearest_chromatic_pitch(y: f32, view: &ViewParameters) -> f32 {
    let semitone = pitch_of(y, view)
        .round()
        .clamp(-MAX_SNAP_SEMITONES, MAX_SNAP_SEMITONES);
    semitone_to_y(semitone, view)
}

/// Playback pitch multiplier for a semitone distance from C5.
pub fn frequency_ratio(semitone_distance: f32) -> f32 {
    TEMPERAMENT.powf(semitone_distance + REFERENCE_OFFSET)
}

/// Track units between rhythm-snap positions.
///
/// `subdivision` is the note value denominator: 4 snaps to quarter notes (one
/// beat), 8 to eighths, and so on.
pub fn beat_spacing(view: &ViewParameters, subdivision: u32) -> f32 {
    view.horizontal_scale() / (subdivision as f32 / 4.0)
}

/// Snap a track-relative x position to the nearest subdivision of a beat.
pub fn nearest_beat(x: f32, view: &ViewParameters, subdivision: u32) -> f32 {
    let spacing = beat_spacing(view, subdivision);
    (x / spacing).round() * spacing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_semitone_is_unity() {
        assert_eq!(frequency_ratio(REFERENCE_SEMITONE), 1.0);
    }

    #[test]
    fn test_frequency_ratio_strictly_increasing() {
        let mut last = frequency_ratio(-30.0);
        for i in -299..=300 {
            let ratio = frequency_ratio(i as f32 / 10.0);
            assert!(ratio > last, "not increasing at {}", i);
            last = ratio;
        }
    }

    #[test]
    fn test_octave_doubles() {
        let c5 = frequency_ratio(0.0);
        let c6 = frequency_ratio(12.0);
        assert!((c6 / c5 - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_of_edges() {
        let view = ViewParameters::default();
        let half = view.half_visible_height();
        assert_eq!(pitch_of(0.0, &view), 0.0);
        assert_eq!(pitch_of(half, &view), 12.0);
        assert_eq!(pitch_of(-half, &view), -12.0);
    }

    #[test]
    fn test_nearest_chromatic_minimizes_distance() {
        let view = ViewParameters::default();
        let step = semitone_to_y(1.0, &view);
        let mut y = -6.0f32;
        while y <= 6.0 {
            let snapped = nearest_chromatic_pitch(y, &view);
            let semitone = pitch_of(snapped, &view);
            assert!((semitone - semitone.round()).abs() < 1e-4);
            assert!(semitone.abs() <= MAX_SNAP_SEMITONES + 1e-4);

            // No other in-range semitone is strictly closer.
            for candidate in -13..=13 {
                let other = semitone_to_y(candidate as f32, &view);
                assert!((snapped - y).abs() <= (other - y).abs() + step * 1e-3);
            }
            y += 0.037;
        }
    }

    #[test]
    fn test_nearest_chromatic_clamps() {
        let view = ViewParameters::default();
        let top = nearest_chromatic_pitch(100.0, &view);
        let bottom = nearest_chromatic_pitch(-100.0, &view);
        assert!((pitch_of(top, &view) - 13.0).abs() < 1e-4);
        assert!((pitch_of(bottom, &view) + 13.0).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_beat() {
        let view = ViewParameters::default(); // 5 units per beat
        assert_eq!(nearest_beat(7.4, &view, 4), 5.0);
        assert_eq!(nearest_beat(7.6, &view, 4), 10.0);
        assert_eq!(nearest_beat(6.0, &view, 8), 5.0);
        assert_eq!(nearest_beat(6.3, &view, 8), 7.5);
    }
}
