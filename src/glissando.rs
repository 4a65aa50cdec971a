//! # Glissando Curve
//!
//! The eased pitch slide between the two endpoints of a note.
//!
//! The same closed form drives both the drawn slur (sampled at a fixed count) and
//! the audible pitch during playback (sampled at whatever progress the playhead
//! is at), so the two never disagree.
//!
//! ## Curve
//! With `u = 2t`:
//! - `u < 1`: `progress = u²` (ease in)
//! - `u >= 1`: `progress = -((u - 1)(u - 3) - 1)` (ease out)
//!
//! and `y = start.y + progress / 2 * (end.y - start.y)`. Progress runs from 0 to
//! 2 and meets at 1 when `t = 0.5`.

use crate::geometry::Point2;

/// Points in a drawn slur when the endpoints differ in pitch.
pub const SLUR_SAMPLES: usize = 10;

/// Endpoint pitches closer than this are drawn as a straight segment.
///
/// The smallest positive subnormal `f32` (2^-149), so only identical values count.
pub const STRAIGHT_EPSILON: f32 = f32::MIN_POSITIVE * f32::EPSILON;

/// A slide between two track-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glissando {
    pub start: Point2,
    pub end: Point2,
}

impl Glissando {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// True when both endpoints have (effectively) the same pitch.
    pub fn is_straight(&self) -> bool {
        (self.start.y - self.end.y).abs() < STRAIGHT_EPSILON
    }

    /// Y position of the slide at progress `t`.
    ///
    /// Defined for any `t`; values outside [0, 1] clamp to the endpoints.
    ///
    /// # Example
    /// ```rust
    /// use slidechart::{Glissando, Point2};
    ///
    /// let slide = Glissando::new(Point2::new(0.0, 0.0), Point2::new(4.0, 2.0));
    /// assert_eq!(slide.position_at(0.0), 0.0);
    /// assert_eq!(slide.position_at(0.5), 1.0);
    /// assert_eq!(slide.position_at(1.0), 2.0);
    /// ```
    pub fn position_at(&self, t: f32) -> f32 {
        if self.is_straight() || t <= 0.0 {
            return self.start.y;
        }
        if t >= 1.0 {
            return self.end.y;
        }

        let u = t * 2.0;
        let progress = if u < 1.0 {
            u * u
        } else {
            -((u - 1.0) * (u - 3.0) - 1.0)
        };

        progress / 2.0 * (self.end.y - self.start.y) + self.start.y
    }

    /// Polyline for drawing the slur with `SLUR_SAMPLES` points.
    pub fn slur(&self) -> Vec<Point2> {
        self.slur_points(SLUR_SAMPLES)
    }

    /// Polyline for drawing the slur.
    ///
    /// A straight slide is always two points. Otherwise `count` points (at least
    /// two) evenly spaced in `t`, with x interpolated linearly.
    pub fn slur_points(&self, count: usize) -> Vec<Point2> {
        if self.is_straight() {
            return vec![self.start, self.end];
        }

        let count = count.max(2);
        (0..count)
            .map(|i| {
                let t = i as f32 / (count - 1) as f32;
                let x = self.start.x + (self.end.x - self.start.x) * t;
                Point2::new(x, self.position_at(t))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_note_has_two_point_slur() {
        let slide = Glissando::new(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0));
        assert!(slide.is_straight());
        assert_eq!(slide.slur(), vec![Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)]);
        assert_eq!(slide.position_at(0.5), 0.0);
    }

    #[test]
    fn test_nearly_level_slide_still_curves() {
        let slide = Glissando::new(Point2::new(0.0, 1.0), Point2::new(4.0, 1.000_001));
        assert!(!slide.is_straight());
        assert_eq!(slide.slur().len(), SLUR_SAMPLES);
    }

    #[test]
    fn test_endpoints_are_exact() {
        let slide = Glissando::new(Point2::new(1.0, 0.1), Point2::new(3.0, 0.3));
        assert_eq!(slide.position_at(0.0), 0.1);
        assert_eq!(slide.position_at(1.0), 0.3);
        assert_eq!(slide.position_at(-2.0), 0.1);
        assert_eq!(slide.position_at(7.0), 0.3);
    }

    #[test]
    fn test_midpoint_is_halfway() {
        let slide = Glissando::new(Point2::new(0.0, -2.0), Point2::new(1.0, 2.0));
        assert!(slide.position_at(0.5).abs() < 1e-6);
    }

    #[test]
    fn test_monotonic_rising_and_falling() {
        for (from, to) in [(-3.0f32, 4.0f32), (4.0, -3.0)] {
            let slide = Glissando::new(Point2::new(0.0, from), Point2::new(1.0, to));
            let direction = (to - from).signum();
            let mut last = slide.position_at(0.0);
            for i in 1..=1000 {
                let y = slide.position_at(i as f32 / 1000.0);
                assert!((y - last) * direction >= 0.0, "not monotonic at step {}", i);
                last = y;
            }
        }
    }

    #[test]
    fn test_continuous_across_halfway_seam() {
        let slide = Glissando::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let below = slide.position_at(0.5 - 1e-4);
        let above = slide.position_at(0.5 + 1e-4);
        assert!((above - below).abs() < 1e-3);
    }

    #[test]
    fn test_slur_samples_match_position_at() {
        let slide = Glissando::new(Point2::new(2.0, 1.0), Point2::new(11.0, -1.0));
        let points = slide.slur();
        assert_eq!(points.len(), SLUR_SAMPLES);
        assert_eq!(points[0], Point2::new(2.0, 1.0));
        assert_eq!(points[SLUR_SAMPLES - 1], Point2::new(11.0, -1.0));
        for (i, p) in points.iter().enumerate() {
            let t = i as f32 / (SLUR_SAMPLES - 1) as f32;
            assert_eq!(p.y, slide.position_at(t));
            assert!((p.x - (2.0 + 9.0 * t)).abs() < 1e-5);
        }
    }
}
