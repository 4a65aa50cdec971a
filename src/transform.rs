//! # Coordinate Transform
//!
//! Bidirectional mapping between data space (what is saved) and track space
//! (what is edited).
//!
//! Only data-space values are persisted, so every piece of live geometry must be
//! recoverable from them under any [`ViewParameters`]:
//!
//! ```text
//! data  --data_to_track-->  track  (x * note_spacing * scroll_speed,
//!                                   y * vertical_span / PITCH_RANGE)
//! track --track_to_data-->  data   (inverse scales)
//! ```
//!
//! Both directions check the view first and return [`ChartError::Domain`] when a
//! scale would be zero, negative or non-finite.

use crate::error::ChartError;
use crate::geometry::Point2;
use crate::view::{ViewParameters, PITCH_RANGE};

/// Map a data-space point onto the editing canvas (relative to the track origin).
///
/// # Example
/// ```rust
/// use slidechart::{data_to_track, Point2, ViewParameters};
///
/// let view = ViewParameters::default(); // scroll 1, spacing 5
/// let p = data_to_track(Point2::new(2.0, 0.0), &view).unwrap();
/// assert_eq!(p.x, 10.0);
/// ```
pub fn data_to_track(p: Point2, view: &ViewParameters) -> Result<Point2, ChartError> {
    view.validate()?;
    Ok(p.scale(view.horizontal_scale(), view.vertical_span() / PITCH_RANGE))
}

/// Map a track-space point (relative to the track origin) back to data space.
pub fn track_to_data(p: Point2, view: &ViewParameters) -> Result<Point2, ChartError> {
    view.validate()?;
    Ok(p.scale(
        1.0 / view.horizontal_scale(),
        PITCH_RANGE / view.vertical_span(),
    ))
}

/// Re-derive a track point after the view changed from `old` to `new`.
pub fn redraw(p: Point2, old: &ViewParameters, new: &ViewParameters) -> Result<Point2, ChartError> {
    data_to_track(track_to_data(p, old)?, new)
}
