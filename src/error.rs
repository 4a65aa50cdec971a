//! # Error Types
//!
//! This module defines all error types for the slidechart editing core.
//!
//! The transform, curve and pitch functions are total over their valid inputs, so
//! the only errors they raise are [`ChartError::Domain`] for view parameters that
//! should have been clamped upstream. Everything else comes from the file layer
//! (binary codec, YAML config) or from rejected edits.
//!
//! ## Error Types
//! - `Domain` - non-positive scroll speed, note spacing or vertical span
//! - `ZeroWidthNote` - a note whose endpoints share an x position
//! - `Format` - malformed binary chart data
//! - `Config` - editor configuration values out of range
//! - `Io` / `Yaml` - wrapped I/O and YAML errors
//!
//! ## Usage
//! ```rust
//! use slidechart::{ChartError, ViewParameters, data_to_track, Point2};
//!
//! let mut view = ViewParameters::default();
//! view.scroll_speed = 0.0;
//!
//! match data_to_track(Point2::new(1.0, 0.0), &view) {
//!     Err(ChartError::Domain { parameter, .. }) => assert_eq!(parameter, "scroll_speed"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// A view parameter is outside the domain of the coordinate transform.
    ///
    /// # Example
    /// ```
    /// # use slidechart::ChartError;
    /// let err = ChartError::Domain { parameter: "note_spacing", value: 0.0 };
    /// assert_eq!(err.to_string(), "note_spacing must be positive, got 0");
    /// ```
    #[error("{parameter} must be positive, got {value}")]
    Domain { parameter: &'static str, value: f32 },

    /// A request that would exceed a fixed work limit.
    #[error("{parameter} is too large, got {value} (limit {limit})")]
    TooLarge {
        parameter: &'static str,
        value: f32,
        limit: f32,
    },

    /// Both endpoints of a note sit at the same x position.
    #[error("Note has zero width")]
    ZeroWidthNote,

    /// A note index that does not exist in the collection.
    #[error("No note at index {0}")]
    InvalidNoteIndex(usize),

    /// Malformed binary chart data.
    ///
    /// # Example
    /// ```
    /// # use slidechart::ChartError;
    /// let err = ChartError::Format("bad magic".to_string());
    /// assert_eq!(err.to_string(), "Invalid chart file: bad magic");
    /// ```
    #[error("Invalid chart file: {0}")]
    Format(String),

    /// Invalid editor configuration.
    #[error("Invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
