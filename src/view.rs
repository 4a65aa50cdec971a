//! # View Settings
//!
//! Session-wide parameters that decide how the persisted chart is laid out on
//! the editing canvas.
//!
//! ## Key Concepts
//!
//! ### Track space
//! The live canvas. One beat is `note_spacing * scroll_speed` units wide and the
//! visible pitch span fills the viewport height minus `padding` on each side.
//!
//! ### Note spacing
//! Carries two meanings. While editing it is the live horizontal zoom, forced to
//! [`EDITOR_NOTE_SPACING`] when a chart is opened. In a saved file the header
//! field is always [`FILE_NOTE_SPACING`], whatever the live value was.

use crate::error::ChartError;
/// Blank space kept above and below the pitch span, in world units.
pub const PADDING: f32 = 0.5;

/// Width of the data-space pitch span (data y runs from -165 to 165).
pub const PITCH_RANGE: f32 = 165.0 * 2.0;

/// Note spacing applied to a chart as soon as it is loaded.
pub const EDITOR_NOTE_SPACING: u32 = 5;

/// Note spacing written into the header of every saved chart.
pub const FILE_NOTE_SPACING: i32 = 140;

pub const DEFAULT_SCROLL_SPEED: f32 = 1.0;

/// World x of the playhead. Beat 1 of the chart is under the playhead when the
/// track offset equals this value.
pub const PLAYHEAD_X: f32 = -8.0;

/// Track units moved per unit of scroll-wheel delta.
pub const SCROLL_STEP: f32 = 2.0;

/// The camera the canvas is seen through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Half of the visible world height (an orthographic size).
    pub half_height: f32,
    /// Width / height.
    pub aspect: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            half_height: 5.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Viewport {
    pub fn vertical_extent(&self) -> f32 {
        self.half_height * 2.0
    }

    pub fn visible_world_width(&self) -> f32 {
        self.vertical_extent() * self.aspect
    }

    /// Both dimensions must be finite and positive.
    pub fn validate(&self) -> Result<(), ChartError> {
        if !(self.half_height.is_finite() && self.half_height > 0.0) {
            return Err(ChartError::Domain {
                parameter: "half_height",
                value: self.half_height,
            });
        }
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return Err(ChartError::Domain {
                parameter: "aspect",
                value: self.aspect,
            });
        }
        Ok(())
    }
}

/// Mutable view settings. Changing any of them invalidates all on-screen geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParameters {
    pub scroll_speed: f32,
    pub note_spacing: u32,
    pub time_signature: u32,
    pub vertical_extent: f32,
    pub padding: f32,
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self::from_viewport(
            &Viewport::default(),
            DEFAULT_SCROLL_SPEED,
            EDITOR_NOTE_SPACING,
            4,
        )
    }
}

impl ViewParameters {
    pub fn from_viewport(
        viewport: &Viewport,
        scroll_speed: f32,
        note_spacing: u32,
        time_signature: u32,
    ) -> Self {
        Self {
            scroll_speed,
            note_spacing,
            time_signature,
            vertical_extent: viewport.vertical_extent(),
            padding: PADDING,
        }
    }

    /// Track units per beat.
    pub fn horizontal_scale(&self) -> f32 {
        self.note_spacing as f32 * self.scroll_speed
    }

    /// Height available to the pitch span.
    pub fn vertical_span(&self) -> f32 {
        self.vertical_extent - self.padding * 2.0
    }

    /// Distance from the center line to the top of the pitch span; one octave.
    pub fn half_visible_height(&self) -> f32 {
        self.vertical_span() / 2.0
    }

    /// Checks the preconditions of the coordinate transform.
    pub fn validate(&self) -> Result<(), ChartError> {
        if !(self.scroll_speed.is_finite() && self.scroll_speed > 0.0) {
            return Err(ChartError::Domain {
                parameter: "scroll_speed",
                value: self.scroll_speed,
            });
        }
        if self.note_spacing == 0 {
            return Err(ChartError::Domain {
                parameter: "note_spacing",
                value: 0.0,
            });
        }
        if !(self.vertical_span().is_finite() && self.vertical_span() > 0.0) {
            return Err(ChartError::Domain {
                parameter: "vertical_span",
                value: self.vertical_span(),
            });
        }
        Ok(())
    }
}
