//! # Editor Configuration
//!
//! Startup settings for a [`crate::Session`], read from YAML.
//!
//! Every key is optional; anything left out takes the editor default.
//!
//! ```yaml
//! scroll-speed: 1.5
//! note-spacing: 5
//! half-height: 5
//! aspect: 1.7778
//! padding: 0.5
//! playhead-x: -8
//! scroll-step: 2
//! snap-to-rhythm: true
//! snap-to-chroma: false
//! subdivision: 8
//! preview-note: true
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::cursor::SnapSettings;
use crate::error::ChartError;
use crate::view::{
    ViewParameters, Viewport, DEFAULT_SCROLL_SPEED, EDITOR_NOTE_SPACING, PADDING, PLAYHEAD_X,
    SCROLL_STEP,
};

/// Raw config for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawEditorConfig {
    pub scroll_speed: Option<f32>,
    pub note_spacing: Option<u32>,
    pub half_height: Option<f32>,
    pub aspect: Option<f32>,
    pub padding: Option<f32>,
    pub playhead_x: Option<f32>,
    pub scroll_step: Option<f32>,
    pub snap_to_rhythm: Option<bool>,
    pub snap_to_chroma: Option<bool>,
    pub subdivision: Option<u32>,
    pub preview_note: Option<bool>,
}

/// Validated editor settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub scroll_speed: f32,
    pub note_spacing: u32,
    pub viewport: Viewport,
    pub padding: f32,
    pub playhead_x: f32,
    pub scroll_step: f32,
    pub snap: SnapSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scroll_speed: DEFAULT_SCROLL_SPEED,
            note_spacing: EDITOR_NOTE_SPACING,
            viewport: Viewport::default(),
            padding: PADDING,
            playhead_x: PLAYHEAD_X,
            scroll_step: SCROLL_STEP,
            snap: SnapSettings::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a YAML config document.
    ///
    /// # Example
    /// ```rust
    /// use slidechart::EditorConfig;
    ///
    /// let config = EditorConfig::from_yaml("scroll-speed: 2\nsubdivision: 8").unwrap();
    /// assert_eq!(config.scroll_speed, 2.0);
    /// assert_eq!(config.snap.subdivision, 8);
    /// assert_eq!(config.note_spacing, 5);
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, ChartError> {
        // An empty document deserializes as unit, not as an empty map.
        let raw: RawEditorConfig = if content.trim().is_empty() {
            RawEditorConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ChartError::Config(e.to_string()))?
        };
        Self::from_raw(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChartError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    fn from_raw(raw: RawEditorConfig) -> Result<Self, ChartError> {
        let defaults = Self::default();
        let default_snap = defaults.snap;

        let config = Self {
            scroll_speed: raw.scroll_speed.unwrap_or(defaults.scroll_speed),
            note_spacing: raw.note_spacing.unwrap_or(defaults.note_spacing),
            viewport: Viewport {
                half_height: raw.half_height.unwrap_or(defaults.viewport.half_height),
                aspect: raw.aspect.unwrap_or(defaults.viewport.aspect),
            },
            padding: raw.padding.unwrap_or(defaults.padding),
            playhead_x: raw.playhead_x.unwrap_or(defaults.playhead_x),
            scroll_step: raw.scroll_step.unwrap_or(defaults.scroll_step),
            snap: SnapSettings {
                snap_to_rhythm: raw.snap_to_rhythm.unwrap_or(default_snap.snap_to_rhythm),
                snap_to_chroma: raw.snap_to_chroma.unwrap_or(default_snap.snap_to_chroma),
                subdivision: raw.subdivision.unwrap_or(default_snap.subdivision),
                preview_note: raw.preview_note.unwrap_or(default_snap.preview_note),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// View parameters for a chart with the given time signature.
    pub fn view(&self, time_signature: u32) -> ViewParameters {
        ViewParameters {
            padding: self.padding,
            ..ViewParameters::from_viewport(
                &self.viewport,
                self.scroll_speed,
                self.note_spacing,
                time_signature,
            )
        }
    }

    fn validate(&self) -> Result<(), ChartError> {
        self.viewport
            .validate()
            .map_err(|e| ChartError::Config(e.to_string()))?;
        if self.snap.subdivision == 0 {
            return Err(ChartError::Config("subdivision must be at least 1".to_string()));
        }
        self.view(4)
            .validate()
            .map_err(|e| ChartError::Config(e.to_string()))
    }
}
