//! Persisted chart type definitions

use crate::geometry::{Color, Point2};
use crate::view::EDITOR_NOTE_SPACING;
use serde::{Deserialize, Serialize};

/// One saved note, in data space.
///
/// Layout: `[start_x, delta_x, start_y, delta_y, start_y]`. The fifth field
/// repeats the third; it is written for compatibility and ignored on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedNoteRecord(pub [f32; 5]);

impl PersistedNoteRecord {
    pub const FIELDS: usize = 5;

    /// Delta-encode a note from its data-space endpoints.
    pub fn from_endpoints(start: Point2, end: Point2) -> Self {
        let delta = end - start;
        Self([start.x, delta.x, start.y, delta.y, start.y])
    }

    pub fn start(&self) -> Point2 {
        Point2::new(self.0[0], self.0[2])
    }

    pub fn end(&self) -> Point2 {
        Point2::new(self.0[0] + self.0[1], self.0[2] + self.0[3])
    }
}

/// Header and payload of a chart file.
///
/// The header fields other than `note_spacing` are carried through the editor
/// untouched. `note_spacing` is rewritten in both directions; see
/// [`crate::view::FILE_NOTE_SPACING`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFile {
    /// Beats per minute.
    pub tempo: f32,
    pub time_signature: i32,
    pub endpoint: f32,
    pub note_spacing: i32,
    pub note_color_start: [f32; 3],
    pub note_color_end: [f32; 3],
    pub notes: Vec<PersistedNoteRecord>,
    #[serde(default)]
    pub background: Vec<Vec<f32>>,
    #[serde(default)]
    pub lyric_positions: Vec<Vec<f32>>,
    #[serde(default)]
    pub lyric_texts: Vec<String>,
}

impl Default for ChartFile {
    fn default() -> Self {
        Self {
            tempo: 120.0,
            time_signature: 4,
            endpoint: 20.0,
            note_spacing: EDITOR_NOTE_SPACING as i32,
            note_color_start: Color::RED.to_array(),
            note_color_end: Color::BLUE.to_array(),
            notes: Vec::new(),
            background: Vec::new(),
            lyric_positions: Vec::new(),
            lyric_texts: Vec::new(),
        }
    }
}

impl ChartFile {
    pub fn start_color(&self) -> Color {
        Color::from_array(self.note_color_start)
    }

    pub fn end_color(&self) -> Color {
        Color::from_array(self.note_color_end)
    }
}
