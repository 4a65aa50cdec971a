//! Editing core for slide-note (glissando) charts.
//!
//! A chart is a list of notes, each a glide between two points on a scrolling
//! timeline. This crate holds everything below the UI: coordinate transforms,
//! curve evaluation, pitch mapping, playback scrubbing, the measure grid and the
//! binary file format.

pub mod api;
pub mod chart;
pub mod config;
pub mod cursor;
pub mod error;
pub mod format;
pub mod geometry;
pub mod glissando;
pub mod grid;
pub mod pitch;
pub mod playback;
pub mod session;
pub mod transform;
pub mod view;

pub use api::{
    chart_from_yaml, chart_to_yaml, read_chart_file, samples_to_yaml, simulate_playback,
    write_chart_file, ScrubSample,
};
pub use chart::{Endpoint, Note, NoteCollection};
pub use config::EditorConfig;
pub use cursor::{snap_cursor, SnapSettings};
pub use error::ChartError;
pub use format::{decode_chart, encode_chart, ChartFile, PersistedNoteRecord};
pub use geometry::{Color, Point2};
pub use glissando::Glissando;
pub use grid::{MeasureGridLayout, MeasureLine};
pub use pitch::{
    beat_spacing, frequency_ratio, nearest_beat, nearest_chromatic_pitch, pitch_of, semitone_to_y,
};
pub use playback::{ActiveNote, AudioHandle, AudioRig, PlaybackScrubber, PlaybackState};
pub use session::{Frame, NodeRef, Session};
pub use transform::{data_to_track, redraw, track_to_data};
pub use view::{ViewParameters, Viewport};
