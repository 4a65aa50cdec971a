//! # Editing Session
//!
//! The session-wide controller. It owns every piece of mutable editor state and
//! hands the pure components what they need on each call.
//!
//! ## Owned state
//! - [`ViewParameters`] / [`Viewport`] - how the chart is laid out
//! - [`ChartFile`] header - tempo, time signature, colors, pass-through data
//! - [`NoteCollection`] - live notes in track space
//! - [`PlaybackScrubber`] - scroll offset and transport
//! - [`MeasureGridLayout`] - bar line layout
//! - [`AudioRig`] - music clip and slide voice handles
//! - gesture state: the note being drawn, the selected and dragged endpoints
//!
//! ## Coordinates
//! Gesture methods take **world** positions (what a pointer reports). The track
//! origin sits at world x = `track_offset`, so a world point becomes
//! track-relative by subtracting the offset from x. Notes are stored
//! track-relative.
//!
//! ## View changes
//! Every setter that changes the view re-derives all note geometry through data
//! space before it returns, then re-lays out the grid. There are no change
//! callbacks; the next [`Session::tick`] simply reads the new state.

use log::{debug, info, warn};

use crate::chart::{Endpoint, Note, NoteCollection};
use crate::config::EditorConfig;
use crate::cursor::{snap_cursor, SnapSettings};
use crate::error::ChartError;
use crate::format::{decode_chart, encode_chart, ChartFile, PersistedNoteRecord};
use crate::geometry::{Color, Point2};
use crate::glissando::Glissando;
use crate::grid::{MeasureGridLayout, MeasureLine};
use crate::pitch::{frequency_ratio, pitch_of};
use crate::playback::{ActiveNote, AudioHandle, AudioRig, PlaybackScrubber, PlaybackState};
use crate::transform::{data_to_track, redraw, track_to_data};
use crate::view::{ViewParameters, Viewport, EDITOR_NOTE_SPACING, FILE_NOTE_SPACING};

/// Squared world distance within which a pointer grabs a note endpoint.
pub const NODE_HIT_RADIUS_SQUARED: f32 = 0.16;

/// One endpoint of one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    pub note: usize,
    pub endpoint: Endpoint,
}

/// Everything a frontend needs to draw one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub state: PlaybackState,
    pub active: Option<ActiveNote>,
    pub measures: Vec<MeasureLine>,
}

pub struct Session {
    view: ViewParameters,
    viewport: Viewport,
    chart: ChartFile,
    notes: NoteCollection,
    scrubber: PlaybackScrubber,
    grid: MeasureGridLayout,
    audio: AudioRig,
    snap: SnapSettings,
    draft: Option<(Point2, Point2)>,
    selected: Option<NodeRef>,
    dragging: Option<NodeRef>,
    warned_silent: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        let chart = ChartFile {
            note_spacing: config.note_spacing as i32,
            ..ChartFile::default()
        };
        let view = config.view(chart.time_signature.max(1) as u32);
        Self {
            grid: MeasureGridLayout::new(&view, &config.viewport),
            view,
            viewport: config.viewport,
            chart,
            notes: NoteCollection::new(),
            scrubber: PlaybackScrubber::new(config.playhead_x, config.scroll_step),
            audio: AudioRig::new(),
            snap: config.snap,
            draft: None,
            selected: None,
            dragging: None,
            warned_silent: false,
        }
    }

    pub fn with_audio(mut self, audio: AudioRig) -> Self {
        self.audio = audio;
        self
    }

    /// Install the music clip once it has finished loading.
    pub fn attach_music(&mut self, music: impl AudioHandle + 'static) {
        self.audio.music = Some(Box::new(music));
        self.warned_silent = false;
        let offset = self.scrubber.track_offset();
        if !self.scrubber.is_playing() {
            self.scrubber
                .seek(offset, &self.view, self.chart.tempo, &mut self.audio);
        }
    }

    pub fn attach_voice(&mut self, voice: impl AudioHandle + 'static) {
        self.audio.voice = Some(Box::new(voice));
    }

    pub fn view(&self) -> &ViewParameters {
        &self.view
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Chart header. Its `notes` list is empty while editing; notes live in
    /// [`Session::notes`] until saved.
    pub fn chart(&self) -> &ChartFile {
        &self.chart
    }

    pub fn notes(&self) -> &NoteCollection {
        &self.notes
    }

    pub fn grid(&self) -> &MeasureGridLayout {
        &self.grid
    }

    pub fn playback(&self) -> &PlaybackState {
        self.scrubber.state()
    }

    pub fn is_playing(&self) -> bool {
        self.scrubber.is_playing()
    }

    pub fn track_offset(&self) -> f32 {
        self.scrubber.track_offset()
    }

    pub fn snap(&self) -> &SnapSettings {
        &self.snap
    }

    pub fn set_snap(&mut self, snap: SnapSettings) {
        self.snap = snap;
    }

    pub fn selected(&self) -> Option<NodeRef> {
        self.selected
    }

    pub fn is_creating_note(&self) -> bool {
        self.draft.is_some()
    }

    /// The note being drawn, in world space.
    pub fn draft(&self) -> Option<Glissando> {
        self.draft.map(|(start, end)| Glissando::new(start, end))
    }

    pub fn to_track(&self, world: Point2) -> Point2 {
        Point2::new(world.x - self.track_offset(), world.y)
    }

    pub fn to_world(&self, track: Point2) -> Point2 {
        Point2::new(track.x + self.track_offset(), track.y)
    }

    /// Snap a world-space pointer position with the current settings.
    pub fn cursor(&self, world: Point2) -> Point2 {
        snap_cursor(world, self.track_offset(), &self.view, &self.snap)
    }

    /// Slur polylines for every note, in track space.
    pub fn slurs(&self) -> Vec<Vec<Point2>> {
        self.notes.iter().map(|note| note.glissando().slur()).collect()
    }

    // View settings

    pub fn set_scroll_speed(&mut self, scroll_speed: f32) -> Result<(), ChartError> {
        self.apply_view(ViewParameters {
            scroll_speed,
            ..self.view
        })
    }

    pub fn set_note_spacing(&mut self, note_spacing: u32) -> Result<(), ChartError> {
        self.apply_view(ViewParameters {
            note_spacing,
            ..self.view
        })?;
        self.chart.note_spacing = note_spacing as i32;
        Ok(())
    }

    pub fn set_time_signature(&mut self, time_signature: u32) -> Result<(), ChartError> {
        if time_signature == 0 {
            return Err(ChartError::Domain {
                parameter: "time_signature",
                value: 0.0,
            });
        }
        self.apply_view(ViewParameters {
            time_signature,
            ..self.view
        })?;
        self.chart.time_signature = time_signature as i32;
        Ok(())
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), ChartError> {
        viewport.validate()?;
        let view = ViewParameters {
            vertical_extent: viewport.vertical_extent(),
            ..self.view
        };
        self.apply_view(view)?;
        self.viewport = viewport;
        self.grid.relayout(&self.view, &self.viewport);
        Ok(())
    }

    pub fn set_tempo(&mut self, bpm: f32) -> Result<(), ChartError> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(ChartError::Domain {
                parameter: "tempo",
                value: bpm,
            });
        }
        self.chart.tempo = bpm;
        Ok(())
    }

    pub fn set_endpoint(&mut self, endpoint: f32) {
        self.chart.endpoint = endpoint;
    }

    /// Change the note gradient and recolor every note.
    pub fn set_note_colors(&mut self, start: Color, end: Color) {
        self.chart.note_color_start = start.to_array();
        self.chart.note_color_end = end.to_array();
        for note in self.notes.iter_mut() {
            note.start_color = start;
            note.end_color = end;
        }
    }

    /// Switch to `new`, re-deriving all note geometry from data space.
    ///
    /// Nothing changes if `new` is invalid or any note fails to convert.
    fn apply_view(&mut self, new: ViewParameters) -> Result<(), ChartError> {
        new.validate()?;
        let old = self.view;

        let mut notes = NoteCollection::new();
        for note in self.notes.iter() {
            let mut moved = *note;
            moved.set_endpoints(
                redraw(note.start(), &old, &new)?,
                redraw(note.end(), &old, &new)?,
            )?;
            notes.push(moved);
        }

        self.notes = notes;
        self.view = new;
        self.grid.relayout(&self.view, &self.viewport);
        debug!(
            "view changed: scroll speed {}, note spacing {}, time signature {}",
            new.scroll_speed, new.note_spacing, new.time_signature
        );
        Ok(())
    }

    // Note creation

    /// Start drawing a note at a pointer position. Ignored while playing.
    pub fn begin_note(&mut self, world: Point2) -> bool {
        if self.is_playing() {
            return false;
        }
        let start = self.cursor(world);
        self.draft = Some((start, start));
        self.start_preview(start.y);
        true
    }

    /// Move the free end of the note being drawn.
    pub fn drag_note(&mut self, world: Point2) {
        let end = self.cursor(world);
        if let Some((_, draft_end)) = self.draft.as_mut() {
            *draft_end = end;
            self.update_preview(end.y);
        }
    }

    /// Finish drawing. Returns the new note's index, or `None` if there was no
    /// draft or it had zero width.
    pub fn end_note(&mut self) -> Option<usize> {
        self.end_preview();
        let (start, end) = self.draft.take()?;

        let note = Note::new(
            self.to_track(start),
            self.to_track(end),
            self.chart.start_color(),
            self.chart.end_color(),
        );
        match note {
            Ok(note) => {
                let index = self.notes.push(note);
                debug!("added note {} from {:?} to {:?}", index, note.start(), note.end());
                Some(index)
            }
            Err(e) => {
                debug!("discarded note: {}", e);
                None
            }
        }
    }

    pub fn cancel_note(&mut self) {
        self.draft = None;
        self.end_preview();
    }

    // Endpoint editing

    /// The first endpoint, in storage order, within grabbing distance.
    pub fn node_at(&self, world: Point2) -> Option<NodeRef> {
        let track = self.to_track(world);
        self.notes.iter().enumerate().find_map(|(index, note)| {
            [Endpoint::Start, Endpoint::End]
                .into_iter()
                .find(|&which| {
                    note.endpoint(which).distance_squared(track) < NODE_HIT_RADIUS_SQUARED
                })
                .map(|endpoint| NodeRef {
                    note: index,
                    endpoint,
                })
        })
    }

    /// Select an endpoint. Ignored while playing.
    pub fn select(&mut self, node: Option<NodeRef>) -> bool {
        if self.is_playing() {
            return false;
        }
        self.selected = node.filter(|n| n.note < self.notes.len());
        true
    }

    /// Select and start dragging the endpoint under the pointer.
    pub fn grab_node(&mut self, world: Point2) -> Option<NodeRef> {
        if self.is_playing() {
            return None;
        }
        let node = self.node_at(world)?;
        self.selected = Some(node);
        self.dragging = Some(node);
        self.start_preview(self.cursor(world).y);
        Some(node)
    }

    /// Move the dragged endpoint to the pointer.
    ///
    /// A move that would give the note zero width is skipped. If the endpoint is
    /// dragged past the other one they swap roles and the drag follows it.
    pub fn drag_node(&mut self, world: Point2) -> Result<(), ChartError> {
        let Some(node) = self.dragging else {
            return Ok(());
        };
        let pos = self.cursor(world);
        let track = self.to_track(pos);
        self.update_preview(pos.y);

        let note = self.notes.get_mut(node.note)?;
        if let Err(e) = note.move_endpoint(node.endpoint, track) {
            debug!("skipped endpoint move: {}", e);
            return Ok(());
        }

        if note.endpoint(node.endpoint) != track {
            let flipped = NodeRef {
                note: node.note,
                endpoint: match node.endpoint {
                    Endpoint::Start => Endpoint::End,
                    Endpoint::End => Endpoint::Start,
                },
            };
            self.dragging = Some(flipped);
            if self.selected == Some(node) {
                self.selected = Some(flipped);
            }
        }
        Ok(())
    }

    pub fn release_node(&mut self) {
        if self.dragging.take().is_some() {
            self.end_preview();
        }
    }

    /// Delete the note owning the selected endpoint. Ignored while playing.
    pub fn delete_selected(&mut self) -> Option<Note> {
        if self.is_playing() {
            return None;
        }
        let node = self.selected.take()?;
        self.dragging = None;
        let removed = self.notes.remove(node.note).ok();
        if removed.is_some() {
            debug!("deleted note {}", node.note);
        }
        removed
    }

    pub fn delete_note(&mut self, index: usize) -> Result<Note, ChartError> {
        let note = self.notes.remove(index)?;
        self.selected = None;
        self.dragging = None;
        Ok(note)
    }

    pub fn clear_notes(&mut self) {
        self.notes.clear();
        self.selected = None;
        self.dragging = None;
    }

    // Note preview

    fn start_preview(&mut self, world_y: f32) {
        self.update_preview(world_y);
        if self.snap.preview_note {
            self.audio.set_voice_volume(1.0);
        }
    }

    fn update_preview(&mut self, world_y: f32) {
        self.audio
            .set_voice_pitch(frequency_ratio(pitch_of(world_y, &self.view)));
    }

    fn end_preview(&mut self) {
        self.audio.silence_voice();
    }

    // Playback

    pub fn start_playback(&mut self) -> bool {
        if !self.scrubber.start(self.is_creating_note()) {
            return false;
        }
        if !self.audio.has_music() && !self.warned_silent {
            warn!("no music clip loaded; playback is visual only");
            self.warned_silent = true;
        }
        true
    }

    pub fn stop_playback(&mut self) {
        self.scrubber.stop(&mut self.audio);
    }

    /// Start or stop playback. Returns whether playback is now running.
    pub fn toggle_playback(&mut self) -> bool {
        if self.is_playing() {
            self.stop_playback();
        } else {
            self.start_playback();
        }
        self.is_playing()
    }

    /// Scroll by a wheel delta. Ignored while playing.
    pub fn scroll(&mut self, delta: f32) -> bool {
        self.scrubber
            .scroll(delta, &self.view, self.chart.tempo, &mut self.audio)
    }

    /// Jump to a track offset. Ignored while playing.
    pub fn seek(&mut self, track_offset: f32) -> bool {
        self.scrubber
            .seek(track_offset, &self.view, self.chart.tempo, &mut self.audio)
    }

    /// Scroll back to the start of the timeline.
    pub fn reset_scroll(&mut self) -> bool {
        self.scrubber
            .reset(&self.view, self.chart.tempo, &mut self.audio)
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: f32) -> Result<Frame, ChartError> {
        let active = self.scrubber.tick(
            dt,
            &self.view,
            self.chart.tempo,
            &self.notes,
            &mut self.audio,
        )?;
        Ok(Frame {
            state: *self.scrubber.state(),
            active,
            measures: self.grid.lines(self.track_offset()),
        })
    }

    // Persistence

    /// Replace the open chart with a decoded one.
    ///
    /// The editor note spacing is reset to its canonical value before the notes
    /// are laid out. Zero-width records are skipped.
    pub fn open_chart(&mut self, mut chart: ChartFile) -> Result<(), ChartError> {
        if chart.time_signature <= 0 {
            return Err(ChartError::Format(format!(
                "time signature must be positive, got {}",
                chart.time_signature
            )));
        }

        chart.note_spacing = EDITOR_NOTE_SPACING as i32;
        let view = ViewParameters {
            note_spacing: EDITOR_NOTE_SPACING,
            time_signature: chart.time_signature as u32,
            ..self.view
        };
        view.validate()?;

        let (start_color, end_color) = (chart.start_color(), chart.end_color());
        let mut notes = NoteCollection::new();
        for (index, record) in chart.notes.drain(..).enumerate() {
            let start = data_to_track(record.start(), &view)?;
            let end = data_to_track(record.end(), &view)?;
            match Note::new(start, end, start_color, end_color) {
                Ok(note) => {
                    notes.push(note);
                }
                Err(e) => warn!("skipping note record {}: {}", index, e),
            }
        }

        self.stop_playback();
        self.draft = None;
        self.selected = None;
        self.dragging = None;
        self.notes = notes;
        self.chart = chart;
        self.view = view;
        self.grid.relayout(&self.view, &self.viewport);

        info!(
            "opened chart: {} notes, tempo {}, time signature {}",
            self.notes.len(),
            self.chart.tempo,
            self.chart.time_signature
        );
        Ok(())
    }

    /// Decode and open a binary chart.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), ChartError> {
        self.open_chart(decode_chart(bytes)?)
    }

    /// The chart as it would be saved.
    ///
    /// Notes are encoded under the current view; the header's note spacing is
    /// the file-format constant, and background and lyric data are dropped.
    pub fn to_chart_file(&self) -> Result<ChartFile, ChartError> {
        let notes = self
            .notes
            .iter()
            .map(|note| {
                Ok(PersistedNoteRecord::from_endpoints(
                    track_to_data(note.start(), &self.view)?,
                    track_to_data(note.end(), &self.view)?,
                ))
            })
            .collect::<Result<Vec<_>, ChartError>>()?;

        Ok(ChartFile {
            note_spacing: FILE_NOTE_SPACING,
            notes,
            background: Vec::new(),
            lyric_positions: Vec::new(),
            lyric_texts: Vec::new(),
            ..self.chart.clone()
        })
    }

    /// Encode the chart to its binary form.
    pub fn save(&self) -> Result<Vec<u8>, ChartError> {
        let chart = self.to_chart_file()?;
        let bytes = encode_chart(&chart)?;
        info!("saved chart: {} notes, {} bytes", chart.notes.len(), bytes.len());
        Ok(bytes)
    }
}
