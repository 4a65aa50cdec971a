//! Playback scrubber
//!
//! Scrolls the track under a fixed playhead and turns whatever note is under it
//! into slide-voice pitch.

use log::debug;

use super::types::{ActiveNote, AudioRig, PlaybackState};
use crate::chart::NoteCollection;
use crate::error::ChartError;
use crate::pitch::{frequency_ratio, pitch_of};
use crate::view::{ViewParameters, PLAYHEAD_X, SCROLL_STEP};

/// Owns [`PlaybackState`] and advances it one tick at a time.
///
/// # State machine
/// ```text
/// Stopped --start()--> Playing --stop()--> Stopped
/// ```
///
/// # Timing
/// The track origin sits at world x = `track_offset`. While playing it moves
/// left by `scroll_speed * bpm / 60 * note_spacing` units per second. The music
/// clip position is tied to the offset by
///
/// ```text
/// audio_time = (lead_in - track_offset) / (note_spacing * scroll_speed) * 60 / bpm
/// ```
///
/// where `lead_in` is the playhead x: beat 1 reaches the playhead exactly when
/// the clip reaches time 0. The same relation is used for manual seeking, so the
/// clip stays in sync whether the offset moved by playback or by hand.
#[derive(Debug, Clone)]
pub struct PlaybackScrubber {
    state: PlaybackState,
    playhead_x: f32,
    scroll_step: f32,
}

impl Default for PlaybackScrubber {
    fn default() -> Self {
        Self::new(PLAYHEAD_X, SCROLL_STEP)
    }
}

impl PlaybackScrubber {
    pub fn new(playhead_x: f32, scroll_step: f32) -> Self {
        Self {
            state: PlaybackState::default(),
            playhead_x,
            scroll_step,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn track_offset(&self) -> f32 {
        self.state.track_offset
    }

    pub fn playhead_x(&self) -> f32 {
        self.playhead_x
    }

    /// Track offset at which the music starts.
    pub fn lead_in(&self) -> f32 {
        self.playhead_x
    }

    /// Playhead position relative to the track origin.
    pub fn track_playhead(&self) -> f32 {
        self.playhead_x - self.state.track_offset
    }

    /// Track units scrolled per second of playback.
    pub fn scroll_rate(view: &ViewParameters, bpm: f32) -> f32 {
        view.scroll_speed * bpm.max(0.0) / 60.0 * view.note_spacing as f32
    }

    /// Music clip time, in seconds, that corresponds to `track_offset`.
    pub fn audio_time_at(&self, track_offset: f32, view: &ViewParameters, bpm: f32) -> f32 {
        if bpm <= 0.0 {
            return 0.0;
        }
        let seconds_per_beat = 60.0 / bpm;
        let beats = (self.lead_in() - track_offset) / view.horizontal_scale();
        beats * seconds_per_beat
    }

    /// Scroll by a wheel delta. Ignored while playing.
    pub fn scroll(&mut self, delta: f32, view: &ViewParameters, bpm: f32, audio: &mut AudioRig) -> bool {
        if self.state.is_playing {
            return false;
        }
        let offset = self.state.track_offset + delta * self.scroll_step;
        self.seek(offset, view, bpm, audio)
    }

    /// Jump to a track offset. Ignored while playing.
    ///
    /// The music clip is seeked to the matching time whenever that time is past
    /// the start of the clip, so it is ready to resume from the right place.
    pub fn seek(&mut self, track_offset: f32, view: &ViewParameters, bpm: f32, audio: &mut AudioRig) -> bool {
        if self.state.is_playing {
            return false;
        }
        self.state.track_offset = track_offset;
        self.state.audio_time = self.audio_time_at(track_offset, view, bpm);

        if self.state.audio_time > 0.0 {
            if let Some(music) = audio.music_mut() {
                music.seek(self.state.audio_time);
            }
        }
        true
    }

    /// Scroll back to the start of the timeline.
    pub fn reset(&mut self, view: &ViewParameters, bpm: f32, audio: &mut AudioRig) -> bool {
        self.seek(0.0, view, bpm, audio)
    }

    /// Start playing. Does nothing while a note is being drawn.
    pub fn start(&mut self, creating_note: bool) -> bool {
        if creating_note || self.state.is_playing {
            return false;
        }
        self.state.is_playing = true;
        debug!("playback started at offset {}", self.state.track_offset);
        true
    }

    /// Stop playing and silence everything. The offset stays where it is.
    pub fn stop(&mut self, audio: &mut AudioRig) {
        if self.state.is_playing {
            debug!("playback stopped at offset {}", self.state.track_offset);
        }
        self.state.is_playing = false;
        audio.stop_music();
        audio.silence_voice();
    }

    /// Advance playback by `dt` seconds.
    ///
    /// Returns the note sounding at the playhead after the move, if any. When
    /// notes overlap the playhead the first in storage order wins.
    pub fn tick(
        &mut self,
        dt: f32,
        view: &ViewParameters,
        bpm: f32,
        notes: &NoteCollection,
        audio: &mut AudioRig,
    ) -> Result<Option<ActiveNote>, ChartError> {
        if !self.state.is_playing {
            return Ok(None);
        }
        view.validate()?;

        self.state.track_offset -= Self::scroll_rate(view, bpm) * dt;
        self.state.audio_time = self.audio_time_at(self.state.track_offset, view, bpm);

        let lead_in = self.lead_in();
        let audio_time = self.state.audio_time;
        if let Some(music) = audio.music_mut() {
            if self.state.track_offset > 0.0 {
                music.stop();
            } else if self.state.track_offset <= lead_in && !music.is_playing() {
                music.seek(audio_time.max(0.0));
                music.play();
            }
        }

        let playhead = self.track_playhead();
        let Some((index, note)) = notes.note_at(playhead) else {
            audio.silence_voice();
            return Ok(None);
        };

        let progress = note.progress_at(playhead);
        let y = note.glissando().position_at(progress);
        let semitones = pitch_of(y, view);
        let pitch = frequency_ratio(semitones);
        audio.sound_voice(pitch);

        Ok(Some(ActiveNote {
            index,
            progress,
            y,
            semitones,
            pitch,
        }))
    }
}
