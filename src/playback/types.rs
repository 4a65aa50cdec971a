//! Playback type definitions
//!
//! The state owned by the scrubber and the audio handles it drives.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// Scroll and transport state. Only [`super::PlaybackScrubber`] mutates it.
///
/// # Fields
/// - `is_playing`: Stopped (false) or Playing (true)
/// - `track_offset`: world x of the track origin; decreases while playing
/// - `audio_time`: music clip position, in seconds, matching `track_offset`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub track_offset: f32,
    pub audio_time: f32,
}

/// The note under the playhead during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveNote {
    /// Index of the note in storage order.
    pub index: usize,
    /// Progress through the note, 0 to 1.
    pub progress: f32,
    /// Track-space y of the slide at that progress.
    pub y: f32,
    /// Semitone distance from C5.
    pub semitones: f32,
    /// Pitch multiplier sent to the slide voice.
    pub pitch: f32,
}

/// An external audio clip: either the backing music or the slide voice.
pub trait AudioHandle {
    fn play(&mut self);
    fn stop(&mut self);
    /// Playback speed multiplier relative to the clip's native pitch.
    fn set_pitch(&mut self, multiplier: f32);
    fn set_volume(&mut self, volume: f32);
    fn is_playing(&self) -> bool;
    /// Position in seconds.
    fn current_time(&self) -> f32;
    fn seek(&mut self, time: f32);
}

/// The audio handles a session drives.
///
/// Either slot may be empty: the music clip until it has finished loading, the
/// voice when no slide sample is available. Empty slots make playback silent
/// but otherwise unchanged.
#[derive(Default)]
pub struct AudioRig {
    pub music: Option<Box<dyn AudioHandle>>,
    pub voice: Option<Box<dyn AudioHandle>>,
}

impl AudioRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_music(mut self, music: impl AudioHandle + 'static) -> Self {
        self.music = Some(Box::new(music));
        self
    }

    pub fn with_voice(mut self, voice: impl AudioHandle + 'static) -> Self {
        self.voice = Some(Box::new(voice));
        self
    }

    pub fn has_music(&self) -> bool {
        self.music.is_some()
    }

    pub fn music_mut(&mut self) -> Option<&mut (dyn AudioHandle + 'static)> {
        self.music.as_deref_mut()
    }

    pub fn voice_mut(&mut self) -> Option<&mut (dyn AudioHandle + 'static)> {
        self.voice.as_deref_mut()
    }

    /// Sound the slide voice at the given pitch multiplier.
    pub fn sound_voice(&mut self, pitch: f32) {
        if let Some(voice) = self.voice_mut() {
            voice.set_pitch(pitch);
            voice.set_volume(1.0);
        }
    }

    pub fn set_voice_pitch(&mut self, pitch: f32) {
        if let Some(voice) = self.voice_mut() {
            voice.set_pitch(pitch);
        }
    }

    pub fn set_voice_volume(&mut self, volume: f32) {
        if let Some(voice) = self.voice_mut() {
            voice.set_volume(volume);
        }
    }

    pub fn silence_voice(&mut self) {
        self.set_voice_volume(0.0);
    }

    pub fn stop_music(&mut self) {
        if let Some(music) = self.music_mut() {
            music.stop();
        }
    }
}

/// Observable state of a [`VirtualClip`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipState {
    pub playing: bool,
    pub time: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Number of times `play` started the clip.
    pub starts: u32,
}

impl Default for ClipState {
    fn default() -> Self {
        Self {
            playing: false,
            time: 0.0,
            pitch: 1.0,
            volume: 1.0,
            starts: 0,
        }
    }
}

/// In-memory audio handle with no sound output.
///
/// Clones share state, so a caller can keep one copy to observe what the
/// session did with the other.
#[derive(Debug, Clone, Default)]
pub struct VirtualClip {
    state: Rc<RefCell<ClipState>>,
}

impl VirtualClip {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clip that starts at zero volume, like an idle slide voice.
    pub fn muted() -> Self {
        let clip = Self::new();
        clip.state.borrow_mut().volume = 0.0;
        clip
    }

    pub fn snapshot(&self) -> ClipState {
        *self.state.borrow()
    }

    /// Move the clip position forward if it is playing.
    pub fn advance(&self, dt: f32) {
        let mut state = self.state.borrow_mut();
        if state.playing {
            state.time += dt * state.pitch;
        }
    }
}

impl AudioHandle for VirtualClip {
    fn play(&mut self) {
        let mut state = self.state.borrow_mut();
        if !state.playing {
            state.playing = true;
            state.starts += 1;
        }
    }

    fn stop(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn set_pitch(&mut self, multiplier: f32) {
        self.state.borrow_mut().pitch = multiplier;
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }

    fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    fn current_time(&self) -> f32 {
        self.state.borrow().time
    }

    fn seek(&mut self, time: f32) {
        self.state.borrow_mut().time = time;
    }
}
