//! # Playback Module
//!
//! Scrub the chart under a fixed playhead and drive the audio handles.
//!
//! ## Sub-modules
//! - `types` - [`PlaybackState`], [`ActiveNote`], the [`AudioHandle`] trait and
//!   the [`VirtualClip`] test double
//! - `scrubber` - [`PlaybackScrubber`], the tick-driven state machine
//!
//! ## Tick model
//! Nothing here polls a clock. The caller passes the elapsed time to
//! [`PlaybackScrubber::tick`] once per frame, which makes the same code usable
//! from an interactive loop, a batch harness or a test.
//!
//! ## Example
//! ```rust
//! use slidechart::playback::{AudioRig, PlaybackScrubber, VirtualClip};
//! use slidechart::{Color, Note, NoteCollection, Point2, ViewParameters};
//!
//! let view = ViewParameters::default();
//! let mut notes = NoteCollection::new();
//! notes.push(Note::new(Point2::new(0.0, 0.0), Point2::new(40.0, 0.0), Color::RED, Color::BLUE).unwrap());
//!
//! let voice = VirtualClip::muted();
//! let mut audio = AudioRig::new().with_voice(voice.clone());
//!
//! let mut scrubber = PlaybackScrubber::default();
//! scrubber.start(false);
//! // 120 bpm, 5 units per beat: one second scrolls 10 units
//! let active = scrubber.tick(1.0, &view, 120.0, &notes, &mut audio).unwrap();
//!
//! assert_eq!(scrubber.track_offset(), -10.0);
//! assert_eq!(active.unwrap().index, 0);
//! assert_eq!(voice.snapshot().volume, 1.0);
//! ```
//!
//! ## Degraded audio
//! A missing music clip or voice is not an error; playback continues silently.

mod scrubber;
mod types;


pub use scrubber::PlaybackScrubber;
pub use types::{ActiveNote, AudioHandle, AudioRig, ClipState, PlaybackState, VirtualClip};
