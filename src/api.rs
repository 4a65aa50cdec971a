//! # Public API
//!
//! File-level entry points built on [`crate::format`] and [`Session`].
//!
//! ## Functions
//!
//! - [`read_chart_file()`] / [`write_chart_file()`] - binary chart files on disk
//! - [`chart_to_yaml()`] / [`chart_from_yaml()`] - human-editable YAML form
//! - [`simulate_playback()`] / [`samples_to_yaml()`] - run playback headless and dump every frame
//!
//! ## Typical Usage
//!
//! ```rust
//! use slidechart::{chart_from_yaml, chart_to_yaml, ChartFile};
//!
//! let yaml = chart_to_yaml(&ChartFile::default())?;
//! let chart = chart_from_yaml(&yaml)?;
//! assert_eq!(chart.tempo, 120.0);
//! # Ok::<(), slidechart::ChartError>(())
//! ```

use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::config::EditorConfig;
use crate::error::ChartError;
use crate::format::{decode_chart, encode_chart, ChartFile};
use crate::playback::{ActiveNote, AudioRig, VirtualClip};
use crate::session::Session;

/// Read and decode a binary chart file.
///
/// # Errors
/// [`ChartError::Io`] if the file cannot be read, [`ChartError::Format`] if it is
/// not a valid chart.
pub fn read_chart_file(path: impl AsRef<Path>) -> Result<ChartFile, ChartError> {
    let bytes = fs::read(path.as_ref())?;
    let chart = decode_chart(&bytes)?;
    info!(
        "read {} ({} notes)",
        path.as_ref().display(),
        chart.notes.len()
    );
    Ok(chart)
}

/// Encode a chart and write it to disk.
pub fn write_chart_file(path: impl AsRef<Path>, chart: &ChartFile) -> Result<(), ChartError> {
    let bytes = encode_chart(chart)?;
    fs::write(path.as_ref(), &bytes)?;
    info!("wrote {} ({} bytes)", path.as_ref().display(), bytes.len());
    Ok(())
}

/// Serialize a chart to YAML.
pub fn chart_to_yaml(chart: &ChartFile) -> Result<String, ChartError> {
    Ok(serde_yaml::to_string(chart)?)
}

/// Parse a chart from YAML.
///
/// # Example
/// ```rust
/// use slidechart::chart_from_yaml;
///
/// let yaml = r#"
/// tempo: 90
/// timeSignature: 3
/// endpoint: 12
/// noteSpacing: 140
/// noteColorStart: [1, 0, 0]
/// noteColorEnd: [0, 0, 1]
/// notes:
///   - [0, 2, 0, 33, 0]
/// "#;
/// let chart = chart_from_yaml(yaml)?;
/// assert_eq!(chart.notes[0].end().y, 33.0);
/// # Ok::<(), slidechart::ChartError>(())
/// ```
///
/// # Errors
/// [`ChartError::Yaml`] for malformed documents, [`ChartError::Format`] when the
/// time signature is not positive.
pub fn chart_from_yaml(source: &str) -> Result<ChartFile, ChartError> {
    let chart: ChartFile = serde_yaml::from_str(source)?;
    if chart.time_signature <= 0 {
        return Err(ChartError::Format(format!(
            "time signature must be positive, got {}",
            chart.time_signature
        )));
    }
    Ok(chart)
}

/// Most frames [`simulate_playback`] will record in one run.
pub const MAX_SIMULATED_FRAMES: usize = 1_000_000;

/// One frame of a headless playback run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrubSample {
    /// Seconds since playback started.
    pub time: f32,
    pub track_offset: f32,
    pub audio_time: f32,
    pub active: Option<ActiveNote>,
}

/// Open `chart` in a fresh session, play it for `seconds` at `fps` ticks per
/// second and record every frame.
///
/// Audio goes to in-memory clips, so the run needs no sound device.
///
/// # Errors
/// [`ChartError::Domain`] when `fps` or `seconds` is not positive,
/// [`ChartError::TooLarge`] when the run would exceed [`MAX_SIMULATED_FRAMES`],
/// plus anything opening the chart can return.
pub fn simulate_playback(
    chart: ChartFile,
    config: EditorConfig,
    seconds: f32,
    fps: f32,
) -> Result<Vec<ScrubSample>, ChartError> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(ChartError::Domain {
            parameter: "fps",
            value: fps,
        });
    }
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(ChartError::Domain {
            parameter: "seconds",
            value: seconds,
        });
    }

    let frames = (seconds * fps).ceil();
    if frames > MAX_SIMULATED_FRAMES as f32 {
        return Err(ChartError::TooLarge {
            parameter: "frame count",
            value: frames,
            limit: MAX_SIMULATED_FRAMES as f32,
        });
    }
    let frames = frames as usize;

    let audio = AudioRig::new()
        .with_music(VirtualClip::new())
        .with_voice(VirtualClip::muted());
    let mut session = Session::new(config).with_audio(audio);
    session.open_chart(chart)?;
    session.start_playback();

    let dt = 1.0 / fps;
    let mut samples = Vec::with_capacity(frames);
    for i in 1..=frames {
        let frame = session.tick(dt)?;
        samples.push(ScrubSample {
            time: i as f32 * dt,
            track_offset: frame.state.track_offset,
            audio_time: frame.state.audio_time,
            active: frame.active,
        });
    }
    Ok(samples)
}

/// Serialize a playback run to YAML, one list entry per frame.
pub fn samples_to_yaml(samples: &[ScrubSample]) -> Result<String, ChartError> {
    Ok(serde_yaml::to_string(samples)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PersistedNoteRecord;

    #[test]
    fn test_yaml_round_trip_keeps_everything() {
        let mut chart = ChartFile::default();
        chart.notes.push(PersistedNoteRecord([1.0, 2.0, 10.0, -5.0, 10.0]));
        chart.background = vec![vec![0.5, 1.5]];
        chart.lyric_positions = vec![vec![3.0, 0.0]];
        chart.lyric_texts = vec!["doo".to_string()];

        let yaml = chart_to_yaml(&chart).unwrap();
        assert!(yaml.contains("timeSignature: 4"));
        assert_eq!(chart_from_yaml(&yaml).unwrap(), chart);
    }

    #[test]
    fn test_yaml_rejects_zero_time_signature() {
        let yaml = chart_to_yaml(&ChartFile {
            time_signature: 0,
            ..ChartFile::default()
        })
        .unwrap();
        assert!(matches!(chart_from_yaml(&yaml), Err(ChartError::Format(_))));
    }

    #[test]
    fn test_malformed_yaml_is_yaml_error() {
        assert!(matches!(chart_from_yaml("tempo: [1"), Err(ChartError::Yaml(_))));
    }

    #[test]
    fn test_simulate_playback_samples_every_frame() {
        let mut chart = ChartFile::default();
        // Spans track x 5..15 after loading
        chart.notes.push(PersistedNoteRecord([1.0, 2.0, 0.0, 0.0, 0.0]));

        let samples = simulate_playback(chart, EditorConfig::default(), 2.0, 10.0).unwrap();
        assert_eq!(samples.len(), 20);

        let last = samples[19];
        assert!((last.time - 2.0).abs() < 1e-5);
        assert!((last.track_offset + 20.0).abs() < 1e-3);

        // Playhead at track x = -8 - offset; inside the note from offset -13 to -23
        assert!(samples[9].active.is_none());
        assert!(samples[14].active.is_some());
    }

    #[test]
    fn test_samples_dump_as_yaml() {
        let mut chart = ChartFile::default();
        chart.notes.push(PersistedNoteRecord([1.0, 2.0, 0.0, 0.0, 0.0]));
        let samples = simulate_playback(chart, EditorConfig::default(), 1.5, 10.0).unwrap();

        let yaml = samples_to_yaml(&samples).unwrap();
        assert!(yaml.contains("trackOffset:"));
        assert!(yaml.contains("audioTime:"));
        assert!(yaml.contains("active: null"));
        assert!(yaml.contains("semitones:"));
    }

    #[test]
    fn test_simulate_playback_rejects_overlong_run() {
        let result = simulate_playback(ChartFile::default(), EditorConfig::default(), 1e30, 60.0);
        assert!(matches!(
            result,
            Err(ChartError::TooLarge { parameter: "frame count", .. })
        ));
    }

    #[test]
    fn test_simulate_playback_rejects_bad_rate() {
        let result = simulate_playback(ChartFile::default(), EditorConfig::default(), 1.0, 0.0);
        assert!(matches!(result, Err(ChartError::Domain { parameter: "fps", .. })));
    }
}
