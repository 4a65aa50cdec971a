//! Binary chart codec
//!
//! Little-endian throughout:
//!
//! ```text
//! magic         4 bytes  "SLCH"
//! version       u16
//! tempo         f32
//! time_sig      i32
//! endpoint      f32
//! note_spacing  i32
//! color_start   3 x f32
//! color_end     3 x f32
//! notes         u32 count, then count x 5 x f32
//! background    u32 count, then per entry: u32 len + len x f32
//! lyric_pos     u32 count, then per entry: u32 len + len x f32
//! lyric_txt     u32 count, then per entry: u32 byte len + UTF-8
//! ```

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use super::types::{ChartFile, PersistedNoteRecord};
use crate::error::ChartError;

pub const MAGIC: &[u8; 4] = b"SLCH";
pub const VERSION: u16 = 1;

/// Upper bound on up-front allocation for a length read from the file.
const MAX_PREALLOC: usize = 4096;

/// Encode a chart into its binary form.
pub fn encode_chart(chart: &ChartFile) -> Result<Vec<u8>, ChartError> {
    let mut bytes = Vec::new();
    write_chart(&mut bytes, chart)?;
    Ok(bytes)
}

/// Decode a chart from its binary form.
///
/// # Errors
/// [`ChartError::Format`] for a wrong magic or version, truncated data, or
/// lyric text that is not UTF-8.
pub fn decode_chart(bytes: &[u8]) -> Result<ChartFile, ChartError> {
    let mut reader = bytes;
    let chart = read_chart(&mut reader)?;
    if !reader.is_empty() {
        debug!("ignoring {} trailing bytes after chart data", reader.len());
    }
    Ok(chart)
}

pub fn write_chart<W: Write>(writer: &mut W, chart: &ChartFile) -> Result<(), ChartError> {
    writer.write_all(MAGIC)?;
    writer.write_u16::<LittleEndian>(VERSION)?;

    writer.write_f32::<LittleEndian>(chart.tempo)?;
    writer.write_i32::<LittleEndian>(chart.time_signature)?;
    writer.write_f32::<LittleEndian>(chart.endpoint)?;
    writer.write_i32::<LittleEndian>(chart.note_spacing)?;
    for channel in chart.note_color_start.iter().chain(chart.note_color_end.iter()) {
        writer.write_f32::<LittleEndian>(*channel)?;
    }

    write_len(writer, chart.notes.len())?;
    for record in &chart.notes {
        for field in record.0 {
            writer.write_f32::<LittleEndian>(field)?;
        }
    }

    write_float_lists(writer, &chart.background)?;
    write_float_lists(writer, &chart.lyric_positions)?;

    write_len(writer, chart.lyric_texts.len())?;
    for text in &chart.lyric_texts {
        write_len(writer, text.len())?;
        writer.write_all(text.as_bytes())?;
    }

    Ok(())
}

pub fn read_chart<R: Read>(reader: &mut R) -> Result<ChartFile, ChartError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(truncated("magic"))?;
    if &magic != MAGIC {
        return Err(ChartError::Format(format!("bad magic {:?}", magic)));
    }

    let version = reader.read_u16::<LittleEndian>().map_err(truncated("version"))?;
    if version != VERSION {
        return Err(ChartError::Format(format!("unsupported version {}", version)));
    }

    let tempo = reader.read_f32::<LittleEndian>().map_err(truncated("tempo"))?;
    let time_signature = reader.read_i32::<LittleEndian>().map_err(truncated("time signature"))?;
    let endpoint = reader.read_f32::<LittleEndian>().map_err(truncated("endpoint"))?;
    let note_spacing = reader.read_i32::<LittleEndian>().map_err(truncated("note spacing"))?;
    let note_color_start = read_color(reader)?;
    let note_color_end = read_color(reader)?;

    let note_count = read_len(reader, "note count")?;
    let mut notes = Vec::with_capacity(note_count.min(MAX_PREALLOC));
    for _ in 0..note_count {
        let mut fields = [0f32; PersistedNoteRecord::FIELDS];
        reader
            .read_f32_into::<LittleEndian>(&mut fields)
            .map_err(truncated("note record"))?;
        notes.push(PersistedNoteRecord(fields));
    }

    let background = read_float_lists(reader, "background")?;
    let lyric_positions = read_float_lists(reader, "lyric positions")?;

    let text_count = read_len(reader, "lyric count")?;
    let mut lyric_texts = Vec::with_capacity(text_count.min(MAX_PREALLOC));
    for _ in 0..text_count {
        let len = read_len(reader, "lyric length")?;
        let mut raw = Vec::with_capacity(len.min(MAX_PREALLOC));
        reader
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut raw)
            .map_err(truncated("lyric text"))?;
        if raw.len() != len {
            return Err(ChartError::Format("truncated lyric text".to_string()));
        }
        let text = String::from_utf8(raw)
            .map_err(|e| ChartError::Format(format!("lyric text is not UTF-8: {}", e)))?;
        lyric_texts.push(text);
    }

    debug!(
        "decoded chart: {} notes, tempo {}, time signature {}",
        notes.len(),
        tempo,
        time_signature
    );

    Ok(ChartFile {
        tempo,
        time_signature,
        endpoint,
        note_spacing,
        note_color_start,
        note_color_end,
        notes,
        background,
        lyric_positions,
        lyric_texts,
    })
}

fn truncated(what: &'static str) -> impl Fn(io::Error) -> ChartError {
    move |e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ChartError::Format(format!("truncated {}", what)),
        _ => ChartError::Io(e),
    }
}

fn read_color<R: Read>(reader: &mut R) -> Result<[f32; 3], ChartError> {
    let mut rgb = [0f32; 3];
    reader
        .read_f32_into::<LittleEndian>(&mut rgb)
        .map_err(truncated("note color"))?;
    Ok(rgb)
}

fn read_len<R: Read>(reader: &mut R, what: &'static str) -> Result<usize, ChartError> {
    Ok(reader.read_u32::<LittleEndian>().map_err(truncated(what))? as usize)
}

fn write_len<W: Write>(writer: &mut W, len: usize) -> Result<(), ChartError> {
    let len = u32::try_from(len)
        .map_err(|_| ChartError::Format(format!("list too long to encode ({} entries)", len)))?;
    writer.write_u32::<LittleEndian>(len)?;
    Ok(())
}

fn read_float_lists<R: Read>(reader: &mut R, what: &'static str) -> Result<Vec<Vec<f32>>, ChartError> {
    let count = read_len(reader, what)?;
    let mut lists = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        let len = read_len(reader, what)?;
        let mut values = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            values.push(reader.read_f32::<LittleEndian>().map_err(truncated(what))?);
        }
        lists.push(values);
    }
    Ok(lists)
}

fn write_float_lists<W: Write>(writer: &mut W, lists: &[Vec<f32>]) -> Result<(), ChartError> {
    write_len(writer, lists.len())?;
    for values in lists {
        write_len(writer, values.len())?;
        for value in values {
            writer.write_f32::<LittleEndian>(*value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chart() -> ChartFile {
        ChartFile {
            tempo: 96.5,
            time_signature: 3,
            endpoint: 42.0,
            note_spacing: 140,
            note_color_start: [0.2, 0.4, 0.6],
            note_color_end: [1.0, 0.5, 0.0],
            notes: vec![
                PersistedNoteRecord([0.0, 2.0, 10.0, -5.0, 10.0]),
                PersistedNoteRecord([3.5, 1.0, -20.0, 0.0, -20.0]),
            ],
            background: vec![vec![1.0, 2.0], vec![]],
            lyric_positions: vec![vec![4.0, 0.0]],
            lyric_texts: vec!["toot".to_string()],
        }
    }

    #[test]
    fn test_encode_decode_preserves_chart() {
        let chart = sample_chart();
        let bytes = encode_chart(&chart).unwrap();
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(decode_chart(&bytes).unwrap(), chart);
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode_chart(&ChartFile::default()).unwrap();
        // magic + version
        assert_eq!(&bytes[4..6], &1u16.to_le_bytes());
        assert_eq!(&bytes[6..10], &120f32.to_le_bytes());
        assert_eq!(&bytes[10..14], &4i32.to_le_bytes());
        assert_eq!(&bytes[14..18], &20f32.to_le_bytes());
        assert_eq!(&bytes[18..22], &5i32.to_le_bytes());
        // 2 colors, then four empty list counts
        assert_eq!(bytes.len(), 22 + 24 + 16);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode_chart(&sample_chart()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(decode_chart(&bytes), Err(ChartError::Format(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = encode_chart(&sample_chart()).unwrap();
        bytes[4] = 9;
        let err = decode_chart(&bytes).unwrap_err();
        assert_eq!(err.to_string(), "Invalid chart file: unsupported version 9");
    }

    #[test]
    fn test_truncated_input_is_format_error() {
        let bytes = encode_chart(&sample_chart()).unwrap();
        for cut in [0, 3, 10, 30, 60, bytes.len() - 1] {
            assert!(
                matches!(decode_chart(&bytes[..cut]), Err(ChartError::Format(_))),
                "cut at {} should fail",
                cut
            );
        }
    }

    #[test]
    fn test_invalid_utf8_lyric() {
        let mut chart = ChartFile::default();
        chart.lyric_texts = vec!["ab".to_string()];
        let mut bytes = encode_chart(&chart).unwrap();
        let last = bytes.len() - 1;
        bytes[last] = 0xFF;
        assert!(matches!(decode_chart(&bytes), Err(ChartError::Format(_))));
    }
}
