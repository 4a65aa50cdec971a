//! # Chart File Format
//!
//! The persisted, view-independent form of a chart.
//!
//! ## Sub-modules
//! - `types` - [`ChartFile`] header and [`PersistedNoteRecord`]
//! - `codec` - binary encode/decode
//!
//! ## Data space
//! Notes are saved as delta-encoded data-space records, never as track-space
//! geometry, so a chart saved at one zoom level opens identically at any other.
//! The conversion in both directions goes through [`crate::transform`].
//!
//! ## Example
//! ```rust
//! use slidechart::format::{decode_chart, encode_chart, ChartFile, PersistedNoteRecord};
//!
//! let mut chart = ChartFile::default();
//! chart.notes.push(PersistedNoteRecord([0.0, 1.0, 0.0, 33.0, 0.0]));
//!
//! let bytes = encode_chart(&chart).unwrap();
//! assert_eq!(decode_chart(&bytes).unwrap(), chart);
//! ```

mod codec;
mod types;

pub use codec::{decode_chart, encode_chart, read_chart, write_chart, MAGIC, VERSION};
pub use types::{ChartFile, PersistedNoteRecord};
