//! # Chart Notes
//!
//! Live notes in track space and the ordered collection that owns them.
//!
//! Storage order matters: it is the order notes are saved in and the tie-break
//! used by playback when two notes overlap the playhead.

use crate::error::ChartError;
use crate::geometry::{Color, Point2};
use crate::glissando::{Glissando, STRAIGHT_EPSILON};

/// Which end of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

/// A slide note in track space (relative to the track origin).
///
/// `start.x <= end.x` always holds and the two never share an x position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    start: Point2,
    end: Point2,
    pub start_color: Color,
    pub end_color: Color,
}

impl Note {
    /// Build a note, ordering the endpoints by x.
    ///
    /// # Errors
    /// [`ChartError::ZeroWidthNote`] when both endpoints share an x position.
    pub fn new(a: Point2, b: Point2, start_color: Color, end_color: Color) -> Result<Self, ChartError> {
        let (start, end) = order_endpoints(a, b)?;
        Ok(Self { start, end, start_color, end_color })
    }

    pub fn start(&self) -> Point2 {
        self.start
    }

    pub fn end(&self) -> Point2 {
        self.end
    }

    pub fn endpoint(&self, which: Endpoint) -> Point2 {
        match which {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    pub fn width(&self) -> f32 {
        self.end.x - self.start.x
    }

    pub fn glissando(&self) -> Glissando {
        Glissando::new(self.start, self.end)
    }

    /// Whether `x` lies strictly inside the note's horizontal span.
    pub fn spans(&self, x: f32) -> bool {
        self.start.x < x && self.end.x > x
    }

    /// Progress of `x` through the note, 0 at the start and 1 at the end.
    pub fn progress_at(&self, x: f32) -> f32 {
        (x - self.start.x) / self.width()
    }

    /// Replace both endpoints, keeping the note unchanged if the result would
    /// have zero width.
    pub fn set_endpoints(&mut self, a: Point2, b: Point2) -> Result<(), ChartError> {
        let (start, end) = order_endpoints(a, b)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Move one endpoint. If it crosses the other, the two swap roles.
    pub fn move_endpoint(&mut self, which: Endpoint, to: Point2) -> Result<(), ChartError> {
        match which {
            Endpoint::Start => self.set_endpoints(to, self.end),
            Endpoint::End => self.set_endpoints(self.start, to),
        }
    }
}

fn order_endpoints(a: Point2, b: Point2) -> Result<(Point2, Point2), ChartError> {
    if (a.x - b.x).abs() < STRAIGHT_EPSILON {
        return Err(ChartError::ZeroWidthNote);
    }
    if a.x > b.x {
        Ok((b, a))
    } else {
        Ok((a, b))
    }
}

/// Ordered notes of the open chart.
#[derive(Debug, Clone, Default)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a note and return its index.
    pub fn push(&mut self, note: Note) -> usize {
        self.notes.push(note);
        self.notes.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Result<Note, ChartError> {
        if index >= self.notes.len() {
            return Err(ChartError::InvalidNoteIndex(index));
        }
        Ok(self.notes.remove(index))
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Note, ChartError> {
        self.notes
            .get_mut(index)
            .ok_or(ChartError::InvalidNoteIndex(index))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.notes.iter_mut()
    }

    /// First note, in storage order, whose span contains `x`.
    pub fn note_at(&self, x: f32) -> Option<(usize, &Note)> {
        self.notes.iter().enumerate().find(|(_, note)| note.spans(x))
    }
}
