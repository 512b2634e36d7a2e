use crate::error::{MutationError, Result};
use serde::{Deserialize, Serialize};

/// A single pitched note. Serialized as `[pitch, duration]`.
///
/// `pitch` is a MIDI-style note number but is deliberately unbounded: the mutation engine never
/// clamps it to 0..=127, consumers that need a playable range must handle that themselves.
/// `duration` is measured in beats and is always strictly positive.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(try_from = "(i32, f64)", into = "(i32, f64)")]
pub struct Note {
    pub(crate) pitch: i32,
    pub(crate) duration: f64,
}

impl Note {
    pub fn new(pitch: i32, duration: f64) -> Result<Self> {
        if !is_valid_duration(duration) {
            return Err(MutationError::InvalidDuration(duration));
        }

        Ok(Self { pitch, duration })
    }

    pub fn pitch(&self) -> i32 {
        self.pitch
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

impl TryFrom<(i32, f64)> for Note {
    type Error = MutationError;

    fn try_from((pitch, duration): (i32, f64)) -> Result<Self> {
        Note::new(pitch, duration)
    }
}

impl From<Note> for (i32, f64) {
    fn from(note: Note) -> Self {
        (note.pitch, note.duration)
    }
}

/// Notes that begin at the same time point. Never empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<Note>", into = "Vec<Note>")]
pub struct NoteGroup {
    pub(crate) notes: Vec<Note>,
}

impl NoteGroup {
    pub fn new(notes: Vec<Note>) -> Result<Self> {
        if notes.is_empty() {
            return Err(MutationError::EmptyNoteGroup);
        }

        Ok(Self { notes })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// The longest duration in the group, i.e. how long until the next time point.
    pub fn span(&self) -> f64 {
        self.notes
            .iter()
            .map(|note| note.duration)
            .fold(0.0, f64::max)
    }
}

impl TryFrom<Vec<Note>> for NoteGroup {
    type Error = MutationError;

    fn try_from(notes: Vec<Note>) -> Result<Self> {
        NoteGroup::new(notes)
    }
}

impl From<NoteGroup> for Vec<Note> {
    fn from(group: NoteGroup) -> Self {
        group.notes
    }
}

/// An ordered phrase of note groups. The group count never changes under mutation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<NoteGroup>", into = "Vec<NoteGroup>")]
pub struct Melody {
    groups: Vec<NoteGroup>,
}

impl Melody {
    pub fn new(groups: Vec<NoteGroup>) -> Result<Self> {
        if groups.is_empty() {
            return Err(MutationError::EmptyMelody);
        }

        Ok(Self { groups })
    }

    /// Build a melody from raw `(pitch, duration)` pairs, validating every level.
    pub fn from_pairs(groups: &[&[(i32, f64)]]) -> Result<Self> {
        let groups = groups
            .iter()
            .map(|group| {
                let notes = group
                    .iter()
                    .map(|&pair| Note::try_from(pair))
                    .collect::<Result<Vec<_>>>()?;
                NoteGroup::new(notes)
            })
            .collect::<Result<Vec<_>>>()?;

        Melody::new(groups)
    }

    pub fn groups(&self) -> &[NoteGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn note_count(&self) -> usize {
        self.groups.iter().map(NoteGroup::len).sum()
    }

    /// Total length in beats, advancing by each group's longest note.
    pub fn total_beats(&self) -> f64 {
        self.groups.iter().map(NoteGroup::span).sum()
    }

    /// Only the mutation engine assembles melodies from already-validated groups.
    pub(crate) fn from_groups(groups: Vec<NoteGroup>) -> Self {
        Self { groups }
    }
}

impl TryFrom<Vec<NoteGroup>> for Melody {
    type Error = MutationError;

    fn try_from(groups: Vec<NoteGroup>) -> Result<Self> {
        Melody::new(groups)
    }
}

impl From<Melody> for Vec<NoteGroup> {
    fn from(melody: Melody) -> Self {
        melody.groups
    }
}

pub(crate) fn is_valid_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}
