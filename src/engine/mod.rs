use crate::model::melody::Note;
use rand::Rng;

mod grouping;
mod melody;
mod note;
mod selector;

pub use grouping::{GroupingMutator, MIN_SPLIT_DURATION};
pub use melody::{DEFAULT_MUTATION_PERCENTAGE, MelodyMutator};
pub use note::{DURATION_STEPS, DurationMutator, MAX_PITCH_STEP, PitchMutator};
pub use selector::{MAX_CLASSES, WeightedMagnitudeSelector, scaled_thresholds};

pub trait NoteMutator {
    /// Return a mutated copy of `note`, leaving the original untouched.
    fn mutate(&self, note: &Note, rng: &mut impl Rng) -> Note;
}

/// Which per-note mutators a selected note goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOperation {
    PitchOnly,
    DurationOnly,
    PitchAndDuration,
}

impl NoteOperation {
    pub const ALL: [NoteOperation; 3] = [
        NoteOperation::PitchOnly,
        NoteOperation::DurationOnly,
        NoteOperation::PitchAndDuration,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Runs the operation's mutators in order, each one seeing the previous one's output.
    pub fn apply(
        self,
        note: &Note,
        pitch: &PitchMutator,
        duration: &DurationMutator,
        rng: &mut impl Rng,
    ) -> Note {
        match self {
            Self::PitchOnly => pitch.mutate(note, rng),
            Self::DurationOnly => duration.mutate(note, rng),
            Self::PitchAndDuration => {
                let pitched = pitch.mutate(note, rng);
                duration.mutate(&pitched, rng)
            }
        }
    }
}
