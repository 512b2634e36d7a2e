use crate::engine::NoteMutator;
use crate::engine::selector::WeightedMagnitudeSelector;
use crate::model::melody::{Note, is_valid_duration};
use log::trace;
use rand::Rng;

/// Largest pitch step in semitones, one octave.
pub const MAX_PITCH_STEP: usize = 12;

/// Duration deltas in beats, indexed by magnitude class - 1.
pub const DURATION_STEPS: [f64; 3] = [0.25, 0.5, 1.0];

/// Nudges a note up or down by 1..=12 semitones, small steps being far more likely.
#[derive(Debug, Clone)]
pub struct PitchMutator {
    selector: WeightedMagnitudeSelector,
}

impl Default for PitchMutator {
    fn default() -> Self {
        Self {
            selector: WeightedMagnitudeSelector::new(MAX_PITCH_STEP),
        }
    }
}

impl NoteMutator for PitchMutator {
    fn mutate(&self, note: &Note, rng: &mut impl Rng) -> Note {
        let step = self.selector.draw(rng) as i32;
        let mut mutated = *note;

        mutated.pitch = if rng.random_bool(0.5) {
            note.pitch.saturating_add(step)
        } else {
            note.pitch.saturating_sub(step)
        };

        mutated
    }
}

/// Lengthens or shortens a note by a quarter, half or whole beat.
///
/// A change that would leave the note with no duration is dropped and the original kept.
#[derive(Debug, Clone)]
pub struct DurationMutator {
    selector: WeightedMagnitudeSelector,
}

impl Default for DurationMutator {
    fn default() -> Self {
        Self {
            selector: WeightedMagnitudeSelector::new(DURATION_STEPS.len()),
        }
    }
}

impl NoteMutator for DurationMutator {
    fn mutate(&self, note: &Note, rng: &mut impl Rng) -> Note {
        let delta = DURATION_STEPS[self.selector.draw(rng) - 1];
        let mut mutated = *note;

        let duration = if rng.random_bool(0.5) {
            note.duration + delta
        } else {
            note.duration - delta
        };

        if is_valid_duration(duration) {
            mutated.duration = duration;
        } else {
            trace!(
                "Discarding duration change {} -> {} for pitch {}..!",
                note.duration, duration, note.pitch
            );
        }

        mutated
    }
}
