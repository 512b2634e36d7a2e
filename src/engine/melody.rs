use crate::engine::grouping::GroupingMutator;
use crate::engine::note::{DurationMutator, PitchMutator};
use crate::engine::selector::WeightedMagnitudeSelector;
use crate::engine::NoteOperation;
use crate::error::{MutationError, Result};
use crate::model::melody::{Melody, NoteGroup};
use log::trace;
use rand::Rng;
use rand::seq::index;

pub const DEFAULT_MUTATION_PERCENTAGE: u32 = 25;

/// Produces candidate variations of a fixed seed melody.
///
/// Each group of the seed is independently considered for mutation with `mutation_percentage`
/// odds. A chosen group is then regrouped (split or join) with the same odds, otherwise a
/// weighted-random subset of its notes has its pitch and/or duration nudged.
///
/// The mutator owns its random source, so separate sessions never share a stream and a session
/// seeded with a fixed value replays exactly.
#[derive(Debug, Clone)]
pub struct MelodyMutator<R: Rng> {
    seed: Melody,
    mutation_percentage: u32,
    rng: R,
    pitch: PitchMutator,
    duration: DurationMutator,
    grouping: GroupingMutator,
}

impl<R: Rng> MelodyMutator<R> {
    pub fn new(seed: Melody, mutation_percentage: u32, rng: R) -> Result<Self> {
        if !(1..=100).contains(&mutation_percentage) {
            return Err(MutationError::InvalidMutationPercentage(mutation_percentage));
        }

        let pitch = PitchMutator::default();
        Ok(Self {
            seed,
            mutation_percentage,
            rng,
            grouping: GroupingMutator::new(pitch.clone()),
            pitch,
            duration: DurationMutator::default(),
        })
    }

    pub fn seed(&self) -> &Melody {
        &self.seed
    }

    pub fn mutation_percentage(&self) -> u32 {
        self.mutation_percentage
    }

    /// Generate one candidate. The seed is only ever read.
    pub fn mutate(&mut self) -> Melody {
        let percentage = self.mutation_percentage;
        let rng = &mut self.rng;
        let mut groups = Vec::with_capacity(self.seed.len());

        for (i, group) in self.seed.groups().iter().enumerate() {
            if !roll(rng, percentage) {
                groups.push(group.clone());
                continue;
            }

            let mutated = if roll(rng, percentage) {
                trace!("Regrouping note group {}..!", i);
                self.grouping.mutate(group, rng)
            } else {
                trace!("Mutating notes of group {}..!", i);
                mutate_notes(group, &self.pitch, &self.duration, rng)
            };

            groups.push(mutated);
        }

        Melody::from_groups(groups)
    }
}

/// Percentage check shared by the "mutate at all" and "regroup" decisions.
fn roll(rng: &mut impl Rng, percentage: u32) -> bool {
    rng.random_range(1..=100) <= percentage
}

fn mutate_notes(
    group: &NoteGroup,
    pitch: &PitchMutator,
    duration: &DurationMutator,
    rng: &mut impl Rng,
) -> NoteGroup {
    let mut notes = group.notes().to_vec();

    let positions = if notes.len() == 1 {
        vec![0]
    } else {
        let count = WeightedMagnitudeSelector::new(notes.len()).draw(rng);
        index::sample(rng, notes.len(), count).into_vec()
    };

    for position in positions {
        let operation = NoteOperation::random(rng);
        notes[position] = operation.apply(&notes[position], pitch, duration, rng);
    }

    NoteGroup { notes }
}
