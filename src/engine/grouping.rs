use crate::engine::NoteMutator;
use crate::engine::note::PitchMutator;
use crate::engine::selector::WeightedMagnitudeSelector;
use crate::model::melody::{Note, NoteGroup, is_valid_duration};
use log::trace;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Notes shorter than this are never split.
pub const MIN_SPLIT_DURATION: f64 = 0.5;

const HALVES_STEP: f64 = 0.5;
const THIRDS_STEP: f64 = 0.75;

/// Splits one note of a group into two or three, or joins the leading notes of a group into one.
#[derive(Debug, Clone, Default)]
pub struct GroupingMutator {
    pitch: PitchMutator,
}

impl GroupingMutator {
    pub fn new(pitch: PitchMutator) -> Self {
        Self { pitch }
    }

    /// Picks split or join with equal odds.
    pub fn mutate(&self, group: &NoteGroup, rng: &mut impl Rng) -> NoteGroup {
        if rng.random_bool(0.5) {
            let index = rng.random_range(0..group.len());
            self.split_at(group, index, rng)
        } else {
            if group.len() <= 1 {
                return group.clone();
            }

            let count = WeightedMagnitudeSelector::new(group.len() - 1).draw(rng) + 1;
            self.join_first(group, count, rng)
        }
    }

    /// Splits the note at `index` into halves or thirds, in place.
    ///
    /// Every new note after the first gets its own pitch mutation. Notes shorter than half a beat,
    /// or whose duration divides into neither halves nor thirds cleanly, are left alone.
    pub fn split_at(&self, group: &NoteGroup, index: usize, rng: &mut impl Rng) -> NoteGroup {
        let Some(target) = group.notes.get(index).copied() else {
            return group.clone();
        };

        if target.duration < MIN_SPLIT_DURATION {
            return group.clone();
        }

        let pieces = if is_multiple_of(target.duration, HALVES_STEP) {
            2
        } else if is_multiple_of(target.duration, THIRDS_STEP) {
            3
        } else {
            trace!(
                "Leaving note {:?} unsplit, duration fits neither halves nor thirds..!",
                target
            );
            return group.clone();
        };

        let shortened = Note {
            pitch: target.pitch,
            duration: target.duration / pieces as f64,
        };

        let mut notes = Vec::with_capacity(group.len() + pieces - 1);
        notes.extend_from_slice(&group.notes[..index]);
        notes.push(shortened);
        for _ in 1..pieces {
            notes.push(self.pitch.mutate(&shortened, rng));
        }
        notes.extend_from_slice(&group.notes[index + 1..]);

        NoteGroup { notes }
    }

    /// Merges the first `count` notes into one, keeping one of their pitches at random and the
    /// sum of their durations. The merged note leads the group, followed by the untouched rest.
    pub fn join_first(&self, group: &NoteGroup, count: usize, rng: &mut impl Rng) -> NoteGroup {
        let count = count.min(group.len());
        if count <= 1 {
            return group.clone();
        }

        let (joined, remaining) = group.notes.split_at(count);
        let Some(pitch) = joined.choose(rng).map(|note| note.pitch) else {
            return group.clone();
        };

        let duration: f64 = joined.iter().map(|note| note.duration).sum();
        if !is_valid_duration(duration) {
            trace!(
                "Discarding join of {} notes, merged duration {} is out of range..!",
                count,
                duration
            );
            return group.clone();
        }

        let merged = Note { pitch, duration };

        let mut notes = Vec::with_capacity(remaining.len() + 1);
        notes.push(merged);
        notes.extend_from_slice(remaining);

        NoteGroup { notes }
    }
}

fn is_multiple_of(duration: f64, step: f64) -> bool {
    duration % step == 0.0
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn group(pairs: &[(i32, f64)]) -> NoteGroup {
        NoteGroup::new(
            pairs
                .iter()
                .map(|&(pitch, duration)| Note::new(pitch, duration).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn split_too_short_is_noop() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(1);
        let input = group(&[(60, 0.25)]);

        for _ in 0..100 {
            assert_eq!(mutator.split_at(&input, 0, &mut rng), input);
        }
    }

    #[test]
    fn split_into_halves() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(2);
        let input = group(&[(48, 0.5), (60, 2.0), (52, 1.0)]);

        let out = mutator.split_at(&input, 1, &mut rng);
        let notes = out.notes();

        assert_eq!(notes.len(), 4);
        assert_eq!(notes[0], input.notes()[0]);
        assert_eq!(notes[1], Note::new(60, 1.0).unwrap());
        assert_eq!(notes[2].duration(), 1.0);
        assert_ne!(notes[2].pitch(), 60);
        assert_eq!(notes[3], input.notes()[2]);
    }

    #[test]
    fn split_into_thirds() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(3);
        let input = group(&[(60, 0.75), (55, 0.25)]);

        let out = mutator.split_at(&input, 0, &mut rng);
        let notes = out.notes();

        assert_eq!(notes.len(), 4);
        assert_eq!(notes[0], Note::new(60, 0.25).unwrap());
        assert!(notes[1..3].iter().all(|note| note.duration() == 0.25));
        assert!(notes[1..3].iter().all(|note| note.pitch() != 60));
        assert_eq!(notes[3], input.notes()[1]);
    }

    #[test]
    fn split_without_clean_division_is_noop() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(4);

        for duration in [1.25, 0.6, 1.75] {
            let input = group(&[(60, duration)]);
            assert_eq!(mutator.split_at(&input, 0, &mut rng), input);
        }
    }

    #[test]
    fn join_whole_group() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(5);
        let input = group(&[(51, 0.25), (53, 0.25), (55, 1.0)]);

        for _ in 0..50 {
            let out = mutator.join_first(&input, 3, &mut rng);
            assert_eq!(out.len(), 1);

            let merged = out.notes()[0];
            assert_eq!(merged.duration(), 1.5);
            assert!([51, 53, 55].contains(&merged.pitch()));
        }
    }

    #[test]
    fn join_keeps_trailing_notes() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(6);
        let input = group(&[(51, 0.25), (53, 0.25), (55, 1.0), (51, 0.5)]);

        let out = mutator.join_first(&input, 2, &mut rng);
        let notes = out.notes();

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].duration(), 0.5);
        assert!([51, 53].contains(&notes[0].pitch()));
        assert_eq!(&notes[1..], &input.notes()[2..]);
    }

    #[test]
    fn join_single_note_is_noop() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(7);
        let input = group(&[(60, 1.0)]);

        for _ in 0..100 {
            assert_eq!(mutator.join_first(&input, 2, &mut rng), input);
        }
    }

    #[test]
    fn join_overflowing_duration_is_noop() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(9);
        let input = group(&[(60, 1e308), (61, 1e308), (62, 1.0)]);

        for count in 2..=3 {
            let out = mutator.join_first(&input, count, &mut rng);
            assert_eq!(out, input);

            let json = serde_json::to_string(&out).unwrap();
            assert!(serde_json::from_str::<NoteGroup>(&json).is_ok());
        }
    }

    #[test]
    fn join_size_favours_small_counts() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(10);
        // Only the two leading quarter notes are too short to split, and splits only ever grow
        // the group, so lengths 1..=3 come from joins of 4, 3 and 2 notes.
        let input = group(&[(51, 0.25), (53, 0.25), (55, 1.0), (51, 0.5)]);

        let mut lengths = [0usize; 6];
        for _ in 0..7_000 {
            lengths[mutator.mutate(&input, &mut rng).len()] += 1;
        }

        let (join_two, join_three, join_four) = (lengths[3], lengths[2], lengths[1]);
        assert!((1_700..2_300).contains(&join_two), "{lengths:?}");
        assert!((800..1_200).contains(&join_three), "{lengths:?}");
        assert!((380..620).contains(&join_four), "{lengths:?}");
        assert!(join_two > join_three && join_three > join_four, "{lengths:?}");
        assert_eq!(lengths[0], 0);
    }

    #[test]
    fn random_grouping_preserves_invariants() {
        env_logger::try_init().unwrap_or(());

        let mutator = GroupingMutator::default();
        let mut rng = StdRng::seed_from_u64(8);
        let input = group(&[(51, 0.25), (53, 0.25), (55, 1.0), (51, 0.5)]);
        let total: f64 = input.notes().iter().map(|note| note.duration()).sum();

        for _ in 0..2_000 {
            let out = mutator.mutate(&input, &mut rng);
            assert!(!out.is_empty());
            assert!(out.notes().iter().all(|note| note.duration() > 0.0));

            // Splits and joins both conserve the group's summed duration.
            let out_total: f64 = out.notes().iter().map(|note| note.duration()).sum();
            assert_eq!(out_total, total);
        }
    }
}
