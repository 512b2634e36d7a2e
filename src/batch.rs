use crate::engine::MelodyMutator;
use crate::error::{MutationError, Result};
use crate::model::melody::Melody;
use log::{debug, info, warn};
use rand::Rng;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_ITERATION_CEILING: usize = 10_000;

/// Drives a [`MelodyMutator`] until it has produced `size` melodies that differ from the seed and
/// from each other.
///
/// This is a one-shot iterator: each accepted melody is yielded as soon as it is found. If the
/// mutator is called `ceiling` times without filling the batch, a single
/// [`MutationError::NonTerminatingGeneration`] is yielded and iteration stops.
#[derive(Debug)]
pub struct BatchGenerator<R: Rng> {
    mutator: MelodyMutator<R>,
    size: usize,
    ceiling: usize,
    attempts: usize,
    accepted: Vec<Melody>,
    gave_up: bool,
}

impl<R: Rng> BatchGenerator<R> {
    pub fn new(mutator: MelodyMutator<R>, size: usize, ceiling: usize) -> Result<Self> {
        if size == 0 {
            return Err(MutationError::InvalidBatchSize(size));
        }

        Ok(Self {
            mutator,
            size,
            ceiling,
            attempts: 0,
            accepted: Vec::with_capacity(size),
            gave_up: false,
        })
    }

    /// Number of `mutate()` calls spent so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn accepted(&self) -> &[Melody] {
        &self.accepted
    }

    /// Run to completion: exactly `size` melodies, or the ceiling error.
    pub fn collect_batch(self) -> Result<Vec<Melody>> {
        self.collect()
    }

    fn is_done(&self) -> bool {
        self.gave_up || self.accepted.len() >= self.size
    }
}

impl<R: Rng> Iterator for BatchGenerator<R> {
    type Item = Result<Melody>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done() {
            return None;
        }

        while self.attempts < self.ceiling {
            self.attempts += 1;
            let candidate = self.mutator.mutate();

            if &candidate == self.mutator.seed() {
                debug!("Attempt {}: candidate matches the seed..!", self.attempts);
                continue;
            }

            if self.accepted.contains(&candidate) {
                debug!("Attempt {}: candidate already in batch..!", self.attempts);
                continue;
            }

            self.accepted.push(candidate.clone());
            debug!(
                "Attempt {}: accepted melody {}/{}..!",
                self.attempts,
                self.accepted.len(),
                self.size
            );

            if self.accepted.len() == self.size {
                info!(
                    "Generated {} distinct melodies in {} attempts..!",
                    self.size, self.attempts
                );
            }

            return Some(Ok(candidate));
        }

        self.gave_up = true;
        warn!(
            "Hit the ceiling of {} attempts with {}/{} melodies, try a higher mutation percentage..!",
            self.ceiling,
            self.accepted.len(),
            self.size
        );

        Some(Err(MutationError::NonTerminatingGeneration {
            accepted: self.accepted.len(),
            target: self.size,
            attempts: self.attempts,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_done() {
            (0, Some(0))
        } else {
            (0, Some(self.size - self.accepted.len() + 1))
        }
    }
}
