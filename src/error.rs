use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Mutation percentage must be within 1..=100, got {0}..!")]
    InvalidMutationPercentage(u32),

    #[error("Batch size must be greater than 0, got {0}..!")]
    InvalidBatchSize(usize),

    #[error("A melody needs at least one note group..!")]
    EmptyMelody,

    #[error("A note group needs at least one note..!")]
    EmptyNoteGroup,

    #[error("Note durations must be positive and finite, got {0}..!")]
    InvalidDuration(f64),

    /// The batch loop ran out of attempts before collecting enough distinct melodies.
    #[error(
        "Gave up after {attempts} mutation attempts with only {accepted} of {target} distinct melodies..!"
    )]
    NonTerminatingGeneration {
        accepted: usize,
        target: usize,
        attempts: usize,
    },
}

pub type Result<T> = std::result::Result<T, MutationError>;
