use crate::batch::{DEFAULT_BATCH_SIZE, DEFAULT_ITERATION_CEILING};
use crate::engine::DEFAULT_MUTATION_PERCENTAGE;
use crate::midi_exporter::DEFAULT_TEMPO_BPM;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "MELODY_BREEDER",
    about = "Generate a batch of mutated variations of a seed melody!"
)]
pub struct Args {
    /// The seed melody as JSON: a list of note groups, each a list of [pitch, duration] pairs.
    /// Example: '[[[48,1.0]],[[51,0.25],[53,0.25],[55,1.0],[51,0.5]],[[48,2.0]]]'
    #[arg(required_unless_present = "melody_file", conflicts_with = "melody_file")]
    pub melody: Option<String>,

    /// Read the seed melody JSON from a file instead.
    #[arg(short = 'f', long = "melody-file")]
    pub melody_file: Option<PathBuf>,

    /// Percent chance (1-100) that each note group mutates, and that a mutating group is split or joined.
    #[arg(short = 'p', long, default_value_t = DEFAULT_MUTATION_PERCENTAGE)]
    pub mutation_percentage: u32,

    /// How many distinct melodies to generate.
    #[arg(short = 'n', long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub count: usize,

    /// Give up after this many mutation attempts.
    #[arg(long, default_value_t = DEFAULT_ITERATION_CEILING)]
    pub ceiling: usize,

    /// Seed for the random generator, for reproducible batches.
    #[arg(short = 's', long = "rng-seed")]
    pub rng_seed: Option<u64>,

    /// Directory to write each generated melody to as a MIDI file.
    #[arg(short = 'o', long = "midi-dir")]
    pub midi_dir: Option<PathBuf>,

    /// Tempo for written MIDI files, in beats per minute.
    #[arg(short, long, default_value_t = DEFAULT_TEMPO_BPM)]
    pub tempo: u32,

    /// Dry run (print the batch and skip writing MIDI files).
    #[arg(short, long, default_value_t = false)]
    pub dry_run: bool,
}
