use MELODY_BREEDER::{
    Args, BatchGenerator, MelodyMutator, load_seed_melody, session_rng, variant_file_name,
    write_midi,
};
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::fs;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = load_seed_melody(args.melody.as_deref(), args.melody_file.as_deref())?;
    info!(
        "Loaded seed melody with {} groups and {} notes..!",
        seed.len(),
        seed.note_count()
    );

    let mutator = MelodyMutator::new(seed, args.mutation_percentage, session_rng(args.rng_seed))?;
    let generator = BatchGenerator::new(mutator, args.count, args.ceiling)?;

    let midi_dir = if args.dry_run { None } else { args.midi_dir.as_deref() };
    if let Some(dir) = midi_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut written = 0;
    for (i, melody) in generator.enumerate() {
        let melody = melody?;
        println!("{}", serde_json::to_string(&melody)?);

        if let Some(dir) = midi_dir {
            let path = dir.join(variant_file_name(i));
            write_midi(&melody, &path, args.tempo)?;
            written += 1;
            debug!("Wrote variant {} to '{}'..!", i + 1, path.display());
        }
    }

    if let Some(dir) = midi_dir {
        info!("Wrote {} MIDI files to '{}'..!", written, dir.display());
    }

    Ok(())
}
