use crate::model::melody::Melody;
use anyhow::{Result, anyhow, bail};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::Path;

/// Parse the seed melody from inline JSON, or from a JSON file when no inline melody is given.
pub fn load_seed_melody(inline: Option<&str>, file: Option<&Path>) -> Result<Melody> {
    let (json, origin) = match (inline, file) {
        (Some(json), _) => (json.to_string(), String::from("<argument>")),
        (None, Some(path)) => {
            let json = fs::read_to_string(path).map_err(|e| {
                anyhow!("Failed to read melody file {}: {}", path.display(), e)
            })?;
            (json, path.display().to_string())
        }
        (None, None) => bail!("No seed melody given..!"),
    };

    serde_json::from_str(&json).map_err(|e| anyhow!("Invalid melody in {}: {}", origin, e))
}

/// A generator private to one mutation session. Seeded runs replay exactly.
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            info!("Using rng seed {}..!", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

pub fn variant_file_name(index: usize) -> String {
    format!("variant_{:02}.mid", index + 1)
}
