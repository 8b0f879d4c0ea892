//! Winner persistence
//!
//! A genome is saved inside a versioned JSON envelope that also records the
//! network shape it was evolved for. Writes go to a temp file first and are
//! renamed into place.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::evolution::{Genome, NetworkShape};

/// Current envelope version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGenome {
    pub version: u32,
    /// Generation the genome was scored in
    pub generation: u32,
    pub shape: NetworkShape,
    pub genome: Genome,
}

impl SavedGenome {
    pub fn new(genome: Genome, shape: NetworkShape, generation: u32) -> Self {
        Self {
            version: SAVE_VERSION,
            generation,
            shape,
            genome,
        }
    }

    pub fn to_json(&self) -> io::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
    }

    /// Parse and validate an envelope
    pub fn from_json(json: &str) -> io::Result<Self> {
        let saved: Self =
            serde_json::from_str(json).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

        if saved.version > SAVE_VERSION {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("unsupported save version {}", saved.version),
            ));
        }
        let expected = saved.shape.weight_count();
        if saved.genome.weights.len() != expected {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "genome has {} weights, shape needs {}",
                    saved.genome.weights.len(),
                    expected
                ),
            ));
        }
        Ok(saved)
    }
}

/// Save the winning genome
pub fn save_winner(path: &Path, saved: &SavedGenome) -> io::Result<()> {
    let json = saved.to_json()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    log::info!(
        "Saved genome {} (fitness {:.2}) to {}",
        saved.genome.id,
        saved.genome.fitness,
        path.display()
    );
    Ok(())
}

/// Load a genome saved by [`save_winner`]
pub fn load_winner(path: &Path) -> io::Result<SavedGenome> {
    let json = fs::read_to_string(path)?;
    let saved = SavedGenome::from_json(&json)?;
    log::info!(
        "Loaded genome {} from generation {} ({})",
        saved.genome.id,
        saved.generation,
        path.display()
    );
    Ok(saved)
}
