//! Game and evolution settings
//!
//! Stored as JSON. Every field has a default, so partial files are fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE;

/// Which render sink to attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Terminal drawing
    #[default]
    Ascii,
    /// Periodic log lines only
    Log,
    /// Nothing
    None,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Ascii => "ascii",
            RenderMode::Log => "log",
            RenderMode::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ascii" | "text" => Some(RenderMode::Ascii),
            "log" => Some(RenderMode::Log),
            "none" | "off" => Some(RenderMode::None),
            _ => None,
        }
    }
}

/// Optimizer hyperparameters and fitness-run options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionSettings {
    /// Genomes per generation
    pub population_size: usize,
    /// Generation budget
    pub generations: u32,
    /// Stop early once a generation's best fitness reaches this
    pub fitness_threshold: f32,
    /// Best genomes copied unchanged into the next generation
    pub elitism: usize,
    /// Fraction of each generation allowed to reproduce
    pub survival_threshold: f32,
    /// Chance a weight is perturbed
    pub mutation_rate: f32,
    /// Standard deviation of a perturbation
    pub mutation_power: f32,
    /// Chance a weight is redrawn from scratch
    pub replace_rate: f32,
    /// Standard deviation of fresh weights
    pub weight_init_stdev: f32,
    /// Weights are clamped to +/- this
    pub weight_max: f32,
    /// Hidden layer size (0 = inputs wired straight to the output)
    pub hidden_neurons: usize,
    /// Network output above this means flap
    pub activation_threshold: f32,
    /// Optional cap on ticks per episode
    pub episode_tick_limit: Option<u64>,
    /// Where to save the winning genome
    pub winner_path: Option<PathBuf>,
}

impl Default for EvolutionSettings {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            fitness_threshold: 100.0,
            elitism: 2,
            survival_threshold: 0.2,
            mutation_rate: 0.8,
            mutation_power: 0.5,
            replace_rate: 0.1,
            weight_init_stdev: 1.0,
            weight_max: 30.0,
            hidden_neurons: 0,
            activation_threshold: 0.5,
            episode_tick_limit: None,
            winner_path: None,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ticks per second
    pub tick_rate: u32,
    /// Cap the loop at `tick_rate` (off = run as fast as possible)
    pub frame_limit: bool,
    /// Run seed (random when absent)
    pub seed: Option<u64>,
    pub render: RenderMode,
    pub evolution: EvolutionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            frame_limit: true,
            seed: None,
            render: RenderMode::Ascii,
            evolution: EvolutionSettings::default(),
        }
    }
}

impl Settings {
    /// Default file name looked up in the working directory
    pub const FILE_NAME: &'static str = "settings.json";

    /// Headless preset: no frame cap, log output only
    pub fn headless(mut self) -> Self {
        self.frame_limit = false;
        self.render = RenderMode::Log;
        self
    }

    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Failed to parse {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Failed to read {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load `settings.json` from the working directory if present
    pub fn load() -> Self {
        let path = Path::new(Self::FILE_NAME);
        if path.exists() {
            Self::load_from(path)
        } else {
            Self::default()
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Effective tick rate (never zero)
    pub fn tick_rate(&self) -> u32 {
        self.tick_rate.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_run() {
        let settings = Settings::default();
        assert_eq!(settings.tick_rate, 30);
        assert!(settings.frame_limit);
        assert_eq!(settings.evolution.generations, 50);
        assert_eq!(settings.evolution.activation_threshold, 0.5);
        assert!(settings.evolution.episode_tick_limit.is_none());
    }

    #[test]
    fn test_partial_config_with_defaults() {
        let json = r#"{
            "frame_limit": false,
            "render": "log",
            "evolution": { "population_size": 20, "hidden_neurons": 4 }
        }"#;
        let settings = Settings::from_json(json).unwrap();

        assert!(!settings.frame_limit);
        assert_eq!(settings.render, RenderMode::Log);
        assert_eq!(settings.evolution.population_size, 20);
        assert_eq!(settings.evolution.hidden_neurons, 4);

        // Untouched fields keep their defaults
        assert_eq!(settings.tick_rate, 30);
        assert_eq!(settings.evolution.generations, 50);
        assert_eq!(settings.evolution.mutation_power, 0.5);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("flappy-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.seed = Some(42);
        settings.evolution.fitness_threshold = 250.0;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.seed, Some(42));
        assert_eq!(loaded.evolution.fitness_threshold, 250.0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let loaded = Settings::load_from(Path::new("/nonexistent/flappy/settings.json"));
        assert_eq!(loaded.tick_rate, TICK_RATE);
    }

    #[test]
    fn test_render_mode_names() {
        assert_eq!(RenderMode::from_str("LOG"), Some(RenderMode::Log));
        assert_eq!(RenderMode::from_str("off"), Some(RenderMode::None));
        assert_eq!(RenderMode::from_str("gpu"), None);
        assert_eq!(RenderMode::Ascii.as_str(), "ascii");
    }
}
