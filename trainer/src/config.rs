//! Training run configuration, stored as RON.
use crate::corridor::CorridorConfig;
use crate::evolution::EvolutionSettings;

use legendary::{BreedingConfig, NetworkStructure};
use serde::{Deserialize, Serialize};

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of a training run.
///
/// Every field may be omitted from a configuration
/// file, in which case its default value is used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Layer widths of the agents' networks. The input width must
    /// match the corridor's sensor count, and the output width its
    /// steering output count.
    pub structure: NetworkStructure,
    /// Seconds of simulated time each generation is allowed.
    pub time_till_evolution: f32,
    /// Seconds of simulated time per tick.
    pub tick_length: f32,
    /// Generation number of the stored best genome to
    /// seed the population with, or replay.
    pub generation_to_load: usize,
    /// Directory in which records and checkpoints are written.
    pub output_dir: PathBuf,
    /// Seed for all randomness. A random seed is
    /// picked if none is given.
    pub seed: Option<u64>,
    pub breeding: BreedingConfig,
    pub corridor: CorridorConfig,
}

impl TrainerConfig {
    /// Loads a configuration from a RON file.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or parsed,
    /// or if the configuration is invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        let config: TrainerConfig = ron::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a RON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Checks that the configuration values are usable together.
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_length <= 0.0 {
            return Err("tick_length must be positive".to_string());
        }
        if self.time_till_evolution <= 0.0 {
            return Err("time_till_evolution must be positive".to_string());
        }
        if self.structure.input_count() != crate::corridor::SENSOR_COUNT {
            return Err(format!(
                "network input width must be {}, the corridor sensor count",
                crate::corridor::SENSOR_COUNT
            ));
        }
        if self.structure.output_count() != crate::corridor::OUTPUT_COUNT {
            return Err(format!(
                "network output width must be {}, the corridor steering output count",
                crate::corridor::OUTPUT_COUNT
            ));
        }
        self.corridor.validate()
    }

    /// Returns the settings of the evolution loop.
    pub fn evolution_settings(&self) -> EvolutionSettings {
        EvolutionSettings {
            time_till_evolution: self.time_till_evolution,
            generation_to_load: self.generation_to_load,
        }
    }
}

impl Default for TrainerConfig {
    fn default() -> TrainerConfig {
        TrainerConfig {
            structure: NetworkStructure::new(vec![7, 2])
                .unwrap_or_else(|e| panic!("{} in default network structure", e)),
            time_till_evolution: 180.0,
            tick_length: 1.0 / 60.0,
            generation_to_load: 0,
            output_dir: PathBuf::from("output"),
            seed: None,
            breeding: BreedingConfig::default(),
            corridor: CorridorConfig::default(),
        }
    }
}
