//! Checkpointing of a whole training run as RON.
use crate::errors::CheckpointError;
use crate::evolution::{EvolutionManager, TrainingProgress};

use legendary::PopulationSnapshot;
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::Path;

/// Everything needed to resume a training run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Format version, for compatibility checking.
    pub version: u32,
    pub snapshot: PopulationSnapshot,
    pub progress: TrainingProgress,
}

impl Checkpoint {
    pub const VERSION: u32 = 1;

    /// Captures the state of a training run.
    pub fn capture<E, S, R>(manager: &EvolutionManager<E, S, R>) -> Checkpoint {
        Checkpoint {
            version: Self::VERSION,
            snapshot: manager.algorithm().snapshot(),
            progress: manager.progress().clone(),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Loads a checkpoint file.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or parsed,
    /// or was written by an incompatible version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Checkpoint, CheckpointError> {
        let contents = fs::read_to_string(path)?;
        let checkpoint: Checkpoint = ron::from_str(&contents)?;
        if checkpoint.version != Self::VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: Self::VERSION,
                found: checkpoint.version,
            });
        }
        Ok(checkpoint)
    }

    /// Checks that the stored networks read `inputs`
    /// values and produce `outputs` values.
    pub fn check_widths(&self, inputs: usize, outputs: usize) -> Result<(), CheckpointError> {
        let structure = &self.snapshot.structure;
        let found = (structure.input_count(), structure.output_count());
        if found != (inputs, outputs) {
            return Err(CheckpointError::WidthMismatch {
                expected: (inputs, outputs),
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corridor::{Corridor, CorridorConfig, OUTPUT_COUNT, SENSOR_COUNT};
    use crate::evolution::{EvolutionSettings, TickOutcome};
    use crate::store::MemoryStore;

    use legendary::{BreedingConfig, NetworkStructure};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn corridor() -> Corridor {
        let config = CorridorConfig {
            agents: 4,
            length: 200.0,
            ..CorridorConfig::default()
        };
        Corridor::new(config, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn save_and_resume() {
        let mut manager = EvolutionManager::new(
            NetworkStructure::new(vec![7, 3, 2]).unwrap(),
            BreedingConfig::default(),
            corridor(),
            MemoryStore::new(),
            EvolutionSettings {
                time_till_evolution: 2.0,
                generation_to_load: 0,
            },
            StdRng::seed_from_u64(1),
        );
        let mut generations = 0;
        while generations < 2 {
            if let TickOutcome::Evolved { .. } = manager.tick(0.1) {
                generations += 1;
            }
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("checkpoint.ron");
        let checkpoint = Checkpoint::capture(&manager);
        checkpoint.save(&path).unwrap();
        let loaded = Checkpoint::load(&path).unwrap();

        assert_eq!(loaded.version, Checkpoint::VERSION);
        assert_eq!(loaded.progress, checkpoint.progress);
        assert_eq!(loaded.snapshot.generation, 3);

        let resumed = EvolutionManager::resume(
            loaded.snapshot,
            loaded.progress,
            corridor(),
            MemoryStore::new(),
            EvolutionSettings::default(),
            StdRng::seed_from_u64(2),
        )
        .unwrap();
        assert_eq!(resumed.algorithm().generation(), 3);
        assert_eq!(resumed.networks().len(), 4);
    }

    #[test]
    fn widths_must_fit_corridor() {
        let manager = EvolutionManager::new(
            NetworkStructure::new(vec![5, 3, 2]).unwrap(),
            BreedingConfig::default(),
            corridor(),
            MemoryStore::new(),
            EvolutionSettings::default(),
            StdRng::seed_from_u64(4),
        );
        let checkpoint = Checkpoint::capture(&manager);

        assert!(checkpoint.check_widths(5, 2).is_ok());
        assert!(matches!(
            checkpoint.check_widths(SENSOR_COUNT, OUTPUT_COUNT),
            Err(CheckpointError::WidthMismatch {
                expected: (7, 2),
                found: (5, 2)
            })
        ));
    }

    #[test]
    fn version_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old-checkpoint.ron");
        let manager = EvolutionManager::new(
            NetworkStructure::new(vec![7, 2]).unwrap(),
            BreedingConfig::default(),
            corridor(),
            MemoryStore::new(),
            EvolutionSettings::default(),
            StdRng::seed_from_u64(3),
        );
        let mut checkpoint = Checkpoint::capture(&manager);
        checkpoint.version = 0;
        checkpoint.save(&path).unwrap();

        let result = Checkpoint::load(&path);
        assert!(matches!(
            result,
            Err(CheckpointError::VersionMismatch {
                expected: 1,
                found: 0
            })
        ));
    }
}
