//! Training of neural agent controllers with the Legendary
//! genetic algorithm: the evolution loop, persistence of
//! records and checkpoints, run configuration, and a corridor
//! environment to train agents in.
pub mod checkpoint;
pub mod config;
pub mod corridor;
pub mod errors;
pub mod evolution;
pub mod store;

pub use checkpoint::Checkpoint;
pub use config::TrainerConfig;
pub use corridor::{Corridor, CorridorConfig};
pub use evolution::{Environment, EvolutionManager, EvolutionSettings, TickOutcome};
pub use store::{JsonStore, MemoryStore, RecordStore};
