//! A fixed-topology genetic algorithm for evolving the weights
//! of layered feed-forward neural networks.
//!
//! Every genome is a flat vector of weights for a known
//! [`NetworkStructure`]. Each generation, the fittest genomes are
//! selected, the top _alphas_ survive unchanged, and all selected
//! genomes are crossed with the ones ranked below them. The best
//! genome ever seen, the _legend_, is kept apart from the population
//! and re-introduced whenever the population falls too far behind it.
//!
//! Networks that read and write these genomes are supplied by the
//! `legendary-nn` crate.
//!
//! # Example usage: evolving a single output towards 1
//! ```
//! use legendary::{BreedingConfig, GeneticAlgorithm, NetworkStructure};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // The fitness of a 1-1 network genome evaluated at input 1,
//! // ignoring the activation function.
//! fn evaluate(weights: &[f32]) -> f32 {
//!     (2.0 - (1.0 - (weights[0] - weights[1])).abs()).max(0.0)
//! }
//!
//! let structure = NetworkStructure::new(vec![1, 1]).unwrap();
//! let mut algorithm = GeneticAlgorithm::new(
//!     structure,
//!     BreedingConfig::default(),
//!     StdRng::seed_from_u64(42),
//! );
//! algorithm.generate_new_population(20);
//!
//! for _ in 0..30 {
//!     for i in 0..algorithm.population().len() {
//!         let fitness = evaluate(algorithm.population()[i].weights());
//!         algorithm.set_genome_fitness(fitness, i);
//!     }
//!     algorithm.breed_population();
//! }
//!
//! let legend = algorithm.legend().unwrap();
//! assert!(legend.fitness() > 1.0);
//! println!("Best genome: {}", legend);
//! ```

mod algorithm;
mod errors;
mod genome;
pub mod records;
pub mod rng;
mod structure;

/// Identity of a genome within a population.
pub type GenomeId = usize;

pub use algorithm::logging;
pub use algorithm::{
    BreedOutcome, BreedingConfig, GeneticAlgorithm, PopulationSnapshot, SelectionPolicy,
};
pub use errors::StructureError;
pub use genome::Genome;
pub use structure::NetworkStructure;
