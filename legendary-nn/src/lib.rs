//! # Legendary-NN
//! Layered feed-forward neural networks whose weights are
//! evolved by the [`Legendary`](legendary) genetic algorithm.
//!
//! A [`NeuralNetwork`] is built either randomly or from a
//! [`Genome`](legendary::Genome), reading its flat weight vector
//! in layer order, then neuron order, with each neuron's bias
//! weight last. Every neuron sums its weighted inputs, adds its
//! bias weight times a constant input of -1, and squashes the
//! result through a sigmoid.
//!
//! [`NeuralNetwork`]: crate::networks::NeuralNetwork
//!
//! # Example usage
//! ```
//! use legendary::{BreedingConfig, GeneticAlgorithm, NetworkStructure};
//! use legendary_nn::{networks::NeuralNetwork, Controller};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let structure = NetworkStructure::new(vec![7, 2]).unwrap();
//! let mut algorithm = GeneticAlgorithm::new(
//!     structure.clone(),
//!     BreedingConfig::default(),
//!     StdRng::seed_from_u64(7),
//! );
//! algorithm.generate_new_population(11);
//!
//! let networks: Vec<NeuralNetwork> = algorithm
//!     .population()
//!     .iter()
//!     .map(|genome| NeuralNetwork::setup_from_genome(genome, &structure))
//!     .collect();
//!
//! for (i, network) in networks.iter().enumerate() {
//!     let outputs = network.evaluate(&[0.2; 7]);
//!     algorithm.set_genome_fitness(outputs[0] - outputs[1] + 1.0, i);
//! }
//! algorithm.breed_population();
//! ```

mod errors;
pub mod networks;

pub use errors::LayerError;

/// Anything able to turn sensor readings
/// into actuator outputs.
pub trait Controller {
    /// Returns the outputs for `inputs`.
    fn evaluate(&self, inputs: &[f32]) -> Vec<f32>;
}
