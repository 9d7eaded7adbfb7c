//! Layered feed-forward networks and their building blocks.
mod activation;
mod layer;
mod network;
mod neuron;

pub use activation::{sigmoid, ACTIVATION_RESPONSE, BIAS};
pub use layer::NeuralLayer;
pub use network::NeuralNetwork;
pub use neuron::Neuron;
