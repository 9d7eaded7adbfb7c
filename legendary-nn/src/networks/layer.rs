use super::Neuron;
use crate::errors::LayerError;

use rand::Rng;

/// A fully-connected layer of neurons
/// sharing the same inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct NeuralLayer {
    neurons: Vec<Neuron>,
    input_count: usize,
}

impl NeuralLayer {
    /// Creates a layer of `neuron_count` randomly
    /// initialized neurons, each reading `input_count` inputs.
    pub fn random<R: Rng + ?Sized>(
        neuron_count: usize,
        input_count: usize,
        rng: &mut R,
    ) -> NeuralLayer {
        NeuralLayer {
            neurons: (0..neuron_count)
                .map(|_| Neuron::random(input_count, rng))
                .collect(),
            input_count,
        }
    }

    /// Creates a layer from its neurons.
    ///
    /// # Errors
    /// Returns an error if there are no neurons,
    /// or if they read different numbers of inputs.
    ///
    /// # Examples
    /// ```
    /// use legendary_nn::networks::{NeuralLayer, Neuron};
    ///
    /// let layer = NeuralLayer::from_neurons(vec![
    ///     Neuron::from_weights(vec![0.1, 0.2, 0.3]),
    ///     Neuron::from_weights(vec![0.4, 0.5, 0.6]),
    /// ])
    /// .unwrap();
    /// assert_eq!(layer.input_count(), 2);
    /// assert_eq!(layer.neuron_count(), 2);
    ///
    /// assert!(NeuralLayer::from_neurons(vec![
    ///     Neuron::from_weights(vec![0.1, 0.2, 0.3]),
    ///     Neuron::from_weights(vec![0.4, 0.5]),
    /// ])
    /// .is_err());
    /// ```
    pub fn from_neurons(neurons: Vec<Neuron>) -> Result<NeuralLayer, LayerError> {
        let input_count = neurons
            .first()
            .ok_or(LayerError::NoNeurons)?
            .input_count();
        if let Some((neuron, found)) = neurons
            .iter()
            .map(Neuron::input_count)
            .enumerate()
            .find(|(_, count)| *count != input_count)
        {
            return Err(LayerError::InputCountMismatch {
                neuron,
                expected: input_count,
                found,
            });
        }
        Ok(NeuralLayer {
            neurons,
            input_count,
        })
    }

    /// Computes the output of every neuron for `inputs`.
    ///
    /// # Panics
    /// Panics if the number of inputs differs
    /// from the layer's input count.
    pub fn evaluate(&self, inputs: &[f32]) -> Vec<f32> {
        self.neurons.iter().map(|n| n.activate(inputs)).collect()
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Iterates over the weights of all neurons,
    /// in neuron order, bias last per neuron.
    pub fn weights(&self) -> impl Iterator<Item = f32> + '_ {
        self.neurons
            .iter()
            .flat_map(|n| n.weights().iter().copied())
    }
}
