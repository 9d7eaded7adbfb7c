use super::activation::{sigmoid, ACTIVATION_RESPONSE, BIAS};

use legendary::rng::random_clamped;
use rand::Rng;

/// A single neuron: one weight per input,
/// followed by a bias weight.
#[derive(Clone, Debug, PartialEq)]
pub struct Neuron {
    weights: Vec<f32>,
}

impl Neuron {
    /// Creates a neuron reading `input_count` inputs,
    /// with weights drawn with [`random_clamped`].
    pub fn random<R: Rng + ?Sized>(input_count: usize, rng: &mut R) -> Neuron {
        Neuron {
            weights: (0..=input_count).map(|_| random_clamped(rng)).collect(),
        }
    }

    /// Creates a neuron from its input weights
    /// followed by its bias weight.
    ///
    /// # Panics
    /// Panics if fewer than 2 weights are given.
    pub fn from_weights(weights: Vec<f32>) -> Neuron {
        assert!(
            weights.len() >= 2,
            "neuron needs at least one input weight and a bias weight, {} given",
            weights.len()
        );
        Neuron { weights }
    }

    pub fn input_count(&self) -> usize {
        self.weights.len() - 1
    }

    /// Returns all weights, bias last.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn bias(&self) -> f32 {
        self.weights[self.weights.len() - 1]
    }

    /// Computes the neuron's output for `inputs`.
    ///
    /// # Panics
    /// Panics if the number of inputs differs
    /// from the neuron's input count.
    pub fn activate(&self, inputs: &[f32]) -> f32 {
        assert_eq!(
            inputs.len(),
            self.input_count(),
            "neuron received {} inputs, expected {}",
            inputs.len(),
            self.input_count()
        );
        let activation: f32 = inputs
            .iter()
            .zip(&self.weights)
            .map(|(input, weight)| input * weight)
            .sum::<f32>()
            + self.bias() * BIAS;
        sigmoid(activation, ACTIVATION_RESPONSE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_weight_count() {
        let mut rng = StdRng::seed_from_u64(0);
        let neuron = Neuron::random(7, &mut rng);
        assert_eq!(neuron.weights().len(), 8);
        assert_eq!(neuron.input_count(), 7);
        assert!(neuron.weights().iter().all(|w| w.abs() < 1.0));
    }

    #[test]
    fn activate() {
        // a = 1*0.5 + 2*0.25 + 1*(-1) = 0
        let neuron = Neuron::from_weights(vec![0.5, 0.25, 1.0]);
        assert_eq!(neuron.activate(&[1.0, 2.0]), 0.5);

        // a = 0 + 0 + (-1)*(-1) = 1
        let neuron = Neuron::from_weights(vec![3.0, 3.0, -1.0]);
        assert_eq!(neuron.activate(&[0.0, 0.0]), sigmoid(1.0, 1.0));
    }

    #[test]
    #[should_panic]
    fn activate_wrong_inputs() {
        Neuron::from_weights(vec![0.5, 0.25, 1.0]).activate(&[1.0]);
    }

    #[test]
    #[should_panic]
    fn bias_only() {
        Neuron::from_weights(vec![1.0]);
    }
}
