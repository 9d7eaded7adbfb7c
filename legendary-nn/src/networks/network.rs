use super::{NeuralLayer, Neuron};
use crate::Controller;

use legendary::{Genome, NetworkStructure, StructureError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A layered feed-forward network whose
/// weights are read from and written to [`Genome`]s.
///
/// Networks serialize as their structure and flat weight
/// vector, and are checked against each other on deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkRecord", into = "NetworkRecord")]
pub struct NeuralNetwork {
    structure: NetworkStructure,
    hidden_layers: Vec<NeuralLayer>,
    output_layer: NeuralLayer,
}

impl NeuralNetwork {
    /// Creates a network of the given structure
    /// with randomly initialized weights.
    pub fn create<R: Rng + ?Sized>(structure: &NetworkStructure, rng: &mut R) -> NeuralNetwork {
        let mut layers: Vec<NeuralLayer> = structure
            .transitions()
            .map(|(inputs, neurons)| NeuralLayer::random(neurons, inputs, rng))
            .collect();
        let output_layer = layers.pop().unwrap_or_else(|| {
            panic!("network structure {:?} has no output layer", structure.layers())
        });
        NeuralNetwork {
            structure: structure.clone(),
            hidden_layers: layers,
            output_layer,
        }
    }

    /// Builds a network of the given structure from a flat weight
    /// vector, in layer order, then neuron order, bias last.
    ///
    /// # Errors
    /// Returns an error if the vector's length doesn't
    /// match the structure's total weight count.
    ///
    /// # Examples
    /// ```
    /// use legendary::NetworkStructure;
    /// use legendary_nn::networks::NeuralNetwork;
    ///
    /// let structure = NetworkStructure::new(vec![2, 1]).unwrap();
    /// let network = NeuralNetwork::from_weights(&structure, &[0.5, 0.5, 1.0]).unwrap();
    /// assert_eq!(network.evaluate(&[1.0, 1.0]), vec![0.5]);
    ///
    /// assert!(NeuralNetwork::from_weights(&structure, &[0.5, 0.5]).is_err());
    /// ```
    pub fn from_weights(
        structure: &NetworkStructure,
        weights: &[f32],
    ) -> Result<NeuralNetwork, StructureError> {
        structure.check_weight_count(weights.len())?;

        let mut remaining = weights;
        let mut layers = Vec::with_capacity(structure.layers().len() - 1);
        for (inputs, neurons) in structure.transitions() {
            let (layer_weights, rest) = remaining.split_at(neurons * (inputs + 1));
            remaining = rest;
            let neurons = layer_weights
                .chunks_exact(inputs + 1)
                .map(|w| Neuron::from_weights(w.to_vec()))
                .collect();
            layers.push(NeuralLayer::from_neurons(neurons).unwrap_or_else(|e| {
                panic!("{} in layer built for structure {:?}", e, structure.layers())
            }));
        }

        let output_layer = layers.pop().unwrap_or_else(|| {
            panic!("network structure {:?} has no output layer", structure.layers())
        });
        Ok(NeuralNetwork {
            structure: structure.clone(),
            hidden_layers: layers,
            output_layer,
        })
    }

    /// Builds a network of the given structure from a genome's weights.
    ///
    /// # Panics
    /// Panics if the genome's length doesn't
    /// match the structure's total weight count.
    pub fn setup_from_genome(genome: &Genome, structure: &NetworkStructure) -> NeuralNetwork {
        NeuralNetwork::from_weights(structure, genome.weights())
            .unwrap_or_else(|e| panic!("{} in {}", e, genome))
    }

    /// Computes the network's outputs for `inputs`.
    ///
    /// # Panics
    /// Panics if the number of inputs differs from
    /// the structure's input layer width.
    pub fn evaluate(&self, inputs: &[f32]) -> Vec<f32> {
        assert_eq!(
            inputs.len(),
            self.structure.input_count(),
            "network received {} inputs, expected {}",
            inputs.len(),
            self.structure.input_count()
        );
        let mut values = inputs.to_vec();
        for layer in &self.hidden_layers {
            values = layer.evaluate(&values);
        }
        self.output_layer.evaluate(&values)
    }

    /// Exports the network's weights as a genome
    /// with id 0 and no fitness.
    ///
    /// # Examples
    /// ```
    /// use legendary::{Genome, NetworkStructure};
    /// use legendary_nn::networks::NeuralNetwork;
    ///
    /// let structure = NetworkStructure::new(vec![2, 2]).unwrap();
    /// let genome = Genome::from_weights(4, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    /// let network = NeuralNetwork::setup_from_genome(&genome, &structure);
    ///
    /// let exported = network.convert_to_genome();
    /// assert_eq!(exported.id(), 0);
    /// assert_eq!(exported.weights(), genome.weights());
    /// ```
    pub fn convert_to_genome(&self) -> Genome {
        Genome::from_weights(0, self.layers().flat_map(NeuralLayer::weights).collect())
    }

    pub fn structure(&self) -> &NetworkStructure {
        &self.structure
    }

    pub fn output_count(&self) -> usize {
        self.output_layer.neuron_count()
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.hidden_layers.len()
    }

    /// Iterates over all layers in evaluation
    /// order, output layer last.
    pub fn layers(&self) -> impl Iterator<Item = &NeuralLayer> {
        self.hidden_layers
            .iter()
            .chain(std::iter::once(&self.output_layer))
    }
}

impl Controller for NeuralNetwork {
    fn evaluate(&self, inputs: &[f32]) -> Vec<f32> {
        NeuralNetwork::evaluate(self, inputs)
    }
}

#[derive(Serialize, Deserialize)]
struct NetworkRecord {
    structure: NetworkStructure,
    weights: Vec<f32>,
}

impl TryFrom<NetworkRecord> for NeuralNetwork {
    type Error = StructureError;

    fn try_from(record: NetworkRecord) -> Result<Self, Self::Error> {
        NeuralNetwork::from_weights(&record.structure, &record.weights)
    }
}

impl From<NeuralNetwork> for NetworkRecord {
    fn from(network: NeuralNetwork) -> Self {
        NetworkRecord {
            weights: network.layers().flat_map(NeuralLayer::weights).collect(),
            structure: network.structure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn structure(layers: Vec<usize>) -> NetworkStructure {
        NetworkStructure::new(layers).unwrap()
    }

    #[test]
    fn zero_input_outputs() {
        // With all inputs at 0, each output only depends on
        // its bias; zeroed biases give sigmoid(0) = 0.5.
        let structure = structure(vec![7, 2]);
        let mut weights = vec![0.3; structure.total_weights()];
        weights[7] = 0.0;
        weights[15] = 0.0;
        let network = NeuralNetwork::from_weights(&structure, &weights).unwrap();

        assert_eq!(network.evaluate(&[0.0; 7]), vec![0.5, 0.5]);
        assert_eq!(network.output_count(), 2);
        assert_eq!(network.hidden_layer_count(), 0);
    }

    #[test]
    fn create_layout() {
        let mut rng = StdRng::seed_from_u64(0);
        let structure = structure(vec![7, 5, 3, 2]);
        let network = NeuralNetwork::create(&structure, &mut rng);

        assert_eq!(network.hidden_layer_count(), 2);
        assert_eq!(network.output_count(), 2);
        let shapes: Vec<_> = network
            .layers()
            .map(|l| (l.input_count(), l.neuron_count()))
            .collect();
        assert_eq!(shapes, vec![(7, 5), (5, 3), (3, 2)]);
        assert_eq!(
            network.convert_to_genome().weights().len(),
            structure.total_weights()
        );

        let outputs = network.evaluate(&[0.5; 7]);
        assert_eq!(outputs.len(), 2);
        assert!(outputs.iter().all(|o| (0.0..=1.0).contains(o)));
    }

    #[test]
    fn genome_round_trip() {
        let mut rng = StdRng::seed_from_u64(1);
        let structure = structure(vec![4, 6, 3]);
        let genome = Genome::random(12, structure.total_weights(), &mut rng);

        let network = NeuralNetwork::setup_from_genome(&genome, &structure);
        assert_eq!(network.convert_to_genome().weights(), genome.weights());
    }

    #[test]
    fn weight_order() {
        // 1 input, 2 hidden, 1 output.
        let structure = structure(vec![1, 2, 1]);
        let weights = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let network = NeuralNetwork::from_weights(&structure, &weights).unwrap();

        let neurons: Vec<_> = network
            .layers()
            .flat_map(|l| l.neurons().iter().map(|n| n.weights().to_vec()))
            .collect();
        assert_eq!(neurons, vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0, 7.0]]);
    }

    #[test]
    fn controller() {
        let structure = structure(vec![2, 1]);
        let network = NeuralNetwork::from_weights(&structure, &[0.5, 0.5, 1.0]).unwrap();
        let controller: &dyn Controller = &network;
        assert_eq!(controller.evaluate(&[1.0, 1.0]), vec![0.5]);
    }

    #[test]
    fn serde_round_trip() {
        let mut rng = StdRng::seed_from_u64(3);
        let network = NeuralNetwork::create(&structure(vec![3, 2, 1]), &mut rng);

        let json = serde_json::to_string(&network).unwrap();
        let restored: NeuralNetwork = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, network);
        assert_eq!(restored.evaluate(&[0.1, 0.2, 0.3]), network.evaluate(&[0.1, 0.2, 0.3]));
    }

    #[test]
    fn serde_rejects_mismatched_weights() {
        let json = r#"{"structure":[2,1],"weights":[0.5,0.5]}"#;
        assert!(serde_json::from_str::<NeuralNetwork>(json).is_err());
        let json = r#"{"structure":[2],"weights":[0.5,0.5,1.0]}"#;
        assert!(serde_json::from_str::<NeuralNetwork>(json).is_err());
    }

    #[test]
    #[should_panic]
    fn setup_from_short_genome() {
        let structure = structure(vec![7, 2]);
        NeuralNetwork::setup_from_genome(&Genome::from_weights(0, vec![0.0; 15]), &structure);
    }

    #[test]
    #[should_panic]
    fn evaluate_wrong_input_count() {
        let mut rng = StdRng::seed_from_u64(2);
        let network = NeuralNetwork::create(&structure(vec![7, 2]), &mut rng);
        network.evaluate(&[0.0; 6]);
    }
}
