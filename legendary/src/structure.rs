use crate::errors::StructureError;

use serde::{Deserialize, Serialize};

/// The layer widths of a fully-connected feed-forward
/// network: `[inputs, hidden..., outputs]`.
///
/// Every transition `i → i+1` carries `s[i] × s[i+1]`
/// connection weights plus one bias weight per neuron
/// of layer `i+1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct NetworkStructure {
    layers: Vec<usize>,
}

impl NetworkStructure {
    /// Creates a new structure from its layer widths.
    ///
    /// # Errors
    /// Returns an error if fewer than two layers are
    /// given, or if any layer has a width of 0.
    ///
    /// # Examples
    /// ```
    /// use legendary::NetworkStructure;
    ///
    /// let structure = NetworkStructure::new(vec![7, 4, 2]).unwrap();
    /// assert_eq!(structure.total_weights(), 7 * 4 + 4 + 4 * 2 + 2);
    ///
    /// assert!(NetworkStructure::new(vec![7]).is_err());
    /// assert!(NetworkStructure::new(vec![7, 0, 2]).is_err());
    /// ```
    pub fn new(layers: Vec<usize>) -> Result<NetworkStructure, StructureError> {
        if layers.len() < 2 {
            return Err(StructureError::TooFewLayers(layers.len()));
        }
        if let Some(index) = layers.iter().position(|width| *width == 0) {
            return Err(StructureError::EmptyLayer(index));
        }
        Ok(NetworkStructure { layers })
    }

    /// Returns all layer widths, input layer first.
    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    pub fn input_count(&self) -> usize {
        self.layers[0]
    }

    pub fn output_count(&self) -> usize {
        self.layers[self.layers.len() - 1]
    }

    /// Returns the widths of the layers between
    /// the input and output layers.
    pub fn hidden_layers(&self) -> &[usize] {
        &self.layers[1..self.layers.len() - 1]
    }

    /// Returns `(input_count, neuron_count)` for each
    /// evaluated layer, in evaluation order.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.layers.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Returns the number of weights needed to
    /// describe a network of this structure.
    pub fn total_weights(&self) -> usize {
        self.transitions()
            .map(|(inputs, neurons)| inputs * neurons + neurons)
            .sum()
    }

    /// Checks that a weight vector of length `len`
    /// fits this structure exactly.
    ///
    /// # Errors
    /// Returns an error on any length mismatch.
    pub fn check_weight_count(&self, len: usize) -> Result<(), StructureError> {
        let expected = self.total_weights();
        if len == expected {
            Ok(())
        } else {
            Err(StructureError::WeightCountMismatch {
                expected,
                found: len,
            })
        }
    }
}

impl TryFrom<Vec<usize>> for NetworkStructure {
    type Error = StructureError;

    fn try_from(layers: Vec<usize>) -> Result<Self, Self::Error> {
        NetworkStructure::new(layers)
    }
}

impl From<NetworkStructure> for Vec<usize> {
    fn from(structure: NetworkStructure) -> Vec<usize> {
        structure.layers
    }
}
