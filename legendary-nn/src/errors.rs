use std::error::Error;
use std::fmt;

/// An error type indicating that the neurons
/// making up a layer are inconsistent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerError {
    /// The layer has no neurons.
    NoNeurons,
    /// A neuron reads a different number of inputs
    /// than the first neuron of the layer.
    InputCountMismatch {
        neuron: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNeurons => write!(f, "layer has no neurons"),
            Self::InputCountMismatch {
                neuron,
                expected,
                found,
            } => write!(
                f,
                "neuron {} reads {} inputs, but its layer reads {}",
                neuron, found, expected
            ),
        }
    }
}

impl Error for LayerError {}
