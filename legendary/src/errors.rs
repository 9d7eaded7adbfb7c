use std::error::Error;
use std::fmt;

/// An error type indicating that a network structure,
/// or a weight vector meant for one, is invalid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureError {
    /// The structure has fewer than an input and an output layer.
    TooFewLayers(usize),
    /// The layer at the given position has a width of 0.
    EmptyLayer(usize),
    /// A weight vector's length differs from the
    /// structure's total weight count.
    WeightCountMismatch { expected: usize, found: usize },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLayers(count) => write!(
                f,
                "network structure needs at least 2 layers, {} given",
                count
            ),
            Self::EmptyLayer(index) => write!(f, "network structure layer {} has no neurons", index),
            Self::WeightCountMismatch { expected, found } => write!(
                f,
                "weight vector of length {} does not match structure requiring {} weights",
                found, expected
            ),
        }
    }
}

impl Error for StructureError {}
