use legendary::StructureError;

use std::error::Error;
use std::fmt;
use std::io;

/// An error type indicating a failure to
/// read or write a persisted record.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "record store I/O error: {}", e),
            Self::Json(e) => write!(f, "malformed record: {}", e),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// An error type indicating a failure to
/// save or restore a training checkpoint.
#[derive(Debug)]
pub enum CheckpointError {
    Io(io::Error),
    Ron(ron::Error),
    /// The checkpoint was written by an incompatible version.
    VersionMismatch { expected: u32, found: u32 },
    /// The stored population doesn't fit its network structure.
    Structure(StructureError),
    /// The stored population doesn't have one genome per agent.
    AgentCountMismatch { agents: usize, genomes: usize },
    /// The stored networks don't read or drive
    /// as many values as the environment provides.
    WidthMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "checkpoint I/O error: {}", e),
            Self::Ron(e) => write!(f, "checkpoint serialization error: {}", e),
            Self::VersionMismatch { expected, found } => write!(
                f,
                "checkpoint version mismatch: expected {}, found {}",
                expected, found
            ),
            Self::Structure(e) => write!(f, "invalid checkpoint population: {}", e),
            Self::AgentCountMismatch { agents, genomes } => write!(
                f,
                "checkpoint holds {} genomes for {} agents",
                genomes, agents
            ),
            Self::WidthMismatch { expected, found } => write!(
                f,
                "checkpoint networks have {} inputs and {} outputs, expected {} and {}",
                found.0, found.1, expected.0, expected.1
            ),
        }
    }
}

impl Error for CheckpointError {}

impl From<io::Error> for CheckpointError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ron::Error> for CheckpointError {
    fn from(e: ron::Error) -> Self {
        Self::Ron(e)
    }
}

impl From<StructureError> for CheckpointError {
    fn from(e: StructureError) -> Self {
        Self::Structure(e)
    }
}

/// An error type indicating that an obstacle could not be
/// placed without overlapping the ones already placed.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementError {
    /// Index of the corridor region being filled.
    pub region: usize,
    /// Number of positions tried.
    pub attempts: usize,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no free obstacle position found in region {} after {} attempts",
            self.region, self.attempts
        )
    }
}

impl Error for PlacementError {}
