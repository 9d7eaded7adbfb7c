//! Persisted record types exchanged with storage.
//!
//! Field names are part of the on-disk format and serialize
//! in camelCase, e.g. `{"weights": [...]}` or
//! `{"fitness": 3.0, "generation": 4, "generationsSinceImprovement": 2}`.
use crate::Genome;

use serde::{Deserialize, Serialize};

/// The weights of a stored genome.
///
/// A missing `weights` field deserializes as empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenomeData {
    #[serde(default)]
    pub weights: Vec<f32>,
}

impl GenomeData {
    pub fn new(weights: Vec<f32>) -> GenomeData {
        GenomeData { weights }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl From<&Genome> for GenomeData {
    fn from(genome: &Genome) -> GenomeData {
        GenomeData::new(genome.weights().to_vec())
    }
}

/// A new best fitness, and when it was reached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementData {
    pub fitness: f32,
    pub generation: usize,
    pub generations_since_improvement: usize,
}

/// Summary of a training run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionData {
    pub genomes_left_alive: usize,
    pub times_legend_spawned: usize,
    #[serde(default)]
    pub data_tracked: Vec<ImprovementData>,
}

/// Returns the file name under which the best genome of
/// a structure with `total_weights` weights is stored
/// for `generation`.
///
/// # Examples
/// ```
/// use legendary::records::best_genome_file_name;
///
/// assert_eq!(best_genome_file_name(16, 4), "BestGenomeWeights-16_Generation-4.json");
/// ```
pub fn best_genome_file_name(total_weights: usize, generation: usize) -> String {
    format!(
        "BestGenomeWeights-{}_Generation-{}.json",
        total_weights, generation
    )
}

/// Returns the file name of the `run`-th evolution summary.
pub fn evolution_data_file_name(run: usize) -> String {
    format!("EvolutionData{}.json", run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn genome_data_field_names() {
        let data = GenomeData::new(vec![0.5, -0.25]);
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({ "weights": [0.5, -0.25] })
        );
    }

    #[test]
    fn genome_data_missing_weights() {
        let data: GenomeData = serde_json::from_str("{}").unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn evolution_data_field_names() {
        let data = EvolutionData {
            genomes_left_alive: 3,
            times_legend_spawned: 1,
            data_tracked: vec![ImprovementData {
                fitness: 12.5,
                generation: 7,
                generations_since_improvement: 2,
            }],
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            json!({
                "genomesLeftAlive": 3,
                "timesLegendSpawned": 1,
                "dataTracked": [{
                    "fitness": 12.5,
                    "generation": 7,
                    "generationsSinceImprovement": 2
                }]
            })
        );
        assert_eq!(serde_json::from_value::<EvolutionData>(value).unwrap(), data);
    }

    #[test]
    fn from_genome() {
        let genome = Genome::from_weights(3, vec![1.0, 2.0]);
        assert_eq!(GenomeData::from(&genome).weights, vec![1.0, 2.0]);
    }
}
