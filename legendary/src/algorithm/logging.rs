use super::GeneticAlgorithm;
use crate::Genome;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord,
    pub legend_fitness: Option<f32>,
    pub times_legend_used: usize,
    pub genome_stats: Vec<(String, Stats)>,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log {{")?;
        writeln!(f, "\tgeneration_number: {}", self.generation_number)?;
        match self.legend_fitness {
            Some(fitness) => writeln!(f, "\tlegend_fitness: {}", fitness)?,
            None => writeln!(f, "\tlegend_fitness: none")?,
        }
        writeln!(f, "\ttimes_legend_used: {}", self.times_legend_used)?;
        for (name, stats) in &self.genome_stats {
            writeln!(f, "\t{}: {}", name, stats)?;
        }
        write!(f, "}}")
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use legendary::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Option<Stats> {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return None;
        }
        data.sort_unstable_by(f32::total_cmp);

        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max {:.3}, min {:.3}, mean {:.3}, median {:.3}",
            self.maximum, self.minimum, self.mean, self.median
        )
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord {
    /// Every genome in the population.
    Population(Vec<Genome>),
    /// Only the population champion.
    PopulationChampion(Genome),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population.
    ///
    /// The `genome_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the population,
    /// where each statistic is named by `stat_names`.
    /// Statistics of an empty population are omitted.
    ///
    /// # Examples
    /// ```
    /// use legendary::logging::{EvolutionLogger, ReportingLevel};
    /// use legendary::{BreedingConfig, GeneticAlgorithm, NetworkStructure};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut algorithm = GeneticAlgorithm::new(
    ///     NetworkStructure::new(vec![2, 1]).unwrap(),
    ///     BreedingConfig::default(),
    ///     StdRng::seed_from_u64(0),
    /// );
    /// algorithm.generate_new_population(4);
    ///
    /// let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
    /// logger.log(&algorithm, &|g| [g.fitness()], ["fitness"]);
    /// assert_eq!(logger.iter().count(), 1);
    /// ```
    pub fn log<R, GSE, const N: usize>(
        &mut self,
        algorithm: &GeneticAlgorithm<R>,
        genome_stat_extractor: &GSE,
        stat_names: [&str; N],
    ) where
        GSE: Fn(&Genome) -> [f32; N],
    {
        let mut columns = vec![Vec::with_capacity(algorithm.population().len()); N];
        for row in algorithm.population().iter().map(genome_stat_extractor) {
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        let genome_stats = stat_names
            .iter()
            .zip(columns)
            .filter_map(|(name, data)| Some((name.to_string(), Stats::from(data.into_iter())?)))
            .collect();

        let generation_sample = match self.reporting_level {
            ReportingLevel::AllGenomes => {
                GenerationMemberRecord::Population(algorithm.population().to_vec())
            }
            ReportingLevel::PopulationChampion => match algorithm.get_best_genome() {
                Some(champion) => GenerationMemberRecord::PopulationChampion(champion.clone()),
                None => GenerationMemberRecord::None,
            },
            ReportingLevel::NoGenomes => GenerationMemberRecord::None,
        };

        self.logs.push(Log {
            generation_number: algorithm.generation(),
            generation_sample,
            legend_fitness: algorithm.legend().map(Genome::fitness),
            times_legend_used: algorithm.times_legend_used(),
            genome_stats,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot.
    pub fn last(&self) -> Option<&Log> {
        self.logs.last()
    }
}
