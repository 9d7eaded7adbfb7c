use serde::{Deserialize, Serialize};

/// How breeding parents are picked from a population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Take the fittest genomes, earliest first on ties.
    Elitism,
    /// Draw genomes with probability proportional to
    /// fitness, always including the fittest one.
    Roulette,
}

/// Configuration data for population breeding.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingConfig {
    /// Chance of each weight of a child being perturbed.
    pub mutation_rate: f32,
    /// Magnitude bound of a single weight perturbation.
    pub max_perturbation: f32,
    /// Fraction of the legend's fitness the weakest
    /// surviving parent must reach for the legend
    /// not to be re-introduced into the population.
    /// Re-introduced copies get fresh identities, so
    /// a weak surviving copy does not stop the legend
    /// from being re-introduced again.
    pub legend_spawn_threshold: f32,
    /// Chance that a selected genome is crossed with the
    /// genomes ranked below it, instead of only being
    /// carried over unchanged.
    pub crossover_chance: f32,
    /// Number of top-ranked genomes that survive into the
    /// next generation in addition to breeding.
    pub max_alphas: usize,
    /// Maximum number of genomes selected for breeding.
    pub max_top_genomes: usize,
    /// Parent selection method.
    pub selection: SelectionPolicy,
    /// Number of roulette draws allowed per requested parent
    /// before selection falls back to [`Elitism`].
    ///
    /// [`Elitism`]: SelectionPolicy::Elitism
    pub roulette_retry_factor: usize,
}

impl BreedingConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0, and selection is by elitism.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation in tests.
    ///
    /// # Examples
    /// ```
    /// use legendary::BreedingConfig;
    ///
    /// let cfg = BreedingConfig {
    ///     crossover_chance: 1.0,
    ///     max_top_genomes: 2,
    ///     ..BreedingConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> BreedingConfig {
        BreedingConfig {
            mutation_rate: 0.0,
            max_perturbation: 0.0,
            legend_spawn_threshold: 0.0,
            crossover_chance: 0.0,
            max_alphas: 0,
            max_top_genomes: 0,
            selection: SelectionPolicy::Elitism,
            roulette_retry_factor: 0,
        }
    }
}

impl Default for BreedingConfig {
    /// The reference configuration: three parents, two
    /// surviving alphas, always crossing over.
    fn default() -> BreedingConfig {
        BreedingConfig {
            mutation_rate: 0.1,
            max_perturbation: 0.3,
            legend_spawn_threshold: 0.65,
            crossover_chance: 1.0,
            max_alphas: 2,
            max_top_genomes: 3,
            selection: SelectionPolicy::Elitism,
            roulette_retry_factor: 4,
        }
    }
}
