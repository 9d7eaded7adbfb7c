//! A `GeneticAlgorithm` owns a population of genomes
//! of a fixed network structure, plus the best genome
//! ever seen (the _legend_), and breeds successive
//! generations from the fitness scores assigned to them.
mod config;
pub mod logging;
mod offspring_factory;
mod selection;

pub use config::{BreedingConfig, SelectionPolicy};
use offspring_factory::OffspringFactory;

use crate::errors::StructureError;
use crate::records::GenomeData;
use crate::{Genome, GenomeId, NetworkStructure};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::fmt;

/// What a call to [`GeneticAlgorithm::breed_population`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreedOutcome {
    /// A new population was bred from `parents` selected genomes.
    Bred { parents: usize, legend_spawned: bool },
    /// No genome had a non-zero fitness, so the population
    /// was left untouched.
    Degenerate,
}

impl fmt::Display for BreedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bred {
                parents,
                legend_spawned,
            } => write!(
                f,
                "bred population from {} parents{}",
                parents,
                if *legend_spawned { " and the legend" } else { "" }
            ),
            Self::Degenerate => write!(f, "attempted breeding of degenerate population"),
        }
    }
}

/// A serializable image of a [`GeneticAlgorithm`]'s state,
/// used for checkpointing. The random source is not included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub structure: NetworkStructure,
    pub config: BreedingConfig,
    pub population: Vec<Genome>,
    pub legend: Option<Genome>,
    pub generation: usize,
    pub next_genome_id: GenomeId,
    pub times_legend_used: usize,
}

/// A population of fixed-length genomes and its breeding state.
pub struct GeneticAlgorithm<R> {
    population: Vec<Genome>,
    legend: Option<Genome>,
    structure: NetworkStructure,
    total_weights: usize,
    generation: usize,
    next_genome_id: GenomeId,
    times_legend_used: usize,
    config: BreedingConfig,
    rng: R,
}

impl<R: Rng> GeneticAlgorithm<R> {
    /// Creates an algorithm with an empty population, for
    /// networks of the given structure. The generation
    /// counter starts at 1.
    ///
    /// # Examples
    /// ```
    /// use legendary::{BreedingConfig, GeneticAlgorithm, NetworkStructure};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let algorithm = GeneticAlgorithm::new(
    ///     NetworkStructure::new(vec![7, 2]).unwrap(),
    ///     BreedingConfig::default(),
    ///     StdRng::seed_from_u64(0),
    /// );
    ///
    /// assert_eq!(algorithm.total_weights(), 16);
    /// assert_eq!(algorithm.generation(), 1);
    /// assert!(algorithm.population().is_empty());
    /// ```
    pub fn new(structure: NetworkStructure, config: BreedingConfig, rng: R) -> GeneticAlgorithm<R> {
        GeneticAlgorithm {
            population: Vec::new(),
            legend: None,
            total_weights: structure.total_weights(),
            structure,
            generation: 1,
            next_genome_id: 0,
            times_legend_used: 0,
            config,
            rng,
        }
    }

    /// Restores an algorithm from a snapshot.
    ///
    /// # Errors
    /// Returns an error if any stored genome does not
    /// fit the snapshot's network structure.
    pub fn from_snapshot(
        snapshot: PopulationSnapshot,
        rng: R,
    ) -> Result<GeneticAlgorithm<R>, StructureError> {
        for genome in snapshot.population.iter().chain(&snapshot.legend) {
            snapshot.structure.check_weight_count(genome.weights.len())?;
        }
        Ok(GeneticAlgorithm {
            population: snapshot.population,
            legend: snapshot.legend,
            total_weights: snapshot.structure.total_weights(),
            structure: snapshot.structure,
            generation: snapshot.generation,
            next_genome_id: snapshot.next_genome_id,
            times_legend_used: snapshot.times_legend_used,
            config: snapshot.config,
            rng,
        })
    }

    /// Replaces the population with `size` random genomes,
    /// and restarts identities, the generation counter and
    /// the legend.
    pub fn generate_new_population(&mut self, size: usize) {
        self.clear_population();
        self.next_genome_id = 0;
        self.generation = 1;
        self.legend = None;

        self.population.reserve(size);
        for _ in 0..size {
            let genome = self.create_new_genome();
            self.population.push(genome);
        }
    }

    pub fn clear_population(&mut self) {
        self.population.clear();
    }

    /// Breeds the next generation from the current fitness scores.
    ///
    /// The fittest genomes are selected as parents; the best of
    /// them may become the new legend. The top alphas survive,
    /// every parent is crossed with each one ranked below it,
    /// the legend is re-introduced if the survivors have fallen
    /// well behind it, and random genomes fill the remainder.
    /// The population size never changes.
    ///
    /// If no genome has a non-zero fitness, the population is
    /// left as is. The generation counter is always incremented.
    ///
    /// # Examples
    /// ```
    /// use legendary::{BreedOutcome, BreedingConfig, GeneticAlgorithm, NetworkStructure};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut algorithm = GeneticAlgorithm::new(
    ///     NetworkStructure::new(vec![7, 2]).unwrap(),
    ///     BreedingConfig::default(),
    ///     StdRng::seed_from_u64(0),
    /// );
    /// algorithm.generate_new_population(11);
    /// algorithm.set_genome_fitness(10.0, 4);
    /// let champion = algorithm.population()[4].id();
    ///
    /// let outcome = algorithm.breed_population();
    ///
    /// assert_eq!(outcome, BreedOutcome::Bred { parents: 1, legend_spawned: false });
    /// assert_eq!(algorithm.population().len(), 11);
    /// assert_eq!(algorithm.generation(), 2);
    /// assert_eq!(algorithm.legend().unwrap().id(), champion);
    /// ```
    pub fn breed_population(&mut self) -> BreedOutcome {
        let outcome = self.breed();
        if outcome == BreedOutcome::Degenerate {
            log::warn!("{} at generation {}", outcome, self.generation);
        } else {
            log::debug!("{} at generation {}", outcome, self.generation);
        }
        self.generation += 1;
        outcome
    }

    fn breed(&mut self) -> BreedOutcome {
        let selected = self.select_parents();
        if selected.is_empty() {
            return BreedOutcome::Degenerate;
        }
        self.assign_legend(selected[0]);

        let parents: Vec<&Genome> = selected.iter().map(|i| &self.population[*i]).collect();
        let offspring = OffspringFactory::new(
            &self.config,
            self.total_weights,
            self.next_genome_id,
            &mut self.rng,
        )
        .generate_offspring(&parents, self.legend.as_ref(), self.population.len());

        if offspring.legend_spawned {
            self.times_legend_used += 1;
        }
        self.next_genome_id = offspring.next_id;
        self.population = offspring.genomes;

        BreedOutcome::Bred {
            parents: selected.len(),
            legend_spawned: offspring.legend_spawned,
        }
    }

    /// Returns the population indices of the breeding parents, best first.
    fn select_parents(&mut self) -> Vec<usize> {
        match self.config.selection {
            SelectionPolicy::Elitism => {
                selection::elitism(&self.population, self.config.max_top_genomes)
            }
            SelectionPolicy::Roulette => selection::roulette(
                &self.population,
                self.config.max_top_genomes,
                self.config.roulette_retry_factor,
                &mut self.rng,
            ),
        }
    }

    /// Makes the genome at `index` the legend if it
    /// is fitter than the current one.
    fn assign_legend(&mut self, index: usize) {
        let candidate = &self.population[index];
        let legend_fitness = self.legend.as_ref().map_or(0.0, |l| l.fitness);
        if candidate.fitness > legend_fitness {
            log::info!(
                "genome {} is the new legend with fitness {} (previously {})",
                candidate.id,
                candidate.fitness,
                legend_fitness
            );
            self.legend = Some(candidate.clone());
        }
    }

    /// Returns a new genome with random weights and a fresh id.
    fn create_new_genome(&mut self) -> Genome {
        let id = self.new_genome_id();
        Genome::random(id, self.total_weights, &mut self.rng)
    }

    fn new_genome_id(&mut self) -> GenomeId {
        let id = self.next_genome_id;
        self.next_genome_id += 1;
        id
    }

    /// Returns whether `data` holds a weight vector usable
    /// with this algorithm's structure, logging why not.
    fn is_loadable(&self, data: &GenomeData) -> bool {
        if data.is_empty() {
            return false;
        }
        match self.structure.check_weight_count(data.weights.len()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("ignoring stored genome: {}", e);
                false
            }
        }
    }

    /// Creates a genome from stored data, with a fresh id.
    ///
    /// Missing, empty or ill-sized data results in a
    /// random genome instead.
    ///
    /// # Examples
    /// ```
    /// use legendary::records::GenomeData;
    /// use legendary::{BreedingConfig, GeneticAlgorithm, NetworkStructure};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut algorithm = GeneticAlgorithm::new(
    ///     NetworkStructure::new(vec![1, 1]).unwrap(),
    ///     BreedingConfig::default(),
    ///     StdRng::seed_from_u64(0),
    /// );
    ///
    /// let stored = algorithm.create_genome_from_data(Some(&GenomeData::new(vec![0.5, 0.25])));
    /// assert_eq!(stored.weights(), &[0.5, 0.25]);
    ///
    /// let random = algorithm.create_genome_from_data(None);
    /// assert_eq!(random.weights().len(), 2);
    /// assert_ne!(random.id(), stored.id());
    /// ```
    pub fn create_genome_from_data(&mut self, data: Option<&GenomeData>) -> Genome {
        match data {
            Some(data) if self.is_loadable(data) => {
                let id = self.new_genome_id();
                Genome::from_weights(id, data.weights.clone())
            }
            _ => self.create_new_genome(),
        }
    }

    /// Inserts stored weights into the population under a fresh id.
    ///
    /// The least fit genome has its id and weights replaced (its
    /// fitness is kept); an empty population gets the genome
    /// appended. Empty or ill-sized data is ignored.
    ///
    /// Returns whether the data was loaded.
    pub fn load_genome(&mut self, data: &GenomeData) -> bool {
        if !self.is_loadable(data) {
            return false;
        }
        let id = self.new_genome_id();
        match self.worst_genome_index() {
            Some(worst) => {
                let genome = &mut self.population[worst];
                genome.id = id;
                genome.weights = data.weights.clone();
            }
            None => self
                .population
                .push(Genome::from_weights(id, data.weights.clone())),
        }
        true
    }
}

impl<R> GeneticAlgorithm<R> {
    /// Returns a serializable copy of the algorithm's state.
    pub fn snapshot(&self) -> PopulationSnapshot {
        PopulationSnapshot {
            structure: self.structure.clone(),
            config: self.config.clone(),
            population: self.population.clone(),
            legend: self.legend.clone(),
            generation: self.generation,
            next_genome_id: self.next_genome_id,
            times_legend_used: self.times_legend_used,
        }
    }

    /// Sets the fitness of the genome at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds, or if
    /// `fitness` is negative or NaN.
    pub fn set_genome_fitness(&mut self, fitness: f32, index: usize) {
        self.population[index].set_fitness(fitness);
    }

    pub fn get_genome(&self, index: usize) -> Option<&Genome> {
        self.population.get(index)
    }

    /// Replaces the genome at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds, or if the
    /// genome doesn't fit the network structure.
    pub fn set_genome(&mut self, genome: Genome, index: usize) {
        self.structure
            .check_weight_count(genome.weights.len())
            .unwrap_or_else(|e| panic!("{} in {}", e, genome));
        self.population[index] = genome;
    }

    /// Returns the fittest genome, the earliest one on ties.
    pub fn get_best_genome(&self) -> Option<&Genome> {
        self.population.iter().reduce(|best, genome| {
            if genome.fitness > best.fitness {
                genome
            } else {
                best
            }
        })
    }

    /// Returns the least fit genome, the earliest one on ties.
    pub fn get_worst_genome(&self) -> Option<&Genome> {
        self.worst_genome_index().map(|i| &self.population[i])
    }

    fn worst_genome_index(&self) -> Option<usize> {
        self.population
            .iter()
            .enumerate()
            .reduce(|worst, current| {
                match current.1.fitness.partial_cmp(&worst.1.fitness) {
                    Some(Ordering::Less) => current,
                    _ => worst,
                }
            })
            .map(|(i, _)| i)
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    /// Returns the best genome seen over all generations, if any
    /// generation had a genome with non-zero fitness.
    pub fn legend(&self) -> Option<&Genome> {
        self.legend.as_ref()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn total_weights(&self) -> usize {
        self.total_weights
    }

    /// Returns how many times the legend was re-introduced
    /// into the population.
    pub fn times_legend_used(&self) -> usize {
        self.times_legend_used
    }

    pub fn structure(&self) -> &NetworkStructure {
        &self.structure
    }

    pub fn config(&self) -> &BreedingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn algorithm(layers: Vec<usize>, config: BreedingConfig, seed: u64) -> GeneticAlgorithm<StdRng> {
        GeneticAlgorithm::new(
            NetworkStructure::new(layers).unwrap(),
            config,
            StdRng::seed_from_u64(seed),
        )
    }

    fn assign_fitnesses(algorithm: &mut GeneticAlgorithm<StdRng>, fitnesses: &[f32]) {
        for (i, f) in fitnesses.iter().enumerate() {
            algorithm.set_genome_fitness(*f, i);
        }
    }

    #[test]
    fn generate_new_population() {
        let mut ga = algorithm(vec![3, 4, 2], BreedingConfig::default(), 0);
        ga.generate_new_population(8);

        assert_eq!(ga.population().len(), 8);
        assert!(ga.population().iter().all(|g| g.weights().len() == 3 * 4 + 4 + 4 * 2 + 2));
        assert_eq!(
            ga.population().iter().map(|g| g.id()).collect::<Vec<_>>(),
            (0..8).collect::<Vec<_>>()
        );
        assert!(ga.legend().is_none());
    }

    #[test]
    fn breeding_preserves_size() {
        let mut ga = algorithm(vec![7, 2], BreedingConfig::default(), 1);
        for size in [1, 2, 3, 5, 8, 11, 40] {
            ga.generate_new_population(size);
            for generation in 0..20 {
                let fitnesses: Vec<f32> = (0..size)
                    .map(|i| ((i * 7 + generation * 3) % 5) as f32)
                    .collect();
                assign_fitnesses(&mut ga, &fitnesses);
                ga.breed_population();
                assert_eq!(ga.population().len(), size);
                assert!(ga.population().iter().all(|g| g.weights().len() == 16));
            }
        }
    }

    #[test]
    fn breeding_layout() {
        let config = BreedingConfig {
            mutation_rate: 0.0,
            ..BreedingConfig::default()
        };
        let mut ga = algorithm(vec![2, 1], config, 2);
        ga.generate_new_population(11);
        assign_fitnesses(&mut ga, &[1.0, 0.0, 4.0, 0.0, 3.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
        let originals = ga.population().to_vec();

        let outcome = ga.breed_population();
        assert_eq!(
            outcome,
            BreedOutcome::Bred {
                parents: 3,
                legend_spawned: false
            }
        );

        let population = ga.population();
        // Each alpha is carried over unchanged, followed by
        // its children with the parents ranked below it.
        assert_eq!(population[0], originals[2]);
        assert_eq!(population[5], originals[4]);
        for child in population[1..5].iter().chain(&population[6..]) {
            assert_eq!(child.fitness(), 0.0);
            assert!(child.id() >= 11);
        }
        // Unique ids for the newcomers.
        let mut ids: Vec<_> = population.iter().map(|g| g.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 11);
        assert_eq!(ga.legend().unwrap().id(), originals[2].id());
    }

    #[test]
    fn crossover_children_mix_parents() {
        let config = BreedingConfig {
            max_top_genomes: 2,
            max_alphas: 0,
            crossover_chance: 1.0,
            ..BreedingConfig::zero()
        };
        let mut ga = algorithm(vec![5, 2], config, 3);
        ga.generate_new_population(2);
        assign_fitnesses(&mut ga, &[2.0, 1.0]);
        let (a, b) = (ga.population()[0].clone(), ga.population()[1].clone());

        ga.breed_population();

        let (c1, c2) = (&ga.population()[0], &ga.population()[1]);
        let point = (0..a.weights().len())
            .find(|i| c1.weights()[*i] != a.weights()[*i])
            .unwrap_or(a.weights().len());
        assert!(point <= a.weights().len() - 2);
        assert_eq!(c1.weights()[point..], b.weights()[point..]);
        assert_eq!(c2.weights()[..point], b.weights()[..point]);
        assert_eq!(c2.weights()[point..], a.weights()[point..]);
    }

    #[test]
    fn crossover_disabled_passes_through() {
        let config = BreedingConfig {
            crossover_chance: 0.0,
            ..BreedingConfig::default()
        };
        let mut ga = algorithm(vec![3, 2], config, 4);
        ga.generate_new_population(6);
        assign_fitnesses(&mut ga, &[1.0, 2.0, 3.0, 4.0, 0.0, 0.0]);
        let originals = ga.population().to_vec();

        ga.breed_population();

        assert_eq!(&ga.population()[..3], &[
            originals[3].clone(),
            originals[2].clone(),
            originals[1].clone()
        ]);
        assert!(ga.population()[3..].iter().all(|g| g.id() >= 6));
    }

    #[test]
    fn degenerate_population() {
        let mut ga = algorithm(vec![7, 2], BreedingConfig::default(), 5);
        ga.generate_new_population(11);
        let before = ga.population().to_vec();

        assert_eq!(ga.breed_population(), BreedOutcome::Degenerate);
        assert_eq!(ga.population(), &before[..]);
        assert_eq!(ga.generation(), 2);
        assert!(ga.legend().is_none());
    }

    #[test]
    fn legend_assignment() {
        let mut ga = algorithm(vec![7, 2], BreedingConfig::default(), 6);
        ga.generate_new_population(11);
        assert!(ga.legend().is_none());
        ga.set_genome_fitness(10.0, 6);
        let best = ga.population()[6].clone();

        ga.breed_population();

        let legend = ga.legend().unwrap();
        assert_eq!(legend.fitness(), 10.0);
        assert_eq!(legend.id(), best.id());
        assert_eq!(legend.weights(), best.weights());
    }

    #[test]
    fn legend_not_replaced_by_weaker() {
        let mut ga = algorithm(vec![7, 2], BreedingConfig::default(), 7);
        ga.generate_new_population(11);
        ga.set_genome_fitness(10.0, 0);
        ga.breed_population();
        let legend = ga.legend().unwrap().clone();

        ga.set_genome_fitness(10.0, 3);
        ga.breed_population();
        assert_eq!(ga.legend().unwrap(), &legend);
    }

    #[test]
    fn legend_reintroduced() {
        let mut ga = algorithm(vec![7, 2], BreedingConfig::default(), 8);
        ga.generate_new_population(11);
        ga.set_genome_fitness(10.0, 0);
        ga.breed_population();
        let legend = ga.legend().unwrap().clone();
        assert_eq!(ga.times_legend_used(), 0);

        // The new generation does far worse, and the legend
        // (carried over as an alpha) is not among the parents.
        for i in 0..11 {
            ga.set_genome_fitness(0.0, i);
        }
        ga.set_genome_fitness(2.0, 5);
        ga.set_genome_fitness(1.0, 6);
        ga.breed_population();

        assert_eq!(ga.times_legend_used(), 1);
        assert_eq!(ga.population().len(), 11);
        let copies: Vec<_> = ga
            .population()
            .iter()
            .filter(|g| g.weights() == legend.weights())
            .collect();
        assert_eq!(copies.len(), 1);
        assert_ne!(copies[0].id(), legend.id());
        assert_eq!(copies[0].fitness(), 0.0);
    }

    #[test]
    fn legend_not_reintroduced_when_close() {
        let mut ga = algorithm(vec![7, 2], BreedingConfig::default(), 9);
        ga.generate_new_population(11);
        ga.set_genome_fitness(10.0, 0);
        ga.breed_population();

        for i in 0..11 {
            ga.set_genome_fitness(0.0, i);
        }
        ga.set_genome_fitness(9.0, 5);
        ga.set_genome_fitness(8.0, 6);
        ga.breed_population();

        assert_eq!(ga.times_legend_used(), 0);
    }

    #[test]
    fn legend_takes_last_slot_when_full() {
        let mut ga = algorithm(vec![2, 1], BreedingConfig::default(), 10);
        ga.generate_new_population(4);
        ga.set_genome_fitness(10.0, 0);
        ga.breed_population();
        let legend = ga.legend().unwrap().clone();

        for i in 0..4 {
            ga.set_genome_fitness(0.0, i);
        }
        ga.set_genome_fitness(1.0, 1);
        ga.set_genome_fitness(1.0, 2);
        ga.set_genome_fitness(1.0, 3);
        ga.breed_population();

        assert_eq!(ga.population().len(), 4);
        assert_eq!(ga.population()[3].weights(), legend.weights());
        assert_eq!(ga.times_legend_used(), 1);
    }

    #[test]
    fn small_population_keeps_carried_legend() {
        let mut ga = algorithm(vec![7, 4, 2], BreedingConfig::default(), 11);
        ga.generate_new_population(3);
        ga.set_genome_fitness(10.0, 0);
        ga.breed_population();
        let legend = ga.legend().unwrap().clone();
        assert_eq!(ga.population()[0].id(), legend.id());

        // The legend ranks second, behind a genome still short of it.
        assign_fitnesses(&mut ga, &[5.0, 8.0, 1.0]);
        let outcome = ga.breed_population();

        assert_eq!(
            outcome,
            BreedOutcome::Bred {
                parents: 3,
                legend_spawned: false
            }
        );
        assert_eq!(ga.population().len(), 3);
        assert!(ga.population().iter().any(|g| g.id() == legend.id()));
        assert_eq!(ga.legend().unwrap().fitness(), 10.0);
        assert_eq!(ga.times_legend_used(), 0);
    }

    #[test]
    fn roulette_breeding() {
        let config = BreedingConfig {
            selection: SelectionPolicy::Roulette,
            ..BreedingConfig::default()
        };
        let mut ga = algorithm(vec![4, 3, 2], config, 11);
        ga.generate_new_population(12);
        for generation in 0..10 {
            let fitnesses: Vec<f32> = (0..12).map(|i| ((i + generation) % 4) as f32).collect();
            assign_fitnesses(&mut ga, &fitnesses);
            assert!(matches!(ga.breed_population(), BreedOutcome::Bred { .. }));
            assert_eq!(ga.population().len(), 12);
        }
    }

    #[test]
    fn best_and_worst() {
        let mut ga = algorithm(vec![2, 1], BreedingConfig::default(), 12);
        assert!(ga.get_best_genome().is_none());
        ga.generate_new_population(5);
        assign_fitnesses(&mut ga, &[3.0, 5.0, 1.0, 5.0, 1.0]);

        assert_eq!(ga.get_best_genome().unwrap().id(), 1);
        assert_eq!(ga.get_worst_genome().unwrap().id(), 2);
    }

    #[test]
    fn load_genome_into_empty_population() {
        let mut ga = algorithm(vec![2, 1], BreedingConfig::default(), 13);
        assert!(ga.load_genome(&GenomeData::new(vec![0.1, 0.2, 0.3])));
        assert_eq!(ga.population().len(), 1);
        assert_eq!(ga.population()[0].weights(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn load_genome_replaces_worst() {
        let mut ga = algorithm(vec![2, 1], BreedingConfig::default(), 14);
        ga.generate_new_population(4);
        assign_fitnesses(&mut ga, &[3.0, 0.5, 2.0, 1.0]);

        assert!(ga.load_genome(&GenomeData::new(vec![0.1, 0.2, 0.3])));

        assert_eq!(ga.population().len(), 4);
        let replaced = &ga.population()[1];
        assert_eq!(replaced.id(), 4);
        assert_eq!(replaced.weights(), &[0.1, 0.2, 0.3]);
        assert_eq!(replaced.fitness(), 0.5);
    }

    #[test]
    fn load_genome_ignores_bad_data() {
        let mut ga = algorithm(vec![2, 1], BreedingConfig::default(), 15);
        ga.generate_new_population(2);
        let before = ga.population().to_vec();

        assert!(!ga.load_genome(&GenomeData::default()));
        assert!(!ga.load_genome(&GenomeData::new(vec![1.0; 5])));
        assert_eq!(ga.population(), &before[..]);
    }

    #[test]
    fn create_genome_from_bad_data_is_random() {
        let mut ga = algorithm(vec![2, 1], BreedingConfig::default(), 16);
        let genome = ga.create_genome_from_data(Some(&GenomeData::new(vec![1.0; 5])));
        assert_eq!(genome.weights().len(), 3);
        let genome = ga.create_genome_from_data(Some(&GenomeData::default()));
        assert_eq!(genome.weights().len(), 3);
    }

    #[test]
    #[should_panic]
    fn set_genome_wrong_length() {
        let mut ga = algorithm(vec![2, 1], BreedingConfig::default(), 17);
        ga.generate_new_population(2);
        ga.set_genome(Genome::from_weights(9, vec![0.0; 4]), 0);
    }

    #[test]
    fn snapshot_round_trip() {
        let mut ga = algorithm(vec![3, 2], BreedingConfig::default(), 18);
        ga.generate_new_population(6);
        assign_fitnesses(&mut ga, &[1.0, 2.0, 3.0, 0.0, 0.0, 4.0]);
        ga.breed_population();

        let snapshot = ga.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: PopulationSnapshot = serde_json::from_str(&json).unwrap();
        let restored = GeneticAlgorithm::from_snapshot(restored, StdRng::seed_from_u64(0)).unwrap();

        assert_eq!(restored.population(), ga.population());
        assert_eq!(restored.legend(), ga.legend());
        assert_eq!(restored.generation(), ga.generation());
        assert_eq!(restored.total_weights(), ga.total_weights());
    }

    #[test]
    fn snapshot_rejects_mismatched_genomes() {
        let mut snapshot = algorithm(vec![3, 2], BreedingConfig::default(), 19).snapshot();
        snapshot.population.push(Genome::from_weights(0, vec![0.0; 3]));
        assert!(GeneticAlgorithm::from_snapshot(snapshot, StdRng::seed_from_u64(0)).is_err());
    }
}
