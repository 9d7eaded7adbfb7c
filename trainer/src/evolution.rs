//! The training loop: agents are driven by networks built from
//! the population's genomes, and a new generation is bred once
//! every agent has died or the generation's time is up.
use crate::errors::{CheckpointError, StoreError};
use crate::store::RecordStore;

use legendary::logging::{EvolutionLogger, Log, ReportingLevel};
use legendary::records::{EvolutionData, GenomeData, ImprovementData};
use legendary::{
    BreedOutcome, BreedingConfig, GeneticAlgorithm, NetworkStructure, PopulationSnapshot,
};
use legendary_nn::networks::NeuralNetwork;
use legendary_nn::Controller;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// A simulation populated by agents, each steered by a controller.
pub trait Environment {
    fn agent_count(&self) -> usize;
    /// Returns the sensor readings of `agent`.
    fn sense(&self, agent: usize) -> Vec<f32>;
    /// Applies a controller's `outputs` to `agent`
    /// and advances it by `dt` seconds.
    fn act(&mut self, agent: usize, outputs: &[f32], dt: f32);
    fn is_alive(&self, agent: usize) -> bool;
    /// Returns the fitness `agent` has accumulated. Must be non-negative.
    fn fitness(&self, agent: usize) -> f32;
    /// Restores every agent to its starting state.
    fn reset(&mut self);
}

/// Senses, evaluates and acts for every living agent.
pub fn drive_agents<E, C>(environment: &mut E, controllers: &[C], dt: f32)
where
    E: Environment + ?Sized,
    C: Controller,
{
    for (agent, controller) in controllers.iter().enumerate() {
        if environment.is_alive(agent) {
            let outputs = controller.evaluate(&environment.sense(agent));
            environment.act(agent, &outputs, dt);
        }
    }
}

/// Settings of the training loop.
#[derive(Clone, Debug, PartialEq)]
pub struct EvolutionSettings {
    /// Seconds of simulated time each generation is allowed.
    pub time_till_evolution: f32,
    /// Generation number of the stored best genome to load.
    pub generation_to_load: usize,
}

impl Default for EvolutionSettings {
    fn default() -> EvolutionSettings {
        EvolutionSettings {
            time_till_evolution: 180.0,
            generation_to_load: 0,
        }
    }
}

/// What a call to [`EvolutionManager::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// The generation goes on with `alive` agents.
    Running { alive: usize },
    /// A new generation was bred; `generation` is its number.
    Evolved {
        generation: usize,
        breeding: BreedOutcome,
    },
    /// The replayed agents were sent back to the start.
    Restarted,
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running { alive } => write!(f, "{} agents alive", alive),
            Self::Evolved {
                generation,
                breeding,
            } => write!(f, "generation {}: {}", generation, breeding),
            Self::Restarted => write!(f, "replay restarted"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Training,
    Replay,
}

/// Progress of a training run that is not part
/// of the genetic algorithm's own state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgress {
    pub best_fitness: f32,
    pub generations_since_improvement: usize,
    pub tests_ran: usize,
    pub improvements: Vec<ImprovementData>,
}

/// Drives an environment's agents with networks evolved
/// by a [`GeneticAlgorithm`], one tick at a time.
pub struct EvolutionManager<E, S, R> {
    algorithm: GeneticAlgorithm<R>,
    networks: Vec<NeuralNetwork>,
    environment: E,
    store: S,
    settings: EvolutionSettings,
    mode: Mode,
    time_left: f32,
    genomes_left_alive: usize,
    current_best_fitness: f32,
    best_genome_pending: bool,
    progress: TrainingProgress,
    logger: EvolutionLogger,
}

impl<E, S, R> EvolutionManager<E, S, R>
where
    E: Environment,
    S: RecordStore,
    R: Rng,
{
    /// Prepares a training run: a population with one genome per
    /// agent is generated, the stored best genome (if any) is
    /// loaded into it, and a network is built for every genome.
    pub fn new(
        structure: NetworkStructure,
        breeding: BreedingConfig,
        environment: E,
        store: S,
        settings: EvolutionSettings,
        rng: R,
    ) -> EvolutionManager<E, S, R> {
        let mut manager = EvolutionManager::with_algorithm(
            GeneticAlgorithm::new(structure, breeding, rng),
            environment,
            store,
            settings,
            Mode::Training,
            TrainingProgress::default(),
        );
        manager
            .algorithm
            .generate_new_population(manager.environment.agent_count());
        if let Some(data) = manager.load_best_genome() {
            manager.algorithm.load_genome(&data);
        }
        manager.setup_networks();
        log::info!(
            "training {} agents with {} weights per genome",
            manager.networks.len(),
            manager.algorithm.total_weights()
        );
        manager
    }

    /// Prepares a replay of the stored best genome: every
    /// agent is driven by a network built from it, or by a
    /// random network if no genome is stored.
    pub fn replay(
        structure: NetworkStructure,
        environment: E,
        store: S,
        settings: EvolutionSettings,
        mut rng: R,
    ) -> EvolutionManager<E, S, R> {
        let count = environment.agent_count();
        let networks = match EvolutionManager::<E, S, R>::read_best_genome(
            &store,
            structure.total_weights(),
            settings.generation_to_load,
        ) {
            Some(data) => {
                let mut algorithm =
                    GeneticAlgorithm::new(structure.clone(), BreedingConfig::zero(), &mut rng);
                let genome = algorithm.create_genome_from_data(Some(&data));
                vec![NeuralNetwork::setup_from_genome(&genome, &structure); count]
            }
            None => (0..count)
                .map(|_| NeuralNetwork::create(&structure, &mut rng))
                .collect(),
        };

        let mut manager = EvolutionManager::with_algorithm(
            GeneticAlgorithm::new(structure, BreedingConfig::zero(), rng),
            environment,
            store,
            settings,
            Mode::Replay,
            TrainingProgress::default(),
        );
        manager.networks = networks;
        manager
    }

    /// Resumes a training run from a population snapshot.
    ///
    /// # Errors
    /// Returns an error if the snapshot's genomes don't fit its
    /// structure, or if there isn't one genome per agent.
    pub fn resume(
        snapshot: PopulationSnapshot,
        progress: TrainingProgress,
        environment: E,
        store: S,
        settings: EvolutionSettings,
        rng: R,
    ) -> Result<EvolutionManager<E, S, R>, CheckpointError> {
        if snapshot.population.len() != environment.agent_count() {
            return Err(CheckpointError::AgentCountMismatch {
                agents: environment.agent_count(),
                genomes: snapshot.population.len(),
            });
        }
        let algorithm = GeneticAlgorithm::from_snapshot(snapshot, rng)?;
        let mut manager = EvolutionManager::with_algorithm(
            algorithm,
            environment,
            store,
            settings,
            Mode::Training,
            progress,
        );
        manager.setup_networks();
        log::info!(
            "resumed training at generation {}",
            manager.algorithm.generation()
        );
        Ok(manager)
    }

    fn with_algorithm(
        algorithm: GeneticAlgorithm<R>,
        environment: E,
        store: S,
        settings: EvolutionSettings,
        mode: Mode,
        progress: TrainingProgress,
    ) -> EvolutionManager<E, S, R> {
        EvolutionManager {
            algorithm,
            networks: Vec::new(),
            genomes_left_alive: environment.agent_count(),
            environment,
            store,
            time_left: settings.time_till_evolution,
            settings,
            mode,
            current_best_fitness: 0.0,
            best_genome_pending: false,
            progress,
            logger: EvolutionLogger::new(ReportingLevel::PopulationChampion),
        }
    }

    /// Advances the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        drive_agents(&mut self.environment, &self.networks, dt);
        self.update_agents();

        match self.mode {
            Mode::Training => {
                self.check_for_best_fitness();
                self.evolution_timer(dt)
            }
            Mode::Replay => self.replay_timer(dt),
        }
    }

    /// Counts living agents and finds the current best fitness.
    fn update_agents(&mut self) {
        self.genomes_left_alive = 0;
        self.current_best_fitness = 0.0;
        for agent in 0..self.networks.len() {
            if self.environment.is_alive(agent) {
                self.genomes_left_alive += 1;
            }
            self.current_best_fitness = self
                .current_best_fitness
                .max(self.environment.fitness(agent));
        }
    }

    /// Records a new best fitness. Improvements reached after
    /// more than one generation without any are tracked, and
    /// flag the best genome for saving.
    fn check_for_best_fitness(&mut self) {
        if self.current_best_fitness <= self.progress.best_fitness {
            return;
        }
        self.progress.best_fitness = self.current_best_fitness;

        if self.progress.generations_since_improvement > 1 {
            log::info!(
                "best fitness {} reached in generation {} after {} generations",
                self.current_best_fitness,
                self.algorithm.generation(),
                self.progress.generations_since_improvement
            );
            self.progress.improvements.push(ImprovementData {
                fitness: self.current_best_fitness,
                generation: self.algorithm.generation(),
                generations_since_improvement: self.progress.generations_since_improvement,
            });
            self.best_genome_pending = true;
        }
        self.progress.generations_since_improvement = 0;
    }

    fn evolution_timer(&mut self, dt: f32) -> TickOutcome {
        if self.genomes_left_alive == 0 || self.time_left < 0.0 {
            self.evolve_population()
        } else {
            self.time_left -= dt;
            TickOutcome::Running {
                alive: self.genomes_left_alive,
            }
        }
    }

    fn replay_timer(&mut self, dt: f32) -> TickOutcome {
        if self.genomes_left_alive == 0 || self.time_left < 0.0 {
            log::info!("replay ended with best fitness {}", self.current_best_fitness);
            self.environment.reset();
            self.time_left = self.settings.time_till_evolution;
            TickOutcome::Restarted
        } else {
            self.time_left -= dt;
            TickOutcome::Running {
                alive: self.genomes_left_alive,
            }
        }
    }

    fn evolve_population(&mut self) -> TickOutcome {
        let timer_expired = self.time_left < 0.0;

        for agent in 0..self.networks.len() {
            let fitness = self.environment.fitness(agent);
            self.algorithm.set_genome_fitness(fitness, agent);
        }
        self.logger
            .log(&self.algorithm, &|g| [g.fitness()], ["fitness"]);

        if timer_expired {
            if let Err(e) = self.save_evolution_data() {
                log::error!("failed to save evolution data: {}", e);
            }
            self.progress.tests_ran += 1;
        }
        if timer_expired || self.best_genome_pending {
            if let Err(e) = self.save_best_genome() {
                log::error!("failed to save best genome: {}", e);
            }
            self.best_genome_pending = false;
        }

        let breeding = self.algorithm.breed_population();
        self.setup_networks();

        self.current_best_fitness = 0.0;
        self.time_left = self.settings.time_till_evolution;
        self.progress.generations_since_improvement += 1;
        self.environment.reset();

        if let Some(log) = self.logger.last() {
            log::debug!("{}", log);
        }
        TickOutcome::Evolved {
            generation: self.algorithm.generation(),
            breeding,
        }
    }

    /// Builds one network per genome of the population.
    fn setup_networks(&mut self) {
        let structure = self.algorithm.structure();
        self.networks = self
            .algorithm
            .population()
            .iter()
            .map(|genome| NeuralNetwork::setup_from_genome(genome, structure))
            .collect();
    }

    fn load_best_genome(&self) -> Option<GenomeData> {
        Self::read_best_genome(
            &self.store,
            self.algorithm.total_weights(),
            self.settings.generation_to_load,
        )
    }

    fn read_best_genome(
        store: &S,
        total_weights: usize,
        generation: usize,
    ) -> Option<GenomeData> {
        match store.load_genome(total_weights, generation) {
            Ok(Some(data)) => {
                log::info!("loaded stored best genome of generation {}", generation);
                Some(data)
            }
            Ok(None) => {
                log::info!("no stored best genome for generation {}", generation);
                None
            }
            Err(e) => {
                log::warn!("ignoring stored best genome of generation {}: {}", generation, e);
                None
            }
        }
    }
}

impl<E, S: RecordStore, R> EvolutionManager<E, S, R> {
    /// Stores the summary of the current training run.
    pub fn save_evolution_data(&mut self) -> Result<(), StoreError> {
        let data = EvolutionData {
            genomes_left_alive: self.genomes_left_alive,
            times_legend_spawned: self.algorithm.times_legend_used(),
            data_tracked: self.progress.improvements.clone(),
        };
        self.store.save_evolution_data(&data, self.progress.tests_ran)
    }

    /// Stores the fittest genome of the population
    /// under the current generation.
    pub fn save_best_genome(&mut self) -> Result<(), StoreError> {
        match self.algorithm.get_best_genome() {
            Some(genome) => self
                .store
                .save_genome(&GenomeData::from(genome), self.algorithm.generation()),
            None => Ok(()),
        }
    }
}

impl<E, S, R> EvolutionManager<E, S, R> {
    pub fn algorithm(&self) -> &GeneticAlgorithm<R> {
        &self.algorithm
    }

    pub fn networks(&self) -> &[NeuralNetwork] {
        &self.networks
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn progress(&self) -> &TrainingProgress {
        &self.progress
    }

    /// Returns the per-generation statistics
    /// recorded before each breeding.
    pub fn logs(&self) -> impl Iterator<Item = &Log> {
        self.logger.iter()
    }

    pub fn genomes_left_alive(&self) -> usize {
        self.genomes_left_alive
    }

    pub fn current_best_fitness(&self) -> f32 {
        self.current_best_fitness
    }

    /// Returns the simulated time left before the
    /// current generation is bred.
    pub fn time_left(&self) -> f32 {
        self.time_left
    }
}
