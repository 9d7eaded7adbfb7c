use clap::{Parser, Subcommand};
use legendary::logging::Stats;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use trainer::corridor::{OUTPUT_COUNT, SENSOR_COUNT};
use trainer::errors::PlacementError;
use trainer::{
    Checkpoint, Corridor, EvolutionManager, JsonStore, MemoryStore, TickOutcome, TrainerConfig,
};

use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trainer")]
#[command(version)]
#[command(about = "Evolves neural network controllers for agents running down a corridor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a population
    Train {
        /// Configuration file (RON); defaults are used if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of generations to breed
        #[arg(short, long, default_value = "100")]
        generations: usize,

        /// Checkpoint file to resume training from
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Generations between checkpoints, 0 to only checkpoint at the end
        #[arg(long, default_value = "10")]
        checkpoint_every: usize,

        /// Random seed, overriding the configuration's
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Watch the stored best genome drive every agent
    Replay {
        /// Configuration file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of runs down the corridor
        #[arg(short, long, default_value = "3")]
        runs: usize,
    },

    /// Run independent training trials in parallel and report statistics
    Trials {
        /// Configuration file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of trials
        #[arg(short, long, default_value = "8")]
        trials: usize,

        /// Generations per trial
        #[arg(short, long, default_value = "50")]
        generations: usize,
    },

    /// Generate a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "trainer.ron")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            config,
            generations,
            resume,
            checkpoint_every,
            seed,
        } => train(config, generations, resume, checkpoint_every, seed),
        Commands::Replay { config, runs } => replay(config, runs),
        Commands::Trials {
            config,
            trials,
            generations,
        } => run_trials(config, trials, generations),
        Commands::Init { output } => generate_config(output),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<TrainerConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            log::info!("loading configuration from {}", path.display());
            TrainerConfig::from_file(path)
        }
        None => {
            let config = TrainerConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

fn train(
    config_path: Option<PathBuf>,
    generations: usize,
    resume: Option<PathBuf>,
    checkpoint_every: usize,
    seed: Option<u64>,
) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(config_path)?;
    if seed.is_some() {
        config.seed = seed;
    }
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("training with seed {}", seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let corridor = Corridor::new(config.corridor.clone(), &mut rng)?;
    let store = JsonStore::new(&config.output_dir);
    let mut manager = match resume {
        Some(path) => {
            let checkpoint = Checkpoint::load(&path)?;
            checkpoint.check_widths(SENSOR_COUNT, OUTPUT_COUNT)?;
            EvolutionManager::resume(
                checkpoint.snapshot,
                checkpoint.progress,
                corridor,
                store,
                config.evolution_settings(),
                rng,
            )?
        }
        None => EvolutionManager::new(
            config.structure.clone(),
            config.breeding.clone(),
            corridor,
            store,
            config.evolution_settings(),
            rng,
        ),
    };

    fs::create_dir_all(&config.output_dir)?;
    let checkpoint_path = config.output_dir.join("checkpoint.ron");
    let mut bred = 0;
    while bred < generations {
        if let outcome @ TickOutcome::Evolved { .. } = manager.tick(config.tick_length) {
            bred += 1;
            log::info!(
                "{}, best fitness so far {}",
                outcome,
                manager.progress().best_fitness
            );
            if checkpoint_every > 0 && bred % checkpoint_every == 0 {
                Checkpoint::capture(&manager).save(&checkpoint_path)?;
            }
        }
    }

    Checkpoint::capture(&manager).save(&checkpoint_path)?;
    manager.save_evolution_data()?;
    log::info!("checkpoint saved to {}", checkpoint_path.display());
    if let Some(legend) = manager.algorithm().legend() {
        println!("Legend: {}", legend);
    }
    Ok(())
}

fn replay(config_path: Option<PathBuf>, runs: usize) -> Result<(), Box<dyn Error>> {
    let config = load_config(config_path)?;
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
    let corridor = Corridor::new(config.corridor.clone(), &mut rng)?;
    let mut manager = EvolutionManager::replay(
        config.structure.clone(),
        corridor,
        JsonStore::new(&config.output_dir),
        config.evolution_settings(),
        rng,
    );

    let mut fitnesses = Vec::with_capacity(runs);
    while fitnesses.len() < runs {
        if let TickOutcome::Restarted = manager.tick(config.tick_length) {
            fitnesses.push(manager.current_best_fitness());
        }
    }

    if let Some(stats) = Stats::from(fitnesses.into_iter()) {
        println!("Replay fitness over {} runs: {}", runs, stats);
    }
    Ok(())
}

/// Outcome of an independent training trial.
struct TrialResult {
    best_fitness: f32,
    legend_spawns: usize,
}

fn run_trial(
    config: &TrainerConfig,
    seed: u64,
    generations: usize,
) -> Result<TrialResult, PlacementError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let corridor = Corridor::new(config.corridor.clone(), &mut rng)?;
    let mut manager = EvolutionManager::new(
        config.structure.clone(),
        config.breeding.clone(),
        corridor,
        MemoryStore::new(),
        config.evolution_settings(),
        rng,
    );

    let mut bred = 0;
    while bred < generations {
        if let TickOutcome::Evolved { .. } = manager.tick(config.tick_length) {
            bred += 1;
        }
    }
    log::debug!(
        "trial with seed {} reached fitness {}",
        seed,
        manager.progress().best_fitness
    );

    Ok(TrialResult {
        best_fitness: manager.progress().best_fitness,
        legend_spawns: manager.algorithm().times_legend_used(),
    })
}

fn run_trials(
    config_path: Option<PathBuf>,
    trials: usize,
    generations: usize,
) -> Result<(), Box<dyn Error>> {
    let config = load_config(config_path)?;
    let base_seed = config.seed.unwrap_or_else(rand::random);
    log::info!(
        "running {} trials of {} generations from seed {}",
        trials,
        generations,
        base_seed
    );

    let results = (0..trials as u64)
        .into_par_iter()
        .map(|i| run_trial(&config, base_seed.wrapping_add(i), generations))
        .collect::<Result<Vec<_>, _>>()?;

    match Stats::from(results.iter().map(|r| r.best_fitness)) {
        Some(stats) => println!(
            "Best fitness {} over {} trials, legend re-introduced {} times",
            stats,
            trials,
            results.iter().map(|r| r.legend_spawns).sum::<usize>()
        ),
        None => println!("No trials ran"),
    }
    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn Error>> {
    TrainerConfig::default().save(&output)?;
    println!("Default configuration written to {}", output.display());
    Ok(())
}
