use super::BreedingConfig;
use crate::rng::chance;
use crate::{Genome, GenomeId};

use rand::Rng;

/// Auxiliary type for offspring generation.
/// Handles all the tasks of turning a generation's
/// selected parents into the next population, handing
/// out genome identities as it goes.
pub(super) struct OffspringFactory<'a, R: ?Sized> {
    config: &'a BreedingConfig,
    total_weights: usize,
    next_id: GenomeId,
    rng: &'a mut R,
}

/// The result of a breeding pass.
pub(super) struct Offspring {
    pub(super) genomes: Vec<Genome>,
    pub(super) legend_spawned: bool,
    /// First identity not handed out by the factory.
    pub(super) next_id: GenomeId,
}

/// Children of the selected parents, before the
/// legend and random fillers are added.
struct Brood {
    children: Vec<Genome>,
    /// Identities of the parents carried over unchanged.
    carried: Vec<GenomeId>,
}

impl<'a, R: Rng + ?Sized> OffspringFactory<'a, R> {
    pub(super) fn new(
        config: &'a BreedingConfig,
        total_weights: usize,
        next_id: GenomeId,
        rng: &'a mut R,
    ) -> OffspringFactory<'a, R> {
        OffspringFactory {
            config,
            total_weights,
            next_id,
            rng,
        }
    }

    /// Generate a population of `population_size` genomes from
    /// `parents` (best first), re-introducing `legend` if the
    /// parents have fallen too far behind it.
    pub(super) fn generate_offspring(
        mut self,
        parents: &[&Genome],
        legend: Option<&Genome>,
        population_size: usize,
    ) -> Offspring {
        let mut brood = self.breed_parents(parents);
        brood.truncate(population_size);

        let legend_spawned = match legend {
            Some(legend) if !brood.carries(legend) && population_size > 0 => {
                let weakest_survivor = brood.weakest_survivor();
                self.add_legend(&mut brood.children, legend, weakest_survivor, population_size)
            }
            _ => false,
        };

        let mut children = brood.children;
        self.fill_with_random(&mut children, population_size);

        Offspring {
            genomes: children,
            legend_spawned,
            next_id: self.next_id,
        }
    }

    /// Carry over and cross the parents.
    ///
    /// Each parent either survives unchanged (no crossover), or
    /// survives only if it is among the top alphas and is then
    /// crossed with every parent ranked below it, each pairing
    /// producing two mutated children.
    fn breed_parents(&mut self, parents: &[&Genome]) -> Brood {
        let mut brood = Brood {
            children: Vec::new(),
            carried: Vec::new(),
        };

        for (i, parent) in parents.iter().enumerate() {
            let crosses = chance(self.rng, self.config.crossover_chance);
            if !crosses || i < self.config.max_alphas {
                brood.carry_over(parent);
            }
            if !crosses {
                continue;
            }

            for partner in &parents[i + 1..] {
                let (child1, child2) = self.crossbreed(parent, partner);
                brood.children.push(child1);
                brood.children.push(child2);
            }
        }

        brood
    }

    /// Produce two mutated children by crossover at a random point.
    fn crossbreed(&mut self, first: &Genome, second: &Genome) -> (Genome, Genome) {
        let point = self
            .rng
            .gen_range(0..self.total_weights.saturating_sub(1).max(1));
        let ids = (self.new_id(), self.new_id());
        let (mut child1, mut child2) = first.crossover_at(second, point, ids);
        for child in [&mut child1, &mut child2] {
            child.mutate(
                self.config.mutation_rate,
                self.config.max_perturbation,
                self.rng,
            );
        }
        (child1, child2)
    }

    /// Append a copy of the legend if the weakest survivor
    /// falls short of the configured fraction of its fitness.
    /// A full population gives up its last child for it.
    /// Returns whether the legend was added.
    ///
    /// The copy gets a fresh identity, so a copy surviving into
    /// later generations is not recognised as the legend. If that
    /// copy keeps scoring below the threshold the legend is added
    /// again next to it.
    fn add_legend(
        &mut self,
        children: &mut Vec<Genome>,
        legend: &Genome,
        weakest_survivor: Option<f32>,
        population_size: usize,
    ) -> bool {
        let weakest = weakest_survivor.unwrap_or(0.0);
        if weakest >= legend.fitness * self.config.legend_spawn_threshold {
            return false;
        }

        log::info!(
            "re-introducing legend {} (fitness {}) over weakest survivor fitness {}",
            legend.id,
            legend.fitness,
            weakest
        );
        if children.len() >= population_size {
            children.truncate(population_size - 1);
        }
        let id = self.new_id();
        children.push(legend.clone_with_id(id));
        true
    }

    fn fill_with_random(&mut self, children: &mut Vec<Genome>, population_size: usize) {
        while children.len() < population_size {
            let id = self.new_id();
            children.push(Genome::random(id, self.total_weights, self.rng));
        }
    }

    fn new_id(&mut self) -> GenomeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Brood {
    fn carry_over(&mut self, parent: &Genome) {
        self.carried.push(parent.id);
        self.children.push(parent.clone());
    }

    fn is_carried(&self, genome: &Genome) -> bool {
        self.carried.contains(&genome.id)
    }

    /// Drops surplus children from the back, crossover
    /// children before carried-over parents.
    fn truncate(&mut self, size: usize) {
        let mut surplus = self.children.len().saturating_sub(size);
        if surplus == 0 {
            return;
        }
        log::debug!("dropping {} surplus children", surplus);

        let mut i = self.children.len();
        while surplus > 0 && i > 0 {
            i -= 1;
            if !self.is_carried(&self.children[i]) {
                self.children.remove(i);
                surplus -= 1;
            }
        }
        self.children.truncate(size);
    }

    /// Whether `legend` is among the remaining carried-over parents.
    fn carries(&self, legend: &Genome) -> bool {
        self.children
            .iter()
            .any(|child| child.id == legend.id && self.is_carried(child))
    }

    fn weakest_survivor(&self) -> Option<f32> {
        self.children
            .iter()
            .filter(|child| self.is_carried(child))
            .map(|child| child.fitness)
            .reduce(f32::min)
    }
}
