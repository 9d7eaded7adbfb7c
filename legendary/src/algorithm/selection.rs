use crate::Genome;

use ahash::RandomState;
use rand::Rng;

use std::cmp::Ordering;
use std::collections::HashSet;

type IndexSet = HashSet<usize, RandomState>;

/// Returns the indices of up to `count` of the fittest
/// genomes, best first. Genomes with 0 fitness are never
/// selected. On equal fitness, the genome appearing first
/// in the population wins.
pub(super) fn elitism(population: &[Genome], count: usize) -> Vec<usize> {
    elitism_excluding(population, count, &IndexSet::default())
}

/// Like [`elitism`], but never selects indices in `excluded`.
fn elitism_excluding(population: &[Genome], count: usize, excluded: &IndexSet) -> Vec<usize> {
    let mut used = excluded.clone();
    let mut selected = Vec::with_capacity(count);

    while selected.len() < count {
        let best = population
            .iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .fold(None, |best: Option<(usize, f32)>, (i, genome)| match best {
                Some((_, fitness)) if genome.fitness <= fitness => best,
                _ => Some((i, genome.fitness)),
            });
        match best {
            Some((index, fitness)) if fitness > 0.0 => {
                used.insert(index);
                selected.push(index);
            }
            _ => break,
        }
    }

    selected
}

/// Returns the indices of up to `count` genomes drawn with
/// probability proportional to their fitness, best first.
/// The fittest genome is always included.
///
/// After `count × retry_factor` draws that failed to fill the
/// selection, the remainder is filled by [`elitism`].
pub(super) fn roulette<R: Rng + ?Sized>(
    population: &[Genome],
    count: usize,
    retry_factor: usize,
    rng: &mut R,
) -> Vec<usize> {
    let fitness_sum: f32 = population.iter().map(|g| g.fitness).sum();
    if count == 0 || fitness_sum <= 0.0 {
        return vec![];
    }

    let mut selected = elitism(population, 1);
    let mut used: IndexSet = selected.iter().copied().collect();
    let max_draws = count * retry_factor;
    let mut draws = 0;

    while selected.len() < count {
        if draws == max_draws {
            log::debug!(
                "roulette selection exhausted {} draws, falling back to elitism",
                max_draws
            );
            let remaining = count - selected.len();
            selected.extend(elitism_excluding(population, remaining, &used));
            break;
        }
        draws += 1;

        let index = spin(population, rng.gen::<f32>() * fitness_sum);
        if population[index].fitness > 0.0 && used.insert(index) {
            selected.push(index);
        }
    }

    // Stable, so equally fit genomes keep their draw order.
    selected.sort_by(|a, b| {
        population[*b]
            .fitness
            .partial_cmp(&population[*a].fitness)
            .unwrap_or(Ordering::Equal)
    });
    selected
}

/// Returns the first genome whose cumulative fitness exceeds `target`.
fn spin(population: &[Genome], target: f32) -> usize {
    let mut partial_sum = 0.0;
    for (i, genome) in population.iter().enumerate() {
        partial_sum += genome.fitness;
        if partial_sum > target {
            return i;
        }
    }
    population.len() - 1
}
