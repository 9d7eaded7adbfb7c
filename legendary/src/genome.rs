//! Genomes are the unit of heredity: an identity,
//! a fitness score and a flat vector of network weights.
use crate::rng::{chance, random_clamped};
use crate::GenomeId;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// A fixed-length weight vector tagged with an
/// identity and a fitness score.
///
/// Suports Serde for convenient genome saving and loading.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome {
    pub(crate) id: GenomeId,
    pub(crate) fitness: f32,
    pub(crate) weights: Vec<f32>,
}

impl Genome {
    /// Creates a genome of `total_weights` weights, each drawn
    /// independently with [`random_clamped`].
    ///
    /// # Examples
    /// ```
    /// use legendary::Genome;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let genome = Genome::random(3, 16, &mut StdRng::seed_from_u64(0));
    ///
    /// assert_eq!(genome.id(), 3);
    /// assert_eq!(genome.fitness(), 0.0);
    /// assert_eq!(genome.weights().len(), 16);
    /// assert!(genome.weights().iter().all(|w| w.abs() < 1.0));
    /// ```
    pub fn random<R: Rng + ?Sized>(id: GenomeId, total_weights: usize, rng: &mut R) -> Genome {
        Genome {
            id,
            fitness: 0.0,
            weights: (0..total_weights).map(|_| random_clamped(rng)).collect(),
        }
    }

    /// Creates a genome holding the given weights, with 0 fitness.
    pub fn from_weights(id: GenomeId, weights: Vec<f32>) -> Genome {
        Genome {
            id,
            fitness: 0.0,
            weights,
        }
    }

    /// Returns a copy of the genome's weights
    /// under a new identity, with fitness reset.
    pub fn clone_with_id(&self, id: GenomeId) -> Genome {
        Genome::from_weights(id, self.weights.clone())
    }

    pub fn id(&self) -> GenomeId {
        self.id
    }

    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Sets the genome's fitness value.
    ///
    /// # Panics
    /// Panics if `fitness` is negative or NaN.
    pub fn set_fitness(&mut self, fitness: f32) {
        assert!(
            fitness >= 0.0,
            "invalid fitness {} assigned to genome {}",
            fitness,
            self.id
        );
        self.fitness = fitness;
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Performs single-point crossover at `point`, returning
    /// two children with fresh identities and 0 fitness.
    ///
    /// The first child takes `self`'s weights before `point`
    /// and `other`'s from `point` onwards; the second child
    /// takes the complement.
    ///
    /// # Panics
    /// Panics if the parents' weight vectors differ in length,
    /// or if `point` is past their end.
    ///
    /// # Examples
    /// ```
    /// use legendary::Genome;
    ///
    /// let a = Genome::from_weights(0, vec![1.0, 2.0, 3.0, 4.0]);
    /// let b = Genome::from_weights(1, vec![5.0, 6.0, 7.0, 8.0]);
    /// let (c1, c2) = a.crossover_at(&b, 1, (2, 3));
    ///
    /// assert_eq!(c1.weights(), &[1.0, 6.0, 7.0, 8.0]);
    /// assert_eq!(c2.weights(), &[5.0, 2.0, 3.0, 4.0]);
    /// assert_eq!((c1.id(), c2.id()), (2, 3));
    /// ```
    pub fn crossover_at(
        &self,
        other: &Genome,
        point: usize,
        (first_id, second_id): (GenomeId, GenomeId),
    ) -> (Genome, Genome) {
        assert_eq!(
            self.weights.len(),
            other.weights.len(),
            "crossover between genomes {} and {} of different lengths",
            self.id,
            other.id
        );
        assert!(
            point <= self.weights.len(),
            "crossover point {} past genome length {}",
            point,
            self.weights.len()
        );

        let (head1, tail1) = self.weights.split_at(point);
        let (head2, tail2) = other.weights.split_at(point);

        (
            Genome::from_weights(first_id, [head1, tail2].concat()),
            Genome::from_weights(second_id, [head2, tail1].concat()),
        )
    }

    /// Perturbs each weight independently, with probability
    /// `mutation_rate`, by `random_clamped() × max_perturbation`.
    pub fn mutate<R: Rng + ?Sized>(&mut self, mutation_rate: f32, max_perturbation: f32, rng: &mut R) {
        for weight in self.weights.iter_mut() {
            if chance(rng, mutation_rate) {
                *weight += random_clamped(rng) * max_perturbation;
            }
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Genome {{ id: {}, fitness: {}, weights: [{}] }}",
            self.id,
            self.fitness,
            self.weights
                .iter()
                .map(|w| format!("{:.4}", w))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn crossover_prefix_suffix() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = Genome::random(0, 30, &mut rng);
        let b = Genome::random(1, 30, &mut rng);

        for point in 0..=29 {
            let (c1, c2) = a.crossover_at(&b, point, (2, 3));
            assert_eq!(c1.weights()[..point], a.weights()[..point]);
            assert_eq!(c1.weights()[point..], b.weights()[point..]);
            assert_eq!(c2.weights()[..point], b.weights()[..point]);
            assert_eq!(c2.weights()[point..], a.weights()[point..]);
            assert_eq!(c1.fitness(), 0.0);
        }
    }

    #[test]
    #[should_panic]
    fn crossover_length_mismatch() {
        let a = Genome::from_weights(0, vec![0.0; 3]);
        let b = Genome::from_weights(1, vec![0.0; 4]);
        a.crossover_at(&b, 1, (2, 3));
    }

    #[test]
    fn mutate_none() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut genome = Genome::random(0, 50, &mut rng);
        let initial = genome.clone();
        genome.mutate(0.0, 0.3, &mut rng);
        assert_eq!(genome, initial);
    }

    #[test]
    fn mutate_all_within_perturbation() {
        const MAX_PERTURBATION: f32 = 0.3;
        let mut rng = StdRng::seed_from_u64(5);
        let mut genome = Genome::random(0, 50, &mut rng);
        let initial = genome.clone();
        genome.mutate(1.0, MAX_PERTURBATION, &mut rng);

        assert_eq!(genome.weights().len(), initial.weights().len());
        for (new, old) in genome.weights().iter().zip(initial.weights()) {
            assert!((new - old).abs() <= MAX_PERTURBATION);
        }
        assert_ne!(genome.weights(), initial.weights());
    }

    #[test]
    fn clone_with_id_resets_fitness() {
        let mut genome = Genome::from_weights(4, vec![0.5, -0.5]);
        genome.set_fitness(12.0);
        let copy = genome.clone_with_id(9);
        assert_eq!(copy.id(), 9);
        assert_eq!(copy.fitness(), 0.0);
        assert_eq!(copy.weights(), genome.weights());
    }

    #[test]
    #[should_panic]
    fn negative_fitness() {
        Genome::from_weights(0, vec![]).set_fitness(-1.0);
    }

    #[test]
    fn serde_round_trip() {
        let mut genome = Genome::from_weights(7, vec![0.25, -0.75]);
        genome.set_fitness(3.5);
        let json = serde_json::to_string(&genome).unwrap();
        assert_eq!(serde_json::from_str::<Genome>(&json).unwrap(), genome);
    }
}
