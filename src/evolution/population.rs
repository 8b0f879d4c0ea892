//! Optimizer boundary and a reference generational optimizer
//!
//! The simulation only sees [`Optimizer`]: a genome set to score, an
//! `evolve` step, and a stopping rule. [`Population`] is a plain
//! fixed-topology genetic algorithm behind that trait.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::episode::{Generation, fitness_summary};
use super::genome::Genome;
use super::network::NetworkShape;
use crate::settings::EvolutionSettings;

/// Black-box optimizer driven one generation at a time
pub trait Optimizer {
    /// Genomes awaiting a fitness score
    fn genomes_mut(&mut self) -> &mut [Genome];

    /// Generation the current genomes belong to
    fn generation(&self) -> Generation;

    /// Record statistics for the scored generation
    fn record(&mut self);

    /// True once the last recorded generation met the stopping rule
    fn should_stop(&self) -> bool;

    /// Breed the next generation from the scored one
    fn evolve(&mut self);
}

/// Score generations with `fitness` until the budget runs out or the
/// optimizer's stopping rule fires
pub fn drive<O, F>(optimizer: &mut O, generations: u32, mut fitness: F)
where
    O: Optimizer + ?Sized,
    F: FnMut(&mut [Genome], Generation),
{
    for _ in 0..generations {
        let generation = optimizer.generation();
        fitness(optimizer.genomes_mut(), generation);
        optimizer.record();
        if optimizer.should_stop() {
            break;
        }
        optimizer.evolve();
    }
}

/// Per-generation statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub best: f32,
    pub mean: f32,
    pub stdev: f32,
    pub size: usize,
}

impl GenerationSummary {
    fn from_genomes(generation: Generation, genomes: &[Genome]) -> Self {
        let (mean, best) = fitness_summary(genomes);
        let variance = if genomes.is_empty() {
            0.0
        } else {
            genomes
                .iter()
                .map(|g| (g.fitness - mean).powi(2))
                .sum::<f32>()
                / genomes.len() as f32
        };
        Self {
            generation: generation.index(),
            best,
            mean,
            stdev: variance.sqrt(),
            size: genomes.len(),
        }
    }
}

/// Fixed-topology genetic algorithm
#[derive(Debug, Clone)]
pub struct Population {
    settings: EvolutionSettings,
    shape: NetworkShape,
    genomes: Vec<Genome>,
    generation: Generation,
    history: Vec<GenerationSummary>,
    best: Option<Genome>,
    best_generation: Option<Generation>,
    rng: Pcg32,
    next_id: u32,
}

impl Population {
    /// Random initial population
    pub fn new(settings: &EvolutionSettings, seed: u64) -> Self {
        let shape = NetworkShape::new(settings.hidden_neurons);
        let mut rng = Pcg32::seed_from_u64(seed);
        let size = settings.population_size.max(1);
        let genomes = (0..size as u32)
            .map(|id| Genome::random(id, shape, settings.weight_init_stdev, &mut rng))
            .collect();

        Self {
            settings: settings.clone(),
            shape,
            genomes,
            generation: Generation::first(),
            history: Vec::new(),
            best: None,
            best_generation: None,
            rng,
            next_id: size as u32,
        }
    }

    pub fn shape(&self) -> NetworkShape {
        self.shape
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Statistics for every scored generation
    pub fn history(&self) -> &[GenerationSummary] {
        &self.history
    }

    /// Best genome scored so far
    pub fn best(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    /// Generation the best genome was scored in
    pub fn best_generation(&self) -> Option<Generation> {
        self.best_generation
    }

    /// Run up to `generations` generations; returns the best genome seen
    pub fn run<F>(&mut self, fitness: F, generations: u32) -> Option<Genome>
    where
        F: FnMut(&mut [Genome], Generation),
    {
        drive(self, generations, fitness);
        self.best.clone()
    }

    fn next_genome_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn crossover(&mut self, a: &Genome, b: &Genome) -> Genome {
        let weights = a
            .weights
            .iter()
            .zip(&b.weights)
            .map(|(wa, wb)| if self.rng.random::<bool>() { *wa } else { *wb })
            .collect();
        let id = self.next_genome_id();
        Genome::new(id, weights)
    }

    fn mutate(&mut self, genome: &mut Genome) {
        let s = &self.settings;
        let (Ok(perturb), Ok(fresh)) = (
            Normal::new(0.0, s.mutation_power),
            Normal::new(0.0, s.weight_init_stdev),
        ) else {
            return;
        };

        for weight in &mut genome.weights {
            let roll: f32 = self.rng.random();
            if roll < s.mutation_rate {
                *weight += perturb.sample(&mut self.rng);
            } else if roll < s.mutation_rate + s.replace_rate {
                *weight = fresh.sample(&mut self.rng);
            }
            *weight = weight.clamp(-s.weight_max, s.weight_max);
        }
    }
}

impl Optimizer for Population {
    fn genomes_mut(&mut self) -> &mut [Genome] {
        &mut self.genomes
    }

    fn generation(&self) -> Generation {
        self.generation
    }

    fn record(&mut self) {
        let summary = GenerationSummary::from_genomes(self.generation, &self.genomes);
        log::info!(
            "Generation {}: best {:.2}, mean {:.2}, stdev {:.2}, size {}",
            summary.generation,
            summary.best,
            summary.mean,
            summary.stdev,
            summary.size
        );

        let champion = self
            .genomes
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness));
        if let Some(champion) = champion {
            let improved = self
                .best
                .as_ref()
                .is_none_or(|best| champion.fitness > best.fitness);
            if improved {
                self.best = Some(champion.clone());
                self.best_generation = Some(self.generation);
            }
        }

        if summary.best >= self.settings.fitness_threshold {
            log::info!(
                "Fitness threshold {} reached in generation {}",
                self.settings.fitness_threshold,
                summary.generation
            );
        }
        self.history.push(summary);
    }

    fn should_stop(&self) -> bool {
        self.history
            .last()
            .is_some_and(|s| s.best >= self.settings.fitness_threshold)
    }

    fn evolve(&mut self) {
        let size = self.genomes.len();
        let mut ranked = std::mem::take(&mut self.genomes);
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let elites = self.settings.elitism.min(size);
        let survivors =
            ((size as f32 * self.settings.survival_threshold).ceil() as usize).clamp(2.min(size), size);

        let mut next: Vec<Genome> = ranked[..elites]
            .iter()
            .map(|g| Genome::new(g.id, g.weights.clone()))
            .collect();

        let parents = &ranked[..survivors];
        while next.len() < size {
            let (Some(a), Some(b)) = (parents.choose(&mut self.rng), parents.choose(&mut self.rng))
            else {
                break;
            };
            let mut child = self.crossover(a, b);
            self.mutate(&mut child);
            next.push(child);
        }

        self.genomes = next;
        self.generation = self.generation.next();
    }
}
