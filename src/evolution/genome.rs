//! Genome: network weights plus the fitness earned in the last episode

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::network::{Network, NetworkShape};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    pub id: u32,
    pub weights: Vec<f32>,
    /// Written by the fitness function each generation
    pub fitness: f32,
}

impl Genome {
    pub fn new(id: u32, weights: Vec<f32>) -> Self {
        Self {
            id,
            weights,
            fitness: 0.0,
        }
    }

    /// Fresh genome with normally distributed weights
    pub fn random(id: u32, shape: NetworkShape, stdev: f32, rng: &mut impl Rng) -> Self {
        let weights = match Normal::new(0.0, stdev) {
            Ok(normal) => (0..shape.weight_count()).map(|_| normal.sample(&mut *rng)).collect(),
            Err(_) => vec![0.0; shape.weight_count()],
        };
        Self::new(id, weights)
    }

    /// Build the decision network for this genome
    pub fn network(&self, shape: NetworkShape) -> Network {
        Network::new(shape, &self.weights)
    }
}
