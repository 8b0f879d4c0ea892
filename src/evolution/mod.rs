//! Neuro-evolution mode
//!
//! The optimizer owns the genomes; an [`Episode`] borrows them for one
//! generation and writes their fitness back.

pub mod episode;
pub mod genome;
pub mod network;
pub mod population;

pub use episode::{
    COLLISION_PENALTY, Episode, EpisodeReport, Generation, PASS_REWARD, TICK_REWARD,
    evaluate_genomes, fitness_summary,
};
pub use genome::Genome;
pub use network::{INPUTS, Network, NetworkShape};
pub use population::{GenerationSummary, Optimizer, Population, drive};
