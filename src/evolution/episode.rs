//! Fitness protocol
//!
//! One episode per generation: every genome gets a bird and a network, earns
//! a little fitness per tick alive, a bonus per pipe passed while alive and a
//! penalty when it hits a pipe. The episode ends when no bird is left.

use serde::{Deserialize, Serialize};

use super::genome::Genome;
use super::network::{Network, NetworkShape};
use crate::derive_seed;
use crate::platform::FrameLimiter;
use crate::renderer::{Frame, HudStats, RenderSink};
use crate::settings::EvolutionSettings;
use crate::sim::{GamePhase, GameState, WorldEvents, resolve_world};

/// Fitness earned per tick alive
pub const TICK_REWARD: f32 = 0.1;
/// Fitness earned by every surviving bird when a pipe is passed
pub const PASS_REWARD: f32 = 5.0;
/// Fitness lost on hitting a pipe
pub const COLLISION_PENALTY: f32 = 1.0;

/// Generation counter, owned by the optimizer and handed to each episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    index: u32,
}

impl Generation {
    pub fn first() -> Self {
        Self { index: 1 }
    }

    /// Generation `index` (1-based; 0 reads as 1)
    pub fn from_index(index: u32) -> Self {
        Self {
            index: index.max(1),
        }
    }

    /// 1-based generation number
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn next(&self) -> Self {
        Self {
            index: self.index + 1,
        }
    }
}

/// Outcome of one episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub generation: u32,
    pub ticks: u64,
    pub score: u64,
    pub avg_fitness: f32,
    pub best_fitness: f32,
}

/// A running evolutionary episode
pub struct Episode<'g> {
    state: GameState,
    genomes: &'g mut [Genome],
    /// Indexed by bird id (= genome slot)
    brains: Vec<Network>,
    threshold: f32,
    tick_limit: Option<u64>,
    generation: Generation,
}

impl<'g> Episode<'g> {
    /// One bird per genome at the start position
    pub fn new(
        genomes: &'g mut [Genome],
        shape: NetworkShape,
        settings: &EvolutionSettings,
        generation: Generation,
        seed: u64,
    ) -> Self {
        let state = GameState::with_birds(seed, genomes.len());
        Self::from_state(state, genomes, shape, settings, generation)
    }

    /// Run on a prepared world. Bird `i` is flown by genome `i`.
    pub fn from_state(
        state: GameState,
        genomes: &'g mut [Genome],
        shape: NetworkShape,
        settings: &EvolutionSettings,
        generation: Generation,
    ) -> Self {
        let brains = genomes.iter().map(|g| g.network(shape)).collect();
        for genome in genomes.iter_mut() {
            genome.fitness = 0.0;
        }

        Self {
            state,
            genomes,
            brains,
            threshold: settings.activation_threshold,
            tick_limit: settings.episode_tick_limit,
            generation,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn genomes(&self) -> &[Genome] {
        self.genomes
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Advance one tick
    pub fn step(&mut self) -> WorldEvents {
        if !self.state.is_running() {
            return WorldEvents::default();
        }
        if self.state.birds.is_empty() {
            self.state.phase = GamePhase::Terminated;
            return WorldEvents::default();
        }

        self.state.time_ticks += 1;

        // Shared target for every bird, picked from the lead bird
        let target = self
            .state
            .reference_pipe()
            .map(|p| (p.gap_y(), p.bottom()));

        for bird in &mut self.state.birds {
            bird.advance();

            let slot = bird.id as usize;
            if let Some(genome) = self.genomes.get_mut(slot) {
                genome.fitness += TICK_REWARD;
            }

            let y = bird.pos.y;
            let (gap_top, gap_bottom) = target.unwrap_or((y, y));
            let inputs = [y, (y - gap_top).abs(), (y - gap_bottom).abs()];
            let flap = self
                .brains
                .get(slot)
                .is_some_and(|net| net.activate(&inputs) > self.threshold);
            if flap {
                bird.jump();
            }
        }

        let flying: Vec<u32> = self.state.birds.iter().map(|b| b.id).collect();
        let events = resolve_world(&mut self.state);

        for id in &events.collided {
            if let Some(genome) = self.genomes.get_mut(*id as usize) {
                genome.fitness -= COLLISION_PENALTY;
            }
        }

        if events.pipes_passed > 0 {
            let bonus = PASS_REWARD * events.pipes_passed as f32;
            for id in flying.iter().filter(|id| !events.collided.contains(id)) {
                if let Some(genome) = self.genomes.get_mut(*id as usize) {
                    genome.fitness += bonus;
                }
            }
        }

        if let Some(limit) = self.tick_limit {
            if self.state.is_running() && self.state.time_ticks >= limit {
                log::info!(
                    "Generation {} hit the {} tick limit with {} alive",
                    self.generation.index(),
                    limit,
                    self.state.alive()
                );
                self.state.phase = GamePhase::Terminated;
            }
        }

        events
    }

    /// HUD numbers for the current tick
    pub fn hud(&self) -> HudStats {
        let (avg_fitness, best_fitness) = fitness_summary(self.genomes);
        HudStats {
            generation: self.generation.index(),
            alive: self.state.alive(),
            avg_fitness,
            best_fitness,
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            state: &self.state,
            hud: Some(self.hud()),
        }
    }

    pub fn report(&self) -> EpisodeReport {
        let (avg_fitness, best_fitness) = fitness_summary(self.genomes);
        EpisodeReport {
            generation: self.generation.index(),
            ticks: self.state.time_ticks,
            score: self.state.score,
            avg_fitness,
            best_fitness,
        }
    }
}

/// Mean and max fitness (zeros when empty)
pub fn fitness_summary(genomes: &[Genome]) -> (f32, f32) {
    if genomes.is_empty() {
        return (0.0, 0.0);
    }
    let sum: f32 = genomes.iter().map(|g| g.fitness).sum();
    let best = genomes
        .iter()
        .map(|g| g.fitness)
        .fold(f32::NEG_INFINITY, f32::max);
    (sum / genomes.len() as f32, best)
}

/// Fitness callback: fly one generation to completion and leave final
/// fitness on every genome
pub fn evaluate_genomes(
    genomes: &mut [Genome],
    generation: Generation,
    settings: &EvolutionSettings,
    run_seed: u64,
    sink: &mut dyn RenderSink,
    mut limiter: Option<&mut FrameLimiter>,
) -> EpisodeReport {
    let shape = NetworkShape::new(settings.hidden_neurons);
    let seed = derive_seed(run_seed, generation.index() as u64);
    let mut episode = Episode::new(genomes, shape, settings, generation, seed);

    while episode.is_running() {
        if let Some(limiter) = limiter.as_mut() {
            limiter.wait();
        }
        episode.step();
        sink.present(&episode.frame());
    }

    let report = episode.report();
    log::debug!(
        "Generation {} episode: {} ticks, score {}",
        report.generation,
        report.ticks,
        report.score
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::NullSink;
    use crate::sim::Pipe;

    /// Never flaps
    fn faller(id: u32) -> Genome {
        Genome::new(id, vec![0.0, 0.0, 0.0, -5.0])
    }

    /// Always flaps
    fn climber(id: u32) -> Genome {
        Genome::new(id, vec![0.0, 0.0, 0.0, 5.0])
    }

    /// Flaps whenever it sinks below y = 400
    fn hoverer(id: u32) -> Genome {
        Genome::new(id, vec![1.0, 0.0, 0.0, -400.0])
    }

    #[test]
    fn test_generation_counter() {
        let g = Generation::first();
        assert_eq!(g.index(), 1);
        assert_eq!(g.next().next().index(), 3);
        assert_eq!(Generation::from_index(0), g);
        assert_eq!(Generation::from_index(12).index(), 12);
    }

    #[test]
    fn test_lone_faller_earns_tick_reward_only() {
        let mut genomes = vec![faller(0)];
        genomes[0].fitness = 42.0;
        let settings = EvolutionSettings::default();
        let mut episode = Episode::new(
            &mut genomes,
            NetworkShape::new(0),
            &settings,
            Generation::first(),
            7,
        );
        // Stale fitness is cleared up front
        assert_eq!(episode.genomes()[0].fitness, 0.0);

        while episode.is_running() {
            episode.step();
        }
        let report = episode.report();
        assert_eq!(report.ticks, 23);
        // Leaving the screen carries no penalty
        assert!((genomes[0].fitness - 2.3).abs() < 1e-4);
    }

    #[test]
    fn test_three_genome_episode() {
        // Pipe gap 300..500, leading edge reaches the birds on tick 10 and
        // passes x = 230 on tick 24
        let mut state = GameState::new(11);
        state.pipes.clear();
        state.pipes.push(Pipe::with_gap(340.0, 300.0));
        state.spawn_bird(150.0); // falls into the top pipe on tick 10
        state.spawn_bird(400.0); // hovers inside the gap
        state.spawn_bird(10.0); // climbs off the top of the screen on tick 3

        let mut genomes = vec![faller(0), hoverer(1), climber(2)];
        let settings = EvolutionSettings::default();
        let mut episode = Episode::from_state(
            state,
            &mut genomes,
            NetworkShape::new(0),
            &settings,
            Generation::first(),
        );

        let mut deaths = Vec::new();
        let mut passes = Vec::new();
        while episode.is_running() {
            let before: Vec<f32> = episode.genomes().iter().map(|g| g.fitness).collect();
            let alive: Vec<u32> = episode.state().birds.iter().map(|b| b.id).collect();

            let events = episode.step();
            let tick = episode.state().time_ticks;

            for id in &alive {
                let now = episode.genomes()[*id as usize].fitness;
                if events.collided.contains(id) {
                    assert!((now - (before[*id as usize] + TICK_REWARD - COLLISION_PENALTY)).abs() < 1e-4);
                } else {
                    assert!(now >= before[*id as usize]);
                }
            }
            for id in events.collided.iter().chain(&events.out_of_bounds) {
                deaths.push((*id, tick));
            }
            if events.pipes_passed > 0 {
                passes.push(tick);
                // Next pipe sits low enough to catch the hoverer
                let state = episode.state_mut();
                state.pipes.pop();
                state.pipes.push(Pipe::with_gap(PIPE_SPAWN_X, 50.0));
            }

            // Still running while anyone is flying
            assert_eq!(episode.is_running(), !episode.state().birds.is_empty());
            assert!(tick < 500);
        }

        assert_eq!(deaths, vec![(2, 3), (0, 10), (1, 86)]);
        assert_eq!(passes, vec![24]);
        assert_eq!(episode.state().score, 1);

        drop(episode);
        // Faller: 10 ticks alive, then the collision penalty
        assert!((genomes[0].fitness - 0.0).abs() < 1e-3);
        // Hoverer: 86 ticks alive, one pass, then the collision penalty
        assert!((genomes[1].fitness - 12.6).abs() < 1e-3);
        // Climber: 3 ticks alive, no penalty for leaving the screen
        assert!((genomes[2].fitness - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_simultaneous_collisions_and_pass_bonus() {
        let mut state = GameState::new(5);
        state.pipes.clear();
        state.pipes.push(Pipe::with_gap(200.0, 300.0));
        for _ in 0..3 {
            state.spawn_bird(150.0);
        }
        state.spawn_bird(400.0);

        let mut genomes: Vec<Genome> = (0..4).map(faller).collect();
        let settings = EvolutionSettings::default();
        let mut episode = Episode::from_state(
            state,
            &mut genomes,
            NetworkShape::new(0),
            &settings,
            Generation::first(),
        );

        let events = episode.step();
        assert_eq!(events.collided, vec![0, 1, 2]);
        assert_eq!(events.pipes_passed, 1);
        assert_eq!(episode.state().alive(), 1);
        assert_eq!(episode.hud().alive, 1);

        drop(episode);
        for genome in &genomes[..3] {
            assert!((genome.fitness - (TICK_REWARD - COLLISION_PENALTY)).abs() < 1e-5);
        }
        assert!((genomes[3].fitness - (TICK_REWARD + PASS_REWARD)).abs() < 1e-5);
    }

    #[test]
    fn test_tick_limit_ends_episode() {
        let mut genomes = vec![hoverer(0)];
        let settings = EvolutionSettings {
            episode_tick_limit: Some(5),
            ..Default::default()
        };
        let mut episode = Episode::new(
            &mut genomes,
            NetworkShape::new(0),
            &settings,
            Generation::first(),
            3,
        );
        while episode.is_running() {
            episode.step();
        }
        assert_eq!(episode.state().time_ticks, 5);
        assert_eq!(episode.state().alive(), 1);
    }

    #[test]
    fn test_evaluate_genomes_assigns_fitness() {
        let mut genomes: Vec<Genome> = (0..4).map(faller).collect();
        let settings = EvolutionSettings::default();
        let report = evaluate_genomes(
            &mut genomes,
            Generation::first(),
            &settings,
            9,
            &mut NullSink,
            None,
        );
        assert_eq!(report.ticks, 23);
        assert_eq!(report.generation, 1);
        for genome in &genomes {
            assert!((genome.fitness - 2.3).abs() < 1e-4);
        }
        assert!((report.best_fitness - report.avg_fitness).abs() < 1e-5);
    }
}
