//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::mask::SpriteMasks;
use super::pipe::Pipe;
use crate::consts::*;

/// Episode phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Birds are flying
    Running,
    /// No birds left
    Terminated,
}

/// Scrolling ground made of two tiles leapfrogging each other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ground {
    pub y: f32,
    pub x1: f32,
    pub x2: f32,
}

impl Default for Ground {
    fn default() -> Self {
        Self {
            y: GROUND_Y,
            x1: 0.0,
            x2: GROUND_TILE_WIDTH,
        }
    }
}

impl Ground {
    pub fn advance(&mut self) {
        self.x1 -= SCROLL_SPEED;
        self.x2 -= SCROLL_SPEED;

        if self.x1 + GROUND_TILE_WIDTH < 0.0 {
            self.x1 = self.x2 + GROUND_TILE_WIDTH;
        }
        if self.x2 + GROUND_TILE_WIDTH < 0.0 {
            self.x2 = self.x1 + GROUND_TILE_WIDTH;
        }
    }
}

/// Complete world state for one episode
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the pipe RNG was created from
    pub seed: u64,
    rng: Pcg32,
    /// Active birds, in spawn order
    pub birds: Vec<Bird>,
    /// Pipes, oldest first
    pub pipes: Vec<Pipe>,
    pub ground: Ground,
    /// Pipes passed
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Collision silhouettes
    pub masks: SpriteMasks,
    next_bird_id: u32,
}

impl GameState {
    /// Create a world with one pipe at the spawn point and no birds
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            birds: Vec::new(),
            pipes: Vec::new(),
            ground: Ground::default(),
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Running,
            masks: SpriteMasks::new(),
            next_bird_id: 0,
        };

        state.spawn_pipe();

        state
    }

    /// Create a world with `count` birds at the start position
    pub fn with_birds(seed: u64, count: usize) -> Self {
        let mut state = Self::new(seed);
        for _ in 0..count {
            state.spawn_bird(BIRD_START_Y);
        }
        state
    }

    /// Spawn a bird at the fixed x and the given height. Returns its id.
    pub fn spawn_bird(&mut self, y: f32) -> u32 {
        let id = self.next_bird_id;
        self.next_bird_id += 1;
        self.birds.push(Bird::new(id, BIRD_X, y));
        id
    }

    /// Spawn a pipe with a random gap at the spawn point
    pub fn spawn_pipe(&mut self) {
        let pipe = Pipe::spawn(PIPE_SPAWN_X, &mut self.rng);
        log::debug!("Pipe spawned, gap at {}", pipe.gap_y());
        self.pipes.push(pipe);
    }

    /// The lead bird (first still active)
    pub fn lead_bird(&self) -> Option<&Bird> {
        self.birds.first()
    }

    /// Index of the pipe the birds should be steering for: the first one, unless
    /// the lead bird has already cleared its trailing edge
    pub fn reference_pipe_index(&self) -> usize {
        match self.lead_bird() {
            Some(lead) if self.pipes.len() > 1 && lead.pos.x > self.pipes[0].right() => 1,
            _ => 0,
        }
    }

    pub fn reference_pipe(&self) -> Option<&Pipe> {
        self.pipes.get(self.reference_pipe_index())
    }

    /// Remove every bird whose id is listed (applied after a scan, never during)
    pub fn remove_birds(&mut self, ids: &[u32]) {
        if !ids.is_empty() {
            self.birds.retain(|b| !ids.contains(&b.id));
        }
    }

    pub fn alive(&self) -> usize {
        self.birds.len()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_has_one_pipe() {
        let state = GameState::new(7);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes[0].x, PIPE_SPAWN_X);
        assert!(state.birds.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_bird_ids_follow_spawn_order() {
        let mut state = GameState::with_birds(7, 3);
        let ids: Vec<u32> = state.birds.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        state.remove_birds(&[1]);
        assert_eq!(state.spawn_bird(100.0), 3);
        let ids: Vec<u32> = state.birds.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
    }

    #[test]
    fn test_same_seed_same_pipes() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        for _ in 0..5 {
            a.spawn_pipe();
            b.spawn_pipe();
        }
        let gaps_a: Vec<f32> = a.pipes.iter().map(|p| p.gap_y()).collect();
        let gaps_b: Vec<f32> = b.pipes.iter().map(|p| p.gap_y()).collect();
        assert_eq!(gaps_a, gaps_b);
    }

    #[test]
    fn test_reference_pipe_switches_after_clearing() {
        let mut state = GameState::with_birds(1, 1);
        state.pipes.clear();
        state.pipes.push(Pipe::with_gap(200.0, 100.0));
        state.pipes.push(Pipe::with_gap(500.0, 100.0));

        // Bird at 230 is still under the first pipe (200..304)
        assert_eq!(state.reference_pipe_index(), 0);

        state.pipes[0].x = 100.0;
        assert_eq!(state.reference_pipe_index(), 1);

        state.pipes.remove(1);
        assert_eq!(state.reference_pipe_index(), 0);
    }

    #[test]
    fn test_ground_tiles_leapfrog() {
        let mut ground = Ground::default();
        let steps = (GROUND_TILE_WIDTH / SCROLL_SPEED) as usize + 1;
        for _ in 0..steps {
            ground.advance();
        }
        // First tile scrolled off and was placed behind the second
        assert!(ground.x1 > ground.x2);
        assert_eq!(ground.x1 - ground.x2, GROUND_TILE_WIDTH);
    }
}
