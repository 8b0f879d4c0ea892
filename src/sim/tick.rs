//! Fixed timestep simulation tick
//!
//! `resolve_world` runs everything after the birds have moved: collisions,
//! scoring, pipe recycling, bounds, ground and animation. Manual play wraps it
//! in [`tick`]; the evolution episode wraps it with its own decision step.

use super::collision::{bird_out_of_bounds, bird_pipe_collision};
use super::state::{GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (key press)
    pub flap: bool,
}

/// What happened to the birds and pipes during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldEvents {
    /// Birds removed for hitting a pipe
    pub collided: Vec<u32>,
    /// Birds removed for touching the ground or leaving the top of the screen
    pub out_of_bounds: Vec<u32>,
    /// Pipes passed this tick
    pub pipes_passed: u32,
}

impl WorldEvents {
    pub fn any_removed(&self) -> bool {
        !self.collided.is_empty() || !self.out_of_bounds.is_empty()
    }
}

/// Advance a manual game by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> WorldEvents {
    if !state.is_running() {
        return WorldEvents::default();
    }

    state.time_ticks += 1;

    for bird in &mut state.birds {
        if input.flap {
            bird.jump();
        }
        bird.advance();
    }

    let events = resolve_world(state);
    if state.phase == GamePhase::Terminated {
        log::info!("Game over at tick {}, score {}", state.time_ticks, state.score);
    }
    events
}

/// Collisions, scoring, pipe recycling, bounds and cosmetics for the current tick
pub fn resolve_world(state: &mut GameState) -> WorldEvents {
    let mut events = WorldEvents::default();

    // Mark, then compact: each bird is tested at most once per pipe this tick
    for pipe in &mut state.pipes {
        for bird in &state.birds {
            if events.collided.contains(&bird.id) {
                continue;
            }
            if bird_pipe_collision(bird, pipe, &state.masks) {
                events.collided.push(bird.id);
                continue;
            }
            if !pipe.passed && pipe.x < bird.pos.x {
                pipe.passed = true;
                events.pipes_passed += 1;
            }
        }
    }
    state.remove_birds(&events.collided);

    for pipe in &mut state.pipes {
        pipe.advance();
    }
    state.pipes.retain(|p| !p.is_offscreen());

    for _ in 0..events.pipes_passed {
        state.score += 1;
        state.spawn_pipe();
    }

    events.out_of_bounds = state
        .birds
        .iter()
        .filter(|b| bird_out_of_bounds(b))
        .map(|b| b.id)
        .collect();
    state.remove_birds(&events.out_of_bounds);

    state.ground.advance();
    for bird in &mut state.birds {
        bird.animate();
    }

    if state.birds.is_empty() {
        state.phase = GamePhase::Terminated;
    }

    events
}
