//! Flappy Evo - a side-scrolling flappy game with an evolved autopilot
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, pipes, pixel collision, game state)
//! - `evolution`: Fitness protocol and the population optimizer behind it
//! - `renderer`: Render sink boundary (frame snapshots, terminal/log sinks)
//! - `platform`: Frame limiter and keyboard input source
//! - `persistence`: Save/load of evolved genomes
//! - `settings`: JSON configuration

pub mod evolution;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{EvolutionSettings, RenderMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 30;

    /// Visible area
    pub const WIN_WIDTH: f32 = 500.0;
    pub const WIN_HEIGHT: f32 = 800.0;
    /// Ground line (top edge of the scrolling base)
    pub const GROUND_Y: f32 = 730.0;

    /// Bird spawn point
    pub const BIRD_X: f32 = 230.0;
    pub const BIRD_START_Y: f32 = 350.0;
    /// Bird sprite size (silhouette bounds)
    pub const BIRD_WIDTH: u32 = 68;
    pub const BIRD_HEIGHT: u32 = 48;

    /// Kinematics (units per tick)
    pub const JUMP_VELOCITY: f32 = -10.5;
    pub const GRAVITY: f32 = 3.0;
    pub const TERMINAL_DISPLACEMENT: f32 = 16.0;
    /// Extra lift applied to any upward displacement
    pub const UPWARD_CORRECTION: f32 = 2.0;

    /// Tilt limits (degrees) and decay per tick
    pub const MAX_TILT: f32 = 25.0;
    pub const MIN_TILT: f32 = -90.0;
    pub const TILT_STEP: f32 = 20.0;
    /// Keep the nose up until the bird drops this far below its jump height
    pub const TILT_HOLD_DROP: f32 = 50.0;
    /// Ticks per wing frame
    pub const ANIMATION_TIME: u32 = 5;

    /// Pipe sprite size and gap
    pub const PIPE_WIDTH: u32 = 104;
    pub const PIPE_HEIGHT: u32 = 640;
    pub const PIPE_GAP: f32 = 200.0;
    /// Gap top is drawn from [PIPE_GAP_MIN, PIPE_GAP_MAX)
    pub const PIPE_GAP_MIN: i32 = 50;
    pub const PIPE_GAP_MAX: i32 = 450;
    pub const PIPE_SPAWN_X: f32 = 600.0;
    pub const SCROLL_SPEED: f32 = 5.0;

    /// Ground tile width
    pub const GROUND_TILE_WIDTH: f32 = 672.0;
}

/// Mix a run seed with a round index (golden ratio hash)
#[inline]
pub fn derive_seed(seed: u64, round: u64) -> u64 {
    seed.wrapping_mul(2654435761).wrapping_add(round)
}
