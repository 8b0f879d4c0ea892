//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (birds in spawn order, pipes oldest first)
//! - No rendering or platform dependencies

pub mod bird;
pub mod collision;
pub mod mask;
pub mod pipe;
pub mod state;
pub mod tick;

pub use bird::{Bird, WingFrame};
pub use collision::{bird_out_of_bounds, bird_pipe_collision};
pub use mask::{Bitmask, Silhouette, SpriteMasks};
pub use pipe::Pipe;
pub use state::{GamePhase, GameState, Ground};
pub use tick::{TickInput, WorldEvents, resolve_world, tick};
