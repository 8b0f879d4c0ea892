//! Platform layer
//!
//! Handles the parts of the loop that touch the outside world:
//! - Tick pacing (fixed-rate limiter)
//! - Input events (terminal key presses)
//! - Terminal session (raw mode, alternate screen)

pub mod input;
pub mod terminal;
pub mod time;

pub use input::{InputEvent, KeyboardInput, map_key};
pub use terminal::{TerminalSession, show_message};
pub use time::FrameLimiter;
