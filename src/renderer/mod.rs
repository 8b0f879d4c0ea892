//! Render sink boundary
//!
//! The simulation hands a [`Frame`] to a [`RenderSink`] once per tick. Sinks
//! only observe; nothing flows back into the world.

pub mod ascii;

pub use ascii::{AsciiCanvas, AsciiSink, MESSAGE_ROW};

use crate::settings::RenderMode;
use crate::sim::GameState;

/// Evolutionary-mode overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudStats {
    pub generation: u32,
    pub alive: usize,
    pub avg_fitness: f32,
    pub best_fitness: f32,
}

/// Snapshot presented after each tick
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub state: &'a GameState,
    /// Present in evolutionary mode only
    pub hud: Option<HudStats>,
}

impl<'a> Frame<'a> {
    /// Manual-mode frame
    pub fn plain(state: &'a GameState) -> Self {
        Self { state, hud: None }
    }

    /// One-line status: score, tick and HUD numbers when present
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "score {} | tick {}",
            self.state.score, self.state.time_ticks
        );
        if let Some(hud) = &self.hud {
            line.push_str(&format!(
                " | gen {} | alive {} | avg {:.2} | best {:.2}",
                hud.generation, hud.alive, hud.avg_fitness, hud.best_fitness
            ));
        }
        line
    }
}

/// Frame consumer
pub trait RenderSink {
    fn present(&mut self, frame: &Frame<'_>);
}

/// Discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn present(&mut self, _frame: &Frame<'_>) {}
}

/// Logs a status line every `interval` ticks and on the final frame
#[derive(Debug, Clone)]
pub struct LogSink {
    interval: u64,
    presented: u64,
}

impl LogSink {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            presented: 0,
        }
    }

    /// Frames seen so far
    pub fn presented(&self) -> u64 {
        self.presented
    }

    fn should_log(&self, frame: &Frame<'_>) -> bool {
        !frame.state.is_running() || frame.state.time_ticks % self.interval == 0
    }
}

impl RenderSink for LogSink {
    fn present(&mut self, frame: &Frame<'_>) {
        self.presented += 1;
        if self.should_log(frame) {
            log::info!("{}", frame.status_line());
        }
    }
}

/// Build the sink selected in settings. The log sink reports once per
/// second of game time.
pub fn sink_for(mode: RenderMode, tick_rate: u32) -> Box<dyn RenderSink> {
    match mode {
        RenderMode::Ascii => Box::new(AsciiSink::stdout()),
        RenderMode::Log => Box::new(LogSink::new(tick_rate as u64)),
        RenderMode::None => Box::new(NullSink),
    }
}
