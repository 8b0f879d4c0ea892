//! Scrolling pipe pairs

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A top/bottom pipe pair with a vertical gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Gap top (bottom edge of the top pipe); fixed at creation
    gap_y: f32,
    /// Whether a bird has flown past the leading edge
    pub passed: bool,
}

impl Pipe {
    /// Spawn at `x` with a gap drawn uniformly from [PIPE_GAP_MIN, PIPE_GAP_MAX)
    pub fn spawn(x: f32, rng: &mut impl Rng) -> Self {
        let gap_y = rng.random_range(PIPE_GAP_MIN..PIPE_GAP_MAX) as f32;
        Self::with_gap(x, gap_y)
    }

    pub fn with_gap(x: f32, gap_y: f32) -> Self {
        Self {
            x,
            gap_y,
            passed: false,
        }
    }

    /// Gap top
    #[inline]
    pub fn gap_y(&self) -> f32 {
        self.gap_y
    }

    /// Y of the top pipe sprite (its bottom edge is the gap top)
    #[inline]
    pub fn top(&self) -> f32 {
        self.gap_y - PIPE_HEIGHT as f32
    }

    /// Y of the bottom pipe sprite
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.gap_y + PIPE_GAP
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH as f32
    }

    /// Scroll left one tick
    pub fn advance(&mut self) {
        self.x -= SCROLL_SPEED;
    }

    /// Fully scrolled off the left edge
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }
}
