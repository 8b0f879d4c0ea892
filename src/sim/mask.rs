//! Pixel silhouettes for collision
//!
//! Each row of a [`Bitmask`] is a `u128` with bit `c` set when column `c` is
//! solid, so an overlap test is one shifted AND per shared row.

use glam::{IVec2, UVec2};

use crate::consts::*;
use super::bird::WingFrame;

/// Widest silhouette a row can hold
pub const MAX_MASK_WIDTH: u32 = 128;

/// Anything that can test pixel overlap against another shape of its kind
pub trait Silhouette {
    /// Bounding size in pixels
    fn size(&self) -> UVec2;

    /// True if `other`, placed at `offset` relative to our top-left, shares a solid pixel
    fn overlaps(&self, other: &Self, offset: IVec2) -> bool;
}

/// Per-pixel solidity mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmask {
    width: u32,
    rows: Vec<u128>,
}

impl Bitmask {
    /// Empty mask (width is capped at [`MAX_MASK_WIDTH`])
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.min(MAX_MASK_WIDTH),
            rows: vec![0; height as usize],
        }
    }

    /// Fully solid rectangle
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask from a per-pixel predicate
    pub fn from_fn(width: u32, height: u32, solid: impl Fn(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..mask.width {
                if solid(x, y) {
                    mask.set(x, y);
                }
            }
        }
        mask
    }

    pub fn set(&mut self, x: u32, y: u32) {
        if x < self.width {
            if let Some(row) = self.rows.get_mut(y as usize) {
                *row |= 1u128 << x;
            }
        }
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width
            && self
                .rows
                .get(y as usize)
                .is_some_and(|row| row & (1u128 << x) != 0)
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Number of solid pixels
    pub fn count(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }
}

impl Silhouette for Bitmask {
    fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height())
    }

    fn overlaps(&self, other: &Self, offset: IVec2) -> bool {
        let dx = offset.x;
        if dx >= self.width as i32 || dx <= -(other.width as i32) {
            return false;
        }

        let y_start = offset.y.max(0);
        let y_end = (offset.y + other.height() as i32).min(self.height() as i32);

        (y_start..y_end).any(|y| {
            let ours = self.rows[y as usize];
            let theirs = other.rows[(y - offset.y) as usize];
            // Their column c lands on our column c + dx
            let shifted = if dx >= 0 {
                theirs << dx
            } else {
                theirs >> -dx
            };
            ours & shifted != 0
        })
    }
}

/// Silhouettes for every sprite in play, built once
#[derive(Debug, Clone)]
pub struct SpriteMasks {
    bird: [Bitmask; 3],
    pipe: Bitmask,
}

impl Default for SpriteMasks {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteMasks {
    pub fn new() -> Self {
        Self {
            bird: [
                bird_mask(WingFrame::Up),
                bird_mask(WingFrame::Mid),
                bird_mask(WingFrame::Down),
            ],
            pipe: Bitmask::filled(PIPE_WIDTH, PIPE_HEIGHT),
        }
    }

    pub fn bird(&self, frame: WingFrame) -> &Bitmask {
        &self.bird[frame.index()]
    }

    /// Same mask serves the flipped top pipe
    pub fn pipe(&self) -> &Bitmask {
        &self.pipe
    }
}

/// Body is a rounded box; the wing lobe pokes out above or below it
fn bird_mask(frame: WingFrame) -> Bitmask {
    const BODY_TOP: u32 = 4;
    const BODY_BOTTOM: u32 = 44;
    const CORNER: u32 = 8;
    const WING_LEFT: u32 = 8;
    const WING_RIGHT: u32 = 30;

    let (wing_top, wing_bottom) = match frame {
        WingFrame::Up => (0, 12),
        WingFrame::Mid => (18, 30),
        WingFrame::Down => (36, BIRD_HEIGHT),
    };

    Bitmask::from_fn(BIRD_WIDTH, BIRD_HEIGHT, |x, y| {
        let in_wing = (WING_LEFT..WING_RIGHT).contains(&x) && (wing_top..wing_bottom).contains(&y);
        if in_wing {
            return true;
        }
        if !(BODY_TOP..BODY_BOTTOM).contains(&y) {
            return false;
        }

        // Clip corners with a circle of radius CORNER
        let cx = if x < CORNER {
            CORNER - x
        } else if x >= BIRD_WIDTH - CORNER {
            x + 1 + CORNER - BIRD_WIDTH
        } else {
            0
        };
        let cy = if y < BODY_TOP + CORNER {
            BODY_TOP + CORNER - y
        } else if y >= BODY_BOTTOM - CORNER {
            y + 1 + CORNER - BODY_BOTTOM
        } else {
            0
        };
        cx * cx + cy * cy <= CORNER * CORNER
    })
}
