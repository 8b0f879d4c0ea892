//! Collision detection
//!
//! Birds collide with pipes by pixel silhouette, and with the world when they
//! touch the ground line or leave the top of the screen.

use glam::IVec2;

use super::bird::Bird;
use super::mask::{Silhouette, SpriteMasks};
use super::pipe::Pipe;
use crate::consts::*;

/// Check whether a bird overlaps either half of a pipe pair
pub fn bird_pipe_collision(bird: &Bird, pipe: &Pipe, masks: &SpriteMasks) -> bool {
    let bird_mask = masks.bird(bird.frame);
    let pipe_mask = masks.pipe();
    let (bx, by) = bird.pixel_pos();
    let px = pipe.x.round() as i32;

    let top_offset = IVec2::new(px - bx, pipe.top().round() as i32 - by);
    let bottom_offset = IVec2::new(px - bx, pipe.bottom().round() as i32 - by);

    bird_mask.overlaps(pipe_mask, top_offset) || bird_mask.overlaps(pipe_mask, bottom_offset)
}

/// Check whether a bird has hit the ground or flown above the screen
#[inline]
pub fn bird_out_of_bounds(bird: &Bird) -> bool {
    bird.pos.y + BIRD_HEIGHT as f32 >= GROUND_Y || bird.pos.y < 0.0
}
