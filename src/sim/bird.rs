//! Bird kinematics
//!
//! Vertical motion is closed-form in the number of ticks since the last jump:
//! `d = vel * t + 0.5 * g * t^2`, clamped to the terminal displacement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Wing frame shown (and used as collision silhouette)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WingFrame {
    #[default]
    Up,
    Mid,
    Down,
}

impl WingFrame {
    pub fn index(self) -> usize {
        match self {
            WingFrame::Up => 0,
            WingFrame::Mid => 1,
            WingFrame::Down => 2,
        }
    }
}

/// A bird entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    /// Assigned in spawn order, starting at zero
    pub id: u32,
    pub pos: Vec2,
    /// Velocity set by the last jump
    pub vel: f32,
    /// Tilt in degrees (positive = nose up)
    pub tilt: f32,
    /// Ticks since the last jump
    pub tick_count: u32,
    /// Height at the last jump
    pub height: f32,
    /// Animation counter
    pub anim_count: u32,
    pub frame: WingFrame,
}

impl Bird {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
            vel: 0.0,
            tilt: 0.0,
            tick_count: 0,
            height: y,
            anim_count: 0,
            frame: WingFrame::Up,
        }
    }

    /// Flap: strong upward velocity, restart the trajectory from here
    pub fn jump(&mut self) {
        self.vel = JUMP_VELOCITY;
        self.tick_count = 0;
        self.height = self.pos.y;
    }

    /// Advance one tick. Returns the vertical displacement applied.
    pub fn advance(&mut self) -> f32 {
        self.tick_count += 1;
        let t = self.tick_count as f32;

        let mut d = self.vel * t + 0.5 * GRAVITY * t * t;
        if d < 0.0 {
            d -= UPWARD_CORRECTION;
        }
        let d = d.clamp(-TERMINAL_DISPLACEMENT, TERMINAL_DISPLACEMENT);

        self.pos.y += d;

        if d < 0.0 || self.pos.y < self.height + TILT_HOLD_DROP {
            self.tilt = MAX_TILT;
        } else {
            self.tilt = (self.tilt - TILT_STEP).max(MIN_TILT);
        }

        d
    }

    /// Step the wing animation (call once per tick)
    pub fn animate(&mut self) {
        self.anim_count += 1;

        self.frame = if self.anim_count < ANIMATION_TIME {
            WingFrame::Up
        } else if self.anim_count < ANIMATION_TIME * 2 {
            WingFrame::Mid
        } else if self.anim_count < ANIMATION_TIME * 3 {
            WingFrame::Down
        } else if self.anim_count < ANIMATION_TIME * 4 {
            WingFrame::Mid
        } else {
            self.anim_count = 0;
            WingFrame::Up
        };

        // Diving: wings held level
        if self.tilt <= -80.0 {
            self.frame = WingFrame::Mid;
            self.anim_count = ANIMATION_TIME * 2;
        }
    }

    /// Rounded integer position (pixel grid used by silhouettes)
    pub fn pixel_pos(&self) -> (i32, i32) {
        (self.pos.x.round() as i32, self.pos.y.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_jump_resets_trajectory() {
        let mut bird = Bird::new(0, BIRD_X, 300.0);
        bird.advance();
        bird.advance();
        bird.jump();
        assert_eq!(bird.vel, JUMP_VELOCITY);
        assert_eq!(bird.tick_count, 0);
        assert_eq!(bird.height, bird.pos.y);

        // -10.5 + 1.5 = -9, then the upward correction
        let d = bird.advance();
        assert!((d - (-11.0)).abs() < 1e-5);
    }

    #[test]
    fn test_second_jump_tick_is_clamped() {
        let mut bird = Bird::new(0, BIRD_X, 300.0);
        bird.jump();
        bird.advance();
        // -21 + 6 = -15, -17 after the correction, capped at -16
        let d = bird.advance();
        assert_eq!(d, -TERMINAL_DISPLACEMENT);
        assert!((bird.pos.y - (300.0 - 11.0 - 16.0)).abs() < 1e-4);
        // Third tick: -31.5 + 13.5 = -18, -20, capped again
        assert_eq!(bird.advance(), -TERMINAL_DISPLACEMENT);
        // Fourth tick: -42 + 24 = -18, -20, capped
        assert_eq!(bird.advance(), -TERMINAL_DISPLACEMENT);
    }

    #[test]
    fn test_free_fall_hits_ground_on_tick_23() {
        let mut bird = Bird::new(0, BIRD_X, BIRD_START_Y);
        let mut ticks = 0;
        while bird.pos.y + (BIRD_HEIGHT as f32) < GROUND_Y {
            bird.advance();
            ticks += 1;
            assert!(ticks < 100);
        }
        // 1.5 + 6 + 13.5, then 16 per tick
        assert_eq!(ticks, 23);
        assert!((bird.pos.y - 691.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_jump_is_parabolic() {
        let start = 400.0;
        let mut bird = Bird::new(0, BIRD_X, start);
        bird.jump();

        let mut peak = start;
        let mut ticks = 0;
        let mut rose = false;
        loop {
            bird.advance();
            ticks += 1;
            if bird.pos.y < peak {
                peak = bird.pos.y;
                rose = true;
            }
            if rose && bird.pos.y > start {
                break;
            }
            assert!(ticks < 30, "never fell back past the start height");
        }
        assert!(peak < start - 50.0);
        assert!(ticks <= 15);
    }

    #[test]
    fn test_tilt_snaps_up_then_decays_to_floor() {
        let mut bird = Bird::new(0, BIRD_X, 100.0);
        bird.jump();
        bird.advance();
        assert_eq!(bird.tilt, MAX_TILT);

        for _ in 0..40 {
            bird.advance();
        }
        assert_eq!(bird.tilt, MIN_TILT);
    }

    #[test]
    fn test_dive_pins_mid_frame() {
        let mut bird = Bird::new(0, BIRD_X, 100.0);
        bird.tilt = MIN_TILT;
        bird.animate();
        assert_eq!(bird.frame, WingFrame::Mid);
        assert_eq!(bird.anim_count, ANIMATION_TIME * 2);
    }

    #[test]
    fn test_wing_cycle() {
        let mut bird = Bird::new(0, BIRD_X, 100.0);
        let mut frames = Vec::new();
        for _ in 0..21 {
            bird.animate();
            frames.push(bird.frame);
        }
        assert_eq!(frames[0], WingFrame::Up);
        assert_eq!(frames[5], WingFrame::Mid);
        assert_eq!(frames[10], WingFrame::Down);
        assert_eq!(frames[15], WingFrame::Mid);
        assert_eq!(frames[19], WingFrame::Up);
        assert_eq!(bird.anim_count, 1);
    }

    proptest! {
        #[test]
        fn prop_displacement_and_tilt_bounded(
            start in 0.0f32..700.0,
            flaps in proptest::collection::vec(any::<bool>(), 1..200),
        ) {
            let mut bird = Bird::new(0, BIRD_X, start);
            for flap in flaps {
                if flap {
                    bird.jump();
                }
                let d = bird.advance();
                prop_assert!(d.abs() <= TERMINAL_DISPLACEMENT);
                prop_assert!(bird.tilt >= MIN_TILT && bird.tilt <= MAX_TILT);
            }
        }
    }
}
