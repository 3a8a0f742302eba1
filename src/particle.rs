use rand::Rng;

use crate::core::{Point, Rgb};
use crate::surface::Surface;

/// Opacity a smoke disc is born with.
pub const SMOKE_START_OPACITY: f64 = 0.5;
/// Opacity lost per render call.
pub const SMOKE_FADE_PER_FRAME: f64 = 0.006;
/// Radius gained per render call.
pub const SMOKE_GROWTH_PER_FRAME: f64 = 0.06;

/// One fading, growing trail disc behind a rocket.
#[derive(Clone, Copy, Debug)]
pub struct SmokeParticle {
    pos: Point,
    radius: f64,
    opacity: f64,
    color: Rgb,
    done: bool,
}

impl SmokeParticle {
    /// Born at `pos` with a radius in `[2, 4)`, inheriting the rocket tint.
    pub fn new<R: Rng>(pos: Point, color: Rgb, rng: &mut R) -> Self {
        Self {
            pos,
            radius: 2.0 + rng.gen_range(0.0..1.0) * 2.0,
            opacity: SMOKE_START_OPACITY,
            color,
            done: false,
        }
    }

    /// Draw the disc, then age it: radius grows, opacity decays, and the
    /// particle flags itself done once fully transparent.
    ///
    /// Must be called exactly once per frame per live particle for correct
    /// fade timing.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        surface.fill_circle(self.pos, self.radius, self.color, self.opacity);
        self.radius += SMOKE_GROWTH_PER_FRAME;
        self.opacity -= SMOKE_FADE_PER_FRAME;
        if self.opacity <= 0.0 {
            self.done = true;
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}
