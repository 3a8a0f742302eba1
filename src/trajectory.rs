use crate::core::{Point, Vec2};

/// Slope magnitude standing in for a vertical travel line, so heading
/// computation never divides by zero.
const VERTICAL_SLOPE: f64 = 1e6;

/// Constant-velocity motion along a fixed direction.
///
/// The path is an infinite ray: nothing stops movement at the original
/// destination. Arrival is detected by the owning rocket via off-screen
/// bounds checks, never here.
#[derive(Clone, Copy, Debug)]
pub struct Trajectory {
    pos: Point,
    dir: Vec2,
    speed: f64,
    slope: f64,
}

impl Default for Trajectory {
    fn default() -> Self {
        Self {
            pos: Point::ZERO,
            dir: Vec2::ZERO,
            speed: 2.5,
            slope: 0.0,
        }
    }
}

impl Trajectory {
    /// Start at `from`, heading toward `to` at `speed` pixels per tick.
    ///
    /// Coincident endpoints produce a NaN direction; accepted, since random
    /// anchor generation yields distinct points in practice. A non-positive
    /// `speed` keeps the previous speed.
    pub fn aim(&mut self, from: Point, to: Point, speed: f64) {
        self.pos = from;
        let d = to - from;
        self.slope = if d.x == 0.0 {
            if d.y > 0.0 { VERTICAL_SLOPE } else { -VERTICAL_SLOPE }
        } else {
            d.y / d.x
        };
        if speed > 0.0 {
            self.speed = speed;
        }
        self.dir = d / d.hypot();
    }

    /// Advance one tick along the ray.
    pub fn advance(&mut self) {
        self.pos += self.dir * self.speed;
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Rotation that points nose-up art along the travel line.
    ///
    /// Uses only the slope, not the signed direction, so opposite travel
    /// directions on the same line render identically.
    pub fn heading(&self) -> f64 {
        self.slope.atan() + std::f64::consts::FRAC_PI_2
    }
}
