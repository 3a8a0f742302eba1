use crate::error::{ContrailError, ContrailResult};
use rand::Rng;

pub use kurbo::{Affine, BezPath, Circle, Point, Rect, Vec2};

/// Logical extent of the render target in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Create a validated, non-degenerate canvas.
    pub fn new(width: u32, height: u32) -> ContrailResult<Self> {
        if width == 0 || height == 0 {
            return Err(ContrailError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn midpoint(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Whether `p` lies inside the canvas bounds expanded by `margin` on
    /// every side.
    ///
    /// Non-finite coordinates count as inside; a NaN position never trips
    /// the departing flag this feeds.
    pub fn contains_with_margin(self, p: Point, margin: f64) -> bool {
        !(p.x > f64::from(self.width) + margin
            || p.y > f64::from(self.height) + margin
            || p.x < -margin
            || p.y < -margin)
    }
}

/// Tick rate represented as a rational `num/den` frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ContrailResult<Self> {
        if num == 0 || den == 0 {
            return Err(ContrailError::validation("Fps num and den must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Number of ticks covering `millis` at this rate, rounded to nearest.
    pub fn ticks_for_millis(self, millis: u64) -> u64 {
        ((millis as f64 / 1000.0) * self.as_f64()).round() as u64
    }
}

/// Opaque sprite/smoke tint. Trail discs add their own per-frame opacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sample a light tint: each channel uniform in `[100, 255]`.
    pub fn pastel<R: Rng>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(100..=255),
            g: rng.gen_range(100..=255),
            b: rng.gen_range(100..=255),
        }
    }
}

/// Closed interval of travel speeds in pixels per tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

impl SpeedRange {
    /// Create a validated range with `0 <= min <= max`.
    pub fn new(min: f64, max: f64) -> ContrailResult<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(self) -> ContrailResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(ContrailError::validation("speed range must be finite"));
        }
        if self.min < 0.0 || self.min > self.max {
            return Err(ContrailError::validation(
                "speed range must satisfy 0 <= min <= max",
            ));
        }
        Ok(())
    }

    /// Draw a speed uniformly from the interval.
    pub fn sample<R: Rng>(self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..=self.max)
    }
}
