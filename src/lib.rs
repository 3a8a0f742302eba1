#![forbid(unsafe_code)]

//! Decorative rocket-formation flyby with fading smoke trails.
//!
//! A [`Flyby`] session owns a [`Stage`] and a CPU render surface. The host
//! calls [`Flyby::frame`] once per display frame and receives the rasterized
//! RGBA8 pixels (premultiplied alpha); when every rocket of the current
//! [`Formation`] has left the canvas and its trail has faded, the stage
//! schedules a fresh randomized formation after a configurable delay.

pub mod assets;
pub mod core;
pub mod error;
pub mod flyby;
pub mod formation;
pub mod particle;
pub mod sprite;
pub mod stage;
pub mod surface;
pub mod trajectory;

pub use assets::{PreparedImage, SpriteVisual};
pub use self::core::{Canvas, Fps, Rgb, SpeedRange};
pub use error::{ContrailError, ContrailResult};
pub use flyby::{Flyby, FlybyOptions};
pub use formation::{AnchorSpec, Formation, NamedAnchor, Point2};
pub use particle::SmokeParticle;
pub use sprite::Rocket;
pub use stage::{FrameStatus, Stage};
pub use surface::{CpuSurface, FrameRgba, Surface};
pub use trajectory::Trajectory;
