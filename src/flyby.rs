use std::path::PathBuf;

use crate::assets::SpriteVisual;
use crate::core::{Canvas, Fps, SpeedRange};
use crate::error::{ContrailError, ContrailResult};
use crate::formation::AnchorSpec;
use crate::stage::{FrameStatus, Stage};
use crate::surface::{CpuSurface, FrameRgba, Surface as _};

/// Configuration for one flyby overlay. Everything except the canvas has a
/// default matching the classic effect.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FlybyOptions {
    pub canvas: Canvas,

    /// Where formations enter.
    #[serde(default)]
    pub start: AnchorSpec,

    /// Where formations head; defaults to the geometric opposite of `start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<AnchorSpec>,

    /// Rockets per formation.
    #[serde(default = "default_count")]
    pub count: u32,

    /// Horizontal slot spacing in pixels.
    #[serde(default = "default_spacing")]
    pub spacing: f64,

    /// Per-rocket speeds are drawn independently from this interval.
    #[serde(default = "default_speed_range")]
    pub speed_range: SpeedRange,

    /// Pause between a formation fully exiting and the next one entering.
    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,

    /// Tick rate used to convert the restart delay into frames.
    #[serde(default = "default_fps")]
    pub fps: Fps,

    /// Determinism seed; all randomness flows from it.
    #[serde(default)]
    pub seed: u64,

    /// Optional sprite image; the vector rocket is used when absent or
    /// unloadable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
}

fn default_count() -> u32 {
    5
}

fn default_spacing() -> f64 {
    40.0
}

fn default_speed_range() -> SpeedRange {
    SpeedRange { min: 3.0, max: 6.0 }
}

fn default_restart_delay_ms() -> u64 {
    1000
}

fn default_fps() -> Fps {
    Fps { num: 60, den: 1 }
}

impl FlybyOptions {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            start: AnchorSpec::default(),
            end: None,
            count: default_count(),
            spacing: default_spacing(),
            speed_range: default_speed_range(),
            restart_delay_ms: default_restart_delay_ms(),
            fps: default_fps(),
            seed: 0,
            image: None,
        }
    }

    pub fn validate(&self) -> ContrailResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ContrailError::validation("canvas width/height must be > 0"));
        }
        if self.count == 0 {
            return Err(ContrailError::validation("count must be >= 1"));
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(ContrailError::validation(
                "spacing must be finite and >= 0",
            ));
        }
        self.speed_range.validate()?;
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(ContrailError::validation("fps must have num>0 and den>0"));
        }
        Ok(())
    }
}

/// An owned, independently tear-downable flyby session: stage plus CPU
/// surface. Hosts may run several sessions side by side.
pub struct Flyby {
    stage: Stage,
    surface: CpuSurface,
}

impl Flyby {
    /// Validate options, prepare the sprite art (falling back to vector art
    /// if the image does not load), and put the first formation on stage.
    #[tracing::instrument(skip(opts))]
    pub fn start(opts: FlybyOptions) -> ContrailResult<Flyby> {
        opts.validate()?;
        let visual = SpriteVisual::prepare(opts.image.as_deref());
        let surface = CpuSurface::new(opts.canvas)?;
        let mut stage = Stage::new(opts, visual);
        stage.setup(surface.canvas());
        Ok(Self { stage, surface })
    }

    /// Advance the animation one tick and rasterize the frame.
    pub fn frame(&mut self) -> ContrailResult<(FrameStatus, FrameRgba)> {
        let status = self.stage.frame(&mut self.surface);
        let frame = self.surface.frame();
        Ok((status, frame))
    }

    /// Keep the surface sized to the host viewport.
    pub fn resize(&mut self, width: u32, height: u32) -> ContrailResult<()> {
        let canvas = Canvas::new(width, height)?;
        self.surface.resize(canvas)
    }

    pub fn pause(&mut self) {
        self.stage.pause();
    }

    pub fn resume(&mut self) {
        self.stage.resume();
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Deterministic teardown: halts the stage before the surface drops.
    pub fn stop(mut self) {
        self.stage.destroy();
    }
}
