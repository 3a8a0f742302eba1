use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::assets::SpriteVisual;
use crate::core::Canvas;
use crate::flyby::FlybyOptions;
use crate::formation::Formation;
use crate::surface::Surface;

/// What a single [`Stage::frame`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Live objects were ticked and drawn.
    Rendered,
    /// The stage is empty; a fresh formation arrives when the countdown
    /// reaches zero.
    Restarting { ticks_left: u64 },
    /// Paused stages render nothing and hold their state.
    Paused,
    /// The stage was destroyed; no further frames will render.
    Halted,
}

/// Owns the live formations and drives one tick of simulation/render per
/// frame. The stage is the only scheduler: the host calls [`Stage::frame`]
/// once per display frame.
pub struct Stage {
    opts: FlybyOptions,
    visual: SpriteVisual,
    objects: Vec<Formation>,
    restart_delay_ticks: u64,
    restart_in: Option<u64>,
    paused: bool,
    destroyed: bool,
    rng: Pcg64Mcg,
}

impl Stage {
    pub fn new(opts: FlybyOptions, visual: SpriteVisual) -> Self {
        let restart_delay_ticks = opts.fps.ticks_for_millis(opts.restart_delay_ms);
        let rng = Pcg64Mcg::seed_from_u64(opts.seed);
        Self {
            opts,
            visual,
            objects: Vec::new(),
            restart_delay_ticks,
            restart_in: None,
            paused: false,
            destroyed: false,
            rng,
        }
    }

    /// Put a fresh formation on stage immediately.
    pub fn setup(&mut self, canvas: Canvas) {
        let formation = Formation::spawn(&self.opts, &self.visual, canvas, &mut self.rng);
        self.objects.push(formation);
    }

    /// Run one frame: clear, tick live objects in insertion order, prune the
    /// finished, and handle the restart countdown once the stage empties.
    ///
    /// Pausing holds the scene but not the countdown: it is a timer, and a
    /// fresh formation still arrives on schedule, drawn on the first resumed
    /// frame.
    #[tracing::instrument(level = "trace", skip(self, surface))]
    pub fn frame(&mut self, surface: &mut dyn Surface) -> FrameStatus {
        if self.destroyed {
            return FrameStatus::Halted;
        }

        if !self.paused {
            surface.clear();
            self.tick_objects(surface);
        }

        if self.objects.is_empty() {
            let left = self.restart_in.get_or_insert(self.restart_delay_ticks);
            if *left > 0 {
                *left -= 1;
                return if self.paused {
                    FrameStatus::Paused
                } else {
                    FrameStatus::Restarting { ticks_left: *left }
                };
            }
            self.restart_in = None;
            self.setup(surface.canvas());
            tracing::debug!("restarted with a fresh formation");
            if self.paused {
                return FrameStatus::Paused;
            }
            self.tick_objects(surface);
            return FrameStatus::Rendered;
        }

        if self.paused {
            FrameStatus::Paused
        } else {
            FrameStatus::Rendered
        }
    }

    fn tick_objects(&mut self, surface: &mut dyn Surface) {
        let rng = &mut self.rng;
        self.objects.retain_mut(|obj| {
            if obj.is_done() {
                false
            } else {
                obj.tick(surface, rng);
                true
            }
        });
    }

    /// Terminal: clears the object list synchronously. A frame already in
    /// flight observes the flag at its top and renders nothing.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.objects.clear();
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn objects(&self) -> &[Formation] {
        &self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fps, SpeedRange};
    use crate::formation::{AnchorSpec, NamedAnchor};
    use crate::surface::testkit::RecordingSurface;

    fn small_opts() -> FlybyOptions {
        let mut opts = FlybyOptions::new(Canvas {
            width: 120,
            height: 80,
        });
        opts.count = 2;
        opts.start = AnchorSpec::Named(NamedAnchor::Left);
        opts.speed_range = SpeedRange { min: 6.0, max: 6.0 };
        opts.fps = Fps { num: 60, den: 1 };
        opts.restart_delay_ms = 50; // 3 ticks
        opts.seed = 99;
        opts
    }

    fn surface(opts: &FlybyOptions) -> RecordingSurface {
        RecordingSurface::new(opts.canvas)
    }

    #[test]
    fn empty_stage_counts_down_then_restarts_once() {
        let opts = small_opts();
        let mut s = surface(&opts);
        let mut stage = Stage::new(opts, SpriteVisual::Fallback);

        // never set up: first frames observe an empty stage
        assert_eq!(
            stage.frame(&mut s),
            FrameStatus::Restarting { ticks_left: 2 }
        );
        assert_eq!(
            stage.frame(&mut s),
            FrameStatus::Restarting { ticks_left: 1 }
        );
        assert_eq!(
            stage.frame(&mut s),
            FrameStatus::Restarting { ticks_left: 0 }
        );
        assert_eq!(stage.frame(&mut s), FrameStatus::Rendered);
        assert_eq!(stage.objects().len(), 1);
        // the restart frame already draws the new formation
        assert_eq!(s.sprites.len(), 2);
    }

    #[test]
    fn paused_stage_renders_nothing_and_holds_state() {
        let opts = small_opts();
        let mut s = surface(&opts);
        let mut stage = Stage::new(opts, SpriteVisual::Fallback);
        stage.setup(s.canvas);

        stage.pause();
        assert_eq!(stage.frame(&mut s), FrameStatus::Paused);
        assert_eq!(s.clears, 0);

        stage.resume();
        assert_eq!(stage.frame(&mut s), FrameStatus::Rendered);
        assert_eq!(s.clears, 1);
    }

    #[test]
    fn restart_countdown_keeps_running_while_paused() {
        let opts = small_opts();
        let mut s = surface(&opts);
        let mut stage = Stage::new(opts, SpriteVisual::Fallback);
        stage.pause();

        // three countdown ticks elapse silently, then the spawn fires
        for _ in 0..3 {
            assert_eq!(stage.frame(&mut s), FrameStatus::Paused);
            assert!(stage.objects().is_empty());
        }
        assert_eq!(stage.frame(&mut s), FrameStatus::Paused);
        assert_eq!(stage.objects().len(), 1);
        // nothing drawn until the host resumes
        assert_eq!(s.clears, 0);
        assert!(s.sprites.is_empty());

        stage.resume();
        assert_eq!(stage.frame(&mut s), FrameStatus::Rendered);
        assert_eq!(s.sprites.len(), 2);
    }

    #[test]
    fn destroy_is_terminal_and_clears_objects() {
        let opts = small_opts();
        let mut s = surface(&opts);
        let mut stage = Stage::new(opts, SpriteVisual::Fallback);
        stage.setup(s.canvas);
        assert_eq!(stage.objects().len(), 1);

        stage.destroy();
        assert!(stage.objects().is_empty());
        assert_eq!(stage.frame(&mut s), FrameStatus::Halted);
        assert_eq!(stage.frame(&mut s), FrameStatus::Halted);
        assert_eq!(s.clears, 0);
    }
}
