use rand::Rng;

use crate::assets::SpriteVisual;
use crate::core::{Point, Rgb, Vec2};
use crate::particle::SmokeParticle;
use crate::surface::Surface;
use crate::trajectory::Trajectory;

/// How far outside the canvas a rocket may drift before it counts as departing.
const OFFSCREEN_MARGIN: f64 = 80.0;
/// Cap on live trail particles per rocket.
const MAX_SMOKE_PARTICLES: usize = 100;

/// One rocket: a trajectory, a rotated formation slot, and a smoke trail.
pub struct Rocket {
    visual: SpriteVisual,
    pos: Point,
    offset: Vec2, // formation-relative slot, fixed at creation
    color: Rgb,
    smoke: Vec<SmokeParticle>,
    trajectory: Trajectory,
    departing: bool,
    done: bool,
}

impl Rocket {
    pub(crate) fn new(visual: SpriteVisual, pos: Point, color: Rgb, offset: Vec2) -> Self {
        Self {
            visual,
            pos,
            offset,
            color,
            smoke: Vec::new(),
            trajectory: Trajectory::default(),
            departing: false,
            done: false,
        }
    }

    /// Aim at a destination `delta` away from the current position.
    pub fn travel_to(&mut self, delta: Vec2, speed: f64) {
        self.trajectory.aim(self.pos, self.pos + delta, speed);
    }

    /// One frame: advance, re-seat the formation slot under the current
    /// heading, smoke, draw, and retire once off-screen with no trail left.
    pub fn tick<R: Rng>(&mut self, surface: &mut dyn Surface, rng: &mut R) {
        self.trajectory.advance();
        let angle = self.trajectory.heading();
        let (sin, cos) = angle.sin_cos();

        // Rotate the slot offset with the heading, relative to the lead path.
        let adj = Vec2::new(
            self.offset.x * cos - self.offset.y * sin - self.offset.x,
            self.offset.x * sin + self.offset.y * cos - self.offset.y,
        );
        self.pos = self.trajectory.position() + adj;

        if self.smoke.len() < MAX_SMOKE_PARTICLES && !self.departing {
            let lateral = 6.0 + 2.0 * rng.gen_range(0.0..1.0);
            let tail = 28.0 + 6.0 * rng.gen_range(0.0..1.0);
            let behind = Vec2::new(
                lateral * cos - tail * sin,
                lateral * sin + tail * cos,
            );
            self.smoke
                .push(SmokeParticle::new(self.pos + behind, self.color, rng));
        }

        surface.draw_sprite(&self.visual, self.pos, angle);
        self.smoke.retain_mut(|p| {
            if p.is_done() {
                false
            } else {
                p.render(surface);
                true
            }
        });

        // Recomputed every tick, not sticky: a rocket that re-enters the
        // expanded bounds resumes smoking.
        self.departing = !surface
            .canvas()
            .contains_with_margin(self.pos, OFFSCREEN_MARGIN);

        if self.departing && self.smoke.is_empty() {
            self.done = true;
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_departing(&self) -> bool {
        self.departing
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    /// The fixed formation-relative slot.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn smoke_count(&self) -> usize {
        self.smoke.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Canvas;
    use crate::surface::testkit::RecordingSurface;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Canvas {
            width: 200,
            height: 100,
        })
    }

    fn rocket_at(x: f64, y: f64) -> Rocket {
        Rocket::new(
            SpriteVisual::Fallback,
            Point::new(x, y),
            Rgb::new(180, 180, 220),
            Vec2::ZERO,
        )
    }

    #[test]
    fn tick_moves_draws_and_smokes() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let mut r = rocket_at(10.0, 50.0);
        r.travel_to(Vec2::new(100.0, 0.0), 5.0);

        let mut s = surface();
        r.tick(&mut s, &mut rng);

        assert!((r.position().x - 15.0).abs() < 1e-9);
        assert_eq!(s.sprites.len(), 1);
        // the new particle renders on the same frame it spawns
        assert_eq!(r.smoke_count(), 1);
        assert_eq!(s.circles.len(), 1);
    }

    #[test]
    fn smoke_capped_at_one_hundred() {
        let mut rng = Pcg64Mcg::seed_from_u64(12);
        let mut r = rocket_at(100.0, 50.0);
        // crawl: the rocket effectively stays on-screen the whole time
        r.travel_to(Vec2::new(1.0, 0.0), 0.001);

        let mut s = surface();
        for _ in 0..150 {
            r.tick(&mut s, &mut rng);
        }
        assert!(r.smoke_count() <= 100);
        assert!(r.smoke_count() > 50);
    }

    #[test]
    fn departing_flag_recomputes_each_tick() {
        let mut rng = Pcg64Mcg::seed_from_u64(13);
        let mut r = rocket_at(-95.0, 50.0);
        r.travel_to(Vec2::new(1000.0, 0.0), 10.0);

        let mut s = surface();
        r.tick(&mut s, &mut rng); // at -85, still left of the -80 margin
        assert!(r.is_departing());
        r.tick(&mut s, &mut rng); // at -75, crossed back inside
        assert!(!r.is_departing());
    }

    #[test]
    fn retires_only_after_trail_finishes() {
        let mut rng = Pcg64Mcg::seed_from_u64(14);
        let mut r = rocket_at(150.0, 50.0);
        r.travel_to(Vec2::new(400.0, 0.0), 20.0);

        let mut s = surface();
        let mut departed_with_smoke = false;
        for _ in 0..300 {
            if r.is_done() {
                break;
            }
            r.tick(&mut s, &mut rng);
            if r.is_departing() && r.smoke_count() > 0 {
                departed_with_smoke = true;
            }
        }
        assert!(departed_with_smoke, "rocket should exit before its trail fades");
        assert!(r.is_done());
        assert_eq!(r.smoke_count(), 0);
    }

    #[test]
    fn offset_slot_rotates_with_heading() {
        let mut rng = Pcg64Mcg::seed_from_u64(15);
        let mut r = Rocket::new(
            SpriteVisual::Fallback,
            Point::new(100.0, 50.0),
            Rgb::new(200, 200, 200),
            Vec2::new(40.0, 0.0),
        );
        // horizontal travel: slope 0, heading pi/2, slot rotates onto -y..x axis
        r.travel_to(Vec2::new(100.0, 0.0), 2.0);
        let mut s = surface();
        r.tick(&mut s, &mut rng);

        let lead = r.trajectory.position();
        let expected = lead + Vec2::new(-40.0, 40.0);
        assert!((r.position() - expected).hypot() < 1e-9);
    }
}
