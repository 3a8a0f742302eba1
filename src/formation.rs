use rand::Rng;

use crate::assets::SpriteVisual;
use crate::core::{Canvas, Point, Rgb, SpeedRange, Vec2};
use crate::flyby::FlybyOptions;
use crate::sprite::Rocket;
use crate::surface::Surface;

/// Distance outside the canvas at which edge anchors are placed.
const EDGE_MARGIN: f64 = 50.0;
/// Vertical stagger applied to every other formation slot.
const SLOT_STAGGER: f64 = 10.0;

/// Serde-friendly coordinate pair used in anchor configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl From<Point2> for Point {
    fn from(p: Point2) -> Self {
        Point::new(p.x, p.y)
    }
}

/// Where a formation starts or ends.
///
/// JSON accepts either an explicit `{"x": .., "y": ..}` point or one of the
/// named anchors `"left" | "right" | "top" | "bottom" | "center" | "random"`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AnchorSpec {
    Point(Point2),
    Named(NamedAnchor),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedAnchor {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    Random,
}

impl Default for AnchorSpec {
    fn default() -> Self {
        Self::Named(NamedAnchor::Random)
    }
}

impl AnchorSpec {
    /// Pick the concrete point this spec stands for.
    ///
    /// Edge anchors sit `EDGE_MARGIN` outside their edge at a uniform
    /// position along it; `center` is the exact midpoint; `random` chooses
    /// one of the four edges uniformly.
    pub fn resolve<R: Rng>(self, canvas: Canvas, rng: &mut R) -> Point {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let named = match self {
            AnchorSpec::Point(p) => return p.into(),
            AnchorSpec::Named(NamedAnchor::Random) => match rng.gen_range(0u8..4) {
                0 => NamedAnchor::Left,
                1 => NamedAnchor::Right,
                2 => NamedAnchor::Top,
                _ => NamedAnchor::Bottom,
            },
            AnchorSpec::Named(n) => n,
        };
        match named {
            NamedAnchor::Left => Point::new(-EDGE_MARGIN, h * rng.gen_range(0.0..1.0)),
            NamedAnchor::Right => Point::new(w + EDGE_MARGIN, h * rng.gen_range(0.0..1.0)),
            NamedAnchor::Top => Point::new(w * rng.gen_range(0.0..1.0), -EDGE_MARGIN),
            NamedAnchor::Bottom => Point::new(w * rng.gen_range(0.0..1.0), h + EDGE_MARGIN),
            NamedAnchor::Center | NamedAnchor::Random => canvas.midpoint(),
        }
    }

    /// The default destination for a formation that starts here.
    ///
    /// Involution on the four edges; `center` and explicit points map to
    /// `random`.
    pub fn opposite(self) -> AnchorSpec {
        let named = match self {
            AnchorSpec::Point(_) => NamedAnchor::Random,
            AnchorSpec::Named(NamedAnchor::Left) => NamedAnchor::Right,
            AnchorSpec::Named(NamedAnchor::Right) => NamedAnchor::Left,
            AnchorSpec::Named(NamedAnchor::Top) => NamedAnchor::Bottom,
            AnchorSpec::Named(NamedAnchor::Bottom) => NamedAnchor::Top,
            AnchorSpec::Named(NamedAnchor::Center) | AnchorSpec::Named(NamedAnchor::Random) => {
                NamedAnchor::Random
            }
        };
        AnchorSpec::Named(named)
    }
}

/// A group of rockets commanded to travel as one from a shared anchor.
pub struct Formation {
    anchor: Point,
    rockets: Vec<Rocket>,
    done: bool,
}

impl Formation {
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            rockets: Vec::new(),
            done: false,
        }
    }

    /// Register one rocket at `anchor + offset`, remembering the offset so
    /// the slot stays arranged as the group turns.
    pub fn add_rocket(&mut self, offset: Vec2, color: Rgb, visual: SpriteVisual) {
        let pos = self.anchor + offset;
        self.rockets.push(Rocket::new(visual, pos, color, offset));
    }

    /// Command every member toward its own offset-preserving destination at
    /// an independently sampled speed. The speed variance is intentional: it
    /// produces a loosely cohesive rather than rigid formation.
    pub fn travel_to<R: Rng>(&mut self, delta: Vec2, speeds: SpeedRange, rng: &mut R) {
        for rocket in &mut self.rockets {
            let speed = speeds.sample(rng);
            let offset = rocket.offset();
            rocket.travel_to(offset + delta, speed);
        }
    }

    /// Tick members in insertion order, pruning retired ones; the formation
    /// marks itself done once empty.
    pub fn tick<R: Rng>(&mut self, surface: &mut dyn Surface, rng: &mut R) {
        self.rockets.retain_mut(|rocket| {
            if rocket.is_done() {
                false
            } else {
                rocket.tick(surface, rng);
                true
            }
        });
        if self.rockets.is_empty() {
            self.done = true;
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Factory: resolve anchors, build the staggered line, and issue the
    /// initial group travel command.
    pub fn spawn<R: Rng>(
        opts: &FlybyOptions,
        visual: &SpriteVisual,
        canvas: Canvas,
        rng: &mut R,
    ) -> Formation {
        let start_spec = opts.start;
        let end_spec = opts.end.unwrap_or_else(|| start_spec.opposite());
        let start = start_spec.resolve(canvas, rng);
        let end = end_spec.resolve(canvas, rng);

        let mut formation = Formation::new(start);
        let total_width = f64::from(opts.count.saturating_sub(1)) * opts.spacing;
        let leftmost = -total_width / 2.0;
        for i in 0..opts.count {
            let fx = leftmost + f64::from(i) * opts.spacing;
            let fy = if i % 2 == 0 { 0.0 } else { SLOT_STAGGER };
            formation.add_rocket(Vec2::new(fx, fy), Rgb::pastel(rng), visual.clone());
        }

        formation.travel_to(end - start, opts.speed_range, rng);
        formation
    }
}
