use contrail::core::Point;
use contrail::{AnchorSpec, Canvas, NamedAnchor, Point2};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

const W: u32 = 640;
const H: u32 = 360;

fn canvas() -> Canvas {
    Canvas {
        width: W,
        height: H,
    }
}

fn rng(seed: u64) -> Pcg64Mcg {
    Pcg64Mcg::seed_from_u64(seed)
}

fn on_left(p: Point) -> bool {
    p.x == -50.0 && (0.0..f64::from(H)).contains(&p.y)
}

fn on_right(p: Point) -> bool {
    p.x == f64::from(W) + 50.0 && (0.0..f64::from(H)).contains(&p.y)
}

fn on_top(p: Point) -> bool {
    p.y == -50.0 && (0.0..f64::from(W)).contains(&p.x)
}

fn on_bottom(p: Point) -> bool {
    p.y == f64::from(H) + 50.0 && (0.0..f64::from(W)).contains(&p.x)
}

#[test]
fn edge_specs_resolve_just_outside_their_edge() {
    let mut rng = rng(1);
    for _ in 0..50 {
        assert!(on_left(
            AnchorSpec::Named(NamedAnchor::Left).resolve(canvas(), &mut rng)
        ));
        assert!(on_right(
            AnchorSpec::Named(NamedAnchor::Right).resolve(canvas(), &mut rng)
        ));
        assert!(on_top(
            AnchorSpec::Named(NamedAnchor::Top).resolve(canvas(), &mut rng)
        ));
        assert!(on_bottom(
            AnchorSpec::Named(NamedAnchor::Bottom).resolve(canvas(), &mut rng)
        ));
    }
}

#[test]
fn center_resolves_to_exact_midpoint() {
    let mut rng = rng(2);
    let p = AnchorSpec::Named(NamedAnchor::Center).resolve(canvas(), &mut rng);
    assert_eq!(p, Point::new(320.0, 180.0));
}

#[test]
fn random_resolves_to_one_of_the_four_edges() {
    let mut rng = rng(3);
    let (mut l, mut r, mut t, mut b) = (0, 0, 0, 0);
    for _ in 0..400 {
        let p = AnchorSpec::Named(NamedAnchor::Random).resolve(canvas(), &mut rng);
        if on_left(p) {
            l += 1;
        } else if on_right(p) {
            r += 1;
        } else if on_top(p) {
            t += 1;
        } else if on_bottom(p) {
            b += 1;
        } else {
            panic!("random anchor off all edges: {p:?}");
        }
    }
    assert!(l > 0 && r > 0 && t > 0 && b > 0);
}

#[test]
fn explicit_point_resolves_to_itself() {
    let mut rng = rng(4);
    let spec = AnchorSpec::Point(Point2 { x: 12.5, y: -3.0 });
    assert_eq!(spec.resolve(canvas(), &mut rng), Point::new(12.5, -3.0));
}

#[test]
fn opposite_is_an_involution_on_edges() {
    for edge in [
        NamedAnchor::Left,
        NamedAnchor::Right,
        NamedAnchor::Top,
        NamedAnchor::Bottom,
    ] {
        let spec = AnchorSpec::Named(edge);
        assert_eq!(spec.opposite().opposite(), spec);
    }
    assert_eq!(
        AnchorSpec::Named(NamedAnchor::Left).opposite(),
        AnchorSpec::Named(NamedAnchor::Right)
    );
    assert_eq!(
        AnchorSpec::Named(NamedAnchor::Top).opposite(),
        AnchorSpec::Named(NamedAnchor::Bottom)
    );
}

#[test]
fn center_and_points_oppose_to_random() {
    assert_eq!(
        AnchorSpec::Named(NamedAnchor::Center).opposite(),
        AnchorSpec::Named(NamedAnchor::Random)
    );
    assert_eq!(
        AnchorSpec::Point(Point2 { x: 1.0, y: 2.0 }).opposite(),
        AnchorSpec::Named(NamedAnchor::Random)
    );
}
