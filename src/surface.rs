use kurbo::Shape as _;

use crate::assets::SpriteVisual;
use crate::core::{Affine, BezPath, Canvas, Circle, Point, Rgb};
use crate::error::{ContrailError, ContrailResult};

/// One rasterized frame: premultiplied RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// The seam between simulation and rasterization.
///
/// Stage, formations, rockets and particles draw through this trait; the CPU
/// backend below is the production implementation and tests substitute
/// recording stand-ins.
pub trait Surface {
    fn canvas(&self) -> Canvas;

    /// Drop all queued drawing for a fresh frame.
    fn clear(&mut self);

    /// Fill a translucent disc (smoke).
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb, opacity: f64);

    /// Draw a rocket at `pos`, rotated by `angle_rad`, nose-up art assumed.
    fn draw_sprite(&mut self, visual: &SpriteVisual, pos: Point, angle_rad: f64);
}

/// CPU rasterizer over `vello_cpu`.
pub struct CpuSurface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    fallback_hull: vello_cpu::kurbo::BezPath,
    fallback_porthole: vello_cpu::kurbo::BezPath,
}

impl CpuSurface {
    pub fn new(canvas: Canvas) -> ContrailResult<Self> {
        let (w, h) = surface_dims(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            fallback_hull: to_cpu_path(&fallback_hull()),
            fallback_porthole: to_cpu_path(&fallback_porthole()),
        })
    }

    /// Rebuild the context and pixmap for a new canvas extent.
    pub fn resize(&mut self, canvas: Canvas) -> ContrailResult<()> {
        let (w, h) = surface_dims(canvas)?;
        self.canvas = canvas;
        self.ctx = vello_cpu::RenderContext::new(w, h);
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        Ok(())
    }

    /// Flush queued draws into the pixmap and copy the frame out.
    pub fn frame(&mut self) -> FrameRgba {
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        FrameRgba {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self) {
        self.ctx.reset();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb, opacity: f64) {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, alpha,
            ));
        let disc = to_cpu_path(&Circle::new(center, radius).to_path(0.1));
        self.ctx.fill_path(&disc);
    }

    fn draw_sprite(&mut self, visual: &SpriteVisual, pos: Point, angle_rad: f64) {
        let place = Affine::translate(pos.to_vec2()) * Affine::rotate(angle_rad);
        match visual {
            SpriteVisual::Image(img) => {
                let (w, h) = (f64::from(img.width), f64::from(img.height));
                // image paint covers [0,0 .. w,h] in local space; center it
                let tr = place * Affine::translate((-w / 2.0, -h / 2.0));
                self.ctx.set_transform(to_cpu_affine(tr));
                self.ctx.set_paint(img.paint.clone());
                self.ctx
                    .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            }
            SpriteVisual::Fallback => {
                self.ctx.set_transform(to_cpu_affine(place));
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(0xcc, 0x33, 0x33, 0xff));
                self.ctx.fill_path(&self.fallback_hull);
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(0x88, 0x88, 0xdd, 0xff));
                self.ctx.fill_path(&self.fallback_porthole);
            }
        }
    }
}

/// Nose-up hull of the vector fallback rocket.
fn fallback_hull() -> BezPath {
    let mut p = BezPath::new();
    p.move_to((0.0, -18.0));
    p.line_to((10.0, 12.0));
    p.line_to((0.0, 6.0));
    p.line_to((-10.0, 12.0));
    p.close_path();
    p
}

fn fallback_porthole() -> BezPath {
    Circle::new((0.0, -6.0), 3.0).to_path(0.1)
}

fn surface_dims(canvas: Canvas) -> ContrailResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ContrailError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ContrailError::render("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn to_cpu_affine(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn to_cpu_path(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
