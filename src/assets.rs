use std::path::Path;
use std::sync::Arc;

use crate::error::{ContrailError, ContrailResult};

/// What a rocket draws each frame: a decoded raster sprite, or the built-in
/// vector shape when no usable image exists.
#[derive(Clone)]
pub enum SpriteVisual {
    Image(PreparedImage),
    Fallback,
}

impl SpriteVisual {
    /// Resolve the optional sprite image for a session.
    ///
    /// Load or decode failure is not an error here: the effect proceeds with
    /// the vector fallback.
    pub fn prepare(path: Option<&Path>) -> SpriteVisual {
        match path {
            None => SpriteVisual::Fallback,
            Some(p) => match PreparedImage::load(p) {
                Ok(img) => SpriteVisual::Image(img),
                Err(err) => {
                    tracing::warn!(error = %err, "sprite image unavailable, using vector fallback");
                    SpriteVisual::Fallback
                }
            },
        }
    }
}

/// A decoded sprite image, premultiplied and wrapped as a CPU paint.
#[derive(Clone)]
pub struct PreparedImage {
    pub(crate) paint: vello_cpu::Image,
    pub width: u32,
    pub height: u32,
}

impl PreparedImage {
    pub fn load(path: &Path) -> ContrailResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ContrailError::asset(format!("failed to read sprite '{}': {e}", path.display()))
        })?;
        Self::decode(&bytes)
    }

    pub fn decode(bytes: &[u8]) -> ContrailResult<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ContrailError::asset(format!("failed to decode sprite image: {e}")))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(ContrailError::asset("sprite image has zero extent"));
        }

        let mut raw = rgba.into_raw();
        premultiply_rgba8_in_place(&mut raw);
        let pixmap = pixmap_from_premul_bytes(&raw, width, height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        Ok(Self {
            paint,
            width,
            height,
        })
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ContrailResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ContrailError::asset("sprite width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ContrailError::asset("sprite height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ContrailError::asset("sprite byte len mismatch"));
    }

    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}
