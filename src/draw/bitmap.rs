use crate::draw::model::Color;
use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use std::path::Path;

/// Row-major RGBA8 pixel grid with straight alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Allocates a `width`×`height` grid filled with `fill`.
    ///
    /// Allocation is fallible so an exhausted allocator surfaces as an error rather than
    /// aborting the process.
    pub fn new(width: u32, height: u32, fill: Color) -> Result<Self> {
        let len = byte_len(width, height)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|err| anyhow!("allocate {width}x{height} canvas buffer: {err}"))?;
        pixels.resize(len, 0);
        let mut bitmap = Self {
            width,
            height,
            pixels,
        };
        bitmap.fill(fill);
        Ok(bitmap)
    }

    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    /// Decodes any image file `image` understands into a bitmap.
    pub fn load(path: &Path) -> Result<Self> {
        let decoded =
            image::open(path).with_context(|| format!("decode image {}", path.display()))?;
        Ok(Self::from_rgba_image(decoded.into_rgba8()))
    }

    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let (width, height, len) = (self.width, self.height, self.pixels.len());
        RgbaImage::from_raw(width, height, self.pixels).ok_or_else(|| {
            anyhow!("{width}x{height} bitmap holds {len} bytes, which does not fit an RGBA image")
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = self.index(x, y);
        Color::rgba(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixel(x as u32, y as u32))
    }

    /// Composites `color` source-over onto the pixel at (`x`, `y`); out-of-bounds is ignored.
    pub fn blend(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        let bottom = Color::from_rgba_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]);
        let out = blend_pixel(bottom, color);
        self.pixels[idx..idx + 4].copy_from_slice(&out.to_rgba_array());
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize * self.width as usize) + x as usize) * 4
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| anyhow!("bitmap dimensions {width}x{height} overflow"))
}

pub fn blend_pixel(bottom: Color, top: Color) -> Color {
    if top.a == 255 {
        return top;
    }
    if top.a == 0 {
        return bottom;
    }

    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Color::TRANSPARENT;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Color {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}
