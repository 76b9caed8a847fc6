use std::io::Cursor;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Source-over alpha blend of `top` onto `bottom`.
pub fn blend_pixel(bottom: Rgba, top: Rgba) -> Rgba {
    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Rgba::TRANSPARENT;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Rgba {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}

/// A fixed-size RGBA8 raster buffer. Both the committed drawing surface and
/// the transient preview overlay are `Surface`s; decoded stamp images and
/// detached export selections reuse the same type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[0] = fill.r;
            chunk[1] = fill.g;
            chunk[2] = fill.b;
            chunk[3] = fill.a;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode a PNG or JPEG payload into a surface.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .context("decode image payload")?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Self::from_pixels(width, height, decoded.into_raw()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = ((y * self.width + x) * 4) as usize;
        Rgba {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }

    /// Overwrite one pixel. Writes outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.pixels[idx] = color.r;
        self.pixels[idx + 1] = color.g;
        self.pixels[idx + 2] = color.b;
        self.pixels[idx + 3] = color.a;
    }

    /// Source-over blend one pixel. Writes outside the buffer are ignored.
    pub fn blend_pixel_at(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        let bottom = Rgba {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        };
        let blended = blend_pixel(bottom, color);
        self.pixels[idx] = blended.r;
        self.pixels[idx + 1] = blended.g;
        self.pixels[idx + 2] = blended.b;
        self.pixels[idx + 3] = blended.a;
    }

    /// Wipe every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            pixels: Arc::from(&self.pixels[..]),
        }
    }

    /// Replace the pixel contents with a snapshot of the same dimensions.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        assert_eq!(self.width, snapshot.width);
        assert_eq!(self.height, snapshot.height);
        self.pixels.copy_from_slice(&snapshot.pixels);
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        encode_rgba_png(self.width, self.height, &self.pixels)
    }
}

/// An immutable full-pixel capture of a `Surface`. Cloning is cheap; the
/// pixel payload is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        encode_rgba_png(self.width, self.height, &self.pixels)
    }
}

fn encode_rgba_png(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>> {
    let img = RgbaImage::from_raw(width, height, pixels.to_vec())
        .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height}"))?;
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageOutputFormat::Png)
        .context("encode surface as png")?;
    Ok(out.into_inner())
}
