// Core types shared by the canvas, the camera and the window.

use crate::error::Error;

/// Largest surface we agree to allocate (64 Mpx, 256 MiB per copy).
pub const MAX_SURFACE_PIXELS: usize = 64 * 1024 * 1024;

/// A packed 0x00RRGGBB color, the same layout minifb expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0x00_FF_FF_FF);
    pub const BLACK: Rgb = Rgb(0x00_00_00_00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parse `RRGGBB` (an optional leading `#` is allowed).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(s, 16).ok().map(Rgb)
    }

    pub fn channels(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        ]
    }
}

/// A position in either screen space or surface space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // backing width in pixels
    pub height: usize,     // backing height in pixels
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A solid buffer of `fill`.
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Self { width, height, pixels: vec![fill.0; width * height] }
    }

    /// Like [`FrameBuffer::new`], but a size that overflows, is over
    /// [`MAX_SURFACE_PIXELS`] or cannot be allocated is an error instead of a crash.
    pub fn try_new(width: usize, height: usize, fill: Rgb) -> Result<Self, Error> {
        let unavailable = |why: &str| Error::ContextUnavailable(format!("{width}x{height} surface: {why}"));
        let len = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_SURFACE_PIXELS)
            .ok_or_else(|| unavailable("too large"))?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|e| unavailable(&e.to_string()))?;
        pixels.resize(len, fill.0);
        Ok(Self { width, height, pixels })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color.0);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Rgb(self.pixels[y * self.width + x]))
    }

    /// Copy the region both buffers share from `src` into `self`, row by row.
    /// Pixels outside the overlap keep whatever `self` already had.
    pub fn blit_overlap(&mut self, src: &FrameBuffer) {
        let w = self.width.min(src.width);
        let h = self.height.min(src.height);
        for y in 0..h {
            let dst_row = y * self.width;
            let src_row = y * src.width;
            self.pixels[dst_row..dst_row + w].copy_from_slice(&src.pixels[src_row..src_row + w]);
        }
    }
}

/// Precomputed round brush tip: the (dx, dy) offsets covered by a disc.
/// Stamped once per point when a stroke is rendered.
#[derive(Clone, Debug)]
pub struct Stamp {
    pub radius: i32,
    pub offsets: Vec<(i32, i32)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_hash_prefix() {
        assert_eq!(Rgb::from_hex("#FF0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_hex("00ff00"), Some(Rgb::new(0, 255, 0)));
        assert_eq!(Rgb::from_hex("fff"), None);
        assert_eq!(Rgb::from_hex("+FFFFF"), None);
        assert_eq!(Rgb::from_hex("#-FFFFF"), None);
        assert_eq!(Rgb::from_hex("zzzzzz"), None);
    }

    #[test]
    fn try_new_rejects_sizes_it_cannot_hold() {
        assert!(matches!(FrameBuffer::try_new(usize::MAX / 2, 4, Rgb::WHITE), Err(Error::ContextUnavailable(_))));
        assert!(matches!(FrameBuffer::try_new(100_000, 100_000, Rgb::WHITE), Err(Error::ContextUnavailable(_))));
        assert_eq!(FrameBuffer::try_new(3, 2, Rgb::BLACK).unwrap(), FrameBuffer::new(3, 2, Rgb::BLACK));
    }

    #[test]
    fn blit_overlap_copies_shared_region_only() {
        let mut src = FrameBuffer::new(4, 4, Rgb::BLACK);
        src.pixels[3 * 4 + 3] = 0x123456;
        src.pixels[1 * 4 + 1] = 0xABCDEF;

        let mut dst = FrameBuffer::new(2, 6, Rgb::WHITE);
        dst.blit_overlap(&src);

        assert_eq!(dst.get(1, 1), Some(Rgb(0xABCDEF)));
        assert_eq!(dst.get(0, 3), Some(Rgb::BLACK));
        assert_eq!(dst.get(0, 5), Some(Rgb::WHITE));
    }
}
