// Brush settings owned by whoever drives the canvas (the window loop, a test).
// The canvas only reads them while rendering a stroke.

use crate::types::{Rgb, Stamp};

pub const BRUSH_MIN_WIDTH: u32 = 1;
pub const BRUSH_MAX_WIDTH: u32 = 64;
pub const DEFAULT_BRUSH_WIDTH: u32 = 8;

/// Bright colors a child can flip through with the number keys.
pub const PALETTE: [Rgb; 9] = [
    Rgb::new(0x22, 0x22, 0x22), // charcoal
    Rgb::new(0xE5, 0x39, 0x35), // red
    Rgb::new(0xFB, 0x8C, 0x00), // orange
    Rgb::new(0xFD, 0xD8, 0x35), // yellow
    Rgb::new(0x43, 0xA0, 0x47), // green
    Rgb::new(0x1E, 0x88, 0xE5), // blue
    Rgb::new(0x8E, 0x24, 0xAA), // purple
    Rgb::new(0xEC, 0x40, 0x7A), // pink
    Rgb::new(0x6D, 0x4C, 0x41), // brown
];

#[derive(Clone, Debug, PartialEq)]
pub struct BrushSettings {
    pub color: Rgb,
    width: u32,
    pub eraser: bool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self { color: PALETTE[0], width: DEFAULT_BRUSH_WIDTH, eraser: false }
    }
}

impl BrushSettings {
    pub fn new(color: Rgb, width: u32) -> Self {
        Self { color, width: clamp_width(width), eraser: false }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = clamp_width(width);
    }

    /// Grow or shrink by `delta`, staying inside the allowed range.
    pub fn nudge_width(&mut self, delta: i32) {
        let w = self.width as i64 + delta as i64;
        self.width = clamp_width(w.max(0) as u32);
    }

    pub fn toggle_eraser(&mut self) {
        self.eraser = !self.eraser;
    }

    /// Color actually laid down: the eraser paints background, it never makes holes.
    pub fn ink(&self, background: Rgb) -> Rgb {
        if self.eraser { background } else { self.color }
    }

    /// Round tip matching the current width.
    pub fn stamp(&self) -> Stamp {
        make_disc_stamp((self.width / 2) as i32)
    }
}

fn clamp_width(width: u32) -> u32 {
    width.clamp(BRUSH_MIN_WIDTH, BRUSH_MAX_WIDTH)
}

/// Offsets of every pixel inside a disc of `radius` (radius 0 is a single pixel).
pub fn make_disc_stamp(radius: i32) -> Stamp {
    let r = radius.max(0);
    let r2 = r * r;
    let mut offsets = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    for y in -r..=r {
        for x in -r..=r {
            if x * x + y * y <= r2 {
                offsets.push((x, y));
            }
        }
    }
    Stamp { radius: r, offsets }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_clamped() {
        let mut b = BrushSettings::new(Rgb::BLACK, 0);
        assert_eq!(b.width(), BRUSH_MIN_WIDTH);
        b.set_width(1000);
        assert_eq!(b.width(), BRUSH_MAX_WIDTH);
        b.nudge_width(-200);
        assert_eq!(b.width(), BRUSH_MIN_WIDTH);
        b.nudge_width(3);
        assert_eq!(b.width(), 4);
    }

    #[test]
    fn eraser_inks_with_background() {
        let mut b = BrushSettings::new(Rgb::new(255, 0, 0), 4);
        assert_eq!(b.ink(Rgb::WHITE), Rgb::new(255, 0, 0));
        b.toggle_eraser();
        assert_eq!(b.ink(Rgb::WHITE), Rgb::WHITE);
    }

    #[test]
    fn disc_stamp_shape() {
        assert_eq!(make_disc_stamp(0).offsets, vec![(0, 0)]);
        let s = make_disc_stamp(4);
        assert!(s.offsets.contains(&(4, 0)));
        assert!(s.offsets.contains(&(0, -4)));
        assert!(!s.offsets.contains(&(4, 4)));
    }
}
