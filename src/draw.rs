// Window + software drawing utilities.
// Visual effects provided here:
// 1) A resizable window that shows the drawing surface.
// 2) Round-tipped strokes stamped into the surface.
// 3) A crosshair that follows your mouse.
// 4) A tiny 5x7 bitmap font to render the HUD on top of the drawing.

use crate::error::Error;
use crate::types::{FrameBuffer, Rgb, Size, Stamp};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

/// One-shot keyboard commands the window loop reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Undo,
    Redo,
    Clear,
    ToggleEraser,
    BrushBigger,
    BrushSmaller,
    PickColor(usize),
    Save,
    Photo,
    ToggleParent,
}

const KEY_ACTIONS: [(Key, Action); 18] = [
    (Key::Z, Action::Undo),
    (Key::Y, Action::Redo),
    (Key::C, Action::Clear),
    (Key::E, Action::ToggleEraser),
    (Key::RightBracket, Action::BrushBigger),
    (Key::LeftBracket, Action::BrushSmaller),
    (Key::S, Action::Save),
    (Key::P, Action::Photo),
    (Key::Tab, Action::ToggleParent),
    (Key::Key1, Action::PickColor(0)),
    (Key::Key2, Action::PickColor(1)),
    (Key::Key3, Action::PickColor(2)),
    (Key::Key4, Action::PickColor(3)),
    (Key::Key5, Action::PickColor(4)),
    (Key::Key6, Action::PickColor(5)),
    (Key::Key7, Action::PickColor(6)),
    (Key::Key8, Action::PickColor(7)),
    (Key::Key9, Action::PickColor(8)),
];

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a resizable window; the surface is stretched to whatever size it ends up.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let opts = WindowOptions { resize: true, scale_mode: ScaleMode::Stretch, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Size the window is displayed at right now, in screen pixels.
    pub fn display_size(&self) -> Size {
        let (w, h) = self.window.get_size();
        Size::new(w, h)
    }

    /// Mouse position in screen pixels (not yet mapped onto the surface).
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_unscaled_mouse_pos(MouseMode::Clamp)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Keys pressed since the last frame, as actions.
    pub fn poll_actions(&self) -> Vec<Action> {
        KEY_ACTIONS
            .iter()
            .filter(|(key, _)| self.window.is_key_pressed(*key, KeyRepeat::No))
            .map(|(_, action)| *action)
            .collect()
    }

    /// Digit keys pressed since the last frame, in order (used for PIN entry).
    pub fn digits_pressed(&self) -> String {
        self.window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(digit_of)
            .collect()
    }
}

fn digit_of(key: Key) -> Option<char> {
    let d = match key {
        Key::Key0 | Key::NumPad0 => 0,
        Key::Key1 | Key::NumPad1 => 1,
        Key::Key2 | Key::NumPad2 => 2,
        Key::Key3 | Key::NumPad3 => 3,
        Key::Key4 | Key::NumPad4 => 4,
        Key::Key5 | Key::NumPad5 => 5,
        Key::Key6 | Key::NumPad6 => 6,
        Key::Key7 | Key::NumPad7 => 7,
        Key::Key8 | Key::NumPad8 => 8,
        Key::Key9 | Key::NumPad9 => 9,
        _ => return None,
    };
    char::from_digit(d, 10)
}

/* ---------- Software drawing: pixels, stamps, lines, crosshair, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Walk every Bresenham step from (x0,y0) to (x1,y1), endpoints included.
/// Callers keep the endpoints near the surface; the walk is one visit per pixel.
fn for_each_line_point(x0: i64, y0: i64, x1: i64, y1: i64, mut visit: impl FnMut(i64, i64)) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        visit(x0, y0);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Cut the segment a-b down to the part inside [min, max] (Liang-Barsky).
/// None when the segment misses the box entirely.
fn clip_segment(
    a: (i64, i64),
    b: (i64, i64),
    min: (i64, i64),
    max: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    let (x0, y0) = (a.0 as f64, a.1 as f64);
    let (dx, dy) = (b.0 as f64 - x0, b.1 as f64 - y0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-dx, x0 - min.0 as f64),
        (dx, max.0 as f64 - x0),
        (-dy, y0 - min.1 as f64),
        (dy, max.1 as f64 - y0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 { return None; }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 { return None; }
            t0 = t0.max(t);
        } else {
            if t < t0 { return None; }
            t1 = t1.min(t);
        }
    }
    // rounding can land a hair outside the box; pull it back in
    let at = |t: f64| {
        let x = ((x0 + t * dx).round() as i64).clamp(min.0, max.0);
        let y = ((y0 + t * dy).round() as i64).clamp(min.1, max.1);
        (x, y)
    };
    Some((at(t0), at(t1)))
}

/// Draw a thin 1-pixel line between (x0,y0) and (x1,y1).
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    for_each_line_point(x0 as i64, y0 as i64, x1 as i64, y1 as i64, |x, y| {
        put_pixel(fb, x as i32, y as i32, color)
    });
}

/// Press the brush tip once at (cx,cy). Any center is accepted; off-surface pixels are skipped.
pub fn stamp_at(fb: &mut FrameBuffer, cx: i64, cy: i64, stamp: &Stamp, color: Rgb) {
    let (w, h) = (fb.width as i64, fb.height as i64);
    for &(dx, dy) in &stamp.offsets {
        let x = cx.saturating_add(dx as i64);
        let y = cy.saturating_add(dy as i64);
        if x < 0 || y < 0 || x >= w || y >= h {
            continue;
        }
        fb.pixels[y as usize * fb.width + x as usize] = color.0;
    }
}

/// Thick segment: the tip is pressed at every step, which gives round caps and joins.
/// Only the part that can touch the surface (bounds widened by the tip radius) is walked.
pub fn stamp_line(fb: &mut FrameBuffer, x0: i64, y0: i64, x1: i64, y1: i64, stamp: &Stamp, color: Rgb) {
    let r = stamp.radius as i64;
    let min = (-r, -r);
    let max = (fb.width as i64 - 1 + r, fb.height as i64 - 1 + r);
    let Some(((ax, ay), (bx, by))) = clip_segment((x0, y0), (x1, y1), min, max) else { return };
    for_each_line_point(ax, ay, bx, by, |x, y| stamp_at(fb, x, y, stamp, color));
}

/// Draw a small crosshair centered at (cx,cy).
/// Visual: a “+” shape (with a tiny gap at the center) follows your mouse.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/// Outline of the brush tip so the child can see how big the brush is.
pub fn draw_ring(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: u32) {
    // midpoint circle
    let (mut x, mut y, mut err) = (radius, 0, 1 - radius);
    while x >= y {
        for (px, py) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            put_pixel(fb, cx + px, cy + py, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (offset, ink) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx as i32 + offset, y + ry as i32 + offset, ink);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; unknown characters leave a blank cell.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}
