//! The drawing surface: freehand strokes, linear undo/redo, clear, resize and export.
//!
//! Input arrives in screen pixels; [`Canvas::to_surface`] maps it onto the backing
//! buffer, which may be larger or smaller than the window shows it. A stroke is
//! rendered as it is drawn and a snapshot of the whole surface is recorded when
//! it ends, so undo is just "repaint from the previous snapshot".

use crate::brush::BrushSettings;
use crate::draw::{stamp_at, stamp_line};
use crate::error::Error;
use crate::export::encode_png;
use crate::history::{History, Snapshot};
use crate::types::{FrameBuffer, Point, Rgb, Size, Stamp};

pub struct Canvas {
    surface: FrameBuffer,
    background: Rgb,
    history: History,
    // last surface-space point of the stroke in progress
    last: Option<(i64, i64)>,
    tip: Stamp,
}

impl Canvas {
    /// A blank surface of `backing` pixels. History starts as `[blank]`.
    pub fn new(backing: Size, background: Rgb) -> Result<Self, Error> {
        if backing.is_empty() {
            return Err(Error::ContextUnavailable(format!(
                "cannot allocate a {}x{} surface",
                backing.width, backing.height
            )));
        }
        let surface = FrameBuffer::try_new(backing.width, backing.height, background)?;
        let history = History::new(surface.clone());
        Ok(Self {
            surface,
            background,
            history,
            last: None,
            tip: BrushSettings::default().stamp(),
        })
    }

    /// Map a screen-space point onto the backing buffer (scale by backing / display per axis).
    pub fn to_surface(&self, screen: Point, display: Size) -> Point {
        let sx = if display.width == 0 { 1.0 } else { self.surface.width as f32 / display.width as f32 };
        let sy = if display.height == 0 { 1.0 } else { self.surface.height as f32 / display.height as f32 };
        Point::new(screen.x * sx, screen.y * sy)
    }

    pub fn begin_stroke(&mut self, point: Point, brush: &BrushSettings) {
        self.apply_brush(brush);
        let (x, y) = pixel_of(point);
        stamp_at(&mut self.surface, x, y, &self.tip, brush.ink(self.background));
        self.last = Some((x, y));
    }

    /// No-op unless a stroke is in progress.
    pub fn extend_stroke(&mut self, point: Point, brush: &BrushSettings) {
        let Some((x0, y0)) = self.last else { return };
        self.apply_brush(brush);
        let (x1, y1) = pixel_of(point);
        stamp_line(&mut self.surface, x0, y0, x1, y1, &self.tip, brush.ink(self.background));
        self.last = Some((x1, y1));
    }

    /// Finish the stroke and record it. No-op unless a stroke is in progress.
    pub fn end_stroke(&mut self) {
        if self.last.take().is_some() {
            self.history.commit(self.surface.clone());
        }
    }

    /// Returns true if the surface changed.
    pub fn undo(&mut self) -> bool {
        self.abandon_stroke();
        let restored = self.history.undo().cloned();
        match restored {
            Some(snapshot) => {
                self.repaint(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.abandon_stroke();
        let restored = self.history.redo().cloned();
        match restored {
            Some(snapshot) => {
                self.repaint(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Wipe to the background. Recorded like a stroke, so it can be undone.
    pub fn clear(&mut self) {
        self.last = None;
        self.surface.fill(self.background);
        self.history.commit(self.surface.clone());
    }

    /// PNG bytes of what is on the surface now. The canvas is untouched either way.
    pub fn export_image(&self) -> Result<Vec<u8>, Error> {
        encode_png(&self.surface)
    }

    /// Reallocate the backing buffer, keeping whatever fits in the overlap.
    pub fn resize(&mut self, new_backing: Size, brush: &BrushSettings) -> Result<(), Error> {
        if new_backing.is_empty() {
            return Err(Error::ContextUnavailable(format!(
                "cannot resize surface to {}x{}",
                new_backing.width, new_backing.height
            )));
        }
        if new_backing != self.surface.size() {
            let mut next = FrameBuffer::try_new(new_backing.width, new_backing.height, self.background)?;
            next.blit_overlap(&self.surface);
            self.surface = next;
        }
        // a fresh buffer carries no style; the tip has to be rebuilt from the brush
        self.apply_brush(brush);
        Ok(())
    }

    pub fn surface(&self) -> &FrameBuffer {
        &self.surface
    }

    pub fn size(&self) -> Size {
        self.surface.size()
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        self.surface.get(x, y)
    }

    pub fn is_drawing(&self) -> bool {
        self.last.is_some()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn cursor(&self) -> usize {
        self.history.cursor()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn apply_brush(&mut self, brush: &BrushSettings) {
        let radius = (brush.width() / 2) as i32;
        if self.tip.radius != radius {
            self.tip = brush.stamp();
        }
    }

    // Drop a half-finished stroke so undo/redo never bakes it in.
    fn abandon_stroke(&mut self) {
        if self.last.take().is_some() {
            let current = self.history.current().clone();
            self.repaint(&current);
        }
    }

    // Snapshots keep their own size; after a resize only the overlap comes back.
    fn repaint(&mut self, snapshot: &Snapshot) {
        if snapshot.size() == self.surface.size() {
            self.surface.pixels.copy_from_slice(&snapshot.pixels);
        } else {
            self.surface.fill(self.background);
            self.surface.blit_overlap(snapshot);
        }
    }
}

// Float-to-int casts saturate, so even absurd input stays a valid i64.
fn pixel_of(p: Point) -> (i64, i64) {
    (p.x.floor() as i64, p.y.floor() as i64)
}
