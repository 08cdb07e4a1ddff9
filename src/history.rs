// Linear undo/redo over full surface snapshots.
// Entry 0 is the blank surface; the cursor always points at what is on screen.

use crate::types::FrameBuffer;

/// One saved copy of the surface, dimensions included.
pub type Snapshot = FrameBuffer;

pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Snapshot) -> Self {
        Self { entries: vec![initial], cursor: 0 }
    }

    /// Drop everything after the cursor, then append `snapshot` and point at it.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;
    }

    /// Step back; returns the entry now current, or None at the earliest one.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}
