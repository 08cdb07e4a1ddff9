// Who is using the app right now: a child drawing, or a parent reviewing.
// Passed around explicitly; read with `&Session`, change with `&mut Session`.

use crate::error::{Error, Result};
use crate::store::OwnerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Child,
    Parent,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    mode: Mode,
    selected_child: Option<OwnerId>,
}

impl Session {
    /// Child mode with `child` already selected (how the desktop app starts).
    pub fn for_child(child: OwnerId) -> Self {
        Self { mode: Mode::Child, selected_child: Some(child) }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_parent(&self) -> bool {
        self.mode == Mode::Parent
    }

    pub fn enter_parent_mode(&mut self, pin: &str, expected: &str) -> Result<()> {
        if pin != expected {
            return Err(Error::PermissionDenied("wrong parent PIN".into()));
        }
        self.mode = Mode::Parent;
        Ok(())
    }

    pub fn exit_parent_mode(&mut self) {
        self.mode = Mode::Child;
    }

    /// Only a parent may switch which child's portfolio is active.
    pub fn select_child(&mut self, child: OwnerId) -> Result<()> {
        if !self.is_parent() {
            return Err(Error::PermissionDenied("only a parent can switch children".into()));
        }
        self.selected_child = Some(child);
        Ok(())
    }

    pub fn selected_child(&self) -> Option<&OwnerId> {
        self.selected_child.as_ref()
    }

    /// Owner stamped on anything created now.
    pub fn owner_for_new_work(&self) -> Result<OwnerId> {
        self.selected_child.clone().ok_or(Error::NoChildSelected)
    }
}
