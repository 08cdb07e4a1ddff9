//! Kids' sketchpad: a software drawing surface with undo/redo, camera stills,
//! and a small storage gateway for saving finished works.

pub mod brush;
pub mod camera;
pub mod canvas;
pub mod draw;
pub mod error;
pub mod export;
pub mod history;
pub mod session;
pub mod store;
pub mod types;

pub use brush::BrushSettings;
pub use canvas::Canvas;
pub use error::{Error, Result};
pub use store::{ContentRecord, ContentStore, ContentType, FsContentStore, NewContent, OwnerId};
pub use types::{FrameBuffer, Point, Rgb, Size};
