//! Shared types for the vgrid gallery
//!
//! Participants, viewports and tile rectangles flow from the roster into the
//! layout engine; render commands flow from the engine to the rendering surface.

pub mod messages;
pub mod types;

pub use messages::*;
pub use types::*;
