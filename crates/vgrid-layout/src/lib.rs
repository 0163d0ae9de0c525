//! Gallery layout engine for vgrid
//!
//! This crate decides how participant video tiles are placed on screen:
//! - Grid solving (rows, columns, tile rectangles and quality tiers)
//! - Pagination of rosters larger than one screen
//! - Reconciliation of the rendered set into start/stop/reposition commands

pub mod config;
pub mod error;
pub mod notify;
pub mod order;
pub mod pagination;
pub mod reconcile;
pub mod solver;

pub use config::{LayoutConfig, Origin};
pub use error::{LayoutError, Result};
pub use notify::SnapshotNotifier;
pub use order::visible_order;
pub use pagination::Pagination;
pub use reconcile::RenderEngine;
pub use solver::{GridLayout, GridSolver};
