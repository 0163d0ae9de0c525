//! vgrid client library
//!
//! This crate wires the gallery layout engine to a call session: roster and
//! viewport events go in, rendering-surface calls come out.

pub mod media;
pub mod scenario;
pub mod state;
