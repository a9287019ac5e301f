//! Render-facing data
//!
//! The pool never draws; it only packs its state into GPU-ready records.

pub mod instance;

pub use instance::{InstanceRaw, StarVertex, body_instances, star_vertices};
