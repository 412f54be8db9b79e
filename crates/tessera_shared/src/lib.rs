//! # Tessera Shared
//!
//! Value types and constants used by the storage core and by the systems
//! built on top of it (renderers, scene graphs, importers).
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on the storage core. Everything here is a
//! plain owned value.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    BUFFER_VIEW_ALIGNMENT, DEFAULT_CPU_BUFFER_BYTES, DEFAULT_GPU_BUFFER_BYTES,
    DEFAULT_MAX_ENTITY_COUNT, FIRST_ENTITY_ID,
};
pub use math::{Mat3, Mat4, Vec2, Vec3, Vec4};
