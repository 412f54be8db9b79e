//! # Engine Capacity Constants
//!
//! Defaults used when no configuration file overrides them.
//!
//! **CRITICAL:** these values size the arena once at startup. Nothing in the
//! storage core grows past them.

// =============================================================================
// CAPACITY
// =============================================================================

/// Maximum number of entities, and rows per component-type accessor.
pub const DEFAULT_MAX_ENTITY_COUNT: usize = 5_000;

/// Size of the GPU-uploadable arena region (32 MiB).
pub const DEFAULT_GPU_BUFFER_BYTES: usize = 32 * 1024 * 1024;

/// Size of the CPU-only arena region (8 MiB).
pub const DEFAULT_CPU_BUFFER_BYTES: usize = 8 * 1024 * 1024;

// =============================================================================
// LAYOUT
// =============================================================================

/// Alignment, in bytes, of every buffer view length, stride and offset.
pub const BUFFER_VIEW_ALIGNMENT: usize = 4;

/// First entity id handed out. `0` is reserved for "no entity".
pub const FIRST_ENTITY_ID: u32 = 1;
