//! # Storage Error Types
//!
//! Everything here is a structural failure: an alignment, capacity or layout
//! violation raised at the call that carves or binds memory. Lookup misses
//! are not errors; they come back as `None`.

use thiserror::Error;

use crate::ecs::ComponentTid;
use crate::memory::{BufferUsage, ElementKind, LayoutMode};

/// Errors raised while carving, binding or registering arena memory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A buffer view length, stride or offset is not 4-byte aligned.
    #[error("buffer view {what} of {value} bytes is not a multiple of {alignment}")]
    Alignment {
        /// Which quantity was misaligned ("length", "stride" or "offset").
        what: &'static str,
        /// The offending value.
        value: usize,
        /// Required alignment in bytes.
        alignment: usize,
    },

    /// A buffer has no room left for the requested view.
    #[error("{usage:?} buffer exhausted: {requested} bytes at offset {offset}, capacity {capacity}")]
    ArenaExhausted {
        /// Buffer that ran out.
        usage: BufferUsage,
        /// Where the view would have started.
        offset: usize,
        /// Bytes requested.
        requested: usize,
        /// Total buffer capacity.
        capacity: usize,
    },

    /// An explicitly placed view overlaps one taken earlier.
    #[error("{usage:?} buffer view at offset {offset} (+{length}) overlaps an existing view")]
    ViewOverlap {
        /// Buffer the view was placed in.
        usage: BufferUsage,
        /// Requested offset.
        offset: usize,
        /// Requested length.
        length: usize,
    },

    /// A buffer view has no room left for the requested accessor.
    #[error("buffer view exhausted: requested {requested} bytes, {remaining} remaining")]
    ViewExhausted {
        /// Bytes the accessor needs.
        requested: usize,
        /// Bytes left in the view (or in the record, for interleaved views).
        remaining: usize,
    },

    /// An accessor's rows would run past the end of its view.
    #[error(
        "accessor out of range: offset {byte_offset} + stride {byte_stride} x ({count} - 1) \
         + element {element_size} exceeds view length {view_length}"
    )]
    Range {
        /// Accessor offset inside the view.
        byte_offset: usize,
        /// Accessor stride.
        byte_stride: usize,
        /// Number of rows.
        count: usize,
        /// Bytes per element.
        element_size: usize,
        /// Length of the owning view.
        view_length: usize,
    },

    /// Every row of an accessor has already been handed out.
    #[error("accessor rows exhausted: all {count} rows taken")]
    RowExhausted {
        /// Row capacity of the accessor.
        count: usize,
    },

    /// The accessor path does not match the view's layout mode.
    #[error("buffer view is {found:?}, operation requires {expected:?}")]
    LayoutMismatch {
        /// Mode the operation requires.
        expected: LayoutMode,
        /// Mode the view was created with.
        found: LayoutMode,
    },

    /// An interleaved accessor was requested with a stride other than the record stride.
    #[error("interleaved stride mismatch: view stride {expected}, requested {found}")]
    StrideMismatch {
        /// Record stride of the view.
        expected: usize,
        /// Stride passed by the caller.
        found: usize,
    },

    /// A typed view was requested with the wrong element kind.
    #[error("element kind mismatch: accessor holds {found:?}, requested {expected:?}")]
    KindMismatch {
        /// Kind the caller asked for.
        expected: ElementKind,
        /// Kind the accessor stores.
        found: ElementKind,
    },

    /// A typed slice cannot be formed over this region.
    #[error("region at byte offset {byte_offset} cannot be viewed as {kind:?}")]
    Misaligned {
        /// Start of the region inside its buffer.
        byte_offset: usize,
        /// Element kind requested.
        kind: ElementKind,
    },

    /// A component type id was used as a layout key without being registered.
    #[error("component type {0:?} is not registered")]
    UnregisteredType(ComponentTid),

    /// A component type id was registered twice.
    #[error("component type {0:?} is already registered")]
    DuplicateType(ComponentTid),

    /// A type was registered below a type whose region is already carved.
    #[error("component type {tid:?} registered after type {laid_out:?} was laid out")]
    LayoutFrozen {
        /// Type being registered.
        tid: ComponentTid,
        /// Higher type whose region already exists.
        laid_out: ComponentTid,
    },

    /// A type's region does not fit in the address space.
    #[error(
        "component type {tid:?} region overflows: {per_instance_byte_size} bytes x {max_entity_count} rows"
    )]
    RegionOverflow {
        /// Type being registered or laid out.
        tid: ComponentTid,
        /// Registered size of one instance.
        per_instance_byte_size: usize,
        /// Rows reserved per type.
        max_entity_count: usize,
    },

    /// No more entities fit in the configured capacity.
    #[error("entity capacity exceeded: maximum {capacity}")]
    EntityCapacityExceeded {
        /// Configured maximum entity count.
        capacity: usize,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
