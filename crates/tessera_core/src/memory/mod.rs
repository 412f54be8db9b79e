//! # Memory Management
//!
//! The byte arena and its partitioning into buffers, buffer views and
//! accessors.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once at startup. After that:
//! - Every allocation is a bump of a cursor
//! - Nothing is freed or resized
//! - Every view and handle is an offset into the arena, never an owner

mod accessor;
mod arena;
mod buffer;
mod buffer_view;
mod element;

pub use accessor::{Accessor, AccessorLayout, DetachedRow, RowHandle};
pub use arena::{BufferUsage, ByteArena, MemoryUsage};
pub use buffer::Buffer;
pub use buffer_view::{BufferView, LayoutMode};
pub use element::{element_size_in_bytes, Composition, Element, ElementKind, Endianness};
