//! # Tessera Core
//!
//! Arena-backed component storage for an entity component system:
//! - One byte arena, allocated once, split into a GPU and a CPU buffer
//! - Every component type owns a fixed region, placed by type id
//! - Component fields are typed views over rows of that region
//!
//! ## Architecture Rules
//!
//! 1. **The arena owns every byte** - views, accessors and rows are offsets
//! 2. **Nothing is freed** - allocation is a bump, capacity is fixed at startup
//! 3. **Layout is deterministic** - a type's offset depends only on the
//!    registered types with lower ids
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera_core::{EngineConfig, EngineContext, TRANSFORM_TID};
//!
//! let mut ctx = EngineContext::new(EngineConfig::default())?;
//! ctx.register_builtin_components()?;
//! let entity = ctx.create_entity(&[TRANSFORM_TID])?.id();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod context;
pub mod ecs;
pub mod error;
pub mod memory;

pub use config::EngineConfig;
pub use context::EngineContext;
pub use ecs::{
    register_builtin_types, Component, ComponentField, ComponentLayout, ComponentRegistry,
    ComponentSid, ComponentTid, ComponentTypeDescriptor, ComponentTypeRegistry, Entity, EntityId,
    EntityRegistry, FieldLayout, FieldSpec, LayoutContext, SceneGraphView, TransformView,
    SCENE_GRAPH_TID, TRANSFORM_TID,
};
pub use error::{StorageError, StorageResult};
pub use memory::{
    element_size_in_bytes, Accessor, AccessorLayout, Buffer, BufferUsage, BufferView, ByteArena,
    Composition, DetachedRow, Element, ElementKind, Endianness, LayoutMode, MemoryUsage,
    RowHandle,
};
pub use tessera_shared::{Mat3, Mat4, Vec2, Vec3, Vec4};
