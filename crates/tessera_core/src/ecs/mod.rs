//! # Entity Component System
//!
//! Entities, component types and component instances layered on top of the
//! byte arena.
//!
//! ## Design Philosophy
//!
//! - Every component type owns one region of the arena, sized for the
//!   maximum entity count and placed by type id
//! - Component instances are dense per type; the instance id is the row
//! - Entities and components hold offsets, never bytes

pub mod builtin;
mod component;
mod entity;
mod entity_registry;
mod layout;
mod storage;
mod type_registry;

pub use builtin::{
    register_builtin_types, SceneGraphView, TransformView, SCENE_GRAPH_TID, TRANSFORM_TID,
};
pub use component::{Component, ComponentField, ComponentSid, ComponentTid};
pub use entity::{Entity, EntityId};
pub use entity_registry::EntityRegistry;
pub use layout::{ComponentLayout, FieldLayout, FieldSpec, LayoutContext};
pub use storage::ComponentRegistry;
pub use type_registry::{ComponentTypeDescriptor, ComponentTypeRegistry};
