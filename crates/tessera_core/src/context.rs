//! # Engine Context
//!
//! Owns the arena and every registry. One context is one independent
//! storage world; nothing here is global.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut ctx = EngineContext::new(EngineConfig::default())?;
//! ctx.register_builtin_components()?;
//!
//! let id = ctx.create_entity(&[TRANSFORM_TID])?.id();
//! let transform = ctx.transform(id).unwrap();
//! transform.set_translate(ctx.arena_mut(), Vec3::new(1.0, 2.0, 3.0));
//! ```

use crate::config::EngineConfig;
use crate::ecs::{
    register_builtin_types, Component, ComponentLayout, ComponentRegistry, ComponentSid,
    ComponentTid, ComponentTypeRegistry, Entity, EntityId, EntityRegistry, FieldLayout,
    SceneGraphView, TransformView, SCENE_GRAPH_TID, TRANSFORM_TID,
};
use crate::error::StorageResult;
use crate::memory::{Accessor, BufferView, ByteArena, MemoryUsage};

/// The storage world: arena plus type, component and entity registries.
#[derive(Debug)]
pub struct EngineContext {
    config: EngineConfig,
    arena: ByteArena,
    types: ComponentTypeRegistry,
    components: ComponentRegistry,
    entities: EntityRegistry,
}

impl EngineContext {
    /// Builds a context, allocating the whole arena up front.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn new(config: EngineConfig) -> StorageResult<Self> {
        config.validate()?;
        let arena = ByteArena::new(config.gpu_buffer_bytes, config.cpu_buffer_bytes)?;

        tracing::info!(
            max_entity_count = config.max_entity_count,
            gpu_buffer_bytes = config.gpu_buffer_bytes,
            cpu_buffer_bytes = config.cpu_buffer_bytes,
            "engine context ready"
        );

        Ok(Self {
            types: ComponentTypeRegistry::new(config.max_entity_count),
            components: ComponentRegistry::new(),
            entities: EntityRegistry::new(config.max_entity_count),
            arena,
            config,
        })
    }

    /// Configuration the context was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The arena, for reads through accessors and row handles.
    #[inline]
    #[must_use]
    pub const fn arena(&self) -> &ByteArena {
        &self.arena
    }

    /// The arena, for writes through accessors and row handles.
    #[inline]
    pub fn arena_mut(&mut self) -> &mut ByteArena {
        &mut self.arena
    }

    /// Current arena usage.
    #[must_use]
    pub fn memory_usage(&self) -> MemoryUsage {
        self.arena.memory_usage()
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// The type registry.
    #[inline]
    #[must_use]
    pub const fn types(&self) -> &ComponentTypeRegistry {
        &self.types
    }

    /// Registers a component type with a custom layout.
    ///
    /// # Errors
    ///
    /// See [`ComponentTypeRegistry::register_type`].
    pub fn register_type(
        &mut self,
        tid: ComponentTid,
        name: &'static str,
        per_instance_byte_size: usize,
        layout: Box<dyn ComponentLayout>,
    ) -> StorageResult<()> {
        self.types
            .register_type(tid, name, per_instance_byte_size, layout)
    }

    /// Registers a component type described by its fields.
    ///
    /// # Errors
    ///
    /// See [`ComponentTypeRegistry::register_type`].
    pub fn register_fields(
        &mut self,
        tid: ComponentTid,
        name: &'static str,
        layout: FieldLayout,
    ) -> StorageResult<()> {
        self.types.register_fields(tid, name, layout)
    }

    /// Registers the transform and scene-graph types.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::DuplicateType`] if either id is taken.
    pub fn register_builtin_components(&mut self) -> StorageResult<()> {
        register_builtin_types(&mut self.types)
    }

    /// Byte offset where the region of `tid` begins.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::UnregisteredType`] if `tid` is not registered.
    pub fn memory_begin_offset(&self, tid: ComponentTid) -> StorageResult<usize> {
        self.types.memory_begin_offset(tid)
    }

    /// Buffer view of `tid`, once its first instance exists.
    #[must_use]
    pub fn buffer_view(&self, tid: ComponentTid) -> Option<&BufferView> {
        self.types.get(tid)?.buffer_view()
    }

    /// Accessor backing field `name` of `tid`, once its first instance exists.
    #[must_use]
    pub fn accessor(&self, tid: ComponentTid, name: &str) -> Option<&Accessor> {
        self.types.get(tid)?.accessor(name)
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Creates a component not attached to any entity.
    ///
    /// # Errors
    ///
    /// Structural errors from carving or binding the type's region.
    pub fn create_component(&mut self, tid: ComponentTid) -> StorageResult<Option<&Component>> {
        self.components
            .create_component(&mut self.types, &mut self.arena, tid, EntityId::NULL)
    }

    /// Gets an instance by type and instance id.
    #[must_use]
    pub fn get_component(&self, tid: ComponentTid, sid: ComponentSid) -> Option<&Component> {
        self.components.get_component(tid, sid)
    }

    /// Every instance of `tid`, in SID order.
    #[must_use]
    pub fn components_with_type(&self, tid: ComponentTid) -> &[Component] {
        self.components.components_with_type(tid)
    }

    /// Number of instances of `tid`.
    #[must_use]
    pub fn component_count(&self, tid: ComponentTid) -> usize {
        self.components.component_count(tid)
    }

    /// Types with at least one instance.
    pub fn component_tids(&self) -> impl Iterator<Item = ComponentTid> + '_ {
        self.components.component_tids()
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Creates an entity with one instance of each requested type.
    ///
    /// Unregistered types are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::EntityCapacityExceeded`] when full.
    pub fn create_entity(&mut self, requested: &[ComponentTid]) -> StorageResult<&Entity> {
        self.entities.create_entity(
            &mut self.types,
            &mut self.components,
            &mut self.arena,
            requested,
        )
    }

    /// Attaches an instance of `tid` to entity `id`.
    ///
    /// # Errors
    ///
    /// Structural errors from creating the component.
    pub fn add_component_to_entity(
        &mut self,
        id: EntityId,
        tid: ComponentTid,
    ) -> StorageResult<Option<&Component>> {
        self.entities.add_component_to_entity(
            &mut self.types,
            &mut self.components,
            &mut self.arena,
            id,
            tid,
        )
    }

    /// Gets an entity by id.
    #[must_use]
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get_entity(id)
    }

    /// The component of type `tid` attached to entity `id`.
    #[must_use]
    pub fn get_component_of_entity(&self, id: EntityId, tid: ComponentTid) -> Option<&Component> {
        self.entities
            .get_component_of_entity(&self.components, id, tid)
    }

    /// Number of entities created.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.entity_count()
    }

    /// All entities, in creation order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.entities.entities()
    }

    /// Transform of entity `id`, if it has one.
    #[must_use]
    pub fn transform(&self, id: EntityId) -> Option<TransformView> {
        TransformView::new(self.get_component_of_entity(id, TRANSFORM_TID)?)
    }

    /// Scene-graph node of entity `id`, if it has one.
    #[must_use]
    pub fn scene_graph(&self, id: EntityId) -> Option<SceneGraphView> {
        SceneGraphView::new(self.get_component_of_entity(id, SCENE_GRAPH_TID)?)
    }
}
