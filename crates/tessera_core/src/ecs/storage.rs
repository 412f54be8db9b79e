//! # Component Storage
//!
//! Instance bookkeeping per component type. The field bytes live in the
//! arena; this registry only records which rows belong to which instance.
//!
//! Instance ids are dense per type: the n-th instance of a type has SID n
//! and occupies row n of every accessor of that type.

use std::collections::BTreeMap;

use super::component::{Component, ComponentSid, ComponentTid};
use super::entity::EntityId;
use super::type_registry::ComponentTypeRegistry;
use crate::error::StorageResult;
use crate::memory::ByteArena;

/// All component instances, grouped by type.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    instances: BTreeMap<ComponentTid, Vec<Component>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new instance of `tid` owned by `entity`.
    ///
    /// The first instance of a type carves the type's region of the arena.
    ///
    /// # Returns
    ///
    /// The new instance, or `None` if `tid` is not registered.
    ///
    /// # Errors
    ///
    /// Structural errors from carving the region, or
    /// [`crate::StorageError::RowExhausted`] when every row is taken.
    pub fn create_component(
        &mut self,
        types: &mut ComponentTypeRegistry,
        arena: &mut ByteArena,
        tid: ComponentTid,
        entity: EntityId,
    ) -> StorageResult<Option<&Component>> {
        if !types.ensure_layout(arena, tid)? {
            return Ok(None);
        }

        let instances = self.instances.entry(tid).or_default();
        let sid = ComponentSid::new(instances.len() as u32);
        let fields = types.construct(arena, tid, entity, sid)?;
        instances.push(Component::new(tid, sid, entity, fields));

        tracing::trace!(tid = tid.get(), sid = sid.get(), entity = entity.get(), "component created");

        Ok(instances.last())
    }

    /// Gets an instance by type and instance id.
    #[inline]
    #[must_use]
    pub fn get_component(&self, tid: ComponentTid, sid: ComponentSid) -> Option<&Component> {
        self.instances.get(&tid)?.get(sid.index())
    }

    /// Every instance of `tid`, in SID order. Empty for unknown types.
    #[must_use]
    pub fn components_with_type(&self, tid: ComponentTid) -> &[Component] {
        self.instances.get(&tid).map_or(&[], Vec::as_slice)
    }

    /// Number of instances of `tid`.
    #[inline]
    #[must_use]
    pub fn component_count(&self, tid: ComponentTid) -> usize {
        self.components_with_type(tid).len()
    }

    /// Types that have at least one instance, ascending.
    pub fn component_tids(&self) -> impl Iterator<Item = ComponentTid> + '_ {
        self.instances.keys().copied()
    }
}
