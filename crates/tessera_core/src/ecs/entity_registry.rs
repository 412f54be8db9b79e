//! # Entity Registry
//!
//! Allocates entity ids and attaches component instances to them.
//!
//! Ids are handed out sequentially from 1 and never reused, so an entity's
//! position in the registry is always `id - 1`.

use tessera_shared::FIRST_ENTITY_ID;

use super::component::{Component, ComponentSid, ComponentTid};
use super::entity::{Entity, EntityId};
use super::storage::ComponentRegistry;
use super::type_registry::ComponentTypeRegistry;
use crate::error::{StorageError, StorageResult};
use crate::memory::ByteArena;

/// Registry of every entity created so far.
#[derive(Debug)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    max_entity_count: usize,
}

impl EntityRegistry {
    /// Creates an empty registry holding at most `max_entity_count` entities.
    #[must_use]
    pub fn new(max_entity_count: usize) -> Self {
        Self {
            entities: Vec::with_capacity(max_entity_count),
            max_entity_count,
        }
    }

    /// Maximum number of entities.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.max_entity_count
    }

    /// Number of entities created.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All entities, in creation order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Creates an entity with one instance of each requested type.
    ///
    /// Unregistered types are skipped with a warning; the entity is still
    /// created with the remaining components.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EntityCapacityExceeded`] when the registry is
    /// full, or any structural error from creating the components. In the
    /// latter case the entity exists with the components created so far.
    pub fn create_entity(
        &mut self,
        types: &mut ComponentTypeRegistry,
        components: &mut ComponentRegistry,
        arena: &mut ByteArena,
        requested: &[ComponentTid],
    ) -> StorageResult<&Entity> {
        if self.entities.len() >= self.max_entity_count {
            return Err(StorageError::EntityCapacityExceeded {
                capacity: self.max_entity_count,
            });
        }

        let id = EntityId::new(FIRST_ENTITY_ID + self.entities.len() as u32);
        self.entities.push(Entity::new(id));

        for &tid in requested {
            if self.attach(types, components, arena, id, tid)?.is_none() {
                tracing::warn!(
                    entity = id.get(),
                    tid = tid.get(),
                    "component type not registered, omitted from entity"
                );
            }
        }

        tracing::trace!(entity = id.get(), requested = requested.len(), "entity created");

        let index = self.entities.len() - 1;
        Ok(&self.entities[index])
    }

    /// Attaches a new instance of `tid` to an existing entity.
    ///
    /// If the entity already has a component of that type, the existing
    /// instance is returned and nothing is created.
    ///
    /// # Returns
    ///
    /// `None` if the entity does not exist or `tid` is not registered.
    ///
    /// # Errors
    ///
    /// Structural errors from creating the component.
    pub fn add_component_to_entity<'c>(
        &mut self,
        types: &mut ComponentTypeRegistry,
        components: &'c mut ComponentRegistry,
        arena: &mut ByteArena,
        id: EntityId,
        tid: ComponentTid,
    ) -> StorageResult<Option<&'c Component>> {
        if self.get_entity(id).is_none() {
            return Ok(None);
        }
        let Some(sid) = self.attach(types, components, arena, id, tid)? else {
            return Ok(None);
        };
        Ok(components.get_component(tid, sid))
    }

    /// Gets an entity by id.
    #[inline]
    #[must_use]
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index()?)
    }

    /// The component of type `tid` attached to entity `id`.
    #[must_use]
    pub fn get_component_of_entity<'c>(
        &self,
        components: &'c ComponentRegistry,
        id: EntityId,
        tid: ComponentTid,
    ) -> Option<&'c Component> {
        let sid = self.get_entity(id)?.component_sid(tid)?;
        components.get_component(tid, sid)
    }

    /// Creates or finds the `tid` instance of entity `id` and records it.
    fn attach(
        &mut self,
        types: &mut ComponentTypeRegistry,
        components: &mut ComponentRegistry,
        arena: &mut ByteArena,
        id: EntityId,
        tid: ComponentTid,
    ) -> StorageResult<Option<ComponentSid>> {
        let Some(entity) = id.index().and_then(|index| self.entities.get_mut(index)) else {
            return Ok(None);
        };
        if let Some(sid) = entity.component_sid(tid) {
            return Ok(Some(sid));
        }

        let Some(component) = components.create_component(types, arena, tid, id)? else {
            return Ok(None);
        };
        let sid = component.sid();
        entity.attach(tid, sid);
        Ok(Some(sid))
    }
}
