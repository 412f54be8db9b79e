//! # Entity Management
//!
//! Entities are identifiers plus a map from component type to the instance
//! attached to them. They never own component memory.

use std::collections::BTreeMap;

use super::component::{ComponentSid, ComponentTid};

/// Unique identifier for an entity.
///
/// Ids start at 1 and increase monotonically. They are never reused;
/// `0` means "no entity".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Null/invalid entity ID.
    pub const NULL: Self = Self(0);

    /// Creates an entity ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Position of this entity in creation order (`id - 1`).
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> Option<usize> {
        match self.0.checked_sub(1) {
            Some(index) => Some(index as usize),
            None => None,
        }
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

/// An entity and the components attached to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    components: BTreeMap<ComponentTid, ComponentSid>,
}

impl Entity {
    /// Creates an entity with no components.
    #[inline]
    #[must_use]
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            components: BTreeMap::new(),
        }
    }

    /// The unique identifier for this entity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Checks if this entity has a component of type `tid`.
    #[inline]
    #[must_use]
    pub fn has_component(&self, tid: ComponentTid) -> bool {
        self.components.contains_key(&tid)
    }

    /// Instance id of the component of type `tid`, if attached.
    #[inline]
    #[must_use]
    pub fn component_sid(&self, tid: ComponentTid) -> Option<ComponentSid> {
        self.components.get(&tid).copied()
    }

    /// Attached component types and their instance ids, by type id.
    pub fn components(&self) -> impl Iterator<Item = (ComponentTid, ComponentSid)> + '_ {
        self.components.iter().map(|(tid, sid)| (*tid, *sid))
    }

    /// Number of attached components.
    #[inline]
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Records that instance `sid` of type `tid` belongs to this entity.
    #[inline]
    pub(crate) fn attach(&mut self, tid: ComponentTid, sid: ComponentSid) {
        self.components.insert(tid, sid);
    }
}
