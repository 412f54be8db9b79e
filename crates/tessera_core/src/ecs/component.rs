//! # Component System
//!
//! A component instance is an identity (type id, instance id, owning entity)
//! plus a set of named fields. Fields hold no data of their own: each is a
//! [`RowHandle`] into the arena at row = instance id.

use super::entity::EntityId;
use crate::memory::RowHandle;

/// Component type identifier (TID).
///
/// Caller-assigned, unique and stable for the process lifetime. Lower ids are
/// laid out at lower byte offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentTid(u32);

impl ComponentTid {
    /// Creates a type id.
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
}

/// Component instance identifier (SID).
///
/// Dense per type, starting at 0, in creation order. Doubles as the row index
/// into every accessor of the type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentSid(u32);

impl ComponentSid {
    /// Creates an instance id.
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

    /// Row / array index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One named field of a component, aliased into the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentField {
    /// Field name, unique within the component type.
    pub name: &'static str,
    /// The field's row.
    pub row: RowHandle,
}

/// A component instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    tid: ComponentTid,
    sid: ComponentSid,
    entity_id: EntityId,
    fields: Vec<ComponentField>,
}

impl Component {
    /// Creates a component instance from its bound fields.
    #[must_use]
    pub fn new(
        tid: ComponentTid,
        sid: ComponentSid,
        entity_id: EntityId,
        fields: Vec<ComponentField>,
    ) -> Self {
        Self {
            tid,
            sid,
            entity_id,
            fields,
        }
    }

    /// Type id.
    #[inline]
    #[must_use]
    pub const fn tid(&self) -> ComponentTid {
        self.tid
    }

    /// Instance id.
    #[inline]
    #[must_use]
    pub const fn sid(&self) -> ComponentSid {
        self.sid
    }

    /// Owning entity.
    #[inline]
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// All fields, in declaration order.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[ComponentField] {
        &self.fields
    }

    /// The row of field `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<RowHandle> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{BufferUsage, ByteArena, Composition, ElementKind, LayoutMode};

    #[test]
    fn test_field_lookup_by_name() {
        let mut arena = ByteArena::new(64, 64).unwrap();
        let mut view = arena
            .buffer_mut(BufferUsage::Cpu)
            .take_buffer_view(32, 0, LayoutMode::Soa)
            .unwrap();
        let mut mass = view
            .take_accessor(Composition::Scalar, ElementKind::F32, 4)
            .unwrap();

        let row = mass.take_one().unwrap();
        let component = Component::new(
            ComponentTid::new(3),
            ComponentSid::new(0),
            EntityId::new(1),
            vec![ComponentField { name: "mass", row }],
        );

        assert_eq!(component.field("mass"), Some(row));
        assert_eq!(component.field("charge"), None);
        assert_eq!(component.fields().len(), 1);
        assert_eq!(ComponentSid::new(7).index(), 7);
    }
}
