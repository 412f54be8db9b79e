//! # Component Type Registry
//!
//! Maps type ids to their descriptors and computes where each type's region
//! begins. Placement depends only on which types are registered:
//!
//! ```text
//! begin(tid) = sum(per_instance_byte_size(t) * max_entity_count, for registered t < tid)
//! ```
//!
//! Once a type is laid out, no type with a lower id may be registered.

use std::collections::BTreeMap;

use tessera_shared::BUFFER_VIEW_ALIGNMENT;

use super::component::{ComponentField, ComponentSid, ComponentTid};
use super::entity::EntityId;
use super::layout::{ComponentLayout, FieldLayout, LayoutContext};
use crate::error::{StorageError, StorageResult};
use crate::memory::{Accessor, BufferView, ByteArena};

/// Registration record for one component type.
pub struct ComponentTypeDescriptor {
    tid: ComponentTid,
    name: &'static str,
    per_instance_byte_size: usize,
    layout: Box<dyn ComponentLayout>,
    layout_ready: bool,
}

impl ComponentTypeDescriptor {
    /// Type id.
    #[inline]
    #[must_use]
    pub const fn tid(&self) -> ComponentTid {
        self.tid
    }

    /// Human-readable type name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Bytes reserved per instance.
    #[inline]
    #[must_use]
    pub const fn per_instance_byte_size(&self) -> usize {
        self.per_instance_byte_size
    }

    /// Whether the type's region has been carved.
    #[inline]
    #[must_use]
    pub const fn is_layout_ready(&self) -> bool {
        self.layout_ready
    }

    /// The type's buffer view, once carved.
    #[must_use]
    pub fn buffer_view(&self) -> Option<&BufferView> {
        self.layout.buffer_view()
    }

    /// Accessor backing field `name`, once carved.
    #[must_use]
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.layout.accessor(name)
    }
}

impl std::fmt::Debug for ComponentTypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentTypeDescriptor")
            .field("tid", &self.tid)
            .field("name", &self.name)
            .field("per_instance_byte_size", &self.per_instance_byte_size)
            .field("layout_ready", &self.layout_ready)
            .finish_non_exhaustive()
    }
}

/// Registry of component types, ordered by type id.
#[derive(Debug)]
pub struct ComponentTypeRegistry {
    types: BTreeMap<ComponentTid, ComponentTypeDescriptor>,
    max_entity_count: usize,
}

impl ComponentTypeRegistry {
    /// Creates an empty registry sizing every type for `max_entity_count` rows.
    #[must_use]
    pub fn new(max_entity_count: usize) -> Self {
        Self {
            types: BTreeMap::new(),
            max_entity_count,
        }
    }

    /// Rows reserved per type.
    #[inline]
    #[must_use]
    pub const fn max_entity_count(&self) -> usize {
        self.max_entity_count
    }

    /// Registers a component type.
    ///
    /// Must happen before any entity requests `tid`, and before any type
    /// with a higher id has been laid out: a new region would shift theirs.
    ///
    /// # Errors
    ///
    /// - [`StorageError::DuplicateType`] if `tid` is already registered.
    /// - [`StorageError::LayoutFrozen`] if a higher type is already laid out.
    /// - [`StorageError::Alignment`] if `per_instance_byte_size` is not a multiple of 4.
    /// - [`StorageError::RegionOverflow`] if the regions no longer fit in `usize`.
    pub fn register_type(
        &mut self,
        tid: ComponentTid,
        name: &'static str,
        per_instance_byte_size: usize,
        layout: Box<dyn ComponentLayout>,
    ) -> StorageResult<()> {
        if self.types.contains_key(&tid) {
            return Err(StorageError::DuplicateType(tid));
        }
        if let Some((&laid_out, _)) = self
            .types
            .range(tid..)
            .find(|(_, descriptor)| descriptor.layout_ready)
        {
            return Err(StorageError::LayoutFrozen { tid, laid_out });
        }
        if per_instance_byte_size % BUFFER_VIEW_ALIGNMENT != 0 {
            return Err(StorageError::Alignment {
                what: "per-instance size",
                value: per_instance_byte_size,
                alignment: BUFFER_VIEW_ALIGNMENT,
            });
        }
        let overflow = StorageError::RegionOverflow {
            tid,
            per_instance_byte_size,
            max_entity_count: self.max_entity_count,
        };
        let region = per_instance_byte_size
            .checked_mul(self.max_entity_count)
            .ok_or_else(|| overflow.clone())?;
        self.total_region_bytes()
            .and_then(|total| total.checked_add(region))
            .ok_or(overflow)?;

        tracing::debug!(tid = tid.get(), name, per_instance_byte_size, "registered component type");

        self.types.insert(
            tid,
            ComponentTypeDescriptor {
                tid,
                name,
                per_instance_byte_size,
                layout,
                layout_ready: false,
            },
        );
        Ok(())
    }

    /// Registers a [`FieldLayout`] type, sized from its fields.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register_type`].
    pub fn register_fields(
        &mut self,
        tid: ComponentTid,
        name: &'static str,
        layout: FieldLayout,
    ) -> StorageResult<()> {
        let size = layout.per_instance_byte_size();
        self.register_type(tid, name, size, Box::new(layout))
    }

    /// Descriptor for `tid`.
    #[inline]
    #[must_use]
    pub fn get(&self, tid: ComponentTid) -> Option<&ComponentTypeDescriptor> {
        self.types.get(&tid)
    }

    /// Checks if `tid` is registered.
    #[inline]
    #[must_use]
    pub fn is_registered(&self, tid: ComponentTid) -> bool {
        self.types.contains_key(&tid)
    }

    /// Registered type ids in ascending order.
    pub fn tids(&self) -> impl Iterator<Item = ComponentTid> + '_ {
        self.types.keys().copied()
    }

    /// Number of registered types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if no types are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Byte offset where the region of `tid` begins.
    ///
    /// Sums the regions of every registered type with a smaller id, so the
    /// answer never depends on which types have been used yet.
    ///
    /// # Errors
    ///
    /// - [`StorageError::UnregisteredType`] if `tid` is not registered.
    /// - [`StorageError::RegionOverflow`] if the lower regions overflow `usize`.
    pub fn memory_begin_offset(&self, tid: ComponentTid) -> StorageResult<usize> {
        let Some(descriptor) = self.types.get(&tid) else {
            return Err(StorageError::UnregisteredType(tid));
        };
        self.region_bytes(..tid)
            .ok_or(StorageError::RegionOverflow {
                tid,
                per_instance_byte_size: descriptor.per_instance_byte_size,
                max_entity_count: self.max_entity_count,
            })
    }

    /// Bytes reserved by every registered type, `None` on overflow.
    fn total_region_bytes(&self) -> Option<usize> {
        self.region_bytes(..)
    }

    fn region_bytes(&self, tids: impl std::ops::RangeBounds<ComponentTid>) -> Option<usize> {
        self.types.range(tids).try_fold(0usize, |total, (_, descriptor)| {
            descriptor
                .per_instance_byte_size
                .checked_mul(self.max_entity_count)
                .and_then(|region| total.checked_add(region))
        })
    }

    /// Carves the region of `tid` the first time it is needed.
    ///
    /// Returns `Ok(false)` if `tid` is not registered.
    pub(crate) fn ensure_layout(
        &mut self,
        arena: &mut ByteArena,
        tid: ComponentTid,
    ) -> StorageResult<bool> {
        if !self.types.contains_key(&tid) {
            return Ok(false);
        }
        let begin_offset = self.memory_begin_offset(tid)?;
        let max_entity_count = self.max_entity_count;
        let Some(descriptor) = self.types.get_mut(&tid) else {
            return Ok(false);
        };
        if descriptor.layout_ready {
            return Ok(true);
        }

        descriptor.layout.setup_layout(LayoutContext {
            arena,
            tid,
            begin_offset,
            per_instance_byte_size: descriptor.per_instance_byte_size,
            max_entity_count,
        })?;
        descriptor.layout_ready = true;
        Ok(true)
    }

    /// Binds the fields of a new instance of `tid`.
    pub(crate) fn construct(
        &mut self,
        arena: &mut ByteArena,
        tid: ComponentTid,
        entity: EntityId,
        sid: ComponentSid,
    ) -> StorageResult<Vec<ComponentField>> {
        let descriptor = self
            .types
            .get_mut(&tid)
            .ok_or(StorageError::UnregisteredType(tid))?;
        descriptor.layout.construct(arena, entity, sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{BufferUsage, Composition, ElementKind, LayoutMode};

    /// Layout that only counts how often it is set up.
    struct CountingLayout {
        setups: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl ComponentLayout for CountingLayout {
        fn setup_layout(&mut self, _ctx: LayoutContext<'_>) -> StorageResult<()> {
            self.setups.set(self.setups.get() + 1);
            Ok(())
        }

        fn construct(
            &mut self,
            _arena: &mut ByteArena,
            _entity: EntityId,
            _sid: ComponentSid,
        ) -> StorageResult<Vec<ComponentField>> {
            Ok(Vec::new())
        }
    }

    fn counting() -> Box<dyn ComponentLayout> {
        Box::new(CountingLayout {
            setups: std::rc::Rc::default(),
        })
    }

    #[test]
    fn test_memory_begin_offset_is_deterministic() {
        let mut registry = ComponentTypeRegistry::new(100);
        registry
            .register_type(ComponentTid::new(3), "c", 8, counting())
            .unwrap();
        registry
            .register_type(ComponentTid::new(1), "a", 16, counting())
            .unwrap();
        registry
            .register_type(ComponentTid::new(2), "b", 32, counting())
            .unwrap();

        assert_eq!(registry.memory_begin_offset(ComponentTid::new(1)), Ok(0));
        assert_eq!(registry.memory_begin_offset(ComponentTid::new(2)), Ok(1600));
        assert_eq!(
            registry.memory_begin_offset(ComponentTid::new(3)),
            Ok(16 * 100 + 32 * 100)
        );
        assert_eq!(
            registry.memory_begin_offset(ComponentTid::new(9)),
            Err(StorageError::UnregisteredType(ComponentTid::new(9)))
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ComponentTypeRegistry::new(10);
        registry
            .register_type(ComponentTid::new(1), "a", 4, counting())
            .unwrap();
        assert_eq!(
            registry.register_type(ComponentTid::new(1), "again", 4, counting()),
            Err(StorageError::DuplicateType(ComponentTid::new(1)))
        );
        assert_eq!(registry.get(ComponentTid::new(1)).unwrap().name(), "a");
    }

    #[test]
    fn test_layout_setup_runs_once() {
        let setups = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut arena = ByteArena::new(64, 64).unwrap();
        let mut registry = ComponentTypeRegistry::new(4);
        registry
            .register_type(
                ComponentTid::new(1),
                "counted",
                4,
                Box::new(CountingLayout {
                    setups: setups.clone(),
                }),
            )
            .unwrap();

        for _ in 0..3 {
            assert_eq!(registry.ensure_layout(&mut arena, ComponentTid::new(1)), Ok(true));
        }
        assert_eq!(setups.get(), 1);
        assert!(registry.get(ComponentTid::new(1)).unwrap().is_layout_ready());
        assert_eq!(registry.ensure_layout(&mut arena, ComponentTid::new(2)), Ok(false));
    }

    #[test]
    fn test_field_layout_placed_at_begin_offset() {
        let mut arena = ByteArena::new(1024, 64).unwrap();
        let mut registry = ComponentTypeRegistry::new(8);
        let vec4 = |name| {
            FieldLayout::new(BufferUsage::Gpu, LayoutMode::Soa)
                .field(crate::ecs::FieldSpec::new(name, Composition::Vec4, ElementKind::F32))
        };
        registry
            .register_fields(ComponentTid::new(1), "first", vec4("a"))
            .unwrap();
        registry
            .register_fields(ComponentTid::new(2), "second", vec4("b"))
            .unwrap();

        // Second type used first still lands after the first type's region.
        registry.ensure_layout(&mut arena, ComponentTid::new(2)).unwrap();
        let second = registry.get(ComponentTid::new(2)).unwrap();
        assert_eq!(second.buffer_view().unwrap().byte_offset(), 16 * 8);
        assert_eq!(second.accessor("b").unwrap().count(), 8);
    }

    #[test]
    fn test_register_below_laid_out_type_rejected() {
        let mut arena = ByteArena::new(64, 64).unwrap();
        let mut registry = ComponentTypeRegistry::new(4);
        registry
            .register_type(ComponentTid::new(2), "placed", 4, counting())
            .unwrap();
        registry.ensure_layout(&mut arena, ComponentTid::new(2)).unwrap();

        assert_eq!(
            registry.register_type(ComponentTid::new(1), "late", 4, counting()),
            Err(StorageError::LayoutFrozen {
                tid: ComponentTid::new(1),
                laid_out: ComponentTid::new(2),
            })
        );
        assert!(!registry.is_registered(ComponentTid::new(1)));
        assert_eq!(registry.memory_begin_offset(ComponentTid::new(2)), Ok(0));

        // Higher ids do not move an existing region.
        registry
            .register_type(ComponentTid::new(3), "after", 4, counting())
            .unwrap();
        assert_eq!(registry.memory_begin_offset(ComponentTid::new(3)), Ok(16));
    }

    #[test]
    fn test_unaligned_instance_size_rejected() {
        let mut registry = ComponentTypeRegistry::new(10);
        assert_eq!(
            registry.register_type(ComponentTid::new(1), "odd", 6, counting()),
            Err(StorageError::Alignment {
                what: "per-instance size",
                value: 6,
                alignment: BUFFER_VIEW_ALIGNMENT,
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_oversized_instance_size_rejected() {
        let mut registry = ComponentTypeRegistry::new(1000);
        let huge = (usize::MAX / 100).next_multiple_of(BUFFER_VIEW_ALIGNMENT);
        assert_eq!(
            registry.register_type(ComponentTid::new(1), "huge", huge, counting()),
            Err(StorageError::RegionOverflow {
                tid: ComponentTid::new(1),
                per_instance_byte_size: huge,
                max_entity_count: 1000,
            })
        );

        // Each region fits alone, but not stacked behind the first.
        let half = (usize::MAX / 2000).next_multiple_of(BUFFER_VIEW_ALIGNMENT) + 4;
        registry
            .register_type(ComponentTid::new(2), "half", half, counting())
            .unwrap();
        assert!(matches!(
            registry.register_type(ComponentTid::new(3), "other_half", half, counting()),
            Err(StorageError::RegionOverflow { .. })
        ));
        assert_eq!(registry.memory_begin_offset(ComponentTid::new(2)), Ok(0));
        assert_eq!(registry.len(), 1);
    }
}
