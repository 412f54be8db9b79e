//! # Component Layout
//!
//! How a component type carves its region of the arena and binds new
//! instances to rows of it.
//!
//! A type's region is carved once, on first use, sized for the engine's
//! maximum entity count and placed at the offset its type id dictates.
//! [`FieldLayout`] covers the common case of a fixed list of numeric fields;
//! types with unusual needs implement [`ComponentLayout`] directly.

use tessera_shared::BUFFER_VIEW_ALIGNMENT;

use super::component::{ComponentField, ComponentSid, ComponentTid};
use super::entity::EntityId;
use crate::error::{StorageError, StorageResult};
use crate::memory::{
    element_size_in_bytes, Accessor, BufferUsage, BufferView, ByteArena, Composition, ElementKind,
    LayoutMode,
};

/// Everything a type needs to carve its region.
pub struct LayoutContext<'a> {
    /// The arena to carve from.
    pub arena: &'a mut ByteArena,
    /// Type being laid out.
    pub tid: ComponentTid,
    /// Byte offset the type's region must start at.
    pub begin_offset: usize,
    /// Registered size of one instance.
    pub per_instance_byte_size: usize,
    /// Rows every accessor must hold.
    pub max_entity_count: usize,
}

impl LayoutContext<'_> {
    /// Total size of the type's region, `None` if it overflows `usize`.
    #[inline]
    #[must_use]
    pub const fn byte_length(&self) -> Option<usize> {
        self.per_instance_byte_size.checked_mul(self.max_entity_count)
    }
}

/// Layout and construction behaviour of one component type.
pub trait ComponentLayout {
    /// Carves the type's buffer view and accessors.
    ///
    /// Called exactly once, before the first instance is constructed.
    ///
    /// # Errors
    ///
    /// Any structural error from carving the arena.
    fn setup_layout(&mut self, ctx: LayoutContext<'_>) -> StorageResult<()>;

    /// Binds a new instance's fields to the next free rows.
    ///
    /// # Errors
    ///
    /// Typically [`crate::StorageError::RowExhausted`].
    fn construct(
        &mut self,
        arena: &mut ByteArena,
        entity: EntityId,
        sid: ComponentSid,
    ) -> StorageResult<Vec<ComponentField>>;

    /// The buffer view carved by `setup_layout`, if any.
    fn buffer_view(&self) -> Option<&BufferView> {
        None
    }

    /// Accessor backing field `name`, if any.
    fn accessor(&self, _name: &str) -> Option<&Accessor> {
        None
    }
}

/// One numeric field of a [`FieldLayout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    /// Field name.
    pub name: &'static str,
    /// Lanes per element.
    pub composition: Composition,
    /// Numeric type of each lane.
    pub kind: ElementKind,
    /// Lanes written into a freshly bound row. Empty leaves the arena bytes as they are.
    pub initial: &'static [f64],
}

impl FieldSpec {
    /// A field with no initial value.
    #[must_use]
    pub const fn new(name: &'static str, composition: Composition, kind: ElementKind) -> Self {
        Self {
            name,
            composition,
            kind,
            initial: &[],
        }
    }

    /// Sets the lanes written into each new row.
    #[must_use]
    pub const fn with_initial(mut self, initial: &'static [f64]) -> Self {
        self.initial = initial;
        self
    }

    /// Size of one element in bytes.
    #[inline]
    #[must_use]
    pub const fn byte_size(&self) -> usize {
        element_size_in_bytes(self.composition, self.kind)
    }
}

/// Stock layout: a fixed list of fields in one buffer view.
///
/// Planar layouts give each field its own run; interleaved layouts pack
/// all fields of one instance into a record of
/// [`FieldLayout::per_instance_byte_size`] bytes.
///
/// # Example
///
/// ```rust,ignore
/// let layout = FieldLayout::new(BufferUsage::Gpu, LayoutMode::Soa)
///     .field(FieldSpec::new("position", Composition::Vec3, ElementKind::F32))
///     .field(FieldSpec::new("mass", Composition::Scalar, ElementKind::F32));
/// ```
#[derive(Debug)]
pub struct FieldLayout {
    usage: BufferUsage,
    mode: LayoutMode,
    fields: Vec<FieldSpec>,
    view: Option<BufferView>,
    accessors: Vec<Accessor>,
}

impl FieldLayout {
    /// An empty layout in buffer `usage`.
    #[must_use]
    pub fn new(usage: BufferUsage, mode: LayoutMode) -> Self {
        Self {
            usage,
            mode,
            fields: Vec::new(),
            view: None,
            accessors: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Declared fields.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Sum of field sizes, rounded up to the view alignment.
    #[must_use]
    pub fn per_instance_byte_size(&self) -> usize {
        let raw: usize = self.fields.iter().map(FieldSpec::byte_size).sum();
        raw.next_multiple_of(BUFFER_VIEW_ALIGNMENT)
    }
}

impl ComponentLayout for FieldLayout {
    fn setup_layout(&mut self, ctx: LayoutContext<'_>) -> StorageResult<()> {
        let stride = match self.mode {
            LayoutMode::Soa => 0,
            LayoutMode::Aos => ctx.per_instance_byte_size,
        };
        let byte_length = ctx.byte_length().ok_or(StorageError::RegionOverflow {
            tid: ctx.tid,
            per_instance_byte_size: ctx.per_instance_byte_size,
            max_entity_count: ctx.max_entity_count,
        })?;
        let mut view = ctx.arena.buffer_mut(self.usage).take_buffer_view_at(
            ctx.begin_offset,
            byte_length,
            stride,
            self.mode,
        )?;

        let mut accessors = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            let accessor = match self.mode {
                LayoutMode::Soa => {
                    view.take_accessor(spec.composition, spec.kind, ctx.max_entity_count)?
                }
                LayoutMode::Aos => view.take_flexible_accessor(
                    spec.composition,
                    spec.kind,
                    ctx.max_entity_count,
                    stride,
                )?,
            };
            accessors.push(accessor);
        }

        tracing::debug!(
            tid = ctx.tid.get(),
            usage = ?self.usage,
            mode = ?self.mode,
            begin_offset = ctx.begin_offset,
            byte_length,
            fields = self.fields.len(),
            "component layout ready"
        );

        self.view = Some(view);
        self.accessors = accessors;
        Ok(())
    }

    fn construct(
        &mut self,
        arena: &mut ByteArena,
        _entity: EntityId,
        _sid: ComponentSid,
    ) -> StorageResult<Vec<ComponentField>> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for (spec, accessor) in self.fields.iter().zip(self.accessors.iter_mut()) {
            let row = accessor.take_one()?;
            if !spec.initial.is_empty() {
                row.set_lanes(arena, spec.initial);
            }
            fields.push(ComponentField {
                name: spec.name,
                row,
            });
        }
        Ok(fields)
    }

    fn buffer_view(&self) -> Option<&BufferView> {
        self.view.as_ref()
    }

    fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.fields
            .iter()
            .position(|spec| spec.name == name)
            .and_then(|index| self.accessors.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_ctx(arena: &mut ByteArena, per_instance: usize, max: usize) -> LayoutContext<'_> {
        LayoutContext {
            arena,
            tid: ComponentTid::new(1),
            begin_offset: 0,
            per_instance_byte_size: per_instance,
            max_entity_count: max,
        }
    }

    #[test]
    fn test_per_instance_size_is_aligned() {
        let layout = FieldLayout::new(BufferUsage::Cpu, LayoutMode::Soa)
            .field(FieldSpec::new("rgb", Composition::Vec3, ElementKind::U8))
            .field(FieldSpec::new("flag", Composition::Scalar, ElementKind::U16));
        assert_eq!(layout.per_instance_byte_size(), 8);
    }

    #[test]
    fn test_soa_field_layout_binds_rows() {
        let mut arena = ByteArena::new(1024, 64).unwrap();
        let mut layout = FieldLayout::new(BufferUsage::Gpu, LayoutMode::Soa)
            .field(FieldSpec::new("position", Composition::Vec3, ElementKind::F32))
            .field(
                FieldSpec::new("scale", Composition::Vec3, ElementKind::F32)
                    .with_initial(&[1.0, 1.0, 1.0]),
            );
        let per_instance = layout.per_instance_byte_size();
        assert_eq!(per_instance, 24);

        layout
            .setup_layout(layout_ctx(&mut arena, per_instance, 10))
            .unwrap();
        let view = layout.buffer_view().unwrap();
        assert!(view.is_soa());
        assert_eq!(view.byte_length(), 240);
        assert_eq!(layout.accessor("scale").unwrap().byte_offset(), 120);

        let fields = layout
            .construct(&mut arena, EntityId::new(1), ComponentSid::new(0))
            .unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "position");
        assert_eq!(fields[1].row.vec3(&arena), tessera_shared::Vec3::ONE);
        assert_eq!(fields[0].row.vec3(&arena), tessera_shared::Vec3::ZERO);
    }

    #[test]
    fn test_aos_field_layout_interleaves() {
        let mut arena = ByteArena::new(1024, 64).unwrap();
        let mut layout = FieldLayout::new(BufferUsage::Gpu, LayoutMode::Aos)
            .field(FieldSpec::new("a", Composition::Vec2, ElementKind::F32))
            .field(FieldSpec::new("b", Composition::Scalar, ElementKind::U32));
        let per_instance = layout.per_instance_byte_size();
        assert_eq!(per_instance, 12);

        layout
            .setup_layout(layout_ctx(&mut arena, per_instance, 4))
            .unwrap();
        let first = layout
            .construct(&mut arena, EntityId::new(1), ComponentSid::new(0))
            .unwrap();
        let second = layout
            .construct(&mut arena, EntityId::new(2), ComponentSid::new(1))
            .unwrap();

        assert_eq!(first[0].row.byte_offset(), 0);
        assert_eq!(first[1].row.byte_offset(), 8);
        assert_eq!(second[0].row.byte_offset(), 12);
        assert_eq!(second[1].row.byte_offset(), 20);
    }

    #[test]
    fn test_region_size_overflow_is_reported() {
        let mut arena = ByteArena::new(1024, 64).unwrap();
        let mut layout = FieldLayout::new(BufferUsage::Gpu, LayoutMode::Soa)
            .field(FieldSpec::new("a", Composition::Vec4, ElementKind::F32));

        let err = layout
            .setup_layout(layout_ctx(&mut arena, 16, usize::MAX / 8))
            .unwrap_err();
        assert_eq!(
            err,
            StorageError::RegionOverflow {
                tid: ComponentTid::new(1),
                per_instance_byte_size: 16,
                max_entity_count: usize::MAX / 8,
            }
        );
        assert!(layout.buffer_view().is_none());
    }
}
