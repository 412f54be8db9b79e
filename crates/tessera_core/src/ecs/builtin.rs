//! # Built-in Components
//!
//! Two stock component kinds, both stored in the GPU buffer:
//!
//! | Kind        | TID | Layout      | Fields                                   |
//! |-------------|-----|-------------|------------------------------------------|
//! | Transform   | 1   | planar      | `translate` vec3, `rotate` vec4, `scale` vec3 |
//! | Scene graph | 2   | interleaved | `world_matrix` mat4, `parent` u32        |
//!
//! All lanes are `f32` except `parent`. New transforms start at the origin
//! with identity rotation and unit scale; new scene-graph nodes start with
//! an identity world matrix and no parent.

use tessera_shared::{Mat4, Vec3, Vec4};

use super::component::{Component, ComponentTid};
use super::entity::EntityId;
use super::layout::{FieldLayout, FieldSpec};
use super::type_registry::ComponentTypeRegistry;
use crate::error::StorageResult;
use crate::memory::{BufferUsage, ByteArena, Composition, ElementKind, LayoutMode, RowHandle};

/// Type id of the transform component.
pub const TRANSFORM_TID: ComponentTid = ComponentTid::new(1);

/// Type id of the scene-graph component.
pub const SCENE_GRAPH_TID: ComponentTid = ComponentTid::new(2);

static IDENTITY_QUATERNION: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
static UNIT_SCALE: [f64; 3] = [1.0, 1.0, 1.0];
static IDENTITY_MATRIX: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Field layout of the transform component.
#[must_use]
pub fn transform_layout() -> FieldLayout {
    FieldLayout::new(BufferUsage::Gpu, LayoutMode::Soa)
        .field(FieldSpec::new("translate", Composition::Vec3, ElementKind::F32))
        .field(
            FieldSpec::new("rotate", Composition::Vec4, ElementKind::F32)
                .with_initial(&IDENTITY_QUATERNION),
        )
        .field(FieldSpec::new("scale", Composition::Vec3, ElementKind::F32).with_initial(&UNIT_SCALE))
}

/// Field layout of the scene-graph component.
#[must_use]
pub fn scene_graph_layout() -> FieldLayout {
    FieldLayout::new(BufferUsage::Gpu, LayoutMode::Aos)
        .field(
            FieldSpec::new("world_matrix", Composition::Mat4, ElementKind::F32)
                .with_initial(&IDENTITY_MATRIX),
        )
        .field(FieldSpec::new("parent", Composition::Scalar, ElementKind::U32))
}

/// Registers the transform and scene-graph types.
///
/// # Errors
///
/// Returns [`crate::StorageError::DuplicateType`] if either id is taken.
pub fn register_builtin_types(types: &mut ComponentTypeRegistry) -> StorageResult<()> {
    types.register_fields(TRANSFORM_TID, "transform", transform_layout())?;
    types.register_fields(SCENE_GRAPH_TID, "scene_graph", scene_graph_layout())?;
    Ok(())
}

/// Typed access to a transform component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformView {
    translate: RowHandle,
    rotate: RowHandle,
    scale: RowHandle,
}

impl TransformView {
    /// Wraps `component` if it is a transform.
    #[must_use]
    pub fn new(component: &Component) -> Option<Self> {
        if component.tid() != TRANSFORM_TID {
            return None;
        }
        Some(Self {
            translate: component.field("translate")?,
            rotate: component.field("rotate")?,
            scale: component.field("scale")?,
        })
    }

    /// Translation.
    #[must_use]
    pub fn translate(&self, arena: &ByteArena) -> Vec3 {
        self.translate.vec3(arena)
    }

    /// Sets the translation.
    pub fn set_translate(&self, arena: &mut ByteArena, value: Vec3) {
        self.translate.set_vec3(arena, value);
    }

    /// Rotation quaternion `(x, y, z, w)`.
    #[must_use]
    pub fn rotate(&self, arena: &ByteArena) -> Vec4 {
        self.rotate.vec4(arena)
    }

    /// Sets the rotation quaternion.
    pub fn set_rotate(&self, arena: &mut ByteArena, value: Vec4) {
        self.rotate.set_vec4(arena, value);
    }

    /// Scale.
    #[must_use]
    pub fn scale(&self, arena: &ByteArena) -> Vec3 {
        self.scale.vec3(arena)
    }

    /// Sets the scale.
    pub fn set_scale(&self, arena: &mut ByteArena, value: Vec3) {
        self.scale.set_vec3(arena, value);
    }
}

/// Typed access to a scene-graph component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneGraphView {
    world_matrix: RowHandle,
    parent: RowHandle,
}

impl SceneGraphView {
    /// Wraps `component` if it is a scene-graph node.
    #[must_use]
    pub fn new(component: &Component) -> Option<Self> {
        if component.tid() != SCENE_GRAPH_TID {
            return None;
        }
        Some(Self {
            world_matrix: component.field("world_matrix")?,
            parent: component.field("parent")?,
        })
    }

    /// World matrix.
    #[must_use]
    pub fn world_matrix(&self, arena: &ByteArena) -> Mat4 {
        self.world_matrix.mat4(arena)
    }

    /// Sets the world matrix.
    pub fn set_world_matrix(&self, arena: &mut ByteArena, value: &Mat4) {
        self.world_matrix.set_mat4(arena, value);
    }

    /// Parent entity, [`EntityId::NULL`] for roots.
    #[must_use]
    pub fn parent(&self, arena: &ByteArena) -> EntityId {
        EntityId::new(self.parent.scalar(arena) as u32)
    }

    /// Sets the parent entity.
    pub fn set_parent(&self, arena: &mut ByteArena, parent: EntityId) {
        self.parent.set_scalar(arena, f64::from(parent.get()));
    }
}
