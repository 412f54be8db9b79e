//! # Buffer View
//!
//! A window into a buffer, carved into accessors. The layout mode is fixed
//! when the view is created:
//!
//! ```text
//! Soa (planar):       [x0 x1 x2 ... xN][y0 y1 y2 ... yN]     one run per field
//! Aos (interleaved):  [x0 y0][x1 y1][x2 y2] ... [xN yN]      one record per row
//! ```

use super::accessor::{Accessor, AccessorLayout};
use super::arena::BufferUsage;
use super::element::{element_size_in_bytes, Composition, ElementKind};
use crate::error::{StorageError, StorageResult};

/// How the accessors of a view share its bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Structure-of-Arrays: each accessor is one contiguous run.
    Soa,
    /// Array-of-Structures: accessors interleave inside a fixed-size record.
    Aos,
}

/// A contiguous (SoA) or strided (AoS) region of a buffer.
///
/// Owns no bytes. Accessors are bump-allocated from it and never returned.
#[derive(Debug)]
pub struct BufferView {
    usage: BufferUsage,
    byte_offset: usize,
    byte_length: usize,
    byte_stride: usize,
    layout: LayoutMode,
    /// SoA: bytes used from the start of the view.
    /// AoS: bytes used from the start of the record.
    cursor: usize,
    accessors: Vec<AccessorLayout>,
}

impl BufferView {
    pub(crate) fn new(
        usage: BufferUsage,
        byte_offset: usize,
        byte_length: usize,
        byte_stride: usize,
        layout: LayoutMode,
    ) -> Self {
        Self {
            usage,
            byte_offset,
            byte_length,
            byte_stride,
            layout,
            cursor: 0,
            accessors: Vec::new(),
        }
    }

    /// Buffer this view lives in.
    #[inline]
    #[must_use]
    pub const fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Offset of the view inside its buffer.
    #[inline]
    #[must_use]
    pub const fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Length of the view in bytes.
    #[inline]
    #[must_use]
    pub const fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Record size for interleaved views; `0` for planar ones.
    #[inline]
    #[must_use]
    pub const fn byte_stride(&self) -> usize {
        self.byte_stride
    }

    /// Layout mode fixed at creation.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// True for planar views.
    #[inline]
    #[must_use]
    pub fn is_soa(&self) -> bool {
        self.layout == LayoutMode::Soa
    }

    /// True for interleaved views.
    #[inline]
    #[must_use]
    pub fn is_aos(&self) -> bool {
        self.layout == LayoutMode::Aos
    }

    /// Layouts of every accessor taken so far, in order.
    #[inline]
    #[must_use]
    pub fn accessors(&self) -> &[AccessorLayout] {
        &self.accessors
    }

    /// Takes the next planar accessor.
    ///
    /// The stride is the element size; the accessor starts right after the
    /// previous accessor's `stride * count` bytes.
    ///
    /// # Errors
    ///
    /// - [`StorageError::LayoutMismatch`] on an interleaved view.
    /// - [`StorageError::ViewExhausted`] if `count` elements do not fit.
    /// - [`StorageError::Range`] if `count` is zero.
    pub fn take_accessor(
        &mut self,
        composition: Composition,
        kind: ElementKind,
        count: usize,
    ) -> StorageResult<Accessor> {
        self.expect_layout(LayoutMode::Soa)?;

        let byte_stride = element_size_in_bytes(composition, kind);
        let remaining = self.byte_length - self.cursor;
        let span = match byte_stride.checked_mul(count) {
            Some(span) if span <= remaining => span,
            span => {
                return Err(StorageError::ViewExhausted {
                    requested: span.unwrap_or(usize::MAX),
                    remaining,
                })
            }
        };

        let accessor = Accessor::new(self, self.cursor, composition, kind, count, byte_stride)?;
        self.cursor += span;
        self.accessors.push(*accessor.layout());
        Ok(accessor)
    }

    /// Takes the next interleaved accessor.
    ///
    /// `byte_stride` must be the view's record size. The accessor occupies
    /// the next free sub-offset inside each record.
    ///
    /// # Errors
    ///
    /// - [`StorageError::LayoutMismatch`] on a planar view.
    /// - [`StorageError::StrideMismatch`] if `byte_stride` is not the record size.
    /// - [`StorageError::ViewExhausted`] if the record has no room for the element.
    /// - [`StorageError::Range`] if `count` records do not fit in the view.
    pub fn take_flexible_accessor(
        &mut self,
        composition: Composition,
        kind: ElementKind,
        count: usize,
        byte_stride: usize,
    ) -> StorageResult<Accessor> {
        self.expect_layout(LayoutMode::Aos)?;
        if byte_stride != self.byte_stride {
            return Err(StorageError::StrideMismatch {
                expected: self.byte_stride,
                found: byte_stride,
            });
        }

        let element_size = element_size_in_bytes(composition, kind);
        debug_assert!(self.cursor <= self.byte_stride, "record cursor past stride");
        let remaining = self.byte_stride - self.cursor;
        if element_size > remaining {
            return Err(StorageError::ViewExhausted {
                requested: element_size,
                remaining,
            });
        }

        let accessor = Accessor::new(self, self.cursor, composition, kind, count, byte_stride)?;
        self.cursor += element_size;
        self.accessors.push(*accessor.layout());
        Ok(accessor)
    }

    fn expect_layout(&self, expected: LayoutMode) -> StorageResult<()> {
        if self.layout == expected {
            Ok(())
        } else {
            Err(StorageError::LayoutMismatch {
                expected,
                found: self.layout,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soa_accessors_are_contiguous_runs() {
        let mut view = BufferView::new(BufferUsage::Gpu, 64, 256, 0, LayoutMode::Soa);
        let positions = view
            .take_accessor(Composition::Vec3, ElementKind::F32, 10)
            .unwrap();
        let weights = view
            .take_accessor(Composition::Scalar, ElementKind::F32, 10)
            .unwrap();

        assert_eq!(positions.byte_stride(), 12);
        assert_eq!(positions.byte_offset(), 64);
        assert_eq!(weights.byte_stride(), 4);
        assert_eq!(weights.byte_offset(), 64 + 120);
        assert_eq!(view.accessors().len(), 2);
        assert!(view.is_soa());
    }

    #[test]
    fn test_soa_view_exhaustion() {
        let mut view = BufferView::new(BufferUsage::Gpu, 0, 128, 0, LayoutMode::Soa);
        view.take_accessor(Composition::Vec4, ElementKind::F32, 4)
            .unwrap();
        let err = view
            .take_accessor(Composition::Vec4, ElementKind::F32, 5)
            .unwrap_err();
        assert_eq!(
            err,
            StorageError::ViewExhausted {
                requested: 80,
                remaining: 64,
            }
        );
    }

    #[test]
    fn test_soa_huge_count_is_exhaustion() {
        let mut view = BufferView::new(BufferUsage::Gpu, 0, 128, 0, LayoutMode::Soa);
        let err = view
            .take_accessor(Composition::Vec4, ElementKind::F32, usize::MAX / 8)
            .unwrap_err();
        assert_eq!(
            err,
            StorageError::ViewExhausted {
                requested: usize::MAX,
                remaining: 128,
            }
        );
        assert!(view.accessors().is_empty());
    }

    #[test]
    fn test_aos_accessors_interleave() {
        // Record: vec3 f32 position (12) + vec2 f32 uv (8) + pad (4) = 24.
        let mut view = BufferView::new(BufferUsage::Gpu, 0, 24 * 8, 24, LayoutMode::Aos);
        let position = view
            .take_flexible_accessor(Composition::Vec3, ElementKind::F32, 8, 24)
            .unwrap();
        let uv = view
            .take_flexible_accessor(Composition::Vec2, ElementKind::F32, 8, 24)
            .unwrap();

        assert_eq!(position.byte_offset(), 0);
        assert_eq!(uv.byte_offset(), 12);
        assert_eq!(position.byte_stride(), 24);
        assert_eq!(uv.byte_stride(), 24);
        assert!(view.is_aos());

        // 4 bytes left in the record.
        assert!(matches!(
            view.take_flexible_accessor(Composition::Vec2, ElementKind::F32, 8, 24),
            Err(StorageError::ViewExhausted { requested: 8, remaining: 4 })
        ));
    }

    #[test]
    fn test_layout_mode_is_fixed() {
        let mut soa = BufferView::new(BufferUsage::Cpu, 0, 64, 0, LayoutMode::Soa);
        assert!(matches!(
            soa.take_flexible_accessor(Composition::Scalar, ElementKind::F32, 4, 16),
            Err(StorageError::LayoutMismatch { .. })
        ));

        let mut aos = BufferView::new(BufferUsage::Cpu, 0, 64, 16, LayoutMode::Aos);
        assert!(matches!(
            aos.take_accessor(Composition::Scalar, ElementKind::F32, 4),
            Err(StorageError::LayoutMismatch { .. })
        ));
        assert!(matches!(
            aos.take_flexible_accessor(Composition::Scalar, ElementKind::F32, 4, 8),
            Err(StorageError::StrideMismatch { expected: 16, found: 8 })
        ));
    }

    #[test]
    fn test_aos_rows_must_fit_view() {
        let mut view = BufferView::new(BufferUsage::Cpu, 0, 64, 16, LayoutMode::Aos);
        // 5 records of 16 bytes need 64 + 4 bytes for the last element.
        assert!(matches!(
            view.take_flexible_accessor(Composition::Scalar, ElementKind::F32, 5, 16),
            Err(StorageError::Range { .. })
        ));
        assert!(view
            .take_flexible_accessor(Composition::Scalar, ElementKind::F32, 4, 16)
            .is_ok());
    }
}
