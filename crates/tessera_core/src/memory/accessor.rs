//! # Accessor
//!
//! A typed, strided, bounds-checked view over part of a buffer view.
//!
//! Row `i` of an accessor lives at `byte_offset + byte_stride * i` in its
//! buffer. Rows are read and written lane by lane through the accessor's
//! element kind and byte order, so the same bytes serve both as CPU-side
//! component fields and as a flat GPU upload.
//!
//! `take_one` hands out rows as [`RowHandle`]s. A handle is an offset, not a
//! borrow: the arena stays the only owner, and every read or write goes
//! through it.

use tessera_shared::{Mat3, Mat4, Vec2, Vec3, Vec4};

use super::arena::{BufferUsage, ByteArena};
use super::buffer_view::{BufferView, LayoutMode};
use super::element::{
    element_size_in_bytes, read_lanes, write_lanes, Composition, Element, ElementKind, Endianness,
};
use crate::error::{StorageError, StorageResult};

/// Where an accessor's rows are and how they are encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessorLayout {
    /// Buffer the rows live in.
    pub usage: BufferUsage,
    /// Offset of row 0 inside the buffer.
    pub byte_offset: usize,
    /// Offset of row 0 inside the owning view.
    pub byte_offset_in_view: usize,
    /// Distance between consecutive rows.
    pub byte_stride: usize,
    /// Lanes per element.
    pub composition: Composition,
    /// Numeric type of each lane.
    pub kind: ElementKind,
    /// Number of rows.
    pub count: usize,
}

impl AccessorLayout {
    /// Size of one element in bytes.
    #[inline]
    #[must_use]
    pub const fn element_size(&self) -> usize {
        element_size_in_bytes(self.composition, self.kind)
    }

    /// Bytes from the start of row 0 to the end of the last row.
    #[inline]
    #[must_use]
    pub const fn byte_length(&self) -> usize {
        self.byte_stride * (self.count - 1) + self.element_size()
    }
}

/// Typed random-access view over a buffer view region.
#[derive(Debug)]
pub struct Accessor {
    layout: AccessorLayout,
    view_layout: LayoutMode,
    endianness: Endianness,
    /// Next row `take_one` will hand out.
    taken: usize,
}

impl Accessor {
    /// Validates and creates an accessor over `view`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Range`] unless
    /// `byte_offset + byte_stride * (count - 1) + element_size <= view.byte_length()`
    /// and `count > 0`.
    pub(crate) fn new(
        view: &BufferView,
        byte_offset_in_view: usize,
        composition: Composition,
        kind: ElementKind,
        count: usize,
        byte_stride: usize,
    ) -> StorageResult<Self> {
        let element_size = element_size_in_bytes(composition, kind);
        let out_of_range = || StorageError::Range {
            byte_offset: byte_offset_in_view,
            byte_stride,
            count,
            element_size,
            view_length: view.byte_length(),
        };

        let last_row = count.checked_sub(1).ok_or_else(out_of_range)?;
        let end = byte_stride
            .checked_mul(last_row)
            .and_then(|span| span.checked_add(byte_offset_in_view))
            .and_then(|start| start.checked_add(element_size))
            .ok_or_else(out_of_range)?;
        if end > view.byte_length() || byte_stride < element_size {
            return Err(out_of_range());
        }

        Ok(Self {
            layout: AccessorLayout {
                usage: view.usage(),
                byte_offset: view.byte_offset() + byte_offset_in_view,
                byte_offset_in_view,
                byte_stride,
                composition,
                kind,
                count,
            },
            view_layout: view.layout(),
            endianness: Endianness::Little,
            taken: 0,
        })
    }

    /// Switches the byte order used for reads, writes and row handles
    /// taken afterwards.
    #[must_use]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Full layout record.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> &AccessorLayout {
        &self.layout
    }

    /// Buffer the rows live in.
    #[inline]
    #[must_use]
    pub const fn usage(&self) -> BufferUsage {
        self.layout.usage
    }

    /// Offset of row 0 inside the buffer.
    #[inline]
    #[must_use]
    pub const fn byte_offset(&self) -> usize {
        self.layout.byte_offset
    }

    /// Distance between consecutive rows.
    #[inline]
    #[must_use]
    pub const fn byte_stride(&self) -> usize {
        self.layout.byte_stride
    }

    /// Bytes from row 0 to the end of the last row.
    #[inline]
    #[must_use]
    pub const fn byte_length(&self) -> usize {
        self.layout.byte_length()
    }

    /// Lanes per element.
    #[inline]
    #[must_use]
    pub const fn composition(&self) -> Composition {
        self.layout.composition
    }

    /// Numeric type of each lane.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.layout.kind
    }

    /// Byte order of each lane.
    #[inline]
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.layout.count
    }

    /// Size of one element in bytes.
    #[inline]
    #[must_use]
    pub const fn element_size(&self) -> usize {
        self.layout.element_size()
    }

    /// Rows handed out by `take_one` so far.
    #[inline]
    #[must_use]
    pub const fn taken_count(&self) -> usize {
        self.taken
    }

    /// True if the owning view is interleaved.
    #[inline]
    #[must_use]
    pub fn is_aos(&self) -> bool {
        self.view_layout == LayoutMode::Aos
    }

    /// True if the owning view is planar.
    #[inline]
    #[must_use]
    pub fn is_soa(&self) -> bool {
        self.view_layout == LayoutMode::Soa
    }

    /// Hands out the next unused row.
    ///
    /// This is how a component field becomes a live alias into the arena.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::RowExhausted`] once all `count` rows are taken.
    pub fn take_one(&mut self) -> StorageResult<RowHandle> {
        if self.taken >= self.layout.count {
            return Err(StorageError::RowExhausted {
                count: self.layout.count,
            });
        }
        let handle = self.row_handle(self.taken);
        self.taken += 1;
        Ok(handle)
    }

    fn row_handle(&self, index: usize) -> RowHandle {
        RowHandle {
            usage: self.layout.usage,
            byte_offset: self.layout.byte_offset + self.layout.byte_stride * index,
            composition: self.layout.composition,
            kind: self.layout.kind,
            endianness: self.endianness,
        }
    }

    /// Handle for row `index` without advancing the `take_one` cursor.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<RowHandle> {
        (index < self.layout.count).then(|| self.row_handle(index))
    }

    fn read<const N: usize>(&self, arena: &ByteArena, index: usize) -> Option<[f64; N]> {
        self.row(index).map(|row| row.read(arena))
    }

    fn write(&self, arena: &mut ByteArena, index: usize, values: &[f64]) -> bool {
        match self.row(index) {
            Some(row) => {
                row.set_lanes(arena, values);
                true
            }
            None => false,
        }
    }

    /// Reads row `index` as a scalar. `None` if out of range.
    #[must_use]
    pub fn get_scalar(&self, arena: &ByteArena, index: usize) -> Option<f64> {
        self.read::<1>(arena, index).map(|[v]| v)
    }

    /// Reads row `index` as a 2-vector. `None` if out of range.
    #[must_use]
    pub fn get_vec2(&self, arena: &ByteArena, index: usize) -> Option<Vec2> {
        self.read(arena, index).map(Vec2::from_array)
    }

    /// Reads row `index` as a 3-vector. `None` if out of range.
    #[must_use]
    pub fn get_vec3(&self, arena: &ByteArena, index: usize) -> Option<Vec3> {
        self.read(arena, index).map(Vec3::from_array)
    }

    /// Reads row `index` as a 4-vector. `None` if out of range.
    #[must_use]
    pub fn get_vec4(&self, arena: &ByteArena, index: usize) -> Option<Vec4> {
        self.read(arena, index).map(Vec4::from_array)
    }

    /// Reads row `index` as a 3x3 matrix. `None` if out of range.
    #[must_use]
    pub fn get_mat3(&self, arena: &ByteArena, index: usize) -> Option<Mat3> {
        self.read(arena, index).map(Mat3::from_array)
    }

    /// Reads row `index` as a 4x4 matrix. `None` if out of range.
    #[must_use]
    pub fn get_mat4(&self, arena: &ByteArena, index: usize) -> Option<Mat4> {
        self.read(arena, index).map(Mat4::from_array)
    }

    /// Writes a scalar to row `index`.
    ///
    /// # Returns
    ///
    /// `true` if the value was written, `false` if index was out of bounds.
    pub fn set_scalar(&self, arena: &mut ByteArena, index: usize, value: f64) -> bool {
        self.write(arena, index, &[value])
    }

    /// Writes a 2-vector to row `index`. `false` if out of bounds.
    pub fn set_vec2(&self, arena: &mut ByteArena, index: usize, value: Vec2) -> bool {
        self.write(arena, index, &value.to_array())
    }

    /// Writes a 3-vector to row `index`. `false` if out of bounds.
    pub fn set_vec3(&self, arena: &mut ByteArena, index: usize, value: Vec3) -> bool {
        self.write(arena, index, &value.to_array())
    }

    /// Writes a 4-vector to row `index`. `false` if out of bounds.
    pub fn set_vec4(&self, arena: &mut ByteArena, index: usize, value: Vec4) -> bool {
        self.write(arena, index, &value.to_array())
    }

    /// Writes a 3x3 matrix to row `index`. `false` if out of bounds.
    pub fn set_mat3(&self, arena: &mut ByteArena, index: usize, value: &Mat3) -> bool {
        self.write(arena, index, &value.m)
    }

    /// Writes a 4x4 matrix to row `index`. `false` if out of bounds.
    pub fn set_mat4(&self, arena: &mut ByteArena, index: usize, value: &Mat4) -> bool {
        self.write(arena, index, &value.m)
    }

    /// Copies row `src_index` of `src` into row `dst_index` of this accessor,
    /// converting between element kinds.
    ///
    /// # Returns
    ///
    /// `false` if either index is out of range or the compositions differ.
    pub fn copy_row_from(
        &self,
        arena: &mut ByteArena,
        src: &Accessor,
        src_index: usize,
        dst_index: usize,
    ) -> bool {
        if src.composition() != self.composition() {
            return false;
        }
        let Some(lanes) = src.read::<16>(arena, src_index) else {
            return false;
        };
        self.write(arena, dst_index, &lanes)
    }

    /// All rows as one contiguous native-endian slice of `T`.
    ///
    /// Only meaningful for planar accessors: on an interleaved accessor the
    /// slice spans the neighbouring fields too, and callers must check
    /// [`Accessor::is_aos`] first.
    ///
    /// Views are only 4-byte aligned, so 8-byte kinds (`f64`) need an
    /// accessor starting on an 8-byte offset. Lane access through
    /// [`Accessor::row`] works at any offset.
    ///
    /// # Errors
    ///
    /// - [`StorageError::KindMismatch`] if `T` is not the accessor's kind.
    /// - [`StorageError::Misaligned`] if the region is not aligned for `T`.
    pub fn typed_rows<'a, T: Element>(&self, arena: &'a ByteArena) -> StorageResult<&'a [T]> {
        self.check_kind::<T>()?;
        let bytes = arena
            .buffer(self.layout.usage)
            .element(self.layout.byte_offset, self.typed_span());
        bytemuck::try_cast_slice(bytes).map_err(|_| StorageError::Misaligned {
            byte_offset: self.layout.byte_offset,
            kind: self.layout.kind,
        })
    }

    /// Mutable counterpart of [`Accessor::typed_rows`].
    ///
    /// # Errors
    ///
    /// Same as [`Accessor::typed_rows`].
    pub fn typed_rows_mut<'a, T: Element>(
        &self,
        arena: &'a mut ByteArena,
    ) -> StorageResult<&'a mut [T]> {
        self.check_kind::<T>()?;
        let span = self.typed_span();
        let bytes = arena
            .buffer_mut(self.layout.usage)
            .element_mut(self.layout.byte_offset, span);
        bytemuck::try_cast_slice_mut(bytes).map_err(|_| StorageError::Misaligned {
            byte_offset: self.layout.byte_offset,
            kind: self.layout.kind,
        })
    }

    fn typed_span(&self) -> usize {
        // Planar rows are packed, so this is exactly `count` elements.
        self.layout.byte_length()
    }

    fn check_kind<T: Element>(&self) -> StorageResult<()> {
        if T::KIND == self.layout.kind {
            Ok(())
        } else {
            Err(StorageError::KindMismatch {
                expected: T::KIND,
                found: self.layout.kind,
            })
        }
    }
}

/// Non-owning handle to one accessor row.
///
/// Copying a handle aliases the same bytes. To take an independent copy of
/// the values, use [`RowHandle::detach`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowHandle {
    usage: BufferUsage,
    byte_offset: usize,
    composition: Composition,
    kind: ElementKind,
    endianness: Endianness,
}

impl RowHandle {
    /// Buffer the row lives in.
    #[inline]
    #[must_use]
    pub const fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Offset of the row inside its buffer.
    #[inline]
    #[must_use]
    pub const fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Size of the row in bytes.
    #[inline]
    #[must_use]
    pub const fn byte_length(&self) -> usize {
        element_size_in_bytes(self.composition, self.kind)
    }

    /// Byte range of the row inside its buffer.
    #[inline]
    #[must_use]
    pub const fn byte_range(&self) -> std::ops::Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_length()
    }

    /// Lanes per element.
    #[inline]
    #[must_use]
    pub const fn composition(&self) -> Composition {
        self.composition
    }

    /// Numeric type of each lane.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Raw bytes of the row.
    ///
    /// # Panics
    ///
    /// Panics if the handle came from a different, smaller arena.
    #[must_use]
    pub fn bytes<'a>(&self, arena: &'a ByteArena) -> &'a [u8] {
        arena
            .buffer(self.usage)
            .element(self.byte_offset, self.byte_length())
    }

    /// Reads the first `N` lanes; lanes past the composition read as zero.
    fn read<const N: usize>(&self, arena: &ByteArena) -> [f64; N] {
        read_lanes(
            self.bytes(arena),
            self.composition,
            self.kind,
            self.endianness,
        )
    }

    /// Writes `values` into the leading lanes; extra values are dropped.
    pub fn set_lanes(&self, arena: &mut ByteArena, values: &[f64]) {
        let len = self.byte_length();
        let element = arena
            .buffer_mut(self.usage)
            .element_mut(self.byte_offset, len);
        write_lanes(element, values, self.composition, self.kind, self.endianness);
    }

    /// First lane.
    #[must_use]
    pub fn scalar(&self, arena: &ByteArena) -> f64 {
        let [value] = self.read::<1>(arena);
        value
    }

    /// First two lanes.
    #[must_use]
    pub fn vec2(&self, arena: &ByteArena) -> Vec2 {
        Vec2::from_array(self.read(arena))
    }

    /// First three lanes.
    #[must_use]
    pub fn vec3(&self, arena: &ByteArena) -> Vec3 {
        Vec3::from_array(self.read(arena))
    }

    /// First four lanes.
    #[must_use]
    pub fn vec4(&self, arena: &ByteArena) -> Vec4 {
        Vec4::from_array(self.read(arena))
    }

    /// Nine lanes as a column-major matrix.
    #[must_use]
    pub fn mat3(&self, arena: &ByteArena) -> Mat3 {
        Mat3::from_array(self.read(arena))
    }

    /// Sixteen lanes as a column-major matrix.
    #[must_use]
    pub fn mat4(&self, arena: &ByteArena) -> Mat4 {
        Mat4::from_array(self.read(arena))
    }

    /// Writes the first lane.
    pub fn set_scalar(&self, arena: &mut ByteArena, value: f64) {
        self.set_lanes(arena, &[value]);
    }

    /// Writes the first two lanes.
    pub fn set_vec2(&self, arena: &mut ByteArena, value: Vec2) {
        self.set_lanes(arena, &value.to_array());
    }

    /// Writes the first three lanes.
    pub fn set_vec3(&self, arena: &mut ByteArena, value: Vec3) {
        self.set_lanes(arena, &value.to_array());
    }

    /// Writes the first four lanes.
    pub fn set_vec4(&self, arena: &mut ByteArena, value: Vec4) {
        self.set_lanes(arena, &value.to_array());
    }

    /// Writes a column-major 3x3 matrix.
    pub fn set_mat3(&self, arena: &mut ByteArena, value: &Mat3) {
        self.set_lanes(arena, &value.m);
    }

    /// Writes a column-major 4x4 matrix.
    pub fn set_mat4(&self, arena: &mut ByteArena, value: &Mat4) {
        self.set_lanes(arena, &value.m);
    }

    /// Copies the row's bytes out of the arena into an owned buffer.
    #[must_use]
    pub fn detach(&self, arena: &ByteArena) -> DetachedRow {
        DetachedRow {
            bytes: self.bytes(arena).to_vec(),
            composition: self.composition,
            kind: self.kind,
            endianness: self.endianness,
        }
    }

    /// Writes a detached copy back into this row.
    ///
    /// # Returns
    ///
    /// `false` if the copy has a different encoding than this row.
    pub fn restore(&self, arena: &mut ByteArena, row: &DetachedRow) -> bool {
        if row.composition != self.composition
            || row.kind != self.kind
            || row.endianness != self.endianness
        {
            return false;
        }
        let len = self.byte_length();
        arena
            .buffer_mut(self.usage)
            .element_mut(self.byte_offset, len)
            .copy_from_slice(&row.bytes);
        true
    }
}

/// An owned copy of one row, independent of the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetachedRow {
    bytes: Vec<u8>,
    composition: Composition,
    kind: ElementKind,
    endianness: Endianness,
}

impl DetachedRow {
    /// The copied bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decodes the first `N` lanes.
    #[must_use]
    pub fn lanes<const N: usize>(&self) -> [f64; N] {
        read_lanes(&self.bytes, self.composition, self.kind, self.endianness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with_soa_view(len: usize) -> (ByteArena, BufferView) {
        let mut arena = ByteArena::new(4096, 1024).unwrap();
        let view = arena
            .buffer_mut(BufferUsage::Gpu)
            .take_buffer_view(len, 0, LayoutMode::Soa)
            .unwrap();
        (arena, view)
    }

    #[test]
    fn test_vec3_round_trip_f32() {
        let (mut arena, mut view) = arena_with_soa_view(120);
        let accessor = view
            .take_accessor(Composition::Vec3, ElementKind::F32, 10)
            .unwrap();

        let value = Vec3::new(1.5, -2.25, 1024.125);
        assert!(accessor.set_vec3(&mut arena, 7, value));
        assert_eq!(accessor.get_vec3(&arena, 7), Some(value));
        assert_eq!(accessor.get_vec3(&arena, 6), Some(Vec3::ZERO));
    }

    #[test]
    fn test_vec3_round_trip_f64() {
        let (mut arena, mut view) = arena_with_soa_view(240);
        let accessor = view
            .take_accessor(Composition::Vec3, ElementKind::F64, 10)
            .unwrap();

        let value = Vec3::new(0.1, std::f64::consts::PI, -1.0e300);
        assert!(accessor.set_vec3(&mut arena, 9, value));
        assert_eq!(accessor.get_vec3(&arena, 9), Some(value));
    }

    #[test]
    fn test_out_of_range_rows() {
        let (mut arena, mut view) = arena_with_soa_view(64);
        let accessor = view
            .take_accessor(Composition::Scalar, ElementKind::U32, 4)
            .unwrap();

        assert!(!accessor.set_scalar(&mut arena, 4, 1.0));
        assert_eq!(accessor.get_scalar(&arena, 4), None);
        assert!(accessor.row(4).is_none());
    }

    #[test]
    fn test_take_one_rows_are_disjoint() {
        let (_arena, mut view) = arena_with_soa_view(64);
        let mut accessor = view
            .take_accessor(Composition::Vec4, ElementKind::F32, 4)
            .unwrap();

        let rows: Vec<RowHandle> = (0..4).map(|_| accessor.take_one().unwrap()).collect();
        for (i, a) in rows.iter().enumerate() {
            assert_eq!(a.byte_length(), 16);
            for b in &rows[i + 1..] {
                let (ra, rb) = (a.byte_range(), b.byte_range());
                assert!(ra.end <= rb.start || rb.end <= ra.start);
            }
        }
        assert_eq!(accessor.taken_count(), 4);
        assert_eq!(
            accessor.take_one().unwrap_err(),
            StorageError::RowExhausted { count: 4 }
        );
    }

    #[test]
    fn test_row_handle_aliases_accessor() {
        let (mut arena, mut view) = arena_with_soa_view(64);
        let mut accessor = view
            .take_accessor(Composition::Vec2, ElementKind::F32, 8)
            .unwrap();
        let _first = accessor.take_one().unwrap();
        let second = accessor.take_one().unwrap();

        second.set_vec2(&mut arena, Vec2::new(3.0, 4.0));
        assert_eq!(accessor.get_vec2(&arena, 1), Some(Vec2::new(3.0, 4.0)));

        accessor.set_vec2(&mut arena, 1, Vec2::new(5.0, 6.0));
        assert_eq!(second.vec2(&arena), Vec2::new(5.0, 6.0));
    }

    #[test]
    fn test_detach_is_an_independent_copy() {
        let (mut arena, mut view) = arena_with_soa_view(64);
        let mut accessor = view
            .take_accessor(Composition::Vec3, ElementKind::F32, 4)
            .unwrap();
        let row = accessor.take_one().unwrap();

        row.set_vec3(&mut arena, Vec3::new(1.0, 2.0, 3.0));
        let copy = row.detach(&arena);
        row.set_vec3(&mut arena, Vec3::new(9.0, 9.0, 9.0));

        assert_eq!(copy.lanes::<3>(), [1.0, 2.0, 3.0]);
        assert!(row.restore(&mut arena, &copy));
        assert_eq!(row.vec3(&arena), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_matrix_rows() {
        let (mut arena, mut view) = arena_with_soa_view(64 * 2 + 36 * 2);
        let mat4 = view
            .take_accessor(Composition::Mat4, ElementKind::F32, 2)
            .unwrap();
        let mat3 = view
            .take_accessor(Composition::Mat3, ElementKind::F32, 2)
            .unwrap();

        let m4 = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        assert!(mat4.set_mat4(&mut arena, 1, &m4));
        assert_eq!(mat4.get_mat4(&arena, 1), Some(m4));
        assert_eq!(mat4.get_mat4(&arena, 0), Some(Mat4::from_array([0.0; 16])));

        assert!(mat3.set_mat3(&mut arena, 0, &Mat3::IDENTITY));
        assert_eq!(mat3.get_mat3(&arena, 0), Some(Mat3::IDENTITY));
    }

    #[test]
    fn test_big_endian_accessor() {
        let (mut arena, mut view) = arena_with_soa_view(16);
        let accessor = view
            .take_accessor(Composition::Scalar, ElementKind::U16, 8)
            .unwrap()
            .with_endianness(Endianness::Big);

        assert!(accessor.set_scalar(&mut arena, 0, 258.0));
        let bytes = arena.buffer(BufferUsage::Gpu).bytes();
        assert_eq!(&bytes[0..2], &[1, 2]);
        assert_eq!(accessor.get_scalar(&arena, 0), Some(258.0));
    }

    #[test]
    fn test_typed_rows_soa() {
        let (mut arena, mut view) = arena_with_soa_view(48);
        let accessor = view
            .take_accessor(Composition::Vec3, ElementKind::F32, 4)
            .unwrap();
        accessor.set_vec3(&mut arena, 1, Vec3::new(1.0, 2.0, 3.0));

        let rows: &[f32] = accessor.typed_rows(&arena).unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(&rows[3..6], &[1.0, 2.0, 3.0]);

        let rows_mut: &mut [f32] = accessor.typed_rows_mut(&mut arena).unwrap();
        rows_mut[11] = 8.0;
        assert_eq!(accessor.get_vec3(&arena, 3), Some(Vec3::new(0.0, 0.0, 8.0)));

        assert!(matches!(
            accessor.typed_rows::<u32>(&arena),
            Err(StorageError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_typed_rows_f64_needs_eight_byte_offset() {
        let (mut arena, mut view) = arena_with_soa_view(4 + 4 * 8);
        view.take_accessor(Composition::Scalar, ElementKind::F32, 1)
            .unwrap();
        let wide = view
            .take_accessor(Composition::Scalar, ElementKind::F64, 4)
            .unwrap();
        assert_eq!(wide.byte_offset(), 4);

        assert_eq!(
            wide.typed_rows::<f64>(&arena).unwrap_err(),
            StorageError::Misaligned {
                byte_offset: 4,
                kind: ElementKind::F64,
            }
        );
        // Row access does not depend on alignment.
        assert!(wide.set_scalar(&mut arena, 3, 2.5));
        assert_eq!(wide.get_scalar(&arena, 3), Some(2.5));
    }

    #[test]
    fn test_copy_row_between_kinds() {
        let (mut arena, mut view) = arena_with_soa_view(4 * 12 + 4 * 24);
        let narrow = view
            .take_accessor(Composition::Vec3, ElementKind::F32, 4)
            .unwrap();
        let wide = view
            .take_accessor(Composition::Vec3, ElementKind::F64, 4)
            .unwrap();

        narrow.set_vec3(&mut arena, 2, Vec3::new(0.5, 0.25, 0.125));
        assert!(wide.copy_row_from(&mut arena, &narrow, 2, 0));
        assert_eq!(wide.get_vec3(&arena, 0), Some(Vec3::new(0.5, 0.25, 0.125)));
        assert!(!wide.copy_row_from(&mut arena, &narrow, 4, 0));
    }

    #[test]
    fn test_accessor_range_checked_at_construction() {
        let view = BufferView::new(BufferUsage::Cpu, 0, 32, 0, LayoutMode::Soa);
        assert!(matches!(
            Accessor::new(&view, 24, Composition::Vec3, ElementKind::F32, 1, 12),
            Err(StorageError::Range { .. })
        ));
        assert!(matches!(
            Accessor::new(&view, 0, Composition::Vec3, ElementKind::F32, 0, 12),
            Err(StorageError::Range { .. })
        ));
        assert!(Accessor::new(&view, 20, Composition::Vec3, ElementKind::F32, 1, 12).is_ok());
    }
}
