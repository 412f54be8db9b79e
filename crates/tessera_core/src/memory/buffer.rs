//! # Buffer
//!
//! One named region of the arena. A buffer owns its bytes outright and
//! bump-allocates buffer views from them; nothing is ever freed.

use std::ops::Range;

use tessera_shared::BUFFER_VIEW_ALIGNMENT;

use super::arena::BufferUsage;
use super::buffer_view::{BufferView, LayoutMode};
use crate::error::{StorageError, StorageResult};

/// A fixed-capacity byte region carved into buffer views.
///
/// Backing storage is a slice of `u64` words so that any 8-byte-aligned
/// offset can be viewed as `f64` without copying.
///
/// # Thread Safety
///
/// NOT thread-safe. The whole storage core is single-threaded.
pub struct Buffer {
    /// Which arena region this is.
    usage: BufferUsage,
    /// The backing storage, zeroed once at creation.
    words: Box<[u64]>,
    /// Usable size in bytes.
    capacity: usize,
    /// Bump cursor: end of the furthest view taken so far.
    cursor: usize,
    /// Byte ranges of every view taken, in creation order.
    taken: Vec<Range<usize>>,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("usage", &self.usage)
            .field("capacity", &self.capacity)
            .field("cursor", &self.cursor)
            .field("views", &self.taken.len())
            .finish()
    }
}

impl Buffer {
    /// Creates a zeroed buffer of `capacity` bytes.
    #[must_use]
    pub fn new(usage: BufferUsage, capacity: usize) -> Self {
        let word_count = capacity.div_ceil(std::mem::size_of::<u64>());
        Self {
            usage,
            words: vec![0u64; word_count].into_boxed_slice(),
            capacity,
            cursor: 0,
            taken: Vec::new(),
        }
    }

    /// Which arena region this buffer is.
    #[inline]
    #[must_use]
    pub const fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes up to the bump cursor.
    #[inline]
    #[must_use]
    pub const fn used_bytes(&self) -> usize {
        self.cursor
    }

    /// Bytes past the bump cursor.
    #[inline]
    #[must_use]
    pub const fn remaining_bytes(&self) -> usize {
        self.capacity - self.cursor
    }

    /// Number of buffer views taken so far.
    #[inline]
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.taken.len()
    }

    /// The whole backing region, for upload to a graphics device.
    ///
    /// This is a live view: writes made through accessors after an upload
    /// show up in the next one.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.capacity]
    }

    /// Mutable access to the whole backing region.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let capacity = self.capacity;
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..capacity]
    }

    /// Takes the next `byte_length` bytes after the cursor as a buffer view.
    ///
    /// `byte_stride` is the record size for [`LayoutMode::Aos`] views and is
    /// ignored (pass `0`) for [`LayoutMode::Soa`].
    ///
    /// # Errors
    ///
    /// - [`StorageError::Alignment`] if the length or stride is not a
    ///   multiple of 4. Nothing is allocated.
    /// - [`StorageError::ArenaExhausted`] if the buffer has no room left.
    pub fn take_buffer_view(
        &mut self,
        byte_length: usize,
        byte_stride: usize,
        layout: LayoutMode,
    ) -> StorageResult<BufferView> {
        self.place_view(self.cursor, byte_length, byte_stride, layout)
    }

    /// Takes a buffer view at an explicit byte offset.
    ///
    /// Component layout uses this to put every type at the offset computed
    /// from its type id, whatever order the types are first used in.
    ///
    /// # Errors
    ///
    /// As [`Buffer::take_buffer_view`], plus [`StorageError::Alignment`] for
    /// an unaligned offset and [`StorageError::ViewOverlap`] if the range
    /// intersects an earlier view.
    pub fn take_buffer_view_at(
        &mut self,
        byte_offset: usize,
        byte_length: usize,
        byte_stride: usize,
        layout: LayoutMode,
    ) -> StorageResult<BufferView> {
        check_alignment("offset", byte_offset)?;
        self.place_view(byte_offset, byte_length, byte_stride, layout)
    }

    fn place_view(
        &mut self,
        byte_offset: usize,
        byte_length: usize,
        byte_stride: usize,
        layout: LayoutMode,
    ) -> StorageResult<BufferView> {
        check_alignment("length", byte_length)?;
        check_alignment("stride", byte_stride)?;

        let end = byte_offset
            .checked_add(byte_length)
            .filter(|end| *end <= self.capacity)
            .ok_or(StorageError::ArenaExhausted {
                usage: self.usage,
                offset: byte_offset,
                requested: byte_length,
                capacity: self.capacity,
            })?;

        let range = byte_offset..end;
        if !range.is_empty()
            && self
                .taken
                .iter()
                .any(|other| other.start < range.end && range.start < other.end)
        {
            return Err(StorageError::ViewOverlap {
                usage: self.usage,
                offset: byte_offset,
                length: byte_length,
            });
        }

        let view = BufferView::new(self.usage, byte_offset, byte_length, byte_stride, layout);

        self.cursor = self.cursor.max(end);
        self.taken.push(range);

        tracing::debug!(
            usage = ?self.usage,
            byte_offset,
            byte_length,
            byte_stride,
            ?layout,
            "took buffer view"
        );

        Ok(view)
    }

    /// Bytes of one element.
    ///
    /// # Panics
    ///
    /// Panics if the range lies outside this buffer, which only happens when
    /// a handle from a different arena is used.
    #[inline]
    pub(crate) fn element(&self, byte_offset: usize, len: usize) -> &[u8] {
        &self.bytes()[byte_offset..byte_offset + len]
    }

    /// Mutable bytes of one element. Same panics as [`Buffer::element`].
    #[inline]
    pub(crate) fn element_mut(&mut self, byte_offset: usize, len: usize) -> &mut [u8] {
        &mut self.bytes_mut()[byte_offset..byte_offset + len]
    }
}

fn check_alignment(what: &'static str, value: usize) -> StorageResult<()> {
    if value % BUFFER_VIEW_ALIGNMENT == 0 {
        Ok(())
    } else {
        Err(StorageError::Alignment {
            what,
            value,
            alignment: BUFFER_VIEW_ALIGNMENT,
        })
    }
}
