//! # Byte Arena
//!
//! The single owner of every byte of component state. Two regions are
//! allocated once at startup and never resized: one laid out for upload to
//! a graphics device, one for data only the CPU reads.

use super::buffer::Buffer;
use crate::error::{StorageError, StorageResult};
use tessera_shared::BUFFER_VIEW_ALIGNMENT;

/// Which arena region a buffer is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Region intended for GPU upload.
    Gpu,
    /// Region only read on the CPU.
    Cpu,
}

/// Fixed-capacity byte arena.
///
/// All buffers, views, accessors and row handles point into this arena by
/// offset; none of them owns bytes.
///
/// # Thread Safety
///
/// This arena is NOT thread-safe.
///
/// # Example
///
/// ```rust,ignore
/// let mut arena = ByteArena::new(1024 * 1024, 64 * 1024)?;
/// let view = arena.buffer_mut(BufferUsage::Gpu).take_buffer_view(1024, 0, LayoutMode::Soa)?;
/// ```
#[derive(Debug)]
pub struct ByteArena {
    gpu: Buffer,
    cpu: Buffer,
}

impl ByteArena {
    /// Allocates both regions, zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Alignment`] if either size is not a multiple
    /// of 4 bytes.
    pub fn new(gpu_bytes: usize, cpu_bytes: usize) -> StorageResult<Self> {
        for value in [gpu_bytes, cpu_bytes] {
            if value % BUFFER_VIEW_ALIGNMENT != 0 {
                return Err(StorageError::Alignment {
                    what: "length",
                    value,
                    alignment: BUFFER_VIEW_ALIGNMENT,
                });
            }
        }

        tracing::debug!(gpu_bytes, cpu_bytes, "allocating byte arena");

        Ok(Self {
            gpu: Buffer::new(BufferUsage::Gpu, gpu_bytes),
            cpu: Buffer::new(BufferUsage::Cpu, cpu_bytes),
        })
    }

    /// The buffer for `usage`.
    #[inline]
    #[must_use]
    pub fn buffer(&self, usage: BufferUsage) -> &Buffer {
        match usage {
            BufferUsage::Gpu => &self.gpu,
            BufferUsage::Cpu => &self.cpu,
        }
    }

    /// The buffer for `usage`, mutably.
    #[inline]
    pub fn buffer_mut(&mut self, usage: BufferUsage) -> &mut Buffer {
        match usage {
            BufferUsage::Gpu => &mut self.gpu,
            BufferUsage::Cpu => &mut self.cpu,
        }
    }

    /// Total capacity of both regions in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.gpu.capacity() + self.cpu.capacity()
    }

    /// Snapshot of how much of each region is taken.
    #[must_use]
    pub fn memory_usage(&self) -> MemoryUsage {
        let usage = MemoryUsage {
            gpu_used: self.gpu.used_bytes(),
            gpu_capacity: self.gpu.capacity(),
            cpu_used: self.cpu.used_bytes(),
            cpu_capacity: self.cpu.capacity(),
        };
        tracing::debug!(
            gpu_used = usage.gpu_used,
            gpu_capacity = usage.gpu_capacity,
            cpu_used = usage.cpu_used,
            cpu_capacity = usage.cpu_capacity,
            "arena memory usage"
        );
        usage
    }
}

/// Bytes taken per arena region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Bytes up to the GPU buffer's cursor.
    pub gpu_used: usize,
    /// GPU buffer capacity.
    pub gpu_capacity: usize,
    /// Bytes up to the CPU buffer's cursor.
    pub cpu_used: usize,
    /// CPU buffer capacity.
    pub cpu_capacity: usize,
}

impl MemoryUsage {
    /// Fraction of the GPU region in use (0.0 to 1.0).
    #[inline]
    #[must_use]
    pub fn gpu_ratio(&self) -> f32 {
        ratio(self.gpu_used, self.gpu_capacity)
    }

    /// Fraction of the CPU region in use (0.0 to 1.0).
    #[inline]
    #[must_use]
    pub fn cpu_ratio(&self) -> f32 {
        ratio(self.cpu_used, self.cpu_capacity)
    }
}

fn ratio(used: usize, capacity: usize) -> f32 {
    if capacity == 0 {
        0.0
    } else {
        used as f32 / capacity as f32
    }
}
