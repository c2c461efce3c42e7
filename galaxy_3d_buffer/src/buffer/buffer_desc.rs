/// Buffer configuration: descriptor and per-instance flags

use bitflags::bitflags;
use super::byte_order::ByteOrder;

/// Default safety ceiling on capacity (in the buffer's own unit)
pub const DEFAULT_MAX_CAPACITY: usize = 256 * 1024 * 1024;

bitflags! {
    /// Per-instance buffer behavior
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferFlags: u32 {
        /// Every mutating call fails with `Error::ReadOnly`
        const READ_ONLY   = 1 << 0;
        /// Intended for direct hand-off to the graphics driver
        const DIRECT      = 1 << 1;
        /// Writes past capacity grow the buffer instead of failing
        const AUTO_RESIZE = 1 << 2;
    }
}

impl Default for BufferFlags {
    fn default() -> Self {
        BufferFlags::AUTO_RESIZE
    }
}

/// Descriptor for creating a ByteBuffer or typed buffer
///
/// `capacity` and `max_capacity` are in the buffer's own unit:
/// bytes for `ByteBuffer`, elements for typed buffers.
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Initial capacity
    pub capacity: usize,
    /// Byte order for multi-byte values
    pub order: ByteOrder,
    /// Behavior flags
    pub flags: BufferFlags,
    /// Hard ceiling on capacity
    pub max_capacity: usize,
}

impl BufferDesc {
    /// Descriptor with the given capacity and default settings
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }
}

impl Default for BufferDesc {
    fn default() -> Self {
        Self {
            capacity: 0,
            order: ByteOrder::native(),
            flags: BufferFlags::default(),
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}
