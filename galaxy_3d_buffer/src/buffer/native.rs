/// Hand-off of buffer bytes to the native graphics driver binding.
///
/// The driver layer only needs a stable base address, a byte length, and the
/// `(position, limit)` window. A `NativeWindow` is only valid inside the
/// closure passed to `with_native`, which keeps the storage borrowed for
/// exactly that long.

/// Borrowed view of a buffer's bytes for a driver call
#[derive(Debug, Clone, Copy)]
pub struct NativeWindow<'a> {
    bytes: &'a [u8],
    position: usize,
    limit: usize,
}

impl<'a> NativeWindow<'a> {
    pub(crate) fn new(bytes: &'a [u8], position: usize, limit: usize) -> Self {
        debug_assert!(position <= limit && limit <= bytes.len());
        Self { bytes, position, limit }
    }

    /// Base address of the buffer's storage
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// Total byte length (capacity in bytes)
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Cursor position in bytes
    pub fn position(&self) -> usize {
        self.position
    }

    /// Limit in bytes
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whole storage
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Bytes between position and limit (what a draw/upload call consumes)
    pub fn window(&self) -> &'a [u8] {
        &self.bytes[self.position..self.limit]
    }
}
