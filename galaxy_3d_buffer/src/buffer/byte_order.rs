/// Byte order used when encoding and decoding multi-byte values

/// Endianness of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most-significant byte first
    BigEndian,
    /// Least-significant byte first
    LittleEndian,
}

impl ByteOrder {
    /// Byte order of the host CPU
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Whether this is the host CPU's byte order
    pub fn is_native(self) -> bool {
        self == Self::native()
    }

    /// Whether this is big-endian
    pub fn is_big_endian(self) -> bool {
        self == ByteOrder::BigEndian
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}
