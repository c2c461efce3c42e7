/// Numeric element types storable in a buffer
///
/// Every element knows its byte width and how to encode/decode itself in a
/// given byte order. Typed views are generic over this trait, so the element
/// width drives every index-to-byte-offset conversion.

use std::fmt::Debug;
use bytemuck::Pod;
use super::byte_order::ByteOrder;

/// Fixed-width numeric element (i8 through f64)
pub trait Element: Pod + PartialEq + Debug {
    /// Width in bytes
    const SIZE: usize;

    /// Decode one value from the first `SIZE` bytes of `bytes`
    fn decode(bytes: &[u8], order: ByteOrder) -> Self;

    /// Encode one value into the first `SIZE` bytes of `bytes`
    fn encode(self, bytes: &mut [u8], order: ByteOrder);
}

macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn decode(bytes: &[u8], order: ByteOrder) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    match order {
                        ByteOrder::BigEndian => <$ty>::from_be_bytes(raw),
                        ByteOrder::LittleEndian => <$ty>::from_le_bytes(raw),
                    }
                }

                #[inline]
                fn encode(self, bytes: &mut [u8], order: ByteOrder) {
                    let raw = match order {
                        ByteOrder::BigEndian => self.to_be_bytes(),
                        ByteOrder::LittleEndian => self.to_le_bytes(),
                    };
                    bytes[..Self::SIZE].copy_from_slice(&raw);
                }
            }
        )*
    };
}

impl_element!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

/// Encode `src` into `dst` (`dst.len() == src.len() * T::SIZE`)
///
/// Native order is a plain byte copy.
pub(crate) fn encode_slice<T: Element>(src: &[T], dst: &mut [u8], order: ByteOrder) {
    debug_assert_eq!(dst.len(), src.len() * T::SIZE);
    if order.is_native() {
        dst.copy_from_slice(bytemuck::cast_slice(src));
    } else {
        for (value, chunk) in src.iter().zip(dst.chunks_exact_mut(T::SIZE)) {
            value.encode(chunk, order);
        }
    }
}

/// Decode `src` into `dst` (`src.len() == dst.len() * T::SIZE`)
pub(crate) fn decode_slice<T: Element>(src: &[u8], dst: &mut [T], order: ByteOrder) {
    debug_assert_eq!(src.len(), dst.len() * T::SIZE);
    if order.is_native() {
        bytemuck::cast_slice_mut::<T, u8>(dst).copy_from_slice(src);
    } else {
        for (value, chunk) in dst.iter_mut().zip(src.chunks_exact(T::SIZE)) {
            *value = T::decode(chunk, order);
        }
    }
}

#[cfg(test)]
#[path = "element_tests.rs"]
mod tests;
