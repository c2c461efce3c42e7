//! Byte-addressable buffer owning a contiguous byte region.
//!
//! A `ByteBuffer` either owns its region (standalone, `wrap`) or addresses a
//! window of a region owned by another `ByteBuffer` (the delegate inside a
//! shared typed view). Owned regions are reference counted; shared windows
//! only hold a weak handle, so a view never keeps its owner's bytes alive and
//! every access through a view re-checks that the owner is still there.
//!
//! Multi-byte values are encoded with the buffer's byte order. Sequential
//! accessors move `position`; `_at` accessors take an absolute byte index and
//! leave the cursor alone.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::{Rc, Weak};
use crate::error::{Error, Result};
use crate::{buffer_bail, buffer_debug, buffer_err, buffer_warn};
use super::buffer::{self, Buffer, BufferState};
use super::buffer_desc::{BufferDesc, BufferFlags, DEFAULT_MAX_CAPACITY};
use super::byte_order::ByteOrder;
use super::element::{self, Element};
use super::native::NativeWindow;
use super::typed_buffer::{FloatBuffer, IntBuffer, ShortBuffer, TypedBuffer};

const SOURCE: &str = "galaxy3d::ByteBuffer";

type Region = Rc<RefCell<Vec<u8>>>;

// ===== STORAGE =====

#[derive(Debug)]
enum Storage {
    /// Region owned by this buffer
    Owned(Region),
    /// Window of a region owned elsewhere, starting at `offset`
    Shared {
        region: Weak<RefCell<Vec<u8>>>,
        offset: usize,
    },
}

impl Storage {
    fn owned(bytes: Vec<u8>) -> Self {
        Storage::Owned(Rc::new(RefCell::new(bytes)))
    }

    /// Strong handle on the region plus the byte offset of this window
    fn region(&self) -> Result<(Region, usize)> {
        match self {
            Storage::Owned(region) => Ok((Rc::clone(region), 0)),
            Storage::Shared { region, offset } => region
                .upgrade()
                .map(|region| (region, *offset))
                .ok_or_else(|| buffer_err!(SOURCE, Error::Detached)),
        }
    }

    fn is_shared(&self) -> bool {
        matches!(self, Storage::Shared { .. })
    }
}

/// Storage is borrowed by a `with_native` call still in progress
fn lent_error() -> Error {
    buffer_err!(SOURCE, Error::InvalidState("storage is lent to a driver call".to_string()))
}

// ===== BYTE BUFFER =====

/// Byte buffer with cursor bookkeeping, endianness-aware numeric access and
/// typed-view factories
#[derive(Debug)]
pub struct ByteBuffer {
    state: BufferState,
    order: ByteOrder,
    storage: Storage,
}

impl ByteBuffer {
    /// Zero-filled buffer of `capacity` bytes with default settings
    ///
    /// The ceiling is raised to `capacity` if it is larger than the default.
    pub fn new(capacity: usize) -> Self {
        let desc = BufferDesc::with_capacity(capacity);
        Self {
            state: BufferState::new(capacity, capacity.max(DEFAULT_MAX_CAPACITY), desc.flags),
            order: desc.order,
            storage: Storage::owned(vec![0; capacity]),
        }
    }

    /// Create a buffer from a descriptor
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `capacity` exceeds `max_capacity`.
    pub fn from_desc(desc: BufferDesc) -> Result<Self> {
        if desc.capacity > desc.max_capacity {
            buffer_bail!(SOURCE, Error::InvalidArgument(format!(
                "capacity {} exceeds max capacity {}", desc.capacity, desc.max_capacity)));
        }
        Ok(Self {
            state: BufferState::new(desc.capacity, desc.max_capacity, desc.flags),
            order: desc.order,
            storage: Storage::owned(vec![0; desc.capacity]),
        })
    }

    /// Private delegate of a standalone typed buffer
    ///
    /// The typed buffer enforces its own policy, so the delegate may always grow.
    pub(crate) fn delegate(bytes: Vec<u8>, order: ByteOrder) -> Self {
        let mut state = BufferState::new(bytes.len(), usize::MAX, BufferFlags::AUTO_RESIZE);
        state.set_length(bytes.len());
        Self {
            state,
            order,
            storage: Storage::owned(bytes),
        }
    }

    /// New buffer holding a copy of `bytes`
    ///
    /// Later changes to `bytes` are not visible through the buffer.
    pub fn wrap(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    /// Take ownership of `bytes` without copying (all counted as written)
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let capacity = bytes.len();
        let mut state = BufferState::new(
            capacity,
            capacity.max(DEFAULT_MAX_CAPACITY),
            BufferFlags::default(),
        );
        state.set_length(capacity);
        Self {
            state,
            order: ByteOrder::native(),
            storage: Storage::owned(bytes),
        }
    }

    /// New buffer holding a copy of `bytes[offset..offset + length]`
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the range falls outside `bytes`.
    pub fn wrap_range(bytes: &[u8], offset: usize, length: usize) -> Result<Self> {
        let range = buffer::slice_range(bytes.len(), offset, length, SOURCE)?;
        Ok(Self::wrap(&bytes[range]))
    }

    // ===== STORAGE ACCESS =====

    /// Whether this buffer addresses another buffer's region
    pub fn is_shared(&self) -> bool {
        self.storage.is_shared()
    }

    /// Whether the storage is still reachable (always true for owned storage)
    pub fn is_attached(&self) -> bool {
        match &self.storage {
            Storage::Owned(_) => true,
            Storage::Shared { region, offset } => region.upgrade().is_some_and(|region| {
                let available = region.try_borrow().map(|bytes| bytes.len()).unwrap_or(0);
                available >= offset + self.state.capacity()
            }),
        }
    }

    fn with_bytes<R>(&self, start: usize, len: usize, f: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let (handle, offset) = self.storage.region()?;
        let region = handle.try_borrow().map_err(|_| lent_error())?;
        let begin = offset + start;
        match region.get(begin..begin + len) {
            Some(bytes) => Ok(f(bytes)),
            None => buffer_bail!(SOURCE, Error::Detached),
        }
    }

    fn with_bytes_mut<R>(&mut self, start: usize, len: usize, f: impl FnOnce(&mut [u8]) -> R) -> Result<R> {
        let (handle, offset) = self.storage.region()?;
        let mut region = handle.try_borrow_mut().map_err(|_| lent_error())?;
        let begin = offset + start;
        match region.get_mut(begin..begin + len) {
            Some(bytes) => Ok(f(bytes)),
            None => buffer_bail!(SOURCE, Error::Detached),
        }
    }

    /// Decode one value at an absolute byte index (no cursor checks)
    pub(crate) fn load<T: Element>(&self, byte_index: usize) -> Result<T> {
        let order = self.order;
        self.with_bytes(byte_index, T::SIZE, |bytes| T::decode(bytes, order))
    }

    /// Encode one value at an absolute byte index (no cursor checks)
    pub(crate) fn store<T: Element>(&mut self, byte_index: usize, value: T) -> Result<()> {
        let order = self.order;
        self.with_bytes_mut(byte_index, T::SIZE, |bytes| value.encode(bytes, order))
    }

    pub(crate) fn load_slice<T: Element>(&self, byte_index: usize, dst: &mut [T]) -> Result<()> {
        let order = self.order;
        self.with_bytes(byte_index, dst.len() * T::SIZE, |bytes| {
            element::decode_slice(bytes, dst, order)
        })
    }

    pub(crate) fn store_slice<T: Element>(&mut self, byte_index: usize, src: &[T]) -> Result<()> {
        let order = self.order;
        self.with_bytes_mut(byte_index, src.len() * T::SIZE, |bytes| {
            element::encode_slice(src, bytes, order)
        })
    }

    /// Move `src` (byte range) so that it starts at `dest`
    pub(crate) fn copy_within(&mut self, src: Range<usize>, dest: usize) -> Result<()> {
        let capacity = self.state.capacity();
        self.with_bytes_mut(0, capacity, |bytes| bytes.copy_within(src, dest))
    }

    /// Zero the whole window
    pub(crate) fn zero(&mut self) -> Result<()> {
        let capacity = self.state.capacity();
        self.with_bytes_mut(0, capacity, |bytes| bytes.fill(0))
    }

    /// Cut capacity (and owned storage) down to `capacity` bytes
    pub(crate) fn truncate_capacity(&mut self, capacity: usize) -> Result<()> {
        let old_capacity = self.state.capacity();
        if capacity >= old_capacity {
            return Ok(());
        }
        if let Storage::Owned(region) = &self.storage {
            let mut bytes = region.try_borrow_mut().map_err(|_| lent_error())?;
            bytes.truncate(capacity);
            bytes.shrink_to_fit();
        }
        self.state.truncate(capacity);
        buffer_debug!(SOURCE, "Truncated from {} to {} bytes", old_capacity, capacity);
        Ok(())
    }

    // ===== GENERIC ACCESS =====

    /// Read one value at `position` and advance by its width
    ///
    /// # Errors
    ///
    /// `OutOfRange` if the value does not fit before `limit`.
    pub fn get<T: Element>(&mut self) -> Result<T> {
        let position = self.state.position();
        self.state.check_readable(position, T::SIZE, SOURCE)?;
        let value = self.load(position)?;
        self.state.advance_read(T::SIZE);
        Ok(value)
    }

    /// Read one value at byte `index`
    pub fn get_at<T: Element>(&self, index: usize) -> Result<T> {
        self.state.check_readable(index, T::SIZE, SOURCE)?;
        self.load(index)
    }

    /// Write one value at `position` and advance by its width
    ///
    /// Grows the buffer first when auto-resize is enabled.
    ///
    /// # Errors
    ///
    /// - `ReadOnly` on a read-only buffer
    /// - `Overflow` if the value does not fit and the buffer may not grow
    pub fn put<T: Element>(&mut self, value: T) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        let position = self.state.position();
        self.ensure_capacity(position.saturating_add(T::SIZE))?;
        self.store(position, value)?;
        self.state.advance_write(T::SIZE);
        Ok(())
    }

    /// Write one value at byte `index`; position is unchanged
    ///
    /// Raises `length` when the write ends past it.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if the value does not fit below `capacity`.
    pub fn put_at<T: Element>(&mut self, index: usize, value: T) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        self.state.check_in_capacity(index, T::SIZE, SOURCE)?;
        self.store(index, value)?;
        self.state.extend_length(index + T::SIZE);
        Ok(())
    }

    /// Fill `dst` from `position`, advancing by `dst.len() * T::SIZE` bytes
    pub fn get_slice<T: Element>(&mut self, dst: &mut [T]) -> Result<()> {
        let position = self.state.position();
        let byte_len = dst.len() * T::SIZE;
        self.state.check_readable(position, byte_len, SOURCE)?;
        self.load_slice(position, dst)?;
        self.state.advance_read(byte_len);
        Ok(())
    }

    /// Write all of `src` at `position`, advancing past it
    pub fn put_slice<T: Element>(&mut self, src: &[T]) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        let position = self.state.position();
        let byte_len = src.len() * T::SIZE;
        self.ensure_capacity(position.saturating_add(byte_len))?;
        self.store_slice(position, src)?;
        self.state.advance_write(byte_len);
        Ok(())
    }

    /// Read `length` values into `dst[offset..offset + length]`
    pub fn get_range<T: Element>(&mut self, dst: &mut [T], offset: usize, length: usize) -> Result<()> {
        let range = buffer::slice_range(dst.len(), offset, length, SOURCE)?;
        self.get_slice(&mut dst[range])
    }

    /// Write `src[offset..offset + length]`
    pub fn put_range<T: Element>(&mut self, src: &[T], offset: usize, length: usize) -> Result<()> {
        let range = buffer::slice_range(src.len(), offset, length, SOURCE)?;
        self.put_slice(&src[range])
    }

    // ===== BYTES =====

    pub fn get_byte(&mut self) -> Result<u8> { self.get() }
    pub fn get_byte_at(&self, index: usize) -> Result<u8> { self.get_at(index) }
    pub fn put_byte(&mut self, value: u8) -> Result<()> { self.put(value) }
    pub fn put_byte_at(&mut self, index: usize, value: u8) -> Result<()> { self.put_at(index, value) }

    /// Copy `length` bytes into `dst[offset..]`
    pub fn get_bytes(&mut self, dst: &mut [u8], offset: usize, length: usize) -> Result<()> {
        self.get_range(dst, offset, length)
    }

    /// Copy `length` bytes from `src[offset..]`
    pub fn put_bytes(&mut self, src: &[u8], offset: usize, length: usize) -> Result<()> {
        self.put_range(src, offset, length)
    }

    // ===== SHORTS =====

    pub fn get_short(&mut self) -> Result<i16> { self.get() }
    pub fn get_short_at(&self, index: usize) -> Result<i16> { self.get_at(index) }
    pub fn put_short(&mut self, value: i16) -> Result<()> { self.put(value) }
    pub fn put_short_at(&mut self, index: usize, value: i16) -> Result<()> { self.put_at(index, value) }

    pub fn get_shorts(&mut self, dst: &mut [i16], offset: usize, length: usize) -> Result<()> {
        self.get_range(dst, offset, length)
    }

    pub fn put_shorts(&mut self, src: &[i16], offset: usize, length: usize) -> Result<()> {
        self.put_range(src, offset, length)
    }

    // ===== INTS =====

    pub fn get_int(&mut self) -> Result<i32> { self.get() }
    pub fn get_int_at(&self, index: usize) -> Result<i32> { self.get_at(index) }
    pub fn put_int(&mut self, value: i32) -> Result<()> { self.put(value) }
    pub fn put_int_at(&mut self, index: usize, value: i32) -> Result<()> { self.put_at(index, value) }

    pub fn get_ints(&mut self, dst: &mut [i32], offset: usize, length: usize) -> Result<()> {
        self.get_range(dst, offset, length)
    }

    pub fn put_ints(&mut self, src: &[i32], offset: usize, length: usize) -> Result<()> {
        self.put_range(src, offset, length)
    }

    // ===== FLOATS =====

    pub fn get_float(&mut self) -> Result<f32> { self.get() }
    pub fn get_float_at(&self, index: usize) -> Result<f32> { self.get_at(index) }
    pub fn put_float(&mut self, value: f32) -> Result<()> { self.put(value) }
    pub fn put_float_at(&mut self, index: usize, value: f32) -> Result<()> { self.put_at(index, value) }

    pub fn get_floats(&mut self, dst: &mut [f32], offset: usize, length: usize) -> Result<()> {
        self.get_range(dst, offset, length)
    }

    pub fn put_floats(&mut self, src: &[f32], offset: usize, length: usize) -> Result<()> {
        self.put_range(src, offset, length)
    }

    // ===== 64-BIT =====

    pub fn get_long(&mut self) -> Result<i64> { self.get() }
    pub fn get_long_at(&self, index: usize) -> Result<i64> { self.get_at(index) }
    pub fn put_long(&mut self, value: i64) -> Result<()> { self.put(value) }
    pub fn put_long_at(&mut self, index: usize, value: i64) -> Result<()> { self.put_at(index, value) }

    pub fn get_double(&mut self) -> Result<f64> { self.get() }
    pub fn get_double_at(&self, index: usize) -> Result<f64> { self.get_at(index) }
    pub fn put_double(&mut self, value: f64) -> Result<()> { self.put(value) }
    pub fn put_double_at(&mut self, index: usize, value: f64) -> Result<()> { self.put_at(index, value) }

    // ===== VIEWS =====

    /// Typed view aliasing this buffer's bytes
    ///
    /// The view has `capacity / T::SIZE` elements, `length / T::SIZE` of them
    /// counted as written, and the same byte order. Writes through either side
    /// are visible to the other. Auto-resize is off on the view: growing it
    /// would copy it out of the shared region.
    ///
    /// # Errors
    ///
    /// `Detached` if this buffer is itself a view whose owner is gone.
    pub fn as_typed_buffer<T: Element>(&self) -> Result<TypedBuffer<T>> {
        self.as_typed_buffer_at(0, self.state.capacity() / T::SIZE)
    }

    /// Typed view of `count` elements starting at byte `byte_offset`
    ///
    /// Views at different offsets may overlap and observe each other's
    /// writes. `byte_offset` need not be a multiple of `T::SIZE`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `byte_offset + count * T::SIZE` exceeds capacity
    /// - `Detached` if this buffer is itself a view whose owner is gone
    pub fn as_typed_buffer_at<T: Element>(&self, byte_offset: usize, count: usize) -> Result<TypedBuffer<T>> {
        let end = count.checked_mul(T::SIZE)
            .and_then(|len| len.checked_add(byte_offset))
            .filter(|&end| end <= self.state.capacity());
        if end.is_none() {
            buffer_bail!(SOURCE, Error::InvalidArgument(format!(
                "{} elements of {} bytes at offset {} exceed capacity {}",
                count, T::SIZE, byte_offset, self.state.capacity())));
        }
        let (region, offset) = self.storage.region()?;

        let bytes = ByteBuffer {
            state: BufferState::new(count * T::SIZE, usize::MAX, BufferFlags::AUTO_RESIZE),
            order: self.order,
            storage: Storage::Shared {
                region: Rc::downgrade(&region),
                offset: offset + byte_offset,
            },
        };

        let mut flags = self.state.flags();
        flags.remove(BufferFlags::AUTO_RESIZE);
        let max_capacity = (self.state.max_capacity() / T::SIZE).max(count);
        let mut state = BufferState::new(count, max_capacity, flags);
        state.set_length((self.state.length().saturating_sub(byte_offset) / T::SIZE).min(count));

        Ok(TypedBuffer::from_parts(state, bytes))
    }

    /// 16-bit view over this buffer's bytes
    pub fn as_short_buffer(&self) -> Result<ShortBuffer> {
        self.as_typed_buffer()
    }

    /// 32-bit integer view over this buffer's bytes
    pub fn as_int_buffer(&self) -> Result<IntBuffer> {
        self.as_typed_buffer()
    }

    /// 32-bit float view over this buffer's bytes
    pub fn as_float_buffer(&self) -> Result<FloatBuffer> {
        self.as_typed_buffer()
    }

    // ===== SNAPSHOTS / HAND-OFF =====

    /// Copy of the written bytes `[0, length)`
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        self.with_bytes(0, self.state.length(), |bytes| bytes.to_vec())
    }

    /// Lend the storage to a driver call
    pub fn with_native<R>(&self, f: impl FnOnce(NativeWindow<'_>) -> R) -> Result<R> {
        let (position, limit) = (self.state.position(), self.state.limit());
        self.with_bytes(0, self.state.capacity(), |bytes| f(NativeWindow::new(bytes, position, limit)))
    }

    /// Lend a byte window `[start, start + len)` to a driver call (typed views)
    pub(crate) fn with_native_range<R>(
        &self,
        start: usize,
        len: usize,
        position: usize,
        limit: usize,
        f: impl FnOnce(NativeWindow<'_>) -> R,
    ) -> Result<R> {
        self.with_bytes(start, len, |bytes| f(NativeWindow::new(bytes, position, limit)))
    }
}

impl Buffer for ByteBuffer {
    fn state(&self) -> &BufferState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BufferState {
        &mut self.state
    }

    fn resize(&mut self, extra: usize) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        let old_capacity = self.state.capacity();
        let new_capacity = self.state.grown_capacity(extra, SOURCE)?;

        if self.storage.is_shared() {
            // Growing a window copies it out of the shared region
            let mut bytes = self.with_bytes(0, old_capacity, |bytes| bytes.to_vec())?;
            bytes.resize(new_capacity, 0);
            self.storage = Storage::owned(bytes);
            buffer_warn!(SOURCE, "Shared window copied into {} owned bytes; it no longer aliases its owner",
                new_capacity);
        } else if let Storage::Owned(region) = &self.storage {
            region.try_borrow_mut().map_err(|_| lent_error())?.resize(new_capacity, 0);
        }

        self.state.grow(extra);
        buffer_debug!(SOURCE, "Resized from {} to {} bytes", old_capacity, new_capacity);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        self.zero()?;
        self.state.reset_cursor();
        Ok(())
    }

    fn compact(&mut self) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        let (position, limit) = (self.state.position(), self.state.limit());
        self.copy_within(position..limit, 0)?;
        self.state.compact_to(limit - position);
        Ok(())
    }

    fn shrink(&mut self) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        let limit = self.state.limit();
        self.truncate_capacity(limit)?;
        self.rewind();
        Ok(())
    }

    fn set_max_capacity(&mut self, max_capacity: usize) -> Result<()> {
        if max_capacity < self.state.capacity() {
            self.state.check_writable(SOURCE)?;
            self.truncate_capacity(max_capacity)?;
        }
        self.state.set_max_capacity(max_capacity);
        Ok(())
    }

    fn order(&self) -> ByteOrder {
        self.order
    }

    fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }
}

#[cfg(test)]
#[path = "byte_buffer_tests.rs"]
mod tests;
