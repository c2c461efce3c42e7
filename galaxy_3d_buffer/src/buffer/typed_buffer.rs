//! Typed numeric buffers over a ByteBuffer.
//!
//! `TypedBuffer<T>` keeps its own bookkeeping in elements and holds exactly
//! one `ByteBuffer` in bytes. Every element index `i` becomes the byte offset
//! `i * T::SIZE` before the delegate is touched, so the two units never mix.
//!
//! The delegate is either private (standalone buffer from `new`, `from_desc`,
//! `wrap`) or a shared window created by `ByteBuffer::as_typed_buffer`, in
//! which case writes are visible through the owning `ByteBuffer` and any other
//! view over the same bytes.

use std::marker::PhantomData;
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::error::{Error, Result};
use crate::{buffer_bail, buffer_err};
use super::buffer::{self, Buffer, BufferState};
use super::buffer_desc::{BufferDesc, BufferFlags, DEFAULT_MAX_CAPACITY};
use super::byte_buffer::ByteBuffer;
use super::byte_order::ByteOrder;
use super::element::{self, Element};
use super::native::NativeWindow;

const SOURCE: &str = "galaxy3d::TypedBuffer";

/// 16-bit signed integer buffer
pub type ShortBuffer = TypedBuffer<i16>;

/// 32-bit signed integer buffer
pub type IntBuffer = TypedBuffer<i32>;

/// 32-bit float buffer
pub type FloatBuffer = TypedBuffer<f32>;

/// Buffer of fixed-width numeric elements
#[derive(Debug)]
pub struct TypedBuffer<T: Element> {
    state: BufferState,
    bytes: ByteBuffer,
    _element: PhantomData<T>,
}

impl<T: Element> TypedBuffer<T> {
    /// Zero-filled standalone buffer of `count` elements with default settings
    pub fn new(count: usize) -> Self {
        let state = BufferState::new(count, count.max(DEFAULT_MAX_CAPACITY), BufferFlags::default());
        let bytes = ByteBuffer::delegate(vec![0; count * T::SIZE], ByteOrder::native());
        Self::from_parts(state, bytes)
    }

    /// Create a standalone buffer from a descriptor (capacity in elements)
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `capacity` exceeds `max_capacity` or its byte size overflows.
    pub fn from_desc(desc: BufferDesc) -> Result<Self> {
        if desc.capacity > desc.max_capacity {
            buffer_bail!(SOURCE, Error::InvalidArgument(format!(
                "capacity {} exceeds max capacity {}", desc.capacity, desc.max_capacity)));
        }
        let byte_capacity = desc.capacity.checked_mul(T::SIZE)
            .ok_or_else(|| buffer_err!(SOURCE, Error::InvalidArgument(format!(
                "capacity {} is too large for {}-byte elements", desc.capacity, T::SIZE))))?;

        let state = BufferState::new(desc.capacity, desc.max_capacity, desc.flags);
        let bytes = ByteBuffer::delegate(vec![0; byte_capacity], desc.order);
        Ok(Self::from_parts(state, bytes))
    }

    /// Standalone buffer holding a copy of `values` (all counted as written)
    pub fn wrap(values: &[T]) -> Self {
        let count = values.len();
        let order = ByteOrder::native();
        let mut raw = vec![0; count * T::SIZE];
        element::encode_slice(values, &mut raw, order);

        let mut state = BufferState::new(count, count.max(DEFAULT_MAX_CAPACITY), BufferFlags::default());
        state.set_length(count);
        Self::from_parts(state, ByteBuffer::delegate(raw, order))
    }

    pub(crate) fn from_parts(state: BufferState, bytes: ByteBuffer) -> Self {
        debug_assert_eq!(bytes.capacity(), state.capacity() * T::SIZE);
        Self {
            state,
            bytes,
            _element: PhantomData,
        }
    }

    /// Whether the bytes are shared with another buffer
    pub fn is_shared(&self) -> bool {
        self.bytes.is_shared()
    }

    /// Whether the bytes are still reachable (false once a shared owner is gone)
    pub fn is_attached(&self) -> bool {
        self.bytes.is_attached()
    }

    // ===== SCALAR ACCESS =====

    /// Read the element at `position` and advance by one
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `position >= limit`
    /// - `Detached` if a shared owner is gone
    pub fn get(&mut self) -> Result<T> {
        let position = self.state.position();
        self.state.check_readable(position, 1, SOURCE)?;
        let value = self.bytes.load(position * T::SIZE)?;
        self.state.advance_read(1);
        Ok(value)
    }

    /// Read the element at `index`
    pub fn get_at(&self, index: usize) -> Result<T> {
        self.state.check_readable(index, 1, SOURCE)?;
        self.bytes.load(index * T::SIZE)
    }

    /// Write `value` at `position` and advance by one
    ///
    /// # Errors
    ///
    /// - `ReadOnly` on a read-only buffer
    /// - `Overflow` if the buffer is full and may not grow
    pub fn put(&mut self, value: T) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        let position = self.state.position();
        self.ensure_capacity(position.saturating_add(1))?;
        self.bytes.store(position * T::SIZE, value)?;
        self.state.advance_write(1);
        Ok(())
    }

    /// Write `value` at `index`; position is unchanged
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `index >= capacity`.
    pub fn put_at(&mut self, index: usize, value: T) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        self.state.check_in_capacity(index, 1, SOURCE)?;
        self.bytes.store(index * T::SIZE, value)?;
        self.state.extend_length(index + 1);
        Ok(())
    }

    // ===== BULK ACCESS =====

    /// Fill `dst` from `position`, advancing by `dst.len()`
    pub fn get_slice(&mut self, dst: &mut [T]) -> Result<()> {
        let position = self.state.position();
        self.state.check_readable(position, dst.len(), SOURCE)?;
        self.bytes.load_slice(position * T::SIZE, dst)?;
        self.state.advance_read(dst.len());
        Ok(())
    }

    /// Write all of `src` at `position`, advancing past it
    pub fn put_slice(&mut self, src: &[T]) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        let position = self.state.position();
        self.ensure_capacity(position.saturating_add(src.len()))?;
        self.bytes.store_slice(position * T::SIZE, src)?;
        self.state.advance_write(src.len());
        Ok(())
    }

    /// Read `length` elements into `dst[offset..offset + length]`
    pub fn get_range(&mut self, dst: &mut [T], offset: usize, length: usize) -> Result<()> {
        let range = buffer::slice_range(dst.len(), offset, length, SOURCE)?;
        self.get_slice(&mut dst[range])
    }

    /// Write `src[offset..offset + length]`
    pub fn put_range(&mut self, src: &[T], offset: usize, length: usize) -> Result<()> {
        let range = buffer::slice_range(src.len(), offset, length, SOURCE)?;
        self.put_slice(&src[range])
    }

    // ===== SNAPSHOTS / HAND-OFF =====

    /// Dense copy of the `length` written elements, from index 0
    pub fn to_vec(&self) -> Result<Vec<T>> {
        let mut values = vec![<T as bytemuck::Zeroable>::zeroed(); self.state.length()];
        self.bytes.load_slice(0, &mut values)?;
        Ok(values)
    }

    /// Lend the element storage to a driver call (window in bytes)
    pub fn with_native<R>(&self, f: impl FnOnce(NativeWindow<'_>) -> R) -> Result<R> {
        self.bytes.with_native_range(
            0,
            self.state.capacity() * T::SIZE,
            self.state.position() * T::SIZE,
            self.state.limit() * T::SIZE,
            f,
        )
    }
}

impl<T: Element> Buffer for TypedBuffer<T> {
    fn state(&self) -> &BufferState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BufferState {
        &mut self.state
    }

    fn resize(&mut self, extra: usize) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        self.state.grown_capacity(extra, SOURCE)?;
        let extra_bytes = extra.checked_mul(T::SIZE)
            .ok_or_else(|| buffer_err!(SOURCE, Error::Overflow {
                required: usize::MAX,
                capacity: self.state.max_capacity(),
            }))?;

        self.bytes.resize(extra_bytes)?;
        let capacity = self.bytes.capacity().div_ceil(T::SIZE);
        self.state.grow(capacity - self.state.capacity());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        self.bytes.clear()?;
        self.state.reset_cursor();
        Ok(())
    }

    fn compact(&mut self) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        let (position, limit) = (self.state.position(), self.state.limit());
        self.bytes.copy_within(position * T::SIZE..limit * T::SIZE, 0)?;
        self.state.compact_to(limit - position);
        Ok(())
    }

    fn shrink(&mut self) -> Result<()> {
        self.state.check_writable(SOURCE)?;
        let limit = self.state.limit();
        if limit < self.state.capacity() {
            self.bytes.truncate_capacity(limit * T::SIZE)?;
            self.state.truncate(limit);
        }
        self.rewind();
        Ok(())
    }

    fn set_max_capacity(&mut self, max_capacity: usize) -> Result<()> {
        if max_capacity < self.state.capacity() {
            self.state.check_writable(SOURCE)?;
            self.bytes.truncate_capacity(max_capacity * T::SIZE)?;
        }
        self.state.set_max_capacity(max_capacity);
        Ok(())
    }

    fn order(&self) -> ByteOrder {
        self.bytes.order()
    }

    fn set_order(&mut self, order: ByteOrder) {
        self.bytes.set_order(order);
    }
}

// ===== VECTOR / MATRIX HELPERS =====

impl TypedBuffer<f32> {
    pub fn put_vec2(&mut self, value: Vec2) -> Result<()> {
        self.put_slice(&value.to_array())
    }

    pub fn put_vec3(&mut self, value: Vec3) -> Result<()> {
        self.put_slice(&value.to_array())
    }

    pub fn put_vec4(&mut self, value: Vec4) -> Result<()> {
        self.put_slice(&value.to_array())
    }

    /// Write a matrix as 16 floats, column-major
    pub fn put_mat4(&mut self, value: &Mat4) -> Result<()> {
        self.put_slice(&value.to_cols_array())
    }

    /// Write tightly packed vec2s (e.g. UVs)
    pub fn put_vec2s(&mut self, values: &[Vec2]) -> Result<()> {
        self.put_slice(bytemuck::cast_slice::<Vec2, f32>(values))
    }

    /// Write tightly packed vec3s (e.g. positions, normals)
    pub fn put_vec3s(&mut self, values: &[Vec3]) -> Result<()> {
        self.put_slice(bytemuck::cast_slice::<Vec3, f32>(values))
    }

    pub fn get_vec2(&mut self) -> Result<Vec2> {
        let mut values = [0.0; 2];
        self.get_slice(&mut values)?;
        Ok(Vec2::from_array(values))
    }

    pub fn get_vec3(&mut self) -> Result<Vec3> {
        let mut values = [0.0; 3];
        self.get_slice(&mut values)?;
        Ok(Vec3::from_array(values))
    }

    pub fn get_vec4(&mut self) -> Result<Vec4> {
        let mut values = [0.0; 4];
        self.get_slice(&mut values)?;
        Ok(Vec4::from_array(values))
    }

    /// Read 16 floats as a column-major matrix
    pub fn get_mat4(&mut self) -> Result<Mat4> {
        let mut values = [0.0; 16];
        self.get_slice(&mut values)?;
        Ok(Mat4::from_cols_array(&values))
    }
}

#[cfg(test)]
#[path = "typed_buffer_tests.rs"]
mod tests;
