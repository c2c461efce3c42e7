/// Cursor/limit/mark protocol shared by every buffer.
///
/// `BufferState` holds the bookkeeping (capacity, position, limit, length,
/// mark, ceiling, flags) in the buffer's own unit: bytes for `ByteBuffer`,
/// elements for typed buffers. The `Buffer` trait exposes the protocol and
/// leaves storage-touching operations (resize, clear, compact, shrink) to
/// the concrete types.
///
/// Invariant after every public call:
/// `position <= limit <= capacity <= max_capacity` and `length <= capacity`.

use std::ops::Range;
use crate::error::{Error, Result};
use crate::buffer_bail;
use super::buffer_desc::BufferFlags;
use super::byte_order::ByteOrder;

const SOURCE: &str = "galaxy3d::Buffer";

/// `offset..offset + length` if it fits in a caller slice of `len` items
pub(crate) fn slice_range(len: usize, offset: usize, length: usize, source: &str) -> Result<Range<usize>> {
    match offset.checked_add(length) {
        Some(end) if end <= len => Ok(offset..end),
        _ => Err(crate::buffer_err!(source, Error::InvalidArgument(format!(
            "offset {} + length {} exceeds slice length {}", offset, length, len)))),
    }
}

// ===== BUFFER STATE =====

/// Bookkeeping of a buffer, in the buffer's own unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferState {
    capacity: usize,
    position: usize,
    limit: usize,
    length: usize,
    mark: Option<usize>,
    max_capacity: usize,
    flags: BufferFlags,
}

impl BufferState {
    pub(crate) fn new(capacity: usize, max_capacity: usize, flags: BufferFlags) -> Self {
        Self {
            capacity,
            position: 0,
            limit: capacity,
            length: 0,
            mark: None,
            max_capacity,
            flags,
        }
    }

    // ===== ACCESSORS =====

    pub fn capacity(&self) -> usize { self.capacity }
    pub fn position(&self) -> usize { self.position }
    pub fn limit(&self) -> usize { self.limit }
    pub fn length(&self) -> usize { self.length }
    pub fn mark(&self) -> Option<usize> { self.mark }
    pub fn max_capacity(&self) -> usize { self.max_capacity }
    pub fn flags(&self) -> BufferFlags { self.flags }

    // ===== CHECKS =====

    pub(crate) fn check_writable(&self, source: &str) -> Result<()> {
        if self.flags.contains(BufferFlags::READ_ONLY) {
            buffer_bail!(source, Error::ReadOnly);
        }
        Ok(())
    }

    /// `[index, index + count)` must lie below `limit`
    pub(crate) fn check_readable(&self, index: usize, count: usize, source: &str) -> Result<()> {
        match index.checked_add(count) {
            Some(end) if end <= self.limit => Ok(()),
            _ => Err(crate::buffer_err!(source, Error::OutOfRange { index, bound: self.limit })),
        }
    }

    /// `[index, index + count)` must lie below `capacity`
    pub(crate) fn check_in_capacity(&self, index: usize, count: usize, source: &str) -> Result<()> {
        match index.checked_add(count) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => Err(crate::buffer_err!(source, Error::OutOfRange { index, bound: self.capacity })),
        }
    }

    /// Capacity after growing by `extra`, or Overflow past the ceiling
    pub(crate) fn grown_capacity(&self, extra: usize, source: &str) -> Result<usize> {
        match self.capacity.checked_add(extra) {
            Some(capacity) if capacity <= self.max_capacity => Ok(capacity),
            _ => Err(crate::buffer_err!(source, Error::Overflow {
                required: self.capacity.saturating_add(extra),
                capacity: self.max_capacity,
            })),
        }
    }

    // ===== MUTATIONS =====

    /// Move the cursor forward after a sequential write of `count` units
    ///
    /// Raises `limit` and `length` when the write went past them.
    pub(crate) fn advance_write(&mut self, count: usize) {
        self.position += count;
        self.limit = self.limit.max(self.position);
        self.length = self.length.max(self.position);
        self.debug_check();
    }

    /// Move the cursor forward after a sequential read
    pub(crate) fn advance_read(&mut self, count: usize) {
        self.position += count;
        self.debug_check();
    }

    /// Raise the high-water mark to `end` (indexed writes)
    pub(crate) fn extend_length(&mut self, end: usize) {
        self.length = self.length.max(end);
        self.debug_check();
    }

    pub(crate) fn set_length(&mut self, length: usize) {
        self.length = length.min(self.capacity);
    }

    /// Grow capacity; `limit` follows only if it was at capacity
    pub(crate) fn grow(&mut self, extra: usize) {
        let limit_tracks_capacity = self.limit == self.capacity;
        self.capacity += extra;
        if limit_tracks_capacity {
            self.limit = self.capacity;
        }
        self.debug_check();
    }

    /// Cut capacity down to `capacity`, pulling limit/length/position along
    pub(crate) fn truncate(&mut self, capacity: usize) {
        if capacity >= self.capacity {
            return;
        }
        self.capacity = capacity;
        self.limit = self.limit.min(capacity);
        self.length = self.length.min(capacity);
        if self.position > self.limit {
            self.position = 0;
        }
        if self.mark.is_some_and(|mark| mark > self.position) {
            self.mark = None;
        }
        self.debug_check();
    }

    pub(crate) fn set_max_capacity(&mut self, max_capacity: usize) {
        self.truncate(max_capacity);
        self.max_capacity = max_capacity;
        self.debug_check();
    }

    /// Logical empty: position/length 0, limit at capacity, no mark
    pub(crate) fn reset_cursor(&mut self) {
        self.position = 0;
        self.limit = self.capacity;
        self.length = 0;
        self.mark = None;
    }

    /// Bookkeeping after moving `remaining` unread units to offset 0
    pub(crate) fn compact_to(&mut self, remaining: usize) {
        self.position = remaining;
        self.limit = self.capacity;
        self.length = remaining;
        self.mark = None;
        self.debug_check();
    }

    pub(crate) fn set_flag(&mut self, flag: BufferFlags, enabled: bool) {
        self.flags.set(flag, enabled);
    }

    fn flip(&mut self) {
        self.limit = self.position;
        self.position = 0;
        self.mark = None;
    }

    fn rewind(&mut self) {
        self.position = 0;
        self.mark = None;
    }

    fn set_mark(&mut self) {
        self.mark = Some(self.position);
    }

    fn reset(&mut self) -> Result<()> {
        match self.mark.take() {
            None => buffer_bail!(SOURCE,
                Error::InvalidState("reset() called without a prior mark()".to_string())),
            Some(mark) if mark > self.limit => buffer_bail!(SOURCE,
                Error::InvalidState(format!("mark {} is past limit {}", mark, self.limit))),
            Some(mark) => {
                self.position = mark;
                Ok(())
            }
        }
    }

    fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit {
            buffer_bail!(SOURCE, Error::OutOfRange { index: position, bound: self.limit });
        }
        self.position = position;
        if self.mark.is_some_and(|mark| mark > position) {
            self.mark = None;
        }
        Ok(())
    }

    fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit > self.capacity {
            buffer_bail!(SOURCE, Error::OutOfRange { index: limit, bound: self.capacity });
        }
        self.limit = limit;
        self.position = self.position.min(limit);
        if self.mark.is_some_and(|mark| mark > limit) {
            self.mark = None;
        }
        Ok(())
    }

    fn debug_check(&self) {
        debug_assert!(self.position <= self.limit, "position {} > limit {}", self.position, self.limit);
        debug_assert!(self.limit <= self.capacity, "limit {} > capacity {}", self.limit, self.capacity);
        debug_assert!(self.capacity <= self.max_capacity, "capacity {} > max {}", self.capacity, self.max_capacity);
        debug_assert!(self.length <= self.capacity, "length {} > capacity {}", self.length, self.capacity);
    }
}

// ===== BUFFER TRAIT =====

/// Cursor/limit/mark protocol implemented by `ByteBuffer` and `TypedBuffer<T>`
///
/// All quantities are in the implementor's own unit.
pub trait Buffer {
    /// Bookkeeping
    fn state(&self) -> &BufferState;

    /// Mutable bookkeeping
    fn state_mut(&mut self) -> &mut BufferState;

    /// Grow the backing storage by `extra` units, preserving its content
    ///
    /// # Errors
    ///
    /// - `ReadOnly` on a read-only buffer
    /// - `Overflow` if the new capacity exceeds `max_capacity`
    fn resize(&mut self, extra: usize) -> Result<()>;

    /// Zero the storage and logically empty the buffer
    fn clear(&mut self) -> Result<()>;

    /// Move the unread region `[position, limit)` to offset 0
    ///
    /// Afterwards `position = limit - old_position` and `limit = capacity`.
    fn compact(&mut self) -> Result<()>;

    /// Release storage past `limit`, then rewind
    fn shrink(&mut self) -> Result<()>;

    /// Change the capacity ceiling, truncating the buffer if it is now too large
    fn set_max_capacity(&mut self, max_capacity: usize) -> Result<()>;

    /// Byte order for multi-byte values
    fn order(&self) -> ByteOrder;

    /// Change the byte order for subsequent reads and writes
    fn set_order(&mut self, order: ByteOrder);

    // ===== PROVIDED =====

    fn capacity(&self) -> usize { self.state().capacity() }
    fn position(&self) -> usize { self.state().position() }
    fn limit(&self) -> usize { self.state().limit() }
    fn length(&self) -> usize { self.state().length() }
    fn max_capacity(&self) -> usize { self.state().max_capacity() }

    fn is_read_only(&self) -> bool { self.state().flags().contains(BufferFlags::READ_ONLY) }
    fn is_direct(&self) -> bool { self.state().flags().contains(BufferFlags::DIRECT) }
    fn auto_resize_enabled(&self) -> bool { self.state().flags().contains(BufferFlags::AUTO_RESIZE) }
    fn is_big_endian(&self) -> bool { self.order().is_big_endian() }

    fn set_read_only(&mut self, read_only: bool) {
        self.state_mut().set_flag(BufferFlags::READ_ONLY, read_only);
    }

    fn set_auto_resize(&mut self, enabled: bool) {
        self.state_mut().set_flag(BufferFlags::AUTO_RESIZE, enabled);
    }

    /// Units left between position and limit
    fn remaining(&self) -> usize {
        self.limit() - self.position()
    }

    fn has_remaining(&self) -> bool {
        self.position() < self.limit()
    }

    /// Switch from writing to reading: `limit = position`, `position = 0`
    fn flip(&mut self) {
        self.state_mut().flip();
    }

    /// `position = 0`, limit unchanged
    fn rewind(&mut self) {
        self.state_mut().rewind();
    }

    /// Remember the current position for `reset`
    fn mark(&mut self) {
        self.state_mut().set_mark();
    }

    /// Restore the position saved by `mark` and consume the mark
    ///
    /// # Errors
    ///
    /// `InvalidState` if no mark is set or the mark is past the limit.
    fn reset(&mut self) -> Result<()> {
        self.state_mut().reset()
    }

    fn set_position(&mut self, position: usize) -> Result<()> {
        self.state_mut().set_position(position)
    }

    fn set_limit(&mut self, limit: usize) -> Result<()> {
        self.state_mut().set_limit(limit)
    }

    /// Make sure `required` units fit, growing by exactly the deficit
    ///
    /// # Errors
    ///
    /// `Overflow` when auto-resize is disabled or `required` is above the ceiling.
    fn ensure_capacity(&mut self, required: usize) -> Result<()> {
        let capacity = self.capacity();
        if required <= capacity {
            return Ok(());
        }
        if !self.auto_resize_enabled() {
            buffer_bail!(SOURCE, Error::Overflow { required, capacity });
        }
        let max_capacity = self.max_capacity();
        if required > max_capacity {
            buffer_bail!(SOURCE, Error::Overflow { required, capacity: max_capacity });
        }
        self.resize(required - capacity)
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
