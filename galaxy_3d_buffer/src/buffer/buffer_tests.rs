//! Unit tests for the Buffer protocol
//!
//! Exercised through ByteBuffer and IntBuffer: cursor moves, mark/reset,
//! bounds checks, growth policy and ceiling truncation.

use super::*;
use crate::buffer::{BufferDesc, ByteBuffer, IntBuffer};

// ============================================================================
// Helpers
// ============================================================================

fn assert_invariants<B: Buffer>(buffer: &B) {
    assert!(buffer.position() <= buffer.limit());
    assert!(buffer.limit() <= buffer.capacity());
    assert!(buffer.capacity() <= buffer.max_capacity());
    assert!(buffer.length() <= buffer.capacity());
}

fn fixed(capacity: usize) -> ByteBuffer {
    ByteBuffer::from_desc(BufferDesc {
        capacity,
        flags: BufferFlags::empty(),
        ..BufferDesc::default()
    }).unwrap()
}

// ============================================================================
// Initial state
// ============================================================================

#[test]
fn test_new_buffer_state() {
    let buffer = ByteBuffer::new(16);
    assert_eq!(buffer.capacity(), 16);
    assert_eq!(buffer.position(), 0);
    assert_eq!(buffer.limit(), 16);
    assert_eq!(buffer.length(), 0);
    assert_eq!(buffer.state().mark(), None);
    assert!(buffer.auto_resize_enabled());
    assert!(!buffer.is_read_only());
    assert!(!buffer.is_direct());
}

// ============================================================================
// flip / rewind / remaining
// ============================================================================

#[test]
fn test_flip_sets_limit_to_position() {
    let mut buffer = ByteBuffer::new(16);
    buffer.put_int(1).unwrap();
    buffer.put_int(2).unwrap();
    buffer.put_int(3).unwrap();
    assert_eq!(buffer.position(), 12);

    buffer.flip();
    assert_eq!(buffer.position(), 0);
    assert_eq!(buffer.limit(), 12);
    assert_eq!(buffer.remaining(), 12);
    assert!(buffer.has_remaining());
}

#[test]
fn test_rewind_keeps_limit() {
    let mut buffer = ByteBuffer::new(16);
    buffer.put_int(1).unwrap();
    buffer.flip();
    buffer.get_int().unwrap();
    assert!(!buffer.has_remaining());

    buffer.rewind();
    assert_eq!(buffer.position(), 0);
    assert_eq!(buffer.limit(), 4);
    assert_eq!(buffer.get_int().unwrap(), 1);
}

// ============================================================================
// mark / reset
// ============================================================================

#[test]
fn test_mark_reset_restores_position() {
    let mut buffer = ByteBuffer::new(16);
    buffer.put_int(1).unwrap();
    buffer.mark();
    buffer.put_int(2).unwrap();
    buffer.put_int(3).unwrap();

    buffer.reset().unwrap();
    assert_eq!(buffer.position(), 4);
}

#[test]
fn test_second_reset_fails() {
    let mut buffer = ByteBuffer::new(16);
    buffer.mark();
    buffer.reset().unwrap();
    assert!(matches!(buffer.reset(), Err(Error::InvalidState(_))));
}

#[test]
fn test_reset_without_mark_fails() {
    let mut buffer = ByteBuffer::new(4);
    assert!(matches!(buffer.reset(), Err(Error::InvalidState(_))));
}

#[test]
fn test_flip_discards_mark() {
    let mut buffer = ByteBuffer::new(8);
    buffer.put_int(1).unwrap();
    buffer.mark();
    buffer.flip();
    assert!(matches!(buffer.reset(), Err(Error::InvalidState(_))));
}

#[test]
fn test_set_limit_below_mark_discards_mark() {
    let mut buffer = ByteBuffer::new(16);
    buffer.set_position(8).unwrap();
    buffer.mark();
    buffer.set_limit(4).unwrap();
    assert_eq!(buffer.position(), 4);
    assert_eq!(buffer.state().mark(), None);
}

// ============================================================================
// set_position / set_limit
// ============================================================================

#[test]
fn test_set_position_past_limit_fails() {
    let mut buffer = ByteBuffer::new(8);
    buffer.set_limit(4).unwrap();
    assert_eq!(buffer.set_position(5), Err(Error::OutOfRange { index: 5, bound: 4 }));
    assert_eq!(buffer.position(), 0);
}

#[test]
fn test_set_limit_past_capacity_fails() {
    let mut buffer = ByteBuffer::new(8);
    assert_eq!(buffer.set_limit(9), Err(Error::OutOfRange { index: 9, bound: 8 }));
    assert_eq!(buffer.limit(), 8);
}

// ============================================================================
// ensure_capacity / resize policy
// ============================================================================

#[test]
fn test_ensure_capacity_grows_by_deficit() {
    let mut buffer = ByteBuffer::new(4);
    buffer.ensure_capacity(10).unwrap();
    assert_eq!(buffer.capacity(), 10);
    assert_eq!(buffer.limit(), 10);
}

#[test]
fn test_ensure_capacity_noop_when_sufficient() {
    let mut buffer = fixed(8);
    buffer.ensure_capacity(8).unwrap();
    assert_eq!(buffer.capacity(), 8);
}

#[test]
fn test_ensure_capacity_without_auto_resize_overflows() {
    let mut buffer = fixed(4);
    assert_eq!(buffer.ensure_capacity(10), Err(Error::Overflow { required: 10, capacity: 4 }));
    assert_eq!(buffer.capacity(), 4);
}

#[test]
fn test_ensure_capacity_respects_ceiling() {
    let mut buffer = ByteBuffer::from_desc(BufferDesc {
        capacity: 4,
        max_capacity: 8,
        ..BufferDesc::default()
    }).unwrap();
    assert_eq!(buffer.ensure_capacity(9), Err(Error::Overflow { required: 9, capacity: 8 }));
    buffer.ensure_capacity(8).unwrap();
    assert_eq!(buffer.capacity(), 8);
}

#[test]
fn test_resize_limit_follows_only_unconstrained_limit() {
    let mut tracking = ByteBuffer::new(8);
    tracking.resize(8).unwrap();
    assert_eq!(tracking.limit(), 16);

    let mut constrained = ByteBuffer::new(8);
    constrained.set_limit(4).unwrap();
    constrained.resize(8).unwrap();
    assert_eq!(constrained.capacity(), 16);
    assert_eq!(constrained.limit(), 4);
}

// ============================================================================
// max_capacity truncation
// ============================================================================

#[test]
fn test_lowering_max_capacity_truncates() {
    let mut buffer = ByteBuffer::new(16);
    buffer.put_int(1).unwrap();
    buffer.put_int(2).unwrap();
    buffer.put_int(3).unwrap();

    buffer.set_max_capacity(8).unwrap();
    assert_eq!(buffer.capacity(), 8);
    assert_eq!(buffer.limit(), 8);
    assert_eq!(buffer.length(), 8);
    // Position 12 was out of bounds
    assert_eq!(buffer.position(), 0);
    assert_eq!(buffer.max_capacity(), 8);
    assert_invariants(&buffer);
}

#[test]
fn test_raising_max_capacity_keeps_buffer() {
    let mut buffer = ByteBuffer::new(8);
    buffer.put_int(7).unwrap();
    buffer.set_max_capacity(1024).unwrap();
    assert_eq!(buffer.capacity(), 8);
    assert_eq!(buffer.position(), 4);
    assert_eq!(buffer.get_int_at(0).unwrap(), 7);
}

// ============================================================================
// slice_range
// ============================================================================

#[test]
fn test_slice_range_accepts_exact_fit() {
    assert_eq!(slice_range(4, 1, 3, "test").unwrap(), 1..4);
    assert_eq!(slice_range(4, 4, 0, "test").unwrap(), 4..4);
}

#[test]
fn test_slice_range_rejects_overrun() {
    assert!(matches!(slice_range(4, 2, 3, "test"), Err(Error::InvalidArgument(_))));
    assert!(matches!(slice_range(4, usize::MAX, 2, "test"), Err(Error::InvalidArgument(_))));
}

// ============================================================================
// Invariant over a mixed sequence
// ============================================================================

#[test]
fn test_invariants_hold_over_operation_sequence() {
    let mut bytes = ByteBuffer::from_desc(BufferDesc {
        capacity: 4,
        max_capacity: 64,
        ..BufferDesc::default()
    }).unwrap();
    let mut ints = IntBuffer::new(2);

    for round in 0..6 {
        bytes.put_int(round).unwrap();
        ints.put(round).unwrap();
        assert_invariants(&bytes);
        assert_invariants(&ints);

        if round % 2 == 1 {
            bytes.flip();
            ints.flip();
            bytes.get_int().unwrap();
            ints.get().unwrap();
            bytes.compact().unwrap();
            ints.compact().unwrap();
        }
        assert_invariants(&bytes);
        assert_invariants(&ints);
    }

    bytes.shrink().unwrap();
    ints.shrink().unwrap();
    assert_invariants(&bytes);
    assert_invariants(&ints);

    bytes.set_max_capacity(2).unwrap();
    ints.set_max_capacity(1).unwrap();
    assert_invariants(&bytes);
    assert_invariants(&ints);

    bytes.clear().unwrap();
    ints.clear().unwrap();
    assert_invariants(&bytes);
    assert_invariants(&ints);
}
