/// Buffer module - cursor protocol, byte storage and typed views

// Module declarations
pub mod buffer;
pub mod buffer_desc;
pub mod byte_buffer;
pub mod byte_order;
pub mod element;
pub mod native;
pub mod typed_buffer;

// Re-exports
pub use buffer::{Buffer, BufferState};
pub use buffer_desc::{BufferDesc, BufferFlags, DEFAULT_MAX_CAPACITY};
pub use byte_buffer::ByteBuffer;
pub use byte_order::ByteOrder;
pub use element::Element;
pub use native::NativeWindow;
pub use typed_buffer::{FloatBuffer, IntBuffer, ShortBuffer, TypedBuffer};
