/*!
# Galaxy 3D Buffer

Byte-addressable buffers for the Galaxy3D framework: the memory that vertex,
index, uniform and pixel data live in before it is handed to the graphics
driver.

## Architecture

- **Buffer**: cursor/limit/mark protocol and the auto-resize policy with a capacity ceiling
- **ByteBuffer**: owns a byte region; endianness-aware numeric access; typed-view factory
- **TypedBuffer&lt;T&gt;**: element-indexed buffer over one ByteBuffer
  (`ShortBuffer`, `IntBuffer`, `FloatBuffer`), either standalone or a
  shared view aliasing another ByteBuffer's bytes
- **NativeWindow**: pointer/length/window hand-off to the driver binding
- **DecodedImage**: pixels returned by an image codec, wrapped into a ByteBuffer

Buffers are single-threaded (`!Send`); shared views hold weak handles and fail
with `Error::Detached` once their owner is gone.
*/

// Internal modules
mod error;
pub mod log;
pub mod buffer;
pub mod image;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types and global logger control, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
    }

    // Buffer sub-module
    pub mod buffer {
        pub use crate::buffer::*;
    }

    // Image sub-module
    pub mod image {
        pub use crate::image::*;
    }
}

// Re-export math library at crate root
pub use glam;
