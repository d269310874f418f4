/*!
# Galaxy 3D Render

Backend-agnostic GPU resource layer for the Galaxy 3D engine.

This crate owns the parts of the render backend that manage scarce, stateful
GPU-side resources without depending on a particular graphics API. Backend
crates (OpenGL, ...) implement the device traits and plug their concrete
handles into the generic managers defined here.

## Architecture

- **DeviceCapabilities**: Injected limits of the graphics device
- **FramebufferDevice**: Framebuffer object primitives exposed by a backend
- **Surface**: Attachable image surface (renderbuffer, texture layer)
- **AttachmentTable**: Colour + depth/stencil attachments of one framebuffer
- **ScratchAllocator**: Fixed-size arena for short-lived upload data
- **HardwareBufferManager**: Scratch pool + map/sub-data threshold policy
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod device;
pub mod framebuffer;
pub mod buffer;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result, ConfigurationError};

    // Engine (logging hub)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Device boundary: capabilities, surfaces, framebuffer primitives
    pub mod device {
        pub use crate::device::*;
    }

    // Framebuffer attachment management
    pub mod framebuffer {
        pub use crate::framebuffer::*;
    }

    // Hardware buffers and scratch memory
    pub mod buffer {
        pub use crate::buffer::*;
    }
}

// Re-export math library at crate root
pub use glam;
