/*!
# Galaxy 3D Render - OpenGL Backend

OpenGL implementation of the galaxy_3d_render device traits, using `glow`
for the GL bindings.

The caller owns the window and the GL context; this crate takes a loaded
`glow::Context`, queries its limits once, and hands out framebuffer
surfaces and hardware buffers bound to that context. Nothing here is
thread-safe: use it from the thread that made the context current.
*/

mod gl_context;
mod gl_capabilities;
mod gl_format;
mod gl_surface;
mod gl_buffer;
mod gl_device;

/// Main galaxy3d namespace for the OpenGL backend
pub mod galaxy3d {
    pub use crate::gl_context::GlContext;
    pub use crate::gl_capabilities::{GlCapabilities, parse_vendor, supports_multisample_blit};
    pub use crate::gl_format::{
        check_allocation, draw_buffer_to_gl, pixel_format_to_gl, depth_attachment_point, status_from_gl,
    };
    pub use crate::gl_surface::{GlSurface, GlSurfaceKind};
    pub use crate::gl_buffer::{GlBuffer, GlBufferUsage};
    pub use crate::gl_device::GlDevice;
}

/// Re-export of the GL bindings the backend is built on
pub use glow;
