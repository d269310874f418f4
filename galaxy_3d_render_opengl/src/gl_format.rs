/// Pure conversions between engine types and GL enums

use galaxy_3d_render::galaxy3d::{Error, Result};
use galaxy_3d_render::galaxy3d::device::{DrawBuffer, FramebufferStatus, PixelFormat};
use galaxy_3d_render::{engine_err, engine_error};

/// Sized internal format used for storage of `format`
///
/// GL has no BGRA internal format: `B8G8R8A8_UNORM` is stored as RGBA8 and
/// only differs in the upload pixel layout.
pub fn pixel_format_to_gl(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::R8_UNORM => glow::R8,
        PixelFormat::R8G8_UNORM => glow::RG8,
        PixelFormat::R8G8B8A8_UNORM => glow::RGBA8,
        PixelFormat::R8G8B8A8_SRGB => glow::SRGB8_ALPHA8,
        PixelFormat::B8G8R8A8_UNORM => glow::RGBA8,
        PixelFormat::R10G10B10A2_UNORM => glow::RGB10_A2,
        PixelFormat::R16G16B16A16_SFLOAT => glow::RGBA16F,
        PixelFormat::R32_SFLOAT => glow::R32F,
        PixelFormat::R32G32B32A32_SFLOAT => glow::RGBA32F,
        PixelFormat::D16_UNORM => glow::DEPTH_COMPONENT16,
        PixelFormat::D24_UNORM_S8_UINT => glow::DEPTH24_STENCIL8,
        PixelFormat::D32_SFLOAT => glow::DEPTH_COMPONENT32F,
    }
}

/// Attachment point for a depth surface of `format`
pub fn depth_attachment_point(format: PixelFormat) -> u32 {
    if format.has_stencil() {
        glow::DEPTH_STENCIL_ATTACHMENT
    } else {
        glow::DEPTH_ATTACHMENT
    }
}

/// GL enum for one draw-buffer entry
pub fn draw_buffer_to_gl(buffer: DrawBuffer) -> u32 {
    match buffer {
        DrawBuffer::Color(slot) => glow::COLOR_ATTACHMENT0 + slot,
        DrawBuffer::None => glow::NONE,
    }
}

/// Map a `glCheckFramebufferStatus` result
pub fn status_from_gl(status: u32) -> FramebufferStatus {
    match status {
        glow::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        glow::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferStatus::IncompleteDrawBuffer,
        glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferStatus::IncompleteReadBuffer,
        glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => FramebufferStatus::IncompleteMultisample,
        glow::FRAMEBUFFER_UNDEFINED => FramebufferStatus::Undefined,
        other => FramebufferStatus::Unknown(other),
    }
}

/// Map the `glGetError` code read right after allocating storage for `what`
pub fn check_allocation(code: u32, what: &str) -> Result<()> {
    match code {
        glow::NO_ERROR => Ok(()),
        glow::OUT_OF_MEMORY => {
            engine_error!("galaxy3d::opengl", "Out of GPU memory allocating {}", what);
            Err(Error::OutOfMemory)
        }
        other => Err(engine_err!("galaxy3d::opengl",
            "GL error 0x{:04X} allocating {}", other, what)),
    }
}

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;
