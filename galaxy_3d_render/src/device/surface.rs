/// Surface trait - an image that can be attached to a framebuffer

use glam::UVec2;
use crate::device::PixelFormat;

/// Attachable surface
///
/// Implemented by backend-specific surfaces (renderbuffers, texture levels,
/// texture array layers). The attachment table only needs to compare
/// dimensions and internal formats; how the surface is attached is up to
/// the device.
pub trait Surface {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Engine pixel format
    fn format(&self) -> PixelFormat;

    /// Backend storage format (e.g. a GL sized internal format)
    ///
    /// Attachments are compatible when this matches slot 0, even if their
    /// engine formats differ (RGBA8 and BGRA8 share GL_RGBA8).
    fn internal_format(&self) -> u32;

    /// Width and height in pixels
    fn size(&self) -> UVec2 {
        UVec2::new(self.width(), self.height())
    }
}
