/// FramebufferDevice trait - framebuffer object primitives of a backend
///
/// Attachment calls operate on the framebuffer currently bound with
/// `bind_framebuffer`, the same way the underlying APIs do.

use crate::error::Result;
use crate::device::Surface;

/// Entry of a draw-buffer list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawBuffer {
    /// Fragment output goes to colour attachment `n`
    Color(u32),
    /// Fragment output at this location is discarded
    None,
}

/// Completeness verdict reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    /// The combination of internal formats is not supported
    Unsupported,
    IncompleteAttachment,
    MissingAttachment,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    IncompleteMultisample,
    /// No framebuffer is bound, or the default framebuffer does not exist
    Undefined,
    /// Backend status code with no dedicated variant
    Unknown(u32),
}

/// Framebuffer object primitives
///
/// Implemented by backend devices (e.g., GlDevice). `Framebuffer` is the
/// backend's object handle; `Surface` is the backend's attachable image.
pub trait FramebufferDevice {
    /// Framebuffer object handle
    type Framebuffer;

    /// Attachable surface type
    type Surface: Surface;

    /// Create a new, empty framebuffer object
    fn create_framebuffer(&self) -> Result<Self::Framebuffer>;

    /// Delete a framebuffer object
    fn delete_framebuffer(&self, framebuffer: Self::Framebuffer);

    /// Bind a framebuffer to the context, or restore the default with `None`
    fn bind_framebuffer(&self, framebuffer: Option<&Self::Framebuffer>);

    /// Attach a surface to colour slot `slot` of the bound framebuffer
    ///
    /// `z_offset` selects the layer/slice for array and 3D surfaces.
    fn attach_color(&self, slot: u32, surface: &Self::Surface, z_offset: u32);

    /// Detach whatever is bound to colour slot `slot`
    fn detach_color(&self, slot: u32);

    /// Attach a combined depth/stencil surface to the bound framebuffer
    fn attach_depth_stencil(&self, surface: &Self::Surface);

    /// Configure which colour attachments receive fragment output
    fn set_draw_buffers(&self, buffers: &[DrawBuffer]);

    /// Disable the read buffer of the bound framebuffer
    fn disable_read_buffer(&self);

    /// Query completeness of the bound framebuffer
    fn check_status(&self) -> FramebufferStatus;
}
