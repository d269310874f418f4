/// Attachment table of a single framebuffer object.
///
/// Owns the device framebuffer object for its whole lifetime and keeps the
/// CPU-side record of what is bound to each slot. Every change to the
/// colour slots re-validates the whole set once slot 0 is populated.

use std::sync::Arc;
use glam::UVec2;

use crate::device::{
    DeviceCapabilities, DrawBuffer, FramebufferDevice, FramebufferStatus, PixelFormat, Surface,
};
use crate::error::{ConfigurationError, Error, Result};
use crate::{engine_debug, engine_error, engine_warn};

/// Number of colour slots tracked by every attachment table
pub const MAX_COLOR_ATTACHMENTS: u32 = 8;

const SOURCE: &str = "galaxy3d::AttachmentTable";

/// Multisample count a device can actually resolve
///
/// Clamped to the device maximum, and 0 when multisampled framebuffers
/// cannot be blitted. Multisampled surfaces attached to a table should be
/// created with the same count (see `AttachmentTable::sample_count`).
pub fn clamp_sample_count(capabilities: &dyn DeviceCapabilities, requested: u32) -> u32 {
    if capabilities.supports_multisample_blit() {
        requested.min(capabilities.max_sample_count())
    } else {
        0
    }
}

/// Surface bound to a colour slot
pub struct ColorAttachment<S> {
    /// Bound surface
    pub surface: Arc<S>,
    /// Layer/slice for array and 3D surfaces
    pub z_offset: u32,
}

impl<S> Clone for ColorAttachment<S> {
    fn clone(&self) -> Self {
        Self { surface: self.surface.clone(), z_offset: self.z_offset }
    }
}

/// Colour and depth/stencil attachments of one framebuffer object
///
/// Not internally synchronized: use it from the thread that owns the
/// device context.
///
/// # Re-validation rules
///
/// - `bind_color` re-finalizes whenever slot 0 is bound afterwards.
/// - `unbind_color` re-finalizes only if slot 0 is *still* bound afterwards.
///   Unbinding slot 0 itself leaves the device object configured with the
///   previous attachments until the next finalize.
/// - Depth/stencil changes never re-finalize; they are applied by the next
///   finalize.
pub struct AttachmentTable<D: FramebufferDevice> {
    device: Arc<D>,
    /// Device object (taken on drop)
    framebuffer: Option<D::Framebuffer>,
    color: [Option<ColorAttachment<D::Surface>>; MAX_COLOR_ATTACHMENTS as usize],
    depth_stencil: Option<Arc<D::Surface>>,
    /// Colour slots validated and attached during finalize
    max_color_attachments: u32,
    sample_count: u32,
    complete: bool,
}

impl<D: FramebufferDevice> AttachmentTable<D> {
    /// Create an empty table and its device framebuffer object
    ///
    /// # Arguments
    ///
    /// * `device` - Backend device that owns the framebuffer object
    /// * `capabilities` - Device limits (attachment count, multisampling)
    /// * `requested_samples` - Desired multisample count; clamped to the
    ///   device maximum, and forced to 0 without multisample blit support
    ///
    /// # Errors
    ///
    /// Returns the device error if the framebuffer object cannot be created.
    pub fn new(
        device: Arc<D>,
        capabilities: &dyn DeviceCapabilities,
        requested_samples: u32,
    ) -> Result<Self> {
        let framebuffer = device.create_framebuffer()?;

        let sample_count = clamp_sample_count(capabilities, requested_samples);
        let max_color_attachments = capabilities.max_color_attachments().min(MAX_COLOR_ATTACHMENTS);

        engine_debug!(SOURCE,
            "Created framebuffer object ({} colour slots, {} samples)",
            max_color_attachments, sample_count);

        Ok(Self {
            device,
            framebuffer: Some(framebuffer),
            color: std::array::from_fn(|_| None),
            depth_stencil: None,
            max_color_attachments,
            sample_count,
            complete: false,
        })
    }

    // ===== BINDING =====

    /// Bind a surface to colour slot `slot`
    ///
    /// Re-finalizes if slot 0 is populated afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= MAX_COLOR_ATTACHMENTS`.
    pub fn bind_color(&mut self, slot: u32, surface: Arc<D::Surface>, z_offset: u32) -> Result<()> {
        assert!(slot < MAX_COLOR_ATTACHMENTS,
            "colour slot {} out of range (max {})", slot, MAX_COLOR_ATTACHMENTS);

        self.color[slot as usize] = Some(ColorAttachment { surface, z_offset });
        self.complete = false;

        if self.color[0].is_some() {
            self.finalize()
        } else {
            Ok(())
        }
    }

    /// Clear colour slot `slot`
    ///
    /// Re-finalizes only if slot 0 is still populated afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= MAX_COLOR_ATTACHMENTS`.
    pub fn unbind_color(&mut self, slot: u32) -> Result<()> {
        assert!(slot < MAX_COLOR_ATTACHMENTS,
            "colour slot {} out of range (max {})", slot, MAX_COLOR_ATTACHMENTS);

        self.color[slot as usize] = None;
        self.complete = false;

        // Slot 0 cleared: the device object keeps its previous configuration
        if self.color[0].is_some() {
            self.finalize()
        } else {
            Ok(())
        }
    }

    /// Set the depth/stencil surface (applied at the next finalize)
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if the surface has a colour format;
    /// the previous depth/stencil binding is kept.
    pub fn bind_depth_stencil(&mut self, surface: Arc<D::Surface>) -> Result<()> {
        let format = surface.format();
        if !format.is_depth() {
            let err = Error::InvalidResource(format!(
                "{:?} is not a depth format and cannot be bound as depth/stencil", format
            ));
            engine_error!(SOURCE, "{}", err);
            return Err(err);
        }
        self.depth_stencil = Some(surface);
        self.complete = false;
        Ok(())
    }

    /// Clear the depth/stencil surface (applied at the next finalize)
    pub fn unbind_depth_stencil(&mut self) {
        self.depth_stencil = None;
        self.complete = false;
    }

    // ===== FINALIZE =====

    /// Validate the bound surfaces and configure the device object
    ///
    /// The context's framebuffer binding is restored to the default on
    /// every exit path. Recorded bindings are never modified.
    ///
    /// # Errors
    ///
    /// - `MissingPrimaryAttachment` if slot 0 is empty
    /// - `IncompatibleSize` / `IncompatibleFormat` if a slot differs from slot 0
    /// - `UnsupportedFormatCombination` / `Incomplete` if the device rejects it
    pub fn finalize(&mut self) -> Result<()> {
        let (size, format, internal_format) = match &self.color[0] {
            Some(primary) => (
                primary.surface.size(),
                primary.surface.format(),
                primary.surface.internal_format(),
            ),
            None => {
                self.complete = false;
                return Err(Self::fail(ConfigurationError::MissingPrimaryAttachment));
            }
        };

        self.device.bind_framebuffer(self.framebuffer.as_ref());
        let result = self.configure(size, format, internal_format);
        self.device.bind_framebuffer(None);

        self.complete = result.is_ok();
        match result {
            Ok(()) => {
                engine_debug!(SOURCE,
                    "Framebuffer complete: {}x{} {:?}, draw buffers {:?}",
                    size.x, size.y, format, self.draw_buffers());
                Ok(())
            }
            Err(err) => Err(Self::fail(err)),
        }
    }

    /// Attach every slot to the bound device object and query its status
    fn configure(
        &self,
        size: UVec2,
        format: PixelFormat,
        internal_format: u32,
    ) -> std::result::Result<(), ConfigurationError> {
        for slot in 0..self.max_color_attachments {
            match &self.color[slot as usize] {
                Some(attachment) => {
                    let actual = attachment.surface.size();
                    if actual != size {
                        return Err(ConfigurationError::IncompatibleSize { slot, expected: size, actual });
                    }
                    if attachment.surface.internal_format() != internal_format {
                        return Err(ConfigurationError::IncompatibleFormat {
                            slot,
                            expected: format,
                            actual: attachment.surface.format(),
                        });
                    }
                    self.device.attach_color(slot, &attachment.surface, attachment.z_offset);
                }
                None => self.device.detach_color(slot),
            }
        }

        if let Some(depth_stencil) = &self.depth_stencil {
            self.device.attach_depth_stencil(depth_stencil);
        }

        self.device.set_draw_buffers(&self.draw_buffers());
        self.device.disable_read_buffer();

        match self.device.check_status() {
            FramebufferStatus::Complete => Ok(()),
            FramebufferStatus::Unsupported => Err(ConfigurationError::UnsupportedFormatCombination),
            status => Err(ConfigurationError::Incomplete(status)),
        }
    }

    fn fail(err: ConfigurationError) -> Error {
        engine_error!(SOURCE, "{}", err);
        Error::Configuration(err)
    }

    /// Draw-buffer list derived from the bound slots
    ///
    /// Covers every slot up to the highest bound one; empty slots below it
    /// map to `DrawBuffer::None`.
    pub fn draw_buffers(&self) -> Vec<DrawBuffer> {
        let count = self.color.iter().rposition(|slot| slot.is_some()).map_or(0, |i| i + 1);
        (0..count)
            .map(|i| match self.color[i] {
                Some(_) => DrawBuffer::Color(i as u32),
                None => DrawBuffer::None,
            })
            .collect()
    }

    // ===== CONTEXT =====

    /// Bind the framebuffer object to the device context for rendering
    pub fn bind(&self) {
        if !self.complete {
            engine_warn!(SOURCE, "Binding a framebuffer that was not successfully finalized");
        }
        self.device.bind_framebuffer(self.framebuffer.as_ref());
    }

    // ===== QUERIES =====

    /// Width of slot 0
    ///
    /// # Panics
    ///
    /// Panics if slot 0 is empty.
    pub fn width(&self) -> u32 {
        self.primary().surface.width()
    }

    /// Height of slot 0
    ///
    /// # Panics
    ///
    /// Panics if slot 0 is empty.
    pub fn height(&self) -> u32 {
        self.primary().surface.height()
    }

    /// Pixel format of slot 0
    ///
    /// # Panics
    ///
    /// Panics if slot 0 is empty.
    pub fn format(&self) -> PixelFormat {
        self.primary().surface.format()
    }

    /// Size of slot 0, if bound
    pub fn size(&self) -> Option<UVec2> {
        self.color[0].as_ref().map(|primary| primary.surface.size())
    }

    fn primary(&self) -> &ColorAttachment<D::Surface> {
        match &self.color[0] {
            Some(primary) => primary,
            None => panic!("attachment 0 must have a surface bound before querying the framebuffer"),
        }
    }

    /// Attachment recorded for colour slot `slot`
    pub fn color_attachment(&self, slot: u32) -> Option<&ColorAttachment<D::Surface>> {
        self.color.get(slot as usize).and_then(|a| a.as_ref())
    }

    /// Recorded depth/stencil surface
    pub fn depth_stencil(&self) -> Option<&Arc<D::Surface>> {
        self.depth_stencil.as_ref()
    }

    /// Clamped multisample count
    ///
    /// The table itself never reads it: it is the count to create
    /// multisampled attachments with, so they resolve on this device.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Colour slots validated during finalize
    pub fn max_color_attachments(&self) -> u32 {
        self.max_color_attachments
    }

    /// Whether the last finalize succeeded and nothing changed since
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Device object handle
    pub fn handle(&self) -> Option<&D::Framebuffer> {
        self.framebuffer.as_ref()
    }
}

impl<D: FramebufferDevice> Drop for AttachmentTable<D> {
    fn drop(&mut self) {
        if let Some(framebuffer) = self.framebuffer.take() {
            self.device.delete_framebuffer(framebuffer);
        }
    }
}

#[cfg(test)]
#[path = "attachment_table_tests.rs"]
mod tests;
