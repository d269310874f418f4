/// GlDevice - OpenGL implementation of FramebufferDevice

use std::sync::Arc;
use glow::HasContext;
use galaxy_3d_render::galaxy3d::Result;
use galaxy_3d_render::galaxy3d::buffer::{BufferManagerConfig, HardwareBufferManager};
use galaxy_3d_render::galaxy3d::device::{DrawBuffer, FramebufferDevice, FramebufferStatus, PixelFormat, Surface};
use galaxy_3d_render::galaxy3d::framebuffer::AttachmentTable;
use galaxy_3d_render::engine_err;

use crate::gl_buffer::{GlBuffer, GlBufferUsage};
use crate::gl_capabilities::GlCapabilities;
use crate::gl_context::GlContext;
use crate::gl_format::{depth_attachment_point, draw_buffer_to_gl, status_from_gl};
use crate::gl_surface::GlSurface;

/// OpenGL device
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use galaxy_3d_render::galaxy3d::buffer::BufferManagerConfig;
/// use galaxy_3d_render::galaxy3d::device::PixelFormat;
/// use galaxy_3d_render_opengl::galaxy3d::GlDevice;
///
/// # fn run(gl: glow::Context) -> galaxy_3d_render::galaxy3d::Result<()> {
/// let device = Arc::new(GlDevice::new(gl));
/// let mut table = device.create_attachment_table(4)?;
/// let color = Arc::new(device.create_table_renderbuffer(&table, 512, 512, PixelFormat::R8G8B8A8_UNORM)?);
///
/// table.bind_color(0, color, 0)?;
/// table.bind();
/// # Ok(())
/// # }
/// ```
pub struct GlDevice {
    ctx: Arc<GlContext>,
}

impl GlDevice {
    /// Wrap a loaded GL context (must be current on this thread)
    pub fn new(gl: glow::Context) -> Self {
        Self { ctx: Arc::new(GlContext::new(gl)) }
    }

    /// Shared context handed to every resource of this device
    pub fn context(&self) -> &Arc<GlContext> {
        &self.ctx
    }

    /// Limits queried when the device was created
    pub fn capabilities(&self) -> &GlCapabilities {
        self.ctx.capabilities()
    }

    // ===== FACTORIES =====

    /// Create an empty attachment table on this device
    pub fn create_attachment_table(self: &Arc<Self>, requested_samples: u32) -> Result<AttachmentTable<GlDevice>> {
        AttachmentTable::new(self.clone(), self.ctx.capabilities(), requested_samples)
    }

    /// Create the buffer manager for this device's buffers
    pub fn create_buffer_manager(&self, config: &BufferManagerConfig) -> Result<HardwareBufferManager> {
        HardwareBufferManager::new(self.ctx.capabilities(), config)
    }

    /// Create a renderbuffer surface with up to `samples` samples
    pub fn create_renderbuffer(&self, width: u32, height: u32, format: PixelFormat, samples: u32) -> Result<GlSurface> {
        GlSurface::renderbuffer(self.ctx.clone(), width, height, format, samples)
    }

    /// Create a renderbuffer using the sample count of `table`
    pub fn create_table_renderbuffer(
        &self,
        table: &AttachmentTable<GlDevice>,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<GlSurface> {
        self.create_renderbuffer(width, height, format, table.sample_count())
    }

    /// Create a single-level 2D texture surface
    pub fn create_texture_2d(&self, width: u32, height: u32, format: PixelFormat) -> Result<GlSurface> {
        GlSurface::texture_2d(self.ctx.clone(), width, height, format)
    }

    /// Create a single-level 2D array texture surface
    pub fn create_texture_array(&self, width: u32, height: u32, layers: u32, format: PixelFormat) -> Result<GlSurface> {
        GlSurface::texture_array(self.ctx.clone(), width, height, layers, format)
    }

    /// Create a buffer object bound to `target`
    pub fn create_buffer(&self, target: u32, size: usize, usage: GlBufferUsage) -> Result<GlBuffer> {
        GlBuffer::new(self.ctx.clone(), target, size, usage)
    }
}

impl FramebufferDevice for GlDevice {
    type Framebuffer = glow::Framebuffer;
    type Surface = GlSurface;

    fn create_framebuffer(&self) -> Result<glow::Framebuffer> {
        unsafe {
            self.ctx.gl().create_framebuffer()
                .map_err(|e| engine_err!("galaxy3d::opengl", "Failed to create framebuffer: {}", e))
        }
    }

    fn delete_framebuffer(&self, framebuffer: glow::Framebuffer) {
        unsafe { self.ctx.gl().delete_framebuffer(framebuffer) }
    }

    fn bind_framebuffer(&self, framebuffer: Option<&glow::Framebuffer>) {
        unsafe { self.ctx.gl().bind_framebuffer(glow::FRAMEBUFFER, framebuffer.copied()) }
    }

    fn attach_color(&self, slot: u32, surface: &GlSurface, z_offset: u32) {
        surface.attach(self.ctx.gl(), glow::COLOR_ATTACHMENT0 + slot, z_offset);
    }

    fn detach_color(&self, slot: u32) {
        unsafe {
            self.ctx.gl().framebuffer_renderbuffer(
                glow::FRAMEBUFFER, glow::COLOR_ATTACHMENT0 + slot, glow::RENDERBUFFER, None);
        }
    }

    fn attach_depth_stencil(&self, surface: &GlSurface) {
        surface.attach(self.ctx.gl(), depth_attachment_point(surface.format()), 0);
    }

    fn set_draw_buffers(&self, buffers: &[DrawBuffer]) {
        let buffers: Vec<u32> = buffers.iter().copied().map(draw_buffer_to_gl).collect();
        unsafe { self.ctx.gl().draw_buffers(&buffers) }
    }

    fn disable_read_buffer(&self) {
        unsafe { self.ctx.gl().read_buffer(glow::NONE) }
    }

    fn check_status(&self) -> FramebufferStatus {
        status_from_gl(unsafe { self.ctx.gl().check_framebuffer_status(glow::FRAMEBUFFER) })
    }
}
