/// GlSurface - renderbuffers and textures usable as framebuffer attachments

use std::sync::Arc;
use glow::HasContext;
use galaxy_3d_render::galaxy3d::{Error, Result};
use galaxy_3d_render::galaxy3d::device::{PixelFormat, Surface};
use galaxy_3d_render::galaxy3d::framebuffer::clamp_sample_count;
use galaxy_3d_render::{engine_debug, engine_err, engine_error};

use crate::gl_context::GlContext;
use crate::gl_format::{check_allocation, pixel_format_to_gl};

/// GL object backing a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlSurfaceKind {
    /// Renderbuffer, optionally multisampled
    Renderbuffer(glow::Renderbuffer),
    /// One mip level of a 2D texture
    Texture2D { texture: glow::Texture, level: u32 },
    /// One mip level of a 2D array texture; the layer is chosen at attach time
    TextureArray { texture: glow::Texture, level: u32, layers: u32 },
}

/// Attachable GL image
///
/// Deletes its GL object when dropped.
pub struct GlSurface {
    ctx: Arc<GlContext>,
    kind: GlSurfaceKind,
    width: u32,
    height: u32,
    format: PixelFormat,
    samples: u32,
}

fn check_extent(width: u32, height: u32) -> Result<(i32, i32)> {
    match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => {
            let err = Error::InvalidResource(format!("invalid surface extent {}x{}", width, height));
            engine_error!("galaxy3d::opengl", "{}", err);
            Err(err)
        }
    }
}

impl GlSurface {
    /// Create a renderbuffer surface
    ///
    /// `samples` is clamped the same way attachment tables clamp theirs;
    /// 0 creates a single-sampled renderbuffer.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the driver cannot allocate the storage.
    pub fn renderbuffer(
        ctx: Arc<GlContext>,
        width: u32,
        height: u32,
        format: PixelFormat,
        samples: u32,
    ) -> Result<Self> {
        let (w, h) = check_extent(width, height)?;
        let samples = clamp_sample_count(ctx.capabilities(), samples);
        let gl = ctx.gl();

        let renderbuffer = unsafe {
            let renderbuffer = gl.create_renderbuffer()
                .map_err(|e| engine_err!("galaxy3d::opengl", "Failed to create renderbuffer: {}", e))?;
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
            if samples > 0 {
                gl.renderbuffer_storage_multisample(
                    glow::RENDERBUFFER, samples as i32, pixel_format_to_gl(format), w, h);
            } else {
                gl.renderbuffer_storage(glow::RENDERBUFFER, pixel_format_to_gl(format), w, h);
            }
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
            if let Err(err) = check_allocation(gl.get_error(), "renderbuffer") {
                gl.delete_renderbuffer(renderbuffer);
                return Err(err);
            }
            renderbuffer
        };

        engine_debug!("galaxy3d::opengl",
            "Created renderbuffer {}x{} {:?} ({} samples)", width, height, format, samples);

        Ok(Self {
            ctx,
            kind: GlSurfaceKind::Renderbuffer(renderbuffer),
            width,
            height,
            format,
            samples,
        })
    }

    /// Create a single-level 2D texture surface
    pub fn texture_2d(ctx: Arc<GlContext>, width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let (w, h) = check_extent(width, height)?;
        let gl = ctx.gl();

        let texture = unsafe {
            let texture = gl.create_texture()
                .map_err(|e| engine_err!("galaxy3d::opengl", "Failed to create texture: {}", e))?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_storage_2d(glow::TEXTURE_2D, 1, pixel_format_to_gl(format), w, h);
            gl.bind_texture(glow::TEXTURE_2D, None);
            if let Err(err) = check_allocation(gl.get_error(), "2D texture") {
                gl.delete_texture(texture);
                return Err(err);
            }
            texture
        };

        Ok(Self {
            ctx,
            kind: GlSurfaceKind::Texture2D { texture, level: 0 },
            width,
            height,
            format,
            samples: 0,
        })
    }

    /// Create a single-level 2D array texture with `layers` layers
    pub fn texture_array(
        ctx: Arc<GlContext>,
        width: u32,
        height: u32,
        layers: u32,
        format: PixelFormat,
    ) -> Result<Self> {
        let (w, h) = check_extent(width, height)?;
        let depth = match i32::try_from(layers) {
            Ok(depth) if depth > 0 => depth,
            _ => {
                let err = Error::InvalidResource(format!("invalid layer count {}", layers));
                engine_error!("galaxy3d::opengl", "{}", err);
                return Err(err);
            }
        };
        let gl = ctx.gl();

        let texture = unsafe {
            let texture = gl.create_texture()
                .map_err(|e| engine_err!("galaxy3d::opengl", "Failed to create array texture: {}", e))?;
            gl.bind_texture(glow::TEXTURE_2D_ARRAY, Some(texture));
            gl.tex_storage_3d(glow::TEXTURE_2D_ARRAY, 1, pixel_format_to_gl(format), w, h, depth);
            gl.bind_texture(glow::TEXTURE_2D_ARRAY, None);
            if let Err(err) = check_allocation(gl.get_error(), "array texture") {
                gl.delete_texture(texture);
                return Err(err);
            }
            texture
        };

        Ok(Self {
            ctx,
            kind: GlSurfaceKind::TextureArray { texture, level: 0, layers },
            width,
            height,
            format,
            samples: 0,
        })
    }

    /// GL object backing this surface
    pub fn kind(&self) -> GlSurfaceKind {
        self.kind
    }

    /// Multisample count (0 for textures and single-sampled renderbuffers)
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Attach to `attachment` of the currently bound framebuffer
    ///
    /// `z_offset` selects the layer of array textures and is ignored
    /// otherwise.
    pub(crate) fn attach(&self, gl: &glow::Context, attachment: u32, z_offset: u32) {
        unsafe {
            match self.kind {
                GlSurfaceKind::Renderbuffer(renderbuffer) => {
                    gl.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER, attachment, glow::RENDERBUFFER, Some(renderbuffer));
                }
                GlSurfaceKind::Texture2D { texture, level } => {
                    gl.framebuffer_texture_2d(
                        glow::FRAMEBUFFER, attachment, glow::TEXTURE_2D, Some(texture), level as i32);
                }
                GlSurfaceKind::TextureArray { texture, level, layers } => {
                    let layer = z_offset.min(layers - 1);
                    gl.framebuffer_texture_layer(
                        glow::FRAMEBUFFER, attachment, Some(texture), level as i32, layer as i32);
                }
            }
        }
    }
}

impl Surface for GlSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> PixelFormat {
        self.format
    }

    fn internal_format(&self) -> u32 {
        pixel_format_to_gl(self.format)
    }
}

impl Drop for GlSurface {
    fn drop(&mut self) {
        let gl = self.ctx.gl();
        unsafe {
            match self.kind {
                GlSurfaceKind::Renderbuffer(renderbuffer) => gl.delete_renderbuffer(renderbuffer),
                GlSurfaceKind::Texture2D { texture, .. }
                | GlSurfaceKind::TextureArray { texture, .. } => gl.delete_texture(texture),
            }
        }
    }
}
