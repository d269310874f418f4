/// GlBuffer - GL buffer object with scratch-staged uploads

use std::sync::Arc;
use glow::HasContext;
use galaxy_3d_render::galaxy3d::{Error, Result};
use galaxy_3d_render::galaxy3d::buffer::{HardwareBufferManager, Staging};
use galaxy_3d_render::{engine_bail, engine_err, engine_error, engine_trace};

use crate::gl_context::GlContext;
use crate::gl_format::check_allocation;

/// Expected update frequency of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlBufferUsage {
    /// Written once, drawn many times
    Static,
    /// Rewritten often
    Dynamic,
}

impl GlBufferUsage {
    /// GL usage hint
    pub fn to_gl(self) -> u32 {
        match self {
            GlBufferUsage::Static => glow::STATIC_DRAW,
            GlBufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        }
    }
}

/// GL buffer object
pub struct GlBuffer {
    ctx: Arc<GlContext>,
    buffer: glow::Buffer,
    /// Bind target (ARRAY_BUFFER, ELEMENT_ARRAY_BUFFER, UNIFORM_BUFFER, ...)
    target: u32,
    size: usize,
    usage: GlBufferUsage,
}

impl GlBuffer {
    /// Create a buffer of `size` bytes with undefined contents
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the driver cannot allocate the storage.
    pub fn new(ctx: Arc<GlContext>, target: u32, size: usize, usage: GlBufferUsage) -> Result<Self> {
        let gl_size = match i32::try_from(size) {
            Ok(gl_size) => gl_size,
            Err(_) => engine_bail!("galaxy3d::opengl", "Buffer size {} exceeds GL limits", size),
        };

        let buffer = unsafe {
            let gl = ctx.gl();
            let buffer = gl.create_buffer()
                .map_err(|e| engine_err!("galaxy3d::opengl", "Failed to create buffer: {}", e))?;
            gl.bind_buffer(target, Some(buffer));
            gl.buffer_data_size(target, gl_size, usage.to_gl());
            gl.bind_buffer(target, None);
            if let Err(err) = check_allocation(gl.get_error(), "buffer") {
                gl.delete_buffer(buffer);
                return Err(err);
            }
            buffer
        };

        Ok(Self { ctx, buffer, target, size, usage })
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Usage hint given at creation
    pub fn usage(&self) -> GlBufferUsage {
        self.usage
    }

    /// Bind target
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Raw GL handle
    pub fn raw(&self) -> glow::Buffer {
        self.buffer
    }

    /// Upload `data` at byte `offset`
    ///
    /// Writes below the manager's map-buffer threshold are copied into a
    /// scratch block and uploaded with `glBufferSubData`. Larger writes, or
    /// writes that find the scratch pool full, map the buffer range.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the range exceeds the buffer, or a
    /// backend error if the range cannot be mapped.
    pub fn write_data(&self, manager: &HardwareBufferManager, offset: usize, data: &[u8]) -> Result<()> {
        match offset.checked_add(data.len()) {
            Some(end) if end <= self.size => {}
            _ => {
                let err = Error::InvalidResource(format!(
                    "write of {} bytes at offset {} exceeds buffer of {} bytes",
                    data.len(), offset, self.size
                ));
                engine_error!("galaxy3d::opengl", "{}", err);
                return Err(err);
            }
        }
        if data.is_empty() {
            return Ok(());
        }

        // Both fit in i32: the buffer size was checked at creation
        let gl_offset = offset as i32;
        let gl_len = data.len() as i32;
        let gl = self.ctx.gl();

        let staging = manager.begin_staging(data.len());
        unsafe { gl.bind_buffer(self.target, Some(self.buffer)) };

        let result = match &staging {
            Staging::Scratch(block) => {
                engine_trace!("galaxy3d::opengl",
                    "Staging {} bytes through scratch block at {}", data.len(), block.offset());
                manager.scratch().write(block, 0, data).map(|()| {
                    manager.scratch().with_payload(block, |payload| unsafe {
                        gl.buffer_sub_data_u8_slice(self.target, gl_offset, &payload[..data.len()]);
                    })
                })
            }
            Staging::Direct => unsafe {
                let ptr = gl.map_buffer_range(
                    self.target,
                    gl_offset,
                    gl_len,
                    glow::MAP_WRITE_BIT | glow::MAP_INVALIDATE_RANGE_BIT,
                );
                if ptr.is_null() {
                    Err(engine_err!("galaxy3d::opengl",
                        "Failed to map {} bytes at offset {}", data.len(), offset))
                } else {
                    std::ptr::copy_nonoverlapping(data.as_ptr(), ptr, data.len());
                    gl.unmap_buffer(self.target);
                    Ok(())
                }
            },
        };

        unsafe { gl.bind_buffer(self.target, None) };
        manager.end_staging(staging);
        result
    }
}

impl Drop for GlBuffer {
    fn drop(&mut self) {
        unsafe {
            self.ctx.gl().delete_buffer(self.buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_to_gl() {
        assert_eq!(GlBufferUsage::Static.to_gl(), glow::STATIC_DRAW);
        assert_eq!(GlBufferUsage::Dynamic.to_gl(), glow::DYNAMIC_DRAW);
    }
}
