/// GlCapabilities - limits and feature bits read from a GL context

use std::collections::HashSet;
use glow::HasContext;
use galaxy_3d_render::galaxy3d::device::{DeviceCapabilities, GpuVendor};
use galaxy_3d_render::engine_info;

/// Limits of a GL context, queried once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlCapabilities {
    /// `GL_MAX_COLOR_ATTACHMENTS`
    pub max_color_attachments: u32,
    /// `GL_MAX_DRAW_BUFFERS`
    pub max_draw_buffers: u32,
    /// `GL_MAX_SAMPLES`
    pub max_samples: u32,
    /// Multisampled framebuffers can be resolved with `glBlitFramebuffer`
    pub multisample_blit: bool,
    pub vendor: GpuVendor,
    /// Raw `GL_VENDOR` string
    pub vendor_string: String,
    /// `(major, minor)` context version
    pub version: (u32, u32),
}

impl GlCapabilities {
    /// Read the limits of the current context
    pub fn query(gl: &glow::Context) -> Self {
        let (vendor_string, renderer, max_color_attachments, max_draw_buffers, max_samples) = unsafe {
            (
                gl.get_parameter_string(glow::VENDOR),
                gl.get_parameter_string(glow::RENDERER),
                gl.get_parameter_i32(glow::MAX_COLOR_ATTACHMENTS),
                gl.get_parameter_i32(glow::MAX_DRAW_BUFFERS),
                gl.get_parameter_i32(glow::MAX_SAMPLES),
            )
        };

        let version = gl.version();
        let multisample_blit = supports_multisample_blit(version.major, gl.supported_extensions());

        let caps = Self {
            max_color_attachments: max_color_attachments.max(1) as u32,
            max_draw_buffers: max_draw_buffers.max(1) as u32,
            max_samples: max_samples.max(0) as u32,
            multisample_blit,
            vendor: parse_vendor(&vendor_string),
            vendor_string: vendor_string.trim().to_string(),
            version: (version.major, version.minor),
        };

        engine_info!("galaxy3d::opengl",
            "OpenGL {}.{} on {} [{}]: {} colour attachments, {} draw buffers, {} samples, blit {}",
            caps.version.0, caps.version.1, renderer.trim(), caps.vendor_string,
            caps.max_color_attachments, caps.max_draw_buffers, caps.max_samples,
            caps.multisample_blit);

        caps
    }
}

/// Identify the GPU vendor from a `GL_VENDOR` string
pub fn parse_vendor(vendor: &str) -> GpuVendor {
    let vendor = vendor.to_ascii_lowercase();
    if vendor.contains("nvidia") {
        GpuVendor::Nvidia
    } else if vendor.contains("ati technologies") || vendor.contains("amd") || vendor.starts_with("ati") {
        GpuVendor::Amd
    } else if vendor.contains("intel") {
        GpuVendor::Intel
    } else if vendor.contains("apple") {
        GpuVendor::Apple
    } else if vendor.contains("arm") {
        GpuVendor::Arm
    } else if vendor.contains("qualcomm") {
        GpuVendor::Qualcomm
    } else {
        GpuVendor::Unknown
    }
}

/// Multisample resolve needs GL 3.0 or both EXT blit extensions
pub fn supports_multisample_blit(major: u32, extensions: &HashSet<String>) -> bool {
    major >= 3
        || (extensions.contains("GL_EXT_framebuffer_blit")
            && extensions.contains("GL_EXT_framebuffer_multisample"))
}

impl DeviceCapabilities for GlCapabilities {
    fn max_color_attachments(&self) -> u32 {
        // Slots beyond the draw-buffer limit could never be written
        self.max_color_attachments.min(self.max_draw_buffers)
    }

    fn max_sample_count(&self) -> u32 {
        self.max_samples
    }

    fn supports_multisample_blit(&self) -> bool {
        self.multisample_blit
    }

    fn vendor(&self) -> GpuVendor {
        self.vendor
    }
}

#[cfg(test)]
#[path = "gl_capabilities_tests.rs"]
mod tests;
