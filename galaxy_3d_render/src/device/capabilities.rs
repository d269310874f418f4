/// Device capability queries
///
/// Capabilities are handed to the managers that need them at construction
/// time. Nothing in this crate looks them up through a global.

/// GPU vendor, as far as the backend can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    Arm,
    Qualcomm,
    Unknown,
}

/// Limits and feature bits of the graphics device
pub trait DeviceCapabilities {
    /// Upper bound on simultaneously bound colour attachments
    fn max_color_attachments(&self) -> u32;

    /// Highest supported multisample count
    fn max_sample_count(&self) -> u32;

    /// Whether multisampled framebuffers can be resolved with a blit
    fn supports_multisample_blit(&self) -> bool;

    /// Vendor of the device (used to pick driver workarounds)
    fn vendor(&self) -> GpuVendor;
}

/// Fixed capability set
///
/// Used for tests and for backends whose limits are known up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticCapabilities {
    pub max_color_attachments: u32,
    pub max_sample_count: u32,
    pub supports_multisample_blit: bool,
    pub vendor: GpuVendor,
}

impl Default for StaticCapabilities {
    fn default() -> Self {
        Self {
            max_color_attachments: crate::framebuffer::MAX_COLOR_ATTACHMENTS,
            max_sample_count: 4,
            supports_multisample_blit: true,
            vendor: GpuVendor::Unknown,
        }
    }
}

impl DeviceCapabilities for StaticCapabilities {
    fn max_color_attachments(&self) -> u32 {
        self.max_color_attachments
    }

    fn max_sample_count(&self) -> u32 {
        self.max_sample_count
    }

    fn supports_multisample_blit(&self) -> bool {
        self.supports_multisample_blit
    }

    fn vendor(&self) -> GpuVendor {
        self.vendor
    }
}
