/// Pixel formats of attachable surfaces

/// Internal pixel format of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum PixelFormat {
    // Color formats
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    R10G10B10A2_UNORM,
    R16G16B16A16_SFLOAT,
    R32_SFLOAT,
    R32G32B32A32_SFLOAT,

    // Depth/stencil formats
    D16_UNORM,
    D24_UNORM_S8_UINT,
    D32_SFLOAT,
}

impl PixelFormat {
    /// Returns true for depth and depth/stencil formats
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            PixelFormat::D16_UNORM | PixelFormat::D24_UNORM_S8_UINT | PixelFormat::D32_SFLOAT
        )
    }

    /// Returns true if the format carries a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(self, PixelFormat::D24_UNORM_S8_UINT)
    }
}
