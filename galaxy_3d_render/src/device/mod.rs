/// Device module - the boundary between the generic managers and a graphics backend

// Module declarations
pub mod capabilities;
pub mod pixel_format;
pub mod surface;
pub mod framebuffer_device;

// Re-export from modules
pub use capabilities::*;
pub use pixel_format::*;
pub use surface::*;
pub use framebuffer_device::*;

// Mock device for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
