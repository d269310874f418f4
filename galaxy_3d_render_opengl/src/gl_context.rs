/// GlContext - loaded GL function table plus its queried limits
///
/// Shared through `Arc` by the device and every resource it creates, so
/// resources can release their GL objects on drop.

use crate::gl_capabilities::GlCapabilities;

/// GL function table shared by a device and its resources
pub struct GlContext {
    gl: glow::Context,
    capabilities: GlCapabilities,
}

impl GlContext {
    /// Wrap a loaded context and query its limits
    ///
    /// The context must be current on the calling thread.
    pub fn new(gl: glow::Context) -> Self {
        let capabilities = GlCapabilities::query(&gl);
        Self { gl, capabilities }
    }

    /// GL function table
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Limits queried at creation
    pub fn capabilities(&self) -> &GlCapabilities {
        &self.capabilities
    }
}
