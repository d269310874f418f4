/// Mock framebuffer device for unit tests (no GPU required)
///
/// Records every call so tests can assert on the exact sequence of
/// device operations performed by the attachment table.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::device::{DrawBuffer, FramebufferDevice, FramebufferStatus, PixelFormat, Surface};
use crate::error::Result;

// ============================================================================
// Mock Surface
// ============================================================================

#[derive(Debug)]
pub struct MockSurface {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Defaults to one distinct code per engine format
    pub internal_format: u32,
    pub name: String,
}

impl MockSurface {
    pub fn new(width: u32, height: u32, format: PixelFormat, name: &str) -> Self {
        Self { width, height, format, internal_format: format as u32, name: name.to_string() }
    }

    /// Override the backend storage format
    pub fn with_internal_format(mut self, internal_format: u32) -> Self {
        self.internal_format = internal_format;
        self
    }
}

impl Surface for MockSurface {
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
        self.internal_format
    }
}

// ============================================================================
// Mock Device
// ============================================================================

/// One recorded device call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    CreateFramebuffer(u32),
    DeleteFramebuffer(u32),
    BindFramebuffer(Option<u32>),
    AttachColor { slot: u32, surface: String, z_offset: u32 },
    DetachColor(u32),
    AttachDepthStencil(String),
    SetDrawBuffers(Vec<DrawBuffer>),
    DisableReadBuffer,
    CheckStatus,
}

pub struct MockDevice {
    pub calls: Mutex<Vec<DeviceCall>>,
    pub status: Mutex<FramebufferStatus>,
    pub fail_create: bool,
    next_id: AtomicU32,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status: Mutex::new(FramebufferStatus::Complete),
            fail_create: false,
            next_id: AtomicU32::new(1),
        }
    }

    /// Status returned by subsequent `check_status` calls
    pub fn set_status(&self, status: FramebufferStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Last framebuffer binding recorded, or None if never bound
    pub fn last_binding(&self) -> Option<Option<u32>> {
        self.calls.lock().unwrap().iter().rev().find_map(|call| match call {
            DeviceCall::BindFramebuffer(fb) => Some(*fb),
            _ => None,
        })
    }

    /// Last draw-buffer list recorded
    pub fn last_draw_buffers(&self) -> Option<Vec<DrawBuffer>> {
        self.calls.lock().unwrap().iter().rev().find_map(|call| match call {
            DeviceCall::SetDrawBuffers(buffers) => Some(buffers.clone()),
            _ => None,
        })
    }

    fn record(&self, call: DeviceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl FramebufferDevice for MockDevice {
    type Framebuffer = u32;
    type Surface = MockSurface;

    fn create_framebuffer(&self) -> Result<u32> {
        if self.fail_create {
            crate::engine_bail!("galaxy3d::mock", "create_framebuffer: device lost");
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.record(DeviceCall::CreateFramebuffer(id));
        Ok(id)
    }

    fn delete_framebuffer(&self, framebuffer: u32) {
        self.record(DeviceCall::DeleteFramebuffer(framebuffer));
    }

    fn bind_framebuffer(&self, framebuffer: Option<&u32>) {
        self.record(DeviceCall::BindFramebuffer(framebuffer.copied()));
    }

    fn attach_color(&self, slot: u32, surface: &MockSurface, z_offset: u32) {
        self.record(DeviceCall::AttachColor { slot, surface: surface.name.clone(), z_offset });
    }

    fn detach_color(&self, slot: u32) {
        self.record(DeviceCall::DetachColor(slot));
    }

    fn attach_depth_stencil(&self, surface: &MockSurface) {
        self.record(DeviceCall::AttachDepthStencil(surface.name.clone()));
    }

    fn set_draw_buffers(&self, buffers: &[DrawBuffer]) {
        self.record(DeviceCall::SetDrawBuffers(buffers.to_vec()));
    }

    fn disable_read_buffer(&self) {
        self.record(DeviceCall::DisableReadBuffer);
    }

    fn check_status(&self) -> FramebufferStatus {
        self.record(DeviceCall::CheckStatus);
        *self.status.lock().unwrap()
    }
}
