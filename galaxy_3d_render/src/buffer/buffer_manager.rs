/// Hardware buffer manager
///
/// Owns the scratch pool shared by every buffer of a backend and the size
/// threshold that decides how CPU data reaches a GPU buffer.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::buffer::{ScratchAllocator, ScratchBlock, SCRATCH_POOL_SIZE};
use crate::device::{DeviceCapabilities, GpuVendor};
use crate::error::Result;
use crate::{engine_debug, engine_info};

/// Default upload size (bytes) at and above which buffers are mapped directly
pub const DEFAULT_MAP_BUFFER_THRESHOLD: u32 = 32 * 1024;

const SOURCE: &str = "galaxy3d::HardwareBufferManager";

/// Map-buffer threshold for a device from `vendor` on the current platform
///
/// Outside Windows, mapping is always preferred (threshold 0). On Windows,
/// AMD drivers are slow to map, so everything goes through scratch memory.
pub fn default_map_buffer_threshold(vendor: GpuVendor) -> u32 {
    if !cfg!(target_os = "windows") {
        0
    } else if vendor == GpuVendor::Amd {
        u32::MAX
    } else {
        DEFAULT_MAP_BUFFER_THRESHOLD
    }
}

/// Construction parameters of a `HardwareBufferManager`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferManagerConfig {
    /// Scratch arena size in bytes
    pub scratch_pool_size: u32,
    /// Map-buffer threshold; `None` derives it from platform and vendor
    pub map_buffer_threshold: Option<u32>,
}

impl Default for BufferManagerConfig {
    fn default() -> Self {
        Self {
            scratch_pool_size: SCRATCH_POOL_SIZE,
            map_buffer_threshold: None,
        }
    }
}

/// Upload path chosen by `HardwareBufferManager::begin_staging`
#[derive(Debug, PartialEq, Eq)]
#[must_use = "staging must be released with end_staging"]
pub enum Staging {
    /// Copy through this scratch block, then sub-data upload
    Scratch(ScratchBlock),
    /// Map the GPU buffer and write into it directly
    Direct,
}

impl Staging {
    /// Scratch block, if this upload goes through scratch memory
    pub fn block(&self) -> Option<&ScratchBlock> {
        match self {
            Staging::Scratch(block) => Some(block),
            Staging::Direct => None,
        }
    }
}

/// Scratch pool and upload policy shared by the buffers of one device
///
/// `Send + Sync`; share it as `Arc<HardwareBufferManager>`.
pub struct HardwareBufferManager {
    scratch: ScratchAllocator,
    map_buffer_threshold: AtomicU32,
}

impl HardwareBufferManager {
    /// Create the manager and its scratch pool
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if `config.scratch_pool_size` is not
    /// a valid pool capacity.
    pub fn new(capabilities: &dyn DeviceCapabilities, config: &BufferManagerConfig) -> Result<Self> {
        let scratch = ScratchAllocator::with_capacity(config.scratch_pool_size)?;
        let threshold = config
            .map_buffer_threshold
            .unwrap_or_else(|| default_map_buffer_threshold(capabilities.vendor()));

        engine_info!(SOURCE,
            "Buffer manager ready: {} byte scratch pool, map threshold {} ({:?})",
            config.scratch_pool_size, threshold, capabilities.vendor());

        Ok(Self {
            scratch,
            map_buffer_threshold: AtomicU32::new(threshold),
        })
    }

    // ===== SCRATCH =====

    /// Allocate `size` bytes of scratch memory; `None` when exhausted
    pub fn allocate_scratch(&self, size: u32) -> Option<ScratchBlock> {
        self.scratch.allocate(size)
    }

    /// Return a scratch block to the pool
    pub fn deallocate_scratch(&self, block: ScratchBlock) {
        self.scratch.deallocate(block);
    }

    /// Underlying pool, for payload access and introspection
    pub fn scratch(&self) -> &ScratchAllocator {
        &self.scratch
    }

    // ===== THRESHOLD =====

    /// Upload size (bytes) at and above which buffers are mapped directly
    pub fn map_buffer_threshold(&self) -> u32 {
        self.map_buffer_threshold.load(Ordering::Relaxed)
    }

    /// Change the map-buffer threshold (0 disables scratch staging)
    pub fn set_map_buffer_threshold(&self, threshold: u32) {
        self.map_buffer_threshold.store(threshold, Ordering::Relaxed);
    }

    // ===== STAGING =====

    /// Pick the upload path for `len` bytes
    ///
    /// Uploads below the threshold get a scratch block when the pool has
    /// room. Everything else, including requests that find the pool full,
    /// is `Staging::Direct`.
    pub fn begin_staging(&self, len: usize) -> Staging {
        let threshold = self.map_buffer_threshold();
        let size = match u32::try_from(len) {
            Ok(size) if size < threshold => size,
            _ => return Staging::Direct,
        };

        match self.scratch.allocate(size) {
            Some(block) => Staging::Scratch(block),
            None => {
                engine_debug!(SOURCE,
                    "Scratch pool exhausted ({} bytes requested), mapping directly", size);
                Staging::Direct
            }
        }
    }

    /// Release whatever `begin_staging` reserved
    pub fn end_staging(&self, staging: Staging) {
        if let Staging::Scratch(block) = staging {
            self.scratch.deallocate(block);
        }
    }
}

#[cfg(test)]
#[path = "buffer_manager_tests.rs"]
mod tests;
