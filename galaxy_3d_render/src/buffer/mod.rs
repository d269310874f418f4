//! Hardware buffer support
//!
//! Provides the scratch pool used to stage small buffer uploads and the
//! hardware buffer manager that owns it.

mod scratch_allocator;
mod buffer_manager;

pub use scratch_allocator::{
    BlockInfo, ScratchAllocator, ScratchBlock,
    BLOCK_HEADER_SIZE, SCRATCH_ALIGNMENT, SCRATCH_POOL_SIZE,
};
pub use buffer_manager::{
    BufferManagerConfig, HardwareBufferManager, Staging,
    DEFAULT_MAP_BUFFER_THRESHOLD, default_map_buffer_threshold,
};
