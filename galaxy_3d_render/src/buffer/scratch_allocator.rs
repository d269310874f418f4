/// Fixed-size scratch pool for short-lived buffer data.
///
/// The arena is split into consecutive blocks, each made of a fixed-width
/// header followed by its payload. Headers live inside the arena itself, so
/// the partition is recovered by walking them from offset 0:
///
/// ```text
/// | hdr | payload ... | hdr | payload ... | hdr | payload ........ |
/// 0     8                                                     capacity
/// ```
///
/// Allocation is first-fit with splitting, deallocation coalesces with both
/// neighbours. Both are linear in the number of blocks, which stays small
/// because allocations only live for the duration of a single upload.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicU32, Ordering};
use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};
use crate::{engine_debug, engine_error};

/// Default arena size in bytes (1 MiB)
pub const SCRATCH_POOL_SIZE: u32 = 1024 * 1024;

/// Alignment of the arena base address
pub const SCRATCH_ALIGNMENT: usize = 32;

/// Size of the in-band block header
pub const BLOCK_HEADER_SIZE: u32 = std::mem::size_of::<BlockHeader>() as u32;

const HEADER: usize = BLOCK_HEADER_SIZE as usize;

/// Largest representable arena (block sizes are 31-bit)
const MAX_POOL_SIZE: u32 = i32::MAX as u32;

const SOURCE: &str = "galaxy3d::ScratchAllocator";

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(1);

/// In-band block header
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
struct BlockHeader {
    /// Payload size in bytes
    size: u32,
    /// 1 if the block is free, 0 if allocated
    free: u32,
}

/// Storage unit of the arena; gives the backing slice its alignment
#[repr(C, align(32))]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ArenaChunk([u8; SCRATCH_ALIGNMENT]);

struct Arena {
    chunks: Box<[ArenaChunk]>,
    capacity: usize,
}

impl Arena {
    fn new(capacity: usize) -> Self {
        let chunk_count = capacity.div_ceil(SCRATCH_ALIGNMENT);
        let mut arena = Self {
            chunks: vec![ArenaChunk::zeroed(); chunk_count].into_boxed_slice(),
            capacity,
        };
        arena.set_header(0, BlockHeader { size: (capacity - HEADER) as u32, free: 1 });
        arena
    }

    fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<ArenaChunk, u8>(&self.chunks)[..self.capacity]
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        let capacity = self.capacity;
        &mut bytemuck::cast_slice_mut::<ArenaChunk, u8>(&mut self.chunks)[..capacity]
    }

    fn header(&self, offset: usize) -> BlockHeader {
        bytemuck::pod_read_unaligned(&self.bytes()[offset..offset + HEADER])
    }

    fn set_header(&mut self, offset: usize, header: BlockHeader) {
        self.bytes_mut()[offset..offset + HEADER].copy_from_slice(bytemuck::bytes_of(&header));
    }

    /// Iterate over `(header offset, header)` pairs in arena order
    fn walk(&self) -> impl Iterator<Item = (usize, BlockHeader)> + '_ {
        let mut pos = 0;
        std::iter::from_fn(move || {
            if pos >= self.capacity {
                return None;
            }
            let header = self.header(pos);
            let current = pos;
            pos += HEADER + header.size as usize;
            Some((current, header))
        })
    }
}

/// Handle to an allocated scratch block
///
/// Move-only: it is consumed by `ScratchAllocator::deallocate`, so a block
/// cannot be released twice.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "scratch blocks must be returned with deallocate"]
pub struct ScratchBlock {
    pool: u32,
    offset: u32,
    len: u32,
}

impl ScratchBlock {
    /// Byte offset of the payload inside the arena
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Payload size in bytes (requested size rounded up to 4)
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Snapshot of one block, in arena order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Byte offset of the header
    pub offset: u32,
    /// Payload size in bytes
    pub size: u32,
    /// Whether the block is free
    pub free: bool,
}

/// Thread-safe first-fit scratch pool
///
/// # Example
///
/// ```
/// use galaxy_3d_render::galaxy3d::buffer::ScratchAllocator;
///
/// let pool = ScratchAllocator::new();
/// let block = pool.allocate(100).unwrap();
/// pool.write(&block, 0, &[1, 2, 3, 4]).unwrap();
/// pool.deallocate(block);
/// assert_eq!(pool.live_allocations(), 0);
/// ```
pub struct ScratchAllocator {
    id: u32,
    capacity: u32,
    arena: Mutex<Arena>,
}

impl ScratchAllocator {
    /// Create a pool of `SCRATCH_POOL_SIZE` bytes
    pub fn new() -> Self {
        Self::build(SCRATCH_POOL_SIZE)
    }

    /// Create a pool of `capacity` bytes
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if `capacity` is not a multiple of 4,
    /// cannot hold one header plus 4 bytes, or exceeds 31 bits.
    pub fn with_capacity(capacity: u32) -> Result<Self> {
        if capacity % 4 != 0 || capacity < BLOCK_HEADER_SIZE + 4 || capacity > MAX_POOL_SIZE {
            let err = Error::InvalidResource(format!(
                "scratch pool capacity {} must be a multiple of 4 between {} and {}",
                capacity, BLOCK_HEADER_SIZE + 4, MAX_POOL_SIZE
            ));
            engine_error!(SOURCE, "{}", err);
            return Err(err);
        }
        Ok(Self::build(capacity))
    }

    fn build(capacity: u32) -> Self {
        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        engine_debug!(SOURCE, "Scratch pool {} created ({} bytes)", id, capacity);
        Self {
            id,
            capacity,
            arena: Mutex::new(Arena::new(capacity as usize)),
        }
    }

    // A panic inside a payload closure cannot leave headers half-written:
    // closures only ever see payload bytes.
    fn lock(&self) -> MutexGuard<'_, Arena> {
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== ALLOCATION =====

    /// Allocate `size` bytes (rounded up to a multiple of 4)
    ///
    /// Returns `None` when no free block is large enough. Exhaustion leaves
    /// the pool untouched; callers are expected to fall back to another
    /// upload path.
    pub fn allocate(&self, size: u32) -> Option<ScratchBlock> {
        let size = size.checked_next_multiple_of(4)?;
        let mut arena = self.lock();

        let (pos, header) = arena
            .walk()
            .find(|(_, header)| header.free != 0 && header.size >= size)?;

        let mut header = header;
        // Split only if the remainder can hold a header of its own
        if header.size > size + BLOCK_HEADER_SIZE {
            arena.set_header(pos + HEADER + size as usize, BlockHeader {
                size: header.size - size - BLOCK_HEADER_SIZE,
                free: 1,
            });
            header.size = size;
        }
        header.free = 0;
        arena.set_header(pos, header);

        Some(ScratchBlock {
            pool: self.id,
            offset: (pos + HEADER) as u32,
            len: size,
        })
    }

    /// Return a block to the pool, merging it with free neighbours
    ///
    /// # Panics
    ///
    /// A block that does not start at a live block boundary of this pool
    /// means the pool is corrupted; this is logged and aborts the caller.
    pub fn deallocate(&self, block: ScratchBlock) {
        if block.pool != self.id {
            self.corrupted(&block, "block belongs to another pool");
        }

        let outcome = {
            let mut arena = self.lock();
            Self::release(&mut arena, block.offset as usize)
        };

        if let Err(reason) = outcome {
            self.corrupted(&block, reason);
        }
    }

    fn release(arena: &mut Arena, payload_offset: usize) -> std::result::Result<(), &'static str> {
        let capacity = arena.capacity;
        let mut pos = 0;
        let mut previous: Option<usize> = None;

        while pos < capacity {
            let mut header = arena.header(pos);

            if pos + HEADER == payload_offset {
                if header.free != 0 {
                    return Err("block is already free");
                }
                header.free = 1;
                let mut current = pos;

                // Merge backward
                if let Some(prev_pos) = previous {
                    let mut prev = arena.header(prev_pos);
                    if prev.free != 0 {
                        prev.size += header.size + BLOCK_HEADER_SIZE;
                        current = prev_pos;
                        header = prev;
                    }
                }

                // Merge forward
                let next_pos = current + HEADER + header.size as usize;
                if next_pos < capacity {
                    let next = arena.header(next_pos);
                    if next.free != 0 {
                        header.size += next.size + BLOCK_HEADER_SIZE;
                    }
                }

                arena.set_header(current, header);
                return Ok(());
            }

            previous = Some(pos);
            pos += HEADER + header.size as usize;
        }

        Err("no block starts at this offset")
    }

    fn corrupted(&self, block: &ScratchBlock, reason: &str) -> ! {
        engine_error!(SOURCE,
            "Memory deallocation error in pool {}: {} (offset {}, pool {})",
            self.id, reason, block.offset, block.pool);
        panic!("scratch pool corrupted: {}", reason);
    }

    // ===== PAYLOAD ACCESS =====

    /// Run `f` on the payload of `block` while holding the pool lock
    pub fn with_payload_mut<R>(&self, block: &ScratchBlock, f: impl FnOnce(&mut [u8]) -> R) -> R {
        if block.pool != self.id {
            self.corrupted(block, "block belongs to another pool");
        }
        let start = block.offset as usize;
        let mut arena = self.lock();
        f(&mut arena.bytes_mut()[start..start + block.len as usize])
    }

    /// Run `f` on the payload of `block` while holding the pool lock
    pub fn with_payload<R>(&self, block: &ScratchBlock, f: impl FnOnce(&[u8]) -> R) -> R {
        if block.pool != self.id {
            self.corrupted(block, "block belongs to another pool");
        }
        let start = block.offset as usize;
        let arena = self.lock();
        f(&arena.bytes()[start..start + block.len as usize])
    }

    /// Copy `data` into the payload of `block` at `offset`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if the range exceeds the payload.
    pub fn write(&self, block: &ScratchBlock, offset: usize, data: &[u8]) -> Result<()> {
        Self::check_range(block, offset, data.len())?;
        self.with_payload_mut(block, |payload| {
            payload[offset..offset + data.len()].copy_from_slice(data);
        });
        Ok(())
    }

    /// Copy the payload of `block` starting at `offset` into `out`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if the range exceeds the payload.
    pub fn read(&self, block: &ScratchBlock, offset: usize, out: &mut [u8]) -> Result<()> {
        let len = out.len();
        Self::check_range(block, offset, len)?;
        self.with_payload(block, |payload| {
            out.copy_from_slice(&payload[offset..offset + len]);
        });
        Ok(())
    }

    fn check_range(block: &ScratchBlock, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= block.len as usize => Ok(()),
            _ => {
                let err = Error::InvalidResource(format!(
                    "range {}..{} exceeds scratch block of {} bytes",
                    offset, offset.saturating_add(len), block.len
                ));
                engine_error!(SOURCE, "{}", err);
                Err(err)
            }
        }
    }

    // ===== INTROSPECTION =====

    /// Total arena size in bytes, headers included
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// All blocks in arena order
    pub fn blocks(&self) -> Vec<BlockInfo> {
        self.lock()
            .walk()
            .map(|(offset, header)| BlockInfo {
                offset: offset as u32,
                size: header.size,
                free: header.free != 0,
            })
            .collect()
    }

    /// Sum of free payload bytes
    pub fn free_bytes(&self) -> u32 {
        self.lock()
            .walk()
            .filter(|(_, header)| header.free != 0)
            .map(|(_, header)| header.size)
            .sum()
    }

    /// Largest request that can currently succeed
    pub fn largest_free_block(&self) -> u32 {
        self.lock()
            .walk()
            .filter(|(_, header)| header.free != 0)
            .map(|(_, header)| header.size)
            .max()
            .unwrap_or(0)
    }

    /// Number of blocks currently allocated
    pub fn live_allocations(&self) -> usize {
        self.lock().walk().filter(|(_, header)| header.free == 0).count()
    }

    #[cfg(test)]
    fn raw_bytes(&self) -> Vec<u8> {
        self.lock().bytes().to_vec()
    }
}

impl Default for ScratchAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scratch_allocator_tests.rs"]
mod tests;
