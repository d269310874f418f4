use super::*;
use crate::device::StaticCapabilities;

// ============================================================================
// Helpers
// ============================================================================

fn caps(vendor: GpuVendor) -> StaticCapabilities {
    StaticCapabilities { vendor, ..StaticCapabilities::default() }
}

fn manager(pool_size: u32, threshold: u32) -> HardwareBufferManager {
    let config = BufferManagerConfig {
        scratch_pool_size: pool_size,
        map_buffer_threshold: Some(threshold),
    };
    HardwareBufferManager::new(&caps(GpuVendor::Unknown), &config).unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_default_config() {
    let config = BufferManagerConfig::default();
    assert_eq!(config.scratch_pool_size, SCRATCH_POOL_SIZE);
    assert_eq!(config.map_buffer_threshold, None);
}

#[test]
fn test_default_threshold_constant() {
    assert_eq!(DEFAULT_MAP_BUFFER_THRESHOLD, 32 * 1024);
}

#[cfg(not(target_os = "windows"))]
#[test]
fn test_default_threshold_is_zero_outside_windows() {
    for vendor in [GpuVendor::Nvidia, GpuVendor::Amd, GpuVendor::Intel, GpuVendor::Unknown] {
        assert_eq!(default_map_buffer_threshold(vendor), 0);
    }
}

#[cfg(target_os = "windows")]
#[test]
fn test_default_threshold_on_windows() {
    assert_eq!(default_map_buffer_threshold(GpuVendor::Amd), u32::MAX);
    assert_eq!(default_map_buffer_threshold(GpuVendor::Nvidia), DEFAULT_MAP_BUFFER_THRESHOLD);
    assert_eq!(default_map_buffer_threshold(GpuVendor::Intel), DEFAULT_MAP_BUFFER_THRESHOLD);
}

#[test]
fn test_new_uses_vendor_default_when_unset() {
    let vendor = GpuVendor::Amd;
    let manager = HardwareBufferManager::new(&caps(vendor), &BufferManagerConfig::default()).unwrap();
    assert_eq!(manager.map_buffer_threshold(), default_map_buffer_threshold(vendor));
    assert_eq!(manager.scratch().capacity(), SCRATCH_POOL_SIZE);
}

#[test]
fn test_new_uses_explicit_threshold() {
    let manager = manager(1024, 77);
    assert_eq!(manager.map_buffer_threshold(), 77);
    assert_eq!(manager.scratch().capacity(), 1024);
}

#[test]
fn test_new_rejects_invalid_pool_size() {
    let config = BufferManagerConfig { scratch_pool_size: 6, map_buffer_threshold: None };
    let result = HardwareBufferManager::new(&caps(GpuVendor::Unknown), &config);
    assert!(matches!(result, Err(crate::error::Error::InvalidResource(_))));
}

#[test]
fn test_set_threshold() {
    let manager = manager(1024, 0);
    manager.set_map_buffer_threshold(4096);
    assert_eq!(manager.map_buffer_threshold(), 4096);
}

// ============================================================================
// Scratch delegation
// ============================================================================

#[test]
fn test_allocate_and_deallocate_scratch() {
    let manager = manager(1024, 0);
    let block = manager.allocate_scratch(100).unwrap();
    assert_eq!(manager.scratch().live_allocations(), 1);
    manager.deallocate_scratch(block);
    assert_eq!(manager.scratch().live_allocations(), 0);
}

#[test]
fn test_allocate_scratch_exhausted() {
    let manager = manager(64, 0);
    assert!(manager.allocate_scratch(1024).is_none());
}

// ============================================================================
// Staging
// ============================================================================

#[test]
fn test_small_upload_goes_through_scratch() {
    let manager = manager(1024, 256);
    let staging = manager.begin_staging(100);
    assert_eq!(staging.block().map(|b| b.len()), Some(100));
    manager.end_staging(staging);
    assert_eq!(manager.scratch().live_allocations(), 0);
}

#[test]
fn test_upload_at_threshold_is_direct() {
    let manager = manager(1024, 256);
    assert_eq!(manager.begin_staging(256), Staging::Direct);
    assert_eq!(manager.begin_staging(1000), Staging::Direct);
}

#[test]
fn test_zero_threshold_always_direct() {
    let manager = manager(1024, 0);
    assert_eq!(manager.begin_staging(0), Staging::Direct);
    assert_eq!(manager.begin_staging(4), Staging::Direct);
}

#[test]
fn test_exhausted_pool_falls_back_to_direct() {
    let manager = manager(128, u32::MAX);
    let held = manager.begin_staging(100);
    assert!(held.block().is_some());

    // Pool can no longer fit another 100 bytes
    assert_eq!(manager.begin_staging(100), Staging::Direct);

    manager.end_staging(held);
    let again = manager.begin_staging(100);
    assert!(again.block().is_some());
    manager.end_staging(again);
}

#[test]
fn test_oversized_length_is_direct() {
    let manager = manager(1024, u32::MAX);
    assert_eq!(manager.begin_staging(usize::MAX), Staging::Direct);
}

#[test]
fn test_end_staging_direct_is_noop() {
    let manager = manager(1024, 0);
    let before = manager.scratch().blocks();
    manager.end_staging(Staging::Direct);
    assert_eq!(manager.scratch().blocks(), before);
}
