//! Platform abstraction layer
//!
//! This module provides platform-independent interfaces for:
//! - Finding the target process by name
//! - Memory reading from the target process
//! - Module enumeration
//! - Address validation

use std::time::{Duration, Instant};

use sysinfo::{ProcessRefreshKind, RefreshKind, System, UpdateKind};
use tracing::debug;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsPlatform;

#[cfg(unix)]
mod linux;
#[cfg(unix)]
pub use linux::LinuxPlatform;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// Platform-specific errors
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// No running process carries the requested name
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    /// Failed to read memory at address
    #[error("Memory read failed at 0x{address:X} (size: {size}): {reason}")]
    MemoryReadFailed {
        /// The address that failed to read
        address: usize,
        /// Number of bytes requested
        size: usize,
        /// Why the read failed
        reason: String,
    },

    /// Invalid address
    #[error("Invalid memory address: 0x{0:X}")]
    InvalidAddress(usize),

    /// Module not found
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    /// Access denied
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Platform-specific error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Information about a loaded module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Base address of the module
    pub base_address: usize,
    /// Size of the module in bytes
    pub size: usize,
    /// Name of the module
    pub name: String,
    /// Full path to the module
    pub path: String,
}

/// Memory region information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    /// Start address of the region
    pub start: usize,
    /// End address of the region (exclusive)
    pub end: usize,
    /// Whether the region is readable
    pub readable: bool,
    /// Whether the region is writable
    pub writable: bool,
    /// Whether the region is executable
    pub executable: bool,
}

impl MemoryRegion {
    /// Get the size of this memory region
    #[inline]
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if an address is within this region
    #[inline]
    pub fn contains(&self, address: usize) -> bool {
        address >= self.start && address < self.end
    }
}

/// Short-lived cache of the target's memory map.
///
/// The map of a live game changes as it allocates, so entries expire after
/// [`RegionCache::CACHE_DURATION`].
pub(crate) struct RegionCache {
    regions: Vec<MemoryRegion>,
    last_update: Option<Instant>,
}

impl RegionCache {
    pub(crate) const CACHE_DURATION: Duration = Duration::from_secs(1);

    pub(crate) fn new() -> Self {
        Self {
            regions: Vec::new(),
            last_update: None,
        }
    }

    pub(crate) fn is_stale(&self) -> bool {
        self.last_update
            .map_or(true, |at| at.elapsed() > Self::CACHE_DURATION)
    }

    pub(crate) fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    pub(crate) fn store(&mut self, regions: Vec<MemoryRegion>) {
        self.regions = regions;
        self.last_update = Some(Instant::now());
    }
}

/// Core trait for reading memory from a target process
///
/// This trait abstracts platform-specific memory reading operations,
/// allowing the pointer walker to work with any implementation.
pub trait MemoryReader: Send + Sync {
    /// Read raw bytes from memory
    fn read_bytes(&self, address: usize, size: usize) -> Result<Vec<u8>, PlatformError>;

    /// Read a POD (Plain Old Data) type from memory
    fn read<T: bytemuck::Pod>(&self, address: usize) -> Result<T, PlatformError>
    where
        Self: Sized,
    {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(address, size)?;

        if bytes.len() != size {
            return Err(PlatformError::MemoryReadFailed {
                address,
                size,
                reason: format!("Expected {} bytes, got {}", size, bytes.len()),
            });
        }

        Ok(bytemuck::pod_read_unaligned(&bytes))
    }

    /// Read a 64-bit little-endian pointer
    fn read_ptr(&self, address: usize) -> Result<usize, PlatformError> {
        let bytes = self.read_bytes(address, 8)?;
        let raw: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| PlatformError::MemoryReadFailed {
                address,
                size: 8,
                reason: format!("Expected 8 bytes, got {}", bytes.len()),
            })?;

        usize::try_from(u64::from_le_bytes(raw)).map_err(|_| PlatformError::InvalidAddress(address))
    }

    /// Check if an address is valid (readable)
    fn is_valid_address(&self, address: usize) -> bool;

    /// Check if a memory range is valid
    fn is_valid_range(&self, address: usize, size: usize) -> bool {
        if size == 0 {
            return self.is_valid_address(address);
        }

        match address.checked_add(size - 1) {
            Some(last) => self.is_valid_address(address) && self.is_valid_address(last),
            None => false,
        }
    }
}

/// Extended platform operations
pub trait Platform: MemoryReader {
    /// Process ID of the target
    fn pid(&self) -> u32;

    /// Whether the target process is still running
    fn is_alive(&self) -> bool;

    /// Get all loaded modules in the target process
    fn get_modules(&self) -> Result<Vec<ModuleInfo>, PlatformError>;

    /// Get a specific module by name
    fn get_module(&self, name: &str) -> Result<ModuleInfo, PlatformError> {
        self.get_modules()?
            .into_iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| PlatformError::ModuleNotFound(name.to_string()))
    }

    /// Get all memory regions
    fn get_memory_regions(&self) -> Result<Vec<MemoryRegion>, PlatformError>;
}

/// Find the PID of a running process by executable name (case-insensitive).
///
/// Under Wine/Proton the game shows up as a Linux process whose name is
/// truncated, so the command line is checked as well.
pub fn find_process(name: &str) -> Result<u32, PlatformError> {
    // Names come with every refresh; the command line is only needed once
    let system = System::new_with_specifics(RefreshKind::nothing().with_processes(
        ProcessRefreshKind::nothing().with_cmd(UpdateKind::OnlyIfNotSet),
    ));

    let wanted = name.to_ascii_lowercase();
    let mut candidates: Vec<u32> = system
        .processes()
        .values()
        // Linux lists threads as tasks of the same name
        .filter(|process| process.thread_kind().is_none())
        .filter(|process| {
            let proc_name = process.name().to_string_lossy().to_ascii_lowercase();
            if proc_name == wanted {
                return true;
            }
            process
                .cmd()
                .first()
                .map(|arg0| {
                    let arg0 = arg0.to_string_lossy().to_ascii_lowercase();
                    arg0.rsplit(['/', '\\']).next() == Some(wanted.as_str())
                })
                .unwrap_or(false)
        })
        .map(|process| process.pid().as_u32())
        .collect();

    // Lowest PID first: the parent, not a crash handler spawned later
    candidates.sort_unstable();

    match candidates.first() {
        Some(&pid) => {
            debug!(process = name, pid, matches = candidates.len(), "Found target process");
            Ok(pid)
        }
        None => Err(PlatformError::ProcessNotFound(name.to_string())),
    }
}

/// Open the default platform against the named process
pub fn attach_by_name(name: &str) -> Result<DefaultPlatform, PlatformError> {
    let pid = find_process(name)?;

    // The process may exit between the lookup and the open
    DefaultPlatform::attach(pid).map_err(|e| match e {
        PlatformError::ProcessNotFound(_) => PlatformError::ProcessNotFound(name.to_string()),
        other => other,
    })
}

/// Default platform implementation for the current OS
#[cfg(windows)]
pub type DefaultPlatform = WindowsPlatform;

#[cfg(unix)]
pub type DefaultPlatform = LinuxPlatform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_contains() {
        let region = MemoryRegion {
            start: 0x1000,
            end: 0x2000,
            readable: true,
            writable: false,
            executable: false,
        };

        assert_eq!(region.size(), 0x1000);
        assert!(region.contains(0x1000));
        assert!(region.contains(0x1FFF));
        assert!(!region.contains(0x2000));
    }

    #[test]
    fn test_region_cache_expiry() {
        let mut cache = RegionCache::new();
        assert!(cache.is_stale());

        cache.store(vec![]);
        assert!(!cache.is_stale());
        assert!(cache.regions().is_empty());

        let expired = Instant::now()
            .checked_sub(RegionCache::CACHE_DURATION + Duration::from_millis(1))
            .unwrap();
        cache.last_update = Some(expired);
        assert!(cache.is_stale());
    }

    #[test]
    fn test_find_missing_process() {
        let result = find_process("definitely-not-running-phasmowatch.exe");
        assert!(matches!(result, Err(PlatformError::ProcessNotFound(_))));
    }

    #[test]
    fn test_find_process_ignores_case() {
        let exe = std::env::current_exe().unwrap();
        let name = exe.file_name().unwrap().to_string_lossy().to_ascii_uppercase();

        assert_eq!(find_process(&name).unwrap(), std::process::id());
    }
}
