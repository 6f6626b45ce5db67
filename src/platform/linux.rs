//! Linux platform implementation
//!
//! Reads another process through `process_vm_readv`, falling back to
//! `/proc/[pid]/mem`, and learns its layout from `/proc/[pid]/maps`.
//! Works for native games and for Windows games running under Wine/Proton,
//! where PE images show up as file-backed mappings.

use super::{MemoryReader, MemoryRegion, ModuleInfo, Platform, PlatformError, RegionCache};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// One parsed line of `/proc/[pid]/maps`
#[derive(Debug, Clone, PartialEq, Eq)]
struct MapsEntry {
    region: MemoryRegion,
    path: Option<String>,
}

/// Parse a single maps line.
///
/// Format: "address permissions offset dev inode pathname"
/// Example: "7f1234567000-7f123456a000 r-xp 00000000 08:01 123456 /lib/x86_64-linux-gnu/libc.so.6"
fn parse_maps_line(line: &str) -> Result<Option<MapsEntry>, PlatformError> {
    let mut parts = line.splitn(6, char::is_whitespace);

    let (Some(address_range), Some(perms)) = (parts.next(), parts.next()) else {
        return Ok(None);
    };

    let Some((start, end)) = address_range.split_once('-') else {
        return Ok(None);
    };

    let start = usize::from_str_radix(start, 16)
        .map_err(|e| PlatformError::Other(format!("Invalid address: {}", e)))?;
    let end = usize::from_str_radix(end, 16)
        .map_err(|e| PlatformError::Other(format!("Invalid address: {}", e)))?;

    let mut flags = perms.chars();
    let readable = flags.next() == Some('r');
    let writable = flags.next() == Some('w');
    let executable = flags.next() == Some('x');

    // offset, dev, inode
    let path = parts
        .nth(3)
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.starts_with('['))
        .map(str::to_string);

    Ok(Some(MapsEntry {
        region: MemoryRegion {
            start,
            end,
            readable,
            writable,
            executable,
        },
        path,
    }))
}

/// Group file-backed mappings into modules.
///
/// A module spans from its lowest to its highest mapping. PE images mapped
/// by Wine start with a read-only header mapping, so every mapping counts,
/// not only executable ones.
fn modules_from_maps(entries: &[MapsEntry]) -> Vec<ModuleInfo> {
    let mut order: Vec<&str> = Vec::new();
    let mut spans: HashMap<&str, (usize, usize)> = HashMap::new();

    for entry in entries {
        let Some(path) = entry.path.as_deref() else {
            continue;
        };

        spans
            .entry(path)
            .and_modify(|(start, end)| {
                *start = (*start).min(entry.region.start);
                *end = (*end).max(entry.region.end);
            })
            .or_insert_with(|| {
                order.push(path);
                (entry.region.start, entry.region.end)
            });
    }

    order
        .into_iter()
        .map(|path| {
            let (start, end) = spans[path];
            // Wine paths keep their backslashes when the prefix is on a dosdevice
            let name = path.rsplit(['/', '\\']).next().unwrap_or(path).to_string();

            ModuleInfo {
                base_address: start,
                size: end - start,
                name,
                path: path.to_string(),
            }
        })
        .collect()
}

/// Classify a failure to read a /proc file of the target
fn proc_error(pid: i32, what: &str, e: std::io::Error) -> PlatformError {
    match e.kind() {
        // Gone between the lookup and the open, or while reading
        std::io::ErrorKind::NotFound => PlatformError::ProcessNotFound(pid.to_string()),
        _ if e.raw_os_error() == Some(libc::ESRCH) => {
            PlatformError::ProcessNotFound(pid.to_string())
        }
        std::io::ErrorKind::PermissionDenied => {
            PlatformError::AccessDenied(format!("Failed to open process {}: {}", pid, e))
        }
        _ => PlatformError::Other(format!("Failed to read {}: {}", what, e)),
    }
}

/// Linux platform implementation
pub struct LinuxPlatform {
    /// Process ID we're reading from
    pid: i32,
    /// Cached memory regions
    regions_cache: RwLock<RegionCache>,
}

impl LinuxPlatform {
    /// Open a process for reading.
    ///
    /// The target keeps running; nothing here stops or traces it.
    pub fn attach(pid: u32) -> Result<Self, PlatformError> {
        let pid_i32 = i32::try_from(pid)
            .map_err(|_| PlatformError::Other(format!("PID out of range: {}", pid)))?;

        if !Path::new(&format!("/proc/{}", pid)).exists() {
            return Err(PlatformError::ProcessNotFound(pid.to_string()));
        }

        let platform = Self {
            pid: pid_i32,
            regions_cache: RwLock::new(RegionCache::new()),
        };

        // Fails early when ptrace_scope or ownership forbids access
        platform.read_maps()?;

        debug!(pid, "Attached to process");
        Ok(platform)
    }

    fn read_maps(&self) -> Result<Vec<MapsEntry>, PlatformError> {
        let maps_path = format!("/proc/{}/maps", self.pid);
        let file = File::open(&maps_path).map_err(|e| proc_error(self.pid, &maps_path, e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line.map_err(|e| proc_error(self.pid, &maps_path, e))?;
            if let Some(entry) = parse_maps_line(&line)? {
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    /// Get memory regions, using cache if still fresh
    fn get_regions_cached(&self) -> Result<Vec<MemoryRegion>, PlatformError> {
        {
            let cache = self.regions_cache.read();
            if !cache.is_stale() {
                return Ok(cache.regions().to_vec());
            }
        }

        let regions = self.get_memory_regions()?;
        self.regions_cache.write().store(regions.clone());

        Ok(regions)
    }

    fn read_vm(&self, address: usize, buffer: &mut [u8]) -> std::io::Result<usize> {
        let local = libc::iovec {
            iov_base: buffer.as_mut_ptr().cast(),
            iov_len: buffer.len(),
        };
        let remote = libc::iovec {
            iov_base: address as *mut libc::c_void,
            iov_len: buffer.len(),
        };

        // SAFETY: `local` points at `buffer`, which is valid for writes of
        // `buffer.len()` bytes; the remote iovec is only dereferenced by the
        // kernel, which validates it against the target's address space.
        let read = unsafe { libc::process_vm_readv(self.pid, &local, 1, &remote, 1, 0) };

        if read < 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(read as usize)
        }
    }

    fn read_proc_mem(&self, address: usize, buffer: &mut [u8]) -> std::io::Result<()> {
        use std::os::unix::fs::FileExt;

        let mem_path = format!("/proc/{}/mem", self.pid);
        let file = File::open(mem_path)?;
        file.read_exact_at(buffer, address as u64)
    }
}

impl MemoryReader for LinuxPlatform {
    fn read_bytes(&self, address: usize, size: usize) -> Result<Vec<u8>, PlatformError> {
        if size == 0 {
            return Ok(Vec::new());
        }

        if !self.is_valid_range(address, size) {
            return Err(PlatformError::InvalidAddress(address));
        }

        let mut buffer = vec![0u8; size];

        match self.read_vm(address, &mut buffer) {
            Ok(read) if read == size => return Ok(buffer),
            Ok(read) => {
                return Err(PlatformError::MemoryReadFailed {
                    address,
                    size,
                    reason: format!("Expected to read {} bytes, got {}", size, read),
                })
            }
            // ENOSYS without CONFIG_CROSS_MEMORY_ATTACH, EPERM under some seccomp profiles
            Err(e) => {
                trace!(error = %e, "process_vm_readv failed, using /proc/pid/mem");
            }
        }

        self.read_proc_mem(address, &mut buffer)
            .map_err(|e| PlatformError::MemoryReadFailed {
                address,
                size,
                reason: format!("Read failed: {}", e),
            })?;

        Ok(buffer)
    }

    fn is_valid_address(&self, address: usize) -> bool {
        if address == 0 {
            return false;
        }

        match self.get_regions_cached() {
            Ok(regions) => regions.iter().any(|r| r.contains(address) && r.readable),
            Err(_) => false,
        }
    }
}

impl Platform for LinuxPlatform {
    fn pid(&self) -> u32 {
        self.pid as u32
    }

    fn is_alive(&self) -> bool {
        // A zombie still has a /proc entry but no address space
        std::fs::read_to_string(format!("/proc/{}/stat", self.pid))
            .map(|stat| {
                stat.rsplit_once(')')
                    .and_then(|(_, rest)| rest.split_whitespace().next())
                    .map_or(false, |state| state != "Z" && state != "X")
            })
            .unwrap_or(false)
    }

    fn get_modules(&self) -> Result<Vec<ModuleInfo>, PlatformError> {
        Ok(modules_from_maps(&self.read_maps()?))
    }

    fn get_memory_regions(&self) -> Result<Vec<MemoryRegion>, PlatformError> {
        Ok(self.read_maps()?.into_iter().map(|e| e.region).collect())
    }
}
