//! Windows platform implementation
//!
//! This module provides Windows-specific implementations for memory reading
//! and module enumeration in another process using Win32 APIs.

use super::{MemoryReader, MemoryRegion, ModuleInfo, Platform, PlatformError, RegionCache};
use parking_lot::RwLock;
use tracing::debug;
use windows::Win32::Foundation::{CloseHandle, BOOL, HANDLE, HMODULE, STILL_ACTIVE};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Memory::{
    VirtualQueryEx, MEMORY_BASIC_INFORMATION, MEM_COMMIT, PAGE_EXECUTE, PAGE_EXECUTE_READ,
    PAGE_EXECUTE_READWRITE, PAGE_EXECUTE_WRITECOPY, PAGE_GUARD, PAGE_NOACCESS, PAGE_READONLY,
    PAGE_READWRITE, PAGE_WRITECOPY,
};
use windows::Win32::System::ProcessStatus::{
    EnumProcessModulesEx, GetModuleBaseNameW, GetModuleFileNameExW, GetModuleInformation,
    LIST_MODULES_ALL, MODULEINFO,
};
use windows::Win32::System::Threading::{
    GetExitCodeProcess, OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
};

/// Windows platform implementation
///
/// Holds a read-only handle to the target; the handle is closed on drop.
pub struct WindowsPlatform {
    /// Target process ID
    pid: u32,
    /// Handle to the target process
    process_handle: HANDLE,
    /// Cached memory regions for validation
    validity_cache: RwLock<RegionCache>,
}

impl WindowsPlatform {
    /// Open a process for reading
    pub fn attach(process_id: u32) -> Result<Self, PlatformError> {
        // SAFETY: OpenProcess has no memory-safety preconditions; the handle
        // is owned by the returned value and closed in Drop.
        let process_handle = unsafe {
            OpenProcess(
                PROCESS_VM_READ | PROCESS_QUERY_INFORMATION,
                BOOL::from(false),
                process_id,
            )
        }
        .map_err(|e| {
            PlatformError::AccessDenied(format!("Failed to open process {}: {}", process_id, e))
        })?;

        debug!(pid = process_id, "Attached to process");

        Ok(Self {
            pid: process_id,
            process_handle,
            validity_cache: RwLock::new(RegionCache::new()),
        })
    }

    /// Update the memory validity cache
    fn update_validity_cache(&self) -> Result<(), PlatformError> {
        if !self.validity_cache.read().is_stale() {
            return Ok(());
        }

        let regions = self.query_all_memory_regions()?;
        self.validity_cache.write().store(regions);

        Ok(())
    }

    /// Query all committed memory regions
    fn query_all_memory_regions(&self) -> Result<Vec<MemoryRegion>, PlatformError> {
        let mut regions = Vec::new();
        let mut address = 0usize;

        loop {
            let mut mbi = MEMORY_BASIC_INFORMATION::default();

            // SAFETY: `mbi` is a properly sized, writable out-parameter.
            let result = unsafe {
                VirtualQueryEx(
                    self.process_handle,
                    Some(address as *const _),
                    &mut mbi,
                    std::mem::size_of::<MEMORY_BASIC_INFORMATION>(),
                )
            };

            if result == 0 {
                break;
            }

            if mbi.State == MEM_COMMIT {
                let protect = mbi.Protect;
                let guarded = (protect & PAGE_GUARD).0 != 0 || protect == PAGE_NOACCESS;
                let base = protect & !PAGE_GUARD;

                let readable = !guarded
                    && matches!(
                        base,
                        PAGE_READONLY
                            | PAGE_READWRITE
                            | PAGE_WRITECOPY
                            | PAGE_EXECUTE_READ
                            | PAGE_EXECUTE_READWRITE
                            | PAGE_EXECUTE_WRITECOPY
                    );

                let writable = matches!(
                    base,
                    PAGE_READWRITE
                        | PAGE_WRITECOPY
                        | PAGE_EXECUTE_READWRITE
                        | PAGE_EXECUTE_WRITECOPY
                );

                let executable = matches!(
                    base,
                    PAGE_EXECUTE
                        | PAGE_EXECUTE_READ
                        | PAGE_EXECUTE_READWRITE
                        | PAGE_EXECUTE_WRITECOPY
                );

                regions.push(MemoryRegion {
                    start: mbi.BaseAddress as usize,
                    end: (mbi.BaseAddress as usize) + mbi.RegionSize,
                    readable,
                    writable,
                    executable,
                });
            }

            address = (mbi.BaseAddress as usize).wrapping_add(mbi.RegionSize);

            // Wrapped past the top of the address space
            if address == 0 {
                break;
            }
        }

        Ok(regions)
    }
}

impl Drop for WindowsPlatform {
    fn drop(&mut self) {
        if !self.process_handle.is_invalid() {
            // SAFETY: the handle came from OpenProcess and is closed exactly once.
            let _ = unsafe { CloseHandle(self.process_handle) };
        }
    }
}

impl MemoryReader for WindowsPlatform {
    fn read_bytes(&self, address: usize, size: usize) -> Result<Vec<u8>, PlatformError> {
        if size == 0 {
            return Ok(Vec::new());
        }

        if !self.is_valid_range(address, size) {
            return Err(PlatformError::InvalidAddress(address));
        }

        let mut buffer = vec![0u8; size];
        let mut bytes_read = 0;

        // SAFETY: `buffer` is valid for writes of `size` bytes.
        unsafe {
            ReadProcessMemory(
                self.process_handle,
                address as *const _,
                buffer.as_mut_ptr() as *mut _,
                size,
                Some(&mut bytes_read),
            )
        }
        .map_err(|e| PlatformError::MemoryReadFailed {
            address,
            size,
            reason: format!("ReadProcessMemory failed: {}", e),
        })?;

        if bytes_read != size {
            return Err(PlatformError::MemoryReadFailed {
                address,
                size,
                reason: format!("Expected to read {} bytes, got {}", size, bytes_read),
            });
        }

        Ok(buffer)
    }

    fn is_valid_address(&self, address: usize) -> bool {
        // The first 64KB is never mapped on Windows
        if address < 0x10000 {
            return false;
        }

        if self.update_validity_cache().is_err() {
            return false;
        }

        self.validity_cache
            .read()
            .regions()
            .iter()
            .any(|r| r.contains(address) && r.readable)
    }
}

impl Platform for WindowsPlatform {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn is_alive(&self) -> bool {
        let mut code = 0u32;
        // SAFETY: `code` is a valid out-parameter.
        unsafe { GetExitCodeProcess(self.process_handle, &mut code) }.is_ok()
            && code == STILL_ACTIVE.0 as u32
    }

    fn get_modules(&self) -> Result<Vec<ModuleInfo>, PlatformError> {
        let mut modules = vec![HMODULE::default(); 1024];
        let mut bytes_needed = 0u32;

        // SAFETY: `modules` is writable for the byte count passed.
        unsafe {
            EnumProcessModulesEx(
                self.process_handle,
                modules.as_mut_ptr(),
                (modules.len() * std::mem::size_of::<HMODULE>()) as u32,
                &mut bytes_needed,
                LIST_MODULES_ALL,
            )
        }
        .map_err(|e| PlatformError::Other(format!("EnumProcessModulesEx failed: {}", e)))?;

        let module_count = (bytes_needed as usize) / std::mem::size_of::<HMODULE>();
        modules.truncate(module_count);

        let mut result = Vec::with_capacity(modules.len());

        for hmodule in modules {
            let mut module_info = MODULEINFO::default();

            // SAFETY: `module_info` is a properly sized out-parameter.
            unsafe {
                GetModuleInformation(
                    self.process_handle,
                    hmodule,
                    &mut module_info,
                    std::mem::size_of::<MODULEINFO>() as u32,
                )
            }
            .map_err(|e| PlatformError::Other(format!("GetModuleInformation failed: {}", e)))?;

            let mut name_buf = vec![0u16; 260];
            // SAFETY: the buffer slice carries its own length.
            let name_len =
                unsafe { GetModuleBaseNameW(self.process_handle, hmodule, &mut name_buf) };
            let name = String::from_utf16_lossy(&name_buf[..name_len as usize]);

            let mut path_buf = vec![0u16; 260];
            // SAFETY: as above.
            let path_len =
                unsafe { GetModuleFileNameExW(self.process_handle, hmodule, &mut path_buf) };
            let path = String::from_utf16_lossy(&path_buf[..path_len as usize]);

            result.push(ModuleInfo {
                base_address: module_info.lpBaseOfDll as usize,
                size: module_info.SizeOfImage as usize,
                name,
                path,
            });
        }

        Ok(result)
    }

    fn get_memory_regions(&self) -> Result<Vec<MemoryRegion>, PlatformError> {
        self.update_validity_cache()?;
        Ok(self.validity_cache.read().regions().to_vec())
    }
}

// The handle is only used for read-only queries, which Win32 allows from any thread
unsafe impl Send for WindowsPlatform {}
unsafe impl Sync for WindowsPlatform {}

#[cfg(test)]
mod tests {
    use super::*;

    fn attach_self() -> WindowsPlatform {
        WindowsPlatform::attach(std::process::id()).unwrap()
    }

    #[test]
    fn test_read_memory() {
        let platform = attach_self();

        let test_value: u64 = 0x1234567890ABCDEF;
        let address = &test_value as *const u64 as usize;

        let result: u64 = platform.read(address).unwrap();
        assert_eq!(result, test_value);
    }

    #[test]
    fn test_is_valid_address() {
        let platform = attach_self();

        let valid_value = 42u32;
        assert!(platform.is_valid_address(&valid_value as *const _ as usize));

        assert!(!platform.is_valid_address(0));
        assert!(!platform.is_valid_address(0x1000));
    }

    #[test]
    fn test_get_modules() {
        let platform = attach_self();
        let modules = platform.get_modules().unwrap();

        assert!(!modules.is_empty());
        assert!(modules.iter().any(|m| m.name.ends_with(".exe")));
        assert!(platform.get_module("KERNEL32.DLL").is_ok());
    }

    #[test]
    fn test_is_alive() {
        assert!(attach_self().is_alive());
    }
}
