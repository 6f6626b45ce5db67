//! Mock platform for testing
//!
//! A synthetic memory image with modules, so pointer chains can be walked
//! without a running game.

use super::{MemoryReader, MemoryRegion, ModuleInfo, Platform, PlatformError};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mock memory storage
#[derive(Default, Clone)]
struct MockMemory {
    /// Memory blocks keyed by base address
    blocks: BTreeMap<usize, Vec<u8>>,
}

impl MockMemory {
    fn write(&mut self, address: usize, data: &[u8]) {
        // Patch an existing block in place when the write fits inside it
        if let Some((&base, block)) = self.blocks.range_mut(..=address).next_back() {
            let offset = address - base;
            if offset + data.len() <= block.len() {
                block[offset..offset + data.len()].copy_from_slice(data);
                return;
            }
        }

        self.blocks.insert(address, data.to_vec());
    }

    fn block_at(&self, address: usize) -> Option<(usize, &Vec<u8>)> {
        let (&base, data) = self.blocks.range(..=address).next_back()?;
        (address < base + data.len()).then_some((base, data))
    }

    fn read(&self, address: usize, size: usize) -> Option<Vec<u8>> {
        let (base, data) = self.block_at(address)?;
        let offset = address - base;
        data.get(offset..offset.checked_add(size)?).map(<[u8]>::to_vec)
    }

    fn is_valid(&self, address: usize) -> bool {
        address != 0 && self.block_at(address).is_some()
    }
}

/// Mock platform implementation for testing
#[derive(Clone)]
pub struct MockPlatform {
    pid: u32,
    alive: Arc<AtomicBool>,
    memory: Arc<RwLock<MockMemory>>,
    modules: Arc<RwLock<Vec<ModuleInfo>>>,
}

impl MockPlatform {
    /// Create a new, empty mock platform
    pub fn new() -> Self {
        Self {
            pid: 4242,
            alive: Arc::new(AtomicBool::new(true)),
            memory: Arc::new(RwLock::new(MockMemory::default())),
            modules: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Write data to mock memory
    pub fn write_memory(&self, address: usize, data: &[u8]) {
        self.memory.write().write(address, data);
    }

    /// Write a POD type to memory
    pub fn write_value<T: bytemuck::Pod>(&self, address: usize, value: &T) {
        self.write_memory(address, bytemuck::bytes_of(value));
    }

    /// Write a 64-bit pointer to memory
    pub fn write_ptr(&self, address: usize, target: usize) {
        self.write_value(address, &(target as u64));
    }

    /// Map a zero-filled module image of `size` bytes at `base`
    pub fn add_module(&self, name: &str, base: usize, size: usize) {
        self.write_memory(base, &vec![0u8; size]);
        self.modules.write().push(ModuleInfo {
            base_address: base,
            size,
            name: name.to_string(),
            path: format!("C:\\Games\\Phasmophobia\\{}", name),
        });
    }

    /// Simulate the target exiting
    pub fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryReader for MockPlatform {
    fn read_bytes(&self, address: usize, size: usize) -> Result<Vec<u8>, PlatformError> {
        if !self.alive.load(Ordering::SeqCst) {
            return Err(PlatformError::ProcessNotFound(self.pid.to_string()));
        }

        self.memory
            .read()
            .read(address, size)
            .ok_or_else(|| PlatformError::MemoryReadFailed {
                address,
                size,
                reason: "Address not found in mock memory".to_string(),
            })
    }

    fn is_valid_address(&self, address: usize) -> bool {
        self.memory.read().is_valid(address)
    }
}

impl Platform for MockPlatform {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn get_modules(&self) -> Result<Vec<ModuleInfo>, PlatformError> {
        Ok(self.modules.read().clone())
    }

    fn get_memory_regions(&self) -> Result<Vec<MemoryRegion>, PlatformError> {
        Ok(self
            .memory
            .read()
            .blocks
            .iter()
            .map(|(&base, data)| MemoryRegion {
                start: base,
                end: base + data.len(),
                readable: true,
                writable: true,
                executable: false,
            })
            .collect())
    }
}
