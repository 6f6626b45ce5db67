//! Pointer paths: loading and resolution
//!
//! A pointer path starts at `module base + base offset`, dereferences a
//! 64-bit pointer there, then follows every offset but the last by adding it
//! and dereferencing again. The last offset is added without a dereference
//! and names the address of the value itself.
//!
//! Pointer files come in two shapes:
//! - JSON, `{ "entries": [ { "module", "base_offset", "offsets" } ] }`
//! - Cheat Engine tables (`.CT`/`.xml`), one path per `<CheatEntry>`

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::platform::{Platform, PlatformError};
use crate::{Error, Result};

/// Size of a pointer in the target (64-bit game)
pub const POINTER_SIZE: usize = 8;

/// A module-relative base address plus an ordered offset chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPath {
    /// Free-form label, from the Cheat Engine description when imported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Module the chain starts from, e.g. `GameAssembly.dll`
    pub module: String,
    /// Offset of the first pointer from the module base
    #[serde(deserialize_with = "de_offset")]
    pub base_offset: usize,
    /// Offsets in walk order; may be negative
    #[serde(default, deserialize_with = "de_offsets")]
    pub offsets: Vec<i64>,
}

impl PointerPath {
    /// Create a path
    pub fn new(module: impl Into<String>, base_offset: usize, offsets: Vec<i64>) -> Self {
        Self {
            description: None,
            module: module.into(),
            base_offset,
            offsets,
        }
    }
}

impl fmt::Display for PointerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+0x{:X}", self.module, self.base_offset)?;
        for &offset in &self.offsets {
            if offset < 0 {
                write!(f, " -> -0x{:X}", offset.unsigned_abs())?;
            } else {
                write!(f, " -> 0x{:X}", offset)?;
            }
        }
        Ok(())
    }
}

/// On-disk JSON layout
#[derive(Debug, Serialize, Deserialize)]
struct PointerFile {
    entries: Vec<PointerPath>,
}

/// JSON offsets may be plain integers or hex strings (`"0x1C"`, `"-8"`)
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Int(i64),
    Hex(String),
}

impl RawOffset {
    fn into_offset<E: serde::de::Error>(self) -> std::result::Result<i64, E> {
        match self {
            RawOffset::Int(value) => Ok(value),
            RawOffset::Hex(text) => parse_hex(&text).map_err(E::custom),
        }
    }

    fn into_base<E: serde::de::Error>(self) -> std::result::Result<usize, E> {
        let value = self.into_offset()?;
        usize::try_from(value).map_err(|_| E::custom(format!("negative base offset {}", value)))
    }
}

fn de_offset<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<usize, D::Error> {
    RawOffset::deserialize(deserializer)?.into_base()
}

fn de_offsets<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<i64>, D::Error> {
    Vec::<RawOffset>::deserialize(deserializer)?
        .into_iter()
        .map(RawOffset::into_offset)
        .collect()
}

/// Parse a hex number with an optional sign and `0x` prefix
fn parse_hex(text: &str) -> std::result::Result<i64, String> {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
        .unwrap_or(unsigned);

    let parsed = if negative {
        i64::from_str_radix(&format!("-{}", digits), 16)
    } else {
        i64::from_str_radix(digits, 16)
    };
    parsed.map_err(|e| format!("invalid hex '{}': {}", text, e))
}

/// Apply a signed offset to an address
fn offset_by(address: usize, offset: i64) -> Option<usize> {
    isize::try_from(offset)
        .ok()
        .and_then(|offset| address.checked_add_signed(offset))
}

/// Parse pointer paths from JSON text
pub fn parse_json(text: &str) -> Result<Vec<PointerPath>> {
    let file: PointerFile = serde_json::from_str(text)?;

    if let Some(bad) = file.entries.iter().find(|p| p.module.trim().is_empty()) {
        return Err(Error::Config(format!("entry with empty module name: {}", bad)));
    }

    Ok(file.entries)
}

fn ce_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static regex is valid"))
}

fn entry_tag() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    ce_regex(&CELL, r"</?CheatEntry>")
}

fn field(name: &str) -> &'static Regex {
    static ADDRESS: OnceLock<Regex> = OnceLock::new();
    static DESCRIPTION: OnceLock<Regex> = OnceLock::new();
    static OFFSETS: OnceLock<Regex> = OnceLock::new();
    static OFFSET: OnceLock<Regex> = OnceLock::new();

    match name {
        "Address" => ce_regex(&ADDRESS, r"(?s)<Address>(.*?)</Address>"),
        "Description" => ce_regex(&DESCRIPTION, r"(?s)<Description>(.*?)</Description>"),
        "Offsets" => ce_regex(&OFFSETS, r"(?s)<Offsets>(.*?)</Offsets>"),
        _ => ce_regex(&OFFSET, r"(?s)<Offset>(.*?)</Offset>"),
    }
}

fn unquote(text: &str) -> String {
    text.trim().replace("&quot;", "\"").replace('"', "")
}

/// Split a Cheat Engine address such as `"GameAssembly.dll"+01C2A3B0`
fn parse_address(raw: &str) -> Result<(String, usize)> {
    let address = unquote(raw);
    let (module, offset) = address
        .split_once('+')
        .ok_or_else(|| Error::Config(format!("address '{}' is not module-relative", address)))?;

    let module = module.trim();
    if module.is_empty() {
        return Err(Error::Config(format!("address '{}' has no module", address)));
    }

    let offset = parse_hex(offset).map_err(Error::Config)?;
    let offset = usize::try_from(offset)
        .map_err(|_| Error::Config(format!("address '{}' has a negative offset", address)))?;
    Ok((module.to_string(), offset))
}

/// Parse pointer paths from a Cheat Engine table.
///
/// Every `<CheatEntry>`, including ones nested in groups, contributes its own
/// `<Address>`; entries without one (group headers) are skipped. Cheat Engine
/// lists offsets from the value back to the base, so they are reversed into
/// walk order.
pub fn parse_cheat_table(text: &str) -> Result<Vec<PointerPath>> {
    let tags: Vec<_> = entry_tag().find_iter(text).collect();
    let mut paths = Vec::new();

    for (index, tag) in tags.iter().enumerate() {
        if tag.as_str() != "<CheatEntry>" {
            continue;
        }

        // An entry's own fields end where the next entry tag begins
        let end = tags.get(index + 1).map_or(text.len(), |next| next.start());
        let body = &text[tag.end()..end];

        let Some(address) = field("Address").captures(body) else {
            continue;
        };

        let (module, base_offset) = match parse_address(&address[1]) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Skipping cheat entry");
                continue;
            }
        };

        let offsets: std::result::Result<Vec<i64>, String> = match field("Offsets").captures(body) {
            Some(list) => field("Offset")
                .captures_iter(&list[1])
                .map(|offset| offset[1].trim().to_string())
                .filter(|text| !text.is_empty())
                .map(|text| parse_hex(&text))
                .collect(),
            None => Ok(Vec::new()),
        };

        let mut offsets = match offsets {
            Ok(offsets) => offsets,
            Err(e) => {
                warn!(module = %module, error = %e, "Skipping cheat entry");
                continue;
            }
        };
        offsets.reverse();

        let description = field("Description")
            .captures(body)
            .map(|d| unquote(&d[1]))
            .filter(|d| !d.is_empty());

        paths.push(PointerPath {
            description,
            module,
            base_offset,
            offsets,
        });
    }

    Ok(paths)
}

/// Load pointer paths from a file, JSON or Cheat Engine table.
///
/// The format follows the extension; anything else is sniffed from the first
/// character. A file without a single usable path is an error.
pub fn load_pointer_file(path: &Path) -> Result<Vec<PointerPath>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("cannot read pointer file {}: {}", path.display(), e))
    })?;

    let is_json = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => true,
        Some(ext) if ext.eq_ignore_ascii_case("xml") || ext.eq_ignore_ascii_case("ct") => false,
        _ => text.trim_start().starts_with('{'),
    };

    let paths = if is_json {
        parse_json(&text)?
    } else {
        parse_cheat_table(&text)?
    };

    if paths.is_empty() {
        return Err(Error::Config(format!(
            "no valid pointer entries in {}",
            path.display()
        )));
    }

    info!(file = %path.display(), entries = paths.len(), "Loaded pointer paths");
    Ok(paths)
}

fn invalid(path: &PointerPath, link: usize, address: usize, reason: impl Into<String>) -> Error {
    Error::InvalidPointer {
        address,
        link,
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Dereference one link of the chain
fn deref<P: Platform + ?Sized>(
    platform: &P,
    path: &PointerPath,
    link: usize,
    address: usize,
) -> Result<usize> {
    if !platform.is_valid_range(address, POINTER_SIZE) {
        return Err(invalid(path, link, address, "address is not mapped"));
    }

    let target = platform
        .read_ptr(address)
        .map_err(|e| invalid(path, link, address, e.to_string()))?;

    if target == 0 {
        return Err(invalid(path, link, address, "null pointer"));
    }

    Ok(target)
}

/// Walk a pointer path to the address of the value it names
pub fn resolve<P: Platform + ?Sized>(platform: &P, path: &PointerPath) -> Result<usize> {
    let module = platform.get_module(&path.module)?;

    let base = module
        .base_address
        .checked_add(path.base_offset)
        .ok_or_else(|| invalid(path, 0, module.base_address, "base offset overflows"))?;

    let mut address = deref(platform, path, 0, base)?;

    let Some((&last, chain)) = path.offsets.split_last() else {
        return Ok(address);
    };

    for (index, &offset) in chain.iter().enumerate() {
        let next = offset_by(address, offset)
            .ok_or_else(|| invalid(path, index + 1, address, "offset overflows"))?;
        address = deref(platform, path, index + 1, next)?;
    }

    offset_by(address, last)
        .ok_or_else(|| invalid(path, path.offsets.len(), address, "offset overflows"))
}

/// The most common address and how many times it occurs.
///
/// Ties go to the address that appeared first.
pub fn consensus(addresses: &[usize]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;

    for (index, &address) in addresses.iter().enumerate() {
        // Counted already at its first occurrence
        if addresses[..index].contains(&address) {
            continue;
        }

        let count = addresses.iter().filter(|&&a| a == address).count();
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((address, count));
        }
    }

    best
}

/// One read of the ghost identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Address the value was read from
    pub address: usize,
    /// Raw identifier
    pub value: i32,
    /// Paths that resolved to `address`
    pub hits: usize,
    /// Paths that resolved at all
    pub total: usize,
}

/// Resolve every path, agree on an address and read the identifier there.
///
/// Paths that fail are logged and left out. If none resolve, the first
/// failure is returned.
pub fn read_identifier<P: Platform + ?Sized>(
    platform: &P,
    paths: &[PointerPath],
) -> Result<Reading> {
    let mut resolved = Vec::with_capacity(paths.len());
    let mut first_error = None;

    for path in paths {
        match resolve(platform, path) {
            Ok(address) if platform.is_valid_range(address, std::mem::size_of::<i32>()) => {
                resolved.push(address);
            }
            Ok(address) => {
                debug!(
                    path = %path,
                    address = %format!("0x{:X}", address),
                    "Target address not readable"
                );
                first_error.get_or_insert_with(|| {
                    invalid(path, path.offsets.len(), address, "value address is not mapped")
                });
            }
            Err(e) => {
                debug!(path = %path, error = %e, "Pointer path failed");
                first_error.get_or_insert(e);
            }
        }
    }

    let Some((address, hits)) = consensus(&resolved) else {
        return Err(first_error
            .unwrap_or_else(|| Error::Config("no pointer paths to resolve".to_string())));
    };

    let bytes = platform
        .read_bytes(address, std::mem::size_of::<i32>())
        .map_err(|e| match e {
            PlatformError::ProcessNotFound(_) => Error::Platform(e),
            other => Error::InvalidPointer {
                address,
                link: 0,
                path: "consensus address".to_string(),
                reason: other.to_string(),
            },
        })?;

    let value = bytes
        .as_slice()
        .try_into()
        .map(i32::from_le_bytes)
        .map_err(|_| Error::InvalidPointer {
            address,
            link: 0,
            path: "consensus address".to_string(),
            reason: format!("short read of {} bytes", bytes.len()),
        })?;

    Ok(Reading {
        address,
        value,
        hits,
        total: resolved.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPlatform;

    const MODULE_BASE: usize = 0x7FF6_0000_0000;

    /// GameAssembly.dll+0x100 -> 0x1_0000 (+0x18) -> 0x2_0000 (+0x40) = 0x2_0040
    fn chained_platform() -> MockPlatform {
        let platform = MockPlatform::new();
        platform.add_module("GameAssembly.dll", MODULE_BASE, 0x1000);
        platform.write_ptr(MODULE_BASE + 0x100, 0x1_0000);
        platform.write_memory(0x1_0000, &[0u8; 0x100]);
        platform.write_ptr(0x1_0018, 0x2_0000);
        platform.write_memory(0x2_0000, &[0u8; 0x100]);
        platform.write_value(0x2_0040, &17i32);
        platform
    }

    fn good_path() -> PointerPath {
        PointerPath::new("GameAssembly.dll", 0x100, vec![0x18, 0x40])
    }

    #[test]
    fn test_resolve_chain() {
        let platform = chained_platform();
        assert_eq!(resolve(&platform, &good_path()).unwrap(), 0x2_0040);

        let reading = read_identifier(&platform, &[good_path()]).unwrap();
        assert_eq!(reading.value, 17);
        assert_eq!(reading.address, 0x2_0040);
        assert_eq!((reading.hits, reading.total), (1, 1));
    }

    #[test]
    fn test_resolve_without_offsets() {
        let platform = chained_platform();
        let path = PointerPath::new("gameassembly.dll", 0x100, vec![]);
        assert_eq!(resolve(&platform, &path).unwrap(), 0x1_0000);
    }

    #[test]
    fn test_single_offset_is_added_not_followed() {
        let platform = chained_platform();
        let path = PointerPath::new("GameAssembly.dll", 0x100, vec![0x18]);
        assert_eq!(resolve(&platform, &path).unwrap(), 0x1_0018);
    }

    #[test]
    fn test_null_link_is_invalid() {
        let platform = chained_platform();
        // 0x1_0020 is mapped but zero
        let path = PointerPath::new("GameAssembly.dll", 0x100, vec![0x20, 0x40]);

        match resolve(&platform, &path) {
            Err(Error::InvalidPointer { link, address, .. }) => {
                assert_eq!(link, 1);
                assert_eq!(address, 0x1_0020);
            }
            other => panic!("expected InvalidPointer, got {:?}", other),
        }
    }

    #[test]
    fn test_unmapped_link_is_invalid() {
        let platform = chained_platform();
        platform.write_ptr(0x1_0030, 0xDEAD_0000);
        let path = PointerPath::new("GameAssembly.dll", 0x100, vec![0x30, 0x8, 0x0]);

        assert!(matches!(
            resolve(&platform, &path),
            Err(Error::InvalidPointer { link: 2, address: 0xDEAD_0008, .. })
        ));
    }

    #[test]
    fn test_negative_offsets() {
        let platform = chained_platform();
        platform.write_ptr(0x1_0028, 0x2_0048);
        platform.write_ptr(0x1_0038, 0x1_0028);

        let last = PointerPath::new("GameAssembly.dll", 0x100, vec![0x28, -0x8]);
        assert_eq!(resolve(&platform, &last).unwrap(), 0x2_0040);

        let middle = PointerPath::new("GameAssembly.dll", 0x100, vec![0x38, -0x10, 0x40]);
        let reading = read_identifier(&platform, &[middle]).unwrap();
        assert_eq!(reading.address, 0x2_0040);
        assert_eq!(reading.value, 17);
    }

    #[test]
    fn test_offset_below_zero_is_invalid() {
        let platform = chained_platform();
        let path = PointerPath::new("GameAssembly.dll", 0x100, vec![0x18, -0x3_0000]);

        assert!(matches!(
            resolve(&platform, &path),
            Err(Error::InvalidPointer { link: 2, address: 0x2_0000, .. })
        ));
    }

    #[test]
    fn test_missing_module() {
        let platform = chained_platform();
        let path = PointerPath::new("UnityPlayer.dll", 0x100, vec![0x18]);

        assert!(matches!(
            resolve(&platform, &path),
            Err(Error::Platform(PlatformError::ModuleNotFound(_)))
        ));
    }

    #[test]
    fn test_consensus() {
        assert_eq!(consensus(&[]), None);
        assert_eq!(consensus(&[5]), Some((5, 1)));
        assert_eq!(consensus(&[1, 2, 2, 3, 2, 1]), Some((2, 3)));
        // Tie keeps the earliest
        assert_eq!(consensus(&[9, 4, 4, 9]), Some((9, 2)));
    }

    #[test]
    fn test_read_identifier_majority() {
        let platform = chained_platform();
        // A stale path that lands on a different, readable address
        platform.write_ptr(0x1_0050, 0x2_0000);
        platform.write_value(0x2_0080, &3i32);

        let paths = vec![
            PointerPath::new("GameAssembly.dll", 0x100, vec![0x50, 0x80]),
            good_path(),
            PointerPath::new("GameAssembly.dll", 0x100, vec![0x50, 0x40]),
            PointerPath::new("GameAssembly.dll", 0x100, vec![0x20, 0x40]),
        ];

        let reading = read_identifier(&platform, &paths).unwrap();
        assert_eq!(reading.address, 0x2_0040);
        assert_eq!(reading.value, 17);
        assert_eq!(reading.hits, 2);
        assert_eq!(reading.total, 3);
    }

    #[test]
    fn test_read_identifier_all_fail() {
        let platform = chained_platform();
        let paths = vec![PointerPath::new("GameAssembly.dll", 0x100, vec![0x20, 0x40])];

        assert!(matches!(
            read_identifier(&platform, &paths),
            Err(Error::InvalidPointer { .. })
        ));
        assert!(matches!(read_identifier(&platform, &[]), Err(Error::Config(_))));
    }

    #[test]
    fn test_read_identifier_after_exit() {
        let platform = chained_platform();
        platform.kill();

        assert!(read_identifier(&platform, &[good_path()]).is_err());
    }

    #[test]
    fn test_parse_json_hex_and_ints() {
        let text = r#"{
            "entries": [
                {
                    "module": "GameAssembly.dll",
                    "base_offset": "0x1C2A3B0",
                    "offsets": ["0xB8", "10", 64]
                },
                { "description": "fallback", "module": "UnityPlayer.dll", "base_offset": 4096 }
            ]
        }"#;

        let paths = parse_json(text).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].base_offset, 0x1C2A3B0);
        assert_eq!(paths[0].offsets, vec![0xB8, 0x10, 64]);
        assert_eq!(paths[1].description.as_deref(), Some("fallback"));
        assert!(paths[1].offsets.is_empty());
    }

    #[test]
    fn test_parse_json_rejects_bad_input() {
        assert!(matches!(parse_json("{"), Err(Error::Serialization(_))));
        assert!(parse_json(r#"{"entries":[{"module":"a","base_offset":"zz"}]}"#).is_err());
        assert!(matches!(
            parse_json(r#"{"entries":[{"module":" ","base_offset":1}]}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_parse_json_negative_offsets() {
        let text = r#"{
            "entries": [
                { "module": "a.dll", "base_offset": "0x10", "offsets": [-8, 16, "-0x10"] }
            ]
        }"#;

        let paths = parse_json(text).unwrap();
        assert_eq!(paths[0].offsets, vec![-8, 16, -16]);

        assert!(parse_json(r#"{"entries":[{"module":"a.dll","base_offset":-1}]}"#).is_err());
    }

    const CHEAT_TABLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<CheatTable CheatEngineTableVersion="45">
  <CheatEntries>
    <CheatEntry>
      <ID>0</ID>
      <Description>"Ghost pointers"</Description>
      <GroupHeader>1</GroupHeader>
      <CheatEntries>
        <CheatEntry>
          <ID>1</ID>
          <Description>"pointerscan result"</Description>
          <VariableType>4 Bytes</VariableType>
          <Address>"GameAssembly.dll"+01C2A3B0</Address>
          <Offsets>
            <Offset>40</Offset>
            <Offset>18</Offset>
          </Offsets>
        </CheatEntry>
        <CheatEntry>
          <ID>2</ID>
          <Description>"second"</Description>
          <Address>"UnityPlayer.dll"+0x100</Address>
          <Offsets>
            <Offset>0x8</Offset>
            <Offset></Offset>
            <Offset>20</Offset>
            <Offset>30</Offset>
          </Offsets>
        </CheatEntry>
      </CheatEntries>
    </CheatEntry>
    <CheatEntry>
      <ID>3</ID>
      <Description>"absolute"</Description>
      <Address>7FF600001000</Address>
    </CheatEntry>
  </CheatEntries>
</CheatTable>"#;

    #[test]
    fn test_parse_cheat_table() {
        let paths = parse_cheat_table(CHEAT_TABLE).unwrap();
        assert_eq!(paths.len(), 2);

        assert_eq!(paths[0].module, "GameAssembly.dll");
        assert_eq!(paths[0].base_offset, 0x1C2A3B0);
        assert_eq!(paths[0].offsets, vec![0x18, 0x40]);
        assert_eq!(paths[0].description.as_deref(), Some("pointerscan result"));

        assert_eq!(paths[1].module, "UnityPlayer.dll");
        assert_eq!(paths[1].offsets, vec![0x30, 0x20, 0x8]);
    }

    #[test]
    fn test_cheat_table_negative_and_bad_offsets() {
        let table = r#"<CheatTable><CheatEntries>
    <CheatEntry>
      <Address>"GameAssembly.dll"+100</Address>
      <Offsets><Offset>-8</Offset><Offset>18</Offset></Offsets>
    </CheatEntry>
    <CheatEntry>
      <Address>"GameAssembly.dll"+200</Address>
      <Offsets><Offset>zz</Offset></Offsets>
    </CheatEntry>
    <CheatEntry>
      <Address>"GameAssembly.dll"+300</Address>
      <Offsets><Offset>-0x10</Offset></Offsets>
    </CheatEntry>
</CheatEntries></CheatTable>"#;

        let paths = parse_cheat_table(table).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].offsets, vec![0x18, -0x8]);
        assert_eq!(paths[1].base_offset, 0x300);
        assert_eq!(paths[1].offsets, vec![-0x10]);
    }

    #[test]
    fn test_load_pointer_file() {
        let dir = tempfile::tempdir().unwrap();

        let table = dir.path().join("pointers.xml");
        std::fs::write(&table, CHEAT_TABLE).unwrap();
        assert_eq!(load_pointer_file(&table).unwrap().len(), 2);

        // Sniffed as JSON despite the extension
        let sniffed = dir.path().join("pointers.txt");
        std::fs::write(&sniffed, r#"{"entries":[{"module":"a.dll","base_offset":1}]}"#).unwrap();
        assert_eq!(load_pointer_file(&sniffed).unwrap().len(), 1);

        let empty = dir.path().join("empty.xml");
        std::fs::write(&empty, "<CheatTable></CheatTable>").unwrap();
        assert!(matches!(load_pointer_file(&empty), Err(Error::Config(_))));

        assert!(matches!(
            load_pointer_file(&dir.path().join("missing.xml")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_display_path() {
        assert_eq!(
            good_path().to_string(),
            "GameAssembly.dll+0x100 -> 0x18 -> 0x40"
        );
        assert_eq!(
            PointerPath::new("a.dll", 0x10, vec![-0x8, 0x20]).to_string(),
            "a.dll+0x10 -> -0x8 -> 0x20"
        );
    }
}
