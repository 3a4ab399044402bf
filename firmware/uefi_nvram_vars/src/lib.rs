// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The EFI variable data model: a single variable with typed views over its
//! payload, and the keyed collection the variable-store parser produces.
//!
//! The canonical form of every variable is its raw `data` bytes; the typed
//! accessors decode on demand and the setters re-encode, so nothing is lost
//! when a payload doesn't match the shape its name suggests.

#![forbid(unsafe_code)]

mod load_option;
mod pxe;
mod varlist;

pub use load_option::EfiLoadOption;
pub use load_option::LoadOptionError;
pub use pxe::add_pxe_boot_option;
pub use pxe::pxe_boot_option;
pub use pxe::pxe_boot_next;
pub use pxe::pxe_title;
pub use pxe::PXE_BOOT_ENTRY;
pub use pxe::PXE_OPTIONAL_DATA;
pub use varlist::VarList;
pub use varlist::VarListError;

use guid::Guid;
use std::fmt;
use std::fmt::Display;
use thiserror::Error;
use ucs2::Ucs2LeVec;
use uefi_device_path::DevicePath;
use uefi_device_path::DevicePathError;
use uefi_specs::guids;
use uefi_specs::nvram::EfiVariableAttributes;
use uefi_specs::time::EfiDaylight;
use uefi_specs::time::EfiTimezone;
use uefi_specs::time::EFI_TIME;

/// Errors decoding a typed view of a variable payload.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("payload of {len} bytes is too short, need at least {need}")]
    TooShort { len: usize, need: usize },
    #[error("boot order payload length {0} is not a multiple of 2")]
    OddLength(usize),
    #[error("malformed boot option payload")]
    BootOption(#[from] LoadOptionError),
    #[error("malformed device path payload")]
    DevicePath(#[from] DevicePathError),
    #[error("payload is not a hex string")]
    BadHex(#[from] hex::FromHexError),
}

/// Default `(attributes, vendor)` for a variable created by name alone.
///
/// `Boot####`, `BootOrder` and `BootNext` get NV|BS|RT under the global
/// vendor GUID; `SecureBoot` is the volatile BS|RT status variable; names
/// with no well-known defaults get plain NV|BS.
pub fn defaults_for_name(name: &str) -> (EfiVariableAttributes, Guid) {
    let attr = if name == "SecureBoot" {
        EfiVariableAttributes::DEFAULT_ATTRIBUTES_VOLATILE
    } else if name.starts_with("Boot") {
        EfiVariableAttributes::DEFAULT_ATTRIBUTES_BOOT
    } else {
        EfiVariableAttributes::DEFAULT_ATTRIBUTES
    };
    (attr, guids::EFI_GLOBAL_VARIABLE)
}

/// One EFI variable, as stored in the authenticated variable store.
///
/// `monotonic_count`, `timestamp` and `pubkey_index` belong to the
/// authentication metadata and are preserved opaquely; the only mutation
/// this crate performs on them is the timestamp advance described on
/// [`touch`](Self::touch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EfiVariable {
    pub name: Ucs2LeVec,
    pub vendor: Guid,
    pub attr: u32,
    pub data: Vec<u8>,
    pub monotonic_count: u64,
    pub timestamp: Option<EFI_TIME>,
    pub pubkey_index: u32,
}

impl EfiVariable {
    /// Creates a variable with the well-known defaults for `name`.
    pub fn new(name: &str, data: Vec<u8>) -> Self {
        let (attr, vendor) = defaults_for_name(name);
        EfiVariable {
            name: Ucs2LeVec::from(name),
            vendor,
            attr: attr.into(),
            data,
            monotonic_count: 0,
            timestamp: None,
            pubkey_index: 0,
        }
    }

    fn attributes(&self) -> EfiVariableAttributes {
        EfiVariableAttributes::from(self.attr)
    }

    /// Advances the authentication timestamp, but only for variables with
    /// the time-based-auth attribute, and never backward.
    ///
    /// Every setter calls this; plain NV writes are unaffected.
    pub fn touch(&mut self) {
        if !self.attributes().time_based_authenticated_write_access() {
            return;
        }
        let now = now_efi_time();
        match &self.timestamp {
            Some(current) if !time_is_before(current, &now) => {}
            _ => self.timestamp = Some(now),
        }
    }

    // ---- typed views ----

    /// One byte, zero is false.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self.data.first() {
            Some(&b) => Ok(b != 0),
            None => Err(ValueError::TooShort {
                len: 0,
                need: 1,
            }),
        }
    }

    /// Four bytes little-endian.
    pub fn as_u32(&self) -> Result<u32, ValueError> {
        let bytes = self
            .data
            .get(..4)
            .ok_or(ValueError::TooShort {
                len: self.data.len(),
                need: 4,
            })?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Bytes up to the first NUL, decoded lossily. Never fails.
    pub fn as_ascii(&self) -> String {
        let end = self.data.iter().position(|&b| b == 0).unwrap_or(self.data.len());
        String::from_utf8_lossy(&self.data[..end]).into_owned()
    }

    /// A sequence of little-endian u16 boot entry numbers.
    pub fn as_boot_order(&self) -> Result<Vec<u16>, ValueError> {
        let chunks = self.data.chunks_exact(2);
        if !chunks.remainder().is_empty() {
            return Err(ValueError::OddLength(self.data.len()));
        }
        Ok(chunks
            .map(|c| u16::from_le_bytes(c.try_into().unwrap()))
            .collect())
    }

    /// A single little-endian u16 boot entry number.
    pub fn as_boot_next(&self) -> Result<u16, ValueError> {
        let bytes = self
            .data
            .get(..2)
            .ok_or(ValueError::TooShort {
                len: self.data.len(),
                need: 2,
            })?;
        Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// An EFI_LOAD_OPTION record.
    pub fn as_load_option(&self) -> Result<EfiLoadOption, ValueError> {
        Ok(EfiLoadOption::parse(&self.data)?)
    }

    /// A serialized device path.
    pub fn as_device_path(&self) -> Result<DevicePath, ValueError> {
        Ok(DevicePath::parse(&self.data)?)
    }

    // ---- setters ----

    pub fn set_bool(&mut self, value: bool) {
        self.data = vec![value as u8];
        self.touch();
    }

    pub fn set_u32(&mut self, value: u32) {
        self.data = value.to_le_bytes().to_vec();
        self.touch();
    }

    /// Stores an ASCII string, appending a NUL terminator if missing.
    pub fn set_ascii(&mut self, value: &str) {
        let mut buf = value.as_bytes().to_vec();
        if buf.last() != Some(&0) {
            buf.push(0);
        }
        self.data = buf;
        self.touch();
    }

    /// Replaces the payload with decoded hex, for offline dumps.
    pub fn set_data_hex(&mut self, value: &str) -> Result<(), ValueError> {
        self.data = hex::decode(value)?;
        self.touch();
        Ok(())
    }

    pub fn set_boot_order(&mut self, order: &[u16]) {
        self.data = order.iter().flat_map(|nr| nr.to_le_bytes()).collect();
        self.touch();
    }

    pub fn append_boot_order(&mut self, entry: u16) {
        self.data.extend_from_slice(&entry.to_le_bytes());
        self.touch();
    }

    pub fn set_boot_next(&mut self, entry: u16) {
        self.data = entry.to_le_bytes().to_vec();
        self.touch();
    }

    pub fn set_load_option(&mut self, option: &EfiLoadOption) {
        self.data = option.encode();
        self.touch();
    }

    pub fn set_device_path(&mut self, path: &DevicePath) {
        self.data = path.encode();
        self.touch();
    }

    /// Renders the payload according to the shape its name implies, for
    /// trace output and interactive listings.
    pub fn format_data(&self) -> String {
        const BOOL_NAMES: &[&str] = &["SecureBootEnable", "CustomMode"];
        const ASCII_NAMES: &[&str] = &["Lang", "PlatformLang", "SbatLevel"];
        const BLIST_NAMES: &[&str] = &["BootOrder", "BootNext"];
        const DPATH_NAMES: &[&str] = &["ConIn", "ConOut", "ErrOut"];

        let name = self.name.to_string();

        if BOOL_NAMES.contains(&name.as_str()) {
            return match self.data.first().copied() {
                None => "bool: invalid".to_string(),
                Some(0) => "bool: off".to_string(),
                Some(_) => "bool: ON".to_string(),
            };
        }
        if ASCII_NAMES.contains(&name.as_str()) {
            return format!("ascii: \"{}\"", self.as_ascii().replace('\n', "\\n"));
        }
        if BLIST_NAMES.contains(&name.as_str()) {
            if let Ok(order) = self.as_boot_order() {
                let list = order
                    .iter()
                    .map(|nr| format!("{nr:04x}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                return format!("boot order: {list}");
            }
        }
        if DPATH_NAMES.contains(&name.as_str()) {
            if let Ok(path) = self.as_device_path() {
                return format!("devpath: {path}");
            }
        }
        if name.starts_with("Boot0") {
            if let Ok(option) = self.as_load_option() {
                return format!("boot entry: {option}");
            }
        }
        if let width @ (1 | 2 | 4 | 8) = self.data.len() {
            let type_name = match width {
                1 => "byte",
                2 => "word",
                4 => "dword",
                _ => "qword",
            };
            let be: Vec<u8> = self.data.iter().rev().copied().collect();
            return format!("{type_name}: 0x{}", hex::encode(be));
        }
        String::new()
    }
}

impl Display for EfiVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name={} guid={} attr={:#010x} data={}",
            self.name,
            self.vendor,
            self.attr,
            self.format_data()
        )?;
        if let Some(timestamp) = &self.timestamp {
            write!(f, " time={timestamp}")?;
        }
        Ok(())
    }
}

fn now_efi_time() -> EFI_TIME {
    let now = time::OffsetDateTime::now_utc();
    EFI_TIME {
        year: now.year() as u16,
        month: now.month().into(),
        day: now.day(),
        hour: now.hour(),
        minute: now.minute(),
        second: now.second(),
        pad1: 0,
        nanosecond: 0,
        timezone: EfiTimezone(0),
        daylight: EfiDaylight::new(),
        pad2: 0,
    }
}

fn time_is_before(a: &EFI_TIME, b: &EFI_TIME) -> bool {
    let key = |t: &EFI_TIME| {
        (
            t.year,
            t.month,
            t.day,
            t.hour,
            t.minute,
            t.second,
            t.nanosecond,
        )
    };
    key(a) < key(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_by_name() {
        let (attr, vendor) = defaults_for_name("Boot0001");
        assert_eq!(u32::from(attr), 0x7);
        assert_eq!(vendor, guids::EFI_GLOBAL_VARIABLE);

        let (attr, _) = defaults_for_name("BootOrder");
        assert_eq!(u32::from(attr), 0x7);

        let (attr, _) = defaults_for_name("SecureBoot");
        assert_eq!(u32::from(attr), 0x6);

        let (attr, _) = defaults_for_name("SomethingElse");
        assert_eq!(u32::from(attr), 0x3);
    }

    #[test]
    fn bool_view() {
        let mut var = EfiVariable::new("SecureBootEnable", vec![]);
        assert!(matches!(
            var.as_bool(),
            Err(ValueError::TooShort { len: 0, need: 1 })
        ));
        var.set_bool(true);
        assert_eq!(var.data, [1]);
        assert!(var.as_bool().unwrap());
        var.set_bool(false);
        assert!(!var.as_bool().unwrap());
        // any non-zero byte is true
        var.data = vec![0x80];
        assert!(var.as_bool().unwrap());
    }

    #[test]
    fn u32_view() {
        let mut var = EfiVariable::new("Timeout", vec![1, 2, 3]);
        assert!(matches!(
            var.as_u32(),
            Err(ValueError::TooShort { len: 3, need: 4 })
        ));
        var.set_u32(0xdead_beef);
        assert_eq!(var.data, [0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(var.as_u32().unwrap(), 0xdead_beef);
    }

    #[test]
    fn ascii_view() {
        let mut var = EfiVariable::new("PlatformLang", vec![]);
        var.set_ascii("en-US");
        assert_eq!(var.data, b"en-US\0");
        assert_eq!(var.as_ascii(), "en-US");
        assert_eq!(var.format_data(), "ascii: \"en-US\"");
    }

    #[test]
    fn boot_order_views() {
        let mut var = EfiVariable::new("BootOrder", vec![]);
        var.set_boot_order(&[0x0099, 0x0000]);
        assert_eq!(var.data, [0x99, 0x00, 0x00, 0x00]);
        assert_eq!(var.as_boot_order().unwrap(), [0x0099, 0x0000]);
        var.append_boot_order(0x0001);
        assert_eq!(var.as_boot_order().unwrap(), [0x0099, 0x0000, 0x0001]);

        var.data = vec![0x99, 0x00, 0x00];
        assert!(matches!(var.as_boot_order(), Err(ValueError::OddLength(3))));

        let mut var = EfiVariable::new("BootNext", vec![0x99]);
        assert!(matches!(
            var.as_boot_next(),
            Err(ValueError::TooShort { len: 1, need: 2 })
        ));
        var.set_boot_next(0x0099);
        assert_eq!(var.data, [0x99, 0x00]);
        assert_eq!(var.as_boot_next().unwrap(), 0x0099);
    }

    #[test]
    fn hex_setter() {
        let mut var = EfiVariable::new("Dump", vec![]);
        var.set_data_hex("4eac0881").unwrap();
        assert_eq!(var.data, [0x4e, 0xac, 0x08, 0x81]);
        assert!(var.set_data_hex("zz").is_err());
    }

    #[test]
    fn touch_only_updates_time_based_auth_vars() {
        let mut var = EfiVariable::new("BootOrder", vec![]);
        var.set_boot_order(&[0]);
        assert_eq!(var.timestamp, None);

        var.attr |= 0x20; // time-based auth
        var.set_boot_order(&[1]);
        let first = var.timestamp.expect("timestamp set");
        assert!(first.year >= 2026);

        // a timestamp in the future is never rolled back
        let future = EFI_TIME {
            year: 9999,
            ..first
        };
        var.timestamp = Some(future);
        var.set_boot_order(&[2]);
        assert_eq!(var.timestamp, Some(future));
    }

    #[test]
    fn scalar_formatting() {
        let var = EfiVariable::new("Custom", vec![0x34, 0x12]);
        assert_eq!(var.format_data(), "word: 0x1234");
        let var = EfiVariable::new("Custom", vec![0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(var.format_data(), "dword: 0xdeadbeef");
        let var = EfiVariable::new("Custom", vec![0; 3]);
        assert_eq!(var.format_data(), "");
    }
}
