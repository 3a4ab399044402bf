// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reads and rewrites the authenticated variable store embedded in an EDK2
//! flash image.
//!
//! [`Edk2VarStore::parse`] locates the NvData firmware volume, validates the
//! store header and remembers the byte range of the variable region;
//! [`Edk2VarStore::variables`] walks the live records into a [`VarList`];
//! [`Edk2VarStore::serialize`] re-encodes a collection into a copy of the
//! original image, touching nothing outside the variable region.
//!
//! [`make_pxe_firmware`] composes the three steps with the PXE boot-option
//! synthesizer, which is the whole reason this crate exists.

#![forbid(unsafe_code)]

mod cache;

pub use cache::FirmwareCache;

use guid::Guid;
use std::ops::Range;
use thiserror::Error;
use ucs2::Ucs2LeSlice;
use uefi_nvram_vars::add_pxe_boot_option;
use uefi_nvram_vars::EfiVariable;
use uefi_nvram_vars::VarList;
use uefi_specs::edk2::align4;
use uefi_specs::edk2::AuthVariableHeader;
use uefi_specs::edk2::BlockMapEntry;
use uefi_specs::edk2::FirmwareVolumeHeader;
use uefi_specs::edk2::VariableStoreHeader;
use uefi_specs::edk2::EFI_FVH_SIGNATURE;
use uefi_specs::edk2::VARIABLE_DATA;
use uefi_specs::edk2::VARIABLE_STORE_FORMATTED;
use uefi_specs::edk2::VARIABLE_STORE_HEALTHY;
use uefi_specs::edk2::VAR_ADDED;
use uefi_specs::guids;
use uefi_specs::time::EFI_TIME;
use zerocopy::FromBytes;
use zerocopy::IntoBytes;

#[derive(Debug, Error)]
pub enum VarStoreError {
    #[error("no firmware volume with the NvData GUID in the image")]
    NvDataNotFound,
    #[error("invalid firmware volume signature {0:#010x}")]
    InvalidVolumeSignature(u32),
    #[error("firmware volume {0} is not the NvData volume")]
    NotNvDataVolume(Guid),
    #[error("store header at {0:#x} extends past the end of the image")]
    TruncatedStoreHeader(usize),
    #[error("unknown varstore guid {0}")]
    UnknownVarstoreGuid(Guid),
    #[error("unknown varstore format {0:#04x}")]
    UnknownVarstoreFormat(u8),
    #[error("unknown varstore state {0:#04x}")]
    UnknownVarstoreState(u8),
    #[error("varstore region [{start:#x}, {end:#x}) exceeds the image length {len:#x}")]
    StoreOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("record at {offset:#x} declares sizes past the end of the store")]
    MalformedRecord { offset: usize },
    #[error("variable name in record at {offset:#x} is not valid UCS-2")]
    BadRecordName {
        offset: usize,
        #[source]
        source: ucs2::Ucs2ParseError,
    },
    #[error("encoded variables need {need} bytes but the store region holds {have}")]
    VarstoreOverflow { need: usize, have: usize },
}

/// A parsed flash image: the original bytes plus the bounds of the variable
/// region. The image itself is never mutated; [`serialize`](Self::serialize)
/// produces a fresh buffer.
#[derive(Debug, Clone)]
pub struct Edk2VarStore {
    data: Vec<u8>,
    start: usize,
    end: usize,
}

impl Edk2VarStore {
    /// Locates and validates the variable store inside `data`.
    pub fn parse(data: Vec<u8>) -> Result<Self, VarStoreError> {
        let offset = find_nv_data(&data).ok_or(VarStoreError::NvDataNotFound)?;

        let (header, _) = FirmwareVolumeHeader::read_from_prefix(&data[offset..])
            .map_err(|_| VarStoreError::NvDataNotFound)?;
        if let Ok((blocks, _)) =
            BlockMapEntry::read_from_prefix(&data[offset + size_of::<FirmwareVolumeHeader>()..])
        {
            tracing::debug!(
                volume = guids::name(&header.file_system_guid).unwrap_or("?"),
                fv_length = header.fv_length,
                revision = header.revision,
                blocks = blocks.num_blocks,
                block_size = blocks.length,
                "found firmware volume"
            );
        }

        if header.signature != EFI_FVH_SIGNATURE {
            return Err(VarStoreError::InvalidVolumeSignature(header.signature));
        }
        if header.file_system_guid != guids::NV_DATA {
            return Err(VarStoreError::NotNvDataVolume(header.file_system_guid));
        }

        let store_offset = offset + header.header_length as usize;
        let (store, _) = data
            .get(store_offset..)
            .and_then(|rest| VariableStoreHeader::read_from_prefix(rest).ok())
            .ok_or(VarStoreError::TruncatedStoreHeader(store_offset))?;

        tracing::debug!(
            store = guids::name(&store.guid).unwrap_or("?"),
            size = store.size,
            format = store.format,
            state = store.state,
            "found variable store"
        );

        if store.guid != guids::AUTH_VARS {
            return Err(VarStoreError::UnknownVarstoreGuid(store.guid));
        }
        if store.format != VARIABLE_STORE_FORMATTED {
            return Err(VarStoreError::UnknownVarstoreFormat(store.format));
        }
        if store.state != VARIABLE_STORE_HEALTHY {
            return Err(VarStoreError::UnknownVarstoreState(store.state));
        }

        let start = store_offset + size_of::<VariableStoreHeader>();
        let end = store_offset + store.size as usize;
        if start >= end || end > data.len() {
            return Err(VarStoreError::StoreOutOfBounds {
                start,
                end,
                len: data.len(),
            });
        }

        tracing::debug!(start, end, "variable region");
        Ok(Edk2VarStore { data, start, end })
    }

    /// The image this store was parsed from.
    pub fn image(&self) -> &[u8] {
        &self.data
    }

    /// Byte range of the variable region within the image.
    pub fn region(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Walks the record slots and collects the live variables.
    ///
    /// Slots whose state isn't VAR_ADDED are skipped but still advance the
    /// cursor; the first slot without the record magic ends the walk.
    pub fn variables(&self) -> Result<VarList, VarStoreError> {
        let mut list = VarList::new();
        let mut pos = self.start;

        while pos + 2 <= self.end {
            let magic = u16::from_le_bytes(self.data[pos..pos + 2].try_into().unwrap());
            if magic != VARIABLE_DATA {
                break;
            }

            let (header, _) = AuthVariableHeader::read_from_prefix(&self.data[pos..self.end])
                .map_err(|_| VarStoreError::MalformedRecord { offset: pos })?;
            let name_size = header.name_size as usize;
            let data_size = header.data_size as usize;
            let total = size_of::<AuthVariableHeader>() + name_size + data_size;
            if total > self.end - pos {
                return Err(VarStoreError::MalformedRecord { offset: pos });
            }

            if header.state == VAR_ADDED {
                let name_start = pos + size_of::<AuthVariableHeader>();
                let name = Ucs2LeSlice::from_slice_with_nul(
                    &self.data[name_start..name_start + name_size],
                )
                .map_err(|source| VarStoreError::BadRecordName {
                    offset: pos,
                    source,
                })?;
                let timestamp = header.timestamp;

                list.insert(EfiVariable {
                    name: name.to_ucs2_le_vec(),
                    vendor: header.vendor_guid,
                    attr: header.attributes,
                    data: self.data[name_start + name_size..name_start + name_size + data_size]
                        .to_vec(),
                    monotonic_count: header.monotonic_count,
                    timestamp: (timestamp.year != 0).then_some(timestamp),
                    pubkey_index: header.pubkey_index,
                });
            }

            pos = align4(pos + total);
        }

        tracing::debug!(count = list.len(), "loaded variables");
        Ok(list)
    }

    /// Re-encodes `varlist` into a copy of the original image.
    ///
    /// The output has exactly the input's length: everything outside the
    /// variable region is byte-identical, and the region is the encoded
    /// records followed by 0xFF fill.
    pub fn serialize(&self, varlist: &VarList) -> Result<Vec<u8>, VarStoreError> {
        let blob = encode_varlist(varlist, self.end - self.start)?;

        let mut out = Vec::with_capacity(self.data.len());
        out.extend_from_slice(&self.data[..self.start]);
        out.extend_from_slice(&blob);
        out.resize(self.end, 0xff);
        out.extend_from_slice(&self.data[self.end..]);
        Ok(out)
    }
}

/// Scans for the NvData firmware volume, returning its offset.
///
/// The scan checks the GUID slot at +16 of each candidate offset. An FFS
/// volume is skipped using its declared 64-bit length at +32; any other
/// mismatch advances by 1024 bytes. The stride is not a proper FFS/FV
/// directory walk - it happens to locate the store in the RPi4 image, and
/// downstream callers rely on the exact offset it produces, so it stays.
fn find_nv_data(data: &[u8]) -> Option<usize> {
    let mut offset = 0;
    while offset + 64 < data.len() {
        let guid = Guid::from_wire_bytes(data[offset + 16..offset + 32].try_into().unwrap());
        if guid == guids::NV_DATA {
            return Some(offset);
        }
        if guid == guids::FFS {
            let volume_len =
                u64::from_le_bytes(data[offset + 32..offset + 40].try_into().unwrap());
            if volume_len == 0 {
                // A zero length would pin the scan in place.
                return None;
            }
            offset += volume_len as usize;
            continue;
        }
        offset += 1024;
    }
    None
}

/// Encodes one record: header, name, data, 0xFF pad to the 4-byte boundary.
fn encode_variable(var: &EfiVariable) -> Vec<u8> {
    let header = AuthVariableHeader {
        start_id: VARIABLE_DATA,
        state: VAR_ADDED,
        reserved: 0,
        attributes: var.attr,
        monotonic_count: var.monotonic_count,
        timestamp: var.timestamp.unwrap_or(EFI_TIME::ZEROED),
        pubkey_index: var.pubkey_index,
        name_size: var.name.byte_len() as u32,
        data_size: var.data.len() as u32,
        vendor_guid: var.vendor,
    };

    let mut out = header.as_bytes().to_vec();
    out.extend_from_slice(var.name.as_bytes());
    out.extend_from_slice(&var.data);
    out.resize(align4(out.len()), 0xff);
    out
}

/// Encodes the whole collection in lexicographic name order, checking it
/// fits in `capacity` bytes.
fn encode_varlist(varlist: &VarList, capacity: usize) -> Result<Vec<u8>, VarStoreError> {
    let mut blob = Vec::new();
    for var in varlist.iter() {
        blob.extend_from_slice(&encode_variable(var));
    }
    if blob.len() > capacity {
        return Err(VarStoreError::VarstoreOverflow {
            need: blob.len(),
            have: capacity,
        });
    }
    Ok(blob)
}

/// Produces a firmware image whose next boot attempts PXE over `mac`:
/// parses `image`, injects `Boot0099` + `BootNext`, and re-serializes.
///
/// Parse failures propagate untouched; no attempt is made to fabricate a
/// store when the image doesn't carry one.
pub fn make_pxe_firmware(image: &[u8], mac: &[u8]) -> Result<Vec<u8>, VarStoreError> {
    let store = Edk2VarStore::parse(image.to_vec())?;
    let mut vars = store.variables()?;
    add_pxe_boot_option(&mut vars, mac);
    store.serialize(&vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uefi_device_path::parse_text;
    use uefi_device_path::DevicePath;
    use wchar::wchz;
    use zerocopy::FromZeros;

    const FV_OFFSET: usize = 1024;
    const HDR_LEN: usize = size_of::<FirmwareVolumeHeader>() + 2 * size_of::<BlockMapEntry>();
    const TAIL: [u8; 512] = [0xab; 512];

    /// A minimal image: 1K of zeros (exercises the scan stride), the NvData
    /// volume with an empty store region of `region_len` bytes, and 512
    /// bytes of trailing platform data that must survive serialization.
    pub(crate) fn test_image(region_len: usize) -> Vec<u8> {
        let store_size = size_of::<VariableStoreHeader>() + region_len;
        let fv_length = (HDR_LEN + store_size) as u64;

        let mut image = vec![0u8; FV_OFFSET];
        image.extend_from_slice(
            FirmwareVolumeHeader {
                zero_vector: [0; 16],
                file_system_guid: guids::NV_DATA,
                fv_length,
                signature: EFI_FVH_SIGNATURE,
                attributes: 0x0004_feff,
                header_length: HDR_LEN as u16,
                checksum: 0,
                ext_header_offset: 0,
                reserved: 0,
                revision: 2,
            }
            .as_bytes(),
        );
        image.extend_from_slice(
            BlockMapEntry {
                num_blocks: 1,
                length: fv_length as u32,
            }
            .as_bytes(),
        );
        image.extend_from_slice(BlockMapEntry::new_zeroed().as_bytes());
        image.extend_from_slice(
            VariableStoreHeader {
                guid: guids::AUTH_VARS,
                size: store_size as u32,
                format: VARIABLE_STORE_FORMATTED,
                state: VARIABLE_STORE_HEALTHY,
                reserved: 0,
                reserved1: 0,
            }
            .as_bytes(),
        );
        image.resize(image.len() + region_len, 0xff);
        image.extend_from_slice(&TAIL);
        image
    }

    fn region_start() -> usize {
        FV_OFFSET + HDR_LEN + size_of::<VariableStoreHeader>()
    }

    #[test]
    fn parse_locates_region() {
        let store = Edk2VarStore::parse(test_image(1024)).unwrap();
        assert_eq!(store.region(), region_start()..region_start() + 1024);
    }

    #[test]
    fn scan_skips_ffs_volume_by_length() {
        // An FFS-marked volume of 2048 bytes in front of the real one.
        let mut image = vec![0u8; 2048];
        image[16..32].copy_from_slice(&guids::FFS.to_wire_bytes());
        image[32..40].copy_from_slice(&2048u64.to_le_bytes());
        image.extend_from_slice(&test_image(256)[FV_OFFSET..]);

        let store = Edk2VarStore::parse(image).unwrap();
        assert_eq!(
            store.region().start,
            2048 + HDR_LEN + size_of::<VariableStoreHeader>()
        );
    }

    #[test]
    fn missing_store_reported() {
        assert!(matches!(
            Edk2VarStore::parse(vec![0; 8192]),
            Err(VarStoreError::NvDataNotFound)
        ));
        assert!(matches!(
            Edk2VarStore::parse(Vec::new()),
            Err(VarStoreError::NvDataNotFound)
        ));
    }

    #[test]
    fn header_validation() {
        let base = test_image(256);

        let mut bad_sig = base.clone();
        bad_sig[FV_OFFSET + 40..FV_OFFSET + 44].copy_from_slice(&0x1234_5678u32.to_le_bytes());
        assert!(matches!(
            Edk2VarStore::parse(bad_sig),
            Err(VarStoreError::InvalidVolumeSignature(0x1234_5678))
        ));

        let store_hdr = FV_OFFSET + HDR_LEN;
        let mut bad_guid = base.clone();
        bad_guid[store_hdr..store_hdr + 16].copy_from_slice(&guids::FFS.to_wire_bytes());
        assert!(matches!(
            Edk2VarStore::parse(bad_guid),
            Err(VarStoreError::UnknownVarstoreGuid(g)) if g == guids::FFS
        ));

        let mut bad_format = base.clone();
        bad_format[store_hdr + 20] = 0x11;
        assert!(matches!(
            Edk2VarStore::parse(bad_format),
            Err(VarStoreError::UnknownVarstoreFormat(0x11))
        ));

        let mut bad_state = base.clone();
        bad_state[store_hdr + 21] = 0x22;
        assert!(matches!(
            Edk2VarStore::parse(bad_state),
            Err(VarStoreError::UnknownVarstoreState(0x22))
        ));
    }

    #[test]
    fn empty_store_roundtrips_byte_exact() {
        let image = test_image(1024);
        let store = Edk2VarStore::parse(image.clone()).unwrap();
        let vars = store.variables().unwrap();
        assert!(vars.is_empty());
        assert_eq!(store.serialize(&vars).unwrap(), image);
    }

    #[test]
    fn populated_store_roundtrips_byte_exact() {
        let store = Edk2VarStore::parse(test_image(4096)).unwrap();

        let mut vars = VarList::new();
        vars.set_boot_order(&[0x0099, 0x0000]);
        vars.set_bool("SecureBootEnable", false);
        add_pxe_boot_option(&mut vars, &[0xd8, 0x3a, 0xdd, 0x61, 0x4d, 0x15]);

        let image = store.serialize(&vars).unwrap();
        assert_eq!(image.len(), store.image().len());
        assert_eq!(&image[image.len() - TAIL.len()..], &TAIL);

        let reparsed = Edk2VarStore::parse(image.clone()).unwrap();
        let reloaded = reparsed.variables().unwrap();
        assert_eq!(reloaded.len(), 4);
        assert_eq!(reloaded.get_boot_order().unwrap(), [0x0099, 0x0000]);
        // unmutated reload serializes to the identical image
        assert_eq!(reparsed.serialize(&reloaded).unwrap(), image);
    }

    #[test]
    fn serialization_order_is_name_lexicographic() {
        let store = Edk2VarStore::parse(test_image(2048)).unwrap();

        let mut forward = VarList::new();
        forward.set_u32("Alpha", 1);
        forward.set_u32("Bravo", 2);
        forward.set_boot_next(0x99);

        let mut backward = VarList::new();
        backward.set_boot_next(0x99);
        backward.set_u32("Bravo", 2);
        backward.set_u32("Alpha", 1);

        assert_eq!(
            store.serialize(&forward).unwrap(),
            store.serialize(&backward).unwrap()
        );
    }

    #[test]
    fn pinned_record_encoding() {
        // name "A", guid = EFI global, attr NV|BS, one data byte.
        let var = EfiVariable::new("A", vec![0xab]);
        let mut expected = vec![
            0xaa, 0x55, // magic
            0x3f, // VAR_ADDED
            0x00, // reserved
            0x03, 0x00, 0x00, 0x00, // attributes
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // monotonic count
        ];
        expected.extend_from_slice(&[0; 16]); // timestamp
        expected.extend_from_slice(&[0; 4]); // pubkey index
        expected.extend_from_slice(&[0x04, 0x00, 0x00, 0x00]); // name_size
        expected.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]); // data_size
        expected.extend_from_slice(&[
            0x61, 0xdf, 0xe4, 0x8b, 0xca, 0x93, 0xd2, 0x11, 0xaa, 0x0d, 0x00, 0xe0, 0x98, 0x03,
            0x2b, 0x8c,
        ]); // vendor guid, wire form
        expected.extend_from_slice(&[b'A', 0x00, 0x00, 0x00]); // name
        expected.push(0xab); // data
        expected.extend_from_slice(&[0xff, 0xff, 0xff]); // alignment pad

        assert_eq!(encode_variable(&var), expected);
        assert_eq!(expected.len(), 68);
    }

    #[test]
    fn zero_length_data_roundtrips() {
        let store = Edk2VarStore::parse(test_image(512)).unwrap();
        let mut vars = VarList::new();
        vars.insert(EfiVariable::new("Empty", Vec::new()));

        let image = store.serialize(&vars).unwrap();
        let reloaded = Edk2VarStore::parse(image).unwrap().variables().unwrap();
        let var = reloaded.get("Empty").unwrap();
        assert_eq!(var.data, Vec::<u8>::new());
    }

    #[test]
    fn dead_records_skipped_but_walk_continues() {
        let store = Edk2VarStore::parse(test_image(1024)).unwrap();
        let mut vars = VarList::new();
        vars.set_u32("Aaa", 1);
        vars.set_u32("Bbb", 2);
        let image = store.serialize(&vars).unwrap();

        // Mark the first record ("Aaa") as deleted in place.
        let mut image = image;
        image[region_start() + 2] = 0x3e;

        let reparsed = Edk2VarStore::parse(image).unwrap();
        let reloaded = reparsed.variables().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.get("Aaa").is_none());
        assert_eq!(reloaded.get("Bbb").unwrap().as_u32().unwrap(), 2);

        // Re-serialization drops the dead slot: only "Bbb" plus fill.
        let rewritten = reparsed.serialize(&reloaded).unwrap();
        let reloaded2 = Edk2VarStore::parse(rewritten).unwrap().variables().unwrap();
        assert_eq!(reloaded2.len(), 1);
        assert!(reloaded2.get("Bbb").is_some());
    }

    #[test]
    fn oversized_record_sizes_rejected() {
        let store = Edk2VarStore::parse(test_image(256)).unwrap();
        let mut vars = VarList::new();
        vars.set_u32("Aaa", 1);
        let mut image = store.serialize(&vars).unwrap();

        // data_size at +40 of the record now reaches past the region.
        image[region_start() + 40..region_start() + 44]
            .copy_from_slice(&0x1000u32.to_le_bytes());
        let err = Edk2VarStore::parse(image).unwrap().variables().unwrap_err();
        assert!(matches!(
            err,
            VarStoreError::MalformedRecord { offset } if offset == region_start()
        ));
    }

    #[test]
    fn record_name_without_terminator_rejected() {
        let store = Edk2VarStore::parse(test_image(256)).unwrap();
        let mut vars = VarList::new();
        vars.set_u32("Aaa", 1);
        let mut image = store.serialize(&vars).unwrap();

        // Overwrite the name's null terminator ("Aaa\0" at +60).
        let name_off = region_start() + size_of::<AuthVariableHeader>();
        image[name_off..name_off + 8].copy_from_slice(&wchz!(u16, "Aaaa").as_bytes()[..8]);
        let err = Edk2VarStore::parse(image).unwrap().variables().unwrap_err();
        assert!(matches!(err, VarStoreError::BadRecordName { .. }));
    }

    #[test]
    fn overflow_is_detected_and_input_untouched() {
        let image = test_image(64);
        let store = Edk2VarStore::parse(image.clone()).unwrap();
        let mut vars = VarList::new();
        vars.insert(EfiVariable::new("Huge", vec![0; 65]));

        let err = store.serialize(&vars).unwrap_err();
        assert!(matches!(err, VarStoreError::VarstoreOverflow { have: 64, .. }));
        assert_eq!(store.image(), image.as_slice());
    }

    #[test]
    fn exact_fit_succeeds_one_byte_over_fails() {
        // The pinned "A" record encodes to exactly 68 bytes.
        let var = EfiVariable::new("A", vec![0xab]);
        assert_eq!(encode_variable(&var).len(), 68);

        let mut vars = VarList::new();
        vars.insert(var);

        let store = Edk2VarStore::parse(test_image(68)).unwrap();
        store.serialize(&vars).unwrap();

        let store = Edk2VarStore::parse(test_image(67)).unwrap();
        assert!(matches!(
            store.serialize(&vars),
            Err(VarStoreError::VarstoreOverflow { need: 68, have: 67 })
        ));
    }

    #[test]
    fn make_pxe_firmware_end_to_end() {
        let image = test_image(4096);
        let mac = [0xd8, 0x3a, 0xdd, 0x61, 0x4d, 0x15];
        let output = make_pxe_firmware(&image, &mac).unwrap();
        assert_eq!(output.len(), image.len());

        let vars = Edk2VarStore::parse(output).unwrap().variables().unwrap();

        let option = vars.get("Boot0099").unwrap().as_load_option().unwrap();
        assert_eq!(
            option.description.to_string(),
            "UEFI PXEv4 (MAC:D8:3A:DD:61:4D:15)"
        );
        assert_eq!(
            option.device_path,
            DevicePath::new().mac(&mac).ipv4()
        );
        assert_eq!(
            option.device_path,
            parse_text("MAC(d8:3a:dd:61:4d:15,0)/IPv4()").unwrap()
        );
        assert_eq!(
            option.optional_data,
            [
                0x4e, 0xac, 0x08, 0x81, 0x11, 0x9f, 0x59, 0x4d, 0x85, 0x0e, 0xe2, 0x1a, 0x52,
                0x2c, 0x59, 0xb2,
            ]
        );

        assert_eq!(vars.get_boot_next().unwrap(), 0x0099);
        assert_eq!(vars.get("BootNext").unwrap().data, [0x99, 0x00]);
    }

    #[test]
    fn auth_timestamp_survives_roundtrip() {
        let store = Edk2VarStore::parse(test_image(512)).unwrap();
        let mut vars = VarList::new();
        let mut var = EfiVariable::new("db", vec![1, 2, 3]);
        var.attr = 0x27; // NV | BS | RT | time-based auth
        var.touch();
        let stamp = var.timestamp.unwrap();
        vars.insert(var);

        let image = store.serialize(&vars).unwrap();
        let reloaded = Edk2VarStore::parse(image).unwrap().variables().unwrap();
        assert_eq!(reloaded.get("db").unwrap().timestamp, Some(stamp));
    }
}
