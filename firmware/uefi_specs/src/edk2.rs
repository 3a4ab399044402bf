// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! EDK2 flash layout: the firmware volume header, the authenticated
//! variable store header, and the per-variable record header.
//!
//! These are the structures walked by the variable-store parser. They are
//! stored little-endian in the image; fields here are native-endian and the
//! parser only runs on little-endian hosts, matching the rest of the
//! codebase.

use crate::time::EFI_TIME;
use guid::Guid;
use static_assertions::const_assert_eq;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;

/// `"_FVH"`, little-endian, at offset 40 of a firmware volume header.
pub const EFI_FVH_SIGNATURE: u32 = 0x4856_465f;

/// `VARIABLE_STORE_HEADER.format` for a formatted store.
pub const VARIABLE_STORE_FORMATTED: u8 = 0x5a;

/// `VARIABLE_STORE_HEADER.state` for a healthy store.
pub const VARIABLE_STORE_HEALTHY: u8 = 0xfe;

/// `AUTHENTICATED_VARIABLE_HEADER.start_id` for a live record slot. The
/// first slot without this magic terminates the record walk.
pub const VARIABLE_DATA: u16 = 0x55aa;

/// Record state: VAR_ADDED without any deletion bits cleared. Only records
/// in this state are loaded.
pub const VAR_ADDED: u8 = 0x3f;

/// Rounds up to the 4-byte record alignment used inside the store.
pub const fn align4(n: usize) -> usize {
    (n + 3) & !3
}

/// EFI_FIRMWARE_VOLUME_HEADER, up to (not including) the block map.
///
/// From the Platform Initialization spec, vol 3.
#[repr(C)]
#[derive(Copy, Clone, Debug, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct FirmwareVolumeHeader {
    pub zero_vector: [u8; 16],
    pub file_system_guid: Guid,
    pub fv_length: u64,
    pub signature: u32,
    pub attributes: u32,
    pub header_length: u16,
    pub checksum: u16,
    pub ext_header_offset: u16,
    pub reserved: u8,
    pub revision: u8,
}

const_assert_eq!(size_of::<FirmwareVolumeHeader>(), 56);

/// One entry of the block map that trails [`FirmwareVolumeHeader`]; the map
/// is terminated by an all-zero entry and covered by `header_length`.
#[repr(C)]
#[derive(Copy, Clone, Debug, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct BlockMapEntry {
    pub num_blocks: u32,
    pub length: u32,
}

const_assert_eq!(size_of::<BlockMapEntry>(), 8);

/// VARIABLE_STORE_HEADER, immediately after the volume header.
#[repr(C)]
#[derive(Copy, Clone, Debug, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct VariableStoreHeader {
    /// Identifies the store format; authenticated stores use
    /// [`guids::AUTH_VARS`](crate::guids::AUTH_VARS).
    pub guid: Guid,
    /// Store size in bytes, including this header.
    pub size: u32,
    pub format: u8,
    pub state: u8,
    pub reserved: u16,
    pub reserved1: u32,
}

const_assert_eq!(size_of::<VariableStoreHeader>(), 28);

/// AUTHENTICATED_VARIABLE_HEADER, one per record slot.
///
/// The UCS-2 name (`name_size` bytes, terminator included) and the payload
/// (`data_size` bytes) follow the header back-to-back; the next record
/// starts at the following 4-byte boundary.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct AuthVariableHeader {
    pub start_id: u16,
    pub state: u8,
    pub reserved: u8,
    pub attributes: u32,
    pub monotonic_count: u64,
    pub timestamp: EFI_TIME,
    pub pubkey_index: u32,
    pub name_size: u32,
    pub data_size: u32,
    /// Stored in the mixed-endian wire form; see [`Guid::to_wire_bytes`].
    pub vendor_guid: Guid,
}

const_assert_eq!(size_of::<AuthVariableHeader>(), 60);
