// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Definitions related to UEFI boot entries and device paths

use static_assertions::const_assert_eq;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;

/// The load option is selectable by the boot manager.
///
/// From UEFI spec 3.1.3
pub const LOAD_OPTION_ACTIVE: u32 = 0x0000_0001;

/// From UEFI spec 10.2
#[repr(C, packed)]
#[derive(Copy, Clone, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct EfiDevicePathProtocol {
    pub device_type: EfiDeviceType,
    pub sub_type: u8,
    pub length: [u8; 2],
}

const_assert_eq!(size_of::<EfiDevicePathProtocol>(), 4);

/// From UEFI spec 3.1.3
#[repr(C, packed)]
#[derive(Copy, Clone, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct EfiLoadOption {
    pub attributes: u32,
    pub file_path_list_length: u16,
}

const_assert_eq!(size_of::<EfiLoadOption>(), 6);

open_enum::open_enum! {
    #[derive(IntoBytes, FromBytes, Immutable, KnownLayout)]
    pub enum EfiDeviceType: u8 {
        HARDWARE = 0x01,
        ACPI = 0x02,
        MESSAGING = 0x03,
        MEDIA = 0x04,
        BIOS_BOOT_SPEC = 0x05,
        END = 0x7F,
    }
}

open_enum::open_enum! {
    #[derive(IntoBytes, FromBytes, Immutable, KnownLayout)]
    pub enum EfiEndDeviceSubType: u8 {
        INSTANCE = 0x01,
        ENTIRE = 0xFF,
    }
}

open_enum::open_enum! {
    #[derive(IntoBytes, FromBytes, Immutable, KnownLayout)]
    pub enum EfiMessagingDeviceSubType: u8 {
        MAC_ADDRESS = 11,
        IPV4 = 12,
        IPV6 = 13,
        URI = 24,
    }
}

/// MAC address messaging node payload (type 3, subtype 11).
///
/// The address field is zero-padded to 32 bytes regardless of the actual
/// hardware address length.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug, IntoBytes, FromBytes, Immutable, KnownLayout, PartialEq, Eq)]
pub struct EfiMacAddressDevice {
    pub address: [u8; 32],
    pub interface_type: u8,
}

const_assert_eq!(size_of::<EfiMacAddressDevice>(), 33);

/// IPv4 messaging node payload (type 3, subtype 12).
///
/// Unused fields are zeroed; an all-zero payload is the "boot over DHCP"
/// form emitted for PXE entries.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug, IntoBytes, FromBytes, Immutable, KnownLayout, PartialEq, Eq)]
pub struct EfiIpv4Device {
    pub local_ip: [u8; 4],
    pub remote_ip: [u8; 4],
    pub local_port: u16,
    pub remote_port: u16,
    pub protocol: u16,
    pub static_ip: u8,
    pub gateway: [u8; 4],
    pub subnet_mask: [u8; 4],
}

const_assert_eq!(size_of::<EfiIpv4Device>(), 23);
