// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Well-known GUIDs and their human names.

use guid::Guid;

/// UEFI spec 3.3 - Globally Defined Variables
pub const EFI_GLOBAL_VARIABLE: Guid =
    Guid::from_static_str("8be4df61-93ca-11d2-aa0d-00e098032b8c");

/// UEFI spec 32.6.1 - UEFI Image Variable GUID & Variable Name
pub const IMAGE_SECURITY_DATABASE: Guid =
    Guid::from_static_str("d719b2cb-3d3a-4596-a3bc-dad00e67656f");

/// The firmware volume holding the non-volatile data region (the variable
/// store) on EDK2 platforms.
pub const NV_DATA: Guid = Guid::from_static_str("fff12b8d-7696-4c8b-a985-2747075b4f50");

/// The authenticated variable store header GUID.
pub const AUTH_VARS: Guid = Guid::from_static_str("aaf32c78-947b-439a-a180-2e144ec37792");

/// The FFS2 firmware file system; volumes carrying it are skipped by the
/// store scanner using their declared length.
pub const FFS: Guid = Guid::from_static_str("8c8ce578-8a3d-4f1c-9935-896185c32dd3");

/// The marker EDK2's boot manager places in the optional data of
/// network-boot load options, in canonical form. Its wire form is the
/// 16-byte blob `4e ac 08 81 11 9f 59 4d 85 0e e2 1a 52 2c 59 b2`.
pub const EDK2_NETWORK_BOOT_MARKER: Guid =
    Guid::from_static_str("8108ac4e-9f11-4d59-850e-e21a522c59b2");

/// Returns the conventional short name for a well-known GUID.
pub fn name(guid: &Guid) -> Option<&'static str> {
    Some(match *guid {
        EFI_GLOBAL_VARIABLE => "EfiGlobalVariable",
        IMAGE_SECURITY_DATABASE => "ImageSecurityDatabase",
        NV_DATA => "NvData",
        AUTH_VARS => "AuthVars",
        FFS => "Ffs",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_boot_marker_wire_form() {
        assert_eq!(
            EDK2_NETWORK_BOOT_MARKER.to_wire_bytes(),
            [
                0x4e, 0xac, 0x08, 0x81, 0x11, 0x9f, 0x59, 0x4d, 0x85, 0x0e, 0xe2, 0x1a, 0x52,
                0x2c, 0x59, 0xb2,
            ]
        );
    }

    #[test]
    fn known_names() {
        assert_eq!(name(&NV_DATA), Some("NvData"));
        assert_eq!(name(&Guid::ZERO), None);
    }
}
