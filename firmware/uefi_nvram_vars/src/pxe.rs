// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Synthesizes the pair of variables that makes the next boot attempt PXE
//! over a given MAC address: a `Boot0099` load option and a
//! `BootNext=0x0099` pointer.

use crate::EfiLoadOption;
use crate::EfiVariable;
use crate::VarList;
use ucs2::Ucs2LeVec;
use uefi_device_path::DevicePath;
use uefi_specs::boot::LOAD_OPTION_ACTIVE;
use uefi_specs::guids;

/// The boot entry number reserved for the synthesized PXE option.
pub const PXE_BOOT_ENTRY: u16 = 0x0099;

/// The optional-data marker EDK2's boot manager places in network boot
/// options; carrying it makes the synthesized entry indistinguishable from
/// one the firmware enumerated itself.
pub const PXE_OPTIONAL_DATA: [u8; 16] = guids::EDK2_NETWORK_BOOT_MARKER.to_wire_bytes();

/// Renders the load option title, e.g. `UEFI PXEv4 (MAC:D8:3A:DD:61:4D:15)`.
pub fn pxe_title(mac: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    if mac.len() != 6 {
        // Non-standard address lengths take the generic rendering.
        let rendered = mac
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(":");
        return format!("UEFI PXEv4 (MAC:{rendered})");
    }

    let mut title = String::with_capacity(34);
    title.push_str("UEFI PXEv4 (MAC:");
    for (i, &b) in mac.iter().enumerate() {
        if i > 0 {
            title.push(':');
        }
        title.push(HEX[(b >> 4) as usize] as char);
        title.push(HEX[(b & 0xf) as usize] as char);
    }
    title.push(')');
    title
}

/// Builds the `Boot0099` variable: an active load option over
/// `MAC(mac,0)/IPv4()` with the network-boot marker as optional data.
pub fn pxe_boot_option(mac: &[u8]) -> EfiVariable {
    let option = EfiLoadOption {
        attributes: LOAD_OPTION_ACTIVE,
        description: Ucs2LeVec::from(pxe_title(mac).as_str()),
        device_path: DevicePath::new().mac(mac).ipv4(),
        optional_data: PXE_OPTIONAL_DATA.to_vec(),
    };
    EfiVariable::new("Boot0099", option.encode())
}

/// Builds the `BootNext` variable pointing at [`PXE_BOOT_ENTRY`].
pub fn pxe_boot_next() -> EfiVariable {
    EfiVariable::new("BootNext", PXE_BOOT_ENTRY.to_le_bytes().to_vec())
}

/// Inserts both PXE variables, replacing any previous ones. Calling this
/// twice with the same MAC yields byte-identical records.
pub fn add_pxe_boot_option(varlist: &mut VarList, mac: &[u8]) {
    tracing::debug!(title = %pxe_title(mac), "adding PXE boot option");
    varlist.insert(pxe_boot_option(mac));
    varlist.insert(pxe_boot_next());
}
