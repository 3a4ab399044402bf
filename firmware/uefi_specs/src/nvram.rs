// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! UEFI Nvram Variable Services

use bitfield_struct::bitfield;

/// UEFI spec 8.2 - Variable Services
#[bitfield(u32)]
#[derive(Eq, PartialEq)]
pub struct EfiVariableAttributes {
    pub non_volatile: bool,
    pub bootservice_access: bool,
    pub runtime_access: bool,
    pub hardware_error_record: bool,
    /// Deprecated by the spec; preserved byte-for-byte when present.
    pub authenticated_write_access: bool,
    pub time_based_authenticated_write_access: bool,
    pub append_write: bool,

    #[bits(25)]
    _reserved: u32,
}

impl EfiVariableAttributes {
    /// NV | BS, the fallback for variables with no well-known defaults.
    pub const DEFAULT_ATTRIBUTES: EfiVariableAttributes = EfiVariableAttributes::new()
        .with_non_volatile(true)
        .with_bootservice_access(true);

    /// NV | BS | RT, used by `Boot####`, `BootOrder` and `BootNext`.
    pub const DEFAULT_ATTRIBUTES_BOOT: EfiVariableAttributes =
        Self::DEFAULT_ATTRIBUTES.with_runtime_access(true);

    /// BS | RT, used by the volatile `SecureBoot` status variable.
    pub const DEFAULT_ATTRIBUTES_VOLATILE: EfiVariableAttributes = EfiVariableAttributes::new()
        .with_bootservice_access(true)
        .with_runtime_access(true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_bits() {
        assert_eq!(u32::from(EfiVariableAttributes::DEFAULT_ATTRIBUTES), 0x3);
        assert_eq!(
            u32::from(EfiVariableAttributes::DEFAULT_ATTRIBUTES_BOOT),
            0x7
        );
        assert_eq!(
            u32::from(EfiVariableAttributes::DEFAULT_ATTRIBUTES_VOLATILE),
            0x6
        );
        assert!(
            EfiVariableAttributes::from(0x20).time_based_authenticated_write_access()
        );
    }
}
