// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Memoization layer over [`Edk2VarStore::parse`] for callers that stamp
//! many per-MAC images out of one base firmware.
//!
//! Parsing is pure, so this cache is observable only as a performance
//! optimization: the base image is parsed once, and each request clones the
//! variable collection before inserting its PXE records.

use crate::Edk2VarStore;
use crate::VarStoreError;
use uefi_nvram_vars::add_pxe_boot_option;
use uefi_nvram_vars::VarList;

/// A base firmware image with its parse results held for reuse.
#[derive(Debug, Clone)]
pub struct FirmwareCache {
    store: Edk2VarStore,
    vars: VarList,
}

impl FirmwareCache {
    /// Parses `image` once, up front.
    pub fn new(image: Vec<u8>) -> Result<Self, VarStoreError> {
        let store = Edk2VarStore::parse(image)?;
        let vars = store.variables()?;
        Ok(FirmwareCache { store, vars })
    }

    /// The unmodified base image.
    pub fn base_image(&self) -> &[u8] {
        self.store.image()
    }

    /// A snapshot of the base image's variables.
    pub fn variables(&self) -> &VarList {
        &self.vars
    }

    /// Builds a PXE-boot image for `mac` from the cached parse.
    pub fn pxe_firmware(&self, mac: &[u8]) -> Result<Vec<u8>, VarStoreError> {
        let mut vars = self.vars.clone();
        add_pxe_boot_option(&mut vars, mac);
        self.store.serialize(&vars)
    }
}
