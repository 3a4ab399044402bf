// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Types and constants related to the UEFI spec and the EDK2 flash layout.
//!
//! This crate is divided into submodules:
//!
//! - `time`: the EFI_TIME structure from the Time Services chapter
//! - `nvram`: variable attributes from the Variable Services chapter
//! - `boot`: device path and load option structures from the Boot Manager
//!   chapter
//! - `edk2`: the EDK2-specific firmware volume and authenticated variable
//!   store headers
//! - `guids`: well-known GUIDs and their human names

#![no_std]

#[cfg(test)]
extern crate alloc;

pub mod boot;
pub mod edk2;
pub mod guids;
pub mod nvram;
pub mod time;
