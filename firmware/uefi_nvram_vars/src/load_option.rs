// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Codec for EFI_LOAD_OPTION, the payload of `Boot####` variables.

use std::fmt;
use std::fmt::Display;
use thiserror::Error;
use ucs2::Ucs2LeSlice;
use ucs2::Ucs2LeVec;
use uefi_device_path::DevicePath;
use uefi_device_path::DevicePathError;
use uefi_specs::boot;
use zerocopy::FromBytes;
use zerocopy::IntoBytes;

#[derive(Debug, Error)]
pub enum LoadOptionError {
    #[error("buffer too short for the load option header")]
    TruncatedHeader,
    #[error("description is not terminated within the buffer")]
    UnterminatedDescription,
    #[error("file path list length {len} exceeds the {remaining} bytes remaining")]
    FilePathListTooLong { len: u16, remaining: usize },
    #[error("bad file path list")]
    DevicePath(#[from] DevicePathError),
}

/// A decoded EFI_LOAD_OPTION.
///
/// Layout: `attributes u32`, `file_path_list_length u16`, null-terminated
/// UCS-2 description, `file_path_list_length` bytes of device path, then
/// opaque optional data to the end of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EfiLoadOption {
    pub attributes: u32,
    pub description: Ucs2LeVec,
    pub device_path: DevicePath,
    pub optional_data: Vec<u8>,
}

impl EfiLoadOption {
    pub fn parse(data: &[u8]) -> Result<Self, LoadOptionError> {
        let (header, rest) = boot::EfiLoadOption::read_from_prefix(data)
            .map_err(|_| LoadOptionError::TruncatedHeader)?;

        // The description's terminator has to be found before the buffer can
        // be split, since the tail (device path + optional data) is not
        // necessarily an even number of bytes.
        let desc_end = (0..rest.len() / 2)
            .map(|i| i * 2)
            .find(|&i| rest[i] == 0 && rest[i + 1] == 0)
            .ok_or(LoadOptionError::UnterminatedDescription)?
            + 2;
        let description = Ucs2LeSlice::from_slice_with_nul(&rest[..desc_end])
            .map_err(|_| LoadOptionError::UnterminatedDescription)?
            .to_ucs2_le_vec();
        let rest = &rest[desc_end..];

        let file_path_list_length = header.file_path_list_length;
        if file_path_list_length as usize > rest.len() {
            return Err(LoadOptionError::FilePathListTooLong {
                len: file_path_list_length,
                remaining: rest.len(),
            });
        }
        let (path_bytes, optional_data) = rest.split_at(file_path_list_length as usize);
        let device_path = DevicePath::parse(path_bytes)?;

        Ok(EfiLoadOption {
            attributes: header.attributes,
            description,
            device_path,
            optional_data: optional_data.to_vec(),
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let path = self.device_path.encode();
        let mut out = Vec::with_capacity(
            size_of::<boot::EfiLoadOption>()
                + self.description.byte_len()
                + path.len()
                + self.optional_data.len(),
        );
        out.extend_from_slice(
            boot::EfiLoadOption {
                attributes: self.attributes,
                file_path_list_length: path.len() as u16,
            }
            .as_bytes(),
        );
        out.extend_from_slice(self.description.as_bytes());
        out.extend_from_slice(&path);
        out.extend_from_slice(&self.optional_data);
        out
    }
}

impl Display for EfiLoadOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" -> {}", self.description, self.device_path)
    }
}
