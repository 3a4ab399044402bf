// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Codec for UEFI device paths: the ordered list of typed nodes that
//! identifies a boot target.
//!
//! The nodes understood in typed form are the ones PXE boot entries are
//! built from (MAC, IPv4, URI); anything else found in an image is kept as
//! an opaque `(type, subtype, payload)` triple so that re-encoding a parsed
//! path reproduces the input bytes exactly (trailing padding beyond the
//! end-of-path node excepted).

#![forbid(unsafe_code)]

mod text;

pub use text::parse_text;
pub use uefi_specs::boot::EfiIpv4Device;
pub use uefi_specs::boot::EfiMacAddressDevice;

use thiserror::Error;
use uefi_specs::boot;
use uefi_specs::boot::EfiDevicePathProtocol;
use zerocopy::FromBytes;
use zerocopy::FromZeros;
use zerocopy::IntoBytes;

#[derive(Debug, Error)]
pub enum DevicePathError {
    #[error("node header extends past the end of the buffer")]
    TruncatedHeader,
    #[error("node length {len} is invalid with {remaining} bytes remaining")]
    BadNodeLength { len: u16, remaining: usize },
    #[error("unrecognized node {0:?} in textual device path")]
    UnknownTextNode(String),
    #[error("malformed textual device path: {0}")]
    MalformedText(&'static str),
}

/// A single device path node.
///
/// `Mac` and `Ipv4` carry the payload structs from [`uefi_specs::boot`];
/// `Uri` carries the raw UTF-8 bytes (the spec does not require them to be
/// valid UTF-8, so they are not re-validated here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevicePathNode {
    Mac(EfiMacAddressDevice),
    Ipv4(EfiIpv4Device),
    Uri(Vec<u8>),
    Unknown {
        device_type: u8,
        sub_type: u8,
        payload: Vec<u8>,
    },
}

impl DevicePathNode {
    /// A MAC node with the given hardware address (zero-padded to 32
    /// bytes, truncated if longer) and interface type.
    pub fn mac(address: &[u8], interface_type: u8) -> Self {
        let mut node = EfiMacAddressDevice::new_zeroed();
        let n = address.len().min(node.address.len());
        node.address[..n].copy_from_slice(&address[..n]);
        node.interface_type = interface_type;
        DevicePathNode::Mac(node)
    }

    /// The all-zero IPv4 node, i.e. "boot over DHCP".
    pub fn ipv4() -> Self {
        DevicePathNode::Ipv4(EfiIpv4Device::new_zeroed())
    }

    fn header(&self) -> (u8, u8) {
        match self {
            DevicePathNode::Mac(_) => (
                boot::EfiDeviceType::MESSAGING.0,
                boot::EfiMessagingDeviceSubType::MAC_ADDRESS.0,
            ),
            DevicePathNode::Ipv4(_) => (
                boot::EfiDeviceType::MESSAGING.0,
                boot::EfiMessagingDeviceSubType::IPV4.0,
            ),
            DevicePathNode::Uri(_) => (
                boot::EfiDeviceType::MESSAGING.0,
                boot::EfiMessagingDeviceSubType::URI.0,
            ),
            DevicePathNode::Unknown {
                device_type,
                sub_type,
                ..
            } => (*device_type, *sub_type),
        }
    }

    fn payload_len(&self) -> usize {
        match self {
            DevicePathNode::Mac(_) => size_of::<EfiMacAddressDevice>(),
            DevicePathNode::Ipv4(_) => size_of::<EfiIpv4Device>(),
            DevicePathNode::Uri(uri) => uri.len(),
            DevicePathNode::Unknown { payload, .. } => payload.len(),
        }
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        let (device_type, sub_type) = self.header();
        let length = (size_of::<EfiDevicePathProtocol>() + self.payload_len()) as u16;
        out.extend_from_slice(
            EfiDevicePathProtocol {
                device_type: boot::EfiDeviceType(device_type),
                sub_type,
                length: length.to_le_bytes(),
            }
            .as_bytes(),
        );
        match self {
            DevicePathNode::Mac(node) => out.extend_from_slice(node.as_bytes()),
            DevicePathNode::Ipv4(node) => out.extend_from_slice(node.as_bytes()),
            DevicePathNode::Uri(uri) => out.extend_from_slice(uri),
            DevicePathNode::Unknown { payload, .. } => out.extend_from_slice(payload),
        }
    }
}

/// An ordered sequence of typed nodes. The terminating end-of-path node is
/// implicit: it is consumed on parse and always re-emitted on encode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevicePath {
    nodes: Vec<DevicePathNode>,
}

impl DevicePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[DevicePathNode] {
        &self.nodes
    }

    pub fn push(&mut self, node: DevicePathNode) {
        self.nodes.push(node);
    }

    /// Appends a MAC node with interface type 0; part of the
    /// `mac(..).ipv4()` builder used for PXE entries.
    pub fn mac(mut self, address: &[u8]) -> Self {
        self.nodes.push(DevicePathNode::mac(address, 0));
        self
    }

    /// Appends the all-zero IPv4 node.
    pub fn ipv4(mut self) -> Self {
        self.nodes.push(DevicePathNode::ipv4());
        self
    }

    /// Appends a URI node.
    pub fn uri(mut self, uri: &str) -> Self {
        self.nodes.push(DevicePathNode::Uri(uri.as_bytes().to_vec()));
        self
    }

    /// Parses a binary device path, consuming nodes until an end-of-path
    /// node is seen or the buffer is exhausted.
    pub fn parse(data: &[u8]) -> Result<Self, DevicePathError> {
        let mut nodes = Vec::new();
        let mut rem = data;
        while !rem.is_empty() {
            let (header, _) = EfiDevicePathProtocol::read_from_prefix(rem)
                .map_err(|_| DevicePathError::TruncatedHeader)?;
            let len = u16::from_le_bytes(header.length);
            if (len as usize) < size_of::<EfiDevicePathProtocol>() || len as usize > rem.len() {
                return Err(DevicePathError::BadNodeLength {
                    len,
                    remaining: rem.len(),
                });
            }
            let (node_bytes, rest) = rem.split_at(len as usize);
            let payload = &node_bytes[size_of::<EfiDevicePathProtocol>()..];
            rem = rest;

            if header.device_type == boot::EfiDeviceType::END
                && boot::EfiEndDeviceSubType(header.sub_type) == boot::EfiEndDeviceSubType::ENTIRE
            {
                break;
            }

            nodes.push(Self::parse_node(&header, payload));
        }
        Ok(DevicePath { nodes })
    }

    fn parse_node(header: &EfiDevicePathProtocol, payload: &[u8]) -> DevicePathNode {
        if header.device_type == boot::EfiDeviceType::MESSAGING {
            match boot::EfiMessagingDeviceSubType(header.sub_type) {
                boot::EfiMessagingDeviceSubType::MAC_ADDRESS => {
                    if let Ok(node) = EfiMacAddressDevice::read_from_bytes(payload) {
                        return DevicePathNode::Mac(node);
                    }
                }
                boot::EfiMessagingDeviceSubType::IPV4 => {
                    if let Ok(node) = EfiIpv4Device::read_from_bytes(payload) {
                        return DevicePathNode::Ipv4(node);
                    }
                }
                boot::EfiMessagingDeviceSubType::URI => {
                    return DevicePathNode::Uri(payload.to_vec());
                }
                _ => {}
            }
        }
        // Unrecognized nodes (and short known nodes) stay opaque so the
        // path re-encodes to the input bytes.
        DevicePathNode::Unknown {
            device_type: header.device_type.0,
            sub_type: header.sub_type,
            payload: payload.to_vec(),
        }
    }

    /// Serializes the path, always emitting a trailing end-of-path node.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        for node in &self.nodes {
            node.encode_into(&mut out);
        }
        out.extend_from_slice(
            EfiDevicePathProtocol {
                device_type: boot::EfiDeviceType::END,
                sub_type: boot::EfiEndDeviceSubType::ENTIRE.0,
                length: (size_of::<EfiDevicePathProtocol>() as u16).to_le_bytes(),
            }
            .as_bytes(),
        );
        out
    }

    /// Length of [`encode`](Self::encode)'s output, end node included.
    pub fn encoded_len(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| size_of::<EfiDevicePathProtocol>() + n.payload_len())
            .sum::<usize>()
            + size_of::<EfiDevicePathProtocol>()
    }
}
