// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The textual device path form used by EDK2, e.g.
//! `MAC(d8:3a:dd:61:4d:15,0)/IPv4()/Uri(http://boot.example/efi)`.

use crate::DevicePath;
use crate::DevicePathError;
use crate::DevicePathNode;
use std::fmt;
use std::fmt::Display;
use zerocopy::FromZeros;
use zerocopy::IntoBytes;

impl Display for DevicePathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevicePathNode::Mac(node) => {
                write!(f, "MAC(")?;
                for (i, b) in node.address[..6].iter().enumerate() {
                    if i > 0 {
                        write!(f, ":")?;
                    }
                    write!(f, "{b:02x}")?;
                }
                write!(f, ",{})", node.interface_type)
            }
            DevicePathNode::Ipv4(node) => {
                if node.as_bytes().iter().all(|&b| b == 0) {
                    write!(f, "IPv4()")
                } else {
                    let [a, b, c, d] = node.remote_ip;
                    write!(f, "IPv4({a}.{b}.{c}.{d})")
                }
            }
            DevicePathNode::Uri(uri) => {
                write!(f, "Uri({})", String::from_utf8_lossy(uri))
            }
            DevicePathNode::Unknown {
                device_type,
                sub_type,
                ..
            } => write!(f, "Path({device_type},{sub_type})"),
        }
    }
}

impl Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes().iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

/// Parses the textual form. Node names not understood here fail with
/// [`DevicePathError::UnknownTextNode`]; there is no opaque fallback for
/// text, unlike the binary parser.
pub fn parse_text(s: &str) -> Result<DevicePath, DevicePathError> {
    let mut path = DevicePath::new();
    for segment in split_nodes(s) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (name, args) = split_args(segment)?;
        match name {
            "MAC" => {
                let (addr_text, if_text) = match args.split_once(',') {
                    Some((a, i)) => (a, Some(i)),
                    None => (args, None),
                };
                let address = parse_mac(addr_text)?;
                let interface_type = match if_text {
                    Some(t) => parse_u8(t.trim())?,
                    None => 0,
                };
                path.push(DevicePathNode::mac(&address, interface_type));
            }
            "IPv4" => {
                let mut node = crate::EfiIpv4Device::new_zeroed();
                let addr_text = args.split(',').next().unwrap_or("").trim();
                if !addr_text.is_empty() {
                    node.remote_ip = parse_ipv4(addr_text)?;
                }
                path.push(DevicePathNode::Ipv4(node));
            }
            "Uri" => {
                path.push(DevicePathNode::Uri(args.as_bytes().to_vec()));
            }
            other => return Err(DevicePathError::UnknownTextNode(other.to_string())),
        }
    }
    Ok(path)
}

/// Splits on `/` at paren depth zero, so URIs containing slashes survive.
fn split_nodes(s: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                segments.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&s[start..]);
    segments
}

fn split_args(segment: &str) -> Result<(&str, &str), DevicePathError> {
    let open = segment
        .find('(')
        .ok_or(DevicePathError::MalformedText("expected '(' in node"))?;
    let close = segment
        .rfind(')')
        .ok_or(DevicePathError::MalformedText("expected ')' in node"))?;
    if close < open {
        return Err(DevicePathError::MalformedText("mismatched parentheses"));
    }
    Ok((&segment[..open], &segment[open + 1..close]))
}

fn parse_mac(text: &str) -> Result<Vec<u8>, DevicePathError> {
    let hex: String = text.chars().filter(|&c| c != ':').collect();
    if hex.is_empty() || hex.len() % 2 != 0 {
        return Err(DevicePathError::MalformedText("bad MAC address length"));
    }
    hex.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            u8::from_str_radix(std::str::from_utf8(pair).unwrap(), 16)
                .map_err(|_| DevicePathError::MalformedText("bad MAC address digit"))
        })
        .collect()
}

fn parse_ipv4(text: &str) -> Result<[u8; 4], DevicePathError> {
    let mut out = [0u8; 4];
    let mut parts = text.split('.');
    for slot in &mut out {
        *slot = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or(DevicePathError::MalformedText("bad IPv4 address"))?;
    }
    if parts.next().is_some() {
        return Err(DevicePathError::MalformedText("bad IPv4 address"));
    }
    Ok(out)
}

fn parse_u8(text: &str) -> Result<u8, DevicePathError> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| DevicePathError::MalformedText("bad interface type"))
}
