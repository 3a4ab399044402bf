// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! JSON import/export for a variable collection, used to move offline
//! variable dumps in and out of the store editor.
//!
//! The document is an object keyed by variable name; each value carries the
//! name again plus `guid`, `attr`, hex `data`, and the optional
//! authentication metadata (`count`, `time`, `pk_idx`). Syntax lives in the
//! serde structs; the semantic pass converts to [`VarList`] and rejects
//! entries whose key disagrees with their embedded name.

#![forbid(unsafe_code)]

use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use ucs2::Ucs2LeVec;
use uefi_nvram_vars::EfiVariable;
use uefi_nvram_vars::VarList;
use uefi_specs::time::EfiDaylight;
use uefi_specs::time::EfiTimezone;
use uefi_specs::time::EFI_TIME;

#[derive(Debug, Error)]
pub enum JsonVarsError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entry {key:?} carries the mismatched name {name:?}")]
    NameMismatch { key: String, name: String },
}

mod json {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct JsonVariable {
        pub name: String,
        #[serde(with = "guid_str")]
        pub guid: guid::Guid,
        pub attr: u32,
        #[serde(with = "hex_vec")]
        pub data: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub count: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub time: Option<JsonTime>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub pk_idx: Option<u32>,
    }

    /// The wall-clock part of an EFI_TIME; the zeroed timezone/daylight
    /// fields of authenticated-variable timestamps are not represented.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct JsonTime {
        pub year: u16,
        pub month: u8,
        pub day: u8,
        pub hour: u8,
        pub minute: u8,
        pub second: u8,
        #[serde(default, skip_serializing_if = "is_zero")]
        pub nanosecond: u32,
    }

    fn is_zero(v: &u32) -> bool {
        *v == 0
    }

    /// Canonical-string GUID codec for serde fields.
    mod guid_str {
        use serde::de::Error;
        use serde::Deserialize;
        use serde::Deserializer;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(guid: &guid::Guid, ser: S) -> Result<S::Ok, S::Error> {
            ser.collect_str(guid)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<guid::Guid, D::Error> {
            let text = String::deserialize(de)?;
            text.parse().map_err(D::Error::custom)
        }
    }

    /// Lowercase-hex byte payload codec for serde fields.
    mod hex_vec {
        use serde::de::Error;
        use serde::Deserialize;
        use serde::Deserializer;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(data: &[u8], ser: S) -> Result<S::Ok, S::Error> {
            ser.collect_str(&hex::encode(data))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
            let text = String::deserialize(de)?;
            hex::decode(&text).map_err(D::Error::custom)
        }
    }
}

impl From<&json::JsonTime> for EFI_TIME {
    fn from(t: &json::JsonTime) -> Self {
        EFI_TIME {
            year: t.year,
            month: t.month,
            day: t.day,
            hour: t.hour,
            minute: t.minute,
            second: t.second,
            pad1: 0,
            nanosecond: t.nanosecond,
            timezone: EfiTimezone(0),
            daylight: EfiDaylight::new(),
            pad2: 0,
        }
    }
}

impl From<&EFI_TIME> for json::JsonTime {
    fn from(t: &EFI_TIME) -> Self {
        json::JsonTime {
            year: t.year,
            month: t.month,
            day: t.day,
            hour: t.hour,
            minute: t.minute,
            second: t.second,
            nanosecond: t.nanosecond,
        }
    }
}

/// Renders the collection as a pretty-printed JSON document.
pub fn export_json(vars: &VarList) -> Result<String, JsonVarsError> {
    let doc: BTreeMap<String, json::JsonVariable> = vars
        .iter()
        .map(|var| {
            (
                var.name.to_string(),
                json::JsonVariable {
                    name: var.name.to_string(),
                    guid: var.vendor,
                    attr: var.attr,
                    data: var.data.clone(),
                    count: (var.monotonic_count != 0).then_some(var.monotonic_count),
                    time: var.timestamp.as_ref().map(Into::into),
                    pk_idx: (var.pubkey_index != 0).then_some(var.pubkey_index),
                },
            )
        })
        .collect();
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parses a JSON document produced by [`export_json`] (or written by hand)
/// back into a collection.
pub fn import_json(data: &[u8]) -> Result<VarList, JsonVarsError> {
    // syntax
    let doc: BTreeMap<String, json::JsonVariable> = serde_json::from_slice(data)?;

    // semantics
    let mut vars = VarList::new();
    for (key, entry) in doc {
        if key != entry.name {
            return Err(JsonVarsError::NameMismatch {
                key,
                name: entry.name,
            });
        }
        vars.insert(EfiVariable {
            name: Ucs2LeVec::from(entry.name.as_str()),
            vendor: entry.guid,
            attr: entry.attr,
            data: entry.data,
            monotonic_count: entry.count.unwrap_or(0),
            timestamp: entry.time.as_ref().map(Into::into),
            pubkey_index: entry.pk_idx.unwrap_or(0),
        });
    }
    Ok(vars)
}
