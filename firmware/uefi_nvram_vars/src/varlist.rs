// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The keyed variable collection produced by the variable-store parser.

use crate::EfiLoadOption;
use crate::EfiVariable;
use crate::ValueError;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VarListError {
    #[error("variable {0} not found")]
    VariableNotFound(String),
    #[error("no free boot entry slots")]
    NoFreeBootEntry,
    #[error("bad value for variable {name}")]
    Value {
        name: String,
        #[source]
        source: ValueError,
    },
}

/// A mapping from variable name to variable.
///
/// Keys are the UTF-8 form of the name; the UCS-2 form stored inside each
/// [`EfiVariable`] is what ends up in the image. The map is a `BTreeMap` so
/// iteration - and therefore serialization - is lexicographic by name,
/// which keeps output images deterministic.
#[derive(Debug, Clone, Default)]
pub struct VarList {
    vars: BTreeMap<String, EfiVariable>,
}

impl VarList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates variables in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = &EfiVariable> {
        self.vars.values()
    }

    pub fn get(&self, name: &str) -> Option<&EfiVariable> {
        self.vars.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut EfiVariable> {
        self.vars.get_mut(name)
    }

    /// Inserts a variable under its own name, replacing any previous one.
    pub fn insert(&mut self, var: EfiVariable) {
        self.vars.insert(var.name.to_string(), var);
    }

    pub fn remove(&mut self, name: &str) -> Result<EfiVariable, VarListError> {
        tracing::debug!(name, "delete variable");
        self.vars
            .remove(name)
            .ok_or_else(|| VarListError::VariableNotFound(name.to_string()))
    }

    /// Returns the named variable, creating it with well-known defaults and
    /// an empty payload if absent.
    pub fn create(&mut self, name: &str) -> &mut EfiVariable {
        self.vars.entry(name.to_string()).or_insert_with(|| {
            tracing::debug!(name, "create variable");
            EfiVariable::new(name, Vec::new())
        })
    }

    pub fn find_by_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a EfiVariable> + 'a {
        self.vars
            .range(prefix.to_string()..)
            .take_while(move |(name, _)| name.starts_with(prefix))
            .map(|(_, var)| var)
    }

    // ---- typed convenience setters, create-on-miss ----

    pub fn set_bool(&mut self, name: &str, value: bool) {
        tracing::debug!(name, value, "set variable");
        self.create(name).set_bool(value);
    }

    pub fn set_u32(&mut self, name: &str, value: u32) {
        tracing::debug!(name, value, "set variable");
        self.create(name).set_u32(value);
    }

    // ---- boot management ----

    pub fn get_boot_order(&self) -> Result<Vec<u16>, VarListError> {
        self.typed_view("BootOrder", EfiVariable::as_boot_order)
    }

    pub fn set_boot_order(&mut self, order: &[u16]) {
        tracing::debug!(?order, "set BootOrder");
        self.create("BootOrder").set_boot_order(order);
    }

    pub fn append_boot_order(&mut self, entry: u16) {
        tracing::debug!(entry, "append to BootOrder");
        self.create("BootOrder").append_boot_order(entry);
    }

    pub fn get_boot_next(&self) -> Result<u16, VarListError> {
        self.typed_view("BootNext", EfiVariable::as_boot_next)
    }

    pub fn set_boot_next(&mut self, entry: u16) {
        tracing::debug!(entry, "set BootNext");
        self.create("BootNext").set_boot_next(entry);
    }

    pub fn get_boot_entry(&self, index: u16) -> Result<EfiLoadOption, VarListError> {
        self.typed_view(&boot_entry_name(index), EfiVariable::as_load_option)
    }

    /// Creates or replaces `Boot####` with the given load option.
    pub fn set_boot_entry(&mut self, index: u16, option: &EfiLoadOption) {
        let name = boot_entry_name(index);
        tracing::debug!(name = %name, title = %option.description, "set boot entry");
        self.create(&name).set_load_option(option);
    }

    /// Stores the load option under the first free `Boot####` slot and
    /// returns its index.
    pub fn add_boot_entry(&mut self, option: &EfiLoadOption) -> Result<u16, VarListError> {
        let index = (0..=u16::MAX)
            .find(|&index| !self.vars.contains_key(&boot_entry_name(index)))
            .ok_or(VarListError::NoFreeBootEntry)?;
        self.set_boot_entry(index, option);
        Ok(index)
    }

    pub fn remove_boot_entry(&mut self, index: u16) -> Result<(), VarListError> {
        self.remove(&boot_entry_name(index))?;
        Ok(())
    }

    /// Decodes every `Boot####` variable, keyed by entry number.
    pub fn boot_entries(&self) -> Result<BTreeMap<u16, EfiLoadOption>, VarListError> {
        let mut entries = BTreeMap::new();
        for (name, var) in &self.vars {
            let Some(index) = parse_boot_entry_name(name) else {
                continue;
            };
            let option = var
                .as_load_option()
                .map_err(|source| VarListError::Value {
                    name: name.clone(),
                    source,
                })?;
            entries.insert(index, option);
        }
        Ok(entries)
    }

    fn typed_view<T>(
        &self,
        name: &str,
        view: impl FnOnce(&EfiVariable) -> Result<T, ValueError>,
    ) -> Result<T, VarListError> {
        let var = self
            .get(name)
            .ok_or_else(|| VarListError::VariableNotFound(name.to_string()))?;
        view(var).map_err(|source| VarListError::Value {
            name: name.to_string(),
            source,
        })
    }
}

impl<'a> IntoIterator for &'a VarList {
    type Item = (&'a String, &'a EfiVariable);
    type IntoIter = std::collections::btree_map::Iter<'a, String, EfiVariable>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

impl FromIterator<EfiVariable> for VarList {
    fn from_iter<T: IntoIterator<Item = EfiVariable>>(iter: T) -> Self {
        let mut list = VarList::new();
        for var in iter {
            list.insert(var);
        }
        list
    }
}

fn boot_entry_name(index: u16) -> String {
    format!("Boot{index:04X}")
}

/// `Boot` followed by exactly four uppercase hex digits; `BootOrder` and
/// friends don't match.
fn parse_boot_entry_name(name: &str) -> Option<u16> {
    let digits = name.strip_prefix("Boot")?;
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pxe;
    use uefi_device_path::DevicePath;
    use uefi_specs::boot::LOAD_OPTION_ACTIVE;

    fn sample_option(title: &str) -> EfiLoadOption {
        EfiLoadOption {
            attributes: LOAD_OPTION_ACTIVE,
            description: title.into(),
            device_path: DevicePath::new().mac(&[1, 2, 3, 4, 5, 6]).ipv4(),
            optional_data: Vec::new(),
        }
    }

    #[test]
    fn create_applies_defaults() {
        let mut list = VarList::new();
        list.set_boot_next(0x0099);
        let var = list.get("BootNext").unwrap();
        assert_eq!(var.attr, 0x7);
        assert_eq!(var.vendor, uefi_specs::guids::EFI_GLOBAL_VARIABLE);
    }

    #[test]
    fn boot_order_roundtrip() {
        let mut list = VarList::new();
        list.set_boot_order(&[0x0099, 0x0000]);
        assert_eq!(list.get_boot_order().unwrap(), [0x0099, 0x0000]);
        assert_eq!(list.get("BootOrder").unwrap().data, [0x99, 0x00, 0x00, 0x00]);

        list.append_boot_order(0x0002);
        assert_eq!(list.get_boot_order().unwrap(), [0x0099, 0x0000, 0x0002]);
    }

    #[test]
    fn missing_variables_are_reported() {
        let list = VarList::new();
        assert!(matches!(
            list.get_boot_order(),
            Err(VarListError::VariableNotFound(name)) if name == "BootOrder"
        ));
        let mut list = list;
        assert!(list.remove("Nope").is_err());
    }

    #[test]
    fn boot_entries_by_index() {
        let mut list = VarList::new();
        list.set_boot_entry(0, &sample_option("first"));
        list.set_boot_entry(0x99, &sample_option("pxe"));
        list.set_boot_order(&[0x99, 0]);

        let entries = list.boot_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[&0x99].description.to_string(), "pxe");

        // BootOrder and BootNext must not be mistaken for entries
        list.set_boot_next(0);
        assert_eq!(list.boot_entries().unwrap().len(), 2);
    }

    #[test]
    fn add_boot_entry_picks_first_free_slot() {
        let mut list = VarList::new();
        assert_eq!(list.add_boot_entry(&sample_option("a")).unwrap(), 0);
        assert_eq!(list.add_boot_entry(&sample_option("b")).unwrap(), 1);
        list.remove_boot_entry(0).unwrap();
        assert_eq!(list.add_boot_entry(&sample_option("c")).unwrap(), 0);
    }

    #[test]
    fn find_by_prefix_walks_sorted_names() {
        let mut list = VarList::new();
        pxe::add_pxe_boot_option(&mut list, &[1, 2, 3, 4, 5, 6]);
        list.set_bool("SecureBootEnable", true);

        let boot_names: Vec<String> = list
            .find_by_prefix("Boot")
            .map(|v| v.name.to_string())
            .collect();
        assert_eq!(boot_names, ["Boot0099", "BootNext"]);
    }
}
