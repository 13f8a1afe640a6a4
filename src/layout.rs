//! ABI layout lock: the persisted member order of the extension struct.
//!
//! The index is append-only by contract. The lock turns that contract into
//! something a CI job can check: the previously recorded members must be an
//! exact prefix of what the generator produces now, with the same names,
//! versions and pointer types.

use crate::api_index::VersionedApiIndex;
use crate::error::{GenerateError, Result};
use crate::output::write_atomically;
use crate::render::member_signature;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedMember {
    pub version: String,
    pub name: String,
    pub signature: String,
}

impl LockedMember {
    fn describe(&self) -> String {
        format!("{} {} [{}]", self.name, self.signature, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutLock {
    pub struct_name: String,
    pub members: Vec<LockedMember>,
}

impl LayoutLock {
    /// Snapshot the member order implied by `index`.
    pub fn from_index(index: &VersionedApiIndex<'_>, struct_name: &str) -> Self {
        let members = index
            .members()
            .map(|(version, function)| LockedMember {
                version: version.to_string(),
                name: function.name.clone(),
                signature: member_signature(function),
            })
            .collect();
        Self {
            struct_name: struct_name.to_string(),
            members,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
        serde_json::from_str(&data).map_err(|err| GenerateError::parse(path, err))
    }

    /// Pretty JSON with a trailing newline, written atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut text =
            serde_json::to_string_pretty(self).map_err(|err| GenerateError::parse(path, err))?;
        text.push('\n');
        write_atomically(path, text.as_bytes())
    }

    /// Check that `current` only appends to `self`.
    pub fn verify(&self, current: &LayoutLock) -> Result<()> {
        if self.struct_name != current.struct_name {
            return Err(GenerateError::LayoutDrift {
                position: 0,
                expected: format!("struct {}", self.struct_name),
                found: format!("struct {}", current.struct_name),
            });
        }
        if current.members.len() < self.members.len() {
            // Report the first concrete difference if there is one; a pure
            // truncation has none.
            if let Some(position) = first_mismatch(&self.members, &current.members) {
                return Err(drift(position, &self.members[position], &current.members[position]));
            }
            return Err(GenerateError::LayoutTruncated {
                expected: self.members.len(),
                found: current.members.len(),
            });
        }
        if let Some(position) = first_mismatch(&self.members, &current.members) {
            return Err(drift(position, &self.members[position], &current.members[position]));
        }
        Ok(())
    }

    /// Members `current` adds beyond the locked prefix.
    pub fn appended<'a>(&self, current: &'a LayoutLock) -> &'a [LockedMember] {
        current.members.get(self.members.len()..).unwrap_or(&[])
    }
}

fn first_mismatch(locked: &[LockedMember], current: &[LockedMember]) -> Option<usize> {
    locked
        .iter()
        .zip(current)
        .position(|(expected, found)| expected != found)
}

fn drift(position: usize, expected: &LockedMember, found: &LockedMember) -> GenerateError {
    GenerateError::LayoutDrift {
        position,
        expected: expected.describe(),
        found: found.describe(),
    }
}
