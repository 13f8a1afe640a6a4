//! Frozen name→definition view over every function-group document.
//!
//! Loading is two-phase: every document under the functions directory is
//! parsed and validated first, then the lookup table is built and frozen.
//! Renderers only ever see `&Catalog`. The loader is strict about duplicate
//! function names and duplicate group ids so two documents can never fight
//! over one symbol.

use crate::catalog::{FunctionDef, FunctionGroup};
use crate::error::{GenerateError, Result};
use crate::schema_loader::{DocumentKind, DocumentSchema};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
/// A function group plus the document it was loaded from.
pub struct LoadedGroup {
    pub source: PathBuf,
    pub group: FunctionGroup,
}

#[derive(Debug)]
/// Every loaded group in load order plus the global function table.
pub struct Catalog {
    groups: Vec<LoadedGroup>,
    by_name: BTreeMap<String, (usize, usize)>,
}

impl Catalog {
    /// Load every `**/*.json` document under `dir`, in path order.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let files = discover_documents(dir)?;
        if files.is_empty() {
            return Err(GenerateError::EmptyCatalog {
                dir: dir.to_path_buf(),
            });
        }

        let schema = DocumentSchema::compile(DocumentKind::FunctionGroup)
            .map_err(|message| GenerateError::parse(dir, message))?;

        let mut groups = Vec::with_capacity(files.len());
        for file in files {
            let group = load_group(&file, &schema)?;
            debug!(
                file = %file.display(),
                group = %group.group,
                functions = group.entries.len(),
                "loaded function group"
            );
            groups.push(LoadedGroup {
                source: file,
                group,
            });
        }
        Self::from_groups(groups)
    }

    /// Build the lookup table from already parsed groups.
    ///
    /// Groups keep the order they are given in; that order is what the
    /// extension macros follow.
    pub fn from_groups(groups: Vec<LoadedGroup>) -> Result<Self> {
        let mut group_ids: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_name: BTreeMap<String, (usize, usize)> = BTreeMap::new();

        for (group_idx, loaded) in groups.iter().enumerate() {
            if let Some(&first) = group_ids.get(loaded.group.group.as_str()) {
                return Err(GenerateError::DuplicateGroup {
                    group: loaded.group.group.clone(),
                    first: groups[first].source.clone(),
                    second: loaded.source.clone(),
                });
            }
            group_ids.insert(loaded.group.group.as_str(), group_idx);

            for (entry_idx, function) in loaded.group.entries.iter().enumerate() {
                if let Some(&(first_group, _)) = by_name.get(&function.name) {
                    return Err(GenerateError::DuplicateFunction {
                        name: function.name.clone(),
                        first: groups[first_group].source.clone(),
                        second: loaded.source.clone(),
                    });
                }
                by_name.insert(function.name.clone(), (group_idx, entry_idx));
            }
        }

        Ok(Self { groups, by_name })
    }

    /// Resolve a function by name.
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.by_name
            .get(name)
            .map(|&(group, entry)| &self.groups[group].group.entries[entry])
    }

    /// Groups in load order.
    pub fn groups(&self) -> impl Iterator<Item = &FunctionGroup> {
        self.groups.iter().map(|loaded| &loaded.group)
    }

    pub fn loaded_groups(&self) -> &[LoadedGroup] {
        &self.groups
    }

    /// Function names in stable (lexicographic) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(GenerateError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "functions directory not found"),
        ));
    }
    let pattern = dir.join("**").join("*.json");
    let pattern = pattern.to_str().ok_or_else(|| {
        GenerateError::parse(dir, "functions directory path is not valid UTF-8")
    })?;

    let mut files = Vec::new();
    let entries =
        glob::glob(pattern).map_err(|err| GenerateError::parse(dir, format!("bad pattern: {err}")))?;
    for entry in entries {
        let path = entry.map_err(|err| {
            let path = err.path().to_path_buf();
            GenerateError::io(path, err.into_error())
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    // glob yields in directory-listing order on some platforms; sort so the
    // load order never depends on the filesystem.
    files.sort();
    Ok(files)
}

fn load_group(file: &Path, schema: &DocumentSchema) -> Result<FunctionGroup> {
    let data = fs::read_to_string(file).map_err(|err| GenerateError::io(file, err))?;
    let value: Value =
        serde_json::from_str(&data).map_err(|err| GenerateError::parse(file, err))?;
    schema
        .validate(&value)
        .map_err(|message| GenerateError::parse(file, message))?;
    serde_json::from_value(value).map_err(|err| GenerateError::parse(file, err))
}
