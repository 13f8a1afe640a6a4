#![allow(dead_code)]

// Fixture projects for the integration tests: a temp directory holding a
// config, a header skeleton, function-group documents and an API index.

use anyhow::{Context, Result};
use capigen::{Config, Project};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SKELETON: &str = "// Hand-maintained skeleton; everything above the start marker is dropped.\n\
// DUCKDB_START_OF_HEADER\n\
#pragma once\n\
\n\
#ifdef __cplusplus\n\
extern \"C\" {\n\
#endif\n\
\n\
// DUCKDB_FUNCTIONS_ARE_GENERATED_HERE\n\
\n\
#ifdef __cplusplus\n\
}\n\
#endif\n";

pub const DIRECT_HEADER: &str = "include/duckdb.h";
pub const EXTENSION_HEADER: &str = "include/duckdb_extension.h";
pub const LAYOUT_LOCK: &str = "api/abi.lock.json";

pub struct FixtureProject {
    dir: TempDir,
}

impl FixtureProject {
    /// Skeleton and config only; callers add groups and the index.
    pub fn new(group_order: &[&str]) -> Result<Self> {
        let dir = TempDir::new().context("allocating fixture project")?;
        let fixture = Self { dir };
        fs::create_dir_all(fixture.root().join("api/functions"))?;
        fs::create_dir_all(fixture.root().join("api/apis"))?;
        fs::write(fixture.root().join("api/header_base.hpp"), SKELETON)?;
        fixture.write_config(json!({
            "functions_dir": "api/functions",
            "api_index": "api/apis/api_v0.json",
            "header_template": "api/header_base.hpp",
            "direct_header": DIRECT_HEADER,
            "extension_header": EXTENSION_HEADER,
            "group_order": group_order,
        }))?;
        Ok(fixture)
    }

    /// The two-group scenario: `open_connect` with `duckdb_open`, and
    /// `helpers` with the deprecated `duckdb_free_legacy`; only
    /// `duckdb_open` is published.
    pub fn scenario() -> Result<Self> {
        let fixture = Self::new(&["open_connect", "helpers"])?;
        fixture.write_group(
            "open_connect.json",
            json!({
                "group": "open_connect",
                "entries": [{
                    "name": "duckdb_open",
                    "return_type": "duckdb_state",
                    "params": [{"type": "path_type", "name": "path"}]
                }]
            }),
        )?;
        fixture.write_group(
            "helpers.json",
            json!({
                "group": "helpers",
                "entries": [{
                    "name": "duckdb_free_legacy",
                    "return_type": "void",
                    "deprecated": true,
                    "params": [{"type": "void *", "name": "ptr"}]
                }]
            }),
        )?;
        fixture.write_index(json!({"version_entries": [
            {"version": "v0.0.1", "entries": [{"name": "duckdb_open"}]}
        ]}))?;
        Ok(fixture)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("capigen.json")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write_config(&self, config: Value) -> Result<()> {
        write_json(&self.config_path(), &config)
    }

    /// Merge `patch` into the top level of the current config.
    pub fn patch_config(&self, patch: Value) -> Result<()> {
        let mut config: Value = serde_json::from_str(&fs::read_to_string(self.config_path())?)?;
        if let (Some(target), Some(fields)) = (config.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        self.write_config(config)
    }

    pub fn write_group(&self, relative: &str, group: Value) -> Result<()> {
        write_json(&self.root().join("api/functions").join(relative), &group)
    }

    pub fn write_raw_group(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.root().join("api/functions").join(relative);
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))
    }

    pub fn write_index(&self, index: Value) -> Result<()> {
        write_json(&self.root().join("api/apis/api_v0.json"), &index)
    }

    /// Load the project without consulting process env overrides.
    pub fn project(&self) -> Result<Project> {
        let config = Config::load(&self.config_path())?;
        Ok(Project::new(self.root(), config))
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path(relative);
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
