//! Project configuration (`capigen.json`).
//!
//! Every field has a default matching the DuckDB source layout, so a project
//! only writes down what differs. Relative paths resolve against the project
//! root, which is the directory holding the config file unless overridden.

use crate::error::{GenerateError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "capigen.json";
pub const ENV_CONFIG: &str = "CAPIGEN_CONFIG";
pub const ENV_ROOT: &str = "CAPIGEN_ROOT";

const DEFAULT_GROUP_ORDER: &[&str] = &[
    "open_connect",
    "configuration",
    "query_execution",
    "result_functions",
    "safe_fetch_functions",
    "helpers",
    "date_time_timestamp_helpers",
    "hugeint_helpers",
    "unsigned_hugeint_helpers",
    "decimal_helpers",
    "prepared_statements",
    "bind_values_to_prepared_statements",
    "execute_prepared_statements",
    "extract_statements",
    "pending_result_interface",
    "value_interface",
    "logical_type_interface",
    "data_chunk_interface",
    "vector_interface",
    "validity_mask_functions",
    "scalar_functions",
    "table_functions",
    "table_function_bind",
    "table_function_init",
    "table_function",
    "replacement_scans",
    "appender",
    "arrow_interface",
    "threading_information",
    "streaming_result_interface",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// How the comment renderer treats parameters without a note.
pub enum CommentMode {
    #[default]
    Permissive,
    Strict,
}

impl CommentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentMode::Permissive => "permissive",
            CommentMode::Strict => "strict",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentSettings {
    #[serde(default)]
    pub mode: CommentMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Identifiers baked into the generated C text.
pub struct Naming {
    /// Title shown in the file banner of both headers.
    pub project_title: String,
    /// Export macro in front of every direct declaration.
    pub export_macro: String,
    /// Macro that, when defined, hides deprecated declarations.
    pub deprecation_guard: String,
    /// Process-wide pointer to the ABI struct used by the redirection macros.
    pub api_pointer: String,
    pub api_struct: String,
    /// Name of the inline function building the latest struct literal.
    pub constructor: String,
    /// Prefix of the three init macros (`<prefix>1`, `<prefix>2(v)`, `<prefix>3`).
    pub init_macro: String,
    pub start_marker: String,
    pub functions_marker: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            project_title: "DuckDB".to_string(),
            export_macro: "DUCKDB_API".to_string(),
            deprecation_guard: "DUCKDB_API_NO_DEPRECATED".to_string(),
            api_pointer: "duckdb_ext_api".to_string(),
            api_struct: "duckdb_ext_api_v0".to_string(),
            constructor: "CreateApi".to_string(),
            init_macro: "DUCKDB_EXTENSION_INIT".to_string(),
            start_marker: "// DUCKDB_START_OF_HEADER\n".to_string(),
            functions_marker: "// DUCKDB_FUNCTIONS_ARE_GENERATED_HERE\n".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub functions_dir: PathBuf,
    pub api_index: PathBuf,
    pub header_template: PathBuf,
    pub direct_header: PathBuf,
    pub extension_header: PathBuf,
    /// Persisted ABI member order; verification is skipped when unset.
    pub layout_lock: Option<PathBuf>,
    /// Canonical order of groups in the direct header.
    pub group_order: Vec<String>,
    pub comments: CommentSettings,
    pub naming: Naming,
    /// External formatter argv; the staged header path is appended.
    pub formatter: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        let generation = PathBuf::from("src/include/duckdb/main/capi/header_generation");
        Self {
            functions_dir: generation.join("functions"),
            api_index: generation.join("apis/extension_api_v0.json"),
            header_template: generation.join("header_base.hpp"),
            direct_header: PathBuf::from("src/include/duckdb.h"),
            extension_header: PathBuf::from("src/include/duckdb_extension.h"),
            layout_lock: None,
            group_order: DEFAULT_GROUP_ORDER.iter().map(|s| s.to_string()).collect(),
            comments: CommentSettings::default(),
            naming: Naming::default(),
            formatter: None,
        }
    }
}

impl Config {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
        let config: Config = serde_json::from_str(&data).map_err(|err| GenerateError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: &str| GenerateError::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.naming.functions_marker.is_empty() {
            return Err(invalid("naming.functions_marker must not be empty"));
        }
        if self.naming.start_marker.is_empty() {
            return Err(invalid("naming.start_marker must not be empty"));
        }
        if self.naming.api_pointer.trim().is_empty() || self.naming.api_struct.trim().is_empty() {
            return Err(invalid("naming.api_pointer and naming.api_struct must not be empty"));
        }
        if let Some(formatter) = &self.formatter {
            if formatter.is_empty() {
                return Err(invalid("formatter must name a program"));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
/// A config together with the root its relative paths resolve against.
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    /// Locate and load the project configuration.
    ///
    /// Search order: explicit path, `CAPIGEN_CONFIG`, then `capigen.json` in
    /// the start directory or any ancestor. Without a config the defaults
    /// apply, rooted at `start`. An explicit `root` (or `CAPIGEN_ROOT`) wins
    /// over the config file's directory.
    pub fn discover(explicit: Option<&Path>, root: Option<&Path>, start: &Path) -> Result<Self> {
        let env_config = env::var_os(ENV_CONFIG)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let config_path = explicit
            .map(Path::to_path_buf)
            .or(env_config)
            .or_else(|| search_upwards(start));

        let (config, config_dir) = match config_path {
            Some(path) => {
                let config = Config::load(&path)?;
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| start.to_path_buf());
                (config, dir)
            }
            None => (Config::default(), start.to_path_buf()),
        };

        let env_root = env::var_os(ENV_ROOT)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let root = root.map(Path::to_path_buf).or(env_root).unwrap_or(config_dir);
        Ok(Self { root, config })
    }

    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Resolve a config path relative to the project root when needed.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn functions_dir(&self) -> PathBuf {
        self.resolve(&self.config.functions_dir)
    }

    pub fn api_index(&self) -> PathBuf {
        self.resolve(&self.config.api_index)
    }

    pub fn header_template(&self) -> PathBuf {
        self.resolve(&self.config.header_template)
    }

    pub fn direct_header(&self) -> PathBuf {
        self.resolve(&self.config.direct_header)
    }

    pub fn extension_header(&self) -> PathBuf {
        self.resolve(&self.config.extension_header)
    }

    pub fn layout_lock(&self) -> Option<PathBuf> {
        self.config.layout_lock.as_deref().map(|p| self.resolve(p))
    }
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
