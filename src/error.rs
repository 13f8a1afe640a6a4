//! Error taxonomy for header generation.
//!
//! Every variant except `PartialPersist` aborts the run before an output file
//! is persisted. Variants carry the file or name that caused them
//! so the CLI can print a diagnostic without extra context.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("invalid document {file}: {message}")]
    CatalogParse { file: PathBuf, message: String },

    #[error("no function group documents found under {dir}")]
    EmptyCatalog { dir: PathBuf },

    #[error("duplicate function '{name}' defined in {first} and {second}")]
    DuplicateFunction {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("duplicate group '{group}' defined in {first} and {second}")]
    DuplicateGroup {
        group: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("version {version} references unknown function '{name}'")]
    UnresolvedReference { name: String, version: String },

    #[error("version {version} references '{name}', which is already a struct member")]
    DuplicateReference { name: String, version: String },

    #[error("group order names '{group}', which is not an unconsumed loaded group")]
    UnknownGroup { group: String },

    #[error("function '{function}' has no comment for parameter '{param}'")]
    MissingParamComment { function: String, param: String },

    #[error("header template {file}: {message}")]
    TemplateMarker { file: PathBuf, message: String },

    #[error(
        "ABI layout drift at member {position}: lock has '{expected}', generator produced '{found}'"
    )]
    LayoutDrift {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("ABI layout truncated: lock has {expected} members, generator produced {found}")]
    LayoutTruncated { expected: usize, found: usize },

    #[error("formatter `{command}` failed: {message}")]
    Formatter { command: String, message: String },

    #[error("{path} is out of date; run `capigen generate`")]
    StaleArtifact { path: PathBuf },

    #[error(
        "replaced {} but not {stale}; headers are out of sync until the next generate: {source}",
        display_paths(.written)
    )]
    PartialPersist {
        written: Vec<PathBuf>,
        stale: PathBuf,
        #[source]
        source: Box<GenerateError>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(file: impl Into<PathBuf>, message: impl ToString) -> Self {
        GenerateError::CatalogParse {
            file: file.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;
