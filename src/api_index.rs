//! Versioned API index: the append-only list of published struct members.
//!
//! Each version entry is an ordered batch of function names. Resolution swaps
//! names for catalog definitions but never reorders them; the order written
//! in the document is the binary layout of the ABI struct.

use crate::catalog::{Catalog, FunctionDef};
use crate::error::{GenerateError, Result};
use crate::schema_loader::{DocumentKind, DocumentSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Version tags are written either as strings (`"v0.0.1"`) or integers.
pub enum VersionTag {
    Number(i64),
    Text(String),
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionTag::Number(n) => write!(f, "{n}"),
            VersionTag::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: VersionTag,
    pub entries: Vec<FunctionRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The raw index document.
pub struct ApiIndexDocument {
    pub version_entries: Vec<VersionEntry>,
}

impl ApiIndexDocument {
    /// Read and validate the index document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let schema = DocumentSchema::compile(DocumentKind::ApiIndex)
            .map_err(|message| GenerateError::parse(path, message))?;
        let data = fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
        let value: Value =
            serde_json::from_str(&data).map_err(|err| GenerateError::parse(path, err))?;
        schema
            .validate(&value)
            .map_err(|message| GenerateError::parse(path, message))?;
        serde_json::from_value(value).map_err(|err| GenerateError::parse(path, err))
    }
}

#[derive(Debug, Clone)]
/// A version entry with its names resolved against the catalog.
pub struct ResolvedVersion<'a> {
    pub version: VersionTag,
    pub functions: Vec<&'a FunctionDef>,
}

#[derive(Debug, Clone)]
/// The resolved index, borrowing definitions from a frozen catalog.
pub struct VersionedApiIndex<'a> {
    versions: Vec<ResolvedVersion<'a>>,
}

impl<'a> VersionedApiIndex<'a> {
    /// Resolve every reference in `document`.
    ///
    /// Fails on the first unknown name, and on any name that is already a
    /// member (C would reject a struct with two fields of one name).
    pub fn resolve(document: &ApiIndexDocument, catalog: &'a Catalog) -> Result<Self> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut versions = Vec::with_capacity(document.version_entries.len());

        for entry in &document.version_entries {
            let mut functions = Vec::with_capacity(entry.entries.len());
            for reference in &entry.entries {
                let function = catalog.function(&reference.name).ok_or_else(|| {
                    GenerateError::UnresolvedReference {
                        name: reference.name.clone(),
                        version: entry.version.to_string(),
                    }
                })?;
                if !seen.insert(function.name.as_str()) {
                    return Err(GenerateError::DuplicateReference {
                        name: reference.name.clone(),
                        version: entry.version.to_string(),
                    });
                }
                functions.push(function);
            }
            versions.push(ResolvedVersion {
                version: entry.version.clone(),
                functions,
            });
        }

        Ok(Self { versions })
    }

    /// Version entries in ascending (document) order.
    pub fn versions(&self) -> &[ResolvedVersion<'a>] {
        &self.versions
    }

    /// The most recently appended version entry.
    pub fn latest(&self) -> Option<&ResolvedVersion<'a>> {
        self.versions.last()
    }

    /// The struct layout as of `last`: members of every entry up to and
    /// including it. `None` if `last` does not belong to this index.
    pub fn layout_through(&self, last: &ResolvedVersion<'a>) -> Option<Vec<&'a FunctionDef>> {
        let mut layout = Vec::new();
        for version in &self.versions {
            layout.extend(version.functions.iter().copied());
            if std::ptr::eq(version, last) {
                return Some(layout);
            }
        }
        None
    }

    /// Every struct member in layout order, tagged with its version.
    pub fn members(&self) -> impl Iterator<Item = (&VersionTag, &'a FunctionDef)> + '_ {
        self.versions.iter().flat_map(|version| {
            version
                .functions
                .iter()
                .map(move |function| (&version.version, *function))
        })
    }

    pub fn member_count(&self) -> usize {
        self.versions.iter().map(|v| v.functions.len()).sum()
    }

    pub fn is_published(&self, name: &str) -> bool {
        self.members().any(|(_, function)| function.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FunctionGroup, LoadedGroup};
    use serde_json::json;
    use std::path::PathBuf;

    fn catalog() -> Catalog {
        let group: FunctionGroup = serde_json::from_value(json!({
            "group": "open_connect",
            "entries": [
                {"name": "duckdb_open", "return_type": "duckdb_state"},
                {"name": "duckdb_close", "return_type": "void"},
                {"name": "duckdb_connect", "return_type": "duckdb_state"}
            ]
        }))
        .unwrap();
        Catalog::from_groups(vec![LoadedGroup {
            source: PathBuf::from("open_connect.json"),
            group,
        }])
        .unwrap()
    }

    fn document(value: serde_json::Value) -> ApiIndexDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn negative_integer_tag_loads() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("api_v0.json");
        fs::write(
            &path,
            r#"{"version_entries": [{"version": -1, "entries": [{"name": "duckdb_open"}]}]}"#,
        )
        .unwrap();
        let doc = ApiIndexDocument::load(&path).unwrap();
        assert_eq!(doc.version_entries[0].version, VersionTag::Number(-1));

        let catalog = catalog();
        let index = VersionedApiIndex::resolve(&doc, &catalog).unwrap();
        assert_eq!(index.latest().unwrap().version.to_string(), "-1");
    }

    #[test]
    fn keeps_author_order_within_and_across_versions() {
        let catalog = catalog();
        let doc = document(json!({"version_entries": [
            {"version": "v0.0.1", "entries": [{"name": "duckdb_open"}, {"name": "duckdb_close"}]},
            {"version": "v0.0.2", "entries": [{"name": "duckdb_connect"}]}
        ]}));
        let index = VersionedApiIndex::resolve(&doc, &catalog).unwrap();
        let names: Vec<_> = index.members().map(|(_, f)| f.name.as_str()).collect();
        assert_eq!(names, vec!["duckdb_open", "duckdb_close", "duckdb_connect"]);
        assert_eq!(index.latest().unwrap().version.to_string(), "v0.0.2");
        assert_eq!(index.member_count(), 3);
    }

    #[test]
    fn layout_through_accumulates_earlier_versions() {
        let catalog = catalog();
        let doc = document(json!({"version_entries": [
            {"version": "v0.0.1", "entries": [{"name": "duckdb_open"}]},
            {"version": "v0.0.2", "entries": [{"name": "duckdb_close"}]},
            {"version": "v0.0.2", "entries": [{"name": "duckdb_connect"}]}
        ]}));
        let index = VersionedApiIndex::resolve(&doc, &catalog).unwrap();

        let first = &index.versions()[0];
        let names: Vec<_> = index
            .layout_through(first)
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["duckdb_open"]);

        let latest = index.latest().unwrap();
        assert_eq!(index.layout_through(latest).unwrap().len(), 3);

        let other = index.versions()[1].clone();
        assert!(index.layout_through(&other).is_none());
    }

    #[test]
    fn unresolved_reference_names_version() {
        let catalog = catalog();
        let doc = document(json!({"version_entries": [
            {"version": 3, "entries": [{"name": "duckdb_query"}]}
        ]}));
        match VersionedApiIndex::resolve(&doc, &catalog).unwrap_err() {
            GenerateError::UnresolvedReference { name, version } => {
                assert_eq!(name, "duckdb_query");
                assert_eq!(version, "3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_reference_is_rejected() {
        let catalog = catalog();
        let doc = document(json!({"version_entries": [
            {"version": "v1", "entries": [{"name": "duckdb_open"}]},
            {"version": "v2", "entries": [{"name": "duckdb_open"}]}
        ]}));
        assert!(matches!(
            VersionedApiIndex::resolve(&doc, &catalog),
            Err(GenerateError::DuplicateReference { .. })
        ));
    }
}
