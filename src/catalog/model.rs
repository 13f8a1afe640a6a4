//! Serde mirror of the function-group documents.
//!
//! Field names follow the JSON documents one to one; optional fields default
//! so the documents only spell out what differs from the common case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One parameter of a C function. Order is part of the ABI.
pub struct FunctionParam {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Structured documentation attached to a function.
pub struct DocComment {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_comments: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single C API function. Identity is `name`.
pub struct FunctionDef {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<FunctionParam>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<DocComment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A documented group of functions, one per definition document.
pub struct FunctionGroup {
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    pub entries: Vec<FunctionDef>,
}

impl DocComment {
    /// Note for `param`, if the author wrote one.
    pub fn param_comment(&self, param: &str) -> Option<&str> {
        self.param_comments
            .as_ref()
            .and_then(|comments| comments.get(param))
            .map(String::as_str)
    }
}
