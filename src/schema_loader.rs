//! Bundled JSON Schema contracts for the input documents.
//!
//! Both schemas ship inside the binary so a checkout without the `schema/`
//! directory still validates. Compiled once per load pass and shared across
//! every document of that kind.

use jsonschema::JSONSchema;
use serde_json::Value;

const FUNCTION_GROUP_SCHEMA: &str = include_str!("../schema/function_group.schema.json");
const API_INDEX_SCHEMA: &str = include_str!("../schema/api_index.schema.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DocumentKind {
    FunctionGroup,
    ApiIndex,
}

impl DocumentKind {
    fn source(self) -> &'static str {
        match self {
            DocumentKind::FunctionGroup => FUNCTION_GROUP_SCHEMA,
            DocumentKind::ApiIndex => API_INDEX_SCHEMA,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DocumentKind::FunctionGroup => "function group",
            DocumentKind::ApiIndex => "api index",
        }
    }
}

/// A compiled contract for one kind of input document.
pub(crate) struct DocumentSchema {
    kind: DocumentKind,
    compiled: JSONSchema,
}

impl DocumentSchema {
    /// Compile the bundled schema for `kind`.
    ///
    /// Errors here mean the bundled schema itself is broken; they are
    /// returned as plain messages because the compile error borrows the
    /// schema value.
    pub(crate) fn compile(kind: DocumentKind) -> Result<Self, String> {
        let raw: Value = serde_json::from_str(kind.source())
            .map_err(|err| format!("bundled {} schema is not JSON: {err}", kind.label()))?;
        let compiled = JSONSchema::compile(&raw)
            .map_err(|err| format!("bundled {} schema does not compile: {err}", kind.label()))?;
        Ok(Self { kind, compiled })
    }

    /// Validate a parsed document, joining every violation into one message.
    pub(crate) fn validate(&self, document: &Value) -> Result<(), String> {
        if let Err(errors) = self.compiled.validate(document) {
            let details = errors
                .map(|err| {
                    let path = err.instance_path.to_string();
                    if path.is_empty() {
                        err.to_string()
                    } else {
                        format!("{path}: {err}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            return Err(format!(
                "{} failed schema validation:\n{}",
                self.kind.label(),
                details
            ));
        }
        Ok(())
    }
}
