//! The shared boilerplate skeleton both headers are poured into.

use crate::config::Naming;
use crate::error::{GenerateError, Result};
use std::fs;
use std::path::Path;

const BANNER_RULE: &str =
    "//===----------------------------------------------------------------------===//\n";

#[derive(Debug, Clone)]
/// Skeleton text after the start marker, holding exactly one function marker.
pub struct HeaderTemplate {
    body: String,
    functions_marker: String,
    project_title: String,
}

impl HeaderTemplate {
    pub fn load(path: &Path, naming: &Naming) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
        Self::parse(path, &raw, naming)
    }

    /// Trim everything up to and including the start marker and check the
    /// function marker appears exactly once in what is left.
    pub fn parse(source: &Path, raw: &str, naming: &Naming) -> Result<Self> {
        let marker_error = |message: String| GenerateError::TemplateMarker {
            file: source.to_path_buf(),
            message,
        };

        let start = raw.find(&naming.start_marker).ok_or_else(|| {
            marker_error(format!(
                "missing start marker {:?}",
                naming.start_marker.trim_end()
            ))
        })?;
        let body = &raw[start + naming.start_marker.len()..];

        match body.matches(&naming.functions_marker).count() {
            1 => {}
            0 => {
                return Err(marker_error(format!(
                    "missing function marker {:?}",
                    naming.functions_marker.trim_end()
                )));
            }
            n => {
                return Err(marker_error(format!(
                    "function marker {:?} appears {n} times",
                    naming.functions_marker.trim_end()
                )));
            }
        }

        Ok(Self {
            body: body.to_string(),
            functions_marker: naming.functions_marker.clone(),
            project_title: naming.project_title.clone(),
        })
    }

    /// File banner + skeleton with `declarations` in place of the marker.
    pub fn render(&self, file_name: &str, declarations: &str) -> String {
        let mut out = file_banner(&self.project_title, file_name);
        out.push_str(&self.body.replacen(&self.functions_marker, declarations, 1));
        out
    }
}

fn file_banner(title: &str, file_name: &str) -> String {
    let mut out = String::from(BANNER_RULE);
    out.push_str("//\n");
    out.push_str(&format!("//                         {title}\n"));
    out.push_str("//\n");
    out.push_str(&format!("// {file_name}\n"));
    out.push_str("//\n");
    out.push_str("//\n");
    out.push_str(BANNER_RULE);
    out
}
