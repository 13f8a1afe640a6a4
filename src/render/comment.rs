//! Doc comment blocks for direct declarations.

use crate::catalog::FunctionDef;
use crate::config::CommentMode;
use crate::error::{GenerateError, Result};
use tracing::warn;

/// Render the `/*! ... */` block for `function`, or nothing without a comment.
///
/// Parameters are visited in declared order. A missing note is skipped in
/// permissive mode and fatal in strict mode; on failure nothing is returned,
/// so a half-built block never reaches the header.
pub fn render_comment(function: &FunctionDef, mode: CommentMode) -> Result<String> {
    let Some(comment) = &function.comment else {
        return Ok(String::new());
    };

    let mut out = String::from("/*!\n");
    out.push_str(&comment.description);
    if !comment.description.is_empty() && !comment.description.ends_with('\n') {
        out.push('\n');
    }

    for param in &function.params {
        match comment.param_comment(&param.name) {
            Some(text) => {
                out.push_str(&format!("* {}: {}\n", param.name, text));
            }
            None if mode == CommentMode::Strict => {
                return Err(GenerateError::MissingParamComment {
                    function: function.name.clone(),
                    param: param.name.clone(),
                });
            }
            None => {
                warn!(
                    function = %function.name,
                    param = %param.name,
                    "parameter has no doc note; omitted from comment"
                );
            }
        }
    }

    if let Some(returns) = &comment.return_value {
        out.push_str(&format!("* returns: {returns}\n"));
    }
    out.push_str("*/\n");
    Ok(out)
}
