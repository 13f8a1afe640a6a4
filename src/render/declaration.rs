//! Direct prototypes for the in-tree header.

use super::{GUARD_CLOSE, RenderOptions, push_type};
use crate::catalog::{FunctionDef, FunctionParam};
use crate::error::Result;

/// `EXPORT ret name(type name, ...);` with pointer-aware spacing.
pub fn render_prototype(function: &FunctionDef, options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(&options.naming.export_macro);
    out.push(' ');
    push_type(&mut out, &function.return_type);
    out.push_str(&function.name);
    out.push('(');
    out.push_str(&render_params(&function.params));
    out.push_str(");\n");
    out
}

/// Comment plus prototype, wrapped in the deprecation guard when the function
/// itself is deprecated. Group-level guards are the caller's business.
pub fn render_function(function: &FunctionDef, options: &RenderOptions) -> Result<String> {
    let comment = super::render_comment(function, options.comment_mode)?;
    let mut out = String::new();
    if function.deprecated {
        out.push_str(&options.guard_open());
    }
    out.push_str(&comment);
    out.push_str(&render_prototype(function, options));
    if function.deprecated {
        out.push_str(GUARD_CLOSE);
    }
    Ok(out)
}

/// Parameter list without parentheses, shared with the struct members.
pub(crate) fn render_params(params: &[FunctionParam]) -> String {
    params
        .iter()
        .map(|param| {
            let mut rendered = String::new();
            push_type(&mut rendered, &param.ty);
            rendered.push_str(&param.name);
            rendered
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn function(value: serde_json::Value) -> FunctionDef {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn pointer_types_hug_names() {
        let f = function(json!({
            "name": "duckdb_value_varchar",
            "return_type": "char *",
            "params": [
                {"type": "duckdb_result *", "name": "result"},
                {"type": "idx_t", "name": "col"}
            ]
        }));
        assert_eq!(
            render_prototype(&f, &RenderOptions::default()),
            "DUCKDB_API char *duckdb_value_varchar(duckdb_result *result, idx_t col);\n"
        );
    }

    #[test]
    fn zero_params_render_empty_parens() {
        let f = function(json!({"name": "duckdb_library_version", "return_type": "const char *"}));
        assert_eq!(
            render_prototype(&f, &RenderOptions::default()),
            "DUCKDB_API const char *duckdb_library_version();\n"
        );
    }

    #[test]
    fn deprecated_function_is_guarded_with_its_comment() {
        let f = function(json!({
            "name": "duckdb_free_legacy",
            "return_type": "void",
            "deprecated": true,
            "params": [{"type": "void *", "name": "ptr"}],
            "comment": {"description": "Frees a value.\n"}
        }));
        assert_eq!(
            render_function(&f, &RenderOptions::default()).unwrap(),
            "#ifndef DUCKDB_API_NO_DEPRECATED\n/*!\nFrees a value.\n*/\n\
             DUCKDB_API void duckdb_free_legacy(void *ptr);\n#endif\n"
        );
    }
}
