//! The versioned ABI struct and its constructor literal.
//!
//! Member order is the binary layout. It is exactly the reference order of
//! the version entries, accumulated front to back; nothing here sorts,
//! dedups, or drops a member.

use super::RenderOptions;
use super::declaration::render_params;
use crate::api_index::VersionedApiIndex;
use crate::catalog::FunctionDef;

/// One function-pointer field: `    ret (*name)(type name, ...);`.
pub fn render_struct_member(function: &FunctionDef) -> String {
    format!(
        "    {} (*{})({});\n",
        function.return_type,
        function.name,
        render_params(&function.params)
    )
}

/// The member's C type with parameter names erased, e.g.
/// `duckdb_state (*)(const char *, duckdb_database *)`.
///
/// Parameter names do not affect layout; this is what the layout lock pins.
pub fn member_signature(function: &FunctionDef) -> String {
    let params = function
        .params
        .iter()
        .map(|param| param.ty.trim())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} (*)({})", function.return_type.trim(), params)
}

/// Render the `typedef struct { ... } <api_struct>;` block.
///
/// With `with_constructor`, also emits an inline function returning a struct
/// literal of the latest layout, one positional value per member.
pub fn render_abi_struct(
    index: &VersionedApiIndex<'_>,
    options: &RenderOptions,
    with_constructor: bool,
) -> String {
    let struct_name = &options.naming.api_struct;
    let mut out = String::from("typedef struct {\n");
    for version in index.versions() {
        out.push_str(&format!("    // Version {}\n", version.version));
        for function in &version.functions {
            out.push_str(&render_struct_member(function));
        }
    }
    out.push_str(&format!("}} {struct_name};\n\n"));

    if with_constructor {
        out.push_str(&render_constructor(index, options));
    }
    out
}

fn render_constructor(index: &VersionedApiIndex<'_>, options: &RenderOptions) -> String {
    let layout = index
        .latest()
        .and_then(|latest| index.layout_through(latest))
        .unwrap_or_default();
    let members = layout
        .iter()
        .map(|function| format!("        {}", function.name))
        .collect::<Vec<_>>();

    let mut out = format!(
        "inline {} {}() {{\n",
        options.naming.api_struct, options.naming.constructor
    );
    out.push_str("    return {\n");
    if !members.is_empty() {
        out.push_str(&members.join(",\n"));
        out.push('\n');
    }
    out.push_str("    };\n");
    out.push_str("}\n\n");
    out
}
