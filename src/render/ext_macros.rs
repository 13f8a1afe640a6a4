//! Redirection macros for the extension header.
//!
//! A bare call `f(...)` expands to `<api_pointer>->f(...)`. Guards mirror the
//! direct header exactly so a macro exists iff its declaration does.

use super::{GUARD_CLOSE, RenderOptions};
use crate::catalog::Catalog;

/// One `#define` per catalog function, grouped in load order.
pub fn render_extension_macros(catalog: &Catalog, options: &RenderOptions) -> String {
    let pointer = &options.naming.api_pointer;
    let mut out = String::new();
    for group in catalog.groups() {
        out.push_str(&format!("//! {}\n", group.group));
        if group.deprecated {
            out.push_str(&options.guard_open());
        }
        for function in &group.entries {
            if function.deprecated {
                out.push_str(&options.guard_open());
            }
            out.push_str(&format!(
                "#define {name} {pointer}->{name}\n",
                name = function.name
            ));
            if function.deprecated {
                out.push_str(GUARD_CLOSE);
            }
        }
        if group.deprecated {
            out.push_str(GUARD_CLOSE);
        }
        out.push('\n');
    }
    out
}

/// The three fixed macros that define, assign and extern-declare the
/// process-wide ABI pointer.
pub fn render_init_macros(options: &RenderOptions) -> String {
    let naming = &options.naming;
    let (prefix, ty, ptr) = (&naming.init_macro, &naming.api_struct, &naming.api_pointer);
    format!(
        "# define {prefix}1 const {ty} *{ptr}=0;\n\
         # define {prefix}2(v) {ptr}=v;\n\
         # define {prefix}3 extern const {ty} *{ptr};\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LoadedGroup;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn macros_mirror_direct_header_guards() {
        let group = serde_json::from_value(json!({
            "group": "helpers",
            "deprecated": true,
            "entries": [
                {"name": "duckdb_free", "return_type": "void"},
                {"name": "duckdb_free_legacy", "return_type": "void", "deprecated": true}
            ]
        }))
        .unwrap();
        let catalog = Catalog::from_groups(vec![LoadedGroup {
            source: PathBuf::from("helpers.json"),
            group,
        }])
        .unwrap();
        assert_eq!(
            render_extension_macros(&catalog, &RenderOptions::default()),
            "//! helpers\n\
             #ifndef DUCKDB_API_NO_DEPRECATED\n\
             #define duckdb_free duckdb_ext_api->duckdb_free\n\
             #ifndef DUCKDB_API_NO_DEPRECATED\n\
             #define duckdb_free_legacy duckdb_ext_api->duckdb_free_legacy\n\
             #endif\n\
             #endif\n\
             \n"
        );
    }

    #[test]
    fn init_macros_use_configured_names() {
        let mut options = RenderOptions::default();
        options.naming.api_pointer = "mylib_api".to_string();
        options.naming.api_struct = "mylib_api_v1".to_string();
        options.naming.init_macro = "MYLIB_INIT".to_string();
        assert_eq!(
            render_init_macros(&options),
            "# define MYLIB_INIT1 const mylib_api_v1 *mylib_api=0;\n\
             # define MYLIB_INIT2(v) mylib_api=v;\n\
             # define MYLIB_INIT3 extern const mylib_api_v1 *mylib_api;\n"
        );
    }
}
