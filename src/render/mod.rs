//! Text renderers for the generated headers.
//!
//! Renderers are pure functions of a frozen catalog (and index) plus
//! `RenderOptions`; they never touch disk. Output is deterministic byte for
//! byte, which is what lets reviewers diff ABI drift between runs.

pub mod abi_struct;
pub mod comment;
pub mod declaration;
pub mod ext_macros;
pub mod group_header;

pub use abi_struct::{member_signature, render_abi_struct, render_struct_member};
pub use comment::render_comment;
pub use declaration::{render_function, render_prototype};
pub use ext_macros::{render_extension_macros, render_init_macros};
pub use group_header::{OrderReport, render_group_header};

use crate::config::{CommentMode, Config, Naming};

#[derive(Clone, Debug, Default)]
/// Everything a renderer needs besides the catalog itself.
pub struct RenderOptions {
    pub naming: Naming,
    pub comment_mode: CommentMode,
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            naming: config.naming.clone(),
            comment_mode: config.comments.mode,
        }
    }

    pub fn with_comment_mode(mut self, mode: CommentMode) -> Self {
        self.comment_mode = mode;
        self
    }

    pub(crate) fn guard_open(&self) -> String {
        format!("#ifndef {}\n", self.naming.deprecation_guard)
    }
}

pub(crate) const GUARD_CLOSE: &str = "#endif\n";

/// Append `token` then a space, unless it ends in a pointer sigil.
pub(crate) fn push_type(out: &mut String, token: &str) {
    out.push_str(token);
    if !token.ends_with('*') {
        out.push(' ');
    }
}

/// `"open_connect"` → `"Open Connect"`.
pub fn title_case(id: &str) -> String {
    id.to_lowercase()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
