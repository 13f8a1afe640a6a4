//! Per-group declarations for the direct header, in canonical order.
//!
//! The canonical order list is a human-maintained review aid: it keeps the
//! generated diff readable when groups are added in any order. An id that
//! names no loaded group is fatal; a list that is merely incomplete is
//! reported and the leftover groups are appended in load order.

use super::{GUARD_CLOSE, RenderOptions, render_function, title_case};
use crate::catalog::{Catalog, FunctionGroup};
use crate::error::{GenerateError, Result};
use tracing::warn;

const BANNER_RULE: &str =
    "//===--------------------------------------------------------------------===//\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Soft findings from matching the canonical order against loaded groups.
pub struct OrderReport {
    pub listed: usize,
    pub loaded: usize,
    /// Loaded groups the order list does not mention, in load order.
    pub unlisted: Vec<String>,
}

impl OrderReport {
    pub fn is_clean(&self) -> bool {
        self.listed == self.loaded && self.unlisted.is_empty()
    }
}

/// Render every group's banner, description, guards and declarations.
pub fn render_group_header(
    catalog: &Catalog,
    order: &[String],
    options: &RenderOptions,
) -> Result<(String, OrderReport)> {
    let mut remaining: Vec<&FunctionGroup> = catalog.groups().collect();
    let report_loaded = remaining.len();

    let mut out = String::new();
    for id in order {
        let position = remaining
            .iter()
            .position(|group| group.group == *id)
            .ok_or_else(|| GenerateError::UnknownGroup { group: id.clone() })?;
        let group = remaining.remove(position);
        render_group(&mut out, group, options)?;
    }

    let report = OrderReport {
        listed: order.len(),
        loaded: report_loaded,
        unlisted: remaining.iter().map(|g| g.group.clone()).collect(),
    };
    if report.listed != report.loaded {
        warn!(
            listed = report.listed,
            loaded = report.loaded,
            "group order list does not match the loaded groups"
        );
    }
    for group in remaining {
        warn!(group = %group.group, "group missing from group_order; appending");
        render_group(&mut out, group, options)?;
    }

    Ok((out, report))
}

fn render_group(out: &mut String, group: &FunctionGroup, options: &RenderOptions) -> Result<()> {
    out.push_str(BANNER_RULE);
    out.push_str(&format!("// {}\n", title_case(&group.group)));
    out.push_str(BANNER_RULE);
    out.push('\n');

    if let Some(description) = &group.description {
        out.push_str(description);
        out.push('\n');
    }
    if group.deprecated {
        out.push_str(&options.guard_open());
    }
    for function in &group.entries {
        out.push_str(&render_function(function, options)?);
        out.push('\n');
    }
    if group.deprecated {
        out.push_str(GUARD_CLOSE);
    }
    Ok(())
}
