//! Declarative C API header compiler.
//!
//! Reads a catalog of function-group documents plus the append-only versioned
//! API index and emits two headers: a direct header declaring every function,
//! and an extension header exposing the same functions through a versioned
//! struct of function pointers and redirection macros.
//!
//! The pipeline is load → freeze → render → stage → persist. Every fatal
//! error except a failed rename surfaces before the persist step. Each rename
//! is atomic on its own, but the pair is not: if the second rename fails the
//! run returns `PartialPersist` naming the header left stale.

pub mod api_index;
pub mod catalog;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod output;
pub mod render;
mod schema_loader;
pub mod template;

pub use api_index::{ApiIndexDocument, VersionEntry, VersionTag, VersionedApiIndex};
pub use catalog::{Catalog, DocComment, FunctionDef, FunctionGroup, FunctionParam, LoadedGroup};
pub use config::{CommentMode, Config, Naming, Project};
pub use error::{GenerateError, Result};
pub use layout::{LayoutLock, LockedMember};
pub use render::{OrderReport, RenderOptions};
pub use template::HeaderTemplate;

use output::StagedArtifact;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
/// Both rendered headers plus the facts a caller may want to check.
pub struct GeneratedHeaders {
    pub direct: String,
    pub extension: String,
    pub layout: LayoutLock,
    pub order: OrderReport,
}

/// Render both headers from frozen inputs. Pure; touches no files.
pub fn render_headers(
    catalog: &Catalog,
    index: &VersionedApiIndex<'_>,
    template: &HeaderTemplate,
    group_order: &[String],
    options: &RenderOptions,
    file_names: (&str, &str),
) -> Result<GeneratedHeaders> {
    let (groups, order) = render::render_group_header(catalog, group_order, options)?;
    let mut direct_body = groups;
    direct_body.push_str("\n\n");
    direct_body.push_str(&render::render_abi_struct(index, options, true));

    let mut extension_body = render::render_abi_struct(index, options, false);
    extension_body.push_str("\n\n");
    extension_body.push_str(&render::render_extension_macros(catalog, options));
    extension_body.push_str(&render::render_init_macros(options));

    Ok(GeneratedHeaders {
        direct: template.render(file_names.0, &direct_body),
        extension: template.render(file_names.1, &extension_body),
        layout: LayoutLock::from_index(index, &options.naming.api_struct),
        order,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Persist both headers.
    Write,
    /// Compare against the headers on disk; write nothing.
    Check,
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Overrides `comments.mode` from the config.
    pub comment_mode: Option<CommentMode>,
    /// Rewrite the layout lock after a successful write.
    pub update_lock: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: RunMode::Write,
            comment_mode: None,
            update_lock: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Headers persisted (write mode).
    pub written: Vec<PathBuf>,
    /// Members added beyond the layout lock, when one was checked.
    pub appended_members: usize,
    pub order: OrderReport,
}

/// Run the full pipeline for a project.
pub fn run(project: &Project, options: &RunOptions) -> Result<RunOutcome> {
    let config = &project.config;
    let mut render_options = RenderOptions::from_config(config);
    if let Some(mode) = options.comment_mode {
        render_options = render_options.with_comment_mode(mode);
    }

    let catalog = Catalog::load_dir(&project.functions_dir())?;
    let document = ApiIndexDocument::load(&project.api_index())?;
    let index = VersionedApiIndex::resolve(&document, &catalog)?;
    let template = HeaderTemplate::load(&project.header_template(), &config.naming)?;
    info!(
        functions = catalog.len(),
        groups = catalog.loaded_groups().len(),
        members = index.member_count(),
        comment_mode = render_options.comment_mode.as_str(),
        "catalog loaded"
    );
    let unpublished = catalog.names().filter(|name| !index.is_published(name)).count();
    if unpublished > 0 {
        info!(unpublished, "catalog functions not yet in the versioned API");
    }

    let direct_path = project.direct_header();
    let extension_path = project.extension_header();
    let headers = render_headers(
        &catalog,
        &index,
        &template,
        &config.group_order,
        &render_options,
        (&file_name(&direct_path), &file_name(&extension_path)),
    )?;

    let lock_path = project.layout_lock();
    let appended_members = match &lock_path {
        Some(path) => verify_against_lock(path, &headers.layout)?,
        None => 0,
    };
    if options.update_lock && lock_path.is_none() {
        return Err(GenerateError::Config {
            path: project.root.clone(),
            message: "--update-lock requires `layout_lock` in the config".to_string(),
        });
    }

    let staged = [
        StagedArtifact::stage(&direct_path, &headers.direct)?,
        StagedArtifact::stage(&extension_path, &headers.extension)?,
    ];
    if let Some(formatter) = &config.formatter {
        for artifact in &staged {
            artifact.format(formatter)?;
        }
    }

    let mut outcome = RunOutcome {
        written: Vec::new(),
        appended_members,
        order: headers.order.clone(),
    };

    match options.mode {
        RunMode::Check => {
            let mut stale = Vec::new();
            for artifact in &staged {
                if !artifact.is_current()? {
                    warn!(file = %artifact.target().display(), "generated header is stale");
                    stale.push(artifact.target().to_path_buf());
                }
            }
            if let Some(path) = stale.into_iter().next() {
                return Err(GenerateError::StaleArtifact { path });
            }
        }
        RunMode::Write => {
            for artifact in staged {
                let target = artifact.target().to_path_buf();
                match artifact.persist() {
                    Ok(path) => outcome.written.push(path),
                    Err(err) if outcome.written.is_empty() => return Err(err),
                    Err(err) => {
                        return Err(GenerateError::PartialPersist {
                            written: outcome.written,
                            stale: target,
                            source: Box::new(err),
                        });
                    }
                }
            }
            if options.update_lock {
                if let Some(path) = &lock_path {
                    headers.layout.save(path)?;
                    info!(file = %path.display(), "updated layout lock");
                }
            }
        }
    }

    Ok(outcome)
}

/// Rewrite the layout lock from the current index, after checking that the
/// index only appends to the existing lock.
pub fn update_layout_lock(project: &Project) -> Result<LayoutLock> {
    let Some(lock_path) = project.layout_lock() else {
        return Err(GenerateError::Config {
            path: project.root.clone(),
            message: "no `layout_lock` path configured".to_string(),
        });
    };
    let catalog = Catalog::load_dir(&project.functions_dir())?;
    let document = ApiIndexDocument::load(&project.api_index())?;
    let index = VersionedApiIndex::resolve(&document, &catalog)?;
    let current = LayoutLock::from_index(&index, &project.config.naming.api_struct);
    verify_against_lock(&lock_path, &current)?;
    current.save(&lock_path)?;
    info!(file = %lock_path.display(), members = current.members.len(), "wrote layout lock");
    Ok(current)
}

fn verify_against_lock(path: &Path, current: &LayoutLock) -> Result<usize> {
    if !path.exists() {
        info!(file = %path.display(), "no layout lock yet; skipping verification");
        return Ok(current.members.len());
    }
    let previous = LayoutLock::load(path)?;
    previous.verify(current)?;
    let appended = previous.appended(current).len();
    if appended > 0 {
        info!(appended, "new ABI members beyond the layout lock");
    }
    Ok(appended)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
