//! Staging, formatting and persisting generated artifacts.
//!
//! Artifacts are staged as temp files in their target directory so the
//! formatter sees a real `.h` file and the final rename is atomic. Nothing is
//! persisted until every artifact has been staged and formatted.

use crate::error::{GenerateError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// A rendered artifact waiting in a temp file next to its target.
pub struct StagedArtifact {
    target: PathBuf,
    staged: NamedTempFile,
}

impl StagedArtifact {
    pub fn stage(target: &Path, contents: &str) -> Result<Self> {
        let dir = parent_dir(target);
        fs::create_dir_all(&dir).map_err(|err| GenerateError::io(&dir, err))?;
        let suffix = target
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let mut staged = tempfile::Builder::new()
            .prefix(".capigen-")
            .suffix(&suffix)
            .tempfile_in(&dir)
            .map_err(|err| GenerateError::io(&dir, err))?;
        let written = staged
            .write_all(contents.as_bytes())
            .and_then(|_| staged.flush());
        written.map_err(|err| GenerateError::io(staged.path(), err))?;
        Ok(Self {
            target: target.to_path_buf(),
            staged,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Run `formatter` (argv) with the staged path appended.
    pub fn format(&self, formatter: &[String]) -> Result<()> {
        let Some((program, args)) = formatter.split_first() else {
            return Ok(());
        };
        let command_line = formatter.join(" ");
        debug!(command = %command_line, file = %self.target.display(), "running formatter");
        let status = Command::new(program)
            .args(args)
            .arg(self.staged.path())
            .status()
            .map_err(|err| GenerateError::Formatter {
                command: command_line.clone(),
                message: err.to_string(),
            })?;
        if !status.success() {
            return Err(GenerateError::Formatter {
                command: command_line,
                message: format!("exited with {status} on {}", self.target.display()),
            });
        }
        Ok(())
    }

    /// True when the target already holds exactly the staged bytes.
    pub fn is_current(&self) -> Result<bool> {
        let staged =
            fs::read(self.staged.path()).map_err(|err| GenerateError::io(self.staged.path(), err))?;
        match fs::read(&self.target) {
            Ok(existing) => Ok(existing == staged),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(GenerateError::io(&self.target, err)),
        }
    }

    /// Atomically replace the target with the staged file.
    pub fn persist(self) -> Result<PathBuf> {
        let target = self.target;
        self.staged
            .persist(&target)
            .map_err(|err| GenerateError::io(&target, err.error))?;
        info!(file = %target.display(), "wrote artifact");
        Ok(target)
    }
}

/// Write `bytes` to `path` through a temp file in the same directory.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(|err| GenerateError::io(&dir, err))?;
    let mut temp = NamedTempFile::new_in(&dir).map_err(|err| GenerateError::io(&dir, err))?;
    temp.write_all(bytes)
        .map_err(|err| GenerateError::io(temp.path(), err))?;
    temp.persist(path)
        .map_err(|err| GenerateError::io(path, err.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn staged_artifact_persists_and_reports_current() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("include/api.h");
        let staged = StagedArtifact::stage(&target, "int x;\n").unwrap();
        assert!(!staged.is_current().unwrap());
        staged.persist().unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "int x;\n");

        let again = StagedArtifact::stage(&target, "int x;\n").unwrap();
        assert!(again.is_current().unwrap());
    }

    #[test]
    fn dropped_stage_leaves_no_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("api.h");
        drop(StagedArtifact::stage(&target, "int x;\n").unwrap());
        assert!(!target.exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn failing_formatter_is_reported() {
        let temp = TempDir::new().unwrap();
        let staged = StagedArtifact::stage(&temp.path().join("api.h"), "int x;\n").unwrap();
        let err = staged.format(&["false".to_string()]).unwrap_err();
        assert!(matches!(err, GenerateError::Formatter { .. }));
    }
}
