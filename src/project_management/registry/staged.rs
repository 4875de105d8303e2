use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::shared::error::BimaError;
use crate::shared::utils::diff::render_diff;

/// Read a text artifact, treating absence as `None`.
pub fn read_if_exists(path: &Path) -> Result<Option<String>, BimaError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BimaError::io("read", path, e)),
    }
}

#[derive(Debug, Clone)]
struct StagedFile {
    path: PathBuf,
    original: Option<String>,
    content: String,
}

impl StagedFile {
    fn is_noop(&self) -> bool {
        self.original.as_deref() == Some(self.content.as_str())
    }
}

/// New content for a set of artifacts, held in memory until [`StagedChanges::commit`].
#[derive(Debug, Default)]
pub struct StagedChanges {
    files: Vec<StagedFile>,
}

impl StagedChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `content` for `path`; `original` is what is on disk now
    /// (`None` if the file does not exist).
    pub fn write<P: Into<PathBuf>>(&mut self, path: P, original: Option<String>, content: String) {
        let path = path.into();
        debug!(path = %path.display(), created = original.is_none(), "staged artifact");
        self.files.retain(|f| f.path != path);
        self.files.push(StagedFile {
            path,
            original,
            content,
        });
    }

    /// Line diff of every pending change, relative to `root`.
    pub fn render_diff(&self, root: &Path) -> String {
        let mut out = String::new();
        for file in self.files.iter().filter(|f| !f.is_noop()) {
            let display = file.path.strip_prefix(root).unwrap_or(&file.path);
            let marker = if file.original.is_none() { " (new)" } else { "" };
            out.push_str(&format!("--- {}{}\n", display.display(), marker));
            out.push_str(&render_diff(file.original.as_deref().unwrap_or(""), &file.content));
        }
        out
    }

    /// Write every staged file. On failure the files already written are
    /// restored from their staged originals (new files are removed).
    pub fn commit(self) -> Result<Vec<PathBuf>, BimaError> {
        let mut applied: Vec<&StagedFile> = Vec::new();

        for file in self.files.iter().filter(|f| !f.is_noop()) {
            if let Err(source) = write_file(&file.path, &file.content) {
                warn!(path = %file.path.display(), error = %source, "write failed, rolling back");
                let rolled_back = rollback(&applied);
                return Err(BimaError::PartialApply {
                    applied: applied.iter().map(|f| f.path.clone()).collect(),
                    failed: file.path.clone(),
                    rolled_back,
                    source,
                });
            }
            applied.push(file);
        }

        let written: Vec<PathBuf> = applied.iter().map(|f| f.path.clone()).collect();
        info!(count = written.len(), "committed artifacts");
        Ok(written)
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn rollback(applied: &[&StagedFile]) -> bool {
    let mut clean = true;
    for file in applied.iter().rev() {
        let result = match &file.original {
            Some(original) => fs::write(&file.path, original),
            None => fs::remove_file(&file.path).and_then(|_| remove_empty_parent(&file.path)),
        };
        if let Err(e) = result {
            warn!(path = %file.path.display(), error = %e, "rollback failed");
            clean = false;
        }
    }
    clean
}

fn remove_empty_parent(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if fs::read_dir(parent)?.next().is_none() {
            fs::remove_dir(parent)?;
        }
    }
    Ok(())
}

/// Remove a file or directory tree. Absence is not an error; any other
/// failure is logged and the path returned so the caller can report it.
pub fn remove_best_effort(path: &Path) -> Option<PathBuf> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => {
            debug!(path = %path.display(), "removed");
            None
        }
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not remove");
            Some(path.to_path_buf())
        }
    }
}
