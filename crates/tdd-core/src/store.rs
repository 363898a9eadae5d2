//! Locating, loading, and persisting the checklist document.
//!
//! A checklist is any `*.yaml` / `*.yml` file directly inside `.mcp/`.
//! `checklist.yaml` wins when present; otherwise the lexicographically first
//! file name is used so the choice never depends on directory listing order.
//! The engine config file shares the directory and is never a candidate.

use crate::checklist::Checklist;
use crate::error::{Result, TddError};
use crate::paths;
use std::path::{Path, PathBuf};

/// All checklist candidates in `.mcp/`, sorted by file name.
pub fn find_checklists(root: &Path) -> Vec<PathBuf> {
    let dir = paths::mcp_dir(root);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| is_checklist_file(p))
        .collect();
    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    found
}

fn is_checklist_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if Path::new(paths::CONFIG_FILE).file_name().and_then(|n| n.to_str()) == Some(name) {
        return false;
    }
    name.ends_with(".yaml") || name.ends_with(".yml")
}

/// The checklist file operations act on, if any.
pub fn locate(root: &Path) -> Option<PathBuf> {
    let found = find_checklists(root);
    found
        .iter()
        .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(paths::CHECKLIST_FILE))
        .or_else(|| found.first())
        .cloned()
}

/// A checklist together with the file it was read from.
#[derive(Debug, Clone)]
pub struct LoadedChecklist {
    pub path: PathBuf,
    pub checklist: Checklist,
}

/// Load the preferred checklist.
///
/// Returns `ChecklistNotFound` when no candidate exists, when the file cannot
/// be read, or when it does not parse. A malformed document is never
/// partially trusted.
pub fn load(root: &Path) -> Result<LoadedChecklist> {
    let path = locate(root).ok_or(TddError::ChecklistNotFound)?;
    let data = match std::fs::read_to_string(&path) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "checklist unreadable");
            return Err(TddError::ChecklistNotFound);
        }
    };
    match Checklist::from_yaml(&data) {
        Ok(checklist) => {
            tracing::debug!(path = %path.display(), tasks = checklist.tasks.len(), "loaded checklist");
            Ok(LoadedChecklist { path, checklist })
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "checklist is malformed, ignoring");
            Err(TddError::ChecklistNotFound)
        }
    }
}

/// Write YAML text to the canonical checklist path, replacing any existing
/// file there.
pub fn save_yaml(root: &Path, yaml: &str) -> Result<PathBuf> {
    let path = paths::checklist_path(root);
    crate::io::atomic_write(&path, yaml.as_bytes())?;
    tracing::info!(path = %path.display(), "wrote checklist");
    Ok(path)
}

pub fn save(root: &Path, checklist: &Checklist) -> Result<PathBuf> {
    save_yaml(root, &checklist.to_yaml()?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
