use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const MCP_DIR: &str = ".mcp";
pub const CHECKLIST_FILE: &str = "checklist.yaml";
pub const CONFIG_FILE: &str = ".mcp/config.yaml";

pub const README_MD: &str = "README.md";
pub const PROGRESS_MD: &str = "CHECKLIST.md";

/// Python package holding the generated aggregator.
pub const JOBS_PACKAGE: &str = "mcp_jobs";
/// Stub modules, one per task symbol.
pub const TASKS_DIR: &str = "mcp_jobs/tasks";
pub const AGGREGATOR_FILE: &str = "mcp_jobs/main.py";
pub const PACKAGE_MARKER: &str = "__init__.py";
pub const STUB_EXTENSION: &str = "py";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn mcp_dir(root: &Path) -> PathBuf {
    root.join(MCP_DIR)
}

pub fn checklist_path(root: &Path) -> PathBuf {
    mcp_dir(root).join(CHECKLIST_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn readme_path(root: &Path) -> PathBuf {
    root.join(README_MD)
}

pub fn progress_path(root: &Path) -> PathBuf {
    root.join(PROGRESS_MD)
}

pub fn jobs_dir(root: &Path) -> PathBuf {
    root.join(JOBS_PACKAGE)
}

pub fn tasks_dir(root: &Path) -> PathBuf {
    root.join(TASKS_DIR)
}

pub fn aggregator_path(root: &Path) -> PathBuf {
    root.join(AGGREGATOR_FILE)
}

pub fn stub_path(root: &Path, symbol: &str) -> PathBuf {
    tasks_dir(root).join(format!("{symbol}.{STUB_EXTENSION}"))
}

/// Python module path of the aggregator, as passed to `python -m`.
pub fn aggregator_module() -> String {
    format!("{JOBS_PACKAGE}.main")
}

/// Repository display name: the final path component, or the whole path
/// when there is none (e.g. `/`).
pub fn repo_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
