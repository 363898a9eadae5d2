use std::path::{Path, PathBuf};

/// Resolve the repository to operate on.
///
/// `--root` / `MCP_REPO_PATH` (passed in as `explicit`) wins; otherwise the
/// current directory. A relative explicit path is taken relative to the
/// current directory.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match explicit {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd,
    }
}
