use std::path::PathBuf;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The repository a request targets. An absent or blank `repoPath` means
    /// the server's root; a relative one is taken under it.
    pub fn resolve(&self, repo_path: Option<&str>) -> PathBuf {
        match repo_path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => self.root.join(p),
            None => self.root.clone(),
        }
    }
}
