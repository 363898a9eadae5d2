use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Ecosystems with a fixed bootstrap-and-test recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Python,
    Node,
    Go,
    Rust,
    Java,
    Cpp,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::Node,
            Language::Go,
            Language::Rust,
            Language::Java,
            Language::Cpp,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Node => "javascript",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    /// Accepted spellings, as declared by callers.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["python", "py"],
            Language::Node => &["javascript", "node", "js"],
            Language::Go => &["go", "golang"],
            Language::Rust => &["rust"],
            Language::Java => &["java"],
            Language::Cpp => &["cpp", "c++"],
        }
    }

    /// Resolve a declared language key, ignoring case and surrounding
    /// whitespace. `None` for empty or unrecognised keys.
    pub fn from_key(key: &str) -> Option<Language> {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.keys().contains(&key.as_str()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
