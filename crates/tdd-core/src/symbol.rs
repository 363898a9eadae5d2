//! Task id → identifier-safe symbol mapping.
//!
//! The symbol names both the stub file (`<symbol>.py`) and the entry
//! function (`run_<symbol>`), so the mapping must stay bit-exact across
//! scaffold and status runs.

use crate::checklist::Task;
use serde::Serialize;

/// Symbol used when an id contains no usable characters.
pub const PLACEHOLDER_SYMBOL: &str = "task";
/// Prefix applied to symbols that would otherwise start with a digit.
pub const DIGIT_PREFIX: &str = "task_";

/// Derive the symbol for a task id.
///
/// ASCII alphanumerics and `_` are kept, `-` and space become `_`, anything
/// else is dropped. The result is never empty and never starts with a digit.
pub fn derive_symbol(id: &str) -> String {
    let mut symbol: String = id
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '_' => Some(c),
            '-' | ' ' => Some('_'),
            _ => None,
        })
        .collect();

    if symbol.is_empty() {
        return PLACEHOLDER_SYMBOL.to_string();
    }
    if symbol.starts_with(|c: char| c.is_ascii_digit()) {
        symbol.insert_str(0, DIGIT_PREFIX);
    }
    symbol
}

/// Python's reserved words. A stub module named after one cannot be
/// imported with `from ... import`, so such symbols are reported.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

pub fn is_python_keyword(symbol: &str) -> bool {
    PYTHON_KEYWORDS.contains(&symbol)
}

/// Name of the no-op entry function each stub defines.
pub fn entry_function(symbol: &str) -> String {
    format!("run_{symbol}")
}

// ---------------------------------------------------------------------------
// SymbolTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    pub id: String,
    pub title: String,
    pub symbol: String,
    /// True for the first task that claimed this symbol.
    pub owner: bool,
}

/// Distinct task ids that transliterate to the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolCollision {
    pub symbol: String,
    pub ids: Vec<String>,
}

impl SymbolCollision {
    pub fn message(&self) -> String {
        format!(
            "task ids {} all map to symbol '{}'; only '{}' gets a stub",
            self.ids
                .iter()
                .map(|id| format!("'{id}'"))
                .collect::<Vec<_>>()
                .join(", "),
            self.symbol,
            self.ids[0]
        )
    }
}

/// The id → symbol mapping for one checklist, computed once per operation.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    collisions: Vec<SymbolCollision>,
}

impl SymbolTable {
    pub fn build(tasks: &[Task]) -> Self {
        let mut entries: Vec<SymbolEntry> = Vec::with_capacity(tasks.len());
        let mut collisions: Vec<SymbolCollision> = Vec::new();

        for task in tasks {
            let symbol = derive_symbol(&task.id);
            let owner_id = entries
                .iter()
                .find(|e| e.owner && e.symbol == symbol)
                .map(|e| e.id.clone());

            if let Some(owner_id) = &owner_id {
                // The same id repeated is a duplicate task, not a collision.
                if *owner_id != task.id {
                    match collisions.iter_mut().find(|c| c.symbol == symbol) {
                        Some(c) => {
                            if !c.ids.contains(&task.id) {
                                c.ids.push(task.id.clone());
                            }
                        }
                        None => collisions.push(SymbolCollision {
                            symbol: symbol.clone(),
                            ids: vec![owner_id.clone(), task.id.clone()],
                        }),
                    }
                }
            }

            entries.push(SymbolEntry {
                id: task.id.clone(),
                title: task.title.clone(),
                symbol,
                owner: owner_id.is_none(),
            });
        }

        for c in &collisions {
            tracing::warn!(symbol = %c.symbol, ids = ?c.ids, "task symbol collision");
        }
        for e in entries.iter().filter(|e| e.owner && is_python_keyword(&e.symbol)) {
            tracing::warn!(task = %e.id, symbol = %e.symbol, "task symbol is a Python keyword");
        }

        Self {
            entries,
            collisions,
        }
    }

    /// One entry per task, in checklist order.
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// Entries that own their symbol, in checklist order.
    pub fn owners(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter().filter(|e| e.owner)
    }

    pub fn collisions(&self) -> &[SymbolCollision] {
        &self.collisions
    }

    /// Collisions first, then owned symbols that are Python keywords.
    pub fn warnings(&self) -> Vec<String> {
        let keywords = self
            .owners()
            .filter(|e| is_python_keyword(&e.symbol))
            .map(|e| {
                format!(
                    "task id '{}' maps to symbol '{}', a Python keyword; its import in the aggregator will not compile",
                    e.id, e.symbol
                )
            });
        self.collisions
            .iter()
            .map(SymbolCollision::message)
            .chain(keywords)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
