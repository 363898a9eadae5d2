use crate::checklist::Checklist;
use crate::paths;
use crate::scaffold::{call_expression, import_statement};
use crate::symbol::SymbolTable;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Aggregator line records
// ---------------------------------------------------------------------------

static IMPORT_RE: OnceLock<Regex> = OnceLock::new();
static CALL_RE: OnceLock<Regex> = OnceLock::new();

fn import_re() -> &'static Regex {
    IMPORT_RE.get_or_init(|| Regex::new(r"^(from\s+[\w.]+\s+)?import\s+\S.*$").unwrap())
}

fn call_re() -> &'static Regex {
    CALL_RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*\(.*\)$").unwrap())
}

/// The statements of an aggregator module that status cares about.
///
/// Lines are trimmed; comments and blank lines are skipped, so a
/// commented-out import or call does not count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatorSource {
    pub imports: Vec<String>,
    pub calls: Vec<String>,
}

impl AggregatorSource {
    pub fn parse(source: &str) -> Self {
        let mut parsed = Self::default();
        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if import_re().is_match(line) {
                parsed.imports.push(line.to_string());
            } else if call_re().is_match(line) {
                parsed.calls.push(line.to_string());
            }
        }
        parsed
    }

    pub fn has_import(&self, statement: &str) -> bool {
        self.imports.iter().any(|i| i == statement)
    }

    pub fn has_call(&self, expression: &str) -> bool {
        self.calls.iter().any(|c| c == expression)
    }
}

// ---------------------------------------------------------------------------
// Status report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    pub id: String,
    pub symbol: String,
    pub stub_file: PathBuf,
    pub present: bool,
    pub imported: bool,
    pub called: bool,
}

impl TaskStatus {
    /// Stub exists and the aggregator both imports and calls it.
    pub fn is_wired(&self) -> bool {
        self.present && self.imported && self.called
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub ok: bool,
    pub aggregator_path: PathBuf,
    pub aggregator_exists: bool,
    pub tasks: Vec<TaskStatus>,
    pub warnings: Vec<String>,
}

impl StatusReport {
    /// "2/3 tasks wired"
    pub fn summary(&self) -> String {
        let wired = self.tasks.iter().filter(|t| t.is_wired()).count();
        format!("{wired}/{} tasks wired", self.tasks.len())
    }
}

pub fn status(root: &Path, checklist: &Checklist) -> StatusReport {
    let table = SymbolTable::build(&checklist.tasks);
    let aggregator_path = paths::aggregator_path(root);
    let aggregator_exists = aggregator_path.is_file();
    let source = AggregatorSource::parse(&crate::io::read_or_empty(&aggregator_path));

    let tasks = table
        .entries()
        .iter()
        .map(|entry| {
            let stub_file = paths::stub_path(root, &entry.symbol);
            TaskStatus {
                id: entry.id.clone(),
                symbol: entry.symbol.clone(),
                present: stub_file.is_file(),
                imported: source.has_import(&import_statement(&entry.symbol)),
                called: source.has_call(&call_expression(&entry.symbol)),
                stub_file,
            }
        })
        .collect();

    StatusReport {
        ok: true,
        aggregator_path,
        aggregator_exists,
        tasks,
        warnings: table.warnings(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
