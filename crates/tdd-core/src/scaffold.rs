//! Reconciles checklist tasks against generated Python stubs and the
//! aggregator module.
//!
//! Stubs are created once and never touched again, so users can fill them in
//! and re-run scaffolding safely. The aggregator is rewritten on every run
//! and always reflects the current checklist.

use crate::checklist::Checklist;
use crate::error::Result;
use crate::paths;
use crate::symbol::{entry_function, SymbolEntry, SymbolTable};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldOutcome {
    pub ok: bool,
    /// Files that did not exist before this run (stubs and package markers).
    pub created_files: Vec<PathBuf>,
    pub aggregator_path: PathBuf,
    pub progress_path: PathBuf,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Generated source
// ---------------------------------------------------------------------------

/// Import line the aggregator carries for a symbol.
pub fn import_statement(symbol: &str) -> String {
    format!(
        "from {}.tasks.{symbol} import {}",
        paths::JOBS_PACKAGE,
        entry_function(symbol)
    )
}

/// Call expression the aggregator's `main()` carries for a symbol.
pub fn call_expression(symbol: &str) -> String {
    format!("{}()", entry_function(symbol))
}

pub fn render_stub(entry: &SymbolEntry) -> String {
    format!(
        r#""""Task stub for '{id}'.

Title: {title}

Generated by tdd scaffold. This file is never overwritten; replace the body
of {func}() with the real work for this task.
"""


def {func}():
    """{title}"""
    pass
"#,
        id = docstring_text(&entry.id),
        title = docstring_text(&entry.title),
        func = entry_function(&entry.symbol),
    )
}

pub fn render_aggregator(table: &SymbolTable) -> String {
    let owners: Vec<&SymbolEntry> = table.owners().collect();

    let mut out = String::from(
        "\"\"\"Runs every checklist task in order.\n\nGenerated by tdd scaffold and rewritten on every run; edits here are lost.\n\"\"\"\n\n",
    );
    for entry in &owners {
        out.push_str(&import_statement(&entry.symbol));
        out.push('\n');
    }
    if !owners.is_empty() {
        out.push('\n');
    }
    out.push_str("\ndef main():\n");
    if owners.is_empty() {
        out.push_str("    pass\n");
    }
    for entry in &owners {
        out.push_str("    ");
        out.push_str(&call_expression(&entry.symbol));
        out.push('\n');
    }
    out.push_str("\n\nif __name__ == \"__main__\":\n    main()\n");
    out
}

/// Text safe to place inside a `"""` docstring: one line, with backslashes
/// and double quotes escaped so no closing `"""` or escape sequence can form.
fn docstring_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' | '\n' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Scaffold
// ---------------------------------------------------------------------------

pub fn scaffold(root: &Path, checklist: &Checklist) -> Result<ScaffoldOutcome> {
    let progress_path = crate::progress::write(root, checklist)?;
    let table = SymbolTable::build(&checklist.tasks);
    let mut created_files = Vec::new();

    let tasks_dir = paths::tasks_dir(root);
    crate::io::ensure_dir(&tasks_dir)?;
    for marker in [
        paths::jobs_dir(root).join(paths::PACKAGE_MARKER),
        tasks_dir.join(paths::PACKAGE_MARKER),
    ] {
        if crate::io::write_if_missing(&marker, b"")? {
            created_files.push(marker);
        }
    }

    for entry in table.owners() {
        let stub = paths::stub_path(root, &entry.symbol);
        if crate::io::write_if_missing(&stub, render_stub(entry).as_bytes())? {
            tracing::info!(task = %entry.id, path = %stub.display(), "created stub");
            created_files.push(stub);
        } else {
            tracing::debug!(task = %entry.id, path = %stub.display(), "stub exists, kept");
        }
    }

    let aggregator_path = paths::aggregator_path(root);
    crate::io::atomic_write(&aggregator_path, render_aggregator(&table).as_bytes())?;
    tracing::info!(path = %aggregator_path.display(), "wrote aggregator");

    Ok(ScaffoldOutcome {
        ok: true,
        created_files,
        aggregator_path,
        progress_path,
        warnings: table.warnings(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{Metadata, Task};
    use tempfile::TempDir;

    fn checklist_of(ids: &[&str]) -> Checklist {
        let mut checklist = Checklist::new(Metadata::default());
        for id in ids {
            checklist.tasks.push(Task::new(*id, format!("Title {id}")));
        }
        checklist
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn creates_stubs_for_derived_symbols() {
        let dir = TempDir::new().unwrap();
        let outcome = scaffold(dir.path(), &checklist_of(&["lint-code", "2nd-task"])).unwrap();

        let lint = dir.path().join("mcp_jobs/tasks/lint_code.py");
        let second = dir.path().join("mcp_jobs/tasks/task_2nd_task.py");
        assert!(lint.exists());
        assert!(second.exists());
        assert!(outcome.created_files.contains(&lint));
        assert!(outcome.created_files.contains(&second));
        assert!(read(&lint).contains("def run_lint_code():"));
        assert!(read(&lint).contains("'lint-code'"));
        assert!(dir.path().join("mcp_jobs/__init__.py").exists());
        assert!(dir.path().join("mcp_jobs/tasks/__init__.py").exists());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn aggregator_wires_every_task_in_order() {
        let dir = TempDir::new().unwrap();
        let checklist = checklist_of(&["b-task", "a-task", "c-task"]);
        let outcome = scaffold(dir.path(), &checklist).unwrap();
        let agg = read(&outcome.aggregator_path);

        let mut last_import = 0;
        let mut last_call = 0;
        for id in ["b-task", "a-task", "c-task"] {
            let symbol = crate::symbol::derive_symbol(id);
            let i = agg.find(&import_statement(&symbol)).expect("import present");
            let c = agg.find(&format!("    {}", call_expression(&symbol))).expect("call present");
            assert!(i >= last_import && c >= last_call, "out of order: {id}");
            last_import = i;
            last_call = c;
        }
        assert!(agg.contains("from mcp_jobs.tasks.b_task import run_b_task"));
    }

    #[test]
    fn second_scaffold_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let checklist = checklist_of(&["lint-code", "2nd-task"]);
        let first = scaffold(dir.path(), &checklist).unwrap();
        let agg_before = read(&first.aggregator_path);
        let stub = dir.path().join("mcp_jobs/tasks/lint_code.py");
        let stub_before = read(&stub);

        let second = scaffold(dir.path(), &checklist).unwrap();
        assert!(second.created_files.is_empty());
        assert_eq!(read(&second.aggregator_path), agg_before);
        assert_eq!(read(&stub), stub_before);
    }

    #[test]
    fn edited_stub_survives_but_aggregator_is_regenerated() {
        let dir = TempDir::new().unwrap();
        let checklist = checklist_of(&["lint-code"]);
        let outcome = scaffold(dir.path(), &checklist).unwrap();
        let stub = dir.path().join("mcp_jobs/tasks/lint_code.py");
        std::fs::write(&stub, "def run_lint_code():\n    print('real work')\n").unwrap();
        std::fs::write(&outcome.aggregator_path, "# hand edited\n").unwrap();

        scaffold(dir.path(), &checklist).unwrap();
        assert!(read(&stub).contains("real work"));
        assert!(read(&outcome.aggregator_path).contains("run_lint_code()"));
    }

    #[test]
    fn new_task_is_wired_in_on_rescaffold() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path(), &checklist_of(&["one"])).unwrap();
        let outcome = scaffold(dir.path(), &checklist_of(&["one", "two"])).unwrap();
        assert_eq!(
            outcome.created_files,
            vec![dir.path().join("mcp_jobs/tasks/two.py")]
        );
        assert!(read(&outcome.aggregator_path).contains("run_two()"));
    }

    #[test]
    fn colliding_ids_share_one_stub_and_warn() {
        let dir = TempDir::new().unwrap();
        let outcome = scaffold(dir.path(), &checklist_of(&["lint-code", "lint code"])).unwrap();
        let agg = read(&outcome.aggregator_path);
        assert_eq!(agg.matches(&import_statement("lint_code")).count(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(read(&dir.path().join("mcp_jobs/tasks/lint_code.py")).contains("'lint-code'"));
    }

    #[test]
    fn quotes_and_backslashes_in_titles_are_escaped() {
        let entry = |id: &str, title: &str| SymbolEntry {
            id: id.into(),
            title: title.into(),
            symbol: crate::symbol::derive_symbol(id),
            owner: true,
        };

        let quoted = render_stub(&entry("quote", "Say \"hi\""));
        assert!(quoted.contains(r#"    """Say \"hi\"""""#));
        assert!(!quoted.contains(r#"Say "hi""#));

        let path = render_stub(&entry("winpath\"", "Copy C:\\Users\\me\nnow"));
        assert!(path.contains(r"Title: Copy C:\\Users\\me now"));
        assert!(path.contains(r#"Task stub for 'winpath\"'."#));
        assert!(!path.contains(r"C:\Users"));
    }

    #[test]
    fn progress_document_written_even_without_new_stubs() {
        let dir = TempDir::new().unwrap();
        let checklist = checklist_of(&["a"]);
        scaffold(dir.path(), &checklist).unwrap();
        std::fs::remove_file(dir.path().join("CHECKLIST.md")).unwrap();
        let outcome = scaffold(dir.path(), &checklist).unwrap();
        assert!(outcome.progress_path.exists());
    }

    #[test]
    fn empty_checklist_gets_valid_aggregator() {
        let agg = render_aggregator(&SymbolTable::build(&[]));
        assert!(agg.contains("def main():\n    pass\n"));
    }
}
