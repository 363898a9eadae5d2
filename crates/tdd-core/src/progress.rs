//! `CHECKLIST.md`: a checkbox rendering of the checklist that humans (and
//! `mark`) can tick off.
//!
//! Rendering is a full rewrite. Marking is surgical: each line is parsed into
//! a [`DocLine`] record and only the checkbox glyph of matching items is
//! flipped. Every other byte of the document is preserved.

use crate::checklist::Checklist;
use crate::error::{Result, TddError};
use crate::paths;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const TITLE: &str = "# MCP Checklist";
const UNCHECKED: &str = "[ ]";
const CHECKED: &str = "[x]";

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

pub fn render(checklist: &Checklist) -> String {
    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');

    let meta = &checklist.metadata;
    let has_header = !meta.name.is_empty() || !meta.description.is_empty();
    if has_header {
        out.push('\n');
    }
    if !meta.name.is_empty() {
        out.push_str(&format!("Project: {}\n", meta.name));
    }
    if !meta.description.is_empty() {
        out.push_str(&format!("{}\n", meta.description));
    }
    out.push('\n');

    for task in &checklist.tasks {
        out.push_str(&format!("- {UNCHECKED} {} ({})\n", task.title, task.id));
        if let Some(desc) = task.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("  - {desc}\n"));
        }
        if !task.steps.is_empty() {
            out.push_str("  - steps:\n");
            for step in &task.steps {
                out.push_str(&format!("    - {step}\n"));
            }
        }
    }
    out
}

/// Render the checklist and overwrite `CHECKLIST.md`.
pub fn write(root: &Path, checklist: &Checklist) -> Result<PathBuf> {
    let path = paths::progress_path(root);
    crate::io::atomic_write(&path, render(checklist).as_bytes())?;
    tracing::info!(path = %path.display(), "wrote progress document");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Line records
// ---------------------------------------------------------------------------

/// One line of the progress document, split into the parts `mark` cares
/// about. Only checkbox bullets are given structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocLine<'a> {
    Item {
        /// Everything up to and including `- `.
        lead: &'a str,
        checked: bool,
        /// Everything after the `[ ]` glyph.
        rest: &'a str,
    },
    Text(&'a str),
}

impl<'a> DocLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        let indent = line.len() - line.trim_start().len();
        let body = &line[indent..];
        let Some(after_bullet) = body.strip_prefix("- ") else {
            return DocLine::Text(line);
        };
        let checked = match after_bullet.get(..3) {
            Some("[ ]") => false,
            Some("[x]") | Some("[X]") => true,
            _ => return DocLine::Text(line),
        };
        let lead_len = indent + 2;
        DocLine::Item {
            lead: &line[..lead_len],
            checked,
            rest: &line[lead_len + 3..],
        }
    }

    /// Whether this is a checkbox item carrying the `(task_id)` marker.
    pub fn is_item_for(&self, task_id: &str) -> bool {
        match self {
            DocLine::Item { rest, .. } => rest.contains(&format!("({task_id})")),
            DocLine::Text(_) => false,
        }
    }

    fn render_checked(&self, checked: bool) -> String {
        match self {
            DocLine::Item { lead, rest, .. } => {
                let glyph = if checked { CHECKED } else { UNCHECKED };
                format!("{lead}{glyph}{rest}")
            }
            DocLine::Text(t) => t.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MarkOutcome {
    pub ok: bool,
    pub changed: bool,
    pub path: PathBuf,
    /// Number of lines carrying the task marker.
    pub matched: usize,
}

/// Apply a check/uncheck to text, returning the new text, whether it changed,
/// and how many item lines matched.
pub fn apply_mark(content: &str, task_id: &str, checked: bool) -> (String, bool, usize) {
    let mut out = String::with_capacity(content.len());
    let mut changed = false;
    let mut matched = 0;

    for raw in content.split_inclusive('\n') {
        let (line, ending) = split_line_ending(raw);
        let record = DocLine::parse(line);
        match record {
            DocLine::Item { checked: current, .. } if record.is_item_for(task_id) => {
                matched += 1;
                if current != checked {
                    out.push_str(&record.render_checked(checked));
                    changed = true;
                } else {
                    out.push_str(line);
                }
            }
            _ => out.push_str(line),
        }
        out.push_str(ending);
    }
    (out, changed, matched)
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw, "")
    }
}

/// Check or uncheck every item line for `task_id` in `CHECKLIST.md`.
pub fn mark(root: &Path, task_id: &str, checked: bool) -> Result<MarkOutcome> {
    let path = paths::progress_path(root);
    if !path.is_file() {
        return Err(TddError::ProgressNotFound);
    }
    let content = std::fs::read_to_string(&path)?;
    let (updated, changed, matched) = apply_mark(&content, task_id, checked);
    if changed {
        crate::io::atomic_write(&path, updated.as_bytes())?;
    }
    if matched == 0 {
        tracing::warn!(task_id, "no progress line carries this task id");
    }
    tracing::debug!(task_id, checked, changed, matched, "mark applied");
    Ok(MarkOutcome {
        ok: true,
        changed,
        path,
        matched,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
