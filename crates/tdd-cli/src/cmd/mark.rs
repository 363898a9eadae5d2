use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use tdd_core::repo::Repo;

pub fn run(root: &Path, task_id: &str, checked: bool, json: bool) -> anyhow::Result<()> {
    let repo = Repo::open(root).context("failed to load engine config")?;
    let outcome = repo
        .mark(task_id, checked)
        .with_context(|| format!("failed to mark '{task_id}'"))?;

    if json {
        return print_json(&outcome);
    }

    let verb = if checked { "checked" } else { "unchecked" };
    if outcome.matched == 0 {
        println!("No item for '{task_id}' in {}", outcome.path.display());
    } else if outcome.changed {
        println!("Task '{task_id}' {verb}");
    } else {
        println!("Task '{task_id}' already {verb}");
    }
    Ok(())
}
