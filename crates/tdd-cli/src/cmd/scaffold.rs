use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use tdd_core::repo::Repo;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let repo = Repo::open(root).context("failed to load engine config")?;
    let outcome = repo.scaffold().context("failed to scaffold tasks")?;

    if json {
        return print_json(&outcome);
    }

    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    if outcome.created_files.is_empty() {
        println!("Nothing new to create.");
    } else {
        println!("Created:");
        for path in &outcome.created_files {
            println!("  {}", path.display());
        }
    }
    println!("Aggregator: {}", outcome.aggregator_path.display());
    println!("Progress:   {}", outcome.progress_path.display());
    Ok(())
}
