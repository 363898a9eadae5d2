use crate::output::{print_json, print_table, yes_no};
use anyhow::Context;
use std::path::Path;
use tdd_core::repo::Repo;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let repo = Repo::open(root).context("failed to load engine config")?;
    let report = repo.status().context("failed to compute status")?;

    if json {
        return print_json(&report);
    }

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    if !report.aggregator_exists {
        println!(
            "Aggregator {} missing: run 'tdd scaffold'",
            report.aggregator_path.display()
        );
    }

    let rows = report
        .tasks
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.symbol.clone(),
                yes_no(t.present),
                yes_no(t.imported),
                yes_no(t.called),
            ]
        })
        .collect();
    print_table(&["TASK", "SYMBOL", "STUB", "IMPORTED", "CALLED"], rows);
    println!();
    println!("{}", report.summary());
    Ok(())
}
