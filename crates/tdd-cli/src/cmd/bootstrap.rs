use crate::output::print_json;
use anyhow::{bail, Context};
use std::path::Path;
use tdd_core::bootstrap::FocusedTest;
use tdd_core::repo::Repo;
use tdd_core::runner::CommandResult;

pub fn run(
    root: &Path,
    language: Option<&str>,
    test_path: Option<String>,
    test_filter: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let repo = Repo::open(root).context("failed to load engine config")?;
    let report = repo.bootstrap(language, &FocusedTest::new(test_path, test_filter));

    if json {
        print_json(&report)?;
    } else {
        if let Some(ref error) = report.error {
            println!("{error}");
        }
        if report.results.is_empty() && report.error.is_none() {
            println!("No recognised project files: nothing to run");
        }
        for result in &report.results {
            print_result(result);
        }
        if let Some(ref focused) = report.focused {
            println!("Focused run:");
            print_result(focused);
        }
    }

    if !report.ok {
        bail!("bootstrap failed");
    }
    Ok(())
}

pub(crate) fn print_result(result: &CommandResult) {
    println!("$ {}  (exit {})", result.command_line(), result.exit_code);
    if !result.output.is_empty() {
        print!("{}", result.output);
        if !result.output.ends_with('\n') {
            println!();
        }
    }
}
