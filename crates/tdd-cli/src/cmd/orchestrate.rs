use crate::cmd::bootstrap::print_result;
use crate::output::print_json;
use anyhow::{bail, Context};
use std::path::Path;
use tdd_core::repo::Repo;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let repo = Repo::open(root).context("failed to load engine config")?;
    let result = repo.orchestrate().context("failed to run aggregator")?;

    if json {
        print_json(&result)?;
    } else {
        print_result(&result);
    }

    if !result.success() {
        bail!("aggregator exited with {}", result.exit_code);
    }
    Ok(())
}
