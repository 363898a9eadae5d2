use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use tdd_core::repo::Repo;

// ---------------------------------------------------------------------------
// introduce
// ---------------------------------------------------------------------------

pub fn introduce(root: &Path, json: bool) -> anyhow::Result<()> {
    let repo = Repo::open(root).context("failed to load engine config")?;
    let report = repo.introduce();

    if json {
        return print_json(&report);
    }

    println!("{}", report.message);
    println!("Repo:       {}", report.repo.display());
    if report.checklists.is_empty() {
        println!("Checklists: none");
    } else {
        println!("Checklists:");
        for path in &report.checklists {
            println!("  {}", path.display());
        }
    }
    println!();
    println!("{}", report.instructions);
    Ok(())
}

// ---------------------------------------------------------------------------
// ensure
// ---------------------------------------------------------------------------

pub fn ensure(root: &Path, dry_run: bool, language: Option<&str>, json: bool) -> anyhow::Result<()> {
    let repo = Repo::open(root).context("failed to load engine config")?;
    let report = repo
        .ensure_checklist(dry_run, language)
        .context("failed to ensure checklist")?;

    if json {
        return print_json(&report);
    }

    println!("{}", report.message);
    for path in &report.paths {
        println!("  {}", path.display());
    }
    if let Some(ref content) = report.content {
        println!();
        print!("{content}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

pub fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let repo = Repo::open(root).context("failed to load engine config")?;
    let view = repo.get_checklist().context("failed to load checklist")?;

    if json {
        return print_json(&view);
    }

    println!("Checklist: {}", view.path.display());
    if !view.progress_exists {
        println!("(CHECKLIST.md not written yet: run 'tdd scaffold')");
    }
    println!();
    print!("{}", view.progress_preview);
    Ok(())
}

// ---------------------------------------------------------------------------
// refresh
// ---------------------------------------------------------------------------

pub fn refresh(root: &Path, language: Option<&str>, json: bool) -> anyhow::Result<()> {
    let repo = Repo::open(root).context("failed to load engine config")?;
    let report = repo
        .refresh_checklist(language)
        .context("failed to refresh checklist")?;

    if json {
        return print_json(&report);
    }

    println!(
        "Regenerated {} ({} tasks)",
        report.path.display(),
        report.tasks
    );
    println!("Rewrote {}", report.progress_path.display());
    Ok(())
}
