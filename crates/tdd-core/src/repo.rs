//! Repository-level operations: the surface the CLI and HTTP server call.
//!
//! Each operation returns a serializable report so both front ends render
//! the same data.

use crate::bootstrap::{BootstrapReport, FocusedTest, Orchestrator};
use crate::checklist::Checklist;
use crate::config::EngineConfig;
use crate::error::{Result, TddError};
use crate::generator::{self, GenerateRequest};
use crate::paths;
use crate::progress::{self, MarkOutcome};
use crate::readme;
use crate::runner::{CommandResult, CommandRunner, PathLocator, SystemRunner, ToolLocator};
use crate::scaffold::{self, ScaffoldOutcome};
use crate::status::{self, StatusReport};
use crate::store;
use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct IntroduceReport {
    pub message: String,
    pub repo: PathBuf,
    pub checklists: Vec<PathBuf>,
    pub has_checklist: bool,
    pub instructions: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnsureReport {
    pub created: bool,
    /// Existing checklists when `created` is false.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathBuf>,
    /// Where the new checklist was (or, on a dry run, would be) written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub dry_run: bool,
    /// Generated YAML, returned on dry runs only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistView {
    pub path: PathBuf,
    pub checklist: Checklist,
    /// What `CHECKLIST.md` would contain if rendered now.
    pub progress_preview: String,
    pub progress_exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub path: PathBuf,
    pub progress_path: PathBuf,
    pub tasks: usize,
}

// ---------------------------------------------------------------------------
// Repo
// ---------------------------------------------------------------------------

/// A repository being onboarded, with its engine config loaded.
#[derive(Debug, Clone)]
pub struct Repo {
    root: PathBuf,
    config: EngineConfig,
}

impl Repo {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = EngineConfig::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn with_config(root: impl Into<PathBuf>, config: EngineConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn introduce(&self) -> IntroduceReport {
        let checklists = store::find_checklists(&self.root);
        IntroduceReport {
            message: "Hello from the TDD checklist engine. I can manage checklists and kick off TDD."
                .to_string(),
            repo: self.root.clone(),
            has_checklist: !checklists.is_empty(),
            checklists,
            instructions:
                "Use ensure-checklist to create one if missing, scaffold to generate task stubs, or bootstrap to install and test."
                    .to_string(),
        }
    }

    /// Build the default checklist from the README and repository name.
    pub fn generate(&self, language: Option<&str>) -> Checklist {
        let readme = crate::io::read_or_empty(&paths::readme_path(&self.root));
        let excerpt = readme::extract_job_section(&readme);
        let repo_name = paths::repo_name(&self.root);
        let language = language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(self.config.default_language.as_str());
        generator::generate(&GenerateRequest {
            repo_name: &repo_name,
            excerpt: &excerpt,
            language: Some(language),
        })
    }

    /// Create a checklist unless one already exists.
    pub fn ensure_checklist(&self, dry_run: bool, language: Option<&str>) -> Result<EnsureReport> {
        let found = store::find_checklists(&self.root);
        if !found.is_empty() {
            return Ok(EnsureReport {
                created: false,
                message: format!("Found {} checklist(s)", found.len()),
                paths: found,
                path: None,
                dry_run,
                content: None,
            });
        }

        let yaml = self.generate(language).to_yaml()?;
        let out_path = paths::checklist_path(&self.root);
        if dry_run {
            return Ok(EnsureReport {
                created: true,
                paths: Vec::new(),
                message: format!("Would write {}", out_path.display()),
                path: Some(out_path),
                dry_run: true,
                content: Some(yaml),
            });
        }

        let path = store::save_yaml(&self.root, &yaml)?;
        Ok(EnsureReport {
            created: true,
            paths: Vec::new(),
            message: format!("Wrote {}", path.display()),
            path: Some(path),
            dry_run: false,
            content: None,
        })
    }

    pub fn load_checklist(&self) -> Result<Checklist> {
        Ok(store::load(&self.root)?.checklist)
    }

    pub fn get_checklist(&self) -> Result<ChecklistView> {
        let loaded = store::load(&self.root)?;
        Ok(ChecklistView {
            progress_preview: progress::render(&loaded.checklist),
            progress_exists: paths::progress_path(&self.root).is_file(),
            path: loaded.path,
            checklist: loaded.checklist,
        })
    }

    /// Regenerate the checklist from scratch, overwriting the canonical file,
    /// and re-render the progress document.
    pub fn refresh_checklist(&self, language: Option<&str>) -> Result<RefreshReport> {
        let checklist = self.generate(language);
        let path = store::save(&self.root, &checklist)?;
        let progress_path = progress::write(&self.root, &checklist)?;
        Ok(RefreshReport {
            path,
            progress_path,
            tasks: checklist.tasks.len(),
        })
    }

    pub fn scaffold(&self) -> Result<ScaffoldOutcome> {
        let checklist = self.load_checklist()?;
        scaffold::scaffold(&self.root, &checklist)
    }

    pub fn status(&self) -> Result<StatusReport> {
        let checklist = self.load_checklist()?;
        Ok(status::status(&self.root, &checklist))
    }

    pub fn mark(&self, task_id: &str, checked: bool) -> Result<MarkOutcome> {
        progress::mark(&self.root, task_id, checked)
    }

    pub fn bootstrap(&self, language: Option<&str>, focused: &FocusedTest) -> BootstrapReport {
        self.bootstrap_with(&SystemRunner, &PathLocator, language, focused)
    }

    pub fn bootstrap_with(
        &self,
        runner: &dyn CommandRunner,
        locator: &dyn ToolLocator,
        language: Option<&str>,
        focused: &FocusedTest,
    ) -> BootstrapReport {
        Orchestrator::new(&self.root, runner, locator, self.config.command_timeout())
            .run(language, focused)
    }

    /// Run the generated aggregator as `python -m mcp_jobs.main`.
    pub fn orchestrate(&self) -> Result<CommandResult> {
        self.orchestrate_with(&SystemRunner, &PathLocator)
    }

    pub fn orchestrate_with(
        &self,
        runner: &dyn CommandRunner,
        locator: &dyn ToolLocator,
    ) -> Result<CommandResult> {
        if !paths::aggregator_path(&self.root).is_file() {
            return Err(TddError::AggregatorNotFound);
        }
        let python = ["python3", "python"]
            .into_iter()
            .find(|p| locator.is_available(p))
            .ok_or(TddError::NoInterpreter)?;
        let argv = vec![
            python.to_string(),
            "-m".to_string(),
            paths::aggregator_module(),
        ];
        Ok(runner.run(&argv, &self.root, self.config.command_timeout()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;
    use tempfile::TempDir;

    fn repo_dir(name: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(name);
        std::fs::create_dir_all(&root).unwrap();
        (dir, root)
    }

    #[test]
    fn ensure_without_readme_uses_default_description() {
        let (_dir, root) = repo_dir("widget");
        let repo = Repo::open(&root).unwrap();
        let report = repo.ensure_checklist(false, None).unwrap();
        assert!(report.created);
        assert_eq!(report.path.as_deref(), Some(root.join(".mcp/checklist.yaml").as_path()));

        let checklist = repo.load_checklist().unwrap();
        assert_eq!(
            checklist.tasks[2].description.as_deref(),
            Some("Automated job for widget.")
        );
    }

    #[test]
    fn ensure_uses_mcp_job_section() {
        let (_dir, root) = repo_dir("widget");
        std::fs::write(root.join("README.md"), "# Widget\n\n## MCP Job\nDo the thing.\n").unwrap();
        let repo = Repo::open(&root).unwrap();
        repo.ensure_checklist(false, None).unwrap();
        assert_eq!(
            repo.load_checklist().unwrap().tasks[2].description.as_deref(),
            Some("Do the thing.")
        );
    }

    #[test]
    fn ensure_is_a_no_op_when_checklist_exists() {
        let (_dir, root) = repo_dir("widget");
        let repo = Repo::open(&root).unwrap();
        repo.ensure_checklist(false, Some("go")).unwrap();
        let again = repo.ensure_checklist(false, None).unwrap();
        assert!(!again.created);
        assert_eq!(again.paths.len(), 1);
        assert_eq!(repo.load_checklist().unwrap().metadata.default_language, "go");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (_dir, root) = repo_dir("widget");
        let repo = Repo::open(&root).unwrap();
        let report = repo.ensure_checklist(true, None).unwrap();
        assert!(report.dry_run);
        assert!(report.content.unwrap().contains("job-from-readme"));
        assert!(!root.join(".mcp").exists());
    }

    #[test]
    fn config_default_language_feeds_generation() {
        let (_dir, root) = repo_dir("widget");
        let repo = Repo::with_config(
            &root,
            EngineConfig {
                default_language: "rust".into(),
                ..EngineConfig::default()
            },
        );
        assert_eq!(repo.generate(None).metadata.default_language, "rust");
        assert_eq!(repo.generate(Some("java")).metadata.default_language, "java");
    }

    #[test]
    fn introduce_reports_presence() {
        let (_dir, root) = repo_dir("widget");
        let repo = Repo::open(&root).unwrap();
        assert!(!repo.introduce().has_checklist);
        repo.ensure_checklist(false, None).unwrap();
        let intro = repo.introduce();
        assert!(intro.has_checklist);
        assert_eq!(intro.checklists, [root.join(".mcp/checklist.yaml")]);
    }

    #[test]
    fn operations_without_checklist_fail_structurally() {
        let (_dir, root) = repo_dir("widget");
        let repo = Repo::open(&root).unwrap();
        assert!(matches!(repo.scaffold(), Err(TddError::ChecklistNotFound)));
        assert!(matches!(repo.status(), Err(TddError::ChecklistNotFound)));
        assert!(matches!(repo.get_checklist(), Err(TddError::ChecklistNotFound)));
        assert!(matches!(repo.mark("x", true), Err(TddError::ProgressNotFound)));
    }

    #[test]
    fn refresh_overwrites_and_renders() {
        let (_dir, root) = repo_dir("widget");
        let repo = Repo::open(&root).unwrap();
        repo.ensure_checklist(false, None).unwrap();
        std::fs::write(root.join("README.md"), "## MCP Job\nNew job.\n").unwrap();
        let report = repo.refresh_checklist(None).unwrap();
        assert_eq!(report.tasks, 3);
        assert_eq!(
            repo.load_checklist().unwrap().tasks[2].description.as_deref(),
            Some("New job.")
        );
        let doc = std::fs::read_to_string(report.progress_path).unwrap();
        assert!(doc.contains("(job-from-readme)"));
    }

    #[test]
    fn scaffold_status_mark_flow() {
        let (_dir, root) = repo_dir("widget");
        let repo = Repo::open(&root).unwrap();
        repo.ensure_checklist(false, None).unwrap();
        let outcome = repo.scaffold().unwrap();
        assert_eq!(outcome.created_files.len(), 5);

        let report = repo.status().unwrap();
        assert!(report.tasks.iter().all(|t| t.is_wired()));

        let marked = repo.mark("run-tests", true).unwrap();
        assert!(marked.changed);
        let doc = std::fs::read_to_string(root.join("CHECKLIST.md")).unwrap();
        assert!(doc.contains("- [x] Run test suite (run-tests)"));

        let view = repo.get_checklist().unwrap();
        assert!(view.progress_exists);
        assert!(view.progress_preview.contains("- [ ] Run test suite (run-tests)"));
    }

    struct RecordingRunner(RefCell<Vec<Vec<String>>>);

    impl CommandRunner for RecordingRunner {
        fn run(&self, argv: &[String], _cwd: &Path, _timeout: Duration) -> CommandResult {
            self.0.borrow_mut().push(argv.to_vec());
            CommandResult {
                command: argv.to_vec(),
                exit_code: 0,
                output: "ok\n".into(),
            }
        }
    }

    struct Only(&'static str);

    impl ToolLocator for Only {
        fn is_available(&self, program: &str) -> bool {
            program == self.0
        }
    }

    #[test]
    fn orchestrate_runs_aggregator_module() {
        let (_dir, root) = repo_dir("widget");
        let repo = Repo::open(&root).unwrap();
        let runner = RecordingRunner(RefCell::new(Vec::new()));
        assert!(matches!(
            repo.orchestrate_with(&runner, &Only("python")),
            Err(TddError::AggregatorNotFound)
        ));

        repo.ensure_checklist(false, None).unwrap();
        repo.scaffold().unwrap();
        let result = repo.orchestrate_with(&runner, &Only("python")).unwrap();
        assert_eq!(result.output, "ok\n");
        assert_eq!(runner.0.borrow()[0], ["python", "-m", "mcp_jobs.main"]);

        assert!(matches!(
            repo.orchestrate_with(&runner, &Only("ruby")),
            Err(TddError::NoInterpreter)
        ));
    }
}
