//! Synthesizes the default three-task checklist for a repository.

use crate::checklist::{Checklist, Metadata, Permissions, Step, Task, CHECKLIST_VERSION};
use crate::config::DEFAULT_LANGUAGE;

pub const BOOTSTRAP_TASK_ID: &str = "bootstrap-deps";
pub const TEST_TASK_ID: &str = "run-tests";
pub const JOB_TASK_ID: &str = "job-from-readme";

/// Inputs to checklist generation.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest<'a> {
    pub repo_name: &'a str,
    /// Excerpt from the README; empty means "none found".
    pub excerpt: &'a str,
    pub language: Option<&'a str>,
}

/// Description used for the job task when the README offers nothing.
pub fn default_job_description(repo_name: &str) -> String {
    format!("Automated job for {repo_name}.")
}

pub fn generate(req: &GenerateRequest<'_>) -> Checklist {
    let job_description = if req.excerpt.is_empty() {
        default_job_description(req.repo_name)
    } else {
        req.excerpt.replace('\n', " ")
    };

    let language = req
        .language
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE);

    Checklist {
        version: CHECKLIST_VERSION,
        metadata: Metadata {
            name: format!("{} Checklist", req.repo_name),
            description: "Tasks for the MCP agent to perform in this repository".to_string(),
            owner: "auto-generated".to_string(),
            default_branch: "main".to_string(),
            default_language: language.to_string(),
        },
        permissions: default_permissions(),
        tasks: vec![
            bootstrap_task(),
            test_task(),
            job_task(job_description),
        ],
    }
}

fn default_permissions() -> Permissions {
    Permissions {
        allow_shell: true,
        allow_git: true,
        allow_file_edits: true,
        shell_whitelist: strings(&["npm", "pnpm", "yarn", "pytest", "go", "make"]),
        edit_path_allowlist: strings(&[
            "src/**",
            "tests/**",
            "README.md",
            "package.json",
            "pyproject.toml",
        ]),
    }
}

fn bootstrap_task() -> Task {
    Task {
        id: BOOTSTRAP_TASK_ID.to_string(),
        title: "Install dependencies".to_string(),
        description: Some("Ensure dependencies are installed for the project language".to_string()),
        steps: vec![
            Step::run_when(file_exists("package.json"), "npm ci"),
            Step::run_when(
                file_exists("pyproject.toml"),
                "pip install -U pip && pip install -e .",
            ),
            Step::run_when(
                file_exists("requirements.txt"),
                "pip install -U pip && pip install -r requirements.txt",
            ),
            Step::run_when(file_exists("go.mod"), "go mod download"),
        ],
        success_criteria: strings(&["No non-zero exit codes from install steps"]),
    }
}

fn test_task() -> Task {
    Task {
        id: TEST_TASK_ID.to_string(),
        title: "Run test suite".to_string(),
        description: Some("Execute tests to validate current state".to_string()),
        steps: vec![
            Step::run_when(file_exists("package.json"), "npm test --silent"),
            Step::run_when(
                format!("{} or {}", file_exists("pyproject.toml"), file_exists("pytest.ini")),
                "pytest -q",
            ),
            Step::run_when(file_exists("go.mod"), "go test ./..."),
        ],
        success_criteria: strings(&["All tests pass (zero failures)", "Process exit code == 0"]),
    }
}

fn job_task(description: String) -> Task {
    Task {
        id: JOB_TASK_ID.to_string(),
        title: "Execute the primary job described in README".to_string(),
        description: Some(description),
        steps: vec![
            Step::Read {
                read: crate::paths::README_MD.to_string(),
            },
            Step::Parse {
                parse: "mcp_section(\"MCP Job\")".to_string(),
            },
            Step::run("echo \"Executing job steps...\""),
        ],
        success_criteria: strings(&[
            "Marked completion condition in README achieved",
            "Exit code == 0",
        ]),
    }
}

fn file_exists(name: &str) -> String {
    format!("file_exists(\"{name}\")")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_fixed_tasks_in_order() {
        let checklist = generate(&GenerateRequest {
            repo_name: "widget",
            ..Default::default()
        });
        let ids: Vec<&str> = checklist.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, [BOOTSTRAP_TASK_ID, TEST_TASK_ID, JOB_TASK_ID]);
        assert_eq!(checklist.version, 1);
        assert_eq!(checklist.metadata.name, "widget Checklist");
        assert_eq!(checklist.metadata.default_language, "python");
    }

    #[test]
    fn missing_excerpt_uses_default_description() {
        let checklist = generate(&GenerateRequest {
            repo_name: "widget",
            ..Default::default()
        });
        assert_eq!(
            checklist.tasks[2].description.as_deref(),
            Some("Automated job for widget.")
        );
    }

    #[test]
    fn excerpt_newlines_are_flattened() {
        let checklist = generate(&GenerateRequest {
            repo_name: "widget",
            excerpt: "Build it.\nShip it.",
            language: Some("go"),
        });
        assert_eq!(
            checklist.tasks[2].description.as_deref(),
            Some("Build it. Ship it.")
        );
        assert_eq!(checklist.metadata.default_language, "go");
    }

    #[test]
    fn generated_yaml_parses_back() {
        let checklist = generate(&GenerateRequest {
            repo_name: "widget",
            excerpt: "Do: the \"thing\" # now",
            language: None,
        });
        let yaml = checklist.to_yaml().unwrap();
        assert_eq!(Checklist::from_yaml(&yaml).unwrap(), checklist);
    }

    #[test]
    fn bootstrap_steps_are_gated_on_manifests() {
        let checklist = generate(&GenerateRequest {
            repo_name: "w",
            ..Default::default()
        });
        let first = &checklist.tasks[0].steps[0];
        assert_eq!(*first, Step::run_when("file_exists(\"package.json\")", "npm ci"));
    }
}
