use serde::{Deserialize, Serialize};
use std::fmt;

pub const CHECKLIST_VERSION: u32 = 1;
pub const DEFAULT_TASK_ID: &str = "unnamed-task";

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One declarative step of a task. Steps are descriptive: the engine renders
/// them but never executes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// Shell command, optionally gated on a `when` predicate such as
    /// `file_exists("go.mod")`.
    Run {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        when: Option<String>,
        run: String,
    },
    Read {
        read: String,
    },
    Parse {
        parse: String,
    },
    /// Any shape the engine does not recognise, kept verbatim.
    Other(serde_yaml::Value),
}

impl Step {
    pub fn run(command: impl Into<String>) -> Self {
        Step::Run {
            when: None,
            run: command.into(),
        }
    }

    pub fn run_when(predicate: impl Into<String>, command: impl Into<String>) -> Self {
        Step::Run {
            when: Some(predicate.into()),
            run: command.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Step::Run { .. } => "run",
            Step::Read { .. } => "read",
            Step::Parse { .. } => "parse",
            Step::Other(_) => "step",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Run {
                when: Some(when),
                run,
            } => write!(f, "run: {run} (when {when})"),
            Step::Run { when: None, run } => write!(f, "run: {run}"),
            Step::Read { read } => write!(f, "read: {read}"),
            Step::Parse { parse } => write!(f, "parse: {parse}"),
            Step::Other(_) => f.write_str("step"),
        }
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "default_task_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
}

fn default_task_id() -> String {
    DEFAULT_TASK_ID.to_string()
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            steps: Vec::new(),
            success_criteria: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata / Permissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_language() -> String {
    crate::config::DEFAULT_LANGUAGE.to_string()
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            owner: String::new(),
            default_branch: String::new(),
            default_language: default_language(),
        }
    }
}

/// What the executing agent may do in the repository. Descriptive only:
/// nothing in this crate checks these flags.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub allow_shell: bool,
    #[serde(default)]
    pub allow_git: bool,
    #[serde(default)]
    pub allow_file_edits: bool,
    #[serde(default)]
    pub shell_whitelist: Vec<String>,
    #[serde(default)]
    pub edit_path_allowlist: Vec<String>,
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

fn default_version() -> u32 {
    CHECKLIST_VERSION
}

impl Checklist {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            version: CHECKLIST_VERSION,
            metadata,
            permissions: Permissions::default(),
            tasks: Vec::new(),
        }
    }

    pub fn from_yaml(data: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(data)?)
    }

    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// First task with the given id, in checklist order.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
