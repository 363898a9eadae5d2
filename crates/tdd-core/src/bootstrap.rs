//! Per-language bootstrap-and-test recipes.
//!
//! A declared language runs exactly one recipe, gated up front on the tools
//! or manifests it needs. Without a declared language, every ecosystem whose
//! manifest is present fires in a fixed order. Once a sequence starts every
//! command in it is issued; only the final aggregation decides `ok`.

use crate::language::Language;
use crate::runner::{argv, CommandResult, CommandRunner, ToolLocator};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Request / report
// ---------------------------------------------------------------------------

/// Optional narrowed test run appended after the base sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusedTest {
    pub path: Option<String>,
    pub filter: Option<String>,
}

impl FocusedTest {
    pub fn new(path: Option<String>, filter: Option<String>) -> Self {
        let clean = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            path: clean(path),
            filter: clean(filter),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.filter.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub ok: bool,
    pub results: Vec<CommandResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The focused re-run, reported apart from `results`; never affects `ok`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused: Option<CommandResult>,
    /// Recipes that ran, in order.
    pub languages: Vec<Language>,
}

impl BootstrapReport {
    fn precondition_failed(language: Language, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            results: Vec::new(),
            error: Some(error.into()),
            focused: None,
            languages: vec![language],
        }
    }
}

/// True iff every command exited 0. Vacuously true for no commands.
pub fn aggregate_ok(results: &[CommandResult]) -> bool {
    results.iter().all(CommandResult::success)
}

/// Which test tool a focused run goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusTarget {
    Pytest,
    Npm,
    Go,
    Cargo,
    Maven,
    Gradle,
}

impl FocusTarget {
    fn command(self, focus: &FocusedTest) -> Vec<String> {
        let path = focus.path.as_deref();
        let filter = focus.filter.as_deref();
        let mut cmd: Vec<String>;
        match self {
            FocusTarget::Pytest => {
                cmd = argv(&["pytest", "-q"]);
                cmd.extend(path.map(String::from));
                if let Some(f) = filter {
                    cmd.extend(argv(&["-k", f]));
                }
            }
            FocusTarget::Npm => {
                cmd = argv(&["npm", "test", "--silent", "--"]);
                cmd.extend(path.map(String::from));
                if let Some(f) = filter {
                    cmd.extend(argv(&["-t", f]));
                }
            }
            FocusTarget::Go => {
                cmd = argv(&["go", "test", path.unwrap_or("./...")]);
                if let Some(f) = filter {
                    cmd.extend(argv(&["-run", f]));
                }
            }
            FocusTarget::Cargo => {
                cmd = argv(&["cargo", "test"]);
                if let Some(p) = path {
                    cmd.extend(argv(&["--test", p]));
                }
                cmd.extend(filter.map(String::from));
            }
            FocusTarget::Maven => {
                let selector = filter.or(path).unwrap_or_default();
                cmd = argv(&["mvn", "-q", "test"]);
                cmd.push(format!("-Dtest={selector}"));
            }
            FocusTarget::Gradle => {
                let selector = filter.or(path).unwrap_or_default();
                cmd = argv(&["gradle", "test", "--tests", selector]);
            }
        }
        cmd
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct Orchestrator<'a> {
    root: &'a Path,
    runner: &'a dyn CommandRunner,
    locator: &'a dyn ToolLocator,
    timeout: Duration,
}

/// Commands issued by one recipe plus where a focused run should go.
struct Plan {
    results: Vec<CommandResult>,
    focus: Option<FocusTarget>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        root: &'a Path,
        runner: &'a dyn CommandRunner,
        locator: &'a dyn ToolLocator,
        timeout: Duration,
    ) -> Self {
        Self {
            root,
            runner,
            locator,
            timeout,
        }
    }

    pub fn run(&self, language: Option<&str>, focused: &FocusedTest) -> BootstrapReport {
        let declared = language.unwrap_or_default();
        let (plans, languages) = match Language::from_key(declared) {
            Some(lang) => match self.declared(lang) {
                Ok(plan) => (vec![plan], vec![lang]),
                Err(error) => {
                    tracing::info!(language = %lang, %error, "precondition failed");
                    return BootstrapReport::precondition_failed(lang, error);
                }
            },
            None => {
                if !declared.trim().is_empty() {
                    tracing::warn!(language = declared, "unknown language, auto-detecting");
                }
                self.auto_detect()
            }
        };

        let focus_target = plans.iter().find_map(|p| p.focus);
        let results: Vec<CommandResult> = plans.into_iter().flat_map(|p| p.results).collect();
        let ok = aggregate_ok(&results);

        let focused_result = match focus_target {
            Some(target) if !focused.is_empty() => Some(self.exec(&target.command(focused))),
            _ => None,
        };

        BootstrapReport {
            ok,
            results,
            error: None,
            focused: focused_result,
            languages,
        }
    }

    fn exec(&self, cmd: &[String]) -> CommandResult {
        self.runner.run(cmd, self.root, self.timeout)
    }

    fn has_file(&self, name: &str) -> bool {
        self.root.join(name).exists()
    }

    fn has_tool(&self, program: &str) -> bool {
        self.locator.is_available(program)
    }

    fn declared(&self, lang: Language) -> std::result::Result<Plan, String> {
        match lang {
            Language::Python => Ok(self.python()),
            Language::Node => {
                if !self.has_tool("npm") {
                    return Err("npm not available in container".to_string());
                }
                Ok(self.node())
            }
            Language::Go => {
                if !self.has_file("go.mod") {
                    return Err("go.mod not found in repository".to_string());
                }
                Ok(self.go())
            }
            Language::Rust => {
                if !self.has_tool("cargo") {
                    return Err("cargo not available in container".to_string());
                }
                Ok(Plan {
                    results: vec![self.exec(&argv(&["cargo", "test"]))],
                    focus: Some(FocusTarget::Cargo),
                })
            }
            Language::Java => {
                if !self.has_tool("mvn") && !self.has_tool("gradle") {
                    return Err(
                        "Java build tool (mvn/gradle) not available in container".to_string()
                    );
                }
                Ok(self.java())
            }
            Language::Cpp => Err("C++ flow not implemented in container".to_string()),
        }
    }

    fn auto_detect(&self) -> (Vec<Plan>, Vec<Language>) {
        let mut plans = Vec::new();
        let mut languages = Vec::new();
        if self.has_file("package.json") && self.has_tool("npm") {
            plans.push(self.node());
            languages.push(Language::Node);
        }
        if self.has_file("pyproject.toml") || self.has_file("requirements.txt") {
            plans.push(self.python());
            languages.push(Language::Python);
        }
        if self.has_file("go.mod") {
            plans.push(self.go());
            languages.push(Language::Go);
        }
        tracing::debug!(?languages, "auto-detected ecosystems");
        (plans, languages)
    }

    fn python(&self) -> Plan {
        let mut results = vec![self.exec(&argv(&["pip", "install", "-U", "pip"]))];
        if self.has_file("pyproject.toml") {
            results.push(self.exec(&argv(&["pip", "install", "-e", "."])));
        } else if self.has_file("requirements.txt") {
            results.push(self.exec(&argv(&["pip", "install", "-r", "requirements.txt"])));
        }
        if self.has_tool("pytest") {
            results.push(self.exec(&argv(&["pytest", "-q"])));
        }
        Plan {
            results,
            focus: Some(FocusTarget::Pytest),
        }
    }

    fn node(&self) -> Plan {
        if !self.has_file("package.json") {
            return Plan {
                results: Vec::new(),
                focus: None,
            };
        }
        Plan {
            results: vec![
                self.exec(&argv(&["npm", "ci"])),
                self.exec(&argv(&["npm", "test", "--silent"])),
            ],
            focus: Some(FocusTarget::Npm),
        }
    }

    fn go(&self) -> Plan {
        Plan {
            results: vec![
                self.exec(&argv(&["go", "mod", "download"])),
                self.exec(&argv(&["go", "test", "./..."])),
            ],
            focus: Some(FocusTarget::Go),
        }
    }

    fn java(&self) -> Plan {
        if self.has_file("pom.xml") {
            Plan {
                results: vec![self.exec(&argv(&["mvn", "-q", "-DskipTests=false", "test"]))],
                focus: Some(FocusTarget::Maven),
            }
        } else if self.has_file("build.gradle") || self.has_file("build.gradle.kts") {
            Plan {
                results: vec![self.exec(&argv(&["gradle", "test"]))],
                focus: Some(FocusTarget::Gradle),
            }
        } else {
            Plan {
                results: Vec::new(),
                focus: None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Records every command and answers with a scripted exit code.
    #[derive(Default)]
    struct FakeRunner {
        calls: RefCell<Vec<String>>,
        codes: HashMap<String, i32>,
    }

    impl FakeRunner {
        fn failing(cmd: &str, code: i32) -> Self {
            let mut codes = HashMap::new();
            codes.insert(cmd.to_string(), code);
            Self {
                codes,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, argv: &[String], _cwd: &Path, _timeout: Duration) -> CommandResult {
            let line = argv.join(" ");
            self.calls.borrow_mut().push(line.clone());
            CommandResult {
                command: argv.to_vec(),
                exit_code: self.codes.get(&line).copied().unwrap_or(0),
                output: String::new(),
            }
        }
    }

    struct Tools(&'static [&'static str]);

    impl ToolLocator for Tools {
        fn is_available(&self, program: &str) -> bool {
            self.0.contains(&program)
        }
    }

    fn repo_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for f in files {
            std::fs::write(dir.path().join(f), "").unwrap();
        }
        dir
    }

    fn run(
        dir: &TempDir,
        runner: &FakeRunner,
        tools: &Tools,
        language: Option<&str>,
        focus: FocusedTest,
    ) -> BootstrapReport {
        Orchestrator::new(dir.path(), runner, tools, Duration::from_secs(1)).run(language, &focus)
    }

    #[test]
    fn rust_without_cargo_issues_nothing() {
        let dir = repo_with(&["Cargo.toml"]);
        let runner = FakeRunner::default();
        let report = run(&dir, &runner, &Tools(&[]), Some("rust"), FocusedTest::default());
        assert!(!report.ok);
        assert!(report.results.is_empty());
        assert_eq!(report.error.as_deref(), Some("cargo not available in container"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn cpp_is_never_implemented() {
        let dir = repo_with(&[]);
        let runner = FakeRunner::default();
        let report = run(&dir, &runner, &Tools(&["g++", "make"]), Some("c++"), FocusedTest::default());
        assert!(!report.ok);
        assert!(report.error.unwrap().contains("not implemented"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn python_prefers_pyproject() {
        let dir = repo_with(&["pyproject.toml", "requirements.txt"]);
        let runner = FakeRunner::default();
        let report = run(&dir, &runner, &Tools(&["pytest"]), Some("py"), FocusedTest::default());
        assert!(report.ok);
        assert_eq!(
            runner.calls(),
            ["pip install -U pip", "pip install -e .", "pytest -q"]
        );
    }

    #[test]
    fn python_without_pytest_skips_test_run() {
        let dir = repo_with(&["requirements.txt"]);
        let runner = FakeRunner::default();
        run(&dir, &runner, &Tools(&[]), Some("python"), FocusedTest::default());
        assert_eq!(
            runner.calls(),
            ["pip install -U pip", "pip install -r requirements.txt"]
        );
    }

    #[test]
    fn node_requires_npm() {
        let dir = repo_with(&["package.json"]);
        let runner = FakeRunner::default();
        let report = run(&dir, &runner, &Tools(&[]), Some("node"), FocusedTest::default());
        assert!(!report.ok);
        assert!(runner.calls().is_empty());

        let report = run(&dir, &runner, &Tools(&["npm"]), Some("js"), FocusedTest::default());
        assert!(report.ok);
        assert_eq!(runner.calls(), ["npm ci", "npm test --silent"]);
    }

    #[test]
    fn go_requires_manifest() {
        let dir = repo_with(&[]);
        let runner = FakeRunner::default();
        let report = run(&dir, &runner, &Tools(&["go"]), Some("golang"), FocusedTest::default());
        assert!(!report.ok);
        assert!(report.error.unwrap().contains("go.mod"));
    }

    #[test]
    fn java_picks_maven_before_gradle() {
        let dir = repo_with(&["pom.xml", "build.gradle"]);
        let runner = FakeRunner::default();
        run(&dir, &runner, &Tools(&["mvn", "gradle"]), Some("java"), FocusedTest::default());
        assert_eq!(runner.calls(), ["mvn -q -DskipTests=false test"]);

        let dir = repo_with(&["build.gradle.kts"]);
        let runner = FakeRunner::default();
        run(&dir, &runner, &Tools(&["gradle"]), Some("java"), FocusedTest::default());
        assert_eq!(runner.calls(), ["gradle test"]);
    }

    #[test]
    fn failure_in_sequence_does_not_stop_later_commands() {
        let dir = repo_with(&["go.mod"]);
        let runner = FakeRunner::failing("go mod download", 1);
        let report = run(&dir, &runner, &Tools(&[]), Some("go"), FocusedTest::default());
        assert!(!report.ok);
        assert_eq!(report.results.len(), 2);
        assert_eq!(runner.calls(), ["go mod download", "go test ./..."]);
    }

    #[test]
    fn infra_failure_flips_ok() {
        let dir = repo_with(&[]);
        let runner = FakeRunner::failing("cargo test", -1);
        let report = run(&dir, &runner, &Tools(&["cargo"]), Some("rust"), FocusedTest::default());
        assert!(!report.ok);
    }

    #[test]
    fn auto_detect_fires_every_present_ecosystem() {
        let dir = repo_with(&["package.json", "requirements.txt", "go.mod"]);
        let runner = FakeRunner::default();
        let report = run(&dir, &runner, &Tools(&["npm"]), None, FocusedTest::default());
        assert!(report.ok);
        assert_eq!(
            report.languages,
            [Language::Node, Language::Python, Language::Go]
        );
        assert_eq!(
            runner.calls(),
            [
                "npm ci",
                "npm test --silent",
                "pip install -U pip",
                "pip install -r requirements.txt",
                "go mod download",
                "go test ./...",
            ]
        );
    }

    #[test]
    fn auto_detect_skips_node_without_npm() {
        let dir = repo_with(&["package.json"]);
        let runner = FakeRunner::default();
        let report = run(&dir, &runner, &Tools(&[]), Some(""), FocusedTest::default());
        assert!(report.ok, "vacuously ok");
        assert!(report.results.is_empty());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn unknown_language_falls_back_to_detection() {
        let dir = repo_with(&["go.mod"]);
        let runner = FakeRunner::default();
        let report = run(&dir, &runner, &Tools(&[]), Some("cobol"), FocusedTest::default());
        assert_eq!(report.languages, [Language::Go]);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn focused_run_is_separate_from_ok() {
        let dir = repo_with(&["pyproject.toml"]);
        let runner = FakeRunner::failing("pytest -q tests/test_api.py -k login", 1);
        let focus = FocusedTest::new(Some("tests/test_api.py".into()), Some("login".into()));
        let report = run(&dir, &runner, &Tools(&[]), Some("python"), focus);
        assert!(report.ok);
        let focused = report.focused.unwrap();
        assert_eq!(focused.exit_code, 1);
        assert_eq!(report.results.len(), 2);
    }

    #[test]
    fn no_focused_run_when_precondition_fails() {
        let dir = repo_with(&[]);
        let runner = FakeRunner::default();
        let focus = FocusedTest::new(None, Some("it_works".into()));
        let report = run(&dir, &runner, &Tools(&[]), Some("rust"), focus);
        assert!(report.focused.is_none());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn focused_commands_per_tool() {
        let both = FocusedTest::new(Some("pkg/x".into()), Some("TestX".into()));
        assert_eq!(
            FocusTarget::Go.command(&both).join(" "),
            "go test pkg/x -run TestX"
        );
        assert_eq!(
            FocusTarget::Npm.command(&both).join(" "),
            "npm test --silent -- pkg/x -t TestX"
        );
        assert_eq!(
            FocusTarget::Cargo.command(&both).join(" "),
            "cargo test --test pkg/x TestX"
        );
        assert_eq!(
            FocusTarget::Maven.command(&both).join(" "),
            "mvn -q test -Dtest=TestX"
        );
        let filter_only = FocusedTest::new(None, Some("TestX".into()));
        assert_eq!(
            FocusTarget::Go.command(&filter_only).join(" "),
            "go test ./... -run TestX"
        );
        assert_eq!(
            FocusTarget::Gradle.command(&filter_only).join(" "),
            "gradle test --tests TestX"
        );
    }

    #[test]
    fn blank_focus_values_are_ignored() {
        assert!(FocusedTest::new(Some("  ".into()), Some(String::new())).is_empty());
    }

    #[test]
    fn aggregation_rule() {
        let ok = CommandResult {
            command: vec![],
            exit_code: 0,
            output: String::new(),
        };
        let bad = CommandResult {
            exit_code: 2,
            ..ok.clone()
        };
        assert!(aggregate_ok(&[]));
        assert!(aggregate_ok(&[ok.clone(), ok.clone()]));
        assert!(!aggregate_ok(&[ok, bad]));
    }
}
