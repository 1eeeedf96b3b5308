#![cfg(unix)]

use std::path::Path;

use codemedic_lint::{LintTool, StaticAnalysisRunner};

fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("lint_target.sh");
    std::fs::write(&path, body).unwrap();
    path
}

/// Both tools run `sh <file>`, so the target script stands in for a linter.
fn sh_runner() -> StaticAnalysisRunner {
    StaticAnalysisRunner::new(LintTool::new("Pylint", "sh"), LintTool::new("Flake8", "sh"))
}

#[test]
fn sections_appear_in_order_despite_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    // Run through `sh <file>` so the target prints findings and exits 1,
    // the way a linter does when it has something to report.
    let target = write_script(dir.path(), "echo 'finding: unused import'\nexit 1\n");
    let runner = sh_runner();

    let text = runner.run(&target);

    let first = text.find("Pylint Output:").expect("missing first section");
    let second = text.find("Flake8 Output:").expect("missing second section");
    assert!(first < second, "sections out of order: {text}");
    assert_eq!(text.matches("finding: unused import").count(), 2, "got: {text}");
}

#[test]
fn stderr_used_when_stdout_empty() {
    let dir = tempfile::tempdir().unwrap();
    let target = write_script(dir.path(), "echo 'E902 cannot read' >&2\nexit 2\n");
    let runner = sh_runner();

    let outputs = runner.collect(&target).unwrap();

    assert_eq!(outputs.len(), 2);
    for out in &outputs {
        assert_eq!(out.exit_code, Some(2));
        assert!(out.stdout.is_empty());
        assert_eq!(out.text(), "E902 cannot read\n");
    }
}

#[test]
fn missing_second_tool_suppresses_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let target = write_script(dir.path(), "echo 'should never run'\n");
    let runner = StaticAnalysisRunner::new(
        LintTool::new("Pylint", "sh"),
        LintTool::new("Flake8", "codemedic-no-such-linter"),
    );

    let text = runner.run(&target);

    assert!(text.starts_with("Error: Required tool not found."), "got: {text}");
    assert!(text.contains("codemedic-no-such-linter"));
    assert!(!text.contains("should never run"));
}

#[test]
fn no_extra_arguments_are_passed() {
    let dir = tempfile::tempdir().unwrap();
    let target = write_script(dir.path(), "echo \"args=$#\"\n");
    let runner = StaticAnalysisRunner::new(LintTool::new("A", "sh"), LintTool::new("B", "sh"));

    let text = runner.run(&target);

    assert_eq!(text, "A Output:\nargs=0\n\nB Output:\nargs=0\n");
}
