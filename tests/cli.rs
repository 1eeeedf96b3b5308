use std::path::Path;
use std::process::{Command, Output};

fn codemedic(env_file: &Path, api_url: &str, target: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_codemedic"))
        .arg(target)
        .env("CODEMEDIC_ENV_FILE", env_file)
        .env("DEEPSEEK_API_URL", api_url)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1/chat/completions")
}

#[test]
fn help_describes_the_file_argument() {
    let output = Command::new(env!("CARGO_BIN_EXE_codemedic"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Python file to analyze"), "got: {stdout}");
}

#[test]
fn missing_file_argument_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_codemedic"))
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn all_sections_print_even_when_the_endpoint_is_down() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    std::fs::write(&env_file, "# credentials\n\nDEEPSEEK_API_KEY=sk-test\n").unwrap();
    let target = dir.path().join("broken.py");
    std::fs::write(&target, "def f(:\n pass").unwrap();

    let output = codemedic(&env_file, &closed_port_url(), &target);

    assert!(
        output.status.success(),
        "codemedic failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let syntax = stdout.find("=== Syntax Analysis ===").expect("syntax section");
    let lint = stdout.find("=== Static Analysis ===").expect("static section");
    let ai = stdout.find("=== AI-Powered Suggestions ===").expect("ai section");
    assert!(syntax < lint && lint < ai, "sections out of order:\n{stdout}");
    assert!(stdout.contains("Syntax Error:"), "got:\n{stdout}");
    assert!(stdout[ai..].contains("Request Error:"), "got:\n{stdout}");
}

#[test]
fn missing_config_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ok.py");
    std::fs::write(&target, "x = 1\n").unwrap();

    let output = codemedic(&dir.path().join(".env"), &closed_port_url(), &target);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn config_without_api_key_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    std::fs::write(&env_file, "OTHER_KEY=value\n").unwrap();
    let target = dir.path().join("ok.py");
    std::fs::write(&target, "x = 1\n").unwrap();

    let output = codemedic(&env_file, &closed_port_url(), &target);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DEEPSEEK_API_KEY"), "got: {stderr}");
}

#[test]
fn malformed_config_line_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    std::fs::write(&env_file, "DEEPSEEK_API_KEY=sk-test\njust some words\n").unwrap();
    let target = dir.path().join("ok.py");
    std::fs::write(&target, "x = 1\n").unwrap();

    let output = codemedic(&env_file, &closed_port_url(), &target);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn unreadable_target_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    std::fs::write(&env_file, "DEEPSEEK_API_KEY=sk-test\n").unwrap();

    let output = codemedic(&env_file, &closed_port_url(), &dir.path().join("absent.py"));

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
