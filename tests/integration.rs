//! End-to-end tests that spawn the `smd` binary against a generated
//! config and fixture project. The config selects the `hash` embedding
//! provider so no model download or network access is needed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn smd_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("smd");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    // Create test files
    let files_dir = root.join("project");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(
        files_dir.join("util.py"),
        "def add(a, b):\n    return a + b\n",
    )
    .unwrap();
    fs::write(
        files_dir.join("server.rs"),
        "fn handle(request: Request) -> Response {\n    Response::default()\n}\n",
    )
    .unwrap();
    fs::write(
        files_dir.join("notes.txt"),
        "deployment checklist and rollout ordering\n",
    )
    .unwrap();
    fs::write(files_dir.join("diagram.svg"), "<svg></svg>\n").unwrap();

    let config_content = r#"[chunking]
chunk_size = 200
chunk_overlap = 20

[embedding]
provider = "hash"

[server]
bind = "127.0.0.1:7399"
"#;

    let config_path = root.join("sourcemind.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_smd(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = smd_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run smd binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_index_reports_allowlisted_files() {
    let (tmp, config_path) = setup_test_env();
    let project = tmp.path().join("project");

    let (stdout, stderr, success) = run_smd(&config_path, &["index", project.to_str().unwrap()]);
    assert!(success, "index failed: stdout={}, stderr={}", stdout, stderr);
    // Three allow-listed files; the .svg is not indexed.
    assert!(stdout.contains("files indexed: 3"), "stdout: {}", stdout);
    assert!(stdout.contains("skipped: 0"));
    assert!(stdout.contains("ok"));
}

#[test]
fn test_index_missing_path_fails_with_invalid_path() {
    let (tmp, config_path) = setup_test_env();
    let missing = tmp.path().join("does-not-exist");

    let (stdout, stderr, success) = run_smd(&config_path, &["index", missing.to_str().unwrap()]);
    assert!(!success, "expected failure, got: {}", stdout);
    assert!(stderr.contains("invalid path"), "stderr: {}", stderr);
}

#[test]
fn test_index_skips_unreadable_file_and_reports_it() {
    let (tmp, config_path) = setup_test_env();
    let project = tmp.path().join("project");
    fs::write(project.join("bad.py"), [0xff, 0xfe, 0xff, 0x00]).unwrap();

    let (stdout, _, success) = run_smd(&config_path, &["index", project.to_str().unwrap()]);
    assert!(success, "index should not abort on one bad file");
    assert!(stdout.contains("files indexed: 3"), "stdout: {}", stdout);
    assert!(stdout.contains("skipped: 1"));
    assert!(stdout.contains("bad.py"));
}

#[test]
fn test_index_is_deterministic_across_runs() {
    let (tmp, config_path) = setup_test_env();
    let project = tmp.path().join("project");

    let (first, _, _) = run_smd(&config_path, &["index", project.to_str().unwrap()]);
    let (second, _, _) = run_smd(&config_path, &["index", project.to_str().unwrap()]);
    assert_eq!(first, second);
}

#[test]
fn test_defaults_apply_when_config_file_is_missing() {
    let tmp = TempDir::new().unwrap();
    let missing_config = tmp.path().join("nope.toml");

    // `--help` needs no config at all; a real command falls back to
    // defaults, which select the `local` provider. Either the build has
    // that feature (model resolution succeeds and the path error shows) or
    // it does not (a clear feature hint is printed). Both are fine here —
    // the point is that a missing config file is not itself an error.
    let (_, stderr, success) = run_smd(
        &missing_config,
        &["index", tmp.path().join("empty").to_str().unwrap()],
    );
    assert!(!success);
    assert!(
        !stderr.contains("Failed to read config file"),
        "missing config file must fall back to defaults, stderr: {}",
        stderr
    );
}
