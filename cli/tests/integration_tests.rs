use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const GREET_YAML: &str = r#"
version: "1.0"
command:
  name: greet
  description: Print a greeting
  positional:
    - name: name
      required: true
  options:
    - name: verbose
      short: v
      value_type: counter
    - name: count
      short: c
      value_type: integer
      default: "1"
  subcommands:
    - name: list
      aliases: [ls]
      options:
        - name: all
          short: a
          value_type: boolean
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write schema");
    path
}

fn argmatch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_argmatch"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run argmatch")
}

fn parse(schema: &Path, args: &[&str]) -> Output {
    let schema = schema.to_str().unwrap();
    let mut full = vec!["parse", schema, "--"];
    full.extend_from_slice(args);
    argmatch(&full)
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_prints_command_tree() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "greet.yaml", GREET_YAML);

    let output = argmatch(&["check", schema.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(": ok"));
    assert!(stdout.contains("-v, --verbose"));
    assert!(stdout.contains("list (ls)"));
    assert!(stdout.contains("Checked 1 schema document(s)."));
}

#[test]
fn check_reports_structural_error() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "bad.json",
        r#"{"command": {"name": "bad", "options": [
            {"name": "all", "short": "a", "value_type": "boolean"},
            {"name": "any", "short": "a", "value_type": "boolean"}
        ]}}"#,
    );

    let output = argmatch(&["check", schema.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate short form `-a`"));
    assert!(stderr.contains("1 of 1 schema document(s) failed validation"));
}

#[test]
fn check_accepts_directories() {
    let dir = TempDir::new().unwrap();
    write(&dir, "greet.yaml", GREET_YAML);
    write(&dir, "fmt.json", r#"{"command": {"name": "fmt"}}"#);
    write(&dir, "notes.txt", "not a schema");

    let output = argmatch(&["check", "--quiet", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn check_rejects_bad_default() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "jobs.yaml",
        "command:\n  name: jobs\n  options:\n    - name: n\n      value_type: integer\n      default: many\n",
    );

    let output = argmatch(&["check", schema.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid default `many`"));
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_clean_arguments() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "greet.yaml", GREET_YAML);

    let output = parse(&schema, &["-vv", "Alice"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["levels"][0]["command"], "greet");
    assert_eq!(json["levels"][0]["arguments"][0]["name"], "name");
    assert_eq!(json["levels"][0]["arguments"][0]["values"][0], "Alice");
    assert_eq!(json["levels"][0]["arguments"][1]["values"][0], 2);
    assert_eq!(json["levels"][0]["arguments"][2]["values"][0], 1);
    assert_eq!(json["levels"][0]["arguments"][2]["from_default"], true);
    assert_eq!(json["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn parse_subcommand_path() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "greet.yaml", GREET_YAML);

    let output = parse(&schema, &["Bob", "ls", "-a"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    let levels = json["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[1]["command"], "list");
    assert_eq!(levels[1]["arguments"][0]["values"][0], true);
}

#[test]
fn parse_diagnostics_exit_code() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "greet.yaml", GREET_YAML);

    let output = parse(&schema, &["Alice", "Bob", "--count=xyz"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[unrecognized-token]"));
    assert!(stderr.contains("error[invalid-value]"));

    let json = stdout_json(&output);
    let kinds: Vec<_> = json["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["unrecognized-token", "invalid-value"]);
    assert_eq!(json["diagnostics"][0]["token_index"], 1);
}

#[test]
fn parse_warning_config_keeps_success() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "lenient.yaml",
        "parser:\n  unrecognized_severity: warning\ncommand:\n  name: lenient\n",
    );

    let output = parse(&schema, &["--whatever", "extra"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning[unrecognized-token]"));
}

#[test]
fn parse_yaml_output() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "greet.yaml", GREET_YAML);

    let output = argmatch(&[
        "parse",
        "--format",
        "yaml",
        schema.to_str().unwrap(),
        "--",
        "Alice",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("command: greet"));
    assert!(stdout.contains("- Alice"));
}

#[test]
fn parse_custom_type_as_string() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "release.json",
        r#"{"command": {"name": "release", "positional": [
            {"name": "version", "value_type": {"custom": "semver"}, "required": true}
        ]}}"#,
    );

    let output = parse(&schema, &["2.1.0"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["levels"][0]["arguments"][0]["values"][0], "2.1.0");
}

#[test]
fn parse_missing_schema_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.yaml");

    let output = parse(&missing, &["x"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load"));
}

#[test]
fn log_level_enables_debug_output() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "greet.yaml", GREET_YAML);

    let output = argmatch(&[
        "--log-level",
        "debug",
        "parse",
        schema.to_str().unwrap(),
        "--",
        "Alice",
        "ls",
    ]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("descending into subcommand"));
}
