use assert_cmd::Command;
use std::fs;

fn cobie_filter() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cobie-filter"))
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is UTF-8")
}

#[test]
fn help_lists_subcommands() {
    let output = cobie_filter().arg("--help").output().unwrap();

    assert!(output.status.success(), "--help should succeed");
    assert!(output.stderr.is_empty(), "help output should not write to stderr");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Usage:"));
    for subcommand in ["dump", "check", "name"] {
        assert!(stdout.contains(subcommand), "help should list {subcommand}");
    }
}

#[test]
fn without_subcommand_shows_usage_and_fails() {
    let output = cobie_filter().output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Usage:"));
}

#[test]
fn check_prints_one_verdict_per_entity() {
    let output = cobie_filter()
        .args(["check", "--kind", "asset", "IfcWall", "IfcWindow"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "IfcWall\texcluded\nIfcWindow\tincluded\n");
}

#[test]
fn dumped_json_is_accepted_as_config() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("filters.json");

    let dump = cobie_filter().arg("dump").output().unwrap();
    assert!(dump.status.success());
    fs::write(&json, &dump.stdout).unwrap();
    let restored = filters::FilterSet::read_json(&json).unwrap();
    assert_eq!(restored, filters::FilterSet::bundled().unwrap());

    let output = cobie_filter()
        .arg("name")
        .arg("--config")
        .arg(&json)
        .args(["--parent", "floor", "Elevation"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "Elevation\texcluded\n");
}

#[test]
fn load_failure_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = cobie_filter()
        .arg("dump")
        .arg("--config")
        .arg(dir.path().join("absent.conf"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("absent.conf"));
}
