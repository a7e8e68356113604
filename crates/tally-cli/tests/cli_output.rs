//! End-to-end tests that run the compiled binary

use std::fs;
use std::process::{Command, Output};
use tempfile::tempdir;

fn tally(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tally"))
        .args(args)
        .env_remove("TALLY_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tally binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_run_script_prints_final_display() {
    let output = tally(&["run", "--script", "12 x 3 ="]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "36");
}

#[test]
fn test_run_from_file_with_frame() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keys.txt");
    fs::write(&path, "# half of a hundred\n100 ÷ 2 =\n").unwrap();

    let output = tally(&[
        "run",
        "--input",
        path.to_str().unwrap(),
        "--frame",
        "--style",
        "ascii",
        "--width",
        "4",
        "--color",
        "never",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "+------+\n|   50 |\n+------+");
}

#[test]
fn test_divide_by_zero_goes_to_stderr() {
    let output = tally(&["run", "--script", "4 ÷ 0 = 2"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "2");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot divide by zero!"));
}

#[test]
fn test_invalid_script_fails() {
    let output = tally(&["run", "--script", "1 ? 2"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: Script error"));
}

#[test]
fn test_json_transcript() {
    let output = tally(&["run", "--script", "2 + 2 =", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["display"], "4");
    assert_eq!(value["steps"].as_array().unwrap().len(), 4);
}

#[test]
fn test_trace_lists_every_key() {
    let output = tally(&["run", "--script", "7 + 1 =", "--trace"]);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].ends_with("7+"));
    assert_eq!(lines[4], "8");
}
