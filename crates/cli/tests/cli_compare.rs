// End-to-end tests for the `tabcompare` binary: exit codes, stdout contract,
// stderr summary.
// Run with: cargo test -p tabcompare-cli --test cli_compare -- --nocapture

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn tabcompare() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tabcompare"))
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    tabcompare().args(args).output().expect("spawn tabcompare")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout must be valid JSON: {}\nstdout:\n{}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

const BEFORE: &str = "id,name,amount\n1,Alice,100\n2,Bob,200\n";
const SAME: &str = "id,name,amount\n1, alice ,100.0\n2,BOB,200\n";
const AFTER: &str = "id,name,amount\n1,Alice,150\n3,Carol,300\n";

// ===========================================================================
// Exit codes
// ===========================================================================

#[test]
fn equivalent_tables_exit_zero() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.csv", SAME);

    let output = run(&["compare", a.to_str().unwrap(), b.to_str().unwrap(), "--key", "id"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let json = stdout_json(&output);
    assert_eq!(json["contract_version"], 1);
    assert_eq!(json["summary"]["match_count"], 2);
}

#[test]
fn differences_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.csv", AFTER);

    let output = run(&["compare", a.to_str().unwrap(), b.to_str().unwrap(), "--key", "id"]);
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    assert_eq!(json["summary"]["modified_count"], 1);
    assert_eq!(json["summary"]["removed_key_count"], 1);
    assert_eq!(json["summary"]["new_key_count"], 1);
    assert_eq!(json["aligned_records"][0]["changed_columns"], serde_json::json!(["amount"]));

    // No "error:" line for a plain difference exit.
    assert!(!stderr(&output).contains("error:"));
}

#[test]
fn exit_zero_reports_but_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.csv", AFTER);

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--key",
        "id",
        "--exit-zero",
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["summary"]["modified_count"], 1);
}

#[test]
fn missing_key_column_exit_three() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.csv", "ID,name,amount\n1,Alice,100\n");

    let output = run(&["compare", a.to_str().unwrap(), b.to_str().unwrap(), "--key", "id"]);
    assert_eq!(output.status.code(), Some(3));
    let err = stderr(&output);
    assert!(err.contains("key column 'id' not found in table B"), "stderr: {}", err);
    assert!(output.stdout.is_empty());
}

#[test]
fn no_key_exit_four() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);

    let output = run(&["compare", a.to_str().unwrap(), a.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("at least one key column"));
}

#[test]
fn unparseable_input_exit_five() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.json", "{not json");

    let output = run(&["compare", a.to_str().unwrap(), b.to_str().unwrap(), "--key", "id"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("JSON parse error"));
}

#[test]
fn missing_file_exit_six() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let missing = dir.path().join("nope.csv");

    let output = run(&["compare", a.to_str().unwrap(), missing.to_str().unwrap(), "--key", "id"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("nope.csv"));
}

#[test]
fn usage_errors_exit_two() {
    let output = run(&["compare", "-", "-", "--key", "id"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("cannot read both tables from stdin"));

    let output = run(&["compare", "a.xlsx", "b.csv", "--key", "id"]);
    assert_eq!(output.status.code(), Some(2));

    // clap rejects conflicting flags with its own usage error.
    let output = run(&["compare", "a.csv", "b.csv", "--key", "id", "--by-position"]);
    assert_eq!(output.status.code(), Some(2));
}

// ===========================================================================
// Options
// ===========================================================================

#[test]
fn case_sensitive_and_no_trim_flags() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.csv", SAME);

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--key",
        "id",
        "--case-sensitive",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["summary"]["modified_count"], 2);

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--key",
        "id",
        "--no-trim",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["summary"]["modified_count"], 1);
    assert_eq!(json["aligned_records"][0]["changed_columns"], serde_json::json!(["name"]));
}

#[test]
fn composite_key_and_sort_column() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(
        dir.path(),
        "a.csv",
        "policy,cov,date,prem\nP1,A,2024-03,30\nP1,A,2024-01,10\nP1,A,2024-02,20\n",
    );
    let b = write(
        dir.path(),
        "b.csv",
        "policy,cov,date,prem\nP1,A,2024-01,10\nP1,A,2024-02,20\nP1,A,2024-03,30\n",
    );

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--key",
        "policy,cov",
        "--sort-column",
        "date",
    ]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout_json(&output)["summary"]["match_count"], 3);

    // Same inputs, original order: every pair differs.
    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "-k",
        "policy",
        "-k",
        "cov",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["summary"]["modified_count"], 3);
}

#[test]
fn config_file_with_command_line_override() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.csv", SAME);
    let cfg = write(dir.path(), "cmp.toml", "key_columns = [\"id\"]\ncase_sensitive = false\n");

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
        "--case-sensitive",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["metadata"]["config"]["case_sensitive"], true);
}

#[test]
fn command_line_reverts_config_file_switches() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.csv", SAME);
    let cfg = write(
        dir.path(),
        "strict.toml",
        "key_columns = [\"id\"]\ncase_sensitive = true\ntrim_whitespace = false\n",
    );

    let output = run(&["compare", a.to_str().unwrap(), b.to_str().unwrap(), "--config", cfg.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
        "--case-insensitive",
        "--trim",
    ]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let json = stdout_json(&output);
    assert_eq!(json["metadata"]["config"]["case_sensitive"], false);
    assert_eq!(json["metadata"]["config"]["trim_whitespace"], true);
}

#[test]
fn float_keywords_load_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", "id,name\n1,Nan\n2,Infinity\n");
    let b = write(dir.path(), "b.csv", "id,name\n1,Nancy\n2,INFINITY\n");

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--key",
        "id",
        "--case-sensitive",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["summary"]["modified_count"], 2);
    assert_eq!(json["aligned_records"][0]["row_a"]["name"], "Nan");
    assert_eq!(json["aligned_records"][1]["row_b"]["name"], "INFINITY");
}

#[test]
fn bad_config_file_exit_four() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let cfg = write(dir.path(), "cmp.toml", "key_columns = [\"id\"]\nfuzzy = true\n");

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        a.to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("cmp.toml"));
}

#[test]
fn by_position_with_json_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.json", r#"[{"v": 1}, {"v": 2}]"#);
    let b = write(dir.path(), "b.json", r#"[{"v": 1}, {"v": 3}, {"v": 4}]"#);

    let output = run(&["compare", a.to_str().unwrap(), b.to_str().unwrap(), "--by-position"]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["summary"]["match_count"], 1);
    assert_eq!(json["summary"]["modified_count"], 1);
    assert_eq!(json["summary"]["new_key_count"], 1);
    assert_eq!(json["keys_only_in_b"], serde_json::json!([[3]]));
}

// ===========================================================================
// Output
// ===========================================================================

#[test]
fn csv_report_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.csv", AFTER);
    let out = dir.path().join("report.csv");

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--key",
        "id",
        "--out",
        "csv",
        "--output",
        out.to_str().unwrap(),
        "--quiet",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty(), "quiet run wrote: {}", stderr(&output));

    let report = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines,
        vec![
            "id,A: name,A: amount,STATUS,B: name,B: amount,CHANGED CELLS",
            "1,alice,100,MODIFIED,alice,150,amount",
            "2,bob,200,REMOVED_KEY,,,",
            "3,,,NEW_KEY,carol,300,",
        ]
    );
}

#[test]
fn summary_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", BEFORE);
    let b = write(dir.path(), "b.csv", AFTER);

    let output = run(&["compare", a.to_str().unwrap(), b.to_str().unwrap(), "--key", "id"]);
    let err = stderr(&output);
    assert!(err.contains("keys: 2 in A, 2 in B, 1 in common"), "stderr: {}", err);
    assert!(err.contains("modified: 1"));
    assert!(err.contains("sample differences:"));
    assert!(err.contains("[1] MODIFIED (amount)"));

    let output = run(&[
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--key",
        "id",
        "--summary",
        "none",
    ]);
    assert!(output.stderr.is_empty());
}

#[test]
fn stdin_side_uses_other_file_format() {
    let dir = tempfile::tempdir().unwrap();
    let b = write(dir.path(), "b.csv", SAME);

    let mut child = tabcompare()
        .args(["compare", "-", b.to_str().unwrap(), "--key", "id", "--quiet"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(BEFORE.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout_json(&output)["summary"]["match_count"], 2);
}

// ===========================================================================
// validate-config
// ===========================================================================

#[test]
fn validate_config_prints_effective_config() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(
        dir.path(),
        "cmp.toml",
        "key_columns = [\"policy\"]\nalignment_method = \"secondary_sort\"\nsecondary_sort_column = \"date\"\n",
    );

    let output = run(&["validate-config", cfg.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("trim_whitespace = true"), "stdout: {}", text);
    assert!(text.contains("secondary_sort_column = \"date\""));

    let output = run(&["validate-config", cfg.to_str().unwrap(), "--json"]);
    let json = stdout_json(&output);
    assert_eq!(json["alignment_method"], "secondary_sort");
    assert_eq!(json["case_sensitive"], false);
}

#[test]
fn validate_config_rejects_invalid_combination() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "cmp.toml", "key_columns = [\"id\"]\nby_position = true\n");

    let output = run(&["validate-config", cfg.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
    let err = stderr(&output);
    assert!(err.contains("by_position cannot be combined with key_columns"), "stderr: {}", err);
}
