use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_term-probe"))
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("term-probe-{}-{}", std::process::id(), name))
}

#[test]
fn run_prints_locator_line_and_report() {
    let output = cli().arg("run").output().expect("run command");
    assert!(
        output.status.success(),
        "run exited with {:?}",
        output.status.code()
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("✅ Fetched Category Name: Uncategorized"));
    assert_eq!(
        lines.next(),
        Some("Testing Term object for Term ID: 1 (Name: Uncategorized)")
    );
    assert!(stdout.contains("\tTerm::$unknown: True"));
    assert!(stdout.contains("✅ Results are identical."));
}

#[test]
fn missing_taxonomy_reports_absent_subject() {
    let output = cli()
        .args(["run", "--taxonomy", "product_cat"])
        .output()
        .expect("run command");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected output: {stdout}");
    assert!(lines[0].starts_with("❌ Error: No terms found"));
    assert!(lines[1].starts_with("❌ Error: No valid subject found"));
}

#[test]
fn json_format_emits_structured_outcome() {
    let output = cli()
        .args(["run", "--term-id", "4", "--format", "json"])
        .output()
        .expect("run command");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("json payload");
    assert_eq!(json["ok"], true);
    assert_eq!(json["outcome"]["subject_label"], "Term ID: 4 (Name: Release Notes)");
    assert_eq!(json["outcome"]["read"]["status"], "mapping");
    assert_eq!(json["outcome"]["export"]["status"], "compared");
    assert_eq!(json["outcome"]["removals"][3]["status"], "never_existed");
}

#[test]
fn output_flag_writes_report_file() {
    let path = scratch_path("report.txt");
    let output = cli()
        .args(["run", "--output", path.to_str().unwrap()])
        .output()
        .expect("run command");
    assert!(output.status.success());
    let report = std::fs::read_to_string(&path).expect("report written");
    assert!(report.contains("Testing unsetting dynamic properties:"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn invalid_plan_is_a_cli_error() {
    let path = scratch_path("plan.json");
    std::fs::write(&path, r#"{"never_set": "link"}"#).expect("write plan");
    let output = cli()
        .args(["run", "--plan", path.to_str().unwrap()])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("parsing probe plan"), "got {stderr}");
    let _ = std::fs::remove_file(path);
}

#[test]
fn list_and_plan_subcommands() {
    let output = cli()
        .args(["list", "--taxonomy", "post_tag"])
        .output()
        .expect("list command");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("7\trust\t12\trust"), "got {stdout}");

    let output = cli().arg("plan").output().expect("plan command");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("plan json");
    assert_eq!(json["never_set"], "non_existent_prop");
}
