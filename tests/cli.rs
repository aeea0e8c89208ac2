use assert_cmd::Command;
use predicates::prelude::*;

fn annotext() -> Command {
    Command::cargo_bin("annotext").unwrap()
}

#[test]
fn runs() {
    annotext().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = annotext();
    cmd.arg("-V");
    cmd.assert().success().stdout("annotext 0.1.0\n");
}

// Check subcommand tests

#[test]
fn check_valid_document_succeeds() {
    let mut cmd = annotext();
    cmd.args(["check", "tests/fixtures/current.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Validation passed"));
}

#[test]
fn check_invalid_document_fails() {
    let mut cmd = annotext();
    cmd.args(["check", "tests/fixtures/invalid.json"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("HeadMentionOutOfRange"))
        .stdout(predicate::str::contains("SpanOutOfBounds"))
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn check_warnings_pass_unless_strict() {
    let mut cmd = annotext();
    cmd.args(["check", "tests/fixtures/warnings_only.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("EmptyEntity"));

    let mut cmd = annotext();
    cmd.args(["check", "tests/fixtures/warnings_only.json", "--strict"]);
    cmd.assert().failure();
}

#[test]
fn check_json_output_format() {
    let mut cmd = annotext();
    cmd.args(["check", "tests/fixtures/invalid.json", "--format", "json"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"error_count\": 1"))
        .stdout(predicate::str::contains("\"code\": \"head_mention_out_of_range\""));
}

#[test]
fn check_reports_unrecognized_tags() {
    let mut cmd = annotext();
    cmd.args(["check", "tests/fixtures/unknown_attribute.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("UnrecognizedTag"))
        .stdout(predicate::str::contains("embedding"));
}

#[test]
fn check_rejects_incompatible_versions() {
    let mut cmd = annotext();
    cmd.args(["check", "tests/fixtures/v2.json"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("2.0.0"));
}

#[test]
fn check_nonexistent_file_fails() {
    let mut cmd = annotext();
    cmd.args(["check", "nonexistent_file.json"]);
    cmd.assert().failure();
}

#[test]
fn check_legacy_document_after_migration_passes() {
    let mut cmd = annotext();
    cmd.args(["check", "tests/fixtures/v1_0_resolved.json", "--strict"]);
    cmd.assert().success();
}

// Upgrade subcommand tests

#[test]
fn upgrade_rewrites_legacy_entities() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("upgraded.json");

    let mut cmd = annotext();
    cmd.args(["upgrade", "tests/fixtures/v1_0_chains.json", "-o"])
        .arg(&output)
        .arg("--pretty");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Upgraded"))
        .stdout(predicate::str::contains("format 1.1.0"))
        .stdout(predicate::str::contains("7 entity mention(s)"));

    let written = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["version"], "1.1.0");
    assert!(value["attributes"].get("entityMentions").is_none());
    assert_eq!(
        value["attributes"]["entities"]["items"]
            .as_array()
            .map(Vec::len),
        Some(4)
    );
}

#[test]
fn upgrade_current_document_is_a_rewrite() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("same.json");

    let mut cmd = annotext();
    cmd.args(["upgrade", "tests/fixtures/current.json", "--output"])
        .arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("already on the current entity model"));

    let original = annotext::read_document(std::path::Path::new("tests/fixtures/current.json"))
        .unwrap();
    let rewritten = annotext::read_document(&output).unwrap();
    assert_eq!(original, rewritten);
}

#[test]
fn upgrade_fails_on_inconsistent_legacy_data() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("never.json");

    let mut cmd = annotext();
    cmd.args(["upgrade", "tests/fixtures/v1_0_empty_chain.json", "-o"])
        .arg(&output);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("coreference chain 9"));
    assert!(!output.exists());
}

// Inspect subcommand tests

#[test]
fn inspect_shows_summary_and_entity_types() {
    let mut cmd = annotext();
    cmd.args(["inspect", "tests/fixtures/current.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Document Inspection Report"))
        .stdout(predicate::str::contains("PERSON"))
        .stdout(predicate::str::contains("TITLE"))
        .stdout(predicate::str::contains("list<token>"));
}

#[test]
fn inspect_json_reports_the_source_schema() {
    let mut cmd = annotext();
    cmd.args([
        "inspect",
        "tests/fixtures/pre_v1.json",
        "--format",
        "json",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"schema\": \"pre_v1\""))
        .stdout(predicate::str::contains("\"entities\": 6"));
}

#[test]
fn inspect_top_limits_histogram() {
    let mut cmd = annotext();
    cmd.args(["inspect", "tests/fixtures/current.json", "--top", "1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Entity types (top 1 of 2)"))
        .stdout(predicate::str::contains("(other)"));
}
