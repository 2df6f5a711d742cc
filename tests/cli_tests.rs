use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn burnup_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("burnup"))
}

const ITEMS: &str = r#"[
  {
    "id": "A",
    "createdAt": "2024-03-01T10:00:00Z",
    "labels": ["ui"],
    "fieldValues": [
      {"type": "single_select", "field": "Status", "name": "Backlog", "updatedAt": "2024-03-01T10:00:00Z"},
      {"type": "number", "field": "Dificuldade", "number": 3},
      {"type": "milestone", "field": "Milestone", "title": "Sprint Março"}
    ]
  },
  {
    "id": "B",
    "createdAt": "2024-03-01T11:00:00Z",
    "labels": ["ui", "Backend"],
    "fieldValues": [
      {"type": "single_select", "field": "Status", "name": "Concluído", "updatedAt": "2024-03-05T09:00:00Z"},
      {"type": "single_select", "field": "Dificuldade", "name": "S"},
      {"type": "number", "field": "Estimate (Hours)", "number": "4,5"},
      {"type": "milestone", "field": "Milestone", "title": "Sprint Março"}
    ]
  },
  {
    "id": "C",
    "createdAt": "2024-03-02T08:00:00Z",
    "labels": ["duplicate"],
    "fieldValues": [
      {"type": "single_select", "field": "Status", "name": "Duplicado", "updatedAt": "2024-03-02T08:00:00Z"},
      {"type": "number", "field": "Dificuldade", "number": 1},
      {"type": "milestone", "field": "Milestone", "title": "Sprint Março"}
    ]
  },
  {
    "id": "PR",
    "createdAt": "2024-03-01T10:00:00Z",
    "contentType": "PullRequest",
    "fieldValues": [
      {"type": "single_select", "field": "Status", "name": "Done"}
    ]
  }
]"#;

fn write_items(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("items.json");
    std::fs::write(&path, ITEMS).unwrap();
    path
}

fn json_output(args: &[&str], temp_dir: &TempDir) -> serde_json::Value {
    let output = burnup_cmd()
        .args(args)
        .current_dir(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Basic CLI
// =============================================================================

#[test]
fn test_help() {
    burnup_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Burn-up"));
}

#[test]
fn test_version() {
    burnup_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("burnup"));
}

#[test]
fn test_missing_input_file() {
    let temp_dir = TempDir::new().unwrap();

    burnup_cmd()
        .args(["report", "missing.json"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read items"));
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();

    burnup_cmd()
        .arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    let content = std::fs::read_to_string(temp_dir.path().join(".burnup.toml")).unwrap();
    assert!(content.contains("[analytics]"));
    assert!(content.contains("report-ignore"));
}

#[test]
fn test_init_twice_fails_without_force() {
    let temp_dir = TempDir::new().unwrap();

    burnup_cmd()
        .arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .success();

    burnup_cmd()
        .arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    burnup_cmd()
        .args(["init", "--force"])
        .current_dir(temp_dir.path())
        .assert()
        .success();
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let items = write_items(&temp_dir);
    std::fs::write(
        temp_dir.path().join(".burnup.toml"),
        "[analytics]\ntop_labels = 0\n",
    )
    .unwrap();

    burnup_cmd()
        .arg("report")
        .arg(&items)
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("top_labels"));
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_report_json() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    let report = json_output(
        &["report", "items.json", "--date", "2024-03-05", "--format", "json"],
        &temp_dir,
    );

    assert_eq!(report["window"]["start"], "2024-03-01");
    assert_eq!(report["window"]["end"], "2024-03-05");
    assert_eq!(
        report["burnup"]["scope"],
        serde_json::json!([5.0, 6.0, 6.0, 6.0, 6.0])
    );
    assert_eq!(
        report["burnup"]["done"],
        serde_json::json!([0.0, 0.0, 0.0, 0.0, 2.0])
    );
    assert_eq!(report["burnup"]["open_scope_final"], 3.0);
    assert_eq!(report["status"]["total"]["count"], 3);
    assert_eq!(report["status"]["by_status"]["done"]["count"], 1);
    assert_eq!(report["status"]["by_status"]["duplicate"]["count"], 1);
    assert_eq!(report["status"]["done_pct_count"], 33);
    assert_eq!(report["milestones"][0]["name"], "Sprint Março");
    assert_eq!(report["milestones"][0]["hours"]["done"], 4.5);
    assert_eq!(report["labels"][0]["label"], "ui");
    assert_eq!(report["labels"][0]["total"], 2);
}

#[test]
fn test_report_text() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    burnup_cmd()
        .args(["report", "items.json", "--date", "2024-03-05"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Burn-up"))
        .stdout(predicate::str::contains("Status as of"))
        .stdout(predicate::str::contains("Sprint Março"))
        .stdout(predicate::str::contains("Backend"));
}

#[test]
fn test_report_yaml() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    burnup_cmd()
        .args(["status", "items.json", "--date", "2024-03-05", "--format", "yaml"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("done_pct_count: 33"));
}

#[test]
fn test_milestone_filter_is_accent_insensitive() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    let report = json_output(
        &[
            "report",
            "items.json",
            "--milestone",
            "marco",
            "--date",
            "2024-03-05",
            "--format",
            "json",
        ],
        &temp_dir,
    );
    assert_eq!(report["milestone"], "marco");
    assert_eq!(report["status"]["total"]["count"], 3);
}

#[test]
fn test_latest_milestone() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    let report = json_output(
        &[
            "report",
            "items.json",
            "--latest-milestone",
            "--date",
            "2024-03-05",
            "--format",
            "json",
        ],
        &temp_dir,
    );
    assert_eq!(report["milestone"], "Sprint Março");
}

#[test]
fn test_no_eligible_items_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    burnup_cmd()
        .args(["report", "items.json", "--milestone", "Q4 Launch"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No data for this period."));
}

#[test]
fn test_week_sets_cutoff_to_sunday() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    let report = json_output(
        &["report", "items.json", "--week", "2024-W10", "--format", "json"],
        &temp_dir,
    );
    assert_eq!(report["window"]["cutoff"], "2024-03-10");
    assert_eq!(report["weekly"]["closed_this_week"]["count"], 1);
    assert_eq!(report["weekly"]["closed_previous_week"]["count"], 0);
}

#[test]
fn test_invalid_week_fails() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    burnup_cmd()
        .args(["report", "items.json", "--week", "2024-10"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid week id"));
}

#[test]
fn test_date_and_week_conflict() {
    burnup_cmd()
        .args(["report", "items.json", "--date", "2024-03-05", "--week", "2024-W10"])
        .assert()
        .failure();
}

#[test]
fn test_series_json() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    let series = json_output(
        &["series", "items.json", "--date", "2024-03-05", "--format", "json"],
        &temp_dir,
    );
    assert_eq!(series["burnup"]["dates"].as_array().unwrap().len(), 5);
    assert_eq!(series["burnup"]["total_duplicate"], 1.0);
}

#[test]
fn test_milestones_ignore_milestone_filter() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    burnup_cmd()
        .args(["milestones", "items.json", "--milestone", "Q4 Launch"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Sprint Março"))
        .stdout(predicate::str::contains("No data for this period.").not());

    let rows = json_output(
        &["milestones", "items.json", "--milestone", "Q4 Launch", "--format", "json"],
        &temp_dir,
    );
    assert_eq!(rows[0]["name"], "Sprint Março");
}

#[test]
fn test_labels_text() {
    let temp_dir = TempDir::new().unwrap();
    write_items(&temp_dir);

    burnup_cmd()
        .args(["labels", "items.json", "--date", "2024-03-05"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ui"))
        .stdout(predicate::str::contains("duplicate").not());
}

// =============================================================================
// Lookups
// =============================================================================

#[test]
fn test_classify() {
    burnup_cmd()
        .args(["classify", "Em andamento"])
        .assert()
        .success()
        .stdout(predicate::str::contains("progress"));

    burnup_cmd()
        .args(["classify", "Concluído (duplicado)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate"));
}

#[test]
fn test_difficulty() {
    burnup_cmd()
        .args(["difficulty", "P2-ish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("P2-ish").and(predicate::str::contains("3")));

    burnup_cmd()
        .args(["difficulty", "7,5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7.5"));
}
