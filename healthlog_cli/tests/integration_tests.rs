//! Integration tests for the hlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Draft validation and exit status
//! - Export file naming and CSV layout
//! - Import with re-validation
//! - Statistics and BMI output

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "Date,Weight,Height,Systolic,Diastolic,Steps";

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("hlog"))
}

/// Write a default config into the test dir so the user's config is never read
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, "").expect("Failed to write config");
    path
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}

fn today_stamp() -> String {
    chrono::Local::now().date_naive().format("%Y%m%d").to_string()
}

const VALID_DRAFT: &str = r#"{
    "basicInfo": {
        "name": "Kim Minji",
        "phone": "010-1234-5678",
        "nationalId": "900101-1234568",
        "height": 165.0,
        "weight": 55.0
    },
    "systolic": 118,
    "diastolic": 76
}"#;

const RECORDS_JSON: &str = r#"[
    {"date": "2024-01-05", "weight": 70.5, "height": 175, "bloodPressure": {"systolic": 120, "diastolic": 80}, "steps": 8500},
    {"date": "2024-01-06", "weight": 72, "height": 175, "bloodPressure": {"systolic": 126, "diastolic": 84}, "steps": 10200},
    {"date": "2024-01-07", "weight": 68, "height": 175, "bloodPressure": {"systolic": 115, "diastolic": 75}, "steps": 6400}
]"#;

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Personal health record validation",
        ));
}

#[test]
fn test_validate_accepts_complete_draft() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let draft = write_file(temp_dir.path(), "draft.json", VALID_DRAFT);

    cli()
        .arg("validate")
        .arg(&draft)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Record is valid"));
}

#[test]
fn test_validate_reports_every_problem() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let draft = write_file(
        temp_dir.path(),
        "draft.json",
        r#"{"basicInfo": {"phone": "010-1234-5678", "nationalId": "9001011234568", "height": 50, "weight": 70}}"#,
    );

    cli()
        .arg("validate")
        .arg(&draft)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("name: Name is required"))
        .stdout(predicate::str::contains(
            "height: Height must be between 100 and 250 cm",
        ))
        .stdout(predicate::str::contains("systolic: Systolic pressure is required"))
        .stdout(predicate::str::contains("diastolic: Diastolic pressure is required"));
}

#[test]
fn test_validate_uses_configured_bounds() {
    let temp_dir = setup_test_dir();
    let config = write_file(
        temp_dir.path(),
        "config.toml",
        "[validation.weight]\nmin = 60.0\nmax = 120.0\n",
    );
    let draft = write_file(temp_dir.path(), "draft.json", VALID_DRAFT);

    cli()
        .arg("validate")
        .arg(&draft)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Weight must be between 60 and 120 kg"));
}

#[test]
fn test_export_writes_dated_csv() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let input = write_file(temp_dir.path(), "records.json", RECORDS_JSON);
    let out_dir = temp_dir.path().join("exports");

    cli()
        .arg("export")
        .arg(&input)
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 records"));

    let csv_path = out_dir.join(format!("health-info-{}.csv", today_stamp()));
    let content = fs::read_to_string(&csv_path).expect("Failed to read exported CSV");
    assert_eq!(
        content,
        format!(
            "{}\n2024-01-05,70.5,175,120,80,8500\n2024-01-06,72,175,126,84,10200\n2024-01-07,68,175,115,75,6400",
            HEADER
        )
    );
}

#[test]
fn test_export_empty_collection() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let input = write_file(temp_dir.path(), "records.json", "[]");

    cli()
        .arg("export")
        .arg(&input)
        .arg("--out-dir")
        .arg(temp_dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let csv_path = temp_dir
        .path()
        .join(format!("health-info-{}.csv", today_stamp()));
    let content = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content, format!("{}\n", HEADER));

    // The empty export imports as an empty collection
    cli()
        .arg("import")
        .arg(&csv_path)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_export_json_format() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let input = write_file(temp_dir.path(), "records.json", RECORDS_JSON);

    cli()
        .arg("export")
        .arg(&input)
        .arg("--out-dir")
        .arg(temp_dir.path())
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let json_path = temp_dir
        .path()
        .join(format!("health-info-{}.json", today_stamp()));
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);
}

#[test]
fn test_export_then_import_round_trips() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let input = write_file(temp_dir.path(), "records.json", RECORDS_JSON);

    cli()
        .arg("export")
        .arg(&input)
        .arg("--out-dir")
        .arg(temp_dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let csv_path = temp_dir
        .path()
        .join(format!("health-info-{}.csv", today_stamp()));
    let output = cli()
        .arg("import")
        .arg(&csv_path)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let imported: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let original: serde_json::Value = serde_json::from_str(RECORDS_JSON).unwrap();
    let imported = imported.as_array().unwrap();
    let original = original.as_array().unwrap();
    assert_eq!(imported.len(), original.len());
    for (got, want) in imported.iter().zip(original) {
        assert_eq!(got["date"], want["date"]);
        assert_eq!(got["weight"].as_f64(), want["weight"].as_f64());
        assert_eq!(got["height"].as_f64(), want["height"].as_f64());
        assert_eq!(got["bloodPressure"], want["bloodPressure"]);
        assert_eq!(got["steps"], want["steps"]);
    }
}

#[test]
fn test_import_rejects_out_of_range_records() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let csv_path = write_file(
        temp_dir.path(),
        "import.csv",
        &format!("{}\n2024-01-05,70,175,120,80,8000\n2024-01-06,70,175,80,120,8000\n", HEADER),
    );

    cli()
        .arg("import")
        .arg(&csv_path)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Record 2 rejected"))
        .stderr(predicate::str::contains("1 of 2 imported records failed validation"));
}

#[test]
fn test_weight_stats() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let csv_path = write_file(
        temp_dir.path(),
        "stats.csv",
        &format!("{}\n2024-01-05,70,,,,\n2024-01-06,72,,,,\n2024-01-07,68,,,,\n", HEADER),
    );

    let output = cli()
        .arg("stats")
        .arg(&csv_path)
        .arg("--field")
        .arg("weight")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stats: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(stats["average"].as_f64(), Some(70.0));
    assert_eq!(stats["min"].as_f64(), Some(68.0));
    assert_eq!(stats["max"].as_f64(), Some(72.0));
    assert_eq!(stats["trend"].as_array().unwrap().len(), 3);
    assert_eq!(stats["trend"][0]["date"], "2024-01-05");
}

#[test]
fn test_blood_pressure_stats() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let csv_path = write_file(
        temp_dir.path(),
        "stats.csv",
        &format!("{}\n2024-01-05,,,120,80,\n2024-01-06,71,,,,\n2024-01-07,,,130,90,\n", HEADER),
    );

    let output = cli()
        .arg("stats")
        .arg(&csv_path)
        .arg("--field")
        .arg("bp")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stats: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(stats["systolic"]["average"].as_f64(), Some(125.0));
    assert_eq!(stats["diastolic"]["max"].as_f64(), Some(90.0));
    assert_eq!(stats["trend"].as_array().unwrap().len(), 2);
    assert_eq!(stats["trend"][1]["systolic"], 130);
}

#[test]
fn test_bmi_command() {
    cli()
        .arg("bmi")
        .arg("--weight")
        .arg("70")
        .arg("--height")
        .arg("175")
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 22.9 (Normal)"));

    cli()
        .arg("bmi")
        .arg("--weight")
        .arg("120")
        .arg("--height")
        .arg("170")
        .arg("--locale")
        .arg("ko")
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 41.5 (고도 비만)"));
}

#[test]
fn test_vital_command() {
    cli()
        .arg("vital")
        .arg("--kind")
        .arg("pulse")
        .arg("--value")
        .arg("72")
        .assert()
        .success()
        .stdout(predicate::str::contains("pulse 72 bpm: normal"));

    cli()
        .arg("vital")
        .arg("--kind")
        .arg("systolic")
        .arg("--value")
        .arg("150")
        .assert()
        .success()
        .stdout(predicate::str::contains("systolic 150 mmHg: danger"));
}

#[test]
fn test_validate_reports_bad_username() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path());
    let draft = VALID_DRAFT.replacen(
        r#""name": "Kim Minji","#,
        r#""name": "Kim Minji", "username": "kim minji","#,
        1,
    );
    let draft = write_file(temp_dir.path(), "draft.json", &draft);

    cli()
        .arg("validate")
        .arg(&draft)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "username: Username must be 4 to 20 letters, digits or underscores",
        ));
}
