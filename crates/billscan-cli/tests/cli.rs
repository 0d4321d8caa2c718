use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ELECTRICITY_BILL: &str = "\
LAHORE ELECTRIC SUPPLY COMPANY
Electricity Bill        Bill Month: Jan 24
Reference No: 09 15123 1234567 U
Units Consumed: 350 kWh
Current Bill Rs. 5,000
Payable Within Due Date Rs. 4,500.00
Due Date: 15 Jan 24
Payable After Due Date Rs. 4,950.00
";

const NOT_A_BILL: &str = "Meeting notes: discuss the roadmap and lunch options.";

/// A command isolated from any real user configuration.
fn billscan(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("billscan").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn analyze_text_bill_as_json() {
    let dir = TempDir::new().unwrap();
    let bill = write(&dir, "bill.txt", ELECTRICITY_BILL);

    billscan(dir.path())
        .arg("analyze")
        .arg(&bill)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""units": "350""#))
        .stdout(predicate::str::contains(r#""dueDate": "15 JAN 24""#))
        .stdout(predicate::str::contains(r#""isAnalyzed": true"#));
}

#[test]
fn analyze_text_bill_with_savings() {
    let dir = TempDir::new().unwrap();
    let bill = write(&dir, "bill.txt", ELECTRICITY_BILL);

    billscan(dir.path())
        .args(["analyze", "--format", "text", "--savings", "15"])
        .arg(&bill)
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference:    09 15123 1234567 U"))
        .stdout(predicate::str::contains("Reducing usage by 15%"))
        .stdout(predicate::str::contains("LED"));
}

#[test]
fn analyze_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let bill = write(&dir, "bill.txt", ELECTRICITY_BILL);
    let out = dir.path().join("out.csv");

    billscan(dir.path())
        .args(["analyze", "--format", "csv", "--output"])
        .arg(&out)
        .arg(&bill)
        .assert()
        .success();

    let csv = fs::read_to_string(out).unwrap();
    assert!(csv.starts_with("bill_type,units,rate"));
    assert!(csv.contains("electricity,350"));
}

#[test]
fn analyze_rejects_non_bill() {
    let dir = TempDir::new().unwrap();
    let notes = write(&dir, "notes.txt", NOT_A_BILL);

    billscan(dir.path())
        .arg("analyze")
        .arg(&notes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not appear to be a utility bill"));
}

#[test]
fn analyze_reports_empty_extraction() {
    let dir = TempDir::new().unwrap();
    let bill = write(&dir, "bill.txt", "Your electricity bill total is due soon.");

    billscan(dir.path())
        .arg("analyze")
        .arg(&bill)
        .assert()
        .failure()
        .stderr(predicate::str::contains("use manual entry"));
}

#[test]
fn analyze_structured_record() {
    let dir = TempDir::new().unwrap();
    let record = write(
        &dir,
        "vision.json",
        r#"```json
{"billType": "gas", "units": 200, "total": 3200, "company": "SNGPL", "isValidBill": true}
```"#,
    );

    billscan(dir.path())
        .arg("analyze")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""billType": "gas""#))
        .stdout(predicate::str::contains(r#""company": "SNGPL""#));
}

#[test]
fn analyze_image_without_vision_suggests_manual_entry() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("bill.png");
    fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

    billscan(dir.path())
        .arg("analyze")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("enter the bill details manually"));
}

#[test]
fn analyze_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "bill.docx", ELECTRICITY_BILL);

    billscan(dir.path())
        .arg("analyze")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported bill source"));
}

#[test]
fn manual_entry_breakdown() {
    let dir = TempDir::new().unwrap();

    billscan(dir.path())
        .args([
            "manual",
            "--units",
            "150",
            "--rate",
            "10",
            "--extra-charges",
            "200",
            "--tax-percent",
            "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,500.00"))
        .stdout(predicate::str::contains("75.00"))
        .stdout(predicate::str::contains("1,775.00"));
}

#[test]
fn manual_entry_rejects_negative_units() {
    let dir = TempDir::new().unwrap();

    billscan(dir.path())
        .args(["manual", "--units=-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("units"));
}

#[test]
fn validate_command() {
    let dir = TempDir::new().unwrap();
    let bill = write(&dir, "bill.txt", ELECTRICITY_BILL);
    let notes = write(&dir, "notes.txt", NOT_A_BILL);

    billscan(dir.path())
        .arg("validate")
        .arg(&bill)
        .assert()
        .success()
        .stdout(predicate::str::contains("Looks like a utility bill"));

    billscan(dir.path())
        .arg("validate")
        .arg(&notes)
        .assert()
        .failure();
}

#[test]
fn batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("inputs");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), ELECTRICITY_BILL).unwrap();
    fs::write(inputs.join("b.txt"), NOT_A_BILL).unwrap();
    let out = dir.path().join("out");

    billscan(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", inputs.display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--continue-on-error", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(out.join("a.json").exists());
    assert!(!out.join("b.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<_> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("a.txt,success,350"));
    assert!(lines[2].starts_with("b.txt,error"));
}

#[test]
fn batch_stops_on_error_by_default() {
    let dir = TempDir::new().unwrap();
    write(&dir, "notes.txt", NOT_A_BILL);

    billscan(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn config_init_and_load() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    billscan(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success();
    assert!(config.exists());

    billscan(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    // a custom default rate flows through manual entry
    fs::write(&config, r#"{"session": {"rate": "20", "tax_rate": "0"}}"#).unwrap();
    billscan(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["manual", "--units", "100", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""total": "2000"#));
}

#[test]
fn manual_entry_rejects_figures_too_large_to_compute() {
    let dir = TempDir::new().unwrap();

    billscan(dir.path())
        .args([
            "manual",
            "--units",
            "1000000000000000",
            "--rate",
            "1000000000000000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large to compute"));
}

#[test]
fn analyze_rejects_file_over_upload_limit() {
    let dir = TempDir::new().unwrap();
    let bill = write(&dir, "bill.txt", ELECTRICITY_BILL);
    let config = write(&dir, "config.json", r#"{"intake": {"max_upload_bytes": 64}}"#);

    billscan(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("analyze")
        .arg(&bill)
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"));
}

#[test]
fn config_show_summarizes_active_settings() {
    let dir = TempDir::new().unwrap();

    billscan(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in defaults"))
        .stdout(predicate::str::contains("Fallback rate:     16.00 per unit"))
        .stdout(predicate::str::contains("Tax rate:          5%"));

    let config = write(&dir, "config.json", r#"{"session": {"tax_rate": "0.17"}}"#);
    billscan(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("Tax rate:          17%"));

    billscan(dir.path())
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""fallback_rate": "16""#));
}
