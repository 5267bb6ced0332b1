use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECEIPT_TEXT: &str = "\
領収証
ご注文番号: A1
ご請求番号: B2
発行日: 01/02/2024
請求日: 01/05/2024
ご請求金額: 1,000 円
Page 1 of 1
";

/// The binary, with the per-user config folder pointed at `config_home`.
fn rcpt(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rcpt").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<std::path::PathBuf> {
    let mut found: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(prefix))
        })
        .collect();
    found.sort();
    found
}

#[test]
fn batch_on_empty_folder_writes_header_only_list() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();

    rcpt(home.path())
        .arg("batch")
        .arg(input.path())
        .arg("--report-dir")
        .arg(reports.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 receipts"));

    let lists = files_with_prefix(reports.path(), "list_");
    assert_eq!(lists.len(), 1);
    let content = fs::read_to_string(&lists[0]).unwrap();
    let content = content.trim_start_matches('\u{feff}');
    assert_eq!(content.lines().count(), 1);
    assert!(content.starts_with("order_number,billing_number,"));

    assert!(files_with_prefix(reports.path(), "error_").is_empty());
}

#[test]
fn batch_reports_unreadable_pdfs_as_failures() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    fs::write(input.path().join("broken.pdf"), b"not a pdf").unwrap();
    fs::create_dir(input.path().join("sub")).unwrap();
    fs::write(input.path().join("sub").join("nested.pdf"), b"also not a pdf").unwrap();
    fs::write(input.path().join("notes.txt"), b"ignored").unwrap();

    rcpt(home.path())
        .arg("batch")
        .arg(input.path())
        .arg("-r")
        .arg(reports.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 receipts"));

    let lists = files_with_prefix(reports.path(), "list_");
    let content = fs::read_to_string(&lists[0]).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("broken.pdf"));
    assert!(content.contains("sub/nested.pdf"));
    assert!(content.contains("ERROR"));

    let errors = files_with_prefix(reports.path(), "error_");
    assert_eq!(errors.len(), 1);
    let log = fs::read_to_string(&errors[0]).unwrap();
    assert!(log.contains("broken.pdf\n"));
    assert!(log.contains("sub/nested.pdf\n"));
}

#[test]
fn batch_fails_on_missing_input_folder() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    rcpt(home.path())
        .arg("batch")
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input folder not found"));
}

#[test]
fn parse_text_input_as_json() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let receipt = dir.path().join("receipt.txt");
    fs::write(&receipt, RECEIPT_TEXT).unwrap();

    rcpt(home.path())
        .arg("parse")
        .arg(&receipt)
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"order_number\": \"A1\""))
        .stdout(predicate::str::contains("\"purchase_month\": \"2024/01\""))
        .stdout(predicate::str::contains(
            "2024-01-02_領収証_仕入_AppleJapan合同会社_1,000円_注文番号A1_請求番号B2.pdf",
        ))
        .stdout(predicate::str::contains("\"fully_failed\": false"));
}

#[test]
fn parse_text_input_as_csv_has_no_bom() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let receipt = dir.path().join("receipt.txt");
    fs::write(&receipt, "nothing useful here\n").unwrap();

    rcpt(home.path())
        .arg("parse")
        .arg(&receipt)
        .args(["-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("order_number,"))
        .stdout(predicate::str::contains("ERROR,ERROR"));
}

#[test]
fn config_init_then_show() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");

    rcpt(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    rcpt(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    rcpt(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "template.mall_label"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AppleJapan合同会社"));

    rcpt(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_depth\": 2"));
}

#[cfg(target_os = "linux")]
#[test]
fn default_config_file_applies_to_parse_and_batch() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    rcpt(home.path()).args(["config", "init"]).assert().success();
    let config = home.path().join("rcpt").join("config.json");
    assert!(config.exists());

    let edited = fs::read_to_string(&config)
        .unwrap()
        .replace("AppleJapan合同会社", "MyShop")
        .replace("\"header_style\": \"field\"", "\"header_style\": \"template\"");
    fs::write(&config, edited).unwrap();

    rcpt(home.path())
        .args(["config", "get", "template.mall_label"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MyShop"));

    let receipt = dir.path().join("receipt.txt");
    fs::write(&receipt, RECEIPT_TEXT).unwrap();
    rcpt(home.path())
        .arg("parse")
        .arg(&receipt)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mall_name\": \"MyShop\""))
        .stdout(predicate::str::contains("_仕入_MyShop_1,000円_"));

    let input = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    rcpt(home.path())
        .arg("batch")
        .arg(input.path())
        .arg("-r")
        .arg(reports.path())
        .assert()
        .success();
    let lists = files_with_prefix(reports.path(), "list_");
    let content = fs::read_to_string(&lists[0]).unwrap();
    assert!(content.trim_start_matches('\u{feff}').starts_with("注文番号,請求番号,"));
}
