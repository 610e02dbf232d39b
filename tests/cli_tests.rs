use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn maziwa_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("maziwa"))
}

fn init_config(config_path: &std::path::Path) {
    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();
}

fn write_state(config_path: &std::path::Path, state: &str) {
    fs::write(config_path.join("state.toml"), state).unwrap();
}

fn write_farmers(config_path: &std::path::Path, farmers: &str) {
    fs::write(config_path.join("farmers.toml"), farmers).unwrap();
}

#[test]
fn test_help() {
    maziwa_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dairy cooperative management CLI"));
}

#[test]
fn test_version() {
    maziwa_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("maziwa"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized maziwa config"));

    // Check files were created
    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("farmers.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    // First init should succeed
    init_config(&config_path);

    // Second init should fail
    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_farmers_list() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "farmers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FARM001"))
        .stdout(predicate::str::contains("John Doe"))
        .stdout(predicate::str::contains("Active"));
}

#[test]
fn test_register_assigns_next_id() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    // Template ships FARM001, so the next free id is FARM002
    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "register",
            "--name",
            "Jane Smith",
            "--phone",
            "0701234567",
            "--location",
            "Bushenyi",
            "--join-date",
            "2022-11-20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered FARM002"));

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "farmers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FARM002"))
        .stdout(predicate::str::contains("Jane Smith"));
}

#[test]
fn test_register_duplicate_id_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "register",
            "--name",
            "Someone Else",
            "--phone",
            "0700000000",
            "--location",
            "Isingiro",
            "--id",
            "FARM001",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already registered"));
}

#[test]
fn test_record_unknown_farmer() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "record",
            "--farmer",
            "FARM999",
            "--quantity",
            "25",
            "--quality",
            "good",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Farmer 'FARM999' not found"));
}

#[test]
fn test_record_rejects_zero_quantity() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "record",
            "--farmer",
            "FARM001",
            "--quantity",
            "0",
            "--quality",
            "good",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid quantity"));
}

#[test]
fn test_record_rejects_unknown_quality() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "record",
            "--farmer",
            "FARM001",
            "--quantity",
            "25",
            "--quality",
            "excellent",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid quality grade"));
}

#[test]
fn test_record_and_list_deliveries() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "record",
            "--farmer",
            "FARM001",
            "--quantity",
            "25",
            "--quality",
            "good",
            "--date",
            "2024-07-15",
            "--time",
            "08:30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded DEL-0001"));

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "deliveries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DEL-0001"))
        .stdout(predicate::str::contains("John Doe (FARM001)"))
        .stdout(predicate::str::contains("25.0"))
        .stdout(predicate::str::contains("Good"))
        .stdout(predicate::str::contains("Total: 1 deliveries"));
}

#[test]
fn test_report_requires_criteria() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "report"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Select a farmer or a date range",
        ));
}

#[test]
fn test_report_generates_entries_for_range() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    write_state(
        &config_path,
        r#"[counter]
last_delivery = 2
last_payment = 0

[[deliveries]]
id = "DEL-0001"
farmer_id = "FARM001"
date = "2024-07-15"
time = "08:30"
quantity_liters = 25.0
quality = "Good"

[[deliveries]]
id = "DEL-0002"
farmer_id = "FARM001"
date = "2024-07-16"
time = "08:20"
quantity_liters = 22.0
quality = "Good"
"#,
    );

    // 47 liters at the template price of 1200 per liter
    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--from",
            "2024-07-15",
            "--to",
            "2024-07-16",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report Generated"))
        .stdout(predicate::str::contains("John Doe (FARM001)"))
        .stdout(predicate::str::contains("15/07/24 - 16/07/24"))
        .stdout(predicate::str::contains("56,400"))
        .stdout(predicate::str::contains("TOTAL"));
}

#[test]
fn test_report_groups_by_farmer() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    write_farmers(
        &config_path,
        r#"[FARM001]
name = "John Doe"
phone = "0700123456"
location = "Mbarara"
join_date = "2023-01-15"

[FARM002]
name = "Jane Smith"
phone = "0701234567"
location = "Bushenyi"
join_date = "2022-11-20"
"#,
    );

    write_state(
        &config_path,
        r#"[[deliveries]]
id = "DEL-0001"
farmer_id = "FARM001"
date = "2024-07-15"
time = "08:30"
quantity_liters = 25.0
quality = "Good"

[[deliveries]]
id = "DEL-0002"
farmer_id = "FARM002"
date = "2024-07-15"
time = "09:15"
quantity_liters = 18.0
quality = "Fair"
"#,
    );

    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--from",
            "2024-07-15",
            "--to",
            "2024-07-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("John Doe (FARM001)"))
        .stdout(predicate::str::contains("Jane Smith (FARM002)"))
        .stdout(predicate::str::contains("30,000"))
        .stdout(predicate::str::contains("21,600"))
        .stdout(predicate::str::contains("51,600"));
}

#[test]
fn test_report_falls_back_to_history() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    write_state(
        &config_path,
        r#"[[deliveries]]
id = "DEL-0001"
farmer_id = "FARM001"
date = "2024-07-15"
time = "08:30"
quantity_liters = 25.0
quality = "Good"

[[payments]]
id = "PAY-0001"
farmer_id = "FARM001"
farmer_name = "John Doe"
period = "July Week 2 2024"
amount = 50000.0
date_paid = "2024-07-14"
delivery_ids = ["DEL-0000"]
"#,
    );

    // Window with no matching deliveries for FARM001
    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--farmer",
            "FARM001",
            "--from",
            "2024-09-01",
            "--to",
            "2024-09-30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing past payments"))
        .stdout(predicate::str::contains("July Week 2 2024"))
        .stdout(predicate::str::contains("50,000"));
}

#[test]
fn test_report_no_matches_without_farmer_filter() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    write_state(
        &config_path,
        r#"[[deliveries]]
id = "DEL-0001"
farmer_id = "FARM001"
date = "2024-07-15"
time = "08:30"
quantity_liters = 25.0
quality = "Good"
"#,
    );

    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--farmer",
            "all",
            "--from",
            "2024-09-01",
            "--to",
            "2024-09-30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No deliveries found for the selected criteria.",
        ));
}

#[test]
fn test_report_unknown_farmer_placeholder() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    // Delivery referencing a farmer id missing from farmers.toml
    write_state(
        &config_path,
        r#"[[deliveries]]
id = "DEL-0001"
farmer_id = "FARM999"
date = "2024-07-15"
time = "10:00"
quantity_liters = 30.0
quality = "Good"
"#,
    );

    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--from",
            "2024-07-15",
            "--to",
            "2024-07-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown Farmer"))
        .stdout(predicate::str::contains("36,000"));
}

#[test]
fn test_report_save_persists_payments() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    write_state(
        &config_path,
        r#"[[deliveries]]
id = "DEL-0001"
farmer_id = "FARM001"
date = "2024-07-15"
time = "08:30"
quantity_liters = 25.0
quality = "Good"
"#,
    );

    maziwa_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--from",
            "2024-07-15",
            "--to",
            "2024-07-15",
            "--save",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 1 payment record(s): PAY-0001"));

    let state = fs::read_to_string(config_path.join("state.toml")).unwrap();
    assert!(state.contains("PAY-0001"));
    assert!(state.contains("DEL-0001"));

    // The stored entry now shows up as payment history
    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "payments", "FARM001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Payment History for John Doe"))
        .stdout(predicate::str::contains("15/07/24 - 15/07/24"))
        .stdout(predicate::str::contains("30,000"));
}

#[test]
fn test_payments_unknown_farmer() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "payments", "FARM999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Farmer 'FARM999' not found"));
}

#[test]
fn test_set_price_rejects_non_positive() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "set-price", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a positive number"));
}

#[test]
fn test_set_price_updates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "set-price", "1500"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Milk buying price set to UGX 1500/liter.",
        ));

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UGX 1500/liter"));
}

#[test]
fn test_status_summarizes_records() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    write_state(
        &config_path,
        r#"[[deliveries]]
id = "DEL-0001"
farmer_id = "FARM001"
date = "2024-07-15"
time = "08:30"
quantity_liters = 25.0
quality = "Good"

[[payments]]
id = "PAY-0001"
farmer_id = "FARM001"
farmer_name = "John Doe"
period = "July Week 2 2024"
amount = 50000.0
date_paid = "2024-07-14"
"#,
    );

    maziwa_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cooperative Status"))
        .stdout(predicate::str::contains("Farmers:          1 (1 active)"))
        .stdout(predicate::str::contains("Deliveries:       1 (25.0 L)"))
        .stdout(predicate::str::contains("UGX 50,000"))
        .stdout(predicate::str::contains("Recent deliveries:"))
        .stdout(predicate::str::contains("DEL-0001 - John Doe - 25.0 L (Good)"));
}

#[test]
fn test_tips_requires_api_key() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("maziwa-config");

    init_config(&config_path);

    maziwa_cmd()
        .env_remove("GEMINI_API_KEY")
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "tips",
            "--farmer",
            "FARM001",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY is not set"));
}
