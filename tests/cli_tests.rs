use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn agency_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("agency"))
}

/// Run `init` in a fresh temp dir and return (guard, config path)
fn initialized() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("agency-config");

    agency_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    (temp_dir, config_path)
}

fn run(config_path: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    agency_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(args)
        .assert()
}

#[test]
fn test_help() {
    agency_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Minimal agency management toolkit"));
}

#[test]
fn test_version() {
    agency_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("agency"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("agency-config");

    agency_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized agency config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("seed.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["init"])
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    run(&config_path, &["clients"])
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_clients_list() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["clients"])
        .success()
        .stdout(predicate::str::contains("Acme Corporation"))
        .stdout(predicate::str::contains("info@techstartup.com"));
}

#[test]
fn test_projects_list() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["projects"])
        .success()
        .stdout(predicate::str::contains("Website Redesign"))
        .stdout(predicate::str::contains("75%"))
        .stdout(predicate::str::contains("₹25,000.00"));
}

#[test]
fn test_invoices_list_recomputes_seed_totals() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["invoices"])
        .success()
        .stdout(predicate::str::contains("INV-001"))
        .stdout(predicate::str::contains("₹5,900.00"))
        .stdout(predicate::str::contains("₹4,130.00"))
        .stdout(predicate::str::contains("PAID"))
        .stdout(predicate::str::contains("Total: 2 invoices"));
}

#[test]
fn test_show_invoice() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["show", "INV-001"])
        .success()
        .stdout(predicate::str::contains("Website Design & Development"))
        .stdout(predicate::str::contains("Tax (18%)"))
        .stdout(predicate::str::contains("₹900.00"))
        .stdout(predicate::str::contains("₹5,900.00"));

    run(&config_path, &["show", "INV-999"])
        .failure()
        .stderr(predicate::str::contains("Invoice 'INV-999' not found"));
}

#[test]
fn test_quote_with_tax() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["quote", "--item", "Design:2:1500"])
        .success()
        .stdout(predicate::str::contains("₹3,000.00"))
        .stdout(predicate::str::contains("₹540.00"))
        .stdout(predicate::str::contains("₹3,540.00"));
}

#[test]
fn test_quote_without_tax() {
    let (_guard, config_path) = initialized();

    run(
        &config_path,
        &["quote", "--item", "Hosting:1:1000", "--item", "Support:1:2000", "--no-tax"],
    )
    .success()
    .stdout(predicate::str::contains("Tax (off)"))
    .stdout(predicate::str::contains("₹3,000.00"))
    .stdout(predicate::str::contains("₹0.00"));
}

#[test]
fn test_quote_custom_tax_rate() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["quote", "--item", "Design:1:1000", "--tax-rate", "5"])
        .success()
        .stdout(predicate::str::contains("Tax (5%)"))
        .stdout(predicate::str::contains("₹1,050.00"));
}

#[test]
fn test_quote_malformed_number_shows_nan() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["quote", "--item", "Design:two:1500"])
        .success()
        .stdout(predicate::str::contains("₹NaN"));
}

#[test]
fn test_quote_invalid_item_format() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["quote", "--item", "Design:2"])
        .failure()
        .stderr(predicate::str::contains("Invalid item format"));
}

#[test]
fn test_draft_add_then_edit_rate() {
    let (_guard, config_path) = initialized();

    run(
        &config_path,
        &[
            "draft",
            "--client",
            "1",
            "--item",
            "Design:2:1500",
            "--item",
            "Hosting:1:0",
            "--set",
            "2:rate=200",
            "--date",
            "2024-03-01",
        ],
    )
    .success()
    .stdout(predicate::str::contains("Submitted INV-003"))
    .stdout(predicate::str::contains("Acme Corporation"))
    .stdout(predicate::str::contains("₹200.00"))
    .stdout(predicate::str::contains("₹576.00"))
    .stdout(predicate::str::contains("₹3,776.00"))
    .stdout(predicate::str::contains("March 15, 2024"))
    .stdout(predicate::str::contains("3 invoices in memory"));
}

#[test]
fn test_draft_is_not_saved() {
    let (_guard, config_path) = initialized();

    run(
        &config_path,
        &["draft", "--client", "1", "--item", "Design:1:100"],
    )
    .success();

    run(&config_path, &["invoices"])
        .success()
        .stdout(predicate::str::contains("Total: 2 invoices"))
        .stdout(predicate::str::contains("INV-003").not());
}

#[test]
fn test_draft_remove_line() {
    let (_guard, config_path) = initialized();

    run(
        &config_path,
        &[
            "draft",
            "--client",
            "2",
            "--item",
            "Design:1:1000",
            "--item",
            "Support:1:2000",
            "--remove",
            "1",
            "--no-tax",
            "--status",
            "pending",
        ],
    )
    .success()
    .stdout(predicate::str::contains("PENDING"))
    .stdout(predicate::str::contains("Design").not())
    .stdout(predicate::str::contains("₹2,000.00"));
}

#[test]
fn test_draft_removing_every_line_fails() {
    let (_guard, config_path) = initialized();

    run(
        &config_path,
        &["draft", "--client", "1", "--item", "Design:1:1000", "--remove", "1"],
    )
    .failure()
    .stderr(predicate::str::contains("Invoice has no line items"));
}

#[test]
fn test_draft_requires_description() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["draft", "--client", "1"])
        .failure()
        .stderr(predicate::str::contains("Line item 1 needs a description"));
}

#[test]
fn test_draft_missing_client() {
    let (_guard, config_path) = initialized();

    run(
        &config_path,
        &["draft", "--client", "nonexistent", "--item", "Design:1:100"],
    )
    .failure()
    .stderr(predicate::str::contains("Client 'nonexistent' not found"));
}

#[test]
fn test_draft_invalid_line_number() {
    let (_guard, config_path) = initialized();

    run(
        &config_path,
        &["draft", "--client", "1", "--item", "Design:1:100", "--set", "5:rate=1"],
    )
    .failure()
    .stderr(predicate::str::contains("Invalid line item 5"));
}

#[test]
fn test_draft_invalid_edit_field() {
    let (_guard, config_path) = initialized();

    run(
        &config_path,
        &["draft", "--client", "1", "--item", "Design:1:100", "--set", "1:amount=1"],
    )
    .failure()
    .stderr(predicate::str::contains("Invalid edit"));
}

#[test]
fn test_mark_invoice_paid() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["mark", "INV-002", "paid"])
        .success()
        .stdout(predicate::str::contains("Marked INV-002 as PAID"))
        .stdout(predicate::str::contains("PENDING").not());

    run(&config_path, &["mark", "INV-002", "cancelled"])
        .failure()
        .stderr(predicate::str::contains("Invalid invoice status"));
}

#[test]
fn test_task_board_and_move() {
    let (_guard, config_path) = initialized();

    run(&config_path, &["tasks"])
        .success()
        .stdout(predicate::str::contains("To Do (1)"))
        .stdout(predicate::str::contains("In Progress (1)"))
        .stdout(predicate::str::contains("Setup Database"));

    run(&config_path, &["move-task", "2", "done"])
        .success()
        .stdout(predicate::str::contains("Moved task 2 to Completed"))
        .stdout(predicate::str::contains("To Do (0)"))
        .stdout(predicate::str::contains("Completed (1)"));

    run(&config_path, &["move-task", "42", "done"])
        .failure()
        .stderr(predicate::str::contains("Task '42' not found"));
}

#[test]
fn test_propose() {
    let (_guard, config_path) = initialized();

    run(
        &config_path,
        &[
            "propose",
            "--client",
            "2",
            "--project",
            "2",
            "--title",
            "App phase two",
            "--item",
            "Screens:10:300",
            "--item",
            "API:1:2000",
            "--valid-until",
            "2024-04-01",
        ],
    )
    .success()
    .stdout(predicate::str::contains("Created PROP-001"))
    .stdout(predicate::str::contains("₹5,000.00"))
    .stdout(predicate::str::contains("App phase two"));
}

#[test]
fn test_dashboard_json() {
    let (_guard, config_path) = initialized();

    let output = run(&config_path, &["dashboard", "--json"])
        .success()
        .get_output()
        .stdout
        .clone();
    let stats: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(stats["total_clients"], 2);
    assert_eq!(stats["total_invoices"], 2);
    assert_eq!(stats["paid_invoices"], 1);
    assert_eq!(stats["total_revenue"], 5900.0);
    assert_eq!(stats["pending_amount"], 4130.0);
}

#[test]
fn test_empty_seed() {
    let (_guard, config_path) = initialized();
    fs::write(config_path.join("seed.toml"), "").unwrap();

    run(&config_path, &["invoices"])
        .success()
        .stdout(predicate::str::contains("No invoices yet."));
}

#[test]
fn test_bad_seed_reports_file() {
    let (_guard, config_path) = initialized();
    fs::write(config_path.join("seed.toml"), "[[clients]]\nid = 1\n").unwrap();

    run(&config_path, &["clients"])
        .failure()
        .stderr(predicate::str::contains("seed.toml"));
}
