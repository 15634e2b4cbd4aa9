//! Integration tests for hcstat CLI commands
//!
//! These run the built binary against temporary challenge trees.

mod common;

use common::{ChallengeTree, FLASH};
use std::fs;
use std::process::{Command, Output};

fn hcstat(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hcstat"))
        .args(args)
        .env_remove("HCSTAT_PRICING")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cost_json() {
    let mut tree = ChallengeTree::new();
    tree.record("c1", FLASH, 1_000_000, 500_000);
    let root = tree.root().to_str().unwrap();

    let value = stdout_json(&hcstat(&["cost", root, "--json"]));
    assert_eq!(value["total_cost"], 0.3);
}

#[test]
fn test_cost_detailed_json() {
    let mut tree = ChallengeTree::new();
    tree.record("c1", FLASH, 1_000_000, 500_000)
        .record("c2", FLASH, 1_000_000, 0);
    let root = tree.root().to_str().unwrap();

    let value = stdout_json(&hcstat(&["cost", root, "--detailed", "--json"]));
    assert_eq!(value["total_challenges"], 2);
    assert_eq!(value["model_details"][FLASH]["usage_count"], 2);
    assert_eq!(value["model_details"]["Total"]["total_cost"], 0.4);
}

#[test]
fn test_cost_missing_path_fails() {
    let tree = ChallengeTree::new();
    let missing = tree.root().join("missing");

    let output = hcstat(&["cost", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Specified path does not exist"));
}

#[test]
fn test_cost_many_roots_missing_one_fails() {
    let mut tree = ChallengeTree::new();
    tree.record("c1", FLASH, 1_000_000, 500_000);
    let root = tree.root().to_str().unwrap();
    let missing = tree.root().join("missing");

    let output = hcstat(&["cost", root, missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Specified path does not exist"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cost_many_roots() {
    let mut first = ChallengeTree::new();
    first.record("c1", FLASH, 1_000_000, 500_000);
    let mut second = ChallengeTree::new();
    second.record("c1", FLASH, 1_000_000, 0);

    let output = hcstat(&[
        "cost",
        first.root().to_str().unwrap(),
        second.root().to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("$0.300"));
    assert!(text.contains("$0.100"));
}

#[test]
fn test_cost_table_output() {
    let mut tree = ChallengeTree::new();
    tree.record("c1", FLASH, 1_000_000, 500_000);
    let root = tree.root().to_str().unwrap();

    let output = hcstat(&["cost", root, "--detailed"]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains(FLASH));
    assert!(text.contains("$0.300"));
}

#[test]
fn test_export_writes_file() {
    let mut tree = ChallengeTree::new();
    tree.record("c1", FLASH, 1_000_000, 500_000);
    let root = tree.root().to_str().unwrap();
    let output_path = tree.root().join("reports/stats.json");

    let output = hcstat(&["export", root, "--output", output_path.to_str().unwrap()]);
    assert!(output.status.success());

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written["total_cost"], 0.3);
    assert_eq!(written["challenge_costs"], serde_json::json!([0.3]));
}

#[test]
fn test_pricing_json_with_override() {
    let tree = ChallengeTree::new();
    let pricing = tree.root().join("pricing.json");
    fs::write(
        &pricing,
        r#"{"gemini-9-test": {"input_price": 1.5, "output_price": 6.0}}"#,
    )
    .unwrap();

    let value = stdout_json(&hcstat(&["pricing", "--json", "--pricing", pricing.to_str().unwrap()]));
    assert_eq!(value["gemini-9-test"]["input_price"], 1.5);
    assert_eq!(value[FLASH]["output_price"], 0.4);
}

#[test]
fn test_classify_rejects_unknown_image_type() {
    let tree = ChallengeTree::new();
    let image = tree.root().join("shot.txt");
    fs::write(&image, "not an image").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_hcstat"))
        .args(["classify", image.to_str().unwrap(), "--api-key", "test"])
        .env("GEMINI_BASE_URL", "http://127.0.0.1:9")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported image type"));
}
