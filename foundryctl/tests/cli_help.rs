use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn foundryctl(dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("foundryctl");
    cmd.current_dir(dir)
        .env_remove("FOUNDRY_SCAN_CONFIG_PATH")
        .env_remove("FOUNDRY_SCAN_CONFIG_JSON")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn movies_list_help_mentions_options() {
    let dir = tempdir().expect("tempdir");
    let output = foundryctl(dir.path())
        .args(["movies", "list", "--help"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    for flag in [
        "--depth",
        "--extensions",
        "--omit-prefixes",
        "--omit-suffixes",
        "--min-acceptable-height",
        "--json",
    ] {
        assert!(text.contains(flag), "movies list help missing {flag}");
    }
}

#[test]
fn empty_directory_reports_zero_as_json() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("notes.txt"), b"").unwrap();
    fs::write(dir.path().join(".hidden.mkv"), b"").unwrap();

    let output = foundryctl(dir.path())
        .args(["movies", "list", "--json"])
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("json output");
    assert_eq!(json["total"], 0);
    assert_eq!(json["report"]["total"]["uniqueFiles"], 0);
    assert_eq!(json["concerns"], serde_json::json!([]));
    assert_eq!(json["results"], serde_json::json!([]));
}

#[test]
fn human_output_has_report_summary() {
    let dir = tempdir().expect("tempdir");
    foundryctl(dir.path())
        .args(["movies", "list", "./"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report Summary"))
        .stdout(predicate::str::contains("Concerns (<1080px)").not())
        .stdout(predicate::str::contains("Concerns (<720px)"));
}

#[test]
fn min_acceptable_height_flag_is_reported() {
    let dir = tempdir().expect("tempdir");
    foundryctl(dir.path())
        .args(["movies", "list", "--min-acceptable-height", "1080"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Concerns (<1080px)"));
}

#[test]
fn missing_root_fails() {
    let dir = tempdir().expect("tempdir");
    foundryctl(dir.path())
        .args(["movies", "list", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scan root not found"));
}

#[test]
fn negative_depth_scans_nothing_even_without_root() {
    let dir = tempdir().expect("tempdir");
    let output = foundryctl(dir.path())
        .args(["movies", "list", "does-not-exist", "--depth", "-1"])
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("json output");
    assert_eq!(json["total"], 0);
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("scan.toml");
    fs::write(&config, "probe_concurrency = 0\n").unwrap();

    foundryctl(dir.path())
        .args(["movies", "list", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("probe_concurrency"));
}

/// Config pointing probing at a program that cannot be spawned, so every
/// file produces a probe warning.
fn unprobeable_config(dir: &std::path::Path) -> std::path::PathBuf {
    let config = dir.join("scan.toml");
    fs::write(&config, "ffprobe_path = \"/nonexistent/foundry-ffprobe\"\n")
        .unwrap();
    config
}

#[test]
fn default_root_reports_root_directory_as_group() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("Heat (1995).mkv"), b"").unwrap();
    let config = unprobeable_config(dir.path());

    let output = foundryctl(dir.path())
        .args(["movies", "list", "--json", "--config"])
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("json output");
    assert_eq!(json["total"], 1);
    let root = fs::canonicalize(dir.path()).unwrap();
    let expected = root.file_name().unwrap().to_string_lossy().into_owned();
    let record = &json["results"][0];
    assert_eq!(record["fileDetails"]["group"], expected.as_str());
    assert_eq!(
        record["fileDetails"]["filePath"],
        &*root.join("Heat (1995).mkv").to_string_lossy()
    );
    assert_eq!(json["report"]["groups"][expected.as_str()], 1);
}

#[test]
fn warnings_carry_the_run_id() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("a.mkv"), b"").unwrap();
    let config = unprobeable_config(dir.path());

    foundryctl(dir.path())
        .args(["movies", "list", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("failed to probe media file"))
        .stderr(predicate::str::contains("run.id."));
}
