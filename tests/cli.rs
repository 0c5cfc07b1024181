mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn rsb_extract() -> Command {
    let mut cmd = Command::cargo_bin("rsb-extract").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn extracts_next_to_the_archive() {
    let temp_dir = TempDir::new().unwrap();
    let archive = common::sample_ipa(temp_dir.path());

    rsb_extract()
        .arg(&archive)
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 33.33% | Time elapsed:"))
        .stdout(predicate::str::contains("Progress: 100.00%"))
        .stdout(predicate::str::contains("Total files extracted: 3"))
        .stdout(predicate::str::contains("main.rsb, ui.rsb, music.rsb"));

    assert!(temp_dir.path().join("RSB_Files").join("ui.rsb").exists());
}

#[test]
fn output_flag_overrides_target_root() {
    let temp_dir = TempDir::new().unwrap();
    let archive = common::sample_ipa(temp_dir.path());
    let out = temp_dir.path().join("elsewhere");

    rsb_extract()
        .arg(&archive)
        .arg("--output")
        .arg(&out)
        .arg("-q")
        .assert()
        .success();

    assert!(out.join("RSB_Files").join("main.rsb").exists());
    assert!(!temp_dir.path().join("RSB_Files").exists());
}

#[test]
fn missing_archive_exit_code() {
    let temp_dir = TempDir::new().unwrap();

    rsb_extract()
        .arg(temp_dir.path().join("missing.ipa"))
        .args(["--output-format", "plain"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn invalid_archive_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.ipa");
    fs::write(&path, b"definitely not a zip").unwrap();

    rsb_extract().arg(&path).arg("-q").assert().code(3);
}

#[test]
fn no_matches_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let archive = common::write_archive(temp_dir.path(), "a.ipa", &[("a.txt", b"a")]);

    rsb_extract()
        .arg(&archive)
        .args(["--output-format", "plain"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains("No RSB files were found"));

    assert!(temp_dir.path().join("RSB_Files").is_dir());
}

#[test]
fn dry_run_lists_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let archive = common::sample_ipa(temp_dir.path());

    rsb_extract()
        .arg(&archive)
        .args(["--dry-run", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Payload/Game.app/res/ui.rsb -> ui.rsb"))
        .stdout(predicate::str::contains("Matching entries: 3"));

    assert!(!temp_dir.path().join("RSB_Files").exists());
}

#[test]
fn json_output_ends_with_result() {
    let temp_dir = TempDir::new().unwrap();
    let archive = common::sample_ipa(temp_dir.path());

    let output = rsb_extract()
        .arg(&archive)
        .args(["--output-format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let last = stdout.lines().last().unwrap();
    let value: serde_json::Value = serde_json::from_str(last).unwrap();

    assert_eq!(value["type"], "result");
    assert_eq!(value["extracted_count"], 3);

    let progress_lines = stdout
        .lines()
        .filter(|line| line.contains("\"type\":\"progress\""))
        .count();
    assert_eq!(progress_lines, 3);
}

#[test]
fn prompts_for_archive_path() {
    let temp_dir = TempDir::new().unwrap();
    let archive = common::sample_ipa(temp_dir.path());

    rsb_extract()
        .args(["--output-format", "plain"])
        .write_stdin(format!("\"{}\"\n", archive.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Total files extracted: 3"));
}

#[test]
fn spanish_messages() {
    let temp_dir = TempDir::new().unwrap();
    let archive = common::sample_ipa(temp_dir.path());

    rsb_extract()
        .arg(&archive)
        .args(["--lang", "es", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Progreso: 100.00%"))
        .stdout(predicate::str::contains("Total de archivos extraídos: 3"));
}

#[test]
fn config_file_in_working_directory() {
    let temp_dir = TempDir::new().unwrap();
    let archive = common::write_archive(
        temp_dir.path(),
        "a.ipa",
        &[("x.rsb", b"x"), ("data/y.bin", b"y")],
    );
    fs::write(
        temp_dir.path().join("rsb-extract.toml"),
        "[extraction]\nsuffix = \".bin\"\nsubdir_name = \"BIN_Files\"\n",
    )
    .unwrap();

    rsb_extract()
        .current_dir(temp_dir.path())
        .arg(archive.file_name().unwrap())
        .arg("-q")
        .assert()
        .success();

    assert!(temp_dir.path().join("BIN_Files").join("y.bin").exists());
    assert!(!temp_dir.path().join("BIN_Files").join("x.rsb").exists());
}

#[test]
fn generate_config_persists_language() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("custom.toml");

    rsb_extract()
        .args(["--generate-config", "--lang", "zh", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated configuration file"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("language = \"zh\""));
}

#[test]
fn unknown_language_in_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[ui]\nlanguage = \"xx\"\n").unwrap();

    rsb_extract()
        .arg("--config")
        .arg(&config_path)
        .arg("whatever.ipa")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported language"));
}

#[test]
fn human_output_without_terminal_prints_progress() {
    let temp_dir = TempDir::new().unwrap();
    let archive = common::sample_ipa(temp_dir.path());

    rsb_extract()
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 33.33% | Time elapsed:"))
        .stdout(predicate::str::contains("Progress: 100.00%"));
}
