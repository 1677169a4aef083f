//! Integration tests: run the built `fng` binary and check the exit-code and
//! record contract end to end.

mod common;

use std::fs;
use std::path::Path;

use tempfile::TempDir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"x").unwrap();
}

fn long_name(len: usize) -> String {
    format!("{}.txt", "a".repeat(len - 4))
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

#[test]
fn help_command_prints_usage() {
    let result = common::run_cli_case("help_command_prints_usage", &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: fng [OPTIONS] <DIRECTORY>"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
    for flag in ["--max-len", "--trace-id", "--json", "--config", "--no-color"] {
        assert!(result.stdout.contains(flag), "help missing {flag}");
    }
}

#[test]
fn version_command_prints_version() {
    let result = common::run_cli_case("version_command_prints_version", &["--version"]);
    assert!(result.status.success());
    assert!(
        result.stdout.contains("fng"),
        "missing version output; log: {}",
        result.log_path.display()
    );
}

#[test]
fn long_name_is_reported_with_exit_code_two() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join("shortname.txt"));
    touch(&tmp.path().join(long_name(74)));

    let result = common::run_cli_case(
        "long_name_is_reported_with_exit_code_two",
        &["--json", "--max-len", "64", path_arg(tmp.path())],
    );
    assert_eq!(
        result.status.code(),
        Some(2),
        "log: {}",
        result.log_path.display()
    );

    let records = result.records_of("filename_too_long");
    assert_eq!(records.len(), 1, "log: {}", result.log_path.display());
    let record = &records[0];
    let canonical_root = fs::canonicalize(tmp.path()).unwrap();
    assert_eq!(
        record["path"],
        canonical_root.join(long_name(74)).to_str().unwrap()
    );
    assert_eq!(record["length"], 74);
    assert_eq!(record["max_len"], 64);
    assert!(record["trace_id"].is_null());
    let root_name = canonical_root.file_name().unwrap().to_str().unwrap();
    assert_eq!(
        record["redacted_path"],
        format!("{root_name}/.../{}", long_name(74))
    );

    assert!(result.records_of("no_violations").is_empty());
    let complete = result.records_of("scan_complete");
    assert_eq!(complete.len(), 1);
    assert_eq!(complete[0]["violations"], 1);
}

#[test]
fn empty_directory_exits_zero_with_no_violations_record() {
    let tmp = TempDir::new().unwrap();
    let result = common::run_cli_case(
        "empty_directory_exits_zero_with_no_violations_record",
        &["--json", path_arg(tmp.path())],
    );
    assert_eq!(
        result.status.code(),
        Some(0),
        "log: {}",
        result.log_path.display()
    );
    assert_eq!(result.records_of("no_violations").len(), 1);
    let complete = result.records_of("scan_complete");
    assert_eq!(complete[0]["max_len"], 64);
    assert_eq!(complete[0]["violations"], 0);
}

#[test]
fn invalid_max_len_is_config_error_even_for_missing_root() {
    for bad in ["0", "256", "-5", "99999999999999999999", "-99999999999999999999"] {
        let case = format!("invalid_max_len_{bad}");
        let result = common::run_cli_case(
            &case,
            &["--json", "--max-len", bad, "/definitely/not/here/fng"],
        );
        assert_eq!(
            result.status.code(),
            Some(1),
            "log: {}",
            result.log_path.display()
        );
        let errors = result.records_of("scan_error");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["error_code"], "FNG-1001");
        assert!(result.records_of("scan_complete").is_empty());
    }
}

#[test]
fn missing_root_exits_one() {
    let result = common::run_cli_case(
        "missing_root_exits_one",
        &["--json", "/definitely/not/here/fng"],
    );
    assert_eq!(result.status.code(), Some(1));
    assert_eq!(result.records_of("scan_error")[0]["error_code"], "FNG-2001");
}

#[test]
fn file_root_exits_one() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("plain.txt");
    touch(&file);
    let result = common::run_cli_case("file_root_exits_one", &["--json", path_arg(&file)]);
    assert_eq!(result.status.code(), Some(1));
    assert_eq!(result.records_of("scan_error")[0]["error_code"], "FNG-2002");
    assert!(result.records_of("filename_too_long").is_empty());
}

#[test]
fn trace_id_is_echoed_in_every_record() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join(long_name(30)));
    let result = common::run_cli_case(
        "trace_id_is_echoed_in_every_record",
        &[
            "--json",
            "--max-len",
            "10",
            "--trace-id",
            "ci-run-9",
            path_arg(tmp.path()),
        ],
    );
    assert_eq!(result.status.code(), Some(2));
    let records = result.json_records();
    assert!(records.len() >= 2);
    for record in records {
        assert_eq!(record["trace_id"], "ci-run-9", "record: {record}");
    }
}

#[test]
fn human_output_is_plain_text() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join(long_name(74)));
    let result = common::run_cli_case(
        "human_output_is_plain_text",
        &["--no-color", path_arg(tmp.path())],
    );
    assert_eq!(result.status.code(), Some(2));
    let line = result
        .stdout
        .lines()
        .find(|l| l.contains("filename_too_long"))
        .unwrap_or_else(|| panic!("no violation line; log: {}", result.log_path.display()));
    assert!(line.starts_with("WARN"));
    assert!(line.contains("length=74"));
    assert!(line.contains("max_len=64"));
    assert!(line.ends_with(" trace_id=-"));
    assert!(!result.stdout.contains('{'));
}

#[test]
fn config_file_supplies_max_len() {
    let tmp = TempDir::new().unwrap();
    let scan_root = tmp.path().join("tree");
    touch(&scan_root.join(long_name(20)));
    let config = tmp.path().join("fng.toml");
    fs::write(&config, "[scan]\nmax_len = 10\n").unwrap();

    let result = common::run_cli_case(
        "config_file_supplies_max_len",
        &[
            "--json",
            "--config",
            path_arg(&config),
            path_arg(&scan_root),
        ],
    );
    assert_eq!(result.status.code(), Some(2));
    assert_eq!(result.records_of("filename_too_long")[0]["max_len"], 10);

    let overridden = common::run_cli_case(
        "config_file_max_len_overridden_by_flag",
        &[
            "--json",
            "--config",
            path_arg(&config),
            "--max-len",
            "20",
            path_arg(&scan_root),
        ],
    );
    assert_eq!(overridden.status.code(), Some(0));
}

#[test]
fn missing_config_file_exits_one() {
    let tmp = TempDir::new().unwrap();
    let result = common::run_cli_case(
        "missing_config_file_exits_one",
        &[
            "--json",
            "--config",
            "/definitely/not/here/fng.toml",
            path_arg(tmp.path()),
        ],
    );
    assert_eq!(result.status.code(), Some(1));
    assert_eq!(result.records_of("scan_error")[0]["error_code"], "FNG-1002");
}

#[cfg(unix)]
#[test]
fn symlink_escape_is_skipped_not_fatal() {
    let outside = TempDir::new().unwrap();
    touch(&outside.path().join(long_name(90)));

    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join("kept.txt"));
    std::os::unix::fs::symlink(outside.path(), tmp.path().join("escape")).unwrap();

    let result = common::run_cli_case(
        "symlink_escape_is_skipped_not_fatal",
        &["--json", path_arg(tmp.path())],
    );
    assert_eq!(
        result.status.code(),
        Some(0),
        "log: {}",
        result.log_path.display()
    );
    assert_eq!(result.records_of("skip_out_of_root_dir").len(), 1);
    assert!(result.records_of("filename_too_long").is_empty());
    assert_eq!(result.records_of("no_violations").len(), 1);
}
