//! Integration tests for CLI commands and configuration layering.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use chipgraph::cli::{Cli, RunSettings, cmd_check, cmd_report, cmd_run, execute, load_script};
use chipgraph::config::Config;
use chipgraph_core::ChipError;
use chipgraph_core::primitives::MAX_EVAL_DEPTH;
use clap::Parser;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const ADDER: &str = "\
4
I1 I2 A1 O1
7
A I1 A1
A I2 A1
A A1 O1
I I1 3
I I2 4
O O1
O A1
";

const DIVIDER: &str = "\
4
I1 I2 D1 O50
6
A I1 D1
A I2 D1
A D1 O50
I I1 5
I I2 0
O O50
";

fn script_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn run_text(path: &Path, settings: &RunSettings) -> Result<String, ChipError> {
    let mut out = Vec::new();
    cmd_run(Some(path), settings, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

// =============================================================================
// RUN COMMAND TESTS
// =============================================================================

#[test]
fn test_run_prints_evaluations_and_report() {
    let file = script_file(ADDER);
    let output = run_text(file.path(), &RunSettings::default()).unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines, vec![
        "Computation Starts",
        "The output value from this circuit is 7",
        "Computation Starts",
        "The output value from this circuit is 7",
        "***** Showing the connections that were established",
        "I1, Output = A1",
        "I2, Output = A1",
        "A1, Input 1 = I1, Input 2 = I2, Output = O1",
        "O1, Input 1 = A1",
    ]);
}

#[test]
fn test_run_reports_division_by_zero() {
    let file = script_file(DIVIDER);
    let settings = RunSettings {
        report: false,
        ..RunSettings::default()
    };
    let output = run_text(file.path(), &settings).unwrap();

    assert_eq!(
        output,
        "Computation Starts\n\
         Error: Division by zero in chip D1\n\
         The output value from this circuit is 0\n"
    );
}

#[test]
fn test_run_fractional_values() {
    let file = script_file("3 I1 I2 D1 4 A I1 D1 A I2 D1 I I1 3 O D1 I I2 4");
    // D1 is evaluated before I2 is set, so the divisor is still zero
    let settings = RunSettings {
        report: false,
        ..RunSettings::default()
    };
    let output = run_text(file.path(), &settings);
    assert!(output.unwrap().contains("Division by zero in chip D1"));

    let file = script_file("3 I1 I2 D1 5 A I1 D1 A I2 D1 I I1 3 I I2 4 O D1");
    let output = run_text(file.path(), &settings).unwrap();
    assert!(output.contains("The output value from this circuit is 0.75"));
}

#[test]
fn test_run_keeps_output_before_fatal_error() {
    let file = script_file("3 I1 A1 O1 4 A I1 O1 O O1 A A1 I1 O O1");
    let mut out = Vec::new();

    let result = cmd_run(Some(file.path()), &RunSettings::default(), &mut out);
    assert!(matches!(result, Err(ChipError::InvalidWiring { .. })));

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "Computation Starts\nThe output value from this circuit is 0\n"
    );
}

#[test]
fn test_run_json_mode() {
    let file = script_file(DIVIDER);
    let settings = RunSettings {
        json: true,
        ..RunSettings::default()
    };
    let output = run_text(file.path(), &settings).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["chips"], 4);
    let outcomes = json["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 6);
    assert_eq!(outcomes[0]["command"], "connected");
    assert_eq!(outcomes[5]["command"], "evaluated");
    assert_eq!(outcomes[5]["chip"], "O50");
    assert_eq!(outcomes[5]["value"], 0.0);
    assert_eq!(outcomes[5]["diagnostics"][0]["kind"], "division_by_zero");
    assert_eq!(outcomes[5]["diagnostics"][0]["chip"], "D1");
    assert_eq!(json["report"]["lines"].as_array().unwrap().len(), 4);
}

#[test]
fn test_run_json_without_report() {
    let file = script_file(ADDER);
    let settings = RunSettings {
        json: true,
        report: false,
        ..RunSettings::default()
    };
    let output = run_text(file.path(), &settings).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(json.get("report").is_none());
}

#[test]
fn test_run_respects_depth_limit() {
    let file = script_file("4 I1 N1 N2 O1 4 A I1 N1 A N1 N2 A N2 O1 O O1");
    let settings = RunSettings {
        max_depth: 2,
        ..RunSettings::default()
    };
    let result = run_text(file.path(), &settings);
    assert!(matches!(result, Err(ChipError::DepthLimitExceeded { .. })));
}

#[test]
fn test_run_rejects_depth_above_builtin_limit() {
    let file = script_file("2 N1 N2 3 A N1 N2 A N2 N1 O N1");
    let settings = RunSettings {
        max_depth: usize::MAX,
        ..RunSettings::default()
    };

    let mut out = Vec::new();
    let result = cmd_run(Some(file.path()), &settings, &mut out);
    assert!(matches!(result, Err(ChipError::Config(_))));
    assert!(out.is_empty());

    let result = cmd_report(Some(file.path()), &settings, &mut Vec::new());
    assert!(matches!(result, Err(ChipError::Config(_))));
}

#[test]
fn test_run_rejects_unknown_kind() {
    let file = script_file("2 I1 X1 0");
    let result = run_text(file.path(), &RunSettings::default());
    assert_eq!(result, Err(ChipError::UnknownKind('X')));
}

// =============================================================================
// CHECK / REPORT COMMAND TESTS
// =============================================================================

#[test]
fn test_check_lists_unwired_chips() {
    let file = script_file("4 I1 A1 N1 O1 3 A I1 A1 A A1 O1 O O1");
    let mut out = Vec::new();
    cmd_check(Some(file.path()), &RunSettings::default(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Circuit OK: 4 chips, 3 commands (1 evaluations)"));
    assert!(text.contains("Not fully wired: A1, N1"));
}

#[test]
fn test_check_does_not_evaluate() {
    // Evaluating O1 would fail with MissingWiring; check only resolves it
    let file = script_file("2 I1 O1 1 O O1");
    let mut out = Vec::new();
    assert!(cmd_check(Some(file.path()), &RunSettings::default(), &mut out).is_ok());
}

#[test]
fn test_check_rejects_unknown_evaluation_target() {
    let file = script_file("1 I1 1 O O9");
    let mut out = Vec::new();
    let result = cmd_check(Some(file.path()), &RunSettings::default(), &mut out);
    assert!(matches!(result, Err(ChipError::UnknownIdentity(_))));
}

#[test]
fn test_check_json_mode() {
    let file = script_file(ADDER);
    let settings = RunSettings {
        json: true,
        ..RunSettings::default()
    };
    let mut out = Vec::new();
    cmd_check(Some(file.path()), &settings, &mut out).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["chips"], 4);
    assert_eq!(json["commands"], 7);
    assert_eq!(json["evaluations"], 2);
    assert_eq!(json["unwired"].as_array().unwrap().len(), 0);
}

#[test]
fn test_report_only() {
    let file = script_file(ADDER);
    let mut out = Vec::new();
    cmd_report(Some(file.path()), &RunSettings::default(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("Computation Starts"));
    assert_eq!(text.lines().count(), 4);
    assert!(text.starts_with("I1, Output = A1\n"));
}

// =============================================================================
// SCRIPT LOADING TESTS
// =============================================================================

#[test]
fn test_load_script_missing_file() {
    let result = load_script(Some(Path::new("/definitely/not/here.txt")));
    assert!(matches!(result, Err(ChipError::Io(_))));
}

#[test]
fn test_load_script_rejects_directory() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_script(Some(dir.path()));
    assert!(matches!(result, Err(ChipError::Io(_))));
}

#[test]
fn test_load_script_parse_error() {
    let file = script_file("2 I1");
    let result = load_script(Some(file.path()));
    assert!(matches!(result, Err(ChipError::Parse(_))));
}

// =============================================================================
// CONFIGURATION & CLI PARSING TESTS
// =============================================================================

#[test]
fn test_config_file_is_loaded() {
    let config_file = script_file("[evaluation]\nmax_depth = 7\n\n[output]\njson = true\n");
    let config = Config::load(Some(config_file.path())).unwrap();

    assert_eq!(config.evaluation.max_depth, 7);
    assert!(config.output.json);
    assert!(config.output.report);
}

#[test]
fn test_config_missing_explicit_file() {
    let result = Config::load(Some(Path::new("/definitely/not/chipgraph.toml")));
    assert!(matches!(result, Err(ChipError::Config(_))));
}

#[test]
fn test_settings_layering() {
    let config = Config::from_toml_str("[evaluation]\nmax_depth = 9\n").unwrap();

    let from_file = RunSettings::resolve(&config, false, None).unwrap();
    assert_eq!(from_file.max_depth, 9);
    assert!(!from_file.json);

    let overridden = RunSettings::resolve(&config, true, Some(3)).unwrap();
    assert_eq!(overridden.max_depth, 3);
    assert!(overridden.json);

    assert!(RunSettings::resolve(&config, false, Some(0)).is_err());
    assert!(RunSettings::resolve(&config, false, Some(MAX_EVAL_DEPTH)).is_ok());
    assert!(matches!(
        RunSettings::resolve(&config, false, Some(MAX_EVAL_DEPTH + 1)),
        Err(ChipError::Config(_))
    ));
}

#[test]
fn test_execute_rejects_max_depth_flag_above_limit() {
    let script = script_file(ADDER);
    let script_path = script.path().to_str().unwrap();

    let cli = Cli::try_parse_from([
        "chipgraph",
        "--max-depth",
        "20000",
        "run",
        "-f",
        script_path,
    ])
    .unwrap();
    let mut out = Vec::new();
    let result = execute(cli, &mut out);

    assert!(matches!(result, Err(ChipError::Config(_))));
    assert!(out.is_empty());
}

#[test]
fn test_execute_rejects_config_depth_above_limit() {
    let script = script_file(ADDER);
    let config = script_file("[evaluation]\nmax_depth = 20000\n");
    let script_path = script.path().to_str().unwrap();
    let config_path = config.path().to_str().unwrap();

    let cli = Cli::try_parse_from(["chipgraph", "-c", config_path, "run", "-f", script_path])
        .unwrap();
    let result = execute(cli, &mut Vec::new());
    assert!(matches!(result, Err(ChipError::Config(_))));
}

#[test]
fn test_cli_parsing() {
    let cli = Cli::try_parse_from(["chipgraph", "--json-mode", "run", "-f", "c.txt", "--no-report"])
        .unwrap();
    assert!(cli.json_mode);
    assert!(cli.command.is_some());
    assert_eq!(cli.log_filter(), "chipgraph=info");

    let verbose = Cli::try_parse_from(["chipgraph", "-v"]).unwrap();
    assert!(verbose.command.is_none());
    assert!(verbose.log_filter().contains("debug"));
}

#[test]
fn test_execute_with_config_and_flags() {
    let script = script_file(ADDER);
    let config = script_file("[output]\nreport = false\n");
    let script_path = script.path().to_str().unwrap();
    let config_path = config.path().to_str().unwrap();

    let cli = Cli::try_parse_from(["chipgraph", "-c", config_path, "run", "-f", script_path])
        .unwrap();
    let mut out = Vec::new();
    execute(cli, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("The output value from this circuit is 7"));
    assert!(!text.contains("Showing the connections"));
}
