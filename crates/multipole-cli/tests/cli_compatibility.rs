use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Duration;
use tempfile::TempDir;

fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_multipole")
}

fn run_multipole(args: &[&str]) -> Output {
    run_binary(Path::new(binary_path()), args)
}

fn run_binary(binary: &Path, args: &[&str]) -> Output {
    let mut attempts = 0;
    loop {
        match Command::new(binary).args(args).env_remove("RUST_LOG").output() {
            Ok(output) => return output,
            // ETXTBSY: a freshly copied alias can still be open in a sibling test's fork.
            Err(error) if error.raw_os_error() == Some(26) && attempts < 20 => {
                attempts += 1;
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(error) => panic!("binary {} should launch: {error}", binary.display()),
        }
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_success(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(0),
        "command should succeed, stderr: {}",
        stderr_text(output)
    );
}

/// Copies the binary into `temp` under `name` so it is launched through an alias.
fn stage_alias(temp: &TempDir, name: &str) -> PathBuf {
    let alias_path = temp
        .path()
        .join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
    fs::copy(binary_path(), &alias_path).expect("binary should be copied");
    alias_path
}

#[test]
fn besseli_prints_fifteen_significant_digits() {
    let output = run_multipole(&["besseli", "2", "5.0"]);

    assert_success(&output);
    assert_eq!(stdout_text(&output), "17.5056149666242\n");
}

#[test]
fn besseli_reports_origin_values_exactly() {
    let output = run_multipole(&["besseli", "0", "0.0"]);
    assert_success(&output);
    assert_eq!(stdout_text(&output), "1\n");

    let output = run_multipole(&["besseli", "1", "0"]);
    assert_success(&output);
    assert_eq!(stdout_text(&output), "0\n");
}

#[test]
fn besseli_accepts_negative_arguments() {
    let output = run_multipole(&["besseli", "3", "-7", "--digits", "12"]);

    assert_success(&output);
    assert_eq!(stdout_text(&output), "-85.1754868428\n");
}

#[test]
fn besseli_scaled_flag_selects_exponentially_scaled_function() {
    let output = run_multipole(&["besseli", "0", "25", "--scaled", "--digits", "10"]);

    assert_success(&output);
    assert_eq!(stdout_text(&output), "0.08019677355\n");
}

#[test]
fn besseli_overflow_prints_inf_and_succeeds() {
    let output = run_multipole(&["besseli", "0", "1000"]);

    assert_success(&output);
    assert_eq!(stdout_text(&output), "inf\n");
}

#[test]
fn besseli_json_output_reports_inputs_and_value() {
    let output = run_multipole(&["besseli", "2", "5.0", "--json"]);
    assert_success(&output);

    let parsed: Value = serde_json::from_str(&stdout_text(&output)).expect("JSON should parse");
    assert_eq!(parsed["order"], Value::from(2));
    assert_eq!(parsed["argument"], Value::from(5.0));
    assert_eq!(parsed["scaled"], Value::Bool(false));
    let value = parsed["value"].as_f64().expect("value should be numeric");
    assert!((value - 17.505614966624236).abs() < 1.0e-12);
}

#[test]
fn missing_arguments_print_usage_and_exit_one() {
    let output = run_multipole(&["besseli", "2"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_text(&output).is_empty());
    assert!(
        stderr_text(&output).contains("Usage"),
        "stderr should contain usage, got: {}",
        stderr_text(&output)
    );

    let output = run_multipole(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_text(&output).contains("Usage"));
}

#[test]
fn malformed_arguments_print_usage_and_exit_one() {
    let output = run_multipole(&["besseli", "2", "five"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_text(&output).contains("Usage"));
}

#[test]
fn help_exits_zero() {
    let output = run_multipole(&["--help"]);

    assert_success(&output);
    assert!(stdout_text(&output).contains("besseli"));
    assert!(stdout_text(&output).contains("gaunt"));
}

#[test]
fn negative_order_emits_diagnostic_and_input_validation_exit_code() {
    let output = run_multipole(&["besseli", "-2", "1.0"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_text(&output).is_empty());
    assert!(
        stderr_text(&output).contains("ERROR: [BESSEL.NEGATIVE_ORDER]"),
        "stderr: {}",
        stderr_text(&output)
    );
}

#[test]
fn gaunt_prints_qmax_seed_and_coefficients() {
    let output = run_multipole(&["gaunt", "2", "2", "1", "--digits", "12"]);

    assert_success(&output);
    assert_eq!(
        stdout_text(&output),
        "1\n0.171428571429\n0.171428571429\n0.428571428571\n"
    );
}

#[test]
fn gaunt_normalized_flag_prints_ratio_to_seed() {
    let output = run_multipole(&["gaunt", "2", "2", "1", "--normalized", "--digits", "12"]);

    assert_success(&output);
    assert_eq!(stdout_text(&output), "1\n0.171428571429\n1\n2.5\n");
}

#[test]
fn gaunt_mu_option_selects_off_diagonal_orders() {
    let output = run_multipole(&["gaunt", "1", "1", "0", "--mu", "1", "--digits", "12"]);

    assert_success(&output);
    assert_eq!(stdout_text(&output), "0\n0.333333333333\n0.333333333333\n");
}

#[test]
fn gaunt_json_output_serializes_expansion() {
    let output = run_multipole(&["gaunt", "3", "2", "1", "--json"]);
    assert_success(&output);

    let parsed: Value = serde_json::from_str(&stdout_text(&output)).expect("JSON should parse");
    assert_eq!(parsed["qmax"], Value::from(1));
    assert_eq!(parsed["input"]["mu"], Value::from(1));
    assert_eq!(parsed["normalizedOutput"], Value::Bool(false));
    assert_eq!(parsed["normalized"][0], Value::from(1.0));

    let a0 = parsed["a0"].as_f64().expect("a0 should be numeric");
    assert!((a0 - 1.0 / 7.0).abs() < 1.0e-12);
    let coefficients = parsed["coefficients"]
        .as_array()
        .expect("coefficients should be an array");
    assert_eq!(coefficients.len(), 2);
    let a1 = coefficients[1].as_f64().expect("coefficient should be numeric");
    assert!((a1 - 0.2).abs() < 1.0e-12);
}

#[test]
fn gaunt_invalid_indices_emit_diagnostic() {
    let output = run_multipole(&["gaunt", "1", "1", "2"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr_text(&output).contains("ERROR: [GAUNT.INVALID_INDICES]"),
        "stderr: {}",
        stderr_text(&output)
    );
}

#[test]
fn besseli_alias_implies_subcommand() {
    let temp = TempDir::new().expect("tempdir should be created");
    let alias = stage_alias(&temp, "besseli");

    let output = run_binary(&alias, &["2", "5.0"]);
    assert_success(&output);
    assert_eq!(stdout_text(&output), "17.5056149666242\n");

    let output = run_binary(&alias, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_text(&output).contains("Usage"));
}

#[test]
fn gaunt_alias_implies_subcommand() {
    let temp = TempDir::new().expect("tempdir should be created");
    let alias = stage_alias(&temp, "gaunt");

    let output = run_binary(&alias, &["0", "0", "0"]);
    assert_success(&output);
    assert_eq!(stdout_text(&output), "0\n1\n1\n");
}

#[test]
fn debug_logging_goes_to_stderr_only() {
    let output = Command::new(binary_path())
        .args(["besseli", "2", "5.0"])
        .env("RUST_LOG", "debug")
        .output()
        .expect("binary should launch");

    assert_success(&output);
    assert_eq!(stdout_text(&output), "17.5056149666242\n");
    assert!(
        stderr_text(&output).contains("evaluated modified Bessel function"),
        "stderr: {}",
        stderr_text(&output)
    );
}
