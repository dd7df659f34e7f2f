/// Command-line integration tests. Plots go to `.eps` so no rasterizer is
/// needed.

use std::path::PathBuf;
use std::process::Command;

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "random-walk-cli-{label}-{}.eps",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn reg_run_prints_blocks_and_writes_plot() {
    let exe = env!("CARGO_BIN_EXE_random-walk");
    let plot = temp_path("reg");
    let output = Command::new(exe)
        .args(["10,50", "100", "reg", "--seed", "7", "--output"])
        .arg(&plot)
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.find("Reg random walk of 10 steps").expect("10-step block");
    let second = stdout.find("Reg random walk of 50 steps").expect("50-step block");
    assert!(first < second);

    let eps = std::fs::read_to_string(&plot).expect("read plot");
    assert_eq!(eps.lines().filter(|l| l.ends_with(" triangle")).count(), 50);
    let _ = std::fs::remove_file(plot);
}

#[test]
fn unknown_character_prints_guidance_and_still_plots() {
    let exe = env!("CARGO_BIN_EXE_random-walk");
    let plot = temp_path("xyz");
    let output = Command::new(exe)
        .args(["10", "100", "Xyz", "--output"])
        .arg(&plot)
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"Xyz\" is not a character."));
    assert!(!stdout.contains("random walk of"));
    assert!(plot.exists());
    let _ = std::fs::remove_file(plot);
}

#[test]
fn zero_trials_rejected() {
    let exe = env!("CARGO_BIN_EXE_random-walk");
    let output = Command::new(exe)
        .args(["10", "0", "Pa", "--output"])
        .arg(temp_path("zero"))
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}

#[test]
fn bad_length_rejected() {
    let exe = env!("CARGO_BIN_EXE_random-walk");
    let output = Command::new(exe)
        .args(["10,abc", "5", "Pa", "--output"])
        .arg(temp_path("abc"))
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("abc"));
}

#[test]
fn export_failure_exits_non_zero_with_cause() {
    let exe = env!("CARGO_BIN_EXE_random-walk");
    let dir = tempfile::tempdir().expect("temp dir");
    let plot = dir.path().join("no_such_dir").join("plot.eps");
    let output = Command::new(exe)
        .args(["10", "20", "Pa", "--seed", "3", "--output"])
        .arg(&plot)
        .output()
        .expect("run cli");
    assert!(!output.status.success());

    // statistics still print before the plot step fails
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pa random walk of 10 steps"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to export plot"), "stderr: {}", stderr);
    assert!(!plot.exists());
}
