//! Runs the `sportsched` binary on the sample instance.

use std::process::Command;

use sportsched_test::SAMPLE_INSTANCE;

fn sportsched() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sportsched"))
}

#[test]
fn writes_solution_and_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let instance = dir.path().join("sample6.xml");
    std::fs::write(&instance, SAMPLE_INSTANCE).unwrap();
    let solution = dir.path().join("best.xml");

    let output = sportsched()
        .arg(&instance)
        .args(["--method", "ESA-2S-OH", "--seed", "4", "--max-evaluations", "2000"])
        .arg("--output")
        .arg(&solution)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"instance\": \"Sample6\""));
    assert!(stdout.contains("\"seed\": 4"));

    let written = std::fs::read_to_string(&solution).unwrap();
    assert!(written.contains("<InstanceName>Sample6</InstanceName>"));
    assert_eq!(written.matches("<ScheduledMatch").count(), 30);
}

#[test]
fn text_output_warm_starts_the_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let instance = dir.path().join("sample6.xml");
    std::fs::write(&instance, SAMPLE_INSTANCE).unwrap();
    let first = dir.path().join("first.txt");

    let status = sportsched()
        .arg(&instance)
        .args(["--seed", "1", "--max-evaluations", "500", "--quiet", "--output"])
        .arg(&first)
        .status()
        .unwrap();
    assert!(status.success());

    let output = sportsched()
        .arg(&instance)
        .args(["--max-evaluations", "0", "--quiet", "--violations", "--init-state"])
        .arg(&first)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8(output.stdout).unwrap().contains("Cost:"));
}

#[test]
fn missing_instance_fails() {
    let output = sportsched()
        .args(["does-not-exist.xml", "--quiet"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}
