//! Tests that run the built binary in plan-only mode.
//!
//! `--print-plan` never spawns the loader, so these are safe to run anywhere.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::process::Command;

const SENSITIVE_PASSWORD: &str = "super_secret_password_123";

fn graphlaunch() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_graphlaunch"));
    for name in [
        "GRAPHLAUNCH_INTERPRETER",
        "GRAPHLAUNCH_SCRIPT",
        "GRAPHLAUNCH_NEO4J_URI",
        "GRAPHLAUNCH_NEO4J_USER",
        "GRAPHLAUNCH_NEO4J_EXPORT",
        "GRAPHLAUNCH_WIKIDATA_JSON",
        "GRAPHLAUNCH_MAS_PERSONNEL_CSV",
        "GRAPHLAUNCH_NO_PAUSE",
    ] {
        command.env_remove(name);
    }
    command
}

#[test]
fn test_print_plan_masks_password() {
    let output = graphlaunch()
        .arg("--print-plan")
        .arg("-q")
        .env("GRAPHLAUNCH_NEO4J_PASSWORD", SENSITIVE_PASSWORD)
        .output()
        .expect("Failed to run graphlaunch");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();

    assert!(
        !stdout.contains(SENSITIVE_PASSWORD),
        "Password leaked in plan: {}",
        stdout
    );
    assert!(!stderr.contains(SENSITIVE_PASSWORD));
    assert!(stdout.contains("NEO4J_PASSWORD"));
    assert!(stdout.contains("load_graph.py"));
    assert!(stdout.contains("--mas_personnel_csv"));
}

#[test]
fn test_print_plan_includes_overrides_and_extra_args() {
    let output = graphlaunch()
        .args([
            "--print-plan",
            "-q",
            "--script",
            "load_graph_v_5.py",
            "--no-pause",
            "--",
            "--dry-run",
        ])
        .env_remove("GRAPHLAUNCH_NEO4J_PASSWORD")
        .output()
        .expect("Failed to run graphlaunch");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains("load_graph_v_5.py"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("\"pause\": false"));
}
