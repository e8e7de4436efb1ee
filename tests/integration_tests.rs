//! Integration tests for Autocoder
//!
//! These tests drive the binary end to end. Every run uses `--offline`, so
//! no network access is needed.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const IDEA: &str = "A todo list with categories and localStorage persistence";

/// Helper to create an autocoder Command with a clean environment
fn autocoder() -> Command {
    let mut cmd = cargo_bin_cmd!("autocoder");
    cmd.env_remove("AUTOCODER_MODEL")
        .env_remove("AUTOCODER_OUTPUT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a temporary project directory
fn create_temp_project() -> TempDir {
    TempDir::new().unwrap()
}

/// The single packaged project below `out`
fn packaged_project(out: &Path) -> PathBuf {
    let entries: Vec<PathBuf> = fs::read_dir(out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected one project in {:?}", entries);
    entries.into_iter().next().unwrap()
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_autocoder_help() {
        autocoder()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("run"))
            .stdout(predicate::str::contains("session"))
            .stdout(predicate::str::contains("validate"));
    }

    #[test]
    fn test_autocoder_version() {
        autocoder()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("autocoder"));
    }

    #[test]
    fn test_unknown_command_fails() {
        autocoder().arg("deploy-everything").assert().failure();
    }
}

// =============================================================================
// Run Tests
// =============================================================================

mod run {
    use super::*;

    #[test]
    fn test_offline_run_completes_and_writes_project() {
        let dir = create_temp_project();
        let out = dir.path().join("out");

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["run", IDEA, "--offline", "--output-dir"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("completed"))
            .stdout(predicate::str::contains(".pages.dev"))
            .stdout(predicate::str::contains("9/9 completed"))
            .stdout(predicate::str::contains("passed"));

        let project = packaged_project(&out);
        let name = project.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("autocoder-project-"));
        assert!(project.join("index.html").exists());
        assert!(project.join("app/assets/javascripts/application.js").exists());
        assert!(project.join("app/assets/stylesheets/application.css").exists());
        assert!(project.join("app/views/mainview_view.js").exists());
        assert!(project.join("wrangler.toml").exists());
    }

    #[test]
    fn test_run_from_template() {
        let dir = create_temp_project();
        let out = dir.path().join("out");

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["run", "--template", "memory-game", "--offline", "--output-dir"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Create a memory card game"));
    }

    #[test]
    fn test_static_provider_from_config() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".autocoder")).unwrap();
        fs::write(
            dir.path().join(".autocoder/autocoder.toml"),
            "[deploy]\nprovider = \"static\"\noutput_dir = \"build\"\n",
        )
        .unwrap();

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["run", IDEA, "--offline"])
            .assert()
            .success()
            .stdout(predicate::str::contains("file://"));

        let project = packaged_project(&dir.path().join("build"));
        assert!(project.join("index.html").exists());
    }

    #[test]
    fn test_short_idea_rejected() {
        let dir = create_temp_project();

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["run", "too short", "--offline"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("at least 10 characters"));

        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_missing_idea_rejected() {
        let dir = create_temp_project();

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["run", "--offline"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--template"));
    }

    #[test]
    fn test_unknown_template_rejected() {
        let dir = create_temp_project();

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["run", "--template", "spreadsheet", "--offline"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown template"));
    }

    #[test]
    fn test_packaging_failure_reports_stage() {
        let dir = create_temp_project();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file in the way").unwrap();

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["run", IDEA, "--offline", "--output-dir"])
            .arg(&blocker)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Stage deploying failed"));
    }

    #[test]
    fn test_json_logs_go_to_stderr() {
        let dir = create_temp_project();
        let out = dir.path().join("out");

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["-v", "--log-format", "json", "run", IDEA, "--offline", "--output-dir"])
            .arg(&out)
            .assert()
            .success()
            .stderr(predicate::str::contains("\"level\""))
            .stdout(predicate::str::contains("\"level\"").not());
    }
}

// =============================================================================
// Plan Tests
// =============================================================================

mod plan {
    use super::*;

    const ONE_FEATURE_SPEC: &str = r#"{
        "architecture": "spa",
        "models": [],
        "views": [],
        "controllers": [],
        "routes": [],
        "features": [{"name": "Dark mode", "description": "Toggle themes"}]
    }"#;

    #[test]
    fn test_plan_prints_five_tickets_for_one_feature() {
        let dir = create_temp_project();
        let spec = dir.path().join("spec.json");
        fs::write(&spec, ONE_FEATURE_SPEC).unwrap();

        autocoder()
            .arg("plan")
            .arg("--spec")
            .arg(&spec)
            .assert()
            .success()
            .stdout(predicate::str::contains("5 tickets"))
            .stdout(predicate::str::contains("Implement Dark mode"))
            .stdout(predicate::str::contains("Total estimated time"));
    }

    #[test]
    fn test_plan_json_output() {
        let dir = create_temp_project();
        let spec = dir.path().join("spec.json");
        fs::write(&spec, ONE_FEATURE_SPEC).unwrap();

        let output = autocoder()
            .arg("plan")
            .arg("--spec")
            .arg(&spec)
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let tickets: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let tickets = tickets.as_array().unwrap();
        let ids: Vec<&str> = tickets.iter().map(|t| t["id"].as_str().unwrap()).collect();
        let kinds: Vec<&str> = tickets.iter().map(|t| t["type"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["T1", "T2", "T3", "T4", "T5"]);
        assert_eq!(
            kinds,
            vec!["migration", "route", "controller", "test", "deployment"]
        );
    }

    #[test]
    fn test_plan_rejects_invalid_json() {
        let dir = create_temp_project();
        let spec = dir.path().join("spec.json");
        fs::write(&spec, "not json").unwrap();

        autocoder()
            .arg("plan")
            .arg("--spec")
            .arg(&spec)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse technical spec"));
    }
}

// =============================================================================
// Validate Tests
// =============================================================================

mod validate {
    use super::*;

    #[test]
    fn test_validate_generated_project() {
        let dir = create_temp_project();
        let out = dir.path().join("out");
        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["run", IDEA, "--offline", "--output-dir"])
            .arg(&out)
            .assert()
            .success();

        autocoder()
            .arg("validate")
            .arg(packaged_project(&out))
            .assert()
            .success()
            .stdout(predicate::str::contains("project is valid"));
    }

    #[test]
    fn test_validate_reports_missing_files() {
        let dir = create_temp_project();
        fs::write(
            dir.path().join("index.html"),
            "<!DOCTYPE html><html><body></body></html>",
        )
        .unwrap();

        autocoder()
            .arg("validate")
            .arg(dir.path())
            .assert()
            .failure()
            .stdout(predicate::str::contains("Missing required files"));
    }

    #[test]
    fn test_validate_reports_script_error() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join("app/assets/javascripts")).unwrap();
        fs::create_dir_all(dir.path().join("app/assets/stylesheets")).unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<!DOCTYPE html><html><body></body></html>",
        )
        .unwrap();
        fs::write(
            dir.path().join("app/assets/javascripts/application.js"),
            "function broken() {\n  return 1;\n",
        )
        .unwrap();
        fs::write(dir.path().join("app/assets/stylesheets/application.css"), "body {}").unwrap();

        autocoder()
            .arg("validate")
            .arg(dir.path())
            .assert()
            .failure()
            .stdout(predicate::str::contains("application.js"));
    }
}

// =============================================================================
// Templates Tests
// =============================================================================

mod templates {
    use super::*;

    #[test]
    fn test_templates_lists_catalog() {
        autocoder()
            .arg("templates")
            .assert()
            .success()
            .stdout(predicate::str::contains("Memory Game"))
            .stdout(predicate::str::contains("markdown-editor"));
    }

    #[test]
    fn test_templates_show_one() {
        autocoder()
            .args(["templates", "Quiz Game"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Create a quiz game"));
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_show_defaults() {
        let dir = create_temp_project();

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("gemini-1.5-flash"))
            .stdout(predicate::str::contains("autocoder config init"));
    }

    #[test]
    fn test_config_init_then_validate() {
        let dir = create_temp_project();

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created autocoder.toml"));
        assert!(dir.path().join(".autocoder/autocoder.toml").exists());

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid."));
    }

    #[test]
    fn test_config_validate_reports_warnings() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".autocoder")).unwrap();
        fs::write(
            dir.path().join(".autocoder/autocoder.toml"),
            "[model]\ntemperature = 3.5\n",
        )
        .unwrap();

        autocoder()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("temperature"));
    }
}
