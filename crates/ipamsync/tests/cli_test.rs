//! Integration tests for the `ipamsync` CLI binary.
//!
//! Argument parsing, help output, completions, and error handling run
//! without a Grid Master; the import and listing flows run against a
//! wiremock WAPI.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `ipamsync` binary with env isolation.
///
/// Clears the `INFOBLOX_*` / `IPAMSYNC_*` variables and points config
/// directories at a nonexistent path so tests never touch the user's real
/// configuration.
fn ipamsync_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ipamsync");
    cmd.env("HOME", "/tmp/ipamsync-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/ipamsync-cli-test-nonexistent")
        .env_remove("IPAMSYNC_PROFILE")
        .env_remove("IPAMSYNC_OUTPUT")
        .env_remove("INFOBLOX_GRID_MASTER")
        .env_remove("INFOBLOX_USERNAME")
        .env_remove("INFOBLOX_PASSWORD")
        .env_remove("INFOBLOX_WAPI_VERSION")
        .env_remove("INFOBLOX_NETWORK_VIEW")
        .env_remove("INFOBLOX_INSECURE")
        .env_remove("INFOBLOX_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// A command already pointed at `server` with credentials.
fn against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = ipamsync_cmd();
    cmd.args(["--grid-master", &server.uri(), "--password", "infoblox"]);
    cmd
}

/// Run a prepared command off the async runtime so the mock keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn wapi(suffix: &str) -> String {
    format!("/wapi/v2.13.1/{suffix}")
}

async fn mount_grid(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(wapi("grid")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_ref": "grid/b25lLmNsdXN0ZXIkMA:Infoblox",
            "name": "Infoblox"
        }])))
        .mount(server)
        .await;
}

fn inventory(rows: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "name,cidr,owner").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = ipamsync_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    ipamsync_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Infoblox")
            .and(predicate::str::contains("import"))
            .and(predicate::str::contains("mapping-template"))
            .and(predicate::str::contains("list-views")),
    );
}

#[test]
fn test_version_flag() {
    ipamsync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ipamsync"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    ipamsync_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    ipamsync_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_source_is_usage_error() {
    let output = ipamsync_cmd()
        .args(["import", "-f", "nets.csv", "-s", "oracle"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("oracle"), "Expected rejected value:\n{text}");
}

#[test]
fn test_import_requires_file() {
    ipamsync_cmd()
        .args(["import", "-s", "aws"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_list_views_without_grid_master() {
    let output = ipamsync_cmd().arg("list-views").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("config init"),
        "Expected setup hint in output:\n{text}"
    );
}

#[test]
fn test_unknown_profile_is_not_found() {
    let output = ipamsync_cmd()
        .args(["--profile", "lab", "list-eas"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("lab"));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_mapping_template_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("azure.json");

    ipamsync_cmd()
        .args(["mapping-template", "-s", "azure", "-f"])
        .arg(&target)
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    let targets: Vec<&str> = written["mappings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["target_attribute"].as_str().unwrap())
        .collect();
    assert!(targets.contains(&"Azure RG"), "got {targets:?}");
}

#[test]
fn test_mapping_template_to_stdout() {
    ipamsync_cmd()
        .args(["mapping-template", "-s", "properties", "-f", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site_Type").and(predicate::str::contains("ENUM")));
}

#[test]
fn test_config_path_and_show() {
    ipamsync_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ipamsync"));

    ipamsync_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

// ── Against a mock Grid Master ──────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_reports_grid_name() {
    let server = MockServer::start().await;
    mount_grid(&server).await;
    Mock::given(method("GET"))
        .and(path(wapi("member")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_ref": "member/b25l:gm.lab.local", "host_name": "gm.lab.local" },
            { "_ref": "member/b25l:gm2.lab.local", "host_name": "gm2.lab.local" }
        ])))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["-o", "json", "test-connection"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["grid_name"], "Infoblox");
    assert_eq!(report["wapi_version"], "2.13.1");
    assert_eq!(report["members"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bad_credentials_exit_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(wapi("grid")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.arg("test-connection");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_views_plain() {
    let server = MockServer::start().await;
    mount_grid(&server).await;
    Mock::given(method("GET"))
        .and(path(wapi("networkview")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_ref": "networkview/ZG5z:default/true", "name": "default", "is_default": true },
            { "_ref": "networkview/ZG5z:lab/false", "name": "lab", "is_default": false }
        ])))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["-o", "plain", "list-views"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "default\nlab");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_classifies_without_writing() {
    let server = MockServer::start().await;
    mount_grid(&server).await;
    // Exact lookups find nothing.
    Mock::given(method("GET"))
        .and(path(wapi("network")))
        .and(query_param("network_view", "default"))
        .and(query_param("network", "10.0.0.0/24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(wapi("network")))
        .and(query_param("network", "10.1.0.0/23"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    // The view listing used for overlap search holds one /24 inside the /23.
    Mock::given(method("GET"))
        .and(path(wapi("network")))
        .and(query_param("_max_results", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_ref": "network/ZG5z:10.1.1.0/24/default",
            "network": "10.1.1.0/24",
            "network_view": "default"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!("never")))
        .expect(0)
        .mount(&server)
        .await;

    let file = inventory(&["lab,10.0.0.0/24,neteng", "dmz,10.1.0.0/23,secops"]);
    let mut cmd = against(&server);
    cmd.args(["-o", "json", "import", "-s", "custom", "--dry-run", "--delay-ms", "0", "-f"])
        .arg(file.path());
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let actions: Vec<&str> = plan["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["new", "overlap_skip"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_creates_and_reports_summary() {
    let server = MockServer::start().await;
    mount_grid(&server).await;
    Mock::given(method("GET"))
        .and(path(wapi("network")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(wapi("extensibleattributedef")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(wapi("extensibleattributedef")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!("extensibleattributedef/x")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(wapi("network")))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!("network/new:10.0.0.0/24/default")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let file = inventory(&["lab,10.0.0.0/24,neteng"]);
    let mut cmd = against(&server);
    cmd.args(["-o", "json", "--yes", "import", "-s", "custom", "--delay-ms", "0", "-f"])
        .arg(file.path());
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["created"], 1);
    assert_eq!(summary["failed"], 0);
    assert_eq!(summary["created_networks"], json!(["10.0.0.0/24"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_without_confirmation_is_refused() {
    let server = MockServer::start().await;
    mount_grid(&server).await;
    Mock::given(method("GET"))
        .and(path(wapi("network")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let file = inventory(&["lab,10.0.0.0/24,neteng"]);
    let mut cmd = against(&server);
    cmd.args(["import", "-s", "custom", "--delay-ms", "0", "-f"])
        .arg(file.path())
        .write_stdin("");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("--yes"));
}
