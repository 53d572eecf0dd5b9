//! E2E tests for `hopmap graph` and `hopmap hosts`.
//!
//! Each test writes an SSH config into a temp dir and points the binary at it
//! with `--config`; the user config directory is redirected into the same dir.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn hopmap_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hopmap"));
    cmd.current_dir(dir);
    cmd.env("HOPMAP_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env("HOME", dir);
    cmd.env_remove("FORMAT");
    cmd.env_remove("RUST_BACKTRACE");
    cmd.env_remove("RUST_LIB_BACKTRACE");
    cmd
}

fn setup(config: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("ssh_config"), config).expect("write config");
    dir
}

fn graph_json(dir: &Path, extra: &[&str]) -> Value {
    let output = hopmap_cmd(dir)
        .args(["graph", "--config", "ssh_config", "--json"])
        .args(extra)
        .output()
        .expect("graph should not crash");
    assert!(
        output.status.success(),
        "graph failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn node_ids(json: &Value) -> Vec<String> {
    json["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|n| n["id"].as_str().expect("id").to_string())
        .collect()
}

const BASIC: &str = "\
Host gw
Host web1
    ProxyJump gw
Host db
    ProxyJump gw
";

#[test]
fn graph_json_has_root_and_jump_edges() {
    let dir = setup(BASIC);
    let json = graph_json(dir.path(), &[]);

    assert_eq!(node_ids(&json), vec!["gw", "web1", "db", "localhost"]);
    let edges = json["edges"].as_array().expect("edges");
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[0]["from"], "gw");
    assert_eq!(edges[0]["to"], "web1");
    assert_eq!(edges[0]["via"], "gw");
    assert_eq!(edges[2]["kind"], "root");
    assert!(
        json["content_hash"]
            .as_str()
            .expect("hash")
            .starts_with("blake3:")
    );
}

#[test]
fn graph_no_root_and_custom_root() {
    let dir = setup(BASIC);
    let json = graph_json(dir.path(), &["--no-root"]);
    assert_eq!(node_ids(&json), vec!["gw", "web1", "db"]);

    let json = graph_json(dir.path(), &["--root-name", "laptop"]);
    assert!(node_ids(&json).contains(&"laptop".to_string()));
}

#[test]
fn graph_wildcard_pruning_flags() {
    let dir = setup("Host web1\nHost web2\nHost gw\nHost web*\n    ProxyJump gw\n");

    let json = graph_json(dir.path(), &["--no-root"]);
    assert_eq!(node_ids(&json), vec!["web1", "gw", "web*"]);

    let json = graph_json(dir.path(), &["--no-root", "--remove-wildcards"]);
    assert_eq!(node_ids(&json), vec!["gw", "web*"]);
}

#[test]
fn graph_anonymize_with_disclose() {
    let dir = setup("Host bastion\nHost prod_db\n    ProxyJump bastion\n");
    let json = graph_json(dir.path(), &["--no-root", "--anonymize", "--disclose"]);

    assert_eq!(node_ids(&json), vec!["a1c509df", "6754af96_db"]);
    assert_eq!(json["aliases"]["6754af96_db"], "prod_db");

    let hidden = graph_json(dir.path(), &["--no-root", "--anonymize"]);
    assert!(hidden.get("aliases").is_none());
}

#[test]
fn graph_text_output_lists_neighbours() {
    let dir = setup(BASIC);
    hopmap_cmd(dir.path())
        .args(["graph", "--config", "ssh_config", "--format", "text", "--no-root"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gw: db web1"))
        .stdout(predicate::str::contains("Graph with 3 nodes and 2 edges"));
}

#[test]
fn graph_dot_output() {
    let dir = setup(BASIC);
    hopmap_cmd(dir.path())
        .args(["graph", "--config", "ssh_config", "--dot"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph hopmap {"))
        .stdout(predicate::str::contains("\"gw\" -- \"db\" [label=\"gw\"];"))
        .stdout(predicate::str::contains("\"localhost\" -- \"gw\";"));
}

#[test]
fn graph_follows_relative_includes() {
    let dir = setup("Include conf.d/*\nHost gw\n");
    fs::create_dir_all(dir.path().join("conf.d")).expect("mkdir");
    fs::write(
        dir.path().join("conf.d/app"),
        "Host app\n    ProxyJump gw\n",
    )
    .expect("write include");

    let json = graph_json(dir.path(), &["--no-root"]);
    assert_eq!(node_ids(&json), vec!["app", "gw"]);
}

#[test]
fn missing_config_reports_error_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    hopmap_cmd(dir.path())
        .args(["graph", "--config", "nope", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

#[test]
fn malformed_directive_json_error() {
    let dir = setup("ProxyJump gw\n");
    let output = hopmap_cmd(dir.path())
        .args(["graph", "--config", "ssh_config", "--json"])
        .output()
        .expect("graph should not crash");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let start = stderr.find('{').expect("json error on stderr");
    let end = stderr.rfind('}').expect("json error end");
    let json: Value = serde_json::from_str(&stderr[start..=end]).expect("valid JSON");
    assert_eq!(json["error"]["error_code"], "E1002");
}

#[test]
fn include_cycle_detected_on_request() {
    let dir = setup("Include ssh_config\n");
    hopmap_cmd(dir.path())
        .args([
            "graph",
            "--config",
            "ssh_config",
            "--detect-cycles",
            "--format",
            "text",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"));

    hopmap_cmd(dir.path())
        .args([
            "graph",
            "--config",
            "ssh_config",
            "--max-include-depth",
            "4",
            "--format",
            "text",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1004"));
}

#[test]
fn user_config_file_supplies_defaults() {
    let dir = setup(BASIC);
    let xdg = dir.path().join("xdg/hopmap");
    fs::create_dir_all(&xdg).expect("mkdir");
    fs::write(
        xdg.join("config.toml"),
        format!(
            "config_path = \"{}\"\nadd_root = false\noutput = \"json\"\n",
            dir.path().join("ssh_config").display()
        ),
    )
    .expect("write user config");

    let output = hopmap_cmd(dir.path())
        .arg("graph")
        .output()
        .expect("graph should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(node_ids(&json), vec!["gw", "web1", "db"]);
}

#[test]
fn hosts_text_output() {
    let dir = setup("Host gw gateway\nHost db\n    ProxyJump gw\n");
    hopmap_cmd(dir.path())
        .args(["hosts", "--config", "ssh_config", "--format", "text"])
        .assert()
        .success()
        .stdout("gw\t-\tgateway\ndb\tgw\t\n");
}

#[test]
fn hosts_json_output() {
    let dir = setup("Host a\n    ProxyJump b,c\n");
    let output = hopmap_cmd(dir.path())
        .args(["hosts", "--config", "ssh_config", "--json"])
        .output()
        .expect("hosts should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let hosts = json.as_array().expect("array");
    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[0]["name"], "a");
    assert_eq!(hosts[0]["proxy_jump"], "c");
    assert_eq!(hosts[1]["name"], "b");
    assert_eq!(hosts[1]["proxy_jump"], "c");
}

#[test]
fn completions_generate_script() {
    let dir = tempfile::tempdir().expect("tempdir");
    hopmap_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hopmap"));
}
