//! E2E tests for the `thesisnet` binary:
//! `clean`, `relations`, `metric`, `communities`, `stats`, `report`.
//!
//! Covers: text and JSON output, error codes on bad input or unknown
//! metrics, config file overrides, and the on-disk report layout.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

const SINGLE: &str = r#"{"2023": {"2023-1": {"title": "T", "author": "Smith, John", "directors": ["Jane Doe"]}}}"#;

const PORTAL: &str = r#"{
    "2021": {
        "2021-1": {"title": "Grafos", "author": "Pérez, José", "directors": ["Ana Ruiz"]},
        "2021-2": {"title": "Redes", "author": "Luis Gil", "directors": ["Ana Ruiz", "Jose Perez"]}
    },
    "2022": {
        "2022-1": {"title": "Flujos", "author": "Marta Sanz", "directors": ["Luis Gil"]},
        "2022-2": {"title": "Cortes", "author": "Ruiz, Ana", "directors": ["Carmen Vidal"]}
    }
}"#;

fn tn_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("thesisnet"));
    cmd.current_dir(dir);
    cmd.env("THESISNET_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

/// Write `json` to `data/thesis.json`, the default input path.
fn seed(dir: &Path, json: &str) {
    fs::create_dir_all(dir.join("data")).unwrap();
    fs::write(dir.join("data/thesis.json"), json).unwrap();
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = tn_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

// ---------------------------------------------------------------------------
// clean / relations
// ---------------------------------------------------------------------------

#[test]
fn relations_flip_surname_first_author() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), SINGLE);

    tn_cmd(dir.path())
        .args(["relations", "--format", "text"])
        .assert()
        .success()
        .stdout("John Smith\tJane Doe\n");
}

#[test]
fn clean_reports_and_writes_document() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), PORTAL);

    let report = run_json(dir.path(), &["clean", "--write", "clean.json"]);
    assert_eq!(report["records"], 4);
    assert_eq!(report["reordered"], 2);
    assert_eq!(report["ambiguous"].as_array().map(Vec::len), Some(0));

    let written = fs::read_to_string(dir.path().join("clean.json")).unwrap();
    assert!(written.contains("\"author\": \"Jose Perez\""), "{written}");
    assert!(written.starts_with("{\n    \"2021\""), "4-space indent: {written}");
}

#[test]
fn explicit_input_flag_is_used() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("other.json"), SINGLE).unwrap();

    let relations = run_json(dir.path(), &["relations", "--input", "other.json"]);
    assert_eq!(relations[0]["author"], "John Smith");
    assert_eq!(relations[0]["supervisor"], "Jane Doe");
}

// ---------------------------------------------------------------------------
// metric / communities / stats
// ---------------------------------------------------------------------------

#[test]
fn degree_of_single_pair_is_one() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), SINGLE);

    tn_cmd(dir.path())
        .args(["metric", "degree", "--format", "text"])
        .assert()
        .success()
        .stdout("Jane Doe: 1.0\nJohn Smith: 1.0\n");
}

#[test]
fn in_degree_on_directed_graph_ranks_supervisors() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), PORTAL);

    let out = run_json(dir.path(), &["metric", "in-degree", "--directed", "--top", "1"]);
    assert_eq!(out["metric"], "in-degree");
    assert_eq!(out["total"], 5);
    assert_eq!(out["scores"].as_array().map(Vec::len), Some(1));
    assert_eq!(out["scores"][0]["name"], "Ana Ruiz");
    assert_eq!(out["scores"][0]["score"], 0.5);
}

#[test]
fn unsupported_metric_fails_with_code() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), SINGLE);

    tn_cmd(dir.path())
        .args(["metric", "pagerank"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"))
        .stderr(predicate::str::contains("pagerank"));
}

#[test]
fn in_degree_without_directed_fails() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), SINGLE);

    tn_cmd(dir.path())
        .args(["metric", "in-degree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}

#[test]
fn communities_cover_everyone() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), PORTAL);

    let out = run_json(dir.path(), &["communities", "--top", "0"]);
    let listed: usize = out["communities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["size"].as_u64().unwrap_or(0) as usize)
        .sum();
    assert_eq!(listed, 5);
    assert!(out["modularity"].is_number());
}

#[test]
fn stats_reports_both_graphs() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), SINGLE);

    let out = run_json(dir.path(), &["stats"]);
    assert_eq!(out["theses"], 1);
    assert_eq!(out["relations"], 1);
    assert_eq!(out["undirected"]["node_count"], 2);
    assert_eq!(out["undirected"]["edge_count"], 1);
    assert_eq!(out["directed"]["directed"], true);
    assert!(
        out["undirected"]["content_hash"]
            .as_str()
            .is_some_and(|h| h.starts_with("blake3:"))
    );
}

// ---------------------------------------------------------------------------
// Input and config errors
// ---------------------------------------------------------------------------

#[test]
fn missing_input_reports_e1001() {
    let dir = TempDir::new().unwrap();

    tn_cmd(dir.path())
        .args(["stats", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

#[test]
fn malformed_input_reports_e1002_as_json() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), r#"{"2023": {"2023-1": {"title": "T", "directors": []}}}"#);

    let output = tn_cmd(dir.path())
        .args(["relations", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"error_code\": \"E1002\""), "{stderr}");
}

#[test]
fn config_reject_policy_fails_on_ambiguous_author() {
    let dir = TempDir::new().unwrap();
    seed(
        dir.path(),
        r#"{"2020": {
            "2020-1": {"title": "A", "author": "Gil", "directors": ["Ana Gil"]},
            "2020-2": {"title": "B", "author": "X", "directors": ["Luis Gil"]}
        }}"#,
    );
    fs::write(dir.path().join("thesisnet.toml"), "[names]\nambiguity = \"reject\"\n").unwrap();

    tn_cmd(dir.path())
        .args(["relations"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3001"));
}

#[test]
fn broken_config_reports_e1003() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), SINGLE);
    fs::write(dir.path().join("thesisnet.toml"), "[names\n").unwrap();

    tn_cmd(dir.path())
        .args(["stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"));
}

// ---------------------------------------------------------------------------
// report
// ---------------------------------------------------------------------------

#[test]
fn report_writes_full_layout() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), PORTAL);

    let out = run_json(dir.path(), &["report", "--out-dir", "out"]);
    assert_eq!(out["undirected"]["node_count"], 5);

    let root = dir.path().join("out");
    for rel in [
        "static/metrics/degree_centrality.txt",
        "static/metrics/betweenness_centrality.txt",
        "static/metrics/closeness_centrality.txt",
        "static/communities.txt",
        "interactive/metrics/degree_centrality_digraph.txt",
        "interactive/metrics/in_degree_centrality.txt",
        "interactive/graph.json",
        "manifest.json",
    ] {
        assert!(root.join(rel).is_file(), "missing {rel}");
    }

    let in_degree = fs::read_to_string(root.join("interactive/metrics/in_degree_centrality.txt")).unwrap();
    assert_eq!(in_degree.lines().next(), Some("Ana Ruiz: 0.5"));
}

#[test]
fn report_uses_configured_output_dir_and_metrics() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), SINGLE);
    fs::write(
        dir.path().join("thesisnet.toml"),
        "[output]\ndir = \"results\"\n\n[metrics]\nundirected = [\"degree\"]\ndirected = [\"in_degree\"]\n",
    )
    .unwrap();

    tn_cmd(dir.path()).args(["report"]).assert().success();

    let root = dir.path().join("results");
    assert!(root.join("static/metrics/degree_centrality.txt").is_file());
    assert!(!root.join("static/metrics/closeness_centrality.txt").exists());
    assert!(root.join("interactive/metrics/in_degree_centrality.txt").is_file());
}

#[test]
fn report_rejects_bad_metric_before_writing() {
    let dir = TempDir::new().unwrap();
    seed(dir.path(), SINGLE);
    fs::write(
        dir.path().join("thesisnet.toml"),
        "[metrics]\nundirected = [\"degree\", \"eigenvector\"]\n",
    )
    .unwrap();

    tn_cmd(dir.path())
        .args(["report", "--out-dir", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn completions_do_not_need_input() {
    let dir = TempDir::new().unwrap();

    tn_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("thesisnet"));
}
