//! CLI binary smoke tests using assert_cmd.
//!
//! Every run uses the built-in sample catalog unless a test says otherwise.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn skillsphere() -> Command {
    let mut cmd = Command::cargo_bin("skillsphere").unwrap();
    cmd.env("SKILLSPHERE_LOG", "error");
    cmd
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    skillsphere()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    skillsphere()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("recommend"))
        .stdout(predicate::str::contains("clusters"));
}

#[test]
fn version_flag() {
    skillsphere()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ---------------------------------------------------------------------------
// recommend
// ---------------------------------------------------------------------------

#[test]
fn recommend_anchors_on_the_first_matching_title() {
    skillsphere()
        .args(["recommend", "python", "--limit", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Courses similar to \"Python for Financial Analysis and Algorithmic Trading\":",
        ))
        .stdout(predicate::str::contains("  3. "))
        .stdout(predicate::str::contains("  4. ").not());
}

#[test]
fn recommend_falls_back_to_central_courses() {
    skillsphere()
        .args(["recommend", "underwater basket weaving"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No course matches \"underwater basket weaving\""));
}

#[test]
fn recommend_json_and_file_output() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("recs.tsv");
    skillsphere()
        .args(["recommend", "guitar", "--json", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"query\": \"guitar\""));

    let written = fs::read_to_string(&out).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("rank\ttitle\tsubject\tscore"));
    assert_eq!(lines.count(), 5);
}

#[test]
fn recommend_merges_several_skills() {
    skillsphere()
        .args(["recommend", "piano", "javascript", "--limit", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Courses for skills piano, javascript:"))
        .stdout(predicate::str::contains("  4. "));
}

#[test]
fn zero_limit_is_rejected() {
    skillsphere()
        .args(["recommend", "python", "--limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn missing_catalog_falls_back_to_sample() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does_not_exist.csv");
    skillsphere()
        .args(["recommend", "photoshop", "--catalog"])
        .arg(&missing)
        .assert()
        .success()
        .stdout(predicate::str::contains("Photoshop In-Depth Master All Tools"));
}

// ---------------------------------------------------------------------------
// clusters
// ---------------------------------------------------------------------------

#[test]
fn clusters_describe_lists_every_cluster() {
    skillsphere()
        .args(["clusters", "describe", "--k", "3", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cluster 0:"))
        .stdout(predicate::str::contains("Cluster 2:"))
        .stdout(predicate::str::contains("Cluster 3:").not())
        .stdout(predicate::str::contains("courses"));
}

#[test]
fn clusters_predict_top_and_elbow() {
    skillsphere()
        .args(["clusters", "predict", "--price", "15", "--popularity", "2000"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Cluster "));

    skillsphere()
        .args(["clusters", "predict", "--price", "-5", "--popularity", "2000"])
        .assert()
        .failure();

    skillsphere()
        .args(["clusters", "top", "--cluster", "0", "--n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Top courses in cluster 0"));

    skillsphere()
        .args(["clusters", "elbow", "--max-k", "3", "--n-init", "2", "--init", "random"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("k\tinertia\n1\t"))
        .stdout(predicate::str::contains("\n3\t"));
}

#[test]
fn clusters_with_too_many_groups_fail() {
    skillsphere()
        .args(["clusters", "describe", "--k", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient data"));
}

#[test]
fn clusters_export_writes_csv_and_report() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("clusters.csv");
    let html_path = dir.path().join("report.html");
    skillsphere()
        .args(["clusters", "export", "--output"])
        .arg(&csv_path)
        .arg("--report")
        .arg(&html_path)
        .assert()
        .success();

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("title,subject,price,num_subscribers,cluster"));
    assert_eq!(csv.lines().count(), 25);

    let html = fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("SkillSphere"));
    assert!(html.contains("courses"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_prints_and_writes_defaults() {
    skillsphere()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"n_clusters\": 4"))
        .stdout(predicate::str::contains("\"recommend_limit\": 5"));

    let dir = tempdir().unwrap();
    let path = dir.path().join("skillsphere.json");
    skillsphere()
        .args(["config", "--output"])
        .arg(&path)
        .assert()
        .success();
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["kmeans"]["n_init"], 10);
}

#[test]
fn config_file_drives_the_run() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.json");
    fs::write(&path, r#"{"n_clusters": 2, "recommend_limit": 2}"#).unwrap();

    skillsphere()
        .args(["clusters", "describe", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cluster 1:"))
        .stdout(predicate::str::contains("Cluster 2:").not());

    skillsphere()
        .args(["recommend", "design", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("  2. "))
        .stdout(predicate::str::contains("  3. ").not());
}
