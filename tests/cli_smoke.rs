use assert_cmd::prelude::*;
use ghstat::{CacheRecord, CacheStore, RepoKey};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        "login = \"octocat\"\nbirthday = \"2000-02-29\"\n",
    )
    .unwrap();
    path
}

fn seed_cache(path: &Path) {
    let mut store = CacheStore::default();
    store.header[4] = "# seeded by test".to_string();
    store.records = vec![
        CacheRecord {
            key: RepoKey::of("octocat/a"),
            last_commit_count: 12,
            additions: 1500,
            deletions: 300,
        },
        CacheRecord {
            key: RepoKey::of("octocat/b"),
            last_commit_count: 3,
            additions: 40,
            deletions: 60,
        },
    ];
    fs::write(path, store.render()).unwrap();
}

fn ghstat(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ghstat").unwrap();
    cmd.current_dir(dir)
        .arg("--config")
        .arg(write_config(dir))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn cache_show_json_lists_records() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache.txt");
    seed_cache(&cache);

    let out = ghstat(dir.path())
        .arg("--cache")
        .arg(&cache)
        .args(["cache", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let entries = v["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["key"], RepoKey::of("octocat/a").to_string());
    assert_eq!(v["additions"], 1540);
    assert_eq!(v["deletions"], 360);
    assert_eq!(v["net"], 1180);
    assert_eq!(v["header"][4], "# seeded by test");
}

#[test]
fn cache_show_without_file_is_empty() {
    let dir = tempdir().unwrap();

    let out = ghstat(dir.path())
        .args(["cache", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["entries"].as_array().map(|a| a.len()), Some(0));
    assert!(v["path"].as_str().unwrap().ends_with("octocat.txt"));
}

#[test]
fn cache_flush_keeps_header() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache.txt");
    seed_cache(&cache);

    ghstat(dir.path())
        .arg("--cache")
        .arg(&cache)
        .args(["cache", "flush"])
        .assert()
        .success();

    let text = fs::read_to_string(&cache).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), ghstat::cache::HEADER_LINES);
    assert_eq!(lines[4], "# seeded by test");
}

#[test]
fn age_prints_calendar_difference() {
    let dir = tempdir().unwrap();

    let out = ghstat(dir.path())
        .args(["age", "--birthday", "2000-01-01"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("years,"));
    assert!(text.contains("month"));
    assert!(text.contains("day"));
}

#[test]
fn age_rejects_bad_dates() {
    let dir = tempdir().unwrap();
    ghstat(dir.path())
        .args(["age", "--birthday", "yesterday"])
        .assert()
        .failure();
}

#[test]
fn loc_without_token_fails_before_network() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache.txt");
    seed_cache(&cache);
    let before = fs::read_to_string(&cache).unwrap();

    let out = ghstat(dir.path())
        .arg("--cache")
        .arg(&cache)
        .env_remove("GITHUB_TOKEN")
        .env_remove("ACCESS_TOKEN")
        .arg("loc")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("token"));
    assert_eq!(fs::read_to_string(&cache).unwrap(), before);
}

#[test]
fn cache_check_without_token_fails_before_network() {
    let dir = tempdir().unwrap();
    let out = ghstat(dir.path())
        .env_remove("GITHUB_TOKEN")
        .env_remove("ACCESS_TOKEN")
        .args(["cache", "check", "octocat/a"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("token"));
}
