use crate::common::command::{repository_dir, run_gitlet_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn adding_a_remote_twice_fails(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_gitlet_command(dir.path(), &["init"]).assert().success();

    run_gitlet_command(dir.path(), &["remote", "add", "origin", "/tmp/peer"])
        .assert()
        .success();

    let config = std::fs::read_to_string(dir.path().join(".gitlet").join("config"))?;
    assert!(config.contains("[remote \"origin\"]"));
    assert!(config.contains("url = /tmp/peer"));

    run_gitlet_command(dir.path(), &["remote", "add", "origin", "/tmp/other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    Ok(())
}
