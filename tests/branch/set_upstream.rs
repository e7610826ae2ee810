use crate::common::command::{init_repository_dir, run_gitlet_command};
use crate::common::object::head_commit;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn set_upstream(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let peer = TempDir::new()?;
    run_gitlet_command(peer.path(), &["init"]).assert().success();

    run_gitlet_command(
        dir.path(),
        &["remote", "add", "origin", &peer.path().display().to_string()],
    )
    .assert()
    .success();

    run_gitlet_command(dir.path(), &["branch", "-u", "origin/master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set up to track"));

    let config = std::fs::read_to_string(dir.path().join(".gitlet").join("config"))?;
    assert!(config.contains("[branch \"master\"]"));
    assert!(config.contains("remote = origin/master"));

    Ok(())
}

#[rstest]
fn set_upstream_is_refused_on_detached_head(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let peer = TempDir::new()?;
    run_gitlet_command(peer.path(), &["init"]).assert().success();

    run_gitlet_command(
        dir.path(),
        &["remote", "add", "origin", &peer.path().display().to_string()],
    )
    .assert()
    .success();

    // detach HEAD by checking out the commit hash directly
    let head = head_commit(dir.path());
    run_gitlet_command(dir.path(), &["checkout", &head])
        .assert()
        .success()
        .stdout(predicate::str::contains("detached"));

    run_gitlet_command(dir.path(), &["branch", "-u", "origin/master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("detached HEAD"));

    Ok(())
}
