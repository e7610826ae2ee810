use crate::common::command::{gitlet_commit, repository_dir, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::object::{head_commit, read_ref};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;
use std::fs;

/// Pull runs the fetch, then fast-forwards the local branch onto the fetched
/// head and materializes the peer's files.
#[rstest]
fn pull_fast_forwards_local_master(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let peer = repository_dir;
    let local = TempDir::new()?;

    run_gitlet_command(peer.path(), &["init"]).assert().success();
    write_file(FileSpec::new(
        peer.path().join("hello.txt"),
        "hello".to_string(),
    ));
    run_gitlet_command(peer.path(), &["add", "hello.txt"])
        .assert()
        .success();
    gitlet_commit(peer.path(), "peer commit").assert().success();

    run_gitlet_command(local.path(), &["init"]).assert().success();
    run_gitlet_command(
        local.path(),
        &["remote", "add", "origin", &peer.path().display().to_string()],
    )
    .assert()
    .success();

    run_gitlet_command(local.path(), &["pull", "origin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fast-forward"));

    assert_eq!(head_commit(local.path()), head_commit(peer.path()));
    assert_eq!(
        read_ref(local.path(), "HEAD"),
        "ref: refs/heads/master"
    );
    assert_eq!(fs::read_to_string(local.path().join("hello.txt"))?, "hello");

    // a second commit on the peer flows through the next pull
    write_file(FileSpec::new(
        peer.path().join("hello.txt"),
        "hello again".to_string(),
    ));
    run_gitlet_command(peer.path(), &["add", "hello.txt"])
        .assert()
        .success();
    gitlet_commit(peer.path(), "peer again").assert().success();

    run_gitlet_command(local.path(), &["pull", "origin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fast-forward"));
    assert_eq!(
        fs::read_to_string(local.path().join("hello.txt"))?,
        "hello again"
    );

    Ok(())
}
