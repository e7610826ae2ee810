use crate::common::command::{gitlet_commit, repository_dir, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::object::{head_commit, read_ref};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// Fetch copies the peer's objects and mirrors its local heads under the
/// remote-tracking namespace; a second fetch transfers nothing.
#[rstest]
fn fetch_mirrors_peer_heads(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let peer = repository_dir;
    let local = TempDir::new()?;

    // peer repository with one commit
    run_gitlet_command(peer.path(), &["init"]).assert().success();
    write_file(FileSpec::new(
        peer.path().join("hello.txt"),
        "hello".to_string(),
    ));
    run_gitlet_command(peer.path(), &["add", "hello.txt"])
        .assert()
        .success();
    gitlet_commit(peer.path(), "peer commit").assert().success();
    let peer_master = head_commit(peer.path());

    // local repository pointing at the peer
    run_gitlet_command(local.path(), &["init"]).assert().success();
    run_gitlet_command(
        local.path(),
        &["remote", "add", "origin", &peer.path().display().to_string()],
    )
    .assert()
    .success();

    run_gitlet_command(local.path(), &["fetch", "origin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("From "))
        .stdout(predicate::str::contains("branch 'master' -> origin/master"));

    assert_eq!(
        read_ref(local.path(), "refs/remotes/origin/master"),
        peer_master
    );
    let fetch_head = read_ref(local.path(), "FETCH_HEAD");
    assert!(fetch_head.contains(&peer_master));
    assert!(fetch_head.contains("branch 'master' of"));

    // running the same fetch again moves nothing
    run_gitlet_command(local.path(), &["fetch", "origin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetched 0 objects."));
    assert_eq!(
        read_ref(local.path(), "refs/remotes/origin/master"),
        peer_master
    );

    Ok(())
}

#[rstest]
fn fetch_from_an_unknown_remote_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_gitlet_command(dir.path(), &["init"]).assert().success();

    run_gitlet_command(dir.path(), &["fetch", "origin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote named origin"));

    Ok(())
}
