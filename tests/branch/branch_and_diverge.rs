use crate::common::command::{gitlet_commit, repository_dir, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::object::{commit_parents, head_commit, read_ref};
use assert_fs::TempDir;
use rstest::rstest;
use std::fs;

/// Diverge two branches from a shared root commit
///
/// History:
///       H0 (a/1.txt = one)
///      /  \
///    H1    H2
///  master  alt
///
/// Checking out `alt` restores the root content; each branch then carries
/// its own edit, and the parent links point back at H0 from both sides.
#[rstest]
fn branch_and_diverge(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;

    run_gitlet_command(dir.path(), &["init"]).assert().success();
    write_file(FileSpec::new(
        dir.path().join("a").join("1.txt"),
        "one".to_string(),
    ));
    run_gitlet_command(dir.path(), &["add", "a"])
        .assert()
        .success();
    gitlet_commit(dir.path(), "first").assert().success();
    let h0 = head_commit(dir.path());

    run_gitlet_command(dir.path(), &["branch", "alt"])
        .assert()
        .success();
    assert_eq!(read_ref(dir.path(), "refs/heads/alt"), h0);

    // H1 on master
    write_file(FileSpec::new(
        dir.path().join("a").join("1.txt"),
        "two".to_string(),
    ));
    run_gitlet_command(dir.path(), &["add", "a/1.txt"])
        .assert()
        .success();
    gitlet_commit(dir.path(), "on-master").assert().success();
    let h1 = head_commit(dir.path());

    // switching to alt restores the root content
    run_gitlet_command(dir.path(), &["checkout", "alt"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(dir.path().join("a").join("1.txt"))?, "one");

    // H2 on alt
    write_file(FileSpec::new(
        dir.path().join("a").join("1.txt"),
        "three".to_string(),
    ));
    run_gitlet_command(dir.path(), &["add", "a/1.txt"])
        .assert()
        .success();
    gitlet_commit(dir.path(), "on-alt").assert().success();
    let h2 = head_commit(dir.path());

    // both tips descend from H0 and from nothing else
    assert_eq!(commit_parents(dir.path(), &h1), vec![h0.clone()]);
    assert_eq!(commit_parents(dir.path(), &h2), vec![h0]);
    assert_ne!(h1, h2);

    Ok(())
}
