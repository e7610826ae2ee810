use crate::common::command::{gitlet_commit, init_repository_dir, run_gitlet_command};
use crate::common::object::{commit_toc, head_commit};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn remove_a_tracked_file(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_gitlet_command(dir.path(), &["rm", "1.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rm '1.txt'"));

    assert!(!dir.path().join("1.txt").exists());

    gitlet_commit(dir.path(), "drop 1.txt").assert().success();
    let toc = commit_toc(dir.path(), &head_commit(dir.path()));
    assert!(!toc.contains_key("1.txt"));
    assert!(toc.contains_key("a/2.txt"));

    Ok(())
}

#[rstest]
fn remove_a_directory_recursively(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_gitlet_command(dir.path(), &["rm", "-r", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rm 'a/2.txt'"))
        .stdout(predicate::str::contains("rm 'a/b/3.txt'"));

    assert!(!dir.path().join("a").exists());

    gitlet_commit(dir.path(), "drop a/").assert().success();
    let toc = commit_toc(dir.path(), &head_commit(dir.path()));
    assert_eq!(toc.keys().map(String::as_str).collect::<Vec<_>>(), vec!["1.txt"]);

    Ok(())
}
