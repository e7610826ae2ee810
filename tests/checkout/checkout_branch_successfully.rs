use crate::common::command::{gitlet_commit, init_repository_dir, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::object::read_ref;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;
use std::fs;

#[rstest]
fn checkout_branch_successfully(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_gitlet_command(dir.path(), &["branch", "topic"])
        .assert()
        .success();

    // advance master past the fork
    write_file(FileSpec::new(dir.path().join("1.txt"), "edited".to_string()));
    write_file(FileSpec::new(dir.path().join("new.txt"), "new".to_string()));
    run_gitlet_command(dir.path(), &["add", "."])
        .assert()
        .success();
    gitlet_commit(dir.path(), "advance master").assert().success();

    run_gitlet_command(dir.path(), &["checkout", "topic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to branch 'topic'"));

    assert_eq!(read_ref(dir.path(), "HEAD"), "ref: refs/heads/topic");
    assert_eq!(fs::read_to_string(dir.path().join("1.txt"))?, "one");
    assert!(!dir.path().join("new.txt").exists());

    // checking out the branch again is a no-op
    run_gitlet_command(dir.path(), &["checkout", "topic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already on 'topic'"));

    Ok(())
}
