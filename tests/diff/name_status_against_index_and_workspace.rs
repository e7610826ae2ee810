use crate::common::command::{init_repository_dir, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

/// One commit argument diffs that commit against the index; none diffs the
/// index against the working copy.
#[rstest]
fn name_status_against_index_and_workspace(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    // an unstaged edit shows up in the index-vs-workspace diff only
    write_file(FileSpec::new(dir.path().join("1.txt"), "edited".to_string()));

    run_gitlet_command(dir.path(), &["diff", "--name-status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M\t1.txt"));

    run_gitlet_command(dir.path(), &["diff", "--name-status", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.txt").not());

    // once staged, the edit shows up against HEAD instead
    run_gitlet_command(dir.path(), &["add", "1.txt"])
        .assert()
        .success();

    run_gitlet_command(dir.path(), &["diff", "--name-status", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M\t1.txt"));

    run_gitlet_command(dir.path(), &["diff", "--name-status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.txt").not());

    Ok(())
}
