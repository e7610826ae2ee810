use crate::common::command::{init_repository_dir, run_gitlet_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn list_branches(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_gitlet_command(dir.path(), &["branch", "alt"])
        .assert()
        .success();

    run_gitlet_command(dir.path(), &["checkout", "alt"])
        .assert()
        .success();

    // the current branch is marked with a star
    run_gitlet_command(dir.path(), &["branch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*"))
        .stdout(predicate::str::contains("alt"))
        .stdout(predicate::str::contains("master"));

    Ok(())
}
