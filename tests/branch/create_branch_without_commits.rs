use crate::common::command::{repository_dir, run_gitlet_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn create_branch_without_commits(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_gitlet_command(dir.path(), &["init"]).assert().success();

    run_gitlet_command(dir.path(), &["branch", "topic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("before the first commit"));

    Ok(())
}
