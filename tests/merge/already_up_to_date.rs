use crate::common::command::{gitlet_commit, init_repository_dir, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::object::head_commit;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// Merging an ancestor (or the current commit itself) changes nothing.
#[rstest]
fn already_up_to_date(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_gitlet_command(dir.path(), &["branch", "old"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.path().join("1.txt"), "newer".to_string()));
    run_gitlet_command(dir.path(), &["add", "1.txt"])
        .assert()
        .success();
    gitlet_commit(dir.path(), "advance master").assert().success();
    let tip = head_commit(dir.path());

    // the old branch tip is an ancestor of master
    run_gitlet_command(dir.path(), &["merge", "old"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up-to-date."));
    assert_eq!(head_commit(dir.path()), tip);

    // so is the current commit itself
    run_gitlet_command(dir.path(), &["merge", "master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up-to-date."));
    assert_eq!(head_commit(dir.path()), tip);

    Ok(())
}
