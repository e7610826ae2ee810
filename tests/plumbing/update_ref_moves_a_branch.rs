use crate::common::command::{gitlet_commit, init_repository_dir, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::object::read_ref;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn update_ref_moves_a_branch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_gitlet_command(dir.path(), &["branch", "topic"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.path().join("1.txt"), "edited".to_string()));
    run_gitlet_command(dir.path(), &["add", "1.txt"])
        .assert()
        .success();
    gitlet_commit(dir.path(), "advance master").assert().success();

    run_gitlet_command(dir.path(), &["update-ref", "refs/heads/topic", "master"])
        .assert()
        .success();

    assert_eq!(
        read_ref(dir.path(), "refs/heads/topic"),
        read_ref(dir.path(), "refs/heads/master")
    );

    // the value must resolve to a commit
    run_gitlet_command(dir.path(), &["update-ref", "refs/heads/topic", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    Ok(())
}
