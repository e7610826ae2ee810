use crate::common::command::{init_repository_dir, run_gitlet_command};
use crate::common::object::index_lines;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn adding_a_missing_path_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let index_before = index_lines(dir.path());

    run_gitlet_command(dir.path(), &["add", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "pathspec 'missing.txt' did not match any files",
        ));

    assert_eq!(index_lines(dir.path()), index_before);

    Ok(())
}
