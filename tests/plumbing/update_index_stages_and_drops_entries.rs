use crate::common::command::{init_repository_dir, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::object::index_lines;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn update_index_stages_and_drops_entries(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    write_file(FileSpec::new(dir.path().join("extra.txt"), "extra".to_string()));
    run_gitlet_command(dir.path(), &["update-index", "--add", "extra.txt"])
        .assert()
        .success();
    assert!(
        index_lines(dir.path())
            .iter()
            .any(|line| line.starts_with("extra.txt 0\t"))
    );

    run_gitlet_command(dir.path(), &["update-index", "--remove", "extra.txt"])
        .assert()
        .success();
    assert!(
        !index_lines(dir.path())
            .iter()
            .any(|line| line.starts_with("extra.txt"))
    );

    // a missing file cannot be staged
    run_gitlet_command(dir.path(), &["update-index", "--add", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not match any files"));

    Ok(())
}
