use crate::common::command::{gitlet_commit, repository_dir, run_gitlet_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::object::{commit_toc, committed_file_content, head_commit};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// After `init`, staging `a/1.txt` containing `one` and committing, HEAD
/// resolves to the new commit and its table of contents holds exactly that
/// file.
#[rstest]
fn first_commit_records_the_staged_tree(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;

    run_gitlet_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.path().join("a").join("1.txt"),
        "one".to_string(),
    ));
    run_gitlet_command(dir.path(), &["add", "a"])
        .assert()
        .success();

    gitlet_commit(dir.path(), "first")
        .assert()
        .success()
        .stdout(predicate::str::contains("[master"))
        .stdout(predicate::str::contains("first"));

    let commit_oid = head_commit(dir.path());
    assert_eq!(commit_oid.len(), 40);

    let toc = commit_toc(dir.path(), &commit_oid);
    assert_eq!(toc.len(), 1);
    assert!(toc.contains_key("a/1.txt"));
    assert_eq!(
        committed_file_content(dir.path(), &commit_oid, "a/1.txt"),
        "one"
    );

    Ok(())
}

/// The same content staged in two separate repositories hashes to the same
/// blob id.
#[rstest]
fn identical_content_hashes_identically(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let other_dir = TempDir::new()?;

    for dir in [repository_dir.path(), other_dir.path()] {
        run_gitlet_command(dir, &["init"]).assert().success();
        write_file(FileSpec::new(dir.join("same.txt"), "stable".to_string()));
        run_gitlet_command(dir, &["add", "same.txt"])
            .assert()
            .success();
        gitlet_commit(dir, "stable content").assert().success();
    }

    let first = commit_toc(repository_dir.path(), &head_commit(repository_dir.path()));
    let second = commit_toc(other_dir.path(), &head_commit(other_dir.path()));
    assert_eq!(first["same.txt"], second["same.txt"]);

    Ok(())
}
