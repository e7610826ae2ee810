//! User-facing failure kinds
//!
//! Every command-level refusal is one of these variants; lower-level I/O and
//! corrupt-data failures travel as plain `anyhow` context chains. The binary
//! entry point is the only place that renders errors to text.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GitletError {
    #[error("not a gitlet repository")]
    NotInRepo,

    #[error("this operation must be run in a work tree")]
    BareRepoRefusal,

    #[error("pathspec '{path}' did not match any files")]
    PathspecMismatch { path: String },

    #[error("your local changes would be overwritten: {}", paths.join(", "))]
    UncommittedChanges { paths: Vec<String> },

    #[error("reference '{name}' not found")]
    RefNotFound { name: String },

    #[error("'{name}' is not a commit")]
    NotACommit { name: String },

    #[error("a branch named '{name}' already exists")]
    BranchExists { name: String },

    #[error("committing is not possible because you have unmerged files")]
    UnmergedFiles,

    #[error("{what} is unsupported")]
    Unsupported { what: String },
}
