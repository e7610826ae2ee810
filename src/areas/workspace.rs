//! Working directory file system operations

use crate::areas::database::Database;
use crate::artifacts::diff::tree_diff::FileDelta;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding the repository state, pruned from every walk
const REPO_DIR_NAME: &str = ".gitlet";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List workspace files under a path, relative to the workspace root
    ///
    /// With no argument the whole workspace is listed. A file argument lists
    /// just that file; a directory is walked recursively. The repository
    /// directory is pruned from the walk rather than filtered out of its
    /// results, so its contents are never even visited.
    pub fn list_files(&self, root_file_path: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
        let start = match root_file_path {
            Some(p) => std::fs::canonicalize(p)
                .with_context(|| format!("the specified path does not exist: {:?}", p))?,
            None => self.path.to_path_buf(),
        };

        if start.is_file() {
            return Ok(vec![self.relative_to_root(&start)]);
        }

        let walker = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != REPO_DIR_NAME);

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(self.relative_to_root(entry.path()));
            }
        }

        Ok(files)
    }

    /// Express an absolute path as the index/TOC path key
    fn relative_to_root(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.path.as_ref())
            .map(PathBuf::from)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("unable to read file {:?}", file_path))?;

        Ok(content.into())
    }

    /// Write file content, creating parent directories as needed
    pub fn write_file(&self, file_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("unable to create directory {:?}", parent))?;
        }

        std::fs::write(&full_path, content)
            .with_context(|| format!("unable to write file {:?}", full_path))
    }

    /// Delete a file and prune any directories the deletion left empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.exists() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("unable to remove file {:?}", full_path))?;
        }
        self.prune_empty_parent_dirs(&full_path)?;

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.exists()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("failed to remove empty directory {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    /// Realize a file-level diff plan on disk
    ///
    /// Deletions run first so a path can change between file and directory
    /// shape; writes then pull blob content out of the database.
    pub fn apply_file_plan(
        &self,
        plan: &BTreeMap<PathBuf, FileDelta>,
        database: &Database,
    ) -> anyhow::Result<()> {
        for (path, delta) in plan {
            if delta.to.is_none() {
                self.remove_file(path)?;
            }
        }

        for (path, delta) in plan {
            if let Some(oid) = &delta.to {
                let blob = database
                    .parse_object_as_blob(oid)?
                    .ok_or_else(|| anyhow::anyhow!("object {} is not a blob", oid))?;
                self.write_file(path, blob.content())?;
            }
        }

        Ok(())
    }
}
