//! Object database
//!
//! The database stores all objects (blobs, trees, commits) using
//! content-addressable storage. Objects are identified by their SHA-1 hash
//! and stored zlib-compressed, one file per object.
//!
//! ## Storage Format
//!
//! - Path: `objects/<40-hex-hash>`
//! - Content: compressed (zlib) canonical form: type, size, and body

use crate::artifacts::objects::Toc;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{Tree, TreeNode};
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Object database
///
/// Manages storage and retrieval of content-addressable objects.
#[derive(Debug)]
pub struct Database {
    /// Path to the objects directory
    path: Box<Path>,
}

impl Database {
    /// Create a new database instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the objects directory
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Store an object in the database
    ///
    /// The object is serialized and written to the path derived from its
    /// hash. Storing an already-present object is a no-op, so writes are
    /// idempotent.
    ///
    /// # Returns
    ///
    /// The id of the stored object
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.as_ref());

        if !object_path.exists() {
            debug!(oid = %object_id, kind = %object.object_type(), "storing object");
            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(object_id)
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.as_ref()).exists()
    }

    /// Get the type of a stored object without parsing its body
    pub fn object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    /// Parse an object as a Blob, if it is one
    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a Tree, if it is one
    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a Commit, if it is one
    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Load a commit, erroring when the object is missing or of another type
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", object_id))
    }

    /// Build nested tree objects from a flat table of contents
    ///
    /// Splits each path into segments, writes one tree object per directory
    /// level bottom-up, and returns the root tree id.
    pub fn store_tree_from(&self, toc: &Toc) -> anyhow::Result<ObjectId> {
        #[derive(Default)]
        struct Node {
            files: BTreeMap<String, ObjectId>,
            dirs: BTreeMap<String, Node>,
        }

        let mut root = Node::default();
        for (path, oid) in toc {
            let mut node = &mut root;
            let mut components = path
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>();
            let file_name = components
                .pop()
                .ok_or_else(|| anyhow::anyhow!("empty path in table of contents"))?;

            for dir in components {
                node = node.dirs.entry(dir).or_default();
            }
            node.files.insert(file_name, oid.clone());
        }

        fn store_node(database: &Database, node: &Node) -> anyhow::Result<ObjectId> {
            let mut tree = Tree::default();
            for (name, oid) in &node.files {
                tree.insert_blob(name.clone(), oid.clone());
            }
            for (name, child) in &node.dirs {
                let child_oid = store_node(database, child)?;
                tree.insert_tree(name.clone(), child_oid);
            }
            database.store(&tree)
        }

        store_node(self, &root)
    }

    /// Flatten a commit's root tree into a table of contents
    pub fn read_commit_toc(&self, commit_oid: &ObjectId) -> anyhow::Result<Toc> {
        let commit = self.load_commit(commit_oid)?;
        self.read_tree_toc(commit.tree())
    }

    /// Flatten a tree into a table of contents
    pub fn read_tree_toc(&self, tree_oid: &ObjectId) -> anyhow::Result<Toc> {
        let mut toc = Toc::new();
        self.flatten_tree(tree_oid, PathBuf::new(), &mut toc)?;
        Ok(toc)
    }

    fn flatten_tree(
        &self,
        tree_oid: &ObjectId,
        prefix: PathBuf,
        toc: &mut Toc,
    ) -> anyhow::Result<()> {
        let tree = self
            .parse_object_as_tree(tree_oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a tree", tree_oid))?;

        for (name, node) in tree.entries() {
            let entry_path = prefix.join(name);
            match node {
                TreeNode::Blob(oid) => {
                    toc.insert(entry_path, oid.clone());
                }
                TreeNode::Tree(oid) => self.flatten_tree(oid, entry_path, toc)?,
            }
        }

        Ok(())
    }

    /// Enumerate every stored object id
    pub fn list_object_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(self.path.as_ref())? {
            let entry = entry?;
            if entry.path().is_file()
                && let Ok(oid) = ObjectId::try_parse(entry.file_name().to_string_lossy().into_owned())
            {
                ids.push(oid);
            }
        }
        ids.sort();

        Ok(ids)
    }

    /// Copy one object from a peer database, byte for byte
    ///
    /// # Returns
    ///
    /// true when the object was copied, false when it was already present
    pub fn copy_object_from(&self, peer: &Database, oid: &ObjectId) -> anyhow::Result<bool> {
        let target = self.path.join(oid.as_ref());
        if target.exists() {
            return Ok(false);
        }

        let source = peer.path.join(oid.as_ref());
        std::fs::create_dir_all(self.path.as_ref())?;
        std::fs::copy(&source, &target)
            .with_context(|| format!("unable to copy object {} from peer", oid))?;
        debug!(oid = %oid, "copied object from peer");

        Ok(true)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_path = self.path.join(object_id.as_ref());
        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).with_context(|| {
            format!("unable to read object file {}", object_path.display())
        })?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.path.as_ref()).with_context(|| {
            format!("unable to create objects directory {}", self.path.display())
        })?;

        let temp_object_path = self.path.join(Self::generate_temp_name());
        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("unable to open object file {}", temp_object_path.display())
            })?;
        file.write_all(&object_content).with_context(|| {
            format!("unable to write object file {}", temp_object_path.display())
        })?;
        drop(file);

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).with_context(|| {
            format!("unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
