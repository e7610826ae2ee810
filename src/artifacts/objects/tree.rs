//! Tree object
//!
//! Trees represent directory snapshots. Each entry maps a single path segment
//! to either a blob id or a child tree id; trees nest, so a path `a/b/c`
//! expands to three nested trees.
//!
//! ## Format
//!
//! The body lists entries sorted by name, one per line:
//! ```text
//! blob <hash> <name>
//! tree <hash> <name>
//! ```
//! The fixed order makes identical contents hash identically.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// A single tree entry: a child tree or a blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Blob(ObjectId),
    Tree(ObjectId),
}

impl TreeNode {
    pub fn oid(&self) -> &ObjectId {
        match self {
            TreeNode::Blob(oid) | TreeNode::Tree(oid) => oid,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            TreeNode::Blob(_) => ObjectType::Blob.as_str(),
            TreeNode::Tree(_) => ObjectType::Tree.as_str(),
        }
    }
}

/// Tree object representing one directory level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, TreeNode>,
}

impl Tree {
    pub fn insert_blob(&mut self, name: String, oid: ObjectId) {
        self.entries.insert(name, TreeNode::Blob(oid));
    }

    pub fn insert_tree(&mut self, name: String, oid: ObjectId) {
        self.entries.insert(name, TreeNode::Tree(oid));
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeNode)> {
        self.entries.iter()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        for (name, node) in &self.entries {
            writeln!(content_bytes, "{} {} {}", node.tag(), node.oid(), name)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            // "<tag> <hash> <name>"; the name may itself contain spaces
            let (tag, rest) = line
                .split_once(' ')
                .ok_or_else(|| anyhow::anyhow!("malformed tree entry: {}", line))?;
            if rest.len() < OBJECT_ID_LENGTH + 2 {
                return Err(anyhow::anyhow!("malformed tree entry: {}", line));
            }
            let (hash, name) = rest.split_at(OBJECT_ID_LENGTH);
            let name = name
                .strip_prefix(' ')
                .ok_or_else(|| anyhow::anyhow!("malformed tree entry: {}", line))?;

            let oid = ObjectId::try_parse(hash.to_string())?;
            let node = match ObjectType::try_parse(tag)? {
                ObjectType::Blob => TreeNode::Blob(oid),
                ObjectType::Tree => TreeNode::Tree(oid),
                ObjectType::Commit => {
                    return Err(anyhow::anyhow!("commit entry inside a tree: {}", line));
                }
            };
            entries.insert(name.to_string(), node);
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(name, node)| format!("{} {}\t{}", node.tag(), node.oid(), name))
            .collect::<Vec<String>>()
            .join("\n")
    }
}
