pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Length of an object id in hexadecimal characters
pub const OBJECT_ID_LENGTH: usize = 40;

/// Flattened `path -> blob id` view of a tree, or of the index at stage 0.
///
/// Tables of contents are the working unit of diff and merge: nested trees
/// are flattened into full paths so per-file comparison is a map lookup.
pub type Toc = BTreeMap<PathBuf, ObjectId>;
