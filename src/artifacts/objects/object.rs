//! Core object traits
//!
//! This module defines the fundamental traits that all stored objects implement:
//! - `Packable`: Serialization to the canonical binary format
//! - `Unpackable`: Deserialization from the canonical binary format
//! - `Object`: Common object operations (id computation, display)
//!
//! ## Object Format
//!
//! All objects serialize as:
//! ```text
//! <type> <size>\0<body>
//! ```
//! The id of an object is the SHA-1 hash of these bytes; the serialization
//! is deterministic, so equal content always yields the same id.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

/// Trait for serializing objects to the canonical binary format
pub trait Packable {
    /// Serialize the object to bytes (including header)
    fn serialize(&self) -> Result<Bytes>;
}

/// Trait for deserializing objects from the canonical binary format
pub trait Unpackable {
    /// Deserialize the object from a reader (header already consumed)
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Core stored-object trait
///
/// Implemented by all object types (Blob, Tree, Commit).
pub trait Object: Packable {
    /// Get the object's type
    fn object_type(&self) -> ObjectType;

    /// Get a human-readable representation
    fn display(&self) -> String;

    /// Compute the object id (SHA-1 hash of the serialized form)
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }
}
