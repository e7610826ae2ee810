//! Object identifier (SHA-1 hash)
//!
//! Object ids are 40-character hexadecimal strings computed over the canonical
//! byte form of an object. Equal content hashes to the same id; ids are the
//! sole object identity.

use crate::artifacts::objects::OBJECT_ID_LENGTH;

/// Object identifier (SHA-1 hash)
///
/// A 40-character hexadecimal string that uniquely identifies an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object id length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object id characters: {}", id));
        }
        Ok(Self(id))
    }

    /// Check whether a string has the shape of a full object id
    pub fn looks_like_oid(value: &str) -> bool {
        value.len() == OBJECT_ID_LENGTH && value.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get abbreviated form of the object id
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
