//! Commit object
//!
//! Commits snapshot the repository at a point in time. They contain:
//! - A root tree id (directory snapshot)
//! - 0, 1, or 2 parent commit ids
//! - Author information
//! - Commit message
//!
//! ## Format
//!
//! ```text
//! commit <size>\0tree <tree-hash>
//! parent <parent-hash>
//! author <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Author information: name, email and timestamp with timezone
#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Author {
    name: String,
    email: String,
    timestamp: i64,
    timezone: String,
}

impl Author {
    /// Load author information from the environment
    ///
    /// Reads GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL, and optionally GIT_AUTHOR_DATE
    /// (unix seconds plus offset, e.g. `1700000000 +0000`). Without a date the
    /// current time is used.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME").unwrap_or_else(|_| "gitlet".to_string());
        let email =
            std::env::var("GIT_AUTHOR_EMAIL").unwrap_or_else(|_| "gitlet@localhost".to_string());

        let (timestamp, timezone) = match std::env::var("GIT_AUTHOR_DATE")
            .ok()
            .and_then(|date| Self::parse_date(&date))
        {
            Some(parsed) => parsed,
            None => {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_secs() as i64)
                    .unwrap_or_default();
                (now, "+0000".to_string())
            }
        };

        Ok(Author::new(name, email, timestamp, timezone))
    }

    fn parse_date(date: &str) -> Option<(i64, String)> {
        let mut parts = date.split_whitespace();
        let timestamp = parts.next()?.parse::<i64>().ok()?;
        let timezone = parts.next().unwrap_or("+0000").to_string();
        Some((timestamp, timezone))
    }

    /// Format complete author info as stored in commits
    ///
    /// # Returns
    ///
    /// String in format "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name, self.email, self.timestamp, self.timezone
        )
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"; split from the right so
        // names containing spaces survive.
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid author format: {}", value));
        }

        let timezone = parts[0].to_string();
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid author timestamp: {}", parts[1]))?;
        let name_email = parts[2];

        let email_start = name_email
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '<'"))?;
        let email_end = name_email
            .find('>')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '>'"))?;

        let name = name_email[..email_start].trim().to_string();
        let email = name_email[email_start + 1..email_end].to_string();

        Ok(Author::new(name, email, timestamp, timezone))
    }
}

/// Commit object: a tree snapshot plus parents and a message
#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Commit {
    tree: ObjectId,
    parents: Vec<ObjectId>,
    author: Author,
    message: String,
}

impl Commit {
    pub fn tree(&self) -> &ObjectId {
        &self.tree
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, used in command output
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        writeln!(content_bytes, "tree {}", self.tree)?;
        for parent in &self.parents {
            writeln!(content_bytes, "parent {}", parent)?;
        }
        writeln!(content_bytes, "author {}", self.author.display())?;
        writeln!(content_bytes)?;
        content_bytes.write_all(self.message.as_bytes())?;

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut lines = reader.lines();

        for line in lines.by_ref() {
            let line = line?;
            if line.is_empty() {
                break;
            }

            match line.split_once(' ') {
                Some(("tree", hash)) => tree = Some(ObjectId::try_parse(hash.to_string())?),
                Some(("parent", hash)) => parents.push(ObjectId::try_parse(hash.to_string())?),
                Some(("author", rest)) => author = Some(Author::try_from(rest)?),
                _ => return Err(anyhow::anyhow!("malformed commit header: {}", line)),
            }
        }

        let message = lines.collect::<Result<Vec<_>, _>>()?.join("\n");

        Ok(Commit {
            tree: tree.ok_or_else(|| anyhow::anyhow!("commit without a tree"))?,
            parents,
            author: author.ok_or_else(|| anyhow::anyhow!("commit without an author"))?,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut out = format!("tree {}\n", self.tree);
        for parent in &self.parents {
            out.push_str(&format!("parent {}\n", parent));
        }
        out.push_str(&format!("author {}\n\n{}", self.author.display(), self.message));
        out
    }
}
