//! Branch name validation
//!
//! Branch names live under the local and remote heads namespaces, so a bad
//! name would corrupt the ref layout. Validation rejects the characters and
//! shapes that would collide with the ref grammar.

use std::fmt;

/// A validated branch name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Parse and validate a branch name
    ///
    /// Rejected shapes: empty names, leading `.` or `/`, trailing `/` or
    /// `.lock`, `..`, `/.`, `@{`, whitespace, control characters, and the
    /// glob/ref metacharacters `*:?[\^~`.
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("branch name cannot be empty");
        }
        if name.starts_with('.') || name.starts_with('/') {
            anyhow::bail!("invalid branch name: {}", name);
        }
        if name.ends_with('/') || name.ends_with(".lock") {
            anyhow::bail!("invalid branch name: {}", name);
        }
        if name.contains("..") || name.contains("/.") || name.contains("@{") {
            anyhow::bail!("invalid branch name: {}", name);
        }
        if name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "*:?[\\^~".contains(c))
        {
            anyhow::bail!("invalid branch name: {}", name);
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
