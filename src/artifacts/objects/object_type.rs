use std::io::BufRead;

/// The three kinds of stored objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    pub fn try_parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow::anyhow!("Unknown object type: {}", value)),
        }
    }

    /// Consume the `<type> <size>\0` header from a reader and return the type
    ///
    /// Leaves the reader positioned at the first byte of the object body.
    pub fn parse_object_type(reader: &mut impl BufRead) -> anyhow::Result<Self> {
        let mut type_bytes = Vec::new();
        reader.read_until(b' ', &mut type_bytes)?;
        if type_bytes.pop() != Some(b' ') {
            return Err(anyhow::anyhow!("unexpected EOF in object header"));
        }

        let mut size_bytes = Vec::new();
        reader.read_until(b'\0', &mut size_bytes)?;
        if size_bytes.pop() != Some(b'\0') {
            return Err(anyhow::anyhow!("unexpected EOF in object header"));
        }

        Self::try_parse(std::str::from_utf8(&type_bytes)?)
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
