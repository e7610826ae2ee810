//! Repository configuration
//!
//! An INI-like nested key/value file. Sections are `[section]` or
//! `[section "subsection"]` headers followed by `key = value` lines.
//! Recognized settings:
//!
//! - `core.bare`: the repository has no working copy
//! - `remote.<name>.url`: filesystem path of a peer repository
//! - `branch.<name>.remote`: upstream (`<remote>/<branch>`) of a local branch

use anyhow::Context;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

const SECTION_REGEX: &str = r#"^\[([a-z]+)(?: "(.+)")?\]$"#;

type SectionKey = (String, Option<String>);

/// Parsed repository configuration
#[derive(Debug)]
pub struct Config {
    path: Box<Path>,
    sections: BTreeMap<SectionKey, BTreeMap<String, String>>,
}

impl Config {
    /// Load the configuration file, tolerating its absence
    pub fn load(path: Box<Path>) -> anyhow::Result<Self> {
        let mut config = Config {
            path,
            sections: BTreeMap::new(),
        };

        if !config.path.exists() {
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config.path)
            .with_context(|| format!("unable to read config at {:?}", config.path))?;
        let section_regex = regex::Regex::new(SECTION_REGEX)?;

        let mut current: Option<SectionKey> = None;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(captures) = section_regex.captures(line) {
                let key = (
                    captures[1].to_string(),
                    captures.get(2).map(|sub| sub.as_str().to_string()),
                );
                config.sections.entry(key.clone()).or_default();
                current = Some(key);
            } else if let Some((key, value)) = line.split_once('=') {
                let section = current
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("config entry outside a section: {}", line))?;
                config
                    .sections
                    .entry(section)
                    .or_default()
                    .insert(key.trim().to_string(), value.trim().to_string());
            } else {
                return Err(anyhow::anyhow!("malformed config line: {}", line));
            }
        }

        Ok(config)
    }

    /// Rewrite the configuration file from the in-memory table
    pub fn store(&self) -> anyhow::Result<()> {
        let mut out = Vec::new();
        for ((section, subsection), values) in &self.sections {
            match subsection {
                Some(subsection) => writeln!(out, "[{} \"{}\"]", section, subsection)?,
                None => writeln!(out, "[{}]", section)?,
            }
            for (key, value) in values {
                writeln!(out, "\t{} = {}", key, value)?;
            }
        }

        std::fs::write(&self.path, out)
            .with_context(|| format!("unable to write config at {:?}", self.path))
    }

    fn get(&self, section: &str, subsection: Option<&str>, key: &str) -> Option<&str> {
        self.sections
            .get(&(section.to_string(), subsection.map(|s| s.to_string())))
            .and_then(|values| values.get(key))
            .map(|value| value.as_str())
    }

    fn set(&mut self, section: &str, subsection: Option<&str>, key: &str, value: String) {
        self.sections
            .entry((section.to_string(), subsection.map(|s| s.to_string())))
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn is_bare(&self) -> bool {
        self.get("core", None, "bare") == Some("true")
    }

    pub fn set_bare(&mut self, bare: bool) {
        self.set("core", None, "bare", bare.to_string());
    }

    pub fn remote_url(&self, remote: &str) -> Option<&str> {
        self.get("remote", Some(remote), "url")
    }

    pub fn has_remote(&self, remote: &str) -> bool {
        self.remote_url(remote).is_some()
    }

    pub fn add_remote(&mut self, remote: &str, url: &str) -> anyhow::Result<()> {
        if self.has_remote(remote) {
            anyhow::bail!("remote {} already exists", remote);
        }
        self.set("remote", Some(remote), "url", url.to_string());
        Ok(())
    }

    /// Upstream of a branch as `<remote>/<branch>`, when configured
    pub fn branch_upstream(&self, branch: &str) -> Option<&str> {
        self.get("branch", Some(branch), "remote")
    }

    pub fn set_branch_upstream(&mut self, branch: &str, upstream: &str) {
        self.set("branch", Some(branch), "remote", upstream.to_string());
    }
}
