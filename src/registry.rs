// dskt-check/src/registry.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path};

/// One line of `mods.json`: the mod's declared name and its GitHub repo URL.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryEntry {
    pub name: String,
    pub repo: String,
}

/// The local mod registry, in file order. `mods.json` is append-only, so the
/// last entry is the most recently added mod.
#[derive(Default, Clone, Debug)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

/// Read and parse `mods.json` as a raw JSON document. Kept separate from
/// [`Registry::from_document`] so the caller can schema-check the document
/// before committing to its shape.
pub fn load_document(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

impl Registry {
    pub fn from_document(doc: &serde_json::Value) -> Result<Self> {
        let entries: Vec<RegistryEntry> =
            serde_json::from_value(doc.clone()).context("deserialize registry entries")?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RegistryEntry] { &self.entries }

    /// The most recently appended entry.
    pub fn newest(&self) -> Option<&RegistryEntry> { self.entries.last() }
}

/// `owner/name` pair extracted from a `https://github.com/<owner>/<name>` URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("https://github.com/")
            .or_else(|| url.strip_prefix("http://github.com/"))
            .with_context(|| format!("not a github.com repository url: {url}"))?;
        let rest = rest.trim_end_matches('/');
        let rest = rest.strip_suffix(".git").unwrap_or(rest);
        let (owner, name) = rest
            .split_once('/')
            .with_context(|| format!("expected https://github.com/<owner>/<repo>, got {url}"))?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            anyhow::bail!("expected https://github.com/<owner>/<repo>, got {url}");
        }
        Ok(Self { owner: owner.into(), name: name.into() })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
