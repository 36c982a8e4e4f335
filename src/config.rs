use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::element::{Element, FieldNaming};
use crate::generator::DEFAULT_PREFIX;

/// Default session file name, looked up in the working directory
pub const SESSION_FILE: &str = "holster.toml";

/// Selection session: which discovered elements to inject and how.
///
/// Written by `holster init`, hand-edited, then read back by
/// `holster generate`. The layout file stays the source of truth; entries
/// here override what the scan inferred, matched by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub holder: HolderConfig,
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderConfig {
    /// Base type name; derived from the layout file stem when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_naming")]
    pub field_naming: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub auto_implements: bool,
    #[serde(default)]
    pub strict_hints: bool,
}

impl Default for HolderConfig {
    fn default() -> Self {
        Self {
            name: None,
            field_naming: default_naming(),
            prefix: default_prefix(),
            auto_implements: false,
            strict_hints: false,
        }
    }
}

fn default_naming() -> String {
    FieldNaming::default().as_str().to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementConfig {
    pub id: String,
    #[serde(default = "default_true")]
    pub used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clickable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_clickable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_naming: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            holder: HolderConfig::default(),
            elements: Vec::new(),
        }
    }
}

impl Session {
    /// Build a session that lists every discovered element with its
    /// inferred flags spelled out, ready for hand-editing
    pub fn from_elements(base_name: &str, elements: &[Element]) -> Session {
        Session {
            holder: HolderConfig {
                name: Some(base_name.to_string()),
                ..HolderConfig::default()
            },
            elements: elements
                .iter()
                .map(|e| ElementConfig {
                    id: e.id.clone(),
                    used: true,
                    clickable: Some(e.clickable),
                    long_clickable: Some(e.long_clickable),
                    field_naming: None,
                })
                .collect(),
        }
    }

    /// Apply the session's selection to a scanned element list.
    /// A session entry naming an id the layout no longer has is an error.
    pub fn apply(&self, elements: &mut [Element]) -> Result<()> {
        let naming = FieldNaming::parse(&self.holder.field_naming)?;
        for element in elements.iter_mut() {
            element.naming = naming;
        }

        for entry in &self.elements {
            let element = elements
                .iter_mut()
                .find(|e| e.id == entry.id)
                .with_context(|| format!("session element `{}` not found in layout", entry.id))?;

            element.used = entry.used;
            if let Some(clickable) = entry.clickable {
                element.clickable = clickable;
            }
            if let Some(long_clickable) = entry.long_clickable {
                element.long_clickable = long_clickable;
            }
            if let Some(policy) = &entry.field_naming {
                element.naming = FieldNaming::parse(policy)?;
            }
        }

        Ok(())
    }
}

/// Load and validate a session file
pub fn load_session(path: &Path) -> Result<Session> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!("could not find `{}`", path.display())
        } else {
            anyhow::anyhow!("failed to read `{}`: {}", path.display(), e)
        }
    })?;

    let session: Session = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("failed to parse `{}`: {}", path.display(), e))?;

    FieldNaming::parse(&session.holder.field_naming)?;
    for entry in &session.elements {
        if let Some(policy) = &entry.field_naming {
            FieldNaming::parse(policy)?;
        }
    }
    validate_prefix(&session.holder.prefix)?;
    if let Some(name) = &session.holder.name {
        validate_type_name(name)?;
    }

    Ok(session)
}

/// Serialize a session to disk, with a short usage header
pub fn save_session(session: &Session, path: &Path, layout_name: &str) -> Result<()> {
    let mut out = format!(
        "# Selection session for {}\n\
         # Toggle `used`, flip capability flags, or change the naming policy,\n\
         # then run `holster generate`.\n\n",
        layout_name
    );
    out.push_str(&toml::to_string_pretty(session).context("failed to serialize session")?);

    fs::write(path, out).with_context(|| format!("failed to write `{}`", path.display()))?;
    Ok(())
}

/// The prefix lands directly in generated field names, so it must be a
/// valid Java identifier fragment
fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        anyhow::bail!("field prefix must not be empty");
    }

    let mut chars = prefix.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphabetic() && first != '_' && first != '$' {
        anyhow::bail!(
            "invalid field prefix `{}`: must start with a letter, `_` or `$`",
            prefix
        );
    }
    for c in chars {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '$' {
            anyhow::bail!(
                "invalid field prefix `{}`: contains invalid character `{}`",
                prefix,
                c
            );
        }
    }

    Ok(())
}

fn validate_type_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().next().unwrap().is_ascii_uppercase()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        anyhow::bail!(
            "invalid holder name `{}`: must be an upper-case Java type name",
            name
        );
    }
    Ok(())
}
