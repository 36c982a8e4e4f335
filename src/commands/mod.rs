pub mod generate;
pub mod init;
pub mod list;
pub mod watch;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{self, Session, SESSION_FILE};
use crate::element::{to_upper_camel, Element};
use crate::layout;

/// Derive the holder base name from a layout path:
/// `login_activity.xml` -> `LoginActivity`
pub fn base_name_from_layout(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("Layout");
    let name = to_upper_camel(stem);
    if name.is_empty() {
        "Layout".to_string()
    } else {
        name
    }
}

/// File name used in provenance comments
pub fn layout_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("layout.xml")
        .to_string()
}

/// Read and scan a layout file
pub fn scan_layout_file(path: &Path) -> Result<Vec<Element>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    layout::scan(&source)
        .map_err(|e| anyhow::anyhow!("failed to parse `{}`: {}", path.display(), e))
}

/// Resolve the selection session: an explicit flag, the default file if
/// one exists in the working directory, or the built-in defaults
pub fn resolve_session(flag: Option<&str>) -> Result<(Session, Option<PathBuf>)> {
    match flag {
        Some(path) => {
            let path = PathBuf::from(path);
            let session = config::load_session(&path)?;
            Ok((session, Some(path)))
        }
        None => {
            let default = PathBuf::from(SESSION_FILE);
            if default.exists() {
                let session = config::load_session(&default)?;
                Ok((session, Some(default)))
            } else {
                Ok((Session::default(), None))
            }
        }
    }
}
