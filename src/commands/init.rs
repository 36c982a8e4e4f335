use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::commands::{base_name_from_layout, layout_file_name, scan_layout_file};
use crate::config::{self, Session, SESSION_FILE};

/// Write a selection session file listing every id found in the layout
pub fn execute(layout: &str, session: Option<&str>, force: bool) -> Result<()> {
    let layout_path = Path::new(layout);

    let elements = scan_layout_file(layout_path)?;
    if elements.is_empty() {
        anyhow::bail!("no IDs found in `{}`", layout);
    }

    let session_path = session
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SESSION_FILE));
    if session_path.exists() && !force {
        anyhow::bail!(
            "`{}` already exists (pass --force to overwrite)",
            session_path.display()
        );
    }

    let base_name = base_name_from_layout(layout_path);
    let session = Session::from_elements(&base_name, &elements);
    config::save_session(&session, &session_path, &layout_file_name(layout_path))?;

    println!(
        "     {} `{}` ({} elements)",
        "Created".green().bold(),
        session_path.display(),
        elements.len()
    );

    Ok(())
}
