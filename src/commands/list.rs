use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use walkdir::WalkDir;

use crate::commands::scan_layout_file;

/// Print the injectable view IDs of a layout file, or of every layout
/// found under a directory
pub fn execute(target: &str) -> Result<()> {
    let path = Path::new(target);

    if path.is_dir() {
        let mut found = false;
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "xml")
            {
                found = true;
                list_file(entry.path())?;
            }
        }
        if !found {
            anyhow::bail!("no layout files found under `{}`", target);
        }
        return Ok(());
    }

    list_file(path)
}

fn list_file(path: &Path) -> Result<()> {
    let elements = scan_layout_file(path)?;

    println!("   {} {}", "Scanning".green().bold(), path.display());
    if elements.is_empty() {
        println!("      no IDs found");
        return Ok(());
    }

    for element in &elements {
        let mut flags = Vec::new();
        if element.clickable {
            flags.push("clickable");
        }
        if element.long_clickable {
            flags.push("long-clickable");
        }
        if element.edit_text {
            flags.push("edit-text");
        }

        let mut extra = String::new();
        if !flags.is_empty() {
            extra.push_str(&format!("  [{}]", flags.join(", ")));
        }
        if let Some(hint) = &element.hint {
            extra.push_str(&format!("  hint: {}", hint));
        }

        println!(
            "      {:<24} {}{}",
            element.id.as_str().bold(),
            element.type_name,
            extra.dimmed()
        );
    }

    Ok(())
}
