use anyhow::Result;
use colored::Colorize;
use notify::{Event, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::commands::generate;
use crate::config::SESSION_FILE;
use crate::keyboard::{self, KeyAction, RawModeGuard};

/// Regenerate into the target file whenever the layout or session changes
pub fn execute(layout: &str, into: &str, session: Option<&str>) -> Result<()> {
    let layout_path = PathBuf::from(layout);
    let session_path = session.map(PathBuf::from).or_else(|| {
        let default = PathBuf::from(SESSION_FILE);
        default.exists().then_some(default)
    });

    // Initial generation
    let mut last_hash = match generate::execute(layout, session, Some(into), None) {
        Ok(()) => {
            println!("{}", "   Watching for changes...".green().bold());
            Some(content_hash(&layout_path, session_path.as_deref()))
        }
        Err(e) => {
            eprintln!("{} initial generation failed: {}", "error:".red().bold(), e);
            eprintln!("Watching anyway (will retry on file changes)...");
            None
        }
    };

    keyboard::print_shortcuts();

    // Set up file watcher
    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&layout_path, RecursiveMode::NonRecursive)?;
    if let Some(path) = &session_path {
        watcher.watch(path, RecursiveMode::NonRecursive)?;
    }

    // Enable raw mode for keyboard input
    let _raw_guard = RawModeGuard::new()?;

    // Watch loop
    loop {
        match keyboard::poll_key(Duration::from_millis(100))? {
            KeyAction::Quit => {
                println!("\n   Exiting watch mode");
                return Ok(());
            }
            KeyAction::Regenerate => {
                println!("\n   Regenerating...");
                match generate::execute(layout, session, Some(into), None) {
                    Ok(()) => {
                        last_hash = Some(content_hash(&layout_path, session_path.as_deref()));
                        println!("   {}", "Finished".green().bold());
                    }
                    Err(e) => eprintln!("{} generation failed: {}", "error:".red().bold(), e),
                }
                continue;
            }
            KeyAction::None => {}
        }

        // Check for file system events (non-blocking)
        while let Ok(event) = rx.try_recv() {
            if !should_regenerate(&event) {
                continue;
            }

            // editors fire several events per save; the input hash keeps
            // the no-op runs quiet
            let hash = content_hash(&layout_path, session_path.as_deref());
            if last_hash.as_ref() == Some(&hash) {
                continue;
            }

            let changed = event
                .paths
                .first()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("file");
            println!("\nChange detected in {}", changed);

            match generate::execute(layout, session, Some(into), None) {
                Ok(()) => {
                    last_hash = Some(hash);
                    println!("   {}", "Finished".green().bold());
                }
                Err(e) => eprintln!("{} generation failed: {}", "error:".red().bold(), e),
            }
        }
    }
}

/// SHA-256 over the generation inputs (layout + session bytes)
fn content_hash(layout: &Path, session: Option<&Path>) -> String {
    let mut hasher = Sha256::new();
    if let Ok(bytes) = fs::read(layout) {
        hasher.update(&bytes);
    }
    if let Some(path) = session {
        if let Ok(bytes) = fs::read(path) {
            hasher.update(&bytes);
        }
    }
    format!("{:x}", hasher.finalize())
}

fn should_regenerate(event: &notify::Event) -> bool {
    use notify::EventKind::*;

    match event.kind {
        Modify(_) | Create(_) | Remove(_) => event.paths.iter().any(|p| {
            p.extension()
                .is_some_and(|ext| ext == "xml" || ext == "toml")
        }),
        _ => false,
    }
}
