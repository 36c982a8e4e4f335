//! Keyboard input handling for watch mode
//!
//! Non-blocking key polling so the watch loop can react to 'r' (regenerate
//! now) and 'q' (quit) while waiting for file events.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io;
use std::time::Duration;

/// Actions that can be triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Force a regeneration even without a file change
    Regenerate,
    /// Quit watch mode
    Quit,
    /// No action (timeout or unrecognized key)
    None,
}

/// Guard that restores terminal state when dropped
pub struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    /// Enable raw mode and return a guard that will restore on drop
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { enabled: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled {
            let _ = disable_raw_mode();
        }
    }
}

/// Poll for keyboard input with a timeout
///
/// Returns the action corresponding to the key pressed, or
/// `KeyAction::None` if no key was pressed within the timeout period.
///
/// # Keyboard shortcuts
/// - `r` - Regenerate
/// - `q` - Quit
/// - `Ctrl+C` - Quit
pub fn poll_key(timeout: Duration) -> io::Result<KeyAction> {
    if event::poll(timeout)? {
        if let Event::Key(key_event) = event::read()? {
            return Ok(key_to_action(key_event));
        }
    }
    Ok(KeyAction::None)
}

fn key_to_action(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('r') => KeyAction::Regenerate,
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

/// Print the keyboard shortcuts help message
pub fn print_shortcuts() {
    println!("   Press {} to regenerate, {} to quit", "r", "q");
}
