//! Terminal key adapter.
//!
//! Stands in for the hardware volume rocker: with the kitty keyboard
//! protocol crossterm reports separate press and release events, so the
//! arrow keys carry real hold durations. Up arrow is the commit/decode key,
//! down arrow the symbol key. This adapter holds no decoding state; it only
//! maps keys to raw codes and stamps a monotonic clock.

use std::io::stdout;
use std::time::Instant;

use crossterm::event::{
    self, Event, KeyCode as TermKey, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use tracing::warn;

use crate::keys::{KeyAction, KeyCode, KeyEvent};

/// Runs the blocking crossterm read loop, forwarding mapped events until the
/// user quits (Esc, `q`, or Ctrl+C) or the receiver is dropped.
pub fn run_key_loop(
    tx: flume::Sender<KeyEvent>,
    control: KeyCode,
    input: KeyCode,
) -> anyhow::Result<()> {
    terminal::enable_raw_mode()?;
    let releases_reported = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if releases_reported {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        warn!("terminal does not report key releases; every press will classify short");
    }

    let result = read_loop(&tx, control, input, releases_reported);

    if releases_reported {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    terminal::disable_raw_mode()?;
    result
}

fn read_loop(
    tx: &flume::Sender<KeyEvent>,
    control: KeyCode,
    input: KeyCode,
    releases_reported: bool,
) -> anyhow::Result<()> {
    let epoch = Instant::now();

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };

        // In raw mode Ctrl+C arrives here as a key, not a signal.
        let ctrl_c =
            key.code == TermKey::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || key.code == TermKey::Esc || key.code == TermKey::Char('q') {
            return Ok(());
        }

        let code = match key.code {
            TermKey::Up => input,
            TermKey::Down => control,
            _ => continue,
        };
        let action = match key.kind {
            KeyEventKind::Press => KeyAction::Down,
            KeyEventKind::Release => KeyAction::Up,
            KeyEventKind::Repeat => continue,
        };
        let timestamp_ms = epoch.elapsed().as_millis() as u64;

        if tx.send(KeyEvent {
            code,
            action,
            timestamp_ms,
        })
        .is_err()
        {
            return Ok(());
        }

        // Without release reporting, synthesize an immediate release so a
        // tap still registers as a short press.
        if !releases_reported && action == KeyAction::Down {
            let _ = tx.send(KeyEvent {
                code,
                action: KeyAction::Up,
                timestamp_ms,
            });
        }
    }
}
