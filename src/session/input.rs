use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::practice::{KeyOutcome, PracticeSession};

/// The character a key press types, if any.
///
/// Modifier-only presses, navigation and function keys, and chords held with
/// Ctrl, Alt or Super produce nothing. Shift is fine; it is part of the
/// character. Enter types a line break.
pub fn typed_char(key: &KeyEvent) -> Option<char> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(ch) => Some(ch),
        KeyCode::Enter => Some('\n'),
        _ => None,
    }
}

/// Route a key press into a session.
pub fn process_key(session: &mut PracticeSession, key: &KeyEvent, now: Instant) -> KeyOutcome {
    match typed_char(key) {
        Some(ch) => session.handle_key(ch, now),
        None => KeyOutcome::Ignored,
    }
}
