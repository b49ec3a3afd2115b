mod confirm;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::handle_confirm;
use edit::handle_form;
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status_message = None;

    // Help overlay swallows the key that closes it
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add | Mode::Edit => handle_form(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }

    app.process_store_events();
}

/// Handle a bracketed paste. Only the add/edit forms take text.
pub fn handle_paste(app: &mut App, text: &str) {
    if !matches!(app.mode, Mode::Add | Mode::Edit) || text.is_empty() {
        return;
    }
    if let Some(form) = &mut app.form {
        form.insert_str(text);
    }
}

/// Terminals report Shift+letter as an uppercase char with SHIFT set.
/// Drop the modifier so bindings can match on the char alone.
fn normalize_key(key: KeyEvent) -> KeyEvent {
    match key.code {
        KeyCode::Char(c) if c.is_ascii_uppercase() && key.modifiers == KeyModifiers::SHIFT => {
            KeyEvent::new(key.code, KeyModifiers::NONE)
        }
        _ => key,
    }
}
