use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{Priority, TaskPatch};
use crate::tui::app::{App, FormTarget, Mode};

/// Keys for the add and edit forms. Enter submits (inert while blank), Esc
/// discards, Tab/BackTab cycle the priority selector.
pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(form) = &mut app.form else {
        app.mode = Mode::Navigate;
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            close_form(app);
        }
        (_, KeyCode::Enter) => submit(app),
        (_, KeyCode::Tab) => form.priority = form.priority.cycle(),
        (_, KeyCode::BackTab) => form.priority = prev_priority(form.priority),
        (_, KeyCode::Left) => form.move_left(),
        (_, KeyCode::Right) => form.move_right(),
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => form.home(),
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => form.end(),
        (KeyModifiers::ALT, KeyCode::Backspace) | (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
            form.delete_word_back()
        }
        (_, KeyCode::Backspace) => form.backspace(),
        (_, KeyCode::Delete) => form.delete(),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => form.insert_char(c),
        _ => {}
    }
}

fn submit(app: &mut App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    if !form.can_submit() {
        return;
    }
    let day = app.active_day();
    match form.target {
        FormTarget::New => {
            let (text, priority) = (form.buffer.clone(), form.priority);
            if app.store.add_task(day, &text, priority).is_some() {
                close_form(app);
            }
        }
        FormTarget::Existing(id) => {
            let patch = TaskPatch {
                text: Some(form.buffer.clone()),
                priority: Some(form.priority),
                completed: None,
            };
            app.store.update_task(day, id, patch);
            close_form(app);
        }
    }
}

fn close_form(app: &mut App) {
    app.form = None;
    app.mode = Mode::Navigate;
    app.clamp_cursor();
}

fn prev_priority(p: Priority) -> Priority {
    match p {
        Priority::High => Priority::Low,
        Priority::Medium => Priority::High,
        Priority::Low => Priority::Medium,
    }
}
