use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{Day, TaskPatch};
use crate::tui::app::{App, ConfirmAction, Mode, TaskForm};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    let day = app.active_day();
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Days
        (_, KeyCode::Tab | KeyCode::Right | KeyCode::Char('l')) => {
            app.select_day(day.next());
        }
        (_, KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h')) => {
            app.select_day(day.prev());
        }
        (_, KeyCode::Char(c @ '1'..='7')) => {
            let idx = c as usize - '1' as usize;
            app.select_day(Day::ALL[idx]);
        }
        (_, KeyCode::Char('t')) => {
            let today = app.selector.today();
            app.select_day(today);
        }

        // Cursor
        (_, KeyCode::Down | KeyCode::Char('j')) => move_cursor(app, 1),
        (_, KeyCode::Up | KeyCode::Char('k')) => move_cursor(app, -1),
        (_, KeyCode::Home | KeyCode::Char('g')) => app.cursor = 0,
        (_, KeyCode::End | KeyCode::Char('G')) => {
            app.cursor = app.store.total_count(day).saturating_sub(1);
        }

        // Task actions
        (_, KeyCode::Char('a') | KeyCode::Char('n')) => {
            app.form = Some(TaskForm::new_task());
            app.mode = Mode::Add;
        }
        (_, KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter) => {
            if let Some(id) = app.cursor_task().map(|t| t.id) {
                app.store.toggle_task(day, id);
            }
        }
        (_, KeyCode::Char('e')) => {
            if let Some(form) = app.cursor_task().map(TaskForm::edit) {
                app.form = Some(form);
                app.mode = Mode::Edit;
            }
        }
        (_, KeyCode::Char('d') | KeyCode::Delete) => {
            if let Some(id) = app.cursor_task().map(|t| t.id) {
                app.store.delete_task(day, id);
            }
        }
        (_, KeyCode::Char('p')) => {
            if let Some((id, priority)) = app.cursor_task().map(|t| (t.id, t.priority)) {
                app.store
                    .update_task(day, id, TaskPatch::priority(priority.cycle()));
            }
        }
        (_, KeyCode::Char('c')) => {
            if app.store.completed_count(day) == 0 {
                app.status_message = Some("nothing completed to clear".into());
            } else {
                app.store.clear_completed(day);
            }
        }
        (_, KeyCode::Char('D')) => {
            if app.store.total_count(day) > 0 {
                app.confirm = Some(ConfirmAction::ClearDay(day));
                app.mode = Mode::Confirm;
            }
        }
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    let len = app.store.total_count(app.active_day());
    if len == 0 {
        app.cursor = 0;
        return;
    }
    let next = app.cursor as isize + delta;
    app.cursor = next.clamp(0, len as isize - 1) as usize;
}
