use chrono::{Duration, TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::persist::MemoryStore;
use crate::model::{Day, PlannerConfig, Priority};
use crate::ops::clock::SteppingClock;
use crate::ops::store::TaskStore;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A loaded, empty store backed by memory. Each new task is one minute newer
/// than the previous one.
pub fn ready_store() -> TaskStore {
    let start = Utc.with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap();
    TaskStore::open(
        MemoryStore::new(),
        SteppingClock::new(start, Duration::minutes(1)),
    )
    .finish()
}

/// App on an empty week. Active day Monday, "today" Wednesday.
pub fn empty_app() -> App {
    App::new(ready_store(), &PlannerConfig::default(), Day::Wednesday)
}

/// App whose Monday holds the given tasks, added in order
pub fn app_with_tasks(tasks: &[(&str, Priority, bool)]) -> App {
    let mut store = ready_store();
    for &(text, priority, completed) in tasks {
        let id = store.add_task(Day::Monday, text, priority).unwrap();
        if completed {
            store.toggle_task(Day::Monday, id);
        }
    }
    App::new(store, &PlannerConfig::default(), Day::Wednesday)
}
