use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use uuid::Uuid;

use crate::io::config_io::read_config;
use crate::io::persist::FileStore;
use crate::model::{Day, PlannerConfig, Priority, Task, normalize_text};
use crate::ops::clock::SystemClock;
use crate::ops::sort::display_order;
use crate::ops::store::{LoadOutcome, StoreEvent, TaskStore};
use crate::ops::summary::{DaySummary, task_noun};
use crate::util::unicode;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Add form open
    Add,
    /// Editing the task under the cursor
    Edit,
    /// Waiting for y/n on a destructive action
    Confirm,
}

/// The active day plus what "today" is. Pure presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySelector {
    active: Day,
    today: Day,
}

impl DaySelector {
    pub fn new(active: Day, today: Day) -> Self {
        DaySelector { active, today }
    }

    pub fn active(&self) -> Day {
        self.active
    }

    pub fn select(&mut self, day: Day) {
        self.active = day;
    }

    pub fn next(&mut self) {
        self.active = self.active.next();
    }

    pub fn prev(&mut self) {
        self.active = self.active.prev();
    }

    pub fn today(&self) -> Day {
        self.today
    }

    pub fn is_today(&self, day: Day) -> bool {
        self.today == day
    }

    /// Re-read the host clock (the date can roll over while the app is open)
    pub fn set_today(&mut self, today: Day) {
        self.today = today;
    }
}

/// What the open form will do on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    New,
    Existing(Uuid),
}

/// Text input + priority selector shared by the add and edit forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub target: FormTarget,
    pub buffer: String,
    /// Byte offset into `buffer`, always on a grapheme boundary
    pub cursor: usize,
    pub priority: Priority,
}

impl TaskForm {
    /// Empty add form, medium priority
    pub fn new_task() -> Self {
        TaskForm {
            target: FormTarget::New,
            buffer: String::new(),
            cursor: 0,
            priority: Priority::Medium,
        }
    }

    /// Edit form prefilled from `task`
    pub fn edit(task: &Task) -> Self {
        TaskForm {
            target: FormTarget::Existing(task.id),
            buffer: task.text.clone(),
            cursor: task.text.len(),
            priority: task.priority,
        }
    }

    /// Submit is inert while the text is blank
    pub fn can_submit(&self) -> bool {
        normalize_text(&self.buffer).is_some()
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        let clean = s.replace(['\n', '\r'], " ");
        self.buffer.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(self.cursor..next, "");
        }
    }

    pub fn delete_word_back(&mut self) {
        let start = unicode::word_boundary_left(&self.buffer, self.cursor);
        self.buffer.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }
}

/// Destructive actions that need a y/n first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearDay(Day),
}

impl ConfirmAction {
    pub fn prompt(&self, store: &TaskStore) -> String {
        match self {
            ConfirmAction::ClearDay(day) => {
                let n = store.total_count(*day);
                format!("Clear all {} {} for {}? (y/n)", n, task_noun(n), day.label())
            }
        }
    }
}

/// Main application state. The store owns the tasks; everything else here is
/// per-session presentation state.
pub struct App {
    pub store: TaskStore,
    pub selector: DaySelector,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Cursor index into the sorted task list of the active day
    pub cursor: usize,
    /// First visible task row
    pub scroll_offset: usize,
    pub form: Option<TaskForm>,
    pub confirm: Option<ConfirmAction>,
    pub show_help: bool,
    /// One-shot message for the status row, cleared on the next key press
    pub status_message: Option<String>,
    events: Receiver<StoreEvent>,
}

impl App {
    pub fn new(mut store: TaskStore, config: &PlannerConfig, today: Day) -> Self {
        let (tx, events) = mpsc::channel();
        store.subscribe(Box::new(move |event: &StoreEvent| {
            let _ = tx.send(event.clone());
        }));

        let status_message = match store.load_outcome() {
            LoadOutcome::Recovered { reason } => Some(format!(
                "{}; started with an empty week (see .recovery.log)",
                reason
            )),
            _ => None,
        };

        App {
            store,
            selector: DaySelector::new(config.ui.resolve_start_day(today), today),
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            cursor: 0,
            scroll_offset: 0,
            form: None,
            confirm: None,
            show_help: false,
            status_message,
            events,
        }
    }

    pub fn active_day(&self) -> Day {
        self.selector.active()
    }

    /// The active day's tasks in display order, recomputed on every call
    pub fn visible_tasks(&self) -> Vec<&Task> {
        display_order(self.store.tasks_for_day(self.active_day()))
    }

    pub fn cursor_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.cursor).copied()
    }

    pub fn summary(&self, day: Day) -> DaySummary {
        DaySummary::for_day(&self.store, day)
    }

    /// Switch days. The cursor starts at the top of the new day.
    pub fn select_day(&mut self, day: Day) {
        self.selector.select(day);
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.store.total_count(self.active_day());
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Put the cursor on the task with `id`, if it is visible
    fn follow(&mut self, id: Uuid) {
        if let Some(pos) = self.visible_tasks().iter().position(|t| t.id == id) {
            self.cursor = pos;
        }
    }

    /// React to store notifications: keep the cursor on the task that moved and
    /// report what happened.
    pub fn process_store_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if event.day() == self.active_day() {
                match event {
                    StoreEvent::Added { id, .. }
                    | StoreEvent::Toggled { id, .. }
                    | StoreEvent::Updated { id, .. } => self.follow(id),
                    _ => self.clamp_cursor(),
                }
            }
            self.status_message = Some(self.describe(&event));
        }
        if let Some(err) = self.store.last_save_error() {
            self.status_message = Some(format!("save failed ({}); changes kept in memory", err));
        }
    }

    fn describe(&self, event: &StoreEvent) -> String {
        let text = |day: Day, id: Uuid| {
            self.store
                .find_task(day, id)
                .map(|t| unicode::truncate_to_width(&t.text, 40))
                .unwrap_or_default()
        };
        match *event {
            StoreEvent::Added { day, id } => format!("added \"{}\"", text(day, id)),
            StoreEvent::Toggled { day, id, completed } => {
                let verb = if completed { "completed" } else { "reopened" };
                format!("{} \"{}\"", verb, text(day, id))
            }
            StoreEvent::Updated { day, id } => format!("updated \"{}\"", text(day, id)),
            StoreEvent::Deleted { .. } => "deleted task".to_string(),
            StoreEvent::ClearedCompleted { removed, .. } => {
                format!("cleared {} completed {}", removed, task_noun(removed))
            }
            StoreEvent::ClearedDay { day, removed } => {
                format!("cleared {} ({} {})", day.label(), removed, task_noun(removed))
            }
        }
    }
}

/// Run the TUI against the data directory
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_warning) = match read_config(data_dir) {
        Ok(config) => (config, None),
        Err(e) => (PlannerConfig::default(), Some(e.to_string())),
    };

    // The initial load runs off the UI thread; the loading screen shows until it lands.
    let loading = TaskStore::open(FileStore::open(data_dir)?, SystemClock);
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(loading.finish());
    });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    enter_screen(&mut stdout)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = leave_screen(&mut io::stdout());
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, rx, &config, config_warning);

    // Restore terminal
    disable_raw_mode()?;
    leave_screen(terminal.backend_mut())?;
    terminal.show_cursor()?;

    result
}

/// Alternate screen plus bracketed paste, so a pasted newline arrives inside
/// `Event::Paste` instead of as an Enter that submits the form.
fn enter_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(out, EnterAlternateScreen, EnableBracketedPaste)
}

fn leave_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(out, DisableBracketedPaste, LeaveAlternateScreen)
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    loaded: Receiver<TaskStore>,
    config: &PlannerConfig,
    config_warning: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let theme = Theme::from_config(&config.ui);
    let store = loop {
        terminal.draw(|frame| render::render_loading(frame, &theme))?;
        match loaded.recv_timeout(Duration::from_millis(50)) {
            Ok(store) => break store,
            Err(RecvTimeoutError::Timeout) => {
                if event::poll(Duration::ZERO)?
                    && let Event::Key(key) = event::read()?
                    && (key.code == KeyCode::Char('q')
                        || (key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL)))
                {
                    return Ok(());
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err("task loading stopped unexpectedly".into());
            }
        }
    };

    let mut app = App::new(store, config, Day::today());
    if let Some(warning) = config_warning {
        app.status_message = Some(format!("{} (using defaults)", warning));
    }

    loop {
        app.selector.set_today(Day::today());
        terminal.draw(|frame| render::render(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(&mut app, key);
                }
                Event::Paste(text) => input::handle_paste(&mut app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn screen_setup_toggles_bracketed_paste() {
        let mut out = Vec::new();
        enter_screen(&mut out).unwrap();
        let entered = String::from_utf8(out).unwrap();
        assert!(entered.contains("\x1b[?1049h"));
        assert!(entered.contains("\x1b[?2004h"));

        let mut out = Vec::new();
        leave_screen(&mut out).unwrap();
        let left = String::from_utf8(out).unwrap();
        assert!(left.contains("\x1b[?2004l"));
        assert!(left.contains("\x1b[?1049l"));
    }

    #[test]
    fn selector_wraps_and_tracks_today() {
        let mut sel = DaySelector::new(Day::Sunday, Day::Wednesday);
        sel.next();
        assert_eq!(sel.active(), Day::Monday);
        sel.prev();
        sel.prev();
        assert_eq!(sel.active(), Day::Saturday);
        assert!(sel.is_today(Day::Wednesday));
        assert!(!sel.is_today(Day::Saturday));
        sel.set_today(Day::Saturday);
        assert!(sel.is_today(Day::Saturday));
    }

    #[test]
    fn start_day_defaults_to_monday() {
        let app = empty_app();
        assert_eq!(app.active_day(), Day::Monday);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn start_day_today_from_config() {
        let mut config = PlannerConfig::default();
        config.ui.start_day = "today".into();
        let app = App::new(ready_store(), &config, Day::Friday);
        assert_eq!(app.active_day(), Day::Friday);
    }

    #[test]
    fn form_editing_is_grapheme_aware() {
        let mut form = TaskForm::new_task();
        assert!(!form.can_submit());
        for c in "cafe\u{0301}".chars() {
            form.insert_char(c);
        }
        form.backspace();
        assert_eq!(form.buffer, "caf");
        form.home();
        form.insert_str("my\n");
        assert_eq!(form.buffer, "my caf");
        form.end();
        form.delete_word_back();
        assert_eq!(form.buffer, "my ");
        assert!(form.can_submit());
        form.buffer = "   ".into();
        assert!(!form.can_submit());
    }

    #[test]
    fn edit_form_is_prefilled() {
        let mut app = app_with_tasks(&[("Buy milk", Priority::Low, false)]);
        let task = app.cursor_task().unwrap().clone();
        let form = TaskForm::edit(&task);
        assert_eq!(form.buffer, "Buy milk");
        assert_eq!(form.cursor, 8);
        assert_eq!(form.priority, Priority::Low);
        assert_eq!(form.target, FormTarget::Existing(task.id));
        app.form = Some(form);
    }

    #[test]
    fn cursor_follows_toggled_task() {
        let mut app = app_with_tasks(&[
            ("Buy milk", Priority::Medium, false),
            ("Call dentist", Priority::High, false),
        ]);
        // Display order: Call dentist, Buy milk
        assert_eq!(app.cursor_task().unwrap().text, "Call dentist");
        let id = app.cursor_task().unwrap().id;
        app.store.toggle_task(Day::Monday, id);
        app.process_store_events();

        assert_eq!(app.cursor, 1);
        assert_eq!(app.cursor_task().unwrap().text, "Call dentist");
        assert_eq!(
            app.status_message.as_deref(),
            Some("completed \"Call dentist\"")
        );
    }

    #[test]
    fn cursor_clamped_after_delete() {
        let mut app = app_with_tasks(&[
            ("a", Priority::High, false),
            ("b", Priority::Medium, false),
        ]);
        app.cursor = 1;
        let id = app.cursor_task().unwrap().id;
        app.store.delete_task(Day::Monday, id);
        app.process_store_events();
        assert_eq!(app.cursor, 0);
        assert_eq!(app.status_message.as_deref(), Some("deleted task"));
    }

    #[test]
    fn select_day_resets_cursor() {
        let mut app = app_with_tasks(&[
            ("a", Priority::High, false),
            ("b", Priority::Medium, false),
        ]);
        app.cursor = 1;
        app.select_day(Day::Tuesday);
        assert_eq!(app.cursor, 0);
        assert_eq!(app.active_day(), Day::Tuesday);
        assert!(app.visible_tasks().is_empty());
        assert!(app.cursor_task().is_none());
    }

    #[test]
    fn confirm_prompt_counts_tasks() {
        let app = app_with_tasks(&[("a", Priority::High, false)]);
        assert_eq!(
            ConfirmAction::ClearDay(Day::Monday).prompt(&app.store),
            "Clear all 1 task for Monday? (y/n)"
        );
    }
}
