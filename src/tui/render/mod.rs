pub mod day_card;
pub mod helpers;
pub mod help_overlay;
pub mod status_row;
pub mod tab_bar;
pub mod task_list;
pub mod week_overview;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::App;
use super::theme::Theme;

/// Below this height the week overview strip is hidden
const OVERVIEW_MIN_HEIGHT: u16 = 22;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let overview_height = if area.height >= OVERVIEW_MIN_HEIGHT { 3 } else { 0 };

    // Layout: tab bar | day card | task list | footer | week overview | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Length(4), // day card
            Constraint::Min(3),    // task list
            Constraint::Length(2), // footer stats
            Constraint::Length(overview_height),
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);
    day_card::render_day_card(frame, app, chunks[1]);
    task_list::render_task_list(frame, app, chunks[2]);
    day_card::render_day_footer(frame, app, chunks[3]);
    if overview_height > 0 {
        week_overview::render_week_overview(frame, app, chunks[4]);
    }
    status_row::render_status_row(frame, app, chunks[5]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }
}

/// Placeholder shown while the store loads
pub fn render_loading(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();
    let bg_style = Style::default().bg(theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let mid = area.height / 2;
    let line = Line::from(Span::styled(
        "Loading your week\u{2026}",
        Style::default()
            .fg(theme.dim)
            .bg(theme.background)
            .add_modifier(Modifier::ITALIC),
    ))
    .centered();
    let row = ratatui::layout::Rect {
        y: area.y + mid,
        height: 1.min(area.height),
        ..area
    };
    frame.render_widget(Paragraph::new(line), row);
}
