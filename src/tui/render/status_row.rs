use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::helpers::push_right_aligned;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let mut spans: Vec<Span> = Vec::new();
    let hint = match app.mode {
        Mode::Navigate => {
            if let Some(msg) = &app.status_message {
                spans.push(Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(app.theme.text).bg(bg),
                ));
            }
            "a add  \u{2423} toggle  e edit  d delete  ? help "
        }
        Mode::Add => "Enter add  Tab priority  Esc done ",
        Mode::Edit => "Enter save  Tab priority  Esc cancel ",
        Mode::Confirm => {
            if let Some(action) = &app.confirm {
                spans.push(Span::styled(
                    format!(" {}", action.prompt(&app.store)),
                    Style::default()
                        .fg(app.theme.red)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            ""
        }
    };

    if app.show_key_hints && !hint.is_empty() {
        push_right_aligned(&mut spans, vec![Span::styled(hint, dim)], width, Style::default().bg(bg));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
