use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Day;
use crate::tui::app::App;

use super::helpers::{push_right_aligned, spans_width};

/// Render the tab bar: one tab per day, with separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Split into tab row and separator row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    spans.push(Span::styled(" ", Style::default().bg(bg)));

    for day in Day::ALL {
        let is_current = app.active_day() == day;
        let style = tab_style(app, is_current);
        let tab_bg = if is_current { app.theme.selection_bg } else { bg };

        spans.push(Span::styled(format!(" {}", day.short()), style));
        if app.selector.is_today(day) {
            spans.push(Span::styled(
                "\u{2022}",
                Style::default().fg(app.theme.highlight).bg(tab_bg),
            ));
        }

        let summary = app.summary(day);
        if summary.total > 0 {
            let color = if summary.is_complete() {
                app.theme.green
            } else {
                app.theme.dim
            };
            spans.push(Span::styled(
                format!(" {}/{}", summary.completed, summary.total),
                Style::default().fg(color).bg(tab_bg),
            ));
        }
        spans.push(Span::styled(" ", style));

        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    // Week totals on the right
    let (done, total) = app.store.week_totals();
    if total > 0 {
        let right = vec![Span::styled(
            format!("week {}/{} ", done, total),
            Style::default().fg(app.theme.dim).bg(bg),
        )];
        push_right_aligned(&mut spans, right, area.width as usize, Style::default().bg(bg));
    }

    let line = Line::from(spans);
    let tabs = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let mut line: String = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
