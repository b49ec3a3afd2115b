use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::summary::{progress_bar, task_noun};
use crate::tui::app::App;

use super::helpers::{long_date, push_right_aligned};

/// Header card for the active day: label, date, count, progress
pub fn render_day_card(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let day = app.active_day();
    let summary = app.summary(day);

    let title_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    // Line 1: day label (+ today badge) .... today's date
    let mut title = vec![Span::styled(format!(" {}", day.label()), title_style)];
    if app.selector.is_today(day) {
        title.push(Span::styled(
            "  today",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    let date = long_date(Local::now().date_naive());
    push_right_aligned(
        &mut title,
        vec![Span::styled(format!("{} ", date), dim)],
        width,
        Style::default().bg(bg),
    );

    // Line 2: count .... percentage
    let mut counts = vec![Span::styled(
        format!(" {} {}", summary.total, task_noun(summary.total)),
        Style::default().fg(app.theme.text).bg(bg),
    )];
    let pct_color = if summary.is_complete() {
        app.theme.green
    } else {
        app.theme.text
    };
    push_right_aligned(
        &mut counts,
        vec![Span::styled(
            format!("{}% ", summary.progress_display()),
            Style::default().fg(pct_color).bg(bg),
        )],
        width,
        Style::default().bg(bg),
    );

    // Line 3: bar across the card
    let bar = progress_bar(summary.progress_percent(), width.saturating_sub(2));
    let bar_line = Line::from(vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(bar, Style::default().fg(app.theme.progress).bg(bg)),
    ]);

    let lines = vec![Line::from(title), Line::from(counts), bar_line];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Completed/remaining stats and the clear actions under the task list
pub fn render_day_footer(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let summary = app.summary(app.active_day());
    if summary.total == 0 {
        return;
    }

    let mut stats = vec![
        Span::styled(" \u{2713} ", Style::default().fg(app.theme.green).bg(bg)),
        Span::styled(
            format!("Completed {}", summary.completed),
            Style::default().fg(app.theme.text).bg(bg),
        ),
        Span::styled("   \u{25CB} ", Style::default().fg(app.theme.orange).bg(bg)),
        Span::styled(
            format!("Remaining {}", summary.remaining()),
            Style::default().fg(app.theme.text).bg(bg),
        ),
    ];
    push_right_aligned(
        &mut stats,
        vec![Span::styled(
            format!(
                "{} of {} {} completed ",
                summary.completed,
                summary.total,
                task_noun(summary.total)
            ),
            Style::default().fg(app.theme.dim).bg(bg),
        )],
        width,
        Style::default().bg(bg),
    );

    let key_style = Style::default().fg(app.theme.highlight).bg(bg);
    let desc_style = Style::default().fg(app.theme.dim).bg(bg);
    let mut actions = vec![Span::styled(" ", desc_style)];
    if summary.completed > 0 {
        actions.push(Span::styled("c", key_style));
        actions.push(Span::styled(" clear completed   ", desc_style));
    }
    actions.push(Span::styled("D", key_style));
    actions.push(Span::styled(" clear all", desc_style));

    let lines = vec![Line::from(stats), Line::from(actions)];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
