use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Task;
use crate::tui::app::{App, FormTarget, Mode, TaskForm};
use crate::util::unicode;

use super::helpers::{checkbox, format_created_at, push_right_aligned, spans_width};

/// The active day's tasks in display order, preceded by the add row
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    // Add row: the add form when open, else a hint
    match (&app.form, app.mode) {
        (Some(form), Mode::Add) => lines.push(form_line(app, form, "  + ", width)),
        _ => {
            let mut spans = vec![Span::styled(
                "  + Add new task",
                Style::default().fg(app.theme.dim).bg(bg),
            )];
            if app.show_key_hints {
                spans.push(Span::styled(
                    " (a)",
                    Style::default().fg(app.theme.dim).bg(bg),
                ));
            }
            lines.push(Line::from(spans));
        }
    }

    let tasks = app.visible_tasks();
    if tasks.is_empty() {
        lines.push(Line::from(""));
        lines.push(
            Line::from(Span::styled(
                "No tasks for this day",
                Style::default().fg(app.theme.text).bg(bg),
            ))
            .centered(),
        );
        lines.push(
            Line::from(Span::styled(
                format!(
                    "Add your first task to get started with {}",
                    app.active_day().label()
                ),
                Style::default().fg(app.theme.dim).bg(bg),
            ))
            .centered(),
        );
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
        return;
    }

    // Keep the cursor inside the window
    let visible_height = (area.height as usize).saturating_sub(1).max(1);
    let cursor = app.cursor.min(tasks.len() - 1);
    let mut scroll = app.scroll_offset;
    if cursor < scroll {
        scroll = cursor;
    } else if cursor >= scroll + visible_height {
        scroll = cursor + 1 - visible_height;
    }

    let now = Local::now();
    let show_cursor = app.mode != Mode::Add;
    for (i, task) in tasks.iter().enumerate().skip(scroll).take(visible_height) {
        let editing = match (&app.form, app.mode) {
            (Some(form), Mode::Edit) if form.target == FormTarget::Existing(task.id) => {
                Some(form)
            }
            _ => None,
        };
        match editing {
            Some(form) => lines.push(form_line(app, form, "  \u{270E} ", width)),
            None => lines.push(task_line(app, task, show_cursor && i == cursor, now, width)),
        }
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
    app.scroll_offset = scroll;
}

fn task_line<'a>(
    app: &App,
    task: &Task,
    selected: bool,
    now: chrono::DateTime<Local>,
    width: usize,
) -> Line<'a> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let fill = Style::default().bg(bg);
    let pointer = if selected { " \u{25B8} " } else { "   " };

    let mut spans: Vec<Span> = vec![
        Span::styled(pointer, Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            checkbox(task.completed),
            Style::default()
                .fg(if task.completed {
                    app.theme.green
                } else {
                    app.theme.text
                })
                .bg(bg),
        ),
        Span::styled(" ", fill),
    ];

    let badge_color = app.theme.priority_color(task.priority);
    let right = vec![
        Span::styled(
            format!("{} {}", task.priority.marker(), task.priority.label()),
            Style::default().fg(badge_color).bg(bg),
        ),
        Span::styled(
            format!("  {:>8} ", format_created_at(task.created_at, now)),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];

    // Text gets whatever the fixed columns leave
    let room = width.saturating_sub(spans_width(&spans) + spans_width(&right) + 1);
    let text_style = if task.completed {
        fill.fg(app.theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        fill.fg(app.theme.text_bright)
    } else {
        fill.fg(app.theme.text)
    };
    spans.push(Span::styled(
        unicode::truncate_to_width(&task.text, room),
        text_style,
    ));
    push_right_aligned(&mut spans, right, width, fill);
    Line::from(spans)
}

/// One-line form: prefix, buffer with a block cursor, priority selector on the right
fn form_line<'a>(app: &App, form: &TaskForm, prefix: &'a str, width: usize) -> Line<'a> {
    let bg = app.theme.selection_bg;
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let (before, after) = form.buffer.split_at(form.cursor.min(form.buffer.len()));

    let mut spans = vec![
        Span::styled(prefix, Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(before.to_string(), text_style),
        Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
        Span::styled(after.to_string(), text_style),
    ];
    if form.buffer.is_empty() {
        spans.push(Span::styled(
            "What needs to be done?",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let selector = vec![Span::styled(
        format!(
            "\u{2039} {} {} \u{203A} ",
            form.priority.marker(),
            form.priority.key()
        ),
        Style::default()
            .fg(app.theme.priority_color(form.priority))
            .bg(bg),
    )];
    push_right_aligned(&mut spans, selector, width, Style::default().bg(bg));
    Line::from(spans)
}
