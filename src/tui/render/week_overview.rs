use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::summary::{progress_bar, week_summary};
use crate::tui::app::App;
use crate::util::unicode;

/// Seven-column strip: per-day counts and a mini progress bar
pub fn render_week_overview(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let col = (width / 7).max(1);

    let title = " Week ";
    let rule = format!(
        "\u{2500}\u{2500}{}{}",
        title,
        "\u{2500}".repeat(width.saturating_sub(2 + title.len()))
    );

    let mut counts: Vec<Span> = Vec::new();
    let mut bars: Vec<Span> = Vec::new();
    for summary in week_summary(&app.store) {
        let is_active = summary.day == app.active_day();
        let mut style = Style::default().fg(app.theme.text).bg(bg);
        if is_active {
            style = style
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD);
        }
        let label = if summary.total == 0 {
            format!(" {} -", summary.day.short())
        } else {
            format!(" {} {}/{}", summary.day.short(), summary.completed, summary.total)
        };
        counts.push(Span::styled(unicode::pad_to_width(&label, col), style));

        let bar_color = if summary.is_complete() {
            app.theme.green
        } else {
            app.theme.progress
        };
        let bar = progress_bar(summary.progress_percent(), col.saturating_sub(2));
        bars.push(Span::styled(
            unicode::pad_to_width(&format!(" {}", bar), col),
            Style::default().fg(bar_color).bg(bg),
        ));
    }

    let lines = vec![
        Line::from(Span::styled(rule, Style::default().fg(app.theme.dim).bg(bg))),
        Line::from(counts),
        Line::from(bars),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
