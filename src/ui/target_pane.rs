use crate::app::AppState;
use crate::ui::styles::{border_style, default_style, hint_style, timestamp_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the most recent target
pub fn render_target_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let lines = match &app.next_target {
        Some(entry) => vec![
            Line::from(Span::styled(entry.text.as_str(), default_style())),
            Line::raw(""),
            Line::from(Span::styled(
                format!("set {} {}", entry.date_str(), entry.time_str()),
                timestamp_style(),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "No target yet. Press 'a' to add one.",
            hint_style(),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Next Target ", title_style())),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Render the one-line status bar
pub fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(
            " focus {}m · rest {}m · {}",
            app.settings.focus_minutes,
            app.settings.rest_minutes,
            if app.settings.muted { "muted" } else { "sound on" }
        ),
        hint_style(),
    )];
    if let Some(status) = &app.status_line {
        spans.push(Span::styled(format!("   {}", status), default_style()));
    }
    if app.completed_runs > 0 {
        spans.push(Span::styled(
            format!("   sessions: {}", app.completed_runs),
            hint_style(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
