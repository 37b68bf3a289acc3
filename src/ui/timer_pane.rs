use crate::app::AppState;
use crate::domain::Phase;
use crate::ui::styles::{
    border_style, focus_gauge_style, focus_style, idle_style, rest_gauge_style, rest_style, title_style,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the countdown and phase gauge
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let title = if app.settings.muted {
        " Tomato Focus (muted) "
    } else {
        " Tomato Focus "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Clock
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Gauge
            Constraint::Min(0),
        ])
        .split(inner);

    let (clock_style, gauge_style) = match app.display.map(|d| d.phase) {
        Some(Phase::Focus) => (focus_style(), focus_gauge_style()),
        Some(Phase::Rest) => (rest_style(), rest_gauge_style()),
        None => (idle_style(), focus_gauge_style()),
    };

    let clock = Paragraph::new(Line::from(Span::styled(app.timer_label(), clock_style)))
        .alignment(Alignment::Center);
    f.render_widget(clock, chunks[1]);

    if app.display.is_some() {
        let gauge = Gauge::default()
            .gauge_style(gauge_style)
            .ratio(app.phase_ratio())
            .label("");
        f.render_widget(gauge, chunks[3]);
    } else {
        let summary = format!(
            "Focus {} min · Rest {} min",
            app.settings.focus_minutes, app.settings.rest_minutes
        );
        let paragraph = Paragraph::new(Line::from(Span::styled(summary, idle_style())))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, chunks[3]);
    }
}
