use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{default_style, hint_style, modal_bg_style, modal_title_style, timestamp_style},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Render the history window: search box over the matching targets
pub fn render_history(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(history) = &app.history else {
        return;
    };

    let modal_area = create_modal_area(area, area.height.saturating_sub(4).max(8));
    f.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Target History ", modal_title_style()))
        .style(modal_bg_style());
    let inner = block.inner(modal_area);
    f.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let search = Paragraph::new(Line::from(vec![
        Span::raw("Search: "),
        Span::styled(history.query.as_str(), modal_title_style()),
        Span::styled("█", modal_title_style()),
        Span::styled(format!("  ({} found)", history.results.len()), hint_style()),
    ]));
    f.render_widget(search, chunks[0]);

    let items: Vec<ListItem> = history
        .results
        .iter()
        .skip(history.scroll_offset)
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {}  ", entry.date_str(), entry.time_str()), timestamp_style()),
                Span::styled(entry.text.as_str(), default_style()),
            ]))
        })
        .collect();

    if items.is_empty() {
        let empty = Paragraph::new(Span::styled("No matching targets", hint_style()));
        f.render_widget(empty, chunks[1]);
    } else {
        f.render_widget(List::new(items), chunks[1]);
    }
}
