use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar for the current mode
pub fn render_keybindings(f: &mut Frame, mode: UiMode, muted: bool, area: Rect) {
    let hints = match mode {
        UiMode::Normal => Line::from(vec![
            Span::raw(" s/Enter start   "),
            Span::raw("x stop   "),
            Span::raw("a target   "),
            Span::raw("c settings   "),
            Span::raw(if muted { "m unmute   " } else { "m mute   " }),
            Span::raw("h history   "),
            Span::raw("q quit"),
        ]),
        UiMode::AddingTarget => Line::raw(" Enter save   Esc cancel"),
        UiMode::EditingSettings => Line::raw(" Tab switch field   Enter save   Esc cancel"),
        UiMode::History => Line::raw(" type to search   ↑/↓ scroll   Esc close"),
        UiMode::Message => Line::raw(" Enter dismiss"),
    };

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
