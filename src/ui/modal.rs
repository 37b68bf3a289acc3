use crate::app::{AppState, MessageKind};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style, warning_style},
};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the message popup
pub fn render_message(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(message) = &app.message {
        let modal_area = create_modal_area(area, 7);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let title_style = match message.kind {
            MessageKind::Info => modal_title_style(),
            MessageKind::Warning => warning_style(),
            MessageKind::Error => error_style(),
        };

        let lines = vec![
            Line::raw(""),
            Line::raw(message.body.as_str()),
            Line::raw(""),
            Line::from(vec![
                Span::styled("[Enter]", modal_title_style()),
                Span::raw(" OK"),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(format!(" {} ", message.title), title_style))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
