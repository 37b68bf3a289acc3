use crate::app::{AppState, SettingsForm};
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn input_line(value: &str, editing: bool) -> Line<'_> {
    Line::from(vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if editing {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ])
}

fn render_form(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let modal_area = create_modal_area(area, lines.len() as u16 + 2);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", title), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the form for adding a target
pub fn render_target_form(f: &mut Frame, app: &AppState, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::raw("What will you focus on next?"),
        input_line(&app.target_input, true),
        Line::raw(""),
        Line::from(Span::styled("Enter to save  ·  Esc to cancel", hint_style())),
    ];

    render_form(f, area, "Add Target", lines);
}

/// Render the focus/rest settings form
pub fn render_settings_form(f: &mut Frame, form: &SettingsForm, area: Rect) {
    let label = |text: &'static str, field: usize| {
        if form.editing_field == field {
            Line::raw(format!("{} (editing)", text))
        } else {
            Line::raw(text)
        }
    };

    let lines = vec![
        Line::raw(""),
        label("Focus time (minutes):", 0),
        input_line(&form.focus, form.editing_field == 0),
        Line::raw(""),
        label("Rest time (minutes):", 1),
        input_line(&form.rest, form.editing_field == 1),
        Line::raw(""),
        Line::from(Span::styled(
            "Tab to switch fields  ·  Enter to save  ·  Esc to cancel",
            hint_style(),
        )),
    ];

    render_form(f, area, "Settings", lines);
}
