pub mod history_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod modal;
pub mod styles;
pub mod target_pane;
pub mod timer_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use history_pane::render_history;
use input_form::{render_settings_form, render_target_form};
use keybindings::render_keybindings;
use layout::create_layout;
use modal::render_message;
use ratatui::Frame;
use target_pane::{render_status_line, render_target_pane};
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, app.settings.muted, layout.keybindings_area);
    render_timer_pane(f, app, layout.timer_area);
    render_target_pane(f, app, layout.target_area);
    render_status_line(f, app, layout.status_area);

    // A message popup sits on top of whatever mode raised it
    let underlying = match (app.ui_mode, &app.message) {
        (UiMode::Message, Some(message)) => message.return_to,
        (mode, _) => mode,
    };

    match underlying {
        UiMode::AddingTarget => render_target_form(f, app, size),
        UiMode::EditingSettings => {
            if let Some(form) = &app.settings_form {
                render_settings_form(f, form, size);
            }
        }
        UiMode::History => render_history(f, app, size),
        UiMode::Normal | UiMode::Message => {}
    }

    if app.ui_mode == UiMode::Message {
        render_message(f, app, size);
    }
}
