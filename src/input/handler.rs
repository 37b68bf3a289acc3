use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTarget => handle_target_input_mode(app, key),
        UiMode::EditingSettings => handle_settings_mode(app, key),
        UiMode::History => handle_history_mode(app, key),
        UiMode::Message => handle_message_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),

        // Start (or restart) the timer
        KeyCode::Char('s') | KeyCode::Enter => app.start_focus(),
        KeyCode::Char('x') => app.cancel_focus(),

        KeyCode::Char('a') => app.start_add_target(),
        KeyCode::Char('c') => app.open_settings(),
        KeyCode::Char('m') => app.toggle_mute(),
        KeyCode::Char('h') => app.open_history(),

        _ => {}
    }
    Ok(false)
}

fn handle_target_input_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_target(),
        KeyCode::Esc => app.cancel_target_input(),
        KeyCode::Backspace => app.target_input_backspace(),
        KeyCode::Char(c) => app.target_input_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_settings_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_settings_form(),
        KeyCode::Esc => app.cancel_settings_form(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.settings_form_toggle_field(),
        KeyCode::Backspace => app.settings_form_backspace(),
        KeyCode::Char(c) => app.settings_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_history_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.close_history(),
        KeyCode::Up => app.scroll_history_up(),
        KeyCode::Down => app.scroll_history_down(),
        KeyCode::Backspace => app.history_backspace(),
        KeyCode::Char(c) => app.history_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_message_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q') => app.dismiss_message(),
        _ => {}
    }
    Ok(false)
}
