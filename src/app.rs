use crate::domain::{parse_minutes, Phase, ProgressUpdate, TargetEntry, TimerConfig, UiMode};
use crate::error::LogError;
use crate::notifications;
use crate::persistence::{save_settings, settings_file, Settings, TargetLog};
use crate::timer::{FocusTimer, TimerEvent};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Severity of a message popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// Message popup state
#[derive(Debug, Clone)]
pub struct MessageState {
    pub kind: MessageKind,
    pub title: String,
    pub body: String,
    /// Mode to go back to once dismissed
    pub return_to: UiMode,
}

/// Settings form state (raw text, validated on submit)
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub focus: String,
    pub rest: String,
    pub editing_field: usize, // 0 = focus, 1 = rest
}

/// History window state
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    pub query: String,
    pub results: Vec<TargetEntry>,
    pub scroll_offset: usize,
}

/// Main application state
pub struct AppState {
    pub data_dir: PathBuf,
    pub log: TargetLog,
    pub settings: Settings,
    pub timer: FocusTimer,
    events: Receiver<TimerEvent>,
    pub ui_mode: UiMode,

    /// Latest progress for the current run
    pub display: Option<ProgressUpdate>,
    /// Config the current run was started with
    pub run_config: Option<TimerConfig>,
    pub status_line: Option<String>,
    pub completed_runs: u32,

    pub next_target: Option<TargetEntry>,
    pub target_input: String,
    pub settings_form: Option<SettingsForm>,
    pub history: Option<HistoryView>,
    pub message: Option<MessageState>,

    /// Send desktop notifications at the focus/rest boundary
    pub desktop_notifications: bool,
}

impl AppState {
    pub fn new(
        data_dir: PathBuf,
        settings: Settings,
        timer: FocusTimer,
        events: Receiver<TimerEvent>,
    ) -> Self {
        let log = TargetLog::in_dir(&data_dir);

        let mut app = Self {
            data_dir,
            log,
            settings,
            timer,
            events,
            ui_mode: UiMode::Normal,
            display: None,
            run_config: None,
            status_line: None,
            completed_runs: 0,
            next_target: None,
            target_input: String::new(),
            settings_form: None,
            history: None,
            message: None,
            desktop_notifications: true,
        };

        match app.log.most_recent() {
            Ok(entry) => app.next_target = entry,
            Err(e) => {
                tracing::error!(error = %e, "could not read target log");
                app.show_message(MessageKind::Error, "Error", e.to_string());
            }
        }

        app
    }

    /// Show a message popup over the current mode
    pub fn show_message(&mut self, kind: MessageKind, title: impl Into<String>, body: impl Into<String>) {
        let return_to = match self.ui_mode {
            UiMode::Message => self
                .message
                .as_ref()
                .map(|m| m.return_to)
                .unwrap_or(UiMode::Normal),
            mode => mode,
        };

        self.message = Some(MessageState {
            kind,
            title: title.into(),
            body: body.into(),
            return_to,
        });
        self.ui_mode = UiMode::Message;
    }

    /// Close the message popup
    pub fn dismiss_message(&mut self) {
        if let Some(message) = self.message.take() {
            self.ui_mode = message.return_to;
        } else {
            self.ui_mode = UiMode::Normal;
        }
    }

    /// Start (or restart) a focus run with a snapshot of the current settings
    pub fn start_focus(&mut self) {
        let config = match self.settings.timer_config() {
            Ok(config) => config,
            Err(e) => {
                self.show_message(MessageKind::Error, "Error", e.to_string());
                return;
            }
        };

        match self.timer.start(config) {
            Ok(generation) => {
                self.display = Some(ProgressUpdate::new(generation, Phase::Focus, config.focus_seconds));
                self.run_config = Some(config);
                self.status_line = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "could not start focus run");
                self.show_message(MessageKind::Error, "Error", e.to_string());
            }
        }
    }

    /// Stop the current run
    pub fn cancel_focus(&mut self) {
        if !self.timer.is_running() {
            return;
        }
        self.timer.cancel();
        self.display = None;
        self.run_config = None;
        self.status_line = Some("Timer stopped".to_string());
    }

    /// Apply every timer event queued since the last poll
    pub fn drain_timer_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.apply_timer_event(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Apply one timer event, ignoring events from superseded runs
    pub fn apply_timer_event(&mut self, event: TimerEvent) {
        if event.generation() != self.timer.generation() {
            return;
        }

        match event {
            TimerEvent::Progress(update) => {
                self.display = Some(update);
            }
            TimerEvent::PhaseBoundary { generation } => {
                let rest_seconds = self.run_config.map(|c| c.rest_seconds).unwrap_or(0);
                if self.desktop_notifications {
                    notifications::notify_rest_started(rest_seconds);
                }
                self.display = Some(ProgressUpdate::new(generation, Phase::Rest, rest_seconds));
                self.status_line = Some("Focus complete. Time to rest.".to_string());
            }
            TimerEvent::Completed { .. } => {
                self.completed_runs += 1;
                self.status_line = Some("Session complete".to_string());
            }
        }
    }

    /// Text of the countdown label
    pub fn timer_label(&self) -> String {
        match &self.display {
            Some(update) => update.to_string(),
            None => "Ready to focus".to_string(),
        }
    }

    /// Fraction of the current phase already elapsed
    pub fn phase_ratio(&self) -> f64 {
        match (&self.display, &self.run_config) {
            (Some(update), Some(config)) => {
                let total = match update.phase {
                    Phase::Focus => config.focus_seconds,
                    Phase::Rest => config.rest_seconds,
                };
                update.ratio(total)
            }
            _ => 0.0,
        }
    }

    /// Open the target input form
    pub fn start_add_target(&mut self) {
        self.target_input.clear();
        self.ui_mode = UiMode::AddingTarget;
    }

    pub fn target_input_add_char(&mut self, c: char) {
        self.target_input.push(c);
    }

    pub fn target_input_backspace(&mut self) {
        self.target_input.pop();
    }

    pub fn cancel_target_input(&mut self) {
        self.target_input.clear();
        self.ui_mode = UiMode::Normal;
    }

    /// Append the typed target to the log
    pub fn submit_target(&mut self) {
        match self.log.append(&self.target_input) {
            Ok(entry) => {
                self.target_input.clear();
                self.ui_mode = UiMode::Normal;
                self.show_message(MessageKind::Info, "Success", format!("Target added: {}", entry.text));
                self.next_target = Some(entry);
            }
            Err(LogError::Validation(e)) => {
                self.show_message(MessageKind::Warning, "Warning", e.to_string());
            }
            Err(LogError::Resource(e)) => {
                tracing::error!(error = %e, "could not append target");
                self.show_message(MessageKind::Error, "Error", e.to_string());
            }
        }
    }

    /// Open the settings form prefilled with current values
    pub fn open_settings(&mut self) {
        self.settings_form = Some(SettingsForm {
            focus: self.settings.focus_minutes.to_string(),
            rest: self.settings.rest_minutes.to_string(),
            editing_field: 0,
        });
        self.ui_mode = UiMode::EditingSettings;
    }

    pub fn settings_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.settings_form {
            form.editing_field = (form.editing_field + 1) % 2;
        }
    }

    pub fn settings_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.settings_form {
            match form.editing_field {
                0 => form.focus.push(c),
                _ => form.rest.push(c),
            }
        }
    }

    pub fn settings_form_backspace(&mut self) {
        if let Some(form) = &mut self.settings_form {
            match form.editing_field {
                0 => form.focus.pop(),
                _ => form.rest.pop(),
            };
        }
    }

    pub fn cancel_settings_form(&mut self) {
        self.settings_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Validate and store the settings form. Invalid input leaves settings untouched.
    pub fn submit_settings_form(&mut self) {
        let Some(form) = self.settings_form.clone() else {
            return;
        };

        let parsed = parse_minutes("Focus time", &form.focus)
            .and_then(|focus| parse_minutes("Rest time", &form.rest).map(|rest| (focus, rest)));

        let (focus_minutes, rest_minutes) = match parsed {
            Ok(values) => values,
            Err(e) => {
                self.show_message(MessageKind::Error, "Error", e.to_string());
                return;
            }
        };

        self.settings.focus_minutes = focus_minutes;
        self.settings.rest_minutes = rest_minutes;
        self.settings_form = None;
        self.ui_mode = UiMode::Normal;

        match self.save_settings() {
            Ok(()) => self.show_message(MessageKind::Info, "Configuration", "Settings updated!"),
            Err(e) => self.show_message(MessageKind::Error, "Error", format!("{:#}", e)),
        }
    }

    /// Flip the mute flag; it applies from the next start
    pub fn toggle_mute(&mut self) {
        self.settings.muted = !self.settings.muted;
        if let Err(e) = self.save_settings() {
            self.show_message(MessageKind::Error, "Error", format!("{:#}", e));
        }
    }

    pub fn save_settings(&self) -> Result<()> {
        save_settings(settings_file(&self.data_dir), &self.settings)
    }

    /// Open the history window listing every target
    pub fn open_history(&mut self) {
        self.history = Some(HistoryView::default());
        self.ui_mode = UiMode::History;
        self.refresh_history();
    }

    pub fn close_history(&mut self) {
        self.history = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Re-run the history search with the current query
    pub fn refresh_history(&mut self) {
        let Some(query) = self.history.as_ref().map(|h| h.query.clone()) else {
            return;
        };

        match self.log.search(&query).collect::<Result<Vec<_>, _>>() {
            Ok(results) => {
                if let Some(history) = &mut self.history {
                    history.results = results;
                    history.scroll_offset = 0;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "could not search target log");
                self.show_message(MessageKind::Error, "Error", e.to_string());
            }
        }
    }

    pub fn history_add_char(&mut self, c: char) {
        if let Some(history) = &mut self.history {
            history.query.push(c);
        }
        self.refresh_history();
    }

    pub fn history_backspace(&mut self) {
        if let Some(history) = &mut self.history {
            history.query.pop();
        }
        self.refresh_history();
    }

    pub fn scroll_history_up(&mut self) {
        if let Some(history) = &mut self.history {
            history.scroll_offset = history.scroll_offset.saturating_sub(1);
        }
    }

    pub fn scroll_history_down(&mut self) {
        if let Some(history) = &mut self.history {
            if history.scroll_offset + 1 < history.results.len() {
                history.scroll_offset += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;
    use crate::notifications::SoundPlayer;
    use crate::persistence::load_settings;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    struct SilentPlayer;

    impl SoundPlayer for SilentPlayer {
        fn play(&self, _path: &Path) -> Result<(), PlaybackError> {
            Ok(())
        }
    }

    fn create_test_app() -> (AppState, TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let (timer, events) = FocusTimer::new(Arc::new(SilentPlayer), temp_dir.path().join("alert.mp3"));
        let timer = timer.with_tick(Duration::from_millis(5));

        let mut app = AppState::new(temp_dir.path().to_path_buf(), Settings::default(), timer, events);
        app.desktop_notifications = false;
        (app, temp_dir)
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.target_input_add_char(c);
        }
    }

    #[test]
    fn test_app_state_new() {
        let (app, _temp_dir) = create_test_app();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.display.is_none());
        assert!(app.next_target.is_none());
        assert_eq!(app.timer_label(), "Ready to focus");
    }

    #[test]
    fn test_new_loads_most_recent_target() {
        let temp_dir = tempfile::tempdir().unwrap();
        TargetLog::in_dir(temp_dir.path()).append("Earlier target").unwrap();

        let (timer, events) = FocusTimer::new(Arc::new(SilentPlayer), PathBuf::from("alert.mp3"));
        let app = AppState::new(temp_dir.path().to_path_buf(), Settings::default(), timer, events);

        assert_eq!(app.next_target.unwrap().text, "Earlier target");
    }

    #[test]
    fn test_start_focus_shows_full_duration() {
        let (mut app, _temp_dir) = create_test_app();
        app.start_focus();

        assert_eq!(app.timer_label(), "Focus Time Left: 25:00");
        assert_eq!(app.run_config.unwrap().focus_seconds, 1500);
        assert!(app.timer.is_running());
    }

    #[test]
    fn test_start_focus_rejects_invalid_settings() {
        let (mut app, _temp_dir) = create_test_app();
        app.settings.rest_minutes = 0;

        app.start_focus();
        assert_eq!(app.ui_mode, UiMode::Message);
        assert_eq!(app.message.as_ref().unwrap().kind, MessageKind::Error);
        assert!(!app.timer.is_running());
        assert_eq!(app.timer.generation(), 0);
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let (mut app, _temp_dir) = create_test_app();
        app.start_focus();
        let current = app.timer.generation();

        app.apply_timer_event(TimerEvent::Progress(ProgressUpdate::new(current - 1, Phase::Rest, 3)));
        assert_eq!(app.timer_label(), "Focus Time Left: 25:00");

        app.apply_timer_event(TimerEvent::Progress(ProgressUpdate::new(current, Phase::Focus, 1499)));
        assert_eq!(app.timer_label(), "Focus Time Left: 24:59");
    }

    #[test]
    fn test_phase_boundary_switches_display_to_rest() {
        let (mut app, _temp_dir) = create_test_app();
        app.start_focus();
        let generation = app.timer.generation();

        app.apply_timer_event(TimerEvent::PhaseBoundary { generation });
        assert_eq!(app.timer_label(), "Rest Time Left: 10:00");
        assert_eq!(app.status_line.as_deref(), Some("Focus complete. Time to rest."));
    }

    #[test]
    fn test_drain_runs_to_completion() {
        let (mut app, _temp_dir) = create_test_app();
        let config = TimerConfig::new(2, 1, true).unwrap();
        app.timer.start(config).unwrap();
        app.run_config = Some(config);

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.completed_runs == 0 {
            assert!(Instant::now() < deadline, "run never completed");
            app.drain_timer_events();
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(app.timer_label(), "Rest Time Left: 00:00");
        assert_eq!(app.status_line.as_deref(), Some("Session complete"));
    }

    #[test]
    fn test_cancel_focus() {
        let (mut app, _temp_dir) = create_test_app();
        app.start_focus();
        app.cancel_focus();

        assert!(app.display.is_none());
        assert!(!app.timer.is_running());
        assert_eq!(app.status_line.as_deref(), Some("Timer stopped"));
    }

    #[test]
    fn test_submit_target() {
        let (mut app, _temp_dir) = create_test_app();
        app.start_add_target();
        type_text(&mut app, "Draft report");
        app.submit_target();

        assert_eq!(app.next_target.as_ref().unwrap().text, "Draft report");
        assert_eq!(app.ui_mode, UiMode::Message);
        assert_eq!(app.message.as_ref().unwrap().body, "Target added: Draft report");

        app.dismiss_message();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.log.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_submit_blank_target_warns() {
        let (mut app, _temp_dir) = create_test_app();
        app.start_add_target();
        type_text(&mut app, "   ");
        app.submit_target();

        let message = app.message.as_ref().unwrap();
        assert_eq!(message.kind, MessageKind::Warning);
        assert_eq!(message.body, "Please enter a target.");
        assert!(app.log.entries().unwrap().is_empty());

        // Back to the form after dismissing
        app.dismiss_message();
        assert_eq!(app.ui_mode, UiMode::AddingTarget);
    }

    #[test]
    fn test_settings_form_updates_and_persists() {
        let (mut app, temp_dir) = create_test_app();
        app.open_settings();
        app.settings_form_backspace();
        app.settings_form_backspace();
        app.settings_form_add_char('5');
        app.settings_form_add_char('0');
        app.settings_form_toggle_field();
        app.settings_form_backspace();
        app.settings_form_backspace();
        app.settings_form_add_char('5');
        app.submit_settings_form();

        assert_eq!(app.settings.focus_minutes, 50);
        assert_eq!(app.settings.rest_minutes, 5);
        assert_eq!(app.message.as_ref().unwrap().body, "Settings updated!");

        let saved = load_settings(settings_file(temp_dir.path())).unwrap();
        assert_eq!(saved.focus_minutes, 50);
        assert_eq!(saved.rest_minutes, 5);
    }

    #[test]
    fn test_invalid_settings_leave_timer_and_settings_unchanged() {
        let (mut app, _temp_dir) = create_test_app();
        app.start_focus();
        let generation = app.timer.generation();

        app.open_settings();
        app.settings_form_add_char('x');
        app.submit_settings_form();

        assert_eq!(app.message.as_ref().unwrap().kind, MessageKind::Error);
        assert_eq!(app.settings.focus_minutes, 25);
        assert_eq!(app.timer.generation(), generation);
        assert!(app.timer.is_running());

        app.dismiss_message();
        assert_eq!(app.ui_mode, UiMode::EditingSettings);
    }

    #[test]
    fn test_toggle_mute_applies_to_next_start() {
        let (mut app, _temp_dir) = create_test_app();
        app.start_focus();
        assert!(!app.run_config.unwrap().muted);

        app.toggle_mute();
        assert!(app.settings.muted);
        assert!(!app.run_config.unwrap().muted);

        app.start_focus();
        assert!(app.run_config.unwrap().muted);
    }

    #[test]
    fn test_history_search() {
        let (mut app, _temp_dir) = create_test_app();
        app.log.append("Draft report").unwrap();
        app.log.append("Fix build").unwrap();

        app.open_history();
        assert_eq!(app.history.as_ref().unwrap().results.len(), 2);

        for c in "REPORT".chars() {
            app.history_add_char(c);
        }
        let results = &app.history.as_ref().unwrap().results;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Draft report");

        for _ in 0..6 {
            app.history_backspace();
        }
        assert_eq!(app.history.as_ref().unwrap().results.len(), 2);

        app.close_history();
        assert!(app.history.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_phase_ratio() {
        let (mut app, _temp_dir) = create_test_app();
        assert_eq!(app.phase_ratio(), 0.0);

        app.start_focus();
        let generation = app.timer.generation();
        app.apply_timer_event(TimerEvent::Progress(ProgressUpdate::new(generation, Phase::Focus, 750)));
        assert!((app.phase_ratio() - 0.5).abs() < f64::EPSILON);
    }
}
