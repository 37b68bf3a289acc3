/// One half of a focus/rest interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Focus,
    Rest,
}

impl Phase {
    /// Label shown in front of the countdown
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::Rest => "Rest",
        }
    }
}

/// Lifecycle of the focus timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    RunningFocus(u64),
    RunningRest(u64),
    Cancelled,
    Completed,
}

impl TimerState {
    /// Check if a run is in flight
    pub fn is_running(&self) -> bool {
        matches!(self, Self::RunningFocus(_) | Self::RunningRest(_))
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTarget,
    EditingSettings,
    History,
    Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_label() {
        assert_eq!(Phase::Focus.label(), "Focus");
        assert_eq!(Phase::Rest.label(), "Rest");
    }

    #[test]
    fn test_timer_state_is_running() {
        assert!(!TimerState::Idle.is_running());
        assert!(TimerState::RunningFocus(3).is_running());
        assert!(TimerState::RunningRest(0).is_running());
        assert!(!TimerState::Cancelled.is_running());
        assert!(!TimerState::Completed.is_running());
    }
}
