use crate::error::ValidationError;

/// Snapshot of the durations and mute flag a run is started with.
/// Later settings edits never reach a run that is already going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub focus_seconds: u64,
    pub rest_seconds: u64,
    pub muted: bool,
}

impl TimerConfig {
    /// Create a config, rejecting zero-length phases
    pub fn new(focus_seconds: u64, rest_seconds: u64, muted: bool) -> Result<Self, ValidationError> {
        let config = Self {
            focus_seconds,
            rest_seconds,
            muted,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a config from minute values
    pub fn from_minutes(focus_minutes: u32, rest_minutes: u32, muted: bool) -> Result<Self, ValidationError> {
        Self::new(
            u64::from(focus_minutes) * 60,
            u64::from(rest_minutes) * 60,
            muted,
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.focus_seconds == 0 {
            return Err(ValidationError::NonPositiveDuration { field: "Focus time" });
        }
        if self.rest_seconds == 0 {
            return Err(ValidationError::NonPositiveDuration { field: "Rest time" });
        }
        Ok(())
    }
}

/// Parse a minutes field typed by the user ("25", " 10 ")
pub fn parse_minutes(field: &'static str, input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let minutes: i64 = trimmed.parse().map_err(|_| ValidationError::InvalidDuration {
        field,
        input: trimmed.to_string(),
    })?;

    if minutes <= 0 {
        return Err(ValidationError::NonPositiveDuration { field });
    }

    u32::try_from(minutes).map_err(|_| ValidationError::InvalidDuration {
        field,
        input: trimmed.to_string(),
    })
}
