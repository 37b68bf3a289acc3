use super::enums::Phase;
use std::fmt;

/// A single countdown tick as seen by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Run that produced this update
    pub generation: u64,
    pub phase: Phase,
    /// Seconds left in the phase
    pub remaining: u64,
}

impl ProgressUpdate {
    pub fn new(generation: u64, phase: Phase, remaining: u64) -> Self {
        Self {
            generation,
            phase,
            remaining,
        }
    }

    pub fn minutes(&self) -> u64 {
        self.remaining / 60
    }

    pub fn seconds(&self) -> u64 {
        self.remaining % 60
    }

    /// "MM:SS"
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }

    /// Fraction of the phase already elapsed (0.0 to 1.0)
    pub fn ratio(&self, phase_seconds: u64) -> f64 {
        if phase_seconds == 0 {
            return 1.0;
        }
        let elapsed = phase_seconds.saturating_sub(self.remaining);
        (elapsed as f64 / phase_seconds as f64).clamp(0.0, 1.0)
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Time Left: {}", self.phase.label(), self.clock())
    }
}
