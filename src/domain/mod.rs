pub mod config;
pub mod enums;
pub mod progress;
pub mod target;

pub use config::{parse_minutes, TimerConfig};
pub use enums::{Phase, TimerState, UiMode};
pub use progress::ProgressUpdate;
pub use target::TargetEntry;
