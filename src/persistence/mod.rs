pub mod files;
pub mod parser;
pub mod serializer;
pub mod settings;
pub mod target_log;

pub use files::{
    atomic_write, ensure_tomato_dir, init_local_tomato, log_file, settings_file,
};
pub use settings::{load_settings, save_settings, Settings};
pub use target_log::TargetLog;
