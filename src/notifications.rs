//! Sound playback and desktop notifications for the focus/rest boundary.
//! Everything here is fire-and-forget: a spawned player is never waited on
//! by the caller, and a desktop notification that fails is simply dropped.

use crate::error::PlaybackError;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

/// Plays the boundary notification sound
pub trait SoundPlayer: Send + Sync {
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

/// Command-line players tried in order, with the arguments placed before the file
#[cfg(target_os = "macos")]
const PLAYERS: &[(&str, &[&str])] = &[("afplay", &[])];

#[cfg(not(target_os = "macos"))]
const PLAYERS: &[(&str, &[&str])] = &[
    ("paplay", &[]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("mpg123", &["-q"]),
    ("aplay", &["-q"]),
];

/// Plays sounds through whichever platform audio player is installed
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSoundPlayer;

impl SystemSoundPlayer {
    fn command_exists(cmd: &str) -> bool {
        Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn find_player() -> Option<(&'static str, &'static [&'static str])> {
        PLAYERS
            .iter()
            .copied()
            .find(|(cmd, _)| Self::command_exists(cmd))
    }
}

impl SoundPlayer for SystemSoundPlayer {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        if !path.is_file() {
            return Err(PlaybackError::MissingFile(path.to_path_buf()));
        }

        let (player, args) = Self::find_player().ok_or(PlaybackError::NoPlayer)?;

        let mut child = Command::new(player)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlaybackError::Spawn { player, source })?;

        tracing::debug!(player, path = %path.display(), "playing notification sound");

        // Reap the player off-thread; a corrupt file only shows up as a bad exit status
        let path = path.to_path_buf();
        thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!(player, path = %path.display(), %status, "notification sound failed to play");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(player, error = %e, "could not wait for audio player");
            }
        });

        Ok(())
    }
}

/// Body of the rest notification: "25 min", "45 sec" or "1 min 30 sec"
fn rest_message(rest_seconds: u64) -> String {
    let (minutes, seconds) = (rest_seconds / 60, rest_seconds % 60);
    let duration = match (minutes, seconds) {
        (0, s) => format!("{} sec", s),
        (m, 0) => format!("{} min", m),
        (m, s) => format!("{} min {} sec", m, s),
    };
    format!("Focus complete. Rest for {}.", duration)
}

/// Send a desktop notification when the rest phase begins
pub fn notify_rest_started(rest_seconds: u64) {
    let body = rest_message(rest_seconds);

    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Tomato Focus""#,
            body.replace('"', "\\\"")
        );

        let _ = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
    }

    #[cfg(target_os = "linux")]
    {
        let _ = Command::new("notify-send")
            .arg("Tomato Focus")
            .arg(&body)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        // No-op on other platforms
        let _ = body;
    }
}
