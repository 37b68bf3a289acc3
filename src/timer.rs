//! Focus/rest countdown with generation-based cancellation
//!
//! Each `start` bumps a generation counter and spawns a worker thread that
//! owns that generation. The worker only mutates shared state or sends
//! events while holding the generation lock and after checking that its
//! generation is still current, so a superseded run goes quiet the moment
//! a newer one is started or the timer is cancelled.
//!
//! The shell never reads timer internals from the worker thread: it drains
//! `TimerEvent`s from a channel on its own loop.

use crate::domain::{Phase, ProgressUpdate, TimerConfig, TimerState};
use crate::error::TimerError;
use crate::notifications::SoundPlayer;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Countdown granularity
pub const TICK: Duration = Duration::from_secs(1);

/// Message sent from a running countdown to the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed in the current phase
    Progress(ProgressUpdate),
    /// Focus reached 00:00 and rest is starting
    PhaseBoundary { generation: u64 },
    /// Rest reached 00:00; the run is over
    Completed { generation: u64 },
}

impl TimerEvent {
    pub fn generation(&self) -> u64 {
        match self {
            TimerEvent::Progress(update) => update.generation,
            TimerEvent::PhaseBoundary { generation } | TimerEvent::Completed { generation } => *generation,
        }
    }
}

struct Shared {
    generation: u64,
    state: TimerState,
}

struct Control {
    shared: Mutex<Shared>,
    /// Signalled whenever the generation changes
    wake: Condvar,
}

impl Control {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        // Shared holds plain values that are always written whole
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Two-phase countdown timer. At most one run is active at a time.
pub struct FocusTimer {
    control: Arc<Control>,
    events: Sender<TimerEvent>,
    player: Arc<dyn SoundPlayer>,
    sound: PathBuf,
    tick: Duration,
}

impl FocusTimer {
    /// Create an idle timer and the receiving end of its event channel
    pub fn new(player: Arc<dyn SoundPlayer>, sound: PathBuf) -> (Self, Receiver<TimerEvent>) {
        let (events, receiver) = mpsc::channel();
        let timer = Self {
            control: Arc::new(Control {
                shared: Mutex::new(Shared {
                    generation: 0,
                    state: TimerState::Idle,
                }),
                wake: Condvar::new(),
            }),
            events,
            player,
            sound,
            tick: TICK,
        };
        (timer, receiver)
    }

    /// Override the tick length
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Start a new run, superseding any run in flight. Returns the new generation.
    pub fn start(&self, config: TimerConfig) -> Result<u64, TimerError> {
        config.validate()?;

        let generation = {
            let mut shared = self.control.lock();
            shared.generation += 1;
            shared.state = TimerState::RunningFocus(config.focus_seconds);
            shared.generation
        };
        self.control.wake.notify_all();

        let run = Run {
            generation,
            config,
            control: Arc::clone(&self.control),
            events: self.events.clone(),
            player: Arc::clone(&self.player),
            sound: self.sound.clone(),
            tick: self.tick,
        };

        let spawned = thread::Builder::new()
            .name(format!("focus-run-{}", generation))
            .spawn(move || run.execute());

        if let Err(e) = spawned {
            self.cancel();
            return Err(TimerError::Spawn(e));
        }

        tracing::info!(
            generation,
            focus_seconds = config.focus_seconds,
            rest_seconds = config.rest_seconds,
            muted = config.muted,
            "focus run started"
        );
        Ok(generation)
    }

    /// Stop the current run without scheduling a new one
    pub fn cancel(&self) {
        let generation = {
            let mut shared = self.control.lock();
            shared.generation += 1;
            if shared.state.is_running() {
                shared.state = TimerState::Cancelled;
            }
            shared.generation
        };
        self.control.wake.notify_all();
        tracing::debug!(generation, "focus run cancelled");
    }

    pub fn state(&self) -> TimerState {
        self.control.lock().state
    }

    /// Generation of the most recent start or cancel
    pub fn generation(&self) -> u64 {
        self.control.lock().generation
    }

    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }
}

impl Drop for FocusTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// One generation's worth of countdown, executed on its own thread
struct Run {
    generation: u64,
    config: TimerConfig,
    control: Arc<Control>,
    events: Sender<TimerEvent>,
    player: Arc<dyn SoundPlayer>,
    sound: PathBuf,
    tick: Duration,
}

impl Run {
    fn execute(self) {
        if !self.countdown(Phase::Focus, self.config.focus_seconds) {
            return;
        }

        if !self.enter_rest() {
            return;
        }
        self.play_boundary_sound();

        if !self.countdown(Phase::Rest, self.config.rest_seconds) {
            return;
        }

        self.complete();
    }

    /// Count a phase down to 00:00. Returns false once superseded.
    fn countdown(&self, phase: Phase, seconds: u64) -> bool {
        let mut remaining = seconds;
        while remaining > 0 {
            if !self.sleep_tick() {
                tracing::debug!(generation = self.generation, phase = phase.label(), remaining, "run superseded");
                return false;
            }
            remaining -= 1;
            if !self.emit_progress(phase, remaining) {
                return false;
            }
        }
        true
    }

    /// Wait one tick, waking early if the generation moves on
    fn sleep_tick(&self) -> bool {
        let shared = self.control.lock();
        if shared.generation != self.generation {
            return false;
        }

        let (shared, _) = self
            .control
            .wake
            .wait_timeout_while(shared, self.tick, |s| s.generation == self.generation)
            .unwrap_or_else(|e| e.into_inner());

        shared.generation == self.generation
    }

    /// Apply `state` and send `event` atomically with respect to the generation
    fn commit(&self, state: TimerState, event: TimerEvent) -> bool {
        let mut shared = self.control.lock();
        if shared.generation != self.generation {
            return false;
        }
        shared.state = state;
        // A closed channel means the shell is gone
        self.events.send(event).is_ok()
    }

    fn emit_progress(&self, phase: Phase, remaining: u64) -> bool {
        let state = match phase {
            Phase::Focus => TimerState::RunningFocus(remaining),
            Phase::Rest => TimerState::RunningRest(remaining),
        };
        self.commit(
            state,
            TimerEvent::Progress(ProgressUpdate::new(self.generation, phase, remaining)),
        )
    }

    fn enter_rest(&self) -> bool {
        self.commit(
            TimerState::RunningRest(self.config.rest_seconds),
            TimerEvent::PhaseBoundary {
                generation: self.generation,
            },
        )
    }

    fn play_boundary_sound(&self) {
        if self.config.muted {
            tracing::debug!(generation = self.generation, "sound muted");
            return;
        }

        if let Err(e) = self.player.play(&self.sound) {
            tracing::warn!(generation = self.generation, error = %e, "could not play notification sound");
        }
    }

    fn complete(&self) {
        if self.commit(
            TimerState::Completed,
            TimerEvent::Completed {
                generation: self.generation,
            },
        ) {
            tracing::info!(generation = self.generation, "focus run completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::mpsc::RecvTimeoutError;
    use std::time::Instant;

    const FAST_TICK: Duration = Duration::from_millis(10);

    #[derive(Default)]
    struct RecordingPlayer {
        calls: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    impl RecordingPlayer {
        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl SoundPlayer for RecordingPlayer {
        fn play(&self, path: &Path) -> Result<(), PlaybackError> {
            self.calls.lock().unwrap().push(path.to_path_buf());
            if self.fail {
                Err(PlaybackError::MissingFile(path.to_path_buf()))
            } else {
                Ok(())
            }
        }
    }

    fn create_timer(player: Arc<RecordingPlayer>, tick: Duration) -> (FocusTimer, Receiver<TimerEvent>) {
        let (timer, rx) = FocusTimer::new(player, PathBuf::from("alert.mp3"));
        (timer.with_tick(tick), rx)
    }

    /// Collect events until the given generation completes
    fn collect_until_completed(rx: &Receiver<TimerEvent>, generation: u64) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        loop {
            let event = rx
                .recv_timeout(Duration::from_secs(5))
                .expect("timer stalled");
            events.push(event);
            if event == (TimerEvent::Completed { generation }) {
                return events;
            }
        }
    }

    fn progress(events: &[TimerEvent], phase: Phase) -> Vec<u64> {
        events
            .iter()
            .filter_map(|e| match e {
                TimerEvent::Progress(u) if u.phase == phase => Some(u.remaining),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_full_run_emits_every_second_of_both_phases() {
        let player = Arc::new(RecordingPlayer::default());
        let (timer, rx) = create_timer(Arc::clone(&player), FAST_TICK);

        let config = TimerConfig::new(3, 2, false).unwrap();
        let generation = timer.start(config).unwrap();
        let events = collect_until_completed(&rx, generation);

        assert_eq!(progress(&events, Phase::Focus), vec![2, 1, 0]);
        assert_eq!(progress(&events, Phase::Rest), vec![1, 0]);

        // Boundary sits between the last focus update and the first rest update
        let boundary = events
            .iter()
            .position(|e| matches!(e, TimerEvent::PhaseBoundary { .. }))
            .unwrap();
        assert_eq!(
            events[boundary - 1],
            TimerEvent::Progress(ProgressUpdate::new(generation, Phase::Focus, 0))
        );
        assert_eq!(
            events[boundary + 1],
            TimerEvent::Progress(ProgressUpdate::new(generation, Phase::Rest, 1))
        );

        assert_eq!(player.call_count(), 1);
        assert_eq!(timer.state(), TimerState::Completed);
        assert!(events.iter().all(|e| e.generation() == generation));
    }

    #[test]
    fn test_muted_run_skips_sound() {
        let player = Arc::new(RecordingPlayer::default());
        let (timer, rx) = create_timer(Arc::clone(&player), FAST_TICK);

        let generation = timer.start(TimerConfig::new(1, 1, true).unwrap()).unwrap();
        let events = collect_until_completed(&rx, generation);

        assert!(events.contains(&TimerEvent::PhaseBoundary { generation }));
        assert_eq!(player.call_count(), 0);
    }

    #[test]
    fn test_playback_failure_still_enters_rest() {
        let player = Arc::new(RecordingPlayer::failing());
        let (timer, rx) = create_timer(Arc::clone(&player), FAST_TICK);

        let generation = timer.start(TimerConfig::new(1, 2, false).unwrap()).unwrap();
        let events = collect_until_completed(&rx, generation);

        assert_eq!(player.call_count(), 1);
        assert_eq!(progress(&events, Phase::Rest), vec![1, 0]);
        assert_eq!(timer.state(), TimerState::Completed);
    }

    #[test]
    fn test_restart_supersedes_previous_run() {
        let player = Arc::new(RecordingPlayer::default());
        let (timer, rx) = create_timer(Arc::clone(&player), FAST_TICK);

        let first = timer.start(TimerConfig::new(1000, 1000, false).unwrap()).unwrap();
        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event.generation(), first);

        let second = timer.start(TimerConfig::new(2, 1, false).unwrap()).unwrap();
        assert!(second > first);

        let events = collect_until_completed(&rx, second);
        let first_new = events
            .iter()
            .position(|e| e.generation() == second)
            .unwrap();
        assert!(events[first_new..].iter().all(|e| e.generation() == second));
        assert_eq!(progress(&events[first_new..], Phase::Focus), vec![1, 0]);

        // The superseded run never reached its boundary
        assert_eq!(player.call_count(), 1);
    }

    #[test]
    fn test_restart_during_rest_starts_fresh_focus() {
        let player = Arc::new(RecordingPlayer::default());
        let (timer, rx) = create_timer(Arc::clone(&player), FAST_TICK);

        let first = timer.start(TimerConfig::new(1, 1000, true).unwrap()).unwrap();
        loop {
            let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            if event == (TimerEvent::PhaseBoundary { generation: first }) {
                break;
            }
        }
        assert!(matches!(timer.state(), TimerState::RunningRest(_)));

        timer.start(TimerConfig::new(5, 5, true).unwrap()).unwrap();
        assert_eq!(timer.state(), TimerState::RunningFocus(5));
    }

    #[test]
    fn test_cancel_during_focus_stops_updates_and_sound() {
        let player = Arc::new(RecordingPlayer::default());
        let (timer, rx) = create_timer(Arc::clone(&player), FAST_TICK);

        timer.start(TimerConfig::new(20, 1, false).unwrap()).unwrap();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();

        timer.cancel();
        assert_eq!(timer.state(), TimerState::Cancelled);

        // Drop anything enqueued before the cancel, then wait past where the boundary would be
        while rx.try_recv().is_ok() {}
        thread::sleep(FAST_TICK * 30);
        assert_eq!(rx.try_recv(), Err(mpsc::TryRecvError::Empty));
        assert_eq!(player.call_count(), 0);
    }

    #[test]
    fn test_cancel_wakes_sleeping_run() {
        let player = Arc::new(RecordingPlayer::default());
        let (timer, _rx) = create_timer(player, Duration::from_secs(60));

        timer.start(TimerConfig::new(10, 10, true).unwrap()).unwrap();
        timer.cancel();

        // The worker holds the only other reference to the control block
        let deadline = Instant::now() + Duration::from_secs(2);
        while Arc::strong_count(&timer.control) > 1 {
            assert!(Instant::now() < deadline, "worker did not exit after cancel");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_start_rejects_zero_durations() {
        let player = Arc::new(RecordingPlayer::default());
        let (timer, _rx) = create_timer(player, FAST_TICK);

        let config = TimerConfig {
            focus_seconds: 0,
            rest_seconds: 5,
            muted: false,
        };
        assert!(matches!(timer.start(config), Err(TimerError::Validation(_))));

        let config = TimerConfig {
            focus_seconds: 5,
            rest_seconds: 0,
            muted: false,
        };
        assert!(matches!(timer.start(config), Err(TimerError::Validation(_))));

        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.generation(), 0);
    }

    #[test]
    fn test_cancel_when_idle_keeps_state() {
        let player = Arc::new(RecordingPlayer::default());
        let (timer, _rx) = create_timer(player, FAST_TICK);

        timer.cancel();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.generation(), 1);
    }

    #[test]
    fn test_one_second_phases_end_to_end() {
        let player = Arc::new(RecordingPlayer::default());
        let (timer, rx) = create_timer(Arc::clone(&player), TICK);

        let started = Instant::now();
        let generation = timer.start(TimerConfig::new(1, 1, true).unwrap()).unwrap();
        let events = collect_until_completed(&rx, generation);
        let elapsed = started.elapsed();

        assert_eq!(
            events,
            vec![
                TimerEvent::Progress(ProgressUpdate::new(generation, Phase::Focus, 0)),
                TimerEvent::PhaseBoundary { generation },
                TimerEvent::Progress(ProgressUpdate::new(generation, Phase::Rest, 0)),
                TimerEvent::Completed { generation },
            ]
        );
        assert_eq!(player.call_count(), 0);
        assert!(elapsed >= Duration::from_millis(1900), "finished too early: {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(4), "finished too late: {:?}", elapsed);

        assert_eq!(rx.recv_timeout(Duration::from_millis(50)), Err(RecvTimeoutError::Timeout));
    }
}
