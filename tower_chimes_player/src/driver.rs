// Animation driver: paced, cancellable solve loop on its own thread.
//
// Architecture: one driver thread with a command channel in and an event
// channel out.
//
// - **Driver thread**: owns the `TowerSystem` (the only writer), the active
//   `SolveRun`, and the `AudioSink`. It blocks on the command channel. While
//   a solve is running it uses `recv_timeout` with the next step's deadline
//   as the timeout; when the timeout fires (no command waiting) it applies
//   the next move. This gives us the inter-step pause without a separate
//   timer thread, and every pause doubles as a cancellation point.
// - **Caller**: holds a `DriverHandle` to send `DriverCommand`s and reads
//   `DriverEvent`s from the returned receiver. Renderers keep their own
//   mirror of the tower by applying `Moved` events to the last `Seeded` /
//   `Reset` snapshot; nothing is shared.
//
// Per step: apply the move, emit `Moved`, request the note (skipped entirely
// at volume 0), then wait one pace interval. After the last step's pause the
// driver emits `SolveComplete`.
//
// Mid-solve edits: `SetHeight` cancels the run and reseeds at the new
// height. `SetPace` / `SetVolume` take effect from the next step; the pause
// already running is not cut short. `StartSolve` during a run is ignored.
//
// Failure handling: a `CorruptedState` from the tower halts the run and is
// reported as `Fault`; the thread keeps serving commands. Playback errors
// and out-of-range notes are logged and the animation continues.
//
// Shutdown: `DriverHandle::stop()` (or dropping every sender) ends the loop;
// the audio sink is closed on the way out.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;

use log::{debug, error, info, warn};
use tower_chimes_music::{AudioSink, Pitch, pitch_for, pitch_for_clamped};
use tower_chimes_sim::{AppliedMove, SimError, SolveRun, TowerSystem};

use crate::config::{Pace, PlayerConfig, Volume};
use crate::error::PlayerError;

/// Control messages accepted by the driver thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverCommand {
    StartSolve,
    Reset,
    SetHeight(u32),
    SetPace(Pace),
    SetVolume(Volume),
    Shutdown,
}

/// Everything the driver reports, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
pub enum DriverEvent {
    /// A fresh tower, at startup or after a height change or restart.
    Seeded { tower: TowerSystem },
    /// One move was applied. `index` is 1-based.
    Moved {
        applied: AppliedMove,
        index: u64,
        total: u64,
    },
    /// A note was sent to the audio sink.
    NoteRequested { pitch: Pitch, gain: f32 },
    /// The last move's pause elapsed.
    SolveComplete { moves: u64 },
    /// The viewer reset; the tower is back in its seeded state.
    Reset { tower: TowerSystem },
    /// The tower stopped matching the schedule. The run is over.
    Fault(SimError),
    /// A command was refused; nothing changed.
    Rejected(SimError),
}

/// Initial settings for a driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverSettings {
    pub height: u32,
    pub pace: Pace,
    pub volume: Volume,
    pub palette_size: usize,
}

impl From<&PlayerConfig> for DriverSettings {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            height: config.height,
            pace: config.pace,
            volume: config.volume,
            palette_size: config.palette.size(),
        }
    }
}

/// Handle returned by `start_driver` to control the running driver.
pub struct DriverHandle {
    commands: Sender<DriverCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl DriverHandle {
    /// Queue a command. Returns false if the driver has already exited.
    pub fn send(&self, command: DriverCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn start_solve(&self) -> bool {
        self.send(DriverCommand::StartSolve)
    }

    pub fn reset(&self) -> bool {
        self.send(DriverCommand::Reset)
    }

    /// Signal the driver to stop and wait for it to close the audio sink.
    pub fn stop(mut self) {
        let _ = self.commands.send(DriverCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Seed a tower from `settings` and start the driver thread. The first event
/// on the returned receiver is always `Seeded`.
pub fn start_driver(
    settings: DriverSettings,
    audio: Box<dyn AudioSink>,
) -> Result<(DriverHandle, Receiver<DriverEvent>), PlayerError> {
    let tower = TowerSystem::new(settings.height, settings.palette_size)?;
    let (command_tx, command_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();

    let driver = Driver {
        tower,
        pace: settings.pace,
        volume: settings.volume,
        phase: Phase::Idle,
        audio,
        events: event_tx,
    };
    let thread = thread::Builder::new()
        .name("tower-chimes-driver".into())
        .spawn(move || driver.run(command_rx))
        .map_err(PlayerError::Spawn)?;

    Ok((
        DriverHandle {
            commands: command_tx,
            thread: Some(thread),
        },
        event_rx,
    ))
}

enum Phase {
    Idle,
    Solving {
        run: SolveRun,
        next_step_at: Instant,
    },
    Done,
    Halted,
}

enum Flow {
    Continue,
    Stop,
}

struct Driver {
    tower: TowerSystem,
    pace: Pace,
    volume: Volume,
    phase: Phase,
    audio: Box<dyn AudioSink>,
    events: Sender<DriverEvent>,
}

impl Driver {
    fn run(mut self, commands: Receiver<DriverCommand>) {
        self.emit(DriverEvent::Seeded {
            tower: self.tower.clone(),
        });

        loop {
            let command = match self.deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match commands.recv_timeout(wait) {
                        Ok(command) => command,
                        Err(RecvTimeoutError::Timeout) => {
                            self.step();
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match commands.recv() {
                    Ok(command) => command,
                    Err(_) => break,
                },
            };
            if let Flow::Stop = self.handle(command) {
                break;
            }
        }

        if let Err(e) = self.audio.close() {
            warn!("closing audio sink failed: {e}");
        }
        debug!("driver stopped");
    }

    fn deadline(&self) -> Option<Instant> {
        match &self.phase {
            Phase::Solving { next_step_at, .. } => Some(*next_step_at),
            _ => None,
        }
    }

    fn handle(&mut self, command: DriverCommand) -> Flow {
        match command {
            DriverCommand::StartSolve => self.start_solve(),
            DriverCommand::Reset => {
                if matches!(self.phase, Phase::Solving { .. }) {
                    info!("solve cancelled by reset");
                }
                self.phase = Phase::Idle;
                self.tower.reseed();
                self.emit(DriverEvent::Reset {
                    tower: self.tower.clone(),
                });
            }
            DriverCommand::SetHeight(height) => {
                match TowerSystem::new(height, self.tower.palette_size()) {
                    Ok(tower) => {
                        if matches!(self.phase, Phase::Solving { .. }) {
                            info!("solve cancelled by height change to {height}");
                        }
                        self.phase = Phase::Idle;
                        self.tower = tower;
                        self.emit(DriverEvent::Seeded {
                            tower: self.tower.clone(),
                        });
                    }
                    Err(e) => {
                        warn!("height change rejected: {e}");
                        self.emit(DriverEvent::Rejected(e));
                    }
                }
            }
            DriverCommand::SetPace(pace) => self.pace = pace,
            DriverCommand::SetVolume(volume) => self.volume = volume,
            DriverCommand::Shutdown => return Flow::Stop,
        }
        Flow::Continue
    }

    fn start_solve(&mut self) {
        match self.phase {
            Phase::Solving { .. } => {
                debug!("solve already running; ignoring start");
                return;
            }
            Phase::Done | Phase::Halted => {
                self.tower.reseed();
                self.emit(DriverEvent::Seeded {
                    tower: self.tower.clone(),
                });
            }
            Phase::Idle => {}
        }

        match SolveRun::for_tower(&self.tower) {
            Ok(run) => {
                info!(
                    "solving height {} in {} moves at {} BPM",
                    self.tower.height(),
                    run.total(),
                    self.pace.bpm()
                );
                self.phase = Phase::Solving {
                    run,
                    next_step_at: Instant::now(),
                };
            }
            Err(e) => {
                warn!("cannot start solve: {e}");
                self.emit(DriverEvent::Rejected(e));
            }
        }
    }

    /// Apply one move (or finish) once the current pause has elapsed.
    fn step(&mut self) {
        let Phase::Solving { run, next_step_at } = &mut self.phase else {
            return;
        };

        match run.advance(&mut self.tower) {
            Ok(Some(applied)) => {
                let index = run.applied();
                let total = run.total();
                *next_step_at = Instant::now() + self.pace.interval();
                self.emit(DriverEvent::Moved {
                    applied,
                    index,
                    total,
                });
                self.sound(applied.block.width);
            }
            Ok(None) => {
                let moves = run.applied();
                self.phase = Phase::Done;
                info!("solve complete after {moves} moves");
                self.emit(DriverEvent::SolveComplete { moves });
            }
            Err(e) => {
                error!("solve halted: {e}");
                self.phase = Phase::Halted;
                self.emit(DriverEvent::Fault(e));
            }
        }
    }

    fn sound(&mut self, width: u32) {
        if self.volume.is_muted() {
            return;
        }
        let height = self.tower.height();
        let pitch = pitch_for(width, height).unwrap_or_else(|e| {
            warn!("{e}; clamping");
            pitch_for_clamped(width, height)
        });
        let gain = self.volume.gain();
        self.emit(DriverEvent::NoteRequested { pitch, gain });
        if let Err(e) = self.audio.play(pitch, gain) {
            warn!("playback of {pitch} failed: {e}");
        }
    }

    fn emit(&self, event: DriverEvent) {
        // A dropped receiver just means nobody is watching.
        let _ = self.events.send(event);
    }
}
