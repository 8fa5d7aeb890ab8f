// Viewer session state: what the control bar shows and what it sends.
//
// The control bar has one submit button that reads "Solve" while idle and
// "Reset" once a solve has started (including after it finishes). Height,
// pace, and volume are adjustable at any time; a height change always drops
// back to idle. `Session` turns those interactions into `DriverCommand`s and
// follows the driver's events so its status stays in step with what the
// driver actually did (a rejected height, a fault, a completed run).
//
// The status changes when the viewer acts, not when a move arrives. Events
// lag behind commands: moves and completions already queued by a run the
// viewer has just reset or resized are stale. `Session` counts the reset and
// height commands the driver has not yet acknowledged (with `Reset`,
// `Seeded`, or `Rejected`) and ignores run results until that count is zero.
// The driver's startup `Seeded` counts as the first acknowledgement.
//
// `Session` is plain data with no thread of its own; the CLI owns one and
// feeds it events from the driver's receiver.

use crate::config::{Pace, Palette, PlayerConfig, Volume};
use crate::driver::{DriverCommand, DriverEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Solving,
    Done,
}

#[derive(Clone, Debug)]
pub struct Session {
    status: Status,
    height: u32,
    pace: Pace,
    volume: Volume,
    palette: Palette,
    /// Reset / height commands (plus the initial seed) not yet acknowledged.
    unacknowledged: u32,
}

impl Session {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            status: Status::Idle,
            height: config.height,
            pace: config.pace,
            volume: config.volume,
            palette: config.palette,
            unacknowledged: 1,
        }
    }

    /// The submit button: start a solve when idle, otherwise reset.
    pub fn submit(&mut self) -> DriverCommand {
        match self.status {
            Status::Idle => {
                self.status = Status::Solving;
                DriverCommand::StartSolve
            }
            Status::Solving | Status::Done => {
                self.status = Status::Idle;
                self.unacknowledged += 1;
                DriverCommand::Reset
            }
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self.status {
            Status::Idle => "Solve",
            Status::Solving | Status::Done => "Reset",
        }
    }

    pub fn set_height(&mut self, height: u32) -> DriverCommand {
        self.status = Status::Idle;
        self.unacknowledged += 1;
        DriverCommand::SetHeight(height)
    }

    pub fn set_pace(&mut self, pace: Pace) -> DriverCommand {
        self.pace = pace;
        DriverCommand::SetPace(pace)
    }

    pub fn set_volume(&mut self, volume: Volume) -> DriverCommand {
        self.volume = volume;
        DriverCommand::SetVolume(volume)
    }

    /// Palette changes are display-only and never reach the driver.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Follow a driver event.
    pub fn observe(&mut self, event: &DriverEvent) {
        match event {
            DriverEvent::Seeded { tower } => {
                self.height = tower.height();
                self.acknowledge();
            }
            DriverEvent::Reset { .. } => self.acknowledge(),
            DriverEvent::Rejected(_) => {
                if self.unacknowledged > 0 {
                    self.acknowledge();
                } else if self.status == Status::Solving {
                    // The start itself was refused.
                    self.status = Status::Idle;
                }
            }
            DriverEvent::SolveComplete { .. } | DriverEvent::Fault(_) => {
                if self.unacknowledged == 0 && self.status == Status::Solving {
                    self.status = Status::Done;
                }
            }
            DriverEvent::Moved { .. } | DriverEvent::NoteRequested { .. } => {}
        }
    }

    fn acknowledge(&mut self) {
        self.unacknowledged = self.unacknowledged.saturating_sub(1);
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }
}
