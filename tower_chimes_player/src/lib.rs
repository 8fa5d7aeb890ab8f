// tower_chimes_player: paced playback of a Tower of Hanoi solve.
//
// This crate turns the pure engine in `tower_chimes_sim` into something a
// person watches and hears: moves are applied one at a time at a chosen pace,
// each move sounds a note for the moved block, and the viewer can reset,
// retune, or resize the tower at any moment.
//
// Module overview:
// - `config.rs`:  `PlayerConfig` (JSON) plus the `Pace`, `Volume`, and
//                 `Palette` value types with their allowed ranges.
// - `driver.rs`:  The animation driver thread. Owns the tower, the active
//                 solve, and the audio sink; takes `DriverCommand`s on one
//                 channel and reports `DriverEvent`s on another.
// - `session.rs`: Control-bar state (Solve/Reset toggle, live settings) that
//                 maps viewer actions to driver commands.
// - `render.rs`:  Plain-text tower rendering and palette legend for the
//                 terminal.
// - `error.rs`:   `PlayerError`.
//
// Dependencies: `tower_chimes_sim` (tower, schedule, step engine) and
// `tower_chimes_music` (notes and audio sinks). The `chimes` binary in
// `main.rs` wires these together for the terminal.

pub mod config;
pub mod driver;
pub mod error;
pub mod render;
pub mod session;

pub use config::{Pace, Palette, PlayerConfig, Volume};
pub use driver::{DriverCommand, DriverEvent, DriverHandle, DriverSettings, start_driver};
pub use error::PlayerError;
pub use render::{render_legend, render_tower};
pub use session::{Session, Status};
