// tower_chimes_sim: pure Rust Tower of Hanoi engine.
//
// This crate holds everything about the puzzle itself: the three-peg tower
// state, the recursive move schedule, and an untimed step engine that applies
// the schedule to a tower one move at a time. It knows nothing about pacing,
// audio, or rendering; those live in `tower_chimes_player` and
// `tower_chimes_music`.
//
// Module overview:
// - `tower.rs`:    `TowerSystem`, `Peg`, `Block`, `PegId`: slot-based peg
//                  state and the checked `apply()` mutation.
// - `schedule.rs`: `generate_moves()`: the classic recursion expressed as a
//                  lazy iterator of `MoveStep`s.
// - `solve.rs`:    `SolveRun` walks a schedule against a live tower and
//                  reports each applied move. The player's driver thread
//                  wraps this with timing.
// - `error.rs`:    `SimError` / `Corruption`.
//
// **Critical constraint: determinism.** Given a height, the sequence of
// moves and every intermediate tower state are fixed. No clocks, no
// randomness, no shared state.

pub mod error;
pub mod schedule;
pub mod solve;
pub mod tower;

pub use error::{Corruption, SimError};
pub use schedule::{MoveStep, Moves, generate_moves};
pub use solve::SolveRun;
pub use tower::{AppliedMove, Block, Peg, PegId, TowerSystem};
