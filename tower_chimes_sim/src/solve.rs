// Untimed solve engine.
//
// `SolveRun` pairs a tower's move schedule with a cursor. Each `advance()`
// pulls one `MoveStep` and applies it to the tower, returning what moved.
// Timing, audio, and cancellation are the caller's job; the player's
// driver thread calls `advance()` once per paced step and simply drops the
// run to cancel it.
//
// The run always solves peg 1 -> peg 3 with peg 2 as scratch, which is the
// layout the viewer sees.

use log::debug;

use crate::error::SimError;
use crate::schedule::{Moves, generate_moves};
use crate::tower::{AppliedMove, PegId, TowerSystem};

pub const SOURCE: PegId = PegId::First;
pub const DESTINATION: PegId = PegId::Third;
pub const TEMPORARY: PegId = PegId::Second;

#[derive(Debug)]
pub struct SolveRun {
    moves: Moves,
    height: u32,
    applied: u64,
    total: u64,
}

impl SolveRun {
    /// Prepare a run for `tower`'s height. The tower is not touched until the
    /// first `advance()`.
    pub fn for_tower(tower: &TowerSystem) -> Result<Self, SimError> {
        let height = tower.height();
        let moves = generate_moves(height, SOURCE, DESTINATION, TEMPORARY)?;
        let total = moves.remaining();
        Ok(Self {
            moves,
            height,
            applied: 0,
            total,
        })
    }

    /// Apply the next move. `Ok(None)` once the schedule is exhausted.
    ///
    /// A `CorruptedState` error means the tower no longer matches the
    /// schedule; the run must not be advanced again.
    pub fn advance(&mut self, tower: &mut TowerSystem) -> Result<Option<AppliedMove>, SimError> {
        let Some(step) = self.moves.next() else {
            return Ok(None);
        };
        let applied = tower.apply(&step)?;
        self.applied += 1;
        debug!(
            "move {}/{}: block {} {} -> {} (slot {} -> {})",
            self.applied,
            self.total,
            step.block,
            step.from,
            step.to,
            applied.from_slot,
            applied.to_slot
        );
        Ok(Some(applied))
    }

    /// Apply every remaining move. Returns how many were applied by this call.
    pub fn run_to_end(&mut self, tower: &mut TowerSystem) -> Result<u64, SimError> {
        let mut count = 0;
        while self.advance(tower)?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.applied == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Corruption;
    use crate::schedule::MoveStep;

    #[test]
    fn full_run_stacks_everything_on_destination() {
        for height in 1..=10 {
            let mut tower = TowerSystem::new(height, 3).unwrap();
            let mut run = SolveRun::for_tower(&tower).unwrap();
            let applied = run.run_to_end(&mut tower).unwrap();

            assert_eq!(applied, (1u64 << height) - 1);
            assert!(run.is_finished());
            assert!(tower.is_stacked_on(DESTINATION), "height {height}");
            assert!(tower.peg(SOURCE).is_empty());
            assert!(tower.peg(TEMPORARY).is_empty());
        }
    }

    #[test]
    fn invariant_holds_after_every_prefix() {
        let mut tower = TowerSystem::new(7, 3).unwrap();
        let mut run = SolveRun::for_tower(&tower).unwrap();
        while run.advance(&mut tower).unwrap().is_some() {
            assert!(tower.is_well_stacked(), "after move {}", run.applied());
            let total: usize = tower.pegs().iter().map(|p| p.block_count()).sum();
            assert_eq!(total, 7);
        }
    }

    #[test]
    fn colours_travel_with_blocks() {
        let mut tower = TowerSystem::new(5, 3).unwrap();
        let mut run = SolveRun::for_tower(&tower).unwrap();
        run.run_to_end(&mut tower).unwrap();
        for block in tower.peg(DESTINATION).slots().iter().flatten() {
            assert_eq!(block.color_index, (block.width as usize - 1) % 3);
        }
    }

    #[test]
    fn single_block_run() {
        let mut tower = TowerSystem::new(1, 3).unwrap();
        let mut run = SolveRun::for_tower(&tower).unwrap();
        let applied = run.advance(&mut tower).unwrap().unwrap();
        assert_eq!(
            applied.step,
            MoveStep {
                from: PegId::First,
                to: PegId::Third,
                block: 1
            }
        );
        assert_eq!(run.advance(&mut tower).unwrap(), None);
        assert!(run.is_finished());
    }

    #[test]
    fn tampered_tower_is_reported_as_corruption() {
        let mut tower = TowerSystem::new(3, 3).unwrap();
        let mut run = SolveRun::for_tower(&tower).unwrap();
        run.advance(&mut tower).unwrap();

        // Someone else moves block 2 behind the run's back.
        tower
            .apply(&MoveStep {
                from: PegId::First,
                to: PegId::Second,
                block: 2,
            })
            .unwrap();

        let err = run.advance(&mut tower).unwrap_err();
        assert!(matches!(
            err,
            SimError::CorruptedState(
                Corruption::EmptyPeg { .. } | Corruption::UnexpectedBlock { .. }
            )
        ));
        assert_eq!(run.applied(), 1);
    }
}
