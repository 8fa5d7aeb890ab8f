// The move schedule: classic three-peg recursion as a lazy iterator.
//
// To move `count` blocks from `from` to `to` via `via`:
//   (a) move `count - 1` blocks from `from` to `via` (via `to`),
//   (b) move block `count` from `from` to `to`,
//   (c) move `count - 1` blocks from `via` to `to` (via `from`).
// Swapping (a) and (c) would put a wider block on a narrower one, so this
// order is the whole contract. The schedule only ever moves the smallest
// `count` blocks of a sub-stack, so the block moved in step (b) is always
// width `count`, and the schedule can name every block without looking at a
// tower.
//
// `Moves` unrolls the recursion with an explicit frame stack: the stack never
// holds more than about `2 * count` frames, and each call to `next()` does
// O(count) work at most. It is finite and cannot be restarted; build a new
// one with `generate_moves()` instead.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::tower::PegId;

/// Largest count the scheduler accepts; `2^63 - 1` moves still fits a `u64`.
pub const MAX_SCHEDULE_COUNT: u32 = 63;

/// One relocation of the top block of `from` onto `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStep {
    pub from: PegId,
    pub to: PegId,
    /// Width of the block the schedule expects to be on top of `from`.
    pub block: u32,
}

/// Number of moves needed for `count` blocks: `2^count - 1`.
pub fn move_count(count: u32) -> u64 {
    match count {
        0 => 0,
        1..=64 => u64::MAX >> (64 - count),
        _ => u64::MAX,
    }
}

#[derive(Debug)]
enum Frame {
    SubTower {
        count: u32,
        from: PegId,
        to: PegId,
        via: PegId,
    },
    Single(MoveStep),
}

/// Lazy move sequence returned by `generate_moves()`.
#[derive(Debug)]
pub struct Moves {
    stack: Vec<Frame>,
    remaining: u64,
}

impl Moves {
    /// Moves not yet yielded.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Iterator for Moves {
    type Item = MoveStep;

    fn next(&mut self) -> Option<MoveStep> {
        while let Some(frame) = self.stack.pop() {
            let step = match frame {
                Frame::Single(step) => step,
                Frame::SubTower {
                    count: 1,
                    from,
                    to,
                    ..
                } => MoveStep {
                    from,
                    to,
                    block: 1,
                },
                Frame::SubTower {
                    count,
                    from,
                    to,
                    via,
                } => {
                    // Pushed in reverse: (a) is popped first.
                    self.stack.push(Frame::SubTower {
                        count: count - 1,
                        from: via,
                        to,
                        via: from,
                    });
                    self.stack.push(Frame::Single(MoveStep {
                        from,
                        to,
                        block: count,
                    }));
                    self.stack.push(Frame::SubTower {
                        count: count - 1,
                        from,
                        to: via,
                        via: to,
                    });
                    continue;
                }
            };
            self.remaining -= 1;
            return Some(step);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Moves {}

/// Build the schedule that moves the top `count` blocks of `source` onto
/// `destination`, using `temporary` as scratch.
///
/// Rejects `count` outside `1..=MAX_SCHEDULE_COUNT` and role triples that
/// are not three distinct pegs. Nothing is produced for rejected input.
pub fn generate_moves(
    count: u32,
    source: PegId,
    destination: PegId,
    temporary: PegId,
) -> Result<Moves, SimError> {
    if !(1..=MAX_SCHEDULE_COUNT).contains(&count) {
        return Err(SimError::InvalidHeight {
            height: count,
            min: 1,
            max: MAX_SCHEDULE_COUNT,
        });
    }
    if source == destination || source == temporary || destination == temporary {
        return Err(SimError::InvalidRoles {
            from: source,
            to: destination,
            via: temporary,
        });
    }

    let mut stack = Vec::with_capacity(2 * count as usize);
    stack.push(Frame::SubTower {
        count,
        from: source,
        to: destination,
        via: temporary,
    });
    Ok(Moves {
        stack,
        remaining: move_count(count),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tower::PegId::{First, Second, Third};
    use crate::tower::TowerSystem;

    fn step(block: u32, from: PegId, to: PegId) -> MoveStep {
        MoveStep { from, to, block }
    }

    #[test]
    fn single_block_moves_directly() {
        let moves: Vec<_> = generate_moves(1, First, Third, Second).unwrap().collect();
        assert_eq!(moves, vec![step(1, First, Third)]);
    }

    #[test]
    fn three_blocks_match_textbook_table() {
        let moves: Vec<_> = generate_moves(3, First, Third, Second).unwrap().collect();
        assert_eq!(
            moves,
            vec![
                step(1, First, Third),
                step(2, First, Second),
                step(1, Third, Second),
                step(3, First, Third),
                step(1, Second, First),
                step(2, Second, Third),
                step(1, First, Third),
            ]
        );
    }

    #[test]
    fn move_count_is_two_to_the_n_minus_one() {
        for count in 1..=16 {
            let moves = generate_moves(count, First, Third, Second).unwrap();
            assert_eq!(moves.remaining(), (1u64 << count) - 1);
            assert_eq!(moves.count() as u64, (1u64 << count) - 1, "count {count}");
        }
        assert_eq!(move_count(0), 0);
        assert_eq!(move_count(63), u64::MAX >> 1);
    }

    #[test]
    fn remaining_and_size_hint_track_progress() {
        let mut moves = generate_moves(4, First, Third, Second).unwrap();
        assert_eq!(moves.size_hint(), (15, Some(15)));
        moves.next();
        moves.next();
        assert_eq!(moves.remaining(), 13);
        assert_eq!(moves.size_hint(), (13, Some(13)));
        assert_eq!(moves.by_ref().count(), 13);
        assert_eq!(moves.next(), None);
    }

    #[test]
    fn largest_block_moves_exactly_once_in_the_middle() {
        let moves: Vec<_> = generate_moves(6, First, Third, Second).unwrap().collect();
        let widest: Vec<usize> = moves
            .iter()
            .enumerate()
            .filter(|(_, m)| m.block == 6)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(widest, vec![31]);
        assert_eq!(moves[31], step(6, First, Third));
    }

    #[test]
    fn permuted_roles_still_solve() {
        // Schedule is role-pure: any distinct triple works against a tower
        // seeded on the chosen source. Seeding is always peg 1, so only the
        // destination and scratch roles vary here.
        for (to, via) in [(Third, Second), (Second, Third)] {
            let mut tower = TowerSystem::new(5, 3).unwrap();
            for m in generate_moves(5, First, to, via).unwrap() {
                tower.apply(&m).unwrap();
            }
            assert!(tower.is_stacked_on(to));
        }
    }

    #[test]
    fn rejects_zero_and_oversized_counts() {
        assert!(matches!(
            generate_moves(0, First, Third, Second),
            Err(SimError::InvalidHeight { height: 0, .. })
        ));
        assert!(matches!(
            generate_moves(MAX_SCHEDULE_COUNT + 1, First, Third, Second),
            Err(SimError::InvalidHeight { .. })
        ));
        assert!(generate_moves(MAX_SCHEDULE_COUNT, First, Third, Second).is_ok());
    }

    #[test]
    fn rejects_repeated_roles() {
        assert_eq!(
            generate_moves(3, First, First, Second).unwrap_err(),
            SimError::InvalidRoles {
                from: First,
                to: First,
                via: Second
            }
        );
        assert!(generate_moves(3, First, Third, Third).is_err());
    }
}
