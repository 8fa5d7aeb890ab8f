// Tower state: three pegs of fixed-length slot arrays.
//
// Each peg has exactly `height` slots. Slot 0 is the free end of the peg
// (the top); blocks rest at the high-index end, so a freshly seeded peg 1
// holds width `k` in slot `k - 1`. The top block of a peg is its lowest-index
// occupied slot.
//
// `TowerSystem::apply()` is the only mutation. It validates the whole move
// before writing anything, so a rejected move leaves the tower untouched and
// a partial move is never observable.
//
// See also: `schedule.rs` for the `MoveStep`s fed into `apply()`, `solve.rs`
// for the step engine that drives it.
//
// Invariants (checked by `is_well_stacked()` and preserved by `apply()`):
// - On every peg, occupied widths strictly increase with slot index.
// - Across all pegs, widths `1..=height` each appear exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Corruption, SimError};
use crate::schedule::MoveStep;

/// Smallest supported tower. A single block still exercises the base case.
pub const MIN_HEIGHT: u32 = 1;

/// Largest supported tower. The note table tops out here (see
/// `tower_chimes_music::note`), and 2^48 - 1 moves is already far beyond
/// anything that finishes at 300 moves per minute.
pub const MAX_HEIGHT: u32 = 48;

/// Check that `height` is within `MIN_HEIGHT..=MAX_HEIGHT`.
pub fn validate_height(height: u32) -> Result<(), SimError> {
    if (MIN_HEIGHT..=MAX_HEIGHT).contains(&height) {
        Ok(())
    } else {
        Err(SimError::InvalidHeight {
            height,
            min: MIN_HEIGHT,
            max: MAX_HEIGHT,
        })
    }
}

/// One of the three pegs. Source/destination/temporary are roles assigned per
/// recursion level; these are the fixed identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PegId {
    First = 0,
    Second = 1,
    Third = 2,
}

impl PegId {
    pub const ALL: [PegId; 3] = [PegId::First, PegId::Second, PegId::Third];

    pub fn index(self) -> usize {
        self as usize
    }

    /// 1-based peg number as shown to the viewer.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for PegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peg {}", self.number())
    }
}

/// A single block. `width` is both its identity and its stacking rank;
/// `color_index` indexes an external palette and is only carried along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub width: u32,
    pub color_index: usize,
}

/// A peg: a fixed number of slots, each empty or holding a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peg {
    slots: Vec<Option<Block>>,
}

impl Peg {
    fn empty(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn slots(&self) -> &[Option<Block>] {
        &self.slots
    }

    /// The top block and its slot index, or `None` if the peg is empty.
    pub fn top(&self) -> Option<(usize, Block)> {
        self.slots
            .iter()
            .enumerate()
            .find_map(|(i, slot)| slot.map(|block| (i, block)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn block_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Occupied widths from top to bottom.
    pub fn widths(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().flatten().map(|block| block.width)
    }

    /// True if occupied widths strictly increase from top to bottom.
    pub fn is_well_stacked(&self) -> bool {
        let widths: Vec<u32> = self.widths().collect();
        widths.windows(2).all(|pair| pair[0] < pair[1])
    }
}

/// Where an applied move took its block from and put it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    pub step: MoveStep,
    pub block: Block,
    pub from_slot: usize,
    pub to_slot: usize,
}

/// The three pegs plus the parameters they were seeded from.
///
/// Deserialization goes through `TowerSnapshot` and rejects any layout that
/// `apply()` could not have produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TowerSnapshot")]
pub struct TowerSystem {
    height: u32,
    palette_size: usize,
    pegs: [Peg; 3],
}

#[derive(Deserialize)]
struct TowerSnapshot {
    height: u32,
    palette_size: usize,
    pegs: [Peg; 3],
}

impl TryFrom<TowerSnapshot> for TowerSystem {
    type Error = SimError;

    fn try_from(snapshot: TowerSnapshot) -> Result<Self, SimError> {
        let TowerSnapshot {
            height,
            palette_size,
            pegs,
        } = snapshot;
        validate_height(height)?;
        if palette_size == 0 {
            return Err(SimError::EmptyPalette);
        }
        if pegs.iter().any(|peg| peg.slots.len() != height as usize) {
            return Err(SimError::InvalidSnapshot("peg length differs from height"));
        }
        if !pegs.iter().all(Peg::is_well_stacked) {
            return Err(SimError::InvalidSnapshot("wider block above narrower block"));
        }
        let mut widths: Vec<u32> = pegs.iter().flat_map(Peg::widths).collect();
        widths.sort_unstable();
        if !widths.iter().copied().eq(1..=height) {
            return Err(SimError::InvalidSnapshot("widths are not exactly 1..=height"));
        }
        let blocks_rest_on_bottom = pegs.iter().all(|peg| {
            peg.top()
                .is_none_or(|(top, _)| peg.slots[top..].iter().all(Option::is_some))
        });
        if !blocks_rest_on_bottom {
            return Err(SimError::InvalidSnapshot("gap below a block"));
        }
        let colors_in_palette = pegs
            .iter()
            .flat_map(|peg| peg.slots.iter().flatten())
            .all(|block| block.color_index < palette_size);
        if !colors_in_palette {
            return Err(SimError::InvalidSnapshot("colour index outside palette"));
        }
        Ok(Self {
            height,
            palette_size,
            pegs,
        })
    }
}

impl TowerSystem {
    /// Seed a tower of `height` blocks on peg 1. Block `k` sits in slot
    /// `k - 1` with colour index `(k - 1) % palette_size`.
    pub fn new(height: u32, palette_size: usize) -> Result<Self, SimError> {
        validate_height(height)?;
        if palette_size == 0 {
            return Err(SimError::EmptyPalette);
        }
        Ok(Self::seeded(height, palette_size))
    }

    fn seeded(height: u32, palette_size: usize) -> Self {
        let len = height as usize;
        let mut first = Peg::empty(len);
        for (index, slot) in first.slots.iter_mut().enumerate() {
            *slot = Some(Block {
                width: index as u32 + 1,
                color_index: index % palette_size,
            });
        }
        Self {
            height,
            palette_size,
            pegs: [first, Peg::empty(len), Peg::empty(len)],
        }
    }

    /// Discard all progress and return to the freshly seeded state.
    pub fn reseed(&mut self) {
        *self = Self::seeded(self.height, self.palette_size);
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    pub fn peg(&self, id: PegId) -> &Peg {
        &self.pegs[id.index()]
    }

    pub fn pegs(&self) -> &[Peg; 3] {
        &self.pegs
    }

    /// Move the top block of `step.from` onto `step.to`.
    ///
    /// The top block must be exactly `step.block`, and it must not land on a
    /// narrower block. Any mismatch is `CorruptedState` and nothing is
    /// written.
    pub fn apply(&mut self, step: &MoveStep) -> Result<AppliedMove, SimError> {
        if step.from == step.to {
            return Err(Corruption::SamePeg { peg: step.from }.into());
        }

        let (from_slot, block) = self.peg(step.from).top().ok_or(Corruption::EmptyPeg {
            peg: step.from,
            expected: step.block,
        })?;
        if block.width != step.block {
            return Err(Corruption::UnexpectedBlock {
                peg: step.from,
                expected: step.block,
                found: block.width,
            }
            .into());
        }

        let destination = self.peg(step.to);
        let to_slot = match destination.top() {
            None => destination.slots.len() - 1,
            Some((0, _)) => return Err(Corruption::PegFull { peg: step.to }.into()),
            Some((_, top)) if top.width < block.width => {
                return Err(Corruption::WiderOnNarrower {
                    peg: step.to,
                    moving: block.width,
                    top: top.width,
                }
                .into());
            }
            Some((index, _)) => index - 1,
        };

        self.pegs[step.from.index()].slots[from_slot] = None;
        self.pegs[step.to.index()].slots[to_slot] = Some(block);

        Ok(AppliedMove {
            step: *step,
            block,
            from_slot,
            to_slot,
        })
    }

    /// True if every peg satisfies the stacking invariant.
    pub fn is_well_stacked(&self) -> bool {
        self.pegs.iter().all(Peg::is_well_stacked)
    }

    /// True if all blocks sit on `peg`, widest at the bottom, and the other
    /// pegs are empty.
    pub fn is_stacked_on(&self, peg: PegId) -> bool {
        let target = self.peg(peg);
        target.widths().eq(1..=self.height)
            && PegId::ALL
                .iter()
                .filter(|&&other| other != peg)
                .all(|&other| self.peg(other).is_empty())
    }
}
