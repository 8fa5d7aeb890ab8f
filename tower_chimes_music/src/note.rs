// Block width -> pitch mapping.
//
// Letters descend cyclically G F E D C B A as width grows, indexed by
// `(width + 3) mod 7`, so block 1 is C and each wider block sounds one
// scale step lower. The octave starts from an anchor picked by
// `floor(tower_height / 7)` and drops by one for every band of seven widths
// beyond the first (`ceil((width - 1) / 7)`). Taller towers start higher so
// the widest block stays audible.
//
// `pitch_for()` is strict and reports `OutOfRange` when the anchor index or
// the resulting octave fall outside the table. `pitch_for_clamped()` never
// fails; the driver falls back to it so a bad note never stops a solve.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Natural note letters. No accidentals are ever produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Letter {
    /// Semitones above C within the same octave.
    pub fn semitone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
        }
    }
}

const DESCENDING_LETTERS: [Letter; 7] = [
    Letter::G,
    Letter::F,
    Letter::E,
    Letter::D,
    Letter::C,
    Letter::B,
    Letter::A,
];

/// Starting octave indexed by `tower_height / 7`.
const START_OCTAVES: [u8; 7] = [4, 4, 4, 5, 6, 7, 8];

pub const MIN_OCTAVE: u8 = 1;
pub const MAX_OCTAVE: u8 = 8;

/// A named pitch such as `C4`. Deserialized octaves must lie in
/// `MIN_OCTAVE..=MAX_OCTAVE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPitch")]
pub struct Pitch {
    pub letter: Letter,
    pub octave: u8,
}

impl Pitch {
    /// MIDI key number, with C4 = 60. Saturates at 127.
    pub fn midi_key(self) -> u8 {
        let key = 12 * (u32::from(self.octave) + 1) + u32::from(self.letter.semitone());
        key.min(127) as u8
    }
}

#[derive(Deserialize)]
struct RawPitch {
    letter: Letter,
    octave: u8,
}

impl TryFrom<RawPitch> for Pitch {
    type Error = NoteError;

    fn try_from(raw: RawPitch) -> Result<Self, NoteError> {
        if (MIN_OCTAVE..=MAX_OCTAVE).contains(&raw.octave) {
            Ok(Pitch {
                letter: raw.letter,
                octave: raw.octave,
            })
        } else {
            Err(NoteError::InvalidOctave { octave: raw.octave })
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_str(), self.octave)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error("no pitch for block width {width} in a tower of height {tower_height}")]
    OutOfRange { width: u32, tower_height: u32 },

    #[error("octave {octave} is outside 1..=8")]
    InvalidOctave { octave: u8 },
}

fn letter_for(width: u32) -> Letter {
    DESCENDING_LETTERS[((width % 7 + 3) % 7) as usize]
}

fn octave_band(width: u32) -> u32 {
    width.saturating_sub(1).div_ceil(7)
}

/// Pitch for a block of `width` in a tower of `tower_height`.
pub fn pitch_for(width: u32, tower_height: u32) -> Result<Pitch, NoteError> {
    let out_of_range = NoteError::OutOfRange {
        width,
        tower_height,
    };
    if width == 0 {
        return Err(out_of_range);
    }
    let start = START_OCTAVES
        .get((tower_height / 7) as usize)
        .copied()
        .ok_or_else(|| out_of_range.clone())?;
    let octave = u32::from(start)
        .checked_sub(octave_band(width))
        .filter(|o| (u32::from(MIN_OCTAVE)..=u32::from(MAX_OCTAVE)).contains(o))
        .ok_or(out_of_range)?;
    Ok(Pitch {
        letter: letter_for(width),
        octave: octave as u8,
    })
}

/// Like `pitch_for()`, but clamps the anchor to the table and the octave to
/// `MIN_OCTAVE..=MAX_OCTAVE` instead of failing. Width 0 is treated as 1.
pub fn pitch_for_clamped(width: u32, tower_height: u32) -> Pitch {
    let width = width.max(1);
    let anchor = ((tower_height / 7) as usize).min(START_OCTAVES.len() - 1);
    let start = u32::from(START_OCTAVES[anchor]);
    let octave = start
        .saturating_sub(octave_band(width))
        .clamp(u32::from(MIN_OCTAVE), u32::from(MAX_OCTAVE));
    Pitch {
        letter: letter_for(width),
        octave: octave as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(width: u32, height: u32) -> String {
        pitch_for(width, height).unwrap().to_string()
    }

    #[test]
    fn smallest_block_in_short_tower_is_middle_c() {
        assert_eq!(name(1, 3), "C4");
        assert_eq!(pitch_for(1, 3).unwrap().midi_key(), 60);
    }

    #[test]
    fn wider_blocks_descend() {
        let names: Vec<String> = (1..=9).map(|w| name(w, 9)).collect();
        assert_eq!(
            names,
            vec!["C4", "B3", "A3", "G3", "F3", "E3", "D3", "C3", "B2"]
        );
        let keys: Vec<u8> = (1..=9)
            .map(|w| pitch_for(w, 9).unwrap().midi_key())
            .collect();
        assert!(keys.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn taller_towers_start_higher() {
        assert_eq!(name(1, 20), "C4");
        assert_eq!(name(1, 21), "C5");
        assert_eq!(name(1, 28), "C6");
        assert_eq!(name(1, 48), "C8");
    }

    #[test]
    fn widest_block_stays_in_range_for_supported_heights() {
        for height in 1..=48 {
            for width in 1..=height {
                let pitch = pitch_for(width, height)
                    .unwrap_or_else(|e| panic!("width {width} height {height}: {e}"));
                assert!((MIN_OCTAVE..=MAX_OCTAVE).contains(&pitch.octave));
            }
        }
        assert_eq!(name(48, 48), "E1");
    }

    #[test]
    fn out_of_range_is_reported() {
        assert_eq!(
            pitch_for(1, 49),
            Err(NoteError::OutOfRange {
                width: 1,
                tower_height: 49
            })
        );
        assert!(pitch_for(30, 20).is_err());
        assert!(pitch_for(0, 3).is_err());
    }

    #[test]
    fn clamped_never_fails() {
        assert_eq!(pitch_for_clamped(1, 49).to_string(), "C8");
        assert_eq!(pitch_for_clamped(30, 20).octave, MIN_OCTAVE);
        assert_eq!(pitch_for_clamped(0, 3), pitch_for(1, 3).unwrap());
        assert_eq!(pitch_for_clamped(5, 10), pitch_for(5, 10).unwrap());
    }

    #[test]
    fn midi_key_saturates_for_hand_built_pitches() {
        let high = Pitch {
            letter: Letter::B,
            octave: 30,
        };
        assert_eq!(high.midi_key(), 127);
        assert_eq!(pitch_for(1, 48).unwrap().midi_key(), 108);
    }

    #[test]
    fn deserialization_checks_the_octave() {
        let pitch: Pitch = serde_json::from_str(r#"{"letter":"C","octave":4}"#).unwrap();
        assert_eq!(pitch, pitch_for(1, 3).unwrap());
        assert!(serde_json::from_str::<Pitch>(r#"{"letter":"B","octave":30}"#).is_err());
        assert!(serde_json::from_str::<Pitch>(r#"{"letter":"C","octave":0}"#).is_err());
    }
}
