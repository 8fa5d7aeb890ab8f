// tower_chimes_music: the sound side of Tower Chimes.
//
// Turns moved blocks into pitches and gives the animation driver somewhere
// to send them. Nothing here knows about pegs or move order; the only input
// is a block width, the tower height, and a gain.
//
// Module overview:
// - note.rs:  `pitch_for()` / `pitch_for_clamped()`: width + height to a
//             natural pitch name (`C4`), plus MIDI key conversion.
// - audio.rs: `AudioSink` trait, `SilentSink`, `PlaybackError`.
// - midi.rs:  `MidiRecorder`, an `AudioSink` that writes the performance to
//             a Standard MIDI File when closed.

pub mod audio;
pub mod midi;
pub mod note;

pub use audio::{AudioSink, PlaybackError, SilentSink};
pub use midi::MidiRecorder;
pub use note::{NoteError, Pitch, pitch_for, pitch_for_clamped};
