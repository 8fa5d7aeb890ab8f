// MIDI recording of a solve.
//
// `MidiRecorder` is an `AudioSink` that timestamps every played note against
// the first one and, on `close()`, writes the whole performance as a
// single-track Standard MIDI File (format 0) on the acoustic grand piano.
// Gain maps to velocity. Each note rings until the next one starts, capped at
// one quarter note, so consecutive moves never overlap.
//
// Timing is fixed at 120 BPM with 480 ticks per quarter note, so one tick is
// 500/480 ms regardless of the solve's pace.
//
// Uses the `midly` crate for MIDI writing.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::debug;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};

use crate::audio::{AudioSink, PlaybackError};
use crate::note::Pitch;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Microseconds per quarter note (120 BPM).
const TEMPO_MICROSECONDS: u32 = 500_000;

/// Longest a single note is held.
const MAX_NOTE_TICKS: u32 = TICKS_PER_QUARTER as u32;

const CHANNEL: u8 = 0;

/// General MIDI program 0: acoustic grand piano.
const PIANO_PROGRAM: u8 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RecordedNote {
    tick: u32,
    key: u8,
    velocity: u8,
}

/// Records played notes and writes them to `path` on close.
#[derive(Debug)]
pub struct MidiRecorder {
    path: PathBuf,
    started: Option<Instant>,
    notes: Vec<RecordedNote>,
    closed: bool,
}

impl MidiRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            started: None,
            notes: Vec::new(),
            closed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Record a note at an explicit tick. Ticks must not go backwards.
    pub fn record_at(&mut self, tick: u32, pitch: Pitch, gain: f32) {
        let tick = self.notes.last().map_or(tick, |last| tick.max(last.tick));
        self.notes.push(RecordedNote {
            tick,
            key: pitch.midi_key(),
            velocity: gain_to_velocity(gain),
        });
    }

    /// Build the in-memory SMF for everything recorded so far.
    pub fn to_smf(&self) -> Smf<'static> {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
        ));

        let channel = u4::new(CHANNEL);
        let mut track: Track<'static> = vec![
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::TrackName("Tower Chimes".as_bytes())),
            },
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(TEMPO_MICROSECONDS))),
            },
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::ProgramChange {
                        program: u7::new(PIANO_PROGRAM),
                    },
                },
            },
        ];

        let mut last_event_tick: u32 = 0;
        for (i, note) in self.notes.iter().enumerate() {
            let end = match self.notes.get(i + 1) {
                Some(next) => next.tick.min(note.tick + MAX_NOTE_TICKS),
                None => note.tick + MAX_NOTE_TICKS,
            };

            track.push(TrackEvent {
                delta: u28::new(note.tick - last_event_tick),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key: u7::new(note.key),
                        vel: u7::new(note.velocity),
                    },
                },
            });
            track.push(TrackEvent {
                delta: u28::new(end - note.tick),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key: u7::new(note.key),
                        vel: u7::new(0),
                    },
                },
            });
            last_event_tick = end;
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
        smf
    }
}

impl AudioSink for MidiRecorder {
    fn play(&mut self, pitch: Pitch, gain: f32) -> Result<(), PlaybackError> {
        if self.closed {
            return Err(PlaybackError::Closed);
        }
        let started = *self.started.get_or_insert_with(Instant::now);
        self.record_at(millis_to_ticks(started.elapsed().as_millis()), pitch, gain);
        Ok(())
    }

    fn close(&mut self) -> Result<(), PlaybackError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut buf = Vec::new();
        self.to_smf().write_std(&mut buf)?;
        std::fs::write(&self.path, &buf)?;
        debug!(
            "wrote {} notes to {}",
            self.notes.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn millis_to_ticks(millis: u128) -> u32 {
    let ticks = millis * u128::from(TICKS_PER_QUARTER) * 1000 / u128::from(TEMPO_MICROSECONDS);
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

/// Gain `0.0..=1.0` to a sounding velocity `1..=127`.
fn gain_to_velocity(gain: f32) -> u8 {
    let gain = if gain.is_finite() { gain.clamp(0.0, 1.0) } else { 1.0 };
    ((gain * 127.0).round() as u8).max(1)
}
