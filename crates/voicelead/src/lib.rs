//! Classical voice-leading optimizer.
//!
//! Given a fixed melodic line and a movable harmonic accompaniment, assigns
//! every note a voice index (soprano = 0 down to bass = N-1) and corrects
//! octave placement so the resulting texture follows classical practice:
//! no voice crossing, adjacent voices within an octave, no parallel perfect
//! fifths or octaves, and minimal pitch movement between successive chords.
//!
//! The entry point is [`assign_voices`]. Input is two flat note lists on a
//! shared integer time grid; output is one flat list where each note carries
//! its assigned voice. The melody is never re-pitched or re-voiced.

pub mod note;
pub mod optimize;
pub mod pitch;

mod assign;
mod cost;
mod octave;
mod segment;

pub use note::{NoteEvent, VoicedNote, VoicingParams, VoicingStats};
pub use optimize::{assign_voices, assign_voices_with_stats};
pub use pitch::pitch_name;

/// Errors from voice assignment.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The per-chord search enumerates every permutation of free voices over
    /// the unassigned notes, which is factorial in their count. Chords wider
    /// than the configured limit are rejected up front instead of hanging.
    #[error("chord at position {onset} has {unfixed} unassigned notes, above the search limit of {limit}")]
    SearchSpaceExceeded {
        onset: u64,
        unfixed: usize,
        limit: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
