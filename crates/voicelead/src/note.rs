use serde::{Deserialize, Serialize};

use crate::pitch::pitch_name;

/// A single input note on the editor's time grid.
///
/// `pitch` is an equal-tempered semitone number with 60 = middle C. Values
/// outside MIDI's 0–127 are legal both on input and output: octave correction
/// may push a bass note below the displayable range, and the optimizer
/// returns the musically correct pitch rather than clamping. Display policy
/// for such pitches belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: i32,
    /// Start position in grid units (e.g. 1/32-note steps).
    pub onset: u64,
    /// Length in grid units.
    pub duration: u64,
}

/// An output note carrying its assigned voice index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicedNote {
    pub pitch: i32,
    pub onset: u64,
    pub duration: u64,
    /// 0 is the melody at the top of the texture; the highest index present
    /// in a chord is its bass.
    pub voice: usize,
}

impl std::fmt::Display for VoicedNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{} v{}", pitch_name(self.pitch), self.onset, self.voice)
    }
}

/// Parameters controlling voice assignment behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoicingParams {
    /// Maximum number of unassigned notes per chord the permutation search
    /// will accept. Default: 8.
    pub max_search_notes: Option<usize>,
}

/// Aggregate measurements over a finished piece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicingStats {
    pub chord_count: usize,
    pub voice_count: usize,
    /// Sum of absolute semitone movement across all voices and transitions.
    pub total_movement: u64,
    /// Parallel perfect fifths/octaves remaining in the final texture.
    pub parallel_count: usize,
}

/// One note inside a chord during assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChordNote {
    pub pitch: i32,
    pub duration: u64,
    pub voice: Option<usize>,
    /// Set when the (pitch, onset) pair matched an input melody note.
    /// Melody notes keep voice 0 and are never re-pitched.
    pub melody: bool,
}

/// Notes sharing an onset, plus the gap to the next chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chord {
    pub onset: u64,
    /// Grid units until the next chord's onset; 0 on the final chord.
    pub duration: u64,
    pub notes: Vec<ChordNote>,
}

impl Chord {
    /// Pitch of the note assigned to `voice`, if that voice is present.
    pub fn pitch_of(&self, voice: usize) -> Option<i32> {
        self.notes
            .iter()
            .find(|n| n.voice == Some(voice))
            .map(|n| n.pitch)
    }
}
