//! Pipeline entry point: segment, count voices, assign chord by chord,
//! repair octaves, balance registers, flatten.

use tracing::{debug, info};

use crate::assign::{assign_chord, assign_first_chord, voice_count};
use crate::cost::{parallel_pairs, raw_movement};
use crate::note::{Chord, NoteEvent, VoicedNote, VoicingParams, VoicingStats};
use crate::octave::{balance_registers, normalize_chord};
use crate::segment::{flatten_chords, segment_chords};
use crate::Result;

/// Default cap on unassigned notes per chord for the permutation search.
const DEFAULT_MAX_SEARCH_NOTES: usize = 8;

/// Assign a voice index to every note of a fixed melody plus harmony.
///
/// The melody keeps voice 0 and its exact pitches. Harmony notes receive
/// voices so that, in every chord of the result, no two notes share a voice,
/// pitch never increases with voice index, the bass (highest index) is the
/// lowest note, and adjacent voices sit within an octave. Between chords the
/// assignment minimizes a cost that heavily penalizes voice crossings and
/// parallel perfect fifths/octaves, then pitch movement.
///
/// Deterministic, synchronous, and pure: identical input yields identical
/// output, and degenerate input (no notes, no harmony) passes through
/// unchanged. The only error is exceeding the per-chord search cap.
pub fn assign_voices(
    melody: &[NoteEvent],
    harmony: &[NoteEvent],
    params: &VoicingParams,
) -> Result<Vec<VoicedNote>> {
    assign_voices_with_stats(melody, harmony, params).map(|(notes, _)| notes)
}

/// Like [`assign_voices`], also returning aggregate measurements over the
/// finished piece.
pub fn assign_voices_with_stats(
    melody: &[NoteEvent],
    harmony: &[NoteEvent],
    params: &VoicingParams,
) -> Result<(Vec<VoicedNote>, VoicingStats)> {
    let mut chords = segment_chords(melody, harmony);
    let n_voices = voice_count(&chords);
    if n_voices == 0 {
        return Ok((Vec::new(), VoicingStats::default()));
    }
    let limit = params.max_search_notes.unwrap_or(DEFAULT_MAX_SEARCH_NOTES);
    let span = chords.last().map(|c| c.onset + c.duration).unwrap_or(0);
    debug!(
        chords = chords.len(),
        voices = n_voices,
        span,
        limit,
        "assigning voices"
    );

    if let Some(first) = chords.first_mut() {
        assign_first_chord(first, n_voices);
        normalize_chord(first);
    }
    for i in 1..chords.len() {
        let (done, rest) = chords.split_at_mut(i);
        assign_chord(&done[i - 1], &mut rest[0], n_voices, limit)?;
        normalize_chord(&mut rest[0]);
    }

    balance_registers(&mut chords);

    let stats = collect_stats(&chords, n_voices);
    info!(
        chords = stats.chord_count,
        voices = stats.voice_count,
        movement = stats.total_movement,
        parallels = stats.parallel_count,
        "voice assignment complete"
    );
    Ok((flatten_chords(&chords), stats))
}

fn collect_stats(chords: &[Chord], n_voices: usize) -> VoicingStats {
    let mut stats = VoicingStats {
        chord_count: chords.len(),
        voice_count: n_voices,
        ..VoicingStats::default()
    };
    for pair in chords.windows(2) {
        stats.total_movement += raw_movement(&pair[0], &pair[1]);
        stats.parallel_count += parallel_pairs(&pair[0], &pair[1]);
    }
    stats
}
