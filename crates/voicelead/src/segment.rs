use std::collections::BTreeMap;

use tracing::debug;

use crate::note::{Chord, ChordNote, NoteEvent, VoicedNote};

/// Merge melody and harmony into one chord per distinct onset, ascending.
///
/// Melody notes are pre-tagged voice 0 (at most one per chord — the melody
/// rail holds a single note). Chord duration is the gap to the next chord's
/// onset; the final chord gets 0, which nothing downstream reads.
pub(crate) fn segment_chords(melody: &[NoteEvent], harmony: &[NoteEvent]) -> Vec<Chord> {
    let mut by_onset: BTreeMap<u64, Vec<ChordNote>> = BTreeMap::new();

    for note in melody {
        let slot = by_onset.entry(note.onset).or_default();
        let on_rail = !slot.iter().any(|n| n.melody);
        slot.push(ChordNote {
            pitch: note.pitch,
            duration: note.duration,
            voice: on_rail.then_some(0),
            melody: on_rail,
        });
    }
    for note in harmony {
        by_onset.entry(note.onset).or_default().push(ChordNote {
            pitch: note.pitch,
            duration: note.duration,
            voice: None,
            melody: false,
        });
    }

    let onsets: Vec<u64> = by_onset.keys().copied().collect();
    let chords: Vec<Chord> = by_onset
        .into_iter()
        .enumerate()
        .map(|(i, (onset, notes))| Chord {
            onset,
            duration: onsets.get(i + 1).map(|next| next - onset).unwrap_or(0),
            notes,
        })
        .collect();

    debug!(chords = chords.len(), "segmented input");
    chords
}

/// Serialize chords back to a flat note list ordered by (onset, voice).
pub(crate) fn flatten_chords(chords: &[Chord]) -> Vec<VoicedNote> {
    let mut out = Vec::with_capacity(chords.iter().map(|c| c.notes.len()).sum());
    for chord in chords {
        let mut notes: Vec<&ChordNote> = chord.notes.iter().collect();
        notes.sort_by_key(|n| n.voice);
        for note in notes {
            out.push(VoicedNote {
                pitch: note.pitch,
                onset: chord.onset,
                duration: note.duration,
                voice: note.voice.unwrap_or(0),
            });
        }
    }
    out
}
