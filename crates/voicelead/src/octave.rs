//! Octave repair passes.
//!
//! The permutation search only scores pitches as given; these passes move
//! notes by whole octaves afterwards so each chord reads top-down (voice 0
//! highest, bass lowest, adjacent voices within an octave) and so the whole
//! accompaniment sits within an octave of the melody. Melody notes are never
//! re-pitched — only harmony shifts.

use tracing::debug;

use crate::note::Chord;

const OCTAVE: i32 = 12;

/// Repair octave placement inside one chord after voices are committed.
///
/// The bass (highest voice index present) is dropped by octaves until it is
/// the lowest sounding note. The remaining voices are then walked bottom-up:
/// each is raised by octaves until strictly above the voice below it, then
/// lowered while the gap to that voice exceeds an octave. Afterwards pitch
/// strictly decreases as voice index increases.
pub(crate) fn normalize_chord(chord: &mut Chord) {
    // note indices ordered by voice, soprano first
    let mut order: Vec<usize> = (0..chord.notes.len())
        .filter(|&i| chord.notes[i].voice.is_some())
        .collect();
    order.sort_by_key(|&i| chord.notes[i].voice);
    if order.len() < 2 {
        return;
    }

    let bass = order[order.len() - 1];
    if !chord.notes[bass].melody {
        let floor = order[..order.len() - 1]
            .iter()
            .map(|&i| chord.notes[i].pitch)
            .min()
            .unwrap_or(chord.notes[bass].pitch);
        while chord.notes[bass].pitch > floor {
            chord.notes[bass].pitch -= OCTAVE;
        }
    }

    // Walk upward from the voice above the bass; each note is placed
    // relative to the (already settled) note below it.
    for k in (0..order.len() - 1).rev() {
        if chord.notes[order[k]].melody {
            continue;
        }
        let below = chord.notes[order[k + 1]].pitch;
        let note = &mut chord.notes[order[k]];
        while note.pitch <= below {
            note.pitch += OCTAVE;
        }
        while note.pitch - below > OCTAVE {
            note.pitch -= OCTAVE;
        }
    }
}

/// One global register correction over the finished piece.
///
/// If the accompaniment has drifted more than an octave below the melody,
/// every harmony note is raised by the same whole number of octaves,
/// preserving the relative voicing chosen per chord.
pub(crate) fn balance_registers(chords: &mut [Chord]) {
    let min_melody = chords
        .iter()
        .flat_map(|c| &c.notes)
        .filter(|n| n.melody)
        .map(|n| n.pitch)
        .min();
    let max_harmony = chords
        .iter()
        .flat_map(|c| &c.notes)
        .filter(|n| !n.melody)
        .map(|n| n.pitch)
        .max();
    let (Some(min_melody), Some(max_harmony)) = (min_melody, max_harmony) else {
        return;
    };

    let gap = min_melody - max_harmony;
    if gap <= OCTAVE {
        return;
    }

    let shift = (gap - 1) / OCTAVE * OCTAVE;
    debug!(gap, shift, "raising harmony register toward melody");
    for chord in chords.iter_mut() {
        for note in chord.notes.iter_mut().filter(|n| !n.melody) {
            note.pitch += shift;
        }
    }
}
