//! Voice index assignment: the opening chord by rule, every later chord by
//! exhaustive search over the cost model.

use tracing::{debug, trace};

use crate::cost::transition_cost;
use crate::note::Chord;
use crate::{Error, Result};

/// Number of voices for the whole piece: the widest chord's cardinality.
pub(crate) fn voice_count(chords: &[Chord]) -> usize {
    chords.iter().map(|c| c.notes.len()).max().unwrap_or(0)
}

/// Indices of unassigned notes, pitch-descending (note index as tiebreak).
///
/// This ordering is the canonical one for the permutation search, so
/// tie-breaking between equal-cost assignments is reproducible.
fn unfixed_desc(chord: &Chord) -> Vec<usize> {
    let mut unfixed: Vec<usize> = (0..chord.notes.len())
        .filter(|&i| chord.notes[i].voice.is_none())
        .collect();
    unfixed.sort_by(|&a, &b| {
        chord.notes[b]
            .pitch
            .cmp(&chord.notes[a].pitch)
            .then(a.cmp(&b))
    });
    unfixed
}

/// Voice indices in [0, n_voices) not yet taken in this chord, ascending.
fn free_voices(chord: &Chord, n_voices: usize) -> Vec<usize> {
    let used: Vec<usize> = chord.notes.iter().filter_map(|n| n.voice).collect();
    (0..n_voices).filter(|v| !used.contains(v)).collect()
}

/// Voice the opening chord.
///
/// The melody note keeps voice 0. The remaining notes take free voice
/// indices in pitch-descending order, except the lowest-pitched one, which
/// is forced onto the bass rail (voice `n_voices - 1`) even when that skips
/// middle voices. This pins the top-to-bottom voice topology from the start.
pub(crate) fn assign_first_chord(chord: &mut Chord, n_voices: usize) {
    let unfixed = unfixed_desc(chord);
    let Some((&bass_idx, upper)) = unfixed.split_last() else {
        return;
    };

    chord.notes[bass_idx].voice = Some(n_voices - 1);
    let free = free_voices(chord, n_voices);
    for (&note_idx, voice) in upper.iter().zip(free) {
        chord.notes[note_idx].voice = Some(voice);
    }
}

/// Voice one chord given its already-voiced predecessor.
///
/// Notes carrying a voice (melody) are fixed. Every permutation of the free
/// voice list over the unassigned notes is scored with the cost model; the
/// cheapest assignment wins, first seen winning ties. Enumeration is
/// lexicographic over the ascending free-voice list.
pub(crate) fn assign_chord(
    prev: &Chord,
    chord: &mut Chord,
    n_voices: usize,
    limit: usize,
) -> Result<()> {
    let unfixed = unfixed_desc(chord);
    if unfixed.is_empty() {
        return Ok(());
    }
    if unfixed.len() > limit {
        return Err(Error::SearchSpaceExceeded {
            onset: chord.onset,
            unfixed: unfixed.len(),
            limit,
        });
    }

    let free = free_voices(chord, n_voices);
    let mut best: Option<(u64, Vec<usize>)> = None;

    for perm in permutations(&free, unfixed.len()) {
        let mut candidate = chord.clone();
        for (&note_idx, &voice) in unfixed.iter().zip(&perm) {
            candidate.notes[note_idx].voice = Some(voice);
        }
        let cost = transition_cost(Some(prev), &candidate);
        trace!(onset = chord.onset, ?perm, cost, "candidate voicing");

        if best.as_ref().map_or(true, |(b, _)| cost < *b) {
            best = Some((cost, perm));
        }
    }

    if let Some((cost, perm)) = best {
        for (&note_idx, &voice) in unfixed.iter().zip(&perm) {
            chord.notes[note_idx].voice = Some(voice);
        }
        debug!(onset = chord.onset, cost, "committed voicing");
    }
    Ok(())
}

/// All length-`len` orderings of `items`, lexicographic over the (already
/// ascending) input.
fn permutations(items: &[usize], len: usize) -> Vec<Vec<usize>> {
    if len == 0 {
        return vec![Vec::new()];
    }
    let mut result = Vec::new();
    for (i, &item) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut perm in permutations(&rest, len - 1) {
            perm.insert(0, item);
            result.push(perm);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::ChordNote;
    use pretty_assertions::assert_eq;

    fn chord(onset: u64, notes: &[(i32, Option<usize>, bool)]) -> Chord {
        Chord {
            onset,
            duration: 8,
            notes: notes
                .iter()
                .map(|&(pitch, voice, melody)| ChordNote {
                    pitch,
                    duration: 8,
                    voice,
                    melody,
                })
                .collect(),
        }
    }

    fn voices(chord: &Chord) -> Vec<(i32, usize)> {
        let mut v: Vec<(i32, usize)> = chord
            .notes
            .iter()
            .map(|n| (n.pitch, n.voice.unwrap()))
            .collect();
        v.sort_by_key(|&(_, voice)| voice);
        v
    }

    #[test]
    fn voice_count_is_widest_chord() {
        let chords = vec![
            chord(0, &[(72, None, false)]),
            chord(8, &[(72, None, false), (67, None, false), (60, None, false)]),
        ];
        assert_eq!(voice_count(&chords), 3);
        assert_eq!(voice_count(&[]), 0);
    }

    #[test]
    fn first_chord_descending_with_forced_bass() {
        let mut c = chord(
            0,
            &[
                (72, Some(0), true),
                (67, None, false),
                (64, None, false),
                (60, None, false),
            ],
        );
        assign_first_chord(&mut c, 4);
        assert_eq!(voices(&c), vec![(72, 0), (67, 1), (64, 2), (60, 3)]);
    }

    #[test]
    fn first_chord_bass_skips_middle_voices() {
        // Only melody + one harmony note, but four voices for the piece:
        // the harmony note lands on the bass rail, voices 1-2 stay empty.
        let mut c = chord(0, &[(72, Some(0), true), (55, None, false)]);
        assign_first_chord(&mut c, 4);
        assert_eq!(voices(&c), vec![(72, 0), (55, 3)]);
    }

    #[test]
    fn first_chord_without_melody_starts_at_voice_zero() {
        let mut c = chord(0, &[(67, None, false), (64, None, false), (60, None, false)]);
        assign_first_chord(&mut c, 3);
        assert_eq!(voices(&c), vec![(67, 0), (64, 1), (60, 2)]);
    }

    #[test]
    fn step_picks_minimal_movement() {
        let prev = chord(
            0,
            &[
                (72, Some(0), true),
                (67, Some(1), false),
                (64, Some(2), false),
                (60, Some(3), false),
            ],
        );
        let mut next = chord(
            8,
            &[
                (74, Some(0), true),
                (69, None, false),
                (65, None, false),
                (57, None, false),
            ],
        );
        assign_chord(&prev, &mut next, 4, 8).unwrap();
        assert_eq!(voices(&next), vec![(74, 0), (69, 1), (65, 2), (57, 3)]);
    }

    #[test]
    fn fixed_notes_keep_their_voices() {
        let prev = chord(0, &[(72, Some(0), true), (60, Some(3), false)]);
        let mut next = chord(8, &[(71, Some(0), true), (55, None, false)]);
        assign_chord(&prev, &mut next, 4, 8).unwrap();
        // Melody stays on voice 0; the free note takes the cheapest free
        // voice. Voices 1 and 2 are absent from the previous chord, so they
        // carry no movement cost and the first of them wins the tie.
        assert_eq!(next.notes[0].voice, Some(0));
        assert_eq!(next.notes[1].voice, Some(1));
    }

    #[test]
    fn too_many_unfixed_notes_is_an_error() {
        let prev = chord(0, &[(72, Some(0), true)]);
        let mut next = chord(8, &[(60, None, false), (62, None, false), (64, None, false)]);
        let err = assign_chord(&prev, &mut next, 4, 2).unwrap_err();
        assert!(matches!(
            err,
            Error::SearchSpaceExceeded {
                onset: 8,
                unfixed: 3,
                limit: 2
            }
        ));
    }

    #[test]
    fn permutations_are_lexicographic() {
        assert_eq!(
            permutations(&[1, 2, 3], 3),
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );
        assert_eq!(permutations(&[1, 2, 3], 2).len(), 6);
        assert_eq!(permutations(&[1, 2], 0), vec![Vec::<usize>::new()]);
    }
}
