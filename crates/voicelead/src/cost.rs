//! Cost model over candidate voicings.
//!
//! All terms are additive integers with no normalization. The weights are
//! deliberately separated by orders of magnitude so structural violations
//! always dominate movement: a crossing outweighs a parallel, a parallel
//! outweighs wide spacing, and smoothness only decides between assignments
//! that are structurally equivalent.

use crate::note::Chord;

/// Per violation: a lower voice index sounding below a higher one.
pub(crate) const CROSSING_PENALTY: u64 = 1000;
/// Per violation: a parallel perfect fifth or octave between two voices.
pub(crate) const PARALLEL_PENALTY: u64 = 500;
/// Per violation: adjacent voices spaced more than an octave apart.
pub(crate) const SPACING_PENALTY: u64 = 100;
/// Per semitone of voice movement between chords.
pub(crate) const MOVEMENT_WEIGHT: u64 = 2;

/// Widest allowed gap between adjacent voices, in semitones.
pub(crate) const MAX_VOICE_SPACING: i32 = 12;

/// Score a candidate voicing against its predecessor. Lower is better.
pub(crate) fn transition_cost(prev: Option<&Chord>, candidate: &Chord) -> u64 {
    let mut cost = crossing_penalty(candidate) + spacing_penalty(candidate);
    if let Some(prev) = prev {
        cost += parallel_pairs(prev, candidate) as u64 * PARALLEL_PENALTY;
        cost += raw_movement(prev, candidate) * MOVEMENT_WEIGHT;
    }
    cost
}

/// Voiced notes of a chord as (voice, pitch), ascending by voice index.
fn by_voice(chord: &Chord) -> Vec<(usize, i32)> {
    let mut notes: Vec<(usize, i32)> = chord
        .notes
        .iter()
        .filter_map(|n| n.voice.map(|v| (v, n.pitch)))
        .collect();
    notes.sort_unstable_by_key(|&(v, _)| v);
    notes
}

/// Voices present in both chords as (voice, prev pitch, candidate pitch),
/// ascending by voice index.
pub(crate) fn paired_voices(prev: &Chord, candidate: &Chord) -> Vec<(usize, i32, i32)> {
    let mut pairs: Vec<(usize, i32, i32)> = candidate
        .notes
        .iter()
        .filter_map(|n| {
            let voice = n.voice?;
            let before = prev.pitch_of(voice)?;
            Some((voice, before, n.pitch))
        })
        .collect();
    pairs.sort_unstable_by_key(|&(v, _, _)| v);
    pairs
}

fn crossing_penalty(chord: &Chord) -> u64 {
    let notes = by_voice(chord);
    let mut violations = 0u64;
    for i in 0..notes.len() {
        for j in (i + 1)..notes.len() {
            // notes[i] has the lower voice index, so it must not sound lower
            if notes[i].1 < notes[j].1 {
                violations += 1;
            }
        }
    }
    violations * CROSSING_PENALTY
}

fn spacing_penalty(chord: &Chord) -> u64 {
    let notes = by_voice(chord);
    let violations = notes
        .windows(2)
        .filter(|w| (w[0].1 - w[1].1).abs() > MAX_VOICE_SPACING)
        .count();
    violations as u64 * SPACING_PENALTY
}

/// 7 for a perfect fifth, 0 for an octave (unison excluded), else None.
fn interval_class(interval: i32) -> Option<i32> {
    match interval.abs() % 12 {
        7 => Some(7),
        0 if interval != 0 => Some(0),
        _ => None,
    }
}

/// Count voice pairs holding the same perfect interval class across both
/// chords — the classical parallel fifth/octave prohibition.
pub(crate) fn parallel_pairs(prev: &Chord, candidate: &Chord) -> usize {
    let pairs = paired_voices(prev, candidate);
    let mut count = 0;
    for i in 0..pairs.len() {
        for j in (i + 1)..pairs.len() {
            let before = interval_class(pairs[i].1 - pairs[j].1);
            let after = interval_class(pairs[i].2 - pairs[j].2);
            if before.is_some() && before == after {
                count += 1;
            }
        }
    }
    count
}

/// Total absolute semitone displacement of voices present in both chords.
pub(crate) fn raw_movement(prev: &Chord, candidate: &Chord) -> u64 {
    paired_voices(prev, candidate)
        .iter()
        .map(|&(_, before, after)| (after - before).unsigned_abs() as u64)
        .sum()
}
