//! Semitone-to-name rendering for logs and display output.
//!
//! This is a one-way convenience; the authoritative name→semitone mapping
//! (including spelling policy) is owned by the presentation layer.

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Render a semitone number as a concert pitch name, e.g. 60 → "C4".
///
/// Pitches outside 0–127 still render; octave arithmetic is plain euclidean
/// division, so -1 is "B-2" and 128 is "G#9".
pub fn pitch_name(pitch: i32) -> String {
    let pc = pitch.rem_euclid(12) as usize;
    let octave = pitch.div_euclid(12) - 1;
    format!("{}{}", NOTE_NAMES_SHARP[pc], octave)
}
