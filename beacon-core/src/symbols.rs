//! International Morse symbol table (A-Z, 0-9)

use crate::types::Symbol::{self, Dash, Dot};

/// Dot/dash encoding of one character; empty for characters outside the table
pub type Pattern = &'static [Symbol];

const LETTERS: [Pattern; 26] = [
    &[Dot, Dash],             // A
    &[Dash, Dot, Dot, Dot],   // B
    &[Dash, Dot, Dash, Dot],  // C
    &[Dash, Dot, Dot],        // D
    &[Dot],                   // E
    &[Dot, Dot, Dash, Dot],   // F
    &[Dash, Dash, Dot],       // G
    &[Dot, Dot, Dot, Dot],    // H
    &[Dot, Dot],              // I
    &[Dot, Dash, Dash, Dash], // J
    &[Dash, Dot, Dash],       // K
    &[Dot, Dash, Dot, Dot],   // L
    &[Dash, Dash],            // M
    &[Dash, Dot],             // N
    &[Dash, Dash, Dash],      // O
    &[Dot, Dash, Dash, Dot],  // P
    &[Dash, Dash, Dot, Dash], // Q
    &[Dot, Dash, Dot],        // R
    &[Dot, Dot, Dot],         // S
    &[Dash],                  // T
    &[Dot, Dot, Dash],        // U
    &[Dot, Dot, Dot, Dash],   // V
    &[Dot, Dash, Dash],       // W
    &[Dash, Dot, Dot, Dash],  // X
    &[Dash, Dot, Dash, Dash], // Y
    &[Dash, Dash, Dot, Dot],  // Z
];

const DIGITS: [Pattern; 10] = [
    &[Dash, Dash, Dash, Dash, Dash], // 0
    &[Dot, Dash, Dash, Dash, Dash],  // 1
    &[Dot, Dot, Dash, Dash, Dash],   // 2
    &[Dot, Dot, Dot, Dash, Dash],    // 3
    &[Dot, Dot, Dot, Dot, Dash],     // 4
    &[Dot, Dot, Dot, Dot, Dot],      // 5
    &[Dash, Dot, Dot, Dot, Dot],     // 6
    &[Dash, Dash, Dot, Dot, Dot],    // 7
    &[Dash, Dash, Dash, Dot, Dot],   // 8
    &[Dash, Dash, Dash, Dash, Dot],  // 9
];

/// Look up the pattern for `c`, case-insensitively
///
/// Total over `char`: anything outside A-Z/0-9 yields an empty pattern and
/// is skipped by the encoder.
pub fn lookup(c: char) -> Pattern {
    match c.to_ascii_uppercase() {
        letter @ 'A'..='Z' => LETTERS[(letter as u8 - b'A') as usize],
        digit @ '0'..='9' => DIGITS[(digit as u8 - b'0') as usize],
        _ => &[],
    }
}

/// Returns true if `c` has a pattern in the table
pub fn is_encodable(c: char) -> bool {
    !lookup(c).is_empty()
}
