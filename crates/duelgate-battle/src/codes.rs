//! Lobby code generation.
//!
//! Allocation itself is not a separate step any more: `create` draws a
//! candidate and attempts the conditional insert, redrawing on
//! collision. This module only supplies the candidates, behind a trait
//! so tests can script exact collision sequences.

use duelgate_protocol::{RoomCode, CODE_ALPHABET, CODE_LEN};
use rand::Rng;

/// How many candidate codes a create will try before giving up with
/// `GenerationExhausted`.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Supplies candidate lobby codes.
pub trait CodeSource: Send + Sync {
    fn next_code(&self) -> RoomCode;
}

/// The production source: uniform random draws from the code alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodes;

impl CodeSource for RandomCodes {
    fn next_code(&self) -> RoomCode {
        random_code(&mut rand::rng())
    }
}

/// Draws [`CODE_LEN`] letters from [`CODE_ALPHABET`].
pub fn random_code<R: Rng + ?Sized>(rng: &mut R) -> RoomCode {
    let letters: String = (0..CODE_LEN)
        .map(|_| {
            CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char
        })
        .collect();
    // Invariant: the alphabet contains only uppercase ASCII letters.
    RoomCode::parse(&letters).expect("alphabet letters form a valid code")
}
