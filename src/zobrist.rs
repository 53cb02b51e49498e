//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes for transposition
//! tables and repetition detection.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{CastlingRights, Piece, Square};

/// Index into [`ZobristKeys::en_passant`] for `sq`. Bit 6 of the square
/// index (set only by the `Square::NONE` sentinel, value 64) folds down to
/// slot 8; real en-passant targets fall into slots 0-7 by file.
#[inline]
pub(crate) fn ep_zobrist_index(sq: Square) -> usize {
    let idx = sq.index();
    ((idx & 64) >> 3) | (idx & 7)
}

pub(crate) struct ZobristKeys {
    /// Keyed by the packed `Piece` byte (`color << 3 | piece_type`, 0-15)
    /// and square (0-63). Index 0 (empty) is never read.
    pub(crate) pieces: [[u64; 64]; 16],
    pub(crate) turn: u64,
    /// Keyed by the whole castling-rights byte (0-15), not per-bit: a
    /// change to any right XORs out the old byte's key and XORs in the new
    /// one.
    pub(crate) castling: [u64; 16],
    /// Keyed by [`ep_zobrist_index`]; slot 8 is "no en-passant target".
    pub(crate) en_passant: [u64; 9],
}

impl ZobristKeys {
    fn new() -> Self {
        // Fixed seed: hashes (and therefore perft/TT behavior) are
        // reproducible across runs and across machines.
        let mut rng = StdRng::seed_from_u64(1234567890_u64);

        let mut pieces = [[0u64; 64]; 16];
        for piece in &mut pieces {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }

        let turn = rng.gen();

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = rng.gen();
        }

        let mut en_passant = [0u64; 9];
        // Slot 8 ("no en-passant target") stays zero so that XORing it in
        // when there's no ep square is a no-op.
        for key in en_passant.iter_mut().take(8) {
            *key = rng.gen();
        }

        ZobristKeys {
            pieces,
            turn,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.as_u8() as usize][sq.index()]
    }

    #[inline]
    pub(crate) fn castling_rights(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.as_u8() as usize]
    }

    #[inline]
    pub(crate) fn en_passant_target(&self, sq: Square) -> u64 {
        self.en_passant[ep_zobrist_index(sq)]
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ep_index_none_is_slot_eight() {
        assert_eq!(ep_zobrist_index(Square::NONE), 8);
    }

    #[test]
    fn test_ep_index_by_file() {
        assert_eq!(ep_zobrist_index(Square::new(2, 0)), 0);
        assert_eq!(ep_zobrist_index(Square::new(5, 7)), 7);
    }

    #[test]
    fn test_ep_absent_slot_is_zero() {
        assert_eq!(ZOBRIST.en_passant[8], 0);
        assert_eq!(ZOBRIST.en_passant_target(Square::NONE), 0);
    }

    #[test]
    fn test_castling_keys_distinct_for_distinct_rights() {
        let a = ZOBRIST.castling_rights(CastlingRights::none());
        let b = ZOBRIST.castling_rights(CastlingRights::all());
        assert_ne!(a, b);
    }
}
