//! Internal consistency checks for a [`Board`], mirroring the assertions a
//! debug build would want after every make/unmake. Call sites choose how a
//! violation is handled via [`InvariantMode`]: `Strict` aborts with a
//! diagnostic (used in debug builds and tests), `Lenient` reports and
//! returns `false` so a caller can refuse a boundary-constructed position
//! instead of crashing the process.

use super::state::Board;
use super::types::{Bitboard, Color, Piece, PieceType};

#[cfg(feature = "logging")]
use log::warn;

/// How [`pos_ok`] reacts to a detected violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantMode {
    /// Abort the process with a diagnostic. Appropriate once a position is
    /// assumed to already be internally consistent (e.g. after make/unmake).
    Strict,
    /// Report and return `false`. Appropriate at a boundary (e.g. after
    /// parsing untrusted input) where the caller can reject the position.
    Lenient,
}

/// Checks every universal invariant a reachable position must satisfy and
/// reacts according to `mode`. Returns `true` iff every invariant held.
#[must_use]
pub fn pos_ok(board: &Board, mode: InvariantMode) -> bool {
    for check in CHECKS {
        if let Err(reason) = check(board) {
            return report(mode, reason);
        }
    }
    true
}

fn report(mode: InvariantMode, reason: &'static str) -> bool {
    match mode {
        InvariantMode::Strict => {
            panic!("position invariant violated at {}:{}: {reason}", file!(), line!());
        }
        InvariantMode::Lenient => {
            #[cfg(feature = "logging")]
            warn!("position invariant violated: {reason}");
            #[cfg(not(feature = "logging"))]
            let _ = reason;
            false
        }
    }
}

type Check = fn(&Board) -> Result<(), &'static str>;

const CHECKS: &[Check] = &[
    check_mailbox_bitboard_consistency,
    check_color_union,
    check_king_bitboard_matches_cache,
    check_no_pawns_on_back_rank,
    check_opponent_not_in_check,
    check_hash_matches_scratch,
    check_kings_not_adjacent,
];

/// Invariant 1: `board[s] == EMPTY` iff `s` is in no `bb[c][t]`; otherwise
/// exactly one `(c, t)` pair claims `s`.
fn check_mailbox_bitboard_consistency(board: &Board) -> Result<(), &'static str> {
    for idx in 0..64 {
        let sq = super::types::Square::from_index(idx);
        let piece = board.piece_at(sq);
        let mut claims = 0;
        for &color in &[Color::White, Color::Black] {
            for &pt in super::types::PIECE_TYPES {
                if board.pieces_of(color, pt).contains(sq) {
                    claims += 1;
                    if piece != Piece::new(color, pt) {
                        return Err("mailbox/bitboard disagree on piece identity");
                    }
                }
            }
        }
        if piece.is_empty() && claims != 0 {
            return Err("empty mailbox square claimed by a bitboard");
        }
        if !piece.is_empty() && claims != 1 {
            return Err("occupied mailbox square claimed by zero or multiple bitboards");
        }
    }
    Ok(())
}

/// Invariant 2: `bb[c][0]` is the union of `bb[c][1..=6]`.
fn check_color_union(board: &Board) -> Result<(), &'static str> {
    for &color in &[Color::White, Color::Black] {
        let mut union = Bitboard::EMPTY;
        for &pt in super::types::PIECE_TYPES {
            union = union.or(board.pieces_of(color, pt));
        }
        if union != board.occupied_by(color) {
            return Err("bb[c][0] is not the union of bb[c][1..=6]");
        }
    }
    Ok(())
}

/// Invariant 3: `king[c] == lsb(bb[c][KING])` and exactly one king per side.
fn check_king_bitboard_matches_cache(board: &Board) -> Result<(), &'static str> {
    for &color in &[Color::White, Color::Black] {
        let kings = board.pieces_of(color, PieceType::King);
        if kings.popcount() != 1 {
            return Err("a side does not have exactly one king");
        }
        let lsb = kings.iter().next().expect("popcount checked above");
        if lsb != board.king_square(color) {
            return Err("cached king square does not match the king bitboard");
        }
    }
    Ok(())
}

/// Invariant 4: no pawn sits on rank 1 or rank 8.
fn check_no_pawns_on_back_rank(board: &Board) -> Result<(), &'static str> {
    for &color in &[Color::White, Color::Black] {
        let pawns = board.pieces_of(color, PieceType::Pawn);
        if pawns.intersects(Bitboard::RANK_1) || pawns.intersects(Bitboard::RANK_8) {
            return Err("a pawn sits on rank 1 or rank 8");
        }
    }
    Ok(())
}

/// Invariant 5: the side not to move is not in check (it would have been
/// the mover's responsibility to not leave their own king attacked).
fn check_opponent_not_in_check(board: &Board) -> Result<(), &'static str> {
    let them = board.side_to_move().opponent();
    if super::analysis::is_square_attacked(board, board.king_square(them), board.side_to_move()) {
        return Err("the side not to move is in check");
    }
    Ok(())
}

/// Invariant 6: the incrementally maintained hash matches a from-scratch
/// recomputation.
fn check_hash_matches_scratch(board: &Board) -> Result<(), &'static str> {
    if board.hash() != board.calculate_hash_from_scratch() {
        return Err("incremental hash does not match a from-scratch recomputation");
    }
    Ok(())
}

/// Invariant 7: the two kings are never on adjacent squares.
fn check_kings_not_adjacent(board: &Board) -> Result<(), &'static str> {
    let white_king = board.king_square(Color::White);
    let black_king = board.king_square(Color::Black);
    if super::geometry::king_attacks(white_king).contains(black_king) {
        return Err("kings are adjacent");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen;

    #[test]
    fn test_startpos_is_ok() {
        let board = Board::new();
        assert!(pos_ok(&board, InvariantMode::Strict));
    }

    #[test]
    fn test_kiwipete_is_ok() {
        let board =
            fen::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        assert!(pos_ok(&board, InvariantMode::Strict));
    }

    #[test]
    fn test_lenient_mode_reports_false_without_panicking() {
        let mut board = Board::new();
        // Corrupt the incremental hash directly to trigger invariant 6.
        board.hash = board.hash().wrapping_add(1);
        assert!(!pos_ok(&board, InvariantMode::Lenient));
    }

    #[test]
    #[should_panic(expected = "position invariant violated")]
    fn test_strict_mode_panics() {
        let mut board = Board::new();
        board.hash = board.hash().wrapping_add(1);
        pos_ok(&board, InvariantMode::Strict);
    }
}
