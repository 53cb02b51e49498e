//! Attack detection: who attacks a square, and the checkers/pinners/blockers
//! sets used by legality filtering.

use super::geometry;
use super::state::Board;
use super::types::{Bitboard, Color, PieceType, Square};

/// All squares occupied by pieces of `attacker` that attack `sq`, given the
/// occupancy `occ` (passed explicitly so callers can probe hypothetical
/// occupancies, e.g. "if this piece weren't there").
#[must_use]
pub(crate) fn attackers_to(board: &Board, occ: Bitboard, sq: Square, attacker: Color) -> Bitboard {
    let mut attackers = Bitboard::EMPTY;

    // A pawn of `attacker` attacks `sq` from the squares that a pawn of the
    // opposite color standing on `sq` would attack.
    attackers = attackers.or(
        geometry::pawn_attacks(attacker.opponent(), sq).and(board.pieces_of(attacker, PieceType::Pawn)),
    );
    attackers = attackers.or(geometry::knight_attacks(sq).and(board.pieces_of(attacker, PieceType::Knight)));
    attackers = attackers.or(geometry::king_attacks(sq).and(board.pieces_of(attacker, PieceType::King)));

    let bishops_queens = board
        .pieces_of(attacker, PieceType::Bishop)
        .or(board.pieces_of(attacker, PieceType::Queen));
    attackers = attackers.or(geometry::bishop_attacks(sq, occ).and(bishops_queens));

    let rooks_queens = board
        .pieces_of(attacker, PieceType::Rook)
        .or(board.pieces_of(attacker, PieceType::Queen));
    attackers = attackers.or(geometry::rook_attacks(sq, occ).and(rooks_queens));

    attackers
}

/// True if any piece of `attacker` attacks `sq` on the current occupancy.
#[must_use]
pub(crate) fn is_square_attacked(board: &Board, sq: Square, attacker: Color) -> bool {
    !attackers_to(board, board.occupancy(), sq, attacker).is_empty()
}

/// Computes the checkers, pinners and blockers bitboards for the side to
/// move's king, via two passes (bishop-type sliders, then rook-type
/// sliders): for each pass, find the enemy sliders that attack the king
/// through at most one of the side to move's own pieces. That piece is a
/// blocker; the slider behind it is a pinner.
#[must_use]
pub(crate) fn compute_check_state(board: &Board) -> (Bitboard, Bitboard, Bitboard) {
    let us = board.side_to_move();
    let them = us.opponent();
    let king = board.king_square(us);
    let occ = board.occupancy();

    let mut checkers = attackers_to(board, occ, king, them);
    let mut pinners = Bitboard::EMPTY;
    let mut blockers = Bitboard::EMPTY;

    for bishop_like in [true, false] {
        let enemy_sliders = if bishop_like {
            board
                .pieces_of(them, PieceType::Bishop)
                .or(board.pieces_of(them, PieceType::Queen))
        } else {
            board
                .pieces_of(them, PieceType::Rook)
                .or(board.pieces_of(them, PieceType::Queen))
        };

        let ray_from_king = |occupancy: Bitboard| -> Bitboard {
            if bishop_like {
                geometry::bishop_attacks(king, occupancy)
            } else {
                geometry::rook_attacks(king, occupancy)
            }
        };

        let targets = ray_from_king(occ).and(occ);
        let direct_checkers = targets.and(enemy_sliders);
        let maybe_blockers = Bitboard(targets.0 & !direct_checkers.0);

        let occ_without_blockers = Bitboard(occ.0 ^ maybe_blockers.0);
        let targets2 = Bitboard(ray_from_king(occ_without_blockers).0 ^ direct_checkers.0);
        let pinners_this_pass = targets2.and(enemy_sliders);
        pinners = pinners.or(pinners_this_pass);

        let mut pbb = pinners_this_pass;
        while !pbb.is_empty() {
            let p = super::types::pop_lsb(&mut pbb);
            blockers = blockers.or(geometry::between(p, king).and(maybe_blockers));
        }
    }

    (checkers, pinners, blockers)
}
