//! Pseudo-legal move generation.
//!
//! Generation order is fixed (king, sliders, knights, pawn pushes, pawn
//! captures, en-passant, castling) so that two move lists can be compared
//! for equality after sorting by origin/destination square (see the perft
//! integration tests), not because the order itself is part of the public
//! contract.

use super::geometry;
use super::state::Board;
use super::types::{Bitboard, Color, Move, MoveList, PieceType, Square};

#[cfg(feature = "logging")]
use log::trace;

/// Appends every pseudo-legal move in `board` to `moves`. Pseudo-legal
/// means the move obeys piece movement rules and never lands on a
/// friendly piece, but may leave the mover's own king in check; that is
/// filtered out by [`super::legality`].
pub(crate) fn generate_pseudo_legal(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let own = board.occupied_by(us);
    let occ = board.occupancy();

    generate_king_moves(board, us, own, moves);
    if board.checkers().popcount() >= 2 {
        // Double check: only the king can move.
        #[cfg(feature = "logging")]
        trace!("double check, skipping non-king pseudo-moves");
        return;
    }

    generate_slider_moves(board, us, PieceType::Bishop, own, occ, moves);
    generate_slider_moves(board, us, PieceType::Rook, own, occ, moves);
    generate_slider_moves(board, us, PieceType::Queen, own, occ, moves);
    generate_knight_moves(board, us, own, moves);
    generate_pawn_pushes(board, us, occ, moves);
    generate_pawn_captures(board, us, moves);
    generate_en_passant(board, us, moves);
    generate_castling(board, us, occ, moves);
}

fn generate_king_moves(board: &Board, us: Color, own: Bitboard, moves: &mut MoveList) {
    let from = board.king_square(us);
    let targets = geometry::king_attacks(from).and(own.not());
    let enemy = board.occupied_by(us.opponent());
    let quiet = Bitboard(targets.0 & !enemy.0);
    let captures = targets.and(enemy);
    for to in quiet.iter() {
        moves.push(Move::new(from, to));
    }
    for to in captures.iter() {
        moves.push(Move::new(from, to));
    }
}

fn generate_slider_moves(
    board: &Board,
    us: Color,
    pt: PieceType,
    own: Bitboard,
    occ: Bitboard,
    moves: &mut MoveList,
) {
    let enemy = board.occupied_by(us.opponent());
    let mut pieces = board.pieces_of(us, pt);
    while !pieces.is_empty() {
        let from = super::types::pop_lsb(&mut pieces);
        let attacks = match pt {
            PieceType::Bishop => geometry::bishop_attacks(from, occ),
            PieceType::Rook => geometry::rook_attacks(from, occ),
            PieceType::Queen => geometry::queen_attacks(from, occ),
            _ => unreachable!("generate_slider_moves only called with sliding piece types"),
        };
        let targets = attacks.and(own.not());
        for to in Bitboard(targets.0 & !enemy.0).iter() {
            moves.push(Move::new(from, to));
        }
        for to in targets.and(enemy).iter() {
            moves.push(Move::new(from, to));
        }
    }
}

fn generate_knight_moves(board: &Board, us: Color, own: Bitboard, moves: &mut MoveList) {
    let enemy = board.occupied_by(us.opponent());
    let mut knights = board.pieces_of(us, PieceType::Knight);
    while !knights.is_empty() {
        let from = super::types::pop_lsb(&mut knights);
        let targets = geometry::knight_attacks(from).and(own.not());
        for to in Bitboard(targets.0 & !enemy.0).iter() {
            moves.push(Move::new(from, to));
        }
        for to in targets.and(enemy).iter() {
            moves.push(Move::new(from, to));
        }
    }
}

const PROMOTION_ORDER: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square, is_white: bool) {
    let promo_rank = if is_white { 7 } else { 0 };
    if to.rank() == promo_rank {
        for &pt in &PROMOTION_ORDER {
            moves.push(Move::new_promotion(from, to, pt));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

fn generate_pawn_pushes(board: &Board, us: Color, occ: Bitboard, moves: &mut MoveList) {
    let is_white = us == Color::White;
    let double_push_start_rank = if is_white { 1 } else { 6 };
    let mut pawns = board.pieces_of(us, PieceType::Pawn);
    while !pawns.is_empty() {
        let from = super::types::pop_lsb(&mut pawns);
        let Some(single) = from.forward(is_white) else {
            continue;
        };
        if occ.contains(single) {
            continue;
        }
        push_pawn_move(moves, from, single, is_white);

        if from.rank() == double_push_start_rank {
            if let Some(double) = single.forward(is_white) {
                if !occ.contains(double) {
                    moves.push(Move::new(from, double));
                }
            }
        }
    }
}

fn generate_pawn_captures(board: &Board, us: Color, moves: &mut MoveList) {
    let is_white = us == Color::White;
    let enemy = board.occupied_by(us.opponent());
    let mut pawns = board.pieces_of(us, PieceType::Pawn);
    while !pawns.is_empty() {
        let from = super::types::pop_lsb(&mut pawns);
        let rank = from.rank();
        let file = from.file();
        let target_rank = if is_white { rank + 1 } else { rank.wrapping_sub(1) };
        if target_rank >= 8 {
            continue;
        }
        // Left capture (lower file) first, then right.
        if file > 0 {
            let to = Square::new(target_rank, file - 1);
            if enemy.contains(to) {
                push_pawn_move(moves, from, to, is_white);
            }
        }
        if file < 7 {
            let to = Square::new(target_rank, file + 1);
            if enemy.contains(to) {
                push_pawn_move(moves, from, to, is_white);
            }
        }
    }
}

fn generate_en_passant(board: &Board, us: Color, moves: &mut MoveList) {
    let ep = board.en_passant_target();
    if ep.is_none() {
        return;
    }
    let mut attackers = geometry::pawn_attacks(us.opponent(), ep).and(board.pieces_of(us, PieceType::Pawn));
    while !attackers.is_empty() {
        let from = super::types::pop_lsb(&mut attackers);
        moves.push(Move::new_en_passant(from, ep));
    }
}

fn generate_castling(board: &Board, us: Color, occ: Bitboard, moves: &mut MoveList) {
    if board.is_in_check() {
        return;
    }
    let rank = if us == Color::White { 0 } else { 7 };
    let king_sq = board.king_square(us);
    let them = us.opponent();

    if board.castling_rights().has(us, true) {
        let f = Square::new(rank, 5);
        let g = Square::new(rank, 6);
        if !occ.contains(f) && !occ.contains(g) && !super::analysis::is_square_attacked(board, f, them) {
            moves.push(Move::new_castle(king_sq, g));
        }
    }
    if board.castling_rights().has(us, false) {
        let b = Square::new(rank, 1);
        let c = Square::new(rank, 2);
        let d = Square::new(rank, 3);
        if !occ.contains(b)
            && !occ.contains(c)
            && !occ.contains(d)
            && !super::analysis::is_square_attacked(board, d, them)
        {
            moves.push(Move::new_castle(king_sq, c));
        }
    }
}
