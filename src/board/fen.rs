//! FEN boundary: parses the six FEN fields into a sanitized [`Board`] and
//! serializes a board back to text. This module is a collaborator, not part
//! of the core: the core never parses text, and `Board` never depends on
//! this module's internals.
//!
//! Sanitization (per the external-interface contract): castling rights
//! inconsistent with king/rook placement, and en-passant targets that no
//! friendly pawn could have produced, are silently cleared rather than
//! rejected. Genuinely irreconcilable positions (wrong king count, a pawn on
//! the back rank, the side not to move already in check) are rejected with
//! [`PositionError`].

use std::fmt;

use super::analysis::is_square_attacked;
use super::error::{FenError, PositionError};
use super::geometry;
use super::state::Board;
use super::types::{CastlingRights, Color, Piece, PieceType, Square};

#[cfg(feature = "logging")]
use log::warn;

/// Either half of the FEN boundary's failure modes: malformed FEN text, or
/// well-formed text describing a position the core cannot represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FromFenError {
    Fen(FenError),
    Position(PositionError),
}

impl fmt::Display for FromFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FromFenError::Fen(e) => write!(f, "{e}"),
            FromFenError::Position(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FromFenError {}

impl From<FenError> for FromFenError {
    fn from(e: FenError) -> Self {
        FromFenError::Fen(e)
    }
}

impl From<PositionError> for FromFenError {
    fn from(e: PositionError) -> Self {
        FromFenError::Position(e)
    }
}

/// Parses `fen` into a sanitized [`Board`].
pub fn from_fen(fen: &str) -> Result<Board, FromFenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(FenError::TooFewParts { found: parts.len() }.into());
    }

    let mut board = Board::empty();
    parse_piece_placement(&mut board, parts[0])?;

    board.side_to_move = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(FenError::InvalidSideToMove { found: other.to_string() }.into())
        }
    };

    let mut castling = parse_castling(parts[2])?;
    let mut en_passant = parse_en_passant(parts[3])?;

    let halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
    let fullmove = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

    check_king_counts(&board)?;
    check_no_pawns_on_back_rank(&board)?;

    sanitize_castling_rights(&board, &mut castling);
    sanitize_en_passant(&board, &mut en_passant);

    let board = board.finish_construction(castling, en_passant, halfmove_clock, fullmove);

    check_opponent_not_in_check(&board)?;

    Ok(board)
}

fn parse_piece_placement(board: &mut Board, placement: &str) -> Result<(), FenError> {
    for (rank_from_top, rank_str) in placement.split('/').enumerate() {
        if rank_from_top >= 8 {
            return Err(FenError::InvalidRank { rank: rank_from_top });
        }
        let rank = 7 - rank_from_top;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
            } else {
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::TooManyFiles { rank: rank_from_top, files: file + 1 });
                }
                board.set_piece(Square::new(rank, file), piece);
                file += 1;
            }
        }
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        match c {
            'K' => rights.set(Color::White, true),
            'Q' => rights.set(Color::White, false),
            'k' => rights.set(Color::Black, true),
            'q' => rights.set(Color::Black, false),
            _ => return Err(FenError::InvalidCastling { char: c }),
        }
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Square, FenError> {
    if field == "-" {
        return Ok(Square::NONE);
    }
    let chars: Vec<char> = field.chars().collect();
    if chars.len() == 2 && ('a'..='h').contains(&chars[0]) && ('1'..='8').contains(&chars[1]) {
        let file = chars[0] as usize - 'a' as usize;
        let rank = chars[1] as usize - '1' as usize;
        Ok(Square::new(rank, file))
    } else {
        Err(FenError::InvalidEnPassant { found: field.to_string() })
    }
}

fn check_king_counts(board: &Board) -> Result<(), PositionError> {
    for &color in &[Color::White, Color::Black] {
        let count = board.pieces_of(color, PieceType::King).popcount() as usize;
        if count != 1 {
            let label = if color == Color::White { "white" } else { "black" };
            return Err(PositionError::KingCount { color: label, count });
        }
    }
    Ok(())
}

fn check_no_pawns_on_back_rank(board: &Board) -> Result<(), PositionError> {
    for &color in &[Color::White, Color::Black] {
        let pawns = board.pieces_of(color, PieceType::Pawn);
        for sq in pawns.iter() {
            if sq.rank() == 0 || sq.rank() == 7 {
                return Err(PositionError::PawnOnBackRank { square: sq.to_string() });
            }
        }
    }
    Ok(())
}

fn check_opponent_not_in_check(board: &Board) -> Result<(), PositionError> {
    let opponent = board.side_to_move().opponent();
    let opponent_king = board.king_square(opponent);
    if is_square_attacked(board, opponent_king, board.side_to_move()) {
        return Err(PositionError::OpponentInCheck);
    }
    Ok(())
}

/// Clears a castling right whose king or rook isn't on its home square.
fn sanitize_castling_rights(board: &Board, castling: &mut CastlingRights) {
    for &color in &[Color::White, Color::Black] {
        let home_rank = if color == Color::White { 0 } else { 7 };
        let king_home = Square::new(home_rank, 4);
        let king_in_place = board.piece_at(king_home) == Piece::new(color, PieceType::King);

        for &(kingside, rook_file) in &[(true, 7), (false, 0)] {
            if !castling.has(color, kingside) {
                continue;
            }
            let rook_home = Square::new(home_rank, rook_file);
            let rook_in_place = board.piece_at(rook_home) == Piece::new(color, PieceType::Rook);
            if !king_in_place || !rook_in_place {
                #[cfg(feature = "logging")]
                warn!(
                    "sanitizing FEN: clearing {color:?} {} castling right, king/rook not in place",
                    if kingside { "kingside" } else { "queenside" }
                );
                castling.remove(color, kingside);
            }
        }
    }
}

/// Clears the en-passant target unless it sits directly behind an enemy
/// pawn that could have just played a double push and a friendly pawn
/// actually attacks it.
fn sanitize_en_passant(board: &Board, en_passant: &mut Square) {
    if en_passant.is_none() {
        return;
    }
    let ep = *en_passant;
    let us = board.side_to_move();
    let them = us.opponent();
    let is_white_to_move = us == Color::White;

    // The double-pushed pawn should sit one square behind `ep` from the
    // mover's perspective, with the square it started from empty.
    let valid_rank = if is_white_to_move { 5 } else { 2 };
    let landed_on = if is_white_to_move {
        ep.forward(false)
    } else {
        ep.forward(true)
    };

    let geometry_ok = ep.rank() == valid_rank
        && landed_on.is_some_and(|sq| board.piece_at(sq) == Piece::new(them, PieceType::Pawn))
        && board.piece_at(ep) == Piece::EMPTY;

    let attacked_by_us =
        !geometry::pawn_attacks(them, ep).and(board.pieces_of(us, PieceType::Pawn)).is_empty();

    if !geometry_ok || !attacked_by_us {
        #[cfg(feature = "logging")]
        warn!("sanitizing FEN: clearing implausible en-passant target {ep}");
        *en_passant = Square::NONE;
    }
}

/// Serializes `board` back to FEN text. Provided for symmetry and test
/// convenience; the core never depends on this direction.
#[must_use]
pub fn to_fen(board: &Board) -> String {
    let mut ranks = Vec::with_capacity(8);
    for rank in (0..8).rev() {
        let mut row = String::new();
        let mut empty = 0;
        for file in 0..8 {
            let piece = board.piece_at(Square::new(rank, file));
            if piece.is_empty() {
                empty += 1;
            } else {
                if empty > 0 {
                    row.push_str(&empty.to_string());
                    empty = 0;
                }
                row.push(piece.to_char());
            }
        }
        if empty > 0 {
            row.push_str(&empty.to_string());
        }
        ranks.push(row);
    }

    let side = if board.side_to_move() == Color::White { "w" } else { "b" };

    let mut castling = String::new();
    let rights = board.castling_rights();
    if rights.has(Color::White, true) {
        castling.push('K');
    }
    if rights.has(Color::White, false) {
        castling.push('Q');
    }
    if rights.has(Color::Black, true) {
        castling.push('k');
    }
    if rights.has(Color::Black, false) {
        castling.push('q');
    }
    if castling.is_empty() {
        castling.push('-');
    }

    let ep = board.en_passant_target();
    let ep_str = if ep.is_none() { "-".to_string() } else { ep.to_string() };

    format!(
        "{} {} {} {} {} {}",
        ranks.join("/"),
        side,
        castling,
        ep_str,
        board.halfmove_clock(),
        board.fullmove_number()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_startpos_roundtrip() {
        let board = from_fen(STARTPOS).unwrap();
        assert_eq!(to_fen(&board), STARTPOS);
    }

    #[test]
    fn test_kiwipete_parses() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let board = from_fen(fen).unwrap();
        assert_eq!(board.side_to_move(), Color::White);
        assert!(board.castling_rights().has(Color::White, true));
        assert!(board.castling_rights().has(Color::Black, false));
    }

    #[test]
    fn test_too_few_parts_is_error() {
        assert!(matches!(
            from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"),
            Err(FromFenError::Fen(FenError::TooFewParts { .. }))
        ));
    }

    #[test]
    fn test_two_kings_required() {
        let fen = "4k3/8/8/8/8/8/8/4KK2 w - - 0 1";
        assert!(matches!(
            from_fen(fen),
            Err(FromFenError::Position(PositionError::KingCount { .. }))
        ));
    }

    #[test]
    fn test_pawn_on_back_rank_rejected() {
        let fen = "P3k3/8/8/8/8/8/8/4K3 w - - 0 1";
        assert!(matches!(
            from_fen(fen),
            Err(FromFenError::Position(PositionError::PawnOnBackRank { .. }))
        ));
    }

    #[test]
    fn test_opponent_in_check_rejected() {
        // Black king on e8 is attacked by the white rook on e1, but it is
        // white to move: black (not to move) being in check is illegal.
        let fen = "4k3/8/8/8/8/8/8/4KR2 w - - 0 1";
        assert!(matches!(
            from_fen(fen),
            Err(FromFenError::Position(PositionError::OpponentInCheck))
        ));
    }

    #[test]
    fn test_implausible_en_passant_is_sanitized_not_rejected() {
        // No black pawn ever reached d5 as a double push from d7; this en
        // passant target is nonsense and should be silently cleared.
        let fen = "4k3/8/8/3P4/8/8/8/4K3 w - d6 0 1";
        let board = from_fen(fen).unwrap();
        assert!(board.en_passant_target().is_none());
    }

    #[test]
    fn test_inconsistent_castling_rights_are_sanitized_not_rejected() {
        // White king has moved off e1; the KQ rights in the FEN are stale.
        let fen = "rnbqkbnr/pppppppp/8/8/8/4K3/PPPPPPPP/RNBQ1BNR w KQkq - 0 1";
        let board = from_fen(fen).unwrap();
        assert!(!board.castling_rights().has(Color::White, true));
        assert!(!board.castling_rights().has(Color::White, false));
    }

    #[test]
    fn test_en_passant_target_preserved_when_plausible() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let board = from_fen(fen).unwrap();
        assert_eq!(board.en_passant_target(), Square::new(5, 3));
    }
}
