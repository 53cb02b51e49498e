//! Perft: a recursive node counter used to validate move generation and
//! make/unmake against known node counts for standard test positions.

use crate::board::{legality, make_unmake, Board, Move};
use crate::tt::{PerftEntry, TranspositionTable};

#[cfg(feature = "logging")]
use log::trace;

/// Plies from the root at or beyond which [`perft_with_tt`] consults the
/// transposition table. Below this depth the overhead of probing/storing
/// outweighs the recursion it would save.
const TT_MEMOIZATION_DEPTH_THRESHOLD: u32 = 3;

/// Counts the leaf nodes of the legal move tree rooted at `board` to
/// `depth` plies, without any memoization.
#[must_use]
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legality::generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &mv in moves.iter() {
        make_unmake::make(board, mv);
        nodes += perft(board, depth - 1);
        make_unmake::unmake(board, mv);
    }
    nodes
}

/// Like [`perft`], but probes and stores subtree counts in `tt` once
/// `depth >= TT_MEMOIZATION_DEPTH_THRESHOLD`, keyed on `(position hash,
/// depth)` via the perft entry's own depth field disambiguating hash
/// collisions across depths.
#[must_use]
pub fn perft_with_tt(board: &mut Board, depth: u32, tt: &mut TranspositionTable) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth >= TT_MEMOIZATION_DEPTH_THRESHOLD {
        if let Some(entry) = tt.probe_perft(board.hash()) {
            if u32::from(entry.depth) == depth {
                #[cfg(feature = "logging")]
                trace!("perft tt hit at depth {depth}: {} nodes", entry.count);
                return entry.count;
            }
        }
    }

    let moves = legality::generate_legal_moves(board);
    let nodes = if depth == 1 {
        moves.len() as u64
    } else {
        let mut total = 0;
        for &mv in moves.iter() {
            make_unmake::make(board, mv);
            total += perft_with_tt(board, depth - 1, tt);
            make_unmake::unmake(board, mv);
        }
        total
    };

    if depth >= TT_MEMOIZATION_DEPTH_THRESHOLD {
        tt.store_perft(
            board.hash(),
            PerftEntry { depth: depth as u16, count: nodes },
        );
    }
    nodes
}

/// A single root move's subtree node count, as returned by
/// [`perft_divide`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivideEntry {
    pub mv: Move,
    pub nodes: u64,
}

/// Runs perft one ply at a time from the root, returning the per-root-move
/// breakdown and its total. Printing this (e.g. for comparison against a
/// reference engine's `go perft` output) is left to the caller.
#[must_use]
pub fn perft_divide(board: &mut Board, depth: u32) -> (Vec<DivideEntry>, u64) {
    let moves = legality::generate_legal_moves(board);
    let mut entries = Vec::with_capacity(moves.len());
    let mut total = 0;

    for &mv in moves.iter() {
        make_unmake::make(board, mv);
        let nodes = if depth == 0 { 1 } else { perft(board, depth - 1) };
        make_unmake::unmake(board, mv);
        total += nodes;
        entries.push(DivideEntry { mv, nodes });
    }

    #[cfg(feature = "logging")]
    trace!("perft divide at depth {depth}: {total} total nodes over {} root moves", entries.len());

    (entries, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen;

    #[test]
    fn test_perft_starting_position() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
        assert_eq!(perft(&mut board, 3), 8_902);
        assert_eq!(perft(&mut board, 4), 197_281);
    }

    #[test]
    fn test_perft_kiwipete_position() {
        let mut board =
            fen::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        assert_eq!(perft(&mut board, 1), 48);
        assert_eq!(perft(&mut board, 2), 2_039);
        assert_eq!(perft(&mut board, 3), 97_862);
    }

    #[test]
    fn test_perft_position_3() {
        let mut board = fen::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        assert_eq!(perft(&mut board, 1), 14);
        assert_eq!(perft(&mut board, 2), 191);
        assert_eq!(perft(&mut board, 3), 2_812);
        assert_eq!(perft(&mut board, 4), 43_238);
    }

    #[test]
    fn test_perft_position_4() {
        let mut board =
            fen::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1")
                .unwrap();
        assert_eq!(perft(&mut board, 1), 6);
        assert_eq!(perft(&mut board, 2), 264);
        assert_eq!(perft(&mut board, 3), 9_467);
    }

    #[test]
    fn test_perft_position_5() {
        let mut board =
            fen::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8").unwrap();
        assert_eq!(perft(&mut board, 1), 44);
        assert_eq!(perft(&mut board, 2), 1_486);
        assert_eq!(perft(&mut board, 3), 62_379);
    }

    #[test]
    fn test_perft_position_6() {
        let mut board = fen::from_fen(
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        )
        .unwrap();
        assert_eq!(perft(&mut board, 1), 46);
        assert_eq!(perft(&mut board, 2), 2_079);
        assert_eq!(perft(&mut board, 3), 89_890);
    }

    #[test]
    fn test_perft_with_tt_matches_plain_perft() {
        let mut plain = Board::new();
        let mut memoized = Board::new();
        let mut tt = TranspositionTable::new(1);
        assert_eq!(perft(&mut plain, 4), perft_with_tt(&mut memoized, 4, &mut tt));
    }

    #[test]
    fn test_divide_sums_to_total_and_matches_plain_perft() {
        let mut board = Board::new();
        let (entries, total) = perft_divide(&mut board, 3);
        assert_eq!(total, perft(&mut Board::new(), 3));
        let summed: u64 = entries.iter().map(|e| e.nodes).sum();
        assert_eq!(summed, total);
        assert_eq!(entries.len(), 20);
    }
}
