//! A chess position core: dual mailbox/bitboard representation, move
//! generation, incremental Zobrist-hashed make/unmake, a transposition
//! table, and a perft driver for validating all of the above against known
//! node counts.
//!
//! Everything above the position layer — UCI, search, evaluation, opening
//! books — is deliberately out of scope; this crate is meant to be the
//! foundation a search/UCI host is built on top of, not that host itself.

pub mod board;
pub mod perft;
pub mod tt;
pub mod zobrist;

pub use board::{Bitboard, Board, CastlingRights, Color, Move, MoveList, Piece, PieceType, Square};
pub use perft::{perft, perft_divide, perft_with_tt, DivideEntry};
pub use tt::TranspositionTable;
