//! Chess board representation and game logic.
//!
//! Dual mailbox/bitboard position representation, pseudo-legal and legal
//! move generation, incremental make/unmake with Zobrist hashing, and FEN
//! parsing/serialization at the position boundary.
//!
//! # Example
//! ```
//! use chess_engine::board::{legality, Board};
//!
//! let board = Board::new();
//! let moves = legality::generate_legal_moves(&board);
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod analysis;
mod attack_tables;
pub mod error;
pub mod fen;
mod geometry;
mod history;
pub mod invariants;
pub mod legality;
pub mod make_unmake;
mod movegen;
mod state;
mod types;

// Public API - types users need
pub use error::{FenError, PositionError, SquareError};
pub use state::Board;
pub use types::{Bitboard, CastlingRights, Color, Move, MoveList, MoveListIntoIter, Piece, PieceType, Square};
