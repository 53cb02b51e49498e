use chess_engine::board::fen;
use chess_engine::{perft_divide, Board};
use std::time::Instant;

fn main() {
    let fen_str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut board: Board = fen::from_fen(fen_str).expect("valid FEN");
    let depth = 3;
    println!("Perft divide for Kiwipete depth {depth}");
    let start = Instant::now();
    let (entries, total) = perft_divide(&mut board, depth);
    for entry in &entries {
        println!("  {}: {}", entry.mv.to_uci(), entry.nodes);
    }
    let dur = start.elapsed();
    println!("Total: {total} in {dur:?}");
}
