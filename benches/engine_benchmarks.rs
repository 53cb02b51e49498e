//! Benchmarks for the position core: move generation, make/unmake and perft.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_engine::board::fen;
use chess_engine::board::legality::generate_legal_moves;
use chess_engine::{perft, Board};

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut board = Board::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| perft(black_box(&mut board), black_box(depth)))
        });
    }

    let mut kiwipete: Board =
        fen::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .expect("valid FEN");
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| perft(black_box(&mut kiwipete), black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Board::new();
    group.bench_function("startpos", |b| {
        b.iter(|| generate_legal_moves(black_box(&startpos)))
    });

    let middlegame: Board =
        fen::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4")
            .expect("valid FEN");
    group.bench_function("middlegame", |b| {
        b.iter(|| generate_legal_moves(black_box(&middlegame)))
    });

    let kiwipete: Board =
        fen::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .expect("valid FEN");
    group.bench_function("kiwipete", |b| {
        b.iter(|| generate_legal_moves(black_box(&kiwipete)))
    });

    group.finish();
}

fn bench_make_unmake(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_unmake");

    let board = Board::new();
    let moves = generate_legal_moves(&board);
    let mv = moves.iter().next().copied().expect("startpos has moves");

    group.bench_function("startpos", |b| {
        b.iter(|| {
            let mut scratch = board.clone();
            chess_engine::board::make_unmake::make(&mut scratch, black_box(mv));
            chess_engine::board::make_unmake::unmake(&mut scratch, black_box(mv));
        })
    });

    group.finish();
}

fn bench_fen(c: &mut Criterion) {
    let mut group = c.benchmark_group("fen");

    let kiwipete_fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    group.bench_function("parse_kiwipete", |b| {
        b.iter(|| fen::from_fen(black_box(kiwipete_fen)).expect("valid FEN"))
    });

    let board: Board = fen::from_fen(kiwipete_fen).expect("valid FEN");
    group.bench_function("format_kiwipete", |b| {
        b.iter(|| fen::to_fen(black_box(&board)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_perft,
    bench_movegen,
    bench_make_unmake,
    bench_fen
);
criterion_main!(benches);
