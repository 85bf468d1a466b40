use fenmove::board::Position;
use fenmove::perft::{divide, perft};

#[test]
fn perft_startpos_small_depths() {
    let mut p = Position::startpos();
    let before = p.to_fen();
    assert_eq!(perft(&mut p, 1), 20);
    assert_eq!(perft(&mut p, 2), 400);
    assert_eq!(perft(&mut p, 3), 8902);
    assert_eq!(p.to_fen(), before, "perft must leave the position as it found it");
    assert_eq!(p.ply(), 0);
}

#[test]
fn perft_kiwipete_castling_and_ep() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut p = Position::from_fen(fen).expect("valid fen");
    assert_eq!(perft(&mut p, 1), 48);
    assert_eq!(perft(&mut p, 2), 2039);
}

#[test]
fn perft_rook_endgame() {
    let mut p = Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").expect("valid fen");
    assert_eq!(perft(&mut p, 1), 14);
    assert_eq!(perft(&mut p, 2), 191);
    assert_eq!(perft(&mut p, 3), 2812);
}

#[test]
fn divide_sums_to_perft() {
    let mut p = Position::startpos();
    let counts = divide(&mut p, 3);
    assert_eq!(counts.len(), 20);
    assert_eq!(counts.iter().map(|(_, n)| n).sum::<u64>(), 8902);
    assert!(counts.iter().any(|(mv, n)| mv == "e2e4" && *n == 600));
}
