use crate::board::Position;

// Perft over Position's make/unmake stack (no per-node cloning of the caller's board)
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let mut nodes = 0u64;
    for mv in pos.legal_moves() {
        pos.apply(mv);
        nodes += perft(pos, depth - 1);
        pos.undo();
    }
    nodes
}

/// Per-root-move node counts, in generation order.
pub fn divide(pos: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let mut out = Vec::new();
    for mv in pos.legal_moves() {
        let uci = pos.uci(mv);
        pos.apply(mv);
        out.push((uci, perft(pos, depth.saturating_sub(1))));
        pos.undo();
    }
    out
}
