use cozy_chess::Move;
use std::cmp::Reverse;

use crate::board::Position;
use crate::search::weights::WeightConfig;

/// Material value of the enemy piece standing on the move's destination.
///
/// Zero for quiet moves, en passant (the target square is empty) and castling
/// (cozy-chess targets the castler's own rook).
pub fn capture_value(pos: &Position, mv: Move, weights: &WeightConfig) -> i32 {
    match pos.piece_at(mv.to) {
        Some((piece, color)) if color != pos.side_to_move() => weights.material.of(piece),
        _ => 0,
    }
}

/// Captures first, most valuable victim first. Stable, so equal keys keep
/// generation order.
pub fn order_moves(pos: &Position, moves: &mut [Move], weights: &WeightConfig) {
    moves.sort_by_key(|&m| Reverse(capture_value(pos, m, weights)));
}
