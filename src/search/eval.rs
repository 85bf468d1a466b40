use cozy_chess::{Board, Color, Piece, Square};
use serde::Serialize;

use crate::board::Position;
use crate::search::weights::WeightConfig;

/// Centipawns, positive means White is better. Fractional because mobility is
/// weighted below one.
pub type Score = f64;

// Mate scoring helpers
pub const MATE_SCORE: Score = 999_999.0;
pub const DRAW_SCORE: Score = 0.0;

const PIECES: [Piece; 6] = [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King];
const CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

/// Every heuristic term of a non-terminal position, each already signed
/// from White's side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EvalBreakdown {
    pub material: i32,
    pub positional: i32,
    pub bishop_pair: i32,
    pub rook_files: i32,
    pub pawn_structure: i32,
    pub pawn_placement: i32,
    pub mobility: f64,
}

impl EvalBreakdown {
    pub fn total(&self) -> Score {
        let whole = self.material
            + self.positional
            + self.bishop_pair
            + self.rook_files
            + self.pawn_structure
            + self.pawn_placement;
        whole as Score + self.mobility
    }
}

/// Static evaluation over an injected, read-only set of weights.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    weights: WeightConfig,
}

impl Evaluator {
    pub fn new(weights: WeightConfig) -> Self { Self { weights } }

    pub fn weights(&self) -> &WeightConfig { &self.weights }

    /// Mate is worth `MATE_SCORE` against the side to move, stalemate and dead
    /// material are exactly `DRAW_SCORE`, anything else is the sum of the
    /// heuristic terms.
    pub fn evaluate(&self, pos: &Position) -> Score {
        if pos.is_checkmate() {
            return if pos.side_to_move() == Color::White { -MATE_SCORE } else { MATE_SCORE };
        }
        if pos.is_stalemate() || pos.is_insufficient_material() {
            return DRAW_SCORE;
        }
        self.breakdown(pos).total()
    }

    /// Heuristic terms without the terminal checks.
    pub fn breakdown(&self, pos: &Position) -> EvalBreakdown {
        let w = &self.weights;
        let board = pos.board();
        let files = [pawn_files(board, Color::White), pawn_files(board, Color::Black)];
        let mut out = EvalBreakdown::default();

        for (side, &color) in [Color::White, Color::Black].iter().enumerate() {
            let sign = if color == Color::White { 1 } else { -1 };
            let ours = board.colors(color);

            for &piece in &PIECES {
                for sq in ours & board.pieces(piece) {
                    out.material += sign * w.material.of(piece);
                    out.positional += sign * w.psqt.bonus(piece, color, sq);
                }
            }

            if (ours & board.pieces(Piece::Bishop)).len() >= 2 {
                out.bishop_pair += sign * w.bishop_pair;
            }

            let (own, theirs) = (&files[side], &files[1 - side]);
            for sq in ours & board.pieces(Piece::Rook) {
                let f = sq.file() as usize;
                let bonus = match (own[f], theirs[f]) {
                    (0, 0) => w.rook_open_file,
                    (0, _) => w.rook_semi_open_file,
                    _ => 0,
                };
                out.rook_files += sign * bonus;
            }

            let mut penalty = 0;
            for f in 0..8 {
                let count = own[f];
                if count == 0 { continue; }
                if count > 1 {
                    penalty += w.doubled_pawn * (count - 1);
                }
                let left = if f > 0 { own[f - 1] } else { 0 };
                let right = if f < 7 { own[f + 1] } else { 0 };
                if left == 0 && right == 0 {
                    penalty += w.isolated_pawn;
                }
            }
            out.pawn_structure -= sign * penalty;

            if w.center_pawn != 0 || w.pawn_advancement != 0 {
                for sq in ours & board.pieces(Piece::Pawn) {
                    if CENTER.contains(&sq) {
                        out.pawn_placement += sign * w.center_pawn;
                    }
                    let rank = sq.rank() as i32;
                    let advanced = if color == Color::White { rank } else { 7 - rank };
                    out.pawn_placement += sign * advanced * w.pawn_advancement;
                }
            }
        }

        // In check the opponent cannot be probed and counts as zero moves.
        let white = pos.legal_move_count_for(Color::White).unwrap_or(0);
        let black = pos.legal_move_count_for(Color::Black).unwrap_or(0);
        out.mobility = (white as f64 - black as f64) * w.mobility;
        out
    }
}

/// Pawn count per file for one side.
fn pawn_files(board: &Board, color: Color) -> [i32; 8] {
    let mut files = [0i32; 8];
    for sq in board.colors(color) & board.pieces(Piece::Pawn) {
        files[sq.file() as usize] += 1;
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(fen: &str) -> EvalBreakdown {
        let pos = Position::from_fen(fen).unwrap();
        Evaluator::default().breakdown(&pos)
    }

    #[test]
    fn startpos_is_balanced() {
        let pos = Position::startpos();
        let b = Evaluator::default().breakdown(&pos);
        assert_eq!(b, EvalBreakdown::default());
        assert_eq!(Evaluator::default().evaluate(&pos), 0.0);
    }

    #[test]
    fn rook_file_bonuses() {
        assert_eq!(breakdown("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").rook_files, 10);
        assert_eq!(breakdown("4k3/p7/8/8/8/8/8/R3K3 w - - 0 1").rook_files, 5);
        assert_eq!(breakdown("4k3/8/8/8/8/8/P7/R3K3 w - - 0 1").rook_files, 0);
        assert_eq!(breakdown("r3k3/8/8/8/8/8/8/4K3 w - - 0 1").rook_files, -10);
    }

    #[test]
    fn doubled_and_isolated_pawns() {
        // a2+a3: one extra pawn on the file, and the file is isolated.
        assert_eq!(breakdown("4k3/8/8/8/8/P7/P7/4K3 w - - 0 1").pawn_structure, -25);
        // Connected a/b pawns are neither.
        assert_eq!(breakdown("4k3/8/8/8/8/8/PP6/4K3 w - - 0 1").pawn_structure, 0);
        // A lone black pawn counts for White.
        assert_eq!(breakdown("4k3/p7/8/8/8/8/8/4K3 w - - 0 1").pawn_structure, 10);
    }

    #[test]
    fn bishop_pair_per_side() {
        assert_eq!(breakdown("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").bishop_pair, 30);
        assert_eq!(breakdown("2b1kb2/8/8/8/8/8/8/2B1KB2 w - - 0 1").bishop_pair, 0);
    }

    #[test]
    fn mobility_in_check_counts_the_side_to_move() {
        // Ke1 in check along the first rank: d2, e2 and f2.
        assert_eq!(breakdown("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").mobility, 3.0 * 0.1);
        assert_eq!(breakdown("R3k3/8/8/8/8/8/8/4K3 b - - 0 1").mobility, -3.0 * 0.1);
    }

    #[test]
    fn pawn_placement_only_with_pawn_centric_weights() {
        let pos = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(Evaluator::default().breakdown(&pos).pawn_placement, 0);
        // e4: center bonus plus three ranks of advancement.
        let placement = Evaluator::new(WeightConfig::pawn_centric()).breakdown(&pos).pawn_placement;
        assert_eq!(placement, 30 + 3 * 3);
    }
}
