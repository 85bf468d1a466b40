use crate::board::Position;
use crate::search::eval::{Evaluator, Score};

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub depth: u32,
    /// Alpha-beta cutoffs. Off means plain minimax, same value, more nodes.
    pub pruning: bool,
    /// Root moves are split across this many workers when above one.
    pub threads: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { depth: 3, pruning: true, threads: 1 }
    }
}

/// Depth-limited minimax over a single owned position.
///
/// Scores are always from White's side: White maximizes, Black minimizes.
pub struct Searcher<'e> {
    eval: &'e Evaluator,
    pruning: bool,
    pub(crate) nodes: u64,
}

impl<'e> Searcher<'e> {
    pub fn new(eval: &'e Evaluator) -> Self {
        Self { eval, pruning: true, nodes: 0 }
    }

    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn nodes(&self) -> u64 { self.nodes }

    /// Minimax value of `pos` searched `depth` plies deep within `[alpha, beta]`.
    ///
    /// Every move is applied before recursing and undone right after, so `pos`
    /// is back in its original state when this returns.
    pub fn search(&mut self, pos: &mut Position, depth: u32, mut alpha: Score, mut beta: Score, maximizing: bool) -> Score {
        self.nodes += 1;
        if depth == 0 || pos.is_terminal() {
            return self.eval.evaluate(pos);
        }

        let moves = pos.legal_moves();
        if maximizing {
            let mut best = Score::NEG_INFINITY;
            for m in moves {
                pos.apply(m);
                let score = self.search(pos, depth - 1, alpha, beta, false);
                pos.undo();
                if score > best { best = score; }
                if best > alpha { alpha = best; }
                if self.pruning && beta <= alpha { break; }
            }
            best
        } else {
            let mut best = Score::INFINITY;
            for m in moves {
                pos.apply(m);
                let score = self.search(pos, depth - 1, alpha, beta, true);
                pos.undo();
                if score < best { best = score; }
                if best < beta { beta = best; }
                if self.pruning && beta <= alpha { break; }
            }
            best
        }
    }

    /// Full-window search with the side to move as the optimizing player.
    pub fn search_root(&mut self, pos: &mut Position, depth: u32) -> Score {
        let maximizing = pos.side_to_move() == cozy_chess::Color::White;
        self.search(pos, depth, Score::NEG_INFINITY, Score::INFINITY, maximizing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_static_eval() {
        let eval = Evaluator::default();
        let mut pos = Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 2 3").unwrap();
        let expected = eval.evaluate(&pos);
        let mut s = Searcher::new(&eval);
        assert_eq!(s.search_root(&mut pos, 0), expected);
        assert_eq!(s.nodes(), 1);
    }

    #[test]
    fn search_leaves_position_untouched() {
        let eval = Evaluator::default();
        let mut pos = Position::from_fen("4k3/8/8/8/5Q2/8/8/2b4K b - - 0 1").unwrap();
        let before = pos.to_fen();
        let mut s = Searcher::new(&eval);
        let _ = s.search_root(&mut pos, 3);
        assert_eq!(pos.to_fen(), before);
        assert_eq!(pos.ply(), 0);
    }
}
