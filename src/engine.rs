use cozy_chess::{Color, Move};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::board::{GameResult, Position};
use crate::error::EngineError;
use crate::search::alphabeta::{SearchParams, Searcher};
use crate::search::eval::{Evaluator, Score};
use crate::search::ordering::order_moves;
use crate::search::weights::WeightConfig;

/// What one request produced: the position after the engine's move (or the
/// input position if the game was already over) and its classification.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub updated_fen: String,
    pub result: GameResult,
    pub best_move: Option<String>,
    pub score: Option<Score>,
    pub nodes: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct RootChoice {
    pub mv: Move,
    pub score: Score,
    pub nodes: u64,
}

/// Root move selection: parse, order, search each root move, pick, play.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    evaluator: Evaluator,
    params: SearchParams,
}

impl Engine {
    pub fn new(weights: WeightConfig) -> Self {
        Self::with_params(weights, SearchParams::default())
    }

    pub fn with_params(weights: WeightConfig, params: SearchParams) -> Self {
        Self { evaluator: Evaluator::new(weights), params }
    }

    pub fn evaluator(&self) -> &Evaluator { &self.evaluator }

    pub fn params(&self) -> SearchParams { self.params }

    /// `get_best_move` at the configured depth.
    pub fn best_move(&self, fen: &str) -> Result<MoveOutcome, EngineError> {
        self.get_best_move(fen, self.params.depth)
    }

    pub fn get_best_move(&self, fen: &str, depth: u32) -> Result<MoveOutcome, EngineError> {
        let mut pos = Position::from_fen(fen).map_err(EngineError::InvalidPosition)?;

        if pos.is_terminal() {
            let result = pos.result();
            info!("position already over ({result}), returning it unchanged");
            return Ok(MoveOutcome { updated_fen: pos.to_fen(), result, best_move: None, score: None, nodes: 0 });
        }

        let choice = self.select_move(&mut pos, depth)?;
        let uci = pos.uci(choice.mv);
        debug!("depth {depth}: playing {uci} (score {:.1}, {} nodes)", choice.score, choice.nodes);
        pos.apply(choice.mv);

        Ok(MoveOutcome {
            updated_fen: pos.to_fen(),
            result: pos.result(),
            best_move: Some(uci),
            score: Some(choice.score),
            nodes: choice.nodes,
        })
    }

    /// Best root move for the side to move, without playing it.
    ///
    /// Each root move is searched `depth - 1` further plies with a full window.
    /// White keeps the highest score, Black the lowest; the first move to reach
    /// the best score wins ties. `pos` is unchanged on return.
    pub fn select_move(&self, pos: &mut Position, depth: u32) -> Result<RootChoice, EngineError> {
        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return Err(EngineError::NoLegalMove);
        }
        order_moves(pos, &mut moves, self.evaluator.weights());

        let white = pos.side_to_move() == Color::White;
        let child_depth = depth.saturating_sub(1);
        let (scores, nodes) = if self.params.threads > 1 && moves.len() > 1 {
            self.score_root_parallel(pos, &moves, child_depth)
        } else {
            self.score_root_serial(pos, &moves, child_depth)
        };

        let mut best: Option<(Move, Score)> = None;
        for (&m, &score) in moves.iter().zip(&scores) {
            trace!("root {} -> {score:.1}", pos.uci(m));
            let improves = match best {
                None => true,
                Some((_, b)) => if white { score > b } else { score < b },
            };
            if improves { best = Some((m, score)); }
        }
        best.map(|(mv, score)| RootChoice { mv, score, nodes }).ok_or(EngineError::NoLegalMove)
    }

    fn score_root_serial(&self, pos: &mut Position, moves: &[Move], depth: u32) -> (Vec<Score>, u64) {
        let child_maximizing = pos.side_to_move() == Color::Black;
        let mut searcher = Searcher::new(&self.evaluator).with_pruning(self.params.pruning);
        let scores: Vec<Score> = moves.iter().map(|&m| {
            pos.apply(m);
            let score = searcher.search(pos, depth, Score::NEG_INFINITY, Score::INFINITY, child_maximizing);
            pos.undo();
            score
        }).collect();
        (scores, searcher.nodes())
    }

    // Every root move gets a full window, so workers need nothing from each
    // other and the collected scores match the serial ones exactly.
    fn score_root_parallel(&self, pos: &mut Position, moves: &[Move], depth: u32) -> (Vec<Score>, u64) {
        let pool = match rayon::ThreadPoolBuilder::new().num_threads(self.params.threads).build() {
            Ok(pool) => pool,
            Err(e) => {
                warn!("could not start {} search threads ({e}); searching serially", self.params.threads);
                return self.score_root_serial(pos, moves, depth);
            }
        };
        let root: &Position = pos;
        let child_maximizing = root.side_to_move() == Color::Black;
        let results: Vec<(Score, u64)> = pool.install(|| {
            moves.par_iter().map(|&m| {
                let mut child = root.clone();
                child.apply(m);
                let mut w = Searcher::new(&self.evaluator).with_pruning(self.params.pruning);
                let score = w.search(&mut child, depth, Score::NEG_INFINITY, Score::INFINITY, child_maximizing);
                (score, w.nodes())
            }).collect()
        });
        let nodes: u64 = results.iter().map(|&(_, n)| n).sum();
        (results.into_iter().map(|(s, _)| s).collect(), nodes)
    }
}
