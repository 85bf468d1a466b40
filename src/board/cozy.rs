use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Rank, Square};

use crate::board::result::GameResult;

/// Consecutive reversible halfmoves after which the game is drawn outright.
const SEVENTY_FIVE_MOVE_PLIES: u16 = 150;
/// Highest halfmove clock cozy-chess will hold.
const COZY_CLOCK_CAP: u16 = 100;
/// Occurrences of the same position that end the game without a claim.
const FIVEFOLD: usize = 5;

/// A cozy-chess board with a make/unmake stack.
///
/// cozy-chess boards are copy-make only, so `apply` stashes the previous board
/// and `undo` restores it. The stash doubles as the repetition history, which
/// starts at whatever position was parsed.
///
/// cozy-chess caps its halfmove clock at 100, so the real clock is kept
/// alongside the board and saved with it on the stack.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    halfmove: u16,
    undo: Vec<(CozyBoard, u16)>,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default(), halfmove: 0, undo: Vec::new() }
    }

    /// Parses a six-field FEN. The halfmove clock may exceed the 100 that
    /// cozy-chess accepts; the board gets a clamped copy.
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let (halfmove, text) = if fields.len() == 6 {
            let halfmove = fields[4]
                .parse::<u16>()
                .map_err(|_| "FEN error: InvalidHalfMoveClock".to_string())?;
            let clamped = halfmove.min(COZY_CLOCK_CAP).to_string();
            let mut owned: Vec<&str> = fields.clone();
            owned[4] = &clamped;
            (halfmove, owned.join(" "))
        } else {
            (0, fields.join(" "))
        };
        CozyBoard::from_fen(&text, false)
            .map(|b| Self { board: b, halfmove, undo: Vec::new() })
            .map_err(|e| format!("FEN error: {e:?}"))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    /// FEN with the uncapped halfmove clock. The en passant square is only
    /// written when an en passant capture is actually legal.
    pub fn to_fen(&self) -> String {
        let text = format!("{}", self.board);
        let mut fields: Vec<String> = text.split(' ').map(str::to_string).collect();
        if fields.len() == 6 {
            if self.legal_en_passant().is_none() {
                fields[3] = "-".to_string();
            }
            fields[4] = self.halfmove.to_string();
        }
        fields.join(" ")
    }

    /// Halfmoves since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u16 { self.halfmove }

    /// Target square of a legal en passant capture, if there is one.
    pub fn legal_en_passant(&self) -> Option<Square> {
        let file = self.board.en_passant()?;
        let target = Square::new(file, Rank::Sixth.relative_to(self.side_to_move()));
        let mut found = false;
        self.board.generate_moves(|ml| {
            found = ml.piece == Piece::Pawn && ml.to.has(target);
            found
        });
        if found { Some(target) } else { None }
    }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    /// Number of moves applied since the position was parsed.
    pub fn ply(&self) -> usize { self.undo.len() }

    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board.piece_on(sq).zip(self.board.color_on(sq))
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves: Vec<Move> = Vec::with_capacity(64);
        self.board.generate_moves(|ml| { moves.extend(ml); false });
        moves
    }

    pub fn legal_moves_count(&self) -> usize {
        count_moves(&self.board)
    }

    /// Legal move count for `color` as if it were that side's turn.
    ///
    /// The other side is probed on a null-moved copy, so `self` is never
    /// touched. Returns `None` when the flip is not a legal position, which is
    /// the case whenever the side to move is in check.
    pub fn legal_move_count_for(&self, color: Color) -> Option<usize> {
        if color == self.board.side_to_move() {
            return Some(count_moves(&self.board));
        }
        self.board.null_move().map(|flipped| count_moves(&flipped))
    }

    /// Plays a legal move, remembering the prior board for `undo`.
    ///
    /// # Panics
    /// Panics if `mv` is not legal in this position.
    pub fn apply(&mut self, mv: Move) {
        let prev = (self.board.clone(), self.halfmove);
        self.board.play(mv);
        // cozy resets its clock exactly on captures and pawn moves.
        self.halfmove = if self.board.halfmove_clock() == 0 { 0 } else { self.halfmove.saturating_add(1) };
        self.undo.push(prev);
    }

    /// Reverts the most recent `apply`. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some((board, halfmove)) => {
                self.board = board;
                self.halfmove = halfmove;
                true
            }
            None => false,
        }
    }

    pub fn in_check(&self) -> bool { !self.board.checkers().is_empty() }

    fn has_legal_moves(&self) -> bool {
        let mut any = false;
        self.board.generate_moves(|_| { any = true; true });
        any
    }

    pub fn is_checkmate(&self) -> bool {
        self.in_check() && !self.has_legal_moves()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && !self.has_legal_moves()
    }

    /// Neither side can ever mate: no pawns, rooks or queens, and either at most
    /// one minor piece overall or only bishops that all stand on one colour.
    pub fn is_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() { return false; }
        let knights = b.pieces(Piece::Knight);
        let bishops = b.pieces(Piece::Bishop);
        if knights.len() + bishops.len() <= 1 { return true; }
        if !knights.is_empty() { return false; }
        let light = bishops.into_iter().filter(|&sq| is_light_square(sq)).count() as u32;
        light == 0 || light == bishops.len()
    }

    pub fn is_seventyfive_moves(&self) -> bool {
        self.halfmove >= SEVENTY_FIVE_MOVE_PLIES && self.has_legal_moves()
    }

    /// Positions compare by placement, side, castling rights and a legal en
    /// passant square only.
    pub fn is_fivefold_repetition(&self) -> bool {
        let earlier = self.undo.iter().filter(|(b, _)| b.same_position(&self.board)).count();
        earlier + 1 >= FIVEFOLD
    }

    /// Game over without any claim: mate, stalemate, dead material,
    /// seventy-five-move rule or fivefold repetition.
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_moves()
            || self.is_insufficient_material()
            || self.is_seventyfive_moves()
            || self.is_fivefold_repetition()
    }

    pub fn result(&self) -> GameResult {
        if self.is_checkmate() {
            return GameResult::win_for(opposite(self.side_to_move()));
        }
        if self.is_terminal() { GameResult::Draw } else { GameResult::Ongoing }
    }

    /// Standard UCI text for a legal move of this position.
    ///
    /// cozy-chess encodes castling as king-takes-own-rook; this rewrites it to
    /// the king's destination square (e1g1 rather than e1h1).
    pub fn uci(&self, mv: Move) -> String {
        let stm = self.board.side_to_move();
        if self.board.piece_on(mv.from) == Some(Piece::King) && self.board.colors(stm).has(mv.to) {
            let file = if (mv.to.file() as usize) > (mv.from.file() as usize) { File::G } else { File::C };
            return format!("{}{}", mv.from, Square::new(file, mv.from.rank()));
        }
        format!("{}", mv)
    }

    pub fn find_move(&self, uci: &str) -> Option<Move> {
        self.legal_moves().into_iter().find(|&m| self.uci(m) == uci)
    }
}

pub fn opposite(color: Color) -> Color {
    if color == Color::White { Color::Black } else { Color::White }
}

fn count_moves(board: &CozyBoard) -> usize {
    let mut ct = 0usize;
    board.generate_moves(|moves| { ct += moves.len(); false });
    ct
}

fn is_light_square(sq: Square) -> bool {
    (sq.file() as usize + sq.rank() as usize) % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_then_undo_restores_fen() {
        let mut pos = Position::startpos();
        let before = pos.to_fen();
        let mv = pos.find_move("e2e4").expect("e2e4 legal");
        pos.apply(mv);
        assert_ne!(pos.to_fen(), before);
        assert!(pos.undo());
        assert_eq!(pos.to_fen(), before);
        assert!(!pos.undo(), "undo stack should be empty");
    }

    #[test]
    fn castling_is_reported_as_king_destination() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(pos.find_move("e1g1").is_some());
        assert!(pos.find_move("e1c1").is_some());
        assert!(pos.find_move("e1h1").is_none());
    }

    #[test]
    fn insufficient_material_cases() {
        let dead = [
            "8/8/8/4k3/8/8/8/4K3 w - - 0 1",
            "8/8/8/4k3/8/8/8/3NK3 w - - 0 1",
            "8/8/8/4k3/8/8/8/3BK3 w - - 0 1",
            // both bishops on dark squares
            "8/8/8/4k3/8/8/1b6/2B1K3 w - - 0 1",
        ];
        for fen in dead {
            let pos = Position::from_fen(fen).unwrap();
            assert!(pos.is_insufficient_material(), "expected dead position: {fen}");
        }
        let alive = [
            "8/8/8/4k3/8/8/8/2NNK3 w - - 0 1",
            "8/8/8/4k3/8/8/2b5/2B1K3 w - - 0 1",
            "8/8/8/4k3/8/8/8/3NKn2 w - - 0 1",
            "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1",
        ];
        for fen in alive {
            let pos = Position::from_fen(fen).unwrap();
            assert!(!pos.is_insufficient_material(), "expected mating material: {fen}");
        }
    }

    #[test]
    fn null_move_flip_fails_in_check() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        assert!(pos.in_check());
        assert!(pos.legal_move_count_for(Color::White).is_some());
        assert!(pos.legal_move_count_for(Color::Black).is_none());
    }

    #[test]
    fn fivefold_repetition_by_knight_shuffle() {
        let mut pos = Position::startpos();
        let cycle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        for _ in 0..4 {
            assert!(!pos.is_fivefold_repetition());
            for uci in cycle {
                let mv = pos.find_move(uci).expect("shuffle move legal");
                pos.apply(mv);
            }
        }
        assert!(pos.is_fivefold_repetition());
        assert!(pos.is_terminal());
        assert_eq!(pos.result(), GameResult::Draw);
    }

    #[test]
    fn halfmove_clock_runs_past_cozy_cap() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 149 100").unwrap();
        assert_eq!(pos.halfmove_clock(), 149);
        assert!(!pos.is_seventyfive_moves());
        pos.apply(pos.find_move("a1a2").expect("rook move legal"));
        assert_eq!(pos.halfmove_clock(), 150);
        assert!(pos.is_seventyfive_moves());
        assert!(pos.is_terminal());
        assert_eq!(pos.result(), GameResult::Draw);
        assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/R7/4K3 b - - 150 100");
        assert!(pos.undo());
        assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/R3K3 w - - 149 100");
    }

    #[test]
    fn pawn_move_resets_halfmove_clock() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 120 80").unwrap();
        pos.apply(pos.find_move("e2e3").expect("pawn push legal"));
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.to_fen(), "4k3/8/8/8/8/4P3/8/4K3 b - - 0 80");
    }

    #[test]
    fn unparsable_halfmove_clock_is_rejected() {
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - x 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - -3 1").is_err());
    }

    #[test]
    fn en_passant_square_only_when_capturable() {
        let mut pos = Position::startpos();
        pos.apply(pos.find_move("e2e4").unwrap());
        assert_eq!(pos.legal_en_passant(), None);
        assert_eq!(pos.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");

        let mut pos = Position::from_fen("rnbqkbnr/pppppppp/8/4P3/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2").unwrap();
        pos.apply(pos.find_move("d7d5").unwrap());
        assert_eq!(pos.legal_en_passant(), Some(Square::D6));
        assert_eq!(pos.to_fen(), "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
    }
}
