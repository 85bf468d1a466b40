use anyhow::{Context, Result};
use cozy_chess::{Color, Piece, Square};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 8x8 bonus table written the way a diagram reads: row 0 is the eighth rank,
/// column 0 is the a-file, values from White's point of view.
pub type PieceSquareTable = [[i32; 8]; 8];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceValues {
    pub pawn: i32,
    pub knight: i32,
    pub bishop: i32,
    pub rook: i32,
    pub queen: i32,
    pub king: i32,
}

impl PieceValues {
    pub fn of(&self, piece: Piece) -> i32 {
        match piece {
            Piece::Pawn => self.pawn,
            Piece::Knight => self.knight,
            Piece::Bishop => self.bishop,
            Piece::Rook => self.rook,
            Piece::Queen => self.queen,
            Piece::King => self.king,
        }
    }
}

impl Default for PieceValues {
    fn default() -> Self {
        Self { pawn: 100, knight: 320, bishop: 330, rook: 500, queen: 900, king: 20_000 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceSquareTables {
    pub pawn: PieceSquareTable,
    pub knight: PieceSquareTable,
    pub bishop: PieceSquareTable,
    pub rook: PieceSquareTable,
    pub queen: PieceSquareTable,
    pub king: PieceSquareTable,
}

impl PieceSquareTables {
    pub fn table(&self, piece: Piece) -> &PieceSquareTable {
        match piece {
            Piece::Pawn => &self.pawn,
            Piece::Knight => &self.knight,
            Piece::Bishop => &self.bishop,
            Piece::Rook => &self.rook,
            Piece::Queen => &self.queen,
            Piece::King => &self.king,
        }
    }

    /// Bonus for `piece` of `color` on `sq`. Black reads the table mirrored
    /// top-to-bottom so both sides see it from their own back rank.
    pub fn bonus(&self, piece: Piece, color: Color, sq: Square) -> i32 {
        let rank = sq.rank() as usize;
        let row = if color == Color::White { 7 - rank } else { rank };
        self.table(piece)[row][sq.file() as usize]
    }
}

impl Default for PieceSquareTables {
    fn default() -> Self {
        Self {
            pawn: [
                [  0,   0,   0,   0,   0,   0,   0,   0],
                [ 50,  50,  50,  50,  50,  50,  50,  50],
                [ 10,  10,  20,  30,  30,  20,  10,  10],
                [  5,   5,  10,  25,  25,  10,   5,   5],
                [  0,   0,   0,  20,  20,   0,   0,   0],
                [  5,  -5, -10,   0,   0, -10,  -5,   5],
                [  5,  10,  10, -20, -20,  10,  10,   5],
                [  0,   0,   0,   0,   0,   0,   0,   0],
            ],
            knight: [
                [-50, -40, -30, -30, -30, -30, -40, -50],
                [-40, -20,   0,   0,   0,   0, -20, -40],
                [-30,   0,  10,  15,  15,  10,   0, -30],
                [-30,   5,  15,  20,  20,  15,   5, -30],
                [-30,   0,  15,  20,  20,  15,   0, -30],
                [-30,   5,  10,  15,  15,  10,   5, -30],
                [-40, -20,   0,   5,   5,   0, -20, -40],
                [-50, -40, -30, -30, -30, -30, -40, -50],
            ],
            bishop: [
                [-20, -10, -10, -10, -10, -10, -10, -20],
                [-10,   0,   0,   0,   0,   0,   0, -10],
                [-10,   0,   5,  10,  10,   5,   0, -10],
                [-10,   5,   5,  10,  10,   5,   5, -10],
                [-10,   0,  10,  10,  10,  10,   0, -10],
                [-10,  10,  10,  10,  10,  10,  10, -10],
                [-10,   5,   0,   0,   0,   0,   5, -10],
                [-20, -10, -10, -10, -10, -10, -10, -20],
            ],
            rook: [
                [  0,   0,   0,   5,   5,   0,   0,   0],
                [  5,  10,  10,  10,  10,  10,  10,   5],
                [ -5,   0,   0,   0,   0,   0,   0,  -5],
                [ -5,   0,   0,   0,   0,   0,   0,  -5],
                [ -5,   0,   0,   0,   0,   0,   0,  -5],
                [ -5,   0,   0,   0,   0,   0,   0,  -5],
                [ -5,   0,   0,   0,   0,   0,   0,  -5],
                [  0,   0,   0,   5,   5,   0,   0,   0],
            ],
            queen: [
                [-20, -10, -10,  -5,  -5, -10, -10, -20],
                [-10,   0,   0,   0,   0,   0,   0, -10],
                [-10,   0,   5,   5,   5,   5,   0, -10],
                [ -5,   0,   5,   5,   5,   5,   0,  -5],
                [  0,   0,   5,   5,   5,   5,   0,  -5],
                [-10,   5,   5,   5,   5,   5,   0, -10],
                [-10,   0,   5,   0,   0,   0,   0, -10],
                [-20, -10, -10,  -5,  -5, -10, -10, -20],
            ],
            king: [
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-20, -30, -30, -40, -40, -30, -30, -20],
                [-10, -20, -20, -20, -20, -20, -20, -10],
                [ 20,  20,   0,   0,   0,   0,  20,  20],
                [ 20,  30,  10,   0,   0,  10,  30,  20],
            ],
        }
    }
}

/// Every tunable number the evaluator reads. Built once, then shared
/// read-only; a JSON file may override any subset of the fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub material: PieceValues,
    pub psqt: PieceSquareTables,
    pub bishop_pair: i32,
    pub rook_open_file: i32,
    pub rook_semi_open_file: i32,
    /// Per pawn beyond the first on a file.
    pub doubled_pawn: i32,
    /// Per file whose pawns have no friendly pawns on either neighbour file.
    pub isolated_pawn: i32,
    /// Multiplier on (white legal moves - black legal moves).
    pub mobility: f64,
    /// Pawns standing on d4, e4, d5 or e5.
    pub center_pawn: i32,
    /// Per rank a pawn has advanced from its own back rank.
    pub pawn_advancement: i32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            material: PieceValues::default(),
            psqt: PieceSquareTables::default(),
            bishop_pair: 30,
            rook_open_file: 10,
            rook_semi_open_file: 5,
            doubled_pawn: 15,
            isolated_pawn: 10,
            mobility: 0.1,
            center_pawn: 0,
            pawn_advancement: 0,
        }
    }
}

impl WeightConfig {
    /// The classical weights plus center-pawn and pawn-advancement terms.
    pub fn pawn_centric() -> Self {
        Self { center_pawn: 30, pawn_advancement: 3, ..Self::default() }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing weight config JSON")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading weight config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}
