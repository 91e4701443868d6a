// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::eval::{BoardEvaluator, Score};
use crate::position::Position;
use crate::types::{Color, PieceKind, Square, TableIndex, COLORS, PIECE_KINDS};

const PAWN_WEIGHT: i32 = 100;
const KNIGHT_WEIGHT: i32 = 300;
const BISHOP_WEIGHT: i32 = 300;
const ROOK_WEIGHT: i32 = 500;
const QUEEN_WEIGHT: i32 = 900;

// Piece-square tables are laid out from White's point of view, A1 first. Black pieces
// look up the square mirrored across the board's horizontal midline.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  10, -20, -20,  10,  10,   5,
     5,  -5, -10,   0,   0, -10,  -5,   5,
     0,   0,   0,  20,  20,   0,   0,   0,
     5,   5,  10,  25,  25,  10,   5,   5,
    10,  10,  20,  30,  30,  20,  10,  10,
    50,  50,  50,  50,  50,  50,  50,  50,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
   -50, -40, -30, -30, -30, -30, -40, -50,
   -40, -20,   0,   5,   5,   0, -20, -40,
   -30,   5,  10,  15,  15,  10,   5, -30,
   -30,   0,  15,  20,  20,  15,   0, -30,
   -30,   5,  15,  20,  20,  15,   5, -30,
   -30,   0,  10,  15,  15,  10,   0, -30,
   -40, -20,   0,   0,   0,   0, -20, -40,
   -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
   -20, -10, -10, -10, -10, -10, -10, -20,
   -10,   5,   0,   0,   0,   0,   5, -10,
   -10,  10,  10,  10,  10,  10,  10, -10,
   -10,   0,  10,  10,  10,  10,   0, -10,
   -10,   5,   5,  10,  10,   5,   5, -10,
   -10,   0,   5,  10,  10,   5,   0, -10,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,   0,   0,   5,   5,   0,   0,   0,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
     5,  10,  10,  10,  10,  10,  10,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
   -20, -10, -10,  -5,  -5, -10, -10, -20,
   -10,   0,   5,   0,   0,   0,   0, -10,
   -10,   5,   5,   5,   5,   5,   0, -10,
     0,   0,   5,   5,   5,   5,   0,  -5,
    -5,   0,   5,   5,   5,   5,   0,  -5,
   -10,   0,   5,   5,   5,   5,   0, -10,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    20,  30,  10,   0,   0,  10,  30,  20,
    20,  20,   0,   0,   0,   0,  20,  20,
   -10, -20, -20, -20, -20, -20, -20, -10,
   -20, -30, -30, -40, -40, -30, -30, -20,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
];

fn weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_WEIGHT,
        PieceKind::Knight => KNIGHT_WEIGHT,
        PieceKind::Bishop => BISHOP_WEIGHT,
        PieceKind::Rook => ROOK_WEIGHT,
        PieceKind::Queen => QUEEN_WEIGHT,
        // Both sides always have exactly one king.
        PieceKind::King => 0,
    }
}

fn table(kind: PieceKind) -> &'static [i32; 64] {
    match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    }
}

fn placement(kind: PieceKind, color: Color, sq: Square) -> i32 {
    let relative = match color {
        Color::White => sq,
        Color::Black => sq.flip(),
    };

    table(kind)[relative.as_index()]
}

/// An evaluator that counts material in centipawns and rewards pieces standing on
/// good squares.
#[derive(Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    pub fn new() -> MaterialEvaluator {
        MaterialEvaluator
    }
}

impl BoardEvaluator for MaterialEvaluator {
    fn evaluate(&self, pos: &Position) -> Score {
        let mut white_relative = 0;
        for &color in &COLORS {
            let sign = match color {
                Color::White => 1,
                Color::Black => -1,
            };

            for &kind in &PIECE_KINDS {
                for sq in pos.pieces_of_kind(color, kind) {
                    white_relative += sign * (weight(kind) + placement(kind, color, sq));
                }
            }
        }

        match pos.side_to_move() {
            Color::White => Score::Evaluated(white_relative),
            Color::Black => Score::Evaluated(-white_relative),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MaterialEvaluator;
    use crate::eval::{BoardEvaluator, Score};
    use crate::position::Position;

    fn evaluate(fen: &str) -> Score {
        MaterialEvaluator::new().evaluate(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn start_position_is_even() {
        assert_eq!(Score::Evaluated(0), MaterialEvaluator::new().evaluate(&Position::from_start_position()));
    }

    #[test]
    fn extra_queen() {
        // Kings on their home squares, white queen on d1.
        assert_eq!(Score::Evaluated(895), evaluate("4k3/8/8/8/8/8/8/3QK3 w - - 0 1"));
        assert_eq!(Score::Evaluated(-895), evaluate("4k3/8/8/8/8/8/8/3QK3 b - - 0 1"));
    }

    #[test]
    fn placement_matters() {
        let centralized = evaluate("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1");
        let cornered = evaluate("4k3/8/8/8/8/8/8/N3K3 w - - 0 1");
        assert!(centralized > cornered);
    }

    #[test]
    fn mirrored_position_negates() {
        let white = evaluate("4k3/8/8/8/8/5N2/PPP5/1K1R4 w - - 0 1");
        let black = evaluate("1k1r4/ppp5/5n2/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(-white, black);
    }
}
