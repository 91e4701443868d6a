// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arrayvec::ArrayVec;

use crate::attacks;
use crate::bitboard::{BB_RANK_1, BB_RANK_8};
use crate::moves::Move;
use crate::position::{self, Position};
use crate::types::{Color, Piece, PieceKind, Square, PROMOTION_KINDS};

/// A list of moves. No chess position has more than 218 legal moves.
pub type MoveVec = ArrayVec<[Move; 256]>;

const NON_PAWN_KINDS: [PieceKind; 5] = [
    PieceKind::King,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

/// Generates the legal moves of a position: pawn moves first, then king, knight,
/// bishop, rook and queen moves, then castles.
#[derive(Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> MoveGenerator {
        MoveGenerator
    }

    /// Appends every legal move for the side to move in `pos` to `moves`. Each candidate
    /// is tried with `makemove` and immediately unmade, so `pos` is unchanged on return.
    pub fn generate_moves(&self, pos: &mut Position, moves: &mut MoveVec) {
        let color = pos.side_to_move();
        self.generate_pawn_moves(pos, color, moves);
        for &kind in &NON_PAWN_KINDS {
            self.generate_piece_moves(pos, color, kind, moves);
        }
        self.generate_castles(pos, color, moves);
    }

    fn generate_pawn_moves(&self, pos: &mut Position, color: Color, moves: &mut MoveVec) {
        let empty = !pos.occupied();
        let mut enemy = pos.pieces(color.toggle());
        if let Some(ep) = pos.en_passant_square() {
            enemy.set(ep);
        }

        let promotion_rank = match color {
            Color::White => BB_RANK_8,
            Color::Black => BB_RANK_1,
        };

        for pawn in pos.pawns(color) {
            let targets = (attacks::pawn_attacks(pawn, color) & enemy)
                | attacks::pawn_pushes(pawn, color, empty)
                | attacks::pawn_double_pushes(pawn, color, empty);
            for target in targets {
                if promotion_rank.test(target) {
                    for &kind in &PROMOTION_KINDS {
                        try_move(pos, pawn, target, Some(kind), moves);
                    }
                } else {
                    try_move(pos, pawn, target, None, moves);
                }
            }
        }
    }

    fn generate_piece_moves(
        &self,
        pos: &mut Position,
        color: Color,
        kind: PieceKind,
        moves: &mut MoveVec,
    ) {
        let piece = Piece::new(kind, color);
        let occupied = pos.occupied();
        let friendly = pos.pieces(color);
        for from in pos.pieces_of_kind(color, kind) {
            for to in piece.attacks(from, occupied) & !friendly {
                try_move(pos, from, to, None, moves);
            }
        }
    }

    fn generate_castles(&self, pos: &mut Position, color: Color, moves: &mut MoveVec) {
        let home = position::king_home(color);
        let them = color.toggle();
        for &kingside in &[true, false] {
            let held = if kingside {
                pos.can_castle_kingside(color)
            } else {
                pos.can_castle_queenside(color)
            };

            if !held || !(position::castle_path(color, kingside) & pos.occupied()).empty() {
                continue;
            }

            if pos.is_attacked(home, them)
                || pos.is_attacked(position::castle_transit(color, kingside), them)
            {
                continue;
            }

            let dest = position::castle_destination(color, kingside);
            try_move(pos, home, dest, None, moves);
        }
    }
}

fn try_move(
    pos: &mut Position,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    moves: &mut MoveVec,
) {
    if let Ok(mov) = pos.makemove(from, to, promotion) {
        pos.unmakemove();
        moves.push(mov);
    }
}

impl Position {
    /// Returns every legal move for the side to move.
    pub fn move_list(&mut self) -> MoveVec {
        let mut moves = MoveVec::new();
        MoveGenerator::new().generate_moves(self, &mut moves);
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::{MoveGenerator, MoveVec};
    use crate::moves::Move;
    use crate::position::Position;
    use crate::types::{PieceKind, Square};

    fn moves(fen: &str) -> MoveVec {
        let mut pos = Position::from_fen(fen).unwrap();
        let before = pos.clone();
        let mut moves = MoveVec::new();
        MoveGenerator::new().generate_moves(&mut pos, &mut moves);
        assert_eq!(before, pos);
        moves
    }

    fn has_move(moves: &MoveVec, from: Square, to: Square) -> bool {
        moves
            .iter()
            .any(|m| m.source() == from && m.destination() == to)
    }

    fn moves_from(moves: &MoveVec, from: Square) -> Vec<Move> {
        moves.iter().cloned().filter(|m| m.source() == from).collect()
    }

    #[test]
    fn start_position() {
        let moves = moves("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(20, moves.len());
        assert!(has_move(&moves, Square::E2, Square::E4));
        assert!(has_move(&moves, Square::G1, Square::F3));

        // pawns are generated before pieces.
        assert_eq!(PieceKind::Pawn, moves[0].piece().kind);
        assert_eq!(PieceKind::Knight, moves[moves.len() - 1].piece().kind);
    }

    #[test]
    fn promotions_expand_to_four_moves() {
        let moves = moves("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let pawn_moves = moves_from(&moves, Square::A7);
        assert_eq!(8, pawn_moves.len());
        assert_eq!(
            4,
            pawn_moves.iter().filter(|m| m.is_capture()).count()
        );
        let kinds: Vec<_> = pawn_moves.iter().filter_map(|m| m.promotion()).collect();
        assert_eq!(
            vec![
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Rook,
                PieceKind::Queen
            ],
            kinds[..4].to_vec()
        );
    }

    #[test]
    fn en_passant_is_generated() {
        let moves = moves("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let ep: Vec<_> = moves.iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(1, ep.len());
        assert_eq!(Square::D6, ep[0].destination());
    }

    #[test]
    fn pinned_en_passant_is_not_generated() {
        // capturing en passant would expose the white king along the fifth rank.
        let moves = moves("4k3/8/8/K2pP2r/8/8/8/8 w - d6 0 1");
        assert!(moves.iter().all(|m| !m.is_en_passant()));
    }

    #[test]
    fn castles_both_sides() {
        let moves = moves("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles: Vec<_> = moves.iter().filter(|m| m.is_castle()).collect();
        assert_eq!(2, castles.len());
        assert_eq!(Square::G1, castles[0].destination());
        assert_eq!(Square::C1, castles[1].destination());
        assert!(moves.last().unwrap().is_castle());
    }

    #[test]
    fn no_castling_through_attacked_squares() {
        let moves = moves("r3k2r/8/8/8/8/8/3r4/R3K2R w KQkq - 0 1");
        assert!(moves.iter().all(|m| !m.is_queenside_castle()));
        assert!(moves.iter().any(|m| m.is_kingside_castle()));
    }

    #[test]
    fn no_castling_out_of_check() {
        let moves = moves("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
        assert!(moves.iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn queenside_castle_allows_attacked_b_file() {
        let moves = moves("r3k2r/8/8/8/8/8/1r6/R3K2R w KQkq - 0 1");
        assert!(moves.iter().any(|m| m.is_queenside_castle()));
    }

    #[test]
    fn check_evasions_only() {
        let moves = moves("4k3/8/8/8/8/8/4q3/R3K3 w - - 0 1");
        for mov in &moves {
            assert_eq!(Square::E1, mov.source());
        }
        assert!(has_move(&moves, Square::E1, Square::E2));
        assert!(!has_move(&moves, Square::E1, Square::D1));
    }

    #[test]
    fn checkmate_has_no_moves() {
        let moves = moves("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert!(moves.is_empty());
    }

    #[test]
    fn move_list_matches_generator() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut pos = Position::from_fen(fen).unwrap();
        assert_eq!(moves(fen), pos.move_list());
        assert_eq!(48, pos.move_list().len());
    }
}
