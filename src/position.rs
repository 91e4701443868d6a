// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::moves::{Move, MoveFlags};
use crate::types::TableIndex;
use crate::types::{CastleStatus, Color, Piece, PieceKind, Rank, Square};
use crate::types::{COLORS, FILES, PIECE_KINDS, RANKS};

/// Reasons a requested move can be rejected before the board is touched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidMove {
    NoPieceToMove,
    NotSideToMove,
    BadPromotion,
    PromotionRequired,
    IllegalPawnMove,
    IllegalPieceMove,
    CastlingNotAllowed,
    CastlingBlocked,
    CastlingThroughCheck,
}

impl fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            InvalidMove::NoPieceToMove => "no piece to move",
            InvalidMove::NotSideToMove => "piece does not belong to the side to move",
            InvalidMove::BadPromotion => "invalid promotion",
            InvalidMove::PromotionRequired => "pawn reaching the last rank must promote",
            InvalidMove::IllegalPawnMove => "pawn unable to move to target square",
            InvalidMove::IllegalPieceMove => "piece unable to move to target square",
            InvalidMove::CastlingNotAllowed => "castling not allowed: right has been lost",
            InvalidMove::CastlingBlocked => "castling not allowed: path is blocked",
            InvalidMove::CastlingThroughCheck => "castling not allowed: king passes through check",
        };
        f.write_str(msg)
    }
}

/// Possible errors that can arise when making a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// The move does not correspond to any pseudo-legal move. The position is untouched.
    Invalid(InvalidMove),

    /// The move left the mover's own king in check. The position has been reverted.
    KingInCheck,
}

impl From<InvalidMove> for MoveError {
    fn from(err: InvalidMove) -> MoveError {
        MoveError::Invalid(err)
    }
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveError::Invalid(reason) => write!(f, "invalid move: {}", reason),
            MoveError::KingInCheck => f.write_str("move leaves the king in check"),
        }
    }
}

impl Error for MoveError {}

/// An entry of the undo history. The half-move clock cannot be recovered from the
/// move alone, so its value before the move is kept alongside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub mov: Move,
    pub halfmove_clock: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    boards_by_piece: [Bitboard; 12],
    boards_by_color: [Bitboard; 2],
    occupied: Bitboard,
    occupancy: [Option<Piece>; 64],
    king_squares: [Square; 2],
    en_passant_square: Option<Square>,
    // The en-passant square the position was loaded with, restored once the
    // history has been fully unwound.
    initial_en_passant_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    side_to_move: Color,
    castle_status: CastleStatus,
    history: Vec<MoveRecord>,
}

//
// Board state getters
//

impl Position {
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castle_status(&self) -> CastleStatus {
        self.castle_status
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status.contains(castle_right(color, true))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status.contains(castle_right(color, false))
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.occupancy[square.as_index()]
    }

    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    pub fn pieces(&self, color: Color) -> Bitboard {
        self.boards_by_color[color.as_index()]
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.boards_by_piece[Piece::new(kind, color).index()]
    }

    pub fn pawns(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Pawn)
    }

    pub fn knights(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Knight)
    }

    pub fn bishops(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Bishop)
    }

    pub fn rooks(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Rook)
    }

    pub fn queens(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Queen)
    }

    pub fn kings(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::King)
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.as_index()]
    }

    /// The moves played since this position was loaded, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|record| record.mov)
    }
}

//
// Construction, used by the FEN parser
//

impl Position {
    pub(crate) fn empty() -> Position {
        Position {
            boards_by_piece: [Bitboard::none(); 12],
            boards_by_color: [Bitboard::none(); 2],
            occupied: Bitboard::none(),
            occupancy: [None; 64],
            king_squares: [Square::E1, Square::E8],
            en_passant_square: None,
            initial_en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            side_to_move: Color::White,
            castle_status: CastleStatus::NONE,
            history: Vec::new(),
        }
    }

    /// Places a piece on an empty square.
    pub(crate) fn place(&mut self, piece: Piece, square: Square) {
        self.drop(piece, square);
        if piece.kind == PieceKind::King {
            self.king_squares[piece.color.as_index()] = square;
        }
    }

    pub(crate) fn set_state(
        &mut self,
        side_to_move: Color,
        castle_status: CastleStatus,
        en_passant_square: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) {
        self.side_to_move = side_to_move;
        // Rights whose king or rook is not on its home square can never be used.
        self.castle_status = castle_status & self.castle_rights_on_board();
        self.en_passant_square = en_passant_square;
        self.initial_en_passant_square = en_passant_square;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self.history.clear();
    }
}

//
// State mutation primitives. Every change to the board goes through these two
// functions, and they always update all four places a piece is recorded.
//

impl Position {
    fn pickup(&mut self, piece: Piece, square: Square) {
        debug_assert_eq!(Some(piece), self.piece_at(square));
        self.boards_by_piece[piece.index()].unset(square);
        self.boards_by_color[piece.color.as_index()].unset(square);
        self.occupied.unset(square);
        self.occupancy[square.as_index()] = None;
    }

    fn drop(&mut self, piece: Piece, square: Square) {
        debug_assert_eq!(None, self.piece_at(square));
        self.boards_by_piece[piece.index()].set(square);
        self.boards_by_color[piece.color.as_index()].set(square);
        self.occupied.set(square);
        self.occupancy[square.as_index()] = Some(piece);
    }
}

//
// Move application and reversal
//

impl Position {
    /// Makes the move from `from` to `to`, promoting to `promotion` if given, and
    /// returns the fully annotated move that was played.
    ///
    /// The move is validated against the movement rules of the piece before anything
    /// changes; an invalid move leaves the position alone. A move that turns out to
    /// leave the mover's king attacked is unmade again before `KingInCheck` is returned.
    pub fn makemove(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, MoveError> {
        let mov = self.validate(from, to, promotion)?;
        self.apply(mov);

        let mover = mov.color();
        if self.is_attacked(self.king_square(mover), mover.toggle()) {
            self.unmakemove();
            return Err(MoveError::KingInCheck);
        }

        Ok(mov)
    }

    /// Makes a move previously produced by this position, e.g. one yielded by
    /// `move_list`.
    pub fn apply_move(&mut self, mov: Move) -> Result<Move, MoveError> {
        self.makemove(mov.source(), mov.destination(), mov.promotion())
    }

    /// Reverts the most recently made move, returning it. Returns `None` if no moves
    /// have been made since the position was loaded.
    pub fn unmakemove(&mut self) -> Option<Move> {
        let record = self.history.pop()?;
        let mov = record.mov;
        let color = mov.color();
        let piece = mov.piece();
        let placed = match mov.promotion() {
            Some(kind) => Piece::new(kind, color),
            None => piece,
        };

        self.pickup(placed, mov.destination());
        self.drop(piece, mov.source());
        if mov.is_castle() {
            let (rook_home, rook_castled) = castle_rook_squares(color, mov.is_kingside_castle());
            let rook = Piece::new(PieceKind::Rook, color);
            self.pickup(rook, rook_castled);
            self.drop(rook, rook_home);
        }

        if let Some(kind) = mov.captured() {
            self.drop(Piece::new(kind, color.toggle()), capture_square(mov));
        }

        if piece.kind == PieceKind::King {
            self.king_squares[color.as_index()] = mov.source();
        }

        self.castle_status = mov.castle_status();
        self.en_passant_square = match self.history.last() {
            Some(previous) => en_passant_target(previous.mov),
            None => self.initial_en_passant_square,
        };
        self.halfmove_clock = record.halfmove_clock;
        if color == Color::Black {
            self.fullmove_number -= 1;
        }

        self.side_to_move = color;
        debug_assert_eq!(Ok(()), self.check_invariants());
        Some(mov)
    }

    /// Returns whether or not the given move can be made without leaving the mover's
    /// king in check. Moves that are not even pseudo-legal are not legal either.
    pub fn is_legal(&mut self, from: Square, to: Square, promotion: Option<PieceKind>) -> bool {
        match self.makemove(from, to, promotion) {
            Ok(_) => {
                self.unmakemove();
                true
            }
            Err(_) => false,
        }
    }

    fn validate(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, InvalidMove> {
        let piece = self.piece_at(from).ok_or(InvalidMove::NoPieceToMove)?;
        let color = piece.color;
        if color != self.side_to_move {
            return Err(InvalidMove::NotSideToMove);
        }

        let promotes = piece.kind == PieceKind::Pawn && to.rank() == last_rank(color);
        match promotion {
            Some(kind) if !promotes || !kind.is_promotion_target() => {
                return Err(InvalidMove::BadPromotion)
            }
            None if promotes => return Err(InvalidMove::PromotionRequired),
            _ => {}
        }

        let mut mov = Move::new(from, to, piece).with_castle_status(self.castle_status);
        if let Some(kind) = promotion {
            mov = mov.with_promotion(kind);
        }

        let friendly = self.pieces(color);
        let enemy = self.pieces(color.toggle());
        let empty = !self.occupied;
        match piece.kind {
            PieceKind::Pawn if from.file() == to.file() => {
                if attacks::pawn_double_pushes(from, color, empty).test(to) {
                    mov = mov.with_flags(MoveFlags::DOUBLE_PUSH);
                } else if !attacks::pawn_pushes(from, color, empty).test(to) {
                    return Err(InvalidMove::IllegalPawnMove);
                }
            }
            PieceKind::Pawn => {
                let mut targets = enemy;
                if let Some(ep) = self.en_passant_square {
                    targets.set(ep);
                }

                if !(attacks::pawn_attacks(from, color) & targets).test(to) {
                    return Err(InvalidMove::IllegalPawnMove);
                }

                mov = match self.piece_at(to) {
                    Some(captured) => mov.with_capture(captured.kind),
                    None => mov.with_en_passant(),
                };
            }
            PieceKind::King if is_castle_shift(from, to) => {
                mov = self.validate_castle(mov)?;
            }
            _ => {
                let targets = piece.attacks(from, self.occupied) & !friendly;
                if !targets.test(to) {
                    return Err(InvalidMove::IllegalPieceMove);
                }

                if let Some(captured) = self.piece_at(to) {
                    mov = mov.with_capture(captured.kind);
                }
            }
        }

        Ok(mov)
    }

    fn validate_castle(&self, mov: Move) -> Result<Move, InvalidMove> {
        let color = mov.color();
        let kingside = mov.destination() > mov.source();
        if mov.source() != king_home(color) || !self.castle_status.contains(castle_right(color, kingside)) {
            return Err(InvalidMove::CastlingNotAllowed);
        }

        if !(castle_path(color, kingside) & self.occupied).empty() {
            return Err(InvalidMove::CastlingBlocked);
        }

        let them = color.toggle();
        if self.is_attacked(mov.source(), them)
            || self.is_attacked(castle_transit(color, kingside), them)
        {
            return Err(InvalidMove::CastlingThroughCheck);
        }

        let flag = if kingside {
            MoveFlags::KING_CASTLE
        } else {
            MoveFlags::QUEEN_CASTLE
        };
        Ok(mov.with_flags(flag))
    }

    fn apply(&mut self, mov: Move) {
        let record = MoveRecord {
            mov,
            halfmove_clock: self.halfmove_clock,
        };

        let color = mov.color();
        let piece = mov.piece();
        self.pickup(piece, mov.source());
        if let Some(kind) = mov.captured() {
            self.pickup(Piece::new(kind, color.toggle()), capture_square(mov));
        }

        if mov.is_castle() {
            // Castles are encoded using the king's start and stop position, so the
            // rook's move is derived from the side being castled to.
            let (rook_home, rook_castled) = castle_rook_squares(color, mov.is_kingside_castle());
            let rook = Piece::new(PieceKind::Rook, color);
            self.pickup(rook, rook_home);
            self.drop(rook, rook_castled);
        }

        let placed = match mov.promotion() {
            Some(kind) => Piece::new(kind, color),
            None => piece,
        };
        self.drop(placed, mov.destination());
        if piece.kind == PieceKind::King {
            self.king_squares[color.as_index()] = mov.destination();
        }

        if mov.is_capture() || piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if color == Color::Black {
            self.fullmove_number += 1;
        }

        self.castle_status &= self.castle_rights_on_board();
        self.en_passant_square = en_passant_target(mov);
        self.side_to_move = color.toggle();
        self.history.push(record);
        debug_assert_eq!(Ok(()), self.check_invariants());
    }

    /// The castling rights that are still geometrically possible: each right requires
    /// its king and rook to be standing on their home squares.
    fn castle_rights_on_board(&self) -> CastleStatus {
        let mut rights = CastleStatus::NONE;
        for &color in &COLORS {
            if !self.kings(color).test(king_home(color)) {
                continue;
            }

            for &kingside in &[true, false] {
                let (rook_home, _) = castle_rook_squares(color, kingside);
                if self.rooks(color).test(rook_home) {
                    rights |= castle_right(color, kingside);
                }
            }
        }

        rights
    }
}

//
// Board analysis
//

impl Position {
    /// Returns whether or not `square` is attacked by any piece belonging to `by`.
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        // A pawn of `by` attacks this square exactly when a pawn of the other color
        // standing here would attack it.
        if !(attacks::pawn_attacks(square, by.toggle()) & self.pawns(by)).empty() {
            return true;
        }

        if !(attacks::knight_attacks(square) & self.knights(by)).empty() {
            return true;
        }

        if !(attacks::king_attacks(square) & self.kings(by)).empty() {
            return true;
        }

        let diagonal = self.bishops(by) | self.queens(by);
        if !(attacks::bishop_attacks(square, self.occupied) & diagonal).empty() {
            return true;
        }

        let straight = self.rooks(by) | self.queens(by);
        !(attacks::rook_attacks(square, self.occupied) & straight).empty()
    }

    pub fn is_check(&self, color: Color) -> bool {
        self.is_attacked(self.king_square(color), color.toggle())
    }

    /// Verifies that the redundant representations of the board agree with each other:
    /// the occupancy array, the per-piece bitboards, the aggregate bitboards and the
    /// cached king squares.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        let mut by_color = [Bitboard::none(); 2];
        for &color in &COLORS {
            for &kind in &PIECE_KINDS {
                let board = self.pieces_of_kind(color, kind);
                if !(by_color[color.as_index()] & board).empty() {
                    return Err("square held by two piece bitboards");
                }
                by_color[color.as_index()] |= board;
            }
        }

        if !(by_color[0] & by_color[1]).empty() {
            return Err("square held by both colors");
        }

        if by_color != self.boards_by_color {
            return Err("color bitboard is not the union of its pieces");
        }

        if self.occupied != by_color[0] | by_color[1] {
            return Err("occupied bitboard is not the union of both colors");
        }

        for sq in Square::all() {
            let on_boards = COLORS
                .iter()
                .flat_map(|&color| PIECE_KINDS.iter().map(move |&kind| Piece::new(kind, color)))
                .find(|piece| self.boards_by_piece[piece.index()].test(sq));
            if on_boards != self.piece_at(sq) {
                return Err("occupancy array disagrees with piece bitboards");
            }
        }

        for &color in &COLORS {
            let kings = self.kings(color);
            if kings.count() != 1 || kings.first() != Some(self.king_square(color)) {
                return Err("king square disagrees with king bitboard");
            }
        }

        Ok(())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::from_start_position()
    }
}

//
// Helper functions
//

fn last_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::Eight,
        Color::Black => Rank::One,
    }
}

fn is_castle_shift(from: Square, to: Square) -> bool {
    from.rank() == to.rank() && (from.file() as i32 - to.file() as i32).abs() == 2
}

/// The square of the piece captured by the given move. For en passant this is the
/// pawn beside the mover, on the mover's original rank.
fn capture_square(mov: Move) -> Square {
    if mov.is_en_passant() {
        Square::of(mov.source().rank(), mov.destination().file())
    } else {
        mov.destination()
    }
}

/// The en-passant target created by the given move: the square a double-pushed pawn
/// passed over.
fn en_passant_target(mov: Move) -> Option<Square> {
    if mov.is_double_pawn_push() {
        let midpoint = (mov.source().as_index() + mov.destination().as_index()) / 2;
        Some(Square::from_index(midpoint))
    } else {
        None
    }
}

pub(crate) fn king_home(color: Color) -> Square {
    match color {
        Color::White => Square::E1,
        Color::Black => Square::E8,
    }
}

pub(crate) fn castle_right(color: Color, kingside: bool) -> CastleStatus {
    match (color, kingside) {
        (Color::White, true) => CastleStatus::WHITE_KINGSIDE,
        (Color::White, false) => CastleStatus::WHITE_QUEENSIDE,
        (Color::Black, true) => CastleStatus::BLACK_KINGSIDE,
        (Color::Black, false) => CastleStatus::BLACK_QUEENSIDE,
    }
}

/// The rook's home square and the square it lands on after castling.
fn castle_rook_squares(color: Color, kingside: bool) -> (Square, Square) {
    match (color, kingside) {
        (Color::White, true) => (Square::H1, Square::F1),
        (Color::White, false) => (Square::A1, Square::D1),
        (Color::Black, true) => (Square::H8, Square::F8),
        (Color::Black, false) => (Square::A8, Square::D8),
    }
}

/// The squares between king and rook, all of which must be empty to castle.
pub(crate) fn castle_path(color: Color, kingside: bool) -> Bitboard {
    let squares: &[Square] = match (color, kingside) {
        (Color::White, true) => &[Square::F1, Square::G1],
        (Color::White, false) => &[Square::B1, Square::C1, Square::D1],
        (Color::Black, true) => &[Square::F8, Square::G8],
        (Color::Black, false) => &[Square::B8, Square::C8, Square::D8],
    };

    squares
        .iter()
        .fold(Bitboard::none(), |board, &sq| board | Bitboard::from_square(sq))
}

/// The square the king passes over while castling.
pub(crate) fn castle_transit(color: Color, kingside: bool) -> Square {
    let (_, rook_castled) = castle_rook_squares(color, kingside);
    rook_castled
}

/// The square the king lands on after castling: always two files from home.
pub(crate) fn castle_destination(color: Color, kingside: bool) -> Square {
    let home = king_home(color);
    if kingside {
        Square::of(home.rank(), crate::types::File::G)
    } else {
        Square::of(home.rank(), crate::types::File::C)
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidMove, MoveError};
    use crate::position::Position;
    use crate::types::{CastleStatus, Color, Piece, PieceKind, Square};

    fn fen(s: &str) -> Position {
        Position::from_fen(s).unwrap()
    }

    #[test]
    fn check_smoke() {
        let pos = fen("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1");
        assert!(pos.is_check(Color::Black));
        assert!(!pos.is_check(Color::White));
    }

    #[test]
    fn opening_pawn_push() {
        let mut pos = Position::from_start_position();
        let mov = pos.makemove(Square::E2, Square::E3, None).unwrap();
        assert!(!mov.is_capture());
        assert_eq!(Color::Black, pos.side_to_move());
        assert_eq!(1, pos.fullmove_number());
        assert_eq!(0, pos.halfmove_clock());
        assert_eq!(
            Some(Piece::new(PieceKind::Pawn, Color::White)),
            pos.piece_at(Square::E3)
        );
        assert_eq!(None, pos.piece_at(Square::E2));
        assert_eq!(None, pos.en_passant_square());
    }

    #[test]
    fn double_push_sets_en_passant() {
        let mut pos = Position::from_start_position();
        let mov = pos.makemove(Square::D2, Square::D4, None).unwrap();
        assert!(mov.is_double_pawn_push());
        assert_eq!(Some(Square::D3), pos.en_passant_square());

        pos.makemove(Square::G8, Square::F6, None).unwrap();
        assert_eq!(None, pos.en_passant_square());
        assert_eq!(1, pos.halfmove_clock());
        assert_eq!(2, pos.fullmove_number());
    }

    #[test]
    fn no_piece_to_move() {
        let mut pos = Position::from_start_position();
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::NoPieceToMove)),
            pos.makemove(Square::E4, Square::E5, None)
        );
    }

    #[test]
    fn not_side_to_move() {
        let mut pos = Position::from_start_position();
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::NotSideToMove)),
            pos.makemove(Square::E7, Square::E5, None)
        );
    }

    #[test]
    fn pawns_cannot_move_backwards_or_through_pieces() {
        let mut pos = fen("4k3/8/8/8/4p3/4P3/8/4K3 w - - 0 1");
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::IllegalPawnMove)),
            pos.makemove(Square::E3, Square::E4, None)
        );
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::IllegalPawnMove)),
            pos.makemove(Square::E3, Square::E2, None)
        );
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::IllegalPawnMove)),
            pos.makemove(Square::E3, Square::D4, None)
        );
    }

    #[test]
    fn double_push_blocked_by_intermediate_piece() {
        let mut pos = fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::IllegalPawnMove)),
            pos.makemove(Square::E2, Square::E4, None)
        );
    }

    #[test]
    fn sliders_cannot_jump() {
        let mut pos = Position::from_start_position();
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::IllegalPieceMove)),
            pos.makemove(Square::A1, Square::A3, None)
        );
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::IllegalPieceMove)),
            pos.makemove(Square::D1, Square::D2, None)
        );
    }

    #[test]
    fn pinned_piece_reports_king_in_check() {
        let mut pos = fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
        let before = pos.clone();
        assert_eq!(
            Err(MoveError::KingInCheck),
            pos.makemove(Square::E2, Square::D3, None)
        );
        assert_eq!(before, pos);
        assert!(!pos.is_legal(Square::E2, Square::D3, None));
    }

    #[test]
    fn en_passant_capture_and_revert() {
        let mut pos = fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let before = pos.clone();
        let mov = pos.makemove(Square::E5, Square::D6, None).unwrap();
        assert!(mov.is_en_passant());
        assert_eq!(None, pos.piece_at(Square::D5));
        assert_eq!(
            Some(Piece::new(PieceKind::Pawn, Color::White)),
            pos.piece_at(Square::D6)
        );

        assert_eq!(Some(mov), pos.unmakemove());
        assert_eq!(before, pos);
        assert_eq!(Some(Square::D6), pos.en_passant_square());
    }

    #[test]
    fn en_passant_only_right_after_double_push() {
        let mut pos = fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1");
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::IllegalPawnMove)),
            pos.makemove(Square::E5, Square::D6, None)
        );
    }

    #[test]
    fn promotion_requires_last_rank_and_valid_piece() {
        let mut pos = fen("4k3/1P6/8/8/8/8/6P1/4K3 w - - 0 1");
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::PromotionRequired)),
            pos.makemove(Square::B7, Square::B8, None)
        );
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::BadPromotion)),
            pos.makemove(Square::B7, Square::B8, Some(PieceKind::King))
        );
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::BadPromotion)),
            pos.makemove(Square::G2, Square::G3, Some(PieceKind::Queen))
        );

        let before = pos.clone();
        let mov = pos
            .makemove(Square::B7, Square::B8, Some(PieceKind::Knight))
            .unwrap();
        assert_eq!(Some(PieceKind::Knight), mov.promotion());
        assert_eq!(
            Some(Piece::new(PieceKind::Knight, Color::White)),
            pos.piece_at(Square::B8)
        );
        pos.unmakemove();
        assert_eq!(before, pos);
    }

    #[test]
    fn capture_promotion_restores_captured_piece() {
        let mut pos = fen("r3k3/1P6/8/8/8/8/8/4K3 w q - 0 1");
        let before = pos.clone();
        let mov = pos
            .makemove(Square::B7, Square::A8, Some(PieceKind::Queen))
            .unwrap();
        assert_eq!(Some(PieceKind::Rook), mov.captured());
        assert!(!pos.can_castle_queenside(Color::Black));

        pos.unmakemove();
        assert_eq!(before, pos);
        assert!(pos.can_castle_queenside(Color::Black));
    }

    #[test]
    fn castling_moves_rook_and_reverts() {
        let mut pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let before = pos.clone();

        let mov = pos.makemove(Square::E1, Square::G1, None).unwrap();
        assert!(mov.is_kingside_castle());
        assert_eq!(
            Some(Piece::new(PieceKind::Rook, Color::White)),
            pos.piece_at(Square::F1)
        );
        assert_eq!(None, pos.piece_at(Square::H1));
        assert_eq!(Square::G1, pos.king_square(Color::White));
        assert_eq!(
            CastleStatus::BLACK_KINGSIDE | CastleStatus::BLACK_QUEENSIDE,
            pos.castle_status()
        );

        let mov = pos.makemove(Square::E8, Square::C8, None).unwrap();
        assert!(mov.is_queenside_castle());
        assert_eq!(
            Some(Piece::new(PieceKind::Rook, Color::Black)),
            pos.piece_at(Square::D8)
        );
        assert_eq!(CastleStatus::NONE, pos.castle_status());

        pos.unmakemove();
        pos.unmakemove();
        assert_eq!(before, pos);
    }

    #[test]
    fn castling_rejections() {
        let mut pos = fen("r3k2r/8/8/8/8/8/8/RN2K1r1 w Qkq - 0 1");
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::CastlingNotAllowed)),
            pos.makemove(Square::E1, Square::G1, None)
        );
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::CastlingBlocked)),
            pos.makemove(Square::E1, Square::C1, None)
        );

        let mut pos = fen("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1");
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::CastlingThroughCheck)),
            pos.makemove(Square::E1, Square::G1, None)
        );

        let mut pos = fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
        assert_eq!(
            Err(MoveError::Invalid(InvalidMove::CastlingThroughCheck)),
            pos.makemove(Square::E1, Square::C1, None)
        );
    }

    #[test]
    fn castling_into_check_is_rejected_after_the_fact() {
        let mut pos = fen("r3k2r/8/8/8/8/8/6r1/R3K2R w KQkq - 0 1");
        let before = pos.clone();
        assert_eq!(
            Err(MoveError::KingInCheck),
            pos.makemove(Square::E1, Square::G1, None)
        );
        assert_eq!(before, pos);
    }

    #[test]
    fn rook_moves_clear_castle_rights() {
        let mut pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        pos.makemove(Square::H1, Square::H5, None).unwrap();
        assert!(!pos.can_castle_kingside(Color::White));
        assert!(pos.can_castle_queenside(Color::White));

        pos.makemove(Square::E8, Square::E7, None).unwrap();
        assert!(!pos.can_castle_kingside(Color::Black));
        assert!(!pos.can_castle_queenside(Color::Black));

        pos.unmakemove();
        assert!(pos.can_castle_kingside(Color::Black));
        assert!(pos.can_castle_queenside(Color::Black));
    }

    #[test]
    fn unmake_restores_halfmove_clock() {
        let mut pos = fen("4k3/8/8/8/8/8/4P3/R3K3 w - - 17 40");
        let before = pos.clone();
        pos.makemove(Square::A1, Square::A5, None).unwrap();
        assert_eq!(18, pos.halfmove_clock());
        pos.makemove(Square::E8, Square::D8, None).unwrap();
        pos.makemove(Square::E2, Square::E3, None).unwrap();
        assert_eq!(0, pos.halfmove_clock());
        assert_eq!(41, pos.fullmove_number());

        while pos.unmakemove().is_some() {}
        assert_eq!(before, pos);
    }

    #[test]
    fn unmake_on_empty_history() {
        let mut pos = Position::from_start_position();
        assert_eq!(None, pos.unmakemove());
        assert_eq!(Position::from_start_position(), pos);
    }

    #[test]
    fn unmake_restores_en_passant_from_history() {
        let mut pos = Position::from_start_position();
        pos.makemove(Square::E2, Square::E4, None).unwrap();
        pos.makemove(Square::G8, Square::F6, None).unwrap();
        assert_eq!(None, pos.en_passant_square());
        pos.unmakemove();
        assert_eq!(Some(Square::E3), pos.en_passant_square());
    }

    #[test]
    fn king_cannot_walk_into_check() {
        let mut pos = fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1");
        assert_eq!(
            Err(MoveError::KingInCheck),
            pos.makemove(Square::E1, Square::E2, None)
        );
        assert!(pos.is_legal(Square::E1, Square::D2, None));
        assert!(!pos.is_legal(Square::E1, Square::D1, None));
        assert!(pos.is_legal(Square::E1, Square::F1, None));
    }

    #[test]
    fn invariants_hold_for_start_position() {
        assert_eq!(Ok(()), Position::from_start_position().check_invariants());
    }

    #[test]
    fn errors_display() {
        assert_eq!(
            "invalid move: no piece to move",
            MoveError::Invalid(InvalidMove::NoPieceToMove).to_string()
        );
        assert_eq!(
            "move leaves the king in check",
            MoveError::KingInCheck.to_string()
        );
    }
}
