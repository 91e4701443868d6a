// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module contains the definition of Moves and specifies how they
//! are encoded.
//!
//! ## Encoding
//! A move carries everything needed to undo it, packed into 31 bits of a `u32`:
//!
//! | Bits  | Field                                              |
//! |-------|----------------------------------------------------|
//! | 0-5   | source square                                      |
//! | 6-11  | destination square                                 |
//! | 12-14 | kind of the moving piece                           |
//! | 15    | color of the moving piece                          |
//! | 16-18 | kind of the captured piece, plus one (0 = none)    |
//! | 19-23 | flags (capture, en passant, double push, castles)  |
//! | 24-27 | castling rights before the move was made           |
//! | 28-30 | promotion piece kind, plus one (0 = none)          |
use num_traits::FromPrimitive;
use std::fmt;

use crate::types::{CastleStatus, Color, Piece, PieceKind, Square, TableIndex};

const SQUARE_MASK: u32 = 0x3F;
const KIND_MASK: u32 = 0x7;
const FLAGS_MASK: u32 = 0x1F;
const CASTLE_MASK: u32 = 0xF;

const SOURCE_SHIFT: u32 = 0;
const DESTINATION_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const COLOR_SHIFT: u32 = 15;
const CAPTURED_SHIFT: u32 = 16;
const FLAGS_SHIFT: u32 = 19;
const CASTLE_SHIFT: u32 = 24;
const PROMOTION_SHIFT: u32 = 28;

bitflags! {
    pub struct MoveFlags: u8 {
        const NONE = 0;
        const CAPTURE = 0b0000_0001;
        const EN_PASSANT = 0b0000_0010;
        const DOUBLE_PUSH = 0b0000_0100;
        const KING_CASTLE = 0b0000_1000;
        const QUEEN_CASTLE = 0b0001_0000;
    }
}

/// A move, as recorded by a `Position` when it is made. Moves are built up from the
/// moving piece and its squares, then annotated with the capture, special-move flags,
/// castling rights and promotion as the move is applied.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Constructs a quiet move of the given piece from the source square to the
    /// destination square.
    pub fn new(source: Square, dest: Square, piece: Piece) -> Move {
        Move(
            (source as u32) << SOURCE_SHIFT
                | (dest as u32) << DESTINATION_SHIFT
                | (piece.kind as u32) << PIECE_SHIFT
                | (piece.color as u32) << COLOR_SHIFT,
        )
    }

    /// Retrieves the raw encoding of this move.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Marks this move as capturing a piece of the given kind on its destination square.
    pub fn with_capture(self, captured: PieceKind) -> Move {
        let cleared = self.0 & !(KIND_MASK << CAPTURED_SHIFT);
        Move(cleared | (captured as u32 + 1) << CAPTURED_SHIFT).with_flags(MoveFlags::CAPTURE)
    }

    /// Marks this move as an en passant capture of the pawn next to the destination square.
    pub fn with_en_passant(self) -> Move {
        self.with_capture(PieceKind::Pawn)
            .with_flags(MoveFlags::EN_PASSANT)
    }

    /// Adds the given flags to this move.
    pub fn with_flags(self, flags: MoveFlags) -> Move {
        Move(self.0 | u32::from(flags.bits()) << FLAGS_SHIFT)
    }

    /// Records the castling rights that were held before this move was made.
    pub fn with_castle_status(self, status: CastleStatus) -> Move {
        let cleared = self.0 & !(CASTLE_MASK << CASTLE_SHIFT);
        Move(cleared | u32::from(status.bits()) << CASTLE_SHIFT)
    }

    /// Marks this move as promoting the moving pawn to the given kind of piece.
    pub fn with_promotion(self, kind: PieceKind) -> Move {
        let cleared = self.0 & !(KIND_MASK << PROMOTION_SHIFT);
        Move(cleared | (kind as u32 + 1) << PROMOTION_SHIFT)
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        Square::from_index(((self.0 >> SOURCE_SHIFT) & SQUARE_MASK) as usize)
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        Square::from_index(((self.0 >> DESTINATION_SHIFT) & SQUARE_MASK) as usize)
    }

    /// Returns the color of the player making this move.
    pub fn color(self) -> Color {
        Color::from_index(((self.0 >> COLOR_SHIFT) & 1) as usize)
    }

    /// Returns the piece that is moving, as it stood on the source square.
    pub fn piece(self) -> Piece {
        let kind = PieceKind::from_index(((self.0 >> PIECE_SHIFT) & KIND_MASK) as usize);
        Piece::new(kind, self.color())
    }

    /// Returns the kind of piece this move captures, if any.
    pub fn captured(self) -> Option<PieceKind> {
        decode_kind((self.0 >> CAPTURED_SHIFT) & KIND_MASK)
    }

    /// Returns the kind of piece this move promotes to, if any.
    pub fn promotion(self) -> Option<PieceKind> {
        decode_kind((self.0 >> PROMOTION_SHIFT) & KIND_MASK)
    }

    pub fn flags(self) -> MoveFlags {
        MoveFlags::from_bits_truncate(((self.0 >> FLAGS_SHIFT) & FLAGS_MASK) as u8)
    }

    /// Returns the castling rights as they were before this move was made.
    pub fn castle_status(self) -> CastleStatus {
        CastleStatus::from_bits_truncate(((self.0 >> CASTLE_SHIFT) & CASTLE_MASK) as u8)
    }

    pub fn is_capture(self) -> bool {
        self.flags().contains(MoveFlags::CAPTURE)
    }

    pub fn is_en_passant(self) -> bool {
        self.flags().contains(MoveFlags::EN_PASSANT)
    }

    pub fn is_double_pawn_push(self) -> bool {
        self.flags().contains(MoveFlags::DOUBLE_PUSH)
    }

    pub fn is_kingside_castle(self) -> bool {
        self.flags().contains(MoveFlags::KING_CASTLE)
    }

    pub fn is_queenside_castle(self) -> bool {
        self.flags().contains(MoveFlags::QUEEN_CASTLE)
    }

    pub fn is_castle(self) -> bool {
        self.flags()
            .intersects(MoveFlags::KING_CASTLE | MoveFlags::QUEEN_CASTLE)
    }

    pub fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    /// Returns this move in coordinate notation, e.g. "e2e4" or "e7e8q".
    pub fn as_uci(self) -> String {
        self.to_string()
    }
}

/// Decodes an optional piece kind field stored as kind plus one, zero meaning none.
fn decode_kind(field: u32) -> Option<PieceKind> {
    field.checked_sub(1).and_then(PieceKind::from_u32)
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.source(), self.destination())?;
        if let Some(kind) = self.promotion() {
            write!(f, "{}", kind)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Move")
            .field("source", &self.source())
            .field("destination", &self.destination())
            .field("piece", &self.piece())
            .field("captured", &self.captured())
            .field("flags", &self.flags())
            .field("castle_status", &self.castle_status())
            .field("promotion", &self.promotion())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Move, MoveFlags};
    use crate::types::{CastleStatus, Color, Piece, PieceKind, Square};

    fn white(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::White)
    }

    #[test]
    fn quiet() {
        let mov = Move::new(Square::A4, Square::A5, white(PieceKind::Rook));
        assert_eq!(Square::A4, mov.source());
        assert_eq!(Square::A5, mov.destination());
        assert_eq!(white(PieceKind::Rook), mov.piece());
        assert_eq!(None, mov.captured());
        assert_eq!(None, mov.promotion());
        assert_eq!(MoveFlags::NONE, mov.flags());
    }

    #[test]
    fn capture() {
        let mov = Move::new(Square::B4, Square::C5, white(PieceKind::Pawn))
            .with_capture(PieceKind::Queen);
        assert!(mov.is_capture());
        assert!(!mov.is_en_passant());
        assert_eq!(Some(PieceKind::Queen), mov.captured());
    }

    #[test]
    fn capture_of_a_pawn_is_not_empty() {
        let mov = Move::new(Square::B4, Square::C5, white(PieceKind::Pawn))
            .with_capture(PieceKind::Pawn);
        assert_eq!(Some(PieceKind::Pawn), mov.captured());
    }

    #[test]
    fn en_passant() {
        let mov = Move::new(Square::E5, Square::D6, white(PieceKind::Pawn)).with_en_passant();
        assert!(mov.is_en_passant());
        assert!(mov.is_capture());
        assert_eq!(Some(PieceKind::Pawn), mov.captured());
    }

    #[test]
    fn castles() {
        let piece = Piece::new(PieceKind::King, Color::Black);
        let kingside = Move::new(Square::E8, Square::G8, piece).with_flags(MoveFlags::KING_CASTLE);
        let queenside =
            Move::new(Square::E8, Square::C8, piece).with_flags(MoveFlags::QUEEN_CASTLE);
        assert!(kingside.is_castle() && kingside.is_kingside_castle());
        assert!(!kingside.is_queenside_castle());
        assert!(queenside.is_castle() && queenside.is_queenside_castle());
        assert_eq!(Color::Black, queenside.color());
    }

    #[test]
    fn fields_do_not_overlap() {
        let piece = Piece::new(PieceKind::Pawn, Color::Black);
        let mov = Move::new(Square::H2, Square::G1, piece)
            .with_capture(PieceKind::Knight)
            .with_castle_status(CastleStatus::WHITE_KINGSIDE | CastleStatus::BLACK_QUEENSIDE)
            .with_promotion(PieceKind::Queen);

        assert_eq!(Square::H2, mov.source());
        assert_eq!(Square::G1, mov.destination());
        assert_eq!(piece, mov.piece());
        assert_eq!(Some(PieceKind::Knight), mov.captured());
        assert_eq!(MoveFlags::CAPTURE, mov.flags());
        assert_eq!(
            CastleStatus::WHITE_KINGSIDE | CastleStatus::BLACK_QUEENSIDE,
            mov.castle_status()
        );
        assert_eq!(Some(PieceKind::Queen), mov.promotion());
        assert_eq!(mov, Move(mov.bits()));
        assert!(mov.bits() < 1 << 31);
    }

    #[test]
    fn out_of_range_kind_fields_decode_to_none() {
        let mov = Move::new(Square::E7, Square::E8, white(PieceKind::Pawn));
        let garbage = Move(mov.bits() | 0x7 << 16 | 0x7 << 28);
        assert_eq!(None, garbage.captured());
        assert_eq!(None, garbage.promotion());
        assert_eq!("e7e8", garbage.to_string());
    }

    #[test]
    fn uci_smoke() {
        let mov = Move::new(Square::A1, Square::A2, white(PieceKind::Rook));
        assert_eq!("a1a2", mov.as_uci());
    }

    #[test]
    fn uci_promote() {
        let mov = Move::new(Square::A7, Square::A8, white(PieceKind::Pawn))
            .with_promotion(PieceKind::Knight);
        assert_eq!("a7a8n", mov.as_uci());
    }
}
