// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reading and writing positions in Forsyth-Edwards Notation.
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::position::Position;
use crate::types::TableIndex;
use crate::types::{CastleStatus, Color, File, Piece, PieceKind, Rank, Square};
use crate::types::{COLORS, FILES, RANKS};

pub const START_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    EmptyHalfmove,
    InvalidHalfmove,
    EmptyFullmove,
    InvalidFullmove,
    MissingKing(Color),
    TooManyKings(Color),
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c),
            FenParseError::UnexpectedEnd => f.write_str("unexpected end of input"),
            FenParseError::InvalidDigit => f.write_str("invalid digit in board"),
            FenParseError::FileDoesNotSumToEight => f.write_str("rank does not sum to eight files"),
            FenParseError::UnknownPiece => f.write_str("unknown piece"),
            FenParseError::InvalidSideToMove => f.write_str("invalid side to move"),
            FenParseError::InvalidCastle => f.write_str("invalid castling rights"),
            FenParseError::InvalidEnPassant => f.write_str("invalid en passant square"),
            FenParseError::EmptyHalfmove => f.write_str("missing halfmove clock"),
            FenParseError::InvalidHalfmove => f.write_str("invalid halfmove clock"),
            FenParseError::EmptyFullmove => f.write_str("missing fullmove number"),
            FenParseError::InvalidFullmove => f.write_str("invalid fullmove number"),
            FenParseError::MissingKing(color) => write!(f, "no king for side '{}'", color),
            FenParseError::TooManyKings(color) => write!(f, "more than one king for side '{}'", color),
        }
    }
}

impl Error for FenParseError {}

type Stream<'a> = Peekable<Chars<'a>>;

fn eat(iter: &mut Stream, expected: char) -> Result<(), FenParseError> {
    match iter.next() {
        Some(c) if c == expected => Ok(()),
        Some(c) => Err(FenParseError::UnexpectedChar(c)),
        None => Err(FenParseError::UnexpectedEnd),
    }
}

fn advance(iter: &mut Stream) {
    let _ = iter.next();
}

fn peek(iter: &mut Stream) -> Result<char, FenParseError> {
    iter.peek().cloned().ok_or(FenParseError::UnexpectedEnd)
}

fn eat_board(iter: &mut Stream, pos: &mut Position) -> Result<(), FenParseError> {
    for &rank in RANKS.iter().rev() {
        let mut file = File::A as usize;
        while file <= File::H as usize {
            let c = peek(iter)?;
            // digits 1 through 8 indicate empty squares.
            if let Some(value) = c.to_digit(10) {
                if value < 1 || value > 8 {
                    return Err(FenParseError::InvalidDigit);
                }

                file += value as usize;
                if file > 8 {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }

                advance(iter);
                continue;
            }

            let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece)?;
            pos.place(piece, Square::of(rank, File::from_index(file)));
            advance(iter);
            file += 1;
        }

        if rank != Rank::One {
            eat(iter, '/')?;
        }
    }

    Ok(())
}

fn eat_side_to_move(iter: &mut Stream) -> Result<Color, FenParseError> {
    let side = match peek(iter)? {
        'w' => Color::White,
        'b' => Color::Black,
        _ => return Err(FenParseError::InvalidSideToMove),
    };

    advance(iter);
    Ok(side)
}

fn eat_castle_status(iter: &mut Stream) -> Result<CastleStatus, FenParseError> {
    if peek(iter)? == '-' {
        advance(iter);
        return Ok(CastleStatus::NONE);
    }

    let mut status = CastleStatus::NONE;
    for _ in 0..4 {
        match peek(iter)? {
            'K' => status |= CastleStatus::WHITE_KINGSIDE,
            'k' => status |= CastleStatus::BLACK_KINGSIDE,
            'Q' => status |= CastleStatus::WHITE_QUEENSIDE,
            'q' => status |= CastleStatus::BLACK_QUEENSIDE,
            ' ' => break,
            _ => return Err(FenParseError::InvalidCastle),
        }

        advance(iter);
    }

    Ok(status)
}

fn eat_en_passant(iter: &mut Stream) -> Result<Option<Square>, FenParseError> {
    let c = peek(iter)?;
    if c == '-' {
        advance(iter);
        return Ok(None);
    }

    let file = File::try_from(c).map_err(|_| FenParseError::InvalidEnPassant)?;
    advance(iter);
    let rank = Rank::try_from(peek(iter)?).map_err(|_| FenParseError::InvalidEnPassant)?;
    advance(iter);
    Ok(Some(Square::of(rank, file)))
}

fn eat_number(iter: &mut Stream) -> Option<String> {
    let mut buf = String::new();
    while let Some(&c) = iter.peek() {
        if !c.is_digit(10) {
            break;
        }

        buf.push(c);
        advance(iter);
    }

    if buf.is_empty() {
        None
    } else {
        Some(buf)
    }
}

fn eat_halfmove(iter: &mut Stream) -> Result<u32, FenParseError> {
    // The fullmove number is still to come, so running out of input here is an error
    // of its own.
    peek(iter)?;
    let buf = eat_number(iter).ok_or(FenParseError::EmptyHalfmove)?;
    peek(iter)?;
    buf.parse::<u32>()
        .map_err(|_| FenParseError::InvalidHalfmove)
}

fn eat_fullmove(iter: &mut Stream) -> Result<u32, FenParseError> {
    let buf = eat_number(iter).ok_or(FenParseError::EmptyFullmove)?;
    buf.parse::<u32>()
        .map_err(|_| FenParseError::InvalidFullmove)
}

/// Checks that every side has exactly one king.
fn validate_kings(pos: &Position) -> Result<(), FenParseError> {
    for &color in &COLORS {
        match pos.kings(color).count() {
            0 => return Err(FenParseError::MissingKing(color)),
            1 => {}
            _ => return Err(FenParseError::TooManyKings(color)),
        }
    }

    Ok(())
}

/// An en-passant square is only meaningful directly behind a pawn of the side not
/// to move that could have just double-pushed past it.
fn validate_en_passant(
    pos: &Position,
    side_to_move: Color,
    square: Square,
) -> Result<(), FenParseError> {
    let (target_rank, pawn_offset) = match side_to_move {
        Color::White => (Rank::Six, -8),
        Color::Black => (Rank::Three, 8),
    };

    let pawn = Piece::new(PieceKind::Pawn, side_to_move.toggle());
    let pawn_square = square.plus(pawn_offset);
    if square.rank() != target_rank
        || pos.piece_at(square).is_some()
        || pawn_square.and_then(|sq| pos.piece_at(sq)) != Some(pawn)
    {
        return Err(FenParseError::InvalidEnPassant);
    }

    Ok(())
}

impl Position {
    pub fn from_start_position() -> Position {
        Position::from_fen(START_POSITION_FEN).expect("start position FEN is valid")
    }

    /// Constructs a new position from a FEN representation of a board position.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        let mut pos = Position::empty();
        let iter = &mut fen.as_ref().chars().peekable();
        eat_board(iter, &mut pos)?;
        eat(iter, ' ')?;
        let side_to_move = eat_side_to_move(iter)?;
        eat(iter, ' ')?;
        let castle_status = eat_castle_status(iter)?;
        eat(iter, ' ')?;
        let en_passant_square = eat_en_passant(iter)?;
        eat(iter, ' ')?;
        let halfmove_clock = eat_halfmove(iter)?;
        eat(iter, ' ')?;
        let fullmove_number = eat_fullmove(iter)?;

        validate_kings(&pos)?;
        if let Some(square) = en_passant_square {
            validate_en_passant(&pos, side_to_move, square)?;
        }

        pos.set_state(
            side_to_move,
            castle_status,
            en_passant_square,
            halfmove_clock,
            fullmove_number,
        );
        debug_assert_eq!(Ok(()), pos.check_invariants());
        Ok(pos)
    }

    /// Resets this position to the starting position, discarding its history.
    pub fn reset(&mut self) {
        *self = Position::from_start_position();
    }

    /// Resets this position to the one described by `fen`. On error the position is
    /// left as it was.
    pub fn reset_to<S: AsRef<str>>(&mut self, fen: S) -> Result<(), FenParseError> {
        *self = Position::from_fen(fen)?;
        Ok(())
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                let square = Square::of(rank, file);
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        buf.push_str(&empty_squares.to_string());
                    }
                    buf.push_str(&piece.to_string());
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                buf.push_str(&empty_squares.to_string());
            }

            if rank != Rank::One {
                buf.push('/');
            }
        }

        buf.push(' ');
        buf.push_str(&self.side_to_move().to_string());
        buf.push(' ');
        if self.castle_status() == CastleStatus::NONE {
            buf.push('-');
        }
        if self.can_castle_kingside(Color::White) {
            buf.push('K');
        }
        if self.can_castle_queenside(Color::White) {
            buf.push('Q');
        }
        if self.can_castle_kingside(Color::Black) {
            buf.push('k');
        }
        if self.can_castle_queenside(Color::Black) {
            buf.push('q');
        }
        buf.push(' ');
        match self.en_passant_square() {
            Some(ep_square) => buf.push_str(&ep_square.to_string()),
            None => buf.push('-'),
        }
        buf.push_str(&format!(
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        ));
        buf
    }
}
