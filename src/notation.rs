// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Coordinate move notation, as exchanged with a peer: a source square, an optional
//! `-`, a destination square and an optional promotion letter (`e2e4`, `e2-e4`,
//! `e7e8q`).
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;

use regex::Regex;

use crate::moves::Move;
use crate::position::{MoveError, Position};
use crate::types::{PieceKind, Square};

lazy_static! {
    static ref MOVE_REGEX: Regex =
        Regex::new(r"^([a-h][1-8])-?([a-h][1-8])([nbrqNBRQ])?$").expect("move regex is valid");
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotationError {
    /// The text is not a move in coordinate notation.
    Malformed(String),

    /// The text was well-formed, but the move could not be made.
    Move(MoveError),
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NotationError::Malformed(text) => write!(f, "malformed move '{}'", text),
            NotationError::Move(err) => write!(f, "{}", err),
        }
    }
}

impl Error for NotationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NotationError::Move(err) => Some(err),
            NotationError::Malformed(_) => None,
        }
    }
}

impl From<MoveError> for NotationError {
    fn from(err: MoveError) -> NotationError {
        NotationError::Move(err)
    }
}

/// Parses a move in coordinate notation into its source square, destination square and
/// promotion piece.
pub fn parse_move(text: &str) -> Result<(Square, Square, Option<PieceKind>), NotationError> {
    let text = text.trim();
    let malformed = || NotationError::Malformed(text.to_owned());
    let captures = MOVE_REGEX.captures(text).ok_or_else(malformed)?;
    let from = Square::from_algebraic(&captures[1]).ok_or_else(malformed)?;
    let to = Square::from_algebraic(&captures[2]).ok_or_else(malformed)?;
    let promotion = match captures.get(3) {
        Some(m) => {
            let c = m.as_str().chars().next().ok_or_else(malformed)?;
            Some(PieceKind::try_from(c).map_err(|_| malformed())?)
        }
        None => None,
    };

    Ok((from, to, promotion))
}

impl Position {
    /// Parses a move in coordinate notation and makes it.
    pub fn apply_notation(&mut self, text: &str) -> Result<Move, NotationError> {
        let (from, to, promotion) = parse_move(text)?;
        trace!("applying {} -> {} ({:?})", from, to, promotion);
        Ok(self.makemove(from, to, promotion)?)
    }
}
