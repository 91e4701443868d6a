// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A `Bitboard` is a set of squares packed into a `u64`, bit *i* standing for the
//! square with index *i* (A1 = 0, H8 = 63). Every piece list in a `Position` and every
//! entry of the attack tables is one.
use num_traits::FromPrimitive;
use std::fmt;
use std::ops;

use crate::types::{self, Square};

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    pub const fn from_bits(bits: u64) -> Bitboard {
        Bitboard { bits }
    }

    pub const fn from_square(square: Square) -> Bitboard {
        Bitboard::from_bits(1u64 << (square as u8))
    }

    pub const fn all() -> Bitboard {
        Bitboard::from_bits(!0)
    }

    pub const fn none() -> Bitboard {
        Bitboard::from_bits(0)
    }

    pub const fn test(self, square: Square) -> bool {
        self.bits & (1u64 << (square as u8)) != 0
    }

    pub fn set(&mut self, square: Square) {
        self.bits |= 1u64 << (square as u8);
    }

    pub fn unset(&mut self, square: Square) {
        self.bits &= !(1u64 << (square as u8));
    }

    /// Moves every square one rank up the board; the eighth rank is shifted out.
    pub const fn north(self) -> Bitboard {
        Bitboard::from_bits(self.bits << 8)
    }

    /// Moves every square one rank down the board; the first rank is shifted out.
    pub const fn south(self) -> Bitboard {
        Bitboard::from_bits(self.bits >> 8)
    }

    /// Iterates the squares of this set from A1 towards H8.
    pub fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }

    pub const fn bits(self) -> u64 {
        self.bits
    }

    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    pub const fn empty(self) -> bool {
        self.bits == 0
    }

    pub fn first(self) -> Option<Square> {
        self.iter().next()
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Bitboard({:#018x})", self.bits)
    }
}

/// Draws the set as an 8x8 grid, eighth rank on top.
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in types::RANKS.iter().rev() {
            write!(f, "{} ", rank)?;
            for &file in &types::FILES {
                let mark = if self.test(Square::of(rank, file)) { 'x' } else { '.' };
                write!(f, " {}", mark)?;
            }

            writeln!(f)?;
        }

        write!(f, "  ")?;
        for file in &types::FILES {
            write!(f, " {}", file)?;
        }

        writeln!(f)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits & rhs.bits)
    }
}

impl ops::BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits | rhs.bits)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.bits |= rhs.bits;
    }
}

impl ops::Not for Bitboard {
    type Output = Bitboard;

    fn not(self) -> Bitboard {
        Bitboard::from_bits(!self.bits)
    }
}

/// Pops squares off a bitboard lowest index first.
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }

        let index = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Square::from_u32(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIterator;

    fn into_iter(self) -> BitboardIterator {
        self.iter()
    }
}

pub const BB_RANK_1: Bitboard = Bitboard::from_bits(0x0000_0000_0000_00FF);
pub const BB_RANK_4: Bitboard = Bitboard::from_bits(0x0000_0000_FF00_0000);
pub const BB_RANK_5: Bitboard = Bitboard::from_bits(0x0000_00FF_0000_0000);
pub const BB_RANK_8: Bitboard = Bitboard::from_bits(0xFF00_0000_0000_0000);

pub const BB_FILE_A: Bitboard = Bitboard::from_bits(0x0101_0101_0101_0101);
pub const BB_FILE_H: Bitboard = Bitboard::from_bits(0x8080_8080_8080_8080);

/// The long diagonal running from A1 to H8.
pub const BB_DIAG_A1H8: Bitboard = Bitboard::from_bits(0x8040_2010_0804_0201);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_unset() {
        let mut board = Bitboard::none();
        assert!(!board.test(Square::H2));
        board.set(Square::H2);
        assert!(board.test(Square::H2));
        board.unset(Square::H2);
        assert!(board.empty());
    }

    #[test]
    fn set_operations() {
        let pawns = Bitboard::from_square(Square::A2) | Bitboard::from_square(Square::B2);
        let attacked = Bitboard::from_square(Square::B2) | Bitboard::from_square(Square::C2);

        assert_eq!(Bitboard::from_square(Square::B2), pawns & attacked);
        assert_eq!(3, (pawns | attacked).count());
        assert_eq!(62, (!pawns).count());
        assert!(!(!pawns).test(Square::A2));
    }

    #[test]
    fn iterates_lowest_square_first() {
        let mut board = Bitboard::none();
        board |= Bitboard::from_square(Square::G7);
        board |= Bitboard::from_square(Square::B2);
        board |= Bitboard::from_square(Square::A2);

        let squares: Vec<_> = board.iter().collect();
        assert_eq!(vec![Square::A2, Square::B2, Square::G7], squares);
        assert_eq!(Some(Square::A2), board.first());
        assert_eq!((3, Some(3)), board.iter().size_hint());
        assert_eq!(None, Bitboard::none().first());
    }

    #[test]
    fn shifts_drop_off_board() {
        let board = Bitboard::from_square(Square::C8) | Bitboard::from_square(Square::C1);
        assert_eq!(Bitboard::from_square(Square::C2), board.north());
        assert_eq!(Bitboard::from_square(Square::C7), board.south());
    }

    #[test]
    fn masks() {
        assert!(BB_RANK_4.test(Square::H4) && !BB_RANK_4.test(Square::H5));
        assert!(BB_RANK_5.test(Square::A5));
        assert!(BB_FILE_A.test(Square::A8) && !BB_FILE_A.test(Square::B8));
        assert!(BB_FILE_H.test(Square::H1));
        assert_eq!(8, BB_DIAG_A1H8.count());
        assert!(BB_DIAG_A1H8.test(Square::D4));
    }

    #[test]
    fn display_grid() {
        let text = Bitboard::from_square(Square::A8).to_string();
        let first = text.lines().next().unwrap();
        assert_eq!("8  x . . . . . . .", first);
        assert_eq!("   a b c d e f g h", text.lines().last().unwrap());
    }
}
