// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack tables for every kind of piece.
//!
//! Kings, knights and pawns have a fixed set of attacked squares per square, so their
//! attacks are precomputed once by stepping each square along the piece's move deltas.
//!
//! Sliding pieces use a single "smeared" table: for every origin file and every 8-bit
//! occupancy of a rank, it holds the squares a slider on that rank attacks up to and
//! including the first blocker in each direction, replicated across all eight ranks.
//! Ranks and diagonals index the table directly by multiplying the line's occupancy onto
//! a single byte; files are rotated onto a rank first and rotated back afterwards.
use crate::bitboard::{Bitboard, BB_DIAG_A1H8, BB_FILE_A, BB_FILE_H, BB_RANK_4, BB_RANK_5};
use crate::types::{Color, Square, TableIndex, COLORS};

const KING_DELTAS: [i32; 8] = [7, 8, 9, 1, -7, -8, -9, -1];
const KNIGHT_DELTAS: [i32; 8] = [6, 15, 17, 10, -6, -15, -17, -10];
const WHITE_PAWN_DELTAS: [i32; 2] = [7, 9];
const BLACK_PAWN_DELTAS: [i32; 2] = [-7, -9];

const FILE_A: u64 = BB_FILE_A.bits();
const FILE_H: u64 = BB_FILE_H.bits();
const DIAG_A1H8: u64 = BB_DIAG_A1H8.bits();

/// Sets every square reachable from `sq` by one of `deltas`. A delta that wraps around
/// the edge of the board moves the square by more than `max_file_distance` files, which
/// is how wrapped targets are told apart from real ones.
fn step_attacks(sq: Square, deltas: &[i32], max_file_distance: i32) -> Bitboard {
    let mut board = Bitboard::none();
    for &delta in deltas {
        if let Some(target) = sq.plus(delta) {
            let distance = target.file() as i32 - sq.file() as i32;
            if distance.abs() <= max_file_distance {
                board.set(target);
            }
        }
    }

    board
}

struct StepTable {
    table: [Bitboard; 64],
}

impl StepTable {
    pub fn new(deltas: &[i32], max_file_distance: i32) -> StepTable {
        let mut st = StepTable {
            table: [Bitboard::none(); 64],
        };

        for sq in Square::all() {
            st.table[sq.as_index()] = step_attacks(sq, deltas, max_file_distance);
        }

        st
    }

    pub fn attacks(&self, sq: Square) -> Bitboard {
        self.table[sq.as_index()]
    }
}

struct PawnTable {
    table: [[Bitboard; 2]; 64],
}

impl PawnTable {
    pub fn new() -> PawnTable {
        let mut pt = PawnTable {
            table: [[Bitboard::none(); 2]; 64],
        };

        for sq in Square::all() {
            for &color in COLORS.iter() {
                let deltas = match color {
                    Color::White => &WHITE_PAWN_DELTAS,
                    Color::Black => &BLACK_PAWN_DELTAS,
                };

                pt.table[sq.as_index()][color.as_index()] = step_attacks(sq, deltas, 1);
            }
        }

        pt
    }

    pub fn attacks(&self, sq: Square, color: Color) -> Bitboard {
        self.table[sq.as_index()][color.as_index()]
    }
}

/// Mirrors a rank horizontally, so that the A file becomes the H file.
fn mirror(rank: u8) -> u8 {
    rank.reverse_bits()
}

/// Computes the squares attacked along a single rank by a slider on `file`, given the
/// rank's occupancy. `occ - 2 * piece` fills from the slider towards the H file up to
/// the first blocker; the same computation on the mirrored rank fills towards the A file.
fn rank_attacks_for(file: usize, occupancy: u8) -> u8 {
    let piece = 1u8 << file;
    let occ = occupancy | piece;
    let east = u32::from(occ).wrapping_sub(2 * u32::from(piece));
    let west_mirrored =
        u32::from(mirror(occ)).wrapping_sub(2 * u32::from(mirror(piece))) as u8;
    let west = u32::from(mirror(west_mirrored));
    ((east ^ west) & 0xFF) as u8
}

struct SlidingTable {
    smeared: [[u64; 256]; 8],
    diagonals: [u64; 64],
    antidiagonals: [u64; 64],
}

impl SlidingTable {
    pub fn new() -> SlidingTable {
        let mut table = SlidingTable {
            smeared: [[0; 256]; 8],
            diagonals: [0; 64],
            antidiagonals: [0; 64],
        };

        for file in 0..8 {
            for occ in 0..256 {
                let attacks = rank_attacks_for(file, occ as u8);
                table.smeared[file][occ] = u64::from(attacks).wrapping_mul(FILE_A);
            }
        }

        for sq in Square::all() {
            let (rank, file) = (sq.rank() as i32, sq.file() as i32);
            for other in Square::all() {
                let (other_rank, other_file) = (other.rank() as i32, other.file() as i32);
                if other_rank - other_file == rank - file {
                    table.diagonals[sq.as_index()] |= 1u64 << other.as_index();
                }
                if other_rank + other_file == rank + file {
                    table.antidiagonals[sq.as_index()] |= 1u64 << other.as_index();
                }
            }
        }

        table
    }

    /// Attacks along a line that holds at most one square per file (a rank, a diagonal
    /// or an anti-diagonal). Multiplying by the A file gathers the line's occupancy,
    /// indexed by file, onto the top byte without any carries.
    fn line_attacks(&self, sq: Square, occupancy: u64, line: u64) -> u64 {
        let idx = ((occupancy & line).wrapping_mul(FILE_A) >> 56) as usize;
        line & self.smeared[sq.file().as_index()][idx]
    }

    fn rank_attacks(&self, sq: Square, occupancy: u64) -> u64 {
        let rank = 0xFFu64 << (8 * sq.rank().as_index());
        self.line_attacks(sq, occupancy, rank)
    }

    fn diagonal_attacks(&self, sq: Square, occupancy: u64) -> u64 {
        self.line_attacks(sq, occupancy, self.diagonals[sq.as_index()])
    }

    fn antidiagonal_attacks(&self, sq: Square, occupancy: u64) -> u64 {
        self.line_attacks(sq, occupancy, self.antidiagonals[sq.as_index()])
    }

    /// Attacks along a file. The file is shifted onto the A file and multiplied by the
    /// A1-H8 diagonal, which packs the square on rank `r` into bit `7 - r` of the top
    /// byte. The rank table result is unpacked by the same multiplication, which lands
    /// bit `i` on the H file at rank `7 - i`, and is then shifted back to its file.
    fn file_attacks(&self, sq: Square, occupancy: u64) -> u64 {
        let file = sq.file().as_index();
        let rank = sq.rank().as_index();
        let packed = FILE_A & (occupancy >> file);
        let idx = (packed.wrapping_mul(DIAG_A1H8) >> 56) as usize;
        let attacks = self.smeared[7 - rank][idx] & 0xFF;
        (attacks.wrapping_mul(DIAG_A1H8) & FILE_H) >> (7 - file)
    }
}

lazy_static! {
    static ref KING_TABLE: StepTable = StepTable::new(&KING_DELTAS, 1);
    static ref KNIGHT_TABLE: StepTable = StepTable::new(&KNIGHT_DELTAS, 2);
    static ref PAWN_TABLE: PawnTable = PawnTable::new();
    static ref SLIDING_TABLE: SlidingTable = SlidingTable::new();
}

/// The squares a pawn of the given color attacks diagonally from `sq`.
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_TABLE.attacks(sq, color)
}

/// The square directly in front of a pawn, if it is empty.
pub fn pawn_pushes(sq: Square, color: Color, empty: Bitboard) -> Bitboard {
    let pawn = Bitboard::from_square(sq);
    match color {
        Color::White => pawn.north() & empty,
        Color::Black => pawn.south() & empty,
    }
}

/// The square two ranks in front of a pawn, if both it and the square it passes over
/// are empty. Only a pawn on its home rank can land on the fourth (or fifth) rank this
/// way, so the home rank itself is never consulted.
pub fn pawn_double_pushes(sq: Square, color: Color, empty: Bitboard) -> Bitboard {
    let single = pawn_pushes(sq, color, empty);
    match color {
        Color::White => single.north() & empty & BB_RANK_4,
        Color::Black => single.south() & empty & BB_RANK_5,
    }
}

pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_TABLE.attacks(sq)
}

pub fn king_attacks(sq: Square) -> Bitboard {
    KING_TABLE.attacks(sq)
}

pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    let occ = occupancy.bits();
    Bitboard::from_bits(
        SLIDING_TABLE.diagonal_attacks(sq, occ) | SLIDING_TABLE.antidiagonal_attacks(sq, occ),
    )
}

pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    let occ = occupancy.bits();
    Bitboard::from_bits(SLIDING_TABLE.rank_attacks(sq, occ) | SLIDING_TABLE.file_attacks(sq, occ))
}

pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}
