// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

/// Score is the output of a board evaluation function, always relative to the side to
/// move at the evaluated node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Score {
    /// The side to move forces mate in the given number of plies.
    Win(u32),

    /// The side to move is mated in the given number of plies.
    Loss(u32),

    /// Neither side has a forced mate within the search horizon; the evaluator assigned
    /// this many centipawns to the position.
    Evaluated(i32),
}

impl Score {
    /// Moves this score one ply further from the node that produced it. Mate scores
    /// get one ply longer; evaluated scores are unchanged.
    pub fn step(self) -> Score {
        match self {
            Score::Win(plies) => Score::Win(plies + 1),
            Score::Loss(plies) => Score::Loss(plies + 1),
            s => s,
        }
    }

    /// The inverse of `step`, saturating at mate on the board. A child searched
    /// against an unstepped window hands back bounds that step onto the parent's own.
    pub fn unstep(self) -> Score {
        match self {
            Score::Win(plies) => Score::Win(plies.saturating_sub(1)),
            Score::Loss(plies) => Score::Loss(plies.saturating_sub(1)),
            s => s,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Score::Win(plies) => write!(f, "#{}", plies),
            Score::Loss(plies) => write!(f, "#-{}", plies),
            Score::Evaluated(score) => write!(f, "{}cp", score),
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Score) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Score) -> Ordering {
        // Scores are totally ordered by how good they are for the side to move:
        //   1. A win is better than another win if it mates sooner.
        //   2. A loss is better than another loss if it is mated later.
        //   3. A win is better than any non-win, and a loss worse than any non-loss.
        //   4. Evaluated scores compare as numbers.
        match (self, other) {
            (Score::Win(self_win), Score::Win(other_win)) => other_win.cmp(self_win),
            (Score::Loss(self_loss), Score::Loss(other_loss)) => self_loss.cmp(other_loss),

            (Score::Win(_), _) => Ordering::Greater,
            (_, Score::Win(_)) => Ordering::Less,
            (Score::Loss(_), _) => Ordering::Less,
            (_, Score::Loss(_)) => Ordering::Greater,

            (Score::Evaluated(self_score), Score::Evaluated(other_score)) => {
                self_score.cmp(other_score)
            }
        }
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        match self {
            Score::Win(plies) => Score::Loss(plies),
            Score::Loss(plies) => Score::Win(plies),
            Score::Evaluated(score) => Score::Evaluated(-score),
        }
    }
}
