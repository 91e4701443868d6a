// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::eval::{BoardEvaluator, Score};
use crate::moves::Move;
use crate::position::Position;

/// The number of plies `best_move` searches, counting the root move itself.
pub const DEFAULT_SEARCH_DEPTH: u32 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// The best move found, or `None` if the side to move has no legal moves.
    pub best_move: Option<Move>,
    pub score: Score,
    pub nodes_searched: u64,
}

/// A fixed-depth negamax searcher with alpha-beta pruning.
///
/// The searcher explores the game tree by making and unmaking moves on the position it
/// is given, so the position is back in its original state whenever a search returns.
pub struct Searcher<E> {
    evaluator: E,
    nodes_searched: u64,
}

impl<E: BoardEvaluator> Searcher<E> {
    pub fn new() -> Searcher<E> {
        Searcher {
            evaluator: Default::default(),
            nodes_searched: 0u64,
        }
    }

    pub fn with_evaluator(evaluator: E) -> Searcher<E> {
        Searcher {
            evaluator,
            nodes_searched: 0u64,
        }
    }

    /// Scores `pos` for its side to move by searching `depth` plies below it, failing
    /// hard against the window `[alpha, beta]`.
    pub fn negamax(&mut self, pos: &mut Position, mut alpha: Score, beta: Score, depth: u32) -> Score {
        if depth == 0 {
            self.nodes_searched += 1;
            return self.evaluator.evaluate(pos);
        }

        let moves = pos.move_list();
        if moves.is_empty() {
            self.nodes_searched += 1;
            return terminal_score(pos);
        }

        for mov in moves {
            if pos.apply_move(mov).is_err() {
                continue;
            }

            let (child_alpha, child_beta) = child_window(alpha, beta);
            let score = -self.negamax(pos, child_alpha, child_beta, depth - 1).step();
            pos.unmakemove();
            if score >= beta {
                return beta;
            }

            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    /// Searches every root move to `depth` plies in total and returns the best one. Of
    /// several equally good moves, the first one generated is chosen.
    pub fn search(&mut self, pos: &mut Position, depth: u32) -> SearchResult {
        let depth = depth.max(1);
        self.nodes_searched = 0;

        let mut best_move = None;
        let mut best_score = Score::Loss(0);
        let mut alpha = Score::Loss(0);
        let beta = Score::Win(0);
        for mov in pos.move_list() {
            if pos.apply_move(mov).is_err() {
                continue;
            }

            let (child_alpha, child_beta) = child_window(alpha, beta);
            let score = -self.negamax(pos, child_alpha, child_beta, depth - 1).step();
            pos.unmakemove();
            debug!("root move {}: {}", mov, score);
            if best_move.is_none() || score > best_score {
                best_move = Some(mov);
                best_score = score;
            }

            if score > alpha {
                alpha = score;
            }
        }

        if best_move.is_none() {
            best_score = terminal_score(pos);
        }

        let result = SearchResult {
            best_move,
            score: best_score,
            nodes_searched: self.nodes_searched,
        };

        match result.best_move {
            Some(mov) => info!(
                "depth {} best move {} score {} ({} nodes)",
                depth, mov, result.score, result.nodes_searched
            ),
            None => info!("no legal moves, score {}", result.score),
        }

        result
    }

    pub fn best_move(&mut self, pos: &mut Position) -> Option<Move> {
        self.search(pos, DEFAULT_SEARCH_DEPTH).best_move
    }

    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

impl<E: BoardEvaluator> Default for Searcher<E> {
    fn default() -> Searcher<E> {
        Searcher::new()
    }
}

/// The window a child is searched with, seen from the child's side. Scores come back
/// one ply longer after `step`, so the bounds are unstepped here and a bound the child
/// fails hard against lands exactly on `alpha` or `beta`.
fn child_window(alpha: Score, beta: Score) -> (Score, Score) {
    ((-beta).unstep(), (-alpha).unstep())
}

/// The score of a position with no legal moves: checkmate or stalemate.
fn terminal_score(pos: &Position) -> Score {
    if pos.is_check(pos.side_to_move()) {
        Score::Loss(0)
    } else {
        Score::Evaluated(0)
    }
}
