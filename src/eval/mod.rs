// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::position::Position;

mod material_evaluator;
mod score;

pub use material_evaluator::MaterialEvaluator;
pub use score::Score;

pub trait BoardEvaluator: Default {
    /// Scores a position from the perspective of its side to move.
    fn evaluate(&self, pos: &Position) -> Score;
}

/// Evaluates a position with the default evaluator.
pub fn evaluate(pos: &Position) -> Score {
    MaterialEvaluator::new().evaluate(pos)
}
