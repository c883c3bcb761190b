// src/config.rs
use serde::Deserialize;

/// Linear weights of the discard score. Policy constants, tune freely.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Per shanten step of the hand left after the discard.
    pub shanten: f32,
    /// Per effective kind.
    pub effective_kinds: f32,
    /// Per unseen copy of the effective kinds.
    pub effective_supply: f32,
    /// Times the danger of the discarded tile.
    pub danger: f32,
    /// Times the expected-score heuristic (points scale, hence tiny).
    pub expected_score: f32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            shanten: -1.5,
            effective_kinds: 0.3,
            effective_supply: 0.2,
            danger: -0.7,
            expected_score: 0.0001,
        }
    }
}

/// Constants of the danger heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DangerParams {
    /// Discount per same-kind copy in a ready opponent's river.
    pub genbutsu: f32,
    /// Discount per suji kind (rank ±3) in a ready opponent's river.
    pub suji: f32,
    /// Extra scale per additional ready opponent.
    pub multi_ready: f32,
    /// Discount per same-kind copy anywhere in the discards.
    pub visible_copy: f32,
    /// Flat discount for ranks 1 and 9.
    pub terminal: f32,
    /// Flat discount for ranks 2 and 8.
    pub near_terminal: f32,
    /// Flat discount for honors.
    pub honor: f32,
}

impl Default for DangerParams {
    fn default() -> Self {
        Self {
            genbutsu: 0.25,
            suji: 0.1,
            multi_ready: 0.2,
            visible_copy: 0.05,
            terminal: 0.2,
            near_terminal: 0.1,
            honor: 0.15,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub weights: EvalWeights,
    pub danger: DangerParams,
}
