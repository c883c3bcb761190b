// src/discard.rs
use std::fmt;

use ahash::AHashMap;

use crate::config::{EvalConfig, EvalWeights};
use crate::danger::danger;
use crate::error::{EvalError, Result};
use crate::shanten::shanten;
use crate::snapshot::RoundSnapshot;
use crate::tiles::{Tile, TileInstance, NUM_KINDS};
use crate::ukeire::ukeire;

/// One scored discard option.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscardCandidate {
    pub instance: TileInstance,
    /// Shanten of the hand left behind.
    pub shanten: i8,
    /// Effective kinds of the remainder with their unseen copies.
    pub effective: Vec<(Tile, u8)>,
    pub supply: u32,
    pub danger: f32,
    pub expected_score: u32,
    pub score: f32,
}

impl DiscardCandidate {
    pub fn tile(&self) -> Tile {
        self.instance.kind()
    }
}

impl fmt::Display for DiscardCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.instance)?;
        match self.shanten {
            -1 => f.write_str("complete")?,
            0 => f.write_str("tenpai")?,
            n => write!(f, "{n}-shanten")?,
        }
        write!(
            f,
            ", {} kinds / {} tiles, danger {:.2}",
            self.effective.len(),
            self.supply,
            self.danger
        )
    }
}

fn combine(w: &EvalWeights, c: &DiscardCandidate) -> f32 {
    w.shanten * c.shanten as f32
        + w.effective_kinds * c.effective.len() as f32
        + w.effective_supply * c.supply as f32
        + w.danger * c.danger
        + w.expected_score * c.expected_score as f32
}

/// Rough point value of the concealed shape: pairs, triplets, chain windows,
/// honor triplets and dora copies. A placeholder until real yaku scoring.
pub fn expected_score(counts: &[u8; NUM_KINDS], dora_indicators: &[TileInstance]) -> u32 {
    let mut score = 1000;
    for &c in counts {
        if c >= 2 {
            score += 100;
        }
        if c >= 3 {
            score += 400;
        }
    }
    for suit in 0..3 {
        let ranks = &counts[suit * 9..suit * 9 + 9];
        score += 300 * ranks.windows(3).filter(|w| w.iter().all(|&c| c > 0)).count() as u32;
    }
    score += 1000 * counts[27..].iter().filter(|&&c| c >= 3).count() as u32;
    for ind in dora_indicators {
        score += 1000 * counts[ind.kind().dora_successor().index()] as u32;
    }
    score
}

fn evaluate_kind(
    snapshot: &RoundSnapshot,
    instance: TileInstance,
    visible: &[u8; NUM_KINDS],
    config: &EvalConfig,
) -> Result<DiscardCandidate> {
    let tile = instance.kind();
    let rest = snapshot
        .hand()
        .with_removed(tile)
        .ok_or_else(|| EvalError::InvalidHand(format!("{tile} listed but not held")))?;
    // the thrown copy lands in our river, so it is no longer unseen
    let mut seen = *visible;
    seen[tile.index()] = seen[tile.index()].saturating_add(1);
    let accept = ukeire(&rest, &seen)?;
    let mut candidate = DiscardCandidate {
        instance,
        shanten: shanten(&rest),
        effective: accept.kinds,
        supply: accept.total,
        danger: danger(
            tile,
            &snapshot.discards,
            &snapshot.opponents_ready,
            &config.danger,
        ),
        expected_score: expected_score(&rest.concealed().to_array(), &snapshot.dora_indicators),
        score: 0.0,
    };
    candidate.score = combine(&config.weights, &candidate);
    Ok(candidate)
}

/// Scores discarding each tile of the hand, in hand order.
///
/// Copies of the same kind leave the same remainder, so each kind is scored
/// once and shared.
pub fn evaluate_discards(
    snapshot: &RoundSnapshot,
    config: &EvalConfig,
) -> Result<Vec<DiscardCandidate>> {
    let visible = snapshot.discards.visible_counts();
    let mut by_kind: AHashMap<Tile, DiscardCandidate> = AHashMap::new();
    let mut out = Vec::with_capacity(snapshot.hand_tiles().len());
    for &instance in snapshot.hand_tiles() {
        let candidate = match by_kind.get(&instance.kind()) {
            Some(c) => DiscardCandidate { instance, ..c.clone() },
            None => {
                let c = evaluate_kind(snapshot, instance, &visible, config)?;
                by_kind.insert(instance.kind(), c.clone());
                c
            }
        };
        log::trace!("candidate {candidate} score {:.3}", candidate.score);
        out.push(candidate);
    }
    Ok(out)
}

/// The highest-scoring discard. Ties keep the earliest tile in hand order.
/// Scores compare by `f32::total_cmp`, the same order `Advice::ranking` uses.
pub fn best_discard(snapshot: &RoundSnapshot, config: &EvalConfig) -> Result<DiscardCandidate> {
    pick_best(evaluate_discards(snapshot, config)?)
}

pub(crate) fn pick_best(candidates: Vec<DiscardCandidate>) -> Result<DiscardCandidate> {
    let mut best: Option<DiscardCandidate> = None;
    for c in candidates {
        if best.as_ref().map_or(true, |b| c.score.total_cmp(&b.score).is_gt()) {
            best = Some(c);
        }
    }
    let best = best.ok_or(EvalError::EmptyHand)?;
    log::debug!("best discard {best} score {:.3}", best.score);
    Ok(best)
}
