// src/lib.rs
//! Hand evaluation for a riichi mahjong advisor overlay: shanten, effective
//! tiles, deal-in danger and a ranked discard recommendation.
//!
//! Every entry point is a pure function of its inputs. The caller builds a
//! fresh [`RoundSnapshot`] per polling tick from the tile classifier's output.

mod config;
mod danger;
mod discard;
mod error;
mod hand;
mod shanten;
mod snapshot;
mod tiles;
mod ukeire;

#[cfg(feature = "python")]
mod python;

pub use config::{DangerParams, EvalConfig, EvalWeights};
pub use danger::{danger, danger_table};
pub use discard::{best_discard, evaluate_discards, expected_score, DiscardCandidate};
pub use error::{EvalError, Result};
pub use hand::{meld_counts, Hand, Meld, MeldKind, TileCounts, MAX_HAND_SLOTS, MAX_MELDS};
pub use shanten::{
    is_tenpai, shanten, shanten_breakdown, shanten_of_counts, ShantenBreakdown, MAX_SHANTEN,
};
pub use snapshot::{DiscardHistory, RoundSnapshot, NUM_OPPONENTS};
pub use tiles::{instances_from_ids, Suit, Tile, TileInstance, NUM_INSTANCES, NUM_KINDS};
pub use ukeire::{effective_tiles, remaining_supply, ukeire, Ukeire};

/// Structured recommendation for one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Advice {
    /// Shanten of the hand as held.
    pub shanten: i8,
    pub best: DiscardCandidate,
    /// Every candidate, best first. Equal scores keep hand order.
    pub ranking: Vec<DiscardCandidate>,
}

/// The evaluation operations under one configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Advisor {
    config: EvalConfig,
}

impl Advisor {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn shanten(&self, hand: &[u8], melds: &[Meld]) -> Result<i8> {
        Ok(shanten(&parse_hand(hand, melds)?))
    }

    pub fn effective_tiles(&self, hand: &[u8], melds: &[Meld]) -> Result<Vec<Tile>> {
        effective_tiles(&parse_hand(hand, melds)?)
    }

    /// Best discard with its score. Nobody is treated as ready.
    pub fn best_discard(
        &self,
        hand: &[u8],
        dora_indicators: &[u8],
        discards: &DiscardHistory,
        melds: &[Meld],
    ) -> Result<(TileInstance, f32)> {
        let snapshot = RoundSnapshot::new(instances_from_ids(hand)?, melds.to_vec())?
            .with_dora_indicators(instances_from_ids(dora_indicators)?)
            .with_discards(discards.clone());
        let best = best_discard(&snapshot, &self.config)?;
        Ok((best.instance, best.score))
    }

    /// Danger of the kind with id `tile` (0..34).
    pub fn danger(
        &self,
        tile: u8,
        discards: &DiscardHistory,
        ready: &[bool; NUM_OPPONENTS],
    ) -> Result<f32> {
        let tile = Tile::try_from(tile)?;
        Ok(danger(tile, discards, ready, &self.config.danger))
    }

    pub fn advise(&self, snapshot: &RoundSnapshot) -> Result<Advice> {
        let mut ranking = evaluate_discards(snapshot, &self.config)?;
        // stable, so equal scores stay in hand order
        ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
        let best = ranking.first().cloned().ok_or(EvalError::EmptyHand)?;
        log::debug!("advised {best} score {:.3}", best.score);
        Ok(Advice {
            shanten: shanten(snapshot.hand()),
            best,
            ranking,
        })
    }
}

fn parse_hand(hand: &[u8], melds: &[Meld]) -> Result<Hand> {
    Hand::from_instances(&instances_from_ids(hand)?, melds)
}

/// Shanten of a hand given as classifier instance ids.
pub fn compute_shanten(hand: &[u8], melds: &[Meld]) -> Result<i8> {
    Advisor::default().shanten(hand, melds)
}

/// Effective kinds of a hand given as classifier instance ids, by id.
pub fn compute_effective_tiles(hand: &[u8], melds: &[Meld]) -> Result<Vec<Tile>> {
    Advisor::default().effective_tiles(hand, melds)
}

pub fn compute_best_discard(
    hand: &[u8],
    dora_indicators: &[u8],
    discards: &DiscardHistory,
    melds: &[Meld],
) -> Result<(TileInstance, f32)> {
    Advisor::default().best_discard(hand, dora_indicators, discards, melds)
}

pub fn compute_danger(
    tile: u8,
    discards: &DiscardHistory,
    ready: &[bool; NUM_OPPONENTS],
) -> Result<f32> {
    Advisor::default().danger(tile, discards, ready)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::Tile::*;

    // 1m 2m 3m 2p 3p 4p 5s 5s 5s E E P P
    const SHANPON: [u8; 13] = [0, 4, 8, 40, 44, 48, 88, 89, 90, 108, 109, 124, 125];

    #[test]
    fn shanpon_scenario() {
        assert_eq!(compute_shanten(&SHANPON, &[]), Ok(0));
        assert_eq!(compute_effective_tiles(&SHANPON, &[]), Ok(vec![East, White]));
    }

    #[test]
    fn complete_hands() {
        let mut won = SHANPON.to_vec();
        won.push(126); // third White
        assert_eq!(compute_shanten(&won, &[]), Ok(-1));

        // seven distinct pairs
        let pairs: Vec<u8> = [0u8, 2, 10, 15, 20, 27, 33]
            .iter()
            .flat_map(|&k| [k * 4, k * 4 + 1])
            .collect();
        assert_eq!(compute_shanten(&pairs, &[]), Ok(-1));
    }

    #[test]
    fn bad_input_is_an_error() {
        assert!(matches!(compute_shanten(&[200], &[]), Err(EvalError::InvalidTile(_))));
        assert!(matches!(compute_shanten(&[0, 0], &[]), Err(EvalError::InvalidHand(_))));
        let fifteen: Vec<u8> = (0..15).map(|k| k * 4).collect();
        assert!(matches!(
            compute_effective_tiles(&fifteen, &[]),
            Err(EvalError::InvalidHand(_))
        ));
        assert!(matches!(
            compute_danger(34, &DiscardHistory::default(), &[false; 3]),
            Err(EvalError::InvalidTile(_))
        ));
        assert_eq!(
            compute_best_discard(&[], &[], &DiscardHistory::default(), &[]),
            Err(EvalError::EmptyHand)
        );
        // melds add their copies to the per-kind limit
        assert!(matches!(
            compute_shanten(&[0, 1], &[Meld::pon(Man1)]),
            Err(EvalError::InvalidHand(_))
        ));
    }

    #[test]
    fn single_tile_best_discard() {
        let (tile, _) = compute_best_discard(&[77], &[], &DiscardHistory::default(), &[]).unwrap();
        assert_eq!(tile.id(), 77);
    }

    #[test]
    fn danger_baseline_and_range() {
        let empty = DiscardHistory::default();
        for kind in 0..NUM_KINDS as u8 {
            assert_eq!(compute_danger(kind, &empty, &[false; 3]), Ok(0.0));
        }
        let history = DiscardHistory::from_ids(&[0, 1], [&[2, 40], &[100], &[]]).unwrap();
        for kind in 0..NUM_KINDS as u8 {
            let d = compute_danger(kind, &history, &[true, true, false]).unwrap();
            assert!((0.0..=1.0).contains(&d));
        }
    }

    #[test]
    fn calls_are_repeatable() {
        let history = DiscardHistory::from_ids(&[3, 57], [&[12], &[130, 99], &[]]).unwrap();
        let hand = [1u8, 5, 9, 41, 45, 60, 61, 92, 96, 100, 110, 111, 127, 132];
        let melds = [];
        assert_eq!(compute_shanten(&hand, &melds), compute_shanten(&hand, &melds));
        assert_eq!(
            compute_effective_tiles(&hand, &melds),
            compute_effective_tiles(&hand, &melds)
        );
        let a = compute_best_discard(&hand, &[20], &history, &melds).unwrap();
        let b = compute_best_discard(&hand, &[20], &history, &melds).unwrap();
        assert_eq!(a.0, b.0);
        assert_eq!(a.1.to_bits(), b.1.to_bits());
        let ready = [true, false, true];
        assert_eq!(
            compute_danger(4, &history, &ready).map(f32::to_bits),
            compute_danger(4, &history, &ready).map(f32::to_bits)
        );
    }

    #[test]
    fn advice_ranks_every_tile() {
        let mut ids = SHANPON.to_vec();
        ids.push(104); // 9s
        let snapshot = RoundSnapshot::new(instances_from_ids(&ids).unwrap(), vec![]).unwrap();
        let advisor = Advisor::new(EvalConfig {
            weights: EvalWeights { shanten: -100.0, ..EvalWeights::default() },
            ..EvalConfig::default()
        });
        let advice = advisor.advise(&snapshot).unwrap();
        assert_eq!(advice.shanten, 0);
        assert_eq!(advice.ranking.len(), 14);
        assert_eq!(advice.best.tile(), Sou9);
        assert_eq!(advice.ranking[0], advice.best);
        assert!(advice.ranking.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn advisor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Advisor>();
        assert_send_sync::<RoundSnapshot>();
    }
}
