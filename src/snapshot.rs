// src/snapshot.rs
use crate::error::Result;
use crate::hand::{Hand, Meld};
use crate::tiles::{instances_from_ids, TileInstance, NUM_KINDS};

pub const NUM_OPPONENTS: usize = 3;

/// Rivers of one round, relative to the advised player.
/// `opponents` runs shimocha, toimen, kamicha.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscardHistory {
    pub own: Vec<TileInstance>,
    pub opponents: [Vec<TileInstance>; NUM_OPPONENTS],
}

impl DiscardHistory {
    /// Builds the history from raw classifier ids.
    pub fn from_ids(own: &[u8], opponents: [&[u8]; NUM_OPPONENTS]) -> Result<Self> {
        Ok(Self {
            own: instances_from_ids(own)?,
            opponents: [
                instances_from_ids(opponents[0])?,
                instances_from_ids(opponents[1])?,
                instances_from_ids(opponents[2])?,
            ],
        })
    }

    /// Every discarded tile, own river first.
    pub fn all(&self) -> impl Iterator<Item = TileInstance> + '_ {
        self.own
            .iter()
            .chain(self.opponents.iter().flatten())
            .copied()
    }

    pub fn river(&self, opponent: usize) -> &[TileInstance] {
        &self.opponents[opponent]
    }

    pub fn visible_counts(&self) -> [u8; NUM_KINDS] {
        let mut counts = [0u8; NUM_KINDS];
        for t in self.all() {
            counts[t.kind().index()] = counts[t.kind().index()].saturating_add(1);
        }
        counts
    }
}

/// Everything one polling tick knows about the round. Built fresh by the
/// caller each tick and only ever read by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSnapshot {
    hand: Vec<TileInstance>,
    melds: Vec<Meld>,
    // counts view of `hand` + `melds`, validated once
    parsed: Hand,
    pub dora_indicators: Vec<TileInstance>,
    pub discards: DiscardHistory,
    pub opponents_ready: [bool; NUM_OPPONENTS],
}

impl RoundSnapshot {
    pub fn new(hand: Vec<TileInstance>, melds: Vec<Meld>) -> Result<Self> {
        let parsed = Hand::from_instances(&hand, &melds)?;
        Ok(Self {
            hand,
            melds,
            parsed,
            dora_indicators: Vec::new(),
            discards: DiscardHistory::default(),
            opponents_ready: [false; NUM_OPPONENTS],
        })
    }

    pub fn with_dora_indicators(mut self, indicators: Vec<TileInstance>) -> Self {
        self.dora_indicators = indicators;
        self
    }

    pub fn with_discards(mut self, discards: DiscardHistory) -> Self {
        self.discards = discards;
        self
    }

    pub fn with_opponents_ready(mut self, ready: [bool; NUM_OPPONENTS]) -> Self {
        self.opponents_ready = ready;
        self
    }

    /// The hand in the order the classifier reported it.
    pub fn hand_tiles(&self) -> &[TileInstance] {
        &self.hand
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    pub fn hand(&self) -> &Hand {
        &self.parsed
    }
}
