// src/hand.rs
use crate::error::{EvalError, Result};
use crate::tiles::{Tile, TileInstance, NUM_KINDS};

/// Slots of the winning shape: four sets and a pair.
pub const MAX_HAND_SLOTS: usize = 14;
pub const MAX_MELDS: usize = 4;

/// Bit-packed multiset: 3 bits per tile kind (0–7 copies fits, 4 is enforced).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileCounts(u128);

impl TileCounts {
    pub fn add(&mut self, tile: Tile) -> Result<()> {
        let shift = tile.id() as u32 * 3;
        let mask = 0b111u128 << shift;
        let count = ((self.0 & mask) >> shift) + 1;
        if count > 4 {
            return Err(EvalError::InvalidHand(format!("more than 4 copies of {tile}")));
        }
        self.0 = (self.0 & !mask) | (count << shift);
        Ok(())
    }

    pub fn count(&self, tile: Tile) -> u8 {
        let shift = tile.id() as u32 * 3;
        ((self.0 >> shift) & 0b111) as u8
    }

    pub fn remove(&mut self, tile: Tile) -> bool {
        let shift = tile.id() as u32 * 3;
        let mask = 0b111u128 << shift;
        let count = (self.0 & mask) >> shift;
        if count == 0 {
            return false;
        }
        // decrement
        self.0 = (self.0 & !mask) | ((count - 1) << shift);
        true
    }

    pub fn len(&self) -> usize {
        self.iter().map(|(_, c)| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tile, u8)> + '_ {
        Tile::ALL.iter().filter_map(move |&t| {
            let c = self.count(t);
            (c > 0).then_some((t, c))
        })
    }

    pub fn to_array(&self) -> [u8; NUM_KINDS] {
        let mut counts = [0u8; NUM_KINDS];
        for (t, c) in self.iter() {
            counts[t.index()] = c;
        }
        counts
    }

    pub fn from_array(counts: &[u8; NUM_KINDS]) -> Result<Self> {
        let mut out = Self::default();
        for (t, &c) in Tile::ALL.iter().zip(counts) {
            for _ in 0..c {
                out.add(*t)?;
            }
        }
        Ok(out)
    }

    /// Kind counts of a list of physical tiles. The same instance twice is
    /// as invalid as a fifth copy.
    pub fn from_instances(tiles: &[TileInstance]) -> Result<Self> {
        let mut seen = [false; NUM_KINDS * 4];
        let mut out = Self::default();
        for &t in tiles {
            let slot = &mut seen[t.id() as usize];
            if *slot {
                return Err(EvalError::InvalidHand(format!("instance {} listed twice", t.id())));
            }
            *slot = true;
            out.add(t.kind())?;
        }
        Ok(out)
    }

    /// Copy indices are assigned `0..count` per kind.
    pub fn to_instances(&self) -> Vec<TileInstance> {
        self.iter()
            .flat_map(|(t, c)| t.instances().take(c as usize))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeldKind {
    /// Called chain; `Meld::base` is the lowest tile.
    Chi,
    Pon,
    /// Quad, open or concealed.
    Kan,
}

/// A called (or concealed-kan) set, fixed outside the free part of the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Meld {
    kind: MeldKind,
    base: Tile,
}

impl Meld {
    pub fn new(kind: MeldKind, base: Tile) -> Result<Self> {
        if kind == MeldKind::Chi && !matches!(base.rank(), Some(1..=7)) {
            return Err(EvalError::InvalidTile(format!("chi cannot start at {base}")));
        }
        Ok(Self { kind, base })
    }

    pub fn chi(base: Tile) -> Result<Self> {
        Self::new(MeldKind::Chi, base)
    }

    pub fn pon(tile: Tile) -> Self {
        Self { kind: MeldKind::Pon, base: tile }
    }

    pub fn kan(tile: Tile) -> Self {
        Self { kind: MeldKind::Kan, base: tile }
    }

    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    pub fn base(&self) -> Tile {
        self.base
    }

    /// The kinds locked in this meld, one entry per physical tile.
    pub fn tiles(&self) -> Vec<Tile> {
        let b = self.base.index();
        match self.kind {
            MeldKind::Chi => vec![Tile::ALL[b], Tile::ALL[b + 1], Tile::ALL[b + 2]],
            MeldKind::Pon => vec![self.base; 3],
            MeldKind::Kan => vec![self.base; 4],
        }
    }
}

/// Copies of each kind locked in melds.
pub fn meld_counts(melds: &[Meld]) -> [u8; NUM_KINDS] {
    let mut counts = [0u8; NUM_KINDS];
    for m in melds {
        for t in m.tiles() {
            counts[t.index()] += 1;
        }
    }
    counts
}

/// Concealed tiles plus fixed melds. Construction enforces the size invariant,
/// so every `Hand` can be evaluated without further checks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hand {
    concealed: TileCounts,
    melds: Vec<Meld>,
}

impl Hand {
    pub fn new(concealed: TileCounts, melds: Vec<Meld>) -> Result<Self> {
        check_size(concealed.len(), melds.len())?;
        let locked = meld_counts(&melds);
        for (t, &m) in Tile::ALL.iter().zip(locked.iter()) {
            if concealed.count(*t) + m > 4 {
                return Err(EvalError::InvalidHand(format!(
                    "{} copies of {t} between hand and melds",
                    concealed.count(*t) + m
                )));
            }
        }
        Ok(Self { concealed, melds })
    }

    pub fn from_instances(tiles: &[TileInstance], melds: &[Meld]) -> Result<Self> {
        Self::new(TileCounts::from_instances(tiles)?, melds.to_vec())
    }

    pub fn concealed(&self) -> &TileCounts {
        &self.concealed
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    /// Slots used of the 14-tile shape; each meld counts as three.
    pub fn slots(&self) -> usize {
        self.concealed.len() + 3 * self.melds.len()
    }

    /// Copies of `tile` the player can see in their own hand and melds.
    pub fn held(&self, tile: Tile) -> u8 {
        self.concealed.count(tile)
            + self.melds.iter().flat_map(|m| m.tiles()).filter(|&t| t == tile).count() as u8
    }

    /// This hand with one more concealed copy of `tile`.
    pub fn with_added(&self, tile: Tile) -> Result<Self> {
        let mut concealed = self.concealed;
        concealed.add(tile)?;
        Self::new(concealed, self.melds.clone())
    }

    /// This hand with one concealed copy of `tile` removed, if present.
    pub fn with_removed(&self, tile: Tile) -> Option<Self> {
        let mut concealed = self.concealed;
        concealed.remove(tile).then(|| Self { concealed, melds: self.melds.clone() })
    }
}

pub(crate) fn check_size(concealed: usize, melds: usize) -> Result<()> {
    if melds > MAX_MELDS {
        return Err(EvalError::InvalidHand(format!("{melds} melds")));
    }
    if concealed + 3 * melds > MAX_HAND_SLOTS {
        return Err(EvalError::InvalidHand(format!(
            "{concealed} concealed tiles with {melds} melds exceed {MAX_HAND_SLOTS}"
        )));
    }
    Ok(())
}
