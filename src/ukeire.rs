// src/ukeire.rs
use crate::error::Result;
use crate::hand::{Hand, MAX_HAND_SLOTS};
use crate::shanten::shanten;
use crate::tiles::{Tile, NUM_KINDS};

/// Effective kinds paired with how many copies are still unseen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ukeire {
    pub kinds: Vec<(Tile, u8)>,
    pub total: u32,
}

/// Kinds that lower the hand's shanten when drawn, in id order.
///
/// While the drawn tile still fits the 14-tile shape it is simply added:
/// a 3n+2 hand's shanten already assumes its best discard, or is -1 when the
/// draw completes it. A full hand has to let a tile go for the draw, so every
/// concealed kind is tried as the discard.
pub fn effective_tiles(hand: &Hand) -> Result<Vec<Tile>> {
    let current = shanten(hand);
    let mut out = Vec::new();
    for tile in Tile::ALL {
        if hand.held(tile) >= 4 {
            continue;
        }
        if improves(hand, tile, current)? {
            out.push(tile);
        }
    }
    Ok(out)
}

fn improves(hand: &Hand, tile: Tile, current: i8) -> Result<bool> {
    if hand.slots() < MAX_HAND_SLOTS {
        return Ok(shanten(&hand.with_added(tile)?) < current);
    }
    for (discard, _) in hand.concealed().iter() {
        if discard == tile {
            continue;
        }
        if let Some(rest) = hand.with_removed(discard) {
            if shanten(&rest.with_added(tile)?) < current {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Unseen copies of every kind: four, less the hand, its melds and `visible`.
pub fn remaining_supply(hand: &Hand, visible: &[u8; NUM_KINDS]) -> [u8; NUM_KINDS] {
    let mut out = [0u8; NUM_KINDS];
    for t in Tile::ALL {
        out[t.index()] = 4u8
            .saturating_sub(hand.held(t))
            .saturating_sub(visible[t.index()]);
    }
    out
}

pub fn ukeire(hand: &Hand, visible: &[u8; NUM_KINDS]) -> Result<Ukeire> {
    let supply = remaining_supply(hand, visible);
    let kinds: Vec<(Tile, u8)> = effective_tiles(hand)?
        .into_iter()
        .map(|t| (t, supply[t.index()]))
        .collect();
    let total = kinds.iter().map(|&(_, c)| c as u32).sum();
    Ok(Ukeire { kinds, total })
}
