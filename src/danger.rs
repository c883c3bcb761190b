// src/danger.rs
use crate::config::DangerParams;
use crate::snapshot::{DiscardHistory, NUM_OPPONENTS};
use crate::tiles::{Tile, NUM_KINDS};

/// Kinds three ranks away in the same suit. Honors have none.
fn suji_of(tile: Tile) -> impl Iterator<Item = Tile> {
    let id = tile.id() as i16;
    let rank = tile.rank().map(|r| r as i16);
    [-3i16, 3].into_iter().filter_map(move |d| {
        let r = rank? + d;
        (1..=9).contains(&r).then(|| Tile::ALL[(id + d) as usize])
    })
}

/// Heuristic chance, in [0, 1], that discarding `tile` deals into a ready
/// opponent.
pub fn danger(
    tile: Tile,
    history: &DiscardHistory,
    ready: &[bool; NUM_OPPONENTS],
    params: &DangerParams,
) -> f32 {
    let mut danger = 0.0f32;

    let ready_count = ready.iter().filter(|&&r| r).count();
    if ready_count > 0 {
        for (opp, _) in ready.iter().enumerate().filter(|(_, r)| **r) {
            let river = history.river(opp);
            let genbutsu = river.iter().filter(|t| t.kind() == tile).count() as f32;
            let suji = suji_of(tile)
                .filter(|&s| river.iter().any(|t| t.kind() == s))
                .count() as f32;
            let against = 1.0 - params.genbutsu * genbutsu - params.suji * suji;
            danger = danger.max(against);
        }
        danger *= 1.0 + params.multi_ready * (ready_count - 1) as f32;
    }

    let seen = history.all().filter(|t| t.kind() == tile).count() as f32;
    danger -= params.visible_copy * seen;

    danger -= match tile.rank() {
        Some(1 | 9) => params.terminal,
        Some(2 | 8) => params.near_terminal,
        Some(_) => 0.0,
        None => params.honor,
    };

    danger.clamp(0.0, 1.0)
}

/// Danger of every kind, in id order.
pub fn danger_table(
    history: &DiscardHistory,
    ready: &[bool; NUM_OPPONENTS],
    params: &DangerParams,
) -> [f32; NUM_KINDS] {
    let mut out = [0.0f32; NUM_KINDS];
    for t in Tile::ALL {
        out[t.index()] = danger(t, history, ready, params);
    }
    out
}
