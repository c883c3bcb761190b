// src/shanten.rs
//! Shanten over the three winning shapes.
//!
//! The standard shape is searched exhaustively: every suit (and the honor
//! group, which has no chains) is decomposed on its own, trying every block
//! that can start at the lowest remaining tile, memoized on the residual
//! counts. The per-group results are sets of reachable
//! `(sets, partials, head)` states, folded together at the end.

use ahash::AHashMap;

use crate::error::Result;
use crate::hand::{Hand, Meld, TileCounts};
use crate::tiles::{Tile, NUM_KINDS};

/// Shanten of a hand left with no tiles and no melds.
pub const MAX_SHANTEN: i8 = 8;

const CAP: u8 = 4;

/// Reachable `(sets, partials, head)` states as a bitmask.
/// Sets and partials are capped at 4, head is 0 or 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Reach(u64);

impl Reach {
    const NOTHING_LEFT: Reach = Reach(1);

    #[inline]
    fn bit(sets: u8, partials: u8, head: u8) -> u64 {
        1u64 << ((sets.min(CAP) as u32 * 5 + partials.min(CAP) as u32) * 2 + head as u32)
    }

    fn single(sets: u8, partials: u8, head: u8) -> Self {
        Reach(Self::bit(sets, partials, head))
    }

    fn states(self) -> impl Iterator<Item = (u8, u8, u8)> {
        (0..50u32)
            .filter(move |i| self.0 & (1 << i) != 0)
            .map(|i| ((i / 2 / 5) as u8, (i / 2 % 5) as u8, (i % 2) as u8))
    }

    /// Every state plus one more block.
    fn shifted(self, sets: u8, partials: u8, head: u8) -> Self {
        let mut out = Reach(0);
        for (s, p, h) in self.states() {
            if h + head <= 1 {
                out.0 |= Self::bit(s + sets, p + partials, h + head);
            }
        }
        out
    }

    /// Blocks of two disjoint groups taken together.
    fn combine(self, other: Reach) -> Self {
        let mut out = Reach(0);
        for (s1, p1, h1) in self.states() {
            for (s2, p2, h2) in other.states() {
                if h1 + h2 <= 1 {
                    out.0 |= Self::bit(s1 + s2, p1 + p2, h1 + h2);
                }
            }
        }
        out
    }

    /// Best standard-shape shanten over the reachable states.
    fn shanten(self) -> i8 {
        self.states()
            .map(|(s, p, h)| {
                let (s, p, h) = (s as i8, p as i8, h as i8);
                8 - 2 * s - p.min(4 - s) - h
            })
            .min()
            .unwrap_or(MAX_SHANTEN)
    }
}

/// Exhaustive block decomposition of one group of at most nine kinds.
#[derive(Default)]
struct Decomposer {
    memo: AHashMap<u32, Reach>,
}

impl Decomposer {
    fn key(counts: &[u8; 9], runs: bool) -> u32 {
        let packed = counts
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &c)| acc | (c as u32) << (i * 3));
        packed | (runs as u32) << 27
    }

    fn explore(&mut self, counts: &mut [u8; 9], runs: bool) -> Reach {
        let Some(i) = counts.iter().position(|&c| c > 0) else {
            return Reach::NOTHING_LEFT;
        };
        let key = Self::key(counts, runs);
        if let Some(&hit) = self.memo.get(&key) {
            return hit;
        }

        // lowest tile left isolated
        counts[i] -= 1;
        let mut reach = self.explore(counts, runs);
        counts[i] += 1;

        if counts[i] >= 3 {
            counts[i] -= 3;
            reach.0 |= self.explore(counts, runs).shifted(1, 0, 0).0;
            counts[i] += 3;
        }
        if counts[i] >= 2 {
            counts[i] -= 2;
            let rest = self.explore(counts, runs);
            reach.0 |= rest.shifted(0, 0, 1).0 | rest.shifted(0, 1, 0).0;
            counts[i] += 2;
        }
        if runs {
            if i + 2 < 9 && counts[i + 1] > 0 && counts[i + 2] > 0 {
                counts[i] -= 1;
                counts[i + 1] -= 1;
                counts[i + 2] -= 1;
                reach.0 |= self.explore(counts, runs).shifted(1, 0, 0).0;
                counts[i] += 1;
                counts[i + 1] += 1;
                counts[i + 2] += 1;
            }
            for gap in [1, 2] {
                if i + gap < 9 && counts[i + gap] > 0 {
                    counts[i] -= 1;
                    counts[i + gap] -= 1;
                    reach.0 |= self.explore(counts, runs).shifted(0, 1, 0).0;
                    counts[i] += 1;
                    counts[i + gap] += 1;
                }
            }
        }

        self.memo.insert(key, reach);
        reach
    }
}

/// Per-family shanten. A family is `None` when melds make it unreachable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShantenBreakdown {
    pub standard: i8,
    pub seven_pairs: Option<i8>,
    pub thirteen_orphans: Option<i8>,
}

impl ShantenBreakdown {
    pub fn min(&self) -> i8 {
        [Some(self.standard), self.seven_pairs, self.thirteen_orphans]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(self.standard)
    }
}

fn standard_shanten(counts: &[u8; NUM_KINDS], melds: usize) -> i8 {
    let mut decomposer = Decomposer::default();
    let mut reach = Reach::single(melds as u8, 0, 0);
    for suit in 0..3 {
        let mut group = [0u8; 9];
        group.copy_from_slice(&counts[suit * 9..suit * 9 + 9]);
        reach = reach.combine(decomposer.explore(&mut group, true));
    }
    let mut honors = [0u8; 9];
    honors[..7].copy_from_slice(&counts[27..]);
    reach = reach.combine(decomposer.explore(&mut honors, false));
    reach.shanten()
}

fn seven_pairs_shanten(counts: &[u8; NUM_KINDS]) -> i8 {
    let pairs = counts.iter().filter(|&&c| c >= 2).count() as i8;
    let kinds = counts.iter().filter(|&&c| c > 0).count() as i8;
    // a quad is one pair, not two
    6 - pairs + (7 - kinds).max(0)
}

fn thirteen_orphans_shanten(counts: &[u8; NUM_KINDS]) -> i8 {
    let mut distinct = 0;
    let mut has_pair = false;
    for t in Tile::TERMINALS_AND_HONORS {
        let c = counts[t.index()];
        if c > 0 {
            distinct += 1;
        }
        if c >= 2 {
            has_pair = true;
        }
    }
    13 - distinct - has_pair as i8
}

fn breakdown_of(counts: &[u8; NUM_KINDS], melds: usize) -> ShantenBreakdown {
    let closed = melds == 0;
    ShantenBreakdown {
        standard: standard_shanten(counts, melds),
        seven_pairs: closed.then(|| seven_pairs_shanten(counts)),
        thirteen_orphans: closed.then(|| thirteen_orphans_shanten(counts)),
    }
}

pub fn shanten_breakdown(hand: &Hand) -> ShantenBreakdown {
    breakdown_of(&hand.concealed().to_array(), hand.melds().len())
}

pub fn shanten(hand: &Hand) -> i8 {
    shanten_breakdown(hand).min()
}

pub fn is_tenpai(hand: &Hand) -> bool {
    shanten(hand) == 0
}

/// Shanten of a raw 34-slot count array, validated like a `Hand`.
pub fn shanten_of_counts(counts: &[u8; NUM_KINDS], melds: &[Meld]) -> Result<i8> {
    let hand = Hand::new(TileCounts::from_array(counts)?, melds.to_vec())?;
    Ok(shanten(&hand))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::tiles::{Tile::*, TileInstance};
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    pub(crate) fn hand_of(tiles: &[Tile]) -> Hand {
        hand_with_melds(tiles, &[])
    }

    pub(crate) fn hand_with_melds(tiles: &[Tile], melds: &[Meld]) -> Hand {
        let mut counts = TileCounts::default();
        for &t in tiles {
            counts.add(t).unwrap();
        }
        Hand::new(counts, melds.to_vec()).unwrap()
    }

    /// Deals `n` tiles from a freshly shuffled 136-tile wall.
    pub(crate) fn deal(rng: &mut StdRng, n: usize) -> Vec<TileInstance> {
        let mut wall: Vec<TileInstance> = (0u8..136)
            .map(|id| TileInstance::try_from(id).unwrap())
            .collect();
        wall.shuffle(rng);
        wall.truncate(n);
        wall
    }

    /// Recursively try to peel off sets (triplets or sequences).
    fn can_form_melds(counts: &mut [u8; 34]) -> bool {
        let Some(i) = counts.iter().position(|&c| c > 0) else {
            return true;
        };
        if counts[i] >= 3 {
            counts[i] -= 3;
            if can_form_melds(counts) {
                return true;
            }
            counts[i] += 3;
        }
        let suit = i / 9;
        let idx = i % 9;
        if suit < 3 && idx <= 6 && counts[i + 1] > 0 && counts[i + 2] > 0 {
            counts[i] -= 1;
            counts[i + 1] -= 1;
            counts[i + 2] -= 1;
            if can_form_melds(counts) {
                return true;
            }
            counts[i] += 1;
            counts[i + 1] += 1;
            counts[i + 2] += 1;
        }
        false
    }

    /// Independent win check for a closed 14-tile hand.
    fn is_winning(counts: &[u8; 34]) -> bool {
        if counts.iter().filter(|&&c| c == 2).count() == 7 {
            return true;
        }
        let orphans = Tile::TERMINALS_AND_HONORS;
        if orphans.iter().all(|t| counts[t.index()] > 0)
            && counts.iter().sum::<u8>() == orphans.iter().map(|t| counts[t.index()]).sum::<u8>()
        {
            return true;
        }
        (0..34).any(|i| {
            if counts[i] < 2 {
                return false;
            }
            let mut c2 = *counts;
            c2[i] -= 2;
            can_form_melds(&mut c2)
        })
    }

    #[test]
    fn complete_standard_hand() {
        let h = hand_of(&[
            Man1, Man2, Man3, Pin4, Pin5, Pin6, Sou7, Sou8, Sou9, Pin1, Pin2, Pin3, East, East,
        ]);
        assert_eq!(shanten(&h), -1);
        assert_eq!(shanten_breakdown(&h).standard, -1);
    }

    #[test]
    fn tenpai_on_single_wait() {
        let h = hand_of(&[
            Man1, Man2, Man3, Pin4, Pin5, Pin6, Sou7, Sou8, Sou9, Pin1, Pin2, Pin3, East,
        ]);
        assert_eq!(shanten(&h), 0);
        assert!(is_tenpai(&h));
    }

    #[test]
    fn shanpon_scenario() {
        let h = hand_of(&[
            Man1, Man2, Man3, Pin2, Pin3, Pin4, Sou5, Sou5, Sou5, East, East, White, White,
        ]);
        assert_eq!(shanten(&h), 0);
    }

    #[test]
    fn triplet_first_greedy_would_miss_this() {
        // 11123m reads as pair + chain; taking 111m first strands 23m
        let h = hand_of(&[
            Man1, Man1, Man1, Man2, Man3, Pin4, Pin5, Pin6, Pin7, Pin8, Pin9, Sou5, Sou5, Sou5,
        ]);
        assert_eq!(shanten(&h), -1);
    }

    #[test]
    fn chain_first_would_miss_this() {
        // 123m 333m 55p ... : chain-then-triplet must be found with 3m shared
        let h = hand_of(&[
            Man1, Man2, Man3, Man3, Man3, Man3, Pin5, Pin5, Sou1, Sou2, Sou3, Red, Red, Red,
        ]);
        assert_eq!(shanten(&h), -1);
    }

    #[test]
    fn seven_pairs_complete() {
        let h = hand_of(&[
            Man1, Man1, Man9, Man9, Pin2, Pin2, Pin7, Pin7, East, East, South, South, White, White,
        ]);
        let b = shanten_breakdown(&h);
        assert_eq!(b.seven_pairs, Some(-1));
        assert!(b.standard > -1);
        assert_eq!(shanten(&h), -1);
    }

    #[test]
    fn quad_is_not_two_pairs() {
        let h = hand_of(&[
            Man1, Man1, Man1, Man1, Man9, Man9, Pin2, Pin2, Pin7, Pin7, East, East, South,
        ]);
        // five kinds paired, six kinds in hand
        assert_eq!(shanten_breakdown(&h).seven_pairs, Some(2));
    }

    #[test]
    fn thirteen_orphans() {
        let mut tiles = Tile::TERMINALS_AND_HONORS.to_vec();
        let h = hand_of(&tiles);
        assert_eq!(shanten_breakdown(&h).thirteen_orphans, Some(0));
        tiles.push(Red);
        assert_eq!(shanten(&hand_of(&tiles)), -1);
        tiles.pop();
        tiles.pop();
        tiles.push(Man5);
        assert_eq!(shanten_breakdown(&hand_of(&tiles)).thirteen_orphans, Some(1));
    }

    #[test]
    fn melds_exclude_closed_families() {
        let h = hand_with_melds(
            &[Man1, Man1, Man9, Man9, Pin2, Pin2, Pin7, Pin7, East, East, South],
            &[Meld::pon(Red)],
        );
        let b = shanten_breakdown(&h);
        assert_eq!(b.seven_pairs, None);
        assert_eq!(b.thirteen_orphans, None);
        assert_eq!(shanten(&h), b.standard);
    }

    #[test]
    fn melds_count_as_sets() {
        let h = hand_with_melds(
            &[Man2, Man3, Man4, East, East],
            &[Meld::pon(Red), Meld::chi(Pin1).unwrap(), Meld::kan(Sou9)],
        );
        assert_eq!(shanten(&h), -1);

        let single = hand_with_melds(
            &[Green],
            &[Meld::pon(Red), Meld::pon(White), Meld::pon(East), Meld::pon(South)],
        );
        assert_eq!(shanten(&single), 0);
    }

    #[test]
    fn empty_hand() {
        assert_eq!(shanten(&Hand::default()), MAX_SHANTEN);
    }

    #[test]
    fn scattered_hand() {
        // no two tiles relate: the standard family needs eight more
        let h = hand_of(&[
            Man1, Man4, Man7, Pin1, Pin4, Pin7, Sou1, Sou4, Sou7, East, South, West, North,
        ]);
        assert_eq!(shanten_breakdown(&h).standard, 8);
        // seven pairs and thirteen orphans both sit at six
        assert_eq!(shanten(&h), 6);
    }

    #[test]
    fn raw_counts_are_validated() {
        let mut counts = [0u8; 34];
        counts[0] = 5;
        assert!(matches!(shanten_of_counts(&counts, &[]), Err(EvalError::InvalidHand(_))));

        let mut counts = [0u8; 34];
        for c in counts.iter_mut().take(15) {
            *c = 1;
        }
        assert!(matches!(shanten_of_counts(&counts, &[]), Err(EvalError::InvalidHand(_))));

        let mut counts = [0u8; 34];
        counts[27] = 2;
        assert!(shanten_of_counts(&counts, &[Meld::pon(East)]).is_err());
        assert_eq!(shanten_of_counts(&counts, &[Meld::pon(South)]).unwrap(), 5);
    }

    #[test]
    fn random_complete_hands_agree_with_win_check() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..3000 {
            let tiles = deal(&mut rng, 14);
            let hand = Hand::from_instances(&tiles, &[]).unwrap();
            let counts = hand.concealed().to_array();
            assert_eq!(
                shanten(&hand) == -1,
                is_winning(&counts),
                "win check disagrees on {counts:?}"
            );
        }
        // dealt hands are almost never complete, so also build some
        for seed in 0..300 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut counts = [0u8; 34];
            let mut sets = 0;
            while sets < 4 {
                let kind = *Tile::ALL.choose(&mut rng).unwrap();
                let take_chain = kind.rank().is_some_and(|r| r <= 7) && seed % 2 == 0;
                let needed: Vec<usize> = if take_chain {
                    (0..3).map(|d| kind.index() + d).collect()
                } else {
                    vec![kind.index(); 3]
                };
                let mut trial = counts;
                needed.iter().for_each(|&k| trial[k] += 1);
                if trial.iter().all(|&c| c <= 4) {
                    counts = trial;
                    sets += 1;
                }
            }
            let head = Tile::ALL.iter().find(|t| counts[t.index()] <= 2).unwrap();
            counts[head.index()] += 2;
            assert!(is_winning(&counts));
            assert_eq!(shanten_of_counts(&counts, &[]).unwrap(), -1, "{counts:?}");
        }
    }

    #[test]
    fn a_draw_lowers_shanten_by_at_most_one() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let tiles = deal(&mut rng, 14);
            let (base, drawn) = tiles.split_at(13);
            let before = shanten(&Hand::from_instances(base, &[]).unwrap());
            let after = shanten(&Hand::from_instances(&tiles, &[]).unwrap());
            assert!(after <= before, "a draw never hurts");
            assert!(after >= before - 1, "{before} -> {after} after drawing {}", drawn[0]);
        }
    }

    #[test]
    fn full_hand_matches_its_best_discard() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..300 {
            let hand = Hand::from_instances(&deal(&mut rng, 14), &[]).unwrap();
            let full = shanten(&hand);
            if full == -1 {
                continue;
            }
            let best = hand
                .concealed()
                .iter()
                .filter_map(|(t, _)| hand.with_removed(t))
                .map(|h| shanten(&h))
                .min()
                .unwrap();
            assert_eq!(full, best);
        }
    }
}
