// src/tiles.rs
use std::fmt;
use std::str::FromStr;

use crate::error::EvalError;

pub const NUM_KINDS: usize = 34;
pub const NUM_INSTANCES: usize = NUM_KINDS * 4;

const NOTATION: [&str; NUM_KINDS] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", // m
    "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", // p
    "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", // s
    "E", "S", "W", "N", "P", "F", "C", // z
];

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tile {
    Man1 = 0, Man2, Man3, Man4, Man5, Man6, Man7, Man8, Man9,
    Pin1, Pin2, Pin3, Pin4, Pin5, Pin6, Pin7, Pin8, Pin9,
    Sou1, Sou2, Sou3, Sou4, Sou5, Sou6, Sou7, Sou8, Sou9,
    East, South, West, North,
    White, Green, Red,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Suit {
    Man,
    Pin,
    Sou,
}

impl TryFrom<u8> for Tile {
    type Error = EvalError;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        use Tile::*;
        Ok(match v {
            0 => Man1, 1 => Man2, 2 => Man3, 3 => Man4, 4 => Man5,
            5 => Man6, 6 => Man7, 7 => Man8, 8 => Man9,
            9 => Pin1, 10 => Pin2, 11 => Pin3, 12 => Pin4, 13 => Pin5,
            14 => Pin6, 15 => Pin7, 16 => Pin8, 17 => Pin9,
            18 => Sou1, 19 => Sou2, 20 => Sou3, 21 => Sou4, 22 => Sou5,
            23 => Sou6, 24 => Sou7, 25 => Sou8, 26 => Sou9,
            27 => East, 28 => South, 29 => West, 30 => North,
            31 => White, 32 => Green, 33 => Red,
            _ => return Err(EvalError::InvalidTile(format!("kind id {v}"))),
        })
    }
}

impl Tile {
    /// Every kind in id order.
    pub const ALL: [Tile; NUM_KINDS] = {
        use Tile::*;
        [
            Man1, Man2, Man3, Man4, Man5, Man6, Man7, Man8, Man9,
            Pin1, Pin2, Pin3, Pin4, Pin5, Pin6, Pin7, Pin8, Pin9,
            Sou1, Sou2, Sou3, Sou4, Sou5, Sou6, Sou7, Sou8, Sou9,
            East, South, West, North,
            White, Green, Red,
        ]
    };

    /// Rank-1, rank-9 and honor kinds: the thirteen orphans.
    pub const TERMINALS_AND_HONORS: [Tile; 13] = {
        use Tile::*;
        [Man1, Man9, Pin1, Pin9, Sou1, Sou9, East, South, West, North, White, Green, Red]
    };

    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn suit(self) -> Option<Suit> {
        match self.id() / 9 {
            0 => Some(Suit::Man),
            1 => Some(Suit::Pin),
            2 => Some(Suit::Sou),
            _ => None,
        }
    }

    /// 1-9 for numeral tiles, `None` for honors.
    pub fn rank(self) -> Option<u8> {
        (!self.is_honor()).then(|| self.id() % 9 + 1)
    }

    #[inline]
    pub const fn is_honor(self) -> bool {
        self.id() >= 27
    }

    pub fn is_terminal(self) -> bool {
        matches!(self.rank(), Some(1 | 9))
    }

    pub fn is_terminal_or_honor(self) -> bool {
        self.is_honor() || self.is_terminal()
    }

    /// The kind that counts as dora when `self` is the indicator.
    /// Numerals wrap 9 -> 1, winds cycle E-S-W-N, dragons cycle P-F-C.
    pub fn dora_successor(self) -> Tile {
        use Tile::*;
        let id = match self {
            North => East.id(),
            Red => White.id(),
            t if t.rank() == Some(9) => t.id() - 8,
            t => t.id() + 1,
        };
        Tile::ALL[id as usize]
    }

    /// The four physical copies of this kind, copy index 0 first.
    pub fn instances(self) -> impl Iterator<Item = TileInstance> {
        (0..4).map(move |c| TileInstance(self.id() * 4 + c))
    }

    /// Returns the common Unicode Mahjong tile symbol
    pub fn to_unicode(self) -> char {
        use Tile::*;
        match self {
            Man1 => '🀇', Man2 => '🀈', Man3 => '🀉', Man4 => '🀊', Man5 => '🀋',
            Man6 => '🀌', Man7 => '🀍', Man8 => '🀎', Man9 => '🀏',
            Pin1 => '🀙', Pin2 => '🀚', Pin3 => '🀛', Pin4 => '🀜', Pin5 => '🀝',
            Pin6 => '🀞', Pin7 => '🀟', Pin8 => '🀠', Pin9 => '🀡',
            Sou1 => '🀐', Sou2 => '🀑', Sou3 => '🀒', Sou4 => '🀓', Sou5 => '🀔',
            Sou6 => '🀕', Sou7 => '🀖', Sou8 => '🀗', Sou9 => '🀘',
            East => '🀀', South => '🀁', West => '🀂', North => '🀃',
            White => '🀆', Green => '🀅', Red => '🀄',
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NOTATION[self.index()])
    }
}

impl FromStr for Tile {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // red fives are plain fives as far as the engine is concerned
        let plain = match s {
            "5mr" => "5m",
            "5pr" => "5p",
            "5sr" => "5s",
            other => other,
        };
        NOTATION
            .iter()
            .position(|&n| n == plain)
            .map(|id| Tile::ALL[id])
            .ok_or_else(|| EvalError::InvalidTile(format!("\"{s}\"")))
    }
}

/// A physical tile: `kind * 4 + copy_index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileInstance(u8);

impl TryFrom<u8> for TileInstance {
    type Error = EvalError;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        if (v as usize) < NUM_INSTANCES {
            Ok(Self(v))
        } else {
            Err(EvalError::InvalidTile(format!("instance id {v}")))
        }
    }
}

impl TileInstance {
    pub fn new(kind: Tile, copy_index: u8) -> Result<Self, EvalError> {
        if copy_index >= 4 {
            return Err(EvalError::InvalidTile(format!("copy index {copy_index} of {kind}")));
        }
        Ok(Self(kind.id() * 4 + copy_index))
    }

    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn kind(self) -> Tile {
        Tile::ALL[(self.0 / 4) as usize]
    }

    #[inline]
    pub const fn copy_index(self) -> u8 {
        self.0 % 4
    }
}

impl fmt::Display for TileInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

/// Validates a list of raw instance ids coming from the classifier.
pub fn instances_from_ids(ids: &[u8]) -> Result<Vec<TileInstance>, EvalError> {
    ids.iter().map(|&id| TileInstance::try_from(id)).collect()
}
