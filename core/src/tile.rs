//! Tile kinds stored in the maze grid and sets of them.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Content of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Empty corridor.
    Open,
    /// Corridor holding a collectible dot.
    Collectible,
    /// Solid wall or maze edge.
    Wall,
    /// Area outside the playable maze.
    OutOfBounds,
    /// Gate out of the ghost pen, closed to the player.
    RestrictedPassage,
}

impl Tile {
    /// Every tile kind in declaration order.
    pub const ALL: [Tile; 5] = [
        Tile::Open,
        Tile::Collectible,
        Tile::Wall,
        Tile::OutOfBounds,
        Tile::RestrictedPassage,
    ];

    /// Single character used when dumping the maze as text.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Open => '-',
            Self::Collectible => 'o',
            Self::Wall => 'E',
            Self::OutOfBounds => 'X',
            Self::RestrictedPassage => 'G',
        }
    }

    /// Reports whether the tile belongs to [`TileSet::BOUNDARY`].
    #[must_use]
    pub fn is_boundary(self) -> bool {
        TileSet::BOUNDARY.admits(self)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

bitflags! {
    /// Set of tile kinds, used for passability and stamping filters.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TileSet: u8 {
        /// Matches [`Tile::Open`].
        const OPEN = 1 << 0;
        /// Matches [`Tile::Collectible`].
        const COLLECTIBLE = 1 << 1;
        /// Matches [`Tile::Wall`].
        const WALL = 1 << 2;
        /// Matches [`Tile::OutOfBounds`].
        const OUT_OF_BOUNDS = 1 << 3;
        /// Matches [`Tile::RestrictedPassage`].
        const RESTRICTED_PASSAGE = 1 << 4;

        /// Tiles that bound corridors.
        const BOUNDARY = Self::WALL.bits()
            | Self::OUT_OF_BOUNDS.bits()
            | Self::RESTRICTED_PASSAGE.bits();
        /// Corridor tiles any agent may walk on.
        const WALKABLE = Self::OPEN.bits() | Self::COLLECTIBLE.bits();
    }
}

impl TileSet {
    /// Reports whether `tile` is a member of the set.
    #[must_use]
    pub fn admits(self, tile: Tile) -> bool {
        self.contains(Self::from(tile))
    }
}

impl From<Tile> for TileSet {
    fn from(tile: Tile) -> Self {
        match tile {
            Tile::Open => Self::OPEN,
            Tile::Collectible => Self::COLLECTIBLE,
            Tile::Wall => Self::WALL,
            Tile::OutOfBounds => Self::OUT_OF_BOUNDS,
            Tile::RestrictedPassage => Self::RESTRICTED_PASSAGE,
        }
    }
}
