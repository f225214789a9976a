//! Tile grid, tunnel wraparound and the authored layout.

use std::fmt;

use maze_chase_core::{
    ConstructionError, Direction, MazeError, Tile, TileCoord, TileRect, TileSet, Vector,
};
use tracing::debug;

const DEFAULT_ROWS: u32 = 31;
const DEFAULT_COLUMNS: u32 = 28;

/// Row whose edge columns wrap around horizontally.
pub const TUNNEL_ROW: i32 = 14;
/// Number of columns on each side of the tunnel row that wrap.
pub const TUNNEL_SPAN: i32 = 6;

/// Fixed-size grid of tiles making up the maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    rows: u32,
    columns: u32,
    tiles: Vec<Tile>,
}

impl Maze {
    /// Creates a maze of the provided size with every tile open.
    pub fn new(rows: u32, columns: u32) -> Result<Self, ConstructionError> {
        if rows == 0 || columns == 0 {
            return Err(ConstructionError::EmptyMaze { rows, columns });
        }
        let capacity = usize::try_from(u64::from(rows) * u64::from(columns))
            .map_err(|_| ConstructionError::EmptyMaze { rows, columns })?;
        Ok(Self {
            rows,
            columns,
            tiles: vec![Tile::Open; capacity],
        })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the tile lies in the wrapping span of the tunnel row.
    #[must_use]
    pub fn in_tunnel(&self, tile: TileCoord) -> bool {
        tile.row() == TUNNEL_ROW
            && (tile.column() < TUNNEL_SPAN || tile.column() >= self.width() - TUNNEL_SPAN)
    }

    /// Tile stored at the provided coordinate.
    ///
    /// Columns in the tunnel span wrap modulo the width first. Anything still
    /// outside the grid reads as [`Tile::OutOfBounds`].
    #[must_use]
    pub fn tile(&self, tile: TileCoord) -> Tile {
        self.index(self.resolve(tile))
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(Tile::OutOfBounds)
    }

    /// Tile stored at a tile-aligned continuous position.
    pub fn tile_at(&self, position: Vector) -> Result<Tile, MazeError> {
        let tile = TileCoord::try_from(position)?;
        Ok(self.tile(tile))
    }

    /// Overwrites a single tile.
    pub fn set_tile(&mut self, tile: TileCoord, kind: Tile) -> Result<(), MazeError> {
        let slot = self
            .index(tile)
            .and_then(|index| self.tiles.get_mut(index))
            .ok_or(MazeError::OutOfBounds {
                tile,
                rows: self.rows,
                columns: self.columns,
            })?;
        *slot = kind;
        Ok(())
    }

    /// Fills the inclusive rectangle between two corners with `kind`.
    ///
    /// Each corner wraps into the grid independently, so `(-1, -1)` names the
    /// bottom-right tile. Tiles whose current kind is in `ignore` are kept.
    pub fn add_block(&mut self, a: TileCoord, b: TileCoord, kind: Tile, ignore: TileSet) {
        let a = a.wrapped(self.rows, self.columns);
        let b = b.wrapped(self.rows, self.columns);
        for row in a.row().min(b.row())..=a.row().max(b.row()) {
            for column in a.column().min(b.column())..=a.column().max(b.column()) {
                let Some(index) = self.index(TileCoord::new(row, column)) else {
                    continue;
                };
                if let Some(slot) = self.tiles.get_mut(index) {
                    if !ignore.admits(*slot) {
                        *slot = kind;
                    }
                }
            }
        }
    }

    /// Stamps the authored layout: walls, ghost pen, tunnel and collectibles.
    ///
    /// Calling it again re-stamps the same pattern, which refills consumed
    /// collectibles but leaves the walls unchanged.
    pub fn init(&mut self) {
        for stamp in layout(self.height(), self.width()) {
            self.add_block(
                TileCoord::new(stamp.a.1, stamp.a.0),
                TileCoord::new(stamp.b.1, stamp.b.0),
                stamp.kind,
                stamp.ignore,
            );
        }
        debug!(
            rows = self.rows,
            columns = self.columns,
            collectibles = self.collectibles_remaining(),
            "maze layout stamped"
        );
    }

    /// Pixel rectangles that render a wall tile's visible thickness.
    ///
    /// Every neighbour, diagonals included, that is not a boundary tile adds
    /// the half of the tile facing it. Non-wall tiles yield nothing.
    pub fn tile_edge_geometry(
        &self,
        tile: TileCoord,
        tile_size: f32,
    ) -> Result<Vec<TileRect>, MazeError> {
        if self.index(tile).is_none() {
            return Err(MazeError::OutOfBounds {
                tile,
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.tile(tile) != Tile::Wall {
            return Ok(Vec::new());
        }

        let origin = tile.to_vector() * tile_size;
        let bounds = TileRect::new(origin.x, origin.y, tile_size, tile_size);
        Ok(Direction::ALL
            .into_iter()
            .map(|direction| tile.adjacent(direction))
            .filter(|neighbour| !self.tile(*neighbour).is_boundary())
            .filter_map(|neighbour| {
                let corner = origin.midpoint(neighbour.to_vector() * tile_size);
                TileRect::new(corner.x, corner.y, tile_size, tile_size).clip(&bounds)
            })
            .collect())
    }

    /// Number of collectibles still in the maze.
    #[must_use]
    pub fn collectibles_remaining(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| **tile == Tile::Collectible)
            .count()
    }

    /// Iterates over every in-bounds coordinate in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = TileCoord> {
        let (rows, columns) = (self.height(), self.width());
        (0..rows).flat_map(move |row| (0..columns).map(move |column| TileCoord::new(row, column)))
    }

    pub(crate) fn width(&self) -> i32 {
        i32::try_from(self.columns).unwrap_or(i32::MAX)
    }

    pub(crate) fn height(&self) -> i32 {
        i32::try_from(self.rows).unwrap_or(i32::MAX)
    }

    fn resolve(&self, tile: TileCoord) -> TileCoord {
        if self.in_tunnel(tile) {
            TileCoord::new(tile.row(), tile.column().rem_euclid(self.width()))
        } else {
            tile
        }
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        let row = u32::try_from(tile.row()).ok()?;
        let column = u32::try_from(tile.column()).ok()?;
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            tiles: vec![Tile::Open; (DEFAULT_ROWS * DEFAULT_COLUMNS) as usize],
        }
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.columns).map_err(|_| fmt::Error)?;
        for (index, row) in self.tiles.chunks(width).enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{tile}")?;
            }
        }
        Ok(())
    }
}

/// One rectangle of the authored layout, corners given as `(column, row)`.
struct Stamp {
    a: (i32, i32),
    b: (i32, i32),
    kind: Tile,
    ignore: TileSet,
}

fn stamp(a: (i32, i32), b: (i32, i32), kind: Tile) -> Stamp {
    Stamp {
        a,
        b,
        kind,
        ignore: TileSet::empty(),
    }
}

/// Ordered stamps for a maze of the given size. Later stamps override
/// earlier ones; the collectible field is laid last and never covers a
/// boundary tile.
fn layout(rows: i32, columns: i32) -> Vec<Stamp> {
    let (mc, mr) = (columns / 2, rows / 2);
    let mut stamps = vec![
        stamp((0, 0), (-1, -1), Tile::Wall),
        stamp((1, 1), (-2, -2), Tile::Open),
        // side notches around the tunnel
        stamp((0, 9), (5, -12), Tile::Wall),
        stamp((-6, 9), (-1, -12), Tile::Wall),
        stamp((0, 10), (4, 12), Tile::OutOfBounds),
        stamp((0, -15), (4, -13), Tile::OutOfBounds),
        stamp((-5, 10), (-1, 12), Tile::OutOfBounds),
        stamp((-5, -15), (-1, -13), Tile::OutOfBounds),
        stamp((0, TUNNEL_ROW), (5, TUNNEL_ROW), Tile::Open),
        stamp((-6, TUNNEL_ROW), (-1, TUNNEL_ROW), Tile::Open),
    ];

    let top = [
        ((2, 2), (5, 4)),
        ((-6, 2), (-3, 4)),
        ((7, 2), (11, 4)),
        ((-12, 2), (-8, 4)),
        ((mc - 1, 0), (mc, 4)),
        ((2, 6), (5, 7)),
        ((-6, 6), (-3, 7)),
        ((7, 6), (8, mr - 2)),
        ((-9, 6), (-8, mr - 2)),
        ((mc - 4, 6), (mc + 3, 7)),
        ((7, 9), (11, 10)),
        ((-12, 9), (-8, 10)),
        ((mc - 1, 6), (mc, 10)),
    ];
    stamps.extend(top.into_iter().map(|(a, b)| stamp(a, b, Tile::Wall)));

    // ghost pen: box, hollow interior, gate
    stamps.push(stamp((mc - 4, mr - 3), (mc + 3, mr + 1), Tile::Wall));
    stamps.push(stamp((mc - 3, mr - 2), (mc + 2, mr), Tile::OutOfBounds));
    stamps.push(stamp((mc - 1, mr - 3), (mc, mr - 3), Tile::RestrictedPassage));

    let bottom = [
        ((7, mr), (8, mr + 4)),
        ((-9, mr), (-8, mr + 4)),
        ((mc - 4, mr + 3), (mc + 3, mr + 4)),
        ((mc - 1, mr + 3), (mc, mr + 7)),
        ((2, -10), (5, -9)),
        ((4, -10), (5, -6)),
        ((-6, -10), (-3, -9)),
        ((-6, -10), (-5, -6)),
        ((0, -7), (2, -6)),
        ((-3, -7), (-1, -6)),
        ((7, -10), (11, -9)),
        ((-12, -10), (-8, -9)),
        ((2, -4), (mc - 3, -3)),
        ((mc + 2, -4), (-3, -3)),
        ((mc - 4, -7), (mc + 3, -6)),
        ((7, -7), (8, -3)),
        ((-9, -7), (-8, -3)),
        ((mc - 1, -7), (mc, -3)),
    ];
    stamps.extend(bottom.into_iter().map(|(a, b)| stamp(a, b, Tile::Wall)));

    let field = [
        ((0, 0), (-1, 8)),
        ((0, -11), (-1, -1)),
        ((6, 8), (6, -12)),
        ((-7, 8), (-7, -12)),
    ];
    stamps.extend(field.into_iter().map(|(a, b)| Stamp {
        a,
        b,
        kind: Tile::Collectible,
        ignore: TileSet::BOUNDARY,
    }));
    stamps
}
