//! Direction, vector and tile-coordinate primitives.
//!
//! Two coordinate spaces meet here. [`TileCoord`] addresses whole maze tiles
//! by signed row and column, while [`Vector`] tracks continuous progress in
//! tile units (`x` along columns, `y` along rows). Rows grow downwards, so
//! [`Direction::North`] decreases the row index. Both types are plain `Copy`
//! values: every operation returns a new value and nothing is shared.

use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

use serde::{Deserialize, Serialize};

use crate::CoordError;

/// Compass direction used for headings and neighbour lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Diagonal between north and east.
    NorthEast,
    /// Movement toward increasing column indices.
    East,
    /// Diagonal between south and east.
    SouthEast,
    /// Movement toward increasing row indices.
    South,
    /// Diagonal between south and west.
    SouthWest,
    /// Movement toward decreasing column indices.
    West,
    /// Diagonal between north and west.
    NorthWest,
}

impl Direction {
    /// Every direction, counter-clockwise starting from east.
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Cardinal directions in the order used to break ties between turns.
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Angle in degrees measured counter-clockwise from east.
    #[must_use]
    pub const fn angle(self) -> u16 {
        match self {
            Self::East => 0,
            Self::NorthEast => 45,
            Self::North => 90,
            Self::NorthWest => 135,
            Self::West => 180,
            Self::SouthWest => 225,
            Self::South => 270,
            Self::SouthEast => 315,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::NorthEast => Self::SouthWest,
            Self::North => Self::South,
            Self::NorthWest => Self::SouthEast,
            Self::West => Self::East,
            Self::SouthWest => Self::NorthEast,
            Self::South => Self::North,
            Self::SouthEast => Self::NorthWest,
        }
    }

    /// Reports whether the direction is one of north, east, south or west.
    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        matches!(self, Self::North | Self::East | Self::South | Self::West)
    }

    /// Row and column delta of a single step, in that order.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::East => (0, 1),
            Self::NorthEast => (-1, 1),
            Self::North => (-1, 0),
            Self::NorthWest => (-1, -1),
            Self::West => (0, -1),
            Self::SouthWest => (1, -1),
            Self::South => (1, 0),
            Self::SouthEast => (1, 1),
        }
    }
}

/// Two-component vector measured in tile units.
///
/// Doubles as a continuous position, a heading and a unit direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Component along the column axis.
    pub x: f32,
    /// Component along the row axis.
    pub y: f32,
}

impl Vector {
    /// Zero-length vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Wraps only the horizontal component into `[min, max)`.
    #[must_use]
    pub fn wrap_x(self, min: f32, max: f32) -> Self {
        Self::new(wrap_axis(self.x, min, max), self.y)
    }

    /// Euclidean distance to another vector.
    #[must_use]
    pub fn distance(self, other: Vector) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Euclidean distance with the horizontal axis wrapping every `width`
    /// units, so points on either side of the seam stay close.
    #[must_use]
    pub fn distance_wrapped_x(self, other: Vector, width: f32) -> f32 {
        let dx = (self.x - other.x).abs();
        let dx = dx.min((width - dx).abs());
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point halfway between the two vectors.
    #[must_use]
    pub fn midpoint(self, other: Vector) -> Self {
        Self::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    /// Reports whether both components hold whole numbers.
    #[must_use]
    pub fn has_int_vals(self) -> bool {
        self.x.fract() == 0.0 && self.y.fract() == 0.0
    }

    /// Direction implied by the signs of the components, if any.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        let delta = (signum(self.y), signum(self.x));
        Direction::ALL
            .into_iter()
            .find(|direction| direction.offset() == delta)
    }

    /// Cardinal direction of an axis-aligned, non-zero vector.
    #[must_use]
    pub fn cardinal(self) -> Option<Direction> {
        self.direction().filter(|direction| direction.is_cardinal())
    }
}

impl From<Direction> for Vector {
    fn from(direction: Direction) -> Self {
        let (row, column) = direction.offset();
        Self::new(column as f32, row as f32)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vector {
    type Output = Self;

    fn mul(self, coefficient: f32) -> Self {
        Self::new(self.x * coefficient, self.y * coefficient)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

fn wrap_axis(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span <= 0.0 {
        return value;
    }
    (value - min).rem_euclid(span) + min
}

fn signum(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Location of a maze tile expressed as signed row and column indices.
///
/// Negative and oversized values are legal: targets may lie outside the maze
/// and layout corners may count backwards from the far edge.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileCoord {
    row: i32,
    column: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Neighbouring tile one step away in the provided direction.
    #[must_use]
    pub const fn adjacent(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }

    /// Tile `tiles` steps away in the provided direction.
    #[must_use]
    pub const fn offset(self, direction: Direction, tiles: i32) -> Self {
        let (row, column) = direction.offset();
        Self::new(self.row + row * tiles, self.column + column * tiles)
    }

    /// Wraps both indices into a `rows` x `columns` grid.
    ///
    /// `(-1, -1)` therefore names the bottom-right tile.
    #[must_use]
    pub fn wrapped(self, rows: u32, columns: u32) -> Self {
        let rows = i32::try_from(rows).unwrap_or(i32::MAX).max(1);
        let columns = i32::try_from(columns).unwrap_or(i32::MAX).max(1);
        Self::new(self.row.rem_euclid(rows), self.column.rem_euclid(columns))
    }

    /// Euclidean distance between the two tiles.
    #[must_use]
    pub fn distance(self, other: TileCoord) -> f32 {
        self.to_vector().distance(other.to_vector())
    }

    /// Continuous position of the tile's anchor.
    #[must_use]
    pub fn to_vector(self) -> Vector {
        Vector::new(self.column as f32, self.row as f32)
    }
}

impl TryFrom<Vector> for TileCoord {
    type Error = CoordError;

    fn try_from(vector: Vector) -> Result<Self, Self::Error> {
        if !vector.has_int_vals() {
            return Err(CoordError::NotTileAligned {
                x: vector.x,
                y: vector.y,
            });
        }
        Ok(Self::new(vector.y as i32, vector.x as i32))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Axis-aligned rectangle measured in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl TileRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Intersection with `bounds`, or `None` when the overlap has no area.
    #[must_use]
    pub fn clip(&self, bounds: &TileRect) -> Option<TileRect> {
        let left = self.x.max(bounds.x);
        let top = self.y.max(bounds.y);
        let right = self.right().min(bounds.right());
        let bottom = self.bottom().min(bounds.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(TileRect::new(left, top, right - left, bottom - top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_vectors_are_unit_steps() {
        for direction in Direction::ALL {
            let vector = Vector::from(direction);
            assert!(vector.x.abs() <= 1.0 && vector.y.abs() <= 1.0);
            assert_ne!(vector, Vector::ZERO);
            assert_eq!(vector.direction(), Some(direction));
        }
    }

    #[test]
    fn reverse_is_an_involution_and_flips_the_angle() {
        for direction in Direction::ALL {
            assert_eq!(direction.reverse().reverse(), direction);
            assert_eq!(
                (direction.angle() + 180) % 360,
                direction.reverse().angle()
            );
        }
    }

    #[test]
    fn north_points_up_the_screen() {
        assert_eq!(Vector::from(Direction::North), Vector::new(0.0, -1.0));
        assert_eq!(
            TileCoord::new(5, 5).adjacent(Direction::North),
            TileCoord::new(4, 5)
        );
    }

    #[test]
    fn cardinal_ignores_diagonals_and_zero() {
        assert_eq!(Vector::new(0.0, 0.17).cardinal(), Some(Direction::South));
        assert_eq!(Vector::new(-2.0, 0.0).cardinal(), Some(Direction::West));
        assert_eq!(Vector::new(1.0, 1.0).cardinal(), None);
        assert_eq!(Vector::new(1.0, 1.0).direction(), Some(Direction::SouthEast));
        assert_eq!(Vector::ZERO.cardinal(), None);
    }

    #[test]
    fn wrap_keeps_values_inside_half_open_range() {
        assert_eq!(Vector::new(27.5, 3.0).wrap_x(-0.5, 27.5), Vector::new(-0.5, 3.0));

        let tunnel = Vector::new(-0.75, 14.0).wrap_x(-0.5, 27.5);
        assert!((tunnel.x - 27.25).abs() < 1e-5);
        assert_eq!(tunnel.y, 14.0);
    }

    #[test]
    fn wrapped_distance_measures_across_the_seam() {
        let west = Vector::new(-0.4, 14.0);
        let east = Vector::new(27.4, 14.0);
        assert!((west.distance(east) - 27.8).abs() < 1e-4);
        assert!((west.distance_wrapped_x(east, 28.0) - 0.2).abs() < 1e-4);
        let inland = Vector::new(3.0, 0.0).distance_wrapped_x(Vector::new(0.0, 4.0), 28.0);
        assert!((inland - 5.0).abs() < 1e-6);
    }

    #[test]
    fn arithmetic_produces_new_values() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(0.5, -1.0);
        assert_eq!(a + b, Vector::new(1.5, 1.0));
        assert_eq!(a - b, Vector::new(0.5, 3.0));
        assert_eq!(a * 2.0, Vector::new(2.0, 4.0));
        assert_eq!(-a, Vector::new(-1.0, -2.0));
        assert_eq!(a.midpoint(b), Vector::new(0.75, 0.5));
        assert_eq!(a, Vector::new(1.0, 2.0));
    }

    #[test]
    fn tile_conversion_rejects_continuous_positions() {
        assert_eq!(
            TileCoord::try_from(Vector::new(3.0, 14.0)),
            Ok(TileCoord::new(14, 3))
        );
        assert!(matches!(
            TileCoord::try_from(Vector::new(3.5, 14.0)),
            Err(CoordError::NotTileAligned { .. })
        ));
    }

    #[test]
    fn negative_corners_wrap_from_the_far_edge() {
        assert_eq!(
            TileCoord::new(-1, -1).wrapped(31, 28),
            TileCoord::new(30, 27)
        );
        assert_eq!(TileCoord::new(9, -12).wrapped(31, 28), TileCoord::new(9, 16));
    }

    #[test]
    fn tile_distance_is_euclidean() {
        let origin = TileCoord::new(0, 0);
        assert!((origin.distance(TileCoord::new(3, 4)) - 5.0).abs() < f32::EPSILON);
        assert_eq!(
            origin.offset(Direction::West, 4),
            TileCoord::new(0, -4)
        );
    }

    #[test]
    fn clip_discards_disjoint_rectangles() {
        let tile = TileRect::new(10.0, 10.0, 10.0, 10.0);
        let half = TileRect::new(15.0, 10.0, 10.0, 10.0);
        assert_eq!(tile.clip(&half), Some(TileRect::new(15.0, 10.0, 5.0, 10.0)));
        assert_eq!(tile.clip(&TileRect::new(40.0, 40.0, 5.0, 5.0)), None);
    }
}
