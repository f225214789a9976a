//! Grid motion shared by the player and the ghosts.

use maze_chase_core::{Direction, TileCoord, TileSet, Vector};

use crate::maze::Maze;

/// Position and heading of an agent moving through the maze.
///
/// The discrete tile is the tile the agent last arrived on; the continuous
/// position tracks progress toward the next one. The two never drift apart
/// by more than one tile, and the coordinate across the direction of travel
/// is always pinned to the tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    tile: TileCoord,
    position: Vector,
    heading: Vector,
    speed: f32,
    passable: TileSet,
    spawn: TileCoord,
    spawn_heading: Vector,
}

impl Motion {
    /// Places an agent on `spawn` facing `heading`.
    #[must_use]
    pub fn new(spawn: TileCoord, heading: Vector, speed: f32, passable: TileSet) -> Self {
        Self {
            tile: spawn,
            position: spawn.to_vector(),
            heading,
            speed,
            passable,
            spawn,
            spawn_heading: heading,
        }
    }

    /// Tile the agent currently occupies.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.tile
    }

    /// Continuous position in tile units.
    #[must_use]
    pub const fn position(&self) -> Vector {
        self.position
    }

    /// Unit heading vector.
    #[must_use]
    pub const fn heading(&self) -> Vector {
        self.heading
    }

    /// Distance covered per frame, in tiles.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Tiles the agent may enter.
    #[must_use]
    pub const fn passable(&self) -> TileSet {
        self.passable
    }

    /// Tile the agent returns to on reset.
    #[must_use]
    pub const fn spawn(&self) -> TileCoord {
        self.spawn
    }

    /// Top-left corner of a two-tile sprite centred on the agent.
    #[must_use]
    pub fn top_left(&self) -> Vector {
        self.position - Vector::new(0.5, 0.5)
    }

    /// Centre of the agent's tile in tile units.
    #[must_use]
    pub fn center(&self) -> Vector {
        self.position + Vector::new(0.5, 0.5)
    }

    pub(crate) fn set_heading(&mut self, direction: Direction) {
        self.heading = Vector::from(direction);
    }

    pub(crate) fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub(crate) fn set_passable(&mut self, passable: TileSet) {
        self.passable = passable;
    }

    /// Reports whether the neighbour in the direction of `direction` may be
    /// entered. Zero vectors never move.
    #[must_use]
    pub fn can_move(&self, maze: &Maze, direction: Vector) -> bool {
        direction
            .direction()
            .is_some_and(|direction| self.passable.admits(maze.tile(self.tile.adjacent(direction))))
    }

    /// Moves `direction * speed` and resynchronises the discrete tile.
    ///
    /// Horizontal position wraps into `[-0.5, columns - 0.5)`. Along the axis
    /// of travel the tile only changes once the position reaches it; across
    /// it the position snaps to the tile. A non-cardinal vector moves the
    /// continuous position and leaves the tile untouched.
    pub fn advance(&mut self, maze: &Maze, direction: Vector, speed: f32) {
        let columns = maze.columns() as f32;
        self.position = (self.position + direction * speed).wrap_x(-0.5, columns - 0.5);

        let (row, column) = match direction.cardinal() {
            Some(Direction::North) => (self.position.y.ceil() as i32, self.tile.column()),
            Some(Direction::South) => (self.position.y.floor() as i32, self.tile.column()),
            Some(Direction::East) => (self.tile.row(), self.position.x.floor() as i32),
            Some(Direction::West) => (self.tile.row(), self.position.x.ceil() as i32),
            _ => return,
        };
        self.tile = TileCoord::new(row, column.rem_euclid(maze.width()));

        match direction.cardinal() {
            Some(Direction::North | Direction::South) => self.position.x = self.tile.column() as f32,
            _ => self.position.y = self.tile.row() as f32,
        }
    }

    /// Returns to the spawn tile and heading.
    pub fn reset(&mut self) {
        self.tile = self.spawn;
        self.position = self.spawn.to_vector();
        self.heading = self.spawn_heading;
    }
}
