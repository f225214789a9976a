//! Player-controlled agent.

use maze_chase_core::{Direction, Tile, TileCoord, TileSet, Vector};

use crate::{maze::Maze, motion::Motion};

/// Points awarded for each collectible.
pub const COLLECTIBLE_POINTS: u32 = 10;

const MOVE_FRAME_DIVISOR: u64 = 3;
const DEATH_FRAME_DIVISOR: u64 = 8;

/// Outcome of a single [`Player::update_pos`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerStep {
    /// Tile occupied before the step.
    pub from: TileCoord,
    /// Tile occupied after the step.
    pub to: TileCoord,
    /// Indicates whether the player moved at all.
    pub moved: bool,
    /// Tile whose collectible was consumed, if any.
    pub consumed: Option<TileCoord>,
    /// New eating state when it changed during the step.
    pub eating_changed: Option<bool>,
}

/// Agent steered by buffered input that eats collectibles.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    motion: Motion,
    next_heading: Option<Direction>,
    moving: bool,
    eating: bool,
    last_collectible: Option<TileCoord>,
    score: u32,
}

impl Player {
    /// Places the player on `spawn` facing `heading`.
    #[must_use]
    pub fn new(spawn: TileCoord, heading: Direction, speed: f32) -> Self {
        Self {
            motion: Motion::new(spawn, Vector::from(heading), speed, TileSet::WALKABLE),
            next_heading: None,
            moving: false,
            eating: false,
            last_collectible: None,
            score: 0,
        }
    }

    /// Shared motion state.
    #[must_use]
    pub const fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Indicates whether the player is still on the tile it last ate from.
    #[must_use]
    pub const fn eating(&self) -> bool {
        self.eating
    }

    /// Indicates whether the last update moved the player.
    #[must_use]
    pub const fn moving(&self) -> bool {
        self.moving
    }

    /// Heading waiting to be adopted at the next opening.
    #[must_use]
    pub const fn next_heading(&self) -> Option<Direction> {
        self.next_heading
    }

    /// Buffers a heading to take as soon as the maze allows it.
    pub fn set_next_heading(&mut self, direction: Direction) {
        self.next_heading = Some(direction);
    }

    /// Runs one frame of player motion.
    ///
    /// A buffered heading wins when its neighbour is open; otherwise the
    /// player keeps going straight, or stops and stops eating when blocked.
    pub fn update_pos(&mut self, maze: &mut Maze) -> PlayerStep {
        let from = self.motion.tile();
        let was_eating = self.eating;
        let mut consumed = None;

        let buffered = self
            .next_heading
            .filter(|direction| self.motion.can_move(maze, Vector::from(*direction)));
        if let Some(direction) = buffered {
            self.motion.set_heading(direction);
            self.next_heading = None;
            self.moving = true;
            consumed = self.step(maze);
        } else if self.motion.can_move(maze, self.motion.heading()) {
            self.moving = true;
            consumed = self.step(maze);
        } else {
            self.moving = false;
            self.eating = false;
        }

        PlayerStep {
            from,
            to: self.motion.tile(),
            moved: self.moving,
            consumed,
            eating_changed: (self.eating != was_eating).then_some(self.eating),
        }
    }

    fn step(&mut self, maze: &mut Maze) -> Option<TileCoord> {
        let heading = self.motion.heading();
        let speed = self.motion.speed();
        self.motion.advance(maze, heading, speed);

        let tile = self.motion.tile();
        let mut consumed = None;
        if maze.tile(tile) == Tile::Collectible && maze.set_tile(tile, Tile::Open).is_ok() {
            self.last_collectible = Some(tile);
            self.score = self.score.saturating_add(COLLECTIBLE_POINTS);
            self.eating = true;
            consumed = Some(tile);
        }
        if self.last_collectible != Some(tile) {
            self.eating = false;
        }
        consumed
    }

    /// Animation frame while alive: cycles while moving, idles on the last.
    #[must_use]
    pub fn move_frame(&self, frame: u64, frame_count: usize) -> usize {
        if frame_count == 0 {
            return 0;
        }
        if !self.moving {
            return frame_count - 1;
        }
        let step = usize::try_from(frame / MOVE_FRAME_DIVISOR).unwrap_or(usize::MAX);
        step % frame_count
    }

    /// Frame of the death sequence, or `None` once it has played out.
    #[must_use]
    pub fn death_frame(&self, frame: u64, death_start: u64, frame_count: usize) -> Option<usize> {
        let index = usize::try_from(frame.saturating_sub(death_start) / DEATH_FRAME_DIVISOR).ok()?;
        (index < frame_count).then_some(index)
    }

    /// Returns to the spawn tile, keeping score and eaten collectibles.
    pub fn reset(&mut self) {
        self.motion.reset();
        self.next_heading = None;
        self.moving = false;
        self.eating = false;
        self.last_collectible = None;
    }
}
