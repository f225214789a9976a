#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod geometry;
mod tile;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use geometry::{Direction, TileCoord, TileRect, Vector};
pub use tile::{Tile, TileSet};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Global behaviour mode shared by every ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaseMode {
    /// Ghosts pursue targets derived from the player.
    Chase,
    /// Ghosts retreat toward their assigned corners.
    Scatter,
}

/// Identifier assigned to a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GhostId(u8);

impl GhostId {
    /// Creates a new identifier with the provided value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Rule used to derive a ghost's target while chasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaseStrategy {
    /// Target the player's current tile.
    Direct,
    /// Target a tile ahead of the player along its heading.
    Ahead {
        /// Number of tiles between the player and the target.
        tiles: i32,
    },
}

/// Progress of a ghost out of its pen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HomeState {
    /// Parked in the pen until released.
    Waiting,
    /// Steering toward the pen gate.
    Leaving,
    /// Roaming the maze.
    Released,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Advances the frame counter by one.
    Tick,
    /// Buffers a heading change for the player.
    SetHeading {
        /// Requested heading.
        direction: Direction,
    },
    /// Switches every ghost to the provided mode.
    SetChaseMode {
        /// Mode to adopt.
        mode: ChaseMode,
    },
    /// Lets a waiting ghost leave the pen.
    ReleaseGhost {
        /// Ghost to release.
        ghost: GhostId,
    },
    /// Replaces the tile a ghost steers toward.
    RetargetGhost {
        /// Ghost to retarget.
        ghost: GhostId,
        /// New target tile, possibly outside the maze.
        target: TileCoord,
    },
    /// Runs the player's per-frame motion step.
    AdvancePlayer,
    /// Runs every ghost's decision and motion step.
    AdvanceGhosts,
    /// Returns every agent to its spawn tile.
    ResetAgents,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// The frame counter advanced.
    FrameAdvanced {
        /// Frame number after the increment.
        frame: u64,
    },
    /// The player advanced along its heading.
    PlayerMoved {
        /// Tile occupied before the step.
        from: TileCoord,
        /// Tile occupied after the step.
        to: TileCoord,
    },
    /// The player could not move this frame.
    PlayerBlocked {
        /// Tile the player is stuck on.
        at: TileCoord,
    },
    /// The player consumed a collectible.
    CollectibleConsumed {
        /// Tile that held the collectible.
        tile: TileCoord,
        /// Points awarded for it.
        points: u32,
    },
    /// The player's eating state flipped.
    EatingChanged {
        /// New eating state.
        eating: bool,
    },
    /// The last collectible has been consumed.
    MazeCleared,
    /// A waiting ghost was allowed to leave the pen.
    GhostReleased {
        /// Ghost that was released.
        ghost: GhostId,
    },
    /// A ghost passed the gate and now roams the maze.
    GhostLeftHome {
        /// Ghost that left the pen.
        ghost: GhostId,
    },
    /// A ghost picked a new heading.
    GhostTurned {
        /// Ghost that turned.
        ghost: GhostId,
        /// Tile on which the decision was made.
        at: TileCoord,
        /// Newly adopted heading.
        direction: Direction,
    },
    /// A ghost advanced into another tile.
    GhostMoved {
        /// Ghost that moved.
        ghost: GhostId,
        /// Tile occupied before the step.
        from: TileCoord,
        /// Tile occupied after the step.
        to: TileCoord,
    },
    /// The shared chase mode changed.
    ChaseModeChanged {
        /// Mode now in effect.
        mode: ChaseMode,
    },
    /// A ghost reached the player.
    PlayerCaught {
        /// Ghost that caught the player.
        ghost: GhostId,
    },
    /// Every agent was sent back to its spawn.
    AgentsReset,
}

/// Read-only snapshot describing the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Discrete tile occupied by the player.
    pub tile: TileCoord,
    /// Continuous position in tile units.
    pub position: Vector,
    /// Current heading, if the player has one.
    pub heading: Option<Direction>,
    /// Accumulated score.
    pub score: u32,
    /// Indicates whether the player is chewing a collectible.
    pub eating: bool,
    /// Indicates whether the player moved on its last step.
    pub moving: bool,
}

/// Read-only snapshot describing a ghost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostSnapshot {
    /// Identifier of the ghost.
    pub id: GhostId,
    /// Discrete tile occupied by the ghost.
    pub tile: TileCoord,
    /// Continuous position in tile units.
    pub position: Vector,
    /// Current heading, if any.
    pub heading: Option<Direction>,
    /// Tile the ghost is currently steering toward.
    pub target: TileCoord,
    /// Corner targeted while scattering.
    pub scatter_corner: TileCoord,
    /// Target rule used while chasing.
    pub strategy: ChaseStrategy,
    /// Progress out of the pen.
    pub home: HomeState,
}

/// Immutable representation of every ghost used for queries.
#[derive(Clone, Debug, Default)]
pub struct GhostView {
    snapshots: Vec<GhostSnapshot>,
}

impl GhostView {
    /// Creates a new view from the provided snapshots, sorted by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<GhostSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterates over the captured ghost snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single ghost.
    #[must_use]
    pub fn get(&self, id: GhostId) -> Option<&GhostSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }
}

/// Failure converting a continuous value into a tile coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum CoordError {
    /// The vector does not sit exactly on a tile.
    #[error("position ({x}, {y}) is not aligned to a tile")]
    NotTileAligned {
        /// Horizontal component that was supplied.
        x: f32,
        /// Vertical component that was supplied.
        y: f32,
    },
}

/// Failure raised by maze grid operations.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum MazeError {
    /// A continuous coordinate was passed where a tile was required.
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordError),
    /// The tile lies outside the grid.
    #[error("tile {tile} lies outside the {rows}x{columns} maze")]
    OutOfBounds {
        /// Requested tile.
        tile: TileCoord,
        /// Number of rows in the maze.
        rows: u32,
        /// Number of columns in the maze.
        columns: u32,
    },
}

/// Failure raised while constructing mazes, agents or worlds.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConstructionError {
    /// The maze would hold no tiles.
    #[error("maze dimensions {rows}x{columns} must both be non-zero")]
    EmptyMaze {
        /// Requested rows.
        rows: u32,
        /// Requested columns.
        columns: u32,
    },
    /// A speed was outside `(0, 1]` tiles per frame.
    #[error("{name} speed must lie in (0, 1] tiles per frame, got {value}")]
    InvalidSpeed {
        /// Which speed was rejected.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The tunnel slow-down factor was outside `(0, 1]`.
    #[error("tunnel factor must lie in (0, 1], got {0}")]
    InvalidTunnelFactor(f32),
    /// The catch distance was negative or non-finite.
    #[error("catch distance must be finite and non-negative, got {0}")]
    InvalidCatchDistance(f32),
    /// A spawn tile cannot be entered by the agent placed on it.
    #[error("spawn tile {0} is not passable")]
    BlockedSpawn(TileCoord),
}
