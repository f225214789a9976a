#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

mod ghost;
mod maze;
mod motion;
mod player;

use maze_chase_core::{
    ChaseMode, ChaseStrategy, Command, ConstructionError, Direction, Event, GhostId, HomeState,
    TileCoord, WELCOME_BANNER,
};
use tracing::{debug, info};

pub use ghost::{Ghost, GhostMove, GhostSeed, RELEASE_ROW};
pub use maze::{Maze, TUNNEL_ROW, TUNNEL_SPAN};
pub use motion::Motion;
pub use player::{Player, PlayerStep, COLLECTIBLE_POINTS};

const PLAYER_SPAWN: TileCoord = TileCoord::new(23, 13);

const GHOST_ROSTER: [GhostSeed; 4] = [
    GhostSeed {
        id: GhostId::new(0),
        spawn: TileCoord::new(11, 13),
        heading: Direction::West,
        strategy: ChaseStrategy::Direct,
        scatter_corner: TileCoord::new(0, 27),
        home: HomeState::Released,
    },
    GhostSeed {
        id: GhostId::new(1),
        spawn: TileCoord::new(14, 13),
        heading: Direction::North,
        strategy: ChaseStrategy::Ahead { tiles: 4 },
        scatter_corner: TileCoord::new(0, 0),
        home: HomeState::Waiting,
    },
    GhostSeed {
        id: GhostId::new(2),
        spawn: TileCoord::new(14, 11),
        heading: Direction::North,
        strategy: ChaseStrategy::Ahead { tiles: 2 },
        scatter_corner: TileCoord::new(30, 27),
        home: HomeState::Waiting,
    },
    GhostSeed {
        id: GhostId::new(3),
        spawn: TileCoord::new(14, 15),
        heading: Direction::North,
        strategy: ChaseStrategy::Direct,
        scatter_corner: TileCoord::new(30, 0),
        home: HomeState::Waiting,
    },
];

/// Speeds and distances that parameterise the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Player speed in tiles per frame, at most one.
    pub player_speed: f32,
    /// Ghost speed in tiles per frame outside the tunnel, at most one.
    pub ghost_speed: f32,
    /// Multiplier applied to ghost speed inside the tunnel.
    pub tunnel_factor: f32,
    /// Distance at which a ghost catches the player, in tiles.
    pub catch_distance: f32,
}

impl Tuning {
    fn validate(&self) -> Result<(), ConstructionError> {
        for (name, value) in [("player", self.player_speed), ("ghost", self.ghost_speed)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConstructionError::InvalidSpeed { name, value });
            }
        }
        if !(self.tunnel_factor > 0.0 && self.tunnel_factor <= 1.0) {
            return Err(ConstructionError::InvalidTunnelFactor(self.tunnel_factor));
        }
        if !self.catch_distance.is_finite() || self.catch_distance < 0.0 {
            return Err(ConstructionError::InvalidCatchDistance(self.catch_distance));
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 0.17,
            ghost_speed: 0.16,
            tunnel_factor: 0.6,
            catch_distance: 0.5,
        }
    }
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    maze: Maze,
    player: Player,
    ghosts: Vec<Ghost>,
    chase_mode: ChaseMode,
    frame: u64,
    caught: bool,
    tuning: Tuning,
}

impl World {
    /// Creates a new Maze Chase world with the default tuning and roster.
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(Tuning::default())
    }

    /// Creates a world with custom tuning, rejecting unusable values.
    pub fn with_tuning(tuning: Tuning) -> Result<Self, ConstructionError> {
        tuning.validate()?;
        let world = Self::assemble(tuning);
        world.check_spawns()?;
        Ok(world)
    }

    fn assemble(tuning: Tuning) -> Self {
        let mut maze = Maze::default();
        maze.init();
        let player = Player::new(PLAYER_SPAWN, Direction::West, tuning.player_speed);
        let ghosts = GHOST_ROSTER
            .iter()
            .map(|seed| Ghost::new(*seed, tuning.ghost_speed, tuning.tunnel_factor))
            .collect();
        Self {
            banner: WELCOME_BANNER,
            maze,
            player,
            ghosts,
            chase_mode: ChaseMode::Scatter,
            frame: 0,
            caught: false,
            tuning,
        }
    }

    fn check_spawns(&self) -> Result<(), ConstructionError> {
        let motions = std::iter::once(self.player.motion())
            .chain(self.ghosts.iter().map(Ghost::motion));
        for motion in motions {
            let spawn = motion.spawn();
            if !motion.passable().admits(self.maze.tile(spawn)) {
                return Err(ConstructionError::BlockedSpawn(spawn));
            }
        }
        Ok(())
    }

    fn ghost_mut(&mut self, id: GhostId) -> Option<&mut Ghost> {
        self.ghosts.iter_mut().find(|ghost| ghost.id() == id)
    }

    fn advance_player(&mut self, out_events: &mut Vec<Event>) {
        let was_moving = self.player.moving();
        let step = self.player.update_pos(&mut self.maze);
        if step.from != step.to {
            out_events.push(Event::PlayerMoved {
                from: step.from,
                to: step.to,
            });
        }
        if was_moving && !step.moved {
            out_events.push(Event::PlayerBlocked { at: step.to });
        }
        if let Some(tile) = step.consumed {
            out_events.push(Event::CollectibleConsumed {
                tile,
                points: COLLECTIBLE_POINTS,
            });
        }
        if let Some(eating) = step.eating_changed {
            out_events.push(Event::EatingChanged { eating });
        }
        if step.consumed.is_some() && self.maze.collectibles_remaining() == 0 {
            info!(score = self.player.score(), "maze cleared");
            out_events.push(Event::MazeCleared);
        }
    }

    fn advance_ghosts(&mut self, out_events: &mut Vec<Event>) {
        for ghost in &mut self.ghosts {
            let id = ghost.id();
            let at = ghost.motion().tile();
            if let Some(direction) = ghost.update_speed(&self.maze) {
                out_events.push(Event::GhostTurned {
                    ghost: id,
                    at,
                    direction,
                });
            }
            let Some(step) = ghost.advance(&self.maze) else {
                continue;
            };
            if step.from != step.to {
                out_events.push(Event::GhostMoved {
                    ghost: id,
                    from: step.from,
                    to: step.to,
                });
            }
            if step.left_home {
                debug!(ghost = id.get(), "ghost left the pen");
                out_events.push(Event::GhostLeftHome { ghost: id });
            }
        }

        let position = self.player.motion().position();
        let catcher = self
            .ghosts
            .iter()
            .find(|ghost| ghost.catches(&self.maze, position, self.tuning.catch_distance))
            .map(Ghost::id);
        if let Some(ghost) = catcher {
            info!(ghost = ghost.get(), frame = self.frame, "player caught");
            self.caught = true;
            out_events.push(Event::PlayerCaught { ghost });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.frame = world.frame.saturating_add(1);
            out_events.push(Event::FrameAdvanced { frame: world.frame });
        }
        Command::SetHeading { direction } => {
            if direction.is_cardinal() {
                world.player.set_next_heading(direction);
            } else {
                debug!(?direction, "ignoring diagonal heading request");
            }
        }
        Command::SetChaseMode { mode } => {
            if world.chase_mode != mode {
                debug!(?mode, frame = world.frame, "chase mode changed");
                world.chase_mode = mode;
                out_events.push(Event::ChaseModeChanged { mode });
            }
        }
        Command::ReleaseGhost { ghost } => {
            if world.ghost_mut(ghost).is_some_and(Ghost::release) {
                debug!(ghost = ghost.get(), frame = world.frame, "ghost released");
                out_events.push(Event::GhostReleased { ghost });
            }
        }
        Command::RetargetGhost { ghost, target } => {
            if let Some(ghost) = world.ghost_mut(ghost) {
                ghost.set_target(target);
            }
        }
        Command::AdvancePlayer => {
            if !world.caught {
                world.advance_player(out_events);
            }
        }
        Command::AdvanceGhosts => {
            if !world.caught {
                world.advance_ghosts(out_events);
            }
        }
        Command::ResetAgents => {
            world.player.reset();
            for ghost in &mut world.ghosts {
                ghost.reset();
            }
            world.caught = false;
            out_events.push(Event::AgentsReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_chase_core::{ChaseMode, GhostSnapshot, GhostView, PlayerSnapshot};

    use super::{Ghost, Maze, Player, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the maze grid.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Provides read-only access to the ghosts in identifier order.
    #[must_use]
    pub fn ghosts(world: &World) -> &[Ghost] {
        &world.ghosts
    }

    /// Mode currently shared by every ghost.
    #[must_use]
    pub fn chase_mode(world: &World) -> ChaseMode {
        world.chase_mode
    }

    /// Number of frames advanced so far.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Reports whether a ghost caught the player since the last reset.
    #[must_use]
    pub fn is_caught(world: &World) -> bool {
        world.caught
    }

    /// Captures a snapshot of the player.
    #[must_use]
    pub fn player_snapshot(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        let motion = player.motion();
        PlayerSnapshot {
            tile: motion.tile(),
            position: motion.position(),
            heading: motion.heading().cardinal(),
            score: player.score(),
            eating: player.eating(),
            moving: player.moving(),
        }
    }

    /// Captures a read-only view of the ghosts.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        GhostView::from_snapshots(
            world
                .ghosts
                .iter()
                .map(|ghost| GhostSnapshot {
                    id: ghost.id(),
                    tile: ghost.motion().tile(),
                    position: ghost.motion().position(),
                    heading: ghost.motion().heading().cardinal(),
                    target: ghost.target(),
                    scatter_corner: ghost.scatter_corner(),
                    strategy: ghost.strategy(),
                    home: ghost.home(),
                })
                .collect(),
        )
    }
}
