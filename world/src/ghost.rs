//! Adversaries that chase the player.

use maze_chase_core::{ChaseStrategy, Direction, GhostId, HomeState, TileCoord, TileSet, Vector};
use tracing::trace;

use crate::{maze::Maze, motion::Motion};

/// Row a leaving ghost must reach to count as released.
pub const RELEASE_ROW: i32 = 11;

/// Placement and personality of a ghost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostSeed {
    /// Identifier of the ghost.
    pub id: GhostId,
    /// Tile the ghost starts on.
    pub spawn: TileCoord,
    /// Initial heading.
    pub heading: Direction,
    /// Target rule used while chasing.
    pub strategy: ChaseStrategy,
    /// Corner targeted while scattering.
    pub scatter_corner: TileCoord,
    /// Home state at spawn and after every reset.
    pub home: HomeState,
}

/// Result of moving a ghost for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostMove {
    /// Tile occupied before the step.
    pub from: TileCoord,
    /// Tile occupied after the step.
    pub to: TileCoord,
    /// Indicates whether the ghost crossed the release row this frame.
    pub left_home: bool,
}

/// Adversary steering greedily toward a target tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Ghost {
    seed: GhostSeed,
    motion: Motion,
    speed_norm: f32,
    tunnel_factor: f32,
    target: TileCoord,
    home: HomeState,
    last_turn: Option<TileCoord>,
}

impl Ghost {
    /// Creates a ghost from its seed.
    #[must_use]
    pub fn new(seed: GhostSeed, speed: f32, tunnel_factor: f32) -> Self {
        Self {
            motion: Motion::new(
                seed.spawn,
                Vector::from(seed.heading),
                speed,
                passable_for(seed.home),
            ),
            speed_norm: speed,
            tunnel_factor,
            target: seed.scatter_corner,
            home: seed.home,
            last_turn: None,
            seed,
        }
    }

    /// Identifier of the ghost.
    #[must_use]
    pub const fn id(&self) -> GhostId {
        self.seed.id
    }

    /// Shared motion state.
    #[must_use]
    pub const fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Tile the ghost is steering toward.
    #[must_use]
    pub const fn target(&self) -> TileCoord {
        self.target
    }

    /// Corner targeted while scattering.
    #[must_use]
    pub const fn scatter_corner(&self) -> TileCoord {
        self.seed.scatter_corner
    }

    /// Target rule used while chasing.
    #[must_use]
    pub const fn strategy(&self) -> ChaseStrategy {
        self.seed.strategy
    }

    /// Progress out of the pen.
    #[must_use]
    pub const fn home(&self) -> HomeState {
        self.home
    }

    /// Replaces the target tile.
    pub fn set_target(&mut self, target: TileCoord) {
        self.target = target;
    }

    /// Lets a waiting ghost head for the gate. Returns `true` on change.
    pub fn release(&mut self) -> bool {
        if self.home != HomeState::Waiting {
            return false;
        }
        self.home = HomeState::Leaving;
        self.motion.set_passable(passable_for(self.home));
        true
    }

    /// Chooses the heading and speed for this frame.
    ///
    /// Returns the new heading when the ghost turned.
    pub fn update_speed(&mut self, maze: &Maze) -> Option<Direction> {
        let turn = match self.home {
            HomeState::Waiting => None,
            HomeState::Leaving => self.steer_to_gate(maze),
            HomeState::Released => self.decide(maze),
        };
        let speed = if maze.in_tunnel(self.motion.tile()) {
            self.speed_norm * self.tunnel_factor
        } else {
            self.speed_norm
        };
        self.motion.set_speed(speed);
        turn
    }

    /// Moves one frame along the current heading.
    pub fn advance(&mut self, maze: &Maze) -> Option<GhostMove> {
        if self.home == HomeState::Waiting {
            return None;
        }
        let heading = self.motion.heading();
        if !self.motion.can_move(maze, heading) {
            return None;
        }
        let from = self.motion.tile();
        self.motion.advance(maze, heading, self.motion.speed());

        let left_home = self.home == HomeState::Leaving && self.motion.tile().row() <= RELEASE_ROW;
        if left_home {
            self.home = HomeState::Released;
            self.motion.set_passable(passable_for(self.home));
            self.last_turn = None;
        }
        Some(GhostMove {
            from,
            to: self.motion.tile(),
            left_home,
        })
    }

    /// Reports whether the ghost is within `distance` of `position`.
    ///
    /// Distance is measured across the tunnel seam, so agents on opposite
    /// ends of the wrapped row can still meet.
    #[must_use]
    pub fn catches(&self, maze: &Maze, position: Vector, distance: f32) -> bool {
        let width = maze.columns() as f32;
        self.motion.position().distance_wrapped_x(position, width) <= distance
    }

    /// Returns to the spawn tile in the seeded home state.
    pub fn reset(&mut self) {
        *self = Self::new(self.seed, self.speed_norm, self.tunnel_factor);
    }

    fn steer_to_gate(&mut self, maze: &Maze) -> Option<Direction> {
        let exit_column = maze.width() / 2 - 1;
        let column = self.motion.tile().column();
        let direction = if column < exit_column {
            Direction::East
        } else if column > exit_column {
            Direction::West
        } else {
            Direction::North
        };
        self.turn_to(direction)
    }

    fn decide(&mut self, maze: &Maze) -> Option<Direction> {
        let tile = self.motion.tile();
        if self.last_turn == Some(tile) {
            return None;
        }

        let heading = self.motion.heading().cardinal();
        let turns: Vec<Direction> = Direction::CARDINALS
            .into_iter()
            .filter(|direction| self.motion.can_move(maze, Vector::from(*direction)))
            .collect();
        let blocked = heading.map_or(true, |heading| !turns.contains(&heading));
        if !blocked && turns.len() <= 2 {
            return None;
        }

        self.last_turn = Some(tile);
        let reverse = heading.map(Direction::reverse);
        let choice = closest_turn(tile, self.target, &turns, reverse)
            .or_else(|| reverse.filter(|reverse| turns.contains(reverse)));
        trace!(
            ghost = self.seed.id.get(),
            at = %tile,
            target = %self.target,
            ?choice,
            "ghost reached a decision tile"
        );
        choice.and_then(|direction| self.turn_to(direction))
    }

    fn turn_to(&mut self, direction: Direction) -> Option<Direction> {
        if self.motion.heading().cardinal() == Some(direction) {
            return None;
        }
        self.motion.set_heading(direction);
        Some(direction)
    }
}

/// Picks the turn whose neighbour lies closest to `target`, never reversing.
/// Ties go to the earliest direction in [`Direction::CARDINALS`].
fn closest_turn(
    tile: TileCoord,
    target: TileCoord,
    turns: &[Direction],
    reverse: Option<Direction>,
) -> Option<Direction> {
    let mut best: Option<(Direction, f32)> = None;
    for direction in turns.iter().copied() {
        if Some(direction) == reverse {
            continue;
        }
        let distance = tile.adjacent(direction).distance(target);
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((direction, distance));
        }
    }
    best.map(|(direction, _)| direction)
}

fn passable_for(home: HomeState) -> TileSet {
    match home {
        HomeState::Released => TileSet::WALKABLE,
        HomeState::Waiting | HomeState::Leaving => {
            TileSet::WALKABLE | TileSet::OUT_OF_BOUNDS | TileSet::RESTRICTED_PASSAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::Tile;

    fn maze() -> Maze {
        let mut maze = Maze::default();
        maze.init();
        maze
    }

    fn seed(spawn: TileCoord, heading: Direction, home: HomeState) -> GhostSeed {
        GhostSeed {
            id: GhostId::new(0),
            spawn,
            heading,
            strategy: ChaseStrategy::Direct,
            scatter_corner: TileCoord::new(0, 27),
            home,
        }
    }

    fn roaming(spawn: TileCoord, heading: Direction) -> Ghost {
        Ghost::new(seed(spawn, heading, HomeState::Released), 0.5, 0.6)
    }

    #[test]
    fn home_state_selects_passable_tiles() {
        let ghost = roaming(TileCoord::new(RELEASE_ROW, 13), Direction::West);
        assert_eq!(ghost.motion().passable(), TileSet::WALKABLE);

        let penned = Ghost::new(
            seed(TileCoord::new(14, 13), Direction::North, HomeState::Waiting),
            0.16,
            0.6,
        );
        assert_eq!(penned.home(), HomeState::Waiting);
        assert!(penned.motion().passable().admits(Tile::RestrictedPassage));
    }

    #[test]
    fn waiting_ghost_stays_put_until_released() {
        let maze = maze();
        let mut ghost = Ghost::new(
            seed(TileCoord::new(14, 13), Direction::North, HomeState::Waiting),
            0.5,
            0.6,
        );
        assert_eq!(ghost.update_speed(&maze), None);
        assert_eq!(ghost.advance(&maze), None);
        assert!(ghost.release());
        assert!(!ghost.release());
        assert_eq!(ghost.home(), HomeState::Leaving);
    }

    #[test]
    fn leaving_ghost_walks_through_the_gate() {
        let maze = maze();
        let mut ghost = Ghost::new(
            seed(TileCoord::new(14, 11), Direction::North, HomeState::Waiting),
            0.5,
            0.6,
        );
        assert!(ghost.release());

        let mut left = false;
        for _ in 0..40 {
            let _ = ghost.update_speed(&maze);
            if ghost.advance(&maze).is_some_and(|step| step.left_home) {
                left = true;
                break;
            }
        }
        assert!(left);
        assert_eq!(ghost.home(), HomeState::Released);
        assert_eq!(ghost.motion().tile(), TileCoord::new(RELEASE_ROW, 13));
        assert!(!ghost.motion().passable().admits(Tile::RestrictedPassage));
    }

    #[test]
    fn reset_restores_the_pen() {
        let maze = maze();
        let mut ghost = Ghost::new(
            seed(TileCoord::new(14, 13), Direction::North, HomeState::Waiting),
            0.5,
            0.6,
        );
        assert!(ghost.release());
        let _ = ghost.update_speed(&maze);
        let _ = ghost.advance(&maze);
        ghost.set_target(TileCoord::new(3, 3));
        ghost.reset();
        assert_eq!(ghost.home(), HomeState::Waiting);
        assert_eq!(ghost.motion().tile(), TileCoord::new(14, 13));
        assert_eq!(ghost.target(), TileCoord::new(0, 27));
    }

    #[test]
    fn straight_corridor_needs_no_decision() {
        let maze = maze();
        let mut ghost = roaming(TileCoord::new(1, 3), Direction::East);
        assert_eq!(ghost.update_speed(&maze), None);
        assert_eq!(ghost.last_turn, None);
    }

    #[test]
    fn corner_forces_the_only_forward_turn() {
        let maze = maze();
        let mut ghost = roaming(TileCoord::new(1, 1), Direction::North);
        assert_eq!(ghost.update_speed(&maze), Some(Direction::East));
        // not repeated on the same tile
        assert_eq!(ghost.update_speed(&maze), None);
    }

    #[test]
    fn dead_end_reverses() {
        let mut maze = Maze::new(3, 4).expect("maze");
        maze.add_block(TileCoord::new(0, 0), TileCoord::new(-1, -1), Tile::Wall, TileSet::empty());
        maze.add_block(TileCoord::new(1, 1), TileCoord::new(1, 2), Tile::Open, TileSet::empty());
        let mut ghost = roaming(TileCoord::new(1, 2), Direction::East);
        assert_eq!(ghost.update_speed(&maze), Some(Direction::West));
    }

    #[test]
    fn tunnel_slows_the_ghost() {
        let maze = maze();
        let mut ghost = roaming(TileCoord::new(14, 3), Direction::East);
        let _ = ghost.update_speed(&maze);
        assert!((ghost.motion().speed() - 0.3).abs() < 1e-6);

        let mut outside = roaming(TileCoord::new(14, 7), Direction::East);
        let _ = outside.update_speed(&maze);
        assert!((outside.motion().speed() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn closest_turn_prefers_canonical_order_on_ties() {
        let tile = TileCoord::new(5, 5);
        let turns = [Direction::North, Direction::East, Direction::South, Direction::West];
        // east and south neighbours are equally close
        let target = TileCoord::new(6, 6);
        assert_eq!(closest_turn(tile, target, &turns, None), Some(Direction::East));
        assert_eq!(
            closest_turn(tile, target, &turns, Some(Direction::East)),
            Some(Direction::South)
        );
        assert_eq!(closest_turn(tile, target, &[Direction::West], Some(Direction::West)), None);
    }

    #[test]
    fn catch_uses_euclidean_distance() {
        let maze = maze();
        let ghost = roaming(TileCoord::new(5, 5), Direction::East);
        assert!(ghost.catches(&maze, Vector::new(5.3, 5.3), 0.5));
        assert!(!ghost.catches(&maze, Vector::new(5.5, 5.5), 0.5));
    }

    #[test]
    fn catch_reaches_across_the_tunnel_seam() {
        let maze = maze();
        let mut ghost = roaming(TileCoord::new(14, 0), Direction::West);
        let _ = ghost.update_speed(&maze);
        assert!(ghost.advance(&maze).is_some());
        assert!((ghost.motion().position().x + 0.3).abs() < 1e-6);

        let player = Vector::new(27.4, 14.0);
        assert!(ghost.motion().position().distance(player) > 27.0);
        assert!(ghost.catches(&maze, player, 0.5));
    }

    #[test]
    fn released_ghost_crosses_the_tunnel_slowly() {
        let maze = maze();
        let mut ghost = roaming(TileCoord::new(14, 3), Direction::West);
        ghost.set_target(TileCoord::new(14, 20));

        let mut columns = vec![ghost.motion().tile().column()];
        for _ in 0..200 {
            let turned = ghost.update_speed(&maze);
            let column = ghost.motion().tile().column();
            let expected = if maze.in_tunnel(ghost.motion().tile()) { 0.3 } else { 0.5 };
            assert!((ghost.motion().speed() - expected).abs() < 1e-6);
            assert_eq!(turned, None, "no junction along the tunnel at column {column}");
            assert!(ghost.advance(&maze).is_some());
            let heading = ghost.motion().heading();
            assert_eq!(heading, Vector::from(Direction::West));
            columns.push(ghost.motion().tile().column());
            if ghost.motion().tile().column() == 22 {
                break;
            }
        }

        assert!(columns.contains(&0));
        assert!(columns.contains(&27));
        let seam = columns
            .windows(2)
            .position(|pair| pair[0] == 0 && pair[1] == 27);
        assert!(seam.is_some(), "column sequence {columns:?} never wrapped");
        assert!(columns.iter().all(|column| (0..28).contains(column)));
        assert_eq!(ghost.motion().tile(), TileCoord::new(14, 22));
    }
}
