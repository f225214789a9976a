//! Frame driver tying the world, the pursuit system and the scene together.

use std::collections::BTreeMap;

use anyhow::Result;
use glam::Vec2;
use maze_chase_core::{Command, Direction, Event, GhostId, HomeState, Tile, Vector};
use maze_chase_rendering::{
    ghost_frame, CollectiblePresentation, FrameControl, FrameInput, GateSegment, Palette,
    Presentation, Scene, SpriteKind, SpritePresentation, TileGridPresentation, WallSegment,
    PLAYER_DEATH_FRAMES, PLAYER_MOVE_FRAMES,
};
use maze_chase_system_pursuit::Pursuit;
use maze_chase_world::{self as world, query, World};
use tracing::{debug, trace};

use crate::config::{ScriptedInput, SimulationConfig};

/// Totals reported once the run ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) frames: u64,
    pub(crate) score: u32,
    pub(crate) catches: u32,
    pub(crate) cleared: bool,
}

/// Owns the world and advances it one frame at a time.
///
/// Per frame: tick, buffer input, advance the player, let pursuit react to
/// what happened so far, apply its commands, then advance the ghosts. Once a
/// ghost catches the player the agents stay frozen until the death sequence
/// has played out, after which they are sent back to their spawns. Pursuit
/// keeps running while frozen so it sees the reset.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    pursuit: Pursuit,
    script: Vec<ScriptedInput>,
    palette: Palette,
    tile_length: f32,
    events: Vec<Event>,
    commands: Vec<Command>,
    ghost_starts: BTreeMap<GhostId, u64>,
    death_start: Option<u64>,
    catches: u32,
    cleared: bool,
}

impl Simulation {
    pub(crate) fn new(config: &SimulationConfig) -> Result<Self> {
        let world = World::with_tuning(config.tuning())?;
        let pursuit = Pursuit::new(config.mode_schedule(), config.release_schedule());
        let mut simulation = Self {
            world,
            pursuit,
            script: config.input.clone(),
            palette: Palette::default(),
            tile_length: config.tile_length,
            events: Vec::new(),
            commands: Vec::new(),
            ghost_starts: BTreeMap::new(),
            death_start: None,
            catches: 0,
            cleared: false,
        };
        simulation.reset_ghost_starts(0);
        Ok(simulation)
    }

    pub(crate) fn summary(&self) -> RunSummary {
        RunSummary {
            frames: query::frame(&self.world),
            score: query::player(&self.world).score(),
            catches: self.catches,
            cleared: self.cleared,
        }
    }

    /// Advances one frame and refreshes `scene` from the result.
    pub(crate) fn frame(&mut self, input: FrameInput, scene: &mut Scene) -> FrameControl {
        let control = self.step(input);
        self.refresh(scene);
        control
    }

    pub(crate) fn step(&mut self, input: FrameInput) -> FrameControl {
        self.events.clear();
        world::apply(&mut self.world, Command::Tick, &mut self.events);
        let frame = query::frame(&self.world);

        if let Some(direction) = self.scripted_heading(frame).or(input.heading) {
            world::apply(
                &mut self.world,
                Command::SetHeading { direction },
                &mut self.events,
            );
        }

        let frozen = query::is_caught(&self.world);
        if frozen {
            self.play_death(frame);
        } else {
            world::apply(&mut self.world, Command::AdvancePlayer, &mut self.events);
        }

        self.pursuit.handle(
            &self.events,
            &query::player_snapshot(&self.world),
            &query::ghost_view(&self.world),
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        if !frozen {
            world::apply(&mut self.world, Command::AdvanceGhosts, &mut self.events);
        }

        self.observe(frame);

        if input.quit || self.cleared {
            FrameControl::Exit
        } else {
            FrameControl::Continue
        }
    }

    fn scripted_heading(&self, frame: u64) -> Option<Direction> {
        self.script
            .binary_search_by_key(&frame, |entry| entry.frame)
            .ok()
            .and_then(|index| self.script.get(index))
            .map(|entry| entry.heading)
    }

    fn play_death(&mut self, frame: u64) {
        let start = self.death_start.unwrap_or(frame);
        let finished = query::player(&self.world)
            .death_frame(frame, start, PLAYER_DEATH_FRAMES)
            .is_none();
        if finished {
            debug!(frame, "death sequence finished, resetting agents");
            world::apply(&mut self.world, Command::ResetAgents, &mut self.events);
            self.death_start = None;
            self.reset_ghost_starts(frame);
        }
    }

    fn observe(&mut self, frame: u64) {
        for event in &self.events {
            trace!(?event);
            match event {
                Event::PlayerCaught { .. } => {
                    self.death_start = Some(frame);
                    self.catches = self.catches.saturating_add(1);
                }
                Event::GhostReleased { ghost } => {
                    let _ = self.ghost_starts.insert(*ghost, frame);
                }
                Event::MazeCleared => self.cleared = true,
                _ => {}
            }
        }
    }

    /// Penned ghosts hold their first pose until released.
    fn reset_ghost_starts(&mut self, frame: u64) {
        for ghost in query::ghost_view(&self.world).iter() {
            let start = match ghost.home {
                HomeState::Waiting => u64::MAX,
                HomeState::Leaving | HomeState::Released => frame,
            };
            let _ = self.ghost_starts.insert(ghost.id, start);
        }
    }

    /// Builds the initial presentation, including the static maze geometry.
    pub(crate) fn presentation(&self) -> Result<Presentation> {
        let maze = query::maze(&self.world);
        let grid = TileGridPresentation::new(maze.columns(), maze.rows(), self.tile_length)?;

        let mut walls = Vec::new();
        let mut gates = Vec::new();
        for tile in maze.coordinates() {
            match maze.tile(tile) {
                Tile::Wall => {
                    let thickness = maze.tile_edge_geometry(tile, self.tile_length)?;
                    if !thickness.is_empty() {
                        walls.push(WallSegment::new(thickness, self.palette.wall));
                    }
                }
                Tile::RestrictedPassage => {
                    gates.push(GateSegment::new(tile, self.tile_length, self.palette.gate));
                }
                _ => {}
            }
        }

        let mut scene = Scene::new(grid, walls, gates, Vec::new(), Vec::new(), 0);
        self.refresh(&mut scene);
        Ok(Presentation::new(
            query::welcome_banner(&self.world),
            self.palette.background,
            scene,
        ))
    }

    fn refresh(&self, scene: &mut Scene) {
        let maze = query::maze(&self.world);
        scene.collectibles = maze
            .coordinates()
            .filter(|tile| maze.tile(*tile) == Tile::Collectible)
            .map(|tile| {
                CollectiblePresentation::new(tile, self.tile_length, self.palette.collectible)
            })
            .collect();

        let grid = scene.tile_grid;
        scene.sprites.clear();
        scene.sprites.push(self.player_sprite(&grid));
        let frame = query::frame(&self.world);
        scene
            .sprites
            .extend(query::ghost_view(&self.world).iter().map(|ghost| {
                let start = self.ghost_starts.get(&ghost.id).copied().unwrap_or(0);
                SpritePresentation {
                    kind: SpriteKind::Ghost(ghost.id),
                    top_left: grid.to_world(to_vec2(ghost.position) - 0.5),
                    frame: ghost_frame(ghost.heading, frame, start),
                    rotation_degrees: 0.0,
                    color: self.palette.ghost(ghost.id),
                }
            }));

        scene.score = query::player(&self.world).score();
        scene.caught = query::is_caught(&self.world);
    }

    fn player_sprite(&self, grid: &TileGridPresentation) -> SpritePresentation {
        let player = query::player(&self.world);
        let frame = query::frame(&self.world);
        let pose = match self.death_start {
            Some(start) => player
                .death_frame(frame, start, PLAYER_DEATH_FRAMES)
                .unwrap_or(PLAYER_DEATH_FRAMES - 1),
            None => player.move_frame(frame, PLAYER_MOVE_FRAMES),
        };
        let heading = player.motion().heading().direction();
        SpritePresentation {
            kind: SpriteKind::Player,
            top_left: grid.to_world(to_vec2(player.motion().top_left())),
            frame: pose,
            rotation_degrees: heading.map_or(0.0, |direction| f32::from(direction.angle())),
            color: self.palette.player,
        }
    }
}

fn to_vec2(vector: Vector) -> Vec2 {
    Vec2::new(vector.x, vector.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::TileCoord;

    fn simulation(config: &SimulationConfig) -> Simulation {
        Simulation::new(config).expect("valid config")
    }

    #[test]
    fn presentation_describes_the_classic_maze() {
        let simulation = simulation(&SimulationConfig::default());
        let presentation = simulation.presentation().expect("scene builds");
        let scene = presentation.scene;

        assert_eq!(presentation.window_title, query::welcome_banner(&simulation.world));
        assert_eq!(scene.collectibles.len(), 246);
        assert_eq!(scene.gates.len(), 2);
        assert!(!scene.walls.is_empty());
        assert_eq!(scene.sprites.len(), 5);
        assert_eq!(scene.sprites[0].kind, SpriteKind::Player);
        assert_eq!(scene.sprites[1].kind, SpriteKind::Ghost(GhostId::new(0)));
        assert_eq!(scene.score, 0);
    }

    #[test]
    fn frame_advances_world_and_refreshes_scene() {
        let mut simulation = simulation(&SimulationConfig::default());
        let mut scene = simulation.presentation().expect("scene builds").scene;

        let control = simulation.frame(FrameInput::default(), &mut scene);

        assert_eq!(control, FrameControl::Continue);
        assert_eq!(query::frame(&simulation.world), 1);
        assert!(simulation
            .events
            .contains(&Event::FrameAdvanced { frame: 1 }));
        // The spawn tile holds a collectible that is eaten straight away.
        assert_eq!(scene.score, 10);
        assert_eq!(scene.collectibles.len(), 245);
    }

    #[test]
    fn scripted_input_is_applied_on_its_frame() {
        let config = SimulationConfig {
            input: vec![ScriptedInput {
                frame: 1,
                heading: Direction::East,
            }],
            ..SimulationConfig::default()
        };
        let mut simulation = simulation(&config);

        let _ = simulation.step(FrameInput::default());

        let motion = query::player(&simulation.world).motion();
        assert_eq!(motion.heading(), Vector::from(Direction::East));
        assert_eq!(motion.tile(), TileCoord::new(23, 13));
    }

    #[test]
    fn quit_request_ends_the_run() {
        let mut simulation = simulation(&SimulationConfig::default());
        let input = FrameInput {
            heading: None,
            quit: true,
        };

        assert_eq!(simulation.step(input), FrameControl::Exit);
    }

    #[test]
    fn death_sequence_plays_before_agents_reset() {
        let config = SimulationConfig {
            catch_distance: 100.0,
            ..SimulationConfig::default()
        };
        let mut simulation = simulation(&config);
        let mut scene = simulation.presentation().expect("scene builds").scene;

        let _ = simulation.frame(FrameInput::default(), &mut scene);
        assert!(scene.caught);
        assert_eq!(simulation.summary().catches, 1);

        for _ in 2..=25 {
            let _ = simulation.frame(FrameInput::default(), &mut scene);
        }
        assert_eq!(scene.sprites[0].frame, 3);

        for _ in 26..=80 {
            let _ = simulation.step(FrameInput::default());
        }
        assert!(query::is_caught(&simulation.world));

        let _ = simulation.step(FrameInput::default());
        assert!(!query::is_caught(&simulation.world));
        assert_eq!(
            query::player(&simulation.world).motion().tile(),
            TileCoord::new(23, 13)
        );

        let _ = simulation.step(FrameInput::default());
        assert_eq!(simulation.summary().catches, 2);
        // Ghost 1 was let out during the first round; the new round makes it
        // wait its full delay again.
        let view = query::ghost_view(&simulation.world);
        assert_eq!(
            view.get(GhostId::new(1)).map(|ghost| ghost.home),
            Some(HomeState::Waiting)
        );
    }

    #[test]
    fn walls_carry_only_their_visible_thickness() {
        let simulation = simulation(&SimulationConfig::default());
        let scene = simulation.presentation().expect("scene builds").scene;
        let length = scene.tile_grid.tile_length;

        for wall in &scene.walls {
            assert!(!wall.thickness.is_empty());
            let tile = wall.thickness[0].origin / length;
            let (column, row) = (tile.x.floor(), tile.y.floor());
            for rect in &wall.thickness {
                assert!(rect.size.x <= length && rect.size.y <= length);
                assert!(rect.origin.x >= column * length && rect.origin.y >= row * length);
                assert!(rect.origin.x + rect.size.x <= (column + 1.0) * length);
                assert!(rect.origin.y + rect.size.y <= (row + 1.0) * length);
            }
        }
        // Wall tiles buried inside a block have no visible edge.
        let maze = query::maze(&simulation.world);
        let wall_tiles = maze
            .coordinates()
            .filter(|tile| maze.tile(*tile) == Tile::Wall)
            .count();
        assert!(scene.walls.len() < wall_tiles);
    }

    #[test]
    fn sprites_are_placed_in_world_units() {
        let simulation = simulation(&SimulationConfig::default());
        let scene = simulation.presentation().expect("scene builds").scene;

        // Player spawns on (23, 13); its two-tile sprite starts half a tile up-left.
        assert_eq!(scene.sprites[0].top_left, Vec2::new(12.5, 22.5) * 16.0);
        assert_eq!(scene.sprites[1].top_left, Vec2::new(12.5, 10.5) * 16.0);
    }

    #[test]
    fn penned_ghosts_hold_first_pose() {
        let mut simulation = simulation(&SimulationConfig::default());
        let mut scene = simulation.presentation().expect("scene builds").scene;

        for _ in 0..12 {
            let _ = simulation.frame(FrameInput::default(), &mut scene);
        }

        let penned = scene
            .sprites
            .iter()
            .find(|sprite| sprite.kind == SpriteKind::Ghost(GhostId::new(3)))
            .expect("ghost 3 is drawn");
        assert_eq!(penned.frame, 0);
    }
}
