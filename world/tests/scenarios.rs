use std::collections::HashMap;

use maze_chase_core::{
    ChaseStrategy, Command, Direction, Event, GhostId, HomeState, Tile, TileCoord, TileSet, Vector,
};
use maze_chase_world::{
    self as world, query, Ghost, GhostSeed, Maze, Motion, Player, World, COLLECTIBLE_POINTS,
    TUNNEL_ROW,
};

fn laid_out() -> Maze {
    let mut maze = Maze::default();
    maze.init();
    maze
}

fn roaming(spawn: TileCoord, heading: Direction) -> Ghost {
    Ghost::new(
        GhostSeed {
            id: GhostId::new(0),
            spawn,
            heading,
            strategy: ChaseStrategy::Direct,
            scatter_corner: TileCoord::new(0, 27),
            home: HomeState::Released,
        },
        0.16,
        0.6,
    )
}

const SCRIPT: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

fn scripted_heading(frame: u64) -> Option<Direction> {
    (frame % 37 == 0).then(|| SCRIPT[((frame / 37) % 4) as usize])
}

#[test]
fn tunnel_row_wraps_both_ways() {
    let maze = laid_out();
    assert_eq!(
        maze.tile(TileCoord::new(TUNNEL_ROW, -1)),
        maze.tile(TileCoord::new(TUNNEL_ROW, 27))
    );
    assert_eq!(
        maze.tile(TileCoord::new(TUNNEL_ROW, 28)),
        maze.tile(TileCoord::new(TUNNEL_ROW, 0))
    );
}

#[test]
fn every_in_bounds_tile_is_stable_after_init() {
    let maze = laid_out();
    for tile in maze.coordinates() {
        let first = maze.tile(tile);
        assert!(Tile::ALL.contains(&first));
        assert_eq!(maze.tile(tile), first);
    }
}

#[test]
fn stamping_a_block_twice_matches_stamping_once() {
    let mut once = laid_out();
    let mut twice = once.clone();
    let (a, b) = (TileCoord::new(20, -10), TileCoord::new(26, -3));
    once.add_block(a, b, Tile::Collectible, TileSet::BOUNDARY);
    twice.add_block(a, b, Tile::Collectible, TileSet::BOUNDARY);
    twice.add_block(a, b, Tile::Collectible, TileSet::BOUNDARY);
    assert_eq!(once, twice);
}

#[test]
fn reinit_refills_collectibles() {
    let mut maze = laid_out();
    let before = maze.collectibles_remaining();
    maze.set_tile(TileCoord::new(1, 1), Tile::Open).expect("in bounds");
    assert_eq!(maze.collectibles_remaining(), before - 1);
    maze.init();
    assert_eq!(maze.collectibles_remaining(), before);
}

#[test]
fn tunnel_advance_steps_one_column_per_call() {
    let maze = laid_out();
    let east = Vector::from(Direction::East);

    let mut motion = Motion::new(TileCoord::new(TUNNEL_ROW, 3), east, 1.0, TileSet::WALKABLE);
    let mut columns = Vec::new();
    for _ in 0..3 {
        assert!(motion.can_move(&maze, east));
        motion.advance(&maze, east, 1.0);
        columns.push(motion.tile().column());
    }
    assert_eq!(columns, vec![4, 5, 6]);

    let mut edge = Motion::new(TileCoord::new(TUNNEL_ROW, 26), east, 1.0, TileSet::WALKABLE);
    let mut wrapped = Vec::new();
    for _ in 0..3 {
        assert!(edge.can_move(&maze, east));
        edge.advance(&maze, east, 1.0);
        wrapped.push(edge.tile().column());
    }
    assert_eq!(wrapped, vec![27, 0, 1]);
    assert_eq!(edge.position(), Vector::new(1.0, TUNNEL_ROW as f32));

    let mut ghost = roaming(TileCoord::new(TUNNEL_ROW, 3), Direction::East);
    let _ = ghost.update_speed(&maze);
    assert!((ghost.motion().speed() - 0.16 * 0.6).abs() < 1e-6);
}

#[test]
fn buffered_north_turn_eats_the_collectible() {
    let mut maze = laid_out();
    let above = TileCoord::new(4, 6);
    assert_eq!(maze.tile(above), Tile::Collectible);

    let mut player = Player::new(TileCoord::new(5, 6), Direction::East, 1.0);
    player.set_next_heading(Direction::North);
    let step = player.update_pos(&mut maze);

    assert!(step.moved);
    assert_eq!(player.motion().heading(), Vector::from(Direction::North));
    assert_eq!(player.next_heading(), None);
    assert_eq!(step.to, above);
    assert!(player.eating());
    assert_eq!(player.score(), 10);
    assert_eq!(maze.tile(above), Tile::Open);
}

#[test]
fn ghost_takes_the_turn_toward_a_northern_target() {
    let maze = laid_out();
    let mut ghost = roaming(TileCoord::new(5, 6), Direction::East);
    ghost.set_target(TileCoord::new(0, 6));
    assert_eq!(ghost.update_speed(&maze), Some(Direction::North));
    assert_eq!(ghost.motion().heading(), Vector::from(Direction::North));
}

fn run_frame(world: &mut World, frame: u64, events: &mut Vec<Event>) {
    world::apply(world, Command::Tick, events);
    if let Some(direction) = scripted_heading(frame) {
        world::apply(world, Command::SetHeading { direction }, events);
    }
    world::apply(world, Command::AdvancePlayer, events);
    let target = query::player_snapshot(world).tile;
    for ghost in query::ghost_view(world).iter() {
        world::apply(
            world,
            Command::RetargetGhost {
                ghost: ghost.id,
                target,
            },
            events,
        );
    }
    world::apply(world, Command::AdvanceGhosts, events);
    if query::is_caught(world) {
        world::apply(world, Command::ResetAgents, events);
    }
}

#[test]
fn player_motion_stays_axis_snapped() {
    let mut world = World::new();
    let mut events = Vec::new();
    for frame in 0..1_500 {
        let before = query::player_snapshot(&world);
        run_frame(&mut world, frame, &mut events);
        let after = query::player_snapshot(&world);
        if after.tile == query::player(&world).motion().spawn() && before.tile != after.tile {
            continue;
        }

        let row_step = (after.tile.row() - before.tile.row()).abs();
        let column_step = (after.tile.column() - before.tile.column()).rem_euclid(28);
        let column_step = column_step.min(28 - column_step);
        assert!(row_step + column_step <= 1, "jumped from {} to {}", before.tile, after.tile);

        match after.heading {
            Some(Direction::North | Direction::South) if after.moving => {
                assert_eq!(after.position.x, after.tile.column() as f32);
            }
            Some(Direction::East | Direction::West) if after.moving => {
                assert_eq!(after.position.y, after.tile.row() as f32);
            }
            _ => {}
        }
    }
}

#[test]
fn collectibles_are_consumed_exactly_once() {
    let mut world = World::new();
    let mut events = Vec::new();
    for frame in 0..3_000 {
        run_frame(&mut world, frame, &mut events);
    }

    let mut eaten: HashMap<TileCoord, u32> = HashMap::new();
    let mut points = 0;
    for event in &events {
        if let Event::CollectibleConsumed { tile, points: award } = event {
            *eaten.entry(*tile).or_default() += 1;
            points += award;
        }
    }
    assert!(!eaten.is_empty());
    assert!(eaten.values().all(|count| *count == 1));
    assert_eq!(points, eaten.len() as u32 * COLLECTIBLE_POINTS);
    assert_eq!(query::player_snapshot(&world).score, points);
    let maze = query::maze(&world);
    assert!(eaten.keys().all(|tile| maze.tile(*tile) == Tile::Open));
    assert_eq!(maze.collectibles_remaining() + eaten.len(), 246);
}

#[test]
fn ghosts_never_reverse_while_roaming() {
    let mut world = World::new();
    let mut events = Vec::new();
    for ghost in 1..4 {
        world::apply(
            &mut world,
            Command::ReleaseGhost {
                ghost: GhostId::new(ghost),
            },
            &mut events,
        );
    }

    let mut turns = 0;
    for frame in 0..2_000 {
        let headings: HashMap<GhostId, Option<Direction>> = query::ghost_view(&world)
            .iter()
            .map(|ghost| (ghost.id, ghost.heading))
            .collect();
        let mut frame_events = Vec::new();
        run_frame(&mut world, frame, &mut frame_events);
        for event in &frame_events {
            if let Event::GhostTurned {
                ghost, direction, ..
            } = event
            {
                turns += 1;
                let previous = headings.get(ghost).copied().flatten();
                assert_ne!(previous.map(Direction::reverse), Some(*direction));
            }
        }
        events.extend(frame_events);
    }
    assert!(turns > 0);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::GhostLeftHome { .. })));
}
