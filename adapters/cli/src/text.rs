//! Headless backend that prints scenes as glyph grids.

use std::io::Write;

use anyhow::{Context, Result};
use maze_chase_rendering::{
    FrameControl, FrameInput, Presentation, RenderingBackend, Scene, SpriteKind,
};

const EMPTY: char = ' ';
const WALL: char = '#';
const GATE: char = '=';
const COLLECTIBLE: char = '.';
const PLAYER: char = 'C';
const CAUGHT_PLAYER: char = 'x';

/// Runs a fixed number of frames and writes selected scenes to `writer`.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    writer: W,
    frames: u64,
    dump_every: u64,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(writer: W, frames: u64, dump_every: u64) -> Self {
        Self {
            writer,
            frames,
            dump_every,
        }
    }

    fn dump(&mut self, frame: u64, scene: &Scene) -> Result<()> {
        let status = if scene.caught { " caught" } else { "" };
        writeln!(self.writer, "frame {frame} score {}{status}", scene.score)?;
        for row in render(scene) {
            writeln!(self.writer, "{row}")?;
        }
        Ok(())
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameControl,
    {
        let mut scene = presentation.scene;
        writeln!(self.writer, "{}", presentation.window_title)
            .context("failed to write presentation title")?;

        for frame in 1..=self.frames {
            let control = update_scene(FrameInput::default(), &mut scene);
            let last = control == FrameControl::Exit || frame == self.frames;
            let periodic = self.dump_every > 0 && frame % self.dump_every == 0;
            if last || periodic {
                self.dump(frame, &scene)
                    .with_context(|| format!("failed to write scene for frame {frame}"))?;
            }
            if control == FrameControl::Exit {
                break;
            }
        }
        self.writer.flush().context("failed to flush scene output")?;
        Ok(())
    }
}

/// One string per maze row.
fn render(scene: &Scene) -> Vec<String> {
    let grid = &scene.tile_grid;
    let columns = usize::try_from(grid.columns).unwrap_or(0);
    let rows = usize::try_from(grid.rows).unwrap_or(0);
    let mut cells = vec![vec![EMPTY; columns]; rows];

    let mut stamp = |x: f32, y: f32, glyph: char| {
        let column = (x.floor() as i64).rem_euclid(columns.max(1) as i64) as usize;
        let row = y.floor() as i64;
        if let Some(cell) = usize::try_from(row)
            .ok()
            .and_then(|row| cells.get_mut(row))
            .and_then(|line| line.get_mut(column))
        {
            *cell = glyph;
        }
    };

    let length = grid.tile_length;
    for rect in scene.walls.iter().flat_map(|wall| &wall.thickness) {
        let origin = rect.origin / length;
        stamp(origin.x, origin.y, WALL);
    }
    for gate in &scene.gates {
        let origin = gate.bar.origin / length;
        stamp(origin.x, origin.y, GATE);
    }
    for collectible in &scene.collectibles {
        let center = collectible.center / length;
        stamp(center.x, center.y, COLLECTIBLE);
    }
    for sprite in &scene.sprites {
        let glyph = match sprite.kind {
            SpriteKind::Player if scene.caught => CAUGHT_PLAYER,
            SpriteKind::Player => PLAYER,
            SpriteKind::Ghost(ghost) => char::from_digit(u32::from(ghost.get()) % 10, 10)
                .unwrap_or('?'),
        };
        // Sprites span two tiles centred one tile in from their corner.
        let centre = sprite.top_left / length + 1.0;
        stamp(centre.x, centre.y, glyph);
    }

    cells
        .into_iter()
        .map(|line| line.into_iter().collect())
        .collect()
}
