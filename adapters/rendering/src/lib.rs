#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.
//!
//! Everything in this crate is a plain descriptor. Backends decide how (and
//! whether) to draw them; the simulation only ever fills them in.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_chase_core::{Direction, GhostId, TileCoord, TileRect};
use thiserror::Error;

/// Poses in the player's movement sprite sheet.
pub const PLAYER_MOVE_FRAMES: usize = 3;

/// Poses in the player's death sprite sheet.
pub const PLAYER_DEATH_FRAMES: usize = 10;

/// Frames each ghost wave pose is held for.
pub const GHOST_WAVE_DIVISOR: u64 = 6;

/// Wave poses per heading in a ghost sprite sheet.
pub const GHOST_WAVE_FRAMES: usize = 2;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Colors assigned to each kind of scene element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill behind everything else.
    pub background: Color,
    /// Wall outline color.
    pub wall: Color,
    /// Pen gate color.
    pub gate: Color,
    /// Collectible color.
    pub collectible: Color,
    /// Player color.
    pub player: Color,
    /// Ghost body colors indexed by ghost identifier.
    pub ghosts: [Color; 4],
}

impl Palette {
    /// Body color of `ghost`; identifiers past the table reuse it cyclically.
    #[must_use]
    pub fn ghost(&self, ghost: GhostId) -> Color {
        self.ghosts[usize::from(ghost.get()) % self.ghosts.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0, 0, 0),
            wall: Color::from_rgb_u8(0, 0, 255),
            gate: Color::from_rgb_u8(255, 192, 255),
            collectible: Color::from_rgb_u8(255, 255, 255),
            player: Color::from_rgb_u8(255, 255, 0),
            ghosts: [
                Color::from_rgb_u8(255, 0, 0),
                Color::from_rgb_u8(255, 184, 255),
                Color::from_rgb_u8(0, 255, 255),
                Color::from_rgb_u8(255, 184, 82),
            ],
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Heading requested by the user on this frame, if any.
    pub heading: Option<Direction>,
    /// Whether the adapter detected a request to quit.
    pub quit: bool,
}

/// Returned by the scene update closure to steer the backend loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Present the scene and keep running.
    Continue,
    /// Present the scene one last time and stop.
    Exit,
}

/// Describes the pixel grid the maze is laid out on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
}

impl TileGridPresentation {
    /// Creates a new tile grid descriptor.
    ///
    /// Returns an error when the grid has no area or the tile length is not a
    /// positive finite number.
    pub fn new(columns: u32, rows: u32, tile_length: f32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyGrid { columns, rows });
        }
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Converts a position in tile units into world units.
    #[must_use]
    pub fn to_world(&self, tiles: Vec2) -> Vec2 {
        tiles * self.tile_length
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectPresentation {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl RectPresentation {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }
}

impl From<TileRect> for RectPresentation {
    fn from(rect: TileRect) -> Self {
        Self::new(
            Vec2::new(rect.x, rect.y),
            Vec2::new(rect.width, rect.height),
        )
    }
}

/// The visible part of a boundary wall tile.
///
/// Backends fill every `thickness` rectangle with `color`; the rest of the
/// tile stays background. Together they trace the wall edges that face
/// open space.
#[derive(Clone, Debug, PartialEq)]
pub struct WallSegment {
    /// Rectangles drawn as wall, in world units.
    pub thickness: Vec<RectPresentation>,
    /// Wall color.
    pub color: Color,
}

impl WallSegment {
    /// Builds a wall segment from a tile's edge geometry.
    #[must_use]
    pub fn new(thickness: Vec<TileRect>, color: Color) -> Self {
        Self {
            thickness: thickness.into_iter().map(RectPresentation::from).collect(),
            color,
        }
    }
}

/// A thin bar across a restricted passage tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateSegment {
    /// Extent of the bar.
    pub bar: RectPresentation,
    /// Bar color.
    pub color: Color,
}

impl GateSegment {
    /// Fraction of the tile trimmed above and below the bar.
    pub const INSET: f32 = 0.1;

    /// Builds the gate bar for `tile`, sitting in the lower half of the tile.
    #[must_use]
    pub fn new(tile: TileCoord, tile_length: f32, color: Color) -> Self {
        let inset = tile_length * Self::INSET;
        let origin = Vec2::new(
            tile.column() as f32 * tile_length,
            (tile.row() as f32 + 0.5) * tile_length + inset,
        );
        let size = Vec2::new(tile_length, tile_length * 0.5 - 2.0 * inset);
        Self {
            bar: RectPresentation::new(origin, size),
            color,
        }
    }
}

/// A collectible still waiting to be eaten.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollectiblePresentation {
    /// Centre in world units.
    pub center: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

impl CollectiblePresentation {
    /// Radius relative to the tile length.
    pub const RADIUS_FRACTION: f32 = 0.1;

    /// Builds the descriptor for a collectible centred on `tile`.
    #[must_use]
    pub fn new(tile: TileCoord, tile_length: f32, color: Color) -> Self {
        Self {
            center: (Vec2::new(tile.column() as f32, tile.row() as f32) + 0.5) * tile_length,
            radius: tile_length * Self::RADIUS_FRACTION,
            color,
        }
    }
}

/// Which agent a sprite depicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// The player.
    Player,
    /// One of the ghosts.
    Ghost(GhostId),
}

/// An agent sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Agent depicted by the sprite.
    pub kind: SpriteKind,
    /// Top-left corner of the two-tile sprite in world units.
    pub top_left: Vec2,
    /// Index into the agent's sprite sheet.
    pub frame: usize,
    /// Counter-clockwise rotation in degrees.
    pub rotation_degrees: f32,
    /// Tint applied to the sprite.
    pub color: Color,
}

/// Scene description combining the maze and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the play area.
    pub tile_grid: TileGridPresentation,
    /// Boundary wall tiles.
    pub walls: Vec<WallSegment>,
    /// Pen gates.
    pub gates: Vec<GateSegment>,
    /// Collectibles left in the maze.
    pub collectibles: Vec<CollectiblePresentation>,
    /// Agent sprites, player first.
    pub sprites: Vec<SpritePresentation>,
    /// Score shown alongside the maze.
    pub score: u32,
    /// Set once a ghost has caught the player.
    pub caught: bool,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        tile_grid: TileGridPresentation,
        walls: Vec<WallSegment>,
        gates: Vec<GateSegment>,
        collectibles: Vec<CollectiblePresentation>,
        sprites: Vec<SpritePresentation>,
        score: u32,
    ) -> Self {
        Self {
            tile_grid,
            walls,
            gates,
            collectibles,
            sprites,
            score,
            caught: false,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Chase scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the input captured for
    /// the frame and may mutate the scene before it is presented. Returning
    /// [`FrameControl::Exit`] ends the loop after that frame.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameControl;
}

/// Sprite sheet index for a ghost.
///
/// Before `start_frame` the first pose is shown. Afterwards the heading picks
/// a pair of poses (east, north, west, south) and the pair alternates every
/// [`GHOST_WAVE_DIVISOR`] frames.
#[must_use]
pub fn ghost_frame(heading: Option<Direction>, frame: u64, start_frame: u64) -> usize {
    if frame < start_frame {
        return 0;
    }
    let heading_index = heading.map_or(0, |direction| usize::from(direction.angle() / 90));
    let wave = usize::try_from(frame / GHOST_WAVE_DIVISOR).unwrap_or(0) % GHOST_WAVE_FRAMES;
    heading_index * GHOST_WAVE_FRAMES + wave
}

/// Errors raised while building presentation descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The grid must contain at least one tile.
    #[error("tile grid must have area (received {columns}x{rows})")]
    EmptyGrid {
        /// Provided column count.
        columns: u32,
        /// Provided row count.
        rows: u32,
    },
    /// Tile length must be a positive finite number.
    #[error("tile_length must be positive and finite (received {tile_length})")]
    InvalidTileLength {
        /// Provided tile length that failed validation.
        tile_length: f32,
    },
}
