//! Simulation settings read from an optional TOML file.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use maze_chase_core::{Direction, GhostId};
use maze_chase_system_pursuit::{ModePhase, ModeSchedule, ReleaseSchedule};
use maze_chase_world::Tuning;
use serde::{Deserialize, Serialize};

/// Frames simulated when neither the file nor the command line says otherwise.
const DEFAULT_FRAMES: u64 = 2_400;

const DEFAULT_TILE_LENGTH: f32 = 16.0;

/// Everything the headless driver needs to run a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    pub(crate) player_speed: f32,
    pub(crate) ghost_speed: f32,
    pub(crate) tunnel_factor: f32,
    pub(crate) catch_distance: f32,
    /// Frame budget for the run.
    pub(crate) frames: u64,
    /// Print the maze every this many frames; zero prints only the last one.
    pub(crate) dump_every: u64,
    pub(crate) tile_length: f32,
    pub(crate) modes: Vec<ModePhase>,
    pub(crate) releases: Vec<ReleaseEntry>,
    pub(crate) input: Vec<ScriptedInput>,
}

/// Frame on which a penned ghost may leave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReleaseEntry {
    pub(crate) ghost: u8,
    pub(crate) frame: u64,
}

/// Heading pressed on a given frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptedInput {
    pub(crate) frame: u64,
    pub(crate) heading: Direction,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let tuning = Tuning::default();
        Self {
            player_speed: tuning.player_speed,
            ghost_speed: tuning.ghost_speed,
            tunnel_factor: tuning.tunnel_factor,
            catch_distance: tuning.catch_distance,
            frames: DEFAULT_FRAMES,
            dump_every: 0,
            tile_length: DEFAULT_TILE_LENGTH,
            modes: ModeSchedule::classic().phases().to_vec(),
            releases: ReleaseSchedule::classic()
                .entries()
                .iter()
                .map(|(ghost, frame)| ReleaseEntry {
                    ghost: ghost.get(),
                    frame: *frame,
                })
                .collect(),
            input: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read simulation config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid simulation config at {}", path.display()))
    }

    /// Parses and validates configuration text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(contents).context("failed to parse simulation config toml contents")?;
        config.input.sort_by_key(|entry| entry.frame);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(pair) = self
            .input
            .windows(2)
            .find(|pair| pair[0].frame == pair[1].frame)
        {
            bail!("duplicate scripted input for frame {}", pair[0].frame);
        }
        if let Some(entry) = self.input.iter().find(|entry| !entry.heading.is_cardinal()) {
            bail!(
                "scripted input on frame {} must be a cardinal heading, got {:?}",
                entry.frame,
                entry.heading
            );
        }
        let mut ghosts: Vec<u8> = self.releases.iter().map(|entry| entry.ghost).collect();
        ghosts.sort_unstable();
        if let Some(pair) = ghosts.windows(2).find(|pair| pair[0] == pair[1]) {
            bail!("ghost {} is released more than once", pair[0]);
        }
        Ok(())
    }

    /// World tuning described by the file.
    pub(crate) fn tuning(&self) -> Tuning {
        Tuning {
            player_speed: self.player_speed,
            ghost_speed: self.ghost_speed,
            tunnel_factor: self.tunnel_factor,
            catch_distance: self.catch_distance,
        }
    }

    pub(crate) fn mode_schedule(&self) -> ModeSchedule {
        ModeSchedule::new(self.modes.clone())
    }

    pub(crate) fn release_schedule(&self) -> ReleaseSchedule {
        ReleaseSchedule::new(
            self.releases
                .iter()
                .map(|entry| (GhostId::new(entry.ghost), entry.frame))
                .collect(),
        )
    }
}
