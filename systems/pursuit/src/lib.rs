#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that schedules chase modes, releases ghosts and picks their
//! targets from world snapshots.
//!
//! The system must run after the player advanced in a frame so every ghost
//! targets the same, current player tile.

use maze_chase_core::{
    ChaseMode, ChaseStrategy, Command, Event, GhostId, GhostSnapshot, GhostView, HomeState,
    PlayerSnapshot, TileCoord,
};
use serde::{Deserialize, Serialize};

/// Frame rate the classic schedules are expressed in.
pub const FRAMES_PER_SECOND: u64 = 40;

/// One stretch of the mode schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePhase {
    /// Mode in effect during the phase.
    pub mode: ChaseMode,
    /// Length of the phase in frames.
    pub frames: u64,
}

/// Ordered chase/scatter phases. The last phase lasts forever.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeSchedule {
    phases: Vec<ModePhase>,
}

impl ModeSchedule {
    /// Creates a schedule from explicit phases.
    #[must_use]
    pub fn new(phases: Vec<ModePhase>) -> Self {
        Self { phases }
    }

    /// Arcade timings: two rounds of 7 s scatter and 20 s chase, one of 5 s
    /// scatter and 20 s chase, then chase for good.
    #[must_use]
    pub fn classic() -> Self {
        let seconds = |mode, span: u64| ModePhase {
            mode,
            frames: span * FRAMES_PER_SECOND,
        };
        Self::new(vec![
            seconds(ChaseMode::Scatter, 7),
            seconds(ChaseMode::Chase, 20),
            seconds(ChaseMode::Scatter, 7),
            seconds(ChaseMode::Chase, 20),
            seconds(ChaseMode::Scatter, 5),
            seconds(ChaseMode::Chase, 20),
        ])
    }

    /// Phases in order.
    #[must_use]
    pub fn phases(&self) -> &[ModePhase] {
        &self.phases
    }

    /// Mode in effect on `frame`. An empty schedule always chases.
    #[must_use]
    pub fn mode_at(&self, frame: u64) -> ChaseMode {
        let mut start = 0_u64;
        for phase in &self.phases {
            let end = start.saturating_add(phase.frames);
            if frame < end {
                return phase.mode;
            }
            start = end;
        }
        self.phases
            .last()
            .map_or(ChaseMode::Chase, |phase| phase.mode)
    }
}

impl Default for ModeSchedule {
    fn default() -> Self {
        Self::classic()
    }
}

/// Frame on which each penned ghost may leave, counted from the start of
/// the round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReleaseSchedule {
    entries: Vec<(GhostId, u64)>,
}

impl ReleaseSchedule {
    /// Creates a schedule from `(ghost, frame)` pairs.
    #[must_use]
    pub fn new(mut entries: Vec<(GhostId, u64)>) -> Self {
        entries.sort_by_key(|(ghost, _)| *ghost);
        Self { entries }
    }

    /// Staggered releases one, four and eight seconds in.
    #[must_use]
    pub fn classic() -> Self {
        Self::new(vec![
            (GhostId::new(1), FRAMES_PER_SECOND),
            (GhostId::new(2), 4 * FRAMES_PER_SECOND),
            (GhostId::new(3), 8 * FRAMES_PER_SECOND),
        ])
    }

    /// Scheduled `(ghost, frame)` pairs ordered by ghost.
    #[must_use]
    pub fn entries(&self) -> &[(GhostId, u64)] {
        &self.entries
    }

    /// Frame from which `ghost` may leave, if it is scheduled at all.
    #[must_use]
    pub fn release_frame(&self, ghost: GhostId) -> Option<u64> {
        self.entries
            .binary_search_by_key(&ghost, |(id, _)| *id)
            .ok()
            .and_then(|index| self.entries.get(index))
            .map(|(_, frame)| *frame)
    }
}

/// Target a ghost should steer toward under `mode`.
#[must_use]
pub fn target_for(ghost: &GhostSnapshot, player: &PlayerSnapshot, mode: ChaseMode) -> TileCoord {
    match (mode, ghost.strategy) {
        (ChaseMode::Scatter, _) => ghost.scatter_corner,
        (ChaseMode::Chase, ChaseStrategy::Direct) => player.tile,
        (ChaseMode::Chase, ChaseStrategy::Ahead { tiles }) => player
            .heading
            .map_or(player.tile, |heading| player.tile.offset(heading, tiles)),
    }
}

/// Pursuit system driving the shared mode, releases and ghost targets.
#[derive(Debug)]
pub struct Pursuit {
    modes: ModeSchedule,
    releases: ReleaseSchedule,
    mode: ChaseMode,
    frame: u64,
    round_start: u64,
}

impl Pursuit {
    /// Creates a pursuit system. The world is assumed to start scattering.
    #[must_use]
    pub fn new(modes: ModeSchedule, releases: ReleaseSchedule) -> Self {
        Self {
            modes,
            releases,
            mode: ChaseMode::Scatter,
            frame: 0,
            round_start: 0,
        }
    }

    /// Mode the system last observed or requested.
    #[must_use]
    pub const fn mode(&self) -> ChaseMode {
        self.mode
    }

    /// Consumes world events and snapshots, emitting commands into `out`.
    ///
    /// The output buffer is cleared first. An [`Event::AgentsReset`] starts a
    /// new round, so penned ghosts wait out their release delay again.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        ghosts: &GhostView,
        out: &mut Vec<Command>,
    ) {
        out.clear();

        for event in events {
            match event {
                Event::FrameAdvanced { frame } => self.frame = *frame,
                Event::ChaseModeChanged { mode } => self.mode = *mode,
                Event::AgentsReset => self.round_start = self.frame,
                _ => {}
            }
        }

        let scheduled = self.modes.mode_at(self.frame);
        if scheduled != self.mode {
            self.mode = scheduled;
            out.push(Command::SetChaseMode { mode: scheduled });
        }

        for ghost in ghosts.iter() {
            match ghost.home {
                HomeState::Waiting => {
                    let due = self
                        .releases
                        .release_frame(ghost.id)
                        .is_some_and(|delay| self.frame >= self.round_start.saturating_add(delay));
                    if due {
                        out.push(Command::ReleaseGhost { ghost: ghost.id });
                    }
                }
                HomeState::Leaving => {}
                HomeState::Released => {
                    let target = target_for(ghost, player, self.mode);
                    if target != ghost.target {
                        out.push(Command::RetargetGhost {
                            ghost: ghost.id,
                            target,
                        });
                    }
                }
            }
        }
    }
}

impl Default for Pursuit {
    fn default() -> Self {
        Self::new(ModeSchedule::classic(), ReleaseSchedule::classic())
    }
}
