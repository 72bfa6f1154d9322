//! Game state machine and scene data
//!
//! One `GameStateMachine` per process, owned by the host loop.
//! Scenes form a closed set; moving between them replaces the active scene.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleField, ObstacleKind};
use super::player::{Player, PlayerController, PlayerPose};
use crate::Tuning;

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen, waiting for start
    Title,
    /// Active run
    Playing,
    /// Run frozen mid-descent
    Paused,
    /// Run ended on an obstacle
    Crashed,
    /// Run ended past the goal line
    Won,
}

/// Notable things that happened during a tick (for audio/UI hosts)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { seed: u64 },
    Jumped { y: f32 },
    Crashed { kind: ObstacleKind, distance: u32 },
    Won { distance: u32 },
    Paused,
    Resumed,
}

/// A run in progress
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub seed: u64,
    pub controller: PlayerController,
    pub field: ObstacleField,
    /// Simulation ticks elapsed in this run
    pub ticks: u64,
}

impl Run {
    /// Fresh player at home on a course generated from `seed`
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self::on_course(seed, tuning, ObstacleField::from_tuning(seed, tuning))
    }

    /// Fresh player at home on a prebuilt course
    pub fn on_course(seed: u64, tuning: &Tuning, field: ObstacleField) -> Self {
        Self {
            seed,
            controller: PlayerController::new(tuning),
            field,
            ticks: 0,
        }
    }

    fn summarize(&self, cause: Option<ObstacleKind>) -> RunSummary {
        RunSummary {
            seed: self.seed,
            distance: self.controller.distance(),
            ticks: self.ticks,
            cause,
            player: self.controller.player().clone(),
        }
    }
}

/// What the end screens show about a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub distance: u32,
    pub ticks: u64,
    /// Obstacle that ended the run (None for a win)
    pub cause: Option<ObstacleKind>,
    /// Player as it was on the final tick
    pub player: Player,
}

/// The active scene; exactly one per `GameState`
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Title,
    Playing(Run),
    Paused(Run),
    Crashed(RunSummary),
    Won(RunSummary),
}

impl Scene {
    pub fn state(&self) -> GameState {
        match self {
            Scene::Title => GameState::Title,
            Scene::Playing(_) => GameState::Playing,
            Scene::Paused(_) => GameState::Paused,
            Scene::Crashed(_) => GameState::Crashed,
            Scene::Won(_) => GameState::Won,
        }
    }

    /// The run still on screen, if any
    pub fn run(&self) -> Option<&Run> {
        match self {
            Scene::Playing(run) | Scene::Paused(run) => Some(run),
            _ => None,
        }
    }
}

/// Player view for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub pose: PlayerPose,
    pub jump_frames_remaining: u32,
}

/// Read-only view of the game for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub state: GameState,
    pub player: Option<PlayerView>,
    pub obstacles: &'a [Obstacle],
    /// Oldest first
    pub trail: Vec<Vec2>,
    pub distance: u32,
    pub summary: Option<&'a RunSummary>,
}

/// Sequences title, runs and end screens
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    pub(super) scene: Scene,
    tuning: Tuning,
    /// Seed of the most recent run (or the configured seed before any run)
    seed: u64,
    /// Runs started since launch
    runs: u32,
}

impl GameStateMachine {
    pub fn new(tuning: Tuning) -> Self {
        let seed = tuning.seed;
        Self {
            scene: Scene::Title,
            tuning,
            seed,
            runs: 0,
        }
    }

    pub fn state(&self) -> GameState {
        self.scene.state()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Seed of the current or most recent run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Seed a restart uses when the host does not pick one
    pub fn next_seed(&self) -> u64 {
        if self.tuning.reseed_on_restart {
            self.seed.wrapping_mul(2654435761).wrapping_add(1)
        } else {
            self.seed
        }
    }

    /// Title → Playing on a course generated from `seed`
    pub fn start(&mut self, seed: u64) -> Option<GameEvent> {
        if self.state() != GameState::Title {
            return None;
        }
        let run = Run::new(seed, &self.tuning);
        Some(self.begin(run))
    }

    /// Title → Playing on a prebuilt course
    pub fn start_course(&mut self, field: ObstacleField) -> Option<GameEvent> {
        if self.state() != GameState::Title {
            return None;
        }
        let run = Run::on_course(self.seed, &self.tuning, field);
        Some(self.begin(run))
    }

    /// Crashed/Won → Playing with a fresh run
    pub fn restart(&mut self, seed: Option<u64>) -> Option<GameEvent> {
        if !matches!(self.state(), GameState::Crashed | GameState::Won) {
            return None;
        }
        let seed = seed.unwrap_or_else(|| self.next_seed());
        let run = Run::new(seed, &self.tuning);
        log::info!("Restarting with seed {}", seed);
        Some(self.begin(run))
    }

    /// Playing ⇄ Paused; ignored in every other state
    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        match std::mem::replace(&mut self.scene, Scene::Title) {
            Scene::Playing(run) => {
                self.scene = Scene::Paused(run);
                log::debug!("Paused");
                Some(GameEvent::Paused)
            }
            Scene::Paused(run) => {
                self.scene = Scene::Playing(run);
                log::debug!("Resumed");
                Some(GameEvent::Resumed)
            }
            other => {
                self.scene = other;
                None
            }
        }
    }

    fn begin(&mut self, run: Run) -> GameEvent {
        self.seed = run.seed;
        self.runs += 1;
        log::info!(
            "Run {} started (seed {}, {} obstacles)",
            self.runs,
            run.seed,
            run.field.len()
        );
        let event = GameEvent::RunStarted { seed: run.seed };
        self.scene = Scene::Playing(run);
        event
    }

    /// Playing → Crashed
    pub(super) fn crash(&mut self, kind: ObstacleKind) -> Option<GameEvent> {
        let Scene::Playing(run) = &self.scene else {
            return None;
        };
        let summary = run.summarize(Some(kind));
        log::info!("Crashed into {:?} at {} m", kind, summary.distance);
        let event = GameEvent::Crashed {
            kind,
            distance: summary.distance,
        };
        self.scene = Scene::Crashed(summary);
        Some(event)
    }

    /// Playing → Won
    pub(super) fn win(&mut self) -> Option<GameEvent> {
        let Scene::Playing(run) = &self.scene else {
            return None;
        };
        let summary = run.summarize(None);
        log::info!("Reached the goal in {} ticks", summary.ticks);
        let event = GameEvent::Won {
            distance: summary.distance,
        };
        self.scene = Scene::Won(summary);
        Some(event)
    }

    /// Everything the renderer needs for this frame
    pub fn snapshot(&self) -> Snapshot<'_> {
        let (player, obstacles, trail, distance, summary) = match &self.scene {
            Scene::Title => (None, &[][..], Vec::new(), 0, None),
            Scene::Playing(run) | Scene::Paused(run) => {
                let p = run.controller.player();
                let view = PlayerView {
                    pos: p.pos,
                    pose: p.pose(),
                    jump_frames_remaining: p.jump_frames_remaining,
                };
                (
                    Some(view),
                    run.field.obstacles(),
                    run.controller.trail().iter().copied().collect(),
                    run.controller.distance(),
                    None,
                )
            }
            Scene::Crashed(summary) | Scene::Won(summary) => {
                let pose = if summary.cause.is_some() {
                    PlayerPose::Crashed
                } else {
                    summary.player.pose()
                };
                let view = PlayerView {
                    pos: summary.player.pos,
                    pose,
                    jump_frames_remaining: summary.player.jump_frames_remaining,
                };
                (Some(view), &[][..], Vec::new(), summary.distance, Some(summary))
            }
        };
        Snapshot {
            state: self.state(),
            player,
            obstacles,
            trail,
            distance,
            summary,
        }
    }
}
