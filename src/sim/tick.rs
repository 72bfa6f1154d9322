//! Per-frame simulation tick
//!
//! Dispatches input to the active scene and advances the run.

use super::clock::{ClockError, FrameTimer};
use super::collision::{self, CollisionOutcome};
use super::player::{MotionState, Progress};
use super::state::{GameEvent, GameState, GameStateMachine, Scene};

/// Edge-triggered input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Leave the title screen
    pub start: bool,
    /// Jump (only honoured while going straight down)
    pub jump: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Start over from the crash/win screen
    pub restart: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// No input this tick
    pub const NONE: TickInput = TickInput {
        start: false,
        jump: false,
        steer_left: false,
        steer_right: false,
        restart: false,
        pause: false,
    };
}

/// Advance the game by `delta_frames` elapsed frames
pub fn tick(
    game: &mut GameStateMachine,
    input: &TickInput,
    delta_frames: u32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match game.state() {
        GameState::Title => {
            if input.start {
                let seed = game.tuning().seed;
                events.extend(game.start(seed));
            }
        }
        GameState::Playing => {
            // Pausing consumes the tick
            if input.pause {
                events.extend(game.toggle_pause());
            } else {
                simulate(game, input, delta_frames, &mut events);
            }
        }
        GameState::Paused => {
            if input.pause {
                events.extend(game.toggle_pause());
            }
        }
        GameState::Crashed | GameState::Won => {
            if input.restart {
                events.extend(game.restart(None));
            }
        }
    }

    events
}

/// Read the host tick counter and advance the game by the frames elapsed
pub fn tick_at(
    game: &mut GameStateMachine,
    timer: &mut FrameTimer,
    current_tick: u64,
    input: &TickInput,
) -> Result<Vec<GameEvent>, ClockError> {
    let delta_frames = timer.advance(current_tick).inspect_err(|e| {
        log::warn!("Dropping frame: {}", e);
    })?;
    Ok(tick(game, input, delta_frames))
}

/// Move the skier, then settle the run: the goal line beats a crash
fn simulate(
    game: &mut GameStateMachine,
    input: &TickInput,
    delta_frames: u32,
    events: &mut Vec<GameEvent>,
) {
    let scale = game.tuning().render_scale;
    let Scene::Playing(run) = &mut game.scene else {
        return;
    };

    let was_jumping = run.controller.player().motion == MotionState::Jumping;
    let progress = run.controller.update(delta_frames, input, GameState::Playing);
    run.ticks += u64::from(delta_frames);

    let player = run.controller.player();
    if !was_jumping && player.motion == MotionState::Jumping {
        events.push(GameEvent::Jumped { y: player.pos.y });
    }

    if progress == Progress::ReachedGoal {
        events.extend(game.win());
        return;
    }

    let outcome = collision::check(player, run.field.obstacles(), scale);
    if let CollisionOutcome::Blocked { kind, .. } = outcome {
        events.extend(game.crash(kind));
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::Tuning;
    use crate::sim::obstacle::{Obstacle, ObstacleField, ObstacleKind};

    fn press(f: impl FnOnce(&mut TickInput)) -> TickInput {
        let mut input = TickInput::NONE;
        f(&mut input);
        input
    }

    /// Narrow track with the skier lined up on x=76 from the very top
    fn lane_tuning() -> Tuning {
        Tuning {
            track_width: 160.0,
            player_start: Some(Vec2::new(76.0, 0.0)),
            ..Tuning::default()
        }
    }

    fn single_obstacle_game(tuning: Tuning, kind: ObstacleKind) -> GameStateMachine {
        let mut game = GameStateMachine::new(tuning);
        let obstacle = Obstacle::new(Vec2::new(76.0, 100.0), kind);
        let field = ObstacleField::from_obstacles(vec![obstacle]);
        game.start_course(field);
        game
    }

    fn player_y(game: &GameStateMachine) -> f32 {
        game.scene().run().map(|r| r.controller.player().pos.y).unwrap_or(f32::NAN)
    }

    #[test]
    fn test_title_start() {
        let mut game = GameStateMachine::new(Tuning::default());
        assert!(tick(&mut game, &TickInput::NONE, 1).is_empty());
        assert_eq!(game.state(), GameState::Title);

        let events = tick(&mut game, &press(|i| i.start = true), 1);
        assert_eq!(events, vec![GameEvent::RunStarted { seed: 0 }]);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_tick_pause() {
        let mut game = GameStateMachine::new(Tuning::default());
        game.start(1);
        tick(&mut game, &TickInput::NONE, 1);
        let y = player_y(&game);

        let pause = press(|i| i.pause = true);
        assert_eq!(tick(&mut game, &pause, 1), vec![GameEvent::Paused]);
        assert_eq!(game.state(), GameState::Paused);

        // Frozen while paused, regardless of input or elapsed frames
        tick(&mut game, &press(|i| i.jump = true), 30);
        tick(&mut game, &press(|i| i.steer_left = true), 30);
        assert_eq!(player_y(&game), y);

        assert_eq!(tick(&mut game, &pause, 1), vec![GameEvent::Resumed]);
        tick(&mut game, &TickInput::NONE, 1);
        assert_eq!(player_y(&game), y + 1.0);
    }

    #[test]
    fn test_tree_crash_scenario() {
        let mut game = single_obstacle_game(lane_tuning(), ObstacleKind::TreeGreen);

        let mut crash = None;
        for _ in 0..1200 {
            let events = tick(&mut game, &TickInput::NONE, 1);
            crash = events
                .into_iter()
                .find(|e| matches!(e, GameEvent::Crashed { .. }));
            if crash.is_some() {
                break;
            }
        }

        assert_eq!(game.state(), GameState::Crashed);
        assert_eq!(
            crash,
            Some(GameEvent::Crashed {
                kind: ObstacleKind::TreeGreen,
                distance: 85
            })
        );
        let Scene::Crashed(summary) = game.scene() else {
            panic!("expected crash scene");
        };
        // Skis (bottom of the scaled footprint) reach the trunk top at y=100
        let skis = summary.player.pos.y + summary.player.size * game.tuning().render_scale;
        assert!((skis - 100.0).abs() <= 1.0, "skis at {}", skis);
    }

    #[test]
    fn test_rock_jump_scenario() {
        let mut game = single_obstacle_game(lane_tuning(), ObstacleKind::RockWide);
        let scale = game.tuning().render_scale;

        let mut jumped = false;
        let mut checked_over_rock = false;
        for _ in 0..2000 {
            if game.state() != GameState::Playing {
                break;
            }
            let input = press(|i| i.jump = player_y(&game) == 90.0);
            let events = tick(&mut game, &input, 1);
            jumped |= events.iter().any(|e| matches!(e, GameEvent::Jumped { .. }));

            if let Some(run) = game.scene().run() {
                let player = run.controller.player();
                if player.pos.y == 100.0 {
                    assert!(player.is_jumping());
                    assert_eq!(
                        collision::check(player, run.field.obstacles(), scale),
                        CollisionOutcome::None
                    );
                    checked_over_rock = true;
                }
            }
        }

        assert!(jumped);
        assert!(checked_over_rock);
        assert_eq!(game.state(), GameState::Won);
        let Scene::Won(summary) = game.scene() else {
            panic!("expected win scene");
        };
        assert_eq!(summary.distance, 1201);
        assert_eq!(summary.ticks, 1201);
        assert_eq!(summary.cause, None);
    }

    #[test]
    fn test_rock_without_jump_crashes() {
        let mut game = single_obstacle_game(lane_tuning(), ObstacleKind::RockWide);
        for _ in 0..200 {
            tick(&mut game, &TickInput::NONE, 1);
        }
        assert_eq!(game.state(), GameState::Crashed);
    }

    #[test]
    fn test_goal_beats_crash() {
        // Goal line and trunk contact land on the same tick (y=85)
        let tuning = Tuning {
            goal_distance: 84.5,
            ..lane_tuning()
        };
        let mut game = single_obstacle_game(tuning, ObstacleKind::TreeGreen);
        for _ in 0..200 {
            tick(&mut game, &TickInput::NONE, 1);
        }
        assert_eq!(game.state(), GameState::Won);
    }

    #[test]
    fn test_restart_after_crash() {
        let mut game = single_obstacle_game(lane_tuning(), ObstacleKind::TreeWhite);
        while game.state() == GameState::Playing {
            tick(&mut game, &TickInput::NONE, 1);
        }
        assert_eq!(game.state(), GameState::Crashed);

        // Any other input leaves the end screen alone
        tick(&mut game, &press(|i| i.start = true), 1);
        assert_eq!(game.state(), GameState::Crashed);

        let events = tick(&mut game, &press(|i| i.restart = true), 1);
        assert!(matches!(events.as_slice(), [GameEvent::RunStarted { .. }]));
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(player_y(&game), 0.0);
    }

    #[test]
    fn test_unvalidated_start_stays_on_track() {
        let tuning = Tuning {
            track_width: 160.0,
            player_start: Some(Vec2::new(160.0, 30.0)),
            ..Tuning::default()
        };
        let max_x = tuning.player_max_x();
        let mut game = GameStateMachine::new(tuning);
        game.start_course(ObstacleField::from_obstacles(Vec::new()));

        for _ in 0..5 {
            tick(&mut game, &press(|i| i.steer_left = true), 1);
            let x = game.scene().run().map(|r| r.controller.player().pos.x);
            assert!(x.is_some_and(|x| (0.0..=max_x).contains(&x)), "x={:?}", x);
        }
        let direction = game.scene().run().map(|r| r.controller.player().direction);
        assert_eq!(direction, Some(crate::sim::Direction::Left));
    }

    #[test]
    fn test_coalesced_frames_count_toward_run() {
        let mut game = GameStateMachine::new(Tuning::default());
        game.start(2);
        tick(&mut game, &TickInput::NONE, 4);
        assert_eq!(game.scene().run().map(|r| r.ticks), Some(4));
    }

    #[test]
    fn test_tick_at_uses_clock_delta() {
        let mut game = GameStateMachine::new(Tuning::default());
        let mut timer = FrameTimer::new(0);
        game.start(2);

        tick_at(&mut game, &mut timer, 3, &press(|i| i.jump = true)).unwrap();
        let remaining = game.scene().run().map(|r| r.controller.player().jump_frames_remaining);
        assert_eq!(remaining, Some(50));

        tick_at(&mut game, &mut timer, 13, &TickInput::NONE).unwrap();
        let remaining = game.scene().run().map(|r| r.controller.player().jump_frames_remaining);
        assert_eq!(remaining, Some(40));

        assert!(tick_at(&mut game, &mut timer, 12, &TickInput::NONE).is_err());
        assert_eq!(game.scene().run().map(|r| r.ticks), Some(13));
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            press(|i| i.steer_left = true),
            TickInput::NONE,
            press(|i| i.steer_right = true),
            press(|i| i.jump = true),
            TickInput::NONE,
        ];

        let mut a = GameStateMachine::new(Tuning::default());
        let mut b = GameStateMachine::new(Tuning::default());
        a.start(99999);
        b.start(99999);
        for _ in 0..300 {
            for input in &inputs {
                let ea = tick(&mut a, input, 1);
                let eb = tick(&mut b, input, 1);
                assert_eq!(ea, eb);
            }
        }
        assert_eq!(a.scene(), b.scene());
    }
}
