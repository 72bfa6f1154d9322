//! Downhill headless entry point
//!
//! Runs one scripted session through the simulation core and prints the final
//! snapshot as JSON. Rendering and real input belong to a graphical host.
//!
//! Usage: `downhill [tuning.json]`

use std::process::ExitCode;

use downhill::Tuning;
use downhill::consts::FPS;
use downhill::sim::{
    FrameTimer, GameEvent, GameState, GameStateMachine, PlayerPose, Snapshot, TickInput,
    collision, tick_at,
};

/// Give up after three minutes of host frames
const MAX_FRAMES: u64 = 180 * FPS as u64;
/// Every Nth host frame is dropped to exercise coalesced deltas
const DROPPED_FRAME_INTERVAL: u64 = 7;
/// How far below the skier the autopilot looks for obstacles
const LOOKAHEAD: f32 = 40.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Downhill (headless) starting at {} fps...", FPS);

    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let mut game = GameStateMachine::new(tuning);
    let mut timer = FrameTimer::new(0);
    let mut host_tick = 0;

    for frame in 0..MAX_FRAMES {
        host_tick += if frame % DROPPED_FRAME_INTERVAL == DROPPED_FRAME_INTERVAL - 1 {
            2
        } else {
            1
        };

        let input = if game.state() == GameState::Title {
            TickInput {
                start: true,
                ..TickInput::NONE
            }
        } else {
            autopilot(&game.snapshot(), game.tuning())
        };

        match tick_at(&mut game, &mut timer, host_tick, &input) {
            Ok(events) => events.iter().for_each(log_event),
            Err(e) => log::error!("{}", e),
        }

        if matches!(game.state(), GameState::Crashed | GameState::Won) {
            break;
        }
    }

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Crashed { kind, distance } => {
            log::info!("Hit a {:?} after {} m", kind, distance)
        }
        GameEvent::Won { distance } => log::info!("Finished the course ({} m)", distance),
        other => log::debug!("{:?}", other),
    }
}

/// Jump rocks, swerve around trees, otherwise straighten out
fn autopilot(snapshot: &Snapshot<'_>, tuning: &Tuning) -> TickInput {
    let Some(player) = snapshot.player else {
        return TickInput::NONE;
    };
    let scale = tuning.render_scale;
    let width = tuning.player_size * scale;
    let (left, right) = (player.pos.x, player.pos.x + width);
    let bottom = player.pos.y + width;

    let danger = snapshot
        .obstacles
        .iter()
        .map(|o| (o, collision::obstacle_hitbox(o, scale)))
        .filter(|(_, hitbox)| hitbox.max.y > player.pos.y && hitbox.min.y < bottom + LOOKAHEAD)
        .filter(|(_, hitbox)| hitbox.min.x < right && hitbox.max.x > left)
        .min_by(|(_, a), (_, b)| a.min.y.total_cmp(&b.min.y));

    let mut input = TickInput::NONE;
    let desired = match danger {
        Some((obstacle, _)) if obstacle.kind.is_jumpable() => {
            input.jump = player.pose == PlayerPose::Down;
            PlayerPose::Down
        }
        Some((_, hitbox)) => {
            let centre = (hitbox.min.x + hitbox.max.x) / 2.0;
            if centre > left + width / 2.0 {
                PlayerPose::Left
            } else {
                PlayerPose::Right
            }
        }
        None => PlayerPose::Down,
    };

    match (player.pose, desired) {
        (PlayerPose::Down, PlayerPose::Left)
        | (PlayerPose::Right, PlayerPose::Down | PlayerPose::Left) => input.steer_left = true,
        (PlayerPose::Down, PlayerPose::Right)
        | (PlayerPose::Left, PlayerPose::Down | PlayerPose::Right) => input.steer_right = true,
        _ => {}
    }
    input
}
