//! Vertigolf headless runner
//!
//! Builds a course, plays a few scripted shots through the fixed-timestep
//! session and logs what the ball did. Useful for checking tuning files.
//!
//! Usage: vertigolf [--mode zen|hard] [--course N] [--tuning FILE] [--settings FILE] [--save FILE]

use std::path::PathBuf;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use vertigolf::audio::{AudioManager, AudioSink};
use vertigolf::consts::SIM_DT;
use vertigolf::persistence::{JsonFileStore, MemoryStore, ProgressStore};
use vertigolf::sim::{Difficulty, MapGenerator, Session, SessionContext, WallPrototype};
use vertigolf::{GameMode, Settings, Tuning};

const USAGE: &str = "usage: vertigolf [--mode zen|hard] [--course N] [--tuning FILE] \
                     [--settings FILE] [--save FILE]";

/// Longest a single shot is simulated before giving up on it coming to rest
const MAX_SHOT_SECONDS: f32 = 15.0;

#[derive(Debug, Default)]
struct Args {
    mode: Option<GameMode>,
    course: u32,
    tuning: Option<PathBuf>,
    settings: Option<PathBuf>,
    save: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--mode" => {
                let raw = value()?;
                args.mode = Some(GameMode::from_str(&raw).ok_or(format!("unknown mode {raw}"))?);
            }
            "--course" => {
                let raw = value()?;
                args.course = raw.parse().map_err(|_| format!("bad course index {raw}"))?;
            }
            "--tuning" => args.tuning = Some(value()?.into()),
            "--settings" => args.settings = Some(value()?.into()),
            "--save" => args.save = Some(value()?.into()),
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

/// Wall pieces shipped with the game
fn standard_walls() -> Vec<WallPrototype> {
    let walls = [
        (0, 6.0, Difficulty::Easy),
        (1, 8.0, Difficulty::Easy),
        (2, 10.0, Difficulty::Easy),
        (10, 5.0, Difficulty::Normal),
        (11, 7.0, Difficulty::Normal),
        (12, 12.0, Difficulty::Normal),
        (20, 4.0, Difficulty::Hard),
        (21, 9.0, Difficulty::Hard),
    ];
    walls
        .into_iter()
        .map(|(id, height, difficulty)| WallPrototype {
            id,
            height,
            difficulty,
        })
        .collect()
}

fn play<S: ProgressStore, A: AudioSink>(session: &mut Session<S, A>) {
    let shots = [
        Vec2::new(3.0, 8.0),
        Vec2::new(-6.0, 14.0),
        Vec2::new(2.0, 21.0),
    ];

    session.load_persisted_position();

    for (i, force) in shots.into_iter().enumerate() {
        // Let the ball settle before each shot
        let max_steps = (MAX_SHOT_SECONDS / SIM_DT) as u32;
        for _ in 0..max_steps {
            if session.ball().is_at_rest() || session.is_game_over() {
                break;
            }
            session.step(None);
        }
        if session.is_game_over() {
            break;
        }

        match session.launch(force) {
            Some(tier) => log::info!("Shot {} ({:?}) from {}", i + 1, tier, session.body().pos),
            None => log::warn!("Shot {} refused", i + 1),
        }
        for _ in 0..max_steps {
            session.step(None);
            if session.ball().is_at_rest() || session.is_game_over() {
                break;
            }
        }
        log::info!(
            "Shot {} ended at {} (rest: {}, restores: {})",
            i + 1,
            session.body().pos,
            session.ball().is_at_rest(),
            session.restore_count()
        );
    }

    let course = session.courses().current();
    println!(
        "course {}: {} walls, ground {}; ball at {}; {} ticks; game over: {}",
        course.index,
        course.segments.len(),
        if course.ground_active { "on" } else { "off" },
        session.body().pos,
        session.time_ticks(),
        session.is_game_over()
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Vertigolf (headless) starting...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            log::error!("{err}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let mode = args.mode.unwrap_or(settings.mode);

    let mut generator = MapGenerator::new(&tuning.map);
    for wall in standard_walls() {
        if let Err(err) = generator.register(wall) {
            log::error!("{err}");
            std::process::exit(1);
        }
    }

    let context = SessionContext { mode, tuning };
    let audio = AudioManager::new(&settings);
    let rng = Pcg32::from_rng(&mut rand::rng());

    let result = match args.save {
        Some(path) => Session::new(
            context,
            generator,
            args.course,
            JsonFileStore::new(path),
            audio,
            rng,
        )
        .map(|mut session| play(&mut session)),
        None => Session::new(
            context,
            generator,
            args.course,
            MemoryStore::default(),
            audio,
            rng,
        )
        .map(|mut session| play(&mut session)),
    };
    if let Err(err) = result {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by a host; there is no standalone entry point
}
