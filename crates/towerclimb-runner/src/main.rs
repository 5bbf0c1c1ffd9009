use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use towerclimb_core::frame::{Renderer, ScriptedInput};
use towerclimb_game::scroll::to_screen;
use towerclimb_game::{
    ClimberConfig, EnvPool, FrameSnapshot, GameSession, Intents, MoveDir, StepInfo, play,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Agent,
    Play,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    episodes: u32,
    envs: usize,
    seed: u64,
    mode: Mode,
    json: bool,
}

impl Args {
    fn parse(args: &[String]) -> Self {
        fn flag<T: std::str::FromStr>(args: &[String], prefix: &str) -> Option<T> {
            args.iter()
                .find_map(|a| a.strip_prefix(prefix))
                .and_then(|v| v.parse::<T>().ok())
        }
        let mode = match args.iter().find_map(|a| a.strip_prefix("--mode=")) {
            Some("play") => Mode::Play,
            _ => Mode::Agent,
        };
        Self {
            episodes: flag(args, "--episodes=").unwrap_or(1),
            envs: flag(args, "--envs=").unwrap_or(1),
            seed: flag(args, "--seed=").unwrap_or(0),
            mode,
            json: args.iter().any(|a| a == "--json"),
        }
    }
}

/// Logs the screen-space player position once per second of play at debug
/// level, and the final frame at info.
struct TraceRenderer {
    tick_rate: u32,
    frames: u64,
}

impl Renderer<FrameSnapshot> for TraceRenderer {
    fn render(&mut self, frame: &FrameSnapshot) {
        if self.frames % u64::from(self.tick_rate.max(1)) == 0 {
            let screen = to_screen(&frame.player, frame.scroll_offset);
            tracing::debug!(
                "t={:.2}s x={} screen_y={} offset={} score={:.1}",
                frame.elapsed_secs,
                screen.x,
                screen.y,
                frame.scroll_offset,
                frame.score
            );
        }
        if frame.state.is_ended() {
            tracing::info!("Final frame: {:?} score={:.1}", frame.state, frame.score);
        }
        self.frames += 1;
    }
}

/// Random-policy episodes across a pool of environments. Returns the final
/// info of the first `episodes` episodes of every environment.
fn run_agent(
    config: &ClimberConfig,
    args: &Args,
) -> Result<Vec<StepInfo>, Box<dyn std::error::Error>> {
    let mut pool = EnvPool::new(config, args.seed, args.envs)?;
    pool.reset();
    let mut policy = StdRng::seed_from_u64(args.seed ^ 0x5eed);
    let quota = u64::from(args.episodes);
    let mut returns = vec![0.0; pool.num_envs()];
    let mut finished = Vec::new();

    while pool.episodes().iter().any(|&done| done < quota) {
        let actions: Vec<[u8; 2]> = (0..pool.num_envs())
            .map(|_| [policy.random_range(0..2u8), policy.random_range(0..3u8)])
            .collect();
        let results = pool.step(&actions)?;
        for (env, (step, total)) in results.iter().zip(returns.iter_mut()).enumerate() {
            *total += step.reward;
            if !step.is_done() {
                continue;
            }
            let episode = pool.episodes()[env];
            if episode <= quota {
                tracing::info!(
                    "Env {env} episode {episode} ended ({:?}) return={:.2}",
                    step.info.end_cause,
                    *total
                );
                finished.push(step.info.clone());
            }
            *total = 0.0;
        }
    }
    Ok(finished)
}

fn play_script() -> Vec<Intents> {
    // Bounce between the walls while jumping.
    let mut script = Vec::new();
    for _ in 0..20 {
        script.extend(std::iter::repeat_n(Intents::new(true, MoveDir::Left), 30));
        script.extend(std::iter::repeat_n(Intents::new(true, MoveDir::Right), 30));
    }
    script
}

fn run_play(
    config: &ClimberConfig,
    args: &Args,
) -> Result<Vec<FrameSnapshot>, Box<dyn std::error::Error>> {
    let script = play_script();
    let mut finals = Vec::new();
    for episode in 0..args.episodes {
        let seed = args.seed.wrapping_add(u64::from(episode));
        let mut session = GameSession::new(config.clone(), seed)?;
        let mut input = ScriptedInput::new(script.clone(), Intents::IDLE);
        let mut renderer = TraceRenderer {
            tick_rate: config.episode.tick_rate_hz,
            frames: 0,
        };
        let summary = play::run(&mut session, &mut input, &mut renderer, u64::MAX);
        tracing::info!(
            "Play session {episode}: {} frames, score {:.1}, {} scripted inputs unused",
            summary.frames,
            summary.score,
            input.remaining()
        );
        finals.push(session.snapshot());
    }
    Ok(finals)
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse(&argv);
    let config = ClimberConfig::load();
    tracing::info!(
        "Tower Climb runner: mode={:?} episodes={} envs={} seed={}",
        args.mode,
        args.episodes,
        args.envs,
        args.seed
    );

    let output = match args.mode {
        Mode::Agent => run_agent(&config, &args).and_then(|infos| {
            infos
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()
                .map_err(Into::into)
        }),
        Mode::Play => run_play(&config, &args).and_then(|frames| {
            frames
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()
                .map_err(Into::into)
        }),
    };
    match output {
        Ok(lines) => {
            if args.json {
                for line in lines {
                    println!("{line}");
                }
            }
        },
        Err(e) => {
            tracing::error!("Runner failed: {e}");
            std::process::exit(1);
        },
    }
}
