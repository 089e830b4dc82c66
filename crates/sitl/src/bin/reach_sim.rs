//! Run the reach op-mode against the simulated robot.
//!
//! Replays a gamepad script (the built-in demo by default) through INIT, the
//! init loop and the match, printing driver-station telemetry and optionally
//! recording dashboard packets as JSON lines.
//!
//! Usage:
//!   cargo run -p reach_sitl --bin reach_sim -- [OPTIONS]
//!
//! Options:
//!   --ticks <N>            Ticks to run (default: script length + 50)
//!   --rate-hz <HZ>         Control loop rate (default: 50)
//!   --alliance <red|blue>  Select the alliance before play
//!   --lower                Select the lower starting position before play
//!   --script <PATH>        Gamepad script file
//!   --json <PATH|->        Write dashboard packets as JSON lines
//!   --seed <N>             RNG seed for vision detection
//!   --console-every <N>    Print every N-th frame, 0 to disable (default: 50)
//!   --realtime             Pace ticks to the wall clock

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;
use std::str::FromStr;

use reach_core::input::Buttons;
use reach_core::robot::DriveTrain;
use reach_core::state::Alliance;
use reach_sitl::{
    ConsoleDisplay, ScriptedGamepads, SessionConfig, SimConfig, SimError, SimSession, TimeMode,
    DEFAULT_SCRIPT,
};

/// Ticks run after the last scripted input when `--ticks` is not given
const TRAILING_TICKS: u64 = 50;

struct Args {
    ticks: Option<u64>,
    rate_hz: u32,
    alliance: Option<Alliance>,
    lower: bool,
    script: Option<String>,
    json: Option<String>,
    seed: Option<u64>,
    console_every: u64,
    realtime: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        ticks: None,
        rate_hz: 50,
        alliance: None,
        lower: false,
        script: None,
        json: None,
        seed: None,
        console_every: 50,
        realtime: false,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--ticks" => {
                i += 1;
                args.ticks = Some(parse_arg(&raw, i, "ticks"));
            }
            "--rate-hz" => {
                i += 1;
                args.rate_hz = parse_arg(&raw, i, "rate-hz");
            }
            "--alliance" => {
                i += 1;
                args.alliance = Some(match string_arg(&raw, i, "alliance").as_str() {
                    "red" => Alliance::Red,
                    "blue" => Alliance::Blue,
                    other => {
                        eprintln!("Error: unknown alliance '{other}'");
                        process::exit(1);
                    }
                });
            }
            "--lower" => args.lower = true,
            "--script" => {
                i += 1;
                args.script = Some(string_arg(&raw, i, "script"));
            }
            "--json" => {
                i += 1;
                args.json = Some(string_arg(&raw, i, "json"));
            }
            "--seed" => {
                i += 1;
                args.seed = Some(parse_arg(&raw, i, "seed"));
            }
            "--console-every" => {
                i += 1;
                args.console_every = parse_arg(&raw, i, "console-every");
            }
            "--realtime" => args.realtime = true,
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if args.rate_hz == 0 {
        eprintln!("Error: rate-hz must be at least 1");
        process::exit(1);
    }

    args
}

fn string_arg(raw: &[String], i: usize, name: &str) -> String {
    raw.get(i).cloned().unwrap_or_else(|| {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    })
}

/// Out-of-range values are rejected, not truncated
fn parse_value<T: FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

fn parse_arg<T: FromStr>(raw: &[String], i: usize, name: &str) -> T {
    parse_value(&string_arg(raw, i, name)).unwrap_or_else(|| {
        eprintln!("Error: invalid value for --{name}");
        process::exit(1);
    })
}

fn print_usage() {
    eprintln!(
        "Usage: reach_sim [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --ticks <N>            Ticks to run (default: script length + 50)\n\
         \x20 --rate-hz <HZ>         Control loop rate (default: 50)\n\
         \x20 --alliance <red|blue>  Select the alliance before play\n\
         \x20 --lower                Select the lower starting position before play\n\
         \x20 --script <PATH>        Gamepad script file (default: built-in demo)\n\
         \x20 --json <PATH|->        Write dashboard packets as JSON lines\n\
         \x20 --seed <N>             RNG seed for vision detection\n\
         \x20 --console-every <N>    Print every N-th frame, 0 to disable (default: 50)\n\
         \x20 --realtime             Pace ticks to the wall clock\n\
         \x20 -h, --help             Show this help"
    );
}

fn run(args: Args) -> Result<(), SimError> {
    let text = match &args.script {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_SCRIPT.to_string(),
    };
    let mut script = ScriptedGamepads::parse(&text)?;

    // Pregame selections are injected as gamepad 1 taps
    match args.alliance {
        Some(Alliance::Red) => {
            script.press(1, 1, Buttons::B);
        }
        Some(Alliance::Blue) => {
            script.press(1, 1, Buttons::X);
        }
        None => {}
    }
    if args.lower {
        script.press(3, 1, Buttons::A);
    }
    let ticks = args
        .ticks
        .unwrap_or_else(|| script.last_tick() + TRAILING_TICKS);

    let config = SessionConfig {
        rate_hz: args.rate_hz,
        time_mode: if args.realtime {
            TimeMode::Realtime
        } else {
            TimeMode::Lockstep
        },
        sim: SimConfig {
            seed: args.seed,
            ..SimConfig::default()
        },
    };

    let console = if args.console_every == 0 {
        ConsoleDisplay::silent()
    } else {
        ConsoleDisplay::new(Some(Box::new(io::stdout())), args.console_every)
    };
    let mut session = SimSession::new(config, script)?.with_console(console);
    if let Some(path) = &args.json {
        let out: Box<dyn Write + Send> = if path == "-" {
            Box::new(io::stdout())
        } else {
            Box::new(io::BufWriter::new(fs::File::create(path)?))
        };
        session = session.with_json_output(out);
    }

    println!("=== reach SITL ===");
    println!("Rate: {} Hz, ticks: {}", args.rate_hz, ticks);
    println!();

    session.run(ticks)?;
    session.stop();

    let opmode = session.opmode();
    let pose = session.robot().sim_drive_train().pose_estimate();
    println!();
    println!("=== Summary ===");
    println!(
        "State: {} ({})",
        opmode.state().name(),
        if opmode.is_active() { "active" } else { "inactive" }
    );
    println!(
        "Alliance: {}, start: {}",
        opmode.pregame().alliance.label(),
        opmode.starting_position().label()
    );
    println!(
        "Pose: x={:.3} m, y={:.3} m, heading={:.1} deg",
        pose.x,
        pose.y,
        pose.heading.to_degrees()
    );
    println!(
        "Loop: avg {:.2} ms, max {:.2} ms, overruns {}",
        opmode.timing().average_loop_ns() / 1e6,
        opmode.timing().max_loop_ns() as f64 / 1e6,
        opmode.timing().overruns()
    );
    println!(
        "Crane dumps: {}, robot stops: {}, dashboard packets: {}",
        session.robot().sim_crane().dumps(),
        session.robot().stops(),
        session.dashboard().sent()
    );

    Ok(())
}

fn main() {
    env_logger::init();

    let args = parse_args();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rejects_values_past_u32() {
        assert_eq!(parse_value::<u32>("50"), Some(50));
        assert_eq!(parse_value::<u32>("4294967297"), None);
    }

    #[test]
    fn test_ticks_accept_u64() {
        assert_eq!(parse_value::<u64>("4294967297"), Some(4_294_967_297));
        assert_eq!(parse_value::<u64>("-1"), None);
    }
}
