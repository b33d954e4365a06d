//! Session countdown on the terminal.
//!
//! Renders the time left until a session deadline as `MM:SS`, rewriting one
//! terminal line every tick.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use session_timer::io::clock::{Clock, MonotonicClock};
use session_timer::io::config::{DEFAULT_CONFIG_FILE, TimerConfig, load_config, write_config};
use session_timer::io::provider::FixedDeadline;
use session_timer::io::target::TerminalTarget;
use session_timer::{
    Countdown, Deadline, ExpiredDisplay, ScheduleEnd, SessionTimer, TimerDisplayUpdater,
    exit_codes, logging,
};

#[derive(Parser)]
#[command(name = "session-timer", version, about = "Session countdown display")]
struct Cli {
    /// Config file (TOML). Defaults apply when the file is missing.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default config file if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Print a remaining duration in milliseconds as MM:SS.
    Format {
        #[arg(allow_hyphen_values = true)]
        millis: i64,
        /// Show negative durations as overdue time instead of 00:00.
        #[arg(long)]
        negative: bool,
    },
    /// Count down to the session deadline on this terminal.
    Watch(WatchArgs),
}

#[derive(Args, Debug, Default)]
struct WatchArgs {
    /// Deadline as an RFC 3339 timestamp.
    #[arg(long, conflicts_with = "in_secs")]
    deadline: Option<String>,

    /// Deadline as seconds from now.
    #[arg(long = "in", value_name = "SECS")]
    in_secs: Option<u64>,

    /// Stop after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,

    /// Stop once the deadline is reached.
    #[arg(long)]
    stop_when_expired: bool,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Format { millis, negative } => cmd_format(millis, negative),
        Command::Watch(args) => {
            let cfg = load_config(&cli.config)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("build tokio runtime")?;
            runtime.block_on(cmd_watch(cfg, args))
        }
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        println!("{} already exists", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &TimerConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("{}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_format(millis: i64, negative: bool) -> Result<i32> {
    let expired = if negative {
        ExpiredDisplay::Negative
    } else {
        ExpiredDisplay::Clamp
    };
    println!("{}", Countdown::from_millis(millis).render(expired));
    Ok(exit_codes::OK)
}

async fn cmd_watch(cfg: TimerConfig, args: WatchArgs) -> Result<i32> {
    let clock = MonotonicClock::new();
    let deadline = resolve_deadline(&cfg, &args, clock.now_millis())?;
    info!(%deadline, "watching session deadline");

    let target = TerminalTarget::new(std::io::stdout(), &cfg.target_id, &cfg.label);
    let updater = TimerDisplayUpdater::from_config(FixedDeadline(deadline), target, clock, &cfg);
    let mut timer = SessionTimer::from_config(updater, &cfg)
        .stop_when_expired(cfg.stop_when_expired || args.stop_when_expired)
        .max_ticks(args.ticks);
    timer.start()?;

    let end = tokio::select! {
        end = timer.wait() => end,
        signal = tokio::signal::ctrl_c() => {
            signal.context("listen for ctrl-c")?;
            Some(ScheduleEnd::Stopped)
        }
    };
    timer.stop();
    timer
        .lock_updater()
        .target_mut()
        .finish()
        .context("finish terminal output")?;

    match end {
        Some(ScheduleEnd::Expired) => Ok(exit_codes::EXPIRED),
        Some(ScheduleEnd::Stopped | ScheduleEnd::TicksExhausted) => Ok(exit_codes::OK),
        None => bail!("session timer task ended unexpectedly"),
    }
}

/// Explicit timestamp, else `--in` seconds, else the configured session length.
fn resolve_deadline(cfg: &TimerConfig, args: &WatchArgs, now_millis: i64) -> Result<Deadline> {
    if let Some(raw) = &args.deadline {
        return Deadline::parse_rfc3339(raw);
    }
    let lifetime = match args.in_secs {
        Some(secs) => Duration::from_secs(secs),
        None => cfg.session_lifetime(),
    };
    Ok(Deadline::after(now_millis, lifetime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["session-timer", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false }));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn parse_format_negative_millis() {
        let cli = Cli::parse_from(["session-timer", "format", "-1500", "--negative"]);
        assert!(matches!(
            cli.command,
            Command::Format {
                millis: -1500,
                negative: true
            }
        ));
    }

    #[test]
    fn parse_watch_flags() {
        let cli = Cli::parse_from([
            "session-timer",
            "watch",
            "--in",
            "90",
            "--ticks",
            "3",
            "--config",
            "other.toml",
        ]);
        let Command::Watch(args) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.in_secs, Some(90));
        assert_eq!(args.ticks, Some(3));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn watch_rejects_two_deadlines() {
        let result = Cli::try_parse_from([
            "session-timer",
            "watch",
            "--in",
            "5",
            "--deadline",
            "2026-10-18T12:00:00Z",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn deadline_defaults_to_session_length() {
        let deadline = resolve_deadline(&TimerConfig::default(), &WatchArgs::default(), 1_000)
            .expect("deadline");
        assert_eq!(deadline.unix_millis(), 601_000);
    }

    #[test]
    fn explicit_deadline_wins() {
        let args = WatchArgs {
            deadline: Some("1970-01-01T00:00:30Z".to_string()),
            in_secs: Some(5),
            ..WatchArgs::default()
        };
        let deadline = resolve_deadline(&TimerConfig::default(), &args, 0).expect("deadline");
        assert_eq!(deadline.unix_millis(), 30_000);
    }
}
