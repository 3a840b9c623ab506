use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use expo_backoff::config::Config;
use expo_backoff::Backoff;

const DEFAULT_CONFIG_PATH: &str = "config/backoff.toml";

fn print_help() {
    println!(
        "\
expo-backoff v{}

Prints the retry delays an exponential backoff configuration produces.

USAGE:
    expo-backoff [OPTIONS] [CONFIG_PATH]

ARGUMENTS:
    CONFIG_PATH    Path to TOML configuration file [default: {DEFAULT_CONFIG_PATH}]

OPTIONS:
    -n, --attempts <N>    Number of attempts to print (overrides [schedule] attempts)
    -h, --help            Print this help message and exit
    -V, --version         Print version and exit

ENVIRONMENT VARIABLES:
    Variables are referenced in the config file via ${{VAR_NAME}} syntax.

    RUST_LOG              Log level filter for tracing
                          (e.g. debug, expo_backoff=trace)

EXAMPLES:
    expo-backoff                            # uses {DEFAULT_CONFIG_PATH}
    expo-backoff -n 12 retry.toml           # custom config, 12 attempts
    RUST_LOG=expo_backoff=trace expo-backoff",
        env!("CARGO_PKG_VERSION"),
    );
}

struct Args {
    config_path: String,
    attempts: Option<u32>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut config_path = None;
    let mut attempts = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-n" | "--attempts" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("{arg} requires a value"))?;
                let n = value
                    .parse::<u32>()
                    .with_context(|| format!("invalid attempt count: {value}"))?;
                attempts = Some(n);
            }
            _ => config_path = Some(arg),
        }
    }

    Ok(Args {
        config_path: config_path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()),
        attempts,
    })
}

fn main() -> Result<()> {
    // Handle --help / --version before anything else
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("expo-backoff v{}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("expo_backoff=info")),
        )
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    info!("Loading configuration from {}", args.config_path);
    let config = Config::load(&args.config_path)
        .with_context(|| format!("failed to load {}", args.config_path))?;

    let backoff_config = config.backoff.to_backoff_config();
    // Odd values are still computed as given
    if let Err(e) = backoff_config.validate() {
        warn!("Suspicious backoff configuration: {e}");
    }

    let mut backoff = Backoff::new(backoff_config);
    let attempts = args.attempts.unwrap_or(config.schedule.attempts);
    info!(
        "Factor {} over {attempts} attempts, jitter {}",
        backoff.config().factor,
        if backoff.config().jitter_enabled() { "on" } else { "off" }
    );

    println!("{:>7}  {:>12}  {:>12}", "attempt", "base_ms", "delay_ms");
    for _ in 0..attempts {
        let attempt = backoff.get_retries();
        let base = backoff.base_delay();
        let delay = backoff.get_incr();
        println!(
            "{attempt:>7}  {:>12.3}  {:>12.3}",
            base.as_secs_f64() * 1000.0,
            delay.as_secs_f64() * 1000.0
        );
    }

    Ok(())
}
