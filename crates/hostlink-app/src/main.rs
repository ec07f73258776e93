mod cli;
mod replay;

use std::io::Write;
use std::process::ExitCode;

use hostlink_bridge::ResultEnvelope;
use hostlink_common::{ConfigError, HostlinkError};
use hostlink_config::HostlinkConfig;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

fn load_config(args: &Args) -> Result<HostlinkConfig, ConfigError> {
    match &args.config {
        Some(path) => hostlink_config::load_from_path(path),
        None => hostlink_config::load_config(),
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn classify(raw: &str) -> Result<String, HostlinkError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| HostlinkError::Other(format!("invalid JSON: {e}")))?;
    let line = match ResultEnvelope::classify(value) {
        ResultEnvelope::Ok(v) => format!("ok {v}"),
        ResultEnvelope::Err(v) => format!("err {v}"),
        ResultEnvelope::Raw(v) => format!("raw {v}"),
    };
    Ok(line)
}

fn run(args: &Args, config: &HostlinkConfig) -> Result<(), HostlinkError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match &args.command {
        Command::Replay { trace } => {
            let content = std::fs::read_to_string(trace)?;
            replay::run(&content, config, &mut out)?;
        }
        Command::Classify { json } => writeln!(out, "{}", classify(json)?)?,
        Command::Config => writeln!(out, "{}", hostlink_config::config_to_json(config))?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = load_config(&args);
    let level = loaded
        .as_ref()
        .map(|config| config.logging.level)
        .unwrap_or_default();
    init_logging(args.log_level.as_deref().unwrap_or(level.directive()));

    tracing::info!("hostlink v{} starting", env!("CARGO_PKG_VERSION"));
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {e}");
        HostlinkConfig::default()
    });

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("hostlink: {e}");
            ExitCode::FAILURE
        }
    }
}
