mod action;
mod alarm;
mod app;
mod context;
mod keys;
mod playback;
mod player;
mod screen;
mod screens;
mod stack;
#[cfg(test)]
mod testing;
mod theme;
mod widgets;

use std::path::PathBuf;
use std::rc::Rc;

use chrono::Local;
use clap::Parser;

use clockradio_proto::channels::ChannelRegistry;
use clockradio_proto::config::Config;
use clockradio_proto::host::{Host, SystemHost};
use clockradio_proto::prefs::{keys as pref_keys, Preferences};

use crate::alarm::AlarmScheduler;
use crate::context::AppContext;
use crate::playback::Playback;
use crate::player::MplayerLauncher;

#[derive(Parser, Debug)]
#[command(name = "clockradio", version, about = "Terminal clock radio with alarm")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Channel list, one `name|url[|format]` per line
    #[arg(long, value_name = "PATH")]
    channels: Option<PathBuf>,

    /// Preferences file (JSON)
    #[arg(long, value_name = "PATH")]
    prefs: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Load config ──────────────────────────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let (mut config, config_error) = match Config::load_from(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(path) = cli.channels {
        config.paths.channels_file = path;
    }
    if let Some(path) = cli.prefs {
        config.paths.preferences_file = path;
    }

    // ── Logging ──────────────────────────────────────────────────────────────
    let log_path = config.paths.log_file.clone();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it; the terminal
    // belongs to the UI from here on.
    eprintln!("clockradio log: {}", log_path.display());
    tracing::info!("clockradio starting…");
    if let Some(e) = config_error {
        tracing::warn!("could not load {:?}, using defaults: {:#}", config_path, e);
    }

    // ── Collaborators ────────────────────────────────────────────────────────
    let launcher = MplayerLauncher::discover(&config.player)?;
    let host: Rc<dyn Host> = Rc::new(SystemHost::new(config.host.clone()));
    let channels = ChannelRegistry::load(&config.paths.channels_file);
    let prefs = Preferences::load(&config.paths.preferences_file);
    let now = Local::now().naive_local();

    let softvol_gain = prefs.int(pref_keys::RADIO_SOFTVOL_GAIN);
    let playback = Playback::new(channels, Box::new(launcher), softvol_gain);
    let alarm = AlarmScheduler::from_prefs(&prefs, playback, host.clone(), now);
    let ctx = AppContext::new(alarm, prefs, host, config.ui.clone(), now);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(ctx, config.frame_interval());
    if let Err(e) = app.run().await {
        tracing::error!("fatal: {:#}", e);
        return Err(e);
    }
    tracing::info!("clockradio stopped");
    Ok(())
}
