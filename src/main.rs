//! Main entry point for the podcastr CLI application.

use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info, warn};
use podcastr::api::ApiClient;
use podcastr::audio::{AudioOutput, EpisodeEnd, default_player, find_in_path, handle_episode_end};
use podcastr::catalog::HomeListing;
use podcastr::config::Config;
use podcastr::context::PlayerContext;
use podcastr::tui::{Action, App, draw, poll_event};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::time::Duration;

/// Command-line arguments for the podcastr application.
#[derive(Parser, Debug)]
#[command(
    name = "podcastr",
    version,
    about = "A terminal podcast player",
    long_about = "Browse the latest podcast episodes and listen to them from a TUI."
)]
struct Args {
    /// Base URL of the episodes API (overrides config)
    #[arg(short, long)]
    api_url: Option<String>,

    /// Number of episodes to fetch for the homepage (overrides config)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Log verbosity level: 0=error, 1=warn, 2=info, 3=debug, 4=trace
    #[arg(short, long, default_value_t = 1)]
    log: u8,

    /// Audio player to use (overrides config and platform default)
    #[arg(short, long)]
    player: Option<String>,

    /// Write a default config file if none exists, print its path and exit
    #[arg(long)]
    init_config: bool,
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.log {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    debug!("Log level set to {:?}", log_level);

    if args.init_config {
        let path = Config::create_default_if_missing()?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        Config::new()
    });

    let api_url = args.api_url.clone().unwrap_or_else(|| config.api_url.clone());
    let limit = args.limit.unwrap_or(config.episode_limit);
    let latest_count = config.latest_count;

    let (player_cmd, player_args) = if let Some(cli_player) = &args.player {
        (cli_player.clone(), config.player_args.clone())
    } else if let Some(config_player) = &config.player {
        (config_player.clone(), config.player_args.clone())
    } else {
        match default_player() {
            Ok((p, mut default_args)) => {
                default_args.extend(config.player_args.iter().cloned());
                (p.to_string(), default_args)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    };

    if find_in_path(&player_cmd).is_none() {
        eprintln!("Error: {} not found in PATH.", player_cmd);
        std::process::exit(1);
    }

    info!("Using audio player: {}", player_cmd);

    let api = ApiClient::new(&api_url)?;
    let player = PlayerContext::new();
    let mut audio = AudioOutput::new(player_cmd, player_args);

    let mut terminal = init_terminal()?;
    let mut app = App::new(player.clone());

    let result = run_app(
        &mut terminal,
        &mut app,
        &api,
        &player,
        &mut audio,
        limit,
        latest_count,
    )
    .await;

    audio.stop();
    restore_terminal()?;

    result
}

async fn load_home(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: &ApiClient,
    limit: usize,
    latest_count: usize,
) -> io::Result<()> {
    app.set_loading(&format!("Loading episodes from {}...", api.base_url()));
    terminal.draw(|f| draw(f, app))?;

    match api.fetch_latest_episodes(limit).await {
        Ok(episodes) => {
            if episodes.is_empty() {
                app.set_status("No episodes found");
            }
            app.set_listing(HomeListing::from_episodes(episodes, latest_count));
        }
        Err(e) => {
            app.set_listing(HomeListing::default());
            app.set_error(&e.to_string());
        }
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: &ApiClient,
    player: &PlayerContext,
    audio: &mut AudioOutput,
    limit: usize,
    latest_count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut updates = player.subscribe();

    load_home(terminal, app, api, limit, latest_count).await?;

    loop {
        // The audio process follows every change of the shared player.
        if updates.has_changed().unwrap_or(false) {
            let state = updates.borrow_and_update().clone();
            if let Err(e) = audio.sync(&state) {
                app.set_error(&e.to_string());
                player.set_playing_state(false);
            }
        }

        match audio.poll_finished() {
            Ok(true) => {
                let end = handle_episode_end(player);
                debug!("Episode ended: {:?}", end);
                if end == EpisodeEnd::Replay {
                    if let Err(e) = audio.sync(&player.state()) {
                        app.set_error(&e.to_string());
                    }
                }
            }
            Ok(false) => {}
            Err(e) => {
                app.set_error(&e.to_string());
                player.set_playing_state(false);
            }
        }

        terminal.draw(|f| draw(f, app))?;

        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(100))? {
            let action = app.handle_input(key);

            // Clear error after any input
            app.clear_error();

            match action {
                Action::Quit => break,
                Action::Reload => {
                    load_home(terminal, app, api, limit, latest_count).await?;
                }
                Action::OpenEpisode(id) => {
                    app.set_loading("Loading episode...");
                    terminal.draw(|f| draw(f, app))?;

                    match api.fetch_episode(&id).await {
                        Ok(episode) => app.show_episode(episode),
                        Err(e) => {
                            app.set_error(&e.to_string());
                            app.show_home();
                        }
                    }
                }
                Action::None => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
