use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_io::block_on;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode};
use crate::config;
use crate::player::{Direction, PlayerError, Prompt, Toggle};
use crate::ui;

use super::Player;

/// Main terminal event loop: fires due settle-and-play attempts, draws, and
/// handles input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();
        if let Err(e) = block_on(player.poll_pending(now)) {
            app.error(e.to_string());
        }
        app.clamp_selection(player.state().tracks.len());

        let view = ui::View {
            state: player.state(),
            visual: player.frame(app.elapsed(now)),
            authenticated: player.is_authenticated(),
            remote: player.is_remote(),
        };
        terminal.draw(|f| ui::draw(f, app, &view, &settings.ui, now))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
) -> Result<bool, Box<dyn std::error::Error>> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }
    match app.mode {
        InputMode::Normal => handle_normal_key(key, settings, app, player),
        InputMode::Password | InputMode::FilePath => {
            handle_prompt_key(key, app, player);
            Ok(false)
        }
    }
}

/// Expand a leading `~/` to `$HOME`.
fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(input),
    }
}

fn handle_prompt_key(key: KeyEvent, app: &mut App, player: &mut Player) {
    match key.code {
        KeyCode::Esc => app.close_prompt(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(c) => app.push_char(c),
        KeyCode::Enter => {
            let mode = app.mode;
            let input = app.take_input();
            match mode {
                InputMode::Password => match player.authenticate(&input) {
                    Ok(Prompt::FileSelection) => {
                        app.info("Admin mode enabled");
                        app.open_prompt(InputMode::FilePath);
                    }
                    Ok(Prompt::Auth) => app.open_prompt(InputMode::Password),
                    Err(e @ PlayerError::AuthFailure) => app.retry_prompt(InputMode::Password, e.to_string()),
                    Err(e) => app.error(e.to_string()),
                },
                InputMode::FilePath => {
                    let path = expand_home(input.trim());
                    match block_on(player.upload_track(&path)) {
                        Ok(name) => {
                            app.info(format!("Track \"{name}\" added"));
                            if let Some(i) = player.state().current {
                                app.selected = i;
                            }
                        }
                        Err(e) => app.error(e.to_string()),
                    }
                }
                InputMode::Normal => {}
            }
        }
        _ => {}
    }
}

fn follow_current(app: &mut App, player: &Player) {
    if let Some(i) = player.state().current {
        app.selected = i;
    }
}

fn handle_normal_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
) -> Result<bool, Box<dyn std::error::Error>> {
    let len = player.state().tracks.len();
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char(' ') | KeyCode::Char('p') => match block_on(player.toggle_playback()) {
            Ok(Toggle::Started) | Ok(Toggle::Paused) => {}
            Ok(Toggle::Prompt(Prompt::Auth)) => app.open_prompt(InputMode::Password),
            Ok(Toggle::Prompt(Prompt::FileSelection)) => app.open_prompt(InputMode::FilePath),
            Ok(Toggle::Recovered(i)) => {
                app.error("Could not play that track, skipping to the next one");
                app.selected = i;
            }
            Err(PlayerError::TrackUnavailable) if !player.is_remote() => {
                app.error("Current track is unavailable. Try another track or upload a new one")
            }
            Err(e) => app.error(e.to_string()),
        },
        KeyCode::Char('l') | KeyCode::Right => match block_on(player.advance(Direction::Forward)) {
            Ok(i) => app.selected = i,
            Err(e) => app.error(e.to_string()),
        },
        KeyCode::Char('h') | KeyCode::Left => match block_on(player.advance(Direction::Backward)) {
            Ok(i) => app.selected = i,
            Err(e) => app.error(e.to_string()),
        },
        KeyCode::Char('j') | KeyCode::Down => app.next(len),
        KeyCode::Char('k') | KeyCode::Up => app.prev(len),
        KeyCode::Enter => {
            if let Err(e) = block_on(player.select_track(app.selected)) {
                app.error(e.to_string());
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = player.state().volume + settings.ui.volume_step;
            if let Err(e) = player.set_volume(v) {
                app.error(e.to_string());
            }
        }
        KeyCode::Char('-') => {
            let v = player.state().volume - settings.ui.volume_step;
            if let Err(e) = player.set_volume(v) {
                app.error(e.to_string());
            }
        }
        KeyCode::Char('u') => {
            if player.is_remote() {
                app.error(PlayerError::Unsupported.to_string());
            } else if player.is_authenticated() {
                app.open_prompt(InputMode::FilePath);
            } else {
                app.open_prompt(InputMode::Password);
            }
        }
        KeyCode::Char('x') => {
            let Some(id) = player.state().tracks.get(app.selected).map(|t| t.id.clone()) else {
                return Ok(false);
            };
            match block_on(player.remove_track(&id)) {
                Ok(()) => {
                    app.info("Track removed");
                    app.clamp_selection(player.state().tracks.len());
                }
                Err(e) => app.error(e.to_string()),
            }
        }
        KeyCode::Char('o') => {
            if player.is_authenticated() {
                player.logout();
                app.info("Logged out of admin mode");
            }
        }
        KeyCode::Char('r') => match block_on(player.refresh()) {
            Ok(n) => {
                app.info(format!("Loaded {n} tracks"));
                follow_current(app, player);
            }
            Err(e) => app.error(e.to_string()),
        },
        _ => {}
    }

    Ok(false)
}
