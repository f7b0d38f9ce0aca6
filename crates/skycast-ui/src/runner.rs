//! Terminal setup and the UI event loop.

use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use skycast_core::{AppError, Config, DataError};
use skycast_weather::CityDirectory;

use crate::app_services::AppServices;
use crate::icons::IconSet;
use crate::models::{AppModel, UiAction};
use crate::services::{request_fetch, request_locate, ServiceMessage};
use crate::theme::Theme;
use crate::view;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Startup choices coming from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Search this city instead of detecting the location
    pub initial_city: Option<String>,
    /// Start in the light theme regardless of configuration
    pub light_theme: bool,
}

/// Run the UI until the user quits.
pub fn run(config: Arc<Config>, options: RunOptions) -> Result<()> {
    let services = AppServices::new()?;
    services.init_weather_provider(&config.weather);
    services.init_location_resolver(&config.weather);

    let cities = load_cities(&config.data.cities_csv);
    let icons = IconSet::load(&config.data.icons_dir);

    let theme = if options.light_theme {
        Theme::Light
    } else {
        Theme::from_dark_mode(config.ui.dark_mode)
    };
    let mut model = AppModel::new(&config.ui, theme);

    match options.initial_city {
        Some(city) => start_search(&services, &mut model, city),
        None => start_locate(&services, &mut model),
    }

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &services, &mut model, &cities, &icons);
    let restored = restore_terminal(&mut terminal);

    services.shutdown();
    result?;
    restored
}

fn event_loop(
    terminal: &mut Tui,
    services: &AppServices,
    model: &mut AppModel,
    cities: &CityDirectory,
    icons: &IconSet,
) -> Result<()> {
    loop {
        apply_messages(services, model, services.drain_messages());
        model.tick(Instant::now());

        terminal
            .draw(|f| view::draw(f, model, icons, Utc::now()))
            .context("Failed to draw frame")?;

        if event::poll(model.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                match model.handle_key(key, cities, Instant::now()) {
                    UiAction::Quit => break,
                    UiAction::Search(city) => start_search(services, model, city),
                    UiAction::Locate => start_locate(services, model),
                    UiAction::None => {}
                }
            }
        }
    }

    tracing::info!("UI loop finished");
    Ok(())
}

/// Apply background results; a located city is searched right away.
fn apply_messages(
    services: &AppServices,
    model: &mut AppModel,
    messages: impl IntoIterator<Item = ServiceMessage>,
) {
    for message in messages {
        let now = Instant::now();
        if let Some(city) = model.apply_message(message, services.current_generation(), now) {
            start_search(services, model, city);
        }
    }
}

fn start_search(services: &AppServices, model: &mut AppModel, city: String) {
    model.begin_search(&city);
    let ticket = services.begin_request();
    tracing::info!("Fetching weather for '{}' (request {})", city, ticket.generation);
    request_fetch(services, ticket, city);
}

fn start_locate(services: &AppServices, model: &mut AppModel) {
    model.begin_locate();
    let ticket = services.begin_request();
    tracing::info!("Detecting location (request {})", ticket.generation);
    request_locate(services, ticket);
}

/// City list for suggestions; an unreadable file leaves suggestions empty.
fn load_cities(path: &Path) -> CityDirectory {
    match CityDirectory::load(path) {
        Ok(cities) => cities,
        Err(e) => {
            let err = AppError::Data(DataError::CityList(format!("{}: {}", path.display(), e)));
            tracing::error!("{} ({})", err, err.user_message());
            CityDirectory::default()
        }
    }
}

fn setup_terminal() -> Result<Tui> {
    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, cursor::Hide)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    let mut out = io::stdout();
    execute!(out, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    terminal.show_cursor()?;
    Ok(())
}
