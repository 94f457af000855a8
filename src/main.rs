mod action;
mod app;
mod auth;
mod catalog;
mod config;
mod controller;
mod error;
mod event;
mod repository;
mod route;
mod tmdb;
mod tui;
mod types;
mod ui;
mod usecase;

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::controller::MovieListEvent;
use crate::event::Event;
use crate::repository::MovieRepository;
use crate::tmdb::Tmdb;
use crate::tui::EventHandler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let config = Config::load();
    let token = auth::load_token(&config.api)?;
    let tmdb = Tmdb::new(&config.api, token)?;
    tracing::info!(catalog = tmdb.name(), base_url = %config.api.base_url, "starting");

    let result = run(config, MovieRepository::new(Arc::new(tmdb))).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(config: Config, repository: MovieRepository) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (mut app, mut channels) = App::new(&config, repository);

    app.update(Action::Resize(terminal.size()?.width));
    action_tx.send(Action::List(MovieListEvent::LoadMovies))?;

    let render_rate = Duration::from_millis(33);
    let mut events = EventHandler::new(render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
            Some(message) = channels.messages.recv() => {
                app.on_list_message(message);
            }
            Some(effect) = channels.effects.recv() => {
                app.on_side_effect(effect);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
