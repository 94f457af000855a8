use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::config::Config;
use crate::controller::{ListChannels, ListMessage, MovieListController, MovieListEvent, SideEffect};
use crate::error::{FlickError, Result};
use crate::event::Event;
use crate::repository::MovieRepository;
use crate::route;
use crate::types::Movie;
use crate::ui::movie_grid;
use crate::usecase::MovieUseCases;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MovieList,   // Search box + movie grid
    MovieDetail, // Single movie
}

pub struct App {
    pub screen: Screen,
    pub list: MovieListController,

    // Movie list screen
    pub search_focused: bool,
    pub suggestion_index: Option<usize>,
    pub movie_index: usize,

    // Detail screen
    pub current_movie: Option<Movie>,
    pub scroll_offset: u16,

    pub error: Option<String>,
    pub notice: Option<String>,
    pub should_quit: bool,
    pub image_base_url: String,
    width: u16,
    routes: Vec<String>,
    repository: MovieRepository,
}

impl App {
    pub fn new(config: &Config, repository: MovieRepository) -> (Self, ListChannels) {
        let use_cases = MovieUseCases::new(repository.clone());
        let (list, channels) = MovieListController::new(use_cases, config.search.clone());

        let app = Self {
            screen: Screen::MovieList,
            list,
            search_focused: false,
            suggestion_index: None,
            movie_index: 0,
            current_movie: None,
            scroll_offset: 0,
            error: None,
            notice: None,
            should_quit: false,
            image_base_url: config.api.image_base_url.clone(),
            width: 80,
            routes: vec![route::MOVIE_LIST_ROUTE.to_string()],
            repository,
        };

        (app, channels)
    }

    /// Grid columns at the current terminal width, inside the grid borders.
    pub fn columns(&self) -> usize {
        movie_grid::columns_for(self.width.saturating_sub(2))
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, _) => Action::Resize(width),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        match self.screen {
            Screen::MovieList if self.search_focused => self.handle_search_key(key),
            Screen::MovieList => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                KeyCode::Char('/') => Action::FocusSearch(true),
                KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
                KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
                KeyCode::Char('h') | KeyCode::Left => Action::ScrollLeft,
                KeyCode::Char('l') | KeyCode::Right => Action::ScrollRight,
                KeyCode::Enter => Action::Select,
                KeyCode::Char('r') => Action::List(MovieListEvent::LoadMovies),
                KeyCode::Char('n') => Action::List(MovieListEvent::LoadNextPage),
                _ => Action::None,
            },
            Screen::MovieDetail => match key.code {
                KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => Action::Back,
                KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
                KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
                KeyCode::Char('o') => Action::OpenInBrowser,
                KeyCode::Char('y') => Action::YankUrl,
                _ => Action::None,
            },
        }
    }

    fn handle_search_key(&self, key: KeyEvent) -> Action {
        let query = self.list.query();
        match key.code {
            KeyCode::Esc => Action::FocusSearch(false),
            KeyCode::Enter => match self
                .suggestion_index
                .and_then(|i| self.list.suggestions().get(i))
            {
                Some(suggestion) => {
                    Action::List(MovieListEvent::OnSuggestionClick(suggestion.clone()))
                }
                None => Action::List(MovieListEvent::OnSearchSubmit(query.to_string())),
            },
            KeyCode::Up => Action::SuggestionUp,
            KeyCode::Down => Action::SuggestionDown,
            KeyCode::Backspace => {
                let mut next = query.to_string();
                next.pop();
                Action::List(MovieListEvent::OnSearchQueryChange(next))
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::List(MovieListEvent::OnSearchQueryChange(String::new()))
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::List(MovieListEvent::OnSearchQueryChange(format!("{}{}", query, c)))
            }
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if !matches!(action, Action::None) {
            self.error = None;
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => {
                if self.routes.len() > 1 {
                    self.routes.pop();
                }
                self.screen = Screen::MovieList;
                self.current_movie = None;
                self.scroll_offset = 0;
            }
            Action::Resize(width) => {
                self.width = width;
            }
            Action::ScrollUp => match self.screen {
                Screen::MovieList => {
                    self.movie_index = self.movie_index.saturating_sub(self.columns());
                }
                Screen::MovieDetail => {
                    self.scroll_offset = self.scroll_offset.saturating_sub(1);
                }
            },
            Action::ScrollDown => match self.screen {
                Screen::MovieList => {
                    let last = self.list.movies().len().saturating_sub(1);
                    self.movie_index = (self.movie_index + self.columns()).min(last);
                    self.request_more_if_near_end();
                }
                Screen::MovieDetail => {
                    self.scroll_offset = self.scroll_offset.saturating_add(1);
                }
            },
            Action::ScrollLeft => {
                self.movie_index = self.movie_index.saturating_sub(1);
            }
            Action::ScrollRight => {
                let last = self.list.movies().len().saturating_sub(1);
                self.movie_index = (self.movie_index + 1).min(last);
                self.request_more_if_near_end();
            }
            Action::Select => {
                if let Some(movie) = self.list.movies().get(self.movie_index) {
                    let movie = movie.clone();
                    self.list.on_event(MovieListEvent::OnMovieClick(movie));
                }
            }
            Action::FocusSearch(focused) => {
                self.search_focused = focused;
                self.suggestion_index = None;
                self.list.on_event(MovieListEvent::OnSearchFocusChange(focused));
            }
            Action::SuggestionUp => {
                self.suggestion_index = match self.suggestion_index {
                    Some(0) | None => None,
                    Some(i) => Some(i - 1),
                };
            }
            Action::SuggestionDown => {
                let count = self.list.suggestions().len();
                if count > 0 {
                    self.suggestion_index = Some(match self.suggestion_index {
                        None => 0,
                        Some(i) => (i + 1).min(count - 1),
                    });
                }
            }
            Action::List(event) => {
                match &event {
                    MovieListEvent::OnSearchSubmit(_) | MovieListEvent::OnSuggestionClick(_) => {
                        self.search_focused = false;
                        self.suggestion_index = None;
                        self.movie_index = 0;
                    }
                    MovieListEvent::OnSearchQueryChange(_) => {
                        self.suggestion_index = None;
                    }
                    MovieListEvent::LoadMovies => {
                        self.movie_index = 0;
                    }
                    _ => {}
                }
                self.list.on_event(event);
            }
            Action::OpenInBrowser => {
                if let Some(url) = self.current_url() {
                    match open::that(&url) {
                        Ok(()) => self.notice = Some(format!("Opened {}", url)),
                        Err(e) => self.error = Some(FlickError::from(e).to_string()),
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.current_url() {
                    match copy_to_clipboard(&url) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.error = Some(e.to_string()),
                    }
                }
            }
            Action::None => {}
        }
    }

    /// Apply a controller completion and keep the grid selection in range.
    pub fn on_list_message(&mut self, message: ListMessage) {
        self.list.apply(message);

        let len = self.list.movies().len();
        if self.movie_index >= len {
            self.movie_index = len.saturating_sub(1);
        }
        if let Some(i) = self.suggestion_index {
            if i >= self.list.suggestions().len() {
                self.suggestion_index = None;
            }
        }
    }

    pub fn on_side_effect(&mut self, effect: SideEffect) {
        match effect {
            SideEffect::NavigateToDetails(movie) => {
                let route = route::movie_details_route(&movie);
                self.current_movie = Some(route::decode_movie_details(&route));
                self.routes.push(route);
                self.scroll_offset = 0;
                self.screen = Screen::MovieDetail;
                tracing::debug!(route = self.current_route(), "navigated");
            }
        }
    }

    pub fn current_route(&self) -> &str {
        self.routes
            .last()
            .map(String::as_str)
            .unwrap_or(route::MOVIE_LIST_ROUTE)
    }

    fn current_url(&self) -> Option<String> {
        self.current_movie
            .as_ref()
            .map(|m| self.repository.web_url(m.id))
    }

    /// Selecting into the last grid row asks for the next page.
    fn request_more_if_near_end(&mut self) {
        let len = self.list.movies().len();
        if len > 0 && self.list.has_next_page() && self.movie_index + self.columns() >= len {
            self.list.on_event(MovieListEvent::LoadNextPage);
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| FlickError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| FlickError::Clipboard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::mock::{movie, movies, Call, MockCatalog};

    fn setup(catalog: MockCatalog) -> (Arc<MockCatalog>, App, ListChannels) {
        let catalog = Arc::new(catalog);
        let (app, channels) = App::new(&Config::default(), MovieRepository::new(catalog.clone()));
        (catalog, app, channels)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    async fn settle(app: &mut App, channels: &mut ListChannels) {
        let message = channels.messages.recv().await.expect("controller message");
        app.on_list_message(message);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_in_search_edits_query() {
        let (_, mut app, _ch) = setup(MockCatalog::new());

        let action = app.handle_event(key(KeyCode::Char('/')));
        assert_eq!(action, Action::FocusSearch(true));
        app.update(action);
        assert!(app.search_focused);

        for c in ['a', 'b'] {
            let action = app.handle_event(key(KeyCode::Char(c)));
            app.update(action);
        }
        assert_eq!(app.list.query(), "ab");

        let action = app.handle_event(key(KeyCode::Backspace));
        assert_eq!(
            action,
            Action::List(MovieListEvent::OnSearchQueryChange("a".to_string()))
        );
        app.update(action);
        assert_eq!(app.list.query(), "a");

        // letters are text while the search box has focus
        assert_eq!(
            app.handle_event(key(KeyCode::Char('q'))),
            Action::List(MovieListEvent::OnSearchQueryChange("aq".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn enter_clicks_highlighted_suggestion() {
        let (catalog, mut app, mut ch) = setup(
            MockCatalog::new()
                .with_search("in", 1, vec![movie(1, "Inception"), movie(2, "Insidious")])
                .with_search("Insidious", 1, vec![movie(2, "Insidious")]),
        );

        app.update(Action::FocusSearch(true));
        app.update(Action::List(MovieListEvent::OnSearchQueryChange("in".to_string())));
        settle(&mut app, &mut ch).await;

        app.update(Action::SuggestionDown);
        app.update(Action::SuggestionDown);
        app.update(Action::SuggestionDown);
        assert_eq!(app.suggestion_index, Some(1));

        let action = app.handle_event(key(KeyCode::Enter));
        assert_eq!(
            action,
            Action::List(MovieListEvent::OnSuggestionClick("Insidious".to_string()))
        );
        app.update(action);
        assert!(!app.search_focused);
        settle(&mut app, &mut ch).await;

        assert_eq!(app.list.movies(), [movie(2, "Insidious")]);
        assert_eq!(
            catalog.calls(),
            vec![
                Call::Search("in".to_string(), 1),
                Call::Search("Insidious".to_string(), 1),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn scrolling_into_last_row_requests_next_page() {
        let (catalog, mut app, mut ch) = setup(
            MockCatalog::new()
                .with_popular(1, movies(0..6))
                .with_popular(2, movies(6..12)),
        );
        app.update(Action::Resize(3 * movie_grid::CARD_WIDTH + 2));
        assert_eq!(app.columns(), 3);

        app.update(Action::List(MovieListEvent::LoadMovies));
        settle(&mut app, &mut ch).await;

        app.update(Action::ScrollDown);
        assert_eq!(app.movie_index, 3);
        settle(&mut app, &mut ch).await;

        assert_eq!(app.list.movies().len(), 12);
        assert_eq!(catalog.calls(), vec![Call::Popular(1), Call::Popular(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn select_navigates_to_detail_and_back() {
        let (_, mut app, mut ch) = setup(MockCatalog::new().with_popular(1, movies(0..4)));

        app.update(Action::List(MovieListEvent::LoadMovies));
        settle(&mut app, &mut ch).await;
        app.update(Action::ScrollRight);
        app.update(Action::Select);

        let effect = ch.effects.try_recv().unwrap();
        app.on_side_effect(effect);
        assert_eq!(app.screen, Screen::MovieDetail);
        assert_eq!(app.current_movie, Some(movie(1, "Movie 1")));
        assert!(app.current_route().starts_with("movie_details/"));

        app.update(app.handle_event(key(KeyCode::Esc)));
        assert_eq!(app.screen, Screen::MovieList);
        assert_eq!(app.current_movie, None);
        assert_eq!(app.current_route(), route::MOVIE_LIST_ROUTE);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_is_clamped_after_reload() {
        let (_, mut app, mut ch) = setup(MockCatalog::new().with_popular(1, movies(0..2)));

        app.movie_index = 10;
        app.update(Action::List(MovieListEvent::LoadMovies));
        assert_eq!(app.movie_index, 0);
        app.movie_index = 10;
        settle(&mut app, &mut ch).await;
        assert_eq!(app.movie_index, 1);
    }
}
