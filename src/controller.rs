//! State controller behind the movie list screen.
//!
//! The controller is owned by the main loop and mutated only there. Fetches
//! and debounce timers run as spawned tasks that report back through
//! [`ListMessage`]s, which the main loop hands to [`MovieListController::apply`].
//!
//! Ordering rules:
//! - at most one primary fetch (load, search, next page) is in flight; new
//!   primary requests arriving meanwhile are dropped, not queued
//! - search-submit and suggestion lookups are debounced independently; a new
//!   trigger aborts the pending task of the same kind
//! - every completion carries the id of the request that started it and is
//!   ignored once a newer request of that kind exists

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::SearchConfig;
use crate::error::FlickError;
use crate::types::{Movie, MoviePage};
use crate::usecase::{long_enough_for_suggestions, MovieUseCases, Outcome};

const GENERIC_ERROR: &str = "An error occurred";

#[derive(Debug, Clone, PartialEq)]
pub enum MovieListEvent {
    LoadMovies,
    LoadNextPage,
    OnMovieClick(Movie),
    OnSearchQueryChange(String),
    OnSuggestionClick(String),
    OnSearchFocusChange(bool),
    OnSearchSubmit(String),
}

/// What the list screen shows. Replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Loading,
    Success {
        movies: Vec<Movie>,
        has_next_page: bool,
    },
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    NavigateToDetails(Movie),
}

/// Whether a page replaces the list or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    Replace,
    Append(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageRequest {
    Popular(u32),
    Search(String, u32),
}

/// Completions reported back to the controller by its spawned tasks.
#[derive(Debug)]
pub enum ListMessage {
    MoviesLoaded {
        outcome: Outcome<MoviePage>,
        fetch: Fetch,
        load_id: u64,
    },
    SuggestionsLoaded {
        outcome: Outcome<Vec<String>>,
        request_id: u64,
    },
    SearchDebounced {
        query: String,
        request_id: u64,
    },
}

/// Receiving ends handed to the main loop.
pub struct ListChannels {
    pub messages: mpsc::UnboundedReceiver<ListMessage>,
    pub effects: mpsc::UnboundedReceiver<SideEffect>,
}

pub struct MovieListController {
    state: UiState,
    query: String,
    /// Query behind the listed results; empty for the popular list.
    listed_query: String,
    pending_query: String,
    suggestions: Vec<String>,
    current_page: u32,
    in_flight: bool,
    has_next_page: bool,
    load_id: u64,
    search_id: u64,
    suggestion_id: u64,
    search_job: Option<JoinHandle<()>>,
    suggestions_job: Option<JoinHandle<()>>,
    use_cases: Arc<MovieUseCases>,
    settings: SearchConfig,
    msg_tx: mpsc::UnboundedSender<ListMessage>,
    effect_tx: mpsc::UnboundedSender<SideEffect>,
}

impl MovieListController {
    pub fn new(use_cases: MovieUseCases, settings: SearchConfig) -> (Self, ListChannels) {
        let (msg_tx, messages) = mpsc::unbounded_channel();
        let (effect_tx, effects) = mpsc::unbounded_channel();

        let controller = Self {
            state: UiState::Loading,
            query: String::new(),
            listed_query: String::new(),
            pending_query: String::new(),
            suggestions: Vec::new(),
            current_page: 1,
            in_flight: false,
            has_next_page: true,
            load_id: 0,
            search_id: 0,
            suggestion_id: 0,
            search_job: None,
            suggestions_job: None,
            use_cases: Arc::new(use_cases),
            settings,
            msg_tx,
            effect_tx,
        };

        (controller, ListChannels { messages, effects })
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight || matches!(self.state, UiState::Loading)
    }

    pub fn movies(&self) -> &[Movie] {
        match &self.state {
            UiState::Success { movies, .. } => movies,
            _ => &[],
        }
    }

    pub fn on_event(&mut self, event: MovieListEvent) {
        match event {
            MovieListEvent::LoadMovies => self.load_movies(),
            MovieListEvent::LoadNextPage => self.load_next_page(),
            MovieListEvent::OnMovieClick(movie) => {
                self.effect_tx.send(SideEffect::NavigateToDetails(movie)).ok();
            }
            MovieListEvent::OnSearchQueryChange(query) => {
                self.query = query.clone();
                self.update_suggestions(query);
            }
            MovieListEvent::OnSuggestionClick(suggestion) => {
                self.query = suggestion.clone();
                self.cancel_search_job();
                self.cancel_suggestions_job();
                self.suggestions.clear();
                self.search(suggestion);
            }
            MovieListEvent::OnSearchFocusChange(focused) => {
                if focused && long_enough_for_suggestions(&self.query) {
                    self.update_suggestions(self.query.clone());
                } else {
                    self.cancel_suggestions_job();
                    self.suggestions.clear();
                }
            }
            MovieListEvent::OnSearchSubmit(query) => {
                self.query = query.clone();
                self.update_suggestions(query.clone());
                self.schedule_search(query);
            }
        }
    }

    pub fn apply(&mut self, message: ListMessage) {
        match message {
            ListMessage::SearchDebounced { query, request_id } => {
                if request_id != self.search_id {
                    tracing::debug!(request_id, "ignoring stale search submit");
                    return;
                }
                self.search_job = None;
                if query.trim().is_empty() {
                    self.load_movies();
                } else {
                    self.search(query);
                }
            }
            ListMessage::SuggestionsLoaded {
                outcome,
                request_id,
            } => {
                if request_id != self.suggestion_id {
                    tracing::debug!(request_id, "ignoring stale suggestions");
                    return;
                }
                self.suggestions_job = None;
                match outcome {
                    Outcome::Success(titles) => self.suggestions = titles,
                    Outcome::Error(e) => {
                        tracing::debug!(error = %e, "suggestions unavailable");
                        self.suggestions.clear();
                    }
                    Outcome::Loading => {}
                }
            }
            ListMessage::MoviesLoaded {
                outcome,
                fetch,
                load_id,
            } => {
                if load_id != self.load_id {
                    tracing::debug!(load_id, "ignoring stale page");
                    return;
                }
                self.in_flight = false;
                self.apply_page(outcome, fetch);
            }
        }
    }

    fn apply_page(&mut self, outcome: Outcome<MoviePage>, fetch: Fetch) {
        match (outcome, fetch) {
            (Outcome::Success(page), Fetch::Replace) => {
                let movies = page.into_movies();
                self.has_next_page = !movies.is_empty();
                self.current_page = 1;
                self.listed_query = std::mem::take(&mut self.pending_query);
                self.state = UiState::Success {
                    movies,
                    has_next_page: self.has_next_page,
                };
            }
            (Outcome::Success(page), Fetch::Append(next)) => {
                let new_movies = page.into_movies();
                let previous = std::mem::replace(&mut self.state, UiState::Loading);
                if new_movies.is_empty() {
                    self.has_next_page = false;
                    self.state = match previous {
                        UiState::Success { movies, .. } => UiState::Success {
                            movies,
                            has_next_page: false,
                        },
                        other => other,
                    };
                } else {
                    let mut movies = match previous {
                        UiState::Success { movies, .. } => movies,
                        _ => Vec::new(),
                    };
                    movies.extend(new_movies);
                    self.has_next_page = true;
                    self.current_page = next;
                    self.state = UiState::Success {
                        movies,
                        has_next_page: true,
                    };
                }
            }
            (Outcome::Error(e), _) => {
                self.state = UiState::Error(error_message(&e));
            }
            (Outcome::Loading, _) => {}
        }
    }

    fn load_movies(&mut self) {
        if self.in_flight {
            tracing::debug!("load dropped, fetch already in flight");
            return;
        }
        self.state = UiState::Loading;
        self.spawn_page(PageRequest::Popular(1), Fetch::Replace);
    }

    fn search(&mut self, query: String) {
        if self.in_flight {
            tracing::debug!(query = %query, "search dropped, fetch already in flight");
            return;
        }
        self.state = UiState::Loading;
        self.spawn_page(PageRequest::Search(query, 1), Fetch::Replace);
    }

    fn load_next_page(&mut self) {
        if self.in_flight || !self.has_next_page {
            return;
        }
        let next = self.current_page + 1;
        let request = if self.listed_query.trim().is_empty() {
            PageRequest::Popular(next)
        } else {
            PageRequest::Search(self.listed_query.clone(), next)
        };
        self.spawn_page(request, Fetch::Append(next));
    }

    fn spawn_page(&mut self, request: PageRequest, fetch: Fetch) {
        if fetch == Fetch::Replace {
            self.pending_query = match &request {
                PageRequest::Popular(_) => String::new(),
                PageRequest::Search(query, _) => query.clone(),
            };
        }
        self.in_flight = true;
        self.load_id += 1;
        let load_id = self.load_id;
        let tx = self.msg_tx.clone();
        let use_cases = Arc::clone(&self.use_cases);
        tokio::spawn(async move {
            let outcome = match &request {
                PageRequest::Popular(page) => use_cases.popular.call(*page).await,
                PageRequest::Search(query, page) => use_cases.search.call(query, *page).await,
            };
            tx.send(ListMessage::MoviesLoaded {
                outcome,
                fetch,
                load_id,
            })
            .ok();
        });
    }

    fn update_suggestions(&mut self, query: String) {
        self.cancel_suggestions_job();
        if !long_enough_for_suggestions(&query) {
            self.suggestions.clear();
            return;
        }

        let request_id = self.suggestion_id;
        let delay = self.settings.suggestion_debounce();
        let limit = self.settings.suggestion_limit;
        let tx = self.msg_tx.clone();
        let use_cases = Arc::clone(&self.use_cases);
        self.suggestions_job = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let outcome = use_cases.suggestions.call(&query, limit).await;
            tx.send(ListMessage::SuggestionsLoaded {
                outcome,
                request_id,
            })
            .ok();
        }));
    }

    fn schedule_search(&mut self, query: String) {
        self.cancel_search_job();
        let request_id = self.search_id;
        let delay = self.settings.search_debounce();
        let tx = self.msg_tx.clone();
        self.search_job = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send(ListMessage::SearchDebounced { query, request_id })
                .ok();
        }));
    }

    /// Aborts the pending suggestion task and invalidates anything it
    /// already sent.
    fn cancel_suggestions_job(&mut self) {
        self.suggestion_id += 1;
        if let Some(job) = self.suggestions_job.take() {
            job.abort();
        }
    }

    fn cancel_search_job(&mut self) {
        self.search_id += 1;
        if let Some(job) = self.search_job.take() {
            job.abort();
        }
    }
}

impl Drop for MovieListController {
    fn drop(&mut self) {
        self.cancel_search_job();
        self.cancel_suggestions_job();
    }
}

fn error_message(err: &FlickError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_ERROR.to_string()
    } else {
        message
    }
}
