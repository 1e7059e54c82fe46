//! Fetch/retry state machine for the movie list.
//!
//! [`MovieController`] owns the loading flag, the last error, the loaded list
//! and the [`RetryState`]. Every change is published as a
//! [`ControllerSnapshot`] on a watch channel, so a presentation layer only has
//! to subscribe and redraw.
//!
//! At most one auto-retry timer is outstanding. List responses carry a
//! generation token and are dropped when a newer fetch, a cancel, or
//! [`MovieController::shutdown`] got there first. Adds and deletes confirmed
//! while a list fetch is in flight are replayed onto its response.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use shared::domain::{Movie, MovieId, NewMovie};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{config::Settings, error::StoreError, retry::RetryState, store::MovieStore};

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(5_000);
pub const LOADING_TEXT: &str = "....LOADING....";
pub const EMPTY_LIST_TEXT: &str = "No movies found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Loaded(Vec<Movie>),
    Failed(String),
    Retrying(u32),
}

impl ViewState {
    /// Single place where display precedence is decided:
    /// loading, then error, then auto-retry, then whatever list data exists.
    pub fn derive(
        is_loading: bool,
        error: Option<&str>,
        retry: RetryState,
        movies: Option<&[Movie]>,
    ) -> Self {
        if is_loading {
            return Self::Loading;
        }
        if let Some(message) = error {
            return Self::Failed(message.to_string());
        }
        if retry.is_retrying() {
            return Self::Retrying(retry.attempt_count());
        }
        match movies {
            Some(movies) => Self::Loaded(movies.to_vec()),
            None => Self::Idle,
        }
    }

    /// Fixed text shown instead of a list, if any.
    pub fn placeholder_text(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING_TEXT),
            Self::Idle => Some(EMPTY_LIST_TEXT),
            Self::Loaded(movies) if movies.is_empty() => Some(EMPTY_LIST_TEXT),
            _ => None,
        }
    }

    pub fn offers_retry(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn offers_cancel(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Retrying(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSnapshot {
    pub view: ViewState,
    /// `None` until a list has been loaded or a movie added.
    pub movies: Option<Vec<Movie>>,
    pub retry: RetryState,
}

impl Default for ControllerSnapshot {
    fn default() -> Self {
        Self {
            view: ViewState::Idle,
            movies: None,
            retry: RetryState::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub retry_delay: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl From<&Settings> for ControllerSettings {
    fn from(value: &Settings) -> Self {
        Self {
            retry_delay: value.retry_delay(),
        }
    }
}

struct RetryTimer {
    id: u64,
    task: JoinHandle<()>,
}

/// Mutations the store confirmed after the in-flight list read was issued.
#[derive(Default)]
struct ConfirmedChanges {
    added: Vec<Movie>,
    removed: Vec<MovieId>,
}

impl ConfirmedChanges {
    fn record_add(&mut self, movie: Movie) {
        self.removed.retain(|id| *id != movie.id);
        self.added.push(movie);
    }

    fn record_delete(&mut self, id: MovieId) {
        self.added.retain(|movie| movie.id != id);
        self.removed.push(id);
    }

    /// Idempotent: a list that already reflects a change is left as is.
    fn replay_onto(self, movies: &mut Vec<Movie>) {
        movies.retain(|movie| !self.removed.contains(&movie.id));
        for added in self.added {
            if !movies.iter().any(|movie| movie.id == added.id) {
                movies.push(added);
            }
        }
    }
}

#[derive(Default)]
struct ControllerState {
    movies: Option<Vec<Movie>>,
    is_loading: bool,
    error: Option<String>,
    retry: RetryState,
    fetch_generation: u64,
    inflight_fetch: Option<u64>,
    confirmed_during_fetch: ConfirmedChanges,
    retry_timer: Option<RetryTimer>,
    next_timer_id: u64,
    shut_down: bool,
}

impl ControllerState {
    fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            view: ViewState::derive(
                self.is_loading,
                self.error.as_deref(),
                self.retry,
                self.movies.as_deref(),
            ),
            movies: self.movies.clone(),
            retry: self.retry,
        }
    }

    fn error_displayed(&self) -> bool {
        !self.is_loading && self.error.is_some()
    }

    fn clear_inflight_fetch(&mut self) -> Option<u64> {
        self.confirmed_during_fetch = ConfirmedChanges::default();
        self.inflight_fetch.take()
    }

    fn cancel_retry_timer(&mut self) {
        if let Some(timer) = self.retry_timer.take() {
            timer.task.abort();
        }
    }
}

pub struct MovieController {
    store: Arc<dyn MovieStore>,
    settings: ControllerSettings,
    inner: Mutex<ControllerState>,
    snapshots: watch::Sender<ControllerSnapshot>,
    self_ref: Weak<MovieController>,
}

impl MovieController {
    pub fn new(store: Arc<dyn MovieStore>, settings: ControllerSettings) -> Arc<Self> {
        let (snapshots, _) = watch::channel(ControllerSnapshot::default());
        Arc::new_cyclic(|self_ref| Self {
            store,
            settings,
            inner: Mutex::new(ControllerState::default()),
            snapshots,
            self_ref: self_ref.clone(),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn settings(&self) -> ControllerSettings {
        self.settings
    }

    pub async fn retry_timer_pending(&self) -> bool {
        self.inner.lock().await.retry_timer.is_some()
    }

    /// Initial load: retry bookkeeping starts from zero, then the list is fetched.
    pub async fn start(&self) {
        {
            let mut state = self.inner.lock().await;
            if state.shut_down {
                return;
            }
            state.retry.reset();
            state.cancel_retry_timer();
            self.publish(&state);
        }
        self.fetch_movies().await;
    }

    /// Manual "Fetch Movies" trigger; valid from any state.
    pub async fn fetch_movies(&self) {
        let Some(generation) = self.begin_fetch().await else {
            return;
        };
        let result = self.store.list_movies().await;
        self.finish_fetch(generation, result).await;
    }

    /// Enter auto-retry mode and try again right away. Only honoured while an
    /// error is on screen.
    pub async fn retry(&self) {
        {
            let mut state = self.inner.lock().await;
            if state.shut_down || !state.error_displayed() {
                debug!("controller: retry ignored, no error displayed");
                return;
            }
            state.error = None;
            state.retry.begin();
            info!(
                attempt = state.retry.attempt_count(),
                "controller: retry requested"
            );
            self.arm_retry_timer(&mut state);
            self.publish(&state);
        }
        self.fetch_movies().await;
    }

    /// Stop auto-retry and dismiss the error. List data is left alone, so the
    /// view falls back to the loaded list or to `Idle`.
    pub async fn cancel(&self) {
        let mut state = self.inner.lock().await;
        if state.shut_down || (state.error.is_none() && !state.retry.is_retrying()) {
            debug!("controller: cancel ignored, nothing to cancel");
            return;
        }

        let was_retrying = state.retry.is_retrying();
        state.retry.reset();
        state.cancel_retry_timer();
        state.error = None;
        if was_retrying {
            if let Some(generation) = state.clear_inflight_fetch() {
                debug!(generation, "controller: abandoning in-flight retry fetch");
                state.is_loading = false;
            }
        }
        info!("controller: retry cancelled");
        self.publish(&state);
    }

    pub async fn add_movie(&self, movie: NewMovie) {
        if self.is_shut_down().await {
            return;
        }
        info!(title = %movie.title, "controller: adding movie");
        let result = self.store.add_movie(&movie).await;

        let mut state = self.inner.lock().await;
        if state.shut_down {
            debug!("controller: discarding add response after shutdown");
            return;
        }
        match result {
            Ok(created) => {
                info!(movie_id = %created.id, "controller: movie added");
                if state.inflight_fetch.is_some() {
                    state.confirmed_during_fetch.record_add(created.clone());
                }
                state.movies.get_or_insert_with(Vec::new).push(created);
            }
            Err(err) => {
                warn!("controller: add_movie failed: {err}");
                state.error = Some(err.to_string());
            }
        }
        self.publish(&state);
    }

    pub async fn delete_movie(&self, id: MovieId) {
        if self.is_shut_down().await {
            return;
        }
        info!(movie_id = %id, "controller: deleting movie");
        let result = self.store.delete_movie(&id).await;

        let mut state = self.inner.lock().await;
        if state.shut_down {
            debug!("controller: discarding delete response after shutdown");
            return;
        }
        match result {
            Ok(()) => {
                if state.inflight_fetch.is_some() {
                    state.confirmed_during_fetch.record_delete(id.clone());
                }
                if let Some(movies) = state.movies.as_mut() {
                    movies.retain(|movie| movie.id != id);
                }
            }
            Err(err) => {
                warn!(movie_id = %id, "controller: delete_movie failed: {err}");
                state.error = Some(err.to_string());
            }
        }
        self.publish(&state);
    }

    /// Tear down: the pending timer is cancelled and any response still in
    /// flight is discarded when it arrives.
    pub async fn shutdown(&self) {
        let mut state = self.inner.lock().await;
        state.shut_down = true;
        state.cancel_retry_timer();
        state.clear_inflight_fetch();
        info!("controller: shut down");
    }

    async fn is_shut_down(&self) -> bool {
        self.inner.lock().await.shut_down
    }

    async fn begin_fetch(&self) -> Option<u64> {
        let mut state = self.inner.lock().await;
        if state.shut_down {
            return None;
        }
        state.fetch_generation += 1;
        let generation = state.fetch_generation;
        // A read issued now already sees every mutation confirmed so far.
        state.clear_inflight_fetch();
        state.inflight_fetch = Some(generation);
        state.is_loading = true;
        state.error = None;
        info!(
            generation,
            attempt = state.retry.attempt_count(),
            "controller: fetching movies"
        );
        self.publish(&state);
        Some(generation)
    }

    async fn finish_fetch(&self, generation: u64, result: Result<Vec<Movie>, StoreError>) {
        let mut state = self.inner.lock().await;
        if state.shut_down || state.inflight_fetch != Some(generation) {
            debug!(generation, "controller: discarding stale list response");
            return;
        }
        let confirmed = std::mem::take(&mut state.confirmed_during_fetch);
        state.clear_inflight_fetch();
        state.is_loading = false;

        match result {
            Ok(mut movies) => {
                confirmed.replay_onto(&mut movies);
                info!(generation, count = movies.len(), "controller: movies loaded");
                state.movies = Some(movies);
                state.retry.reset();
                state.cancel_retry_timer();
            }
            Err(err) => {
                if state.retry.record_failure() {
                    // Message stays hidden while auto-retrying.
                    warn!(
                        generation,
                        attempt = state.retry.attempt_count(),
                        "controller: auto-retry fetch failed: {err}"
                    );
                    self.arm_retry_timer(&mut state);
                } else {
                    warn!(generation, "controller: fetch failed: {err}");
                    state.error = Some(err.to_string());
                }
            }
        }
        self.publish(&state);
    }

    fn arm_retry_timer(&self, state: &mut ControllerState) {
        state.cancel_retry_timer();
        if !state.retry.wants_timer() {
            return;
        }

        state.next_timer_id += 1;
        let id = state.next_timer_id;
        let delay = self.settings.retry_delay;
        let controller = self.self_ref.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(controller) = controller.upgrade() {
                controller.on_retry_timer(id).await;
            }
        });
        state.retry_timer = Some(RetryTimer { id, task });
        debug!(
            attempt = state.retry.attempt_count(),
            delay_ms = delay.as_millis() as u64,
            "controller: retry timer armed"
        );
    }

    async fn on_retry_timer(&self, id: u64) {
        {
            let mut state = self.inner.lock().await;
            match &state.retry_timer {
                Some(timer) if timer.id == id => {}
                _ => return,
            }
            // Detach rather than abort: this task is the one running.
            state.retry_timer = None;
            if state.inflight_fetch.is_some() {
                debug!("controller: retry timer fired during a fetch, skipping");
                return;
            }
        }
        self.fetch_movies().await;
    }

    fn publish(&self, state: &ControllerState) {
        let next = state.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

impl Drop for MovieController {
    fn drop(&mut self) {
        self.inner.get_mut().cancel_retry_timer();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
