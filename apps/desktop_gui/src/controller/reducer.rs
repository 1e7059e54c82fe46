//! Folds backend events into the state the UI draws from.

use client_core::{
    controller::{EMPTY_LIST_TEXT, LOADING_TEXT},
    ControllerSnapshot, ViewState,
};
use shared::domain::Movie;

use crate::controller::events::{UiError, UiEvent};

#[derive(Debug, Default)]
pub struct CatalogState {
    pub snapshot: ControllerSnapshot,
    pub banner: Option<UiError>,
    pub info: Option<String>,
}

impl CatalogState {
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                tracing::debug!("backend info: {message}");
                self.info = Some(message);
            }
            UiEvent::Snapshot(snapshot) => {
                self.snapshot = snapshot;
            }
            UiEvent::Error(err) => {
                tracing::warn!(context = ?err.context(), "backend error: {}", err.message());
                self.banner = Some(err);
            }
        }
    }

    /// Fatal startup failures stay on screen.
    pub fn dismiss_banner(&mut self) {
        if self.banner.as_ref().is_some_and(|banner| !banner.is_fatal()) {
            self.banner = None;
        }
    }

    pub fn backend_available(&self) -> bool {
        !self.banner.as_ref().is_some_and(UiError::is_fatal)
    }
}

/// What the content section shows for a given view.
#[derive(Debug, PartialEq, Eq)]
pub enum ContentSection<'a> {
    Placeholder(&'static str),
    Error(&'a str),
    Retrying(u32),
    List(&'a [Movie]),
}

pub fn content_section(view: &ViewState) -> ContentSection<'_> {
    match view {
        ViewState::Loading => ContentSection::Placeholder(LOADING_TEXT),
        ViewState::Idle => ContentSection::Placeholder(EMPTY_LIST_TEXT),
        ViewState::Loaded(movies) if movies.is_empty() => {
            ContentSection::Placeholder(EMPTY_LIST_TEXT)
        }
        ViewState::Loaded(movies) => ContentSection::List(movies),
        ViewState::Failed(message) => ContentSection::Error(message),
        ViewState::Retrying(attempt) => ContentSection::Retrying(*attempt),
    }
}
