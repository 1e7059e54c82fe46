//! Backend commands queued from UI to backend worker.

use shared::domain::{MovieId, NewMovie};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    FetchMovies,
    Retry,
    Cancel,
    AddMovie(NewMovie),
    DeleteMovie(MovieId),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchMovies => "fetch_movies",
            Self::Retry => "retry",
            Self::Cancel => "cancel",
            Self::AddMovie(_) => "add_movie",
            Self::DeleteMovie(_) => "delete_movie",
        }
    }
}
