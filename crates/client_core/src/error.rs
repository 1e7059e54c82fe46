use std::fmt;

use thiserror::Error;

/// Remote store call that produced a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    ListMovies,
    AddMovie,
    DeleteMovie,
}

impl StoreOperation {
    pub fn label(self) -> &'static str {
        match self {
            Self::ListMovies => "list_movies",
            Self::AddMovie => "add_movie",
            Self::DeleteMovie => "delete_movie",
        }
    }

    /// User-facing sentence shown when this operation fails.
    pub fn failure_summary(self) -> &'static str {
        match self {
            Self::ListMovies => "Something went wrong....Retrying",
            Self::AddMovie => "Failed to add movie.",
            Self::DeleteMovie => "Failed to delete movie.",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{} ({detail})", .operation.failure_summary())]
    Transport {
        operation: StoreOperation,
        detail: String,
    },
    #[error("{} (malformed response: {detail})", .operation.failure_summary())]
    Decode {
        operation: StoreOperation,
        detail: String,
    },
}

impl StoreError {
    pub fn transport(operation: StoreOperation, detail: impl fmt::Display) -> Self {
        Self::Transport {
            operation,
            detail: detail.to_string(),
        }
    }

    pub fn decode(operation: StoreOperation, detail: impl fmt::Display) -> Self {
        Self::Decode {
            operation,
            detail: detail.to_string(),
        }
    }

    pub fn operation(&self) -> StoreOperation {
        match self {
            Self::Transport { operation, .. } | Self::Decode { operation, .. } => *operation,
        }
    }
}
