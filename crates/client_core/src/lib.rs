//! Movie catalog client: the store client for the remote JSON document API and
//! the fetch/retry controller that drives what the user sees.

pub mod config;
pub mod controller;
pub mod error;
pub mod retry;
pub mod store;

pub use config::{load_settings, Settings};
pub use controller::{ControllerSettings, ControllerSnapshot, MovieController, ViewState};
pub use error::{StoreError, StoreOperation};
pub use retry::RetryState;
pub use store::{HttpMovieStore, MovieStore};
