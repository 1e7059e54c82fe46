//! UI layer for desktop GUI: app shell, add-movie form and content section.

pub mod app;
pub mod form;

pub use app::MovieCatalogApp;
