//! Client for the remote JSON document store holding the movie collection.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Movie, MovieId, NewMovie},
    protocol::{collection_into_movies, CreateMovieResponse, MovieCollection, MovieRecord},
};
use tracing::{info, warn};
use url::Url;

use crate::{
    config::Settings,
    error::{StoreError, StoreOperation},
};

/// Read/create/delete access to the movie collection. Implementations never
/// retry; every failure is surfaced to the caller.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError>;
    async fn add_movie(&self, movie: &NewMovie) -> Result<Movie, StoreError>;
    async fn delete_movie(&self, id: &MovieId) -> Result<(), StoreError>;
}

pub struct HttpMovieStore {
    http: Client,
    base_url: Url,
}

impl HttpMovieStore {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.store_url()?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build store http client")?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Settings only admit http(s) urls, which always have a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn collection_url(&self) -> Url {
        self.endpoint(&["movies.json"])
    }

    fn record_url(&self, id: &MovieId) -> Url {
        self.endpoint(&["movies", &format!("{id}.json")])
    }
}

async fn success_body(operation: StoreOperation, res: Response) -> Result<String, StoreError> {
    let status = res.status();
    if !status.is_success() {
        warn!(operation = operation.label(), %status, "store: request rejected");
        return Err(StoreError::transport(operation, format!("HTTP {status}")));
    }
    res.text()
        .await
        .map_err(|err| StoreError::transport(operation, err))
}

#[async_trait]
impl MovieStore for HttpMovieStore {
    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let operation = StoreOperation::ListMovies;
        let url = self.collection_url();
        info!(%url, "store: list_movies");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| StoreError::transport(operation, err))?;
        let body = success_body(operation, res).await?;
        let collection: MovieCollection =
            serde_json::from_str(&body).map_err(|err| StoreError::decode(operation, err))?;

        Ok(collection_into_movies(collection))
    }

    async fn add_movie(&self, movie: &NewMovie) -> Result<Movie, StoreError> {
        let operation = StoreOperation::AddMovie;
        let url = self.collection_url();
        info!(%url, title = %movie.title, "store: add_movie");

        let res = self
            .http
            .post(url)
            .json(&MovieRecord::from(movie))
            .send()
            .await
            .map_err(|err| StoreError::transport(operation, err))?;
        let body = success_body(operation, res).await?;
        let created: CreateMovieResponse =
            serde_json::from_str(&body).map_err(|err| StoreError::decode(operation, err))?;

        Ok(Movie::from_new(MovieId(created.name), movie.clone()))
    }

    async fn delete_movie(&self, id: &MovieId) -> Result<(), StoreError> {
        let operation = StoreOperation::DeleteMovie;
        let url = self.record_url(id);
        info!(%url, movie_id = %id, "store: delete_movie");

        let res = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|err| StoreError::transport(operation, err))?;
        success_body(operation, res).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
