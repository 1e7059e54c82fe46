use std::fmt;

use serde::{Deserialize, Serialize};

/// Key assigned by the remote store when a record is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub opening_text: String,
    pub release_date: String,
}

impl Movie {
    pub fn from_new(id: MovieId, movie: NewMovie) -> Self {
        Self {
            id,
            title: movie.title,
            opening_text: movie.opening_text,
            release_date: movie.release_date,
        }
    }
}

/// Fields submitted when creating a movie; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub title: String,
    pub opening_text: String,
    pub release_date: String,
}

impl NewMovie {
    pub fn new(
        title: impl Into<String>,
        opening_text: impl Into<String>,
        release_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            opening_text: opening_text.into(),
            release_date: release_date.into(),
        }
    }

    /// True when every field holds something other than whitespace.
    pub fn is_complete(&self) -> bool {
        [&self.title, &self.opening_text, &self.release_date]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_serializes_with_store_field_names() {
        let movie = Movie {
            id: MovieId::new("k1"),
            title: "A".into(),
            opening_text: "o".into(),
            release_date: "2020".into(),
        };
        let value = serde_json::to_value(&movie).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "id": "k1",
                "title": "A",
                "openingText": "o",
                "releaseDate": "2020"
            })
        );
    }

    #[test]
    fn blank_fields_make_new_movie_incomplete() {
        assert!(NewMovie::new("Alien", "In space...", "1979").is_complete());
        assert!(!NewMovie::new("Alien", "   ", "1979").is_complete());
        assert!(!NewMovie::default().is_complete());
    }
}
