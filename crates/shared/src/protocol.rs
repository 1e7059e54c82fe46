//! Wire shapes exchanged with the remote JSON document store.

use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::domain::{Movie, MovieId, NewMovie};

/// Body of a single stored record. Fields absent from the store decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub opening_text: String,
    #[serde(default)]
    pub release_date: String,
}

impl MovieRecord {
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            opening_text: self.opening_text,
            release_date: self.release_date,
        }
    }
}

impl From<&NewMovie> for MovieRecord {
    fn from(value: &NewMovie) -> Self {
        Self {
            title: value.title.clone(),
            opening_text: value.opening_text.clone(),
            release_date: value.release_date.clone(),
        }
    }
}

/// Whole collection as returned by `GET /movies.json`, in document order.
/// `null` decodes as an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieCollection {
    pub entries: Vec<(String, MovieRecord)>,
}

impl<'de> Deserialize<'de> for MovieCollection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = MovieCollection;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of movie records or null")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(MovieCollection::default())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(MovieCollection::default())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_map(self)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, record)) = map.next_entry::<String, MovieRecord>()? {
                    entries.push((key, record));
                }
                Ok(MovieCollection { entries })
            }
        }

        deserializer.deserialize_option(CollectionVisitor)
    }
}

pub fn collection_into_movies(collection: MovieCollection) -> Vec<Movie> {
    collection
        .entries
        .into_iter()
        .map(|(key, record)| record.into_movie(MovieId(key)))
        .collect()
}

/// Response to `POST /movies.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMovieResponse {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_pairs_each_key_with_its_record() {
        let collection: MovieCollection = serde_json::from_str(
            r#"{"k2":{"title":"B","openingText":"p","releaseDate":"2021"},
                "k1":{"title":"A","openingText":"o","releaseDate":"2020"}}"#,
        )
        .expect("decode");
        let movies = collection_into_movies(collection);
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, MovieId::new("k2"));
        assert_eq!(movies[0].title, "B");
        assert_eq!(movies[1].id, MovieId::new("k1"));
        assert_eq!(movies[1].release_date, "2020");
    }

    #[test]
    fn collection_keeps_response_order() {
        let collection: MovieCollection = serde_json::from_str(
            r#"{"-Nz":{"title":"Z"},"-Na":{"title":"A"},"-Nm":{"title":"M"}}"#,
        )
        .expect("decode");
        let ids: Vec<_> = collection_into_movies(collection)
            .into_iter()
            .map(|movie| movie.id.0)
            .collect();
        assert_eq!(ids, ["-Nz", "-Na", "-Nm"]);
    }

    #[test]
    fn non_object_collection_is_rejected() {
        assert!(serde_json::from_str::<MovieCollection>("[1, 2]").is_err());
        assert!(serde_json::from_str::<MovieCollection>(r#"{"k1": 5}"#).is_err());
    }

    #[test]
    fn null_collection_is_empty() {
        let collection: MovieCollection = serde_json::from_str("null").expect("decode");
        assert!(collection_into_movies(collection).is_empty());
    }

    #[test]
    fn missing_record_fields_default_to_empty() {
        let collection: MovieCollection =
            serde_json::from_str(r#"{"k1":{"title":"Only title"}}"#).expect("decode");
        let movies = collection_into_movies(collection);
        assert_eq!(movies[0].opening_text, "");
        assert_eq!(movies[0].release_date, "");
    }
}
