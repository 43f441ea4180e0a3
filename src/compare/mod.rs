//! Two lookups, one render.

use tracing::info;

use crate::movie::{Lookup, MovieFetcher, MovieRecord, NormalizeError};
use crate::provider::MetadataProvider;
use crate::render::render;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    #[error("Error: Could not find movie '{title}'")]
    NotFound { title: String },

    #[error(transparent)]
    Malformed(#[from] NormalizeError),
}

/// Compare two titles, returning the rendered card.
///
/// Both titles are looked up before either result is checked; when both are
/// missing the error names `movie_a`.
pub fn compare<P: MetadataProvider>(
    fetcher: &MovieFetcher<P>,
    movie_a: &str,
    movie_b: &str,
) -> Result<String, CompareError> {
    let a = fetcher.lookup(movie_a);
    let b = fetcher.lookup(movie_b);

    let a = found(a?, movie_a)?;
    let b = found(b?, movie_b)?;

    info!(movie_a, movie_b, "rendering comparison");
    Ok(render(&a, &b))
}

/// Tool-facing form of [`compare`]: failures become their message.
pub fn compare_movies<P: MetadataProvider>(
    fetcher: &MovieFetcher<P>,
    movie_a: &str,
    movie_b: &str,
) -> String {
    compare(fetcher, movie_a, movie_b).unwrap_or_else(|e| e.to_string())
}

fn found(lookup: Lookup, title: &str) -> Result<MovieRecord, CompareError> {
    match lookup {
        Lookup::Found(record) => Ok(record),
        Lookup::Absent => Err(CompareError::NotFound {
            title: title.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FakeProvider;
    use serde_json::json;

    fn movie(title: &str, rt: &str) -> serde_json::Value {
        json!({
            "Title": title,
            "Year": "2023",
            "Poster": "N/A",
            "BoxOffice": "$100",
            "Ratings": [{"Source": "Rotten Tomatoes", "Value": rt}],
            "Response": "True"
        })
    }

    #[test]
    fn not_found_message_format() {
        let err = CompareError::NotFound {
            title: "Oppenheimer".to_string(),
        };
        assert_eq!(err.to_string(), "Error: Could not find movie 'Oppenheimer'");
    }

    #[test]
    fn both_titles_are_fetched_even_when_first_is_missing() {
        let provider = FakeProvider::new().with_movie("Barbie", movie("Barbie", "88%"));
        let fetcher = MovieFetcher::new(provider);

        let out = compare_movies(&fetcher, "Oppenheimer", "Barbie");
        assert_eq!(out, "Error: Could not find movie 'Oppenheimer'");
        assert_eq!(fetcher.provider().requested(), vec!["Oppenheimer", "Barbie"]);
    }

    #[test]
    fn first_missing_title_wins_when_both_missing() {
        let fetcher = MovieFetcher::new(FakeProvider::new());
        let err = compare(&fetcher, "Nope A", "Nope B").unwrap_err();
        assert_eq!(
            err,
            CompareError::NotFound {
                title: "Nope A".to_string()
            }
        );
    }

    #[test]
    fn second_missing_title_is_named() {
        let provider = FakeProvider::new().with_movie("Heat", movie("Heat", "87%"));
        let fetcher = MovieFetcher::new(provider);
        let out = compare_movies(&fetcher, "Heat", "Ronin 2");
        assert_eq!(out, "Error: Could not find movie 'Ronin 2'");
    }

    #[test]
    fn malformed_number_surfaces_its_own_message() {
        let provider = FakeProvider::new()
            .with_movie("Heat", movie("Heat", "87%"))
            .with_movie("Odd", movie("Odd", "lots"));
        let fetcher = MovieFetcher::new(provider);
        let err = compare(&fetcher, "Heat", "Odd").unwrap_err();
        assert!(matches!(err, CompareError::Malformed(_)));
        assert_eq!(
            err.to_string(),
            "Error: Could not parse Rotten Tomatoes score 'lots' for movie 'Odd'"
        );
    }

    #[test]
    fn found_pair_renders_document() {
        let provider = FakeProvider::new()
            .with_movie("Heat", movie("Heat", "87%"))
            .with_movie("Ronin", movie("Ronin", "68%"));
        let fetcher = MovieFetcher::new(provider);
        let html = compare(&fetcher, "Heat", "Ronin").unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("width: 87%"));
        assert!(html.contains("width: 68%"));
    }
}
