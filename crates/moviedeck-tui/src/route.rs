//! Navigable routes: the catalog root and per-movie detail pages.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, bail};

/// A screen the browser can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Route {
    /// Movie listing (`/`).
    #[default]
    Catalog,
    /// Detail page for one movie (`/movie/{id}`).
    Movie(u64),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => f.write_str("/"),
            Self::Movie(id) => write!(f, "/movie/{id}"),
        }
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::Catalog);
        }
        let Some(id) = trimmed.strip_prefix("/movie/") else {
            bail!("unknown route: {s} (expected / or /movie/{{id}})");
        };
        let id = id
            .parse::<u64>()
            .with_context(|| format!("invalid movie id in route: {s}"))?;
        Ok(Self::Movie(id))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_routes() {
        // Arrange & Act & Assert
        assert_eq!("/".parse::<Route>().unwrap(), Route::Catalog);
        assert_eq!("".parse::<Route>().unwrap(), Route::Catalog);
        assert_eq!(
            "/movie/27205".parse::<Route>().unwrap(),
            Route::Movie(27_205)
        );
        assert_eq!(
            "/movie/27205/".parse::<Route>().unwrap(),
            Route::Movie(27_205)
        );
    }

    #[test]
    fn test_parse_invalid_routes() {
        // Arrange & Act
        let unknown = "/tv/1".parse::<Route>().unwrap_err();
        let bad_id = "/movie/abc".parse::<Route>().unwrap_err();

        // Assert
        assert!(unknown.to_string().contains("unknown route"));
        assert!(bad_id.to_string().contains("invalid movie id"));
    }

    #[test]
    fn test_display_matches_parse() {
        // Arrange
        let routes = [Route::Catalog, Route::Movie(155)];

        // Act & Assert
        for route in routes {
            assert_eq!(route.to_string().parse::<Route>().unwrap(), route);
        }
    }
}
