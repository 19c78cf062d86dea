//! Genre catalog offered by the submission form

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Selectable genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    Horror,
    Drama,
    Romance,
    SciFi,
    Fantasy,
}

impl Genre {
    /// Catalog in display order
    pub const ALL: [Genre; 5] = [
        Genre::Horror,
        Genre::Drama,
        Genre::Romance,
        Genre::SciFi,
        Genre::Fantasy,
    ];

    /// Stored tag value
    pub fn value(self) -> &'static str {
        match self {
            Genre::Horror => "horror",
            Genre::Drama => "drama",
            Genre::Romance => "romance",
            Genre::SciFi => "sci-fi",
            Genre::Fantasy => "fantasy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Genre::Horror => "Horror",
            Genre::Drama => "Drama",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Fantasy => "Fantasy",
        }
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.value() == s)
            .ok_or_else(|| format!("Unknown genre: {}", s))
    }
}
