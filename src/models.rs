use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// OMDb `Type` field. Unrecognized values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    #[default]
    Movie,
    Series,
    Episode,
    Other(String),
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Episode => "episode",
            MediaType::Other(s) => s,
        }
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "movie" => MediaType::Movie,
            "series" => MediaType::Series,
            "episode" => MediaType::Episode,
            _ => MediaType::Other(value),
        }
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default, deserialize_with = "na_as_none")]
    pub poster_url: Option<String>,
    #[serde(rename = "Type", default)]
    pub media_type: MediaType,
}

impl MovieSummary {
    pub fn year_number(&self) -> Option<i32> {
        parse_leading_int(&self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full record returned by an id lookup (`?i=...&plot=full`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(rename = "Plot", default, deserialize_with = "na_as_none")]
    pub plot: Option<String>,
    #[serde(rename = "Director", default, deserialize_with = "na_as_none")]
    pub director: Option<String>,
    #[serde(rename = "Writer", default, deserialize_with = "na_as_none")]
    pub writer: Option<String>,
    #[serde(rename = "Actors", default, deserialize_with = "na_as_none")]
    pub actors: Option<String>,
    #[serde(rename = "Genre", default, deserialize_with = "na_as_none")]
    pub genre: Option<String>,
    #[serde(rename = "Runtime", default, deserialize_with = "na_as_none")]
    pub runtime: Option<String>,
    #[serde(rename = "Rated", default, deserialize_with = "na_as_none")]
    pub rated: Option<String>,
    #[serde(rename = "Released", default, deserialize_with = "na_as_none")]
    pub released: Option<String>,
    #[serde(rename = "Country", default, deserialize_with = "na_as_none")]
    pub country: Option<String>,
    #[serde(rename = "Language", default, deserialize_with = "na_as_none")]
    pub language: Option<String>,
    #[serde(rename = "BoxOffice", default, deserialize_with = "na_as_none")]
    pub box_office: Option<String>,
    #[serde(rename = "Production", default, deserialize_with = "na_as_none")]
    pub production: Option<String>,
    #[serde(rename = "Awards", default, deserialize_with = "na_as_none")]
    pub awards: Option<String>,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<Rating>,
    #[serde(rename = "imdbRating", default, deserialize_with = "na_as_none")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes", default, deserialize_with = "na_as_none")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "Metascore", default, deserialize_with = "na_as_none")]
    pub metascore: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetascoreBand {
    Favorable,
    Mixed,
    Unfavorable,
}

impl MovieDetail {
    /// `"148 min"` -> `Some(148)`
    pub fn runtime_minutes(&self) -> Option<u32> {
        let minutes = parse_leading_int(self.runtime.as_deref()?)?;
        u32::try_from(minutes).ok()
    }

    pub fn genres(&self) -> Vec<String> {
        split_list(self.genre.as_deref())
    }

    pub fn actors_list(&self) -> Vec<String> {
        split_list(self.actors.as_deref())
    }

    pub fn rating_from(&self, source: &str) -> Option<&str> {
        self.ratings
            .iter()
            .find(|r| r.source.eq_ignore_ascii_case(source))
            .map(|r| r.value.as_str())
    }

    /// Rotten Tomatoes percentage and whether it counts as fresh (>= 60%).
    pub fn rotten_tomatoes(&self) -> Option<(i32, bool)> {
        let pct = parse_leading_int(self.rating_from("Rotten Tomatoes")?)?;
        Some((pct, pct >= 60))
    }

    pub fn metascore_band(&self) -> Option<MetascoreBand> {
        let score = parse_leading_int(self.metascore.as_deref()?)?;
        Some(if score >= 60 {
            MetascoreBand::Favorable
        } else if score >= 40 {
            MetascoreBand::Mixed
        } else {
            MetascoreBand::Unfavorable
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub movie: MovieSummary,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub added_at: DateTime<Utc>,
}

/// Integer prefix of `s`, after optional leading whitespace and sign.
/// `"2010–2012"` -> `Some(2010)`, `"N/A"` -> `None`.
pub fn parse_leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let n: i32 = rest[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn na_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != "N/A"
    }))
}
