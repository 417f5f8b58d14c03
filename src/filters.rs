//! Filtering and sorting of search results. Everything here is pure.
use crate::models::MovieSummary;
use anyhow::anyhow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(anyhow!("sort order must be 'asc' or 'desc'")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListSortKey {
    #[default]
    Year,
    Title,
}

impl FromStr for ListSortKey {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "year" => Ok(ListSortKey::Year),
            "title" => Ok(ListSortKey::Title),
            _ => Err(anyhow!("sort key must be 'year' or 'title'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    fn matches(&self, movie: &MovieSummary) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => movie.media_type.as_str().eq_ignore_ascii_case(t),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            Ok(TypeFilter::Only(s.to_lowercase()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListFilter {
    pub media_type: TypeFilter,
    /// Inclusive lower bound on the release year.
    pub year_from: Option<i32>,
    /// Inclusive upper bound on the release year.
    pub year_to: Option<i32>,
    pub sort_by: ListSortKey,
    pub order: SortOrder,
}

impl ListFilter {
    fn year_in_range(&self, movie: &MovieSummary) -> bool {
        if self.year_from.is_none() && self.year_to.is_none() {
            return true;
        }
        let Some(year) = movie.year_number() else {
            return false;
        };
        self.year_from.map_or(true, |from| year >= from)
            && self.year_to.map_or(true, |to| year <= to)
    }

    fn compare(&self, a: &MovieSummary, b: &MovieSummary) -> Ordering {
        let ordering = match self.sort_by {
            ListSortKey::Year => a
                .year_number()
                .unwrap_or(0)
                .cmp(&b.year_number().unwrap_or(0)),
            ListSortKey::Title => compare_titles(&a.title, &b.title),
        };
        self.order.apply(ordering)
    }
}

/// Case-insensitive, with the raw bytes breaking ties so the order is total.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter then stable-sort a copy of `movies`.
pub fn apply(movies: &[MovieSummary], filter: &ListFilter) -> Vec<MovieSummary> {
    let mut result: Vec<MovieSummary> = movies
        .iter()
        .filter(|m| filter.media_type.matches(m) && filter.year_in_range(m))
        .cloned()
        .collect();
    result.sort_by(|a, b| filter.compare(a, b));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    fn movie(id: &str, title: &str, year: &str, media_type: MediaType) -> MovieSummary {
        MovieSummary {
            id: id.to_string(),
            title: title.to_string(),
            year: year.to_string(),
            poster_url: None,
            media_type,
        }
    }

    fn ids(list: &[MovieSummary]) -> Vec<&str> {
        list.iter().map(|m| m.id.as_str()).collect()
    }

    fn sample() -> Vec<MovieSummary> {
        vec![
            movie("a", "Batman", "1989", MediaType::Movie),
            movie("b", "Batman: The Animated Series", "1992–1995", MediaType::Series),
            movie("c", "Batman Begins", "2005", MediaType::Movie),
            movie("d", "Batman Forever", "1995", MediaType::Movie),
            movie("e", "Untitled Batman", "N/A", MediaType::Movie),
        ]
    }

    #[test]
    fn default_filter_sorts_by_year_descending() {
        let out = apply(&sample(), &ListFilter::default());
        assert_eq!(ids(&out), vec!["c", "d", "b", "a", "e"]);
    }

    #[test]
    fn type_filter_is_case_insensitive() {
        let filter = ListFilter {
            media_type: "SERIES".parse().unwrap(),
            ..ListFilter::default()
        };
        assert_eq!(ids(&apply(&sample(), &filter)), vec!["b"]);
    }

    #[test]
    fn year_bounds_are_inclusive_and_drop_unparsable_years() {
        let filter = ListFilter {
            year_from: Some(1989),
            year_to: Some(1995),
            order: SortOrder::Asc,
            ..ListFilter::default()
        };
        assert_eq!(ids(&apply(&sample(), &filter)), vec!["a", "b", "d"]);

        let only_from = ListFilter {
            year_from: Some(1900),
            ..ListFilter::default()
        };
        assert!(!ids(&apply(&sample(), &only_from)).contains(&"e"));
    }

    #[test]
    fn title_sort_both_directions() {
        let asc = ListFilter {
            sort_by: ListSortKey::Title,
            order: SortOrder::Asc,
            ..ListFilter::default()
        };
        assert_eq!(ids(&apply(&sample(), &asc)), vec!["a", "c", "d", "b", "e"]);
        let desc = ListFilter {
            order: SortOrder::Desc,
            ..asc.clone()
        };
        assert_eq!(ids(&apply(&sample(), &desc)), vec!["e", "b", "d", "c", "a"]);

        let mixed = vec![
            movie("z", "Zodiac", "2007", MediaType::Movie),
            movie("l", "alien", "1979", MediaType::Movie),
            movie("b", "Batman", "1989", MediaType::Movie),
        ];
        assert_eq!(ids(&apply(&mixed, &asc)), vec!["l", "b", "z"]);
        assert_eq!(ids(&apply(&mixed, &desc)), vec!["z", "b", "l"]);
    }

    #[test]
    fn title_compare_ignores_case_but_stays_total() {
        assert_eq!(compare_titles("alien", "Batman"), Ordering::Less);
        assert_eq!(compare_titles("Heat", "heat"), Ordering::Less);
        assert_eq!(compare_titles("heat", "heat"), Ordering::Equal);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let movies = vec![
            movie("x", "Same", "2000", MediaType::Movie),
            movie("y", "Same", "2000", MediaType::Movie),
            movie("z", "Same", "2000", MediaType::Movie),
        ];
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let filter = ListFilter {
                order,
                ..ListFilter::default()
            };
            assert_eq!(ids(&apply(&movies, &filter)), vec!["x", "y", "z"]);
        }
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(apply(&[], &ListFilter::default()).is_empty());
    }
}
