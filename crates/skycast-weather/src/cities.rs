//! City-name directory for search autocomplete.

use std::collections::HashSet;
use std::path::Path;

use crate::types::CityDataError;

/// Maximum number of suggestions returned by [`CityDirectory::suggest`]
pub const MAX_SUGGESTIONS: usize = 5;

/// Minimum normalized Levenshtein similarity for a fuzzy suggestion
pub const FUZZY_CUTOFF: f64 = 0.7;

const CITY_COLUMN: &str = "city";

/// Static list of city names, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct CityDirectory {
    names: Vec<String>,
}

impl CityDirectory {
    /// Build from names, dropping blanks and later duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.trim().is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();

        Self { names }
    }

    /// Load the `city` column of a CSV dataset (e.g. `worldcities.csv`).
    pub fn load(path: &Path) -> Result<Self, CityDataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let column = reader
            .headers()?
            .iter()
            .position(|h| h == CITY_COLUMN)
            .ok_or(CityDataError::MissingColumn(CITY_COLUMN))?;

        let mut names = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(name) = record.get(column) {
                names.push(name.to_string());
            }
        }

        let directory = Self::from_names(names);
        tracing::info!(
            "Loaded {} cities from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names starting with `prefix`, in dataset order, at most [`MAX_SUGGESTIONS`].
    pub fn prefix_matches(&self, prefix: &str) -> Vec<&str> {
        self.names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .take(MAX_SUGGESTIONS)
            .map(String::as_str)
            .collect()
    }

    /// Names whose similarity to `query` reaches [`FUZZY_CUTOFF`], best first.
    pub fn fuzzy_matches(&self, query: &str) -> Vec<&str> {
        let mut scored: Vec<(f64, &str)> = self
            .names
            .iter()
            .map(|name| (strsim::normalized_levenshtein(query, name), name.as_str()))
            .filter(|(score, _)| *score >= FUZZY_CUTOFF)
            .collect();

        // Stable sort: equal scores stay in dataset order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name)
            .collect()
    }

    /// Autocomplete suggestions for what the user typed.
    ///
    /// Prefix matches on the normalized query come first; fuzzy matching is
    /// only tried when no name starts with it.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        let query = normalize_query(query);
        if query.is_empty() || self.is_empty() {
            return Vec::new();
        }

        let mut matches = self.prefix_matches(&query);
        if matches.is_empty() {
            matches = self.fuzzy_matches(&query);
        }

        matches.into_iter().map(str::to_string).collect()
    }
}

/// Trim and capitalize: first character upper-case, the rest lower-case.
pub fn normalize_query(query: &str) -> String {
    let mut chars = query.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
