//! Search input and its autocomplete suggestions.

use skycast_weather::CityDirectory;

#[derive(Debug, Clone, Default)]
pub struct SearchModel {
    query: String,
    suggestions: Vec<String>,
    selected: Option<usize>,
}

impl SearchModel {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn insert_char(&mut self, c: char, cities: &CityDirectory) {
        self.query.push(c);
        self.refresh(cities);
    }

    pub fn backspace(&mut self, cities: &CityDirectory) {
        self.query.pop();
        self.refresh(cities);
    }

    /// Recompute suggestions for the current query; clears the selection.
    pub fn refresh(&mut self, cities: &CityDirectory) {
        self.suggestions = cities.suggest(&self.query);
        self.selected = None;
    }

    pub fn select_next(&mut self) {
        if self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len() - 1;
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
    }

    pub fn select_previous(&mut self) {
        self.selected = match self.selected {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    /// City to search for, if any.
    ///
    /// A selected suggestion replaces the query and closes the list;
    /// otherwise the trimmed query is used as typed.
    pub fn submit(&mut self) -> Option<String> {
        if let Some(city) = self.selected.and_then(|i| self.suggestions.get(i)).cloned() {
            self.query = city.clone();
            self.suggestions.clear();
            self.selected = None;
            return Some(city);
        }

        let city = self.query.trim();
        (!city.is_empty()).then(|| city.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> CityDirectory {
        CityDirectory::from_names(["Paris", "Parma", "Patras", "Lyon"])
    }

    fn typed(text: &str, cities: &CityDirectory) -> SearchModel {
        let mut model = SearchModel::default();
        for c in text.chars() {
            model.insert_char(c, cities);
        }
        model
    }

    #[test]
    fn test_typing_refreshes_suggestions() {
        let cities = cities();
        let mut model = typed("pa", &cities);
        assert_eq!(model.suggestions(), ["Paris", "Parma", "Patras"]);

        model.insert_char('r', &cities);
        assert_eq!(model.suggestions(), ["Paris", "Parma"]);

        model.backspace(&cities);
        model.backspace(&cities);
        model.backspace(&cities);
        assert!(model.suggestions().is_empty());
        assert_eq!(model.query(), "");
    }

    #[test]
    fn test_selection_bounds() {
        let cities = cities();
        let mut model = typed("par", &cities);

        model.select_previous();
        assert_eq!(model.selected(), None);
        model.select_next();
        model.select_next();
        model.select_next();
        assert_eq!(model.selected(), Some(1));
        model.select_previous();
        model.select_previous();
        assert_eq!(model.selected(), None);
    }

    #[test]
    fn test_submit_selected_suggestion_fills_query() {
        let cities = cities();
        let mut model = typed("par", &cities);
        model.select_next();
        model.select_next();

        assert_eq!(model.submit().as_deref(), Some("Parma"));
        assert_eq!(model.query(), "Parma");
        assert!(model.suggestions().is_empty());
    }

    #[test]
    fn test_submit_typed_text() {
        let cities = cities();
        let mut model = typed("  new york ", &cities);
        assert_eq!(model.submit().as_deref(), Some("new york"));
    }

    #[test]
    fn test_submit_blank_query() {
        let cities = cities();
        let mut model = typed("   ", &cities);
        assert_eq!(model.submit(), None);
    }

    #[test]
    fn test_select_without_suggestions() {
        let mut model = typed("zz", &cities());
        model.select_next();
        assert_eq!(model.selected(), None);
    }
}
