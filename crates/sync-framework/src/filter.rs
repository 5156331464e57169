//! # Filter State
//!
//! What a list screen is currently asking for: a search term, the selected filter
//! values and the page. Changing the search term or any filter sends the page back
//! to 1; changing only the page leaves everything else alone.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A selected filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// The field must equal (or contain) at least one of these values.
    AnyOf(Vec<Value>),
    /// The field must equal this value (or, for array fields, contain it).
    Exact(Value),
}

impl FilterValue {
    pub fn exact(value: impl Into<Value>) -> Self {
        FilterValue::Exact(value.into())
    }

    pub fn any_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        FilterValue::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Whether a record field satisfies this filter. A missing field never does.
    pub fn matches(&self, field: Option<&Value>) -> bool {
        let Some(field) = field else {
            return false;
        };
        match self {
            FilterValue::Exact(expected) => value_matches(field, expected),
            FilterValue::AnyOf(options) => {
                options.iter().any(|option| value_matches(field, option))
            }
        }
    }

    fn to_query_value(&self) -> String {
        match self {
            FilterValue::Exact(value) => scalar_to_string(value),
            FilterValue::AnyOf(values) => values
                .iter()
                .map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

fn value_matches(field: &Value, expected: &Value) -> bool {
    match field {
        Value::Array(members) => members.iter().any(|member| loosely_equal(member, expected)),
        scalar => loosely_equal(scalar, expected),
    }
}

// Select boxes hand over strings; records often hold numbers or booleans.
fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(a), Value::String(b)) => a == b,
        (Value::String(_), _) | (_, Value::String(_)) => {
            scalar_to_string(left) == scalar_to_string(right)
        }
        _ => left == right,
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Search term, selected filters and current page of one list screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    search_term: String,
    selected_filters: BTreeMap<String, FilterValue>,
    page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_filters: BTreeMap::new(),
            page: 1,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_filters(&self) -> &BTreeMap<String, FilterValue> {
        &self.selected_filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns `true` if the term changed (and the page was reset).
    pub fn set_search_term(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search_term {
            return false;
        }
        self.search_term = term;
        self.page = 1;
        true
    }

    /// Selects a filter value. Returns `true` if the selection changed.
    pub fn set_filter(&mut self, key: impl Into<String>, value: FilterValue) -> bool {
        let key = key.into();
        if self.selected_filters.get(&key) == Some(&value) {
            return false;
        }
        self.selected_filters.insert(key, value);
        self.page = 1;
        true
    }

    /// Removes a filter. Returns `true` if one was active.
    pub fn clear_filter(&mut self, key: &str) -> bool {
        if self.selected_filters.remove(key).is_none() {
            return false;
        }
        self.page = 1;
        true
    }

    /// Moves to `page` (pages start at 1; 0 is treated as 1). Filters are kept.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.set_search_term(term);
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.set_filter(key, value);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.set_page(page);
        self
    }

    /// Query parameters for a list request: `page`, `searchTerm` and every filter.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("page".to_string(), self.page.to_string())];
        let term = self.search_term.trim();
        if !term.is_empty() {
            params.push(("searchTerm".to_string(), term.to_string()));
        }
        params.extend(
            self.selected_filters
                .iter()
                .map(|(key, value)| (key.clone(), value.to_query_value())),
        );
        params
    }
}
