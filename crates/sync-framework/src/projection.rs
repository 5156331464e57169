//! # View Projection
//!
//! Pure derivation of the visible page from a store's items and a [`FilterState`].
//! Every list screen renders through [`project`], so search, filtering and paging
//! behave identically across resources.
//!
//! When the store holds server pagination metadata the backend already did the
//! work: items pass through untouched and the page count comes from the metadata.
//! Otherwise the projection applies, in order, the search-term containment match,
//! every selected filter, and the page slice.
//!
//! The projection never clamps the page. A page past the end yields an empty slice
//! and it is up to the caller to move back to page 1.

use crate::filter::FilterState;
use crate::record::Record;
use crate::store::Pagination;
use serde::Serialize;
use serde_json::Value;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Static inputs of a projection besides the data and the filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions<'a> {
    /// Fields the search term is matched against.
    pub search_fields: &'a [&'a str],
    /// Records per page. Zero is treated as one.
    pub page_size: usize,
}

impl<'a> ProjectionOptions<'a> {
    pub fn new(search_fields: &'a [&'a str], page_size: usize) -> Self {
        Self {
            search_fields,
            page_size,
        }
    }
}

/// The visible slice of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub visible_items: Vec<Record>,
    pub total_pages: u64,
}

/// Derives the visible page. Deterministic and side-effect free.
pub fn project(
    items: &[Record],
    pagination: Option<&Pagination>,
    filters: &FilterState,
    options: ProjectionOptions<'_>,
) -> Projection {
    if let Some(pagination) = pagination {
        return Projection {
            visible_items: items.to_vec(),
            total_pages: pagination.total_pages,
        };
    }

    let needle = filters.search_term().trim().to_lowercase();
    let filtered: Vec<&Record> = items
        .iter()
        .filter(|record| {
            needle.is_empty() || matches_search(record, &needle, options.search_fields)
        })
        .filter(|record| {
            filters
                .selected_filters()
                .iter()
                .all(|(key, value)| value.matches(record.get(key)))
        })
        .collect();

    let page_size = options.page_size.max(1);
    let total_pages = filtered.len().div_ceil(page_size) as u64;
    let start = (filters.page().max(1) as usize - 1).saturating_mul(page_size);
    let visible_items = filtered
        .into_iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    Projection {
        visible_items,
        total_pages,
    }
}

fn matches_search(record: &Record, needle: &str, fields: &[&str]) -> bool {
    fields
        .iter()
        .filter_map(|field| record.get(field))
        .any(|value| contains_ignore_case(value, needle))
}

fn contains_ignore_case(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text.to_lowercase().contains(needle),
        Value::Number(number) => number.to_string().contains(needle),
        Value::Array(values) => values.iter().any(|v| contains_ignore_case(v, needle)),
        _ => false,
    }
}
