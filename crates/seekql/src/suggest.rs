//! Page-based value suggestions.
//!
//! Pages are 1-indexed and hold at most the field's page size. The value
//! source must yield values in ascending order; consecutive duplicates and
//! nulls are dropped, so a source that repeats values still pages cleanly.

use serde::Serialize;

use crate::schema::SchemaField;
use crate::value::Value;

/// One page of suggested values.
///
/// Serializes with the key names existing autocompletion clients expect:
/// `options`, `has_more_options`, `next_options_page_number`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionPage {
    pub options: Vec<Value>,
    #[serde(rename = "has_more_options")]
    pub has_more: bool,
    #[serde(rename = "next_options_page_number")]
    pub next_page: Option<usize>,
}

impl SuggestionPage {
    /// A page with no options and nothing after it.
    pub fn empty() -> Self {
        SuggestionPage {
            options: Vec::new(),
            has_more: false,
            next_page: None,
        }
    }
}

/// Slices page `requested_page` (default 1) out of `values`.
///
/// Only as many values as the page needs, plus one to detect a following
/// page, are pulled from the iterator. A page past the end is empty.
pub fn paginate<I>(field: &SchemaField, requested_page: Option<usize>, values: I) -> SuggestionPage
where
    I: IntoIterator<Item = Value>,
{
    let page = requested_page.unwrap_or(1).max(1);
    let size = field.page_size.max(1);
    let skip = (page - 1).saturating_mul(size);

    let mut previous: Option<Value> = None;
    let mut distinct = values.into_iter().filter(move |value| {
        if value.is_null() || previous.as_ref() == Some(value) {
            return false;
        }
        previous = Some(value.clone());
        true
    });

    let options: Vec<Value> = distinct.by_ref().skip(skip).take(size).collect();
    let has_more = options.len() == size && distinct.next().is_some();
    SuggestionPage {
        options,
        has_more,
        next_page: has_more.then_some(page + 1),
    }
}
