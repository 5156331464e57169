//! # Wire Decoding
//!
//! Turns gateway payloads into records. List endpoints answer either with a bare
//! array (client-paginated resources) or with an object holding the array plus
//! page metadata (server-paginated resources). Single-record endpoints may wrap
//! the record in a `data` envelope.

use crate::error::SyncError;
use crate::record::Record;
use crate::store::Pagination;
use serde_json::{Map, Value};

const LIST_KEYS: [&str; 3] = ["data", "items", "results"];

/// One decoded list response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchPage {
    pub records: Vec<Record>,
    pub pagination: Option<Pagination>,
}

impl FetchPage {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            pagination: None,
        }
    }

    pub fn paginated(records: Vec<Record>, pagination: Pagination) -> Self {
        Self {
            records,
            pagination: Some(pagination),
        }
    }
}

/// Decodes a list response.
pub fn decode_page(payload: Value) -> Result<FetchPage, SyncError> {
    match payload {
        Value::Array(items) => Ok(FetchPage::new(decode_records(items)?)),
        Value::Object(mut object) => {
            let items = LIST_KEYS
                .iter()
                .find_map(|key| match object.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| SyncError::Decode("list response holds no record array".into()))?;
            let records = decode_records(items)?;
            let pagination = decode_pagination(&object, records.len());
            Ok(FetchPage {
                records,
                pagination,
            })
        }
        other => Err(SyncError::Decode(format!(
            "expected a list response, got {}",
            kind(&other)
        ))),
    }
}

/// Decodes a single-record response, unwrapping a `data` envelope if present.
pub fn decode_record(payload: Value) -> Result<Record, SyncError> {
    let object = match payload {
        Value::Object(mut object) if !has_id(&object) => match object.remove("data") {
            Some(Value::Object(inner)) => inner,
            _ => object,
        },
        Value::Object(object) => object,
        other => {
            return Err(SyncError::Decode(format!(
                "expected a record, got {}",
                kind(&other)
            )))
        }
    };
    Record::from_object(object).ok_or_else(|| SyncError::Decode("record is missing an `id`".into()))
}

/// Like [`decode_record`], but an empty or id-less body yields `None`.
///
/// Delete and toggle endpoints often answer with a bare acknowledgement.
pub fn decode_optional_record(payload: Value) -> Option<Record> {
    match payload {
        Value::Null => None,
        other => decode_record(other).ok(),
    }
}

fn decode_records(items: Vec<Value>) -> Result<Vec<Record>, SyncError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(object) => Record::from_object(object)
                .ok_or_else(|| SyncError::Decode(format!("record #{index} is missing an `id`"))),
            other => Err(SyncError::Decode(format!(
                "record #{index} is {}, not an object",
                kind(&other)
            ))),
        })
        .collect()
}

fn decode_pagination(object: &Map<String, Value>, page_len: usize) -> Option<Pagination> {
    let number = |key: &str| object.get(key).and_then(Value::as_u64);
    let total_pages = number("totalPages")?;
    Some(Pagination {
        current_page: number("currentPage").unwrap_or(1),
        total_pages,
        total_items: number("totalItems").unwrap_or(page_len as u64),
    })
}

fn has_id(object: &Map<String, Value>) -> bool {
    object.contains_key("id") || object.contains_key("_id")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
