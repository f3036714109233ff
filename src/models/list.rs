// tasktracker-service/src/models/list.rs
//
// Parsing of the `filter` / `sort` / `range` query values sent by list clients,
// and the in-store evaluation of those parameters.
use crate::models::ServiceError;
use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;

pub const DEFAULT_RANGE_START: usize = 0;
pub const DEFAULT_RANGE_END: usize = 24;

// Raw query string values, each JSON encoded
#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub range: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: "createdAt".to_string(),
            order: SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    pub start: usize,
    pub end: usize,
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self {
            start: DEFAULT_RANGE_START,
            end: DEFAULT_RANGE_END,
        }
    }
}

impl RangeSpec {
    // Number of rows an inclusive range asks for; `[0, u64::MAX]` saturates
    pub fn count(&self) -> usize {
        self.end.saturating_sub(self.start).saturating_add(1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub filter: Map<String, Value>,
    pub sort: SortSpec,
    pub range: RangeSpec,
}

impl ListParams {
    pub fn parse(query: &ListQuery) -> Result<Self, ServiceError> {
        let filter = match query.filter.as_deref() {
            Some(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => map,
                Ok(Value::Null) => Map::new(),
                _ => {
                    return Err(ServiceError::BadRequest(
                        "filter must be a JSON object".to_string(),
                    ))
                }
            },
            None => Map::new(),
        };

        let sort = query.sort.as_deref().map(parse_sort).unwrap_or_default();
        let range = match query.range.as_deref() {
            Some(raw) => parse_range(raw)?,
            None => RangeSpec::default(),
        };

        Ok(Self { filter, sort, range })
    }

    pub fn with_workspace(mut self, workspace_id: &str) -> Self {
        self.filter
            .insert("workspaceId".to_string(), Value::String(workspace_id.to_string()));
        self
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.filter
            .get("workspaceId")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
    }

    /// Lower-cased free-text search term from the `q` filter.
    pub fn search(&self) -> Option<String> {
        self.filter
            .get("q")
            .and_then(Value::as_str)
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty())
    }

    // Equality filters restricted to the fields a resource allows
    pub fn equality_filters(&self, allowed: &[&str]) -> Vec<(&str, &Value)> {
        self.filter
            .iter()
            .filter(|(key, _)| allowed.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value))
            .collect()
    }
}

// Accepts ["field","DESC"] as well as {"field":"...","order":"DESC"}
fn parse_sort(raw: &str) -> SortSpec {
    let (field, order) = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => (
            items.first().and_then(Value::as_str).map(str::to_string),
            items.get(1).and_then(Value::as_str).map(str::to_string),
        ),
        Ok(Value::Object(map)) => (
            map.get("field").and_then(Value::as_str).map(str::to_string),
            map.get("order").and_then(Value::as_str).map(str::to_string),
        ),
        _ => {
            warn!("Ignoring malformed sort parameter: {}", raw);
            return SortSpec::default();
        }
    };

    let default = SortSpec::default();
    SortSpec {
        field: field.filter(|f| !f.is_empty()).unwrap_or(default.field),
        order: match order.as_deref().map(str::to_uppercase).as_deref() {
            Some("ASC") => SortOrder::Asc,
            Some("DESC") => SortOrder::Desc,
            _ => default.order,
        },
    }
}

fn parse_range(raw: &str) -> Result<RangeSpec, ServiceError> {
    let bounds = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(items) if items.len() == 2 => (items[0].as_u64(), items[1].as_u64()),
        _ => {
            warn!("Ignoring malformed range parameter: {}", raw);
            return Ok(RangeSpec::default());
        }
    };

    match bounds {
        (Some(start), Some(end)) if end >= start => Ok(RangeSpec {
            start: start as usize,
            end: end as usize,
        }),
        (Some(start), Some(end)) => Err(ServiceError::BadRequest(format!(
            "Invalid range: end {} is before start {}",
            end, start
        ))),
        _ => Ok(RangeSpec::default()),
    }
}

/// Rows that can be filtered, searched and sorted by the list machinery.
pub trait ListRecord {
    fn matches_field(&self, field: &str, value: &Value) -> bool;
    fn matches_search(&self, needle: &str) -> bool;
    fn compare_by(&self, other: &Self, field: &str) -> Ordering;
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub start: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            start: self.start,
        }
    }

    /// `Content-Range` value: `<resource> <first>-<last>/<total>`.
    pub fn content_range(&self, resource: &str) -> String {
        if self.items.is_empty() {
            return format!("{} */{}", resource, self.total);
        }
        let end = self.start + self.items.len() - 1;
        format!("{} {}-{}/{}", resource, self.start, end, self.total)
    }
}

// Filter, search, sort and slice a set of rows
pub fn apply_list<T: ListRecord>(rows: Vec<T>, params: &ListParams, allowed_filters: &[&str]) -> Page<T> {
    let search = params.search();
    let filters = params.equality_filters(allowed_filters);

    let mut matching: Vec<T> = rows
        .into_iter()
        .filter(|row| filters.iter().all(|(field, value)| row.matches_field(field, value)))
        .filter(|row| search.as_deref().map_or(true, |needle| row.matches_search(needle)))
        .collect();

    matching.sort_by(|a, b| {
        let ordering = a.compare_by(b, &params.sort.field);
        match params.sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total = matching.len();
    let items = matching
        .into_iter()
        .skip(params.range.start)
        .take(params.range.count())
        .collect();

    Page {
        items,
        total,
        start: params.range.start,
    }
}

// Helpers shared by the ListRecord impls

pub fn value_matches_str(value: &Value, actual: Option<&str>) -> bool {
    match (value, actual) {
        (Value::Null, None) => true,
        (Value::String(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}

pub fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.map_or(false, |h| h.to_lowercase().contains(needle))
}
