//! Pagination query type and the raw query-string builder.
//!
//! [`build_pagination_query`] turns an arbitrary key/value mapping (URL query
//! parameters) into a well-formed [`PaginationQuery`]. Recognized keys are
//! parsed; every other key is folded into `filters`, except values shorter
//! than [`MIN_FILTER_VALUE_LEN`] characters, which are dropped.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ViolationReason};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of rows per page. Larger requests are clamped.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Minimum length (in characters, after trimming) of a folded filter value.
pub const MIN_FILTER_VALUE_LEN: usize = 2;

pub const KEY_PAGE: &str = "page";
pub const KEY_PAGE_SIZE: &str = "pageSize";
pub const KEY_SEARCH: &str = "search";
pub const KEY_SORT_BY: &str = "sortBy";
pub const KEY_SORT_ORDER: &str = "sortOrder";
pub const KEY_INCLUDE_DELETED: &str = "includeDeleted";
pub const KEY_POPULATE_CHILDREN: &str = "populateChildren";

const RECOGNIZED_KEYS: &[&str] = &[
    KEY_PAGE,
    KEY_PAGE_SIZE,
    KEY_SEARCH,
    KEY_SORT_BY,
    KEY_SORT_ORDER,
    KEY_INCLUDE_DELETED,
    KEY_POPULATE_CHILDREN,
];

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Whether soft-deleted rows are visible to a single-record read.
///
/// Always passed explicitly so no read silently includes or omits trashed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Soft-deleted rows are hidden.
    Active,
    /// Soft-deleted rows are returned too.
    WithDeleted,
}

impl Visibility {
    pub fn from_include_deleted(include_deleted: bool) -> Self {
        if include_deleted {
            Visibility::WithDeleted
        } else {
            Visibility::Active
        }
    }
}

/// Normalized listing options.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationQuery {
    /// 1-based page index.
    pub page: i64,
    /// Rows per page, in `1..=MAX_PAGE_SIZE`.
    pub page_size: i64,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    /// `None` lets the schema pick the direction (see `EntitySchema::resolve_sort`).
    pub sort_order: Option<SortOrder>,
    pub include_deleted: bool,
    pub populate_children: bool,
    /// Column name -> equality/substring value, ANDed together.
    pub filters: BTreeMap<String, String>,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            sort_by: None,
            sort_order: None,
            include_deleted: false,
            populate_children: false,
            filters: BTreeMap::new(),
        }
    }
}

impl PaginationQuery {
    /// Row offset of the first row on the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Reject non-positive page indexes and page sizes.
    ///
    /// Queries built by [`build_pagination_query`] always pass; this guards
    /// queries constructed directly in code.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if self.page <= 0 {
            errors.push(KEY_PAGE, ViolationReason::BelowMin, "must be at least 1");
        }
        if self.page_size <= 0 {
            errors.push(KEY_PAGE_SIZE, ViolationReason::BelowMin, "must be at least 1");
        }
        errors.into_result(())
    }
}

/// Build a [`PaginationQuery`] from raw query-string parameters.
///
/// All malformed recognized values are reported together.
pub fn build_pagination_query(
    raw: &HashMap<String, String>,
) -> Result<PaginationQuery, ValidationError> {
    let mut query = PaginationQuery::default();
    let mut errors = ValidationError::default();

    if let Some(v) = raw.get(KEY_PAGE) {
        match parse_positive(v) {
            Some(page) => query.page = page,
            None => errors.push(KEY_PAGE, ViolationReason::InvalidValue, "must be a positive integer"),
        }
    }

    if let Some(v) = raw.get(KEY_PAGE_SIZE) {
        match parse_positive(v) {
            Some(size) => query.page_size = size.min(MAX_PAGE_SIZE),
            None => errors.push(
                KEY_PAGE_SIZE,
                ViolationReason::InvalidValue,
                "must be a positive integer",
            ),
        }
    }

    query.search = raw
        .get(KEY_SEARCH)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    query.sort_by = raw
        .get(KEY_SORT_BY)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    if let Some(v) = raw.get(KEY_SORT_ORDER) {
        match v.trim().to_ascii_lowercase().as_str() {
            "" => {}
            "asc" => query.sort_order = Some(SortOrder::Asc),
            "desc" => query.sort_order = Some(SortOrder::Desc),
            _ => errors.push(KEY_SORT_ORDER, ViolationReason::NotInEnum, "must be one of: asc, desc"),
        }
    }

    for (key, flag) in [
        (KEY_INCLUDE_DELETED, &mut query.include_deleted),
        (KEY_POPULATE_CHILDREN, &mut query.populate_children),
    ] {
        if let Some(v) = raw.get(key) {
            match parse_bool(v) {
                Some(b) => *flag = b,
                None => errors.push(key, ViolationReason::InvalidValue, "must be true or false"),
            }
        }
    }

    for (key, value) in raw {
        if RECOGNIZED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let value = value.trim();
        if value.chars().count() < MIN_FILTER_VALUE_LEN {
            continue;
        }
        query.filters.insert(key.clone(), value.to_string());
    }

    errors.into_result(query)
}

fn parse_positive(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|n| *n > 0)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" | "" => Some(false),
        _ => None,
    }
}
