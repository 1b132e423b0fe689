//! Filter + multi-key sort over in-memory collections.
//!
//! A [`Record`] exposes its fields as [`FieldValue`]s; a [`Query`] combines a
//! free-text search, categorical filters and an ordered list of sort keys.
//! Filtering is conjunctive. Ordering is the record kind's pinned keys, then
//! the caller's keys, then the record kind's fallback keys; the sort is stable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;

labeled_enum! {
    pub enum SortDirection ("sort direction") {
        Asc => "asc" | "ascending",
        Desc => "desc" | "descending",
    }
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(i64),
    Date(NaiveDate),
    Bool(bool),
    /// Ordered by the rank, matched and searched by the label.
    Ranked(i64, &'a str),
}

impl FieldValue<'_> {
    /// String form used for equality filters and text search.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(*s),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
            FieldValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            FieldValue::Ranked(_, label) => Cow::Borrowed(*label),
        }
    }

    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => collate(a, b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Ranked(a, _), FieldValue::Ranked(b, _)) => a.cmp(b),
            // A field always yields one variant; mixed kinds only arise from
            // a broken Record impl, so fall back to the string form.
            (a, b) => collate(&a.as_key(), &b.as_key()),
        }
    }
}

/// Locale-style text ordering: case-insensitive first, then lowercase
/// before uppercase, then code point order.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    folded(a)
        .cmp(&folded(b))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// A sortable, filterable column of some record kind.
pub trait Field: Copy + Eq + 'static {
    /// Direction a field starts in when first selected.
    fn default_direction(self) -> SortDirection {
        SortDirection::Asc
    }
}

pub trait Record: Clone {
    type Field: Field;

    fn value(&self, field: Self::Field) -> FieldValue<'_>;

    /// Keys applied ahead of any caller-chosen key.
    fn pinned_keys() -> Vec<SortKey<Self::Field>> {
        Vec::new()
    }

    /// Keys applied after the caller's keys are exhausted.
    fn fallback_keys() -> Vec<SortKey<Self::Field>> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey<F> {
    pub sort_field: F,
    pub sort_direction: SortDirection,
}

impl<F: Field> SortKey<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self {
            sort_field: field,
            sort_direction: direction,
        }
    }

    pub fn asc(field: F) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: F) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Sentinel: the filter is skipped.
    All,
    Is(String),
}

impl FilterValue {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("all") {
            FilterValue::All
        } else {
            FilterValue::Is(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<F> {
    pub field: F,
    pub value: FilterValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search<F> {
    pub text: String,
    pub fields: Vec<F>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<F> {
    pub search: Option<Search<F>>,
    pub filters: Vec<Filter<F>>,
    pub sort: Vec<SortKey<F>>,
}

impl<F> Default for Query<F> {
    fn default() -> Self {
        Self {
            search: None,
            filters: Vec::new(),
            sort: Vec::new(),
        }
    }
}

impl<F: Field> Query<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty text is no search at all.
    pub fn search(mut self, text: &str, fields: &[F]) -> Self {
        self.search = if text.is_empty() {
            None
        } else {
            Some(Search {
                text: text.to_string(),
                fields: fields.to_vec(),
            })
        };
        self
    }

    pub fn filter(mut self, field: F, value: FilterValue) -> Self {
        self.filters.push(Filter { field, value });
        self
    }

    pub fn sort_by(mut self, keys: &[SortKey<F>]) -> Self {
        self.sort = keys.to_vec();
        self
    }
}

pub fn matches<R: Record>(record: &R, query: &Query<R::Field>) -> bool {
    let text_ok = query.search.as_ref().is_none_or(|search| {
        let needle = search.text.to_lowercase();
        search
            .fields
            .iter()
            .any(|&f| record.value(f).as_key().to_lowercase().contains(&needle))
    });
    text_ok
        && query.filters.iter().all(|filter| match &filter.value {
            FilterValue::All => true,
            FilterValue::Is(expected) => record.value(filter.field).as_key() == expected.as_str(),
        })
}

pub fn compare<R: Record>(a: &R, b: &R, keys: &[SortKey<R::Field>]) -> Ordering {
    keys.iter()
        .map(|key| {
            key.sort_direction
                .apply(a.value(key.sort_field).compare(&b.value(key.sort_field)))
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

pub fn query<R: Record>(records: &[R], query: &Query<R::Field>) -> Vec<R> {
    let keys: Vec<SortKey<R::Field>> = R::pinned_keys()
        .into_iter()
        .chain(query.sort.iter().copied())
        .chain(R::fallback_keys())
        .collect();
    let mut out: Vec<R> = records
        .iter()
        .filter(|r| matches(*r, query))
        .cloned()
        .collect();
    out.sort_by(|a, b| compare(a, b, &keys));
    out
}

/// One active sort key, as on most screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    pub key: SortKey<F>,
}

impl<F: Field> SortState<F> {
    pub fn new(key: SortKey<F>) -> Self {
        Self { key }
    }

    /// Re-selecting the active field flips it; a new field starts at its
    /// default direction.
    pub fn select(&mut self, field: F) {
        self.key = if self.key.sort_field == field {
            SortKey::new(field, self.key.sort_direction.toggled())
        } else {
            SortKey::new(field, field.default_direction())
        };
    }
}

/// Ordered tie-break keys, applied left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSort<F> {
    pub keys: Vec<SortKey<F>>,
}

impl<F> Default for MultiSort<F> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<F: Field> MultiSort<F> {
    pub fn new(keys: Vec<SortKey<F>>) -> Self {
        Self { keys }
    }

    /// A listed field flips in place; a new one is appended.
    pub fn select(&mut self, field: F) {
        match self.keys.iter_mut().find(|k| k.sort_field == field) {
            Some(key) => key.sort_direction = key.sort_direction.toggled(),
            None => self.keys.push(SortKey::new(field, field.default_direction())),
        }
    }
}
