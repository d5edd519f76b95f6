//! Cursor pagination shared by the conversation listing and the message
//! ledger.
//!
//! Records are addressed by a monotonic `u64` position assigned at insertion.
//! A cursor names the last position a caller has seen, so pages that were
//! already delivered never shift when new records are appended.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction in which a page walks the underlying positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Oldest records first.
    Ascending,
    /// Newest records first.
    #[default]
    Descending,
}

/// Error returned when a cursor string cannot be decoded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid pagination cursor: {0}")]
pub struct InvalidCursorError(pub String);

/// Opaque continuation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageCursor(u64);

impl PageCursor {
    const ENCODED_LEN: usize = 16;

    pub(crate) const fn at(position: u64) -> Self {
        Self(position)
    }

    pub(crate) const fn position(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for PageCursor {
    type Err = InvalidCursorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.len() != Self::ENCODED_LEN {
            return Err(InvalidCursorError(value.to_owned()));
        }
        u64::from_str_radix(value, 16)
            .map(Self)
            .map_err(|_| InvalidCursorError(value.to_owned()))
    }
}

impl TryFrom<String> for PageCursor {
    type Error = InvalidCursorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageCursor> for String {
    fn from(cursor: PageCursor) -> Self {
        cursor.to_string()
    }
}

/// Parameters for fetching one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    cursor: Option<PageCursor>,
    limit: usize,
    order: SortOrder,
}

impl PageRequest {
    /// Largest page a caller may request.
    pub const MAX_LIMIT: usize = 100;

    /// Page size used when the caller does not specify one.
    pub const DEFAULT_LIMIT: usize = 20;

    /// Creates a newest-first request for the first page.
    ///
    /// The limit is clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn newest_first(limit: usize) -> Self {
        Self {
            cursor: None,
            limit: limit.clamp(1, Self::MAX_LIMIT),
            order: SortOrder::Descending,
        }
    }

    /// Creates an oldest-first request for the first page.
    #[must_use]
    pub fn oldest_first(limit: usize) -> Self {
        Self {
            order: SortOrder::Ascending,
            ..Self::newest_first(limit)
        }
    }

    /// Continues after the given cursor.
    #[must_use]
    pub const fn after(mut self, cursor: PageCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Continues after an encoded cursor, if one is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCursorError`] when the token is malformed.
    pub fn after_encoded(self, cursor: Option<&str>) -> Result<Self, InvalidCursorError> {
        match cursor {
            Some(token) => Ok(self.after(token.parse()?)),
            None => Ok(self),
        }
    }

    /// Returns the continuation cursor, if any.
    #[must_use]
    pub const fn cursor(&self) -> Option<PageCursor> {
        self.cursor
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the walk direction.
    #[must_use]
    pub const fn order(&self) -> SortOrder {
        self.order
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::newest_first(Self::DEFAULT_LIMIT)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page, in request order.
    pub items: Vec<T>,
    /// Cursor to pass back for the following page.
    pub next_cursor: Option<PageCursor>,
    /// Whether more records were available when the page was cut.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Creates an empty final page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }

    /// Replaces the items while keeping the continuation state.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }

    /// Transforms every item, keeping the continuation state.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

/// Cuts a page from a position-ordered index.
///
/// `resolve` maps an index entry to the record to return, or `None` to skip
/// it (filtered out). Skipped entries still advance the cursor.
pub(crate) fn paginate<K, T>(
    index: &BTreeMap<u64, K>,
    request: &PageRequest,
    mut resolve: impl FnMut(&K) -> Option<T>,
) -> Page<T> {
    let entries: Box<dyn Iterator<Item = (&u64, &K)> + '_> = match (request.order(), request.cursor())
    {
        (SortOrder::Ascending, None) => Box::new(index.iter()),
        (SortOrder::Ascending, Some(cursor)) => Box::new(
            index.range((Bound::Excluded(cursor.position()), Bound::Unbounded)),
        ),
        (SortOrder::Descending, None) => Box::new(index.iter().rev()),
        (SortOrder::Descending, Some(cursor)) => Box::new(index.range(..cursor.position()).rev()),
    };

    let mut items = Vec::with_capacity(request.limit());
    let mut last_seen = request.cursor();
    let mut has_more = false;
    for (position, entry) in entries {
        if let Some(item) = resolve(entry) {
            if items.len() == request.limit() {
                has_more = true;
                break;
            }
            items.push(item);
        }
        last_seen = Some(PageCursor::at(*position));
    }

    Page {
        items,
        next_cursor: last_seen,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageCursor, PageRequest, paginate};
    use rstest::{fixture, rstest};
    use std::collections::BTreeMap;

    #[fixture]
    fn index() -> BTreeMap<u64, u32> {
        (1..=5).map(|n| (u64::from(n), n)).collect()
    }

    fn page(index: &BTreeMap<u64, u32>, request: &PageRequest) -> Page<u32> {
        paginate(index, request, |value| Some(*value))
    }

    #[rstest]
    fn newest_first_walks_backwards(index: BTreeMap<u64, u32>) {
        let first = page(&index, &PageRequest::newest_first(2));
        assert_eq!(first.items, vec![5, 4]);
        assert!(first.has_more);

        let cursor = first.next_cursor.expect("cursor");
        let second = page(&index, &PageRequest::newest_first(2).after(cursor));
        assert_eq!(second.items, vec![3, 2]);

        let cursor = second.next_cursor.expect("cursor");
        let third = page(&index, &PageRequest::newest_first(2).after(cursor));
        assert_eq!(third.items, vec![1]);
        assert!(!third.has_more);
    }

    #[rstest]
    fn oldest_first_walks_forwards(index: BTreeMap<u64, u32>) {
        let first = page(&index, &PageRequest::oldest_first(3));
        assert_eq!(first.items, vec![1, 2, 3]);
        let cursor = first.next_cursor.expect("cursor");
        let second = page(&index, &PageRequest::oldest_first(3).after(cursor));
        assert_eq!(second.items, vec![4, 5]);
        assert!(!second.has_more);
    }

    #[rstest]
    fn continuation_page_is_unchanged_by_later_appends(mut index: BTreeMap<u64, u32>) {
        let first = page(&index, &PageRequest::newest_first(2));
        let cursor = first.next_cursor.expect("cursor");
        let before = page(&index, &PageRequest::newest_first(2).after(cursor));

        index.insert(6, 6);
        index.insert(7, 7);

        let after = page(&index, &PageRequest::newest_first(2).after(cursor));
        assert_eq!(before, after);
    }

    #[rstest]
    fn filtered_entries_do_not_count_towards_the_limit(index: BTreeMap<u64, u32>) {
        let odd = paginate(&index, &PageRequest::oldest_first(2), |value| {
            (value % 2 == 1).then_some(*value)
        });
        assert_eq!(odd.items, vec![1, 3]);
        assert!(odd.has_more);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(5, 5)]
    #[case(1000, PageRequest::MAX_LIMIT)]
    fn limit_is_clamped(#[case] requested: usize, #[case] expected: usize) {
        assert_eq!(PageRequest::newest_first(requested).limit(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("zz")]
    #[case("000000000000000g")]
    fn malformed_cursors_are_rejected(#[case] token: &str) {
        assert!(token.parse::<PageCursor>().is_err());
    }

    #[test]
    fn cursor_text_form_parses_back() {
        let cursor = PageCursor::at(42);
        let parsed: PageCursor = cursor.to_string().parse().expect("valid cursor");
        assert_eq!(parsed, cursor);
    }
}
