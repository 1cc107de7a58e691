//! Forward-only cursor pagination over storage sequence ids.
//!
//! A cursor is `(last_id, page_size)`: return rows whose sequence id is
//! strictly greater than `last_id`, ascending by sequence id, at most
//! `page_size` of them. There is no offset, so rows inserted after a page was
//! read never shift later pages.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Pagination cursor. `None` at call sites means "return everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Last sequence id seen by the caller (exclusive lower bound).
    pub last_id: i64,
    /// Maximum number of rows in the page. Passed through literally; `0`
    /// yields an empty page.
    pub page_size: i64,
}

impl Cursor {
    pub const DEFAULT_LAST_ID: i64 = 0;
    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    pub fn new(last_id: i64, page_size: i64) -> Self {
        Self { last_id, page_size }
    }

    /// Build a cursor from the raw `last_id` / `page_size` query strings.
    ///
    /// Both absent (missing or empty) means no pagination. Otherwise each value
    /// is parsed independently as a non-negative integer and falls back to its
    /// default (`0` / `10`) when it does not parse.
    pub fn from_query(last_id: Option<&str>, page_size: Option<&str>) -> Option<Self> {
        let last_id = last_id.filter(|s| !s.is_empty());
        let page_size = page_size.filter(|s| !s.is_empty());
        if last_id.is_none() && page_size.is_none() {
            return None;
        }

        Some(Self {
            last_id: parse_non_negative(last_id).unwrap_or(Self::DEFAULT_LAST_ID),
            page_size: parse_non_negative(page_size).unwrap_or(Self::DEFAULT_PAGE_SIZE),
        })
    }

    /// Whether a row with sequence id `seq` lies after this cursor.
    pub fn admits(&self, seq: i64) -> bool {
        seq > self.last_id
    }

    /// Apply an optional cursor to an in-memory row set.
    ///
    /// Rows come back ordered by sequence id either way.
    pub fn select<T, I>(cursor: Option<Cursor>, rows: I) -> Vec<T>
    where
        T: Entity,
        I: IntoIterator<Item = T>,
    {
        let mut rows: Vec<T> = rows.into_iter().collect();
        rows.sort_by_key(|r| r.seq());
        match cursor {
            None => rows,
            Some(c) => rows
                .into_iter()
                .filter(|r| c.admits(r.seq()))
                .take(usize::try_from(c.page_size).unwrap_or(0))
                .collect(),
        }
    }
}

fn parse_non_negative(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v >= 0)
}
