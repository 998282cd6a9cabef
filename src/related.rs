//! Latest related-queries tables per keyword.
//!
//! These events are forwarded as-is for display; no analytics run on them.
//! Each new table replaces the previous one of the same kind.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;

use crate::event::{RelatedQuery, TrendEvent};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelatedList {
    pub fetched_at: Option<String>,
    pub queries: Vec<RelatedQuery>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelatedEntry {
    pub top: Option<RelatedList>,
    pub rising: Option<RelatedList>,
}

#[derive(Debug, Default)]
pub struct RelatedBoard {
    inner: RwLock<BTreeMap<String, RelatedEntry>>,
}

impl RelatedBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the table carried by a related-queries event.
    /// Returns `false` for any other event kind or an untracked keyword.
    pub fn record(&self, event: &TrendEvent, keywords: &[String]) -> bool {
        let (keyword, list, is_top) = match event {
            TrendEvent::RelatedQueriesTop {
                fetched_at,
                keyword,
                data,
            } => (keyword, mk_list(fetched_at, data), true),
            TrendEvent::RelatedQueriesRising {
                fetched_at,
                keyword,
                data,
            } => (keyword, mk_list(fetched_at, data), false),
            _ => return false,
        };
        if !keywords.iter().any(|k| k == keyword) {
            return false;
        }

        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let entry = map.entry(keyword.clone()).or_default();
        if is_top {
            entry.top = Some(list);
        } else {
            entry.rising = Some(list);
        }
        true
    }

    pub fn snapshot(&self) -> BTreeMap<String, RelatedEntry> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn mk_list(fetched_at: &Option<String>, data: &[RelatedQuery]) -> RelatedList {
    RelatedList {
        fetched_at: fetched_at.clone(),
        queries: data.to_vec(),
    }
}
