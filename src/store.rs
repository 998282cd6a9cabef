//! # History Store
//! In-memory, append-only history of interest scores per tracked keyword.
//!
//! Each keyword keeps `(timestamp, score)` pairs so its timestamps can never
//! drift from its scores when an event omits that keyword. The global event
//! timestamp list is kept alongside for the dashboard's shared x-axis.
//!
//! One mutex guards everything. It is held only to push or to clone; the
//! analytics run on the cloned [`HistorySnapshot`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One observation: integer interest score in `0..=100`.
pub type ScorePoint = u8;

/// Thread-safe history of interest scores.
#[derive(Debug)]
pub struct HistoryStore {
    keywords: Vec<String>,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Sample time of every accepted event, in arrival order.
    timestamps: Vec<String>,
    series: HashMap<String, Series>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Series {
    timestamps: Vec<String>,
    scores: Vec<ScorePoint>,
}

/// Point-in-time copy of one keyword's history.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeywordSeries {
    pub timestamps: Vec<String>,
    pub scores: Vec<ScorePoint>,
}

impl KeywordSeries {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn latest(&self) -> Option<ScorePoint> {
        self.scores.last().copied()
    }
}

/// Independent copy of the whole store. Safe to read without synchronization.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    /// Global event timestamps, one per accepted event.
    pub timestamps: Vec<String>,
    /// Every tracked keyword is present, possibly with an empty series.
    pub series: BTreeMap<String, KeywordSeries>,
}

impl HistorySnapshot {
    /// Scores of `keyword`, empty if untracked.
    pub fn scores(&self, keyword: &str) -> &[ScorePoint] {
        self.series
            .get(keyword)
            .map(|s| s.scores.as_slice())
            .unwrap_or(&[])
    }

    pub fn event_count(&self) -> usize {
        self.timestamps.len()
    }
}

impl HistoryStore {
    /// Create an empty store tracking exactly `keywords` (order kept, duplicates dropped).
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tracked: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.into();
            if !tracked.contains(&kw) {
                tracked.push(kw);
            }
        }

        let series = tracked
            .iter()
            .map(|kw| (kw.clone(), Series::default()))
            .collect();

        Self {
            keywords: tracked,
            inner: Mutex::new(Inner {
                timestamps: Vec::new(),
                series,
            }),
        }
    }

    /// Tracked keywords in configuration order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_tracked(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Record one event: its timestamp once, plus a score for every tracked
    /// keyword present in `scores`. Untracked keywords are ignored.
    ///
    /// The whole event becomes visible to [`snapshot`](Self::snapshot) at once.
    pub fn append<'a, I>(&self, timestamp: &str, scores: I)
    where
        I: IntoIterator<Item = (&'a str, ScorePoint)>,
    {
        let mut inner = self.lock();
        inner.timestamps.push(timestamp.to_string());
        for (kw, score) in scores {
            if let Some(series) = inner.series.get_mut(kw) {
                series.timestamps.push(timestamp.to_string());
                series.scores.push(score);
            }
        }
    }

    /// Copy the current state and release the lock.
    pub fn snapshot(&self) -> HistorySnapshot {
        let inner = self.lock();
        HistorySnapshot {
            timestamps: inner.timestamps.clone(),
            series: inner
                .series
                .iter()
                .map(|(kw, s)| {
                    (
                        kw.clone(),
                        KeywordSeries {
                            timestamps: s.timestamps.clone(),
                            scores: s.scores.clone(),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Number of accepted events so far.
    pub fn event_count(&self) -> usize {
        self.lock().timestamps.len()
    }

    // Appends never leave a half-written entry, so a poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
