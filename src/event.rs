//! # Event Filter
//! Typed inbound events and the filter that feeds the history store.
//!
//! Decoding is deliberately forgiving: anything that is not a well-formed
//! interest-over-time or related-queries record becomes [`TrendEvent::Unknown`]
//! and is dropped by the caller. It is never an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::ScorePoint;

pub const TYPE_INTEREST_OVER_TIME: &str = "interest_over_time";
pub const TYPE_RELATED_TOP: &str = "related_queries_top";
pub const TYPE_RELATED_RISING: &str = "related_queries_rising";

/// One row of a related-queries table as produced upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedQuery {
    pub query: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendEvent {
    InterestOverTime {
        fetched_at: Option<String>,
        timestamp: String,
        /// Raw keyword → score mapping, not yet validated against the score domain.
        data: BTreeMap<String, f64>,
    },
    RelatedQueriesTop {
        fetched_at: Option<String>,
        keyword: String,
        data: Vec<RelatedQuery>,
    },
    RelatedQueriesRising {
        fetched_at: Option<String>,
        keyword: String,
        data: Vec<RelatedQuery>,
    },
    Unknown,
}

// Wire shapes. Serde rejects missing fields for us; any rejection maps to `Unknown`.
#[derive(Deserialize)]
struct InterestWire {
    #[serde(default)]
    fetched_at: Option<String>,
    timestamp: String,
    data: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct RelatedWire {
    #[serde(default)]
    fetched_at: Option<String>,
    keyword: String,
    data: Vec<RelatedQuery>,
}

impl TrendEvent {
    /// Decode one transport message (a JSON object).
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => Self::from_value(v),
            Err(_) => TrendEvent::Unknown,
        }
    }

    /// Decode an already-parsed JSON value.
    pub fn from_value(v: Value) -> Self {
        let kind = match v.get("type").and_then(Value::as_str) {
            Some(k) => k.to_string(),
            None => return TrendEvent::Unknown,
        };

        match kind.as_str() {
            TYPE_INTEREST_OVER_TIME => match serde_json::from_value::<InterestWire>(v) {
                Ok(w) => TrendEvent::InterestOverTime {
                    fetched_at: w.fetched_at,
                    timestamp: w.timestamp,
                    // Non-numeric values are dropped here; range checks happen in the filter.
                    data: w
                        .data
                        .into_iter()
                        .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
                        .collect(),
                },
                Err(_) => TrendEvent::Unknown,
            },
            TYPE_RELATED_TOP | TYPE_RELATED_RISING => {
                match serde_json::from_value::<RelatedWire>(v) {
                    Ok(w) if kind == TYPE_RELATED_TOP => TrendEvent::RelatedQueriesTop {
                        fetched_at: w.fetched_at,
                        keyword: w.keyword,
                        data: w.data,
                    },
                    Ok(w) => TrendEvent::RelatedQueriesRising {
                        fetched_at: w.fetched_at,
                        keyword: w.keyword,
                        data: w.data,
                    },
                    Err(_) => TrendEvent::Unknown,
                }
            }
            _ => TrendEvent::Unknown,
        }
    }

    /// Wire name of the event type, for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            TrendEvent::InterestOverTime { .. } => TYPE_INTEREST_OVER_TIME,
            TrendEvent::RelatedQueriesTop { .. } => TYPE_RELATED_TOP,
            TrendEvent::RelatedQueriesRising { .. } => TYPE_RELATED_RISING,
            TrendEvent::Unknown => "unknown",
        }
    }
}

/// Interest sample accepted for the history store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestSample {
    pub timestamp: String,
    /// Tracked keywords only, in configuration order.
    pub scores: Vec<(String, ScorePoint)>,
}

impl InterestSample {
    /// Iterator shaped for [`HistoryStore::append`](crate::store::HistoryStore::append).
    pub fn score_pairs(&self) -> impl Iterator<Item = (&str, ScorePoint)> + '_ {
        self.scores.iter().map(|(k, s)| (k.as_str(), *s))
    }
}

/// Validate a raw score: finite, within `0..=100`, rounded to the nearest integer.
pub fn to_score_point(raw: f64) -> Option<ScorePoint> {
    if !raw.is_finite() {
        return None;
    }
    let rounded = raw.round();
    if (0.0..=100.0).contains(&rounded) {
        Some(rounded as ScorePoint)
    } else {
        None
    }
}

/// Keep only interest-over-time events; pick out the tracked keywords' scores.
///
/// The timestamp is kept even when no tracked keyword is present, so the event
/// still advances the global timestamp sequence.
pub fn filter_interest(event: &TrendEvent, keywords: &[String]) -> Option<InterestSample> {
    let TrendEvent::InterestOverTime {
        timestamp, data, ..
    } = event
    else {
        return None;
    };

    let scores = keywords
        .iter()
        .filter_map(|kw| {
            let raw = *data.get(kw)?;
            match to_score_point(raw) {
                Some(s) => Some((kw.clone(), s)),
                None => {
                    tracing::debug!(target: "ingest", keyword = %kw, raw, "score outside 0..=100 dropped");
                    None
                }
            }
        })
        .collect();

    Some(InterestSample {
        timestamp: timestamp.clone(),
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws() -> Vec<String> {
        vec!["AI".into(), "ChatGPT".into()]
    }

    #[test]
    fn decodes_interest_over_time() {
        let raw = r#"{"type":"interest_over_time","fetched_at":"2026-01-01T00:05:00",
                      "timestamp":"2026-01-01T00:00:00","data":{"AI":42,"ChatGPT":77}}"#;
        let ev = TrendEvent::decode(raw);
        assert_eq!(ev.kind(), TYPE_INTEREST_OVER_TIME);

        let s = filter_interest(&ev, &kws()).unwrap();
        assert_eq!(s.timestamp, "2026-01-01T00:00:00");
        assert_eq!(
            s.scores,
            vec![("AI".to_string(), 42), ("ChatGPT".to_string(), 77)]
        );
    }

    #[test]
    fn related_queries_are_not_interest() {
        let raw = r#"{"type":"related_queries_top","fetched_at":"x","keyword":"AI",
                      "data":[{"query":"ai art","value":100}]}"#;
        let ev = TrendEvent::decode(raw);
        match &ev {
            TrendEvent::RelatedQueriesTop { keyword, data, .. } => {
                assert_eq!(keyword, "AI");
                assert_eq!(data[0].query, "ai art");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(filter_interest(&ev, &kws()).is_none());

        let rising = TrendEvent::decode(
            r#"{"type":"related_queries_rising","keyword":"AI","data":[{"query":"q","value":"Breakout"}]}"#,
        );
        assert_eq!(rising.kind(), TYPE_RELATED_RISING);
    }

    #[test]
    fn malformed_records_are_unknown() {
        assert_eq!(TrendEvent::decode("not json"), TrendEvent::Unknown);
        assert_eq!(TrendEvent::decode(r#"{"data":{"AI":1}}"#), TrendEvent::Unknown);
        assert_eq!(
            TrendEvent::decode(r#"{"type":"interest_over_time","timestamp":"t"}"#),
            TrendEvent::Unknown
        );
        assert_eq!(
            TrendEvent::decode(r#"{"type":"something_else","data":{}}"#),
            TrendEvent::Unknown
        );
        assert_eq!(TrendEvent::decode("[1,2,3]"), TrendEvent::Unknown);
    }

    #[test]
    fn missing_keyword_still_yields_timestamp() {
        let ev = TrendEvent::decode(
            r#"{"type":"interest_over_time","timestamp":"t1","data":{"AI":5}}"#,
        );
        let s = filter_interest(&ev, &kws()).unwrap();
        assert_eq!(s.timestamp, "t1");
        assert_eq!(s.scores, vec![("AI".to_string(), 5)]);
    }

    #[test]
    fn out_of_domain_scores_are_dropped() {
        let ev = TrendEvent::decode(
            r#"{"type":"interest_over_time","timestamp":"t","data":{"AI":101,"ChatGPT":-3}}"#,
        );
        let s = filter_interest(&ev, &kws()).unwrap();
        assert!(s.scores.is_empty());
    }

    #[test]
    fn score_point_validation() {
        assert_eq!(to_score_point(0.0), Some(0));
        assert_eq!(to_score_point(100.0), Some(100));
        assert_eq!(to_score_point(49.6), Some(50));
        assert_eq!(to_score_point(100.4), Some(100));
        assert_eq!(to_score_point(100.6), None);
        assert_eq!(to_score_point(f64::NAN), None);
    }
}
