use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

const DETAIL_LINK_BASE: &str = "https://sam.gov/opp";

/// One procurement notice as returned by the search API.
///
/// Only the fields the alert uses are decoded; everything else in the
/// record is ignored. `noticeId` is mandatory, a record without one is a
/// malformed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "noticeId")]
    pub notice_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(rename = "solicitationNumber", default, deserialize_with = "null_as_empty")]
    pub solicitation_number: String,
    #[serde(rename = "postedDate", default, deserialize_with = "null_as_empty")]
    pub posted_date: String,
    #[serde(rename = "responseDeadLine", default, deserialize_with = "null_as_empty")]
    pub response_deadline: String,
    #[serde(rename = "departmentName", default, deserialize_with = "null_as_empty")]
    pub agency: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Opportunity {
    pub fn detail_link(&self) -> String {
        format!("{}/{}/view", DETAIL_LINK_BASE, self.notice_id)
    }
}

/// Body of a search response. A response without `opportunitiesData`
/// carries no records.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "totalRecords", default)]
    pub total_records: Option<u64>,
    #[serde(rename = "opportunitiesData", default)]
    pub opportunities: Vec<Opportunity>,
}

/// Identifiers already delivered in earlier runs.
///
/// Insertion order is kept so the rewritten record lists old ids first,
/// followed by each run's additions. Inserting an id twice is a no-op.
/// Ids are compared and stored trimmed; blank ids are never recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    ids: Vec<String>,
    index: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let mut id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() || self.index.contains(trimmed) {
            return false;
        }
        if trimmed.len() != id.len() {
            id = trimmed.to_string();
        }
        self.index.insert(id.clone());
        self.ids.push(id);
        true
    }

    /// Union in every id of `items`, returning how many were new.
    pub fn extend_from<'a, I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        items.into_iter().filter(|id| self.insert(*id)).count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id.trim())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = SeenSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Posted-date range sent to the search API, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub posted_from: NaiveDate,
    pub posted_to: NaiveDate,
}

/// What the extract stage hands to transform.
#[derive(Debug, Clone)]
pub struct Extracted {
    pub window: SearchWindow,
    pub opportunities: Vec<Opportunity>,
    /// `None` when no usable seen record existed (first run).
    pub seen: Option<SeenSet>,
}

/// This run's unseen, classified-positive opportunities.
#[derive(Debug, Clone)]
pub struct MatchBatch {
    pub window: SearchWindow,
    pub fetched: usize,
    pub matches: Vec<Opportunity>,
    pub seen: SeenSet,
}

impl MatchBatch {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// Composed alert message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub window: SearchWindow,
    pub fetched: usize,
    pub matched: usize,
    pub export_path: PathBuf,
    pub recipient: String,
    pub seen_total: usize,
    /// The digest was printed, not emailed, and the seen record kept as is.
    pub dry_run: bool,
}

impl RunReport {
    pub fn summary(&self) -> String {
        if self.dry_run {
            format!(
                "🔍 Dry run: {} new results for {} (not emailed, seen record unchanged)",
                self.matched, self.recipient
            )
        } else {
            format!("✅ Sent {} new results to {}", self.matched, self.recipient)
        }
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    NoNewResults { fetched: usize },
    Delivered(RunReport),
}
