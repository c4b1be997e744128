use chrono::{DateTime, Utc};

/// One item from a parsed feed. The id is the dedup key; `updated` is
/// absent when the document carries no parseable update or publish date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub link: String,
    pub updated: Option<DateTime<Utc>>,
}
