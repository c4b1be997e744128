use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::core::config::ProjectConfig;
use crate::core::feed::fetcher::{fetch_feed, FetchError};
use crate::core::feed::parser::{parse_feed_bytes, FeedParseError};
use crate::core::feed::types::FeedEntry;
use crate::core::notify::{NotificationPayload, Notifier, NotifyError};
use crate::core::store::{SeenStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened for one project during a scan. Errors terminate only the
/// project they occurred in; the run loop logs and moves on.
#[derive(Debug)]
pub enum ProjectOutcome {
    /// Exactly one notification was delivered.
    Notified(NotificationPayload),
    /// The release was selected but delivery failed. Seen-marking stands,
    /// so the release is never retried.
    NotifyFailed {
        payload: NotificationPayload,
        error: NotifyError,
    },
    /// Every entry id was already in the seen-set.
    NoNewReleases,
    /// Unseen entries existed but none carried a parseable timestamp. Their
    /// ids were still marked seen.
    NoTimestampedReleases { new_count: usize },
    /// The parser flagged the document as malformed; nothing was marked
    /// seen for this project.
    SkippedMalformedFeed(FeedParseError),
    /// Fetch or store failure. Seen-marking up to the failure point stands.
    Failed(ScanError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub notified: usize,
    pub notify_failures: usize,
    pub quiet: usize,
    pub without_timestamps: usize,
    pub skipped_malformed: usize,
    pub failed: usize,
}

impl ScanSummary {
    fn record(&mut self, outcome: &ProjectOutcome) {
        match outcome {
            ProjectOutcome::Notified(_) => self.notified += 1,
            ProjectOutcome::NotifyFailed { .. } => self.notify_failures += 1,
            ProjectOutcome::NoNewReleases => self.quiet += 1,
            ProjectOutcome::NoTimestampedReleases { .. } => self.without_timestamps += 1,
            ProjectOutcome::SkippedMalformedFeed(_) => self.skipped_malformed += 1,
            ProjectOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Sequential scanner: one pass over the configured projects, at most one
/// notification per project.
pub struct ReleaseScanner<S, N> {
    client: reqwest::Client,
    store: S,
    notifier: N,
}

impl<S: SeenStore, N: Notifier> ReleaseScanner<S, N> {
    pub fn new(client: reqwest::Client, store: S, notifier: N) -> Self {
        Self {
            client,
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one full scan. A store load failure aborts the whole scan;
    /// everything after that is isolated per project.
    pub async fn run(&mut self, projects: &[ProjectConfig]) -> Result<ScanSummary, StoreError> {
        let mut seen = self.store.load()?;
        let mut summary = ScanSummary::default();

        for project in projects {
            let outcome = self.scan_project(project, &mut seen).await;
            log_outcome(project, &outcome);
            summary.record(&outcome);
        }

        Ok(summary)
    }

    async fn scan_project(
        &mut self,
        project: &ProjectConfig,
        seen: &mut HashSet<String>,
    ) -> ProjectOutcome {
        let body = match fetch_feed(&self.client, &project.feed_url).await {
            Ok(body) => body,
            Err(error) => return ProjectOutcome::Failed(error.into()),
        };
        let entries = match parse_feed_bytes(&body) {
            Ok(entries) => entries,
            Err(error) => return ProjectOutcome::SkippedMalformedFeed(error),
        };

        // Every unseen id is persisted immediately, whether or not it ends
        // up being the one notified. An unseen entry without a timestamp is
        // recorded here and never notified.
        let mut new_releases: Vec<FeedEntry> = Vec::new();
        for entry in entries {
            if seen.contains(&entry.id) {
                continue;
            }
            seen.insert(entry.id.clone());
            if let Err(error) = self.store.mark_seen(&entry.id) {
                return ProjectOutcome::Failed(error.into());
            }
            new_releases.push(entry);
        }

        if new_releases.is_empty() {
            return ProjectOutcome::NoNewReleases;
        }
        let Some((latest, updated)) = latest_release(&new_releases) else {
            return ProjectOutcome::NoTimestampedReleases {
                new_count: new_releases.len(),
            };
        };

        let payload = NotificationPayload {
            project_name: project.name.clone(),
            title: latest.title.clone(),
            link: latest.link.clone(),
            updated: updated.to_rfc3339(),
        };
        match self.notifier.notify(&payload).await {
            Ok(()) => ProjectOutcome::Notified(payload),
            Err(error) => ProjectOutcome::NotifyFailed { payload, error },
        }
    }
}

/// Stable max over the entries that carry a timestamp: a later entry must
/// be strictly newer to win, so feed order breaks ties. Returns the winner
/// together with its timestamp so the caller needs no fallback.
fn latest_release(entries: &[FeedEntry]) -> Option<(&FeedEntry, DateTime<Utc>)> {
    let mut best: Option<(&FeedEntry, DateTime<Utc>)> = None;
    for entry in entries {
        let Some(updated) = entry.updated else {
            continue;
        };
        match best {
            Some((_, best_updated)) if updated <= best_updated => {}
            _ => best = Some((entry, updated)),
        }
    }
    best
}

fn log_outcome(project: &ProjectConfig, outcome: &ProjectOutcome) {
    match outcome {
        ProjectOutcome::Notified(payload) => {
            info!(
                project = %project.name,
                title = %payload.title,
                "sent release notification"
            );
        }
        ProjectOutcome::NotifyFailed { payload, error } => {
            error!(
                project = %project.name,
                title = %payload.title,
                "failed to send notification: {error}"
            );
        }
        ProjectOutcome::NoNewReleases => {
            info!(project = %project.name, "no new releases");
        }
        ProjectOutcome::NoTimestampedReleases { new_count } => {
            warn!(
                project = %project.name,
                new_count,
                "new releases lack a parseable update timestamp"
            );
        }
        ProjectOutcome::SkippedMalformedFeed(error) => {
            error!(project = %project.name, "feed parsing failed: {error}");
        }
        ProjectOutcome::Failed(error) => {
            error!(project = %project.name, "error checking releases: {error}");
        }
    }
}
