use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    api::{ApiError, DetoxApi},
    screen_time::{
        entities::{Dataset, DayRecord},
        entry_form::{EntryDraft, EntryError},
        limit::Limit,
        merge::{merge_by_date, MergeOutcome},
        range::{filter_date_range, DateRange},
        stats::{summarize, Summary},
    },
    utils::clock::Clock,
};

use super::snapshot::Snapshot;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] EntryError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Counts reported after a successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub days: usize,
    pub skipped_days: usize,
    pub skipped_entries: usize,
}

/// Owns the screen-time dataset and the limit. The dataset is rebuilt from scratch on every
/// refresh; a failed refresh leaves the previous one in place.
pub struct ScreenTimeTracker<A: DetoxApi> {
    api: A,
    clock: Box<dyn Clock>,
    dataset: Snapshot<Dataset>,
    limit: Limit,
}

impl<A: DetoxApi> ScreenTimeTracker<A> {
    pub fn new(api: A, clock: Box<dyn Clock>, limit: Limit) -> Self {
        Self {
            api,
            clock,
            dataset: Snapshot::default(),
            limit,
        }
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        self.dataset.current()
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn time(&self) -> NaiveDateTime {
        self.clock.time()
    }

    pub async fn refresh(&mut self) -> Result<RefreshReport, ApiError> {
        let ticket = self.dataset.begin();
        let raw = self
            .api
            .fetch_usage()
            .await
            .inspect_err(|e| error!("Failed to fetch usage, keeping previous data {e}"))?;

        let MergeOutcome {
            dataset,
            skipped_days,
            skipped_entries,
        } = merge_by_date(raw);
        let report = RefreshReport {
            days: dataset.len(),
            skipped_days,
            skipped_entries,
        };
        self.dataset.commit(ticket, dataset);
        info!("Refreshed usage {report:?}");
        Ok(report)
    }

    /// Loads the stored limit. When the server has none the current one is kept.
    pub async fn refresh_limit(&mut self) -> Result<Limit, ApiError> {
        match self.api.fetch_limit().await {
            Ok(Some(limit)) => self.limit = limit,
            Ok(None) => warn!("No limit stored, using {}", self.limit),
            Err(e) => {
                error!("Failed to fetch limit {e}");
                return Err(e);
            }
        }
        Ok(self.limit)
    }

    pub async fn update_limit(&mut self, limit: Limit) -> Result<(), ApiError> {
        self.api.update_limit(limit).await?;
        info!("Updated limit to {limit}");
        self.limit = limit;
        Ok(())
    }

    /// Validates and sends the draft for `date`, then refreshes the dataset. Nothing is sent if
    /// validation fails.
    pub async fn submit(&mut self, draft: &EntryDraft, date: NaiveDate) -> Result<(), SubmitError> {
        let submission = draft.submission(date, self.clock.today())?;
        self.api.submit_usage(&submission).await?;
        info!("Submitted {} entries for {date}", submission.entries.len());
        // the submission already landed, a failed refresh only means stale numbers
        if let Err(e) = self.refresh().await {
            warn!("Refresh after submitting failed {e}");
        }
        Ok(())
    }

    /// Records inside `range`, or all of them without one.
    pub fn records(&self, range: Option<DateRange>) -> Vec<DayRecord> {
        filter_date_range(&self.dataset.current(), range).to_vec()
    }

    /// Statistics over the whole dataset relative to today.
    pub fn summary(&self) -> Summary {
        summarize(&self.dataset.current(), self.limit, self.clock.today())
    }
}
