use crate::telemetry::SensorRecord;

pub const ALERTS_PER_PAGE: usize = 5;

/// Placeholder reason for an alert whose record carries none.
pub const NO_REASON: &str = "No reason provided";

/// Emergency records only, in batch order (newest first).
pub fn filter_alerts(batch: &[SensorRecord]) -> Vec<&SensorRecord> {
    batch.iter().filter(|r| r.emergency).collect()
}

/// One window of the alert feed.
///
/// `start..end` are the 0-based bounds of `items` within the full alert list,
/// for "Showing a–b of n" style footers.
#[derive(Debug)]
pub struct AlertPage<'a> {
    pub items: &'a [&'a SensorRecord],
    pub page: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

/// Owns the 1-indexed current page of the alert feed.
///
/// The page is only ever written here: by explicit navigation, or by the
/// reset in [`AlertPager::page_of`] when a refresh shrank the alert set
/// below the current page. The reset goes back to page 1 rather than
/// clamping to the new last page.
#[derive(Debug)]
pub struct AlertPager {
    page: usize,
}

impl AlertPager {
    pub fn new() -> Self {
        AlertPager { page: 1 }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Recompute the visible window for the current alert set. Called on
    /// every refresh, not just on navigation, so the reset-to-1 policy
    /// applies as soon as the feed shrinks.
    pub fn page_of<'a>(&mut self, alerts: &'a [&'a SensorRecord]) -> AlertPage<'a> {
        let total_pages = total_pages(alerts.len());
        if self.page > total_pages {
            self.page = 1;
        }

        let start = (self.page - 1) * ALERTS_PER_PAGE;
        let end = (start + ALERTS_PER_PAGE).min(alerts.len());

        AlertPage {
            items: &alerts[start..end],
            page: self.page,
            total_pages,
            start,
            end,
        }
    }

    /// No-op on the last page.
    pub fn next(&mut self, alert_count: usize) {
        if self.page < total_pages(alert_count) {
            self.page += 1;
        }
    }

    /// No-op on the first page.
    pub fn previous(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }
}

impl Default for AlertPager {
    fn default() -> Self {
        AlertPager::new()
    }
}

fn total_pages(alert_count: usize) -> usize {
    alert_count.div_ceil(ALERTS_PER_PAGE).max(1)
}

/// Summary of the most recent emergency, driving the "latest emergency"
/// insight line.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestAlert {
    pub timestamp: Option<String>,
    pub reason: String,
}

pub fn latest_alert(alerts: &[&SensorRecord]) -> Option<LatestAlert> {
    let first = alerts.first()?;
    let reason = match first.reason.as_deref() {
        Some(reason) if !reason.is_empty() => reason.to_string(),
        _ => NO_REASON.to_string(),
    };
    Some(LatestAlert {
        timestamp: first.timestamp.clone(),
        reason,
    })
}
