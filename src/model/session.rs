//! Session types: progress through a tour and the snapshots it leaves behind.
//!
//! Both [`TourSession`] and [`CompletedTour`] are stored in the same JSON shape:
//!
//! ```text
//! { "tourId", "startTime", "scannedPoints": [{ "pointId", "timestamp" }], "completed", "endTime"? }
//! ```
//!
//! Timestamps are epoch milliseconds. `endTime` is omitted until the tour is completed.

use serde::{Deserialize, Serialize};

use super::tour::Tour;

/// One recorded scan: which point, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub point_id: String,

    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// A tour in progress.
///
/// Fields are private: the session manager is the only writer, and every
/// value read back from storage goes through the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSession", into = "StoredSession")]
pub struct TourSession {
    tour_id: String,
    start_time: i64,
    scanned_points: Vec<ScanRecord>,
    completed: bool,
    end_time: Option<i64>,
}

impl TourSession {
    /// A fresh session: nothing scanned, not completed.
    pub(crate) fn start(tour_id: impl Into<String>, now: i64) -> Self {
        Self {
            tour_id: tour_id.into(),
            start_time: now,
            scanned_points: Vec::new(),
            completed: false,
            end_time: None,
        }
    }

    pub fn tour_id(&self) -> &str {
        &self.tour_id
    }

    /// Epoch milliseconds.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Scan records in scan order.
    pub fn scanned_points(&self) -> &[ScanRecord] {
        &self.scanned_points
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn end_time(&self) -> Option<i64> {
        self.end_time
    }

    pub fn has_scanned(&self, point_id: &str) -> bool {
        self.scanned_points.iter().any(|r| r.point_id == point_id)
    }

    /// Whether every point of `tour` has a scan record.
    pub fn covers(&self, tour: &Tour) -> bool {
        tour.point_ids().all(|id| self.has_scanned(id))
    }

    /// Progress summary against the session's tour.
    pub fn progress(&self, tour: &Tour) -> SessionProgress {
        let remaining: Vec<String> = tour
            .point_ids()
            .filter(|id| !self.has_scanned(id))
            .map(String::from)
            .collect();
        SessionProgress {
            total: tour.points.len(),
            scanned: self.scanned_points.len(),
            is_complete: remaining.is_empty(),
            remaining,
        }
    }

    /// Appends a scan record. The caller has already checked membership and duplicates.
    pub(crate) fn record_scan(&mut self, point_id: &str, now: i64) {
        debug_assert!(!self.has_scanned(point_id));
        self.scanned_points.push(ScanRecord {
            point_id: point_id.to_string(),
            timestamp: now,
        });
    }

    /// Seals the session into an immutable history entry.
    ///
    /// A clock that stepped backwards ends the tour at its start time.
    pub(crate) fn complete(self, now: i64) -> CompletedTour {
        CompletedTour {
            end_time: now.max(self.start_time),
            tour_id: self.tour_id,
            start_time: self.start_time,
            scanned_points: self.scanned_points,
        }
    }
}

/// A finished tour, as recorded in history.
///
/// Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSession", into = "StoredSession")]
pub struct CompletedTour {
    tour_id: String,
    start_time: i64,
    scanned_points: Vec<ScanRecord>,
    end_time: i64,
}

impl CompletedTour {
    pub fn tour_id(&self) -> &str {
        &self.tour_id
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn scanned_points(&self) -> &[ScanRecord] {
        &self.scanned_points
    }

    /// Always true; kept so history entries read like sessions.
    pub fn completed(&self) -> bool {
        true
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    /// Whole minutes between start and end, rounded down.
    pub fn duration_minutes(&self) -> i64 {
        self.end_time
            .saturating_sub(self.start_time)
            .div_euclid(60_000)
    }
}

/// Aggregated view of a session's progress, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub scanned: usize,

    /// Unscanned point ids in display order.
    pub remaining: Vec<String>,

    /// Every point has been scanned. The session still needs an explicit completion.
    pub is_complete: bool,
}

/// Why a stored session was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidSession {
    #[error("point {0} is scanned more than once")]
    DuplicateScan(String),

    #[error("completed flag and end time disagree")]
    CompletionMismatch,

    #[error("history entry is not completed")]
    NotCompleted,

    #[error("end time {end} is before start time {start}")]
    EndsBeforeStart { start: i64, end: i64 },
}

/// The on-disk shape shared by sessions and history entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    tour_id: String,
    start_time: i64,
    #[serde(default)]
    scanned_points: Vec<ScanRecord>,
    #[serde(default)]
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<i64>,
}

impl StoredSession {
    fn check_unique_scans(&self) -> Result<(), InvalidSession> {
        for (i, record) in self.scanned_points.iter().enumerate() {
            if self.scanned_points[..i]
                .iter()
                .any(|r| r.point_id == record.point_id)
            {
                return Err(InvalidSession::DuplicateScan(record.point_id.clone()));
            }
        }
        Ok(())
    }
}

impl TryFrom<StoredSession> for TourSession {
    type Error = InvalidSession;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        stored.check_unique_scans()?;
        if stored.completed != stored.end_time.is_some() {
            return Err(InvalidSession::CompletionMismatch);
        }
        Ok(Self {
            tour_id: stored.tour_id,
            start_time: stored.start_time,
            scanned_points: stored.scanned_points,
            completed: stored.completed,
            end_time: stored.end_time,
        })
    }
}

impl From<TourSession> for StoredSession {
    fn from(session: TourSession) -> Self {
        Self {
            tour_id: session.tour_id,
            start_time: session.start_time,
            scanned_points: session.scanned_points,
            completed: session.completed,
            end_time: session.end_time,
        }
    }
}

impl TryFrom<StoredSession> for CompletedTour {
    type Error = InvalidSession;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        stored.check_unique_scans()?;
        let (true, Some(end_time)) = (stored.completed, stored.end_time) else {
            return Err(InvalidSession::NotCompleted);
        };
        if end_time < stored.start_time {
            return Err(InvalidSession::EndsBeforeStart {
                start: stored.start_time,
                end: end_time,
            });
        }
        Ok(Self {
            tour_id: stored.tour_id,
            start_time: stored.start_time,
            scanned_points: stored.scanned_points,
            end_time,
        })
    }
}

impl From<CompletedTour> for StoredSession {
    fn from(tour: CompletedTour) -> Self {
        Self {
            tour_id: tour.tour_id,
            start_time: tour.start_time,
            scanned_points: tour.scanned_points,
            completed: true,
            end_time: Some(tour.end_time),
        }
    }
}
