//! Tour session manager: the lifecycle of the current tour.
//!
//! ```text
//! NONE ──start──▶ ACTIVE ──scan──▶ ACTIVE
//!                   │ │
//!                   │ └──complete (all points scanned)──▶ NONE, entry appended to history
//!                   └──reset / start another──────────────▶ NONE / fresh ACTIVE, nothing archived
//! ```
//!
//! The manager owns the only copy of the current session and the history.
//! Callers read them through shared borrows and change them only through
//! the operations below. Every committed change is written through to the
//! store before the operation returns. A failed write is logged and kept
//! in [`SessionManager::last_persistence_error`]; it never undoes the
//! in-memory change.

use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock};
use crate::model::{CompletedTour, SessionProgress, Tour, TourSession};
use crate::persistence::{COMPLETED_TOURS_KEY, CURRENT_SESSION_KEY, Persistence, SaveError};
use crate::storage::KeyValueStore;

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown tour: {0}")]
    UnknownTour(String),
}

/// What happened to a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The scan was appended to the current session.
    Recorded,

    /// No tour is in progress.
    NoActiveSession,

    /// The point doesn't belong to the current tour.
    NotInTour,

    /// The point was already scanned in this session.
    AlreadyScanned,
}

impl ScanOutcome {
    pub fn is_recorded(self) -> bool {
        matches!(self, Self::Recorded)
    }
}

/// Owns the current tour session and the history of completed tours.
pub struct SessionManager<S, C = SystemClock> {
    catalog: Catalog,
    persistence: Persistence<S>,
    clock: C,
    current: Option<TourSession>,
    history: Vec<CompletedTour>,
    last_persistence_error: Option<String>,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Creates a manager using wall-clock time, loading saved state from `store`.
    pub fn new(catalog: Catalog, store: S) -> Self {
        Self::with_clock(catalog, store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> SessionManager<S, C> {
    /// Creates a manager, loading saved state from `store`.
    ///
    /// A saved session that no longer fits the catalog (unknown tour,
    /// foreign points, already marked completed) is discarded and the
    /// discard is written back.
    pub fn with_clock(catalog: Catalog, store: S, clock: C) -> Self {
        let persistence = Persistence::new(store);
        let history = persistence.load_history();
        let loaded = persistence.load_session();
        let had_saved = loaded.is_some();

        let current = loaded.filter(|session| match stale_reason(&catalog, session) {
            Some(reason) => {
                tracing::warn!(tour = session.tour_id(), "discarding saved session: {reason}");
                false
            }
            None => true,
        });
        let discarded = had_saved && current.is_none();

        tracing::debug!(
            active = current.is_some(),
            history = history.len(),
            "loaded saved state"
        );

        let mut manager = Self {
            catalog,
            persistence,
            clock,
            current,
            history,
            last_persistence_error: None,
        };
        if discarded {
            manager.persist_session();
        }
        manager
    }

    /// Starts `tour_id`, replacing any session in progress.
    ///
    /// The replaced session is dropped without a history entry.
    /// An unknown tour leaves the current session untouched.
    pub fn start_tour(&mut self, tour_id: &str) -> Result<(), SessionError> {
        let Some(tour) = self.catalog.find_tour(tour_id) else {
            tracing::debug!(tour = tour_id, "refusing to start unknown tour");
            return Err(SessionError::UnknownTour(tour_id.to_string()));
        };
        let tour_id = tour.id.clone();

        if let Some(previous) = &self.current {
            tracing::info!(
                tour = previous.tour_id(),
                scanned = previous.scanned_points().len(),
                "abandoning session in progress"
            );
        }

        tracing::info!(tour = %tour_id, "tour started");
        self.current = Some(TourSession::start(tour_id, self.clock.now_millis()));
        self.persist_session();
        Ok(())
    }

    /// Records a scan of `point_id`. Returns `true` only if it was recorded.
    ///
    /// Scanning never completes the tour; see [`Self::complete_tour`].
    pub fn scan_point(&mut self, point_id: &str) -> bool {
        self.try_scan_point(point_id).is_recorded()
    }

    /// Like [`Self::scan_point`], but says why a scan was rejected.
    pub fn try_scan_point(&mut self, point_id: &str) -> ScanOutcome {
        let Some(session) = self.current.as_mut() else {
            return ScanOutcome::NoActiveSession;
        };
        let in_tour = self
            .catalog
            .find_tour(session.tour_id())
            .is_some_and(|tour| tour.contains(point_id));
        if !in_tour {
            tracing::debug!(point = point_id, "scan rejected: not in tour");
            return ScanOutcome::NotInTour;
        }
        if session.has_scanned(point_id) {
            tracing::debug!(point = point_id, "scan rejected: already scanned");
            return ScanOutcome::AlreadyScanned;
        }

        session.record_scan(point_id, self.clock.now_millis());
        tracing::info!(
            point = point_id,
            scanned = session.scanned_points().len(),
            "point scanned"
        );
        self.persist_session();
        ScanOutcome::Recorded
    }

    /// Completes the current tour if every point has been scanned.
    ///
    /// Otherwise does nothing and returns `None`. On success the session is
    /// moved to history and the new history entry is returned.
    pub fn complete_tour(&mut self) -> Option<&CompletedTour> {
        let session = self.current.as_ref()?;
        let covered = self
            .catalog
            .find_tour(session.tour_id())
            .is_some_and(|tour| session.covers(tour));
        if !covered {
            tracing::debug!(tour = session.tour_id(), "tour not complete yet");
            return None;
        }

        let session = self.current.take()?;
        let completed = session.complete(self.clock.now_millis());
        tracing::info!(
            tour = completed.tour_id(),
            minutes = completed.duration_minutes(),
            "tour completed"
        );
        self.history.push(completed);

        self.persist_history();
        self.persist_session();
        self.history.last()
    }

    /// Records a scan, then completes the tour if that was its last point.
    ///
    /// This is what the scan screen does; [`Self::scan_point`] alone never
    /// completes.
    pub fn scan_and_complete(&mut self, point_id: &str) -> (ScanOutcome, Option<&CompletedTour>) {
        let outcome = self.try_scan_point(point_id);
        if !outcome.is_recorded() {
            return (outcome, None);
        }
        (outcome, self.complete_tour())
    }

    /// Drops the current session, whatever its state. Nothing is archived.
    pub fn reset_progress(&mut self) {
        if let Some(session) = self.current.take() {
            tracing::info!(
                tour = session.tour_id(),
                scanned = session.scanned_points().len(),
                "progress reset"
            );
        }
        self.persist_session();
    }

    /// Forgets the current session and all history, and wipes the store.
    pub fn clear_all_data(&mut self) {
        self.current = None;
        self.history.clear();
        if let Err(e) = self.persistence.clear() {
            self.record_failure("all data", &e);
        }
        tracing::info!("all data cleared");
    }

    pub fn current_session(&self) -> Option<&TourSession> {
        self.current.as_ref()
    }

    /// The tour of the current session.
    pub fn current_tour(&self) -> Option<&Tour> {
        self.catalog.find_tour(self.current.as_ref()?.tour_id())
    }

    /// Completed tours, oldest first.
    pub fn history(&self) -> &[CompletedTour] {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> Option<SessionProgress> {
        let session = self.current.as_ref()?;
        let tour = self.catalog.find_tour(session.tour_id())?;
        Some(session.progress(tour))
    }

    pub fn is_point_scanned(&self, point_id: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|s| s.has_scanned(point_id))
    }

    /// The most recent save failure, if any.
    pub fn last_persistence_error(&self) -> Option<&str> {
        self.last_persistence_error.as_deref()
    }

    /// Takes the recorded save failure, clearing it.
    pub fn take_persistence_error(&mut self) -> Option<String> {
        self.last_persistence_error.take()
    }

    fn persist_session(&mut self) {
        if let Err(e) = self.persistence.save_session(self.current.as_ref()) {
            self.record_failure(CURRENT_SESSION_KEY, &e);
        }
    }

    fn persist_history(&mut self) {
        if let Err(e) = self.persistence.save_history(&self.history) {
            self.record_failure(COMPLETED_TOURS_KEY, &e);
        }
    }

    fn record_failure(&mut self, what: &str, error: &SaveError) {
        tracing::warn!("failed to save {what}: {error}");
        self.last_persistence_error = Some(format!("failed to save {what}: {error}"));
    }
}

/// Why a saved session can't be resumed against `catalog`, if it can't.
fn stale_reason(catalog: &Catalog, session: &TourSession) -> Option<String> {
    let Some(tour) = catalog.find_tour(session.tour_id()) else {
        return Some(format!("tour {} is not in the catalog", session.tour_id()));
    };
    if session.completed() {
        return Some("session is already completed".to_string());
    }
    session
        .scanned_points()
        .iter()
        .find(|r| !tour.contains(&r.point_id))
        .map(|r| format!("point {} is not part of tour {}", r.point_id, tour.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;

    use crate::clock::ManualClock;
    use crate::storage::{MemoryStore, SqliteStore, StoreError};

    fn manager(store: &MemoryStore) -> SessionManager<&MemoryStore, ManualClock> {
        SessionManager::with_clock(Catalog::seeded(), store, ManualClock::new(1_000, 1_000))
    }

    fn scan_all(manager: &mut SessionManager<impl KeyValueStore, impl Clock>) {
        for id in ["point1", "point2", "point3", "point4"] {
            assert!(manager.scan_point(id), "scan {id}");
        }
    }

    /// Accepts reads, fails every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> crate::storage::Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> crate::storage::Result<()> {
            Err(StoreError::Io(io::Error::other("disk full")))
        }

        fn remove(&self, _key: &str) -> crate::storage::Result<()> {
            Err(StoreError::Io(io::Error::other("disk full")))
        }

        fn clear(&self) -> crate::storage::Result<()> {
            Err(StoreError::Io(io::Error::other("disk full")))
        }
    }

    #[test]
    fn campus_tour_walkthrough() {
        let store = MemoryStore::new();
        let mut m = manager(&store);

        m.start_tour("tour1").unwrap();
        let session = m.current_session().unwrap();
        assert!(!session.completed());
        assert!(session.scanned_points().is_empty());

        assert!(m.scan_point("point1"));
        assert_eq!(m.current_session().unwrap().scanned_points().len(), 1);

        assert!(!m.scan_point("point1"));
        assert_eq!(m.current_session().unwrap().scanned_points().len(), 1);

        for id in ["point2", "point3", "point4"] {
            assert!(m.scan_point(id));
        }
        assert_eq!(m.current_session().unwrap().scanned_points().len(), 4);

        let before = m.history().len();
        assert!(m.complete_tour().is_some());
        assert_eq!(m.history().len(), before + 1);
        assert!(m.current_session().is_none());
    }

    #[test]
    fn unknown_tour_leaves_session_unchanged() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();
        m.scan_point("point2");
        let before = m.current_session().cloned();

        let err = m.start_tour("unknown-tour").unwrap_err();

        assert_eq!(err, SessionError::UnknownTour("unknown-tour".into()));
        assert_eq!(m.current_session().cloned(), before);
    }

    #[test]
    fn unknown_tour_without_session_stays_empty() {
        let store = MemoryStore::new();
        let mut m = manager(&store);

        assert!(m.start_tour("unknown-tour").is_err());
        assert!(m.current_session().is_none());
        assert!(store.get(CURRENT_SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn scan_without_session_is_rejected() {
        let store = MemoryStore::new();
        let mut m = manager(&store);

        assert_eq!(m.try_scan_point("point1"), ScanOutcome::NoActiveSession);
        assert!(!m.scan_point("point1"));
    }

    #[test]
    fn scan_of_foreign_point_is_rejected() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();
        m.scan_point("point1");

        assert_eq!(m.try_scan_point("point9"), ScanOutcome::NotInTour);
        let ids: Vec<&str> = m
            .current_session()
            .unwrap()
            .scanned_points()
            .iter()
            .map(|r| r.point_id.as_str())
            .collect();
        assert_eq!(ids, ["point1"]);
    }

    #[test]
    fn point_of_another_tour_is_rejected() {
        let point = |id: &str| crate::model::Point {
            id: id.into(),
            name: id.to_uppercase(),
            description: String::new(),
            location: None,
            image_url: None,
        };
        let tour = |id: &str, points: &[&str]| Tour {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            points: points.iter().map(|p| point(p)).collect(),
        };
        let catalog = Catalog::new(vec![tour("tour1", &["a", "b"]), tour("tour2", &["x", "y"])])
            .unwrap();
        let store = MemoryStore::new();
        let mut m = SessionManager::with_clock(catalog, &store, ManualClock::new(0, 1));
        m.start_tour("tour1").unwrap();
        assert!(m.scan_point("a"));

        assert_eq!(m.try_scan_point("x"), ScanOutcome::NotInTour);
        let ids: Vec<&str> = m
            .current_session()
            .unwrap()
            .scanned_points()
            .iter()
            .map(|r| r.point_id.as_str())
            .collect();
        assert_eq!(ids, ["a"]);
    }

    #[test]
    fn scan_and_complete_finishes_on_last_point() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();

        for id in ["point1", "point2", "point3"] {
            let (outcome, completed) = m.scan_and_complete(id);
            assert_eq!(outcome, ScanOutcome::Recorded);
            assert!(completed.is_none());
        }
        assert!(m.history().is_empty());

        let (outcome, completed) = m.scan_and_complete("point4");
        assert_eq!(outcome, ScanOutcome::Recorded);
        assert_eq!(completed.map(CompletedTour::tour_id), Some("tour1"));
        assert_eq!(m.history().len(), 1);
        assert!(m.current_session().is_none());
        assert!(store.get(CURRENT_SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn scan_and_complete_passes_rejections_through() {
        let store = MemoryStore::new();
        let mut m = manager(&store);

        let (outcome, completed) = m.scan_and_complete("point1");
        assert_eq!(outcome, ScanOutcome::NoActiveSession);
        assert!(completed.is_none());

        m.start_tour("tour1").unwrap();
        scan_all(&mut m);
        let (outcome, completed) = m.scan_and_complete("point4");
        assert_eq!(outcome, ScanOutcome::AlreadyScanned);
        assert!(completed.is_none());
        assert!(m.history().is_empty());
        assert!(m.current_session().is_some());
    }

    #[test]
    fn duplicate_scan_reports_already_scanned() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();

        assert_eq!(m.try_scan_point("point3"), ScanOutcome::Recorded);
        assert_eq!(m.try_scan_point("point3"), ScanOutcome::AlreadyScanned);
        assert!(m.is_point_scanned("point3"));
        assert!(!m.is_point_scanned("point4"));
    }

    #[test]
    fn scans_may_arrive_in_any_order() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();

        for id in ["point4", "point2", "point1", "point3"] {
            assert!(m.scan_point(id));
        }
        let ids: Vec<&str> = m
            .current_session()
            .unwrap()
            .scanned_points()
            .iter()
            .map(|r| r.point_id.as_str())
            .collect();
        assert_eq!(ids, ["point4", "point2", "point1", "point3"]);
        assert!(m.complete_tour().is_some());
    }

    #[test]
    fn scanning_everything_does_not_complete() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();
        scan_all(&mut m);

        let session = m.current_session().unwrap();
        assert!(!session.completed());
        assert!(m.history().is_empty());
        assert!(m.progress().unwrap().is_complete);
    }

    #[test]
    fn complete_before_all_scanned_is_a_no_op() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();
        m.scan_point("point1");
        m.scan_point("point2");
        let before = m.current_session().cloned();

        assert!(m.complete_tour().is_none());

        assert_eq!(m.current_session().cloned(), before);
        assert!(m.history().is_empty());
    }

    #[test]
    fn complete_without_session_is_a_no_op() {
        let store = MemoryStore::new();
        let mut m = manager(&store);

        assert!(m.complete_tour().is_none());
        assert!(m.history().is_empty());
    }

    #[test]
    fn completion_snapshot_carries_timestamps() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(0, 0);
        let mut m = SessionManager::with_clock(Catalog::seeded(), &store, &clock);

        m.start_tour("tour1").unwrap();
        clock.advance(30_000);
        scan_all(&mut m);
        clock.advance(5 * 60_000);

        let completed = m.complete_tour().unwrap().clone();
        assert!(completed.completed());
        assert_eq!(completed.start_time(), 0);
        assert_eq!(completed.end_time(), 330_000);
        assert_eq!(completed.duration_minutes(), 5);
        assert_eq!(completed.scanned_points().len(), 4);
        assert!(
            completed
                .scanned_points()
                .iter()
                .all(|r| r.timestamp == 30_000)
        );
    }

    #[test]
    fn history_keeps_completion_order() {
        let store = MemoryStore::new();
        let mut m = manager(&store);

        for _ in 0..3 {
            m.start_tour("tour1").unwrap();
            scan_all(&mut m);
            m.complete_tour().unwrap();
        }

        let starts: Vec<i64> = m.history().iter().map(CompletedTour::start_time).collect();
        assert_eq!(starts.len(), 3);
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn earlier_history_is_untouched_by_later_tours() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();
        scan_all(&mut m);
        let first = m.complete_tour().unwrap().clone();

        m.start_tour("tour1").unwrap();
        m.scan_point("point1");
        m.reset_progress();

        assert_eq!(m.history(), [first]);
    }

    #[test]
    fn reset_discards_without_archiving() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();
        scan_all(&mut m);

        m.reset_progress();

        assert!(m.current_session().is_none());
        assert!(m.history().is_empty());
        assert!(store.get(CURRENT_SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn reset_without_session_is_harmless() {
        let store = MemoryStore::new();
        let mut m = manager(&store);

        m.reset_progress();

        assert!(m.current_session().is_none());
        assert!(m.last_persistence_error().is_none());
    }

    #[test]
    fn starting_again_abandons_progress() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();
        m.scan_point("point1");
        m.scan_point("point2");

        m.start_tour("tour1").unwrap();

        assert!(m.current_session().unwrap().scanned_points().is_empty());
        assert!(m.history().is_empty());
    }

    #[test]
    fn state_survives_restart() {
        let store = MemoryStore::new();
        {
            let mut m = manager(&store);
            m.start_tour("tour1").unwrap();
            scan_all(&mut m);
            m.complete_tour().unwrap();
            m.start_tour("tour1").unwrap();
            m.scan_point("point2");
        }

        let before_session;
        let before_history;
        {
            let m = manager(&store);
            before_session = m.current_session().cloned().unwrap();
            before_history = m.history().to_vec();
            assert_eq!(before_history.len(), 1);
            assert_eq!(before_session.scanned_points().len(), 1);
            assert_eq!(before_session.scanned_points()[0].point_id, "point2");
        }

        let m = manager(&store);
        assert_eq!(m.current_session(), Some(&before_session));
        assert_eq!(m.history(), before_history.as_slice());
    }

    #[test]
    fn fresh_session_survives_restart() {
        let store = MemoryStore::new();
        let started = {
            let mut m = manager(&store);
            m.start_tour("tour1").unwrap();
            m.current_session().cloned().unwrap()
        };

        let m = manager(&store);
        let loaded = m.current_session().unwrap();
        assert_eq!(loaded, &started);
        assert!(loaded.scanned_points().is_empty());
        assert!(!loaded.completed());
        assert!(loaded.end_time().is_none());
    }

    #[test]
    fn restart_with_sqlite_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("waypoint.sqlite");
        {
            let store = SqliteStore::open(&path).unwrap();
            let mut m = SessionManager::new(Catalog::seeded(), store);
            m.start_tour("tour1").unwrap();
            m.scan_point("point4");
        }

        let m = SessionManager::new(Catalog::seeded(), SqliteStore::open(&path).unwrap());
        assert_eq!(m.current_session().unwrap().scanned_points().len(), 1);
        assert_eq!(m.current_tour().unwrap().name, "Campus Tour");
    }

    #[test]
    fn saved_session_for_missing_tour_is_discarded() {
        let store = MemoryStore::new();
        store
            .set(
                CURRENT_SESSION_KEY,
                r#"{"tourId":"retired","startTime":0,"scannedPoints":[],"completed":false}"#,
            )
            .unwrap();

        let m = manager(&store);

        assert!(m.current_session().is_none());
        assert!(store.get(CURRENT_SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn saved_session_with_foreign_point_is_discarded() {
        let store = MemoryStore::new();
        store
            .set(
                CURRENT_SESSION_KEY,
                r#"{"tourId":"tour1","startTime":0,"completed":false,
                   "scannedPoints":[{"pointId":"elsewhere","timestamp":1}]}"#,
            )
            .unwrap();

        assert!(manager(&store).current_session().is_none());
    }

    #[test]
    fn saved_completed_session_is_discarded() {
        let store = MemoryStore::new();
        store
            .set(
                CURRENT_SESSION_KEY,
                r#"{"tourId":"tour1","startTime":0,"scannedPoints":[],"completed":true,"endTime":9}"#,
            )
            .unwrap();

        assert!(manager(&store).current_session().is_none());
    }

    #[test]
    fn corrupt_store_starts_empty() {
        let store = MemoryStore::new();
        store.set(CURRENT_SESSION_KEY, "garbage").unwrap();
        store.set(COMPLETED_TOURS_KEY, "[1, 2").unwrap();

        let m = manager(&store);

        assert!(m.current_session().is_none());
        assert!(m.history().is_empty());
    }

    #[test]
    fn history_for_unknown_tour_is_kept() {
        let store = MemoryStore::new();
        store
            .set(
                COMPLETED_TOURS_KEY,
                r#"[{"tourId":"retired","startTime":0,"scannedPoints":[],"completed":true,"endTime":60000}]"#,
            )
            .unwrap();

        let m = manager(&store);

        assert_eq!(m.history().len(), 1);
        assert_eq!(m.catalog().tour_name(m.history()[0].tour_id()), "Unknown Tour");
    }

    #[test]
    fn save_failure_keeps_in_memory_state() {
        let mut m = SessionManager::with_clock(Catalog::seeded(), ReadOnlyStore, ManualClock::new(0, 1));

        m.start_tour("tour1").unwrap();
        assert!(m.scan_point("point1"));

        assert_eq!(m.current_session().unwrap().scanned_points().len(), 1);
        let error = m.take_persistence_error().unwrap();
        assert!(error.contains(CURRENT_SESSION_KEY));
        assert!(error.contains("disk full"));
        assert!(m.last_persistence_error().is_none());
    }

    #[test]
    fn completion_survives_failed_history_save() {
        let mut m = SessionManager::with_clock(Catalog::seeded(), ReadOnlyStore, ManualClock::new(0, 1));
        m.start_tour("tour1").unwrap();
        scan_all(&mut m);

        assert!(m.complete_tour().is_some());
        assert_eq!(m.history().len(), 1);
        assert!(m.current_session().is_none());
        assert!(m.last_persistence_error().is_some());
    }

    #[test]
    fn clear_all_data_wipes_everything() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        m.start_tour("tour1").unwrap();
        scan_all(&mut m);
        m.complete_tour().unwrap();
        m.start_tour("tour1").unwrap();

        m.clear_all_data();

        assert!(m.current_session().is_none());
        assert!(m.history().is_empty());
        assert!(store.is_empty());
        assert!(manager(&store).history().is_empty());
    }

    #[test]
    fn progress_follows_scans() {
        let store = MemoryStore::new();
        let mut m = manager(&store);
        assert!(m.progress().is_none());

        m.start_tour("tour1").unwrap();
        m.scan_point("point2");

        let progress = m.progress().unwrap();
        assert_eq!(progress.total, 4);
        assert_eq!(progress.scanned, 1);
        assert_eq!(progress.remaining, ["point1", "point3", "point4"]);
        assert!(!progress.is_complete);
    }
}
