//! Output formatting for CLI display.

use std::fmt::Write;

use jiff::{Timestamp, tz::TimeZone};
use waypoint::{
    Catalog,
    model::{CompletedTour, Tour, TourSession},
};

/// Format epoch milliseconds as local date and time.
pub(super) fn format_time(millis: i64) -> String {
    match Timestamp::from_millisecond(millis) {
        Ok(ts) => ts
            .to_zoned(TimeZone::system())
            .strftime("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => format!("{millis}ms"),
    }
}

pub(super) fn format_tours(catalog: &Catalog, active: Option<&str>) -> String {
    let mut out = String::new();
    for tour in catalog.list_tours() {
        let marker = if active == Some(tour.id.as_str()) {
            "  [active]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{}  {} ({} points){marker}",
            tour.id,
            tour.name,
            tour.points.len()
        );
        if !tour.description.is_empty() {
            let _ = writeln!(out, "    {}", tour.description);
        }
    }
    out
}

pub(super) fn format_status(catalog: &Catalog, session: Option<&TourSession>) -> String {
    let Some(session) = session else {
        return "No tour in progress\n".to_string();
    };
    let Some(tour) = catalog.find_tour(session.tour_id()) else {
        return format!("Tour {} is not in the catalog\n", session.tour_id());
    };

    let progress = session.progress(tour);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {}/{} points",
        tour.name, progress.scanned, progress.total
    );
    let _ = writeln!(out, "Started: {}", format_time(session.start_time()));
    for point in &tour.points {
        let scanned = session
            .scanned_points()
            .iter()
            .find(|r| r.point_id == point.id);
        let location = point
            .location
            .as_deref()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        match scanned {
            Some(record) => {
                let _ = writeln!(
                    out,
                    "  [x] {}{location}  {}",
                    point.name,
                    format_time(record.timestamp)
                );
            }
            None => {
                let _ = writeln!(out, "  [ ] {}{location}", point.name);
            }
        }
    }
    if progress.is_complete {
        let _ = writeln!(out, "All points scanned. Run `waypoint complete` to finish.");
    }
    out
}

pub(super) fn format_history(catalog: &Catalog, history: &[CompletedTour]) -> String {
    if history.is_empty() {
        return "No completed tours yet.\n".to_string();
    }
    let mut out = String::new();
    for entry in history {
        let _ = writeln!(out, "{}", catalog.tour_name(entry.tour_id()));
        let _ = writeln!(out, "  Completed: {}", format_time(entry.end_time()));
        let _ = writeln!(out, "  Points: {}", entry.scanned_points().len());
        let _ = writeln!(out, "  Duration: {} min", entry.duration_minutes());
    }
    out
}

pub(super) fn format_completion(tour: &Tour, completed: &CompletedTour) -> String {
    format!(
        "Tour completed: {}\n  Points visited: {}\n  Duration: {} min\n",
        tour.name,
        tour.points.len(),
        completed.duration_minutes()
    )
}
