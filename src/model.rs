//! Core data model for Waypoint.
//!
//! Tours and points are reference data. Sessions and completed tours are
//! the state a visitor accumulates while walking a tour.

mod session;
mod tour;

pub use session::{CompletedTour, InvalidSession, ScanRecord, SessionProgress, TourSession};
pub use tour::{Point, Tour};
