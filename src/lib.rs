//! Waypoint: tour progress tracking for scan-to-visit tours.
//!
//! A visitor starts a [`Tour`](model::Tour) from the [`Catalog`](catalog::Catalog),
//! scans the QR code or NFC tag at each point, and completes the tour once
//! every point is scanned. [`SessionManager`](session::SessionManager) owns
//! that lifecycle and writes each change through a
//! [`KeyValueStore`](storage::KeyValueStore).

pub mod catalog;
pub mod clock;
pub mod config;
pub mod model;
pub mod persistence;
pub mod scanner;
pub mod session;
pub mod storage;

pub use catalog::{Catalog, CatalogError};
pub use session::{ScanOutcome, SessionError, SessionManager};
