//! Tour catalog: the read-only list of tours a visitor can start.
//!
//! The built-in catalog holds a single sample tour. A catalog can also be
//! read from a TOML file:
//!
//! ```toml
//! [[tours]]
//! id = "tour1"
//! name = "Campus Tour"
//! description = "A tour around the main campus buildings"
//!
//! [[tours.points]]
//! id = "point1"
//! name = "Main Entrance"
//! description = "The main entrance to the campus"
//! location = "Building A"
//! ```

use std::{collections::HashSet, fs, io, path::Path};

use serde::Deserialize;

use crate::model::{Point, Tour};

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] io::Error),

    #[error("invalid catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("tour has an empty id")]
    EmptyTourId,

    #[error("duplicate tour id: {0}")]
    DuplicateTour(String),

    #[error("tour {0} has no points")]
    EmptyTour(String),

    #[error("tour {0} has a point with an empty id")]
    EmptyPointId(String),

    #[error("tour {tour} lists point {point} more than once")]
    DuplicatePoint { tour: String, point: String },
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tours: Vec<TourEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TourEntry {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    points: Vec<PointEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PointEntry {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    location: Option<String>,
    image_url: Option<String>,
}

/// The tours available to start, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tours: Vec<Tour>,
}

impl Catalog {
    /// Builds a catalog from tour definitions, validating ids.
    pub fn new(tours: Vec<Tour>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for tour in &tours {
            if tour.id.is_empty() {
                return Err(CatalogError::EmptyTourId);
            }
            if !seen.insert(tour.id.as_str()) {
                return Err(CatalogError::DuplicateTour(tour.id.clone()));
            }
            if tour.points.is_empty() {
                return Err(CatalogError::EmptyTour(tour.id.clone()));
            }
            let mut points = HashSet::new();
            for point in &tour.points {
                if point.id.is_empty() {
                    return Err(CatalogError::EmptyPointId(tour.id.clone()));
                }
                if !points.insert(point.id.as_str()) {
                    return Err(CatalogError::DuplicatePoint {
                        tour: tour.id.clone(),
                        point: point.id.clone(),
                    });
                }
            }
        }
        Ok(Self { tours })
    }

    /// The built-in sample catalog.
    pub fn seeded() -> Self {
        let point = |id: &str, name: &str, description: &str, location: &str| Point {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            location: Some(location.into()),
            image_url: None,
        };
        Self {
            tours: vec![Tour {
                id: "tour1".into(),
                name: "Campus Tour".into(),
                description: "A tour around the main campus buildings".into(),
                points: vec![
                    point(
                        "point1",
                        "Main Entrance",
                        "The main entrance to the campus",
                        "Building A",
                    ),
                    point(
                        "point2",
                        "Library",
                        "The central library with study areas",
                        "Building B",
                    ),
                    point(
                        "point3",
                        "Student Center",
                        "Student services and dining options",
                        "Building C",
                    ),
                    point(
                        "point4",
                        "Science Lab",
                        "Research laboratories and classrooms",
                        "Building D",
                    ),
                ],
            }],
        }
    }

    /// Parses and validates a TOML catalog.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(s)?;
        let tours = file
            .tours
            .into_iter()
            .map(|t| Tour {
                id: t.id,
                name: t.name,
                description: t.description,
                points: t
                    .points
                    .into_iter()
                    .map(|p| Point {
                        id: p.id,
                        name: p.name,
                        description: p.description,
                        location: p.location,
                        image_url: p.image_url,
                    })
                    .collect(),
            })
            .collect();
        Self::new(tours)
    }

    /// Reads a TOML catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn list_tours(&self) -> &[Tour] {
        &self.tours
    }

    /// Looks up a tour. An unknown id is an ordinary outcome, not an error.
    pub fn find_tour(&self, tour_id: &str) -> Option<&Tour> {
        self.tours.iter().find(|t| t.id == tour_id)
    }

    pub fn find_point(&self, tour_id: &str, point_id: &str) -> Option<&Point> {
        self.find_tour(tour_id)?.point(point_id)
    }

    /// Display name for a tour id, as shown in history.
    pub fn tour_name(&self, tour_id: &str) -> &str {
        self.find_tour(tour_id)
            .map_or("Unknown Tour", |t| t.name.as_str())
    }
}
