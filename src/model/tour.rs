//! Tour types: the static reference data a visitor walks through.

use serde::{Deserialize, Serialize};

/// A single scannable waypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Identifier carried by the QR code or NFC tag.
    pub id: String,

    pub name: String,

    pub description: String,

    /// Free-form location label, e.g. a building name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A named, ordered collection of points.
///
/// Point order is display order only. Points may be scanned in any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: String,
    pub name: String,
    pub description: String,
    pub points: Vec<Point>,
}

impl Tour {
    /// Returns the point with the given id, if it belongs to this tour.
    pub fn point(&self, point_id: &str) -> Option<&Point> {
        self.points.iter().find(|p| p.id == point_id)
    }

    /// Whether the point id belongs to this tour.
    pub fn contains(&self, point_id: &str) -> bool {
        self.point(point_id).is_some()
    }

    /// Point ids in display order.
    pub fn point_ids(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.id.as_str())
    }
}
