//! Region (house element) data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Category, HexColor};
use crate::error::RegionError;
use crate::geometry::Point;

/// Unique identifier of a region, e.g. `"roof-1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RegionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A labeled polygon overlay with color and material attributes.
///
/// Only `current_color` and `material` can change after creation, and only
/// through the [`RegionRegistry`](crate::registry::RegionRegistry).
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: RegionId,
    name: String,
    category: Category,
    current_color: HexColor,
    original_color: HexColor,
    material: String,
    boundary: Vec<Point>,
}

impl Region {
    /// Create a region whose current and original color are both `color`.
    pub fn new(
        id: impl Into<RegionId>,
        name: impl Into<String>,
        category: Category,
        color: HexColor,
        material: impl Into<String>,
        boundary: Vec<Point>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            current_color: color,
            original_color: color,
            material: material.into(),
            boundary,
        }
    }

    pub fn id(&self) -> &RegionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn current_color(&self) -> HexColor {
        self.current_color
    }

    pub fn original_color(&self) -> HexColor {
        self.original_color
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    /// Boundary vertices in native image space.
    pub fn boundary(&self) -> &[Point] {
        &self.boundary
    }

    /// Whether the color differs from the one the region was created with.
    pub fn is_recolored(&self) -> bool {
        self.current_color != self.original_color
    }

    pub(crate) fn set_current_color(&mut self, color: HexColor) {
        self.current_color = color;
    }

    pub(crate) fn set_material(&mut self, material: String) {
        self.material = material;
    }

    pub(crate) fn reset_color(&mut self) {
        self.current_color = self.original_color;
    }
}

/// Wire form of a region as produced by a segmenter.
///
/// ```json
/// { "id": "door-1", "name": "Front Door", "type": "door", "color": "#654321",
///   "material": "wood", "coordinates": [[180, 250], [220, 250], [220, 340], [180, 340]] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub color: String,
    pub material: String,
    pub coordinates: Vec<Point>,
}

impl TryFrom<RegionRecord> for Region {
    type Error = RegionError;

    fn try_from(record: RegionRecord) -> Result<Self, Self::Error> {
        let color = HexColor::parse(&record.color)
            .map_err(|e| RegionError::invalid_region(&record.id, e.to_string()))?;
        Ok(Region::new(
            record.id,
            record.name,
            record.category,
            color,
            record.material,
            record.coordinates,
        ))
    }
}

impl From<&Region> for RegionRecord {
    fn from(region: &Region) -> Self {
        Self {
            id: region.id.to_string(),
            name: region.name.clone(),
            category: region.category,
            color: region.current_color.to_string(),
            material: region.material.clone(),
            coordinates: region.boundary.clone(),
        }
    }
}
