//! Ordered collection of regions for the current photo.
//!
//! Iteration order is creation order, which is also the draw order: later
//! regions are painted over earlier ones. The whole set is swapped out at
//! once when a new photo is acquired; there is no incremental merge.

use std::collections::HashSet;

use crate::error::RegionError;
use crate::geometry::{self, GeometryError};
use crate::model::{Category, HexColor, Region, RegionId};

/// Storage for the regions detected on a single photo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionRegistry {
    regions: Vec<Region>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace every region.
    ///
    /// The batch is validated first; if any region has a duplicate id or a
    /// malformed boundary the registry is left untouched. Zero-area boundaries
    /// are accepted but can never be hit.
    pub fn replace_all(&mut self, regions: Vec<Region>) -> Result<(), RegionError> {
        validate_batch(&regions)?;
        log::debug!(
            "Replacing {} regions with a batch of {}",
            self.regions.len(),
            regions.len()
        );
        self.regions = regions;
        Ok(())
    }

    /// Remove every region.
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Get a region by id.
    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: &RegionId) -> Result<&mut Region, RegionError> {
        self.regions
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| RegionError::RegionNotFound(id.clone()))
    }

    /// Change the current color of a region. The original color is kept.
    pub fn update_color(&mut self, id: &RegionId, color: &str) -> Result<(), RegionError> {
        let region = self.get_mut(id)?;
        let color = HexColor::parse(color)?;
        log::debug!("Region '{}' color {} -> {}", id, region.current_color(), color);
        region.set_current_color(color);
        Ok(())
    }

    /// Change the material of a region. Any string is accepted.
    pub fn update_material(
        &mut self,
        id: &RegionId,
        material: impl Into<String>,
    ) -> Result<(), RegionError> {
        let region = self.get_mut(id)?;
        let material = material.into();
        log::debug!("Region '{}' material {:?} -> {:?}", id, region.material(), material);
        region.set_material(material);
        Ok(())
    }

    /// Restore the original color of a region.
    pub fn reset_color(&mut self, id: &RegionId) -> Result<(), RegionError> {
        self.get_mut(id)?.reset_color();
        Ok(())
    }

    /// Restore the original color of every region. Returns how many changed.
    pub fn reset_all_colors(&mut self) -> usize {
        let mut changed = 0;
        for region in self.regions.iter_mut().filter(|r| r.is_recolored()) {
            region.reset_color();
            changed += 1;
        }
        changed
    }

    /// All regions in draw order.
    pub fn list(&self) -> &[Region] {
        &self.regions
    }

    /// Regions grouped by category, in category order. Empty groups are omitted
    /// and draw order is kept within each group.
    pub fn grouped_by_category(&self) -> Vec<(Category, Vec<&Region>)> {
        Category::all()
            .iter()
            .filter_map(|&category| {
                let members: Vec<&Region> = self
                    .regions
                    .iter()
                    .filter(|r| r.category() == category)
                    .collect();
                (!members.is_empty()).then_some((category, members))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn validate_batch(regions: &[Region]) -> Result<(), RegionError> {
    let mut seen = HashSet::with_capacity(regions.len());
    for region in regions {
        if !seen.insert(region.id()) {
            return Err(RegionError::invalid_region(region.id().as_str(), "duplicate id"));
        }
        match geometry::check_boundary(region.boundary()) {
            Ok(()) => {}
            Err(GeometryError::Degenerate) => {
                log::warn!(
                    "Region '{}' has a degenerate boundary and will never be hit",
                    region.id()
                );
            }
            Err(e) => {
                return Err(RegionError::invalid_region(region.id().as_str(), e.to_string()));
            }
        }
    }
    Ok(())
}
