//! Hover/selection state and pointer hit-testing.
//!
//! Interaction state lives outside the regions themselves and is passed
//! explicitly to the renderer and hit-tester.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, DisplayScale, Point};
use crate::model::RegionId;
use crate::registry::RegionRegistry;

/// Which region wins when several overlays contain the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPriority {
    /// The earliest region in draw order wins (canonical rule).
    #[default]
    FirstInDrawOrder,
    /// The last-drawn (visually topmost) region wins.
    TopmostDrawn,
}

/// Visual state of a single region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Idle,
    Hovered,
    Selected,
    HoveredSelected,
}

impl OverlayState {
    pub fn is_selected(self) -> bool {
        matches!(self, OverlayState::Selected | OverlayState::HoveredSelected)
    }

    pub fn is_hovered(self) -> bool {
        matches!(self, OverlayState::Hovered | OverlayState::HoveredSelected)
    }

    /// Selected or hovered.
    pub fn is_highlighted(self) -> bool {
        self != OverlayState::Idle
    }
}

/// Pointer input in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(Point),
    Clicked(Point),
    /// Pointer left the display surface
    Left,
}

/// Currently selected and hovered regions.
///
/// Ids are not validated; a dangling id simply matches no region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    selected: Option<RegionId>,
    hovered: Option<RegionId>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&RegionId> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&RegionId> {
        self.hovered.as_ref()
    }

    /// Set the selection. Returns `true` if it changed.
    pub fn set_selected(&mut self, id: Option<RegionId>) -> bool {
        if self.selected == id {
            return false;
        }
        log::debug!("Selection {:?} -> {:?}", self.selected, id);
        self.selected = id;
        true
    }

    /// Set the hovered region. Returns `true` if it changed.
    pub fn set_hovered(&mut self, id: Option<RegionId>) -> bool {
        if self.hovered == id {
            return false;
        }
        log::trace!("Hover {:?} -> {:?}", self.hovered, id);
        self.hovered = id;
        true
    }

    /// Forget both selection and hover.
    pub fn clear(&mut self) {
        self.selected = None;
        self.hovered = None;
    }

    pub fn state_of(&self, id: &RegionId) -> OverlayState {
        let selected = self.selected.as_ref() == Some(id);
        let hovered = self.hovered.as_ref() == Some(id);
        match (selected, hovered) {
            (true, true) => OverlayState::HoveredSelected,
            (true, false) => OverlayState::Selected,
            (false, true) => OverlayState::Hovered,
            (false, false) => OverlayState::Idle,
        }
    }

    /// Apply a pointer event. Returns `true` if the state changed.
    ///
    /// Moving hovers whatever is under the pointer. Clicking a region selects
    /// it; clicking empty space leaves the selection alone.
    pub fn apply_pointer(
        &mut self,
        event: PointerEvent,
        registry: &RegionRegistry,
        scale: DisplayScale,
        priority: HitPriority,
    ) -> bool {
        match event {
            PointerEvent::Moved(point) => {
                self.set_hovered(hit_test_with(point, registry, scale, priority))
            }
            PointerEvent::Clicked(point) => match hit_test_with(point, registry, scale, priority) {
                Some(id) => self.set_selected(Some(id)),
                None => false,
            },
            PointerEvent::Left => self.set_hovered(None),
        }
    }
}

/// Find the region under a display-space point.
///
/// Regions are tested in draw order and the first containing region wins, so
/// when overlays overlap the earlier-drawn one takes priority even though the
/// later one is painted on top.
pub fn hit_test(point: Point, registry: &RegionRegistry, scale: DisplayScale) -> Option<RegionId> {
    hit_test_with(point, registry, scale, HitPriority::FirstInDrawOrder)
}

/// [`hit_test`] with an explicit tie-break rule.
pub fn hit_test_with(
    point: Point,
    registry: &RegionRegistry,
    scale: DisplayScale,
    priority: HitPriority,
) -> Option<RegionId> {
    let native = geometry::to_native_space(point, scale);
    let contains = |r: &&crate::model::Region| geometry::point_in_polygon(native, r.boundary());
    let hit = match priority {
        HitPriority::FirstInDrawOrder => registry.list().iter().find(contains),
        HitPriority::TopmostDrawn => registry.list().iter().rev().find(contains),
    };
    hit.map(|r| r.id().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, HexColor, Region};

    fn rect_region(id: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Region {
        Region::new(
            id,
            id,
            Category::Wall,
            HexColor::from_rgb([200, 200, 200]),
            "brick",
            vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
        )
    }

    fn registry(regions: Vec<Region>) -> RegionRegistry {
        let mut registry = RegionRegistry::new();
        registry.replace_all(regions).unwrap();
        registry
    }

    fn id(s: &str) -> RegionId {
        RegionId::from(s)
    }

    #[test]
    fn test_hit_test_single_square() {
        let reg = registry(vec![rect_region("sq", 0.0, 0.0, 100.0, 100.0)]);
        let scale = DisplayScale::IDENTITY;

        assert_eq!(hit_test(Point::new(50.0, 50.0), &reg, scale), Some(id("sq")));
        assert_eq!(hit_test(Point::new(150.0, 150.0), &reg, scale), None);
    }

    #[test]
    fn test_hit_test_maps_display_to_native() {
        let reg = registry(vec![rect_region("sq", 0.0, 0.0, 100.0, 100.0)]);
        let half = DisplayScale::new(0.5).unwrap();

        // Display (40, 40) is native (80, 80)
        assert_eq!(hit_test(Point::new(40.0, 40.0), &reg, half), Some(id("sq")));
        // Display (60, 60) is native (120, 120)
        assert_eq!(hit_test(Point::new(60.0, 60.0), &reg, half), None);
    }

    #[test]
    fn test_overlap_first_in_draw_order_wins() {
        let reg = registry(vec![
            rect_region("r1", 0.0, 0.0, 100.0, 100.0),
            rect_region("r2", 50.0, 50.0, 150.0, 150.0),
        ]);
        let p = Point::new(75.0, 75.0);

        assert_eq!(hit_test(p, &reg, DisplayScale::IDENTITY), Some(id("r1")));
        assert_eq!(
            hit_test_with(p, &reg, DisplayScale::IDENTITY, HitPriority::TopmostDrawn),
            Some(id("r2"))
        );
        // Only r2 covers this point, so priority does not matter
        assert_eq!(hit_test(Point::new(140.0, 140.0), &reg, DisplayScale::IDENTITY), Some(id("r2")));
    }

    #[test]
    fn test_hit_test_only_returns_registered_ids() {
        let reg = registry(vec![
            rect_region("a", 0.0, 0.0, 30.0, 30.0),
            rect_region("b", 20.0, 20.0, 60.0, 60.0),
            rect_region("c", 100.0, 0.0, 130.0, 90.0),
        ]);
        for x in (0..150).step_by(7) {
            for y in (0..100).step_by(7) {
                if let Some(hit) = hit_test(Point::new(x as f32, y as f32), &reg, DisplayScale::IDENTITY) {
                    assert!(reg.contains(&hit), "unknown id {}", hit);
                }
            }
        }
    }

    #[test]
    fn test_hit_test_empty_registry() {
        let reg = RegionRegistry::new();
        assert_eq!(hit_test(Point::new(1.0, 1.0), &reg, DisplayScale::IDENTITY), None);
    }

    #[test]
    fn test_state_of_all_combinations() {
        let mut state = InteractionState::new();
        let a = id("a");
        assert_eq!(state.state_of(&a), OverlayState::Idle);

        state.set_hovered(Some(a.clone()));
        assert_eq!(state.state_of(&a), OverlayState::Hovered);

        state.set_selected(Some(a.clone()));
        assert_eq!(state.state_of(&a), OverlayState::HoveredSelected);

        state.set_hovered(None);
        assert_eq!(state.state_of(&a), OverlayState::Selected);
        assert!(state.state_of(&a).is_highlighted());
    }

    #[test]
    fn test_set_returns_whether_changed() {
        let mut state = InteractionState::new();
        assert!(state.set_selected(Some(id("a"))));
        assert!(!state.set_selected(Some(id("a"))));
        assert!(state.set_selected(None));
        assert!(!state.set_hovered(None));
    }

    #[test]
    fn test_dangling_ids_are_tolerated() {
        let mut state = InteractionState::new();
        state.set_selected(Some(id("ghost")));
        assert_eq!(state.selected(), Some(&id("ghost")));
    }

    #[test]
    fn test_pointer_events_drive_hover_and_selection() {
        let reg = registry(vec![
            rect_region("left", 0.0, 0.0, 50.0, 50.0),
            rect_region("right", 60.0, 0.0, 110.0, 50.0),
        ]);
        let scale = DisplayScale::IDENTITY;
        let prio = HitPriority::default();
        let mut state = InteractionState::new();

        assert!(state.apply_pointer(PointerEvent::Moved(Point::new(10.0, 10.0)), &reg, scale, prio));
        assert_eq!(state.hovered(), Some(&id("left")));

        assert!(state.apply_pointer(PointerEvent::Clicked(Point::new(10.0, 10.0)), &reg, scale, prio));
        assert_eq!(state.selected(), Some(&id("left")));

        // Hovering elsewhere keeps the selection
        state.apply_pointer(PointerEvent::Moved(Point::new(80.0, 10.0)), &reg, scale, prio);
        assert_eq!(state.hovered(), Some(&id("right")));
        assert_eq!(state.selected(), Some(&id("left")));

        // Clicking empty space does not clear the selection
        assert!(!state.apply_pointer(PointerEvent::Clicked(Point::new(55.0, 10.0)), &reg, scale, prio));
        assert_eq!(state.selected(), Some(&id("left")));

        assert!(state.apply_pointer(PointerEvent::Left, &reg, scale, prio));
        assert_eq!(state.hovered(), None);
        assert_eq!(state.selected(), Some(&id("left")));
    }
}
