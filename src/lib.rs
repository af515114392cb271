//! hviz - House Visualizer
//!
//! Overlay engine for house photos: detected house elements (roof, walls,
//! windows, ...) are kept as polygons over the photo, can be hovered,
//! selected, recolored and re-materialed, and are composited into a frame
//! that can be exported as PNG.

pub mod acquisition;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod model;
pub mod registry;
pub mod render;
pub mod session;

pub use acquisition::{AcquisitionError, AcquisitionEvent, AcquisitionWorker, Generation};
pub use config::AppConfig;
pub use error::RegionError;
pub use geometry::{DisplayScale, Point};
pub use interaction::{HitPriority, InteractionState, OverlayState, PointerEvent};
pub use model::{Category, HexColor, Region, RegionId, RegionRecord};
pub use registry::RegionRegistry;
pub use render::{Frame, OverlayRenderer, OverlayStyle};
pub use session::{Session, SessionError};
