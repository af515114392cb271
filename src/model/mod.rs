//! Data models for hviz.

mod category;
mod color;
mod region;

pub use category::Category;
pub use color::HexColor;
pub use region::{Region, RegionId, RegionRecord};
