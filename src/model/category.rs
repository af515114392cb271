//! Category of a house element.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of house element categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Roof,
    Wall,
    Window,
    Door,
    Chimney,
    Foundation,
}

impl Category {
    /// Get the display name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Roof => "Roof",
            Category::Wall => "Wall",
            Category::Window => "Window",
            Category::Door => "Door",
            Category::Chimney => "Chimney",
            Category::Foundation => "Foundation",
        }
    }

    /// Get all categories in panel order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Roof,
            Category::Wall,
            Category::Window,
            Category::Door,
            Category::Chimney,
            Category::Foundation,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
