//! Region detection backends.

use std::path::PathBuf;
use std::time::Duration;

use image::RgbaImage;

use super::AcquisitionError;
use crate::geometry::Point;
use crate::model::{Category, HexColor, Region, RegionRecord};

/// Detects house elements in a decoded photo.
///
/// Runs on the acquisition thread, so implementations may block.
pub trait Segmenter: Send {
    /// Short name for logs.
    fn id(&self) -> &str;

    /// Produce the regions for `image`, in draw order.
    fn detect(&mut self, image: &RgbaImage) -> Result<Vec<Region>, AcquisitionError>;
}

/// Stand-in detector: waits a fixed delay and returns the same five elements
/// for every photo.
#[derive(Debug, Clone)]
pub struct MockSegmenter {
    delay: Duration,
}

impl MockSegmenter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockSegmenter {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            crate::constants::DEFAULT_DETECTION_DELAY_MS,
        ))
    }
}

impl Segmenter for MockSegmenter {
    fn id(&self) -> &str {
        "mock"
    }

    fn detect(&mut self, image: &RgbaImage) -> Result<Vec<Region>, AcquisitionError> {
        log::debug!(
            "Mock detection on {}x{} image, waiting {:?}",
            image.width(),
            image.height(),
            self.delay
        );
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(mock_house_elements())
    }
}

/// The fixed elements the mock detector reports, in native pixel space.
pub fn mock_house_elements() -> Vec<Region> {
    fn element(
        id: &str,
        name: &str,
        category: Category,
        rgb: [u8; 3],
        material: &str,
        corners: [[f32; 2]; 4],
    ) -> Region {
        Region::new(
            id,
            name,
            category,
            HexColor::from_rgb(rgb),
            material,
            corners.into_iter().map(Point::from).collect(),
        )
    }

    vec![
        element(
            "roof-1",
            "Main Roof",
            Category::Roof,
            [0x8B, 0x45, 0x13],
            "shingles",
            [[100.0, 50.0], [300.0, 50.0], [400.0, 150.0], [0.0, 150.0]],
        ),
        element(
            "wall-1",
            "Front Wall",
            Category::Wall,
            [0xF5, 0xF5, 0xDC],
            "brick",
            [[50.0, 150.0], [350.0, 150.0], [350.0, 350.0], [50.0, 350.0]],
        ),
        element(
            "window-1",
            "Left Window",
            Category::Window,
            [0x87, 0xCE, 0xEB],
            "glass",
            [[80.0, 180.0], [140.0, 180.0], [140.0, 240.0], [80.0, 240.0]],
        ),
        element(
            "window-2",
            "Right Window",
            Category::Window,
            [0x87, 0xCE, 0xEB],
            "glass",
            [[260.0, 180.0], [320.0, 180.0], [320.0, 240.0], [260.0, 240.0]],
        ),
        element(
            "door-1",
            "Front Door",
            Category::Door,
            [0x65, 0x43, 0x21],
            "wood",
            [[180.0, 250.0], [220.0, 250.0], [220.0, 340.0], [180.0, 340.0]],
        ),
    ]
}

/// Reads regions from a JSON array of region records.
///
/// The file is read on every detection, so it can be edited between uploads.
#[derive(Debug, Clone)]
pub struct FileSegmenter {
    path: PathBuf,
}

impl FileSegmenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Segmenter for FileSegmenter {
    fn id(&self) -> &str {
        "file"
    }

    fn detect(&mut self, _image: &RgbaImage) -> Result<Vec<Region>, AcquisitionError> {
        let json = std::fs::read_to_string(&self.path)?;
        let records: Vec<RegionRecord> = serde_json::from_str(&json)?;
        log::info!("Loaded {} region records from {:?}", records.len(), self.path);

        let regions = records
            .into_iter()
            .map(Region::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(regions)
    }
}
