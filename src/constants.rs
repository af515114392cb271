//! Global constants for hviz

/// Default display surface bounds; photos are scaled to fit inside
pub const DEFAULT_MAX_DISPLAY_WIDTH: u32 = 800;
pub const DEFAULT_MAX_DISPLAY_HEIGHT: u32 = 600;

/// Simulated detection time of the mock segmenter
pub const DEFAULT_DETECTION_DELAY_MS: u64 = 2000;

/// File name used when exporting a frame without an explicit path
pub const EXPORT_FILENAME: &str = "house-visualization.png";

/// How long the CLI waits for each acquisition event before giving up
pub const ACQUISITION_WAIT_TIMEOUT_MS: u64 = 60_000;
