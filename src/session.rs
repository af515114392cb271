//! One visualization session: the current photo, its regions and the user's
//! interaction with them.
//!
//! The session runs on the control thread. Acquisition events arrive from the
//! worker and are applied with [`Session::apply`]; anything tagged with an
//! older upload generation is ignored. The host re-renders after mutations.

use std::path::Path;
use std::sync::Arc;

use hviz_raster::RasterError;
use image::RgbaImage;
use thiserror::Error;

use crate::acquisition::{AcquisitionError, AcquisitionEvent, Generation};
use crate::config::{AppConfig, DisplayConfig};
use crate::error::RegionError;
use crate::geometry::{DisplayScale, GeometryError};
use crate::interaction::{InteractionState, PointerEvent};
use crate::model::RegionId;
use crate::registry::RegionRegistry;
use crate::render::{Frame, FrameInput, OverlayRenderer};

/// Errors surfaced by session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error("Acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Rendering failed: {0}")]
    Raster(#[from] RasterError),

    /// Export requested before a photo finished loading
    #[error("No image loaded")]
    NoImage,
}

/// A decoded photo and the scale it is displayed at.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixels: Arc<RgbaImage>,
    pub scale: DisplayScale,
}

/// One visualizer session: the current photo, its detected regions and the
/// user's selection, fed by acquisition events.
///
/// Events tagged with any generation but the latest upload's are ignored.
pub struct Session {
    /// Bounds the photo is fitted into
    display: DisplayConfig,
    /// Generation of the latest upload
    generation: Generation,
    /// Decoded photo, `None` until the latest upload's `ImageReady`
    image: Option<LoadedImage>,
    registry: RegionRegistry,
    interaction: InteractionState,
    /// Detection is running for the latest upload
    processing: bool,
    renderer: OverlayRenderer,
}

impl Session {
    pub fn new(display: DisplayConfig, renderer: OverlayRenderer) -> Self {
        Self {
            display,
            generation: Generation::default(),
            image: None,
            registry: RegionRegistry::new(),
            interaction: InteractionState::new(),
            processing: false,
            renderer,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.display, OverlayRenderer::new(config.style))
    }

    /// Start a new upload, discarding the current photo and all its regions.
    ///
    /// Returns the generation the worker request must be tagged with.
    pub fn begin_upload(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.image = None;
        self.registry.clear();
        self.interaction.clear();
        self.processing = true;
        log::info!("Started upload {}", self.generation);
        self.generation
    }

    /// Apply an acquisition event. Returns `true` if the session changed.
    ///
    /// Events from superseded uploads are dropped and return `Ok(false)`. A
    /// failed upload ends processing and surfaces its error.
    pub fn apply(&mut self, event: AcquisitionEvent) -> Result<bool, SessionError> {
        if event.generation() != self.generation {
            log::debug!(
                "Ignoring stale event from upload {} (current {})",
                event.generation(),
                self.generation
            );
            return Ok(false);
        }

        match event {
            AcquisitionEvent::ImageReady { image, .. } => {
                let scale = match DisplayScale::fit(
                    image.width(),
                    image.height(),
                    self.display.max_width,
                    self.display.max_height,
                ) {
                    Ok(scale) => scale,
                    Err(e) => {
                        self.processing = false;
                        return Err(e.into());
                    }
                };
                log::info!(
                    "Image {}x{} ready, display scale {:.3}",
                    image.width(),
                    image.height(),
                    scale.factor()
                );
                self.image = Some(LoadedImage {
                    pixels: image,
                    scale,
                });
                Ok(true)
            }
            AcquisitionEvent::RegionsReady { regions, .. } => {
                self.processing = false;
                self.registry.replace_all(regions)?;
                log::info!("{} regions ready", self.registry.len());
                Ok(true)
            }
            AcquisitionEvent::Failed { error, .. } => {
                self.processing = false;
                Err(error.into())
            }
        }
    }

    /// Whether pointer input and selection are currently accepted.
    fn interactive(&self) -> bool {
        self.image.is_some() && !self.processing
    }

    /// Route a display-space pointer event. Returns `true` if hover or
    /// selection changed.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        if !self.interactive() {
            return false;
        }
        let Some(scale) = self.scale() else {
            return false;
        };
        self.interaction
            .apply_pointer(event, &self.registry, scale, self.display.hit_priority)
    }

    /// Select a region by id, or clear the selection.
    pub fn select(&mut self, id: Option<RegionId>) -> bool {
        if !self.interactive() {
            log::debug!("Ignoring selection while no photo is ready");
            return false;
        }
        self.interaction.set_selected(id)
    }

    pub fn update_color(&mut self, id: &RegionId, color: &str) -> Result<(), RegionError> {
        self.registry.update_color(id, color)
    }

    pub fn update_material(&mut self, id: &RegionId, material: &str) -> Result<(), RegionError> {
        self.registry.update_material(id, material)
    }

    pub fn reset_color(&mut self, id: &RegionId) -> Result<(), RegionError> {
        self.registry.reset_color(id)
    }

    pub fn reset_all_colors(&mut self) -> usize {
        self.registry.reset_all_colors()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn scale(&self) -> Option<DisplayScale> {
        self.image.as_ref().map(|img| img.scale)
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Composite the current frame, or `None` before a photo is loaded.
    pub fn render(&mut self) -> Result<Option<Frame>, RasterError> {
        let Some(image) = &self.image else {
            return Ok(None);
        };
        let frame = self.renderer.render(&FrameInput {
            image: &image.pixels,
            scale: image.scale,
            registry: &self.registry,
            interaction: &self.interaction,
            processing: self.processing,
        })?;
        Ok(Some(frame))
    }

    /// Render and write the current frame as PNG.
    pub fn export_png(&mut self, path: &Path) -> Result<(), SessionError> {
        let frame = self.render()?.ok_or(SessionError::NoImage)?;
        frame.save_png(path)?;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
