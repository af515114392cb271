//! Overlay compositing: base photo plus tinted, outlined region polygons.
//!
//! A frame is rebuilt from scratch on every call. Regions only get an overlay
//! while they are selected or hovered, or while detection is in progress.

use std::path::Path;

use hviz_raster::{Canvas, RasterError, Rgba, TextRenderer};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{self, DisplayScale};
use crate::interaction::{InteractionState, OverlayState};
use crate::model::{HexColor, Region};
use crate::registry::RegionRegistry;

/// Fill and border for one overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateStyle {
    /// Alpha applied to the region's current color
    pub fill_alpha: u8,
    pub stroke_color: HexColor,
    pub stroke_width: f32,
}

impl StateStyle {
    const fn new(fill_alpha: u8, stroke_color: [u8; 3], stroke_width: f32) -> Self {
        Self {
            fill_alpha,
            stroke_color: HexColor::from_rgb(stroke_color),
            stroke_width,
        }
    }
}

/// Label placement and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub enabled: bool,
    pub name_size: f32,
    pub material_size: f32,
    pub material_color: HexColor,
    /// Name baseline distance above the centroid
    pub name_offset: f32,
    /// Material baseline distance below the centroid
    pub material_offset: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            name_size: 12.0,
            material_size: 10.0,
            material_color: HexColor::from_rgb([0xFF, 0xFF, 0xFF]),
            name_offset: 5.0,
            material_offset: 10.0,
        }
    }
}

/// Visual style of every overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub selected: StateStyle,
    pub hovered: StateStyle,
    /// Used for regions drawn only because detection is running
    pub idle: StateStyle,
    pub labels: LabelStyle,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            selected: StateStyle::new(0x80, [0x3B, 0x82, 0xF6], 3.0),
            hovered: StateStyle::new(0x60, [0x8B, 0x5C, 0xF6], 2.0),
            idle: StateStyle::new(0x40, [0xFF, 0xFF, 0xFF], 1.0),
            labels: LabelStyle::default(),
        }
    }
}

/// A style that breaks the selected >= hovered >= idle emphasis ordering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Fill alpha must not increase from idle to hovered to selected ({selected} / {hovered} / {idle})")]
    AlphaOrdering { selected: u8, hovered: u8, idle: u8 },

    #[error("Stroke width must not increase from idle to hovered to selected ({selected} / {hovered} / {idle})")]
    StrokeOrdering { selected: f32, hovered: f32, idle: f32 },

    #[error("Stroke width {0} is not a positive finite number")]
    StrokeWidth(f32),
}

impl OverlayStyle {
    /// Style for a state. Idle maps to the processing style.
    pub fn for_state(&self, state: OverlayState) -> &StateStyle {
        match state {
            OverlayState::Selected | OverlayState::HoveredSelected => &self.selected,
            OverlayState::Hovered => &self.hovered,
            OverlayState::Idle => &self.idle,
        }
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        for s in [&self.selected, &self.hovered, &self.idle] {
            if !s.stroke_width.is_finite() || s.stroke_width <= 0.0 {
                return Err(StyleError::StrokeWidth(s.stroke_width));
            }
        }
        let (sel, hov, idle) = (&self.selected, &self.hovered, &self.idle);
        if sel.fill_alpha < hov.fill_alpha || hov.fill_alpha < idle.fill_alpha {
            return Err(StyleError::AlphaOrdering {
                selected: sel.fill_alpha,
                hovered: hov.fill_alpha,
                idle: idle.fill_alpha,
            });
        }
        if sel.stroke_width < hov.stroke_width || hov.stroke_width < idle.stroke_width {
            return Err(StyleError::StrokeOrdering {
                selected: sel.stroke_width,
                hovered: hov.stroke_width,
                idle: idle.stroke_width,
            });
        }
        Ok(())
    }
}

/// Everything a frame is derived from.
pub struct FrameInput<'a> {
    pub image: &'a RgbaImage,
    pub scale: DisplayScale,
    pub registry: &'a RegionRegistry,
    pub interaction: &'a InteractionState,
    /// Detection in progress: every region gets an overlay
    pub processing: bool,
}

/// A composited display-space frame.
pub struct Frame {
    canvas: Canvas,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Straight-alpha RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.canvas.pixel(x, y).map(Rgba::to_array)
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        self.canvas.to_rgba_image()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        self.canvas.encode_png()
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RasterError> {
        self.canvas.save_png(path)
    }
}

/// Composites frames. Holds the label font cache between frames.
pub struct OverlayRenderer {
    style: OverlayStyle,
    text: TextRenderer,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            text: TextRenderer::new(),
        }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn render(&mut self, input: &FrameInput<'_>) -> Result<Frame, RasterError> {
        let (width, height) = input
            .scale
            .display_size(input.image.width(), input.image.height());
        let mut canvas = Canvas::new(width, height)?;
        canvas.draw_image_fitted(input.image);

        let mut painted = 0usize;
        for region in input.registry.list() {
            let state = input.interaction.state_of(region.id());
            if !state.is_highlighted() && !input.processing {
                continue;
            }
            if self.paint_region(&mut canvas, region, state, input.scale) {
                painted += 1;
            }
        }
        log::trace!(
            "Rendered {}x{} frame with {}/{} overlays",
            width,
            height,
            painted,
            input.registry.len()
        );

        Ok(Frame { canvas })
    }

    fn paint_region(
        &mut self,
        canvas: &mut Canvas,
        region: &Region,
        state: OverlayState,
        scale: DisplayScale,
    ) -> bool {
        let style = *self.style.for_state(state);
        let outline: Vec<(f32, f32)> = region
            .boundary()
            .iter()
            .map(|&p| {
                let d = geometry::to_display_space(p, scale);
                (d.x, d.y)
            })
            .collect();

        let fill = Rgba::from_rgb(region.current_color().rgb(), style.fill_alpha);
        if !canvas.fill_polygon(&outline, fill) {
            log::debug!("Skipping region '{}': no drawable outline", region.id());
            return false;
        }
        canvas.stroke_polygon(
            &outline,
            Rgba::from_rgb(style.stroke_color.rgb(), 0xFF),
            style.stroke_width,
        );

        if state.is_highlighted() && self.style.labels.enabled {
            self.paint_labels(canvas, region, &style, scale);
        }
        true
    }

    fn paint_labels(
        &mut self,
        canvas: &mut Canvas,
        region: &Region,
        style: &StateStyle,
        scale: DisplayScale,
    ) {
        let Some(center) = geometry::centroid(region.boundary()) else {
            return;
        };
        let center = geometry::to_display_space(center, scale);
        let labels = self.style.labels;

        self.text.draw_centered(
            canvas,
            region.name(),
            center.x,
            center.y - labels.name_offset,
            labels.name_size,
            Rgba::from_rgb(style.stroke_color.rgb(), 0xFF),
        );
        self.text.draw_centered(
            canvas,
            region.material(),
            center.x,
            center.y + labels.material_offset,
            labels.material_size,
            Rgba::from_rgb(labels.material_color.rgb(), 0xFF),
        );
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(OverlayStyle::default())
    }
}
