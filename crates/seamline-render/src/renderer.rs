//! Renderer trait abstraction.

use kurbo::{Rect, Size};
use peniko::Color;
use seamline_core::Camera;
use seamline_core::editor::Editor;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("nothing to export: the scene is empty")]
    EmptyScene,
    #[error("render failed: {0}")]
    RenderFailed(String),
}

/// Canvas color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Background clear color.
    pub fn background(self) -> Color {
        match self {
            Theme::Dark => Color::from_rgba8(10, 10, 10, 255),
            Theme::Light => Color::from_rgba8(248, 248, 248, 255),
        }
    }

    /// Faint grid line color.
    pub fn grid_color(self) -> Color {
        match self {
            Theme::Dark => Color::from_rgba8(255, 255, 255, 8),
            Theme::Light => Color::from_rgba8(0, 0, 0, 13),
        }
    }

    /// Toggle to the other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Context for a single render frame.
///
/// Frames read the editor state and never mutate it.
pub struct RenderContext<'a> {
    /// The editing session to render.
    pub editor: &'a Editor,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Canvas theme.
    pub theme: Theme,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(editor: &'a Editor, viewport_size: Size) -> Self {
        Self {
            editor,
            viewport_size,
            scale_factor: 1.0,
            theme: Theme::default(),
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// The world-space rectangle currently visible through the camera.
pub fn visible_world_rect(camera: &Camera, viewport_size: Size) -> Rect {
    let top_left = camera.screen_to_world(kurbo::Point::ZERO);
    let bottom_right = camera.screen_to_world(kurbo::Point::new(
        viewport_size.width,
        viewport_size.height,
    ));
    Rect::from_points(top_left, bottom_right)
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other engines. Building
/// a frame is read-only with respect to the editor.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.theme.background()
    }
}
