//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer, RendererError, visible_world_rect};
use kurbo::{Affine, BezPath, Circle, Point, Rect, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext};
use peniko::{Brush, Color, Fill};
use seamline_core::editor::{Editor, Tool, TransformHandle, handle_positions};
use seamline_core::element::{Element, ElementKind, ElementStyle};
use seamline_core::snap::GRID_SIZE;
use seamline_core::symmetry::SymmetryMode;
use vello::Scene;

/// Text label size in screen pixels.
const LABEL_FONT_SIZE: f64 = 16.0;

/// Node handle square size in screen pixels.
const NODE_HANDLE_SIZE: f64 = 6.0;

/// Selection handle square size in screen pixels.
const SELECTION_HANDLE_SIZE: f64 = 10.0;

/// Padding around exported content, in world units.
const EXPORT_PADDING: f64 = 20.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
///
/// Builds a [`vello::Scene`] each frame from the editor state; building is
/// read-only and side-effect-free with respect to the scene model.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Selection highlight color.
    selection_color: Color,
    /// Symmetry guide color.
    guide_color: Color,
    /// Font context for label rendering (cached across frames).
    font_cx: FontContext,
    /// Layout context for label rendering.
    layout_cx: LayoutContext<Brush>,
    /// Current zoom level (for zoom-independent UI elements).
    zoom: f64,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(99, 102, 241, 255),
            guide_color: Color::from_rgba8(34, 211, 238, 255),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            zoom: 1.0,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets the internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Build a scene for export: elements only, white background, no grid,
    /// guides or handles. Returns the scene and its pixel bounds.
    pub fn build_export_scene(&mut self, editor: &Editor) -> Result<(Scene, Rect), RendererError> {
        self.scene.reset();
        self.zoom = 1.0;

        let bounds = editor.scene.bounds().ok_or(RendererError::EmptyScene)?;
        let padded = bounds.inflate(EXPORT_PADDING, EXPORT_PADDING);
        let transform = Affine::translate((-padded.x0, -padded.y0));

        let output = Rect::new(0.0, 0.0, padded.width(), padded.height());
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, Color::WHITE, None, &output);

        for element in editor.scene.iter().filter(|el| el.visible) {
            self.render_element(element, transform);
        }

        Ok((std::mem::take(&mut self.scene), output))
    }

    /// Render the infinite repeating grid over the visible world rect.
    fn render_grid(&mut self, world: Rect, transform: Affine, color: Color) {
        let stroke = Stroke::new(1.0 / self.zoom);
        let mut path = BezPath::new();

        let mut x = (world.x0 / GRID_SIZE).floor() * GRID_SIZE;
        while x <= world.x1 {
            path.move_to(Point::new(x, world.y0));
            path.line_to(Point::new(x, world.y1));
            x += GRID_SIZE;
        }
        let mut y = (world.y0 / GRID_SIZE).floor() * GRID_SIZE;
        while y <= world.y1 {
            path.move_to(Point::new(world.x0, y));
            path.line_to(Point::new(world.x1, y));
            y += GRID_SIZE;
        }

        self.scene.stroke(&stroke, transform, color, None, &path);
    }

    /// Render dashed guide lines for the active symmetry axes.
    fn render_symmetry_guides(&mut self, mode: SymmetryMode, world: Rect, transform: Affine) {
        if mode == SymmetryMode::None {
            return;
        }
        let dash = 10.0 / self.zoom;
        let gap = 5.0 / self.zoom;
        let stroke = Stroke::new(1.0 / self.zoom).with_dashes(0.0, [dash, gap]);

        if mode.has_vertical() {
            let mut path = BezPath::new();
            path.move_to(Point::new(0.0, world.y0));
            path.line_to(Point::new(0.0, world.y1));
            self.scene
                .stroke(&stroke, transform, self.guide_color, None, &path);
        }
        if mode.has_horizontal() {
            let mut path = BezPath::new();
            path.move_to(Point::new(world.x0, 0.0));
            path.line_to(Point::new(world.x1, 0.0));
            self.scene
                .stroke(&stroke, transform, self.guide_color, None, &path);
        }
    }

    /// Render a single element, honoring closed/fill/stroke/dash/opacity.
    fn render_element(&mut self, element: &Element, transform: Affine) {
        if let ElementKind::Text { content } = &element.kind {
            self.render_label(element, content, transform);
            return;
        }

        let path = element.to_world_path();
        if path.elements().is_empty() {
            return;
        }

        if element.closed {
            if let Some(fill) = element.style.fill_with_opacity() {
                self.scene.fill(Fill::NonZero, transform, fill, None, &path);
            }
        }

        let width = element.style.stroke_width / self.zoom;
        let stroke = match &element.style.dash {
            Some(dash) => Stroke::new(width).with_dashes(0.0, dash.iter().copied()),
            None => Stroke::new(width),
        };
        self.scene.stroke(
            &stroke,
            transform,
            element.style.stroke_with_opacity(),
            None,
            &path,
        );
    }

    /// Render a text label through Parley with a generic sans-serif stack.
    fn render_label(&mut self, element: &Element, content: &str, transform: Affine) {
        use parley::{FontFamily, FontStack, GenericFamily, StyleProperty};

        if content.is_empty() {
            return;
        }
        let Some(anchor) = element.nodes.first() else {
            return;
        };

        let brush = Brush::Solid(element.style.stroke_with_opacity());
        let font_size = (LABEL_FONT_SIZE / self.zoom) as f32;

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontWeight(parley::FontWeight::BOLD));
        builder.push_default(StyleProperty::FontStack(FontStack::Single(
            FontFamily::Generic(GenericFamily::SansSerif),
        )));
        let mut layout = builder.build(content);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let text_transform = transform
            * element.transform.affine()
            * Affine::translate((anchor.pos.x, anchor.pos.y));

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
    }

    /// Render fixed-screen-size squares at each node of an element.
    fn render_node_handles(&mut self, element: &Element, transform: Affine) {
        let size = NODE_HANDLE_SIZE / self.zoom;
        let stroke = Stroke::new(1.0 / self.zoom);
        for node in &element.nodes {
            let pos = element.node_world_pos(node);
            let rect = Rect::new(
                pos.x - size / 2.0,
                pos.y - size / 2.0,
                pos.x + size / 2.0,
                pos.y + size / 2.0,
            );
            self.scene
                .fill(Fill::NonZero, transform, self.selection_color, None, &rect);
            self.scene
                .stroke(&stroke, transform, Color::WHITE, None, &rect);
        }
    }

    /// Render the selection bounding box and its five handles.
    ///
    /// Handles keep a constant screen size regardless of zoom.
    fn render_selection(&mut self, bounds: Rect, transform: Affine) {
        let dash = 5.0 / self.zoom;
        let box_stroke = Stroke::new(2.0 / self.zoom).with_dashes(0.0, [dash, dash]);
        self.scene
            .stroke(&box_stroke, transform, self.selection_color, None, &bounds);

        let size = SELECTION_HANDLE_SIZE / self.zoom;
        let stroke = Stroke::new(1.0 / self.zoom);
        for (handle, pos) in handle_positions(bounds, self.zoom) {
            match handle {
                TransformHandle::Rotate => {
                    let circle = Circle::new(pos, size / 1.5);
                    self.scene
                        .fill(Fill::NonZero, transform, Color::WHITE, None, &circle);
                    self.scene.stroke(
                        &stroke,
                        transform,
                        self.selection_color,
                        None,
                        &circle,
                    );
                }
                _ => {
                    let rect = Rect::new(
                        pos.x - size / 2.0,
                        pos.y - size / 2.0,
                        pos.x + size / 2.0,
                        pos.y + size / 2.0,
                    );
                    self.scene
                        .fill(Fill::NonZero, transform, Color::WHITE, None, &rect);
                    self.scene
                        .stroke(&stroke, transform, self.selection_color, None, &rect);
                }
            }
        }
    }

    /// Render the in-progress marquee rectangle.
    fn render_marquee(&mut self, rect: Rect, transform: Affine) {
        let fill = Color::from_rgba8(99, 102, 241, 26);
        self.scene.fill(Fill::NonZero, transform, fill, None, &rect);
        let stroke = Stroke::new(1.0 / self.zoom);
        self.scene
            .stroke(&stroke, transform, self.selection_color, None, &rect);
    }

    /// Render the live freehand stroke, plus its symmetry previews.
    fn render_stroke_preview(
        &mut self,
        points: &[Point],
        style: &ElementStyle,
        mode: SymmetryMode,
        transform: Affine,
    ) {
        if points.len() < 2 {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(points[0]);
        for p in &points[1..] {
            path.line_to(*p);
        }

        let stroke = Stroke::new(style.stroke_width / self.zoom);
        let color = style.stroke_with_opacity();

        let mut axes = vec![(1.0, 1.0)];
        if mode.has_vertical() {
            axes.push((-1.0, 1.0));
        }
        if mode.has_horizontal() {
            axes.push((1.0, -1.0));
        }
        if mode == SymmetryMode::Quad {
            axes.push((-1.0, -1.0));
        }
        for (sx, sy) in axes {
            self.scene.stroke(
                &stroke,
                transform * Affine::scale_non_uniform(sx, sy),
                color,
                None,
                &path,
            );
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        let editor = ctx.editor;
        self.zoom = editor.camera.zoom;

        let camera_transform = editor.camera.transform();
        let world = visible_world_rect(&editor.camera, ctx.viewport_size);

        self.render_grid(world, camera_transform, ctx.theme.grid_color());
        self.render_symmetry_guides(editor.symmetry, world, camera_transform);

        for element in editor.scene.iter().filter(|el| el.visible) {
            self.render_element(element, camera_transform);
        }

        if editor.tool() == Tool::Node {
            let selected: Vec<&Element> = editor
                .scene
                .iter()
                .filter(|el| el.visible && editor.is_selected(el.id))
                .collect();
            for element in selected {
                self.render_node_handles(element, camera_transform);
            }
        }

        if editor.tool() == Tool::Select {
            if let Some(bounds) = editor.selection_bounds() {
                self.render_selection(bounds, camera_transform);
            }
        }

        if let Some(rect) = editor.marquee() {
            self.render_marquee(rect, camera_transform);
        }

        self.render_stroke_preview(
            editor.stroke_preview(),
            &editor.current_style,
            editor.symmetry,
            camera_transform,
        );
    }
}
