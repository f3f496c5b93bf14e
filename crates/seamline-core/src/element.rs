//! Element and node definitions for the drafting scene.

use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Unique identifier for path nodes.
pub type NodeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// The indigo accent used for fresh strokes and pattern outlines.
    pub fn indigo() -> Self {
        Self::new(99, 102, 241, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Continuity kind of a path node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeKind {
    #[default]
    Corner,
    Smooth,
    Symmetric,
    Auto,
}

/// A control point belonging to exactly one element.
///
/// Positions are local (pre-transform). The bezier handle offsets are part
/// of the model but unused by the current tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: NodeId,
    /// Local position, before the owning element's transform.
    pub pos: Point,
    /// Incoming bezier handle offset, relative to `pos`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_in: Option<Vec2>,
    /// Outgoing bezier handle offset, relative to `pos`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_out: Option<Vec2>,
    pub kind: NodeKind,
    /// Marks nodes that belong to technical markings (grainlines, notches).
    #[serde(default)]
    pub technical: bool,
}

impl PathNode {
    /// Create a corner node at the given local position.
    pub fn new(pos: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            pos,
            handle_in: None,
            handle_out: None,
            kind: NodeKind::Corner,
            technical: false,
        }
    }

    /// Create a node with an explicit continuity kind.
    pub fn with_kind(pos: Point, kind: NodeKind) -> Self {
        Self {
            kind,
            ..Self::new(pos)
        }
    }
}

/// Compositing mode for an element.
///
/// Carried by the style model; the current renderer composites everything
/// source-over, matching the drafting canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    SourceOver,
    Multiply,
    Screen,
}

/// Style properties for elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Stroke width in screen pixels.
    pub stroke_width: f64,
    /// Dash pattern in world units (None = solid).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<Vec<f64>>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    pub opacity: f64,
    /// Compositing mode.
    #[serde(default)]
    pub blend: BlendMode,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::indigo(),
            fill_color: Some(SerializableColor::new(99, 102, 241, 26)),
            stroke_width: 2.0,
            dash: None,
            opacity: 1.0,
            blend: BlendMode::default(),
        }
    }
}

impl ElementStyle {
    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        let color: Color = self.stroke_color.into();
        let rgba = color.to_rgba8();
        let alpha = (rgba.a as f64 * self.opacity) as u8;
        Color::from_rgba8(rgba.r, rgba.g, rgba.b, alpha)
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill_color.map(|c| {
            let color: Color = c.into();
            let rgba = color.to_rgba8();
            let alpha = (rgba.a as f64 * self.opacity) as u8;
            Color::from_rgba8(rgba.r, rgba.g, rgba.b, alpha)
        })
    }
}

/// Local transform of an element: translation, rotation about its own
/// pivot (degrees), and independent axis scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementTransform {
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for ElementTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl ElementTransform {
    /// The full local-to-world affine: scale, then rotate, then translate.
    pub fn affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }
}

/// Geometry kind of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Open or closed polyline through its nodes.
    Path,
    /// Axis-aligned rectangle defined by two corner nodes.
    Rect,
    /// Circle defined by a center node and a radius node.
    Circle,
    /// Single-node text label.
    Text { content: String },
    /// Technical marking (grainline, notch): rendered like a path.
    TechnicalMark,
}

/// Grouping layer for elements. Layers carry no transform of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
}

impl Layer {
    /// The base layer every new element lands on.
    pub fn base() -> Self {
        Self {
            id: "base".to_string(),
            name: "Pattern".to_string(),
            visible: true,
            locked: false,
        }
    }
}

/// The atomic drawable unit of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Ordered nodes; insertion order is drawing order for open paths.
    pub nodes: Vec<PathNode>,
    pub closed: bool,
    pub style: ElementStyle,
    pub transform: ElementTransform,
    pub locked: bool,
    pub visible: bool,
    /// Layer identifier (grouping only).
    pub layer: String,
    /// Human-readable name shown in the object panel.
    pub name: String,
}

impl Element {
    fn base(kind: ElementKind, nodes: Vec<PathNode>, closed: bool, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            nodes,
            closed,
            style: ElementStyle::default(),
            transform: ElementTransform::default(),
            locked: false,
            visible: true,
            layer: "base".to_string(),
            name: name.to_string(),
        }
    }

    /// Create an open path through the given local points.
    pub fn path(points: &[Point]) -> Self {
        let nodes = points.iter().map(|&p| PathNode::new(p)).collect();
        let mut el = Self::base(ElementKind::Path, nodes, false, "Path");
        el.style.fill_color = None;
        el
    }

    /// Create a rectangle from two corner points in local space.
    pub fn rect(p1: Point, p2: Point) -> Self {
        let nodes = vec![PathNode::new(p1), PathNode::new(p2)];
        Self::base(ElementKind::Rect, nodes, true, "Rect")
    }

    /// Create a circle from a center and radius in local space.
    ///
    /// The second node sits on the circumference and defines the radius.
    pub fn circle(center: Point, radius: f64) -> Self {
        let nodes = vec![
            PathNode::new(center),
            PathNode::new(Point::new(center.x + radius, center.y)),
        ];
        Self::base(ElementKind::Circle, nodes, true, "Circle")
    }

    /// Create a single-node text label.
    pub fn text(pos: Point, content: String) -> Self {
        let nodes = vec![PathNode::new(pos)];
        let mut el = Self::base(ElementKind::Text { content }, nodes, false, "Label");
        el.style.fill_color = None;
        el
    }

    /// Create a technical marking along the given local points.
    pub fn technical_mark(points: &[Point]) -> Self {
        let nodes = points
            .iter()
            .map(|&p| {
                let mut node = PathNode::new(p);
                node.technical = true;
                node
            })
            .collect();
        let mut el = Self::base(ElementKind::TechnicalMark, nodes, false, "Marking");
        el.style.fill_color = None;
        el.style.stroke_width = 1.0;
        el
    }

    /// Replace the element's identifier with a fresh one.
    ///
    /// Used when duplicating (e.g. symmetry replication) so copies stay
    /// distinct.
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// World position of a node: local position scaled and translated.
    ///
    /// Rotation is deliberately not applied here; node hit-testing and
    /// bounds share this axis-aligned approximation.
    pub fn node_world_pos(&self, node: &PathNode) -> Point {
        Point::new(
            node.pos.x * self.transform.scale_x + self.transform.x,
            node.pos.y * self.transform.scale_y + self.transform.y,
        )
    }

    /// Axis-aligned world bounds over the scaled-and-translated nodes.
    ///
    /// Rotation is ignored: a rotated element keeps the bounds of its
    /// unrotated footprint. Simple and stable under node editing.
    pub fn world_bounds(&self) -> Option<Rect> {
        let mut nodes = self.nodes.iter();
        let first = self.node_world_pos(nodes.next()?);
        let mut bounds = Rect::from_points(first, first);
        for node in nodes {
            let p = self.node_world_pos(node);
            bounds = bounds.union_pt(p);
        }
        Some(bounds)
    }

    /// Whether the given world point falls inside the element's bounds.
    pub fn contains(&self, world: Point) -> bool {
        self.world_bounds().is_some_and(|b| b.contains(world))
    }

    /// The local-space outline path of this element.
    ///
    /// Text yields an empty path; glyphs are the renderer's concern.
    pub fn to_local_path(&self) -> BezPath {
        match &self.kind {
            ElementKind::Rect => {
                if self.nodes.len() < 2 {
                    return BezPath::new();
                }
                Rect::from_points(self.nodes[0].pos, self.nodes[1].pos).to_path(0.1)
            }
            ElementKind::Circle => {
                if self.nodes.len() < 2 {
                    return BezPath::new();
                }
                let center = self.nodes[0].pos;
                let radius = (self.nodes[1].pos - center).hypot();
                kurbo::Circle::new(center, radius).to_path(0.1)
            }
            ElementKind::Path | ElementKind::TechnicalMark => {
                let mut path = BezPath::new();
                let mut nodes = self.nodes.iter();
                if let Some(first) = nodes.next() {
                    path.move_to(first.pos);
                    for node in nodes {
                        path.line_to(node.pos);
                    }
                    if self.closed {
                        path.close_path();
                    }
                }
                path
            }
            ElementKind::Text { .. } => BezPath::new(),
        }
    }

    /// The world-space outline path: local path through the transform.
    pub fn to_world_path(&self) -> BezPath {
        let mut path = self.to_local_path();
        path.apply_affine(self.transform.affine());
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_has_two_nodes() {
        let rect = Element::rect(Point::new(0.0, 0.0), Point::new(50.0, 30.0));
        assert_eq!(rect.nodes.len(), 2);
        assert!(rect.closed);
        assert!(matches!(rect.kind, ElementKind::Rect));
    }

    #[test]
    fn test_circle_radius_node() {
        let circle = Element::circle(Point::new(10.0, 10.0), 5.0);
        assert_eq!(circle.nodes.len(), 2);
        assert_eq!(circle.nodes[1].pos, Point::new(15.0, 10.0));
    }

    #[test]
    fn test_world_bounds_with_scale_and_translation() {
        let mut rect = Element::rect(Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        rect.transform.scale_x = 2.0;
        rect.transform.x = 5.0;

        let bounds = rect.world_bounds().unwrap();
        assert!((bounds.x0 - 25.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 45.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_world_bounds_ignores_rotation() {
        // Documented approximation: rotating an element does not change its
        // axis-aligned bounds. Rotated elements can therefore be mis-hit by
        // marquee selection; this test pins the behavior.
        let mut rect = Element::rect(Point::new(0.0, 0.0), Point::new(40.0, 10.0));
        let before = rect.world_bounds().unwrap();
        rect.transform.rotation = 90.0;
        let after = rect.world_bounds().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_contains_uses_bounds() {
        let rect = Element::rect(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!(rect.contains(Point::new(50.0, 50.0)));
        assert!(!rect.contains(Point::new(150.0, 50.0)));
    }

    #[test]
    fn test_path_fill_defaults_to_none() {
        let path = Element::path(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert!(path.style.fill_color.is_none());
        assert!(!path.closed);
    }

    #[test]
    fn test_technical_mark_nodes_flagged() {
        let mark = Element::technical_mark(&[Point::new(0.0, 0.0), Point::new(0.0, 10.0)]);
        assert!(mark.nodes.iter().all(|n| n.technical));
        assert!(matches!(mark.kind, ElementKind::TechnicalMark));
    }

    #[test]
    fn test_regenerate_id_changes_identity() {
        let mut el = Element::rect(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let old = el.id;
        el.regenerate_id();
        assert_ne!(el.id, old);
    }

    #[test]
    fn test_local_path_open_vs_closed() {
        let mut path = Element::path(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        let open = path.to_local_path();
        path.closed = true;
        let closed = path.to_local_path();
        assert_eq!(open.elements().len() + 1, closed.elements().len());
    }

    #[test]
    fn test_style_opacity_applied() {
        let style = ElementStyle {
            opacity: 0.5,
            ..ElementStyle::default()
        };
        let stroke = style.stroke_with_opacity().to_rgba8();
        assert_eq!(stroke.a, 127);
    }
}
