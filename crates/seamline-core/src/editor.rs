//! The editing session: tools, selection and the pointer state machine.
//!
//! All pointer handling runs in gesture order (down, move*, up) on one
//! thread; at most one session is active at a time. Mutating gestures
//! change the live scene on every move for responsiveness and commit one
//! history snapshot at pointer-up.

use crate::camera::Camera;
use crate::element::{Element, ElementId, ElementStyle, Layer, NodeId};
use crate::history::History;
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::measurements::Measurements;
use crate::recognize::{RecognizedShape, recognize};
use crate::scene::{Scene, selection_bounds};
use crate::snap::snap_point;
use crate::symmetry::SymmetryMode;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Hit radius of transform handles, in screen pixels.
pub const HANDLE_HIT_RADIUS: f64 = 12.0;

/// Hit radius of path nodes under the node tool, in screen pixels.
pub const NODE_HIT_RADIUS: f64 = 10.0;

/// Eraser radius, in screen pixels.
pub const ERASER_RADIUS: f64 = 15.0;

/// Screen-pixel offset of the rotate handle above the selection top edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 30.0;

/// Minimum pencil samples before a stroke produces an element.
const MIN_STROKE_POINTS: usize = 3;

/// The active drafting tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Select,
    Node,
    Pencil,
    Eraser,
    Rect,
    Circle,
    Text,
    Pan,
}

/// The five transform handles around a selection, in their fixed
/// hit-test order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Rotate,
}

/// World-space positions of the five selection handles.
pub fn handle_positions(bounds: Rect, zoom: f64) -> [(TransformHandle, Point); 5] {
    [
        (TransformHandle::TopLeft, Point::new(bounds.x0, bounds.y0)),
        (TransformHandle::TopRight, Point::new(bounds.x1, bounds.y0)),
        (TransformHandle::BottomLeft, Point::new(bounds.x0, bounds.y1)),
        (
            TransformHandle::BottomRight,
            Point::new(bounds.x1, bounds.y1),
        ),
        (
            TransformHandle::Rotate,
            Point::new(
                bounds.center().x,
                bounds.y0 - ROTATE_HANDLE_OFFSET / zoom,
            ),
        ),
    ]
}

/// Which handle (if any) a world point hits. Handles are tested in the
/// fixed order tl, tr, bl, br, rotate; the first match wins when radii
/// overlap.
pub fn hit_handle(bounds: Rect, world: Point, zoom: f64) -> Option<TransformHandle> {
    let radius = HANDLE_HIT_RADIUS / zoom;
    handle_positions(bounds, zoom)
        .into_iter()
        .find(|(_, pos)| (world - *pos).hypot() < radius)
        .map(|(handle, _)| handle)
}

/// State captured when a transform handle drag begins.
#[derive(Debug, Clone)]
struct TransformSession {
    handle: TransformHandle,
    /// Selection bounds at session start.
    start_bounds: Rect,
    /// Pointer world position at session start.
    start_mouse: Point,
    /// Deep copies of the selected elements at session start.
    initial: Vec<Element>,
}

/// The cross-cutting pointer session; at most one is active.
#[derive(Debug, Clone, Default)]
enum Session {
    #[default]
    Idle,
    Panning {
        last_screen: Point,
    },
    Transform(TransformSession),
    NodeDrag {
        element: ElementId,
        node: NodeId,
        last_world: Point,
    },
    Marquee {
        start: Point,
        end: Point,
        additive: bool,
    },
    MoveSelection {
        last_world: Point,
        moved: bool,
    },
    Drawing {
        points: Vec<Point>,
    },
    Placing {
        element: ElementId,
    },
    Erasing {
        changed: bool,
    },
}

/// The complete editing session state.
///
/// Owns the scene and its history exclusively; nothing mutates them behind
/// the editor's back.
#[derive(Debug)]
pub struct Editor {
    pub scene: Scene,
    pub camera: Camera,
    history: History,
    tool: Tool,
    selection: Vec<ElementId>,
    pub symmetry: SymmetryMode,
    pub snap_to_grid: bool,
    /// When enabled, pencil strokes run shape recognition on release.
    pub shape_assist: bool,
    /// Style applied to newly created elements.
    pub current_style: ElementStyle,
    pub measurements: Measurements,
    pub layers: Vec<Layer>,
    session: Session,
    pending_text: Option<Point>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an editor with an empty scene.
    pub fn new() -> Self {
        let scene = Scene::new();
        let history = History::new(scene.snapshot());
        Self {
            scene,
            camera: Camera::new(),
            history,
            tool: Tool::default(),
            selection: Vec::new(),
            symmetry: SymmetryMode::default(),
            snap_to_grid: true,
            shape_assist: true,
            current_style: ElementStyle::default(),
            measurements: Measurements::default(),
            layers: vec![Layer::base()],
            session: Session::Idle,
            pending_text: None,
        }
    }

    /// The active tool.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, abandoning any in-flight gesture.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.session = Session::Idle;
    }

    /// The selected element ids.
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Check if an element is selected.
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    /// Select a single element, replacing the previous selection.
    pub fn select(&mut self, id: ElementId) {
        self.selection.clear();
        self.selection.push(id);
    }

    /// Add an element to the selection.
    pub fn add_to_selection(&mut self, id: ElementId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// World bounds of the current selection, recomputed on demand.
    pub fn selection_bounds(&self) -> Option<Rect> {
        selection_bounds(&self.scene, &self.selection)
    }

    /// The undo/redo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The in-progress marquee rectangle, if any.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.session {
            Session::Marquee { start, end, .. } => Some(Rect::from_points(*start, *end)),
            _ => None,
        }
    }

    /// The accumulated freehand stroke, if a drawing session is active.
    pub fn stroke_preview(&self) -> &[Point] {
        match &self.session {
            Session::Drawing { points } => points,
            _ => &[],
        }
    }

    /// Where a text label placement is waiting for its content.
    pub fn pending_text(&self) -> Option<Point> {
        self.pending_text
    }

    /// Route a pointer event to the state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
        }
    }

    /// Begin a gesture at a screen position.
    pub fn pointer_down(&mut self, screen: Point, button: MouseButton, mods: Modifiers) {
        let world_raw = self.camera.screen_to_world(screen);
        let world = snap_point(world_raw, self.snap_to_grid);

        if button == MouseButton::Middle || self.tool == Tool::Pan {
            self.session = Session::Panning {
                last_screen: screen,
            };
            return;
        }
        if button != MouseButton::Left {
            return;
        }

        match self.tool {
            Tool::Node => {
                if let Some((element, node)) = self.node_under(world_raw) {
                    self.session = Session::NodeDrag {
                        element,
                        node,
                        last_world: world_raw,
                    };
                } else {
                    self.click_select(world_raw, mods);
                }
            }
            Tool::Select => {
                if let Some(bounds) = self.selection_bounds() {
                    if let Some(handle) = hit_handle(bounds, world_raw, self.camera.zoom) {
                        let initial = self
                            .selection
                            .iter()
                            .filter_map(|id| self.scene.get(*id).cloned())
                            .collect();
                        self.session = Session::Transform(TransformSession {
                            handle,
                            start_bounds: bounds,
                            start_mouse: world_raw,
                            initial,
                        });
                        return;
                    }
                }
                if let Some(hit) = self.scene.topmost_at(world_raw) {
                    if !self.is_selected(hit) {
                        if mods.shift {
                            self.add_to_selection(hit);
                        } else {
                            self.select(hit);
                        }
                    }
                    self.session = Session::MoveSelection {
                        last_world: world,
                        moved: false,
                    };
                } else {
                    if !mods.shift {
                        self.clear_selection();
                    }
                    self.session = Session::Marquee {
                        start: world_raw,
                        end: world_raw,
                        additive: mods.shift,
                    };
                }
            }
            Tool::Pencil => {
                self.session = Session::Drawing {
                    points: vec![world_raw],
                };
            }
            Tool::Eraser => {
                let changed = self.erase_at(world_raw);
                self.session = Session::Erasing { changed };
            }
            Tool::Rect | Tool::Circle => {
                let mut element = if self.tool == Tool::Rect {
                    Element::rect(world, world)
                } else {
                    Element::circle(world, 0.0)
                };
                element.style = self.current_style.clone();
                let id = element.id;
                self.scene.push(element);
                self.select(id);
                self.session = Session::Placing { element: id };
            }
            Tool::Text => {
                // Two-phase placement: the application resolves the label
                // asynchronously via resolve_pending_text.
                self.pending_text = Some(world);
            }
            Tool::Pan => {}
        }
    }

    /// Continue the active gesture at a screen position.
    pub fn pointer_move(&mut self, screen: Point) {
        let world_raw = self.camera.screen_to_world(screen);
        let world = snap_point(world_raw, self.snap_to_grid);

        match &mut self.session {
            Session::Idle => {}
            Session::Panning { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                self.camera.pan(delta);
            }
            Session::Transform(ts) => {
                apply_transform(&mut self.scene, ts, world_raw);
            }
            Session::NodeDrag {
                element,
                node,
                last_world,
            } => {
                let delta = world_raw - *last_world;
                *last_world = world_raw;
                let (id, node_id) = (*element, *node);
                if let Some(el) = self.scene.get_mut(id) {
                    let sx = el.transform.scale_x;
                    let sy = el.transform.scale_y;
                    if sx.abs() > f64::EPSILON && sy.abs() > f64::EPSILON {
                        if let Some(n) = el.nodes.iter_mut().find(|n| n.id == node_id) {
                            // Divide by the element scale so the node tracks
                            // the cursor regardless of how the element is
                            // scaled.
                            n.pos.x += delta.x / sx;
                            n.pos.y += delta.y / sy;
                        }
                    }
                }
            }
            Session::Marquee { end, .. } => {
                *end = world_raw;
            }
            Session::MoveSelection { last_world, moved } => {
                let delta = world - *last_world;
                if delta.x != 0.0 || delta.y != 0.0 {
                    *last_world = world;
                    *moved = true;
                    for id in &self.selection {
                        if let Some(el) = self.scene.get_mut(*id) {
                            el.transform.x += delta.x;
                            el.transform.y += delta.y;
                        }
                    }
                }
            }
            Session::Drawing { points } => {
                points.push(world_raw);
            }
            Session::Placing { element } => {
                let id = *element;
                if let Some(el) = self.scene.get_mut(id) {
                    if let Some(second) = el.nodes.get_mut(1) {
                        second.pos = world;
                    }
                }
            }
            Session::Erasing { changed } => {
                let radius = ERASER_RADIUS / self.camera.zoom;
                *changed |= self.scene.erase_within(world_raw, radius);
            }
        }

        if matches!(self.session, Session::Erasing { .. }) {
            self.selection.retain(|id| self.scene.get(*id).is_some());
        }
    }

    /// Finish the active gesture.
    pub fn pointer_up(&mut self) {
        match std::mem::take(&mut self.session) {
            Session::Idle | Session::Panning { .. } => {}
            Session::Marquee {
                start,
                end,
                additive,
            } => {
                let hits = self.scene.contained_in(Rect::from_points(start, end));
                if additive {
                    for id in hits {
                        self.add_to_selection(id);
                    }
                } else {
                    self.selection = hits;
                }
            }
            Session::Drawing { points } => {
                self.finalize_stroke(points);
            }
            Session::Placing { element } => {
                if let Some(placed) = self.scene.get(element).cloned() {
                    let mirrors = self.symmetry.mirrors(&placed);
                    self.scene.extend(mirrors);
                }
                self.commit();
            }
            Session::Transform(_) | Session::NodeDrag { .. } => {
                self.commit();
            }
            Session::MoveSelection { moved, .. } => {
                if moved {
                    self.commit();
                }
            }
            Session::Erasing { changed } => {
                if changed {
                    self.selection.retain(|id| self.scene.get(*id).is_some());
                    self.commit();
                }
            }
        }
    }

    /// Resolve a pending text placement with its label.
    ///
    /// `None` (or an empty label) cancels the placement.
    pub fn resolve_pending_text(&mut self, label: Option<String>) {
        let Some(at) = self.pending_text.take() else {
            return;
        };
        let Some(content) = label.filter(|l| !l.is_empty()) else {
            return;
        };
        let mut element = Element::text(at, content);
        element.style.stroke_color = self.current_style.stroke_color;
        self.scene.extend(self.symmetry.replicate(element));
        self.commit();
    }

    /// Step the scene back one history entry. Clears the selection.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                let snapshot = snapshot.clone();
                self.scene.restore(snapshot);
                self.selection.clear();
                log::debug!("undo to history entry {}", self.history.cursor());
                true
            }
            None => false,
        }
    }

    /// Step the scene forward one history entry. Clears the selection.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                let snapshot = snapshot.clone();
                self.scene.restore(snapshot);
                self.selection.clear();
                log::debug!("redo to history entry {}", self.history.cursor());
                true
            }
            None => false,
        }
    }

    /// Delete the selected elements and commit.
    pub fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        for id in std::mem::take(&mut self.selection) {
            self.scene.remove(id);
        }
        self.commit();
    }

    /// Remove every element and commit.
    pub fn clear_scene(&mut self) {
        if self.scene.is_empty() {
            return;
        }
        self.scene.clear();
        self.selection.clear();
        self.commit();
    }

    /// Append generator output to the scene, committing exactly once.
    pub fn append_generated(&mut self, elements: Vec<Element>) {
        log::debug!("appending {} generated elements", elements.len());
        self.scene.extend(elements);
        self.commit();
    }

    fn commit(&mut self) {
        self.history.commit(self.scene.snapshot());
        log::debug!("history commit ({} entries)", self.history.len());
    }

    fn click_select(&mut self, world: Point, mods: Modifiers) {
        if let Some(hit) = self.scene.topmost_at(world) {
            if !self.is_selected(hit) {
                if mods.shift {
                    self.add_to_selection(hit);
                } else {
                    self.select(hit);
                }
            }
        } else if !mods.shift {
            self.clear_selection();
        }
    }

    /// Find a node of a selected element under the pointer, topmost first.
    fn node_under(&self, world: Point) -> Option<(ElementId, NodeId)> {
        let radius = NODE_HIT_RADIUS / self.camera.zoom;
        for el in self.scene.iter().rev() {
            if !self.is_selected(el.id) {
                continue;
            }
            for node in &el.nodes {
                if (el.node_world_pos(node) - world).hypot() < radius {
                    return Some((el.id, node.id));
                }
            }
        }
        None
    }

    fn erase_at(&mut self, world: Point) -> bool {
        let radius = ERASER_RADIUS / self.camera.zoom;
        let changed = self.scene.erase_within(world, radius);
        if changed {
            self.selection.retain(|id| self.scene.get(*id).is_some());
        }
        changed
    }

    /// Turn a finished pencil stroke into an element, applying shape
    /// recognition and symmetry replication.
    fn finalize_stroke(&mut self, points: Vec<Point>) {
        if points.len() < MIN_STROKE_POINTS {
            return;
        }
        let recognized = if self.shape_assist {
            recognize(&points)
        } else {
            RecognizedShape::Path
        };
        let mut element = match recognized {
            RecognizedShape::Circle { center, radius } => Element::circle(center, radius),
            RecognizedShape::Rect { min, max } => Element::rect(min, max),
            RecognizedShape::Path => Element::path(&points),
        };
        element.style = self.current_style.clone();
        if matches!(recognized, RecognizedShape::Path) {
            element.style.fill_color = None;
        }
        log::debug!("stroke of {} points finalized as {:?}", points.len(), recognized);
        self.scene.extend(self.symmetry.replicate(element));
        self.commit();
    }
}

/// Apply an in-flight transform session to the live scene.
fn apply_transform(scene: &mut Scene, ts: &TransformSession, world: Point) {
    let bounds = ts.start_bounds;
    let (w, h) = (bounds.width(), bounds.height());
    let center = bounds.center();

    match ts.handle {
        TransformHandle::Rotate => {
            let angle = (world.y - center.y).atan2(world.x - center.x).to_degrees() + 90.0;
            for initial in &ts.initial {
                let Some(el) = scene.get_mut(initial.id) else {
                    continue;
                };
                let delta = (angle - initial.transform.rotation).to_radians();
                let (sin, cos) = delta.sin_cos();
                let dx = initial.transform.x - center.x;
                let dy = initial.transform.y - center.y;
                el.transform.rotation = angle;
                el.transform.x = center.x + dx * cos - dy * sin;
                el.transform.y = center.y + dx * sin + dy * cos;
            }
        }
        TransformHandle::BottomRight | TransformHandle::TopLeft => {
            if w < f64::EPSILON || h < f64::EPSILON {
                return;
            }
            let drag = world - ts.start_mouse;
            let (sx, sy, pivot) = if ts.handle == TransformHandle::BottomRight {
                // Anchor the opposite (top-left) corner.
                (
                    (w + drag.x) / w,
                    (h + drag.y) / h,
                    Point::new(bounds.x0, bounds.y0),
                )
            } else {
                (
                    (w - drag.x) / w,
                    (h - drag.y) / h,
                    Point::new(bounds.x1, bounds.y1),
                )
            };
            for initial in &ts.initial {
                let Some(el) = scene.get_mut(initial.id) else {
                    continue;
                };
                el.transform.scale_x = initial.transform.scale_x * sx;
                el.transform.scale_y = initial.transform.scale_y * sy;
                el.transform.x = pivot.x + (initial.transform.x - pivot.x) * sx;
                el.transform.y = pivot.y + (initial.transform.y - pivot.y) * sy;
            }
        }
        // Corner scaling is only wired up for br/tl.
        TransformHandle::TopRight | TransformHandle::BottomLeft => {}
    }
}
