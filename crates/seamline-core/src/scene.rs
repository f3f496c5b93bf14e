//! Scene document: the ordered element sequence being drafted.

use crate::element::{Element, ElementId};
use kurbo::{Point, Rect};
use std::sync::Arc;

/// A snapshot of the element sequence, shared structurally with the live
/// scene until either side mutates.
pub type SceneSnapshot = Vec<Arc<Element>>;

/// The scene being edited.
///
/// Elements are kept in render order: later elements draw on top and win
/// hit-tests on overlap. There is no nesting.
///
/// Internally elements live behind `Arc` so history snapshots are cheap;
/// every mutation goes through [`Arc::make_mut`], which copies an element
/// the first time it diverges from a snapshot. Snapshots therefore stay
/// observably deep-independent from the live scene.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Document name.
    pub name: String,
    elements: Vec<Arc<Element>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            name: "Untitled".to_string(),
            elements: Vec::new(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append an element on top of the render order.
    pub fn push(&mut self, element: Element) {
        self.elements.push(Arc::new(element));
    }

    /// Append several elements, preserving their order.
    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements.into_iter().map(Arc::new));
    }

    /// Remove an element by id.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|el| el.id == id)?;
        let removed = self.elements.remove(index);
        Some(Arc::unwrap_or_clone(removed))
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Get an element by id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id).map(|el| &**el)
    }

    /// Get a mutable reference to an element by id.
    ///
    /// Detaches the element from any history snapshot still sharing it.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements
            .iter_mut()
            .find(|el| el.id == id)
            .map(Arc::make_mut)
    }

    /// Iterate over elements in render order (back to front).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.elements.iter().map(|el| &**el)
    }

    /// Iterate mutably over elements in render order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut().map(Arc::make_mut)
    }

    /// Find the topmost selectable element whose bounds contain a world
    /// point.
    ///
    /// Elements are tested front to back (reverse render order); locked and
    /// hidden elements are skipped.
    pub fn topmost_at(&self, world: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|el| !el.locked && el.visible && el.contains(world))
            .map(|el| el.id)
    }

    /// Ids of selectable elements whose bounds lie fully inside a world
    /// rectangle (containment, not intersection).
    pub fn contained_in(&self, rect: Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|el| !el.locked && el.visible)
            .filter(|el| {
                el.world_bounds().is_some_and(|b| {
                    b.x0 >= rect.x0 && b.x1 <= rect.x1 && b.y0 >= rect.y0 && b.y1 <= rect.y1
                })
            })
            .map(|el| el.id)
            .collect()
    }

    /// Union of the world bounds of all elements.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for el in self.iter() {
            if let Some(b) = el.world_bounds() {
                result = Some(match result {
                    Some(r) => r.union(b),
                    None => b,
                });
            }
        }
        result
    }

    /// Remove every node within `radius` of a world point.
    ///
    /// An element that lost nodes and has fewer than two remaining is
    /// deleted entirely; untouched elements are never deleted. Returns
    /// whether anything changed.
    pub fn erase_within(&mut self, center: Point, radius: f64) -> bool {
        let mut changed = false;
        self.elements.retain_mut(|el| {
            let hit: Vec<usize> = el
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| (el.node_world_pos(n) - center).hypot() < radius)
                .map(|(i, _)| i)
                .collect();
            if hit.is_empty() {
                return true;
            }
            changed = true;
            if el.nodes.len() - hit.len() < 2 {
                return false;
            }
            let el = Arc::make_mut(el);
            let mut index = 0;
            el.nodes.retain(|_| {
                let keep = !hit.contains(&index);
                index += 1;
                keep
            });
            true
        });
        changed
    }

    /// Take a structural-sharing snapshot of the element sequence.
    pub fn snapshot(&self) -> SceneSnapshot {
        self.elements.clone()
    }

    /// Replace the element sequence from a snapshot.
    pub fn restore(&mut self, snapshot: SceneSnapshot) {
        self.elements = snapshot;
    }
}

/// Axis-aligned world bounds of a selection: union of the selected
/// elements' bounds. `None` when the selection is empty or resolves to no
/// geometry. Recomputed on demand, never stored.
pub fn selection_bounds(scene: &Scene, selection: &[ElementId]) -> Option<Rect> {
    let mut result: Option<Rect> = None;
    for &id in selection {
        let Some(b) = scene.get(id).and_then(|el| el.world_bounds()) else {
            continue;
        };
        result = Some(match result {
            Some(r) => r.union(b),
            None => b,
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_at(x0: f64, y0: f64, x1: f64, y1: f64) -> Element {
        Element::rect(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn test_push_and_get() {
        let mut scene = Scene::new();
        let rect = rect_at(0.0, 0.0, 100.0, 100.0);
        let id = rect.id;
        scene.push(rect);
        assert_eq!(scene.len(), 1);
        assert!(scene.get(id).is_some());
    }

    #[test]
    fn test_remove() {
        let mut scene = Scene::new();
        let rect = rect_at(0.0, 0.0, 100.0, 100.0);
        let id = rect.id;
        scene.push(rect);
        assert!(scene.remove(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.remove(id).is_none());
    }

    #[test]
    fn test_topmost_wins_hit_test() {
        let mut scene = Scene::new();
        let below = rect_at(0.0, 0.0, 100.0, 100.0);
        let above = rect_at(50.0, 50.0, 150.0, 150.0);
        let below_id = below.id;
        let above_id = above.id;
        scene.push(below);
        scene.push(above);

        // Overlap region: the later element wins.
        assert_eq!(scene.topmost_at(Point::new(75.0, 75.0)), Some(above_id));
        assert_eq!(scene.topmost_at(Point::new(25.0, 25.0)), Some(below_id));
        assert_eq!(scene.topmost_at(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_locked_elements_skip_hit_test() {
        let mut scene = Scene::new();
        let mut rect = rect_at(0.0, 0.0, 100.0, 100.0);
        rect.locked = true;
        scene.push(rect);
        assert_eq!(scene.topmost_at(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_contained_in_requires_containment() {
        let mut scene = Scene::new();
        let inside = rect_at(10.0, 10.0, 20.0, 20.0);
        let straddling = rect_at(40.0, 40.0, 80.0, 80.0);
        let inside_id = inside.id;
        scene.push(inside);
        scene.push(straddling);

        let hits = scene.contained_in(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(hits, vec![inside_id]);
    }

    #[test]
    fn test_snapshot_is_independent_of_mutation() {
        let mut scene = Scene::new();
        let rect = rect_at(0.0, 0.0, 10.0, 10.0);
        let id = rect.id;
        scene.push(rect);

        let snapshot = scene.snapshot();
        scene.get_mut(id).unwrap().transform.x = 99.0;

        assert!((snapshot[0].transform.x).abs() < f64::EPSILON);
        assert!((scene.get(id).unwrap().transform.x - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_erase_removes_nodes_and_empty_elements() {
        let mut scene = Scene::new();
        let path = Element::path(&[
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(200.0, 0.0),
        ]);
        let id = path.id;
        scene.push(path);

        assert!(scene.erase_within(Point::new(0.0, 0.0), 15.0));
        assert_eq!(scene.get(id).unwrap().nodes.len(), 2);

        // Removing one more drops the element below two nodes.
        assert!(scene.erase_within(Point::new(100.0, 0.0), 15.0));
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn test_erase_leaves_untouched_single_node_elements() {
        let mut scene = Scene::new();
        let label = Element::text(Point::new(500.0, 500.0), "FRONT".to_string());
        let id = label.id;
        scene.push(label);

        assert!(!scene.erase_within(Point::new(0.0, 0.0), 15.0));
        assert!(scene.get(id).is_some());
    }

    #[test]
    fn test_selection_bounds_center() {
        let mut scene = Scene::new();
        let a = rect_at(0.0, 0.0, 10.0, 10.0);
        let b = rect_at(30.0, 30.0, 50.0, 70.0);
        let ids = vec![a.id, b.id];
        scene.push(a);
        scene.push(b);

        let bounds = selection_bounds(&scene, &ids).unwrap();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 50.0, 70.0));
        let center = bounds.center();
        assert!((center.x - (bounds.x0 + bounds.x1) / 2.0).abs() < f64::EPSILON);
        assert!((center.y - (bounds.y0 + bounds.y1) / 2.0).abs() < f64::EPSILON);

        assert!(selection_bounds(&scene, &[]).is_none());
    }
}
