//! Symmetry replication for newly finalized elements.
//!
//! Mirroring is about the world origin, not the element's own bounds:
//! symmetric pieces are drafted centered on the origin, with the axes shown
//! as guides.

use crate::element::Element;
use serde::{Deserialize, Serialize};

/// Active symmetry axes for element creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SymmetryMode {
    #[default]
    None,
    /// Mirror across the world Y axis.
    Vertical,
    /// Mirror across the world X axis.
    Horizontal,
    /// Mirror across both axes (three copies).
    Quad,
}

impl SymmetryMode {
    /// Whether the vertical guide axis (x = 0) is active.
    pub fn has_vertical(self) -> bool {
        matches!(self, SymmetryMode::Vertical | SymmetryMode::Quad)
    }

    /// Whether the horizontal guide axis (y = 0) is active.
    pub fn has_horizontal(self) -> bool {
        matches!(self, SymmetryMode::Horizontal | SymmetryMode::Quad)
    }

    /// Produce the mirrored duplicates (0-3) of an element.
    ///
    /// Each duplicate is an independent deep copy with a fresh identifier,
    /// its scale negated on the mirrored axes and its world translation
    /// reflected through the origin.
    pub fn mirrors(self, element: &Element) -> Vec<Element> {
        let mut copies = Vec::new();
        if self.has_vertical() {
            copies.push(mirror(element, -1.0, 1.0, "(V)"));
        }
        if self.has_horizontal() {
            copies.push(mirror(element, 1.0, -1.0, "(H)"));
        }
        if self == SymmetryMode::Quad {
            copies.push(mirror(element, -1.0, -1.0, "(Q)"));
        }
        copies
    }

    /// The original plus its mirrored duplicates, in creation order.
    pub fn replicate(self, element: Element) -> Vec<Element> {
        let copies = self.mirrors(&element);
        let mut result = vec![element];
        result.extend(copies);
        result
    }
}

fn mirror(element: &Element, sx: f64, sy: f64, suffix: &str) -> Element {
    let mut copy = element.clone();
    copy.regenerate_id();
    copy.transform.scale_x *= sx;
    copy.transform.scale_y *= sy;
    if sx < 0.0 {
        copy.transform.x = -copy.transform.x;
    }
    if sy < 0.0 {
        copy.transform.y = -copy.transform.y;
    }
    copy.name = format!("{} {}", element.name, suffix);
    copy
}
