//! Pattern-block generators: measurement record in, scene elements out.
//!
//! Each generator is a pure function producing the starting geometry of a
//! garment block. The editor appends the result and commits one history
//! entry per invocation.

use crate::element::{Element, NodeKind, PathNode, SerializableColor};
use crate::measurements::Measurements;
use kurbo::Point;

fn node(x: f64, y: f64) -> PathNode {
    PathNode::new(Point::new(x, y))
}

fn smooth(x: f64, y: f64) -> PathNode {
    PathNode::with_kind(Point::new(x, y), NodeKind::Smooth)
}

/// Build a closed pattern piece from drafted nodes.
fn pattern_piece(nodes: Vec<PathNode>, name: &str) -> Element {
    let mut el = Element::path(&[]);
    el.nodes = nodes;
    el.closed = true;
    el.name = name.to_string();
    el.style.stroke_color = SerializableColor::new(79, 70, 229, 255);
    el.style.fill_color = Some(SerializableColor::new(79, 70, 229, 13));
    el.style.stroke_width = 2.0;
    el
}

/// Build an open drafting curve (no fill, not closed).
fn drafting_curve(nodes: Vec<PathNode>, name: &str) -> Element {
    let mut el = pattern_piece(nodes, name);
    el.closed = false;
    el.style.fill_color = None;
    el.style.stroke_color = SerializableColor::indigo();
    el
}

/// Vertical grainline marking: a dashed technical line of the given length.
pub fn grainline(x: f64, y: f64, length: f64) -> Element {
    let mut el = Element::technical_mark(&[Point::new(x, y), Point::new(x, y + length)]);
    el.name = "Grainline".to_string();
    el.style.stroke_color = SerializableColor::indigo();
    el.style.dash = Some(vec![10.0, 5.0]);
    el
}

/// Women's basic bodice front with grainline.
pub fn women_bodice(m: &Measurements) -> Vec<Element> {
    let bust_quarter = m.bust / 4.0 + m.ease / 4.0;
    let waist_quarter = m.waist / 4.0 + 1.5; // with dart allowance
    let neck_width = 3.0;
    let neck_depth = 3.5;
    let shoulder_slope = 1.5;

    let front = vec![
        node(0.0, neck_depth),              // CF neck
        node(neck_width, 0.0),              // HPS
        node(m.shoulder_width, shoulder_slope), // shoulder point
        node(bust_quarter, 8.0),            // armhole bottom
        node(waist_quarter, m.back_length), // waist side
        node(0.0, m.back_length),           // CF waist
    ];

    vec![
        pattern_piece(front, "Bodice Front"),
        grainline(bust_quarter / 2.0, 10.0, m.back_length - 20.0),
    ]
}

/// Women's straight skirt front with grainline.
pub fn women_skirt(m: &Measurements) -> Vec<Element> {
    let waist_quarter = m.waist / 4.0 + 1.25;
    let hip_quarter = m.hip / 4.0 + m.ease / 8.0;
    let hip_depth = 8.0;

    let front = vec![
        node(0.0, 0.0),
        node(waist_quarter, -0.5),
        node(hip_quarter, hip_depth),
        node(hip_quarter, m.skirt_length),
        node(0.0, m.skirt_length),
    ];

    vec![
        pattern_piece(front, "Skirt Front"),
        grainline(hip_quarter / 2.0, 10.0, m.skirt_length - 20.0),
    ]
}

/// Basic pants block; the men's variant carries extra hip ease.
pub fn pants_block(m: &Measurements, mens: bool) -> Vec<Element> {
    let hip_quarter = m.hip / 4.0 + if mens { 1.0 } else { 0.5 };
    let crotch_extension = hip_quarter / 3.0;

    let front = vec![
        node(0.0, 0.0),                            // CF waist
        node(hip_quarter, 0.0),                    // side waist
        node(hip_quarter + 0.5, m.rise),           // side hip
        node(hip_quarter, m.rise + m.inseam),      // hem side
        node(0.0, m.rise + m.inseam),              // hem inseam
        node(-crotch_extension, m.rise),           // crotch point
    ];

    let name = if mens { "Mens Trouser" } else { "Womens Pants" };
    vec![pattern_piece(front, name)]
}

/// Men's dress shirt front with grainline.
pub fn mens_shirt(m: &Measurements) -> Vec<Element> {
    let bust_quarter = m.bust / 4.0 + 2.0; // extra ease for shirts
    let waist_quarter = m.waist / 4.0 + 1.5;
    let hip_quarter = m.hip / 4.0 + 1.5;
    let neck_width = 3.2;
    let neck_depth = 3.5;
    let shoulder_slope = 1.75;

    let front = vec![
        node(0.0, neck_depth),
        node(neck_width, 0.0),
        node(m.shoulder_width + 0.5, shoulder_slope),
        node(bust_quarter, 10.0),
        node(waist_quarter, 18.0),
        node(hip_quarter, 28.0),
        node(0.0, 28.0),
    ];

    vec![
        pattern_piece(front, "Mens Shirt Front"),
        grainline(bust_quarter / 2.0, 5.0, 20.0),
    ]
}

/// Child bodice front (ages 2-16) with grainline.
pub fn child_bodice(m: &Measurements) -> Vec<Element> {
    let bust_quarter = m.bust / 4.0 + 1.0;
    let waist_quarter = m.waist / 4.0 + 1.0;
    let neck_width = 2.5;
    let neck_depth = 2.5;
    let shoulder_slope = 1.0;

    let front = vec![
        node(0.0, neck_depth),
        node(neck_width, 0.0),
        node(m.shoulder_width, shoulder_slope),
        node(bust_quarter, 6.0),
        node(waist_quarter, m.back_length),
        node(0.0, m.back_length),
    ];

    vec![
        pattern_piece(front, "Child Bodice Front"),
        grainline(bust_quarter / 2.0, 2.0, m.back_length - 4.0),
    ]
}

/// French-curve templates used while drafting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrenchCurve {
    Hip,
    Armhole,
    Neckline,
    Crotch,
}

/// A smooth drafting curve for the requested template.
pub fn french_curve(kind: FrenchCurve) -> Vec<Element> {
    let (name, nodes) = match kind {
        FrenchCurve::Hip => (
            "Hip Curve",
            vec![smooth(0.0, 0.0), smooth(2.0, 8.0), smooth(5.0, 24.0)],
        ),
        FrenchCurve::Armhole => (
            "Armhole Curve",
            vec![smooth(0.0, 0.0), smooth(3.0, 4.0), smooth(8.0, 6.0)],
        ),
        FrenchCurve::Neckline => (
            "Neckline Curve",
            vec![smooth(0.0, 0.0), smooth(4.0, 3.0), smooth(8.0, 0.0)],
        ),
        FrenchCurve::Crotch => (
            "Crotch Curve",
            vec![smooth(0.0, 0.0), smooth(2.0, 5.0), smooth(8.0, 8.0)],
        ),
    };
    vec![drafting_curve(nodes, name)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    #[test]
    fn test_bodice_piece_and_grainline() {
        let elements = women_bodice(&Measurements::default());
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].nodes.len(), 6);
        assert!(elements[0].closed);
        assert!(matches!(elements[1].kind, ElementKind::TechnicalMark));
        assert_eq!(elements[1].style.dash, Some(vec![10.0, 5.0]));
    }

    #[test]
    fn test_bodice_scales_with_bust() {
        let slim = Measurements {
            bust: 32.0,
            ..Measurements::default()
        };
        let wide = Measurements {
            bust: 44.0,
            ..Measurements::default()
        };
        let slim_width = women_bodice(&slim)[0].world_bounds().unwrap().width();
        let wide_width = women_bodice(&wide)[0].world_bounds().unwrap().width();
        assert!(wide_width > slim_width);
    }

    #[test]
    fn test_pants_crotch_extends_past_center_front() {
        let elements = pants_block(&Measurements::default(), false);
        let bounds = elements[0].world_bounds().unwrap();
        assert!(bounds.x0 < 0.0);
    }

    #[test]
    fn test_mens_variant_is_wider() {
        let m = Measurements::default();
        let womens = pants_block(&m, false)[0].world_bounds().unwrap();
        let mens = pants_block(&m, true)[0].world_bounds().unwrap();
        assert!(mens.width() > womens.width());
    }

    #[test]
    fn test_french_curves_are_open_smooth_paths() {
        for kind in [
            FrenchCurve::Hip,
            FrenchCurve::Armhole,
            FrenchCurve::Neckline,
            FrenchCurve::Crotch,
        ] {
            let elements = french_curve(kind);
            assert_eq!(elements.len(), 1);
            assert!(!elements[0].closed);
            assert!(elements[0].style.fill_color.is_none());
            assert!(elements[0].nodes.iter().all(|n| n.kind == NodeKind::Smooth));
        }
    }
}
