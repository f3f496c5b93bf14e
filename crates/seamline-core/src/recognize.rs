//! Shape recognition for freehand strokes.
//!
//! Classifies a sampled stroke as a circle, a rectangle, or a raw path.
//! Purely an authoring convenience: the result only decides which element
//! kind is synthesized when the stroke finalizes.

use kurbo::Point;

/// Minimum number of samples before attempting recognition.
const MIN_SAMPLES: usize = 15;

/// Circle test: maximum coefficient of variation of centroid distances.
const CIRCLE_CV_THRESHOLD: f64 = 0.15;

/// Rect test: start/end must be within this fraction of max(w, h).
const RECT_CLOSURE_FRACTION: f64 = 0.4;

/// Rect test: edge tolerance band as a fraction of max(w, h).
const RECT_BAND_FRACTION: f64 = 0.15;

/// Rect test: minimum fraction of points inside an edge band.
const RECT_MATCH_FRACTION: f64 = 0.8;

/// Outcome of recognizing a freehand stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecognizedShape {
    Circle { center: Point, radius: f64 },
    Rect { min: Point, max: Point },
    /// The universal fallback: keep the raw point sequence.
    Path,
}

/// Classify a stroke of world-space sample points.
///
/// Never fails: every stroke maps to exactly one variant, with `Path` as
/// the fallback. Deterministic for a given input sequence.
pub fn recognize(points: &[Point]) -> RecognizedShape {
    if points.len() < MIN_SAMPLES {
        return RecognizedShape::Path;
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
        sum_x += p.x;
        sum_y += p.y;
    }
    let n = points.len() as f64;
    let centroid = Point::new(sum_x / n, sum_y / n);
    let width = max_x - min_x;
    let height = max_y - min_y;
    let extent = width.max(height);

    // Circle: centroid distances nearly uniform.
    let distances: Vec<f64> = points.iter().map(|p| (*p - centroid).hypot()).collect();
    let mean = distances.iter().sum::<f64>() / n;
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    if mean > 0.0 && variance.sqrt() / mean < CIRCLE_CV_THRESHOLD {
        return RecognizedShape::Circle {
            center: centroid,
            radius: mean,
        };
    }

    // Rect: a closed-ish loop hugging the bounding-box edges.
    let closure = (points[0] - points[points.len() - 1]).hypot();
    if closure < extent * RECT_CLOSURE_FRACTION {
        let band = extent * RECT_BAND_FRACTION;
        let matching = points
            .iter()
            .filter(|p| {
                (p.x - min_x).abs() < band
                    || (p.x - max_x).abs() < band
                    || (p.y - min_y).abs() < band
                    || (p.y - max_y).abs() < band
            })
            .count();
        if matching as f64 / n > RECT_MATCH_FRACTION {
            return RecognizedShape::Rect {
                min: Point::new(min_x, min_y),
                max: Point::new(max_x, max_y),
            };
        }
    }

    RecognizedShape::Path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn circle_samples(center: Point, radius: f64, count: usize) -> Vec<Point> {
        (0..count)
            .map(|i| {
                let angle = TAU * i as f64 / count as f64;
                Point::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            })
            .collect()
    }

    fn rect_samples(min: Point, max: Point, per_edge: usize) -> Vec<Point> {
        let mut points = Vec::new();
        for i in 0..per_edge {
            let t = i as f64 / per_edge as f64;
            points.push(Point::new(min.x + (max.x - min.x) * t, min.y));
        }
        for i in 0..per_edge {
            let t = i as f64 / per_edge as f64;
            points.push(Point::new(max.x, min.y + (max.y - min.y) * t));
        }
        for i in 0..per_edge {
            let t = i as f64 / per_edge as f64;
            points.push(Point::new(max.x - (max.x - min.x) * t, max.y));
        }
        for i in 0..per_edge {
            let t = i as f64 / per_edge as f64;
            points.push(Point::new(min.x, max.y - (max.y - min.y) * t));
        }
        points
    }

    #[test]
    fn test_short_stroke_is_path() {
        let points: Vec<Point> = (0..10).map(|i| Point::new(i as f64, 0.0)).collect();
        assert_eq!(recognize(&points), RecognizedShape::Path);
    }

    #[test]
    fn test_circle_recognized_with_tight_tolerances() {
        // 40 samples evenly around a radius-50 circle at (100, 100).
        let points = circle_samples(Point::new(100.0, 100.0), 50.0, 40);
        match recognize(&points) {
            RecognizedShape::Circle { center, radius } => {
                assert!((radius - 50.0).abs() < 50.0 * 0.05);
                assert!((center.x - 100.0).abs() < 2.0);
                assert!((center.y - 100.0).abs() < 2.0);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_rect_recognized() {
        let points = rect_samples(Point::new(0.0, 0.0), Point::new(80.0, 40.0), 10);
        match recognize(&points) {
            RecognizedShape::Rect { min, max } => {
                assert_eq!(min, Point::new(0.0, 0.0));
                assert_eq!(max, Point::new(80.0, 40.0));
            }
            other => panic!("expected rect, got {other:?}"),
        }
    }

    #[test]
    fn test_open_scribble_is_path() {
        // A diagonal zigzag: neither circular nor hugging the bbox edges.
        let points: Vec<Point> = (0..30)
            .map(|i| Point::new(i as f64 * 10.0, ((i % 2) as f64) * 40.0 + i as f64 * 5.0))
            .collect();
        assert_eq!(recognize(&points), RecognizedShape::Path);
    }

    #[test]
    fn test_recognition_is_deterministic() {
        let points = circle_samples(Point::new(-30.0, 10.0), 25.0, 24);
        let first = recognize(&points);
        let second = recognize(&points);
        assert_eq!(first, second);
    }
}
