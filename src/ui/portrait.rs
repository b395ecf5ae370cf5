//! Stroke geometry for the portrait and partial-path drawing.
//!
//! Coordinates live in a 100 x 140 box with the origin at the bottom-left,
//! matching the canvas bounds used by the renderer.

use crate::animation::Element;

pub const WIDTH: f64 = 100.0;
pub const HEIGHT: f64 = 140.0;

type Point = (f64, f64);
pub type Segment = (Point, Point);

const SUPPORT: &[Point] = &[(1.0, 81.0), (20.0, 84.0), (60.0, 85.0), (99.0, 81.0)];
const CENTER: &[Point] = &[(50.0, 140.0), (50.0, 0.0)];
const FACE: &[Point] = &[
    (10.0, 124.0),
    (10.0, 41.0),
    (37.0, 15.0),
    (63.0, 15.0),
    (91.0, 41.0),
    (91.0, 124.0),
];
const NECK_LEFT: &[Point] = &[(21.0, 4.0), (21.0, 31.0)];
const NECK_RIGHT: &[Point] = &[(80.0, 4.0), (80.0, 31.0)];
const MOUTH: &[Point] = &[(38.0, 41.0), (50.0, 42.0), (63.0, 41.0)];
const CHIN: &[Point] = &[(57.0, 32.0), (45.0, 32.0)];
const NOSE: &[Point] = &[(45.0, 53.0), (57.0, 53.0)];

/// Polyline for a portrait element; `None` for elements that are not strokes.
pub fn stroke(element: Element) -> Option<&'static [Point]> {
    match element {
        Element::SupportStroke => Some(SUPPORT),
        Element::CenterStroke => Some(CENTER),
        Element::FaceOutline => Some(FACE),
        Element::NeckLeft => Some(NECK_LEFT),
        Element::NeckRight => Some(NECK_RIGHT),
        Element::Mouth => Some(MOUTH),
        Element::Chin => Some(CHIN),
        Element::Nose => Some(NOSE),
        Element::InputBox => None,
    }
}

/// Construction strokes are drawn in the muted colour.
pub fn is_muted(element: Element) -> bool {
    matches!(element, Element::SupportStroke | Element::CenterStroke)
}

fn distance(a: Point, b: Point) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

/// The segments covering the first `fraction` of the polyline's length.
///
/// The last segment is cut where the drawn length runs out.
pub fn partial_path(points: &[Point], fraction: f64) -> Vec<Segment> {
    let fraction = fraction.clamp(0.0, 1.0);
    if points.len() < 2 || fraction <= 0.0 {
        return Vec::new();
    }
    if fraction >= 1.0 {
        return points.windows(2).map(|w| (w[0], w[1])).collect();
    }

    let total: f64 = points.windows(2).map(|w| distance(w[0], w[1])).sum();
    let mut remaining = total * fraction;
    let mut segments = Vec::new();

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let len = distance(a, b);
        if remaining >= len {
            segments.push((a, b));
            remaining -= len;
            continue;
        }
        if remaining > 0.0 && len > 0.0 {
            let t = remaining / len;
            segments.push((a, (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)));
        }
        break;
    }
    segments
}
