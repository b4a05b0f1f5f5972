//! Centroid, radius and rotation math over a window of pointer positions.

use std::f64::consts::{PI, TAU};

use crate::util::Point;

/// Distances below this are treated as coincident positions.
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Shape metrics of a point sequence, as seen from its centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwirlMetrics {
    pub centroid: Point,
    /// Mean distance from the centroid.
    pub radius: f64,
    /// Cumulative signed rotation around the centroid, in radians.
    pub rotation: f64,
}

impl SwirlMetrics {
    /// Rotation expressed in turns (absolute value).
    pub fn turns(&self) -> f64 {
        self.rotation.abs() / TAU
    }
}

/// Mean of all positions, or `None` for an empty slice.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Mean Euclidean distance from `center`; zero for an empty slice.
pub fn average_radius(points: &[Point], center: Point) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.distance_to(center)).sum::<f64>() / points.len() as f64
}

/// Wraps an angle difference into `(-π, π]`.
///
/// Non-finite input yields `0.0`.
pub fn normalize_angle(delta: f64) -> f64 {
    if !delta.is_finite() {
        return 0.0;
    }
    let wrapped = delta % TAU;
    if wrapped > PI {
        wrapped - TAU
    } else if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Signed change in bearing from `from` to `to`, measured around `center`.
///
/// Coincident samples, or a sample sitting on the center, have no defined
/// bearing and contribute nothing.
pub fn bearing_delta(center: Point, from: Point, to: Point) -> f64 {
    if from.distance_to(to) < COINCIDENT_EPSILON
        || from.distance_to(center) < COINCIDENT_EPSILON
        || to.distance_to(center) < COINCIDENT_EPSILON
    {
        return 0.0;
    }
    let a1 = (from.y - center.y).atan2(from.x - center.x);
    let a2 = (to.y - center.y).atan2(to.x - center.x);
    normalize_angle(a2 - a1)
}

/// Sum of the wrapped bearing differences of consecutive points.
pub fn cumulative_rotation(points: &[Point], center: Point) -> f64 {
    points
        .windows(2)
        .map(|pair| bearing_delta(center, pair[0], pair[1]))
        .sum()
}

/// Computes centroid, mean radius and cumulative rotation in one pass.
pub fn analyze(points: &[Point]) -> Option<SwirlMetrics> {
    let centroid = centroid(points)?;
    Some(SwirlMetrics {
        centroid,
        radius: average_radius(points, centroid),
        rotation: cumulative_rotation(points, centroid),
    })
}
