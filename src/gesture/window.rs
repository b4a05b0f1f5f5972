use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::util::Point;

/// A pointer sample with the instant it was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedPoint {
    pub position: Point,
    pub timestamp: Instant,
}

impl TimedPoint {
    pub fn new(position: Point, timestamp: Instant) -> Self {
        Self {
            position,
            timestamp,
        }
    }
}

/// Time-bounded, insertion-ordered buffer of recent samples.
#[derive(Debug, Clone, Default)]
pub struct GestureWindow {
    points: VecDeque<TimedPoint>,
}

impl GestureWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample and drops every sample strictly older than `duration`
    /// relative to it.
    pub fn push(&mut self, point: TimedPoint, duration: Duration) {
        self.points.push_back(point);
        self.prune(point.timestamp, duration);
    }

    /// Removes samples older than `duration` relative to `now`.
    pub fn prune(&mut self, now: Instant, duration: Duration) {
        self.points
            .retain(|p| now.saturating_duration_since(p.timestamp) <= duration);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Positions in insertion order.
    pub fn positions(&self) -> Vec<Point> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedPoint> {
        self.points.iter()
    }

    pub fn oldest(&self) -> Option<&TimedPoint> {
        self.points.front()
    }

    pub fn newest(&self) -> Option<&TimedPoint> {
        self.points.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_prunes_samples_older_than_duration() {
        let start = Instant::now();
        let duration = Duration::from_millis(500);
        let mut window = GestureWindow::new();

        window.push(TimedPoint::new(Point::new(0.0, 0.0), start), duration);
        window.push(
            TimedPoint::new(Point::new(1.0, 0.0), start + Duration::from_millis(300)),
            duration,
        );
        assert_eq!(window.len(), 2);

        window.push(
            TimedPoint::new(Point::new(2.0, 0.0), start + Duration::from_millis(700)),
            duration,
        );
        assert_eq!(window.len(), 2);
        assert_eq!(window.oldest().unwrap().position, Point::new(1.0, 0.0));
        assert_eq!(window.newest().unwrap().position, Point::new(2.0, 0.0));
    }

    #[test]
    fn sample_exactly_at_boundary_is_kept() {
        let start = Instant::now();
        let duration = Duration::from_millis(500);
        let mut window = GestureWindow::new();
        window.push(TimedPoint::new(Point::new(0.0, 0.0), start), duration);
        window.push(TimedPoint::new(Point::new(1.0, 0.0), start + duration), duration);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn out_of_order_timestamp_does_not_panic() {
        let start = Instant::now();
        let duration = Duration::from_millis(500);
        let mut window = GestureWindow::new();
        window.push(
            TimedPoint::new(Point::new(0.0, 0.0), start + Duration::from_millis(100)),
            duration,
        );
        window.push(TimedPoint::new(Point::new(1.0, 0.0), start), duration);
        assert_eq!(window.positions().len(), 2);
    }
}
