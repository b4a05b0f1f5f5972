//! Multi-click detection for backends that only report individual presses.

use std::time::{Duration, Instant};

use crate::util::Point;

/// Maximum delay between presses that still counts as the same click sequence.
pub const MULTI_CLICK_INTERVAL: Duration = Duration::from_millis(400);
/// Maximum pointer travel between presses of the same sequence.
pub const MULTI_CLICK_RADIUS: f64 = 4.0;

/// Counts consecutive presses of the primary button.
#[derive(Debug, Clone, Default)]
pub struct ClickCounter {
    last: Option<(Point, Instant)>,
    count: u32,
}

impl ClickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a press and returns its click count (1 for a single click).
    pub fn press(&mut self, position: Point, now: Instant) -> u32 {
        let continues = self.last.is_some_and(|(prev, at)| {
            now.saturating_duration_since(at) <= MULTI_CLICK_INTERVAL
                && prev.distance_to(position) <= MULTI_CLICK_RADIUS
        });
        self.count = if continues { self.count + 1 } else { 1 };
        self.last = Some((position, now));
        self.count
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_presses_in_place_count_up() {
        let start = Instant::now();
        let mut counter = ClickCounter::new();
        assert_eq!(counter.press(Point::new(10.0, 10.0), start), 1);
        assert_eq!(
            counter.press(Point::new(11.0, 10.0), start + Duration::from_millis(200)),
            2
        );
    }

    #[test]
    fn slow_or_distant_presses_restart() {
        let start = Instant::now();
        let mut counter = ClickCounter::new();
        counter.press(Point::new(10.0, 10.0), start);
        assert_eq!(
            counter.press(Point::new(10.0, 10.0), start + Duration::from_millis(900)),
            1
        );
        assert_eq!(
            counter.press(Point::new(40.0, 10.0), start + Duration::from_millis(1000)),
            1
        );
    }
}
