use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use swirlcap::gesture::{DetectionSettings, SwirlDetector};
use swirlcap::input::Key;
use swirlcap::selection::{
    EditorEvent, EditorOutcome, HandlePosition, RegionEditor, SELECTION_PADDING, SelectionRect,
    hit_test,
};
use swirlcap::util::Point;

/// `count` samples of a circle, one every `period`, starting at `start`.
fn circle(
    center: Point,
    radius: f64,
    turns: f64,
    count: usize,
    period: Duration,
    start: Instant,
) -> Vec<(Point, Instant)> {
    (0..count)
        .map(|i| {
            let theta = turns * TAU * i as f64 / count as f64;
            (
                Point::new(
                    center.x + radius * theta.cos(),
                    center.y + radius * theta.sin(),
                ),
                start + period * i as u32,
            )
        })
        .collect()
}

#[test]
fn wide_fast_swirl_opens_a_padded_region() {
    let mut detector = SwirlDetector::new(DetectionSettings::default());
    let samples = circle(
        Point::new(500.0, 400.0),
        50.0,
        2.0,
        40,
        Duration::from_millis(25),
        Instant::now(),
    );

    let triggers: Vec<_> = samples
        .iter()
        .filter_map(|(p, t)| detector.add_point(*p, *t))
        .collect();
    assert_eq!(triggers.len(), 1);
    let trigger = &triggers[0];
    assert!(trigger.turns() >= 1.5);
    assert!(detector.is_cooling_down());

    let rect = SelectionRect::bounding(&trigger.points, SELECTION_PADDING).unwrap();
    assert!(rect.width >= 100.0 + 2.0 * SELECTION_PADDING - 1.0);
    assert!(rect.contains(Point::new(500.0, 400.0)));
}

#[test]
fn slow_circle_never_fires() {
    // One turn spread over four seconds: the window never holds enough rotation.
    let mut detector = SwirlDetector::new(DetectionSettings::default());
    let samples = circle(
        Point::new(300.0, 300.0),
        80.0,
        1.0,
        80,
        Duration::from_millis(50),
        Instant::now(),
    );
    assert!(
        samples
            .iter()
            .all(|(p, t)| detector.add_point(*p, *t).is_none())
    );
}

#[test]
fn dragging_top_left_past_minimum_pins_bottom_right() {
    let rect = SelectionRect::new(100.0, 100.0, 200.0, 150.0);
    let mut editor = RegionEditor::new(rect);

    assert_eq!(
        hit_test(&rect, Point::new(100.0, 100.0)),
        Some(HandlePosition::TopLeft)
    );
    editor.handle(EditorEvent::PointerDown {
        position: Point::new(100.0, 100.0),
        click_count: 1,
    });
    editor.handle(EditorEvent::PointerDrag {
        position: Point::new(400.0, 400.0),
    });

    let dragged = editor.rect();
    assert_eq!(dragged.width, 10.0);
    assert_eq!(dragged.height, 10.0);
    assert_eq!(dragged.right(), 300.0);
    assert_eq!(dragged.bottom(), 250.0);
}

#[test]
fn return_confirms_and_escape_cancels() {
    let rect = SelectionRect::new(10.0, 20.0, 300.0, 200.0);

    let mut confirmed = RegionEditor::new(rect);
    confirmed.handle(EditorEvent::Key(Key::Return));
    assert_eq!(
        confirmed.take_outcome(),
        Some(EditorOutcome::Confirmed(rect))
    );
    assert_eq!(confirmed.take_outcome(), None);

    let mut cancelled = RegionEditor::new(rect);
    cancelled.handle(EditorEvent::Key(Key::Escape));
    assert_eq!(cancelled.take_outcome(), Some(EditorOutcome::Cancelled));
}
