//! Recorded pointer traces.
//!
//! A trace is plain text, one sample per line: `<milliseconds> <x> <y>`.
//! Blank lines and lines starting with `#` are skipped.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use super::{PointSource, PointerError};
use crate::gesture::{DetectionSettings, SwirlDetector, SwirlTrigger};
use crate::util::Point;

/// A trigger found while replaying a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayTrigger {
    /// Offset of the sample that completed the swirl.
    pub offset: Duration,
    pub trigger: SwirlTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaySample {
    /// Offset from the start of the recording.
    pub offset: Duration,
    pub position: Point,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayTrace {
    samples: Vec<ReplaySample>,
}

impl ReplayTrace {
    pub fn load(path: &Path) -> Result<Self, PointerError> {
        let text = fs::read_to_string(path).map_err(|source| PointerError::TraceIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, PointerError> {
        let mut samples = Vec::new();
        let mut last_offset = Duration::ZERO;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let number = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [t, x, y] = fields[..] else {
                return Err(PointerError::TraceFormat {
                    line: number,
                    message: format!("expected 3 fields, found {}", fields.len()),
                });
            };

            let millis: f64 = parse_field(t, "time", number)?;
            let x: f64 = parse_field(x, "x", number)?;
            let y: f64 = parse_field(y, "y", number)?;
            if !millis.is_finite() || millis < 0.0 {
                return Err(PointerError::TraceFormat {
                    line: number,
                    message: format!("time must be a non-negative number, got {t}"),
                });
            }

            let offset = Duration::from_nanos((millis * 1_000_000.0).round() as u64);
            if offset < last_offset {
                return Err(PointerError::TraceFormat {
                    line: number,
                    message: "timestamps must not decrease".to_string(),
                });
            }
            last_offset = offset;

            samples.push(ReplaySample {
                offset,
                position: Point::new(x, y),
            });
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[ReplaySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Runs a fresh detector over the trace using the recorded timing.
    ///
    /// Cooldown ends as soon as a later sample reaches `cooldown_until`,
    /// which is what the live loop's scheduler does.
    pub fn detect(&self, settings: DetectionSettings) -> Vec<ReplayTrigger> {
        let start = Instant::now();
        let mut detector = SwirlDetector::new(settings);
        let mut triggers = Vec::new();

        for sample in &self.samples {
            let now = start + sample.offset;
            if detector.cooldown_until().is_some_and(|until| now >= until) {
                detector.end_cooldown();
            }
            if let Some(trigger) = detector.add_point(sample.position, now) {
                triggers.push(ReplayTrigger {
                    offset: sample.offset,
                    trigger,
                });
            }
        }
        triggers
    }

    pub fn into_source(self) -> ReplaySource {
        ReplaySource {
            samples: self.samples.into_iter(),
        }
    }
}

fn parse_field(value: &str, name: &str, line: usize) -> Result<f64, PointerError> {
    value.parse().map_err(|_| PointerError::TraceFormat {
        line,
        message: format!("invalid {name} '{value}'"),
    })
}

/// Yields one recorded position per poll, ignoring the recorded timing.
#[derive(Debug)]
pub struct ReplaySource {
    samples: std::vec::IntoIter<ReplaySample>,
}

impl PointSource for ReplaySource {
    fn poll(&mut self) -> Result<Option<Point>, PointerError> {
        Ok(self.samples.next().map(|sample| sample.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_samples_and_skips_comments() {
        let trace = ReplayTrace::parse("# recorded\n0 10 20\n\n16.5 11 21.5\n").unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.samples()[1].offset, Duration::from_micros(16_500));
        assert_eq!(trace.samples()[1].position, Point::new(11.0, 21.5));
    }

    #[test]
    fn reports_line_of_bad_input() {
        match ReplayTrace::parse("0 1 1\n5 1\n") {
            Err(PointerError::TraceFormat { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(ReplayTrace::parse("0 a 1\n").is_err());
        assert!(ReplayTrace::parse("10 1 1\n5 1 1\n").is_err());
        assert!(ReplayTrace::parse("-1 1 1\n").is_err());
    }

    fn circle_trace(turns: f64, samples: usize, period_ms: f64, radius: f64) -> String {
        (0..samples)
            .map(|i| {
                let theta = turns * std::f64::consts::TAU * i as f64 / samples as f64;
                format!(
                    "{} {} {}\n",
                    i as f64 * period_ms,
                    500.0 + radius * theta.cos(),
                    400.0 + radius * theta.sin()
                )
            })
            .collect()
    }

    #[test]
    fn detect_finds_swirl_in_trace() {
        let trace = ReplayTrace::parse(&circle_trace(2.0, 40, 25.0, 60.0)).unwrap();
        let triggers = trace.detect(DetectionSettings::default());
        assert_eq!(triggers.len(), 1);
        assert!(triggers[0].trigger.turns() >= 1.5);
        assert!((triggers[0].trigger.radius - 60.0).abs() < 5.0);
    }

    #[test]
    fn detect_ends_cooldown_between_swirls() {
        // Two swirls separated by a 3 s pause, longer than the 2.5 s cooldown.
        let mut text = circle_trace(2.0, 40, 25.0, 60.0);
        for line in circle_trace(2.0, 40, 25.0, 60.0).lines() {
            let mut parts = line.split_whitespace();
            let t: f64 = parts.next().unwrap().parse().unwrap();
            let rest: Vec<&str> = parts.collect();
            text.push_str(&format!("{} {}\n", t + 4000.0, rest.join(" ")));
        }
        let trace = ReplayTrace::parse(&text).unwrap();
        assert_eq!(trace.detect(DetectionSettings::default()).len(), 2);
    }

    #[test]
    fn source_yields_positions_in_order() {
        let mut source = ReplayTrace::parse("0 1 2\n10 3 4\n").unwrap().into_source();
        assert_eq!(source.poll().unwrap(), Some(Point::new(1.0, 2.0)));
        assert_eq!(source.poll().unwrap(), Some(Point::new(3.0, 4.0)));
        assert_eq!(source.poll().unwrap(), None);
    }
}
