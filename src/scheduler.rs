//! Cancellable one-shot timers driven by the event loop.
//!
//! The scheduler never sleeps or spawns anything: the owner asks for
//! [`Scheduler::next_deadline`] to size its poll timeout and drains due tasks
//! with [`Scheduler::take_due`].

use std::time::{Duration, Instant};

/// Handle returned by [`Scheduler::schedule`], used to cancel a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TaskId,
    deadline: Instant,
    task: T,
}

/// Deadline-ordered task queue.
#[derive(Debug)]
pub struct Scheduler<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Instant, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, deadline, task });
        id
    }

    pub fn schedule_after(&mut self, now: Instant, delay: Duration, task: T) -> TaskId {
        self.schedule(now + delay, task)
    }

    /// Removes a pending task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Removes every pending task matching `predicate`; returns how many were removed.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(&entry.task));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Time left until the earliest deadline, zero if already due.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Removes and returns every task due at `now`, earliest deadline first.
    /// Tasks sharing a deadline come out in scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.deadline <= now);
        self.entries = pending;
        due.sort_by_key(|entry| (entry.deadline, entry.id));
        due.into_iter().map(|entry| entry.task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_tasks_come_out_in_deadline_order() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(now, Duration::from_millis(30), "c");
        scheduler.schedule_after(now, Duration::from_millis(10), "a");
        scheduler.schedule_after(now, Duration::from_millis(10), "b");
        scheduler.schedule_after(now, Duration::from_secs(5), "later");

        assert_eq!(scheduler.next_deadline(), Some(now + Duration::from_millis(10)));
        assert!(scheduler.take_due(now).is_empty());
        assert_eq!(
            scheduler.take_due(now + Duration::from_millis(30)),
            vec!["a", "b", "c"]
        );
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_after(now, Duration::from_millis(5), 1);
        scheduler.schedule_after(now, Duration::from_millis(5), 2);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.take_due(now + Duration::from_secs(1)), vec![2]);
    }

    #[test]
    fn cancel_where_filters_by_task() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        for n in 0..6 {
            scheduler.schedule_after(now, Duration::from_millis(n), n);
        }
        assert_eq!(scheduler.cancel_where(|n| n % 2 == 0), 3);
        assert_eq!(scheduler.take_due(now + Duration::from_secs(1)), vec![1, 3, 5]);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn time_until_next_saturates() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(now, ());
        assert_eq!(
            scheduler.time_until_next(now + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
        scheduler.clear();
        assert_eq!(scheduler.time_until_next(now), None);
    }
}
