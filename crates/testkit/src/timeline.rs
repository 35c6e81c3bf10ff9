//! Scripted frame clocks with replay-style seeks.

use starspew_core::TimeMs;

/// One step of a scripted clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineEvent {
    /// Regular frame at the given clock value.
    Frame(TimeMs),
    /// Backward jump to the given clock value (replay seek).
    Seek(TimeMs),
}

impl TimelineEvent {
    /// Clock value the host should drive emitters with for this step.
    pub fn time(&self) -> TimeMs {
        match self {
            TimelineEvent::Frame(t) | TimelineEvent::Seek(t) => *t,
        }
    }
}

/// Fixed-interval frame script with optional mid-run seeks.
///
/// Playing the script yields a frame every `interval_ms` from 0 until
/// `end_ms`; each scheduled seek fires once when the clock reaches its
/// trigger, rewinding to the seek target, and frames continue from there.
#[derive(Debug, Clone)]
pub struct Timeline {
    interval_ms: TimeMs,
    end_ms: TimeMs,
    /// (trigger, target) pairs in trigger order; each fires at most once.
    seeks: Vec<(TimeMs, TimeMs)>,
}

impl Timeline {
    /// Frame script from 0 to `end_ms` at `interval_ms` spacing.
    pub fn new(interval_ms: TimeMs, end_ms: TimeMs) -> Self {
        Self {
            interval_ms: interval_ms.max(0.001),
            end_ms,
            seeks: Vec::new(),
        }
    }

    /// Schedule a backward seek: when the clock reaches `trigger`, jump to
    /// `target`. Forward targets are clamped to the trigger so a "seek" can
    /// never skip ahead.
    pub fn seek_at(mut self, trigger: TimeMs, target: TimeMs) -> Self {
        self.seeks.push((trigger, target.min(trigger)));
        self.seeks
            .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        self
    }

    /// Play the script, yielding every event in order.
    pub fn events(&self) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        let mut pending = self.seeks.iter().copied().peekable();
        let mut now: TimeMs = 0.0;
        // Each seek rewinds the clock but consumes scripted run length, so
        // the walk always terminates.
        let mut budget = self.end_ms;

        loop {
            if let Some(&(trigger, target)) = pending.peek() {
                if now >= trigger {
                    pending.next();
                    now = target;
                    events.push(TimelineEvent::Seek(now));
                    continue;
                }
            }
            if budget < 0.0 {
                break;
            }
            events.push(TimelineEvent::Frame(now));
            now += self.interval_ms;
            budget -= self.interval_ms;
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_timeline_is_monotonic() {
        let events = Timeline::new(10.0, 50.0).events();
        assert_eq!(events.len(), 6, "frames at 0..=50 inclusive");
        let mut last = -1.0;
        for event in events {
            assert!(matches!(event, TimelineEvent::Frame(_)));
            assert!(event.time() > last);
            last = event.time();
        }
    }

    #[test]
    fn seek_fires_once_and_rewinds_the_clock() {
        let events = Timeline::new(10.0, 100.0).seek_at(50.0, 20.0).events();

        let seeks: Vec<&TimelineEvent> = events
            .iter()
            .filter(|e| matches!(e, TimelineEvent::Seek(_)))
            .collect();
        assert_eq!(seeks.len(), 1);
        assert_eq!(seeks[0].time(), 20.0);

        let seek_index = events
            .iter()
            .position(|e| matches!(e, TimelineEvent::Seek(_)))
            .expect("seek present");
        assert_eq!(
            events[seek_index - 1].time(),
            40.0,
            "seek preempts the frame at its trigger"
        );
        assert_eq!(
            events[seek_index + 1].time(),
            20.0,
            "frames resume from the target"
        );
    }

    #[test]
    fn forward_seek_targets_are_clamped() {
        let events = Timeline::new(10.0, 40.0).seek_at(20.0, 90.0).events();
        let seek = events
            .iter()
            .find(|e| matches!(e, TimelineEvent::Seek(_)))
            .expect("seek present");
        assert_eq!(seek.time(), 20.0);
    }

    #[test]
    fn run_length_is_preserved_across_seeks() {
        // 100 ms of frames at 10 ms spacing plus one rewind: the script
        // still ends, and every post-seek frame advances monotonically.
        let events = Timeline::new(10.0, 100.0).seek_at(60.0, 10.0).events();
        let last = events.last().expect("non-empty");
        assert!(matches!(last, TimelineEvent::Frame(_)));
        assert!(last.time() <= 60.0, "rewound timeline ends before trigger");
    }
}
