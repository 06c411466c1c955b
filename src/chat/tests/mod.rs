//! Unit tests for the chat module.


use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock that advances one second on every reading.
#[derive(Debug)]
pub(super) struct StepClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl StepClock {
    pub(super) fn new() -> Self {
        Self {
            start: Utc
                .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
                .single()
                .expect("valid start time"),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::seconds(tick)
    }
}
