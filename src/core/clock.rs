use std::fmt::Debug;

use chrono::{Local, NaiveDateTime};

/// Source of "now" for jump-to-today and default cursors.
pub trait Clock: Debug {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock of the host timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant, for deterministic hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
