//! std::thread::sleep による Sleeper 実装
//!
//! 長い待機を短い刻みに分け、刻みごとに割り込みを確認する。

use crate::ports::outbound::{InterruptChecker, SleepOutcome, Sleeper};
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct ThreadSleeper {
    interrupt: Arc<dyn InterruptChecker>,
}

impl ThreadSleeper {
    pub fn new(interrupt: Arc<dyn InterruptChecker>) -> Self {
        Self { interrupt }
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) -> SleepOutcome {
        let deadline = Instant::now() + duration;
        loop {
            if self.interrupt.is_interrupted() {
                return SleepOutcome::Interrupted;
            }
            let now = Instant::now();
            if now >= deadline {
                return SleepOutcome::Elapsed;
            }
            std::thread::sleep((deadline - now).min(POLL_INTERVAL));
        }
    }
}
