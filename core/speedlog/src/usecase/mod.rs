pub(crate) mod record;
pub(crate) mod watch;

pub(crate) use record::{RecordOutcome, RecordUseCase};
pub(crate) use watch::{WatchSummary, WatchUseCase};
