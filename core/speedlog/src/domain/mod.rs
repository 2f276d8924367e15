//! ドメイン型と純粋なロジック（I/O なし）

pub mod command;
pub mod measurement;
pub mod record;
pub mod schedule;
pub mod settings;
pub mod timezone;

pub use command::Command;
pub use measurement::{FailurePolicy, Measurement};
pub use record::SpeedRecord;
pub use schedule::Schedule;
pub use settings::{Settings, SettingsOverrides};
pub use timezone::TimeZoneSpec;
