//! Outbound ポート: アプリが外界（FS・時刻・プロセス・ログ・環境変数）を使うための trait

pub mod clock;
pub mod env_resolver;
pub mod fs;
pub mod log;
pub mod process;

pub use clock::Clock;
pub use env_resolver::EnvResolver;
pub use fs::{FileMetadata, FileSystem};
pub use log::{now_iso8601, Log, LogLevel, LogRecord};
pub use process::{Process, ProcessOutput};
