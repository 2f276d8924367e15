//! アダプター（speedlog 固有のポート実装）

pub mod config;
pub mod csv_file_sink;
pub mod sigint_checker;
pub mod speedtest_cli;
pub mod thread_sleeper;

pub use config::load_settings;
pub use csv_file_sink::CsvFileSink;
pub use sigint_checker::{NoopInterruptChecker, SigintChecker};
pub use speedtest_cli::SpeedtestCli;
pub use thread_sleeper::ThreadSleeper;
