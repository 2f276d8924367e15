//! 人間向けログ（LogRecord → stderr に要点のみ出力）
//!
//! しきい値より重要度の低いレコードは捨てる。fields は短く要約する（巨大化防止）。

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};

const FIELDS_SUMMARY_MAX: usize = 200;

/// stderr へ 1 行ずつ出す Log 実装
#[derive(Debug, Clone)]
pub struct StderrLog {
    threshold: LogLevel,
}

impl StderrLog {
    pub fn new(threshold: LogLevel) -> Self {
        Self { threshold }
    }

    /// 既定は warn 以上、verbose なら debug まで
    pub fn for_verbosity(verbose: bool) -> Self {
        Self::new(if verbose { LogLevel::Debug } else { LogLevel::Warn })
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level <= self.threshold
    }
}

/// 1 行に整形する（fields は JSON 文字列を切り詰めて付ける）
pub(crate) fn format_line(record: &LogRecord) -> String {
    let mut line = format!("speedlog: {}: {}", record.level.as_str(), record.message);
    if let Some(ref fields) = record.fields {
        let s = serde_json::to_string(fields).unwrap_or_default();
        if s.chars().count() > FIELDS_SUMMARY_MAX {
            let truncated: String = s.chars().take(FIELDS_SUMMARY_MAX).collect();
            line.push_str(&format!(" {}...", truncated));
        } else {
            line.push(' ');
            line.push_str(&s);
        }
    }
    line
}

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if self.enabled(record.level) {
            eprintln!("{}", format_line(record));
        }
        Ok(())
    }
}
