//! CSV の 1 レコード
//!
//! 形式: `"<YYYY-MM-DD HH:MM:SS>",<ツール出力>\n`。ツール出力は中身を解釈しない。

use chrono::NaiveDateTime;

/// タイムスタンプの書式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 壁時計時刻を CSV 用の文字列にする
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// ツール出力を 1 行に収める（前後の空白を除き、途中の改行は空白 1 つに置き換える）
pub fn sanitize_payload(raw: &str) -> String {
    raw.trim()
        .split(['\r', '\n'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 追記する 1 行分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedRecord {
    timestamp: String,
    payload: String,
}

impl SpeedRecord {
    /// 計測開始時刻とツールの生の stdout から作る
    pub fn new(started_at: NaiveDateTime, raw_stdout: &str) -> Self {
        Self {
            timestamp: format_timestamp(started_at),
            payload: sanitize_payload(raw_stdout),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// 終端の改行を含む CSV 行
    pub fn to_csv_line(&self) -> String {
        format!("\"{}\",{}\n", self.timestamp, self.payload)
    }
}
