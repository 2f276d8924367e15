//! タイムスタンプとスケジュールの基準タイムゾーン
//!
//! IANA 名は扱わず、システムのローカル時刻・UTC・固定オフセットのみ。

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use common::error::Error;
use std::fmt;
use std::str::FromStr;

/// 基準タイムゾーン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneSpec {
    /// システムのローカル時刻
    #[default]
    Local,
    Utc,
    /// 固定オフセット（例: +09:00）
    Fixed(FixedOffset),
}

impl TimeZoneSpec {
    /// UTC の時刻をこのゾーンの壁時計時刻に変換する
    pub fn to_local_naive(&self, now: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => now.with_timezone(&Local).naive_local(),
            Self::Utc => now.naive_utc(),
            Self::Fixed(offset) => now.with_timezone(offset).naive_local(),
        }
    }

    /// このゾーンの壁時計時刻を UTC に戻す。
    /// DST の重複では早い方、欠落（存在しない時刻）では 1 時間後の時刻を返す。
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Local => resolve_local(&Local, local),
            Self::Utc => Some(local.and_utc()),
            Self::Fixed(offset) => resolve_local(offset, local),
        }
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit())
}

/// "+09:00" / "-0530" / "+9" 形式
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => (rest, "0"),
    };
    if !all_digits(hours) || !all_digits(minutes) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl FromStr for TimeZoneSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "local" => return Ok(Self::Local),
            "utc" | "z" | "gmt" => return Ok(Self::Utc),
            _ => {}
        }
        parse_offset(trimmed).map(Self::Fixed).ok_or_else(|| {
            Error::invalid_argument(format!(
                "invalid timezone '{}': use 'local', 'utc' or an offset like '+09:00'",
                s
            ))
        })
    }
}

impl fmt::Display for TimeZoneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Utc => write!(f, "utc"),
            Self::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        assert_eq!("local".parse::<TimeZoneSpec>().unwrap(), TimeZoneSpec::Local);
        assert_eq!("UTC".parse::<TimeZoneSpec>().unwrap(), TimeZoneSpec::Utc);
        assert_eq!(" z ".parse::<TimeZoneSpec>().unwrap(), TimeZoneSpec::Utc);
    }

    #[test]
    fn test_parse_offsets() {
        let tokyo = TimeZoneSpec::Fixed(FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!("+09:00".parse::<TimeZoneSpec>().unwrap(), tokyo);
        assert_eq!("+0900".parse::<TimeZoneSpec>().unwrap(), tokyo);
        assert_eq!("+9".parse::<TimeZoneSpec>().unwrap(), tokyo);
        let india = TimeZoneSpec::Fixed(FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap());
        assert_eq!("-05:30".parse::<TimeZoneSpec>().unwrap(), india);
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["Asia/Tokyo", "+25:00", "+09:75", "09:00", "+", "+０９"] {
            let err = bad.parse::<TimeZoneSpec>().unwrap_err();
            assert!(err.is_usage(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["local", "utc", "+09:00", "-05:30"] {
            let tz: TimeZoneSpec = s.parse().unwrap();
            assert_eq!(tz.to_string(), s);
        }
    }

    #[test]
    fn test_to_local_naive_fixed() {
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 23, 30, 0).unwrap();
        let tz: TimeZoneSpec = "+09:00".parse().unwrap();
        assert_eq!(
            tz.to_local_naive(now).format("%Y-%m-%d %H:%M:%S").to_string(),
            "2025-04-02 08:30:00"
        );
        assert_eq!(TimeZoneSpec::Utc.to_local_naive(now), now.naive_utc());
    }

    #[test]
    fn test_to_utc_inverts_to_local_naive() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 30, 0).unwrap();
        for spec in ["utc", "+09:00", "-05:30", "local"] {
            let tz: TimeZoneSpec = spec.parse().unwrap();
            let local = tz.to_local_naive(now);
            assert_eq!(tz.to_utc(local), Some(now), "{}", spec);
        }
    }
}
