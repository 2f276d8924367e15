//! 実行設定の読み込み（adapter 層）
//!
//! 優先順位（低 → 高）: 既定値 → config.json → 環境変数 → CLI オプション

use crate::domain::schedule::{DEFAULT_INTERVAL_MINUTES, DEFAULT_OFFSET_MINUTES};
use crate::domain::{FailurePolicy, Schedule, Settings, SettingsOverrides, TimeZoneSpec};
use common::domain::Dirs;
use common::error::Error;
use common::ports::outbound::{EnvResolver, FileSystem};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_EXECUTABLE: &str = "SPEEDLOG_EXECUTABLE";
pub const ENV_SERVER_ID: &str = "SPEEDLOG_SERVER_ID";
pub const ENV_OUTPUT: &str = "SPEEDLOG_OUTPUT";
pub const ENV_TIMEZONE: &str = "SPEEDLOG_TIMEZONE";

/// config.json のルート（全項目省略可）
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    executable: Option<String>,
    server_id: Option<ServerIdValue>,
    output_file: Option<String>,
    timezone: Option<String>,
    interval_minutes: Option<u32>,
    offset_minutes: Option<u32>,
    /// "append" または "skip"
    on_failure: Option<String>,
}

/// server_id は "48463" でも 48463 でも書ける
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServerIdValue {
    Text(String),
    Number(u64),
}

impl From<ServerIdValue> for String {
    fn from(v: ServerIdValue) -> Self {
        match v {
            ServerIdValue::Text(s) => s,
            ServerIdValue::Number(n) => n.to_string(),
        }
    }
}

/// 値の出どころ（エラー種別の切り替えに使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Cli,
    Env,
    File,
}

fn pick<T>(cli: Option<T>, env: Option<T>, file: Option<T>) -> Option<(T, Source)> {
    cli.map(|v| (v, Source::Cli))
        .or_else(|| env.map(|v| (v, Source::Env)))
        .or_else(|| file.map(|v| (v, Source::File)))
}

/// "~" の展開に使うホーム（HOME、なければ USERPROFILE）
fn home_dir(env: &dyn EnvResolver) -> Option<String> {
    env.var("HOME")
        .filter(|h| !h.is_empty())
        .or_else(|| env.var("USERPROFILE").filter(|h| !h.is_empty()))
}

/// "~" / "~/..." をホームで展開する
fn expand_home(path: &str, home: Option<&str>) -> PathBuf {
    match (path, home) {
        ("~", Some(h)) => PathBuf::from(h),
        (p, Some(h)) if p.starts_with("~/") => Path::new(h).join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

fn read_config_file(
    fs: &dyn FileSystem,
    dirs: Option<&Dirs>,
    explicit: Option<&Path>,
) -> Result<ConfigFile, Error> {
    let path = match (explicit, dirs) {
        (Some(p), _) => {
            if !fs.exists(p) {
                return Err(Error::config(format!(
                    "config file '{}' not found",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        (None, Some(d)) => {
            let p = d.config_file();
            if !fs.exists(&p) {
                return Ok(ConfigFile::default());
            }
            p
        }
        (None, None) => return Ok(ConfigFile::default()),
    };
    if !fs.metadata(&path)?.is_file() {
        return Err(Error::config(format!(
            "config file '{}' is not a regular file",
            path.display()
        )));
    }
    let json = fs.read_to_string(&path)?;
    serde_json::from_str(&json)
        .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
}

/// 既定値・設定ファイル・環境変数・CLI を重ねて Settings を作る
pub fn load_settings(
    env: &dyn EnvResolver,
    fs: &dyn FileSystem,
    dirs: Option<&Dirs>,
    overrides: &SettingsOverrides,
) -> Result<Settings, Error> {
    let file = read_config_file(fs, dirs, overrides.config_file.as_deref())?;
    let home = home_dir(env);
    let home = home.as_deref();

    let output_file = pick(
        overrides.output_file.clone(),
        env.var(ENV_OUTPUT),
        file.output_file,
    )
    .map(|(p, _)| expand_home(&p, home))
    .or_else(|| dirs.map(Dirs::default_output_file))
    .ok_or_else(|| {
        Error::env("cannot determine the output file: set HOME or SPEEDLOG_HOME, or pass --output")
    })?;

    let mut settings = Settings::with_output(output_file);

    if let Some((exe, _)) = pick(
        overrides.executable.clone(),
        env.var(ENV_EXECUTABLE),
        file.executable,
    ) {
        settings.executable = expand_home(&exe, home);
    }

    if let Some((id, source)) = pick(
        overrides.server_id.clone(),
        env.var(ENV_SERVER_ID),
        file.server_id.map(String::from),
    ) {
        let id = id.trim().to_string();
        if id.is_empty() {
            return Err(reject(source, "server id must not be empty".to_string()));
        }
        settings.server_id = id;
    }

    if let Some((tz, source)) = pick(
        overrides.timezone.clone(),
        env.var(ENV_TIMEZONE),
        file.timezone,
    ) {
        settings.timezone = tz
            .parse::<TimeZoneSpec>()
            .map_err(|e| reject(source, e.to_string()))?;
    }

    let interval = pick(overrides.interval_minutes, None, file.interval_minutes);
    let offset = pick(overrides.offset_minutes, None, file.offset_minutes);
    let from_file = matches!(interval, Some((_, Source::File))) || matches!(offset, Some((_, Source::File)));
    settings.schedule = Schedule::new(
        interval.map(|(v, _)| v).unwrap_or(DEFAULT_INTERVAL_MINUTES),
        offset.map(|(v, _)| v).unwrap_or(DEFAULT_OFFSET_MINUTES),
    )
    .map_err(|e| if from_file { Error::config(e.to_string()) } else { e })?;

    settings.on_failure = match overrides.on_failure {
        Some(p) => Some(p),
        None => file
            .on_failure
            .map(|p| p.parse::<FailurePolicy>())
            .transpose()
            .map_err(|e| Error::config(e.to_string()))?,
    };

    Ok(settings)
}

/// 設定ファイル由来の不正値は Config、CLI・環境変数由来は InvalidArgument
fn reject(source: Source, msg: String) -> Error {
    match source {
        Source::File => Error::config(msg),
        Source::Cli | Source::Env => Error::invalid_argument(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::StdFileSystem;
    use std::collections::HashMap;

    struct MapEnv(HashMap<String, String>);

    impl MapEnv {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl EnvResolver for MapEnv {
        fn var(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }

        fn resolve_dirs(&self) -> Result<Dirs, Error> {
            Err(Error::env("not used"))
        }
    }

    fn write_config(dirs: &Dirs, json: &str) {
        std::fs::create_dir_all(&dirs.config_dir).unwrap();
        std::fs::write(dirs.config_file(), json).unwrap();
    }

    #[test]
    fn test_defaults_without_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = Dirs::under(tmp.path());
        let s = load_settings(
            &MapEnv::new(&[]),
            &StdFileSystem,
            Some(&dirs),
            &SettingsOverrides::default(),
        )
        .unwrap();
        assert_eq!(s, Settings::with_output(dirs.default_output_file()));
        assert_eq!(s.server_id, "48463");
        assert_eq!(s.schedule, Schedule::default());
    }

    #[test]
    fn test_config_file_values() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = Dirs::under(tmp.path());
        write_config(
            &dirs,
            r#"{
                "executable": "~/bin/speedtest",
                "server_id": 12345,
                "output_file": "/data/speed.csv",
                "timezone": "+09:00",
                "interval_minutes": 15,
                "offset_minutes": 5,
                "on_failure": "skip"
            }"#,
        );
        let s = load_settings(
            &MapEnv::new(&[("HOME", "/home/u")]),
            &StdFileSystem,
            Some(&dirs),
            &SettingsOverrides::default(),
        )
        .unwrap();
        assert_eq!(s.executable, Path::new("/home/u/bin/speedtest"));
        assert_eq!(s.server_id, "12345");
        assert_eq!(s.output_file, Path::new("/data/speed.csv"));
        assert_eq!(s.timezone.to_string(), "+09:00");
        assert_eq!(s.schedule, Schedule::new(15, 5).unwrap());
        assert_eq!(s.on_failure, Some(FailurePolicy::Skip));
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = Dirs::under(tmp.path());
        write_config(&dirs, r#"{"server_id": "1", "output_file": "/file.csv"}"#);
        let env = MapEnv::new(&[(ENV_SERVER_ID, "2"), (ENV_OUTPUT, "/env.csv")]);

        let s = load_settings(&env, &StdFileSystem, Some(&dirs), &SettingsOverrides::default())
            .unwrap();
        assert_eq!(s.server_id, "2");
        assert_eq!(s.output_file, Path::new("/env.csv"));

        let overrides = SettingsOverrides {
            server_id: Some("3".to_string()),
            ..Default::default()
        };
        let s = load_settings(&env, &StdFileSystem, Some(&dirs), &overrides).unwrap();
        assert_eq!(s.server_id, "3");
        assert_eq!(s.output_file, Path::new("/env.csv"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let overrides = SettingsOverrides {
            config_file: Some(tmp.path().join("missing.json")),
            output_file: Some("/x.csv".to_string()),
            ..Default::default()
        };
        let err = load_settings(&MapEnv::new(&[]), &StdFileSystem, None, &overrides).unwrap_err();
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_config_path_that_is_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let overrides = SettingsOverrides {
            config_file: Some(tmp.path().to_path_buf()),
            output_file: Some("/x.csv".to_string()),
            ..Default::default()
        };
        let err = load_settings(&MapEnv::new(&[]), &StdFileSystem, None, &overrides).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_bad_json_and_unknown_keys_are_config_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = Dirs::under(tmp.path());
        write_config(&dirs, "{ not json");
        let err = load_settings(&MapEnv::new(&[]), &StdFileSystem, Some(&dirs), &SettingsOverrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        write_config(&dirs, r#"{"serverid": "1"}"#);
        let err = load_settings(&MapEnv::new(&[]), &StdFileSystem, Some(&dirs), &SettingsOverrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_values_by_source() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = Dirs::under(tmp.path());
        write_config(&dirs, r#"{"timezone": "Asia/Tokyo"}"#);
        let err = load_settings(&MapEnv::new(&[]), &StdFileSystem, Some(&dirs), &SettingsOverrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let overrides = SettingsOverrides {
            timezone: Some("utc".to_string()),
            offset_minutes: Some(12),
            ..Default::default()
        };
        let err = load_settings(&MapEnv::new(&[]), &StdFileSystem, Some(&dirs), &overrides).unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_no_dirs_and_no_output_is_env_error() {
        let err = load_settings(&MapEnv::new(&[]), &StdFileSystem, None, &SettingsOverrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::Env(_)));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("~", Some("/h")), Path::new("/h"));
        assert_eq!(expand_home("~/a/b", Some("/h")), Path::new("/h/a/b"));
        assert_eq!(expand_home("~/a", None), Path::new("~/a"));
        assert_eq!(expand_home("/abs", Some("/h")), Path::new("/abs"));
    }

    #[test]
    fn test_tilde_falls_back_to_userprofile() {
        let env = MapEnv::new(&[("USERPROFILE", r"C:\Users\u"), (ENV_OUTPUT, "~/speed.csv")]);
        let s = load_settings(&env, &StdFileSystem, None, &SettingsOverrides::default()).unwrap();
        assert_eq!(s.output_file, Path::new(r"C:\Users\u").join("speed.csv"));

        let env = MapEnv::new(&[
            ("HOME", "/home/u"),
            ("USERPROFILE", "/ignored"),
            (ENV_OUTPUT, "~/speed.csv"),
        ]);
        let s = load_settings(&env, &StdFileSystem, None, &SettingsOverrides::default()).unwrap();
        assert_eq!(s.output_file, Path::new("/home/u/speed.csv"));
    }

    #[test]
    fn test_failure_policy_cli_over_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = Dirs::under(tmp.path());
        write_config(&dirs, r#"{"on_failure": "skip"}"#);
        let overrides = SettingsOverrides {
            on_failure: Some(FailurePolicy::Append),
            ..Default::default()
        };
        let s = load_settings(&MapEnv::new(&[]), &StdFileSystem, Some(&dirs), &overrides).unwrap();
        assert_eq!(s.on_failure, Some(FailurePolicy::Append));

        write_config(&dirs, r#"{"on_failure": "drop"}"#);
        let err = load_settings(&MapEnv::new(&[]), &StdFileSystem, Some(&dirs), &SettingsOverrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
