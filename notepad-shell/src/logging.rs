//! ロギング
//!
//! `log` ファサード向けの標準エラー出力ロガーと、
//! ホストとのやり取りを JSON Lines で記録するデバッグロガーを提供

use crate::commands::{Command, HostRequest};
use crate::options::ensure_parent_dir;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// 開発者向けに stderr へ出力するロガー
#[derive(Debug, Clone)]
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    fn format(record: &Record<'_>) -> String {
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => format!(" at {file}:{line}"),
            _ => String::new(),
        };
        format!(
            "{}: {} in {}{}",
            record.level(),
            record.args(),
            record.target(),
            location
        )
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", Self::format(record));
        }
    }

    fn flush(&self) {}
}

/// プロセス全体のロガーとして登録する（一度だけ呼ぶ）
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

/// デバッグログに残すシェルの出来事
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ShellEvent<'a> {
    Command(&'a Command),
    Requests(&'a [HostRequest]),
    DocumentReplaced { path: Option<&'a Path> },
    ContentCommitted { path: Option<&'a Path> },
    EditRejected { reason: &'a str },
}

/// ホストとのやり取りを JSON Lines 形式で追記するロガー
///
/// 1行が `{"at": <UNIX ミリ秒>, "event": ..., "payload": ...}` の1件に対応する。
#[derive(Debug)]
pub struct DebugLogger {
    path: PathBuf,
    file: File,
}

impl DebugLogger {
    pub fn new(path: PathBuf) -> io::Result<Self> {
        ensure_parent_dir(&path)?;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn record(&self, event: &ShellEvent<'_>) -> io::Result<()> {
        let mut entry = serde_json::to_value(event)?;
        if let Some(fields) = entry.as_object_mut() {
            fields.insert("at".to_string(), unix_millis().into());
        }
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        (&self.file).write_all(line.as_bytes())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|elapsed| u64::try_from(elapsed.as_millis()).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use tempfile::tempdir;

    #[test]
    fn stderr_logger_respects_level() {
        let logger = StderrLogger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }

    #[test]
    fn debug_logger_appends_one_line_per_event() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("debug.log");
        let logger = DebugLogger::new(path.clone()).unwrap();
        assert_eq!(logger.path(), path.as_path());

        logger.record(&ShellEvent::Command(&Command::Save)).unwrap();
        logger
            .record(&ShellEvent::Requests(&[HostRequest::FocusDocument]))
            .unwrap();
        logger
            .record(&ShellEvent::ContentCommitted {
                path: Some(Path::new("/tmp/a.txt")),
            })
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "command");
        assert_eq!(lines[0]["payload"]["command"], "save");
        assert!(lines[0]["at"].is_u64());
        assert_eq!(lines[1]["payload"][0]["request"], "focus-document");
        assert_eq!(lines[2]["event"], "content_committed");
        assert_eq!(lines[2]["payload"]["path"], "/tmp/a.txt");
    }
}
