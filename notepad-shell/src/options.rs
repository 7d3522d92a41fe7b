use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use notepad::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// ショートカットの主修飾キー（ホストOSにより Ctrl と Cmd を切り替える）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryModifier {
    Ctrl,
    Cmd,
}

impl PrimaryModifier {
    /// OS 名から既定値を決める（`macos` / `darwin` は Cmd）
    pub fn for_platform(os: &str) -> Self {
        match os {
            "macos" | "darwin" => PrimaryModifier::Cmd,
            _ => PrimaryModifier::Ctrl,
        }
    }

    /// 実行中のOSに対する既定値
    pub fn current() -> Self {
        Self::for_platform(std::env::consts::OS)
    }

    /// メニュー表示用のラベル
    pub fn label(self) -> &'static str {
        match self {
            PrimaryModifier::Ctrl => "Ctrl",
            PrimaryModifier::Cmd => "Cmd",
        }
    }
}

impl Default for PrimaryModifier {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for PrimaryModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PrimaryModifier {
    type Err = ConfigError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Ok(PrimaryModifier::Ctrl),
            "cmd" | "command" | "super" => Ok(PrimaryModifier::Cmd),
            _ => Err(invalid_value("primary_modifier", value)),
        }
    }
}

/// シェル全体の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellOptions {
    /// ウィンドウタイトルに使うアプリケーション名
    pub app_name: String,
    /// ショートカットの主修飾キー
    pub primary_modifier: PrimaryModifier,
    /// デバッグログ（JSON Lines）を出力するか
    pub debug_log: bool,
    /// デバッグログ出力先（未指定時は `~/.notepad-log/debug.log`）
    pub debug_log_path: Option<PathBuf>,
    /// 標準エラー出力のログレベル
    pub log_level: String,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            app_name: "notepad".to_string(),
            primary_modifier: PrimaryModifier::current(),
            debug_log: false,
            debug_log_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl ShellOptions {
    /// JSON 設定ファイルを読み込む（未指定の項目は既定値）
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|err| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let options: ShellOptions =
            serde_json::from_str(&data).map_err(|err| ConfigError::InvalidFile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        options.level_filter()?;
        Ok(options)
    }

    /// ログレベルを解釈する
    pub fn level_filter(&self) -> std::result::Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| invalid_value("log_level", &self.log_level))
    }

    /// デバッグログ出力先を決定する
    pub fn resolve_log_path(&self) -> Option<PathBuf> {
        if !self.debug_log {
            return None;
        }
        match &self.debug_log_path {
            Some(path) => Some(expand_path(path)),
            None => default_log_path(),
        }
    }

    pub fn merged_with(&self, overrides: &OptionOverrides) -> ShellOptions {
        ShellOptions {
            app_name: overrides
                .app_name
                .clone()
                .unwrap_or_else(|| self.app_name.clone()),
            primary_modifier: overrides.primary_modifier.unwrap_or(self.primary_modifier),
            debug_log: overrides.debug_log_path.is_some() || self.debug_log,
            debug_log_path: overrides
                .debug_log_path
                .clone()
                .or_else(|| self.debug_log_path.clone()),
            log_level: overrides
                .log_level
                .clone()
                .unwrap_or_else(|| self.log_level.clone()),
        }
    }
}

/// 環境変数などから与えられる上書き設定
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionOverrides {
    pub app_name: Option<String>,
    pub primary_modifier: Option<PrimaryModifier>,
    pub debug_log_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl OptionOverrides {
    /// `NOTEPAD_*` 環境変数から読み込む
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let primary_modifier = match lookup("NOTEPAD_PRIMARY_MODIFIER") {
            Some(raw) => Some(raw.parse::<PrimaryModifier>()?),
            None => None,
        };
        let log_level = lookup("NOTEPAD_LOG_LEVEL");
        if let Some(level) = &log_level {
            LevelFilter::from_str(level).map_err(|_| invalid_value("log_level", level))?;
        }

        Ok(Self {
            app_name: lookup("NOTEPAD_APP_NAME"),
            primary_modifier,
            debug_log_path: lookup("NOTEPAD_DEBUG_LOG").map(PathBuf::from),
            log_level,
        })
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".notepad-log").join("debug.log"))
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
        None => path.to_path_buf(),
    }
}

fn invalid_value(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// ヘルパー：親ディレクトリを作成
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
