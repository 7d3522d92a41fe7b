//! 文書の保存状態
//!
//! ファイルパス・既定ファイル名・保存済みフラグを管理する。
//! ディスクへの読み書きやダイアログ表示はホスト側の責務で、ここでは状態だけを持つ。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// 未保存の新規文書に使う既定ファイル名パターン
pub const DEFAULT_FILENAME: &str = "*.txt";

/// 保存要求の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveTarget {
    /// 既知のパスへ上書き保存
    Save,
    /// 保存先を選ばせる
    SaveAs,
}

/// 文書の保存状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStatus {
    path: Option<PathBuf>,
    default_filename: String,
    saved: bool,
}

impl Default for DocumentStatus {
    fn default() -> Self {
        Self {
            path: None,
            default_filename: DEFAULT_FILENAME.to_string(),
            saved: false,
        }
    }
}

impl DocumentStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在のファイルパス
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 保存ダイアログの既定ファイル名
    pub fn default_filename(&self) -> &str {
        &self.default_filename
    }

    /// 保存済みか判定
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// 新規文書に戻す
    pub fn new_document(&mut self) {
        *self = Self::default();
    }

    /// ファイルを開いた
    pub fn opened(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.default_filename = match path.extension() {
            Some(ext) => format!("*.{}", ext.to_string_lossy()),
            None => "*".to_string(),
        };
        self.path = Some(path);
        self.saved = true;
    }

    /// 保存が完了した（名前を付けて保存ならパスも更新）
    pub fn committed(&mut self, path: Option<PathBuf>) {
        if let Some(path) = path {
            self.path = Some(path);
        }
        self.saved = true;
    }

    /// 内容が変更された
    pub fn mark_modified(&mut self) {
        self.saved = false;
    }

    /// 既定ファイル名を更新
    pub fn set_default_filename(&mut self, name: impl Into<String>) {
        self.default_filename = name.into();
    }

    /// ウィンドウタイトル
    pub fn title(&self, app_name: &str) -> String {
        match self.path.as_deref().and_then(Path::file_name) {
            Some(name) => format!("{} - {}", app_name, name.to_string_lossy()),
            None => app_name.to_string(),
        }
    }

    /// 破棄の確認が必要か判定
    ///
    /// 未保存で、かつパスがあるか内容が空でない場合に確認が必要。
    pub fn needs_discard_confirmation(&self, content: &str) -> bool {
        !self.saved && (self.path.is_some() || !content.is_empty())
    }

    /// 保存コマンドの実際の種類（無題の文書は名前を付けて保存になる）
    pub fn save_target(&self) -> SaveTarget {
        if self.path.is_some() {
            SaveTarget::Save
        } else {
            SaveTarget::SaveAs
        }
    }
}
